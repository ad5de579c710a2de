//! Layout mapping
//!
//! Turns a block's type into renderer-agnostic presentation rules and
//! display-ready text. Screen and print renderers both consume this module.

pub mod descriptor;
pub mod mapper;
pub mod units;

pub use descriptor::{DisplaySpan, LaidOutBlock, LayoutDescriptor};
pub use mapper::{descriptor_for, layout_block, layout_for};
