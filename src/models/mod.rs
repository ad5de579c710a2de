//! Models module for the Screenplay Editor
//!
//! This module contains the data models used by the block-based
//! screenplay document: block types, text runs, blocks and documents.

pub mod core;
pub mod elements;
pub mod serde_helpers;

// Re-export commonly used types
pub use self::core::*;
pub use elements::*;
