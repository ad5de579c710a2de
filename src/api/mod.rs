//! Screenplay Editor WASM API
//!
//! This module provides the JavaScript-facing API for the screenplay editor.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization, error handling, and logging
//! - `core`: Block type predictions, layout, and the `ScreenplaySession` handle
//!
//! The editor surface owns a `ScreenplaySession` object; nothing is kept in
//! module-level state.

pub mod core;
pub mod helpers;

// Re-export all public functions from modules to maintain the current public API
pub use self::core::*;
