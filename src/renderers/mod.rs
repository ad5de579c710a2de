//! Renderers module for the Screenplay Editor
//!
//! This module contains the rendering/export adapters that turn a document
//! into a screen display list, a print document definition or plain text.
//! All of them read block presentation from `crate::layout`.

pub mod display_list;
pub mod plain;
pub mod print;

// Re-export commonly used types
pub use display_list::{compute_display_list, DisplayList, RenderBlock, ScreenLayoutConfig};
pub use plain::{to_plain_text, PlainTextSettings};
pub use print::{to_print_document, PrintDocument, PrintSettings};
