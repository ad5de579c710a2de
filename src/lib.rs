//! Screenplay Editor WASM Module
//!
//! Core of a block-based screenplay editor: the block model, the state machine
//! that predicts the next block type as the writer types, and the layout
//! mapping shared by the screen view and the print export.

pub mod api;
pub mod error;
pub mod layout;
pub mod models;
pub mod persistence;
pub mod renderers;
pub mod session;
pub mod transitions;
pub mod undo;

// Re-export commonly used types
pub use error::{Result, ScreenplayError};
pub use layout::{layout_block, layout_for, LaidOutBlock, LayoutDescriptor};
pub use models::core::*;
pub use models::elements::*;
pub use session::{BlockHost, Caret, EditingSession};
pub use transitions::{next_type_on_break, next_type_on_cycle, Trigger};

use wasm_bindgen::prelude::*;

#[cfg(feature = "console_log")]
fn init_logging() -> bool {
    console_log::init_with_level(log::Level::Debug).is_ok()
}

#[cfg(not(feature = "console_log"))]
fn init_logging() -> bool {
    false
}

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    if init_logging() {
        log::info!("Screenplay Editor WASM module initialized");
    }
}
