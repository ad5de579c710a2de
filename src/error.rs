//! Error types for the screenplay engine
//!
//! The transition and layout functions are total and never fail. These errors
//! cover the edges around them: reading documents across the persistence
//! boundary, file I/O, settings parsing and session commands that reference
//! blocks which do not exist.

use thiserror::Error;

/// Top-level error type for the crate
#[derive(Debug, Error)]
pub enum ScreenplayError {
    /// The persisted text is not valid JSON
    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The persisted value is valid JSON but not a list of blocks
    #[error("Document must be an array of blocks, found {0}")]
    NotAnArray(&'static str),

    /// Reading or writing a document file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A block name outside the closed block type set was given explicitly
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    /// A command referenced a block index past the end of the document
    #[error("Block {index} out of range (document has {len} blocks)")]
    BlockOutOfRange { index: usize, len: usize },

    /// An edit needs a caret but none is placed
    #[error("No caret in document")]
    NoCaret,

    #[error("No undo history available")]
    NothingToUndo,

    #[error("No redo history available")]
    NothingToRedo,

    /// Renderer settings could not be parsed
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, ScreenplayError>;
