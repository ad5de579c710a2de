//! Editing session and host collaborator seam
//!
//! The state machine only predicts block types. Whatever owns the document
//! (the in-crate `EditingSession`, or a JS editor bound through the API)
//! implements `BlockHost` so the triggers can be applied to it.

pub mod editing;

use serde::{Deserialize, Serialize};

use crate::models::BlockType;
use crate::transitions::{cycle_change, next_type_on_break};

pub use editing::EditingSession;

/// A caret position: block index and character offset inside that block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Caret {
    pub block: usize,
    pub offset: usize,
}

impl Caret {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// Editing capabilities the state machine needs from its host
pub trait BlockHost {
    /// Type of the block holding the caret, if the caret is inside a block
    fn type_at_caret(&self) -> Option<BlockType>;

    /// Split at the caret, give the new block `block_type` and move the caret into it
    fn insert_block_after_caret(&mut self, block_type: BlockType);

    /// Change the type of the block holding the caret
    fn set_type_at_caret(&mut self, block_type: BlockType);

    /// The host's own line break, used when no block holds the caret
    fn insert_plain_break(&mut self);
}

/// Apply the line-break trigger to a host.
///
/// Returns the type given to the new block, or `None` when the caret was
/// outside any block and the host's plain break ran instead.
pub fn apply_line_break<H: BlockHost + ?Sized>(host: &mut H) -> Option<BlockType> {
    match host.type_at_caret() {
        Some(current) => {
            let next = next_type_on_break(current);
            log::debug!("line break: {} -> {}", current, next);
            host.insert_block_after_caret(next);
            Some(next)
        }
        None => {
            host.insert_plain_break();
            None
        }
    }
}

/// Apply the type-cycle trigger to a host.
///
/// Returns the new type, or `None` when nothing changed. A no-op cycle never
/// reaches the host's `set_type_at_caret`.
pub fn apply_type_cycle<H: BlockHost + ?Sized>(host: &mut H) -> Option<BlockType> {
    let current = host.type_at_caret()?;
    let next = cycle_change(current)?;
    log::debug!("type cycle: {} -> {}", current, next);
    host.set_type_at_caret(next);
    Some(next)
}
