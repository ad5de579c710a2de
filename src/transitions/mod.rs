//! Block type state machine
//!
//! Decides which block type comes next when the writer acts on the current block.
//!
//! ## Triggers
//! - LineBreak: a new block is inserted after the current one; its type is predicted
//! - TypeCycle: the current block is reinterpreted in place
//!
//! The two tables are similar but not identical. A parenthetical advances to
//! dialogue under both, and the legacy buckets are never rewritten by a cycle.

use serde::{Deserialize, Serialize};

use crate::models::BlockType;

/// User action that asks the state machine for a block type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trigger {
    /// Enter: end the current block and start a new one
    LineBreak,
    /// Tab: switch the type of the current block
    TypeCycle,
}

/// Type assigned to the block inserted after `current` on a line break
pub fn next_type_on_break(current: BlockType) -> BlockType {
    match current {
        BlockType::SceneHeading => BlockType::Action,
        BlockType::Character => BlockType::Dialogue,
        BlockType::Parenthetical => BlockType::Dialogue,
        BlockType::Dialogue => BlockType::Action,
        BlockType::Transition => BlockType::SceneHeading,
        BlockType::Action | BlockType::Paragraph | BlockType::Slugline => BlockType::Action,
    }
}

/// Type the current block takes on an explicit type cycle.
///
/// Returns `current` unchanged when the cycle has no effect.
pub fn next_type_on_cycle(current: BlockType) -> BlockType {
    match current {
        BlockType::SceneHeading => BlockType::Action,
        BlockType::Character => BlockType::Dialogue,
        BlockType::Transition => BlockType::SceneHeading,
        BlockType::Dialogue => BlockType::Action,
        BlockType::Parenthetical => BlockType::Dialogue,
        BlockType::Action | BlockType::Paragraph | BlockType::Slugline => current,
    }
}

/// Dispatch on the trigger
pub fn next_type(current: BlockType, trigger: Trigger) -> BlockType {
    match trigger {
        Trigger::LineBreak => next_type_on_break(current),
        Trigger::TypeCycle => next_type_on_cycle(current),
    }
}

/// The type a cycle would switch to, or `None` when the cycle is a no-op
pub fn cycle_change(current: BlockType) -> Option<BlockType> {
    let next = next_type_on_cycle(current);
    (next != current).then_some(next)
}
