//! Block type to presentation mapping
//!
//! One table drives every renderer, so the screen view and the printed page
//! agree on indentation, capitalization, alignment and decoration.

use crate::models::{Alignment, Block, BlockType, TextRun};

use super::descriptor::{LaidOutBlock, LayoutDescriptor};
use super::units::{
    BASELINE, CHARACTER_COLUMN, DIALOGUE_COLUMN, DIALOGUE_WIDTH, LINE_SPACE, PARENTHETICAL_COLUMN,
    PARENTHETICAL_WIDTH, SCENE_SPACE_ABOVE,
};

/// Row of the layout table, before per-block overrides
struct LayoutRow {
    margins: [f32; 4],
    alignment: Alignment,
    force_uppercase: bool,
    wrap_width: Option<f32>,
    parenthesized: bool,
    keep_with_next: bool,
}

const DEFAULT_ROW: LayoutRow = LayoutRow {
    margins: [BASELINE, 0.0, 0.0, LINE_SPACE],
    alignment: Alignment::Left,
    force_uppercase: false,
    wrap_width: None,
    parenthesized: false,
    keep_with_next: false,
};

fn row_for(block_type: BlockType) -> LayoutRow {
    match block_type {
        BlockType::SceneHeading => LayoutRow {
            margins: [BASELINE, SCENE_SPACE_ABOVE, 0.0, LINE_SPACE],
            force_uppercase: true,
            ..DEFAULT_ROW
        },
        BlockType::Action => DEFAULT_ROW,
        BlockType::Character => LayoutRow {
            margins: [CHARACTER_COLUMN, LINE_SPACE, 0.0, 0.0],
            force_uppercase: true,
            keep_with_next: true,
            ..DEFAULT_ROW
        },
        BlockType::Dialogue => LayoutRow {
            margins: [DIALOGUE_COLUMN, 0.0, DIALOGUE_COLUMN, 0.0],
            wrap_width: Some(DIALOGUE_WIDTH),
            ..DEFAULT_ROW
        },
        BlockType::Parenthetical => LayoutRow {
            margins: [PARENTHETICAL_COLUMN, 0.0, 0.0, 0.0],
            wrap_width: Some(PARENTHETICAL_WIDTH),
            parenthesized: true,
            ..DEFAULT_ROW
        },
        BlockType::Transition => LayoutRow {
            margins: [BASELINE, LINE_SPACE, 0.0, LINE_SPACE],
            alignment: Alignment::Right,
            force_uppercase: true,
            ..DEFAULT_ROW
        },
        // Legacy buckets render like action
        BlockType::Paragraph | BlockType::Slugline => DEFAULT_ROW,
    }
}

/// Presentation rules for a block type
pub fn descriptor_for(block_type: BlockType) -> LayoutDescriptor {
    let row = row_for(block_type);
    let [margin_left, margin_top, margin_right, margin_bottom] = row.margins;
    LayoutDescriptor {
        margin_left,
        margin_top,
        margin_right,
        margin_bottom,
        alignment: row.alignment,
        force_uppercase: row.force_uppercase,
        wrap_width: row.wrap_width,
        decoration_prefix: row.parenthesized.then(|| "(".to_string()),
        decoration_suffix: row.parenthesized.then(|| ")".to_string()),
        decoration_italic: row.parenthesized,
        keep_with_next: row.keep_with_next,
    }
}

/// Copy runs for display, uppercasing when the descriptor asks for it
fn display_runs(runs: &[TextRun], force_uppercase: bool) -> Vec<TextRun> {
    runs.iter()
        .map(|run| TextRun {
            text: if force_uppercase {
                run.text.to_uppercase()
            } else {
                run.text.clone()
            },
            ..run.empty_like()
        })
        .collect()
}

/// Map a block type and its runs to a descriptor and display-ready runs.
///
/// The input runs are never modified.
pub fn layout_for(block_type: BlockType, runs: &[TextRun]) -> (LayoutDescriptor, Vec<TextRun>) {
    let descriptor = descriptor_for(block_type);
    let runs = display_runs(runs, descriptor.force_uppercase);
    (descriptor, runs)
}

/// Lay out a stored block, applying its alignment override
pub fn layout_block(block: &Block) -> LaidOutBlock {
    let (mut descriptor, runs) = layout_for(block.block_type, &block.runs);
    if let Some(align) = block.align {
        descriptor.alignment = align;
    }
    LaidOutBlock {
        block_type: block.block_type,
        descriptor,
        runs,
    }
}
