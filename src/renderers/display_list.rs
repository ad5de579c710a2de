//! Display List for screen rendering
//!
//! This module defines the output structure returned to JavaScript for the live
//! editing view. Each block arrives with its classes, data attributes and
//! pre-scaled box metrics so the DOM layer only has to apply them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::layout::{layout_block, DisplaySpan, LaidOutBlock};
use crate::models::{Alignment, BlockType, Document};

/// Configuration for screen layout
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ScreenLayoutConfig {
    /// CSS pixels per abstract layout unit (96dpi screen / 72 units per inch)
    pub px_per_unit: f32,

    /// Font size in pixels
    pub font_size: f32,
}

impl Default for ScreenLayoutConfig {
    fn default() -> Self {
        Self {
            px_per_unit: 96.0 / 72.0,
            font_size: 16.0,
        }
    }
}

/// Top-level display list containing all rendering information
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DisplayList {
    /// Font size every block is set in
    pub font_size: f32,

    /// All blocks in reading order
    pub blocks: Vec<RenderBlock>,
}

/// A single block with all its rendering information
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RenderBlock {
    /// Block index for identification
    pub block_index: usize,

    pub block_type: BlockType,

    /// CSS class names to apply
    pub classes: Vec<String>,

    /// Data attributes (data-* attributes)
    pub dataset: HashMap<String, String>,

    /// Left indent in pixels
    pub x: f32,

    /// Right indent in pixels
    pub right: f32,

    /// Space above and below in pixels
    pub space_above: f32,
    pub space_below: f32,

    /// Maximum width in pixels, if the block type is width-limited
    pub max_width: Option<f32>,

    /// CSS text-align value
    pub text_align: String,

    /// Spans to render, decoration glyphs included
    pub spans: Vec<DisplaySpan>,
}

/// CSS classes for a laid out block
fn classes_for(laid_out: &LaidOutBlock) -> Vec<String> {
    let mut classes = vec![
        "screenplay-block".to_string(),
        laid_out.block_type.kebab_case_name().to_string(),
    ];
    let descriptor = &laid_out.descriptor;
    if descriptor.force_uppercase {
        classes.push("uppercase".to_string());
    }
    match descriptor.alignment {
        Alignment::Left => {}
        Alignment::Right => classes.push("text-right".to_string()),
        Alignment::Center => classes.push("text-center".to_string()),
    }
    if descriptor.keep_with_next {
        classes.push("keep-with-next".to_string());
    }
    if laid_out.block_type.is_legacy() {
        classes.push("legacy".to_string());
    }
    classes
}

fn render_block(index: usize, laid_out: &LaidOutBlock, config: &ScreenLayoutConfig) -> RenderBlock {
    let scale = config.px_per_unit;
    let descriptor = &laid_out.descriptor;

    let mut dataset = HashMap::new();
    dataset.insert("blockIndex".to_string(), index.to_string());
    dataset.insert(
        "blockType".to_string(),
        laid_out.block_type.kebab_case_name().to_string(),
    );

    RenderBlock {
        block_index: index,
        block_type: laid_out.block_type,
        classes: classes_for(laid_out),
        dataset,
        x: descriptor.margin_left * scale,
        right: descriptor.margin_right * scale,
        space_above: descriptor.margin_top * scale,
        space_below: descriptor.margin_bottom * scale,
        max_width: descriptor.wrap_width.map(|w| w * scale),
        text_align: descriptor.alignment.as_str().to_string(),
        spans: laid_out.spans(),
    }
}

/// Compute the display list for a whole document
pub fn compute_display_list(document: &Document, config: &ScreenLayoutConfig) -> DisplayList {
    let blocks = document
        .iter()
        .enumerate()
        .map(|(index, block)| render_block(index, &layout_block(block), config))
        .collect();

    DisplayList {
        font_size: config.font_size,
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Block;

    fn unit_config() -> ScreenLayoutConfig {
        ScreenLayoutConfig {
            px_per_unit: 1.0,
            font_size: 12.0,
        }
    }

    #[test]
    fn test_classes_follow_block_type() {
        let doc = Document::from_blocks(vec![
            Block::with_text(BlockType::Transition, "cut to:"),
            Block::with_text(BlockType::Paragraph, "old text"),
        ]);
        let list = compute_display_list(&doc, &unit_config());

        let transition = &list.blocks[0];
        assert!(transition.classes.contains(&"transition".to_string()));
        assert!(transition.classes.contains(&"uppercase".to_string()));
        assert!(transition.classes.contains(&"text-right".to_string()));
        assert_eq!(transition.text_align, "right");
        assert_eq!(transition.spans[0].text, "CUT TO:");

        assert!(list.blocks[1].classes.contains(&"legacy".to_string()));
    }

    #[test]
    fn test_metrics_scale_with_config() {
        let doc = Document::from_blocks(vec![Block::with_text(BlockType::Dialogue, "Hi.")]);
        let list = compute_display_list(
            &doc,
            &ScreenLayoutConfig {
                px_per_unit: 2.0,
                font_size: 16.0,
            },
        );
        assert_eq!(list.blocks[0].x, 144.0);
        assert_eq!(list.blocks[0].max_width, Some(504.0));
    }

    #[test]
    fn test_dataset_identifies_block() {
        let list = compute_display_list(&Document::new(), &unit_config());
        let block = &list.blocks[0];
        assert_eq!(block.dataset.get("blockIndex").map(String::as_str), Some("0"));
        assert_eq!(block.dataset.get("blockType").map(String::as_str), Some("scene-heading"));
    }
}
