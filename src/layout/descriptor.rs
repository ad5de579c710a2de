//! Layout descriptor and display spans
//!
//! These are the renderer-agnostic outputs of the layout mapper. They are
//! derived per render and never stored in the document.

use serde::{Deserialize, Serialize};

use crate::models::{Alignment, BlockType, TextRun};

/// Presentation rules for one block
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LayoutDescriptor {
    pub margin_left: f32,
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,

    pub alignment: Alignment,

    /// Display text is uppercased (storage keeps the typed casing)
    pub force_uppercase: bool,

    /// Maximum line width in layout units
    #[serde(default)]
    pub wrap_width: Option<f32>,

    /// Literal text rendered before the block content
    #[serde(default)]
    pub decoration_prefix: Option<String>,

    /// Literal text rendered after the block content
    #[serde(default)]
    pub decoration_suffix: Option<String>,

    /// Decoration glyphs are set in italics
    #[serde(default)]
    pub decoration_italic: bool,

    /// Block must stay on the same page as the block that follows it
    #[serde(default)]
    pub keep_with_next: bool,
}

impl LayoutDescriptor {
    /// Margins in `[left, top, right, bottom]` order
    pub fn margins(&self) -> [f32; 4] {
        [
            self.margin_left,
            self.margin_top,
            self.margin_right,
            self.margin_bottom,
        ]
    }

    pub fn has_decoration(&self) -> bool {
        self.decoration_prefix.is_some() || self.decoration_suffix.is_some()
    }
}

/// A display-ready span: either block content or a decoration glyph
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DisplaySpan {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,

    /// True for prefix/suffix glyphs that are not part of the stored text
    pub decoration: bool,
}

impl DisplaySpan {
    fn content(run: &TextRun) -> Self {
        Self {
            text: run.text.clone(),
            bold: run.bold,
            italic: run.italic,
            underline: run.underline,
            decoration: false,
        }
    }

    fn decoration(text: &str, italic: bool) -> Self {
        Self {
            text: text.to_string(),
            bold: false,
            italic,
            underline: false,
            decoration: true,
        }
    }
}

/// A block after layout: its descriptor plus the transformed runs
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LaidOutBlock {
    pub block_type: BlockType,
    pub descriptor: LayoutDescriptor,

    /// Presentation copies of the block's runs
    pub runs: Vec<TextRun>,
}

impl LaidOutBlock {
    /// Content spans wrapped in the descriptor's decoration
    pub fn spans(&self) -> Vec<DisplaySpan> {
        let italic = self.descriptor.decoration_italic;
        let mut spans = Vec::with_capacity(self.runs.len() + 2);
        if let Some(prefix) = &self.descriptor.decoration_prefix {
            spans.push(DisplaySpan::decoration(prefix, italic));
        }
        spans.extend(self.runs.iter().map(DisplaySpan::content));
        if let Some(suffix) = &self.descriptor.decoration_suffix {
            spans.push(DisplaySpan::decoration(suffix, italic));
        }
        spans
    }

    /// Rendered text including decoration
    pub fn display_text(&self) -> String {
        self.spans().iter().map(|span| span.text.as_str()).collect()
    }
}
