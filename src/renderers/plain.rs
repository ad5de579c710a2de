//! Plain text rendering
//!
//! Lays a screenplay out on a fixed-pitch grid, the way it reads in a
//! monospaced terminal or a clipboard paste.

use serde::{Deserialize, Serialize};

use crate::layout::units::UNITS_PER_INCH;
use crate::layout::{layout_block, LaidOutBlock};
use crate::models::{Alignment, Document};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PlainTextSettings {
    /// Width of the text column in characters
    pub columns: usize,

    /// Layout units per character (Courier 12pt sets 10 characters per inch)
    pub units_per_column: f32,
}

impl Default for PlainTextSettings {
    fn default() -> Self {
        Self {
            columns: 60,
            units_per_column: UNITS_PER_INCH / 10.0,
        }
    }
}

impl PlainTextSettings {
    fn to_columns(&self, units: f32) -> usize {
        if self.units_per_column <= 0.0 {
            return 0;
        }
        (units / self.units_per_column).round().max(0.0) as usize
    }
}

/// Greedy word wrap; words longer than the width are broken hard
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn render_lines(laid_out: &LaidOutBlock, settings: &PlainTextSettings) -> Vec<String> {
    let descriptor = &laid_out.descriptor;
    let indent = settings.to_columns(descriptor.margin_left).min(settings.columns);
    let right = settings.to_columns(descriptor.margin_right);
    let mut width = settings.columns.saturating_sub(indent + right);
    if let Some(wrap_width) = descriptor.wrap_width {
        width = width.min(settings.to_columns(wrap_width));
    }

    wrap(&laid_out.display_text(), width)
        .into_iter()
        .map(|line| {
            let len = line.chars().count();
            let pad = match descriptor.alignment {
                Alignment::Left => indent,
                Alignment::Right => settings.columns.saturating_sub(len),
                Alignment::Center => indent + width.saturating_sub(len) / 2,
            };
            format!("{}{}", " ".repeat(pad), line).trim_end().to_string()
        })
        .collect()
}

/// Render a document as plain text
pub fn to_plain_text(document: &Document, settings: &PlainTextSettings) -> String {
    let mut out: Vec<String> = Vec::new();
    for (i, block) in document.iter().enumerate() {
        // Speech lines sit directly under their cue; everything else gets a blank line
        if i > 0 && !block.block_type.continues_speech() {
            out.push(String::new());
        }
        out.extend(render_lines(&layout_block(block), settings));
    }
    let mut text = out.join("\n");
    text.push('\n');
    text
}
