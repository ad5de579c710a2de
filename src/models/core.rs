//! Core data structures for the block-based screenplay document
//!
//! A `Document` is an ordered list of `Block`s. Each block carries exactly one
//! `BlockType` and a list of styled `TextRun`s whose concatenated text is the
//! block's content.

use serde::{Deserialize, Serialize};

use super::elements::{Alignment, BlockType};
use super::serde_helpers::is_false;

/// Text placed in the single block of a freshly created document
pub const DEFAULT_SCENE_HEADING_TEXT: &str = "INT. START HERE";

/// A styled span of text inside a block
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct TextRun {
    /// The raw text as typed (never uppercased in storage)
    pub text: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
}

impl TextRun {
    /// Create an unstyled run
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Create an empty run carrying the same style flags
    pub fn empty_like(&self) -> Self {
        Self {
            text: String::new(),
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
        }
    }

    /// Check if two runs have identical style flags
    pub fn same_style(&self, other: &TextRun) -> bool {
        self.bold == other.bold && self.italic == other.italic && self.underline == other.underline
    }

    /// Length of this run in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Byte index of a character offset, clamped to the end of the string
fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// One structural paragraph of a screenplay
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Block {
    /// Semantic role of the block
    #[serde(rename = "type")]
    pub block_type: BlockType,

    /// Styled text leaves, stored as `children` to match the editor's node shape
    #[serde(rename = "children", default)]
    pub runs: Vec<TextRun>,

    /// Optional alignment override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Alignment>,
}

impl Block {
    pub fn new(block_type: BlockType, runs: Vec<TextRun>) -> Self {
        Self {
            block_type,
            runs,
            align: None,
        }
    }

    /// Create a block holding a single empty run, as the editor does for new lines
    pub fn empty(block_type: BlockType) -> Self {
        Self::new(block_type, vec![TextRun::default()])
    }

    /// Create a block holding a single unstyled run
    pub fn with_text(block_type: BlockType, text: impl Into<String>) -> Self {
        Self::new(block_type, vec![TextRun::new(text)])
    }

    pub fn with_align(mut self, align: Alignment) -> Self {
        self.align = Some(align);
        self
    }

    /// Full textual content of the block
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Length of the block content in characters
    pub fn char_len(&self) -> usize {
        self.runs.iter().map(TextRun::char_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|run| run.text.is_empty())
    }

    /// Locate the run holding a character offset.
    ///
    /// Offsets on a run boundary resolve to the earlier run, so typing at the
    /// end of a bold word stays bold. Returns the run index and the offset
    /// within that run, or `None` when the block has no runs.
    fn locate(&self, offset: usize) -> Option<(usize, usize)> {
        let mut remaining = offset;
        for (i, run) in self.runs.iter().enumerate() {
            let len = run.char_len();
            if remaining <= len {
                return Some((i, remaining));
            }
            remaining -= len;
        }
        let last = self.runs.len().checked_sub(1)?;
        Some((last, self.runs[last].char_len()))
    }

    /// Insert text at a character offset, inheriting the style of the run it lands in
    pub fn insert_text(&mut self, offset: usize, text: &str) {
        match self.locate(offset) {
            Some((run_idx, run_offset)) => {
                let run = &mut self.runs[run_idx];
                let idx = byte_index(&run.text, run_offset);
                run.text.insert_str(idx, text);
            }
            None => self.runs.push(TextRun::new(text)),
        }
    }

    /// Remove the characters in `start..end` and return them
    pub fn remove_range(&mut self, start: usize, end: usize) -> String {
        let mut removed = String::new();
        if start >= end {
            return removed;
        }

        let mut pos = 0;
        for run in self.runs.iter_mut() {
            let len = run.char_len();
            let from = start.max(pos);
            let to = end.min(pos + len);
            if from < to {
                let a = byte_index(&run.text, from - pos);
                let b = byte_index(&run.text, to - pos);
                removed.push_str(&run.text[a..b]);
                run.text.replace_range(a..b, "");
            }
            pos += len;
        }

        self.drop_empty_runs();
        removed
    }

    /// Split the block at a character offset, returning the runs after it.
    ///
    /// The returned runs always start with a run carrying the style at the
    /// split point, so the new block keeps the caret's marks.
    pub fn split_off(&mut self, offset: usize) -> Vec<TextRun> {
        let Some((run_idx, run_offset)) = self.locate(offset) else {
            return Vec::new();
        };

        let mut tail = self.runs.split_off(run_idx + 1);
        let run = &mut self.runs[run_idx];
        let idx = byte_index(&run.text, run_offset);
        let rest = run.text.split_off(idx);
        tail.insert(
            0,
            TextRun {
                text: rest,
                ..run.empty_like()
            },
        );

        self.drop_empty_runs();
        drop_empty_runs(&mut tail);
        tail
    }

    /// Append runs to the end of this block, merging adjacent runs with equal styles
    pub fn append_runs(&mut self, runs: Vec<TextRun>) {
        self.runs.extend(runs);
        self.drop_empty_runs();

        let mut merged: Vec<TextRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            match merged.last_mut() {
                Some(prev) if prev.same_style(&run) => prev.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }

    fn drop_empty_runs(&mut self) {
        drop_empty_runs(&mut self.runs);
    }
}

/// Remove empty runs, keeping one when the list would otherwise become empty
fn drop_empty_runs(runs: &mut Vec<TextRun>) {
    if runs.len() <= 1 {
        return;
    }
    let fallback = runs.first().map(TextRun::empty_like);
    runs.retain(|run| !run.text.is_empty());
    if runs.is_empty() {
        runs.extend(fallback);
    }
}

/// An ordered screenplay document
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(transparent)]
pub struct Document {
    /// Blocks in reading order
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create a new document holding a single placeholder scene heading
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::with_text(
                BlockType::SceneHeading,
                DEFAULT_SCENE_HEADING_TEXT,
            )],
        }
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// Count blocks of a given type
    pub fn count_of(&self, block_type: BlockType) -> usize {
        self.blocks
            .iter()
            .filter(|block| block.block_type == block_type)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled_block() -> Block {
        Block::new(
            BlockType::Action,
            vec![TextRun::new("Hello "), TextRun::new("big").bold(), TextRun::new(" world")],
        )
    }

    #[test]
    fn test_new_document_has_placeholder_heading() {
        let doc = Document::new();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.blocks[0].block_type, BlockType::SceneHeading);
        assert_eq!(doc.blocks[0].text(), "INT. START HERE");
    }

    #[test]
    fn test_text_concatenates_runs() {
        assert_eq!(styled_block().text(), "Hello big world");
        assert_eq!(styled_block().char_len(), 15);
    }

    #[test]
    fn test_insert_text_inherits_style_at_boundary() {
        let mut block = styled_block();
        block.insert_text(9, "ger");
        assert_eq!(block.text(), "Hello bigger world");
        assert_eq!(block.runs[1].text, "bigger");
        assert!(block.runs[1].bold);
    }

    #[test]
    fn test_insert_into_block_without_runs() {
        let mut block = Block::new(BlockType::Action, Vec::new());
        block.insert_text(0, "x");
        assert_eq!(block.runs, vec![TextRun::new("x")]);
    }

    #[test]
    fn test_remove_range_across_runs() {
        let mut block = styled_block();
        let removed = block.remove_range(4, 11);
        assert_eq!(removed, "o big w");
        assert_eq!(block.text(), "Hellorld");
        assert_eq!(block.runs.len(), 2);
    }

    #[test]
    fn test_split_off_mid_run_keeps_style() {
        let mut block = styled_block();
        let tail = block.split_off(7);
        assert_eq!(block.text(), "Hello b");
        assert_eq!(tail[0].text, "ig");
        assert!(tail[0].bold);
        assert_eq!(tail[1].text, " world");
    }

    #[test]
    fn test_split_off_at_end_yields_empty_run() {
        let mut block = Block::with_text(BlockType::Character, "MARY");
        let tail = block.split_off(4);
        assert_eq!(block.text(), "MARY");
        assert_eq!(tail, vec![TextRun::new("")]);
    }

    #[test]
    fn test_split_off_handles_multibyte_text() {
        let mut block = Block::with_text(BlockType::Dialogue, "héllo");
        let tail = block.split_off(2);
        assert_eq!(block.text(), "hé");
        assert_eq!(tail[0].text, "llo");
    }

    #[test]
    fn test_append_runs_merges_equal_styles() {
        let mut block = Block::with_text(BlockType::Action, "He runs");
        block.append_runs(vec![TextRun::new(" away")]);
        assert_eq!(block.runs, vec![TextRun::new("He runs away")]);
    }
}
