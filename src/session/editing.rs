//! Caller-owned editing session
//!
//! Owns one document, its caret and its undo history. Every edit goes through
//! an undo `Command`, so the session is a complete reference host for the
//! block type triggers.

use crate::error::{Result, ScreenplayError};
use crate::layout::{layout_block, LaidOutBlock};
use crate::models::{Block, BlockType, Document, TextRun};
use crate::persistence::{Anomaly, LoadReport};
use crate::renderers::{
    compute_display_list, to_plain_text, to_print_document, DisplayList, PlainTextSettings,
    PrintDocument, PrintSettings, ScreenLayoutConfig,
};
use crate::undo::{Command, UndoStack};

use super::{apply_line_break, apply_type_cycle, BlockHost, Caret};

#[derive(Clone, Debug)]
pub struct EditingSession {
    document: Document,
    caret: Option<Caret>,
    history: UndoStack,
    /// Anomalies recovered when the document was loaded
    anomalies: Vec<Anomaly>,
}

impl Default for EditingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditingSession {
    /// Start a session on a new document with the caret at the end of its heading
    pub fn new() -> Self {
        Self::with_document(Document::new())
    }

    pub fn with_document(document: Document) -> Self {
        let caret = document
            .get(0)
            .map(|block| Caret::new(0, block.char_len()));
        Self {
            document,
            caret,
            history: UndoStack::default(),
            anomalies: Vec::new(),
        }
    }

    pub fn from_load_report(report: LoadReport) -> Self {
        let mut session = Self::with_document(report.document);
        session.anomalies = report.anomalies;
        session
    }

    /// Replace the document; history is cleared so the load cannot be undone
    pub fn load_document(&mut self, report: LoadReport) {
        log::info!(
            "loading document: {} blocks, {} anomalies",
            report.document.len(),
            report.anomalies.len()
        );
        *self = Self::from_load_report(report);
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    /// Document-level notice describing recovered anomalies, if there were any
    pub fn anomaly_notice(&self) -> Option<String> {
        crate::persistence::anomaly_notice(&self.anomalies)
    }

    pub fn caret(&self) -> Option<Caret> {
        self.caret
    }

    /// Place the caret; the offset is clamped to the block's length
    pub fn set_caret(&mut self, caret: Option<Caret>) -> Result<()> {
        let Some(caret) = caret else {
            self.caret = None;
            return Ok(());
        };
        let block = self
            .document
            .get(caret.block)
            .ok_or(ScreenplayError::BlockOutOfRange {
                index: caret.block,
                len: self.document.len(),
            })?;
        self.caret = Some(Caret::new(caret.block, caret.offset.min(block.char_len())));
        Ok(())
    }

    /// Type of the block holding the caret
    pub fn current_type(&self) -> Option<BlockType> {
        self.type_at_caret()
    }

    /// Enter: split the current block and predict the new block's type
    pub fn line_break(&mut self) -> Option<BlockType> {
        apply_line_break(self)
    }

    /// Tab: switch the current block's type in place; `None` when nothing changed
    pub fn cycle_type(&mut self) -> Option<BlockType> {
        apply_type_cycle(self)
    }

    /// Set the type of the block holding the caret. Returns false when the
    /// block already has that type; nothing is recorded then.
    pub fn set_type(&mut self, block_type: BlockType) -> Result<bool> {
        let current = self.type_at_caret().ok_or(ScreenplayError::NoCaret)?;
        if current == block_type {
            return Ok(false);
        }
        self.set_type_at_caret(block_type);
        Ok(true)
    }

    /// Insert text at the caret. Newlines act as line breaks.
    pub fn insert_text(&mut self, text: &str) -> Result<()> {
        for (i, segment) in text.split('\n').enumerate() {
            if i > 0 {
                self.line_break();
            }
            if segment.is_empty() {
                continue;
            }
            let caret = self.caret.ok_or(ScreenplayError::NoCaret)?;
            let before = self.block_runs(caret.block)?;
            self.record(Command::InsertText {
                block: caret.block,
                offset: caret.offset,
                text: segment.to_string(),
                before,
            })?;
        }
        Ok(())
    }

    /// Backspace. At the start of a block the block merges into the previous one,
    /// which keeps its own type. Returns false when there was nothing to delete.
    pub fn delete_backward(&mut self) -> Result<bool> {
        let caret = self.caret.ok_or(ScreenplayError::NoCaret)?;

        if caret.offset > 0 {
            let before = self.block_runs(caret.block)?;
            let deleted = before
                .iter()
                .flat_map(|run| run.text.chars())
                .nth(caret.offset - 1)
                .map(String::from)
                .unwrap_or_default();
            self.record(Command::DeleteText {
                block: caret.block,
                offset: caret.offset - 1,
                deleted,
                before,
            })?;
            return Ok(true);
        }

        if caret.block == 0 {
            return Ok(false);
        }

        let removed = self
            .document
            .get(caret.block)
            .cloned()
            .ok_or(ScreenplayError::BlockOutOfRange {
                index: caret.block,
                len: self.document.len(),
            })?;
        let before = self.block_runs(caret.block - 1)?;
        self.record(Command::MergeBlock {
            block: caret.block,
            removed,
            before,
        })?;
        Ok(true)
    }

    pub fn undo(&mut self) -> Result<()> {
        let caret = self.history.undo(&mut self.document.blocks)?;
        self.restore_caret(caret);
        Ok(())
    }

    pub fn redo(&mut self) -> Result<()> {
        let caret = self.history.redo(&mut self.document.blocks)?;
        self.restore_caret(caret);
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Lay out every block for rendering
    pub fn layout(&self) -> Vec<LaidOutBlock> {
        self.document.iter().map(layout_block).collect()
    }

    pub fn display_list(&self, config: &ScreenLayoutConfig) -> DisplayList {
        compute_display_list(&self.document, config)
    }

    pub fn print_document(&self, settings: &PrintSettings) -> PrintDocument {
        to_print_document(&self.document, settings)
    }

    pub fn plain_text(&self, settings: &PlainTextSettings) -> String {
        to_plain_text(&self.document, settings)
    }

    fn block_runs(&self, index: usize) -> Result<Vec<TextRun>> {
        self.document
            .get(index)
            .map(|block| block.runs.clone())
            .ok_or(ScreenplayError::BlockOutOfRange {
                index,
                len: self.document.len(),
            })
    }

    /// Execute a command, move the caret and push it onto the history
    fn record(&mut self, command: Command) -> Result<()> {
        let caret_before = self.caret.unwrap_or_default();
        command.execute(&mut self.document.blocks)?;
        if let Some(caret) = command.caret_after_execute() {
            self.caret = Some(caret);
        }
        self.history.push(command, caret_before);
        Ok(())
    }

    fn restore_caret(&mut self, caret: Option<Caret>) {
        let wanted = caret.or(self.caret);
        self.caret = wanted.and_then(|c| self.clamp(c));
    }

    fn clamp(&self, caret: Caret) -> Option<Caret> {
        let last = self.document.len().checked_sub(1)?;
        let block = caret.block.min(last);
        let len = self.document.get(block).map_or(0, |b| b.char_len());
        Some(Caret::new(block, caret.offset.min(len)))
    }
}

impl BlockHost for EditingSession {
    fn type_at_caret(&self) -> Option<BlockType> {
        let caret = self.caret?;
        self.document.get(caret.block).map(|block| block.block_type)
    }

    fn insert_block_after_caret(&mut self, block_type: BlockType) {
        let Some(caret) = self.caret else {
            return;
        };
        let before = match self.block_runs(caret.block) {
            Ok(runs) => runs,
            Err(e) => {
                log::warn!("line break ignored: {}", e);
                return;
            }
        };
        let command = Command::SplitBlock {
            block: caret.block,
            offset: caret.offset,
            new_type: block_type,
            before,
        };
        if let Err(e) = self.record(command) {
            log::warn!("line break failed: {}", e);
        }
    }

    fn set_type_at_caret(&mut self, block_type: BlockType) {
        let Some(caret) = self.caret else {
            return;
        };
        let Some(from) = self.type_at_caret() else {
            return;
        };
        let command = Command::SetBlockType {
            block: caret.block,
            from,
            to: block_type,
        };
        if let Err(e) = self.record(command) {
            log::warn!("type change failed: {}", e);
        }
    }

    fn insert_plain_break(&mut self) {
        // No block to split: append an empty action block and move into it
        let command = Command::InsertBlock {
            index: self.document.len(),
            block: Block::empty(BlockType::Action),
        };
        if let Err(e) = self.record(command) {
            log::warn!("line break failed: {}", e);
        }
    }
}
