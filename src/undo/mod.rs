use crate::error::{Result, ScreenplayError};
use crate::models::core::{Block, TextRun};
use crate::models::BlockType;
use crate::session::Caret;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Represents a reversible edit command
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Insert text at a character offset inside a block
    InsertText {
        block: usize,
        offset: usize,
        text: String,
        /// Runs before the edit (for restoration)
        before: Vec<TextRun>,
    },
    /// Delete a character range inside a block
    DeleteText {
        block: usize,
        offset: usize,
        deleted: String,
        /// Runs before the edit (for restoration)
        before: Vec<TextRun>,
    },
    /// Split a block at an offset; the tail becomes a new block of `new_type`
    SplitBlock {
        block: usize,
        offset: usize,
        new_type: BlockType,
        before: Vec<TextRun>,
    },
    /// Merge a block into the one before it
    MergeBlock {
        /// Index of the block that is merged away
        block: usize,
        removed: Block,
        /// Runs of the previous block before the merge
        before: Vec<TextRun>,
    },
    /// Insert a whole block at an index
    InsertBlock { index: usize, block: Block },
    /// Change the type of a block in place
    SetBlockType {
        block: usize,
        from: BlockType,
        to: BlockType,
    },
    /// A batch of commands grouped together (e.g., typing a word)
    Batch { commands: Vec<Command> },
}

fn block_mut(blocks: &mut [Block], index: usize) -> Result<&mut Block> {
    let len = blocks.len();
    blocks
        .get_mut(index)
        .ok_or(ScreenplayError::BlockOutOfRange { index, len })
}

fn check_insert_index(blocks: &[Block], index: usize) -> Result<()> {
    if index > blocks.len() {
        return Err(ScreenplayError::BlockOutOfRange {
            index,
            len: blocks.len(),
        });
    }
    Ok(())
}

impl Command {
    /// Execute this command on the document blocks
    pub fn execute(&self, blocks: &mut Vec<Block>) -> Result<()> {
        match self {
            Command::InsertText { block, offset, text, .. } => {
                block_mut(blocks, *block)?.insert_text(*offset, text);
                Ok(())
            }
            Command::DeleteText { block, offset, deleted, .. } => {
                let end = offset + deleted.chars().count();
                block_mut(blocks, *block)?.remove_range(*offset, end);
                Ok(())
            }
            Command::SplitBlock { block, offset, new_type, .. } => {
                check_insert_index(blocks, block + 1)?;
                let mut tail = block_mut(blocks, *block)?.split_off(*offset);
                if tail.is_empty() {
                    tail.push(TextRun::default());
                }
                blocks.insert(block + 1, Block::new(*new_type, tail));
                Ok(())
            }
            Command::MergeBlock { block, removed, .. } => {
                let prev = block
                    .checked_sub(1)
                    .ok_or(ScreenplayError::BlockOutOfRange { index: 0, len: blocks.len() })?;
                block_mut(blocks, *block)?;
                blocks.remove(*block);
                block_mut(blocks, prev)?.append_runs(removed.runs.clone());
                Ok(())
            }
            Command::InsertBlock { index, block } => {
                check_insert_index(blocks, *index)?;
                blocks.insert(*index, block.clone());
                Ok(())
            }
            Command::SetBlockType { block, to, .. } => {
                block_mut(blocks, *block)?.block_type = *to;
                Ok(())
            }
            Command::Batch { commands } => {
                for cmd in commands {
                    cmd.execute(blocks)?;
                }
                Ok(())
            }
        }
    }

    /// Undo this command (reverse the operation)
    pub fn undo(&self, blocks: &mut Vec<Block>) -> Result<()> {
        match self {
            Command::InsertText { block, before, .. } | Command::DeleteText { block, before, .. } => {
                block_mut(blocks, *block)?.runs = before.clone();
                Ok(())
            }
            Command::SplitBlock { block, before, .. } => {
                block_mut(blocks, block + 1)?;
                blocks.remove(block + 1);
                block_mut(blocks, *block)?.runs = before.clone();
                Ok(())
            }
            Command::MergeBlock { block, removed, before } => {
                let prev = block
                    .checked_sub(1)
                    .ok_or(ScreenplayError::BlockOutOfRange { index: 0, len: blocks.len() })?;
                block_mut(blocks, prev)?.runs = before.clone();
                check_insert_index(blocks, *block)?;
                blocks.insert(*block, removed.clone());
                Ok(())
            }
            Command::InsertBlock { index, .. } => {
                block_mut(blocks, *index)?;
                blocks.remove(*index);
                Ok(())
            }
            Command::SetBlockType { block, from, .. } => {
                block_mut(blocks, *block)?.block_type = *from;
                Ok(())
            }
            Command::Batch { commands } => {
                // Undo batch in reverse order
                for cmd in commands.iter().rev() {
                    cmd.undo(blocks)?;
                }
                Ok(())
            }
        }
    }

    /// Caret position after this command is executed (None keeps the caret where it is)
    pub fn caret_after_execute(&self) -> Option<Caret> {
        match self {
            Command::InsertText { block, offset, text, .. } => {
                Some(Caret::new(*block, offset + text.chars().count()))
            }
            Command::DeleteText { block, offset, .. } => Some(Caret::new(*block, *offset)),
            Command::SplitBlock { block, .. } => Some(Caret::new(block + 1, 0)),
            Command::MergeBlock { block, before, .. } => {
                let prev_len = before.iter().map(TextRun::char_len).sum();
                Some(Caret::new(block.saturating_sub(1), prev_len))
            }
            Command::InsertBlock { index, .. } => Some(Caret::new(*index, 0)),
            Command::SetBlockType { .. } => None,
            Command::Batch { commands } => commands.iter().rev().find_map(|c| c.caret_after_execute()),
        }
    }

    /// Caret position after this command is undone
    pub fn caret_after_undo(&self) -> Option<Caret> {
        match self {
            Command::InsertText { block, offset, .. } => Some(Caret::new(*block, *offset)),
            Command::DeleteText { block, offset, deleted, .. } => {
                Some(Caret::new(*block, offset + deleted.chars().count()))
            }
            Command::SplitBlock { block, offset, .. } => Some(Caret::new(*block, *offset)),
            Command::MergeBlock { block, .. } => Some(Caret::new(*block, 0)),
            Command::InsertBlock { index, .. } => index.checked_sub(1).map(|prev| Caret::new(prev, 0)),
            Command::SetBlockType { .. } => None,
            Command::Batch { commands } => commands.iter().find_map(|c| c.caret_after_undo()),
        }
    }

    fn is_insert(&self) -> bool {
        matches!(self, Command::InsertText { .. })
    }

    fn is_text_edit(&self) -> bool {
        matches!(self, Command::InsertText { .. } | Command::DeleteText { .. })
    }
}

/// Manages undo/redo command history with intelligent batching
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UndoStack {
    /// Stack of commands that can be undone
    pub commands: VecDeque<Command>,
    /// Current position in the stack (for redo support)
    pub current_index: usize,
    /// Maximum number of commands to keep in history
    max_size: usize,
    /// Current batch being accumulated (if any)
    #[serde(skip)]
    current_batch: Option<Vec<Command>>,
    /// Caret position after the last batched edit
    #[serde(skip)]
    last_caret: Option<Caret>,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PartialEq for UndoStack {
    fn eq(&self, other: &Self) -> bool {
        // Only compare serialized fields (skip transient fields)
        self.commands == other.commands
            && self.current_index == other.current_index
            && self.max_size == other.max_size
    }
}

impl UndoStack {
    /// Create a new undo stack with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            commands: VecDeque::new(),
            current_index: 0,
            max_size,
            current_batch: None,
            last_caret: None,
        }
    }

    /// Add an already executed command to the stack with batching.
    ///
    /// Batching breaks on:
    /// - Whitespace insertion
    /// - Caret movement between edits
    /// - Different operation types (insert vs delete)
    /// - Structural commands (split, merge, block insert, type change), which always stand alone
    pub fn push(&mut self, command: Command, caret_before: Caret) {
        if !command.is_text_edit() {
            self.finalize_batch();
            self.current_batch = Some(vec![command]);
            self.finalize_batch();
            return;
        }

        if self.should_break_batch(&command, caret_before) {
            self.finalize_batch();
        }

        self.last_caret = command.caret_after_execute();
        match self.current_batch {
            Some(ref mut batch) => batch.push(command),
            None => self.current_batch = Some(vec![command]),
        }
    }

    /// Determine if the current batch should be finalized
    fn should_break_batch(&self, command: &Command, caret_before: Caret) -> bool {
        let Some(batch) = &self.current_batch else {
            return false;
        };

        // Break on caret movement
        if self.last_caret != Some(caret_before) {
            return true;
        }

        // Break on whitespace insertion
        if let Command::InsertText { text, .. } = command {
            if text.chars().all(char::is_whitespace) {
                return true;
            }
        }

        // Break on operation type change (insert vs delete)
        match batch.last() {
            Some(last) => last.is_insert() != command.is_insert(),
            None => false,
        }
    }

    /// Finalize the current batch and add it to the undo stack
    pub fn finalize_batch(&mut self) {
        let Some(mut batch) = self.current_batch.take() else {
            return;
        };
        self.last_caret = None;

        let command = match batch.len() {
            0 => return,
            1 => batch.remove(0),
            _ => Command::Batch { commands: batch },
        };

        // Truncate any redo history when new command is added
        self.commands.truncate(self.current_index);
        self.commands.push_back(command);
        self.current_index = self.commands.len();

        // Enforce max size
        if self.commands.len() > self.max_size {
            self.commands.pop_front();
            self.current_index = self.current_index.saturating_sub(1);
        }
    }

    /// Undo the last command, returning where the caret should go
    pub fn undo(&mut self, blocks: &mut Vec<Block>) -> Result<Option<Caret>> {
        // Finalize any pending batch first
        self.finalize_batch();

        if !self.can_undo() {
            return Err(ScreenplayError::NothingToUndo);
        }

        self.current_index -= 1;
        let command = &self.commands[self.current_index];
        command.undo(blocks)?;
        Ok(command.caret_after_undo())
    }

    /// Redo the last undone command, returning where the caret should go
    pub fn redo(&mut self, blocks: &mut Vec<Block>) -> Result<Option<Caret>> {
        self.finalize_batch();

        if !self.can_redo() {
            return Err(ScreenplayError::NothingToRedo);
        }

        let command = &self.commands[self.current_index];
        command.execute(blocks)?;
        self.current_index += 1;
        Ok(command.caret_after_execute())
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.current_index > 0 || self.current_batch.as_ref().is_some_and(|b| !b.is_empty())
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.current_batch.is_none() && self.current_index < self.commands.len()
    }

    /// Clear all undo history
    pub fn clear(&mut self) {
        self.commands.clear();
        self.current_index = 0;
        self.current_batch = None;
        self.last_caret = None;
    }

    /// Get the number of available undo steps
    pub fn undo_count(&self) -> usize {
        self.current_index
    }

    /// Get the number of available redo steps
    pub fn redo_count(&self) -> usize {
        self.commands.len() - self.current_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;

    fn insert(blocks: &mut Vec<Block>, block: usize, offset: usize, text: &str) -> Command {
        let cmd = Command::InsertText {
            block,
            offset,
            text: text.to_string(),
            before: blocks[block].runs.clone(),
        };
        cmd.execute(blocks).unwrap();
        cmd
    }

    #[test]
    fn test_undo_redo_basic() {
        let mut doc = Document::new();
        let mut stack = UndoStack::new(10);

        let cmd = insert(&mut doc.blocks, 0, 15, " - DAY");
        stack.push(cmd, Caret::new(0, 15));
        stack.finalize_batch();

        assert_eq!(doc.blocks[0].text(), "INT. START HERE - DAY");
        assert!(stack.can_undo());
        assert!(!stack.can_redo());

        let caret = stack.undo(&mut doc.blocks).unwrap();
        assert_eq!(doc.blocks[0].text(), "INT. START HERE");
        assert_eq!(caret, Some(Caret::new(0, 15)));
        assert!(!stack.can_undo());
        assert!(stack.can_redo());

        stack.redo(&mut doc.blocks).unwrap();
        assert_eq!(doc.blocks[0].text(), "INT. START HERE - DAY");
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_batching_on_whitespace() {
        let mut doc = Document::from_blocks(vec![Block::empty(BlockType::Action)]);
        let mut stack = UndoStack::new(10);

        let a = insert(&mut doc.blocks, 0, 0, "H");
        stack.push(a, Caret::new(0, 0));
        let b = insert(&mut doc.blocks, 0, 1, "i");
        stack.push(b, Caret::new(0, 1));

        // Should still be in batch
        assert_eq!(stack.current_batch.as_ref().map(Vec::len), Some(2));

        // Type space - should break batch
        let c = insert(&mut doc.blocks, 0, 2, " ");
        stack.push(c, Caret::new(0, 2));

        stack.finalize_batch();
        assert_eq!(stack.commands.len(), 2);
    }

    #[test]
    fn test_caret_jump_breaks_batch() {
        let mut doc = Document::from_blocks(vec![Block::with_text(BlockType::Action, "ab")]);
        let mut stack = UndoStack::new(10);

        let a = insert(&mut doc.blocks, 0, 2, "c");
        stack.push(a, Caret::new(0, 2));
        let b = insert(&mut doc.blocks, 0, 0, "z");
        stack.push(b, Caret::new(0, 0));
        stack.finalize_batch();

        assert_eq!(stack.commands.len(), 2);
    }

    #[test]
    fn test_split_and_merge_restore_exactly() {
        let original = vec![
            Block::with_text(BlockType::Character, "MARY"),
            Block::new(BlockType::Dialogue, vec![TextRun::new("Run "), TextRun::new("now").italic()]),
        ];
        let mut blocks = original.clone();

        let split = Command::SplitBlock {
            block: 1,
            offset: 2,
            new_type: BlockType::Action,
            before: blocks[1].runs.clone(),
        };
        split.execute(&mut blocks).unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[2].block_type, BlockType::Action);
        assert_eq!(blocks[2].text(), "n now");
        split.undo(&mut blocks).unwrap();
        assert_eq!(blocks, original);

        let merge = Command::MergeBlock {
            block: 1,
            removed: blocks[1].clone(),
            before: blocks[0].runs.clone(),
        };
        merge.execute(&mut blocks).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text(), "MARYRun now");
        merge.undo(&mut blocks).unwrap();
        assert_eq!(blocks, original);
    }

    #[test]
    fn test_out_of_range_command_errors() {
        let mut blocks = vec![Block::empty(BlockType::Action)];
        let cmd = Command::SetBlockType {
            block: 4,
            from: BlockType::Action,
            to: BlockType::Dialogue,
        };
        assert!(matches!(
            cmd.execute(&mut blocks),
            Err(ScreenplayError::BlockOutOfRange { index: 4, len: 1 })
        ));
    }

    #[test]
    fn test_max_size_enforcement() {
        let mut blocks = vec![Block::empty(BlockType::Action)];
        let mut stack = UndoStack::new(3);

        for _ in 0..5 {
            let cmd = Command::SetBlockType {
                block: 0,
                from: BlockType::Action,
                to: BlockType::Action,
            };
            cmd.execute(&mut blocks).unwrap();
            stack.push(cmd, Caret::new(0, 0));
        }

        assert_eq!(stack.commands.len(), 3);
    }

    #[test]
    fn test_insert_block_into_empty_document() {
        let mut blocks: Vec<Block> = Vec::new();
        let mut stack = UndoStack::default();

        let cmd = Command::InsertBlock {
            index: 0,
            block: Block::empty(BlockType::Action),
        };
        cmd.execute(&mut blocks).unwrap();
        assert_eq!(cmd.caret_after_execute(), Some(Caret::new(0, 0)));
        stack.push(cmd, Caret::default());

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].block_type, BlockType::Action);

        assert_eq!(stack.undo(&mut blocks).unwrap(), None);
        assert!(blocks.is_empty());

        assert_eq!(stack.redo(&mut blocks).unwrap(), Some(Caret::new(0, 0)));
        assert_eq!(blocks.len(), 1);
    }
}
