//! Snapshot-based undo/redo.
//!
//! The undo stack always holds at least one snapshot: the state the session
//! started from. Its top is the most recently committed state. When the
//! stack outgrows its limit the oldest committed entry goes; the base stays.

use crate::cursor::CursorPosition;

/// Default bound on undo entries.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub text: String,
    pub cursor: CursorPosition,
}

impl Snapshot {
    pub fn new(text: impl Into<String>, cursor: CursorPosition) -> Self {
        Self {
            text: text.into(),
            cursor,
        }
    }

    /// The single-empty-line document at the origin.
    pub fn empty() -> Self {
        Self::new(String::new(), CursorPosition::ORIGIN)
    }
}

#[derive(Debug, Clone)]
pub struct UndoRedoManager {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    limit: usize,
}

impl UndoRedoManager {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: vec![Snapshot::empty()],
            redo_stack: Vec::new(),
            limit: limit.max(2),
        }
    }

    /// Drops all history and starts over from `base`.
    pub fn reset(&mut self, base: Snapshot) {
        self.undo_stack = vec![base];
        self.redo_stack.clear();
    }

    pub fn current(&self) -> &Snapshot {
        // The stack is never empty.
        &self.undo_stack[self.undo_stack.len() - 1]
    }

    /// Pushes `snapshot` unless its text matches the current top. A cursor
    /// move alone is not an edit. Returns whether anything was pushed.
    pub fn commit(&mut self, snapshot: Snapshot) -> bool {
        if self.current().text == snapshot.text {
            return false;
        }

        self.undo_stack.push(snapshot);
        self.redo_stack.clear();

        if self.undo_stack.len() > self.limit {
            self.undo_stack.remove(1);
        }
        log::debug!(
            "Committed snapshot (undo depth {}, text length {})",
            self.undo_stack.len(),
            self.current().text.len()
        );
        true
    }

    /// Steps back one snapshot and returns the one to apply.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        let top = self.undo_stack.pop()?;
        self.redo_stack.push(top);
        Some(self.current())
    }

    /// Re-applies the most recently undone snapshot.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(snapshot);
        Some(self.current())
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

}

impl Default for UndoRedoManager {
    fn default() -> Self {
        Self::new()
    }
}
