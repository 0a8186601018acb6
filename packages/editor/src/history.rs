//! Undo/redo over whole-document snapshots.
//!
//! Every mutation that will succeed commits a snapshot of the entire
//! current document before mutating; operations that no-op never commit.
//! Documents are small (tens to low hundreds of nodes), so full clones are
//! cheaper than maintaining inverse operations.

use ebb_document::EmailDocument;

/// Linear undo/redo stacks. No branching: a new commit clears redo.
#[derive(Debug)]
pub struct History {
    undo_stack: Vec<EmailDocument>,
    redo_stack: Vec<EmailDocument>,
    /// Maximum undo depth (0 = unlimited).
    max_levels: usize,
}

impl History {
    /// Default depth of 100 levels.
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Record the pre-mutation state. Call immediately before mutating.
    pub fn commit(&mut self, doc: &EmailDocument) {
        self.undo_stack.push(doc.clone());
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Restore the most recent snapshot, pushing the current state onto the
    /// redo stack. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, doc: &mut EmailDocument) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                self.redo_stack.push(std::mem::replace(doc, previous));
                true
            }
            None => false,
        }
    }

    /// Inverse of [`undo`](Self::undo).
    pub fn redo(&mut self, doc: &mut EmailDocument) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                self.undo_stack.push(std::mem::replace(doc, next));
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history (used on wholesale loads).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
