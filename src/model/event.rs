//! Reversible edit records and the undo/redo history
//!
//! Every mutating command on the [`Document`](crate::model::document::Document)
//! records exactly one [`UndoOperation`] describing how to invert it. Operations
//! that continue each other (typing a word, a run of backspaces) coalesce into one
//! [`UndoStep`], which is the unit undo and redo replay.

use std::collections::VecDeque;

use crate::model::cursor::Position;

/// One reversible edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOperation {
    /// `ch` was inserted at `at`
    InsertChar {
        at: Position,
        ch: u8,
        /// The edit first appended an empty row because the cursor was past the end
        opened_row: bool,
    },

    /// `ch` was removed from `at`
    DeleteChar {
        at: Position,
        ch: u8,
        /// Delete key (cursor stays put) rather than backspace (cursor moves left)
        forward: bool,
    },

    /// Row `at.y` was split at column `at.x`
    InsertLine {
        at: Position,
        /// The row's content before the split; `None` when split at column 0,
        /// which only inserts an empty row above
        prior: Option<Vec<u8>>,
    },

    /// A row was removed
    DeleteLine {
        /// Join point for joins, otherwise the cursor on the removed row
        at: Position,
        /// Snapshot of the removed row
        line: Vec<u8>,
        /// The row was appended onto row `at.y` at column `at.x`
        joined: bool,
        forward: bool,
    },
}

impl UndoOperation {
    /// Where the cursor was before the edit
    pub fn cursor_before(&self) -> Position {
        match self {
            Self::InsertChar { at, .. } | Self::InsertLine { at, .. } => *at,
            Self::DeleteChar { at, forward, .. } => {
                if *forward {
                    *at
                } else {
                    Position::new(at.x + 1, at.y)
                }
            }
            Self::DeleteLine {
                at,
                joined,
                forward,
                ..
            } => {
                if *joined && !*forward {
                    Position::new(0, at.y + 1)
                } else {
                    *at
                }
            }
        }
    }

    /// Whether `next` directly continues this edit and belongs to the same step
    fn continues_with(&self, next: &UndoOperation) -> bool {
        match (self, next) {
            (
                Self::InsertChar { at: a, .. },
                Self::InsertChar {
                    at: b,
                    opened_row: false,
                    ..
                },
            ) => b.y == a.y && b.x == a.x + 1,
            (
                Self::DeleteChar {
                    at: a,
                    forward: false,
                    ..
                },
                Self::DeleteChar {
                    at: b,
                    forward: false,
                    ..
                },
            ) => b.y == a.y && b.x + 1 == a.x,
            (
                Self::DeleteChar {
                    at: a,
                    forward: true,
                    ..
                },
                Self::DeleteChar {
                    at: b,
                    forward: true,
                    ..
                },
            ) => a == b,
            _ => false,
        }
    }
}

/// A group of operations undone and redone together, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoStep {
    ops: Vec<UndoOperation>,
}

impl UndoStep {
    pub fn ops(&self) -> &[UndoOperation] {
        &self.ops
    }
}

/// Undo and redo stacks
#[derive(Debug, Default)]
pub struct UndoHistory {
    undo: VecDeque<UndoStep>,
    redo: Vec<UndoStep>,

    /// Set while an undo/redo is being replayed so the replayed edits don't record
    suppressed: bool,

    /// The next push starts a new step even if it continues the previous edit
    sealed: bool,

    /// Maximum number of undo steps kept (oldest dropped first)
    limit: Option<usize>,
}

impl UndoHistory {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Record a user edit. Clears the redo history.
    pub fn push(&mut self, op: UndoOperation) {
        if self.suppressed {
            return;
        }
        self.redo.clear();

        let merge = !self.sealed
            && self
                .undo
                .back()
                .and_then(|step| step.ops.last())
                .is_some_and(|last| last.continues_with(&op));

        if merge {
            if let Some(step) = self.undo.back_mut() {
                step.ops.push(op);
            }
        } else {
            self.undo.push_back(UndoStep { ops: vec![op] });
            self.enforce_limit();
        }
        self.sealed = false;
    }

    fn enforce_limit(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        let mut dropped = 0;
        while self.undo.len() > limit.max(1) {
            self.undo.pop_front();
            dropped += 1;
        }
        if dropped > 0 {
            tracing::debug!("Undo limit {} reached, dropped {} oldest step(s)", limit, dropped);
        }
    }

    /// Force the next edit into a new step
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub(crate) fn set_suppressed(&mut self, suppressed: bool) {
        self.suppressed = suppressed;
    }

    /// Pop the most recent undo step
    pub(crate) fn take_undo(&mut self) -> Option<UndoStep> {
        self.sealed = true;
        self.undo.pop_back()
    }

    /// Pop the most recent redo step
    pub(crate) fn take_redo(&mut self) -> Option<UndoStep> {
        self.sealed = true;
        self.redo.pop()
    }

    /// Push the mirror of an undone step
    pub(crate) fn push_redo(&mut self, step: UndoStep) {
        self.redo.push(step);
    }

    /// Push the mirror of a redone step, without touching the redo stack
    pub(crate) fn push_undo(&mut self, step: UndoStep) {
        self.undo.push_back(step);
        self.enforce_limit();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.sealed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(x: usize, y: usize, ch: u8) -> UndoOperation {
        UndoOperation::InsertChar {
            at: Position::new(x, y),
            ch,
            opened_row: false,
        }
    }

    fn backspace(x: usize, y: usize, ch: u8) -> UndoOperation {
        UndoOperation::DeleteChar {
            at: Position::new(x, y),
            ch,
            forward: false,
        }
    }

    #[test]
    fn test_contiguous_inserts_share_a_step() {
        let mut history = UndoHistory::new(None);
        history.push(insert(0, 0, b'a'));
        history.push(insert(1, 0, b'b'));
        history.push(insert(2, 0, b'c'));
        assert_eq!(history.undo_len(), 1);

        // a gap starts a new step
        history.push(insert(7, 0, b'd'));
        assert_eq!(history.undo_len(), 2);

        // so does a different row
        history.push(insert(8, 1, b'e'));
        assert_eq!(history.undo_len(), 3);
    }

    #[test]
    fn test_backspace_run_and_seal() {
        let mut history = UndoHistory::new(None);
        history.push(backspace(4, 0, b'd'));
        history.push(backspace(3, 0, b'c'));
        assert_eq!(history.undo_len(), 1);

        history.seal();
        history.push(backspace(2, 0, b'b'));
        assert_eq!(history.undo_len(), 2);
    }

    #[test]
    fn test_push_clears_redo() {
        let mut history = UndoHistory::new(None);
        history.push(insert(0, 0, b'a'));
        let step = history.take_undo().unwrap();
        history.push_redo(step);
        assert!(history.can_redo());

        history.push(insert(0, 0, b'b'));
        assert!(!history.can_redo());
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn test_suppressed_push_is_ignored() {
        let mut history = UndoHistory::new(None);
        history.push(insert(0, 0, b'a'));
        let step = history.take_undo().unwrap();
        history.push_redo(step);

        history.set_suppressed(true);
        history.push(insert(5, 5, b'z'));
        history.set_suppressed(false);

        assert_eq!(history.undo_len(), 0);
        assert_eq!(history.redo_len(), 1);
    }

    #[test]
    fn test_undo_seals_previous_step() {
        let mut history = UndoHistory::new(None);
        history.push(insert(0, 0, b'a'));
        history.seal();
        history.push(insert(1, 0, b'b'));
        let step = history.take_undo().unwrap();
        history.push_redo(step);

        // continues the remaining step positionally but must not merge after an undo
        history.push(insert(1, 0, b'x'));
        assert_eq!(history.undo_len(), 2);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = UndoHistory::new(Some(2));
        for y in 0..5 {
            history.push(insert(0, y, b'a'));
        }
        assert_eq!(history.undo_len(), 2);
        let newest = history.take_undo().unwrap();
        assert_eq!(newest.ops(), &[insert(0, 4, b'a')]);
    }

    #[test]
    fn test_cursor_before() {
        assert_eq!(backspace(3, 2, b'x').cursor_before(), Position::new(4, 2));
        let forward = UndoOperation::DeleteChar {
            at: Position::new(3, 2),
            ch: b'x',
            forward: true,
        };
        assert_eq!(forward.cursor_before(), Position::new(3, 2));

        let join = UndoOperation::DeleteLine {
            at: Position::new(5, 1),
            line: b"tail".to_vec(),
            joined: true,
            forward: false,
        };
        assert_eq!(join.cursor_before(), Position::new(0, 2));
    }
}
