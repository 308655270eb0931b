//! The row store
//!
//! A [`Document`] owns every row of text, the cursor, the dirty flag and the undo
//! history. All editing goes through its cursor-level commands, which record an
//! [`UndoOperation`] and keep each touched row's render and highlight buffers
//! current before returning.

use std::path::{Path, PathBuf};

use crate::model::cursor::Position;
use crate::model::event::{UndoHistory, UndoOperation};
use crate::model::row::Row;
use crate::primitives::highlighter::{highlight_row, Highlight};
use crate::primitives::syntax::{SyntaxRegistry, SyntaxRule};

/// Default tab stop width
pub const DEFAULT_TAB_STOP: usize = 4;

/// Cursor motions within the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

/// An editable text document
#[derive(Debug)]
pub struct Document {
    rows: Vec<Row>,
    cursor: Position,
    dirty: bool,
    filename: Option<PathBuf>,
    syntax: Option<&'static SyntaxRule>,
    registry: SyntaxRegistry,
    history: UndoHistory,
    tab_stop: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_STOP, None)
    }
}

impl Document {
    /// Create an empty document
    pub fn new(tab_stop: usize, undo_limit: Option<usize>) -> Self {
        Self {
            rows: Vec::new(),
            cursor: Position::default(),
            dirty: false,
            filename: None,
            syntax: None,
            registry: SyntaxRegistry::builtin(),
            history: UndoHistory::new(undo_limit),
            tab_stop: tab_stop.max(1),
        }
    }

    /// Replace the content with `bytes`, split into rows on `\n`.
    ///
    /// A trailing newline does not produce an extra empty row and a `\r` before
    /// each `\n` is dropped. Resets the cursor and history and leaves the
    /// document clean.
    pub fn load(&mut self, bytes: &[u8]) {
        let mut lines: Vec<&[u8]> = if bytes.is_empty() {
            Vec::new()
        } else {
            bytes.split(|&b| b == b'\n').collect()
        };
        if bytes.ends_with(b"\n") {
            lines.pop();
        }

        self.rows = lines
            .into_iter()
            .map(|line| {
                let line = line.strip_suffix(b"\r").unwrap_or(line);
                Row::new(line.to_vec(), self.tab_stop)
            })
            .collect();
        self.cursor = Position::default();
        self.history.clear();
        self.rehighlight_all();
        self.dirty = false;
        tracing::debug!("Loaded {} rows ({} bytes)", self.rows.len(), bytes.len());
    }

    /// Join all rows with a `\n` after every row, including the last
    pub fn serialize(&self) -> Vec<u8> {
        let total: usize = self.rows.iter().map(|r| r.len() + 1).sum();
        let mut out = Vec::with_capacity(total);
        for row in &self.rows {
            out.extend_from_slice(row.chars());
            out.push(b'\n');
        }
        out
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, y: usize) -> Option<&Row> {
        self.rows.get(y)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Move the cursor, clamping it to a valid position
    pub fn set_cursor(&mut self, pos: Position) {
        let y = pos.y.min(self.rows.len());
        let x = self.rows.get(y).map_or(0, |row| pos.x.min(row.len()));
        self.cursor = Position::new(x, y);
        self.history.seal();
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
        self.history.seal();
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Set the filename and re-select the syntax rule from its extension
    pub fn set_filename(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        let syntax = self.registry.for_path(&path);
        tracing::debug!(
            "Filename set to {}, filetype {:?}",
            path.display(),
            syntax.map(|s| s.filetype)
        );
        self.filename = Some(path);
        self.set_syntax(syntax);
    }

    pub fn syntax(&self) -> Option<&'static SyntaxRule> {
        self.syntax
    }

    pub fn set_syntax(&mut self, syntax: Option<&'static SyntaxRule>) {
        self.syntax = syntax;
        self.rehighlight_all();
    }

    pub fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    /// Insert a row at `at` (0 ≤ at ≤ row count). Out-of-range indices are ignored.
    pub fn insert_row(&mut self, at: usize, bytes: &[u8]) {
        if at > self.rows.len() {
            return;
        }
        self.rows.insert(at, Row::new(bytes.to_vec(), self.tab_stop));
        self.refresh(at, at + 1);
        self.dirty = true;
    }

    /// Remove the row at `at`. Out-of-range indices are ignored.
    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.refresh(at, at);
        if self.cursor.y > self.rows.len() {
            self.cursor = Position::new(0, self.rows.len());
        }
        self.dirty = true;
    }

    /// Insert `ch` at the cursor and advance it.
    ///
    /// Control characters other than tab are rejected. On the virtual row past the
    /// end an empty row is appended first.
    pub fn insert_char(&mut self, ch: u8) -> bool {
        if ch.is_ascii_control() && ch != b'\t' {
            return false;
        }

        let opened_row = self.cursor.y == self.rows.len();
        if opened_row {
            self.rows.push(Row::new(Vec::new(), self.tab_stop));
        }
        let at = self.cursor;
        self.history.push(UndoOperation::InsertChar { at, ch, opened_row });

        self.rows[at.y].insert(at.x, ch);
        self.refresh(at.y, at.y + usize::from(opened_row));
        self.cursor.x += 1;
        self.dirty = true;
        true
    }

    /// Backspace: remove the character left of the cursor, or join the current
    /// row onto the previous one when at column 0.
    pub fn delete_char(&mut self) {
        let Position { x, y } = self.cursor;
        if y >= self.rows.len() || (x == 0 && y == 0) {
            return;
        }

        if x > 0 {
            let Some(ch) = self.rows[y].remove(x - 1) else {
                return;
            };
            let at = Position::new(x - 1, y);
            self.history.push(UndoOperation::DeleteChar {
                at,
                ch,
                forward: false,
            });
            self.refresh(y, y);
            self.cursor = at;
        } else {
            self.join_with_previous(y, false);
        }
        self.dirty = true;
    }

    /// Delete key: remove the character under the cursor, or join the next row
    /// onto the current one when at the end of a row.
    pub fn delete_forward(&mut self) {
        let Position { x, y } = self.cursor;
        let Some(row) = self.rows.get_mut(y) else {
            return;
        };

        if x < row.len() {
            let Some(ch) = row.remove(x) else {
                return;
            };
            self.history.push(UndoOperation::DeleteChar {
                at: self.cursor,
                ch,
                forward: true,
            });
            self.refresh(y, y);
        } else if y + 1 < self.rows.len() {
            self.join_with_previous(y + 1, true);
        } else {
            return;
        }
        self.dirty = true;
    }

    /// Split the current row at the cursor and move to the start of the new row
    pub fn insert_newline(&mut self) {
        let at = self.cursor;
        if at.x == 0 {
            self.history
                .push(UndoOperation::InsertLine { at, prior: None });
            self.rows.insert(at.y, Row::new(Vec::new(), self.tab_stop));
            self.refresh(at.y, at.y + 1);
        } else {
            let prior = self.rows[at.y].chars().to_vec();
            self.history.push(UndoOperation::InsertLine {
                at,
                prior: Some(prior),
            });
            let tail = self.rows[at.y].split_off(at.x);
            self.rows.insert(at.y + 1, Row::new(tail, self.tab_stop));
            self.refresh(at.y, at.y + 2);
        }
        self.cursor = Position::new(0, at.y + 1);
        self.dirty = true;
    }

    /// Remove the cursor's row entirely
    pub fn delete_line(&mut self) {
        let at = self.cursor;
        let Some(row) = self.rows.get(at.y) else {
            return;
        };
        self.history.push(UndoOperation::DeleteLine {
            at,
            line: row.chars().to_vec(),
            joined: false,
            forward: false,
        });
        self.rows.remove(at.y);
        self.refresh(at.y, at.y);

        let x = self.rows.get(at.y).map_or(0, |row| at.x.min(row.len()));
        self.cursor = Position::new(x, at.y);
        self.dirty = true;
    }

    /// Append row `y` onto row `y - 1` and remove it
    fn join_with_previous(&mut self, y: usize, forward: bool) {
        let join_x = self.rows[y - 1].len();
        let removed = self.rows.remove(y);
        self.history.push(UndoOperation::DeleteLine {
            at: Position::new(join_x, y - 1),
            line: removed.chars().to_vec(),
            joined: true,
            forward,
        });
        self.rows[y - 1].append(removed.chars());
        self.refresh(y - 1, y);
        self.cursor = Position::new(join_x, y - 1);
    }

    /// Apply a cursor motion, snapping the column to the target row's length
    pub fn move_cursor(&mut self, motion: Motion) {
        let Position { mut x, mut y } = self.cursor;
        match motion {
            Motion::Left => {
                if x > 0 {
                    x -= 1;
                } else if y > 0 {
                    y -= 1;
                    x = self.rows[y].len();
                }
            }
            Motion::Right => {
                if let Some(row) = self.rows.get(y) {
                    if x < row.len() {
                        x += 1;
                    } else {
                        y += 1;
                        x = 0;
                    }
                }
            }
            Motion::Up => y = y.saturating_sub(1),
            Motion::Down => {
                if y < self.rows.len() {
                    y += 1;
                }
            }
            Motion::Home => x = 0,
            Motion::End => x = self.rows.get(y).map_or(0, Row::len),
        }
        self.set_cursor(Position::new(x, y));
    }

    /// Revert the most recent undo step. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(step) = self.history.take_undo() else {
            return false;
        };
        tracing::debug!("Undo step with {} operations", step.ops().len());

        self.history.set_suppressed(true);
        for op in step.ops().iter().rev() {
            self.revert(op);
        }
        self.history.set_suppressed(false);

        self.history.push_redo(step);
        self.dirty = true;
        true
    }

    /// Re-apply the most recently undone step. Returns false when there is nothing
    /// to redo.
    pub fn redo(&mut self) -> bool {
        let Some(step) = self.history.take_redo() else {
            return false;
        };
        tracing::debug!("Redo step with {} operations", step.ops().len());

        self.history.set_suppressed(true);
        for op in step.ops() {
            self.replay(op);
        }
        self.history.set_suppressed(false);

        self.history.push_undo(step);
        self.dirty = true;
        true
    }

    fn revert(&mut self, op: &UndoOperation) {
        match op {
            UndoOperation::InsertChar { at, opened_row, .. } => {
                if let Some(row) = self.rows.get_mut(at.y) {
                    row.remove(at.x);
                }
                if *opened_row && at.y < self.rows.len() {
                    self.rows.remove(at.y);
                }
                self.refresh(at.y, at.y);
            }
            UndoOperation::DeleteChar { at, ch, .. } => {
                if let Some(row) = self.rows.get_mut(at.y) {
                    row.insert(at.x, *ch);
                }
                self.refresh(at.y, at.y);
            }
            UndoOperation::InsertLine { at, prior } => {
                match prior {
                    Some(prior) => {
                        if at.y + 1 < self.rows.len() {
                            self.rows.remove(at.y + 1);
                        }
                        if let Some(row) = self.rows.get_mut(at.y) {
                            row.set_chars(prior.clone());
                        }
                    }
                    None => {
                        if at.y < self.rows.len() {
                            self.rows.remove(at.y);
                        }
                    }
                }
                self.refresh(at.y, at.y + 1);
            }
            UndoOperation::DeleteLine {
                at, line, joined, ..
            } => {
                if *joined {
                    if let Some(row) = self.rows.get_mut(at.y) {
                        row.truncate(at.x);
                    }
                    let index = (at.y + 1).min(self.rows.len());
                    self.rows
                        .insert(index, Row::new(line.clone(), self.tab_stop));
                    self.refresh(at.y, at.y + 2);
                } else {
                    let index = at.y.min(self.rows.len());
                    self.rows
                        .insert(index, Row::new(line.clone(), self.tab_stop));
                    self.refresh(index, index + 1);
                }
            }
        }
        self.cursor = op.cursor_before();
    }

    /// Re-run the command that produced `op` from its original cursor position
    fn replay(&mut self, op: &UndoOperation) {
        self.cursor = op.cursor_before();
        match op {
            UndoOperation::InsertChar { ch, .. } => {
                self.insert_char(*ch);
            }
            UndoOperation::DeleteChar { forward: true, .. }
            | UndoOperation::DeleteLine {
                joined: true,
                forward: true,
                ..
            } => self.delete_forward(),
            UndoOperation::DeleteChar { .. }
            | UndoOperation::DeleteLine { joined: true, .. } => self.delete_char(),
            UndoOperation::InsertLine { .. } => self.insert_newline(),
            UndoOperation::DeleteLine { .. } => self.delete_line(),
        }
    }

    /// Re-highlight rows `first..=last` unconditionally, then keep going while
    /// a row's block-comment exit state differs from what it was before.
    ///
    /// `last` must be a row whose stored exit state predates the edit, so the
    /// comparison against it is meaningful.
    fn refresh(&mut self, first: usize, last: usize) {
        let mut y = first;
        while y < self.rows.len() {
            let carry = y > 0 && self.rows[y - 1].ends_in_comment();
            let before = self.rows[y].ends_in_comment();
            let hl = highlight_row(self.rows[y].render(), self.syntax, carry);
            let changed = hl.open_comment != before;
            self.rows[y].set_highlight(hl.classes, hl.open_comment);

            if y >= last && !changed {
                break;
            }
            y += 1;
        }
    }

    fn rehighlight_all(&mut self) {
        let mut carry = false;
        for row in &mut self.rows {
            let hl = highlight_row(row.render(), self.syntax, carry);
            carry = hl.open_comment;
            row.set_highlight(hl.classes, hl.open_comment);
        }
    }

    /// Paint part of a row's render buffer (search matches), returning what it replaced
    pub(crate) fn overlay_highlight(
        &mut self,
        y: usize,
        start: usize,
        len: usize,
        class: Highlight,
    ) -> Vec<Highlight> {
        self.rows
            .get_mut(y)
            .map(|row| row.overlay(start, len, class))
            .unwrap_or_default()
    }

    pub(crate) fn restore_highlight(&mut self, y: usize, start: usize, saved: &[Highlight]) {
        if let Some(row) = self.rows.get_mut(y) {
            row.restore(start, saved);
        }
    }
}
