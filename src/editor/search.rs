//! Incremental find
//!
//! Every edit of the search prompt re-runs the search from the top of the document;
//! arrow keys move to the next or previous matching row, wrapping around. The
//! current match is painted with [`Highlight::SearchMatch`] and the row's previous
//! classes are put back as soon as the search moves on or ends.

use super::*;
use crate::input::key::Key;
use crate::model::cursor::Position;
use crate::primitives::highlighter::Highlight;

/// Overlay painted over the current match
#[derive(Debug, Clone)]
struct MatchOverlay {
    row: usize,
    start: usize,
    saved: Vec<Highlight>,
}

#[derive(Debug, Clone)]
pub(super) struct SearchState {
    saved_cursor: Position,
    saved_row_offset: usize,
    saved_col_offset: usize,
    last_match: Option<usize>,
    overlay: Option<MatchOverlay>,
}

/// Find the next row containing `query`, starting after row `from` (or at the
/// top when `from` is `None`) and wrapping around. Returns `(row, column)`.
pub fn find_match(
    doc: &Document,
    query: &[u8],
    from: Option<usize>,
    forward: bool,
) -> Option<(usize, usize)> {
    let count = doc.row_count();
    if query.is_empty() || count == 0 {
        return None;
    }

    let mut current = from;
    for _ in 0..count {
        let next = match current {
            None => {
                if forward {
                    0
                } else {
                    count - 1
                }
            }
            Some(y) if forward => (y + 1) % count,
            Some(y) => (y + count - 1) % count,
        };
        current = Some(next);

        let chars = doc.rows()[next].chars();
        if let Some(x) = chars.windows(query.len()).position(|w| w == query) {
            return Some((next, x));
        }
    }
    None
}

impl Editor {
    pub(super) fn start_search(&mut self) {
        self.search = Some(SearchState {
            saved_cursor: self.document.cursor(),
            saved_row_offset: self.viewport.row_offset,
            saved_col_offset: self.viewport.col_offset,
            last_match: None,
            overlay: None,
        });
        self.prompt = Some(Prompt::search());
    }

    /// React to a key typed into the search prompt
    pub(super) fn search_step(&mut self, query: &str, key: Key, edited: bool) {
        let Some(mut state) = self.search.take() else {
            return;
        };
        self.clear_overlay(&mut state);

        let forward = match key {
            Key::ArrowRight | Key::ArrowDown => Some(true),
            Key::ArrowLeft | Key::ArrowUp => Some(false),
            _ => None,
        };
        if edited {
            state.last_match = None;
        }

        if edited || forward.is_some() {
            let forward = state.last_match.is_none() || forward.unwrap_or(true);
            if let Some((y, x)) = find_match(&self.document, query.as_bytes(), state.last_match, forward) {
                state.last_match = Some(y);
                self.document.set_cursor(Position::new(x, y));

                if let Some(row) = self.document.row(y) {
                    let start = row.cx_to_rx(x);
                    let len = row.cx_to_rx(x + query.len()) - start;
                    let saved = self
                        .document
                        .overlay_highlight(y, start, len, Highlight::SearchMatch);
                    state.overlay = Some(MatchOverlay { row: y, start, saved });
                }
            }
        }
        self.search = Some(state);
    }

    /// Leave find mode; `cancelled` puts the cursor and scroll back where they were
    pub(super) fn end_search(&mut self, cancelled: bool) {
        let Some(mut state) = self.search.take() else {
            return;
        };
        self.clear_overlay(&mut state);

        if cancelled {
            self.document.set_cursor(state.saved_cursor);
            self.viewport.row_offset = state.saved_row_offset;
            self.viewport.col_offset = state.saved_col_offset;
        }
        tracing::debug!("Search ended (cancelled: {})", cancelled);
    }

    fn clear_overlay(&mut self, state: &mut SearchState) {
        if let Some(overlay) = state.overlay.take() {
            self.document
                .restore_highlight(overlay.row, overlay.start, &overlay.saved);
        }
    }
}
