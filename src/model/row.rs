//! A single line of the document
//!
//! A row owns its raw bytes plus two derived buffers: the tab-expanded `render`
//! text and one highlight class per render byte. The derived buffers are rebuilt
//! from scratch on every mutation of the raw bytes; highlighting itself needs the
//! neighbouring rows' comment state, so the owning [`Document`] refreshes it right
//! after each mutation.
//!
//! [`Document`]: crate::model::document::Document

use crate::primitives::highlighter::Highlight;

/// One line of text in raw and rendered form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Raw content, without the line terminator
    chars: Vec<u8>,

    /// `chars` with tabs expanded to the next tab stop
    render: Vec<u8>,

    /// One class per byte of `render`
    highlight: Vec<Highlight>,

    /// Whether the row ends inside an unterminated block comment
    open_comment: bool,

    tab_stop: usize,
}

impl Row {
    /// Create a row from raw bytes; highlight starts out all `Normal`
    pub fn new(chars: Vec<u8>, tab_stop: usize) -> Self {
        let mut row = Self {
            chars,
            render: Vec::new(),
            highlight: Vec::new(),
            open_comment: false,
            tab_stop: tab_stop.max(1),
        };
        row.update_render();
        row
    }

    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    pub fn render(&self) -> &[u8] {
        &self.render
    }

    pub fn highlight(&self) -> &[Highlight] {
        &self.highlight
    }

    /// Number of raw characters
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn render_len(&self) -> usize {
        self.render.len()
    }

    /// Whether the row ends inside an unterminated block comment
    pub fn ends_in_comment(&self) -> bool {
        self.open_comment
    }

    pub fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    /// Map a character column to its render column
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        let mut rx = 0;
        for &ch in self.chars.iter().take(cx) {
            if ch == b'\t' {
                rx += (self.tab_stop - 1) - (rx % self.tab_stop);
            }
            rx += 1;
        }
        rx
    }

    /// Insert a byte at `at`; positions past the end append
    pub fn insert(&mut self, at: usize, ch: u8) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, ch);
        self.update_render();
    }

    /// Remove and return the byte at `at`, if any
    pub fn remove(&mut self, at: usize) -> Option<u8> {
        if at >= self.chars.len() {
            return None;
        }
        let ch = self.chars.remove(at);
        self.update_render();
        Some(ch)
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.chars.extend_from_slice(bytes);
        self.update_render();
    }

    pub fn truncate(&mut self, len: usize) {
        self.chars.truncate(len);
        self.update_render();
    }

    /// Split the row at `at`, keeping the head and returning the tail
    pub fn split_off(&mut self, at: usize) -> Vec<u8> {
        let tail = self.chars.split_off(at.min(self.chars.len()));
        self.update_render();
        tail
    }

    /// Replace the whole content
    pub fn set_chars(&mut self, chars: Vec<u8>) {
        self.chars = chars;
        self.update_render();
    }

    /// Store a freshly computed highlight for the current render buffer
    pub(crate) fn set_highlight(&mut self, highlight: Vec<Highlight>, open_comment: bool) {
        debug_assert_eq!(highlight.len(), self.render.len());
        self.highlight = highlight;
        self.open_comment = open_comment;
    }

    /// Paint `range` of the render buffer with `class`, returning the classes it replaced
    pub(crate) fn overlay(&mut self, start: usize, len: usize, class: Highlight) -> Vec<Highlight> {
        let start = start.min(self.highlight.len());
        let end = (start + len).min(self.highlight.len());
        let saved = self.highlight[start..end].to_vec();
        for hl in &mut self.highlight[start..end] {
            *hl = class;
        }
        saved
    }

    /// Undo an [`overlay`](Self::overlay) using the classes it returned
    pub(crate) fn restore(&mut self, start: usize, saved: &[Highlight]) {
        for (offset, hl) in saved.iter().enumerate() {
            if let Some(slot) = self.highlight.get_mut(start + offset) {
                *slot = *hl;
            }
        }
    }

    /// Rebuild `render` from `chars`. Highlight falls back to `Normal` until the
    /// document re-runs the highlighter.
    fn update_render(&mut self) {
        let tabs = self.chars.iter().filter(|&&c| c == b'\t').count();
        let mut render = Vec::with_capacity(self.chars.len() + tabs * (self.tab_stop - 1));
        for &ch in &self.chars {
            if ch == b'\t' {
                render.push(b' ');
                while render.len() % self.tab_stop != 0 {
                    render.push(b' ');
                }
            } else {
                render.push(ch);
            }
        }
        self.highlight = vec![Highlight::Normal; render.len()];
        self.render = render;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_render_expands_tabs_to_next_stop() {
        let row = Row::new(b"\tab\tc".to_vec(), 4);
        assert_eq!(row.render(), b"    ab  c");
        assert_eq!(row.highlight().len(), row.render_len());
    }

    #[test]
    fn test_cx_to_rx() {
        let row = Row::new(b"a\tb".to_vec(), 4);
        assert_eq!(row.cx_to_rx(0), 0);
        assert_eq!(row.cx_to_rx(1), 1);
        assert_eq!(row.cx_to_rx(2), 4);
        assert_eq!(row.cx_to_rx(3), 5);
    }

    #[test]
    fn test_split_off_and_append() {
        let mut row = Row::new(b"hello world".to_vec(), 4);
        let tail = row.split_off(5);
        assert_eq!(row.chars(), b"hello");
        assert_eq!(tail, b" world");
        row.append(&tail);
        assert_eq!(row.chars(), b"hello world");
        assert_eq!(row.render(), b"hello world");
    }

    #[test]
    fn test_remove_past_end_is_none() {
        let mut row = Row::new(b"ab".to_vec(), 4);
        assert_eq!(row.remove(2), None);
        assert_eq!(row.remove(0), Some(b'a'));
        assert_eq!(row.chars(), b"b");
    }

    #[test]
    fn test_overlay_and_restore() {
        let mut row = Row::new(b"abcd".to_vec(), 4);
        let saved = row.overlay(1, 2, Highlight::SearchMatch);
        assert_eq!(
            row.highlight(),
            &[
                Highlight::Normal,
                Highlight::SearchMatch,
                Highlight::SearchMatch,
                Highlight::Normal
            ]
        );
        row.restore(1, &saved);
        assert!(row.highlight().iter().all(|h| *h == Highlight::Normal));
    }

    proptest! {
        /// Tabs always end on a tab stop, and each one widens the row by at most
        /// `tab_stop - 1` columns (exactly that when the tab starts on a stop).
        #[test]
        fn render_length_tracks_tabs(
            chars in prop::collection::vec(prop_oneof![Just(b'\t'), Just(b'x'), Just(b' ')], 0..60),
            tab_stop in 1usize..9,
        ) {
            let row = Row::new(chars.clone(), tab_stop);
            let tabs = chars.iter().filter(|&&c| c == b'\t').count();

            prop_assert!(row.render_len() <= chars.len() + tabs * (tab_stop - 1));
            prop_assert_eq!(row.render_len(), row.highlight().len());
            prop_assert_eq!(row.render_len(), row.cx_to_rx(chars.len()));

            for (cx, &ch) in chars.iter().enumerate() {
                if ch == b'\t' {
                    let start = row.cx_to_rx(cx);
                    let end = row.cx_to_rx(cx + 1);
                    prop_assert_eq!(end % tab_stop, 0);
                    if start % tab_stop == 0 {
                        prop_assert_eq!(end - start, tab_stop);
                    }
                }
            }
        }

        #[test]
        fn aligned_tabs_add_exactly_tab_stop_minus_one(
            words in prop::collection::vec(0usize..3, 0..10),
            tab_stop in 1usize..9,
        ) {
            // Each segment is padded to a whole number of stops before its tab
            let mut chars = Vec::new();
            for w in &words {
                chars.extend(std::iter::repeat(b'x').take(w * tab_stop));
                chars.push(b'\t');
            }
            let row = Row::new(chars.clone(), tab_stop);
            prop_assert_eq!(row.render_len(), chars.len() + words.len() * (tab_stop - 1));
        }
    }
}
