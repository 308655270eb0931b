use crate::model::document::Document;

/// Narrowest line-number gutter, including the separating space
pub const MIN_GUTTER_WIDTH: usize = 3;

/// Rows taken by the status and message bars
pub const BAR_ROWS: usize = 2;

/// The viewport - what portion of the document is visible
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    /// First visible document row
    pub row_offset: usize,

    /// First visible render column
    pub col_offset: usize,

    /// Rows available for text (terminal height minus the two bars)
    pub screen_rows: usize,

    /// Terminal width
    pub screen_cols: usize,

    /// Cursor render column, refreshed by [`Viewport::scroll`]
    pub rx: usize,

    /// Whether the line-number gutter is drawn
    pub line_numbers: bool,
}

impl Viewport {
    /// Create a viewport for a terminal of the given size
    pub fn new(width: u16, height: u16, line_numbers: bool) -> Self {
        Self {
            row_offset: 0,
            col_offset: 0,
            screen_rows: usize::from(height).saturating_sub(BAR_ROWS),
            screen_cols: usize::from(width),
            rx: 0,
            line_numbers,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.screen_rows = usize::from(height).saturating_sub(BAR_ROWS);
        self.screen_cols = usize::from(width);
    }

    /// Gutter width for the current scroll position: digits of the highest visible
    /// line number plus a space, at least [`MIN_GUTTER_WIDTH`]. Zero when line
    /// numbers are off.
    pub fn gutter_width(&self, row_count: usize) -> usize {
        if !self.line_numbers {
            return 0;
        }
        let highest = (self.row_offset + self.screen_rows).min(row_count).max(1);
        (highest.to_string().len() + 1).max(MIN_GUTTER_WIDTH)
    }

    /// Columns left for text after the gutter
    pub fn text_cols(&self, row_count: usize) -> usize {
        self.screen_cols.saturating_sub(self.gutter_width(row_count))
    }

    /// Recompute `rx` from the cursor and move the offsets by the smallest amount
    /// that brings the cursor back on screen
    pub fn scroll(&mut self, doc: &Document) {
        let cursor = doc.cursor();
        self.rx = doc.row(cursor.y).map_or(0, |row| row.cx_to_rx(cursor.x));

        if cursor.y < self.row_offset {
            self.row_offset = cursor.y;
        }
        if self.screen_rows > 0 && cursor.y >= self.row_offset + self.screen_rows {
            self.row_offset = cursor.y + 1 - self.screen_rows;
        }

        let cols = self.text_cols(doc.row_count()).max(1);
        if self.rx < self.col_offset {
            self.col_offset = self.rx;
        }
        if self.rx >= self.col_offset + cols {
            self.col_offset = self.rx + 1 - cols;
        }
    }

    /// Terminal cell of the cursor, valid after [`Viewport::scroll`]
    pub fn cursor_screen_position(&self, doc: &Document) -> (u16, u16) {
        let cursor = doc.cursor();
        let x = self.rx.saturating_sub(self.col_offset) + self.gutter_width(doc.row_count());
        let y = cursor.y.saturating_sub(self.row_offset);
        (
            u16::try_from(x).unwrap_or(u16::MAX),
            u16::try_from(y).unwrap_or(u16::MAX),
        )
    }
}
