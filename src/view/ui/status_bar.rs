//! Status bar and message bar rendering

use std::io;

use crossterm::{
    queue,
    style::{Attribute, SetAttribute},
    terminal::{Clear, ClearType},
};

use crate::model::document::Document;

/// Filenames longer than this are cut down to their tail behind an ellipsis
pub const MAX_NAME_WIDTH: usize = 20;

const ELLIPSIS: &str = "...";

/// Renders the two bottom rows of the frame
pub struct StatusBarRenderer;

impl StatusBarRenderer {
    /// Name shown for the document: its filename, or `[No Name]`
    pub fn display_name(doc: &Document) -> String {
        let name = doc
            .filename()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "[No Name]".to_string());

        let len = name.chars().count();
        if len <= MAX_NAME_WIDTH {
            return name;
        }
        let keep = MAX_NAME_WIDTH - ELLIPSIS.len();
        let tail: String = name.chars().skip(len - keep).collect();
        format!("{ELLIPSIS}{tail}")
    }

    /// Compose the status line, exactly `width` characters wide
    pub fn status_line(doc: &Document, width: usize) -> String {
        let rows = doc.row_count();
        let left = format!(
            " {} - {} lines{}",
            Self::display_name(doc),
            rows,
            if doc.is_dirty() { " (modified)" } else { "" }
        );
        let right = format!(
            "{} | {}/{} ",
            doc.syntax().map_or("no ft", |s| s.filetype),
            doc.cursor().y + 1,
            rows
        );

        let mut line: String = left.chars().take(width).collect();
        let used = line.chars().count();
        let right_len = right.chars().count();
        if used + right_len <= width {
            line.extend(std::iter::repeat(' ').take(width - used - right_len));
            line.push_str(&right);
        } else {
            line.extend(std::iter::repeat(' ').take(width - used));
        }
        line
    }

    /// Status line in reverse video, followed by a line break
    pub fn render_status_bar(out: &mut Vec<u8>, doc: &Document, width: usize) -> io::Result<()> {
        queue!(out, SetAttribute(Attribute::Reverse))?;
        out.extend_from_slice(Self::status_line(doc, width).as_bytes());
        queue!(out, SetAttribute(Attribute::NoReverse))?;
        out.extend_from_slice(b"\r\n");
        Ok(())
    }

    /// Message bar, cut to the screen width
    pub fn render_message_bar(out: &mut Vec<u8>, message: Option<&str>, width: usize) -> io::Result<()> {
        queue!(out, Clear(ClearType::UntilNewLine))?;
        if let Some(message) = message {
            let shown: String = message.chars().take(width).collect();
            out.extend_from_slice(shown.as_bytes());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::cursor::Position;

    #[test]
    fn test_status_line_layout() {
        let mut doc = Document::default();
        doc.set_filename("main.c");
        doc.load(b"int x;\nint y;\n");
        doc.set_cursor(Position::new(0, 1));

        let line = StatusBarRenderer::status_line(&doc, 40);
        assert_eq!(line.len(), 40);
        assert!(line.starts_with(" main.c - 2 lines"));
        assert!(line.ends_with("c | 2/2 "));
        assert!(!line.contains("(modified)"));

        doc.insert_char(b'x');
        assert!(StatusBarRenderer::status_line(&doc, 40).contains("(modified)"));
    }

    #[test]
    fn test_no_name_no_filetype() {
        let doc = Document::default();
        let line = StatusBarRenderer::status_line(&doc, 60);
        assert!(line.starts_with(" [No Name] - 0 lines"));
        assert!(line.ends_with("no ft | 1/0 "));
    }

    #[test]
    fn test_long_name_truncated_with_leading_ellipsis() {
        let mut doc = Document::default();
        doc.set_filename("some/very/long/directory/name/file.py");
        let name = StatusBarRenderer::display_name(&doc);
        assert_eq!(name.chars().count(), MAX_NAME_WIDTH);
        assert!(name.starts_with("..."));
        assert!(name.ends_with("name/file.py"));
    }

    #[test]
    fn test_narrow_terminal_drops_right_side() {
        let mut doc = Document::default();
        doc.set_filename("a.lua");
        let line = StatusBarRenderer::status_line(&doc, 10);
        assert_eq!(line, " a.lua - 0");
    }
}
