//! Frame rendering
//!
//! # Design
//! - **One buffer per frame**: the whole frame (text rows, status bar, message bar and
//!   cursor placement) is composed into a single byte buffer that the caller writes to
//!   the terminal in one go.
//! - **Hidden cursor while drawing**: the frame starts by hiding the cursor and ends
//!   by showing it at its final position.
//! - **Colour runs**: a colour escape is emitted only where the highlight class
//!   changes, so a run of same-class bytes shares one escape.

pub mod status_bar;

use std::io;

use anyhow::{Context, Result as AnyhowResult};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Attribute, Color, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::model::document::Document;
use crate::model::row::Row;
use crate::view::viewport::Viewport;
use status_bar::StatusBarRenderer;

/// Shown a third of the way down an empty document
pub fn welcome_message() -> String {
    format!("quill editor -- version {}", env!("CARGO_PKG_VERSION"))
}

/// Compose a full frame. `message` is the message-bar text (status message or
/// active prompt).
///
/// Fails only if the frame buffer cannot be allocated.
pub fn render_frame(doc: &Document, viewport: &Viewport, message: Option<&str>) -> AnyhowResult<Vec<u8>> {
    let estimate = (viewport.screen_rows + 2) * (viewport.screen_cols + 16) + 64;
    let mut out = Vec::new();
    out.try_reserve(estimate)
        .context("Failed to allocate frame buffer")?;

    compose(&mut out, doc, viewport, message).context("Failed to compose frame")?;
    Ok(out)
}

fn compose(out: &mut Vec<u8>, doc: &Document, viewport: &Viewport, message: Option<&str>) -> io::Result<()> {
    queue!(out, Hide, MoveTo(0, 0))?;

    let gutter = viewport.gutter_width(doc.row_count());
    let text_cols = viewport.text_cols(doc.row_count());

    for screen_y in 0..viewport.screen_rows {
        let file_y = screen_y + viewport.row_offset;
        let drawn = match doc.row(file_y) {
            Some(row) => {
                draw_gutter(out, Some(file_y + 1), gutter)?;
                gutter + draw_row(out, row, viewport.col_offset, text_cols)?
            }
            None => {
                draw_gutter(out, None, gutter)?;
                if doc.row_count() == 0 && screen_y == viewport.screen_rows / 3 {
                    gutter + draw_welcome(out, text_cols)
                } else {
                    out.push(b'~');
                    gutter + 1
                }
            }
        };
        // erasing from the last column would wipe the character just drawn there
        if drawn < viewport.screen_cols {
            queue!(out, Clear(ClearType::UntilNewLine))?;
        }
        out.extend_from_slice(b"\r\n");
    }

    StatusBarRenderer::render_status_bar(out, doc, viewport.screen_cols)?;
    StatusBarRenderer::render_message_bar(out, message, viewport.screen_cols)?;

    let (x, y) = viewport.cursor_screen_position(doc);
    queue!(out, MoveTo(x, y), Show)?;
    Ok(())
}

fn draw_gutter(out: &mut Vec<u8>, line: Option<usize>, width: usize) -> io::Result<()> {
    if width == 0 {
        return Ok(());
    }
    match line {
        Some(n) => {
            queue!(out, SetForegroundColor(Color::DarkGrey))?;
            out.extend_from_slice(format!("{:>w$} ", n, w = width - 1).as_bytes());
            queue!(out, SetForegroundColor(Color::Reset))?;
        }
        None => out.extend(std::iter::repeat(b' ').take(width)),
    }
    Ok(())
}

/// Returns the number of columns drawn
fn draw_welcome(out: &mut Vec<u8>, width: usize) -> usize {
    let welcome = welcome_message();
    let shown = &welcome.as_bytes()[..welcome.len().min(width)];
    let padding = (width - shown.len()) / 2;
    if padding > 0 {
        out.push(b'~');
        out.extend(std::iter::repeat(b' ').take(padding - 1));
    }
    out.extend_from_slice(shown);
    padding + shown.len()
}

/// Visible slice of one row with colour escapes at class changes. Returns the
/// number of columns drawn.
fn draw_row(out: &mut Vec<u8>, row: &Row, col_offset: usize, width: usize) -> io::Result<usize> {
    let render = row.render();
    let start = col_offset.min(render.len());
    let end = (col_offset + width).min(render.len());

    let mut current = Color::Reset;
    for (&byte, hl) in render[start..end].iter().zip(&row.highlight()[start..end]) {
        if byte.is_ascii_control() {
            // shown as a reverse-video letter, e.g. ^A as `A`
            let symbol = if byte <= 26 { b'@' + byte } else { b'?' };
            queue!(out, SetAttribute(Attribute::Reverse))?;
            out.push(symbol);
            queue!(out, SetAttribute(Attribute::NoReverse))?;
            continue;
        }

        let color = hl.color();
        if color != current {
            queue!(out, SetForegroundColor(color))?;
            current = color;
        }
        out.push(byte);
    }
    if current != Color::Reset {
        queue!(out, SetForegroundColor(Color::Reset))?;
    }
    Ok(end - start)
}
