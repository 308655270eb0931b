//! Crossterm key events to [`Key`]

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::input::key::{ctrl, Key, ENTER};

/// Map a terminal key event onto the editor's key set.
///
/// Releases, non-ASCII characters and keys the editor has no use for become
/// [`Key::None`].
pub fn translate(event: KeyEvent) -> Key {
    if event.kind == KeyEventKind::Release {
        return Key::None;
    }

    match event.code {
        KeyCode::Char(c) if c.is_ascii() => {
            let byte = c as u8;
            if event.modifiers.contains(KeyModifiers::CONTROL) && byte.is_ascii_alphabetic() {
                Key::Byte(ctrl(byte.to_ascii_lowercase()))
            } else {
                Key::Byte(byte)
            }
        }
        KeyCode::Enter => Key::Byte(ENTER),
        KeyCode::Tab => Key::Byte(b'\t'),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Esc => Key::Escape,
        KeyCode::Left => Key::ArrowLeft,
        KeyCode::Right => Key::ArrowRight,
        KeyCode::Up => Key::ArrowUp,
        KeyCode::Down => Key::ArrowDown,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        _ => Key::None,
    }
}
