/// One key press as seen by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable or control byte; Enter is `\r`, Ctrl-letter is the letter's control code
    Byte(u8),
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,
    Delete,
    Backspace,
    Escape,
    /// No key arrived before the poll timeout, or it could not be decoded
    None,
}

pub const ENTER: u8 = b'\r';

/// Control code produced by Ctrl+`c`
pub const fn ctrl(c: u8) -> u8 {
    c & 0x1f
}

impl Key {
    pub const fn ctrl(c: u8) -> Self {
        Self::Byte(ctrl(c))
    }
}
