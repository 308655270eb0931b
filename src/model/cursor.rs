/// Cursor position in character coordinates
///
/// `x` indexes raw characters of row `y`. `y == row_count` is the virtual row just
/// past the end of the document, where `x` is always 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}
