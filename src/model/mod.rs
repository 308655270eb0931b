//! Document model: rows, cursor positions and the undo history

pub mod cursor;
pub mod document;
pub mod event;
pub mod row;
