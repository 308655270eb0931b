//! View layer
//!
//! Scrolling state, prompts and frame rendering.

pub mod prompt;
pub mod ui;
pub mod viewport;
