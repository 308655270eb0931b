//! Low-level primitives
//!
//! Syntax rules and the per-row highlighter.

pub mod highlighter;
pub mod syntax;
