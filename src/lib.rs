//! quill: a small terminal text editor
//!
//! The editing core is the row store in [`model`], the per-row highlighter in
//! [`primitives`] and the renderer in [`view`]; [`editor::Editor`] ties them to
//! keys.

pub mod config;
pub mod editor;
pub mod input;
pub mod model;
pub mod primitives;
pub mod services;
pub mod view;
