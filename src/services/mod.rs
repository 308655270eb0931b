//! Collaborators around the editing core: file IO, terminal modes and logging

pub mod fs;
pub mod terminal_modes;
pub mod tracing_setup;
