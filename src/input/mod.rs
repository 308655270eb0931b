//! Abstract key events and their translation from terminal input

pub mod key;
pub mod key_translator;
