//! Single-line prompts shown on the message bar

/// What to do when the prompt is confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptType {
    /// Save the document under the entered name
    SaveFileAs,
    /// Incremental find
    Search,
}

/// Prompt state for the message bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Text shown before the input (e.g., "Save as: ")
    pub message: String,
    /// Text shown after the input
    pub hint: String,
    /// User's current input
    pub input: String,
    pub prompt_type: PromptType,
}

impl Prompt {
    pub fn new(message: impl Into<String>, hint: impl Into<String>, prompt_type: PromptType) -> Self {
        Self {
            message: message.into(),
            hint: hint.into(),
            input: String::new(),
            prompt_type,
        }
    }

    pub fn save_as() -> Self {
        Self::new("Save as: ", " (ESC to cancel)", PromptType::SaveFileAs)
    }

    pub fn search() -> Self {
        Self::new("Search: ", " (Use ESC/Arrows/Enter)", PromptType::Search)
    }

    /// Append a printable byte. Returns false for anything else.
    pub fn insert_byte(&mut self, b: u8) -> bool {
        if b == b' ' || b.is_ascii_graphic() {
            self.input.push(char::from(b));
            true
        } else {
            false
        }
    }

    /// Remove the last input character
    pub fn backspace(&mut self) -> bool {
        self.input.pop().is_some()
    }

    /// The full message-bar line
    pub fn display(&self) -> String {
        format!("{}{}{}", self.message, self.input, self.hint)
    }
}
