use super::*;
use crate::input::key::{ctrl, Key, ENTER};
use crate::model::cursor::Position;
use crate::model::document::Motion;
use crate::view::prompt::PromptType;

impl Editor {
    /// Handle one key. Returns false when the session should end.
    pub fn process_key(&mut self, key: Key) -> bool {
        if key == Key::None {
            return true;
        }
        if let Some(prompt) = self.prompt.take() {
            self.handle_prompt_key(prompt, key);
            return true;
        }

        match key {
            Key::Byte(b) if b == ctrl(b'q') => {
                if self.document.is_dirty() && self.quit_times > 0 {
                    self.set_status(format!(
                        "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
                        self.quit_times
                    ));
                    self.quit_times -= 1;
                    return true;
                }
                tracing::info!("Quit requested");
                return false;
            }
            Key::Byte(b) if b == ctrl(b's') => self.save(),
            Key::Byte(b) if b == ctrl(b'f') => self.start_search(),
            Key::Byte(b) if b == ctrl(b'z') => {
                if !self.document.undo() {
                    self.set_status("Nothing to undo");
                }
            }
            Key::Byte(b) if b == ctrl(b'y') => {
                if !self.document.redo() {
                    self.set_status("Nothing to redo");
                }
            }
            Key::Byte(b) if b == ctrl(b'r') => {
                self.viewport.line_numbers = !self.viewport.line_numbers;
            }
            Key::Byte(b) if b == ctrl(b'k') => self.document.delete_line(),
            Key::Byte(b) if b == ctrl(b'l') => {}
            Key::Backspace => self.document.delete_char(),
            Key::Byte(b) if b == ctrl(b'h') => self.document.delete_char(),
            Key::Delete => self.document.delete_forward(),
            Key::Byte(ENTER) => self.document.insert_newline(),
            Key::ArrowLeft => self.document.move_cursor(Motion::Left),
            Key::ArrowRight => self.document.move_cursor(Motion::Right),
            Key::ArrowUp => self.document.move_cursor(Motion::Up),
            Key::ArrowDown => self.document.move_cursor(Motion::Down),
            Key::Home => self.document.move_cursor(Motion::Home),
            Key::End => self.document.move_cursor(Motion::End),
            Key::PageUp | Key::PageDown => self.page(key == Key::PageUp),
            Key::Escape => {}
            Key::Byte(b) => {
                self.document.insert_char(b);
            }
            Key::None => {}
        }

        self.quit_times = self.config.quit_confirm_times;
        true
    }

    /// Jump to the top (or bottom) of the screen, then one screen further
    fn page(&mut self, up: bool) {
        let cursor = self.document.cursor();
        let rows = self.viewport.screen_rows;
        let (y, motion) = if up {
            (self.viewport.row_offset, Motion::Up)
        } else {
            let bottom = (self.viewport.row_offset + rows).saturating_sub(1);
            (bottom.min(self.document.row_count()), Motion::Down)
        };
        self.document.set_cursor(Position::new(cursor.x, y));
        for _ in 0..rows {
            self.document.move_cursor(motion);
        }
    }

    fn handle_prompt_key(&mut self, mut prompt: Prompt, key: Key) {
        match key {
            Key::Escape => {
                match prompt.prompt_type {
                    PromptType::SaveFileAs => self.set_status("Save aborted"),
                    PromptType::Search => self.end_search(true),
                }
                return;
            }
            Key::Byte(ENTER) => {
                if prompt.input.is_empty() && prompt.prompt_type == PromptType::SaveFileAs {
                    self.prompt = Some(prompt);
                    return;
                }
                match prompt.prompt_type {
                    PromptType::SaveFileAs => {
                        tracing::info!("Save as {}", prompt.input);
                        self.document.set_filename(prompt.input.as_str());
                        self.write_to(Path::new(&prompt.input));
                    }
                    PromptType::Search => self.end_search(false),
                }
                return;
            }
            _ => {}
        }

        let edited = match key {
            Key::Backspace | Key::Delete => prompt.backspace(),
            Key::Byte(b) if b == ctrl(b'h') => prompt.backspace(),
            Key::Byte(b) => prompt.insert_byte(b),
            _ => false,
        };

        if prompt.prompt_type == PromptType::Search {
            self.search_step(&prompt.input, key, edited);
        }
        self.prompt = Some(prompt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor_with(text: &str) -> Editor {
        let mut editor = Editor::new(&EditorConfig::default(), 80, 12);
        editor.document.load(text.as_bytes());
        editor
    }

    fn lines(editor: &Editor) -> Vec<String> {
        editor
            .document()
            .rows()
            .iter()
            .map(|r| String::from_utf8_lossy(r.chars()).into_owned())
            .collect()
    }

    #[test]
    fn test_quit_when_clean() {
        let mut editor = editor_with("a");
        assert!(!editor.process_key(Key::ctrl(b'q')));
    }

    #[test]
    fn test_quit_confirmation_when_dirty() {
        let mut editor = editor_with("a");
        editor.process_key(Key::Byte(b'b'));
        for remaining in (1..=3).rev() {
            assert!(editor.process_key(Key::ctrl(b'q')));
            assert_eq!(
                editor.status_message(),
                Some(
                    format!(
                        "WARNING!!! File has unsaved changes. Press Ctrl-Q {remaining} more times to quit."
                    )
                    .as_str()
                )
            );
        }
        assert!(!editor.process_key(Key::ctrl(b'q')));
    }

    #[test]
    fn test_other_key_resets_quit_confirmation() {
        let mut editor = editor_with("a");
        editor.process_key(Key::Byte(b'b'));
        editor.process_key(Key::ctrl(b'q'));
        editor.process_key(Key::ctrl(b'q'));
        editor.process_key(Key::ArrowLeft);
        for _ in 0..3 {
            assert!(editor.process_key(Key::ctrl(b'q')));
        }
        assert!(!editor.process_key(Key::ctrl(b'q')));
    }

    #[test]
    fn test_editing_keys() {
        let mut editor = editor_with("abc\ndef");
        editor.process_key(Key::End);
        editor.process_key(Key::Backspace);
        editor.process_key(Key::Byte(ENTER));
        editor.process_key(Key::Byte(b'Z'));
        assert_eq!(lines(&editor), vec!["ab", "Z", "def"]);

        editor.process_key(Key::ArrowDown);
        editor.process_key(Key::Home);
        editor.process_key(Key::Delete);
        editor.process_key(Key::ctrl(b'h'));
        assert_eq!(lines(&editor), vec!["ab", "Zef"]);

        editor.process_key(Key::ctrl(b'k'));
        assert_eq!(lines(&editor), vec!["ab"]);
    }

    #[test]
    fn test_control_bytes_are_not_inserted() {
        let mut editor = editor_with("");
        editor.process_key(Key::ctrl(b'l'));
        editor.process_key(Key::Escape);
        editor.process_key(Key::Byte(0x01));
        editor.process_key(Key::None);
        assert_eq!(editor.document().row_count(), 0);
        assert!(!editor.document().is_dirty());
    }

    #[test]
    fn test_undo_redo_keys_report_empty_history() {
        let mut editor = editor_with("");
        editor.process_key(Key::ctrl(b'z'));
        assert_eq!(editor.status_message(), Some("Nothing to undo"));
        editor.process_key(Key::ctrl(b'y'));
        assert_eq!(editor.status_message(), Some("Nothing to redo"));

        editor.process_key(Key::Byte(b'q'));
        editor.process_key(Key::ctrl(b'z'));
        assert_eq!(editor.document().row_count(), 0);
        editor.process_key(Key::ctrl(b'y'));
        assert_eq!(lines(&editor), vec!["q"]);
    }

    #[test]
    fn test_toggle_line_numbers() {
        let mut editor = editor_with("");
        assert!(!editor.viewport().line_numbers);
        editor.process_key(Key::ctrl(b'r'));
        assert!(editor.viewport().line_numbers);
    }

    #[test]
    fn test_page_down_and_up() {
        let text: String = (0..40).map(|i| format!("{i}\n")).collect();
        let mut editor = editor_with(&text);
        // 10 text rows
        editor.process_key(Key::PageDown);
        assert_eq!(editor.document().cursor().y, 19);
        editor.render().unwrap();
        assert_eq!(editor.viewport().row_offset, 10);

        editor.process_key(Key::PageUp);
        assert_eq!(editor.document().cursor().y, 0);
    }
}
