//! Single-line text field used by the task dialogs.

/// Editable text with a cursor measured in chars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    /// Field prefilled with `text`, cursor at the end.
    pub fn with_text(text: &str) -> Self {
        Self {
            value: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn insert(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::TextInput;

    #[test]
    fn editing_handles_multibyte_text() {
        let mut input = TextInput::with_text("café");
        assert_eq!(input.cursor(), 4);

        input.backspace();
        input.insert('e');
        assert_eq!(input.value(), "cafe");

        input.move_home();
        input.insert('¡');
        input.move_right();
        input.delete();
        assert_eq!(input.value(), "¡cfe");
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut input = TextInput::default();
        input.move_left();
        input.backspace();
        input.delete();
        input.move_right();
        assert_eq!(input.cursor(), 0);
        assert!(input.is_blank());

        input.insert(' ');
        assert!(input.is_blank());
        input.move_end();
        assert_eq!(input.cursor(), 1);
    }
}
