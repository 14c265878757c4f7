//! Text buffer backing the tail input and the inline editor.
//!
//! The caret is a char index, so multi-byte input (₹, accented names) never
//! splits a code point.

/// Editable single-line text with a caret
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    /// Caret position in chars, `0..=char_count`
    caret: usize,
}

impl TextBuffer {
    /// Empty buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer seeded with `text`, caret at the end
    #[must_use]
    pub fn seeded(text: impl Into<String>) -> Self {
        let text = text.into();
        let caret = text.chars().count();
        Self { text, caret }
    }

    /// Current text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caret position in chars
    #[must_use]
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Whether the buffer holds nothing but whitespace
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Whether the buffer is literally empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text as it would be committed
    #[must_use]
    pub fn committed_text(&self) -> &str {
        self.text.trim()
    }

    /// Insert a character at the caret
    pub fn insert(&mut self, c: char) {
        let at = self.byte_offset(self.caret);
        self.text.insert(at, c);
        self.caret += 1;
    }

    /// Delete the character before the caret. Returns false at the start.
    pub fn backspace(&mut self) -> bool {
        if self.caret == 0 {
            return false;
        }
        self.caret -= 1;
        let at = self.byte_offset(self.caret);
        self.text.remove(at);
        true
    }

    /// Delete the character under the caret. Returns false at the end.
    pub fn delete_forward(&mut self) -> bool {
        if self.caret >= self.char_count() {
            return false;
        }
        let at = self.byte_offset(self.caret);
        self.text.remove(at);
        true
    }

    /// Move caret one char left
    pub fn move_left(&mut self) {
        self.caret = self.caret.saturating_sub(1);
    }

    /// Move caret one char right
    pub fn move_right(&mut self) {
        self.caret = (self.caret + 1).min(self.char_count());
    }

    /// Caret to start
    pub fn move_home(&mut self) {
        self.caret = 0;
    }

    /// Caret to end
    pub fn move_end(&mut self) {
        self.caret = self.char_count();
    }

    /// Empty the buffer
    pub fn clear(&mut self) {
        self.text.clear();
        self.caret = 0;
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(offset, _)| offset)
    }
}
