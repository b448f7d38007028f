/// One undo step: the state before an insertion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub current_char: Option<char>,
    pub text: String,
}

/// The text being entered, the last committed character and the undo stack.
///
/// `current_char == None` is the start-of-text marker; predictions treat it
/// like a space.
#[derive(Clone, Debug, Default)]
pub struct EntryBuffer {
    text: String,
    current_char: Option<char>,
    history: Vec<Snapshot>,
}

impl EntryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn current_char(&self) -> Option<char> {
        self.current_char
    }

    /// Context character for prediction.
    pub fn context_char(&self) -> char {
        self.current_char.unwrap_or(' ')
    }

    pub fn last_char(&self) -> Option<char> {
        self.text.chars().next_back()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Append `ch`, pushing an undo snapshot first. Letters become the
    /// current character in lowercase.
    pub fn insert(&mut self, ch: char) {
        self.history.push(Snapshot {
            current_char: self.current_char,
            text: self.text.clone(),
        });
        self.text.push(ch);
        self.current_char = Some(ch.to_ascii_lowercase());
    }

    /// Restore the state before the last insertion. Returns the removed
    /// character, or `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<char> {
        let snapshot = self.history.pop()?;
        let removed = self.last_char();
        self.text = snapshot.text;
        self.current_char = snapshot.current_char;
        removed
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.current_char = None;
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_tracks_current_char() {
        let mut buf = EntryBuffer::new();
        assert_eq!(buf.context_char(), ' ');
        buf.insert('H');
        buf.insert('i');
        assert_eq!(buf.text(), "Hi");
        assert_eq!(buf.current_char(), Some('i'));
        assert_eq!(buf.history_len(), 2);
    }

    #[test]
    fn test_undo_restores_previous_snapshot() {
        let mut buf = EntryBuffer::new();
        buf.insert('a');
        buf.insert(' ');
        assert_eq!(buf.undo(), Some(' '));
        assert_eq!(buf.text(), "a");
        assert_eq!(buf.current_char(), Some('a'));
        assert_eq!(buf.undo(), Some('a'));
        assert_eq!(buf.text(), "");
        assert_eq!(buf.current_char(), None);
    }

    #[test]
    fn test_undo_with_empty_history_is_noop() {
        let mut buf = EntryBuffer::new();
        assert_eq!(buf.undo(), None);
        assert_eq!(buf.text(), "");
        assert_eq!(buf.current_char(), None);
    }

    #[test]
    fn test_clear_drops_history() {
        let mut buf = EntryBuffer::new();
        buf.insert('x');
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.history_len(), 0);
        assert_eq!(buf.undo(), None);
    }

    #[test]
    fn test_multibyte_chars() {
        let mut buf = EntryBuffer::new();
        buf.insert('é');
        buf.insert('!');
        assert_eq!(buf.char_count(), 2);
        assert_eq!(buf.undo(), Some('!'));
        assert_eq!(buf.last_char(), Some('é'));
    }
}
