use crate::session::buffer::EntryBuffer;
use crate::session::log::{EntryKind, KeystrokeLog};
use crate::session::metrics::SessionMetrics;

/// One text-entry session: buffer, timing, keystroke log and target phrase.
#[derive(Clone, Debug, Default)]
pub struct EntrySession {
    pub buffer: EntryBuffer,
    pub metrics: SessionMetrics,
    pub log: KeystrokeLog,
    target: String,
}

impl EntrySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn set_target(&mut self, target: &str) {
        self.target = target.to_string();
    }

    /// Append a character. Returns the character it follows (space at the
    /// start of the buffer), which is the digram context for the model.
    pub fn insert(&mut self, ch: char, now_ms: f64, is_terminal: bool) -> char {
        let prev = self.buffer.last_char().unwrap_or(' ');
        self.buffer.insert(ch);
        self.log
            .append(EntryKind::Insert, Some(ch), now_ms, self.buffer.text());
        self.metrics.on_input(now_ms, self.buffer.text(), is_terminal);
        prev
    }

    /// Undo the last insertion. Returns false, touching nothing, when the
    /// history is empty.
    pub fn delete(&mut self, now_ms: f64) -> bool {
        if self.buffer.history_len() == 0 {
            return false;
        }
        let removed = self.buffer.undo();
        self.metrics.clear_end();
        self.log
            .append(EntryKind::Delete, removed, now_ms, self.buffer.text());
        self.metrics.on_input(now_ms, self.buffer.text(), false);
        true
    }

    /// Clear everything except the target phrase.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.metrics.reset();
        self.log.clear();
    }

    pub fn wpm(&self) -> Option<f64> {
        self.metrics.wpm(self.buffer.text())
    }

    pub fn edit_distance(&self) -> Option<usize> {
        self.metrics
            .current_edit_distance(&self.target, self.buffer.text())
    }

    pub fn matches_target(&self) -> bool {
        !self.target.is_empty() && self.buffer.text() == self.target
    }
}
