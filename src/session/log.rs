use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Insert,
    Delete,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Insert => "insert",
            EntryKind::Delete => "delete",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub kind: EntryKind,
    /// Inserted character, or the character removed by a delete.
    pub ch: Option<char>,
    pub timestamp_ms: f64,
    pub text_after: String,
}

/// Append-only record of one entry session. Entries are never modified once
/// appended; the log is only emptied when the session resets.
#[derive(Clone, Debug, Default)]
pub struct KeystrokeLog {
    entries: Vec<LogEntry>,
}

impl KeystrokeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, kind: EntryKind, ch: Option<char>, timestamp_ms: f64, text_after: &str) {
        self.entries.push(LogEntry {
            kind,
            ch,
            timestamp_ms,
            text_after: text_after.to_string(),
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first_timestamp(&self) -> Option<f64> {
        self.entries.first().map(|e| e.timestamp_ms)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
