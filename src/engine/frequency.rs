use std::collections::BTreeMap;

use crate::error::StorageError;
use crate::store::KeyValueStore;
use crate::store::schema::CountsData;

pub const STORAGE_KEY: &str = "circular_text_entry_counts_v1";

/// Character key used by both tables: lowercase, absent input becomes space.
fn normalize(ch: Option<char>) -> char {
    ch.unwrap_or(' ').to_ascii_lowercase()
}

/// Digram/unigram observation counts. Counts only ever grow.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrequencyModel {
    digram: BTreeMap<[char; 2], u64>,
    unigram: BTreeMap<char, u64>,
}

impl FrequencyModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `next` followed `prev`. Increments exactly one digram and
    /// one unigram entry.
    pub fn observe(&mut self, prev: Option<char>, next: Option<char>) {
        let p = normalize(prev);
        let n = normalize(next);
        let uni = self.unigram.entry(n).or_insert(0);
        *uni = uni.saturating_add(1);
        let bi = self.digram.entry([p, n]).or_insert(0);
        *bi = bi.saturating_add(1);
    }

    /// Symbols and digits only contribute to the unigram table.
    pub fn observe_symbol(&mut self, ch: char) {
        let uni = self.unigram.entry(ch).or_insert(0);
        *uni = uni.saturating_add(1);
    }

    pub fn digram(&self, prev: char, next: char) -> u64 {
        self.digram
            .get(&[prev.to_ascii_lowercase(), next.to_ascii_lowercase()])
            .copied()
            .unwrap_or(0)
    }

    pub fn unigram(&self, ch: char) -> u64 {
        self.unigram.get(&ch.to_ascii_lowercase()).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.digram.is_empty() && self.unigram.is_empty()
    }

    pub fn total_observations(&self) -> u64 {
        self.unigram.values().sum()
    }

    pub fn to_data(&self) -> CountsData {
        CountsData {
            bi: self
                .digram
                .iter()
                .map(|(&[p, n], &count)| (format!("{p}{n}"), count))
                .collect(),
            uni: self
                .unigram
                .iter()
                .map(|(&c, &count)| (c.to_string(), count))
                .collect(),
        }
    }

    /// Rebuild from the persisted shape. Keys that are not exactly two
    /// (digram) or one (unigram) characters are skipped.
    pub fn from_data(data: &CountsData) -> Self {
        let mut model = Self::default();
        for (key, &count) in &data.bi {
            let mut chars = key.chars();
            if let (Some(p), Some(n), None) = (chars.next(), chars.next(), chars.next()) {
                model.digram.insert([p, n], count);
            }
        }
        for (key, &count) in &data.uni {
            let mut chars = key.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                model.unigram.insert(c, count);
            }
        }
        model
    }

    /// A missing key is a fresh model, not an error.
    pub fn load_from(store: &dyn KeyValueStore) -> Result<Self, StorageError> {
        match store.get(STORAGE_KEY)? {
            Some(raw) => {
                let data: CountsData = serde_json::from_str(&raw)?;
                Ok(Self::from_data(&data))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn save_to(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.to_data())?;
        store.set(STORAGE_KEY, &json)
    }
}
