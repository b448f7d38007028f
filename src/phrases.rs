use std::fs;
use std::path::Path;

use rust_embed::Embed;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::PhraseError;

#[derive(Embed)]
#[folder = "assets/phrases/"]
struct PhraseAssets;

pub const TRIALS_FILE: &str = "trials.json";
pub const POOL_FILE: &str = "pool.json";

/// Parse a JSON array of phrases, dropping blank entries.
pub fn parse_phrases(json: &str) -> Result<Vec<String>, PhraseError> {
    let raw: Vec<String> = serde_json::from_str(json)?;
    let phrases: Vec<String> = raw.into_iter().filter(|p| !p.trim().is_empty()).collect();
    if phrases.is_empty() {
        return Err(PhraseError::Empty);
    }
    Ok(phrases)
}

pub fn embedded(name: &str) -> Vec<String> {
    let Some(file) = PhraseAssets::get(name) else {
        warn!(name, "embedded phrase list missing");
        return Vec::new();
    };
    match std::str::from_utf8(file.data.as_ref()) {
        Ok(content) => parse_phrases(content).unwrap_or_default(),
        Err(_) => Vec::new(),
    }
}

pub fn load_file(path: &Path) -> Result<Vec<String>, PhraseError> {
    let content = fs::read_to_string(path)?;
    parse_phrases(&content)
}

#[cfg(feature = "network")]
pub fn fetch(url: &str) -> Result<Vec<String>, PhraseError> {
    let body = reqwest::blocking::get(url)
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.text())
        .map_err(|e| PhraseError::Network(e.to_string()))?;
    parse_phrases(&body)
}

#[cfg(not(feature = "network"))]
pub fn fetch(_url: &str) -> Result<Vec<String>, PhraseError> {
    Err(PhraseError::Network(
        "built without the `network` feature".to_string(),
    ))
}

fn from_path_or(path: Option<&str>, fallback: &str) -> Vec<String> {
    if let Some(path) = path {
        match load_file(Path::new(path)) {
            Ok(phrases) => {
                info!(path, count = phrases.len(), "loaded phrases from file");
                return phrases;
            }
            Err(e) => warn!(path, error = %e, "falling back to bundled phrases"),
        }
    }
    embedded(fallback)
}

/// Ordered phrases for a trial run.
pub fn trial_phrases(config: &Config) -> Vec<String> {
    from_path_or(config.trial_phrases_path.as_deref(), TRIALS_FILE)
}

/// Target phrases the user can cycle through outside trials. A configured
/// URL wins over a configured file.
pub fn phrase_pool(config: &Config) -> Vec<String> {
    if let Some(url) = config.phrase_pool_url.as_deref() {
        match fetch(url) {
            Ok(phrases) => {
                info!(url, count = phrases.len(), "fetched phrase pool");
                return phrases;
            }
            Err(e) => warn!(url, error = %e, "phrase pool fetch failed"),
        }
    }
    from_path_or(config.phrase_pool_path.as_deref(), POOL_FILE)
}
