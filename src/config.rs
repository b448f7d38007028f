use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::ranker::{DEFAULT_CANDIDATE_COUNT, DEFAULT_UNIGRAM_WEIGHT};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_candidate_count")]
    pub candidate_count: usize,
    #[serde(default = "default_unigram_weight")]
    pub unigram_weight: f64,
    #[serde(default = "default_terminal_chars")]
    pub terminal_chars: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    #[serde(default)]
    pub trial_phrases_path: Option<String>,
    #[serde(default)]
    pub phrase_pool_path: Option<String>,
    #[serde(default)]
    pub phrase_pool_url: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_candidate_count() -> usize {
    DEFAULT_CANDIDATE_COUNT
}
fn default_unigram_weight() -> f64 {
    DEFAULT_UNIGRAM_WEIGHT
}
fn default_terminal_chars() -> String {
    ".".to_string()
}
fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ringtype")
        .to_string_lossy()
        .to_string()
}
fn default_export_dir() -> String {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ringtype")
        .to_string_lossy()
        .to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_theme() -> String {
    "midnight".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            candidate_count: default_candidate_count(),
            unigram_weight: default_unigram_weight(),
            terminal_chars: default_terminal_chars(),
            data_dir: default_data_dir(),
            export_dir: default_export_dir(),
            trial_phrases_path: None,
            phrase_pool_path: None,
            phrase_pool_url: None,
            log_level: default_log_level(),
            theme: default_theme(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ringtype")
            .join("config.toml")
    }

    pub fn log_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("ringtype.log")
    }

    pub fn terminal_chars(&self) -> Vec<char> {
        self.terminal_chars.chars().collect()
    }

    pub fn tracing_level(&self) -> tracing::Level {
        tracing::Level::from_str(&self.log_level).unwrap_or(tracing::Level::INFO)
    }

    /// Clamp values from hand-edited files into a usable range.
    pub fn validate(&mut self) {
        // One slot for space plus at least one letter, at most the whole alphabet plus space.
        self.candidate_count = self.candidate_count.clamp(2, 27);
        if !self.unigram_weight.is_finite() || self.unigram_weight < 0.0 {
            self.unigram_weight = default_unigram_weight();
        }
        self.unigram_weight = self.unigram_weight.min(1.0);
        if self.terminal_chars.is_empty() {
            self.terminal_chars = default_terminal_chars();
        }
        if tracing::Level::from_str(&self.log_level).is_err() {
            self.log_level = default_log_level();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.candidate_count, 6);
        assert!((config.unigram_weight - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.terminal_chars, ".");
        assert!(config.trial_phrases_path.is_none());
        assert!(config.data_dir.contains("ringtype"));
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
candidate_count = 8
terminal_chars = ".!?"
phrase_pool_url = "https://example.org/sentences.json"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.candidate_count, 8);
        assert_eq!(config.terminal_chars(), vec!['.', '!', '?']);
        assert_eq!(
            config.phrase_pool_url.as_deref(),
            Some("https://example.org/sentences.json")
        );
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.trial_phrases_path = Some("/tmp/trials.json".to_string());
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.candidate_count, deserialized.candidate_count);
        assert_eq!(config.export_dir, deserialized.export_dir);
        assert_eq!(config.trial_phrases_path, deserialized.trial_phrases_path);
    }

    #[test]
    fn test_validate_clamps_values() {
        let mut config = Config::default();
        config.candidate_count = 0;
        config.unigram_weight = f64::NAN;
        config.terminal_chars = String::new();
        config.log_level = "chatty".to_string();
        config.validate();
        assert_eq!(config.candidate_count, 2);
        assert!((config.unigram_weight - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.terminal_chars, ".");
        assert_eq!(config.log_level, "info");

        config.candidate_count = 99;
        config.unigram_weight = 5.0;
        config.validate();
        assert_eq!(config.candidate_count, 27);
        assert!((config.unigram_weight - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tracing_level_parses_case_insensitively() {
        let mut config = Config::default();
        config.log_level = "DEBUG".to_string();
        assert_eq!(config.tracing_level(), tracing::Level::DEBUG);
    }
}
