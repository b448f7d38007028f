use std::path::PathBuf;

use tracing::{info, warn};

use ringtype::config::Config;
use ringtype::engine::ranker::ALPHABET;
use ringtype::engine::{EngineState, Update};
use ringtype::export::{Report, write_report};
use ringtype::session::trial::{TrialPhase, TrialTransition};

use crate::ui::theme::Theme;

pub const DIGITS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];
pub const SYMBOLS: [char; 11] = ['!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '.'];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

pub struct App {
    pub engine: EngineState,
    pub theme: Theme,
    pub last: Update,
    pub numbers_mode: bool,
    /// One-shot shift: the next letter is entered uppercase.
    pub uppercase: bool,
    pub pool: Vec<String>,
    pub pool_index: Option<usize>,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
    export_dir: PathBuf,
}

impl App {
    pub fn new(config: &Config, engine: EngineState, pool: Vec<String>, theme: Theme) -> Self {
        let last = engine.update();
        Self {
            engine,
            theme,
            last,
            numbers_mode: false,
            uppercase: false,
            pool,
            pool_index: None,
            status: None,
            should_quit: false,
            export_dir: PathBuf::from(&config.export_dir),
        }
    }

    /// Characters on the outer ring for the current mode.
    pub fn outer_ring(&self) -> Vec<char> {
        if self.numbers_mode {
            DIGITS.iter().chain(SYMBOLS.iter()).copied().collect()
        } else {
            ALPHABET.chars().collect()
        }
    }

    /// Before anything is typed a single ring holds every outer character.
    pub fn full_ring(&self) -> bool {
        self.last.text.is_empty()
    }

    pub fn type_char(&mut self, ch: char) {
        let ch = if self.uppercase { ch.to_ascii_uppercase() } else { ch };
        self.uppercase = false;
        let update = self.engine.submit_char(ch);
        self.apply(update);
    }

    /// Enter the prediction in `slot` (zero-based), if there is one. The
    /// prediction ring is hidden until the first character is entered.
    pub fn select_candidate(&mut self, slot: usize) {
        if self.full_ring() {
            return;
        }
        if let Some(&ch) = self.last.candidates.get(slot) {
            self.type_char(ch);
        }
    }

    pub fn toggle_shift(&mut self) {
        self.uppercase = !self.uppercase;
    }

    pub fn backspace(&mut self) {
        let update = self.engine.submit_delete();
        self.apply(update);
    }

    pub fn clear(&mut self) {
        let update = self.engine.submit_reset();
        self.status = None;
        self.apply(update);
    }

    pub fn toggle_numbers(&mut self) {
        self.numbers_mode = !self.numbers_mode;
        let label = if self.numbers_mode { "Digits and symbols" } else { "Letters" };
        self.set_status(StatusKind::Info, format!("Outer ring: {label}"));
    }

    /// Cycle the free-entry target through the phrase pool. Ignored while a
    /// trial run owns the target.
    pub fn next_target(&mut self) {
        if self.last.trial.phase != TrialPhase::Idle || self.pool.is_empty() {
            return;
        }
        let next = self.pool_index.map_or(0, |i| (i + 1) % self.pool.len());
        self.pool_index = Some(next);
        let target = self.pool[next].clone();
        self.engine.submit_reset();
        let update = self.engine.set_target(&target);
        self.apply(update);
    }

    pub fn toggle_trials(&mut self) {
        let update = if self.last.trial.phase == TrialPhase::Idle {
            self.engine.start_trials()
        } else {
            self.engine.restart_trials()
        };
        if update.transition == TrialTransition::None {
            self.set_status(StatusKind::Error, "No trial phrases loaded".to_string());
        }
        self.apply(update);
    }

    pub fn advance_trial(&mut self) {
        let update = self.engine.advance_trial();
        self.apply(update);
    }

    pub fn export_log(&mut self) {
        match self.engine.export_session() {
            Ok(report) => self.save_report(&report),
            Err(e) => {
                warn!(error = %e, "session export failed");
                self.set_status(StatusKind::Error, format!("Export failed: {e}"));
            }
        }
    }

    /// Label for the manual advance action, if one applies.
    pub fn advance_label(&self) -> Option<&'static str> {
        let TrialPhase::Running(i) = self.last.trial.phase else {
            return None;
        };
        if self.engine.trials().is_last(i) {
            Some("Finish")
        } else {
            Some("Next Trial")
        }
    }

    pub fn trial_label(&self) -> String {
        match self.last.trial.phase {
            TrialPhase::Idle => String::new(),
            TrialPhase::Running(i) => format!("Trial {} of {}", i + 1, self.last.trial.total),
            TrialPhase::Complete => "All trials complete!".to_string(),
        }
    }

    fn apply(&mut self, mut update: Update) {
        match update.transition {
            TrialTransition::Finalized(i) => {
                self.set_status(StatusKind::Success, format!("Trial {} recorded", i + 1));
            }
            TrialTransition::Advanced(_) => self.status = None,
            TrialTransition::Completed | TrialTransition::None => {}
        }
        if let Some(report) = update.report.take() {
            self.save_report(&report);
        }
        self.last = update;
    }

    fn save_report(&mut self, report: &Report) {
        match write_report(&self.export_dir, report) {
            Ok(path) => {
                info!(path = %path.display(), "report saved");
                self.set_status(StatusKind::Success, format!("Saved {}", path.display()));
            }
            Err(e) => {
                warn!(error = %e, "report could not be written");
                self.set_status(StatusKind::Error, format!("Could not save report: {e}"));
            }
        }
    }

    fn set_status(&mut self, kind: StatusKind, text: String) {
        self.status = Some(StatusMessage { kind, text });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringtype::session::clock::ManualClock;
    use ringtype::store::MemoryStore;
    use tempfile::TempDir;

    fn test_app(dir: &TempDir, trials: &[&str], pool: &[&str]) -> App {
        let mut config = Config::default();
        config.export_dir = dir.path().to_string_lossy().to_string();
        let engine = EngineState::from_config(
            &config,
            Box::new(MemoryStore::new()),
            Box::new(ManualClock::new()),
        )
        .with_trial_phrases(trials.iter().map(|s| s.to_string()).collect());
        let pool = pool.iter().map(|s| s.to_string()).collect();
        App::new(&config, engine, pool, Theme::default())
    }

    #[test]
    fn test_select_candidate_types_prediction() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir, &[], &[]);
        app.select_candidate(1);
        assert_eq!(app.last.text, "", "no prediction ring before the first char");

        app.type_char('h');
        let second = app.last.candidates[1];
        app.select_candidate(1);
        assert_eq!(app.last.text, format!("h{second}"));
        app.select_candidate(40);
        assert_eq!(app.last.text.chars().count(), 2);
    }

    #[test]
    fn test_shift_applies_to_one_letter() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir, &[], &[]);
        app.toggle_shift();
        app.type_char('h');
        app.type_char('i');
        assert_eq!(app.last.text, "Hi");
        assert!(!app.uppercase);
    }

    #[test]
    fn test_outer_ring_modes() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir, &[], &[]);
        assert_eq!(app.outer_ring().len(), 26);
        app.toggle_numbers();
        let ring = app.outer_ring();
        assert!(ring.contains(&'7') && ring.contains(&'#'));
        assert_eq!(ring.len(), 21);
    }

    #[test]
    fn test_next_target_cycles_pool() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir, &[], &["one", "two"]);
        app.type_char('x');
        app.next_target();
        assert_eq!(app.last.target, "one");
        assert_eq!(app.last.text, "");
        app.next_target();
        app.next_target();
        assert_eq!(app.last.target, "one");
    }

    #[test]
    fn test_trial_flow_writes_report() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir, &["ab", "cd"], &["pool"]);
        app.toggle_trials();
        assert_eq!(app.trial_label(), "Trial 1 of 2");
        assert_eq!(app.advance_label(), Some("Next Trial"));

        // the pool is locked while trials run
        app.next_target();
        assert_eq!(app.last.target, "ab");

        app.type_char('a');
        app.type_char('b');
        assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Success));
        app.advance_trial();
        assert_eq!(app.advance_label(), Some("Finish"));
        app.type_char('c');
        app.type_char('d');
        assert_eq!(app.trial_label(), "All trials complete!");

        let written: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(written.len(), 1);
    }

    #[test]
    fn test_starting_without_phrases_reports_error() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir, &[], &[]);
        app.toggle_trials();
        assert_eq!(app.last.trial.phase, TrialPhase::Idle);
        assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Error));
    }

    #[test]
    fn test_export_log_writes_file() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir, &[], &[]);
        app.type_char('h');
        app.export_log();
        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("entry-log-target-"));
    }
}
