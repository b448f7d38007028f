use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine::frequency::FrequencyModel;
use crate::engine::ranker::CandidateRanker;
use crate::error::ExportError;
use crate::export::{Report, SessionBlock};
use crate::session::clock::Clock;
use crate::session::entry::EntrySession;
use crate::session::trial::{TrialPhase, TrialSequencer, TrialTransition};
use crate::store::KeyValueStore;

/// Characters that take part in digram statistics.
pub fn is_predictable(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == ' '
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrialStatus {
    pub phase: TrialPhase,
    pub total: usize,
    pub recorded: usize,
}

/// State after a command, for the front-end to render.
#[derive(Clone, Debug)]
pub struct Update {
    pub text: String,
    pub current_char: Option<char>,
    pub target: String,
    pub candidates: Vec<char>,
    pub wpm: Option<f64>,
    pub edit_distance: Option<usize>,
    pub trial: TrialStatus,
    pub transition: TrialTransition,
    /// Report produced by this command, e.g. when the last trial completes.
    pub report: Option<Report>,
}

/// The prediction model, the active entry session and the trial run behind a
/// plain command interface. Every command runs to completion and returns the
/// resulting state.
pub struct EngineState {
    model: FrequencyModel,
    store: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    ranker: CandidateRanker,
    terminal_chars: Vec<char>,
    session: EntrySession,
    trials: TrialSequencer,
}

impl EngineState {
    pub fn new(store: Box<dyn KeyValueStore>, clock: Box<dyn Clock>) -> Self {
        let model = Self::load_model(store.as_ref());
        Self {
            model,
            store,
            clock,
            ranker: CandidateRanker::default(),
            terminal_chars: vec!['.'],
            session: EntrySession::new(),
            trials: TrialSequencer::new(Vec::new()),
        }
    }

    pub fn from_config(config: &Config, store: Box<dyn KeyValueStore>, clock: Box<dyn Clock>) -> Self {
        let mut engine = Self::new(store, clock);
        engine.ranker = CandidateRanker::new(config.candidate_count, config.unigram_weight);
        engine.terminal_chars = config.terminal_chars();
        engine
    }

    pub fn with_trial_phrases(mut self, phrases: Vec<String>) -> Self {
        self.trials.set_phrases(phrases);
        self
    }

    /// Missing or unreadable counts start an empty model; prediction then
    /// uses the static fallback order.
    fn load_model(store: &dyn KeyValueStore) -> FrequencyModel {
        match FrequencyModel::load_from(store) {
            Ok(model) => {
                info!(observations = model.total_observations(), "frequency counts loaded");
                model
            }
            Err(e) => {
                warn!(error = %e, "frequency counts unavailable, starting empty");
                FrequencyModel::default()
            }
        }
    }

    /// Re-read persisted counts, replacing the in-memory model.
    pub fn reload_model(&mut self) {
        self.model = Self::load_model(self.store.as_ref());
    }

    fn persist(&mut self) {
        if let Err(e) = self.model.save_to(self.store.as_mut()) {
            warn!(error = %e, "could not save frequency counts");
        }
    }

    pub fn model(&self) -> &FrequencyModel {
        &self.model
    }

    pub fn session(&self) -> &EntrySession {
        &self.session
    }

    pub fn trials(&self) -> &TrialSequencer {
        &self.trials
    }

    pub fn candidates(&self) -> Vec<char> {
        self.ranker
            .rank(&self.model, self.session.buffer.context_char())
    }

    pub fn wpm(&self) -> Option<f64> {
        self.session.wpm()
    }

    pub fn edit_distance(&self) -> Option<usize> {
        self.session.edit_distance()
    }

    pub fn trial_status(&self) -> TrialStatus {
        TrialStatus {
            phase: self.trials.phase(),
            total: self.trials.phrases().len(),
            recorded: self.trials.results().len(),
        }
    }

    pub fn update(&self) -> Update {
        self.build_update(TrialTransition::None, None)
    }

    fn build_update(&self, transition: TrialTransition, report: Option<Report>) -> Update {
        Update {
            text: self.session.text().to_string(),
            current_char: self.session.buffer.current_char(),
            target: self.session.target().to_string(),
            candidates: self.candidates(),
            wpm: self.wpm(),
            edit_distance: self.edit_distance(),
            trial: self.trial_status(),
            transition,
            report,
        }
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    pub fn submit_char(&mut self, ch: char) -> Update {
        let now = self.clock.now_ms();
        let is_terminal = self.terminal_chars.contains(&ch);
        let prev = self.session.insert(ch, now, is_terminal);

        if is_predictable(ch) {
            self.model.observe(Some(prev), Some(ch));
        } else {
            self.model.observe_symbol(ch);
        }
        self.persist();
        debug!(?ch, ?prev, "char submitted");

        let transition = self.trials.on_entry(&self.session);
        let report = self.completion_report(transition);
        self.build_update(transition, report)
    }

    /// Undo the last insertion; a no-op when there is nothing to undo.
    pub fn submit_delete(&mut self) -> Update {
        let now = self.clock.now_ms();
        if !self.session.delete(now) {
            debug!("delete ignored, history empty");
        }
        self.update()
    }

    pub fn submit_reset(&mut self) -> Update {
        self.session.reset();
        self.update()
    }

    pub fn set_target(&mut self, target: &str) -> Update {
        self.session.set_target(target);
        self.update()
    }

    pub fn set_trial_phrases(&mut self, phrases: Vec<String>) {
        self.trials.set_phrases(phrases);
    }

    pub fn start_trials(&mut self) -> Update {
        let transition = self.trials.start(&mut self.session);
        self.build_update(transition, None)
    }

    pub fn restart_trials(&mut self) -> Update {
        let transition = self.trials.restart(&mut self.session);
        self.build_update(transition, None)
    }

    pub fn advance_trial(&mut self) -> Update {
        let transition = self.trials.advance(&mut self.session);
        let report = self.completion_report(transition);
        self.build_update(transition, report)
    }

    pub fn export_session(&self) -> Result<Report, ExportError> {
        Report::session(&SessionBlock {
            target: self.session.target(),
            wpm: self.session.wpm(),
            edit_distance: self.session.edit_distance(),
            entries: self.session.log.entries(),
            origin_ms: self.session.metrics.session_start,
        })
    }

    pub fn export_trials(&self) -> Result<Report, ExportError> {
        Report::trials(self.trials.phrases().len(), self.trials.results())
    }

    fn completion_report(&self, transition: TrialTransition) -> Option<Report> {
        if transition != TrialTransition::Completed {
            return None;
        }
        match self.export_trials() {
            Ok(report) => Some(report),
            Err(e) => {
                warn!(error = %e, "could not build trial report");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::frequency::STORAGE_KEY;
    use crate::session::clock::ManualClock;
    use crate::store::MemoryStore;

    fn engine_with_clock() -> (EngineState, ManualClock) {
        let clock = ManualClock::new();
        let engine = EngineState::new(Box::new(MemoryStore::new()), Box::new(clock.clone()));
        (engine, clock)
    }

    #[test]
    fn test_fresh_engine_predicts_from_starters() {
        let (engine, _clock) = engine_with_clock();
        let update = engine.update();
        assert_eq!(update.candidates, vec![' ', 'a', 'i', 'o', 's', 't']);
        assert_eq!(update.current_char, None);
        assert_eq!(update.wpm, None);
        assert_eq!(update.edit_distance, None);
    }

    #[test]
    fn test_letters_feed_digrams_symbols_feed_unigrams() {
        let (mut engine, _clock) = engine_with_clock();
        for ch in "Th3 ".chars() {
            engine.submit_char(ch);
        }
        assert_eq!(engine.model().digram(' ', 't'), 1);
        assert_eq!(engine.model().digram('t', 'h'), 1);
        assert_eq!(engine.model().unigram('3'), 1);
        assert_eq!(engine.model().digram('h', '3'), 0);
        // the space follows '3', which is recorded as its digram context
        assert_eq!(engine.model().digram('3', ' '), 1);
    }

    #[test]
    fn test_observations_are_persisted() {
        let store = MemoryStore::new();
        let mut engine = EngineState::new(Box::new(store), Box::new(ManualClock::new()));
        engine.submit_char('o');
        engine.submit_char('k');
        engine.reload_model();
        assert_eq!(engine.model().digram('o', 'k'), 1);
    }

    #[test]
    fn test_corrupt_counts_fall_back_to_empty_model() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "][").unwrap();
        let engine = EngineState::new(Box::new(store), Box::new(ManualClock::new()));
        assert!(engine.model().is_empty());
        assert_eq!(engine.candidates().len(), 6);
    }

    #[test]
    fn test_failed_save_does_not_abort_input() {
        let mut store = MemoryStore::new();
        store.set_fail_writes(true);
        let mut engine = EngineState::new(Box::new(store), Box::new(ManualClock::new()));
        let update = engine.submit_char('a');
        assert_eq!(update.text, "a");
        assert_eq!(engine.model().unigram('a'), 1);
    }

    #[test]
    fn test_wpm_through_commands() {
        let (mut engine, clock) = engine_with_clock();
        for (i, ch) in "hello".chars().enumerate() {
            clock.set(i as f64 * 1500.0);
            engine.submit_char(ch);
        }
        let wpm = engine.wpm().unwrap();
        assert!((wpm - 10.0).abs() < 1e-9, "got {wpm}");
    }

    #[test]
    fn test_terminal_char_freezes_elapsed_time() {
        let (mut engine, clock) = engine_with_clock();
        engine.submit_char('h');
        clock.set(3000.0);
        engine.submit_char('.');
        clock.set(60_000.0);
        engine.submit_char(' ');
        assert_eq!(engine.session().metrics.session_end, Some(3000.0));
    }

    #[test]
    fn test_delete_with_empty_history_is_noop() {
        let (mut engine, _clock) = engine_with_clock();
        let update = engine.submit_delete();
        assert_eq!(update.text, "");
        assert_eq!(update.current_char, None);
        assert!(engine.session().log.is_empty());
    }

    #[test]
    fn test_delete_restores_prediction_context() {
        let (mut engine, _clock) = engine_with_clock();
        engine.submit_char('q');
        let before = engine.candidates();
        engine.submit_char('u');
        let update = engine.submit_delete();
        assert_eq!(update.text, "q");
        assert_eq!(update.current_char, Some('q'));
        assert_ne!(update.candidates, Vec::<char>::new());
        assert_eq!(before.len(), update.candidates.len());
    }

    #[test]
    fn test_reset_clears_session_keeps_model_and_target() {
        let (mut engine, _clock) = engine_with_clock();
        engine.set_target("abc");
        engine.submit_char('a');
        let update = engine.submit_reset();
        assert_eq!(update.text, "");
        assert_eq!(update.target, "abc");
        assert_eq!(update.edit_distance, Some(3));
        assert!(engine.session().log.is_empty());
        assert_eq!(engine.model().unigram('a'), 1);
    }

    #[test]
    fn test_completing_last_trial_emits_report() {
        let (mut engine, clock) = engine_with_clock();
        engine.set_trial_phrases(vec!["hi".to_string()]);
        engine.start_trials();
        engine.submit_char('h');
        clock.set(1200.0);
        let update = engine.submit_char('i');
        assert_eq!(update.transition, TrialTransition::Completed);
        assert_eq!(update.trial.phase, TrialPhase::Complete);
        let report = update.report.unwrap();
        assert!(report.file_name.starts_with("trial-results-"));
        assert!(report.contents.starts_with("Trial System Results\nTotal Trials,1\n"));
    }

    #[test]
    fn test_session_export_uses_session_start() {
        let (mut engine, clock) = engine_with_clock();
        engine.set_target("ab");
        clock.set(2000.0);
        engine.submit_char('a');
        clock.set(2500.0);
        engine.submit_char('b');
        let report = engine.export_session().unwrap();
        assert!(report.contents.contains("\n1,insert,a,0.000,a,1\n"));
        assert!(report.contents.contains("\n2,insert,b,0.500,ab,0\n"));
    }
}
