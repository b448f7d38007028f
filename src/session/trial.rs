use serde::Serialize;
use tracing::{info, warn};

use crate::session::entry::EntrySession;
use crate::session::log::LogEntry;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrialPhase {
    Idle,
    Running(usize),
    Complete,
}

/// What a sequencer call changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrialTransition {
    None,
    /// The trial at this index was recorded; the run stays on it.
    Finalized(usize),
    /// Moved on to the trial at this index with a fresh session.
    Advanced(usize),
    /// The last trial is over and the run is complete.
    Completed,
}

#[derive(Clone, Debug, Serialize)]
pub struct TrialResult {
    pub trial_number: usize,
    pub target_text: String,
    pub wpm: Option<f64>,
    pub edit_distance: Option<usize>,
    pub log: Vec<LogEntry>,
}

/// Steps through an ordered phrase list, one entry session per phrase.
///
/// Each trial index is recorded at most once, whether it ends by an exact
/// match or by a manual advance.
#[derive(Clone, Debug)]
pub struct TrialSequencer {
    phrases: Vec<String>,
    phase: TrialPhase,
    results: Vec<TrialResult>,
    finalized: bool,
}

impl TrialSequencer {
    pub fn new(phrases: Vec<String>) -> Self {
        Self {
            phrases,
            phase: TrialPhase::Idle,
            results: Vec::new(),
            finalized: false,
        }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn set_phrases(&mut self, phrases: Vec<String>) {
        self.phrases = phrases;
        self.phase = TrialPhase::Idle;
        self.results.clear();
        self.finalized = false;
    }

    pub fn phase(&self) -> TrialPhase {
        self.phase
    }

    pub fn results(&self) -> &[TrialResult] {
        &self.results
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.phase {
            TrialPhase::Running(i) => Some(i),
            _ => None,
        }
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 >= self.phrases.len()
    }

    /// Begin (or begin again) at the first phrase, discarding prior results.
    pub fn start(&mut self, session: &mut EntrySession) -> TrialTransition {
        if self.phrases.is_empty() {
            warn!("cannot start trials: phrase list is empty");
            return TrialTransition::None;
        }
        self.results.clear();
        info!(total = self.phrases.len(), "starting trial run");
        self.load(0, session);
        TrialTransition::Advanced(0)
    }

    pub fn restart(&mut self, session: &mut EntrySession) -> TrialTransition {
        self.start(session)
    }

    /// Called after every character entry. An exact match records the trial;
    /// on the last phrase it also completes the run.
    pub fn on_entry(&mut self, session: &EntrySession) -> TrialTransition {
        let TrialPhase::Running(i) = self.phase else {
            return TrialTransition::None;
        };
        if session.text() != self.phrases[i] || !self.finalize(i, session) {
            return TrialTransition::None;
        }
        if self.is_last(i) {
            self.complete();
            TrialTransition::Completed
        } else {
            TrialTransition::Finalized(i)
        }
    }

    /// Manual "next" / "finish". Unfinished input is recorded as an abandoned
    /// trial; an untouched trial is skipped.
    pub fn advance(&mut self, session: &mut EntrySession) -> TrialTransition {
        let TrialPhase::Running(i) = self.phase else {
            return TrialTransition::None;
        };
        if !session.text().is_empty() {
            self.finalize(i, session);
        }
        if self.is_last(i) {
            self.complete();
            return TrialTransition::Completed;
        }
        self.load(i + 1, session);
        TrialTransition::Advanced(i + 1)
    }

    fn load(&mut self, index: usize, session: &mut EntrySession) {
        session.reset();
        session.set_target(&self.phrases[index]);
        self.phase = TrialPhase::Running(index);
        self.finalized = false;
    }

    fn finalize(&mut self, index: usize, session: &EntrySession) -> bool {
        if self.finalized {
            return false;
        }
        let result = TrialResult {
            trial_number: index + 1,
            target_text: self.phrases[index].clone(),
            wpm: session.wpm(),
            edit_distance: session.edit_distance(),
            log: session.log.snapshot(),
        };
        info!(
            trial = result.trial_number,
            wpm = result.wpm.unwrap_or(0.0),
            msd = result.edit_distance.unwrap_or(0),
            "trial recorded"
        );
        self.results.push(result);
        self.finalized = true;
        true
    }

    fn complete(&mut self) {
        self.phase = TrialPhase::Complete;
        info!(recorded = self.results.len(), "all trials complete");
    }
}
