use crate::engine::edit_distance;

const CHARS_PER_WORD: f64 = 5.0;
const MS_PER_MINUTE: f64 = 60_000.0;

/// Timing of the active entry buffer.
///
/// `session_start` is set by the first input on a non-empty buffer and cleared
/// whenever the buffer empties. `session_end` is set once by a terminal
/// character and then kept until the session resets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionMetrics {
    pub session_start: Option<f64>,
    pub last_input: Option<f64>,
    pub session_end: Option<f64>,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_input(&mut self, now_ms: f64, text: &str, is_terminal: bool) {
        if text.is_empty() {
            self.reset();
            return;
        }
        if self.session_start.is_none() {
            self.session_start = Some(now_ms);
        }
        self.last_input = Some(now_ms);
        if is_terminal && self.session_end.is_none() {
            self.session_end = Some(now_ms);
        }
    }

    /// Undoing past a terminal character reopens the session.
    pub fn clear_end(&mut self) {
        self.session_end = None;
    }

    pub fn reset(&mut self) {
        self.session_start = None;
        self.last_input = None;
        self.session_end = None;
    }

    pub fn elapsed_ms(&self) -> Option<f64> {
        let start = self.session_start?;
        let end = self.session_end.or(self.last_input)?;
        Some(end - start)
    }

    /// Words per minute using the five-characters-per-word convention.
    /// `None` until there is a non-empty buffer and a positive elapsed time.
    pub fn wpm(&self, text: &str) -> Option<f64> {
        if text.is_empty() || self.last_input.is_none() {
            return None;
        }
        let minutes = self.elapsed_ms()? / MS_PER_MINUTE;
        if minutes <= 0.0 {
            return None;
        }
        Some((text.chars().count() as f64 / CHARS_PER_WORD) / minutes)
    }

    /// `None` when there is no target to measure against.
    pub fn current_edit_distance(&self, target: &str, text: &str) -> Option<usize> {
        if target.is_empty() {
            return None;
        }
        Some(edit_distance::distance(target, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wpm_five_chars_in_six_seconds() {
        let metrics = SessionMetrics {
            session_start: Some(0.0),
            last_input: Some(6000.0),
            session_end: None,
        };
        let wpm = metrics.wpm("hello").unwrap();
        assert!((wpm - 10.0).abs() < 1e-9, "got {wpm}");
    }

    #[test]
    fn test_wpm_empty_text_is_none() {
        let metrics = SessionMetrics {
            session_start: Some(0.0),
            last_input: Some(6000.0),
            session_end: None,
        };
        assert_eq!(metrics.wpm(""), None);
    }

    #[test]
    fn test_wpm_zero_elapsed_is_none() {
        let mut metrics = SessionMetrics::new();
        metrics.on_input(500.0, "a", false);
        assert_eq!(metrics.wpm("a"), None);
    }

    #[test]
    fn test_wpm_prefers_session_end() {
        let mut metrics = SessionMetrics::new();
        metrics.on_input(0.0, "h", false);
        metrics.on_input(6000.0, "hello.", true);
        metrics.on_input(60_000.0, "hello. ", false);
        assert_eq!(metrics.session_end, Some(6000.0));
        // 7 chars over the 6s up to the terminal character
        let wpm = metrics.wpm("hello. ").unwrap();
        assert!((wpm - 14.0).abs() < 1e-9, "got {wpm}");
    }

    #[test]
    fn test_start_set_once_and_cleared_on_empty() {
        let mut metrics = SessionMetrics::new();
        metrics.on_input(100.0, "a", false);
        metrics.on_input(300.0, "ab", false);
        assert_eq!(metrics.session_start, Some(100.0));
        assert_eq!(metrics.last_input, Some(300.0));

        metrics.on_input(400.0, "", false);
        assert_eq!(metrics, SessionMetrics::default());
    }

    #[test]
    fn test_terminal_end_not_overwritten() {
        let mut metrics = SessionMetrics::new();
        metrics.on_input(0.0, "a.", true);
        metrics.on_input(900.0, "a..", true);
        assert_eq!(metrics.session_end, Some(0.0));
        metrics.clear_end();
        metrics.on_input(1000.0, "a...", true);
        assert_eq!(metrics.session_end, Some(1000.0));
    }

    #[test]
    fn test_edit_distance_needs_target() {
        let metrics = SessionMetrics::new();
        assert_eq!(metrics.current_edit_distance("", "anything"), None);
        assert_eq!(metrics.current_edit_distance("kitten", "sitting"), Some(3));
        assert_eq!(metrics.current_edit_distance("abc", ""), Some(3));
    }
}
