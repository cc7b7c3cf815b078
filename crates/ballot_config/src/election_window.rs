use primitives::Timestamp;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Half-open interval `[start, end)` during which votes are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Default for ElectionWindow {
    fn default() -> Self {
        ElectionWindow {
            start: 0,
            end: Timestamp::MAX,
        }
    }
}

impl ElectionWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.end <= self.start {
            return Err(ConfigError::Invalid(format!(
                "election window end {} must be after start {}",
                self.end, self.start
            )));
        }
        Ok(())
    }

    pub fn has_started(&self, now: Timestamp) -> bool {
        now >= self.start
    }

    pub fn has_ended(&self, now: Timestamp) -> bool {
        now >= self.end
    }

    pub fn time_remaining(&self, now: Timestamp) -> Timestamp {
        self.end.saturating_sub(now.max(self.start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_or_inverted_windows() {
        assert!(ElectionWindow::new(10, 10).validate().is_err());
        assert!(ElectionWindow::new(10, 5).validate().is_err());
        assert!(ElectionWindow::new(10, 11).validate().is_ok());
    }

    #[test]
    fn end_is_exclusive() {
        let window = ElectionWindow::new(10, 20);

        assert!(!window.has_started(9));
        assert!(window.has_started(10));
        assert!(!window.has_ended(19));
        assert!(window.has_ended(20));
    }

    #[test]
    fn time_remaining_counts_from_the_later_of_now_and_start() {
        let window = ElectionWindow::new(10, 20);

        assert_eq!(window.time_remaining(0), 10);
        assert_eq!(window.time_remaining(15), 5);
        assert_eq!(window.time_remaining(25), 0);
    }
}
