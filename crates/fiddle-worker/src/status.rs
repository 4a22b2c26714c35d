//! Load-status tracking
//!
//! Turns the engine's free-text status callbacks into numbered
//! [`StatusUpdate`]s. Consecutive identical texts collapse into one update,
//! and the step counter only advances when an update is actually produced.

use fiddle_protocol::StatusUpdate;

use crate::constants::{preparing_status, STATUS_DOWNLOADS_COMPLETE};

/// Status step counter and deduplication state
#[derive(Debug, Default)]
pub struct StatusTracker {
    /// Last posted text; outer `None` means nothing has been posted yet
    last: Option<Option<String>>,
    /// Step of the last posted update (0 before the first)
    step: u32,
    /// Highest outstanding-dependency count seen
    total_dependencies: u32,
    /// Whether the terminal (`text: None`) update has been produced
    finished: bool,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a status change.
    ///
    /// Empty text is treated as `None` (load complete). Returns the update
    /// to post, or `None` when the text repeats the previous one.
    pub fn update(&mut self, text: Option<&str>) -> Option<StatusUpdate> {
        let text = text.filter(|t| !t.is_empty()).map(str::to_string);
        if self.last.as_ref() == Some(&text) {
            return None;
        }
        self.step += 1;
        if text.is_none() {
            self.finished = true;
        }
        self.last = Some(text.clone());
        Some(StatusUpdate {
            step: self.step,
            text,
        })
    }

    /// Status text for an outstanding-dependency report
    pub fn dependencies_status(&mut self, left: u32) -> String {
        self.total_dependencies = self.total_dependencies.max(left);
        if left > 0 {
            preparing_status(self.total_dependencies - left, self.total_dependencies)
        } else {
            STATUS_DOWNLOADS_COMPLETE.to_string()
        }
    }

    /// Step of the last produced update
    #[inline]
    pub fn step(&self) -> u32 {
        self.step
    }

    /// Whether the terminal update has been produced
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(tracker: &mut StatusTracker, texts: &[Option<&str>]) -> Vec<StatusUpdate> {
        texts.iter().filter_map(|t| tracker.update(*t)).collect()
    }

    #[test]
    fn test_repeated_text_is_suppressed() {
        let mut tracker = StatusTracker::new();
        let updates = feed(&mut tracker, &[Some("a"), Some("a"), Some("b"), None]);
        assert_eq!(
            updates,
            vec![
                StatusUpdate { step: 1, text: Some("a".into()) },
                StatusUpdate { step: 2, text: Some("b".into()) },
                StatusUpdate { step: 3, text: None },
            ]
        );
        assert!(tracker.is_finished());
    }

    #[test]
    fn test_non_consecutive_repeats_are_posted() {
        let mut tracker = StatusTracker::new();
        let updates = feed(&mut tracker, &[Some("a"), Some("b"), Some("a")]);
        let steps: Vec<u32> = updates.iter().map(|u| u.step).collect();
        assert_eq!(steps, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_text_means_complete() {
        let mut tracker = StatusTracker::new();
        let update = tracker.update(Some("")).unwrap();
        assert_eq!(update, StatusUpdate { step: 1, text: None });
        // A following None repeats the normalized text
        assert!(tracker.update(None).is_none());
        assert_eq!(tracker.step(), 1);
    }

    #[test]
    fn test_first_update_always_posted() {
        let mut tracker = StatusTracker::new();
        assert_eq!(tracker.update(None).map(|u| u.step), Some(1));
    }

    #[test]
    fn test_dependencies_status() {
        let mut tracker = StatusTracker::new();
        assert_eq!(tracker.dependencies_status(3), "Preparing... (0/3)");
        assert_eq!(tracker.dependencies_status(1), "Preparing... (2/3)");
        assert_eq!(tracker.dependencies_status(0), "All downloads complete.");
    }
}
