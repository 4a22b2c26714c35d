//! View state for the progress, status and busy indicators
//!
//! These are plain values. The browser layer copies them onto the DOM after
//! each dispatched message.

use fiddle_protocol::StatusUpdate;

use crate::constants::WORKING_TITLE_PREFIX;

/// Module load progress bar and spinner
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressIndicator {
    pub value: u32,
    pub max: u32,
    pub hidden: bool,
    /// Removed from the page once loading completed
    pub removed: bool,
}

impl Default for ProgressIndicator {
    fn default() -> Self {
        Self {
            value: 0,
            max: 1,
            hidden: true,
            removed: false,
        }
    }
}

impl ProgressIndicator {
    /// The total step count is unknown, so the bar always shows one step
    /// still to go.
    pub fn apply(&mut self, update: &StatusUpdate) {
        self.value = update.step;
        self.max = update.step + 1;
        if update.step == 1 {
            self.hidden = false;
        }
        if update.is_complete() {
            self.removed = true;
        }
    }
}

/// Status text line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub hidden: bool,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            text: String::new(),
            hidden: true,
        }
    }
}

impl StatusLine {
    /// Show text updates; hide (but keep) the line once loading completes,
    /// since fatal errors may still be reported afterwards.
    pub fn apply(&mut self, update: &StatusUpdate) {
        match &update.text {
            Some(text) => self.show(text),
            None => self.hidden = true,
        }
    }

    pub fn show(&mut self, text: &str) {
        self.text = text.to_string();
        self.hidden = false;
    }
}

/// Page title and execute control while a command is in flight
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusyIndicator {
    pub title: String,
    pub original_title: String,
    pub exec_label: String,
    pub exec_enabled: bool,
}

impl BusyIndicator {
    pub fn new(title: &str, exec_label: &str) -> Self {
        Self {
            title: title.to_string(),
            original_title: title.to_string(),
            exec_label: exec_label.to_string(),
            exec_enabled: true,
        }
    }

    pub fn begin(&mut self) {
        self.title = format!("{}{}", WORKING_TITLE_PREFIX, self.original_title);
        self.exec_enabled = false;
    }

    pub fn end(&mut self) {
        self.title = self.original_title.clone();
        self.exec_enabled = true;
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        !self.exec_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(step: u32, text: Option<&str>) -> StatusUpdate {
        StatusUpdate {
            step,
            text: text.map(str::to_string),
        }
    }

    #[test]
    fn test_progress_bounds_track_step() {
        let mut progress = ProgressIndicator::default();
        assert!(progress.hidden);
        for step in 1..=5 {
            progress.apply(&update(step, Some("x")));
            assert_eq!(progress.value, step);
            assert_eq!(progress.max, step + 1);
            assert!(!progress.hidden);
        }
        progress.apply(&update(6, None));
        assert!(progress.removed);
        assert_eq!((progress.value, progress.max), (6, 7));
    }

    #[test]
    fn test_status_line_hides_on_complete() {
        let mut status = StatusLine::default();
        status.apply(&update(1, Some("Downloading...")));
        assert_eq!(status.text, "Downloading...");
        assert!(!status.hidden);
        status.apply(&update(2, None));
        assert!(status.hidden);
        status.show("Exception thrown, see JavaScript console");
        assert!(!status.hidden);
    }

    #[test]
    fn test_busy_round_trip() {
        let mut busy = BusyIndicator::new("sqlite3 fiddle", "Run");
        busy.begin();
        assert_eq!(busy.title, "[working...] sqlite3 fiddle");
        assert!(busy.is_busy());
        busy.begin();
        assert_eq!(busy.title, "[working...] sqlite3 fiddle");
        busy.end();
        assert_eq!(busy.title, "sqlite3 fiddle");
        assert!(busy.exec_enabled);
        assert_eq!(busy.exec_label, "Run");
    }
}
