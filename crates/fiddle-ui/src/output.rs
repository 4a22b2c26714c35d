//! Output area buffer
//!
//! The page's output is a single growing text. Lines are appended with a
//! trailing newline; multiple parts of one line are joined by a single
//! space. A pending clear, armed before a command is sent, is applied by the
//! first line that arrives afterwards.

/// Text shown in the output area
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    text: String,
    clear_pending: bool,
    /// Set on every append; the view consumes it to scroll to the bottom
    appended: bool,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current buffer contents
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Append one line made of `parts` joined by a space
    pub fn echo<S: AsRef<str>>(&mut self, parts: &[S]) {
        let line = parts
            .iter()
            .map(|p| p.as_ref())
            .collect::<Vec<_>>()
            .join(" ");
        if self.clear_pending {
            self.clear_pending = false;
            self.text.clear();
        }
        self.text.push_str(&line);
        self.text.push('\n');
        self.appended = true;
    }

    /// Clear now
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Clear on the next append
    pub fn defer_clear(&mut self) {
        self.clear_pending = true;
    }

    #[inline]
    pub fn is_clear_pending(&self) -> bool {
        self.clear_pending
    }

    /// Whether a line was appended since the last call
    pub fn take_appended(&mut self) -> bool {
        core::mem::take(&mut self.appended)
    }
}
