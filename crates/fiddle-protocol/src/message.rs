//! Message types for both directions of the page/worker channel

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Closed set of message tags across both directions.
///
/// Used as the key of the page-side handler registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKind {
    ShellExec,
    Stdout,
    Stderr,
    Module,
    Working,
    Error,
    FiddleReady,
}

impl MessageKind {
    /// All kinds, page → worker first
    pub const ALL: [MessageKind; 7] = [
        MessageKind::ShellExec,
        MessageKind::Stdout,
        MessageKind::Stderr,
        MessageKind::Module,
        MessageKind::Working,
        MessageKind::Error,
        MessageKind::FiddleReady,
    ];

    /// Wire tag for this kind
    pub fn tag(self) -> &'static str {
        match self {
            MessageKind::ShellExec => TAG_SHELL_EXEC,
            MessageKind::Stdout => TAG_STDOUT,
            MessageKind::Stderr => TAG_STDERR,
            MessageKind::Module => TAG_MODULE,
            MessageKind::Working => TAG_WORKING,
            MessageKind::Error => TAG_ERROR,
            MessageKind::FiddleReady => TAG_FIDDLE_READY,
        }
    }

    /// Look up a kind by wire tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }
}

impl core::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Page → worker messages
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    /// Run shell text. `None` is a valid no-op that primes the engine.
    ShellExec(Option<String>),
}

impl Request {
    pub fn kind(&self) -> MessageKind {
        match self {
            Request::ShellExec(_) => MessageKind::ShellExec,
        }
    }
}

/// Worker → page messages
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    /// One line of engine stdout
    Stdout(String),
    /// One line of engine stderr, or a host-side rejection
    Stderr(String),
    /// Module lifecycle event
    Module(ModuleEvent),
    /// Working bracket
    Working(WorkPhase),
    /// Unrecoverable engine termination
    Error(TerminationDetails),
    /// Engine loaded; no payload
    FiddleReady,
}

impl Response {
    pub fn kind(&self) -> MessageKind {
        match self {
            Response::Stdout(_) => MessageKind::Stdout,
            Response::Stderr(_) => MessageKind::Stderr,
            Response::Module(_) => MessageKind::Module,
            Response::Working(_) => MessageKind::Working,
            Response::Error(_) => MessageKind::Error,
            Response::FiddleReady => MessageKind::FiddleReady,
        }
    }

    /// Shorthand for a load-status message
    pub fn status(step: u32, text: Option<&str>) -> Self {
        Response::Module(ModuleEvent::Status(StatusUpdate {
            step,
            text: text.map(str::to_string),
        }))
    }

    /// Text payload of `stdout`/`stderr` messages
    pub fn output_text(&self) -> Option<&str> {
        match self {
            Response::Stdout(text) | Response::Stderr(text) => Some(text),
            _ => None,
        }
    }
}

/// Payload of a `module` message
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModuleEvent {
    /// Load progress
    Status(StatusUpdate),
    /// A module sub-type this build does not know; the page warns about it
    Unrecognized(String),
}

/// Load progress update.
///
/// `step` starts at 1 and increases by one per posted update. `text` is
/// `None` exactly once, on the update that marks the end of loading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub step: u32,
    pub text: Option<String>,
}

impl StatusUpdate {
    /// Whether this update marks the end of module loading
    pub fn is_complete(&self) -> bool {
        self.text.is_none()
    }
}

/// Working bracket phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkPhase {
    Start,
    End,
}

impl WorkPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkPhase::Start => WORKING_START,
            WorkPhase::End => WORKING_END,
        }
    }
}

/// Details of an unrecoverable engine exit
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationDetails {
    /// Runtime error name, e.g. `ExitStatus`
    pub name: String,
    /// Human-readable description
    pub message: String,
    /// Process exit status, when the runtime reports one
    #[serde(default)]
    pub status: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags_round_trip() {
        for kind in MessageKind::ALL {
            assert_eq!(MessageKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(MessageKind::from_tag("shellexec"), None);
    }

    #[test]
    fn test_response_kinds() {
        assert_eq!(Response::Stdout("x".into()).kind(), MessageKind::Stdout);
        assert_eq!(Response::FiddleReady.kind(), MessageKind::FiddleReady);
        assert_eq!(Response::status(1, None).kind(), MessageKind::Module);
        assert_eq!(Request::ShellExec(None).kind(), MessageKind::ShellExec);
    }

    #[test]
    fn test_output_text() {
        assert_eq!(Response::Stderr("oops".into()).output_text(), Some("oops"));
        assert_eq!(Response::Working(WorkPhase::End).output_text(), None);
    }
}
