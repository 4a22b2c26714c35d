//! Engine hook relay
//!
//! The relay is the [`EngineHooks`] implementation handed to the engine at
//! load time. It forwards output lines, numbers status updates, holds the
//! ready notification until loading is visibly complete, and carries the
//! host's lifecycle state so that hooks raised asynchronously by the engine
//! can advance it.

use std::cell::{Cell, RefCell};

use fiddle_engine::EngineHooks;
use fiddle_protocol::{Response, WorkPhase};

use crate::outbox::Outbox;
use crate::status::StatusTracker;

/// Worker host lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostState {
    /// Engine module is loading; commands are refused
    Loading,
    /// Ready for a command
    Idle,
    /// A command is in flight
    Busy,
    /// Engine exited; terminal
    Dead,
}

/// Progress of the `fiddle-ready` notification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReadyState {
    /// Runtime not initialized yet
    Waiting,
    /// Runtime initialized, waiting for the terminal status to go out first
    Held,
    /// Posted
    Sent,
}

/// Hook relay shared between the host and the engine
pub struct Relay<O: Outbox> {
    outbox: O,
    status: RefCell<StatusTracker>,
    state: Cell<HostState>,
    ready: Cell<ReadyState>,
    /// After an engine exception, status updates are logged instead of posted
    degraded: Cell<bool>,
}

impl<O: Outbox> Relay<O> {
    pub fn new(outbox: O) -> Self {
        Self {
            outbox,
            status: RefCell::new(StatusTracker::new()),
            state: Cell::new(HostState::Loading),
            ready: Cell::new(ReadyState::Waiting),
            degraded: Cell::new(false),
        }
    }

    #[inline]
    pub fn state(&self) -> HostState {
        self.state.get()
    }

    pub(crate) fn set_state(&self, state: HostState) {
        self.state.set(state);
    }

    pub(crate) fn degrade(&self) {
        self.degraded.set(true);
    }

    pub(crate) fn post(&self, message: Response) {
        self.outbox.post(message);
    }

    pub(crate) fn stderr(&self, line: &str) {
        self.post(Response::Stderr(line.to_string()));
    }

    pub(crate) fn working(&self, phase: WorkPhase) {
        self.post(Response::Working(phase));
    }

    /// Number the status change and post it, unless it repeats the last one
    fn post_status(&self, text: Option<&str>) {
        if self.degraded.get() {
            log::error!("[post-exception status] {}", text.unwrap_or(""));
            if text.map_or(true, str::is_empty) && self.ready.get() == ReadyState::Held {
                self.send_ready();
            }
            return;
        }
        let Some(update) = self.status.borrow_mut().update(text) else {
            return;
        };
        let complete = update.is_complete();
        log::debug!(
            "[fiddle-worker] status {}: {}",
            update.step,
            update.text.as_deref().unwrap_or("<complete>")
        );
        self.post(Response::status(update.step, update.text.as_deref()));
        if complete && self.ready.get() == ReadyState::Held {
            self.send_ready();
        }
    }

    fn send_ready(&self) {
        self.ready.set(ReadyState::Sent);
        self.post(Response::FiddleReady);
    }
}

impl<O: Outbox> EngineHooks for Relay<O> {
    fn print(&self, line: &str) {
        self.post(Response::Stdout(line.to_string()));
    }

    fn print_err(&self, line: &str) {
        self.stderr(line);
    }

    fn set_status(&self, text: Option<&str>) {
        self.post_status(text);
    }

    fn monitor_run_dependencies(&self, left: u32) {
        let text = self.status.borrow_mut().dependencies_status(left);
        self.post_status(Some(&text));
    }

    fn runtime_initialized(&self) {
        if self.state.get() == HostState::Loading {
            self.state.set(HostState::Idle);
        }
        if self.ready.get() != ReadyState::Waiting {
            return;
        }
        // Degraded status never reaches the page
        if self.degraded.get() || self.status.borrow().is_finished() {
            self.send_ready();
        } else {
            self.ready.set(ReadyState::Held);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbox::RecordingOutbox;

    #[test]
    fn test_ready_held_until_terminal_status() {
        let outbox = RecordingOutbox::new();
        let relay = Relay::new(outbox.clone());

        relay.set_status(Some("Running..."));
        relay.runtime_initialized();
        assert_eq!(relay.state(), HostState::Idle);
        assert_eq!(outbox.messages(), vec![Response::status(1, Some("Running..."))]);

        relay.set_status(Some(""));
        assert_eq!(
            outbox.drain(),
            vec![
                Response::status(1, Some("Running...")),
                Response::status(2, None),
                Response::FiddleReady,
            ]
        );
    }

    #[test]
    fn test_ready_after_terminal_status_posts_immediately() {
        let outbox = RecordingOutbox::new();
        let relay = Relay::new(outbox.clone());
        relay.set_status(None);
        relay.runtime_initialized();
        relay.runtime_initialized();
        assert_eq!(
            outbox.messages(),
            vec![Response::status(1, None), Response::FiddleReady]
        );
    }

    #[test]
    fn test_degraded_terminal_status_flushes_held_ready() {
        let outbox = RecordingOutbox::new();
        let relay = Relay::new(outbox.clone());
        relay.set_status(Some("Running..."));
        relay.runtime_initialized();
        relay.degrade();
        outbox.drain();

        relay.set_status(Some("still loading"));
        assert!(outbox.is_empty());
        relay.set_status(None);
        assert_eq!(outbox.drain(), vec![Response::FiddleReady]);
        relay.set_status(None);
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_degraded_status_is_not_posted() {
        let outbox = RecordingOutbox::new();
        let relay = Relay::new(outbox.clone());
        relay.degrade();
        relay.set_status(Some("late"));
        relay.monitor_run_dependencies(0);
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_output_lines_are_not_batched() {
        let outbox = RecordingOutbox::new();
        let relay = Relay::new(outbox.clone());
        relay.print("a");
        relay.print("b");
        relay.print_err("c");
        assert_eq!(
            outbox.messages(),
            vec![
                Response::Stdout("a".into()),
                Response::Stdout("b".into()),
                Response::Stderr("c".into()),
            ]
        );
    }
}
