//! Worker host
//!
//! Owns the engine and serves `shellExec` requests one at a time.
//!
//! ```text
//! Loading ──runtime_initialized──▶ Idle ⇄ Busy
//!    │                              │      │
//!    └──────────── fatal exit ──────┴──────┴──▶ Dead
//! ```
//!
//! All methods take `&self`. The engine may call back into the host's relay
//! while a command runs, and a re-entrant request must be refused rather
//! than deadlock or panic, so state lives in cells and the engine is only
//! borrowed on the path that actually runs it.

use std::cell::RefCell;
use std::rc::Rc;

use fiddle_engine::{Engine, EngineError, EngineHooks};
use fiddle_protocol::{decode_request, Request, Response, TerminationDetails, WorkPhase};

use crate::constants::*;
use crate::outbox::Outbox;
use crate::relay::{HostState, Relay};

/// Worker-side host for one engine instance
pub struct WorkerHost<E: Engine, O: Outbox + 'static> {
    engine: RefCell<E>,
    relay: Rc<Relay<O>>,
}

impl<E: Engine, O: Outbox + 'static> WorkerHost<E, O> {
    pub fn new(engine: E, outbox: O) -> Self {
        Self {
            engine: RefCell::new(engine),
            relay: Rc::new(Relay::new(outbox)),
        }
    }

    /// Current lifecycle state
    #[inline]
    pub fn state(&self) -> HostState {
        self.relay.state()
    }

    /// Whether the engine has exited
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.relay.state() == HostState::Dead
    }

    /// Hooks the engine reports through; exposed for platform glue that
    /// receives engine callbacks outside of [`Engine::load`].
    pub fn hooks(&self) -> Rc<dyn EngineHooks> {
        self.relay.clone()
    }

    /// Post the initial status and start loading the engine.
    ///
    /// A load failure is reported like any other engine exception before
    /// being returned.
    pub fn start(&self) -> Result<(), EngineError> {
        self.relay.set_status(Some(STATUS_DOWNLOADING));
        let hooks = self.hooks();
        let result = self.engine.borrow_mut().load(hooks);
        if let Err(err) = &result {
            log::error!("[fiddle-worker] Engine load failed: {}", err);
            self.report_failure(err.clone());
        }
        result
    }

    /// Handle one decoded page → worker message
    pub fn handle_request(&self, request: Request) {
        match request {
            Request::ShellExec(command) => self.execute(command.as_deref()),
        }
    }

    /// Decode and handle one JSON message. Unknown or malformed messages
    /// are logged and otherwise ignored.
    pub fn handle_json(&self, json: &str) {
        match decode_request(json) {
            Ok(request) => self.handle_request(request),
            Err(e) if e.is_unknown_type() => {
                log::warn!("[fiddle-worker] Unknown fiddle-worker message type: {}", json);
            }
            Err(e) => log::warn!("[fiddle-worker] Dropping message: {}", e),
        }
    }

    /// Run one command, bracketed by `working` start/end messages
    pub fn execute(&self, command: Option<&str>) {
        match self.relay.state() {
            HostState::Dead => {
                self.relay.stderr(MSG_DEAD);
                return;
            }
            HostState::Loading => {
                self.relay.stderr(MSG_LOADING);
                return;
            }
            HostState::Idle | HostState::Busy => {}
        }

        let outcome = {
            let flight = Flight::begin(&self.relay);
            if flight.acquired {
                let result = self.engine.borrow_mut().exec(command);
                Some(result)
            } else {
                self.relay.stderr(MSG_CONCURRENT);
                None
            }
        };

        if let Some(Err(err)) = outcome {
            self.report_failure(err);
        }
    }

    /// Report an engine failure raised outside of normal output.
    ///
    /// A fatal exit moves the host to `Dead` and tells the page; any failure
    /// posts the exception status and diverts further status updates to the
    /// log. Once dead, failures are only logged.
    pub fn report_failure(&self, err: EngineError) {
        if self.is_dead() {
            log::error!("[fiddle-worker] After exit: {}", err);
            return;
        }
        if err.is_fatal() {
            self.relay.set_state(HostState::Dead);
            self.relay
                .stderr(&format!("{} {}", FATAL_PREFIX, err.message()));
            self.relay.stderr(MSG_RESTART_HINT);
            let status = match &err {
                EngineError::Exit { status, .. } => Some(*status),
                _ => None,
            };
            self.relay.post(Response::Error(TerminationDetails {
                name: err.name().to_string(),
                message: err.message().to_string(),
                status,
            }));
        }
        log::error!("[fiddle-worker] {}", err);
        self.relay.set_status(Some(STATUS_EXCEPTION));
        self.relay.degrade();
    }
}

/// Working bracket around one command.
///
/// Posts `working:start` on creation and `working:end` on drop, including
/// during unwinding. Only the bracket that moved the host to `Busy` moves it
/// back.
struct Flight<'a, O: Outbox> {
    relay: &'a Relay<O>,
    acquired: bool,
}

impl<'a, O: Outbox> Flight<'a, O> {
    fn begin(relay: &'a Relay<O>) -> Self {
        relay.working(WorkPhase::Start);
        let acquired = relay.state() == HostState::Idle;
        if acquired {
            relay.set_state(HostState::Busy);
        }
        Self { relay, acquired }
    }
}

impl<O: Outbox> Drop for Flight<'_, O> {
    fn drop(&mut self) {
        if self.acquired && self.relay.state() == HostState::Busy {
            self.relay.set_state(HostState::Idle);
        }
        self.relay.working(WorkPhase::End);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbox::RecordingOutbox;
    use fiddle_engine_mock::{Reply, ScriptedEngine};

    type TestHost = WorkerHost<ScriptedEngine, RecordingOutbox>;

    fn loaded_host(engine: ScriptedEngine) -> (TestHost, RecordingOutbox) {
        let outbox = RecordingOutbox::new();
        let host = WorkerHost::new(engine, outbox.clone());
        host.start().unwrap();
        outbox.drain();
        (host, outbox)
    }

    #[test]
    fn test_execute_brackets_output() {
        let engine = ScriptedEngine::new()
            .with_banner(&[])
            .with_reply("select 1;", Reply::lines(&["1"]));
        let (host, outbox) = loaded_host(engine);

        host.execute(Some("select 1;"));
        assert_eq!(
            outbox.messages(),
            vec![
                Response::Working(WorkPhase::Start),
                Response::Stdout("1".into()),
                Response::Working(WorkPhase::End),
            ]
        );
        assert_eq!(host.state(), HostState::Idle);
    }

    #[test]
    fn test_execute_while_loading_is_refused() {
        let engine = ScriptedEngine::new().with_manual_load();
        let log = engine.call_log();
        let outbox = RecordingOutbox::new();
        let host = WorkerHost::new(engine, outbox.clone());
        host.start().unwrap();
        outbox.drain();

        host.execute(Some("select 1;"));
        assert_eq!(outbox.messages(), vec![Response::Stderr(MSG_LOADING.into())]);
        assert_eq!(log.count(), 0);
    }

    #[test]
    fn test_non_fatal_exception_keeps_session() {
        let engine = ScriptedEngine::new()
            .with_banner(&[])
            .with_reply("boom", Reply::default().failing(EngineError::Exception("oops".into())));
        let (host, outbox) = loaded_host(engine);

        host.execute(Some("boom"));
        assert_eq!(host.state(), HostState::Idle);
        let messages = outbox.drain();
        assert_eq!(messages[1], Response::Working(WorkPhase::End));
        assert_eq!(messages.last(), Some(&Response::status(6, Some(STATUS_EXCEPTION))));
        assert!(!messages.iter().any(|m| matches!(m, Response::Error(_))));
    }
}
