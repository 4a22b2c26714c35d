//! Page controller
//!
//! [`FiddleController`] owns the UI state ([`UiContext`]), the handler
//! registry and the channel to the worker. Inbound worker messages are
//! dispatched to handlers that mutate the context; the browser layer then
//! renders the context onto the DOM.
//!
//! The controller is an ordinary value. Nothing is global, so tests build as
//! many as they like.

use std::cell::RefCell;
use std::rc::Rc;

use fiddle_protocol::{decode_response, MessageKind, ModuleEvent, Request, Response, WorkPhase};

use crate::config::FiddleConfig;
use crate::constants::*;
use crate::output::OutputBuffer;
use crate::registry::{Flow, HandlerRegistry};
use crate::samples;
use crate::view::{BusyIndicator, ProgressIndicator, StatusLine};

/// Outbound half of the page/worker channel
pub trait WorkerPort {
    fn post(&mut self, request: Request);
}

/// Port that records requests instead of sending them
#[derive(Clone, Default)]
pub struct RecordingPort {
    sent: Rc<RefCell<Vec<Request>>>,
}

impl RecordingPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests posted so far
    pub fn sent(&self) -> Vec<Request> {
        self.sent.borrow().clone()
    }

    /// Take every recorded request
    pub fn drain(&self) -> Vec<Request> {
        core::mem::take(&mut *self.sent.borrow_mut())
    }
}

impl WorkerPort for RecordingPort {
    fn post(&mut self, request: Request) {
        self.sent.borrow_mut().push(request);
    }
}

/// Everything handlers may change
#[derive(Clone, Debug)]
pub struct UiContext {
    pub config: FiddleConfig,
    pub output: OutputBuffer,
    pub progress: ProgressIndicator,
    pub status: StatusLine,
    pub busy: BusyIndicator,
    /// Contents of the input area
    pub input: String,
    /// Set once the engine reported ready; initially hidden elements show
    pub loaded: bool,
    boot_pending: bool,
}

impl UiContext {
    pub fn new(config: FiddleConfig, title: &str, exec_label: &str) -> Self {
        Self {
            config,
            output: OutputBuffer::new(),
            progress: ProgressIndicator::default(),
            status: StatusLine::default(),
            busy: BusyIndicator::new(title, exec_label),
            input: String::new(),
            loaded: false,
            boot_pending: false,
        }
    }

    /// Append one output line made of `parts` joined by a space
    pub fn echo<S: AsRef<str>>(&mut self, parts: &[S]) {
        self.output.echo(parts);
        if self.config.echo_to_console {
            let line = parts
                .iter()
                .map(|p| p.as_ref())
                .collect::<Vec<_>>()
                .join(" ");
            log::info!("{}", line);
        }
    }

    /// Output relay: `None` clears the output, anything else is one line
    pub fn relay_output(&mut self, text: Option<&str>) {
        match text {
            Some(text) => self.echo(&[text]),
            None => self.output.clear(),
        }
    }

    /// Whether the view should scroll the output to the bottom now
    pub fn take_scroll(&mut self) -> bool {
        self.output.take_appended() && self.config.auto_scroll_output
    }
}

/// Page-side controller
pub struct FiddleController<P: WorkerPort> {
    port: P,
    ctx: UiContext,
    registry: HandlerRegistry<UiContext>,
}

impl<P: WorkerPort> FiddleController<P> {
    /// Create a controller with the default handlers registered.
    ///
    /// `title` and `exec_label` are the page title and execute-control
    /// label to restore when a command finishes.
    pub fn new(port: P, config: FiddleConfig, title: &str, exec_label: &str) -> Self {
        let mut controller = Self {
            port,
            ctx: UiContext::new(config, title, exec_label),
            registry: HandlerRegistry::new(),
        };
        controller.register_defaults();
        controller
    }

    fn register_defaults(&mut self) {
        self.registry
            .add([MessageKind::Stdout, MessageKind::Stderr], |ctx, msg| {
                ctx.relay_output(msg.output_text());
                Flow::Continue
            })
            .add([MessageKind::Module], |ctx, msg| {
                match msg {
                    Response::Module(ModuleEvent::Status(update)) => {
                        ctx.progress.apply(update);
                        ctx.status.apply(update);
                    }
                    Response::Module(ModuleEvent::Unrecognized(kind)) => {
                        log::warn!("[fiddle-ui] Unexpected module message type: {}", kind);
                    }
                    _ => {}
                }
                Flow::Continue
            })
            .add([MessageKind::Working], |ctx, msg| {
                if let Response::Working(WorkPhase::End) = msg {
                    ctx.busy.end();
                }
                Flow::Continue
            })
            .add([MessageKind::Error], |ctx, msg| {
                if let Response::Error(details) = msg {
                    log::error!("[fiddle-ui] Engine terminated: {}: {}", details.name, details.message);
                    ctx.status
                        .show(&format!("{} {}", FATAL_STATUS_PREFIX, details.message));
                }
                Flow::Continue
            })
            .add([MessageKind::FiddleReady], |ctx, _| {
                ctx.boot_pending = true;
                Flow::Unregister
            });
    }

    #[inline]
    pub fn context(&self) -> &UiContext {
        &self.ctx
    }

    #[inline]
    pub fn context_mut(&mut self) -> &mut UiContext {
        &mut self.ctx
    }

    /// Registry access for extra handlers
    pub fn registry_mut(&mut self) -> &mut HandlerRegistry<UiContext> {
        &mut self.registry
    }

    #[inline]
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Dispatch one decoded worker message.
    ///
    /// Returns whether any handler ran.
    pub fn receive(&mut self, message: &Response) -> bool {
        let handled = self.registry.dispatch(&mut self.ctx, message);
        if core::mem::take(&mut self.ctx.boot_pending) {
            self.on_loaded();
        }
        handled
    }

    /// Decode and dispatch one JSON worker message. Undecodable messages
    /// are logged and dropped.
    pub fn receive_json(&mut self, json: &str) -> bool {
        match decode_response(json) {
            Ok(message) => self.receive(&message),
            Err(e) if e.is_unknown_type() => {
                log::warn!("[fiddle-ui] No handlers found for message: {}", json);
                false
            }
            Err(e) => {
                log::warn!("[fiddle-ui] Dropping message: {}", e);
                false
            }
        }
    }

    /// Send shell text to the worker. `None` primes the engine.
    pub fn exec(&mut self, command: Option<&str>) {
        if self.ctx.config.auto_clear_output {
            self.ctx.output.defer_clear();
        }
        self.ctx.busy.begin();
        self.port
            .post(Request::ShellExec(command.map(str::to_string)));
    }

    /// Execute control: run the trimmed input unless it is empty.
    ///
    /// Returns whether anything was sent.
    pub fn submit(&mut self) -> bool {
        let command = self.ctx.input.trim().to_string();
        if command.is_empty() {
            return false;
        }
        self.exec(Some(&command));
        true
    }

    pub fn set_input(&mut self, text: &str) {
        self.ctx.input = text.to_string();
    }

    pub fn clear_input(&mut self) {
        self.ctx.input.clear();
    }

    pub fn clear_output(&mut self) {
        self.ctx.output.clear();
    }

    /// Replace the input with the named example. Returns `false` for an
    /// unknown name.
    pub fn load_example(&mut self, name: &str) -> bool {
        match samples::find(name) {
            Some(example) => {
                self.ctx.input = example.as_input();
                true
            }
            None => false,
        }
    }

    /// One-time setup after the engine reported ready
    fn on_loaded(&mut self) {
        log::debug!("[fiddle-ui] Engine ready");
        self.ctx.loaded = true;
        self.ctx.relay_output(None);
        self.exec(None);
        self.ctx.echo(BANNER);
    }
}
