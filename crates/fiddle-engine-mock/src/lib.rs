//! Scripted engine for testing the SQL fiddle
//!
//! This provides an implementation of the [`Engine`] trait that can be used
//! to test the worker host and the page controller without a browser or the
//! real engine module.
//!
//! - Load progress is replayed from a script of [`LoadStep`]s, either during
//!   [`Engine::load`] or later through a [`HooksHandle`] (to simulate the
//!   browser's asynchronous load).
//! - Commands are answered from canned [`Reply`]s.
//! - Every call to [`Engine::exec`] is recorded in a shared [`CallLog`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use fiddle_engine::{Engine, EngineError, EngineHooks};

/// Banner printed on the first execution, like the real shell
pub const DEFAULT_BANNER: &[&str] = &[
    "SQLite version 3.39.0 2022-06-25 14:57:57",
    "Enter \".help\" for usage hints.",
    "Connected to a transient in-memory database.",
];

/// One step of a scripted module load
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadStep {
    /// `set_status(text)`
    Status(Option<String>),
    /// `monitor_run_dependencies(left)`
    Dependencies(u32),
    /// `runtime_initialized()`
    Initialized,
}

impl LoadStep {
    pub fn status(text: &str) -> Self {
        LoadStep::Status(Some(text.to_string()))
    }

    /// Load sequence in the order the browser's module loader produces it:
    /// dependencies resolve, the runtime initializes, then the final empty
    /// status is posted.
    pub fn browser_sequence() -> Vec<LoadStep> {
        vec![
            LoadStep::Dependencies(1),
            LoadStep::Dependencies(0),
            LoadStep::status("Running..."),
            LoadStep::Initialized,
            LoadStep::Status(None),
        ]
    }

    fn apply(&self, hooks: &dyn EngineHooks) {
        match self {
            LoadStep::Status(text) => hooks.set_status(text.as_deref()),
            LoadStep::Dependencies(left) => hooks.monitor_run_dependencies(*left),
            LoadStep::Initialized => hooks.runtime_initialized(),
        }
    }
}

/// Canned answer to one command
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reply {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    /// Error returned after the output lines have been printed
    pub outcome: Option<EngineError>,
}

impl Reply {
    pub fn lines(lines: &[&str]) -> Self {
        Self {
            stdout: lines.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn error_lines(lines: &[&str]) -> Self {
        Self {
            stderr: lines.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn failing(mut self, err: EngineError) -> Self {
        self.outcome = Some(err);
        self
    }
}

/// Shared record of every `exec` call the engine received
#[derive(Clone, Debug, Default)]
pub struct CallLog(Rc<RefCell<Vec<Option<String>>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<Option<String>> {
        self.0.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.0.borrow().len()
    }

    fn push(&self, command: Option<&str>) {
        self.0.borrow_mut().push(command.map(str::to_string));
    }
}

/// Handle for raising load hooks after [`Engine::load`] returned
#[derive(Clone, Default)]
pub struct HooksHandle(Rc<RefCell<Option<Rc<dyn EngineHooks>>>>);

impl HooksHandle {
    /// Whether `load` has been called
    pub fn is_attached(&self) -> bool {
        self.0.borrow().is_some()
    }

    /// Replay a load step; ignored until `load` has been called
    pub fn step(&self, step: LoadStep) {
        let hooks = self.0.borrow().clone();
        if let Some(hooks) = hooks {
            step.apply(hooks.as_ref());
        }
    }

    /// Replay several load steps in order
    pub fn replay(&self, steps: &[LoadStep]) {
        for step in steps {
            self.step(step.clone());
        }
    }
}

type ExecHook = Box<dyn FnMut(Option<&str>)>;

/// Scripted engine
pub struct ScriptedEngine {
    hooks: HooksHandle,
    load_script: Vec<LoadStep>,
    defer_load: bool,
    load_error: Option<EngineError>,
    banner: Vec<String>,
    initialized: bool,
    exited: bool,
    replies: BTreeMap<String, Reply>,
    log: CallLog,
    on_exec: Option<ExecHook>,
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedEngine {
    /// Engine that replays the browser load sequence during `load`
    pub fn new() -> Self {
        Self {
            hooks: HooksHandle::default(),
            load_script: LoadStep::browser_sequence(),
            defer_load: false,
            load_error: None,
            banner: DEFAULT_BANNER.iter().map(|s| s.to_string()).collect(),
            initialized: false,
            exited: false,
            replies: BTreeMap::new(),
            log: CallLog::default(),
            on_exec: None,
        }
    }

    /// Replace the load script
    pub fn with_load_script(mut self, steps: Vec<LoadStep>) -> Self {
        self.load_script = steps;
        self
    }

    /// Do not replay anything during `load`; drive it through [`Self::hooks`]
    pub fn with_manual_load(mut self) -> Self {
        self.defer_load = true;
        self
    }

    /// Make `load` fail outright
    pub fn with_load_error(mut self, err: EngineError) -> Self {
        self.load_error = Some(err);
        self
    }

    /// Replace the first-run banner (empty for none)
    pub fn with_banner(mut self, lines: &[&str]) -> Self {
        self.banner = lines.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Answer `command` with `reply`
    pub fn with_reply(mut self, command: &str, reply: Reply) -> Self {
        self.replies.insert(command.to_string(), reply);
        self
    }

    /// Run `hook` inside every `exec`, after the call is logged and before
    /// the reply is printed. Used to simulate re-entrant requests.
    pub fn on_exec(mut self, hook: impl FnMut(Option<&str>) + 'static) -> Self {
        self.on_exec = Some(Box::new(hook));
        self
    }

    /// Shared call log
    pub fn call_log(&self) -> CallLog {
        self.log.clone()
    }

    /// Handle for raising load hooks later
    pub fn hooks(&self) -> HooksHandle {
        self.hooks.clone()
    }

    fn attached(&self) -> Result<Rc<dyn EngineHooks>, EngineError> {
        self.hooks
            .0
            .borrow()
            .clone()
            .ok_or_else(|| EngineError::Unavailable("engine not loaded".into()))
    }
}

impl Engine for ScriptedEngine {
    fn load(&mut self, hooks: Rc<dyn EngineHooks>) -> Result<(), EngineError> {
        if let Some(err) = self.load_error.clone() {
            return Err(err);
        }
        *self.hooks.0.borrow_mut() = Some(hooks.clone());
        if !self.defer_load {
            for step in &self.load_script {
                step.apply(hooks.as_ref());
            }
        }
        Ok(())
    }

    fn exec(&mut self, command: Option<&str>) -> Result<(), EngineError> {
        let hooks = self.attached()?;
        self.log.push(command);
        if self.exited {
            return Err(EngineError::exit(1));
        }
        if !self.initialized {
            self.initialized = true;
            for line in &self.banner {
                hooks.print(line);
            }
        }
        if let Some(hook) = self.on_exec.as_mut() {
            hook(command);
        }

        let Some(reply) = command.and_then(|c| self.replies.get(c)) else {
            return Ok(());
        };
        for line in &reply.stdout {
            hooks.print(line);
        }
        for line in &reply.stderr {
            hooks.print_err(line);
        }
        match reply.outcome.clone() {
            Some(err) => {
                if err.is_fatal() {
                    self.exited = true;
                }
                Err(err)
            }
            None => Ok(()),
        }
    }
}
