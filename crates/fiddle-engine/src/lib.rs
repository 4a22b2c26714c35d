//! Engine Contract for the SQL Fiddle
//!
//! The database engine is a precompiled module that the worker host treats as
//! an opaque collaborator. This crate defines the only surface the host sees:
//!
//! - [`Engine`]: load once, then execute shell text synchronously
//! - [`EngineHooks`]: callbacks the engine raises while loading and executing
//! - [`EngineError`]: how an engine call can fail
//!
//! # Platform Implementations
//!
//! - **Browser**: an Emscripten module loaded into the worker with
//!   `importScripts`, executing through its exported `fiddle_exec`
//! - **Tests**: `fiddle-engine-mock`, a scripted in-memory engine
//!
//! Hooks are handed to the engine once, at load time. Output produced by
//! [`Engine::exec`] flows through [`EngineHooks::print`] and
//! [`EngineHooks::print_err`] before `exec` returns, one call per line.

use core::fmt;
use std::rc::Rc;

/// Callbacks raised by the engine.
///
/// All methods take `&self`: they are invoked re-entrantly from inside
/// [`Engine::exec`] and [`Engine::load`], while the host is still holding
/// the engine.
pub trait EngineHooks {
    /// One line of standard output
    fn print(&self, line: &str);

    /// One line of error output
    fn print_err(&self, line: &str);

    /// Free-text load progress. `None` (or empty) marks the end of loading.
    fn set_status(&self, text: Option<&str>);

    /// Number of run dependencies still outstanding during load
    fn monitor_run_dependencies(&self, left: u32);

    /// The engine runtime finished initializing and can accept commands
    fn runtime_initialized(&self);
}

/// The database engine module
pub trait Engine {
    /// Begin loading the engine.
    ///
    /// May complete synchronously (tests) or asynchronously (browser); in
    /// both cases progress and completion are reported through `hooks`.
    ///
    /// # Returns
    /// * `Ok(())` - Load started (or finished)
    /// * `Err(EngineError)` - The module could not be loaded at all
    fn load(&mut self, hooks: Rc<dyn EngineHooks>) -> Result<(), EngineError>;

    /// Execute shell text as if typed at the engine's interactive prompt.
    ///
    /// `None` executes nothing but still initializes the shell on first use
    /// (which typically prints a banner).
    ///
    /// # Returns
    /// * `Ok(())` - Command ran; SQL errors were already reported via hooks
    /// * `Err(EngineError::Exit)` - The engine process exited; it is unusable
    /// * `Err(EngineError::Exception)` - The call threw, engine may still work
    fn exec(&mut self, command: Option<&str>) -> Result<(), EngineError>;
}

/// Engine failure
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// The engine runtime signalled an unrecoverable exit
    Exit { status: i32, message: String },
    /// Any other thrown error
    Exception(String),
    /// The module or its entry point is missing
    Unavailable(String),
}

impl EngineError {
    /// Runtime name of the error, as reported to the page
    pub const EXIT_STATUS_NAME: &'static str = "ExitStatus";

    /// Build an exit error with the runtime's standard message
    pub fn exit(status: i32) -> Self {
        EngineError::Exit {
            status,
            message: format!("Program terminated with exit({})", status),
        }
    }

    /// Whether this failure leaves the engine permanently unusable
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::Exit { .. })
    }

    /// Error name in the runtime's vocabulary
    pub fn name(&self) -> &'static str {
        match self {
            EngineError::Exit { .. } => Self::EXIT_STATUS_NAME,
            EngineError::Exception(_) => "Error",
            EngineError::Unavailable(_) => "ModuleUnavailable",
        }
    }

    /// Human-readable message without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            EngineError::Exit { message, .. } => message,
            EngineError::Exception(msg) | EngineError::Unavailable(msg) => msg,
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Exit { status, message } => {
                write!(f, "Engine exited (status {}): {}", status, message)
            }
            EngineError::Exception(msg) => write!(f, "Engine exception: {}", msg),
            EngineError::Unavailable(msg) => write!(f, "Engine unavailable: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}
