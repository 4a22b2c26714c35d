//! Page-side controller for the SQL fiddle
//!
//! Pure Rust core of the page: it turns user intent into `shellExec`
//! requests and worker messages into view state, without touching the DOM.
//! `fiddle-web` binds it to the browser.
//!
//! # Modules
//!
//! - [`controller`]: the controller, its context and the worker port
//! - [`registry`]: message handler registry
//! - [`output`], [`view`]: output buffer and indicator state
//! - [`config`]: checkbox-bound options
//! - [`layout`], [`debounce`]: pane sizing on resize
//! - [`samples`]: example commands
//! - [`input`]: key chords

pub mod config;
pub mod constants;
pub mod controller;
pub mod debounce;
pub mod input;
pub mod layout;
pub mod output;
pub mod registry;
pub mod samples;
pub mod view;

pub use config::{ConfigError, FiddleConfig};
pub use controller::{FiddleController, RecordingPort, UiContext, WorkerPort};
pub use debounce::Debouncer;
pub use layout::{effective_height, pane_css, pane_height, Bounds, LayoutNode};
pub use output::OutputBuffer;
pub use registry::{Flow, Handler, HandlerRegistry};
pub use samples::{Example, EXAMPLES};
pub use view::{BusyIndicator, ProgressIndicator, StatusLine};
