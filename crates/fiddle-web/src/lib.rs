//! Browser bindings for the SQL fiddle
//!
//! One wasm module serves both sides of the page/worker split:
//!
//! - [`FiddleApp`] runs on the page. It starts the worker, drives the
//!   `fiddle-ui` controller and renders it onto the DOM.
//! - [`FiddleWorker`] runs in the worker. It hosts the Emscripten-built
//!   engine module through `fiddle-worker`.
//!
//! Logging goes through the `log` facade, written to the browser console
//! by `console_log`.

pub mod constants;
mod engine;
mod error;
mod page;
mod worker;

pub use engine::{engine_error, JsEngine};
pub use error::WebError;
pub use page::{FiddleApp, PagePort};
pub use worker::{FiddleWorker, PostMessageOutbox};
