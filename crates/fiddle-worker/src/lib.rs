//! Worker Host for the SQL Fiddle
//!
//! This crate runs inside the Web Worker. It owns the database engine,
//! relays its output and load progress to the page, and serves `shellExec`
//! requests strictly one at a time.
//!
//! ## Module Structure
//!
//! - `host` - [`WorkerHost`]: request handling, working bracket, fatal exit
//! - `relay` - [`Relay`]: the [`fiddle_engine::EngineHooks`] given to the engine
//! - `status` - [`StatusTracker`]: status numbering and deduplication
//! - `outbox` - [`Outbox`]: where outbound messages go
//! - `constants` - fixed status and rejection strings
//!
//! ## Architecture
//!
//! The host is platform-free. `fiddle-web` supplies an [`Outbox`] that calls
//! `postMessage` and an [`fiddle_engine::Engine`] backed by the Emscripten
//! module; tests use [`RecordingOutbox`] and `fiddle-engine-mock`.

pub mod constants;
mod host;
mod outbox;
mod relay;
mod status;

pub use host::WorkerHost;
pub use outbox::{Outbox, RecordingOutbox};
pub use relay::{HostState, Relay};
pub use status::StatusTracker;
