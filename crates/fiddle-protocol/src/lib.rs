//! Message Protocol for the SQL Fiddle
//!
//! This crate is the single source of truth for everything that crosses the
//! boundary between the page (main thread) and the worker that hosts the
//! database engine.
//!
//! Every message has the shape `{ type: string, data: <type-dependent> }`.
//! The set of `type` tags is fixed per direction:
//!
//! | Direction     | Tags                                                        |
//! |---------------|-------------------------------------------------------------|
//! | Page → Worker | `shellExec`                                                 |
//! | Worker → Page | `stdout`, `stderr`, `module`, `working`, `error`, `fiddle-ready` |
//!
//! Rust code never deals with the raw shape. Outbound messages are built from
//! [`Request`] / [`Response`] and encoded with [`encode_request`] /
//! [`encode_response`]; inbound JSON is decoded with [`decode_request`] /
//! [`decode_response`]. Unknown tags decode to
//! [`ProtocolError::UnknownType`] so receivers can warn and carry on.
//!
//! # Usage
//!
//! ```rust
//! use fiddle_protocol::{decode_response, encode_response, Response, WorkPhase};
//!
//! let json = encode_response(&Response::Working(WorkPhase::Start)).unwrap();
//! assert_eq!(json, r#"{"type":"working","data":"start"}"#);
//! assert_eq!(decode_response(&json).unwrap(), Response::Working(WorkPhase::Start));
//! ```

pub mod constants;
mod envelope;
mod error;
mod message;

pub use envelope::{decode_request, decode_response, encode_request, encode_response};
pub use error::ProtocolError;
pub use message::{
    MessageKind, ModuleEvent, Request, Response, StatusUpdate, TerminationDetails, WorkPhase,
};
