//! Wire tags and fixed protocol strings
//!
//! Tags must match the JavaScript bootstrap scripts under `web/`.

// =============================================================================
// Page → Worker
// =============================================================================

/// Run text as if entered at the engine's interactive shell
pub const TAG_SHELL_EXEC: &str = "shellExec";

// =============================================================================
// Worker → Page
// =============================================================================

/// One line of standard output from the engine
pub const TAG_STDOUT: &str = "stdout";

/// One line of error output from the engine or the host
pub const TAG_STDERR: &str = "stderr";

/// Module lifecycle event (currently only load status)
pub const TAG_MODULE: &str = "module";

/// Working bracket around one command
pub const TAG_WORKING: &str = "working";

/// Unrecoverable engine termination
pub const TAG_ERROR: &str = "error";

/// Engine finished loading and can accept commands
pub const TAG_FIDDLE_READY: &str = "fiddle-ready";

/// Sub-tag of a `module` message carrying a status update
pub const MODULE_STATUS: &str = "status";

/// Working bracket payloads
pub const WORKING_START: &str = "start";
pub const WORKING_END: &str = "end";
