//! Script names and page selectors

/// Worker bootstrap script, relative to the page
pub const WORKER_SCRIPT: &str = "fiddle-worker.js";

/// Emscripten-generated engine script, relative to the worker
pub const ENGINE_SCRIPT: &str = "fiddle-module.js";

/// Global the engine script reads its configuration from
pub const MODULE_GLOBAL: &str = "Module";

/// Exported engine entry point
pub const ENGINE_EXEC_SYMBOL: &str = "fiddle_exec";

// Page elements
pub const SEL_OUTPUT: &str = "#output";
pub const SEL_INPUT: &str = "#input";
pub const SEL_EXEC_BUTTON: &str = "#btn-shell-exec";
pub const SEL_CLEAR_INPUT: &str = "#btn-clear";
pub const SEL_CLEAR_OUTPUT: &str = "#btn-clear-output";
pub const SEL_STATUS: &str = "#module-status";
pub const SEL_PROGRESS: &str = "#module-progress";
pub const SEL_SPINNER: &str = "#module-spinner";
pub const SEL_EXAMPLES: &str = "#select-examples";
pub const SEL_CSS_TOGGLES: &str = "input[type=checkbox][data-csstgt]";
pub const SEL_CONFIG_TOGGLES: &str = "input[type=checkbox][data-config]";
pub const SEL_COMMAND_BUTTONS: &str = "button[data-cmd]";
pub const SEL_APP_VIEWS: &str = ".app-view";
pub const SEL_CHROME: [&str; 2] = ["body > header", "body > footer"];

/// Class removed from every element once the engine is ready
pub const CLASS_INITIALLY_HIDDEN: &str = "initially-hidden";

/// Class hiding the status line
pub const CLASS_HIDDEN: &str = "hidden";
