//! Centralized constants for the page controller

/// Prefix added to the page title while a command is in flight
pub const WORKING_TITLE_PREFIX: &str = "[working...] ";

/// Banner echoed once the engine is ready
pub const BANNER: &[&str] = &[
    "This experimental app is provided in the hope that it",
    "may prove interesting or useful but is not an officially",
    "supported deliverable of the sqlite project. It is subject to",
    "any number of changes or outright removal at any time.\n",
];

/// Prefix of the status line after the engine exits
pub const FATAL_STATUS_PREFIX: &str = "Fatal error:";

/// Debounce delay when none is given, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: f64 = 500.0;

/// Debounce delay for window resize, in milliseconds
pub const RESIZE_DEBOUNCE_MS: f64 = 250.0;

/// Smallest height given to an app view pane, in pixels
pub const MIN_PANE_HEIGHT: f64 = 100.0;

/// Subtracted from every pane height to keep the body from scrolling
pub const PANE_HEIGHT_FUDGE: &str = "2em";

/// Key code of Enter
pub const KEY_ENTER: u32 = 13;

/// CSS class toggled by `data-csstgt` checkboxes without `data-cssclass`
pub const DEFAULT_TOGGLE_CLASS: &str = "error";

/// Label of the placeholder entry in the examples list
pub const EXAMPLES_PLACEHOLDER: &str = "Examples (replaces input!)";
