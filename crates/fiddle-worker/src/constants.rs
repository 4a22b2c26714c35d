//! Fixed status and rejection strings posted by the worker host

/// First status posted, before the engine module is requested
pub const STATUS_DOWNLOADING: &str = "Downloading...";

/// Status posted once every run dependency has resolved
pub const STATUS_DOWNLOADS_COMPLETE: &str = "All downloads complete.";

/// Status posted after an engine call throws; the last one the page sees
pub const STATUS_EXCEPTION: &str = "Exception thrown, see JavaScript console";

/// stderr line for a command arriving while another is in flight
pub const MSG_CONCURRENT: &str = "Cannot run multiple commands concurrently.";

/// stderr line for a command arriving after the engine exited
pub const MSG_DEAD: &str = "shell module has exit()ed. Cannot run SQL.";

/// stderr line for a command arriving before the engine finished loading
pub const MSG_LOADING: &str = "Module is still loading. Cannot run SQL.";

/// Prefix of the stderr line reporting a fatal exit
pub const FATAL_PREFIX: &str = "FATAL ERROR:";

/// stderr line following a fatal exit
pub const MSG_RESTART_HINT: &str = "Restarting the app requires reloading the page.";

/// Status text while run dependencies are outstanding
pub fn preparing_status(done: u32, total: u32) -> String {
    format!("Preparing... ({}/{})", done, total)
}
