//! Browser boundary errors

use core::fmt;

use fiddle_engine::EngineError;
use fiddle_protocol::ProtocolError;
use wasm_bindgen::JsValue;

/// Errors raised while binding to the browser
#[derive(Clone, Debug, PartialEq)]
pub enum WebError {
    /// A JavaScript call threw
    Js(String),
    /// `window` or `document` is unavailable
    NoWindow,
    /// Not running inside a dedicated worker
    NotInWorker,
    /// A required page element is missing or has the wrong type
    MissingElement(String),
    /// Message could not be encoded
    Protocol(ProtocolError),
    /// Engine failed to load
    Engine(EngineError),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::Js(msg) => write!(f, "JavaScript error: {}", msg),
            WebError::NoWindow => write!(f, "No window or document"),
            WebError::NotInWorker => write!(f, "Not running in a dedicated worker"),
            WebError::MissingElement(selector) => write!(f, "Missing page element: {}", selector),
            WebError::Protocol(e) => write!(f, "Protocol error: {}", e),
            WebError::Engine(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for WebError {}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        WebError::Js(describe(&value))
    }
}

impl From<ProtocolError> for WebError {
    fn from(e: ProtocolError) -> Self {
        WebError::Protocol(e)
    }
}

impl From<EngineError> for WebError {
    fn from(e: EngineError) -> Self {
        WebError::Engine(e)
    }
}

impl From<WebError> for JsValue {
    fn from(e: WebError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

/// Best-effort text for a thrown JavaScript value
pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
