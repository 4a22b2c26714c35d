//! Browser boundary tests
//!
//! Run with `wasm-pack test --headless --firefox crates/fiddle-web`.

#![cfg(target_arch = "wasm32")]

use fiddle_engine::EngineError;
use fiddle_web::{engine_error, WebError};
use js_sys::{Object, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn thrown(name: &str, message: &str, status: Option<f64>) -> JsValue {
    let err = Object::new();
    Reflect::set(&err, &"name".into(), &name.into()).unwrap();
    Reflect::set(&err, &"message".into(), &message.into()).unwrap();
    if let Some(status) = status {
        Reflect::set(&err, &"status".into(), &status.into()).unwrap();
    }
    err.into()
}

#[wasm_bindgen_test]
fn test_exit_status_maps_to_exit() {
    let err = engine_error(&thrown("ExitStatus", "Program terminated with exit(1)", Some(1.0)));
    assert_eq!(err, EngineError::exit(1));
}

#[wasm_bindgen_test]
fn test_js_error_maps_to_exception() {
    let err: JsValue = js_sys::Error::new("boom").into();
    assert_eq!(engine_error(&err), EngineError::Exception("boom".into()));
}

#[wasm_bindgen_test]
fn test_thrown_string_keeps_text() {
    let err = engine_error(&JsValue::from_str("plain text"));
    assert_eq!(err, EngineError::Exception("plain text".into()));
}

#[wasm_bindgen_test]
fn test_web_error_to_js() {
    let value: JsValue = WebError::MissingElement("#output".into()).into();
    assert_eq!(value.as_string().as_deref(), Some("Missing page element: #output"));
}
