//! Worker-side export
//!
//! The worker bootstrap script constructs a [`FiddleWorker`], forwards
//! `onmessage` data to [`FiddleWorker::handle_message`] and uncaught errors
//! to [`FiddleWorker::on_error`], then calls [`FiddleWorker::start`].

use fiddle_protocol::{encode_response, Response};
use fiddle_worker::{Outbox, WorkerHost};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::DedicatedWorkerGlobalScope;

use crate::constants::ENGINE_SCRIPT;
use crate::engine::{engine_error, JsEngine};
use crate::error::WebError;

/// Posts worker → page messages on the worker global scope
pub struct PostMessageOutbox {
    scope: DedicatedWorkerGlobalScope,
}

impl PostMessageOutbox {
    pub fn new(scope: DedicatedWorkerGlobalScope) -> Self {
        Self { scope }
    }

    fn send(&self, message: &Response) -> Result<(), WebError> {
        let json = encode_response(message)?;
        let value = js_sys::JSON::parse(&json)?;
        self.scope.post_message(&value)?;
        Ok(())
    }
}

impl Outbox for PostMessageOutbox {
    fn post(&self, message: Response) {
        if let Err(e) = self.send(&message) {
            log::error!("[fiddle-worker] Failed to post {}: {}", message.kind(), e);
        }
    }
}

/// Worker entry point
#[wasm_bindgen]
pub struct FiddleWorker {
    host: WorkerHost<JsEngine, PostMessageOutbox>,
}

#[wasm_bindgen]
impl FiddleWorker {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<FiddleWorker, JsValue> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let scope = js_sys::global()
            .dyn_into::<DedicatedWorkerGlobalScope>()
            .map_err(|_| WebError::NotInWorker)?;
        Ok(Self {
            host: WorkerHost::new(JsEngine::new(ENGINE_SCRIPT), PostMessageOutbox::new(scope)),
        })
    }

    /// Start loading the engine
    pub fn start(&self) -> Result<(), JsValue> {
        self.host.start().map_err(|e| WebError::from(e).into())
    }

    /// Handle one `onmessage` payload
    pub fn handle_message(&self, data: JsValue) {
        match js_sys::JSON::stringify(&data) {
            Ok(json) => self.host.handle_json(&String::from(json)),
            Err(e) => log::warn!("[fiddle-worker] Unserializable message: {}", WebError::from(e)),
        }
    }

    /// Handle an uncaught error raised in the worker
    pub fn on_error(&self, error: JsValue) {
        self.host.report_failure(engine_error(&error));
    }

    /// Whether the engine has exited
    pub fn is_dead(&self) -> bool {
        self.host.is_dead()
    }
}
