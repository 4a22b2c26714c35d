//! Engine backed by the Emscripten-built shell module
//!
//! Loading installs a `Module` object on the worker global with callbacks
//! wired to the host's [`EngineHooks`], then runs the engine script with
//! `importScripts`. The module finishes loading asynchronously and reports
//! back through those callbacks.

use std::rc::Rc;

use fiddle_engine::{Engine, EngineError, EngineHooks};
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::constants::{ENGINE_EXEC_SYMBOL, MODULE_GLOBAL};
use crate::error::describe;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = importScripts, catch)]
    fn import_scripts(url: &str) -> Result<(), JsValue>;
}

/// Closures handed to the module. They must outlive it.
struct ModuleCallbacks {
    print: Closure<dyn FnMut(JsValue)>,
    print_err: Closure<dyn FnMut(JsValue)>,
    set_status: Closure<dyn FnMut(JsValue)>,
    monitor_run_dependencies: Closure<dyn FnMut(f64)>,
    runtime_initialized: Closure<dyn FnMut()>,
}

impl ModuleCallbacks {
    fn new(hooks: Rc<dyn EngineHooks>) -> Self {
        let print = {
            let hooks = hooks.clone();
            Closure::wrap(Box::new(move |text: JsValue| hooks.print(&describe(&text)))
                as Box<dyn FnMut(JsValue)>)
        };
        let print_err = {
            let hooks = hooks.clone();
            Closure::wrap(Box::new(move |text: JsValue| hooks.print_err(&describe(&text)))
                as Box<dyn FnMut(JsValue)>)
        };
        let set_status = {
            let hooks = hooks.clone();
            Closure::wrap(Box::new(move |text: JsValue| {
                hooks.set_status(text.as_string().as_deref())
            }) as Box<dyn FnMut(JsValue)>)
        };
        let monitor_run_dependencies = {
            let hooks = hooks.clone();
            Closure::wrap(Box::new(move |left: f64| {
                hooks.monitor_run_dependencies(left.max(0.0) as u32)
            }) as Box<dyn FnMut(f64)>)
        };
        let runtime_initialized =
            Closure::wrap(Box::new(move || hooks.runtime_initialized()) as Box<dyn FnMut()>);

        Self {
            print,
            print_err,
            set_status,
            monitor_run_dependencies,
            runtime_initialized,
        }
    }

    fn install(&self, module: &Object) -> Result<(), JsValue> {
        Reflect::set(module, &"print".into(), self.print.as_ref())?;
        Reflect::set(module, &"printErr".into(), self.print_err.as_ref())?;
        Reflect::set(module, &"setStatus".into(), self.set_status.as_ref())?;
        Reflect::set(
            module,
            &"monitorRunDependencies".into(),
            self.monitor_run_dependencies.as_ref(),
        )?;
        Reflect::set(
            module,
            &"onRuntimeInitialized".into(),
            self.runtime_initialized.as_ref(),
        )?;
        Ok(())
    }
}

/// [`Engine`] over the Emscripten module
pub struct JsEngine {
    script: String,
    module: Option<Object>,
    exec_fn: Option<Function>,
    /// Kept alive for the module
    #[allow(dead_code)]
    callbacks: Option<ModuleCallbacks>,
}

impl JsEngine {
    pub fn new(script: &str) -> Self {
        Self {
            script: script.to_string(),
            module: None,
            exec_fn: None,
            callbacks: None,
        }
    }

    /// Wrapped `fiddle_exec`, looked up on first use
    fn exec_fn(&mut self) -> Result<Function, EngineError> {
        if let Some(f) = &self.exec_fn {
            return Ok(f.clone());
        }
        let module = self
            .module
            .as_ref()
            .ok_or_else(|| EngineError::Unavailable("module not loaded".into()))?;
        let cwrap = Reflect::get(module, &"cwrap".into())
            .ok()
            .and_then(|v| v.dyn_into::<Function>().ok())
            .ok_or_else(|| EngineError::Unavailable("Module.cwrap is missing".into()))?;
        let arg_types = Array::of1(&"string".into());
        let f = cwrap
            .call3(module, &ENGINE_EXEC_SYMBOL.into(), &JsValue::NULL, &arg_types)
            .map_err(|e| engine_error(&e))?
            .dyn_into::<Function>()
            .map_err(|_| EngineError::Unavailable(format!("{} is not exported", ENGINE_EXEC_SYMBOL)))?;
        self.exec_fn = Some(f.clone());
        Ok(f)
    }
}

impl Engine for JsEngine {
    fn load(&mut self, hooks: Rc<dyn EngineHooks>) -> Result<(), EngineError> {
        let module = Object::new();
        let callbacks = ModuleCallbacks::new(hooks);
        callbacks.install(&module).map_err(|e| engine_error(&e))?;
        Reflect::set(&js_sys::global(), &MODULE_GLOBAL.into(), &module)
            .map_err(|e| engine_error(&e))?;
        self.module = Some(module);
        self.callbacks = Some(callbacks);

        import_scripts(&self.script)
            .map_err(|e| EngineError::Unavailable(format!("{}: {}", self.script, describe(&e))))
    }

    fn exec(&mut self, command: Option<&str>) -> Result<(), EngineError> {
        let exec_fn = self.exec_fn()?;
        let arg = command.map_or(JsValue::NULL, JsValue::from_str);
        exec_fn
            .call1(&JsValue::NULL, &arg)
            .map(|_| ())
            .map_err(|e| engine_error(&e))
    }
}

/// Convert a value thrown by the module into an [`EngineError`]
pub fn engine_error(err: &JsValue) -> EngineError {
    let field = |name: &str| Reflect::get(err, &name.into()).ok();
    let name = field("name").and_then(|v| v.as_string());
    let message = field("message")
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| describe(err));
    let status = field("status").and_then(|v| v.as_f64());
    classify(name.as_deref(), message, status)
}

fn classify(name: Option<&str>, message: String, status: Option<f64>) -> EngineError {
    if name == Some(EngineError::EXIT_STATUS_NAME) {
        EngineError::Exit {
            status: status.unwrap_or(0.0) as i32,
            message,
        }
    } else {
        EngineError::Exception(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_is_fatal() {
        let err = classify(Some("ExitStatus"), "Program terminated with exit(3)".into(), Some(3.0));
        assert_eq!(err, EngineError::exit(3));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_other_errors_are_exceptions() {
        let err = classify(Some("RuntimeError"), "unreachable".into(), None);
        assert_eq!(err, EngineError::Exception("unreachable".into()));
        assert_eq!(
            classify(None, "boom".into(), None),
            EngineError::Exception("boom".into())
        );
    }
}
