//! Page-side export
//!
//! [`FiddleApp`] starts the worker, feeds its messages to the
//! [`FiddleController`] and wires the page controls. After every change the
//! controller state is rendered back onto the DOM.

mod dom;
mod layout;

use std::cell::RefCell;
use std::rc::Rc;

use fiddle_protocol::{encode_request, Request};
use fiddle_ui::constants::{DEFAULT_TOGGLE_CLASS, EXAMPLES_PLACEHOLDER, RESIZE_DEBOUNCE_MS};
use fiddle_ui::input::is_exec_chord;
use fiddle_ui::{Debouncer, FiddleConfig, FiddleController, WorkerPort, EXAMPLES};
use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, Event, EventTarget, HtmlButtonElement, HtmlInputElement, HtmlOptionElement,
    HtmlSelectElement, KeyboardEvent, MessageEvent, Window, Worker,
};

use crate::constants::*;
use crate::error::WebError;
use dom::{element, elements, Dom};

/// Sends page → worker messages to the worker
pub struct PagePort {
    worker: Worker,
}

impl PagePort {
    fn send(&self, request: &Request) -> Result<(), WebError> {
        let json = encode_request(request)?;
        let value = js_sys::JSON::parse(&json)?;
        self.worker.post_message(&value)?;
        Ok(())
    }
}

impl WorkerPort for PagePort {
    fn post(&mut self, request: Request) {
        if let Err(e) = self.send(&request) {
            log::error!("[fiddle-ui] Failed to post {}: {}", request.kind(), e);
        }
    }
}

struct PageState {
    controller: FiddleController<PagePort>,
    dom: Dom,
    window: Window,
    resize: Debouncer,
    resize_timer: Option<i32>,
    layout_enabled: bool,
}

impl PageState {
    /// Render the controller state; the first loaded render also enables
    /// pane sizing.
    fn render(&mut self) {
        let scroll = self.controller.context_mut().take_scroll();
        match self.dom.render(self.controller.context(), scroll) {
            Ok(true) => {
                self.layout_enabled = true;
                self.apply_layout();
            }
            Ok(false) => {}
            Err(e) => log::error!("[fiddle-ui] Render failed: {}", e),
        }
    }

    fn apply_layout(&self) {
        if let Err(e) = layout::apply(&self.window, &self.dom.document) {
            log::error!("[fiddle-ui] Layout failed: {}", e);
        }
    }
}

type Shared = Rc<RefCell<PageState>>;

/// Run `f` against the page state, then render
fn update(state: &Shared, f: impl FnOnce(&mut PageState)) {
    let mut state = state.borrow_mut();
    f(&mut state);
    state.render();
}

/// Page entry point
#[wasm_bindgen]
pub struct FiddleApp {
    state: Shared,
    worker: Worker,
    listeners: Vec<(EventTarget, &'static str, Closure<dyn FnMut(Event)>)>,
    /// Kept alive for pending resize timeouts
    #[allow(dead_code)]
    resize_timer: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl FiddleApp {
    /// Start the worker and bind the page. `config_json` optionally
    /// overrides [`FiddleConfig`] defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<FiddleApp, JsValue> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let config = match config_json {
            Some(json) => {
                FiddleConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            None => FiddleConfig::default(),
        };
        Self::build(config).map_err(JsValue::from)
    }

    /// Current options as JSON
    pub fn config(&self) -> String {
        self.state.borrow().controller.context().config.to_json()
    }

    /// Run shell text as if typed and executed
    pub fn exec(&self, command: &str) {
        update(&self.state, |s| s.controller.exec(Some(command)));
    }
}

impl FiddleApp {
    fn build(config: FiddleConfig) -> Result<Self, WebError> {
        let window = web_sys::window().ok_or(WebError::NoWindow)?;
        let document = window.document().ok_or(WebError::NoWindow)?;
        let dom = Dom::new(document.clone())?;
        let worker = Worker::new(WORKER_SCRIPT)?;

        let port = PagePort {
            worker: worker.clone(),
        };
        let controller = FiddleController::new(port, config, &dom.title(), &dom.exec_label());
        let state: Shared = Rc::new(RefCell::new(PageState {
            controller,
            dom,
            window: window.clone(),
            resize: Debouncer::new(Some(RESIZE_DEBOUNCE_MS)),
            resize_timer: None,
            layout_enabled: false,
        }));

        let resize_timer = {
            let state = state.clone();
            Closure::wrap(Box::new(move || {
                let mut s = state.borrow_mut();
                s.resize_timer = None;
                if s.resize.fire() {
                    s.apply_layout();
                }
            }) as Box<dyn FnMut()>)
        };

        let mut app = Self {
            state,
            worker,
            listeners: Vec::new(),
            resize_timer,
        };
        app.bind_worker()?;
        app.bind_controls(&document)?;
        app.bind_css_toggles(&document)?;
        app.bind_config_toggles(&document)?;
        app.bind_command_buttons(&document)?;
        app.bind_examples(&document)?;
        app.bind_resize(&window)?;
        Ok(app)
    }

    fn listen(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), WebError> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        self.listeners.push((target.clone(), event, closure));
        Ok(())
    }

    fn bind_worker(&mut self) -> Result<(), WebError> {
        let state = self.state.clone();
        let worker = self.worker.clone();
        self.listen(&worker, "message", move |event| {
            let Some(event) = event.dyn_ref::<MessageEvent>() else {
                return;
            };
            match js_sys::JSON::stringify(&event.data()) {
                Ok(json) => update(&state, |s| {
                    s.controller.receive_json(&String::from(json));
                }),
                Err(e) => log::warn!("[fiddle-ui] Unreadable worker message: {}", WebError::from(e)),
            }
        })
    }

    fn bind_controls(&mut self, document: &web_sys::Document) -> Result<(), WebError> {
        let (input, exec_button) = {
            let s = self.state.borrow();
            (s.dom.input.clone(), s.dom.exec_button.clone())
        };

        let state = self.state.clone();
        let text = input.clone();
        self.listen(&exec_button, "click", move |_| {
            update(&state, |s| {
                s.controller.set_input(&text.value());
                s.controller.submit();
            })
        })?;

        let button = exec_button.clone();
        self.listen(&input, "keydown", move |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if is_exec_chord(key.ctrl_key(), key.shift_key(), key.key_code()) {
                event.prevent_default();
                event.stop_propagation();
                button.click();
            }
        })?;

        let clear_input: HtmlButtonElement = element(document, SEL_CLEAR_INPUT)?;
        let state = self.state.clone();
        let text = input.clone();
        self.listen(&clear_input, "click", move |_| {
            text.set_value("");
            update(&state, |s| s.controller.clear_input());
        })?;

        let clear_output: HtmlButtonElement = element(document, SEL_CLEAR_OUTPUT)?;
        let state = self.state.clone();
        self.listen(&clear_output, "click", move |_| {
            update(&state, |s| s.controller.clear_output());
        })
    }

    /// `data-csstgt` checkboxes toggle a class on their target
    fn bind_css_toggles(&mut self, document: &web_sys::Document) -> Result<(), WebError> {
        for checkbox in elements::<HtmlInputElement>(document, SEL_CSS_TOGGLES)? {
            let Some(selector) = checkbox.get_attribute("data-csstgt") else {
                continue;
            };
            let Some(target) = document.query_selector(&selector)? else {
                log::warn!("[fiddle-ui] No element for data-csstgt={}", selector);
                continue;
            };
            let class = checkbox
                .get_attribute("data-cssclass")
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_TOGGLE_CLASS.to_string());
            checkbox.set_checked(target.class_list().contains(&class));

            let source = checkbox.clone();
            self.listen(&checkbox, "change", move |_| {
                toggle_class(&target, &class, source.checked());
            })?;
        }
        Ok(())
    }

    /// `data-config` checkboxes are bound to [`FiddleConfig`] keys. Bound
    /// after the CSS toggles so the initial sync reaches both.
    fn bind_config_toggles(&mut self, document: &web_sys::Document) -> Result<(), WebError> {
        for checkbox in elements::<HtmlInputElement>(document, SEL_CONFIG_TOGGLES)? {
            let Some(key) = checkbox.get_attribute("data-config") else {
                continue;
            };
            let value = match self.state.borrow().controller.context().config.get(&key) {
                Ok(value) => value,
                Err(e) => {
                    log::warn!("[fiddle-ui] {}", e);
                    continue;
                }
            };
            if checkbox.checked() != value {
                checkbox.set_checked(value);
                checkbox.dispatch_event(&Event::new("change")?)?;
            }

            let state = self.state.clone();
            let source = checkbox.clone();
            self.listen(&checkbox, "change", move |_| {
                let mut s = state.borrow_mut();
                if let Err(e) = s.controller.context_mut().config.set(&key, source.checked()) {
                    log::warn!("[fiddle-ui] {}", e);
                }
            })?;
        }
        Ok(())
    }

    /// `data-cmd` buttons run their command
    fn bind_command_buttons(&mut self, document: &web_sys::Document) -> Result<(), WebError> {
        for button in elements::<HtmlButtonElement>(document, SEL_COMMAND_BUTTONS)? {
            let Some(command) = button.get_attribute("data-cmd") else {
                continue;
            };
            let state = self.state.clone();
            self.listen(&button, "click", move |_| {
                update(&state, |s| s.controller.exec(Some(&command)));
            })?;
        }
        Ok(())
    }

    /// Fill the examples list; choosing one replaces the input
    fn bind_examples(&mut self, document: &web_sys::Document) -> Result<(), WebError> {
        let Ok(select) = element::<HtmlSelectElement>(document, SEL_EXAMPLES) else {
            return Ok(());
        };
        let placeholder = HtmlOptionElement::new_with_text_and_value(EXAMPLES_PLACEHOLDER, "")?;
        placeholder.set_disabled(true);
        select.append_child(&placeholder)?;
        for example in EXAMPLES {
            let option = HtmlOptionElement::new_with_text_and_value(example.name, example.sql)?;
            select.append_child(&option)?;
        }
        select.set_selected_index(0);

        let state = self.state.clone();
        let input = self.state.borrow().dom.input.clone();
        let source = select.clone();
        self.listen(&select, "change", move |_| {
            let index = source.selected_index();
            let Some(example) = usize::try_from(index - 1).ok().and_then(|i| EXAMPLES.get(i)) else {
                return;
            };
            update(&state, |s| {
                s.controller.load_example(example.name);
                input.set_value(&s.controller.context().input);
            });
        })
    }

    fn bind_resize(&mut self, window: &Window) -> Result<(), WebError> {
        let state = self.state.clone();
        let timer: Function = self.resize_timer.as_ref().unchecked_ref::<Function>().clone();
        self.listen(window, "resize", move |_| {
            let mut s = state.borrow_mut();
            if !s.layout_enabled {
                return;
            }
            s.resize.trigger(js_sys::Date::now());
            if let Some(handle) = s.resize_timer.take() {
                s.window.clear_timeout_with_handle(handle);
            }
            let wait = s.resize.wait_ms() as i32;
            s.resize_timer = s
                .window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&timer, wait)
                .ok();
        })
    }
}

impl Drop for FiddleApp {
    fn drop(&mut self) {
        for (target, event, closure) in &self.listeners {
            let _ = target
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
        self.worker.terminate();
    }
}

fn toggle_class(target: &Element, class: &str, on: bool) {
    if let Err(e) = target.class_list().toggle_with_force(class, on) {
        log::warn!("[fiddle-ui] Class toggle failed: {}", WebError::from(e));
    }
}
