//! Page element handles and rendering

use fiddle_ui::UiContext;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlProgressElement, HtmlTextAreaElement,
};

use crate::constants::*;
use crate::error::WebError;

/// Look up a required element by selector
pub(crate) fn element<T: JsCast>(document: &Document, selector: &str) -> Result<T, WebError> {
    document
        .query_selector(selector)?
        .ok_or_else(|| WebError::MissingElement(selector.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| WebError::MissingElement(selector.to_string()))
}

/// Every element matching `selector` that has type `T`
pub(crate) fn elements<T: JsCast>(document: &Document, selector: &str) -> Result<Vec<T>, WebError> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect())
}

/// Elements the controller state is rendered onto
pub(crate) struct Dom {
    pub document: Document,
    pub output: HtmlTextAreaElement,
    pub input: HtmlTextAreaElement,
    pub exec_button: HtmlButtonElement,
    status: HtmlElement,
    progress: Option<HtmlProgressElement>,
    spinner: Option<HtmlElement>,
    revealed: bool,
}

impl Dom {
    pub fn new(document: Document) -> Result<Self, WebError> {
        let output: HtmlTextAreaElement = element(&document, SEL_OUTPUT)?;
        // Browsers may restore a cached value on reload
        output.set_value("");
        Ok(Self {
            output,
            input: element(&document, SEL_INPUT)?,
            exec_button: element(&document, SEL_EXEC_BUTTON)?,
            status: element(&document, SEL_STATUS)?,
            progress: element(&document, SEL_PROGRESS).ok(),
            spinner: element(&document, SEL_SPINNER).ok(),
            revealed: false,
            document,
        })
    }

    /// Current page title
    pub fn title(&self) -> String {
        self.document.title()
    }

    /// Label of the execute control
    pub fn exec_label(&self) -> String {
        self.exec_button.inner_text()
    }

    /// Copy controller state onto the page. Returns `true` the first time
    /// the loaded state is rendered.
    pub fn render(&mut self, ctx: &UiContext, scroll: bool) -> Result<bool, WebError> {
        let text = ctx.output.text();
        if self.output.value() != text {
            self.output.set_value(text);
        }
        if scroll {
            self.output.set_scroll_top(self.output.scroll_height());
        }

        if ctx.progress.removed {
            if let Some(progress) = self.progress.take() {
                progress.remove();
            }
            if let Some(spinner) = self.spinner.take() {
                spinner.remove();
            }
        } else {
            if let Some(progress) = &self.progress {
                progress.set_value(f64::from(ctx.progress.value));
                progress.set_max(f64::from(ctx.progress.max));
                progress.set_hidden(ctx.progress.hidden);
            }
            if let Some(spinner) = &self.spinner {
                spinner.set_hidden(ctx.progress.hidden);
            }
        }

        self.status.set_inner_text(&ctx.status.text);
        self.status
            .class_list()
            .toggle_with_force(CLASS_HIDDEN, ctx.status.hidden)?;

        self.document.set_title(&ctx.busy.title);
        self.exec_button.set_disabled(!ctx.busy.exec_enabled);
        if !ctx.busy.is_busy() {
            self.exec_button.set_inner_text(&ctx.busy.exec_label);
        }

        if ctx.loaded && !self.revealed {
            self.revealed = true;
            self.reveal_hidden()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn reveal_hidden(&self) -> Result<(), WebError> {
        let selector = format!(".{}", CLASS_INITIALLY_HIDDEN);
        for element in elements::<Element>(&self.document, &selector)? {
            element.class_list().remove_1(CLASS_INITIALLY_HIDDEN)?;
        }
        Ok(())
    }
}
