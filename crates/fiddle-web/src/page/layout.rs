//! Pane sizing against the live DOM

use fiddle_ui::{effective_height, pane_css, pane_height, Bounds, LayoutNode};
use web_sys::{Document, Element, HtmlElement, Window};

use crate::constants::{SEL_APP_VIEWS, SEL_CHROME};
use crate::error::WebError;
use crate::page::dom::elements;

/// Measurable DOM element
pub(crate) struct DomNode(pub Element);

impl LayoutNode for DomNode {
    fn bounds(&self) -> Bounds {
        let rect = self.0.get_bounding_client_rect();
        Bounds {
            top: rect.top(),
            bottom: rect.bottom(),
        }
    }

    fn children(&self) -> Vec<Self> {
        let children = self.0.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .map(DomNode)
            .collect()
    }
}

/// Size every app view to the viewport minus the page header and footer
pub(crate) fn apply(window: &Window, document: &Document) -> Result<(), WebError> {
    let viewport = window.inner_height()?.as_f64().unwrap_or(0.0);
    let mut chrome = Vec::with_capacity(SEL_CHROME.len());
    for selector in SEL_CHROME {
        if let Some(element) = document.query_selector(selector)? {
            chrome.push(effective_height(&DomNode(element)));
        }
    }

    let css = pane_css(pane_height(viewport, &chrome));
    for view in elements::<HtmlElement>(document, SEL_APP_VIEWS)? {
        let style = view.style();
        style.set_property("height", &css)?;
        style.set_property("max-height", &css)?;
    }
    Ok(())
}
