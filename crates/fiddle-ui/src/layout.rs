//! Pane sizing
//!
//! App view panes are sized from the viewport height minus the page header
//! and footer. Elements are measured through [`LayoutNode`] so the
//! arithmetic runs without a DOM.

use crate::constants::{MIN_PANE_HEIGHT, PANE_HEIGHT_FUDGE};

/// Vertical extent of an element's bounding box
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub top: f64,
    pub bottom: f64,
}

/// An element that can be measured
pub trait LayoutNode: Sized {
    fn bounds(&self) -> Bounds;
    fn children(&self) -> Vec<Self>;
}

/// Height spanned by `node` and all of its descendants.
///
/// A parent may report zero height while its children do not, so every
/// descendant widens the range. Descendants with a top of exactly zero are
/// treated as unpositioned and do not lower the top.
pub fn effective_height<N: LayoutNode>(node: &N) -> f64 {
    let root = node.bounds();
    let mut top = root.top;
    let mut bottom = root.bottom;
    for child in node.children() {
        measure(&child, &mut top, &mut bottom);
    }
    bottom - top
}

fn measure<N: LayoutNode>(node: &N, top: &mut f64, bottom: &mut f64) {
    let b = node.bounds();
    if b.top != 0.0 {
        *top = top.min(b.top);
    }
    *bottom = bottom.max(b.bottom);
    for child in node.children() {
        measure(&child, top, bottom);
    }
}

/// Pane height for a viewport of `viewport` pixels after subtracting the
/// heights of the fixed page chrome
pub fn pane_height(viewport: f64, chrome: &[f64]) -> f64 {
    let height = viewport - chrome.iter().sum::<f64>();
    if height >= MIN_PANE_HEIGHT {
        height
    } else {
        MIN_PANE_HEIGHT
    }
}

/// CSS value applied as both `height` and `max-height`
pub fn pane_css(height: f64) -> String {
    format!("calc({}px - {})", height, PANE_HEIGHT_FUDGE)
}
