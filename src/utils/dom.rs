//! DOM and Web API utility functions.
//!
//! Provides safe, consistent access to browser APIs with proper error handling.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Window};

use crate::core::error::GridError;

/// Get the browser window object.
#[inline]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Get the current document.
#[inline]
pub fn document() -> Option<Document> {
    window()?.document()
}

/// Convert a thrown JS value into a [`GridError`].
pub fn js_error(value: JsValue) -> GridError {
    GridError::Js(
        value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}")),
    )
}

/// Create an element as `HtmlElement`.
pub fn create_html_element(document: &Document, tag: &'static str) -> Result<HtmlElement, GridError> {
    document
        .create_element(tag)
        .ok()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .ok_or(GridError::ElementCreation(tag))
}

/// Read a computed style property, empty if unavailable.
pub fn computed_property(element: &Element, property: &str) -> String {
    window()
        .and_then(|w| w.get_computed_style(element).ok().flatten())
        .and_then(|style| style.get_property_value(property).ok())
        .unwrap_or_default()
}

/// Set a style property (including custom properties) on the root element.
pub fn set_root_property(property: &str, value: &str) {
    if let Some(root) = document()
        .and_then(|d| d.document_element())
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    {
        let _ = root.style().set_property(property, value);
    }
}

/// Read a custom property declared on the root element.
pub fn root_property(property: &str) -> String {
    document()
        .and_then(|d| d.document_element())
        .map(|root| computed_property(&root, property))
        .unwrap_or_default()
}

/// Closest ancestor (or self) of an event target matching `selector`.
pub fn closest(target: Option<web_sys::EventTarget>, selector: &str) -> Option<Element> {
    target?
        .dyn_into::<Element>()
        .ok()?
        .closest(selector)
        .ok()
        .flatten()
}
