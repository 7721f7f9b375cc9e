//! dom_utils.rs – thin helper layer for repetitive DOM operations.
//!
//! The server-rendered templates toggle widgets through inline
//! `style.display`, so the show / hide helpers here do the same instead of
//! relying on CSS classes.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, Window};

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global `window` exists"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("should have a document on window"))
}

/// Set the inline `display` property. No-op for non-HTML elements.
pub fn set_display(el: &Element, value: &str) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property("display", value);
    }
}

pub fn show(el: &Element) {
    set_display(el, "block");
}

pub fn hide(el: &Element) {
    set_display(el, "none");
}

/// Restore the stylesheet's default display by clearing the inline value.
pub fn reset_display(el: &Element) {
    set_display(el, "");
}

/// `true` when the element is hidden through its inline style.
pub fn is_hidden(el: &Element) -> bool {
    el.dyn_ref::<HtmlElement>()
        .and_then(|html| html.style().get_property_value("display").ok())
        .map_or(false, |display| display == "none")
}

/// Read an attribute, treating an empty value the same as a missing one.
pub fn non_empty_attr(el: &Element, name: &str) -> Option<String> {
    el.get_attribute(name).filter(|v| !v.trim().is_empty())
}

/// Walk up from an event target to the nearest element matching `selector`.
pub fn closest(target: Option<EventTarget>, selector: &str) -> Option<Element> {
    target
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|el| el.closest(selector).ok().flatten())
}

/// Blocking `window.alert`; failures (e.g. headless tests) are ignored.
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// Look up an element by id in the current document.
pub fn by_id(document: &Document, id: &str) -> Option<Element> {
    document.get_element_by_id(id)
}

/// Cast an element by id to a concrete HTML element type.
pub fn by_id_as<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
}

/// Attach a handler for the lifetime of the page.
pub fn on_event<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
