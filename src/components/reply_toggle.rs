//! Collapsible reply forms under a post and under each reply.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event};

use crate::constants::{MAIN_REPLY_SHOW_LABEL, NESTED_REPLY_SHOW_LABEL, REPLY_HIDE_LABEL};
use crate::debug_log;
use crate::dom_utils::{hide, is_hidden, show};

/// Button captions for the collapsed and expanded states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleLabels {
    pub show: &'static str,
    pub hide: &'static str,
}

pub const MAIN_LABELS: ToggleLabels = ToggleLabels { show: MAIN_REPLY_SHOW_LABEL, hide: REPLY_HIDE_LABEL };
pub const NESTED_LABELS: ToggleLabels = ToggleLabels { show: NESTED_REPLY_SHOW_LABEL, hide: REPLY_HIDE_LABEL };

/// Flip `form` between shown and hidden and relabel `button`.
/// Returns `true` when the form is now visible.
pub fn toggle_form(form: &Element, button: &Element, labels: ToggleLabels) -> bool {
    if is_hidden(form) {
        show(form);
        button.set_text_content(Some(labels.hide));
        true
    } else {
        hide(form);
        button.set_text_content(Some(labels.show));
        false
    }
}

pub fn setup_reply_toggles(document: &Document) -> Result<(), JsValue> {
    if let (Some(toggle), Some(form)) = (
        document.get_element_by_id("main-reply-toggle"),
        document.get_element_by_id("main-reply-form"),
    ) {
        let button = toggle.clone();
        let handler = Closure::wrap(Box::new(move |_: Event| {
            let visible = toggle_form(&form, &button, MAIN_LABELS);
            debug_log!("[reply_toggle] main form visible={}", visible);
        }) as Box<dyn FnMut(_)>);
        toggle.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
        handler.forget();
    }

    let buttons = document.query_selector_all(".reply-toggle-btn")?;
    debug_log!("[reply_toggle] found {} nested toggle buttons", buttons.length());

    for i in 0..buttons.length() {
        let Some(button) = buttons.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let document = document.clone();
        let target = button.clone();
        let handler = Closure::wrap(Box::new(move |_: Event| {
            let Some(reply_id) = target.get_attribute("data-reply-id") else {
                return;
            };
            if let Some(form) = document.get_element_by_id(&format!("reply-form-{}", reply_id)) {
                let visible = toggle_form(&form, &target, NESTED_LABELS);
                debug_log!("[reply_toggle] reply {} form visible={}", reply_id, visible);
            }
        }) as Box<dyn FnMut(_)>);
        button.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
        handler.forget();
    }

    Ok(())
}
