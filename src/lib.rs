use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, PageTransitionEvent};

#[macro_use]
mod macros;

pub mod chat;
pub mod components;
pub mod constants;
pub mod dom_utils;
pub mod models;
pub mod network;
pub mod page;
pub mod utils;

use chat::{ChatConfig, ConversationView};

thread_local! {
    // The conversation view of the current page, if it is a thread page.
    static ACTIVE_VIEW: RefCell<Option<ConversationView>> = RefCell::new(None);
}

// Main entry point for the WASM module
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Initialize better panic messages
    console_error_panic_hook::set_once();

    let document = dom_utils::document()?;

    // Every widget is optional on a given page; one failing to bind must
    // not take the others down.
    let widgets: [(&str, fn(&Document) -> Result<(), JsValue>); 7] = [
        ("conversation view", mount_conversation_view),
        ("unread badge", components::unread_badge::setup_unread_badge),
        ("like buttons", components::like_button::setup_like_buttons),
        ("reply toggles", components::reply_toggle::setup_reply_toggles),
        ("image carousel", components::image_carousel::setup_image_carousel),
        ("media preview", components::media_preview::setup_media_preview),
        ("avatar previews", components::avatar_preview::setup_avatar_previews),
    ];
    for (name, setup) in widgets {
        if let Err(e) = setup(&document) {
            error_log!("Failed to set up {}: {:?}", name, e);
        }
    }

    Ok(())
}

fn mount_conversation_view(document: &Document) -> Result<(), JsValue> {
    let Some(view) = ConversationView::mount(document, ChatConfig::default())? else {
        debug_log!("[lib] no conversation on this page");
        return Ok(());
    };
    view.start()?;
    ACTIVE_VIEW.with(|cell| *cell.borrow_mut() = Some(view));

    // Pause while the page is hidden; a page restored from the
    // back/forward cache resumes polling.
    let window = dom_utils::window()?;
    dom_utils::on_event(&window, "pagehide", handle_page_transition)?;
    dom_utils::on_event(&window, "pageshow", handle_page_transition)
}

fn handle_page_transition(event: Event) {
    let persisted = event
        .dyn_ref::<PageTransitionEvent>()
        .map_or(false, |e| e.persisted());
    if let Err(e) = on_page_transition(&event.type_(), persisted) {
        error_log!("[lib] failed to resume conversation view: {:?}", e);
    }
}

/// `pagehide` pauses the mounted view; a `pageshow` restoring a cached
/// page restarts it. The first `pageshow` of a fresh load is ignored.
fn on_page_transition(event_type: &str, persisted: bool) -> Result<(), JsValue> {
    ACTIVE_VIEW.with(|cell| {
        let active = cell.borrow();
        let Some(view) = active.as_ref() else {
            return Ok(());
        };
        match event_type {
            "pagehide" => {
                view.stop();
                Ok(())
            }
            "pageshow" if persisted => {
                debug_log!("[lib] page restored from cache, resuming");
                view.start()
            }
            _ => Ok(()),
        }
    })
}

/// Stop polling and detach the conversation view. Safe to call when no
/// view is mounted, and more than once.
#[wasm_bindgen]
pub fn stop_conversation_view() {
    let view = ACTIVE_VIEW.with(|cell| cell.borrow_mut().take());
    if let Some(view) = view {
        view.stop();
        debug_log!("[lib] conversation view stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageContext;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn cached_page_resumes_polling() {
        let document = dom_utils::document().unwrap();
        let container = document.create_element("div").unwrap();
        let page = PageContext {
            current_user_id: 5,
            current_username: None,
            partner_username: "bfcache-partner".into(),
        };
        let view = ConversationView::new(document, container, page, None, ChatConfig::default());
        view.start().unwrap();
        ACTIVE_VIEW.with(|cell| *cell.borrow_mut() = Some(view));
        let running = || ACTIVE_VIEW.with(|cell| cell.borrow().as_ref().map(|v| v.is_running()));

        on_page_transition("pagehide", true).unwrap();
        assert_eq!(running(), Some(false));

        // A regular load also fires `pageshow`, with `persisted == false`.
        on_page_transition("pageshow", false).unwrap();
        assert_eq!(running(), Some(false));

        on_page_transition("pageshow", true).unwrap();
        assert_eq!(running(), Some(true));

        stop_conversation_view();
        assert_eq!(running(), None);
        on_page_transition("pageshow", true).unwrap();
    }
}
