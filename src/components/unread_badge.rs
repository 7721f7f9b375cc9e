//! Navbar unread badge refresh for every page.
//!
//! Runs once at load. On a conversation page the
//! [`ConversationView`](crate::chat::ConversationView) keeps refreshing it
//! afterwards.

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::Document;

use crate::chat::badge::{apply_global_badge, hydrate_partner_badges};
use crate::constants::{GLOBAL_BADGE_ID, PARTNER_USERNAME_ATTR};
use crate::network::ApiClient;
use crate::{debug_log, error_log};

pub fn setup_unread_badge(document: &Document) -> Result<(), JsValue> {
    let has_badge = document.get_element_by_id(GLOBAL_BADGE_ID).is_some();
    let has_partners = document
        .query_selector(&format!("[{}]", PARTNER_USERNAME_ATTR))?
        .is_some();
    if !has_badge && !has_partners {
        return Ok(());
    }

    let document = document.clone();
    spawn_local(async move {
        match ApiClient::get_unread_count().await {
            Ok(count) => {
                debug_log!("[unread_badge] {} unread", count.unread_count);
                apply_global_badge(&document, count.unread_count);
                if let Err(e) = hydrate_partner_badges(&document) {
                    error_log!("[unread_badge] failed to fill partner badges: {:?}", e);
                }
            }
            Err(e) => error_log!("[unread_badge] Failed to update unread badge: {}", e),
        }
    });

    Ok(())
}
