//! Like / unlike buttons on posts and replies.
//!
//! One delegated click handler on `<body>` serves every `.like-btn`,
//! including buttons rendered after load.

use std::fmt;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event};

use crate::constants::{GENERIC_ERROR_ALERT, LIKED_ICON, LIKE_LABEL, NOT_LIKED_ICON};
use crate::dom_utils::{alert, closest, non_empty_attr};
use crate::models::LikeResponse;
use crate::network::{encode_segment, ApiClient};
use crate::{debug_log, error_log, warn_log};

const LIKE_BUTTON_SELECTOR: &str = ".like-btn";
const PENDING_ATTR: &str = "data-like-pending";

/// What a like button is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LikeTarget {
    Post(String),
    Reply(String),
}

impl LikeTarget {
    /// A post id wins when a button carries both.
    pub fn from_ids(post_id: Option<String>, reply_id: Option<String>) -> Option<Self> {
        post_id
            .map(LikeTarget::Post)
            .or_else(|| reply_id.map(LikeTarget::Reply))
    }

    pub fn from_button(button: &Element) -> Option<Self> {
        Self::from_ids(
            non_empty_attr(button, "data-post-id"),
            non_empty_attr(button, "data-reply-id"),
        )
    }

    /// Endpoint toggling the like; `currently_liked` picks unlike vs like.
    pub fn path(&self, currently_liked: bool) -> String {
        let verb = if currently_liked { "unlike" } else { "like" };
        match self {
            LikeTarget::Post(id) => format!("/post/{}/{}", encode_segment(id), verb),
            LikeTarget::Reply(id) => format!("/reply/{}/{}", encode_segment(id), verb),
        }
    }
}

impl fmt::Display for LikeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LikeTarget::Post(id) => write!(f, "post {}", id),
            LikeTarget::Reply(id) => write!(f, "reply {}", id),
        }
    }
}

/// Caption in front of the count, e.g. `❤️ いいね `.
pub fn like_label(liked: bool) -> String {
    let icon = if liked { LIKED_ICON } else { NOT_LIKED_ICON };
    format!("{} {} ", icon, LIKE_LABEL)
}

/// Reflect a successful response on the button. A zero count renders no
/// `.like-count` span.
pub fn apply_like_state(
    document: &Document,
    button: &Element,
    liked: bool,
    count: u32,
) -> Result<(), JsValue> {
    button.set_attribute("data-liked", if liked { "true" } else { "false" })?;

    let classes = button.class_list();
    if liked {
        classes.remove_1("btn-outline-secondary")?;
        classes.add_1("btn-danger")?;
    } else {
        classes.remove_1("btn-danger")?;
        classes.add_1("btn-outline-secondary")?;
    }

    button.set_text_content(Some(&like_label(liked)));
    if count > 0 {
        let span = document.create_element("span")?;
        span.set_class_name("like-count");
        span.set_text_content(Some(&count.to_string()));
        button.append_child(&span)?;
    }
    Ok(())
}

pub fn setup_like_buttons(document: &Document) -> Result<(), JsValue> {
    let Some(body) = document.body() else {
        return Ok(());
    };

    let document = document.clone();
    let handler = Closure::wrap(Box::new(move |event: Event| {
        let Some(button) = closest(event.target(), LIKE_BUTTON_SELECTOR) else {
            return;
        };
        event.prevent_default();

        // A second click while a request is in flight would be computed
        // from the stale `data-liked` value.
        if button.has_attribute(PENDING_ATTR) {
            return;
        }
        let Some(target) = LikeTarget::from_button(&button) else {
            warn_log!("[like_button] button has neither data-post-id nor data-reply-id");
            return;
        };
        let liked = button.get_attribute("data-liked").as_deref() == Some("true");
        if button.set_attribute(PENDING_ATTR, "true").is_err() {
            return;
        }

        let document = document.clone();
        spawn_local(async move {
            toggle(&document, &button, &target, liked).await;
            let _ = button.remove_attribute(PENDING_ATTR);
        });
    }) as Box<dyn FnMut(_)>);

    body.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
    handler.forget();
    Ok(())
}

async fn toggle(document: &Document, button: &Element, target: &LikeTarget, liked: bool) {
    debug_log!("[like_button] toggling {} (liked={})", target, liked);
    match ApiClient::post_like(&target.path(liked)).await {
        Ok(LikeResponse { success: true, liked, like_count, .. }) => {
            if let Err(e) = apply_like_state(document, button, liked, like_count) {
                error_log!("[like_button] failed to update button: {:?}", e);
            }
        }
        Ok(LikeResponse { error: Some(error), .. }) => {
            error_log!("[like_button] {} rejected: {}", target, error);
            alert(&error);
        }
        Ok(_) => warn_log!("[like_button] unsuccessful response without error for {}", target),
        Err(e) => {
            error_log!("[like_button] like request failed for {}: {}", target, e);
            alert(GENERIC_ERROR_ALERT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn post_id_wins() {
        let target = LikeTarget::from_ids(Some("3".into()), Some("9".into()));
        assert_eq!(target, Some(LikeTarget::Post("3".into())));
        assert_eq!(
            LikeTarget::from_ids(None, Some("9".into())),
            Some(LikeTarget::Reply("9".into()))
        );
        assert_eq!(LikeTarget::from_ids(None, None), None);
    }

    #[wasm_bindgen_test]
    fn endpoint_paths() {
        let post = LikeTarget::Post("12".into());
        assert_eq!(post.path(false), "/post/12/like");
        assert_eq!(post.path(true), "/post/12/unlike");

        let reply = LikeTarget::Reply("7".into());
        assert_eq!(reply.path(false), "/reply/7/like");
        assert_eq!(reply.path(true), "/reply/7/unlike");
    }

    #[wasm_bindgen_test]
    fn button_state_follows_response() {
        let doc = web_sys::window().unwrap().document().unwrap();
        let button = doc.create_element("button").unwrap();
        button.set_class_name("like-btn btn-outline-secondary");
        button.set_attribute("data-post-id", "1").unwrap();

        apply_like_state(&doc, &button, true, 2).unwrap();
        assert_eq!(button.get_attribute("data-liked").as_deref(), Some("true"));
        assert!(button.class_list().contains("btn-danger"));
        assert!(!button.class_list().contains("btn-outline-secondary"));
        let count = button.query_selector(".like-count").unwrap().unwrap();
        assert_eq!(count.text_content().as_deref(), Some("2"));

        apply_like_state(&doc, &button, false, 0).unwrap();
        assert_eq!(button.get_attribute("data-liked").as_deref(), Some("false"));
        assert!(button.class_list().contains("btn-outline-secondary"));
        assert!(button.query_selector(".like-count").unwrap().is_none());
        assert_eq!(button.text_content().unwrap(), like_label(false));
    }
}
