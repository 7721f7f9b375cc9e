//! Unread badges: the navbar total (`#unread-badge`) and the per-partner
//! badges inside `[data-partner-username]` links.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element};

use crate::constants::{GLOBAL_BADGE_ID, PARTNER_BADGE_CLASS, PARTNER_USERNAME_ATTR};
use crate::dom_utils::{hide, set_display};

/// What to do with a badge for a given count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeUpdate {
    Remove,
    Show(u32),
}

impl BadgeUpdate {
    pub fn for_count(count: u32) -> Self {
        if count == 0 {
            BadgeUpdate::Remove
        } else {
            BadgeUpdate::Show(count)
        }
    }
}

/// Update the navbar badge. The element belongs to the layout template,
/// so a zero count hides it rather than detaching it.
pub fn apply_global_badge(document: &Document, count: u32) {
    let Some(badge) = document.get_element_by_id(GLOBAL_BADGE_ID) else {
        return;
    };
    match BadgeUpdate::for_count(count) {
        BadgeUpdate::Show(n) => {
            badge.set_text_content(Some(&n.to_string()));
            set_display(&badge, "inline-block");
        }
        BadgeUpdate::Remove => hide(&badge),
    }
}

/// Create, update or remove the badge of every link pointing at `username`.
/// Returns the number of partner links touched.
pub fn apply_partner_badge(document: &Document, username: &str, count: u32) -> Result<usize, JsValue> {
    let update = BadgeUpdate::for_count(count);
    let hosts = partner_hosts(document, username)?;

    for host in &hosts {
        let existing = host.query_selector(&format!(".{}", PARTNER_BADGE_CLASS))?;
        match (update, existing) {
            (BadgeUpdate::Remove, Some(badge)) => badge.remove(),
            (BadgeUpdate::Remove, None) => {}
            (BadgeUpdate::Show(n), Some(badge)) => set_partner_count(&badge, n)?,
            (BadgeUpdate::Show(n), None) => {
                let badge = document.create_element("span")?;
                badge.set_class_name(&format!("badge rounded-pill bg-danger ms-1 {}", PARTNER_BADGE_CLASS));
                set_partner_count(&badge, n)?;
                host.append_child(&badge)?;
            }
        }
    }

    Ok(hosts.len())
}

/// Fill in server-rendered partner badges that only carry their count in
/// `data-unread-count`.
pub fn hydrate_partner_badges(document: &Document) -> Result<(), JsValue> {
    let selector = format!("[{}] .{}", PARTNER_USERNAME_ATTR, PARTNER_BADGE_CLASS);
    let badges = document.query_selector_all(&selector)?;

    for i in 0..badges.length() {
        let Some(badge) = badges.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let count: u32 = badge
            .get_attribute("data-unread-count")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0);
        let empty = badge.text_content().map_or(true, |t| t.trim().is_empty());
        if count > 0 && empty {
            badge.set_text_content(Some(&count.to_string()));
        }
    }
    Ok(())
}

fn set_partner_count(badge: &Element, count: u32) -> Result<(), JsValue> {
    badge.set_text_content(Some(&count.to_string()));
    badge.set_attribute("data-unread-count", &count.to_string())
}

// Usernames are compared as attribute values instead of being spliced
// into a selector.
fn partner_hosts(document: &Document, username: &str) -> Result<Vec<Element>, JsValue> {
    let nodes = document.query_selector_all(&format!("[{}]", PARTNER_USERNAME_ATTR))?;
    let mut hosts = Vec::new();
    for i in 0..nodes.length() {
        if let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            if el.get_attribute(PARTNER_USERNAME_ATTR).as_deref() == Some(username) {
                hosts.push(el);
            }
        }
    }
    Ok(hosts)
}
