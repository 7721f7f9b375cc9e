//! Page-embedded identity data.
//!
//! The templates stamp the viewer and the conversation partner onto
//! `<body>` as `data-*` attributes; older thread pages only carry the
//! partner in a hidden `#thread-username-data` input.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlInputElement};

use crate::constants::THREAD_USERNAME_FIELD_ID;

/// Who is looking at the page and who they are talking to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageContext {
    pub current_user_id: u32,
    pub current_username: Option<String>,
    pub partner_username: String,
}

impl PageContext {
    /// Resolve the context once at mount time. `None` when no partner can
    /// be determined, in which case the page is not a conversation view.
    pub fn from_document(document: &Document) -> Option<Self> {
        let dataset = document.body()?.dataset();

        let hidden_field = document
            .get_element_by_id(THREAD_USERNAME_FIELD_ID)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value());

        let partner_username =
            resolve_partner(dataset.get("otherUsername"), hidden_field)?;

        Some(Self {
            current_user_id: parse_user_id(dataset.get("currentUserId").as_deref()),
            current_username: dataset.get("currentUsername").filter(|s| !s.is_empty()),
            partner_username,
        })
    }
}

/// Prefer the body attribute, fall back to the hidden field.
pub fn resolve_partner(from_dataset: Option<String>, from_field: Option<String>) -> Option<String> {
    from_dataset
        .filter(|s| !s.trim().is_empty())
        .or_else(|| from_field.filter(|s| !s.trim().is_empty()))
        .map(|s| s.trim().to_string())
}

/// Missing or malformed ids fall back to 0, which matches no real user.
pub fn parse_user_id(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn partner_prefers_dataset() {
        assert_eq!(
            resolve_partner(Some("alice".into()), Some("bob".into())).as_deref(),
            Some("alice")
        );
        assert_eq!(
            resolve_partner(Some("  ".into()), Some("bob".into())).as_deref(),
            Some("bob")
        );
        assert_eq!(resolve_partner(None, Some(String::new())), None);
    }

    #[wasm_bindgen_test]
    fn user_id_parsing_is_lenient() {
        assert_eq!(parse_user_id(Some("5")), 5);
        assert_eq!(parse_user_id(Some(" 42 ")), 42);
        assert_eq!(parse_user_id(Some("abc")), 0);
        assert_eq!(parse_user_id(None), 0);
    }
}
