use wasm_bindgen::{JsCast, JsValue};
use web_sys::{FormData, HtmlButtonElement, HtmlFormElement, HtmlTextAreaElement};

use crate::constants::MESSAGE_BODY_SELECTOR;

/// Trimmed message text, or `None` when there is nothing to send.
pub fn normalize_body(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// The message form: its body textarea and submit button.
#[derive(Clone)]
pub struct Composer {
    form: HtmlFormElement,
    body: Option<HtmlTextAreaElement>,
    button: Option<HtmlButtonElement>,
}

impl Composer {
    pub fn new(form: HtmlFormElement) -> Self {
        let body = form
            .query_selector(MESSAGE_BODY_SELECTOR)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlTextAreaElement>().ok());
        let button = form
            .query_selector("button")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok());
        Self { form, body, button }
    }

    pub fn form(&self) -> &HtmlFormElement {
        &self.form
    }

    /// The text that would be sent right now, if any.
    pub fn pending_body(&self) -> Option<String> {
        self.body.as_ref().and_then(|ta| normalize_body(&ta.value()))
    }

    pub fn set_busy(&self, busy: bool) {
        if let Some(button) = &self.button {
            button.set_disabled(busy);
        }
    }

    pub fn is_busy(&self) -> bool {
        self.button.as_ref().map_or(false, |b| b.disabled())
    }

    pub fn clear(&self) {
        if let Some(body) = &self.body {
            body.set_value("");
        }
    }

    /// Snapshot the form fields (body, recipient, CSRF token, …).
    pub fn form_data(&self) -> Result<FormData, JsValue> {
        FormData::new_with_form(&self.form)
    }

    /// Resolved submission URL.
    pub fn action(&self) -> String {
        self.form.action()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn whitespace_only_is_nothing() {
        assert_eq!(normalize_body(""), None);
        assert_eq!(normalize_body("  \n\t "), None);
        assert_eq!(normalize_body("  hi \n").as_deref(), Some("hi"));
    }

    #[wasm_bindgen_test]
    fn composer_reads_and_clears_textarea() {
        let doc = web_sys::window().unwrap().document().unwrap();
        let form: HtmlFormElement = doc.create_element("form").unwrap().dyn_into().unwrap();
        form.set_action("/messages");
        form.set_inner_html(r#"<textarea name="body"></textarea><button type="submit">Send</button>"#);

        let composer = Composer::new(form.clone());
        assert_eq!(composer.pending_body(), None);

        let ta: HtmlTextAreaElement = form
            .query_selector("textarea")
            .unwrap()
            .unwrap()
            .dyn_into()
            .unwrap();
        ta.set_value(" hello ");
        assert_eq!(composer.pending_body().as_deref(), Some("hello"));

        composer.set_busy(true);
        assert!(composer.is_busy());
        composer.set_busy(false);
        composer.clear();
        assert_eq!(ta.value(), "");
    }
}
