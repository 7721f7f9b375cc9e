use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Headers, Request, RequestCredentials, RequestInit, RequestMode, Response};

use super::{api_url, encode_segment, FetchError};
use crate::models::{ImageList, LikeResponse, MessageList, UnreadCount};

/// REST client for the social backend.
///
/// Every call goes through [`ApiClient::fetch_text`] so that network
/// failures, non-2xx statuses and undecodable bodies all surface as a
/// [`FetchError`].
pub struct ApiClient;

impl ApiClient {
    // ---------------- Conversations ----------------

    /// Full message list of the conversation with `username`.
    pub async fn get_messages(username: &str) -> Result<MessageList, FetchError> {
        let url = api_url(&format!("/api/messages/{}", encode_segment(username)));
        Self::get_json(&url).await
    }

    /// Total unread count across all conversations (navbar badge).
    pub async fn get_unread_count() -> Result<UnreadCount, FetchError> {
        Self::get_json(&api_url("/api/unread-count")).await
    }

    /// Unread count for a single conversation partner.
    pub async fn get_partner_unread_count(username: &str) -> Result<UnreadCount, FetchError> {
        let url = api_url(&format!(
            "/api/partner-unread-count/{}",
            encode_segment(username)
        ));
        Self::get_json(&url).await
    }

    /// POST a message form as multipart form data to its own `action`.
    /// The response body is opaque; only success matters.
    pub async fn submit_form(action: &str, form_data: &FormData) -> Result<String, FetchError> {
        let body: &JsValue = form_data.as_ref();
        Self::fetch_text(action, "POST", Some(body), None).await
    }

    // ---------------- Posts & replies ----------------

    pub async fn get_post_images(post_id: &str) -> Result<ImageList, FetchError> {
        let url = api_url(&format!("/api/post/{}/images", encode_segment(post_id)));
        Self::get_json(&url).await
    }

    pub async fn get_reply_images(reply_id: &str) -> Result<ImageList, FetchError> {
        let url = api_url(&format!("/api/reply/{}/images", encode_segment(reply_id)));
        Self::get_json(&url).await
    }

    /// Like or unlike; `path` is `/post/{id}/like`, `/post/{id}/unlike`,
    /// `/reply/{id}/like`, `/reply/{id}/unlike`.
    pub async fn post_like(path: &str) -> Result<LikeResponse, FetchError> {
        let text = Self::fetch_text(&api_url(path), "POST", None, Some("application/json")).await?;
        Self::decode(&text)
    }

    // ---------------- Helpers ----------------

    /// GET `url` and decode the body as `T`.
    pub async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, FetchError> {
        let text = Self::fetch_text(url, "GET", None, None).await?;
        Self::decode(&text)
    }

    pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, FetchError> {
        serde_json::from_str(text).map_err(|e| FetchError::Parse(e.to_string()))
    }

    /// Helper function to make fetch requests and read the body as text.
    pub async fn fetch_text(
        url: &str,
        method: &str,
        body: Option<&JsValue>,
        content_type: Option<&str>,
    ) -> Result<String, FetchError> {
        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);
        opts.set_credentials(RequestCredentials::SameOrigin);

        let headers = Headers::new().map_err(FetchError::request)?;
        if let Some(ct) = content_type {
            headers
                .append("Content-Type", ct)
                .map_err(FetchError::request)?;
        }
        opts.set_headers(&headers);

        // FormData bodies must not carry an explicit Content-Type: the
        // browser adds the multipart boundary itself.
        if let Some(data) = body {
            opts.set_body(data);
        }

        let request = Request::new_with_str_and_init(url, &opts).map_err(FetchError::request)?;

        let window = web_sys::window()
            .ok_or_else(|| FetchError::Request("no global window exists".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(FetchError::network)?;
        let resp: Response = resp_value.dyn_into().map_err(FetchError::network)?;

        if !resp.ok() {
            return Err(FetchError::Status {
                status: resp.status(),
                status_text: resp.status_text(),
            });
        }

        let text_promise = resp.text().map_err(FetchError::network)?;
        let text = JsFuture::from(text_promise)
            .await
            .map_err(FetchError::network)?;
        Ok(text.as_string().unwrap_or_default())
    }
}
