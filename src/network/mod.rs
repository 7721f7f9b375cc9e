pub mod api_client;
pub mod config;
pub mod error;

pub use api_client::ApiClient;
pub use config::ApiConfig;
pub use error::FetchError;

use std::cell::RefCell;
use wasm_bindgen::prelude::*;

thread_local! {
    static API_CONFIG: RefCell<ApiConfig> = RefCell::new(ApiConfig::new());
}

/// Override the backend location at runtime, e.g. from an inline script
/// when the bundle is served from a CDN.
#[wasm_bindgen]
pub fn init_api_config_js(base_url: &str) {
    set_api_config(ApiConfig::from_url(base_url));
}

pub fn set_api_config(config: ApiConfig) {
    API_CONFIG.with(|cell| *cell.borrow_mut() = config);
}

/// Resolve an API path against the active configuration.
pub(crate) fn api_url(path: &str) -> String {
    API_CONFIG.with(|cell| cell.borrow().url(path))
}

/// Percent-encode a path segment (usernames may contain anything the
/// registration form accepted).
pub(crate) fn encode_segment(segment: &str) -> String {
    String::from(js_sys::encode_uri_component(segment))
}
