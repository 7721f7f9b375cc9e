/// API route configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl Default for ApiConfig {
    /// Same-origin configuration: an empty base yields root-relative URLs
    /// such as `/api/unread-count`, which is what the templates expect when
    /// the WASM bundle is served by the application itself.
    fn default() -> Self {
        Self { base_url: String::new() }
    }
}

impl ApiConfig {
    /// Build from the `API_BASE_URL` variable baked in at compile time,
    /// falling back to same-origin when it is absent.
    pub fn new() -> Self {
        match option_env!("API_BASE_URL") {
            Some(url) => Self::from_url(url),
            None => Self::default(),
        }
    }

    /// Create a new ApiConfig from a URL string
    pub fn from_url(url: &str) -> Self {
        Self { base_url: url.trim().trim_end_matches('/').to_string() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an absolute path such as `/api/messages/alice`.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn default_is_same_origin() {
        assert_eq!(ApiConfig::default().url("/api/unread-count"), "/api/unread-count");
    }

    #[wasm_bindgen_test]
    fn from_url_strips_trailing_slash() {
        let cfg = ApiConfig::from_url("https://example.test/ ");
        assert_eq!(cfg.base_url(), "https://example.test");
        assert_eq!(cfg.url("/post/3/like"), "https://example.test/post/3/like");
        assert_eq!(cfg.url("api/x"), "https://example.test/api/x");
    }
}
