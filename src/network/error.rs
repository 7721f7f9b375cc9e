use thiserror::Error;
use wasm_bindgen::JsValue;

/// Everything that can go wrong between issuing a `fetch` and holding a
/// decoded response.
///
/// Pollers collapse all variants into a single "fetch failed" log line;
/// the distinction only matters for diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("failed to build request: {0}")]
    Request(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("API request failed: {status} {status_text}")]
    Status { status: u16, status_text: String },
    #[error("failed to parse response: {0}")]
    Parse(String),
}

impl FetchError {
    pub(crate) fn request(err: JsValue) -> Self {
        FetchError::Request(describe(&err))
    }

    pub(crate) fn network(err: JsValue) -> Self {
        FetchError::Network(describe(&err))
    }
}

impl From<FetchError> for JsValue {
    fn from(err: FetchError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Best-effort readable form of a thrown JS value.
fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn status_error_message() {
        let err = FetchError::Status { status: 502, status_text: "Bad Gateway".into() };
        assert_eq!(err.to_string(), "API request failed: 502 Bad Gateway");
    }

    #[wasm_bindgen_test]
    fn converts_into_js_value() {
        let js: JsValue = FetchError::Parse("expected value".into()).into();
        assert_eq!(js.as_string().as_deref(), Some("failed to parse response: expected value"));
    }
}
