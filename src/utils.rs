//! Utility helpers shared across the WASM frontend.

use chrono::{DateTime, NaiveDateTime};
use unicode_segmentation::UnicodeSegmentation;

/// Turn a backend timestamp into the short form shown under a bubble.
///
/// The message API normally sends an already display-formatted string
/// (`"10:00"`, `"2024-05-01 10:00"`), which is returned untouched. Raw
/// ISO-8601 values are shortened to `YYYY-MM-DD HH:MM`.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
    }
    raw.to_string()
}

/// Truncate to at most `max` user-perceived characters, appending an
/// ellipsis when something was cut off.
pub fn truncate_graphemes(text: &str, max: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max {
        text.to_string()
    } else {
        format!("{}...", graphemes[..max].concat())
    }
}

// wasm-bindgen tests ----------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn display_strings_pass_through() {
        assert_eq!(format_timestamp("10:00"), "10:00");
        assert_eq!(format_timestamp("2024-05-01 10:00"), "2024-05-01 10:00");
        assert_eq!(format_timestamp(""), "");
    }

    #[wasm_bindgen_test]
    fn iso_timestamps_are_shortened() {
        assert_eq!(format_timestamp("2024-05-01T10:07:33.123456"), "2024-05-01 10:07");
        assert_eq!(format_timestamp("2024-05-01T10:07:33+00:00"), "2024-05-01 10:07");
    }

    #[wasm_bindgen_test]
    fn truncation_respects_graphemes() {
        assert_eq!(truncate_graphemes("short.png", 40), "short.png");
        assert_eq!(truncate_graphemes("写真のファイル名.jpg", 4), "写真のフ...");
        assert_eq!(truncate_graphemes("👍🏽👍🏽👍🏽", 2), "👍🏽👍🏽...");
    }
}
