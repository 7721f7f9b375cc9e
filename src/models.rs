use serde::{Deserialize, Serialize};

/// One direct message as served by `/api/messages/{username}`.
///
/// Everything except `is_read` is immutable once the backend has created
/// the message; `is_read` only ever goes from `false` to `true`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u32,
    pub body: String,
    pub sender_id: u32,
    #[serde(default)]
    pub recipient_id: Option<u32>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub sender_avatar: Option<String>,
}

/// Envelope of the message-list endpoint. A payload without a `messages`
/// key decodes to an empty list, which reconciles to a no-op.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MessageList {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// Response of both `/api/unread-count` and `/api/partner-unread-count/{username}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCount {
    #[serde(default)]
    pub unread_count: u32,
}

/// An image attached to a post or reply.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub filename: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub upload_type: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ImageList {
    #[serde(default)]
    pub images: Vec<GalleryImage>,
}

/// Like / unlike result. The backend answers either
/// `{ success, liked, like_count }` or `{ error }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LikeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn message_list_accepts_sparse_payloads() {
        let list: MessageList = serde_json::from_value(json!({
            "messages": [
                { "id": 1, "body": "hi", "sender_id": 2, "is_read": false, "created_at": "10:00" },
                { "id": 2, "body": "yo", "sender_id": 5, "recipient_id": 2, "is_read": true,
                  "created_at": "10:01", "sender_avatar": "a.png" }
            ]
        }))
        .unwrap();

        assert_eq!(list.messages.len(), 2);
        assert_eq!(list.messages[0].recipient_id, None);
        assert_eq!(list.messages[1].sender_avatar.as_deref(), Some("a.png"));
    }

    #[wasm_bindgen_test]
    fn missing_messages_key_is_empty() {
        let list: MessageList = serde_json::from_str("{}").unwrap();
        assert!(list.messages.is_empty());
    }

    #[wasm_bindgen_test]
    fn like_error_payload() {
        let resp: LikeResponse = serde_json::from_str(r#"{"error":"login required"}"#).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("login required"));
    }
}
