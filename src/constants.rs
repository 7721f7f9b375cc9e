// Timing defaults for the conversation view - single source of truth
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 2000;
pub const DEFAULT_BADGE_INTERVAL_MS: u32 = 5000;
pub const DEFAULT_INITIAL_BADGE_DELAY_MS: u32 = 500;
pub const DEFAULT_APPEND_SCROLL_DELAY_MS: u32 = 10;
pub const DEFAULT_SEND_SCROLL_DELAY_MS: u32 = 50;
pub const DEFAULT_INITIAL_SCROLL_DELAYS_MS: [u32; 5] = [0, 10, 50, 100, 200];

// Distance (px) from the end of the log that still counts as "at bottom"
pub const DEFAULT_AT_BOTTOM_THRESHOLD_PX: i32 = 100;

// Selectors and ids shared with the server-rendered templates
pub const CHAT_CONTAINER_SELECTOR: &str = ".chat";
pub const MESSAGE_FORM_SELECTOR: &str = "form[action*=\"/messages\"]";
pub const MESSAGE_BODY_SELECTOR: &str = "textarea[name=\"body\"]";
pub const MESSAGE_ID_ATTR: &str = "data-message-id";
pub const READ_RECEIPT_CLASS: &str = "read-receipt";
pub const READ_RECEIPT_MARK: &str = "✓✓";
pub const MESSAGE_META_CLASS: &str = "message-meta";
pub const THREAD_USERNAME_FIELD_ID: &str = "thread-username-data";
pub const GLOBAL_BADGE_ID: &str = "unread-badge";
pub const PARTNER_USERNAME_ATTR: &str = "data-partner-username";
pub const PARTNER_BADGE_CLASS: &str = "partner-unread-badge";

// Uploaded media is served from here
pub const UPLOADS_PREFIX: &str = "/uploads";
pub const DEFAULT_UPLOAD_TYPE: &str = "posts";

// Attachment limits for the post composer
pub const MAX_ATTACHED_IMAGES: usize = 4;
pub const MAX_ATTACHED_VIDEOS: usize = 1;
pub const PREVIEW_NAME_MAX_GRAPHEMES: usize = 40;

// UI labels (the templates are Japanese)
pub const LIKE_LABEL: &str = "いいね";
pub const LIKED_ICON: &str = "❤️";
pub const NOT_LIKED_ICON: &str = "🤍";
pub const GENERIC_ERROR_ALERT: &str = "エラーが発生しました";
pub const MAIN_REPLY_SHOW_LABEL: &str = "💬 返信する";
pub const NESTED_REPLY_SHOW_LABEL: &str = "💬 返信";
pub const REPLY_HIDE_LABEL: &str = "💬 返信を隠す";
pub const REMOVE_LABEL: &str = "削除";
pub const VIDEO_LABEL_PREFIX: &str = "動画: ";
pub const AVATAR_DELETE_LABEL: &str = "アバターを削除";
pub const AVATAR_UNDO_DELETE_LABEL: &str = "削除取り消し";
pub const ALERT_VIDEO_ALREADY_SELECTED: &str =
    "動画が既に選択されています。画像と動画は同時に添付できません。";
pub const ALERT_IMAGES_ALREADY_SELECTED: &str =
    "画像が既に選択されています。画像と動画は同時に添付できません。";
pub const ALERT_TOO_MANY_IMAGES: &str = "画像は最大4個まで選択できます。";
pub const ALERT_TOO_MANY_VIDEOS: &str = "動画は1つまでしか選択できません。";
