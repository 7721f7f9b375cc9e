pub mod avatar_preview;
pub mod image_carousel;
pub mod like_button;
pub mod media_preview;
pub mod reply_toggle;
pub mod unread_badge;
