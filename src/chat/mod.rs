//! Conversation view: polls one direct-message thread, appends new
//! messages, flips read receipts in place and keeps unread badges fresh.

pub mod badge;
pub mod bubble;
pub mod composer;
pub mod displayed;
pub mod scroll;
pub mod sequence;
pub mod view;

pub use displayed::{DisplayedMessages, ReconcilePlan};
pub use sequence::RequestSequence;
pub use view::{BadgeTickets, ConversationView, PollOutcome};

use crate::constants::{
    DEFAULT_APPEND_SCROLL_DELAY_MS, DEFAULT_AT_BOTTOM_THRESHOLD_PX, DEFAULT_BADGE_INTERVAL_MS,
    DEFAULT_INITIAL_BADGE_DELAY_MS, DEFAULT_INITIAL_SCROLL_DELAYS_MS, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_SEND_SCROLL_DELAY_MS,
};

/// Timing and scrolling knobs of a [`ConversationView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Period of the message poll.
    pub poll_interval_ms: u32,
    /// Period of the unread-badge refresh.
    pub badge_interval_ms: u32,
    /// One-off badge refresh shortly after start, once the server has had
    /// a chance to mark the opened thread as read.
    pub initial_badge_delay_ms: u32,
    /// Re-scroll after an append, once avatars have laid out.
    pub append_scroll_delay_ms: u32,
    /// Re-scroll after a successful send.
    pub send_scroll_delay_ms: u32,
    /// Extra scroll-to-bottom attempts right after start.
    pub initial_scroll_delays_ms: Vec<u32>,
    /// Max distance from the end that still counts as "at bottom".
    pub at_bottom_threshold_px: i32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            badge_interval_ms: DEFAULT_BADGE_INTERVAL_MS,
            initial_badge_delay_ms: DEFAULT_INITIAL_BADGE_DELAY_MS,
            append_scroll_delay_ms: DEFAULT_APPEND_SCROLL_DELAY_MS,
            send_scroll_delay_ms: DEFAULT_SEND_SCROLL_DELAY_MS,
            initial_scroll_delays_ms: DEFAULT_INITIAL_SCROLL_DELAYS_MS.to_vec(),
            at_bottom_threshold_px: DEFAULT_AT_BOTTOM_THRESHOLD_PX,
        }
    }
}
