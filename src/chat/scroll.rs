use web_sys::Element;

/// Snapshot of a scroll container's geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMetrics {
    pub scroll_height: i32,
    pub scroll_top: i32,
    pub client_height: i32,
}

impl ScrollMetrics {
    pub fn of(el: &Element) -> Self {
        Self {
            scroll_height: el.scroll_height(),
            scroll_top: el.scroll_top(),
            client_height: el.client_height(),
        }
    }

    /// Pixels left between the bottom of the viewport and the end of the content.
    pub fn distance_from_bottom(&self) -> i32 {
        self.scroll_height - (self.scroll_top + self.client_height)
    }

    /// Slack of `threshold_px` absorbs sub-pixel rounding and the user being
    /// "almost" at the end.
    pub fn is_at_bottom(&self, threshold_px: i32) -> bool {
        self.distance_from_bottom() < threshold_px
    }
}

pub fn is_at_bottom(el: &Element, threshold_px: i32) -> bool {
    ScrollMetrics::of(el).is_at_bottom(threshold_px)
}

pub fn scroll_to_bottom(el: &Element) {
    el.set_scroll_top(el.scroll_height());
}
