//! Small crate-wide convenience macros.

/// Log a formatted line to the browser console in debug builds only.
///
/// Release builds compile the call away entirely, so it is fine to leave
/// chatty tracing in hot paths such as the poll loop.
///
/// ```rust,ignore
/// debug_log!("poll #{} appended {} message(s)", seq, count);
/// ```
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        #[cfg(debug_assertions)]
        {
            web_sys::console::log_1(&format!($($arg)*).into());
        }
    }};
}

/// Log a formatted warning to the browser console (all build profiles).
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        web_sys::console::warn_1(&format!($($arg)*).into())
    };
}

/// Log a formatted error to the browser console (all build profiles).
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        web_sys::console::error_1(&format!($($arg)*).into())
    };
}
