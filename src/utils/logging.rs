//! Logging macros gated on a module-level `ENABLE_LOGS` flag.
//!
//! Per-tick code (the focus probe, the audio thread) would flood the log at
//! one line per second, so those modules opt in with a constant:
//!
//! ```ignore
//! const ENABLE_LOGS: bool = false;
//!
//! use crate::{log_debug, log_warn};
//!
//! log_debug!("probe returned {title:?}");
//! ```
//!
//! The macros are exported at the crate root.

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Warnings about a degraded output device. Still gated, because a missing
/// audio device would otherwise warn on every tone.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}
