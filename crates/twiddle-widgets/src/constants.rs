#![forbid(unsafe_code)]

//! Shared defaults.

use std::time::Duration;

pub use twiddle_runtime::converter::MIN_SUITABLE_DECIMAL_DIGITS;
pub use twiddle_style::CSS_PREFIX;

/// Poll interval of monitors that do not set `interval`.
pub const MONITOR_DEFAULT_INTERVAL: Duration = Duration::from_millis(200);

/// Rows shown by multi-line monitors that do not set `lineCount`.
pub const MONITOR_DEFAULT_LINE_COUNT: usize = 3;

/// Digits shown by number monitors.
pub const MONITOR_NUMBER_DIGITS: usize = 2;

/// Largest history a monitor keeps, from `bufferSize` or `lineCount`.
pub const MONITOR_MAX_BUFFER_SIZE: usize = 4096;

/// Longest accepted `interval` param.
pub const MAX_TICK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
