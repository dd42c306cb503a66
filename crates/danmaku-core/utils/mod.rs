//! Shared helpers for danmaku-core
//!
//! ASS timestamps are centisecond based (`H:MM:SS.cc`). Comment timelines are
//! floating point seconds, so everything funnels through
//! [`seconds_to_centiseconds`] before formatting.

pub mod errors;

pub use errors::{CoreError, Result};

/// Round a timeline position in seconds to whole centiseconds
///
/// Negative and non-finite values clamp to zero.
#[must_use]
pub fn seconds_to_centiseconds(seconds: f64) -> u32 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    let cs = (seconds * 100.0).round();
    if cs >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        cs as u32
    }
}

/// Format centiseconds as an ASS timestamp (`H:MM:SS.cc`)
#[must_use]
pub fn format_ass_time(centiseconds: u32) -> String {
    let hours = centiseconds / 360_000;
    let remainder = centiseconds % 360_000;
    let minutes = remainder / 6000;
    let remainder = remainder % 6000;
    let seconds = remainder / 100;
    let cs = remainder % 100;

    format!("{hours}:{minutes:02}:{seconds:02}.{cs:02}")
}

/// Format a timeline position in seconds as an ASS timestamp
#[must_use]
pub fn format_timestamp(seconds: f64) -> String {
    format_ass_time(seconds_to_centiseconds(seconds))
}
