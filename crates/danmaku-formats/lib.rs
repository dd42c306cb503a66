//! # danmaku-formats
//!
//! Everything around the danmaku layout core that is not layout:
//!
//! - [`formats`]: text format shims (SRT to ASS, caption JSON to SRT)
//! - [`export`]: file-to-file conversions, including the two-step caption
//!   JSON path with its scoped intermediate file
//! - [`tracks`]: subtitle track selection and the retrieval traits that let
//!   callers plug in their own network client
//!
//! ## Example
//!
//! ```rust
//! use danmaku_formats::formats::{SrtFormat, SubtitleConverter};
//!
//! let srt = "1\n00:00:01,000 --> 00:00:02,500\n<b>Hello</b>\n";
//! let (ass, result) = SrtFormat::new().convert_str(srt)?;
//! assert_eq!(result.entries, 1);
//! assert!(ass.contains(r"0:00:01.00,0:00:02.50,Default,,0,0,0,,{\b1}Hello{\b0}"));
//! # Ok::<(), danmaku_formats::FormatError>(())
//! ```

#![deny(unsafe_code)]

/// Compile a literal regular expression once
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

pub mod errors;
pub mod export;
pub mod formats;
pub mod tracks;

pub use errors::{FormatError, Result};
pub use export::{export_ass_from_json, export_ass_from_srt, export_ass_from_xml};
pub use formats::{
    CaptionJsonFormat, FormatInfo, FormatRegistry, FormatResult, SrtFormat, SubtitleConverter,
};
pub use tracks::{
    make_danmaku_ass, make_subtitle_ass, select_track, CaptionFetcher, DanmakuPayload,
    DanmakuSource, SubtitleTrack, DEFAULT_STAGE,
};
