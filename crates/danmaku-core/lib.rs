//! # danmaku-core
//!
//! Converts danmaku (timestamped scrolling comments) into an ASS subtitle
//! document. The pipeline has three stages:
//!
//! - **Parsing** ([`comment`]): raw entries from the platform's XML or JSON
//!   lists become sorted, escaped [`Comment`] records. Malformed entries are
//!   skipped and reported, never fatal.
//! - **Layout** ([`layout`]): a greedy single pass assigns every comment a lane
//!   so that nothing visible at the same time collides, including scrolling
//!   comments catching up with slower ones in the same lane.
//! - **Emission** ([`emit`]): the header, one style and a `Dialogue:` line per
//!   placed comment with its move/position tags.
//!
//! ## Quick Start
//!
//! ```rust
//! use danmaku_core::{CanvasConfig, Danmaku2Ass, RawComment};
//!
//! let config = CanvasConfig::new(1280, 720).with_durations(8.0, 4.0);
//! let converter = Danmaku2Ass::new(config)?;
//!
//! let entries = vec![
//!     RawComment::new(0.0, 1, "first!"),
//!     RawComment::new(0.0, 5, "pinned to the top"),
//! ];
//! let conversion = converter.convert_raw(&entries)?;
//! assert_eq!(conversion.summary.events, 2);
//! assert_eq!(conversion.summary.warning_count(), 0);
//! # Ok::<(), danmaku_core::CoreError>(())
//! ```
//!
//! The core performs no I/O except where a path is passed in explicitly, and
//! holds no state between conversions: independent conversions may run on
//! separate threads without coordination.

#![deny(unsafe_code)]

/// Compile a literal regular expression once
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

pub mod comment;
pub mod config;
pub mod convert;
pub mod emit;
pub mod layout;
pub mod utils;

pub use comment::{Comment, CommentParser, MotionClass, ParseReport, RawComment, Rgb};
pub use config::CanvasConfig;
pub use convert::{Conversion, ConversionSummary, Danmaku2Ass};
pub use emit::AssWriter;
pub use layout::{layout, DropReason, LayoutEngine, LayoutReport, PlacedComment};
pub use utils::{CoreError, Result};

/// Crate version for runtime compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
