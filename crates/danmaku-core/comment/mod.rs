//! Comment model and parser
//!
//! Raw wire entries ([`RawComment`]) are validated into immutable [`Comment`]
//! records by [`CommentParser`]. Broken entries never fail a batch; they are
//! returned as [`SkippedEntry`] values in the [`ParseReport`].

pub mod escape;
pub mod parser;
pub mod positioned;
pub mod raw;

pub use escape::{decode_newlines, decode_xml_entities, escape_ass_text};
pub use parser::{CommentParser, ParseReport, SkipReason, SkippedEntry};
pub use positioned::{PlayerCoord, PositionedPath};
pub use raw::{decode_json, decode_xml, RawComment};

use core::fmt;

/// How a comment moves across the stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MotionClass {
    /// Enters at the right edge and travels left (platform mode 1)
    ScrollLeft,
    /// Enters at the left edge and travels right (platform mode 6)
    ScrollRight,
    /// Static, stacked down from the top edge (platform mode 5)
    FixedTop,
    /// Static, stacked up from the bottom edge (platform mode 4)
    FixedBottom,
    /// Free positioned with an explicit path (platform mode 7)
    Special,
}

impl MotionClass {
    /// Map a platform mode code
    ///
    /// # Errors
    ///
    /// Scripted comments (mode 8) yield [`SkipReason::Scripted`], anything
    /// unknown yields [`SkipReason::UnknownMode`].
    pub fn from_mode(mode: i64) -> Result<Self, SkipReason> {
        match mode {
            1 => Ok(Self::ScrollLeft),
            6 => Ok(Self::ScrollRight),
            5 => Ok(Self::FixedTop),
            4 => Ok(Self::FixedBottom),
            7 => Ok(Self::Special),
            8 => Err(SkipReason::Scripted),
            other => Err(SkipReason::UnknownMode(other)),
        }
    }

    /// Whether comments of this class stay in place
    #[must_use]
    pub const fn is_fixed(self) -> bool {
        matches!(self, Self::FixedTop | Self::FixedBottom)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ScrollLeft => "scroll-left",
            Self::ScrollRight => "scroll-right",
            Self::FixedTop => "fixed-top",
            Self::FixedBottom => "fixed-bottom",
            Self::Special => "special",
        }
    }
}

impl fmt::Display for MotionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 24-bit RGB colour (0xRRGGBB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const WHITE: Self = Self(0x00FF_FFFF);
    pub const BLACK: Self = Self(0);

    #[must_use]
    pub const fn red(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    #[must_use]
    pub const fn green(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    #[must_use]
    pub const fn blue(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

/// One parsed comment
///
/// `text` is already escaped for ASS. The metrics are measured on the decoded
/// text before escaping.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Seconds from the start of the video
    pub start_time: f64,
    pub motion: MotionClass,
    /// Font size in canvas pixels
    pub font_size: f64,
    pub color: Rgb,
    pub text: String,
    /// Submission time, carried for ordering diagnostics
    pub sent_at: i64,
    /// Pixel height of the drawn block
    pub height: f64,
    /// Estimated pixel width of the widest line
    pub width: f64,
    /// Explicit path; present exactly for [`MotionClass::Special`]
    pub positioned: Option<PositionedPath>,
}

impl Comment {
    /// Create a comment from decoded plain text, escaping it and measuring it
    #[must_use]
    pub fn new(start_time: f64, motion: MotionClass, font_size: f64, text: &str) -> Self {
        let (lines, longest) = measure(text);
        Self {
            start_time,
            motion,
            font_size,
            color: Rgb::WHITE,
            text: escape_ass_text(text),
            sent_at: 0,
            height: lines as f64 * font_size,
            width: longest as f64 * font_size,
            positioned: None,
        }
    }

    /// Set text colour
    #[must_use]
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }
}

/// Line count and longest line length in characters
fn measure(text: &str) -> (usize, usize) {
    text.split('\n').fold((0, 0), |(lines, longest), line| {
        (lines + 1, longest.max(line.chars().count()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_codes_map_to_motion_classes() {
        assert_eq!(MotionClass::from_mode(1), Ok(MotionClass::ScrollLeft));
        assert_eq!(MotionClass::from_mode(6), Ok(MotionClass::ScrollRight));
        assert_eq!(MotionClass::from_mode(5), Ok(MotionClass::FixedTop));
        assert_eq!(MotionClass::from_mode(4), Ok(MotionClass::FixedBottom));
        assert_eq!(MotionClass::from_mode(7), Ok(MotionClass::Special));
        assert_eq!(MotionClass::from_mode(8), Err(SkipReason::Scripted));
        assert_eq!(MotionClass::from_mode(2), Err(SkipReason::UnknownMode(2)));
    }

    #[test]
    fn metrics_follow_lines_and_longest_line() {
        let comment = Comment::new(0.0, MotionClass::ScrollLeft, 20.0, "abc\nde\n弹幕弹幕");
        assert!((comment.height - 60.0).abs() < f64::EPSILON);
        assert!((comment.width - 80.0).abs() < f64::EPSILON);
        assert_eq!(comment.text, r"abc\Nde\N弹幕弹幕");
    }

    #[test]
    fn rgb_channels() {
        let c = Rgb(0x0012_3456);
        assert_eq!((c.red(), c.green(), c.blue()), (0x12, 0x34, 0x56));
        assert_eq!(Rgb::default(), Rgb::WHITE);
    }
}
