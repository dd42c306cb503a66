//! Validation of raw entries into [`Comment`] records

use super::escape::{decode_newlines, escape_ass_text};
use super::positioned::PositionedPath;
use super::raw::RawComment;
use super::{Comment, MotionClass, Rgb};
use crate::config::{CanvasConfig, REFERENCE_FONT_SIZE};
use crate::utils::Result;
use core::fmt;
use regex::Regex;

/// Why an entry was left out of the comment list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingTime,
    /// Time is NaN or infinite
    InvalidTime,
    MissingMode,
    UnknownMode(i64),
    /// Mode 8 script comments cannot be expressed in ASS
    Scripted,
    MissingText,
    /// Mode 7 payload that does not decode
    InvalidPosition(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTime => f.write_str("missing timestamp"),
            Self::InvalidTime => f.write_str("timestamp is not a finite number"),
            Self::MissingMode => f.write_str("missing mode"),
            Self::UnknownMode(mode) => write!(f, "unknown mode {mode}"),
            Self::Scripted => f.write_str("scripted comments are not supported"),
            Self::MissingText => f.write_str("missing text"),
            Self::InvalidPosition(why) => write!(f, "invalid positioned payload: {why}"),
        }
    }
}

/// An input entry that did not become a comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Position of the entry in the input sequence
    pub index: usize,
    pub reason: SkipReason,
}

/// Output of one parse run
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    /// Comments sorted ascending by start time, ties in input order
    pub comments: Vec<Comment>,
    pub skipped: Vec<SkippedEntry>,
    /// Entries removed by a text filter
    pub filtered: usize,
}

/// Turns raw entries into sorted [`Comment`] records
#[derive(Debug, Clone)]
pub struct CommentParser {
    base_font_size: f64,
    filters: Vec<Regex>,
}

impl CommentParser {
    /// Parser that scales font sizes onto a canvas with the given base size
    #[must_use]
    pub const fn new(base_font_size: f64) -> Self {
        Self {
            base_font_size,
            filters: Vec::new(),
        }
    }

    /// Parser configured from a canvas, including its text filters
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::InvalidFilter`] for a bad filter pattern.
    pub fn from_config(config: &CanvasConfig) -> Result<Self> {
        Ok(Self {
            base_font_size: config.font_size,
            filters: config.compile_filters()?,
        })
    }

    /// Add a compiled text filter
    #[must_use]
    pub fn with_filter(mut self, filter: Regex) -> Self {
        self.filters.push(filter);
        self
    }

    /// Validate, decode and sort a batch of raw entries
    pub fn parse(&self, entries: &[RawComment]) -> ParseReport {
        let mut report = ParseReport::default();
        for (index, raw) in entries.iter().enumerate() {
            match self.parse_entry(raw) {
                Ok(Some(comment)) => report.comments.push(comment),
                Ok(None) => report.filtered += 1,
                Err(reason) => {
                    tracing::warn!(index, %reason, "skipping malformed comment");
                    report.skipped.push(SkippedEntry { index, reason });
                }
            }
        }
        // stable: equal start times keep input order
        report
            .comments
            .sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        report
    }

    /// Parse one entry; `Ok(None)` means a filter removed it
    fn parse_entry(&self, raw: &RawComment) -> std::result::Result<Option<Comment>, SkipReason> {
        let start_time = raw.time.ok_or(SkipReason::MissingTime)?;
        if !start_time.is_finite() {
            return Err(SkipReason::InvalidTime);
        }
        let motion = MotionClass::from_mode(raw.mode.ok_or(SkipReason::MissingMode)?)?;
        let wire_text = raw.text.as_deref().ok_or(SkipReason::MissingText)?;
        let wire_size = raw.font_size.unwrap_or(REFERENCE_FONT_SIZE);
        let color = Rgb(raw.color.unwrap_or(Rgb::WHITE.0) & 0x00FF_FFFF);
        let sent_at = raw.sent_at.unwrap_or_default();

        if motion == MotionClass::Special {
            let path = PositionedPath::parse(wire_text).map_err(SkipReason::InvalidPosition)?;
            if self.is_filtered(&path.text) {
                return Ok(None);
            }
            return Ok(Some(Comment {
                start_time,
                motion,
                // positioned text is scaled by the stage zoom, not the canvas
                font_size: wire_size,
                color,
                text: escape_ass_text(&path.text),
                sent_at,
                height: 0.0,
                width: 0.0,
                positioned: Some(path),
            }));
        }

        let text = decode_newlines(wire_text);
        if self.is_filtered(&text) {
            return Ok(None);
        }
        let font_size = wire_size * self.base_font_size / REFERENCE_FONT_SIZE;
        let mut comment = Comment::new(start_time, motion, font_size, &text).with_color(color);
        comment.sent_at = sent_at;
        Ok(Some(comment))
    }

    fn is_filtered(&self, text: &str) -> bool {
        self.filters.iter().any(|filter| filter.is_match(text))
    }
}
