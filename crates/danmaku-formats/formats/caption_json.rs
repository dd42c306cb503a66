//! Caption JSON to SRT
//!
//! The platform delivers closed captions as
//! `{"body": [{"from": 1.0, "to": 2.5, "content": "..."}]}` with times in
//! seconds. Each usable entry becomes one numbered SRT block.

use crate::errors::Result;
use crate::formats::{FormatInfo, FormatResult, SubtitleConverter};
use serde::Deserialize;
use std::fmt::Write as _;

/// Caption document as delivered
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptionDocument {
    #[serde(default)]
    pub body: Vec<CaptionLine>,
}

/// One caption entry; incomplete entries are skipped during conversion
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptionLine {
    #[serde(default)]
    pub from: Option<f64>,
    #[serde(default)]
    pub to: Option<f64>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Caption JSON to SRT shim
#[derive(Debug)]
pub struct CaptionJsonFormat {
    info: FormatInfo,
}

impl CaptionJsonFormat {
    #[must_use]
    pub fn new() -> Self {
        Self {
            info: FormatInfo {
                name: "Caption JSON".to_string(),
                extensions: vec!["json".to_string()],
                output_extension: "srt".to_string(),
                description: "Platform caption JSON to SubRip".to_string(),
            },
        }
    }

    /// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`)
    #[must_use]
    pub fn format_srt_time(seconds: f64) -> String {
        let total_ms = if seconds.is_finite() && seconds > 0.0 {
            (seconds * 1000.0).round() as u64
        } else {
            0
        };
        let hours = total_ms / 3_600_000;
        let minutes = total_ms % 3_600_000 / 60_000;
        let secs = total_ms % 60_000 / 1000;
        let ms = total_ms % 1000;
        format!("{hours:02}:{minutes:02}:{secs:02},{ms:03}")
    }

    /// Check one entry, returning its times and non-empty text lines
    fn usable(line: &CaptionLine) -> std::result::Result<(f64, f64, Vec<&str>), &'static str> {
        let (Some(from), Some(to)) = (line.from, line.to) else {
            return Err("missing from/to");
        };
        if !from.is_finite() || !to.is_finite() {
            return Err("non-finite time");
        }
        if to <= from {
            return Err("ends before it starts");
        }
        // Blank lines would terminate the SRT block early
        let text: Vec<&str> = line
            .content
            .as_deref()
            .unwrap_or("")
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.trim().is_empty())
            .collect();
        if text.is_empty() {
            return Err("empty content");
        }
        Ok((from, to, text))
    }
}

impl Default for CaptionJsonFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl SubtitleConverter for CaptionJsonFormat {
    fn format_info(&self) -> &FormatInfo {
        &self.info
    }

    fn convert_str(&self, content: &str) -> Result<(String, FormatResult)> {
        let document: CaptionDocument = serde_json::from_str(content)?;
        let mut out = String::new();
        let mut warnings = Vec::new();
        let mut written = 0;

        for (index, line) in document.body.iter().enumerate() {
            match Self::usable(line) {
                Ok((from, to, text)) => {
                    written += 1;
                    let _ = writeln!(
                        out,
                        "{written}\n{} --> {}\n{}\n",
                        Self::format_srt_time(from),
                        Self::format_srt_time(to),
                        text.join("\n")
                    );
                }
                Err(reason) => {
                    let message = format!("Skipping caption entry {index}: {reason}");
                    tracing::warn!("{message}");
                    warnings.push(message);
                }
            }
        }

        Ok((out, FormatResult::success(written).with_warnings(warnings)))
    }
}
