//! SRT (SubRip) to ASS
//!
//! Cues keep their timing and text; basic HTML styling becomes inline
//! override tags. Every cue uses one bottom-centre style, so no layout is
//! computed. Blocks that do not parse are skipped with a warning.

use crate::errors::{FormatError, Result};
use crate::formats::{FormatInfo, FormatResult, SubtitleConverter};
use danmaku_core::emit::{DialogueBuilder, ScriptInfo, StyleBuilder, EVENT_FORMAT, STYLE_FORMAT};
use danmaku_core::utils::format_ass_time;
use regex::Captures;

const STYLE_NAME: &str = "Default";

/// One timed cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrtCue {
    /// Start in centiseconds
    pub start: u32,
    /// End in centiseconds
    pub end: u32,
    /// ASS text with override tags, lines joined by `\N`
    pub text: String,
}

/// SRT to ASS shim
#[derive(Debug)]
pub struct SrtFormat {
    info: FormatInfo,
    font_name: String,
    font_size: f64,
}

impl SrtFormat {
    /// Create a new SRT shim with an Arial 20 style
    #[must_use]
    pub fn new() -> Self {
        Self {
            info: FormatInfo {
                name: "SRT".to_string(),
                extensions: vec!["srt".to_string()],
                output_extension: "ass".to_string(),
                description: "SubRip subtitles to ASS with a single bottom-centre style"
                    .to_string(),
            },
            font_name: "Arial".to_string(),
            font_size: 20.0,
        }
    }

    /// Override the font of the subtitle style
    #[must_use]
    pub fn with_font(mut self, name: &str, size: f64) -> Self {
        self.font_name = name.to_string();
        self.font_size = size;
        self
    }

    /// Parse an SRT timestamp (`HH:MM:SS,mmm`) into centiseconds
    ///
    /// A `.` is accepted in place of the comma. Milliseconds are truncated to
    /// whole centiseconds.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidFormat`] for anything else.
    pub fn parse_srt_time(time_str: &str) -> Result<u32> {
        let time_str = time_str.trim();
        let invalid = || FormatError::InvalidFormat(format!("Invalid SRT time format: {time_str}"));

        let (clock, ms_part) = time_str.rsplit_once([',', '.']).ok_or_else(invalid)?;
        if ms_part.is_empty() || ms_part.len() > 3 {
            return Err(invalid());
        }
        let ms: u32 = ms_part.parse().map_err(|_| invalid())?;
        let ms = ms * 10u32.pow(3 - ms_part.len() as u32);

        let mut fields = clock.split(':');
        let (Some(h), Some(m), Some(s), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(invalid());
        };
        let hours: u32 = h.trim().parse().map_err(|_| invalid())?;
        let minutes: u32 = m.parse().map_err(|_| invalid())?;
        let seconds: u32 = s.parse().map_err(|_| invalid())?;
        if minutes >= 60 || seconds >= 60 {
            return Err(invalid());
        }

        hours
            .checked_mul(360_000)
            .and_then(|cs| cs.checked_add(minutes * 6000 + seconds * 100 + ms / 10))
            .ok_or_else(invalid)
    }

    /// Convert SRT styling to ASS override tags
    fn convert_styling(line: &str) -> String {
        let result = regex!(r"(?i)<(/?)([bius])>").replace_all(line, |caps: &Captures<'_>| {
            let state = if caps[1].is_empty() { '1' } else { '0' };
            format!("{{\\{}{state}}}", caps[2].to_ascii_lowercase())
        });
        let result = regex!(r#"(?i)<font\s+color\s*=\s*"?#?([0-9a-f]{6})"?\s*>"#).replace_all(
            &result,
            |caps: &Captures<'_>| {
                let rgb = caps[1].to_ascii_uppercase();
                format!("{{\\c&H{}{}{}&}}", &rgb[4..6], &rgb[2..4], &rgb[0..2])
            },
        );
        let result = regex!(r#"(?i)<font\s+face\s*=\s*"([^"]+)"\s*>"#).replace_all(&result, r"{\fn$1}");
        regex!(r"(?i)</font>")
            .replace_all(&result, r"{\c}")
            .into_owned()
    }

    /// Parse the block starting at `start_idx`
    ///
    /// Returns the index of the first line after the block.
    fn parse_block(lines: &[&str], start_idx: usize) -> Result<(usize, SrtCue)> {
        let mut idx = start_idx;

        // The index line is optional
        if !lines[idx].contains("-->") {
            idx += 1;
        }
        let Some(timestamp_line) = lines.get(idx) else {
            return Err(FormatError::InvalidFormat(
                "Missing timestamp line".to_string(),
            ));
        };
        let Some((start, end)) = timestamp_line.split_once("-->") else {
            return Err(FormatError::InvalidFormat(format!(
                "Invalid timestamp line: {timestamp_line}"
            )));
        };
        // Trailing cue settings ("X1:..") follow the end time
        let end = end.split_whitespace().next().unwrap_or("");
        let start = Self::parse_srt_time(start)?;
        let end = Self::parse_srt_time(end)?;
        idx += 1;

        let mut text_lines = Vec::new();
        while idx < lines.len() && !lines[idx].trim().is_empty() {
            text_lines.push(Self::convert_styling(lines[idx].trim_end()));
            idx += 1;
        }

        if text_lines.is_empty() {
            return Err(FormatError::InvalidFormat(
                "Empty subtitle text".to_string(),
            ));
        }
        if end < start {
            return Err(FormatError::InvalidFormat(format!(
                "Cue ends before it starts: {timestamp_line}"
            )));
        }

        Ok((
            idx,
            SrtCue {
                start,
                end,
                text: text_lines.join("\\N"),
            },
        ))
    }

    /// Parse every valid cue, collecting a warning for each skipped block
    #[must_use]
    pub fn parse_cues(content: &str) -> (Vec<SrtCue>, Vec<String>) {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let lines: Vec<&str> = content.lines().collect();
        let mut cues = Vec::new();
        let mut warnings = Vec::new();
        let mut idx = 0;

        while idx < lines.len() {
            if lines[idx].trim().is_empty() {
                idx += 1;
                continue;
            }
            match Self::parse_block(&lines, idx) {
                Ok((next_idx, cue)) => {
                    cues.push(cue);
                    idx = next_idx;
                }
                Err(e) => {
                    let message = format!("Skipping invalid subtitle at line {}: {e}", idx + 1);
                    tracing::warn!("{message}");
                    warnings.push(message);
                    while idx < lines.len() && !lines[idx].trim().is_empty() {
                        idx += 1;
                    }
                }
            }
        }

        (cues, warnings)
    }

    fn header(&self) -> Result<String> {
        let style = StyleBuilder::new()
            .name(STYLE_NAME)
            .font(&self.font_name, self.font_size)
            .color("&H00FFFFFF")
            .secondary_color("&H0300FFFF")
            .outline_color("&H00000000")
            .back_color("&H02000000")
            .outline(2.0, 1.0)
            .align(2)
            .margins(10, 10, 10)
            .encoding(1)
            .build()?;

        let mut out = ScriptInfo::new()
            .comment("Script generated by danmaku-ass")
            .field("Title", "Converted from SRT")
            .field("ScriptType", "v4.00+")
            .field("Collisions", "Normal")
            .field("PlayDepth", 0)
            .build();
        out.push_str("[V4+ Styles]\n");
        out.push_str(STYLE_FORMAT);
        out.push('\n');
        out.push_str(&style);
        out.push_str("\n\n[Events]\n");
        out.push_str(EVENT_FORMAT);
        out.push('\n');
        Ok(out)
    }
}

impl Default for SrtFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl SubtitleConverter for SrtFormat {
    fn format_info(&self) -> &FormatInfo {
        &self.info
    }

    fn convert_str(&self, content: &str) -> Result<(String, FormatResult)> {
        let (cues, warnings) = Self::parse_cues(content);
        let mut out = self.header()?;

        for cue in &cues {
            let start = format_ass_time(cue.start);
            let end = format_ass_time(cue.end);
            out.push_str(
                &DialogueBuilder::new()
                    .times(&start, &end)
                    .style(STYLE_NAME)
                    .text(&cue.text)
                    .build(),
            );
            out.push('\n');
        }

        tracing::debug!(cues = cues.len(), skipped = warnings.len(), "converted SRT");
        Ok((out, FormatResult::success(cues.len()).with_warnings(warnings)))
    }
}
