//! Subtitle track selection and retrieval orchestration
//!
//! Fetching from the platform is the caller's business: it is reached only
//! through the [`CaptionFetcher`] and [`DanmakuSource`] traits. This module
//! picks the requested track, hands the payload to the converters and keeps
//! any intermediate file scoped to the call.

use crate::errors::{FormatError, Result};
use crate::export::{export_ass_from_json, export_ass_from_xml};
use crate::formats::FormatResult;
use danmaku_core::{CanvasConfig, ConversionSummary, Danmaku2Ass, RawComment};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Stage size used when the source cannot report one
pub const DEFAULT_STAGE: (u32, u32) = (1440, 1080);

/// One subtitle track listed for a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    /// Language code, e.g. `zh-CN`
    pub lan: String,
    /// Display name, e.g. `中文（自动生成）`
    pub lan_doc: String,
    pub subtitle_url: String,
}

/// Pick the track whose display name is `name`
///
/// # Errors
///
/// Returns [`FormatError::TrackNotFound`] listing the available display
/// names when no track matches.
pub fn select_track<'a>(tracks: &'a [SubtitleTrack], name: &str) -> Result<&'a SubtitleTrack> {
    tracks
        .iter()
        .find(|track| track.lan_doc == name)
        .ok_or_else(|| FormatError::TrackNotFound {
            requested: name.to_string(),
            available: tracks.iter().map(|t| t.lan_doc.clone()).collect(),
        })
}

/// Fetches caption documents by URL
pub trait CaptionFetcher {
    /// Return the caption JSON behind `url`
    ///
    /// # Errors
    ///
    /// Implementations report failures as [`FormatError::Fetch`].
    fn fetch_caption(&self, url: &str) -> Result<String>;
}

/// Danmaku payload as delivered by a source
#[derive(Debug, Clone, PartialEq)]
pub enum DanmakuPayload {
    /// A complete `<i>` XML document
    Xml(String),
    /// Already decoded records
    Records(Vec<RawComment>),
}

/// Supplies the danmaku of one video
pub trait DanmakuSource {
    /// Video dimensions, when known
    fn stage_size(&self) -> Option<(u32, u32)>;

    /// Return the danmaku
    ///
    /// # Errors
    ///
    /// Implementations report failures as [`FormatError::Fetch`].
    fn danmaku(&self) -> Result<DanmakuPayload>;
}

/// Fetch the caption track named `name` and write it as ASS to `output`
///
/// # Errors
///
/// Returns [`FormatError::TrackNotFound`] before any fetch when no track
/// matches, otherwise the fetcher's or the conversion's error.
pub fn make_subtitle_ass<F>(
    tracks: &[SubtitleTrack],
    name: &str,
    fetcher: &F,
    output: &Path,
) -> Result<FormatResult>
where
    F: CaptionFetcher + ?Sized,
{
    let track = select_track(tracks, name)?;
    tracing::info!(lan = %track.lan, url = %track.subtitle_url, "fetching subtitle track");
    let caption = fetcher.fetch_caption(&track.subtitle_url)?;

    let mut staged = tempfile::Builder::new()
        .prefix("danmaku-subtitle-")
        .suffix(".json")
        .tempfile()
        .map_err(|e| FormatError::Io(format!("Failed to create intermediate file: {e}")))?;
    staged
        .write_all(caption.as_bytes())
        .map_err(|e| FormatError::io(staged.path(), &e))?;
    export_ass_from_json(staged.path(), output)
}

/// Fetch the danmaku of a video and write the laid-out ASS to `output`
///
/// `template` supplies every canvas setting except the stage size, which
/// comes from the source or falls back to [`DEFAULT_STAGE`].
///
/// # Errors
///
/// Returns the source's error, a configuration error from `template`, or
/// an I/O error for `output`.
pub fn make_danmaku_ass<S>(
    source: &S,
    template: &CanvasConfig,
    output: &Path,
) -> Result<ConversionSummary>
where
    S: DanmakuSource + ?Sized,
{
    let (width, height) = source.stage_size().unwrap_or_else(|| {
        tracing::warn!(
            width = DEFAULT_STAGE.0,
            height = DEFAULT_STAGE.1,
            "stage size unavailable, using default"
        );
        DEFAULT_STAGE
    });
    let config = CanvasConfig {
        width,
        height,
        ..template.clone()
    };

    match source.danmaku()? {
        DanmakuPayload::Xml(document) => {
            let mut staged = tempfile::Builder::new()
                .prefix("danmaku-")
                .suffix(".xml")
                .tempfile()
                .map_err(|e| FormatError::Io(format!("Failed to create intermediate file: {e}")))?;
            staged
                .write_all(document.as_bytes())
                .map_err(|e| FormatError::io(staged.path(), &e))?;
            export_ass_from_xml(staged.path(), output, config)
        }
        DanmakuPayload::Records(records) => {
            let conversion = Danmaku2Ass::new(config)?.convert_raw(&records)?;
            conversion.write_to(output)?;
            Ok(conversion.summary)
        }
    }
}
