//! Raw comment records and their wire decoders
//!
//! A [`RawComment`] is one entry exactly as the platform delivered it, before
//! any validation. Every field is optional so that a damaged entry still
//! decodes and can be reported by the parser instead of failing the batch.

use super::escape::decode_xml_entities;
use crate::utils::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// One undecoded comment entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawComment {
    /// Appearance time in seconds from the start of the video
    #[serde(default)]
    pub time: Option<f64>,
    /// Platform motion code (1, 4, 5, 6, 7 or 8)
    #[serde(default)]
    pub mode: Option<i64>,
    /// Font size on the platform's 25px scale
    #[serde(default)]
    pub font_size: Option<f64>,
    /// 0xRRGGBB colour
    #[serde(default)]
    pub color: Option<u32>,
    /// Unix timestamp of submission
    #[serde(default)]
    pub sent_at: Option<i64>,
    /// Wire text, newlines still encoded as `/n`
    #[serde(default)]
    pub text: Option<String>,
}

impl RawComment {
    /// Build a complete record
    #[must_use]
    pub fn new(time: f64, mode: i64, text: &str) -> Self {
        Self {
            time: Some(time),
            mode: Some(mode),
            font_size: Some(25.0),
            color: Some(0x00FF_FFFF),
            sent_at: Some(0),
            text: Some(text.to_string()),
        }
    }

    /// Set font size on the 25px scale
    #[must_use]
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Set 0xRRGGBB colour
    #[must_use]
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    /// Decode the comma separated `p` attribute of a `<d>` element
    ///
    /// Layout: `time,mode,size,color,sent_at[,pool,user,id...]`. Fields that
    /// are absent or do not parse are left as `None`.
    #[must_use]
    pub fn from_attributes(p: &str, text: Option<String>) -> Self {
        let mut fields = p.split(',').map(str::trim);
        let time = fields.next().and_then(|f| f.parse().ok());
        let mode = fields.next().and_then(|f| f.parse().ok());
        let font_size = fields.next().and_then(|f| f.parse().ok());
        let color = fields.next().and_then(|f| f.parse().ok());
        let sent_at = fields.next().and_then(|f| f.parse().ok());
        Self {
            time,
            mode,
            font_size,
            color,
            sent_at,
            text,
        }
    }
}

/// Decode a platform XML document (`<i>` root with `<d p="...">` children)
///
/// # Errors
///
/// Returns [`CoreError::Input`] when the document has no `<i>` root element.
pub fn decode_xml(document: &str) -> Result<Vec<RawComment>> {
    if !regex!(r"<i(?:\s[^>]*)?>|<i\s*/>").is_match(document) {
        return Err(CoreError::input("danmaku XML has no <i> root element"));
    }

    let entries = regex!(r"(?s)<d\b([^>]*?)(?:/>|>(.*?)</d>)")
        .captures_iter(document)
        .map(|caps| {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let p = regex!(r#"\bp\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
                .captures(attrs)
                .and_then(|p| p.get(1).or_else(|| p.get(2)))
                .map_or("", |m| m.as_str());
            let text = caps
                .get(2)
                .map(|m| decode_xml_entities(strip_cdata(m.as_str())).into_owned());
            RawComment::from_attributes(p, text)
        })
        .collect();
    Ok(entries)
}

fn strip_cdata(text: &str) -> &str {
    text.strip_prefix("<![CDATA[")
        .and_then(|inner| inner.strip_suffix("]]>"))
        .unwrap_or(text)
}

/// Decode a JSON array of [`RawComment`] objects
///
/// # Errors
///
/// Returns [`CoreError::Input`] when the document is not a JSON array of
/// objects.
pub fn decode_json(document: &str) -> Result<Vec<RawComment>> {
    serde_json::from_str(document)
        .map_err(|e| CoreError::input(format!("invalid comment list JSON: {e}")))
}
