//! Parse, lay out and emit in one call

use crate::comment::{decode_json, decode_xml, Comment, CommentParser, RawComment, SkippedEntry};
use crate::config::CanvasConfig;
use crate::emit::{write_document, AssWriter};
use crate::layout::{layout, DroppedComment};
use crate::utils::{CoreError, Result};
use std::path::Path;

/// What happened to the input of one conversion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionSummary {
    /// Dialogue lines written
    pub events: usize,
    /// Malformed input entries
    pub skipped: Vec<SkippedEntry>,
    /// Comments the layout engine declined
    pub dropped: Vec<DroppedComment>,
    /// Comments drawn over others under overload
    pub overlaid: usize,
    /// Comments removed by text filters
    pub filtered: usize,
}

impl ConversionSummary {
    /// Skipped plus dropped comments
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.skipped.len() + self.dropped.len()
    }
}

/// A rendered document with its summary
#[derive(Debug, Clone)]
pub struct Conversion {
    pub document: String,
    pub summary: ConversionSummary,
}

impl Conversion {
    /// Write the document to `path`, replacing any existing file
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] when the file cannot be written.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        write_document(path, &self.document)
    }
}

/// Danmaku to ASS converter for one canvas
///
/// ```
/// use danmaku_core::{CanvasConfig, Danmaku2Ass};
///
/// let xml = r#"<i><d p="1.5,1,25,16777215,0,0,0,0">hello</d></i>"#;
/// let converter = Danmaku2Ass::new(CanvasConfig::new(1920, 1080))?;
/// let conversion = converter.convert_xml(xml)?;
/// assert_eq!(conversion.summary.events, 1);
/// assert!(conversion.document.contains(r"{\move(1920, 0, -125, 0)}hello"));
/// # Ok::<(), danmaku_core::CoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Danmaku2Ass {
    config: CanvasConfig,
    parser: CommentParser,
}

impl Danmaku2Ass {
    /// Create a converter
    ///
    /// # Errors
    ///
    /// Returns the validation error of `config`.
    pub fn new(config: CanvasConfig) -> Result<Self> {
        config.validate()?;
        let parser = CommentParser::from_config(&config)?;
        Ok(Self { config, parser })
    }

    #[must_use]
    pub const fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Convert a platform XML document
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Input`] when the document has no `<i>` root.
    pub fn convert_xml(&self, document: &str) -> Result<Conversion> {
        self.convert_raw(&decode_xml(document)?)
    }

    /// Convert a JSON array of raw comment records
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Input`] when the document is not such an array.
    pub fn convert_json(&self, document: &str) -> Result<Conversion> {
        self.convert_raw(&decode_json(document)?)
    }

    /// Convert undecoded records
    ///
    /// # Errors
    ///
    /// Fails only on configuration problems; bad records are reported in the
    /// summary.
    #[tracing::instrument(skip_all, fields(entries = entries.len(), width = self.config.width, height = self.config.height))]
    pub fn convert_raw(&self, entries: &[RawComment]) -> Result<Conversion> {
        let report = self.parser.parse(entries);
        let mut conversion = self.convert_comments(&report.comments)?;
        conversion.summary.skipped = report.skipped;
        conversion.summary.filtered = report.filtered;
        log_summary(&conversion.summary);
        Ok(conversion)
    }

    /// Lay out and emit already parsed comments, sorted by start time
    ///
    /// # Errors
    ///
    /// Fails only on configuration problems.
    pub fn convert_comments(&self, comments: &[Comment]) -> Result<Conversion> {
        let report = layout(&self.config, comments)?;
        let document = AssWriter::new(&self.config).render(&report)?;
        let summary = ConversionSummary {
            events: report.placed.len(),
            overlaid: report.overlaid(),
            dropped: report.dropped,
            ..ConversionSummary::default()
        };
        Ok(Conversion { document, summary })
    }

    /// Convert an XML file into an ASS file
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] when either file cannot be accessed and
    /// [`CoreError::Input`] when the XML has no `<i>` root.
    pub fn convert_xml_file(&self, input: &Path, output: &Path) -> Result<ConversionSummary> {
        let document = std::fs::read_to_string(input).map_err(|e| CoreError::io(input, &e))?;
        let conversion = self.convert_xml(&document)?;
        conversion.write_to(output)?;
        Ok(conversion.summary)
    }
}

fn log_summary(summary: &ConversionSummary) {
    tracing::info!(
        events = summary.events,
        skipped = summary.skipped.len(),
        dropped = summary.dropped.len(),
        overlaid = summary.overlaid,
        filtered = summary.filtered,
        "danmaku conversion finished"
    );
}
