//! ASS document emission
//!
//! An emitted document is the danmaku header followed by one `Dialogue:` line
//! per placed comment, in placement order. Files are always written whole;
//! an existing file at the target path is replaced.

pub mod color;
pub mod dialogue;
pub mod header;

pub use color::ass_color;
pub use dialogue::{dialogue_line, DialogueBuilder, Overrides};
pub use header::{danmaku_header, ScriptInfo, StyleBuilder, EVENT_FORMAT, STYLE_FORMAT};

use crate::config::CanvasConfig;
use crate::layout::LayoutReport;
use crate::utils::{CoreError, Result};
use std::path::Path;

/// Serializes laid-out comments for one canvas
#[derive(Debug, Clone, Copy)]
pub struct AssWriter<'c> {
    config: &'c CanvasConfig,
}

impl<'c> AssWriter<'c> {
    #[must_use]
    pub const fn new(config: &'c CanvasConfig) -> Self {
        Self { config }
    }

    /// Render the complete document
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] when the style line cannot be written.
    pub fn render(&self, report: &LayoutReport<'_>) -> Result<String> {
        let mut out = danmaku_header(self.config)?;
        out.reserve(report.placed.len() * 96);
        for placed in &report.placed {
            out.push_str(&dialogue_line(placed, self.config));
            out.push('\n');
        }
        Ok(out)
    }

    /// Render and write the document to `path`, replacing any existing file
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] naming the path when the write fails.
    pub fn write_file(&self, report: &LayoutReport<'_>, path: &Path) -> Result<()> {
        let document = self.render(report)?;
        write_document(path, &document)
    }
}

/// Write a finished document, replacing any existing file
///
/// # Errors
///
/// Returns [`CoreError::Io`] naming the path when the write fails.
pub fn write_document(path: &Path, document: &str) -> Result<()> {
    std::fs::write(path, document).map_err(|e| CoreError::io(path, &e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::{Comment, MotionClass};
    use crate::layout::layout;

    #[test]
    fn empty_report_is_header_only() {
        let config = CanvasConfig::new(800, 600);
        let report = layout(&config, &[]).unwrap();
        let document = AssWriter::new(&config).render(&report).unwrap();
        assert!(document.ends_with(&format!("[Events]\n{EVENT_FORMAT}\n")));
        assert!(!document.contains("Dialogue:"));
    }

    #[test]
    fn write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ass");
        std::fs::write(&path, "stale content that must disappear").unwrap();

        let config = CanvasConfig::new(800, 600);
        let comments = vec![Comment::new(0.0, MotionClass::ScrollLeft, 25.0, "hi")];
        let report = layout(&config, &comments).unwrap();
        AssWriter::new(&config).write_file(&report, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("[Script Info]\n"));
        assert!(!written.contains("stale"));
        assert_eq!(written.matches("Dialogue:").count(), 1);
    }

    #[test]
    fn write_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.ass");
        let err = write_document(&path, "x").unwrap_err();
        assert!(matches!(err, CoreError::Io(ref message) if message.contains("missing")));
    }
}
