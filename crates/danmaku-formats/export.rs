//! File-to-file exports
//!
//! Every export reads one input file and replaces the output file. The caption
//! JSON path goes through an intermediate SRT file that lives only for the
//! duration of the call, next to the output file.

use crate::errors::{FormatError, Result};
use crate::formats::{CaptionJsonFormat, FormatResult, SrtFormat, SubtitleConverter};
use danmaku_core::emit::write_document;
use danmaku_core::{CanvasConfig, ConversionSummary, Danmaku2Ass};
use std::io::Write;
use std::path::Path;

/// Convert a danmaku XML file into a laid-out ASS file
///
/// # Errors
///
/// Returns the configuration error of `config`, or an I/O or input error
/// for the files involved.
#[tracing::instrument(skip(config), fields(width = config.width, height = config.height))]
pub fn export_ass_from_xml(
    input: &Path,
    output: &Path,
    config: CanvasConfig,
) -> Result<ConversionSummary> {
    let converter = Danmaku2Ass::new(config)?;
    Ok(converter.convert_xml_file(input, output)?)
}

/// Convert an SRT file into an ASS file
///
/// # Errors
///
/// Returns [`FormatError::Io`] when either file cannot be accessed.
pub fn export_ass_from_srt(input: &Path, output: &Path) -> Result<FormatResult> {
    let (document, result) = SrtFormat::new().convert_path(input)?;
    write_document(output, &document)?;
    Ok(result)
}

/// Convert a caption JSON file into an ASS file through an intermediate SRT
///
/// The intermediate file is removed before returning, on success and on
/// failure alike. Warnings from both steps are merged.
///
/// # Errors
///
/// Returns [`FormatError::Json`] when the input is not a caption document and
/// [`FormatError::Io`] when a file cannot be accessed.
#[tracing::instrument]
pub fn export_ass_from_json(input: &Path, output: &Path) -> Result<FormatResult> {
    let (srt, caption_result) = CaptionJsonFormat::new().convert_path(input)?;

    let dir = output
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut intermediate = tempfile::Builder::new()
        .prefix("danmaku-caption-")
        .suffix(".srt")
        .tempfile_in(dir)
        .map_err(|e| FormatError::Io(format!("Failed to create intermediate file: {e}")))?;
    intermediate
        .write_all(srt.as_bytes())
        .map_err(|e| FormatError::io(intermediate.path(), &e))?;

    let srt_result = export_ass_from_srt(intermediate.path(), output)?;
    tracing::debug!(path = %intermediate.path().display(), "removing intermediate SRT");

    let mut warnings = caption_result.warnings;
    warnings.extend(srt_result.warnings);
    Ok(FormatResult::success(srt_result.entries).with_warnings(warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xml_export_writes_laid_out_document() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("danmaku.xml");
        let output = dir.path().join("danmaku.ass");
        std::fs::write(
            &input,
            r#"<i><d p="0,1,25,16777215,0">a</d><d p="0,1,25,16777215,0">b</d></i>"#,
        )
        .unwrap();

        let summary = export_ass_from_xml(&input, &output, CanvasConfig::new(1280, 720)).unwrap();
        assert_eq!(summary.events, 2);
        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains(r"{\move(1280, 25, -25, 25)}b"));
    }

    #[test]
    fn xml_export_rejects_bad_config_before_touching_files() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("never.ass");
        let err = export_ass_from_xml(
            &dir.path().join("missing.xml"),
            &output,
            CanvasConfig::new(0, 720),
        )
        .unwrap_err();
        assert!(matches!(err, FormatError::Core(ref e) if e.is_config_error()));
        assert!(!output.exists());
    }

    #[test]
    fn json_export_leaves_no_intermediate_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("caption.json");
        let output = dir.path().join("caption.ass");
        std::fs::write(
            &input,
            r#"{"body":[{"from":1.0,"to":2.0,"content":"hello"},{"from":5.0,"to":4.0,"content":"bad"}]}"#,
        )
        .unwrap();

        let result = export_ass_from_json(&input, &output).unwrap();
        assert_eq!(result.entries, 1);
        assert_eq!(result.warnings.len(), 1);

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains("Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,hello"));
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "srt"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn json_export_fails_on_unwritable_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("caption.json");
        std::fs::write(&input, r#"{"body":[]}"#).unwrap();
        let err = export_ass_from_json(&input, &dir.path().join("missing").join("out.ass"))
            .unwrap_err();
        assert!(matches!(err, FormatError::Io(ref m) if m.contains("intermediate")));
    }
}
