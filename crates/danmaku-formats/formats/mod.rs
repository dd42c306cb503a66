//! Subtitle format shims
//!
//! A shim turns one text format into another without any layout: SRT becomes
//! ASS with a single bottom-centre style, and caption JSON becomes SRT. Each
//! shim implements [`SubtitleConverter`] and can be looked up by input
//! extension through a [`FormatRegistry`].

pub mod caption_json;
pub mod srt;

pub use caption_json::CaptionJsonFormat;
pub use srt::SrtFormat;

use crate::errors::{FormatError, Result};
use ahash::AHashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Metadata about a format shim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatInfo {
    /// Format name (e.g., "SRT")
    pub name: String,
    /// Input file extensions handled by the shim
    pub extensions: Vec<String>,
    /// Extension of the produced document
    pub output_extension: String,
    /// Brief description of the conversion
    pub description: String,
}

/// Outcome of one shim conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatResult {
    /// Entries written to the output
    pub entries: usize,
    /// Input blocks that were skipped
    pub warnings: Vec<String>,
}

impl FormatResult {
    #[must_use]
    pub fn success(entries: usize) -> Self {
        Self {
            entries,
            warnings: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// A conversion from one subtitle text format to another
pub trait SubtitleConverter: fmt::Debug + Send + Sync {
    /// Get information about this format
    fn format_info(&self) -> &FormatInfo;

    /// Check if this shim reads files with the given extension
    fn can_convert(&self, extension: &str) -> bool {
        self.format_info()
            .extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }

    /// Convert a complete document
    ///
    /// # Errors
    ///
    /// Fails only when the input as a whole is unusable; bad blocks are
    /// reported in [`FormatResult::warnings`].
    fn convert_str(&self, content: &str) -> Result<(String, FormatResult)>;

    /// Convert from a reader
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Io`] when the reader fails.
    fn convert_reader(&self, reader: &mut dyn Read) -> Result<(String, FormatResult)> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|e| FormatError::Io(format!("Failed to read input: {e}")))?;
        self.convert_str(&content)
    }

    /// Convert a file
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Io`] naming the path when it cannot be read.
    fn convert_path(&self, path: &Path) -> Result<(String, FormatResult)> {
        let content = std::fs::read_to_string(path).map_err(|e| FormatError::io(path, &e))?;
        self.convert_str(&content)
    }
}

/// Registry of available shims, keyed by format name
#[derive(Debug, Default)]
pub struct FormatRegistry {
    converters: AHashMap<String, Box<dyn SubtitleConverter>>,
}

impl FormatRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the SRT and caption JSON shims
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SrtFormat::new()));
        registry.register(Box::new(CaptionJsonFormat::new()));
        registry
    }

    /// Register a shim, replacing any with the same name
    pub fn register(&mut self, converter: Box<dyn SubtitleConverter>) {
        let name = converter.format_info().name.clone();
        self.converters.insert(name, converter);
    }

    /// Look up a shim by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn SubtitleConverter> {
        self.converters.get(name).map(|converter| &**converter)
    }

    /// Find the shim that reads the given file extension
    #[must_use]
    pub fn find_by_extension(&self, extension: &str) -> Option<&dyn SubtitleConverter> {
        let mut names: Vec<&String> = self.converters.keys().collect();
        names.sort();
        names
            .into_iter()
            .filter_map(|name| self.converters.get(name))
            .find(|converter| converter.can_convert(extension))
            .map(|converter| &**converter)
    }

    /// Names of all registered shims, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.converters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
