//! Splitter configuration, loadable from TOML

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::chunker::{
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_SEPARATORS, KeepSeparator, Language,
    TextSplitter,
};
use crate::error::SplitterError;

/// Serializable splitter settings.
///
/// ```toml
/// chunk_size = 1000
/// chunk_overlap = 100
/// separators = ["\n\n", "\n", " ", ""]
/// keep_separator = "start"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Maximum chunk length in chars
    pub chunk_size: usize,
    /// Overlap between adjacent chunks in chars
    pub chunk_overlap: usize,
    /// Separators in priority order
    pub separators: Vec<String>,
    /// Compile separators as regular expressions
    pub separator_regex: bool,
    pub keep_separator: KeepSeparator,
    pub strip_whitespace: bool,
    /// Separator preset; replaces `separators` when set
    pub language: Option<Language>,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
            separator_regex: false,
            keep_separator: KeepSeparator::default(),
            strip_whitespace: true,
            language: None,
        }
    }
}

impl SplitterConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, SplitterError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self, SplitterError> {
        let contents = fs::read_to_string(path).map_err(|source| SplitterError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check preconditions without compiling separators
    pub fn validate(&self) -> Result<(), SplitterError> {
        if self.chunk_size == 0 {
            return Err(SplitterError::InvalidChunkSize);
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(SplitterError::OverlapTooLarge {
                overlap: self.chunk_overlap,
                size: self.chunk_size,
            });
        }
        if self.language.is_none() && self.separators.is_empty() {
            return Err(SplitterError::NoSeparators);
        }
        Ok(())
    }

    pub fn build(&self) -> Result<TextSplitter, SplitterError> {
        self.validate()?;

        let builder = TextSplitter::builder()
            .chunk_size(self.chunk_size)
            .chunk_overlap(self.chunk_overlap)
            .keep_separator(self.keep_separator)
            .strip_whitespace(self.strip_whitespace);

        let builder = match self.language {
            Some(language) => builder.language(language),
            None => builder
                .separators(self.separators.iter().cloned())
                .separator_regex(self.separator_regex),
        };

        builder.build()
    }
}
