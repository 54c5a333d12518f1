use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitterError {
    #[error("Chunk size must be greater than zero")]
    InvalidChunkSize,

    #[error("Chunk overlap {overlap} must be smaller than chunk size {size}")]
    OverlapTooLarge { overlap: usize, size: usize },

    #[error("At least one separator is required")]
    NoSeparators,

    #[error("Invalid separator pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
