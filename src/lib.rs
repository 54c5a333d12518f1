// Public API exports
pub mod chunker;
pub mod config;
pub mod error;
pub mod input;

// Re-export main types for convenience
pub use chunker::{
    Chunk, ChunkMetadata, ChunkStats, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE,
    DEFAULT_SEPARATORS, Document, KeepSeparator, Language, Separator, TextSplitter,
    TextSplitterBuilder, split_text,
};

pub use config::SplitterConfig;
pub use error::SplitterError;
