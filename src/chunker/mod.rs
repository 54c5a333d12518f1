mod document;
mod language;
mod merge;
mod separator;
mod splitter;
mod stats;


pub use document::{Chunk, ChunkMetadata, Document};
pub use language::Language;
pub use merge::{MergeSettings, merge_pieces, text_len};
pub use separator::{KeepSeparator, Separator};
pub use splitter::{TextSplitter, TextSplitterBuilder, split_text};
pub use stats::ChunkStats;

/// Default maximum chunk length, in chars
pub const DEFAULT_CHUNK_SIZE: usize = 4000;

/// Default overlap between adjacent chunks, in chars
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Paragraph, line, word, character
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];
