use tracing::trace;

use super::language::Language;
use super::merge::{MergeSettings, Span, merge_spans, offset_in, text_len};
use super::separator::{KeepSeparator, Separator};
use super::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_SEPARATORS};
use crate::error::SplitterError;

/// Recursive, size-bounded text splitter.
///
/// Tries separators in priority order (paragraph, line, word, character by
/// default), re-splitting any piece that is still too large with the
/// separators that follow, and packs the pieces into overlapping chunks of at
/// most `chunk_size` chars.
///
/// The splitter holds only immutable configuration; `split_text` is a pure
/// function of its input.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<Separator>,
    keep_separator: KeepSeparator,
    strip_whitespace: bool,
}

/// Unit of pending work, popped from the back of the work-list
enum Task<'a> {
    /// Split `text` starting from separator `level`
    Split { text: &'a str, level: usize },
    /// Chunks ready to append to the output
    Emit(Vec<Span>),
}

impl TextSplitter {
    pub fn builder() -> TextSplitterBuilder {
        TextSplitterBuilder::new()
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn separators(&self) -> &[Separator] {
        &self.separators
    }

    pub fn keep_separator(&self) -> KeepSeparator {
        self.keep_separator
    }

    pub fn strip_whitespace(&self) -> bool {
        self.strip_whitespace
    }

    /// Split `text` into ordered chunks.
    ///
    /// Every chunk is at most `chunk_size` chars unless it is a single piece
    /// that no remaining separator can subdivide. Empty input yields no chunks.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_spans(text)
            .into_iter()
            .map(|span| span.text)
            .collect()
    }

    /// Split `text`, keeping each chunk's byte offset in `source`
    pub(crate) fn split_spans(&self, source: &str) -> Vec<Span> {
        let mut chunks = Vec::new();
        let mut work = vec![Task::Split {
            text: source,
            level: 0,
        }];

        while let Some(task) = work.pop() {
            match task {
                Task::Emit(ready) => chunks.extend(ready),
                Task::Split { text, level } => {
                    let steps = self.plan(source, text, level);
                    work.extend(steps.into_iter().rev());
                }
            }
        }

        chunks
    }

    /// Split one text at one level, returning the follow-up work in document order
    fn plan<'a>(&self, source: &str, text: &'a str, level: usize) -> Vec<Task<'a>> {
        let (index, separator) = self.select_separator(text, level);
        let next_level = index + 1;
        let can_descend = !separator.is_characters() && next_level < self.separators.len();

        trace!(level = index, ?separator, can_descend, "Selected separator");

        let pieces = separator.split(text, self.keep_separator);
        let joiner = separator.joiner(self.keep_separator);

        let mut steps = Vec::new();
        let mut good: Vec<&str> = Vec::new();

        for piece in pieces {
            if text_len(piece) < self.chunk_size {
                good.push(piece);
                continue;
            }

            if !good.is_empty() {
                steps.push(Task::Emit(self.merge(source, &good, joiner)));
                good.clear();
            }

            if can_descend {
                steps.push(Task::Split {
                    text: piece,
                    level: next_level,
                });
            } else {
                steps.push(Task::Emit(vec![Span {
                    text: piece.to_string(),
                    start: offset_in(source, piece),
                }]));
            }
        }

        if !good.is_empty() {
            steps.push(Task::Emit(self.merge(source, &good, joiner)));
        }

        steps
    }

    /// First separator from `level` on that is the character sentinel or
    /// occurs in `text`; the last separator when none match.
    fn select_separator(&self, text: &str, level: usize) -> (usize, &Separator) {
        for (index, separator) in self.separators.iter().enumerate().skip(level) {
            if separator.is_characters() || separator.occurs_in(text) {
                return (index, separator);
            }
        }

        let last = self.separators.len() - 1;
        (last, &self.separators[last])
    }

    fn merge(&self, source: &str, pieces: &[&str], joiner: &str) -> Vec<Span> {
        let settings = MergeSettings {
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            strip_whitespace: self.strip_whitespace,
        };
        merge_spans(Some(source), pieces, joiner, &settings)
    }
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            separators: DEFAULT_SEPARATORS.iter().copied().map(Separator::literal).collect(),
            keep_separator: KeepSeparator::default(),
            strip_whitespace: true,
        }
    }
}

/// Builder for [`TextSplitter`]; validates the configuration in `build`
#[derive(Debug, Clone)]
pub struct TextSplitterBuilder {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
    separator_regex: bool,
    keep_separator: KeepSeparator,
    strip_whitespace: bool,
}

impl TextSplitterBuilder {
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
            separator_regex: false,
            keep_separator: KeepSeparator::default(),
            strip_whitespace: true,
        }
    }

    /// Maximum chunk length in chars
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Target overlap between adjacent chunks, in chars
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.chunk_overlap = overlap;
        self
    }

    /// Separators in priority order; `""` splits into characters
    pub fn separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    /// Treat separators as regular expressions
    pub fn separator_regex(mut self, enabled: bool) -> Self {
        self.separator_regex = enabled;
        self
    }

    pub fn keep_separator(mut self, keep: KeepSeparator) -> Self {
        self.keep_separator = keep;
        self
    }

    /// Trim whitespace from the edges of merged chunks
    pub fn strip_whitespace(mut self, enabled: bool) -> Self {
        self.strip_whitespace = enabled;
        self
    }

    /// Use the separator preset for a source language (enables regex mode)
    pub fn language(self, language: Language) -> Self {
        self.separators(language.separators().iter().copied())
            .separator_regex(true)
    }

    pub fn build(self) -> Result<TextSplitter, SplitterError> {
        if self.chunk_size == 0 {
            return Err(SplitterError::InvalidChunkSize);
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(SplitterError::OverlapTooLarge {
                overlap: self.chunk_overlap,
                size: self.chunk_size,
            });
        }
        if self.separators.is_empty() {
            return Err(SplitterError::NoSeparators);
        }

        let separators = if self.separator_regex {
            self.separators
                .iter()
                .map(|s| Separator::pattern(s))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            self.separators.into_iter().map(Separator::literal).collect()
        };

        Ok(TextSplitter {
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            separators,
            keep_separator: self.keep_separator,
            strip_whitespace: self.strip_whitespace,
        })
    }
}

impl Default for TextSplitterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot split with plain separators.
///
/// Validates the configuration, then splits. Use [`TextSplitter`] directly to
/// split many texts with the same settings.
pub fn split_text(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Result<Vec<String>, SplitterError> {
    let splitter = TextSplitter::builder()
        .chunk_size(chunk_size)
        .chunk_overlap(chunk_overlap)
        .separators(separators.iter().copied())
        .build()?;
    Ok(splitter.split_text(text))
}
