use std::collections::VecDeque;
use tracing::warn;

/// Limits applied while packing pieces into chunks
#[derive(Debug, Clone, Copy)]
pub struct MergeSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub strip_whitespace: bool,
}

/// A merged chunk and its byte offset in the source text.
///
/// `start` is `None` when the chunk is not a verbatim slice of the source,
/// which happens when discarded separators were re-joined differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Span {
    pub text: String,
    pub start: Option<usize>,
}

/// Length of a piece or chunk, in chars
pub fn text_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of `piece` inside `source`, if it is a sub-slice of it
pub(crate) fn offset_in(source: &str, piece: &str) -> Option<usize> {
    let start = (piece.as_ptr() as usize).checked_sub(source.as_ptr() as usize)?;
    (start + piece.len() <= source.len()).then_some(start)
}

/// Pack same-separator pieces into chunks of at most `chunk_size` chars.
///
/// Rules:
/// - Pieces are joined with `joiner`; its length counts between neighbours
/// - When the next piece would overflow, the window is flushed and then
///   shrunk from the front until it is within `chunk_overlap` and the next
///   piece fits
/// - A piece larger than `chunk_size` is flushed alone, with a warning once
///   the window holding it is flushed
/// - Chunks that are empty (after trimming, when enabled) are dropped
///
/// `TextSplitter` only hands this function pieces shorter than `chunk_size`,
/// so the warning fires only for direct callers.
pub fn merge_pieces(pieces: &[&str], joiner: &str, settings: &MergeSettings) -> Vec<String> {
    merge_spans(None, pieces, joiner, settings)
        .into_iter()
        .map(|span| span.text)
        .collect()
}

/// [`merge_pieces`], also locating each chunk in `source` when the pieces
/// are sub-slices of it
pub(crate) fn merge_spans(
    source: Option<&str>,
    pieces: &[&str],
    joiner: &str,
    settings: &MergeSettings,
) -> Vec<Span> {
    let joiner_len = text_len(joiner);
    let mut chunks = Vec::new();
    let mut window: VecDeque<(&str, usize)> = VecDeque::new();
    let mut total = 0;

    for &piece in pieces {
        let len = text_len(piece);

        if total + len + gap(&window, joiner_len) > settings.chunk_size {
            if total > settings.chunk_size {
                warn!(
                    chunk_len = total,
                    chunk_size = settings.chunk_size,
                    "Created a chunk larger than the configured chunk size"
                );
            }

            if !window.is_empty() {
                if let Some(chunk) = join_window(source, &window, joiner, settings.strip_whitespace)
                {
                    chunks.push(chunk);
                }

                while total > settings.chunk_overlap
                    || (total + len + gap(&window, joiner_len) > settings.chunk_size && total > 0)
                {
                    let Some((_, front_len)) = window.pop_front() else {
                        break;
                    };
                    total -= front_len + gap(&window, joiner_len);
                }
            }
        }

        total += len + gap(&window, joiner_len);
        window.push_back((piece, len));
    }

    if let Some(chunk) = join_window(source, &window, joiner, settings.strip_whitespace) {
        chunks.push(chunk);
    }

    chunks
}

/// Joiner length added before the next piece
fn gap(window: &VecDeque<(&str, usize)>, joiner_len: usize) -> usize {
    if window.is_empty() {
        0
    } else {
        joiner_len
    }
}

fn join_window(
    source: Option<&str>,
    window: &VecDeque<(&str, usize)>,
    joiner: &str,
    strip: bool,
) -> Option<Span> {
    let (first, _) = window.front()?;

    let joined = window
        .iter()
        .map(|(piece, _)| *piece)
        .collect::<Vec<_>>()
        .join(joiner);

    // The window starts at its first piece; it is only located there when
    // the joined text matches the source verbatim
    let start = source.and_then(|source| {
        let start = offset_in(source, first)?;
        let slice = source.get(start..start + joined.len())?;
        (slice == joined).then_some(start)
    });

    let (text, start) = if strip {
        let lead = joined.len() - joined.trim_start().len();
        (joined.trim().to_string(), start.map(|s| s + lead))
    } else {
        (joined, start)
    };

    if text.is_empty() {
        None
    } else {
        Some(Span { text, start })
    }
}
