use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SplitterError;

/// Where the matched separator text ends up after a split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeepSeparator {
    /// Drop the separator; merging re-inserts it between pieces
    None,
    /// Glue the separator to the start of the following piece
    #[default]
    Start,
    /// Glue the separator to the end of the preceding piece
    End,
}

impl KeepSeparator {
    pub fn retains(self) -> bool {
        !matches!(self, KeepSeparator::None)
    }
}

/// A single split boundary, tried in priority order by the splitter
#[derive(Debug, Clone)]
pub enum Separator {
    /// Empty-string sentinel: one piece per character. Always matches.
    Characters,
    /// Plain substring
    Literal(String),
    /// Regular expression
    Pattern(Regex),
}

impl Separator {
    /// Build a plain separator. The empty string becomes [`Separator::Characters`].
    pub fn literal(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            Separator::Characters
        } else {
            Separator::Literal(text)
        }
    }

    /// Compile a regex separator. The empty pattern becomes [`Separator::Characters`].
    pub fn pattern(pattern: &str) -> Result<Self, SplitterError> {
        if pattern.is_empty() {
            return Ok(Separator::Characters);
        }
        Regex::new(pattern)
            .map(Separator::Pattern)
            .map_err(|source| SplitterError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn is_characters(&self) -> bool {
        matches!(self, Separator::Characters)
    }

    /// Whether this separator matches anywhere in `text`
    pub fn occurs_in(&self, text: &str) -> bool {
        match self {
            Separator::Characters => true,
            Separator::Literal(s) => text.contains(s.as_str()),
            Separator::Pattern(re) => re.is_match(text),
        }
    }

    /// Text inserted between pieces when merging them back together.
    ///
    /// Retained separators already live inside the pieces, so nothing is added.
    pub fn joiner(&self, keep: KeepSeparator) -> &str {
        match (self, keep.retains()) {
            (Separator::Literal(s), false) => s.as_str(),
            _ => "",
        }
    }

    /// Split `text` into pieces at every match of this separator.
    ///
    /// Pieces are sub-slices of `text`; empty pieces are dropped. With a
    /// retaining [`KeepSeparator`] the pieces concatenate back to `text`.
    pub fn split<'a>(&self, text: &'a str, keep: KeepSeparator) -> Vec<&'a str> {
        let matches: Vec<(usize, usize)> = match self {
            Separator::Characters => {
                return text
                    .char_indices()
                    .map(|(i, c)| &text[i..i + c.len_utf8()])
                    .collect();
            }
            Separator::Literal(s) => text
                .match_indices(s.as_str())
                .map(|(i, m)| (i, i + m.len()))
                .collect(),
            Separator::Pattern(re) => re.find_iter(text).map(|m| (m.start(), m.end())).collect(),
        };

        let mut pieces = Vec::with_capacity(matches.len() + 1);
        let mut cursor = 0;
        for (start, end) in matches {
            let (piece, next) = match keep {
                KeepSeparator::None => (&text[cursor..start], end),
                KeepSeparator::Start => (&text[cursor..start], start),
                KeepSeparator::End => (&text[cursor..end], end),
            };
            pieces.push(piece);
            cursor = next;
        }
        pieces.push(&text[cursor..]);

        pieces.retain(|p| !p.is_empty());
        pieces
    }
}

impl PartialEq for Separator {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Separator::Characters, Separator::Characters) => true,
            (Separator::Literal(a), Separator::Literal(b)) => a == b,
            (Separator::Pattern(a), Separator::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl From<&str> for Separator {
    fn from(text: &str) -> Self {
        Separator::literal(text)
    }
}

impl From<String> for Separator {
    fn from(text: String) -> Self {
        Separator::literal(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_characters_split() {
        let pieces = Separator::Characters.split("héllo", KeepSeparator::Start);
        assert_eq!(pieces, vec!["h", "é", "l", "l", "o"]);
    }

    #[test]
    fn test_literal_keeps_separator_at_start() {
        let sep = Separator::literal("\n\n");
        let pieces = sep.split("one\n\ntwo\n\nthree", KeepSeparator::Start);
        assert_eq!(pieces, vec!["one", "\n\ntwo", "\n\nthree"]);
    }

    #[test]
    fn test_literal_keeps_separator_at_end() {
        let sep = Separator::literal(" ");
        let pieces = sep.split("a b c", KeepSeparator::End);
        assert_eq!(pieces, vec!["a ", "b ", "c"]);
    }

    #[test]
    fn test_literal_discards_separator() {
        let sep = Separator::literal(", ");
        let pieces = sep.split("x, y, z", KeepSeparator::None);
        assert_eq!(pieces, vec!["x", "y", "z"]);
        assert_eq!(sep.joiner(KeepSeparator::None), ", ");
        assert_eq!(sep.joiner(KeepSeparator::Start), "");
    }

    #[test]
    fn test_leading_separator_makes_no_empty_piece() {
        let sep = Separator::literal(" ");
        let pieces = sep.split(" lead", KeepSeparator::Start);
        assert_eq!(pieces, vec![" lead"]);

        let pieces = sep.split(" lead", KeepSeparator::None);
        assert_eq!(pieces, vec!["lead"]);
    }

    #[test]
    fn test_adjacent_separators() {
        let sep = Separator::literal("\n");
        let pieces = sep.split("a\n\nb", KeepSeparator::Start);
        assert_eq!(pieces, vec!["a", "\n", "\nb"]);
        assert_eq!(pieces.concat(), "a\n\nb");

        let pieces = sep.split("a\n\nb", KeepSeparator::None);
        assert_eq!(pieces, vec!["a", "b"]);
    }

    #[test]
    fn test_missing_separator_yields_whole_text() {
        let sep = Separator::literal("|");
        assert!(!sep.occurs_in("no pipes here"));
        assert_eq!(
            sep.split("no pipes here", KeepSeparator::Start),
            vec!["no pipes here"]
        );
    }

    #[test]
    fn test_empty_text() {
        assert!(Separator::Characters.split("", KeepSeparator::Start).is_empty());
        assert!(Separator::literal(" ").split("", KeepSeparator::Start).is_empty());
    }

    #[test]
    fn test_pattern_split() {
        let sep = Separator::pattern(r"\n#{1,6} ").unwrap();
        let text = "intro\n# One\nbody\n## Two\nmore";
        let pieces = sep.split(text, KeepSeparator::Start);
        assert_eq!(pieces, vec!["intro", "\n# One\nbody", "\n## Two\nmore"]);
        assert!(sep.occurs_in(text));
    }

    #[test]
    fn test_empty_pattern_is_characters() {
        assert!(Separator::pattern("").unwrap().is_characters());
        assert!(Separator::literal("").is_characters());
        assert!(Separator::Characters.occurs_in(""));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Separator::pattern("(unclosed").unwrap_err();
        assert!(err.to_string().contains("(unclosed"));
    }
}
