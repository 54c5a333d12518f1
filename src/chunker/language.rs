use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Source languages with code-aware separator presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Markdown,
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Go,
    Java,
    Html,
    PlainText,
}

// Presets are regular expressions, highest priority first, and all end in
// the paragraph/line/word/character fallback.

const MARKDOWN: &[&str] = &[
    r"\n#{1,6} ",
    r"```\n",
    r"\n\*\*\*+\n",
    r"\n---+\n",
    r"\n___+\n",
    r"\n\n",
    r"\n",
    " ",
    "",
];

const RUST: &[&str] = &[
    r"\nfn ",
    r"\npub fn ",
    r"\nimpl ",
    r"\nstruct ",
    r"\nenum ",
    r"\ntrait ",
    r"\nmod ",
    r"\nconst ",
    r"\nlet ",
    r"\nif ",
    r"\nwhile ",
    r"\nfor ",
    r"\nloop ",
    r"\nmatch ",
    r"\n\n",
    r"\n",
    " ",
    "",
];

const PYTHON: &[&str] = &[
    r"\nclass ",
    r"\ndef ",
    r"\n\tdef ",
    r"\n    def ",
    r"\n\n",
    r"\n",
    " ",
    "",
];

const JAVASCRIPT: &[&str] = &[
    r"\nfunction ",
    r"\nconst ",
    r"\nlet ",
    r"\nvar ",
    r"\nclass ",
    r"\nif ",
    r"\nfor ",
    r"\nwhile ",
    r"\nswitch ",
    r"\ncase ",
    r"\ndefault ",
    r"\n\n",
    r"\n",
    " ",
    "",
];

const TYPESCRIPT: &[&str] = &[
    r"\nenum ",
    r"\ninterface ",
    r"\nnamespace ",
    r"\ntype ",
    r"\nclass ",
    r"\nfunction ",
    r"\nconst ",
    r"\nlet ",
    r"\nvar ",
    r"\nif ",
    r"\nfor ",
    r"\nwhile ",
    r"\nswitch ",
    r"\ncase ",
    r"\ndefault ",
    r"\n\n",
    r"\n",
    " ",
    "",
];

const GO: &[&str] = &[
    r"\nfunc ",
    r"\nvar ",
    r"\nconst ",
    r"\ntype ",
    r"\nif ",
    r"\nfor ",
    r"\nswitch ",
    r"\ncase ",
    r"\n\n",
    r"\n",
    " ",
    "",
];

const JAVA: &[&str] = &[
    r"\nclass ",
    r"\npublic ",
    r"\nprotected ",
    r"\nprivate ",
    r"\nstatic ",
    r"\nif ",
    r"\nfor ",
    r"\nwhile ",
    r"\nswitch ",
    r"\ncase ",
    r"\n\n",
    r"\n",
    " ",
    "",
];

const HTML: &[&str] = &[
    "<body", "<div", "<p", "<br", "<li", "<h1", "<h2", "<h3", "<h4", "<h5", "<h6", "<span",
    "<table", "<tr", "<td", "<th", "<ul", "<ol", "<header", "<footer", "<nav", "<head",
    "<style", "<script", "<meta", "<title", r"\n\n", r"\n", " ", "",
];

const PLAIN_TEXT: &[&str] = &[r"\n\n", r"\n", " ", ""];

impl Language {
    /// Separator patterns for this language, highest priority first
    pub fn separators(self) -> &'static [&'static str] {
        match self {
            Language::Markdown => MARKDOWN,
            Language::Rust => RUST,
            Language::Python => PYTHON,
            Language::JavaScript => JAVASCRIPT,
            Language::TypeScript => TYPESCRIPT,
            Language::Go => GO,
            Language::Java => JAVA,
            Language::Html => HTML,
            Language::PlainText => PLAIN_TEXT,
        }
    }

    /// Detect language from a file extension (without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        Some(match ext.to_lowercase().as_str() {
            "md" | "markdown" => Language::Markdown,
            "rs" => Language::Rust,
            "py" => Language::Python,
            "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
            "ts" | "tsx" => Language::TypeScript,
            "go" => Language::Go,
            "java" => Language::Java,
            "html" | "htm" => Language::Html,
            "txt" | "text" => Language::PlainText,
            _ => return None,
        })
    }

    /// Detect language from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Markdown => "markdown",
            Language::Rust => "rust",
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Go => "go",
            Language::Java => "java",
            Language::Html => "html",
            Language::PlainText => "plaintext",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Language::Markdown),
            "rust" | "rs" => Ok(Language::Rust),
            "python" | "py" => Ok(Language::Python),
            "javascript" | "js" => Ok(Language::JavaScript),
            "typescript" | "ts" => Ok(Language::TypeScript),
            "go" => Ok(Language::Go),
            "java" => Ok(Language::Java),
            "html" => Ok(Language::Html),
            "plaintext" | "text" | "txt" => Ok(Language::PlainText),
            other => Err(format!("unknown language: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunker::Separator;

    const ALL: [Language; 9] = [
        Language::Markdown,
        Language::Rust,
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Go,
        Language::Java,
        Language::Html,
        Language::PlainText,
    ];

    #[test]
    fn test_presets_compile_and_end_with_characters() {
        for language in ALL {
            let separators = language.separators();
            for pattern in separators {
                assert!(
                    Separator::pattern(pattern).is_ok(),
                    "{} preset has invalid pattern {:?}",
                    language.as_str(),
                    pattern
                );
            }
            assert_eq!(separators.last(), Some(&""));
        }
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("rs"), Some(Language::Rust));
        assert_eq!(Language::from_extension("MD"), Some(Language::Markdown));
        assert_eq!(Language::from_extension("tsx"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("xyz"), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            Language::from_path(Path::new("src/main.py")),
            Some(Language::Python)
        );
        assert_eq!(Language::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_from_str_round_trips_names() {
        for language in ALL {
            assert_eq!(language.as_str().parse::<Language>(), Ok(language));
        }
        assert!("cobol".parse::<Language>().is_err());
    }
}
