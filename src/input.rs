use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::chunker::{Document, Language};

/// A text loaded for splitting
#[derive(Debug, Clone)]
pub struct InputText {
    /// Display name: relative path, or `-` for stdin
    pub name: String,
    pub content: String,
    /// Hex SHA-256 of the content
    pub hash: String,
    pub language: Option<Language>,
}

impl InputText {
    fn new(name: String, content: String, language: Option<Language>) -> Self {
        let hash = hash_content(&content);
        Self {
            name,
            content,
            hash,
            language,
        }
    }

    /// Convert into a [`Document`] tagged with its source and hash
    pub fn into_document(self) -> Document {
        let mut doc = Document::new(self.content)
            .with_metadata("source", self.name)
            .with_metadata("sha256", self.hash);
        if let Some(language) = self.language {
            doc = doc.with_metadata("language", language.as_str());
        }
        doc
    }
}

// Directory and file names skipped while walking
const IGNORED_DIRS: &[&str] = &[
    "target",
    "node_modules",
    ".git",
    ".svn",
    ".hg",
    "build",
    "dist",
    "out",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".tox",
    "venv",
    ".venv",
    "vendor",
];

const IGNORED_FILES: &[&str] = &["Cargo.lock", "package-lock.json", "yarn.lock"];

/// Check if a walked path should be skipped
pub fn should_ignore(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    IGNORED_DIRS.contains(&name)
        || IGNORED_FILES.contains(&name)
        || name.ends_with(".min.js")
        || name.ends_with(".min.css")
        || name.ends_with(".map")
}

/// Compute SHA256 hash of text content
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Read the entire standard input
pub fn read_stdin() -> Result<InputText> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read standard input")?;
    Ok(InputText::new("-".to_string(), content, None))
}

/// Load every path given on the command line.
///
/// Files are read as-is. Directories are walked recursively and only files
/// with a recognised language extension are kept; unreadable files found
/// while walking are skipped with a warning.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<InputText>> {
    let mut inputs = Vec::new();

    for path in paths {
        if path.is_dir() {
            inputs.extend(collect_dir(path)?);
        } else {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            inputs.push(InputText::new(
                path.display().to_string(),
                content,
                Language::from_path(path),
            ));
        }
    }

    Ok(inputs)
}

fn collect_dir(root: &Path) -> Result<Vec<InputText>> {
    info!(root = %root.display(), "Scanning directory");

    let mut inputs = Vec::new();
    let mut total_size = 0usize;

    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !should_ignore(e.path()))
    {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(language) = Language::from_path(path) else {
            continue;
        };

        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable file");
                continue;
            }
        };

        let name = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        total_size += content.len();
        inputs.push(InputText::new(name, content, Some(language)));
    }

    info!(files = inputs.len(), bytes = total_size, "Finished scanning");
    Ok(inputs)
}
