use serde::Serialize;
use std::fmt;

/// Summary of chunk lengths (in chars) for one split
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChunkStats {
    pub count: usize,
    pub min_len: usize,
    pub max_len: usize,
    pub mean_len: f64,
    /// Chunks longer than the configured chunk size
    pub oversized: usize,
}

impl ChunkStats {
    pub fn from_chunks<S: AsRef<str>>(chunks: &[S], chunk_size: usize) -> Self {
        if chunks.is_empty() {
            return Self::default();
        }

        let lens: Vec<usize> = chunks.iter().map(|c| c.as_ref().chars().count()).collect();
        let total: usize = lens.iter().sum();

        Self {
            count: lens.len(),
            min_len: lens.iter().copied().min().unwrap_or(0),
            max_len: lens.iter().copied().max().unwrap_or(0),
            mean_len: total as f64 / lens.len() as f64,
            oversized: lens.iter().filter(|&&len| len > chunk_size).count(),
        }
    }

    /// Fold another split's stats into this one
    pub fn merge(&mut self, other: &ChunkStats) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = other.clone();
            return;
        }

        let total = self.mean_len * self.count as f64 + other.mean_len * other.count as f64;
        self.count += other.count;
        self.min_len = self.min_len.min(other.min_len);
        self.max_len = self.max_len.max(other.max_len);
        self.mean_len = total / self.count as f64;
        self.oversized += other.oversized;
    }
}

impl fmt::Display for ChunkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "chunks: {}, min: {}, max: {}, mean: {:.1}, oversized: {}",
            self.count, self.min_len, self.max_len, self.mean_len, self.oversized
        )
    }
}
