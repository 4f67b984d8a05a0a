//! SMS corpus loading and message pool sampling.

use rand::Rng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to read corpus {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read every line of a newline-delimited corpus.
///
/// Lines are kept verbatim. Invalid UTF-8 is replaced rather than rejected.
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>, CorpusError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| CorpusError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_string)
        .collect())
}

/// Fixed set of messages workers draw from. Cheap to clone, never mutated.
#[derive(Debug, Clone)]
pub struct MessagePool {
    messages: Arc<[String]>,
}

impl MessagePool {
    /// Load the corpus at `path` and keep a random subset of at most `cap` lines.
    pub fn from_file<P: AsRef<Path>>(path: P, cap: usize) -> Result<Self, CorpusError> {
        let lines = read_lines(path.as_ref())?;
        let total = lines.len();
        let pool = Self::sample(lines, cap, &mut rand::thread_rng());

        tracing::info!(
            path = %path.as_ref().display(),
            corpus_lines = total,
            pool_size = pool.len(),
            "Loaded SMS corpus"
        );

        Ok(pool)
    }

    /// Draw `min(cap, lines.len())` lines uniformly, without replacement.
    pub fn sample<R: Rng + ?Sized>(mut lines: Vec<String>, cap: usize, rng: &mut R) -> Self {
        let amount = cap.min(lines.len());
        let messages: Vec<String> = rand::seq::index::sample(rng, lines.len(), amount)
            .into_iter()
            .map(|i| std::mem::take(&mut lines[i]))
            .collect();

        Self {
            messages: messages.into(),
        }
    }

    /// Uniformly pick one message, `None` when the pool is empty.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        if self.messages.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.messages.len());
        Some(&self.messages[idx])
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn contains(&self, message: &str) -> bool {
        self.messages.iter().any(|m| m == message)
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}
