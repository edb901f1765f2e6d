use std::num::NonZeroUsize;

use thiserror::Error;

use crate::chunker;

/// The passage shipped with the application.
pub const DEFAULT_PASSAGE: &str = include_str!("default_passage.txt");

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PassageError {
    #[error("passage text cannot be empty")]
    Empty,
}

/// Source text to memorize. Never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage(String);

impl Passage {
    /// # Errors
    ///
    /// Returns `PassageError::Empty` if the text is blank.
    pub fn parse(text: impl Into<String>) -> Result<Self, PassageError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(PassageError::Empty);
        }
        Ok(Self(text))
    }

    #[must_use]
    pub fn builtin() -> Self {
        Self(DEFAULT_PASSAGE.to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the passage once; the result is reused for the whole process.
    #[must_use]
    pub fn chunks(&self, unit_size: NonZeroUsize) -> ChunkSequence {
        chunker::split(&self.0, unit_size)
    }
}

/// One or more whole sentences shown and typed back as a single round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk(String);

impl Chunk {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.0
    }

    /// Exact, case-sensitive comparison after trimming the attempt's ends.
    #[must_use]
    pub fn matches(&self, attempt: &str) -> bool {
        attempt.trim() == self.0
    }
}

/// Ordered, immutable list of chunks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkSequence {
    chunks: Vec<Chunk>,
}

impl ChunkSequence {
    pub(crate) fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }
}
