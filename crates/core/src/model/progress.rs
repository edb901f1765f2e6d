/// Number of chunks completed, as persisted between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProgressIndex(u64);

impl ProgressIndex {
    pub const START: Self = Self(0);

    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Interprets the stored index against the current chunk count.
    ///
    /// An index past the end (e.g. the passage shrank between runs) is
    /// treated as a finished passage rather than an error.
    #[must_use]
    pub fn position(self, chunk_count: usize) -> ProgressPosition {
        match usize::try_from(self.0) {
            Ok(index) if index < chunk_count => ProgressPosition::At(index),
            _ => ProgressPosition::Complete,
        }
    }
}

impl From<usize> for ProgressIndex {
    fn from(value: usize) -> Self {
        Self(value as u64)
    }
}

/// Where a loaded index lands in the chunk list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPosition {
    At(usize),
    Complete,
}

impl ProgressPosition {
    /// Chunk to display, clamped to the last chunk when complete.
    ///
    /// Returns `None` only for an empty chunk list.
    #[must_use]
    pub fn display_index(self, chunk_count: usize) -> Option<usize> {
        match self {
            ProgressPosition::At(index) => Some(index),
            ProgressPosition::Complete => chunk_count.checked_sub(1),
        }
    }
}
