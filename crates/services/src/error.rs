//! Shared error types for the services crate.

use thiserror::Error;

use recite_core::model::Phase;
use storage::repository::StorageError;

/// Errors emitted by `PracticeLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PracticeError {
    #[error("passage has no sentences to practice")]
    EmptyPassage,
    #[error("chunk is still showing")]
    NotHidden,
    #[error("passage already completed")]
    Completed,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl PracticeError {
    pub(crate) fn for_phase(phase: Phase) -> Option<Self> {
        match phase {
            Phase::Showing => Some(Self::NotHidden),
            Phase::Complete => Some(Self::Completed),
            Phase::Hidden => None,
        }
    }
}
