use thiserror::Error;

use crate::model::{PassageError, SettingsError};

/// Any validation failure from the domain layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Passage(#[from] PassageError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
