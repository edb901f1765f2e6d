use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use chrono::Duration;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("sentences per chunk must be between 1 and {max}")]
    InvalidUnitSize { max: usize },

    #[error("reveal seconds must be between 1 and {max}")]
    InvalidRevealSeconds { max: u32 },

    #[error("unknown profile: {0}")]
    UnknownProfile(String),
}

const MAX_UNIT_SIZE: usize = 20;
const MAX_REVEAL_SECS: u32 = 600;

/// How a passage is chunked and how long each chunk stays visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseSettings {
    unit_size: NonZeroUsize,
    reveal_secs: u32,
}

impl ExerciseSettings {
    /// # Errors
    ///
    /// Returns `SettingsError` when either value is out of range.
    pub fn new(unit_size: usize, reveal_secs: u32) -> Result<Self, SettingsError> {
        let unit_size = NonZeroUsize::new(unit_size)
            .filter(|n| n.get() <= MAX_UNIT_SIZE)
            .ok_or(SettingsError::InvalidUnitSize { max: MAX_UNIT_SIZE })?;
        if !(1..=MAX_REVEAL_SECS).contains(&reveal_secs) {
            return Err(SettingsError::InvalidRevealSeconds {
                max: MAX_REVEAL_SECS,
            });
        }
        Ok(Self {
            unit_size,
            reveal_secs,
        })
    }

    #[must_use]
    pub fn unit_size(&self) -> NonZeroUsize {
        self.unit_size
    }

    #[must_use]
    pub fn reveal_secs(&self) -> u32 {
        self.reveal_secs
    }

    #[must_use]
    pub fn reveal_threshold(&self) -> Duration {
        Duration::seconds(i64::from(self.reveal_secs))
    }

    /// Copy with some fields replaced, validated again.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` when an override is out of range.
    pub fn with_overrides(
        self,
        unit_size: Option<usize>,
        reveal_secs: Option<u32>,
    ) -> Result<Self, SettingsError> {
        Self::new(
            unit_size.unwrap_or(self.unit_size.get()),
            reveal_secs.unwrap_or(self.reveal_secs),
        )
    }
}

impl Default for ExerciseSettings {
    fn default() -> Self {
        Profile::default().settings()
    }
}

/// Named presets for the exercise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// One sentence at a time, hidden after 4 seconds.
    #[default]
    Quick,
    /// One sentence at a time, hidden after 10 seconds.
    Relaxed,
}

impl Profile {
    #[must_use]
    pub fn settings(self) -> ExerciseSettings {
        let reveal_secs = match self {
            Profile::Quick => 4,
            Profile::Relaxed => 10,
        };
        ExerciseSettings {
            unit_size: NonZeroUsize::MIN,
            reveal_secs,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Quick => "quick",
            Profile::Relaxed => "relaxed",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quick" => Ok(Profile::Quick),
            "relaxed" => Ok(Profile::Relaxed),
            other => Err(SettingsError::UnknownProfile(other.to_owned())),
        }
    }
}
