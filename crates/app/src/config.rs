//! Startup configuration: CLI flags layered over an optional TOML file,
//! layered over the chosen profile.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use recite_core::model::{ExerciseSettings, Profile};
use serde::Deserialize;
use storage::json_file::DEFAULT_PROGRESS_FILE;

pub const ENV_PROGRESS_FILE: &str = "RECITE_PROGRESS_FILE";
pub const ENV_DB_URL: &str = "RECITE_DB_URL";

/// Keys accepted in the TOML config file. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub profile: Option<Profile>,
    pub unit_size: Option<usize>,
    pub reveal_secs: Option<u32>,
    pub text_file: Option<PathBuf>,
    pub progress_file: Option<PathBuf>,
    pub database_url: Option<String>,
}

impl FileConfig {
    /// Parse a config file's contents.
    ///
    /// # Errors
    ///
    /// Fails when the TOML is malformed or carries unknown keys.
    pub fn parse(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("failed to parse config")
    }

    /// Read the file at `path`.
    ///
    /// # Errors
    ///
    /// Fails when the file is missing, unreadable, or malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("config file not found: {}", path.display());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("in {}", path.display()))
    }
}

/// Values taken from the command line; `None` means "not given".
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Overrides {
    pub profile: Option<Profile>,
    pub unit_size: Option<usize>,
    pub reveal_secs: Option<u32>,
    pub text_file: Option<PathBuf>,
    pub progress_file: Option<PathBuf>,
    pub database_url: Option<String>,
}

/// Paths supplied through the environment.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnvOverrides {
    pub progress_file: Option<PathBuf>,
    pub database_url: Option<String>,
}

impl EnvOverrides {
    #[must_use]
    pub fn from_env() -> Self {
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            progress_file: non_empty(ENV_PROGRESS_FILE).map(PathBuf::from),
            database_url: non_empty(ENV_DB_URL),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    JsonFile(PathBuf),
    Sqlite(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub profile: Profile,
    pub settings: ExerciseSettings,
    pub text_file: Option<PathBuf>,
    pub backend: Backend,
}

impl AppConfig {
    /// Merge the layers. CLI beats environment beats file beats profile.
    /// The storage backend is chosen per layer, see `Backend::from_layers`.
    ///
    /// # Errors
    ///
    /// Fails when the merged unit size or reveal time is out of range.
    pub fn resolve(cli: Overrides, env: EnvOverrides, file: FileConfig) -> Result<Self> {
        let profile = cli.profile.or(file.profile).unwrap_or_default();
        let settings = profile
            .settings()
            .with_overrides(
                cli.unit_size.or(file.unit_size),
                cli.reveal_secs.or(file.reveal_secs),
            )
            .context("invalid exercise settings")?;

        let text_file = cli.text_file.or(file.text_file);
        let backend = Backend::from_layers([
            (cli.database_url, cli.progress_file),
            (env.database_url, env.progress_file),
            (file.database_url, file.progress_file),
        ]);

        Ok(Self {
            profile,
            settings,
            text_file,
            backend,
        })
    }
}

impl Backend {
    /// The first layer naming any storage location wins. Within a layer a
    /// database URL beats a progress file.
    fn from_layers<const N: usize>(layers: [(Option<String>, Option<PathBuf>); N]) -> Self {
        layers
            .into_iter()
            .find_map(|(database_url, progress_file)| match (database_url, progress_file) {
                (Some(url), _) => Some(Backend::Sqlite(url)),
                (None, Some(path)) => Some(Backend::JsonFile(path)),
                (None, None) => None,
            })
            .unwrap_or_else(|| Backend::JsonFile(PathBuf::from(DEFAULT_PROGRESS_FILE)))
    }
}
