use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use recite_core::model::{Passage, Profile};
use services::{Clock, PracticeLoopService};
use storage::Storage;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

mod config;

use config::{AppConfig, Backend, EnvOverrides, FileConfig, Overrides};

const WINDOW_TITLE: &str = "Memory Challenge";
const LOG_DIRECTIVES: [&str; 4] = ["recite=info", "storage=info", "services=info", "ui=info"];

#[derive(Parser)]
#[command(name = "recite", version, about = "Memorize a passage one timed chunk at a time")]
struct Cli {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Preset: quick or relaxed
    #[arg(long)]
    profile: Option<Profile>,

    /// Sentences per chunk (1-20)
    #[arg(long)]
    unit_size: Option<usize>,

    /// Seconds a chunk stays visible (1-600)
    #[arg(long)]
    reveal_secs: Option<u32>,

    /// Plain-text passage to memorize instead of the built-in story
    #[arg(long)]
    text_file: Option<PathBuf>,

    /// JSON progress file [env: RECITE_PROGRESS_FILE]
    #[arg(long)]
    progress_file: Option<PathBuf>,

    /// SQLite database URL; replaces the JSON progress file [env: RECITE_DB_URL]
    #[arg(long = "db")]
    database_url: Option<String>,
}

impl Cli {
    fn overrides(self) -> (Option<PathBuf>, Overrides) {
        let overrides = Overrides {
            profile: self.profile,
            unit_size: self.unit_size,
            reveal_secs: self.reveal_secs,
            text_file: self.text_file,
            progress_file: self.progress_file,
            database_url: self.database_url,
        };
        (self.config, overrides)
    }
}

struct DesktopApp {
    practice_loop: Arc<PracticeLoopService>,
}

impl UiApp for DesktopApp {
    fn practice_loop(&self) -> Arc<PracticeLoopService> {
        Arc::clone(&self.practice_loop)
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .with_context(|| format!("invalid --db value: {db_url}"))?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        anyhow::bail!("invalid --db value: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
    }

    Ok(())
}

fn load_passage(text_file: Option<&Path>) -> Result<Passage> {
    let Some(path) = text_file else {
        return Ok(Passage::builtin());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read passage: {}", path.display()))?;
    Passage::parse(raw).with_context(|| format!("no text to memorize in {}", path.display()))
}

async fn open_storage(backend: &Backend) -> Result<Storage> {
    match backend {
        Backend::JsonFile(path) => {
            tracing::info!(path = %path.display(), "using JSON progress file");
            Ok(Storage::json_file(path.clone()))
        }
        Backend::Sqlite(url) => {
            let url = normalize_sqlite_url(url.clone());
            prepare_sqlite_file(&url)?;
            tracing::info!(%url, "using SQLite progress store");
            Storage::sqlite(&url)
                .await
                .with_context(|| format!("failed to open {url}"))
        }
    }
}

/// `RUST_LOG` when set, otherwise `info` for the workspace crates.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    match rust_log.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => EnvFilter::new(value),
        None => EnvFilter::new(LOG_DIRECTIVES.join(",")),
    }
}

fn init_tracing() {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .init();
}

async fn run() -> Result<()> {
    let (config_path, overrides) = Cli::parse().overrides();
    let file = match config_path {
        Some(path) => FileConfig::load(&path)?,
        None => FileConfig::default(),
    };
    let config = AppConfig::resolve(overrides, EnvOverrides::from_env(), file)?;
    tracing::info!(
        profile = %config.profile,
        unit_size = config.settings.unit_size().get(),
        reveal_secs = config.settings.reveal_secs(),
        "starting"
    );

    let passage = load_passage(config.text_file.as_deref())?;
    let storage = open_storage(&config.backend).await?;
    let practice_loop = Arc::new(
        PracticeLoopService::new(Clock::system(), &passage, config.settings, storage.progress)
            .context("could not prepare the passage")?,
    );

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { practice_loop });
    let context = build_app_context(&app);

    // tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title(WINDOW_TITLE)
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err:#}");
        std::process::exit(2);
    }
}
