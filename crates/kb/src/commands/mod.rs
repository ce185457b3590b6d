//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod render;
pub(crate) mod serve;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use kb_config::{CliSettings, Config};
use kb_storage::{FsStorage, Storage};

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use render::RenderArgs;
pub(crate) use serve::ServeArgs;

/// Options shared by every command.
#[derive(Args, Default)]
pub(crate) struct ContentArgs {
    /// Path to configuration file (default: auto-discover kb.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Content directory holding metadata and subject files (overrides config).
    #[arg(short, long, env = "KB_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose output (info-level logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ContentArgs {
    /// Load the configuration with `settings` plus the shared overrides.
    pub(crate) fn load(&self, mut settings: CliSettings) -> Result<Config, CliError> {
        if settings.data_dir.is_none() {
            settings.data_dir.clone_from(&self.data_dir);
        }
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}

/// Document storage rooted at the configured content directory.
pub(crate) fn content_storage(config: &Config) -> Arc<dyn Storage> {
    Arc::new(FsStorage::new(config.content_resolved.data_dir.clone()))
}
