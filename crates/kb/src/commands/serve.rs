//! `kb serve` command implementation.

use std::path::Path;

use clap::Args;
use kb_config::CliSettings;
use kb_server::{ServerConfig, run_server};

use super::ContentArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    #[command(flatten)]
    pub content: ContentArgs,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Persist progress and bookmarks (default: enabled).
    #[arg(long)]
    store: Option<bool>,

    /// Keep progress and bookmarks in memory only.
    #[arg(long, conflicts_with = "store")]
    no_store: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host.clone(),
            port: self.port,
            data_dir: None,
            store_enabled: self.resolve_store_enabled(),
        };
        let config = self.content.load(cli_settings)?;

        if config.store_resolved.enabled {
            ensure_store_dir(&config.store_resolved.dir)?;
        }

        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Content directory: {}",
            config.content_resolved.data_dir.display()
        ));
        if config.store_resolved.enabled {
            output.info(&format!(
                "Progress store: {}",
                config.store_resolved.dir.display()
            ));
        } else {
            output.info("Progress store: in memory");
        }

        tracing::info!(
            config = ?config.config_path,
            metadata = %config.content_resolved.metadata_file,
            "Loaded configuration"
        );
        run_server(ServerConfig::from(&config))
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    /// Resolve `store_enabled` from --store/--no-store flags.
    fn resolve_store_enabled(&self) -> Option<bool> {
        self.no_store.then_some(false).or(self.store)
    }
}

/// Ensure the store directory exists with a `.gitignore`.
fn ensure_store_dir(dir: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| CliError::Server(format!("Failed to create store directory: {e}")))?;

    let gitignore_path = dir.join(".gitignore");
    if !gitignore_path.exists()
        && let Err(e) = std::fs::write(&gitignore_path, "# Automatically created by kb\n*\n")
    {
        tracing::warn!(path = %gitignore_path.display(), error = %e, "Failed to write .gitignore");
    }
    tracing::debug!(dir = %dir.display(), "Store directory ready");

    Ok(())
}
