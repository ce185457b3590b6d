//! CLI error types.

use kb_config::ConfigError;
use kb_site::MetadataError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Metadata(#[from] MetadataError),

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Validation(String),
}
