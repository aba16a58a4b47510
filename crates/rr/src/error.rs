//! CLI error types.

use rr_batch::BuildError;
use rr_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    /// Invalid command-line arguments or unusable directories.
    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Build(#[from] BuildError),
}
