//! CLI error types.

use kiln_config::ConfigError;
use kiln_site::{PageError, SiteError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Site(#[from] SiteError),

    #[error("{0}")]
    Page(#[from] PageError),

    #[error("Invalid [context] table: {0}")]
    Context(#[from] serde_json::Error),

    #[error("{0}")]
    Build(String),
}
