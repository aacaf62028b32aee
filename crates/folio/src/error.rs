//! CLI error types.

use folio_config::ConfigError;
use folio_nav::NavError;
use folio_source::SourceError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Navigation(#[from] NavError),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Server(String),

    #[error("API reference generation failed with {0} error(s)")]
    OpenApi(usize),
}
