//! `folio serve` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use folio_config::{CliSettings, Config};
use folio_server::{run_server, server_config_from_folio_config, source_config_from_folio_config};
use folio_source::Source;
use folio_storage::FsStorage;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content directory (overrides config).
    #[arg(short = 's', long)]
    content_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (request traces and indexing logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            content_dir: self.content_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Content directory: {}",
            config.content_resolved.dir.display()
        ));
        let locales: Vec<&str> = config.i18n.codes().collect();
        output.info(&format!("Locales: {}", locales.join(", ")));

        let storage = Arc::new(FsStorage::new(config.content_resolved.dir.clone()));
        let source = Arc::new(Source::new(storage, source_config_from_folio_config(&config)));

        let server_config = server_config_from_folio_config(&config, version.to_owned());
        run_server(server_config, source)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
