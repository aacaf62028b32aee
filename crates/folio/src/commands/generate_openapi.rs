//! `folio generate-openapi` command implementation.

use std::path::PathBuf;

use clap::Args;
use folio_config::{CliSettings, Config};
use folio_openapi::{OpenApiGenerator, OpenApiOptions};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate-openapi command.
#[derive(Args)]
pub(crate) struct GenerateOpenApiArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding `<lang>/openapi_<api>.json` (overrides config).
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Content directory that receives the pages (overrides config).
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

impl GenerateOpenApiArgs {
    /// Execute the generate-openapi command.
    ///
    /// Every (locale, API) pair is attempted; failures are listed and turn
    /// into a non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or any pair or root marker
    /// could not be generated.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            openapi_input_dir: self.input_dir,
            openapi_output_dir: self.output_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let openapi = config.openapi_resolved;

        output.step(&format!(
            "Generating API reference from {}",
            openapi.input_dir.display()
        ));

        let generator = OpenApiGenerator::new(OpenApiOptions {
            input_dir: openapi.input_dir,
            output_dir: openapi.output_dir,
            locales: config.i18n.codes().map(str::to_owned).collect(),
            apis: openapi.apis,
            include_description: openapi.include_description,
        });
        let summary = generator.run().await;

        for pair in &summary.pairs {
            if let Ok(pages) = &pair.result {
                output.item(&format!(
                    "{}/{}: {} page(s)",
                    pair.locale,
                    pair.api,
                    pages.len()
                ));
            }
        }
        for (pair, err) in summary.failures() {
            output.failed(&format!("{}/{}: {err}", pair.locale, pair.api));
        }
        for err in &summary.marker_failures {
            output.failed(&err.to_string());
        }

        if !summary.is_success() {
            return Err(CliError::OpenApi(
                summary.failures().count() + summary.marker_failures.len(),
            ));
        }

        output.done(&format!(
            "Wrote {} page(s) for {} document(s)",
            summary.pages_written(),
            summary.pairs.len()
        ));
        Ok(())
    }
}
