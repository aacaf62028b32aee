//! `folio generate-meta` command implementation.

use std::path::PathBuf;

use clap::Args;
use folio_config::{CliSettings, Config};
use folio_nav::{NavGenerator, NavOptions};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate-meta command.
#[derive(Args)]
pub(crate) struct GenerateMetaArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Navigation document (overrides config).
    #[arg(long)]
    docs_json: Option<PathBuf>,

    /// Directory that receives the `meta.json` files (overrides config).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Also write one `meta.json` per dropdown directory.
    #[arg(long)]
    dropdown_meta: bool,
}

impl GenerateMetaArgs {
    /// Execute the generate-meta command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the navigation document is
    /// missing or malformed, or a write fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            docs_json: self.docs_json,
            navigation_output_dir: self.output_dir,
            dropdown_meta: self.dropdown_meta.then_some(true),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let navigation = config.navigation_resolved;

        output.step(&format!(
            "Generating meta.json from {}",
            navigation.file.display()
        ));

        let generator = NavGenerator::new(NavOptions {
            output_dir: navigation.output_dir,
            root_titles: navigation.root_titles,
            dropdown_aliases: navigation.dropdown_aliases,
            dropdown_meta: navigation.dropdown_meta,
        });
        let report = generator.run(&navigation.file)?;

        for path in &report.written {
            output.item(&format!("wrote {}", path.display()));
        }
        for path in &report.skipped {
            output.skipped(&format!("skipped {} (directory missing)", path.display()));
        }
        output.done(&format!(
            "Wrote {} meta.json file(s), skipped {}",
            report.written.len(),
            report.skipped.len()
        ));

        Ok(())
    }
}
