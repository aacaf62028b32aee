//! `folio export` command implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use folio_config::{CliSettings, Config, SiteConfig};
use folio_server::{page_html, source_config_from_folio_config};
use folio_source::Source;
use folio_storage::FsStorage;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the export command.
#[derive(Args)]
pub(crate) struct ExportArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory.
    #[arg(short, long, default_value = "out")]
    out: PathBuf,
}

impl ExportArgs {
    /// Execute the export command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, a page cannot be rendered,
    /// or a file cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), Some(&CliSettings::default()))?;
        output.step(&format!(
            "Exporting {} to {}",
            config.content_resolved.dir.display(),
            self.out.display()
        ));

        let storage = Arc::new(FsStorage::new(config.content_resolved.dir.clone()));
        let source = Source::new(storage, source_config_from_folio_config(&config));

        let count = export_site(&source, &config.site, &self.out)?;
        output.done(&format!("Exported {count} page(s)"));
        Ok(())
    }
}

/// Write every page as `<out>/<lang>/<slug>/index.html` plus
/// `<out>/<lang>/<slug>.mdx`. Returns the number of pages written.
fn export_site(source: &Source, site: &SiteConfig, out: &Path) -> Result<usize, CliError> {
    let params = source.generate_params();
    let mut count = 0;

    for param in &params {
        let Some(page) = source.get_page(param.slug.as_slice(), Some(param.lang.as_str())) else {
            continue;
        };

        let base = param
            .slug
            .iter()
            .fold(out.join(&param.lang), |path, segment| path.join(segment));
        let html_path = base.join("index.html");
        let mut markdown_path = base.clone().into_os_string();
        markdown_path.push(".mdx");

        std::fs::create_dir_all(&base)?;
        std::fs::write(&html_path, page_html(source, site, &page)?)?;
        std::fs::write(&markdown_path, source.llm_text(&page)?)?;
        tracing::debug!(path = %html_path.display(), "Exported page");
        count += 1;
    }

    Ok(count)
}
