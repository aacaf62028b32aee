//! HTTP server for Folio documentation sites.
//!
//! Serves the pages of a [`Source`] as HTML, plus their markdown exports,
//! page trees and search results:
//!
//! | Route | Response |
//! |-------|----------|
//! | `/`, `/<lang>` | temporary redirect to the landing page |
//! | `/<lang>/<slug…>` | HTML page (`ETag`, `Last-Modified`, `304`) |
//! | `/<lang>/<slug…>.mdx` | markdown export |
//! | `/llms.mdx/<lang>/<slug…>` | markdown export |
//! | `/api/search?query=&locale=` | JSON search results |
//! | `/api/tree/<lang>` | JSON page tree |
//!
//! Unknown pages get a JSON `404`. Every response carries security headers
//! and every request is traced.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! use folio_server::{ServerConfig, run_server};
//! use folio_source::{Source, SourceConfig};
//! use folio_storage::FsStorage;
//!
//! #[tokio::main]
//! async fn main() {
//!     let storage = Arc::new(FsStorage::new(PathBuf::from("content/docs")));
//!     let source = Arc::new(Source::new(storage, SourceConfig::default()));
//!     run_server(ServerConfig::default(), source).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod html;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use folio_config::SiteConfig;
use folio_source::{Source, SourceConfig};
use state::AppState;

pub use error::ServerError;
pub use html::page_html;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Site presentation settings.
    pub site: SiteConfig,
    /// Application version, mixed into `ETag`s.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            site: SiteConfig::default(),
            version: String::new(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn run_server(
    config: ServerConfig,
    source: Arc<Source>,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState {
        source,
        site: config.site,
        version: config.version,
    });
    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Folio config.
#[must_use]
pub fn server_config_from_folio_config(config: &folio_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        site: config.site.clone(),
        version,
    }
}

/// Create content source configuration from Folio config.
#[must_use]
pub fn source_config_from_folio_config(config: &folio_config::Config) -> SourceConfig {
    SourceConfig {
        i18n: config.i18n.clone(),
        renderer: folio_renderer::RendererOptions {
            default_language: config.markdown.default_language.clone(),
            lang_alias: config.markdown.lang_alias.clone(),
        },
        tokenizers: config.search.tokenizers.clone(),
        tree_name: config.site.title.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_folio_config() {
        let config = folio_config::Config::default();
        let server = server_config_from_folio_config(&config, "1.0.0".to_owned());
        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.port, 7979);
        assert_eq!(server.version, "1.0.0");

        let source = source_config_from_folio_config(&config);
        assert_eq!(source.i18n.default_language, "en");
        assert_eq!(source.renderer.default_language, "text");
        assert_eq!(source.tree_name, "Dify Docs");
    }
}
