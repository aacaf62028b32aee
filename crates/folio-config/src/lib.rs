//! Configuration management for Folio.
//!
//! Parses `folio.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `site.base_url`

mod expand;
pub mod i18n;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use i18n::{I18nConfig, Locale, LocaleParser};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override content directory.
    pub content_dir: Option<PathBuf>,
    /// Override navigation document path.
    pub docs_json: Option<PathBuf>,
    /// Override navigation metadata output root.
    pub navigation_output_dir: Option<PathBuf>,
    /// Override dropdown-level metadata generation.
    pub dropdown_meta: Option<bool>,
    /// Override `OpenAPI` input directory.
    pub openapi_input_dir: Option<PathBuf>,
    /// Override `OpenAPI` output root.
    pub openapi_output_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "folio.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site presentation settings.
    pub site: SiteConfig,
    /// Server configuration.
    pub server: ServerConfig,
    /// Content configuration (paths are relative strings from TOML).
    content: ContentConfigRaw,
    /// Locale registry.
    pub i18n: I18nConfig,
    /// Navigation metadata generator configuration (raw).
    navigation: NavigationConfigRaw,
    /// `OpenAPI` generator configuration (raw).
    openapi: OpenApiConfigRaw,
    /// Markdown rendering options.
    pub markdown: MarkdownConfig,
    /// Search options.
    pub search: SearchConfig,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Resolved navigation configuration (set after loading).
    #[serde(skip)]
    pub navigation_resolved: NavigationConfig,
    /// Resolved `OpenAPI` configuration (set after loading).
    #[serde(skip)]
    pub openapi_resolved: OpenApiConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site presentation settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title, used when a page has no title.
    pub title: String,
    /// Page title template; `%s` is replaced with the page title.
    pub title_template: String,
    /// Landing page slug (without locale) that `/` and `/<lang>` redirect to.
    pub landing_page: String,
    /// Public base URL (used for absolute links in exported pages).
    pub base_url: Option<String>,
    /// Repository hosting the content, for "view source" links.
    pub github: Option<GithubConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Dify Docs".to_owned(),
            title_template: "%s - Dify Docs".to_owned(),
            landing_page: "use-dify/getting-started/introduction".to_owned(),
            base_url: None,
            github: None,
        }
    }
}

impl SiteConfig {
    /// Apply the title template to a page title.
    #[must_use]
    pub fn page_title(&self, title: &str) -> String {
        self.title_template.replace("%s", title)
    }
}

/// GitHub repository coordinates.
#[derive(Clone, Debug, Deserialize)]
pub struct GithubConfig {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Branch used in source links.
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Content directory inside the repository.
    #[serde(default = "default_content_path")]
    pub content_path: String,
}

impl GithubConfig {
    /// Source link of a content file (path relative to the content root).
    #[must_use]
    pub fn blob_url(&self, path: &str) -> String {
        format!(
            "https://github.com/{}/{}/blob/{}/{}/{path}",
            self.owner,
            self.repo,
            self.branch,
            self.content_path.trim_matches('/')
        )
    }
}

fn default_branch() -> String {
    "main".to_owned()
}

fn default_content_path() -> String {
    "content/docs".to_owned()
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

/// Raw content configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    dir: Option<String>,
}

/// Resolved content configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Content directory (`content/docs`).
    pub dir: PathBuf,
}

/// Raw navigation generator configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct NavigationConfigRaw {
    file: Option<String>,
    output_dir: Option<String>,
    dropdown_meta: Option<bool>,
    root_titles: Option<BTreeMap<String, String>>,
    dropdown_aliases: BTreeMap<String, String>,
}

/// Resolved navigation metadata generator configuration.
#[derive(Debug, Default)]
pub struct NavigationConfig {
    /// Navigation document (`docs.json`).
    pub file: PathBuf,
    /// Root that navigation page paths are relative to.
    pub output_dir: PathBuf,
    /// Also write one `meta.json` per dropdown directory.
    pub dropdown_meta: bool,
    /// Localized titles for the per-language root `meta.json`.
    pub root_titles: BTreeMap<String, String>,
    /// Extra dropdown label to directory mappings (label matched lower-cased).
    pub dropdown_aliases: BTreeMap<String, String>,
}

/// Raw `OpenAPI` generator configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OpenApiConfigRaw {
    input_dir: Option<String>,
    output_dir: Option<String>,
    apis: Option<Vec<String>>,
    include_description: Option<bool>,
}

/// Resolved `OpenAPI` generator configuration.
#[derive(Debug, Default)]
pub struct OpenApiConfig {
    /// Directory holding `<locale>/openapi_<api>.json` documents.
    pub input_dir: PathBuf,
    /// Root receiving `<locale>/api-reference/<api>/` pages.
    pub output_dir: PathBuf,
    /// API names.
    pub apis: Vec<String>,
    /// Copy operation descriptions into the page body.
    pub include_description: bool,
}

/// Markdown rendering options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Language used for fences without one.
    pub default_language: String,
    /// Code fence language aliases, merged over the built-in table.
    pub lang_alias: BTreeMap<String, String>,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            default_language: "text".to_owned(),
            lang_alias: BTreeMap::new(),
        }
    }
}

/// Search options.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Tokenizer name per locale ("default", "mandarin", "japanese").
    pub tokenizers: BTreeMap<String, String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`FOLIO_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Default API names for the `OpenAPI` generator.
const DEFAULT_APIS: [&str; 5] = ["chat", "chatflow", "completion", "knowledge", "workflow"];

/// Default localized titles for the per-language root `meta.json`.
fn default_root_titles() -> BTreeMap<String, String> {
    [("en", "Documentation"), ("zh", "文档"), ("ja", "ドキュメント")]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `folio.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(content_dir) = &settings.content_dir {
            self.content_resolved.dir.clone_from(content_dir);
        }
        if let Some(docs_json) = &settings.docs_json {
            self.navigation_resolved.file.clone_from(docs_json);
        }
        if let Some(output_dir) = &settings.navigation_output_dir {
            self.navigation_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(dropdown_meta) = settings.dropdown_meta {
            self.navigation_resolved.dropdown_meta = dropdown_meta;
        }
        if let Some(input_dir) = &settings.openapi_input_dir {
            self.openapi_resolved.input_dir.clone_from(input_dir);
        }
        if let Some(output_dir) = &settings.openapi_output_dir {
            self.openapi_resolved.output_dir.clone_from(output_dir);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            site: SiteConfig::default(),
            server: ServerConfig::default(),
            content: ContentConfigRaw::default(),
            i18n: I18nConfig::default(),
            navigation: NavigationConfigRaw::default(),
            openapi: OpenApiConfigRaw::default(),
            markdown: MarkdownConfig::default(),
            search: SearchConfig::default(),
            content_resolved: ContentConfig::default(),
            navigation_resolved: NavigationConfig::default(),
            openapi_resolved: OpenApiConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_site()?;
        self.i18n.validate()?;
        self.validate_openapi()?;
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate site configuration.
    fn validate_site(&self) -> Result<(), ConfigError> {
        if !self.site.title_template.contains("%s") {
            return Err(ConfigError::Validation(
                "site.title_template must contain %s".to_owned(),
            ));
        }
        if let Some(ref base_url) = self.site.base_url {
            require_http_url(base_url, "site.base_url")?;
        }
        if let Some(ref github) = self.site.github {
            require_non_empty(&github.owner, "site.github.owner")?;
            require_non_empty(&github.repo, "site.github.repo")?;
        }
        Ok(())
    }

    /// Validate `OpenAPI` generator configuration.
    fn validate_openapi(&self) -> Result<(), ConfigError> {
        if self.openapi_resolved.apis.is_empty() {
            return Err(ConfigError::Validation(
                "openapi.apis must list at least one API".to_owned(),
            ));
        }
        for api in &self.openapi_resolved.apis {
            require_non_empty(api, "openapi.apis")?;
            if api.contains('/') || api.contains('\\') {
                return Err(ConfigError::Validation(format!(
                    "openapi.apis: '{api}' must not contain path separators"
                )));
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref url) = self.site.base_url {
            self.site.base_url = Some(expand::expand_env(url, "site.base_url")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        let content_dir = resolve(self.content.dir.as_deref(), "content/docs");

        let mut root_titles = default_root_titles();
        if let Some(titles) = &self.navigation.root_titles {
            root_titles.extend(titles.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        self.navigation_resolved = NavigationConfig {
            file: resolve(self.navigation.file.as_deref(), "docs.json"),
            output_dir: self
                .navigation
                .output_dir
                .as_deref()
                .map_or_else(|| content_dir.clone(), |dir| config_dir.join(dir)),
            dropdown_meta: self.navigation.dropdown_meta.unwrap_or(false),
            root_titles,
            dropdown_aliases: self
                .navigation
                .dropdown_aliases
                .iter()
                .map(|(label, dir)| (label.to_lowercase(), dir.clone()))
                .collect(),
        };

        self.openapi_resolved = OpenApiConfig {
            input_dir: resolve(self.openapi.input_dir.as_deref(), "api-reference"),
            output_dir: self
                .openapi
                .output_dir
                .as_deref()
                .map_or_else(|| content_dir.clone(), |dir| config_dir.join(dir)),
            apis: self.openapi.apis.clone().unwrap_or_else(|| {
                DEFAULT_APIS.iter().map(|&api| api.to_owned()).collect()
            }),
            include_description: self.openapi.include_description.unwrap_or(true),
        };

        self.content_resolved = ContentConfig { dir: content_dir };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
        assert_eq!(
            config.content_resolved.dir,
            PathBuf::from("/test/content/docs")
        );
        assert_eq!(
            config.navigation_resolved.file,
            PathBuf::from("/test/docs.json")
        );
        assert_eq!(
            config.navigation_resolved.output_dir,
            PathBuf::from("/test/content/docs")
        );
        assert!(!config.navigation_resolved.dropdown_meta);
        assert_eq!(
            config.navigation_resolved.root_titles.get("zh"),
            Some(&"文档".to_owned())
        );
        assert_eq!(
            config.openapi_resolved.input_dir,
            PathBuf::from("/test/api-reference")
        );
        assert_eq!(
            config.openapi_resolved.apis,
            vec!["chat", "chatflow", "completion", "knowledge", "workflow"]
        );
        assert!(config.openapi_resolved.include_description);
        assert_eq!(config.site.landing_page, "use-dify/getting-started/introduction");
        assert_eq!(config.markdown.default_language, "text");
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
        assert_eq!(config.i18n.default_language, "en");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[site]
title = "Acme Docs"
title_template = "%s | Acme"
landing_page = "start/intro"

[site.github]
owner = "acme"
repo = "docs"

[server]
host = "0.0.0.0"
port = 9000

[content]
dir = "site/content"

[i18n]
default_language = "ja"
languages = [{ locale = "ja", name = "日本語" }, { locale = "en", name = "English" }]

[navigation]
file = "nav/docs.json"
dropdown_meta = true
root_titles = { en = "Docs" }
dropdown_aliases = { "Cookbook" = "recipes" }

[openapi]
apis = ["chat"]
include_description = false

[markdown]
lang_alias = { tsx = "typescript" }

[search.tokenizers]
ja = "japanese"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        config.validate().unwrap();

        assert_eq!(config.site.page_title("Intro"), "Intro | Acme");
        let github = config.site.github.as_ref().unwrap();
        assert_eq!(github.branch, "main");
        assert_eq!(
            github.blob_url("en/guide.mdx"),
            format!(
                "https://github.com/{}/{}/blob/main/content/docs/en/guide.mdx",
                github.owner, github.repo
            )
        );
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.content_resolved.dir,
            PathBuf::from("/project/site/content")
        );
        assert_eq!(config.i18n.default_language, "ja");
        assert_eq!(
            config.navigation_resolved.file,
            PathBuf::from("/project/nav/docs.json")
        );
        assert_eq!(
            config.navigation_resolved.output_dir,
            PathBuf::from("/project/site/content")
        );
        assert!(config.navigation_resolved.dropdown_meta);
        assert_eq!(
            config.navigation_resolved.root_titles.get("en"),
            Some(&"Docs".to_owned())
        );
        assert_eq!(
            config.navigation_resolved.root_titles.get("ja"),
            Some(&"ドキュメント".to_owned())
        );
        assert_eq!(
            config.navigation_resolved.dropdown_aliases.get("cookbook"),
            Some(&"recipes".to_owned())
        );
        assert_eq!(config.openapi_resolved.apis, vec!["chat"]);
        assert!(!config.openapi_resolved.include_description);
        assert_eq!(
            config.markdown.lang_alias.get("tsx"),
            Some(&"typescript".to_owned())
        );
        assert_eq!(
            config.search.tokenizers.get("ja"),
            Some(&"japanese".to_owned())
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server]\nport = 8123\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.server.port, 8123);
        assert_eq!(config.config_path, Some(path));
        assert_eq!(config.content_resolved.dir, dir.path().join("content/docs"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/folio.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server]\nport = 0\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(9000),
            content_dir: Some(PathBuf::from("/custom/content")),
            docs_json: Some(PathBuf::from("/custom/docs.json")),
            dropdown_meta: Some(true),
            openapi_input_dir: Some(PathBuf::from("/specs")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.content_resolved.dir,
            PathBuf::from("/custom/content")
        );
        assert_eq!(
            config.navigation_resolved.file,
            PathBuf::from("/custom/docs.json")
        );
        assert!(config.navigation_resolved.dropdown_meta);
        assert_eq!(config.openapi_resolved.input_dir, PathBuf::from("/specs"));
        // Unchanged
        assert_eq!(
            config.openapi_resolved.output_dir,
            PathBuf::from("/test/content/docs")
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let config_before = Config::default_with_base(Path::new("/test"));
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, config_before.server.host);
        assert_eq!(config.server.port, config_before.server.port);
        assert_eq!(
            config.content_resolved.dir,
            config_before.content_resolved.dir
        );
    }

    #[test]
    fn test_expand_env_vars_server_host() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("FOLIO_TEST_HOST", "0.0.0.0");
        }

        let toml = r#"
[server]
host = "${FOLIO_TEST_HOST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.server.host, "0.0.0.0");

        unsafe {
            std::env::remove_var("FOLIO_TEST_HOST");
        }
    }

    #[test]
    fn test_expand_env_vars_base_url_default() {
        let toml = r#"
[site]
base_url = "${FOLIO_UNSET_BASE_URL:-https://docs.example.com}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(
            config.site.base_url,
            Some("https://docs.example.com".to_owned())
        );
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_server_host_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.host = String::new();
        assert_validation_error(&config, &["server.host", "empty"]);
    }

    #[test]
    fn test_validate_server_port_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;
        assert_validation_error(&config, &["server.port"]);
    }

    #[test]
    fn test_validate_title_template_placeholder() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.title_template = "Docs".to_owned();
        assert_validation_error(&config, &["title_template", "%s"]);
    }

    #[test]
    fn test_validate_base_url_scheme() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.base_url = Some("ftp://docs.example.com".to_owned());
        assert_validation_error(&config, &["site.base_url", "http"]);
    }

    #[test]
    fn test_validate_api_with_separator() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.openapi_resolved.apis = vec!["chat/v2".to_owned()];
        assert_validation_error(&config, &["openapi.apis", "separators"]);
    }

    #[test]
    fn test_validate_no_apis() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.openapi_resolved.apis.clear();
        assert_validation_error(&config, &["openapi.apis"]);
    }

    #[test]
    fn test_validate_i18n_errors_propagate() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.i18n.default_language = "de".to_owned();
        assert_validation_error(&config, &["default_language"]);
    }
}
