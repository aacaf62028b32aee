//! Concurrent generation over (locale, API) pairs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use folio_storage::Meta;

use crate::OpenApiError;
use crate::document::ApiDocument;
use crate::page::{file_stem, render_page};

/// Directory under each locale receiving the generated pages.
const REFERENCE_DIR: &str = "api-reference";

/// Generator options.
#[derive(Clone, Debug)]
pub struct OpenApiOptions {
    /// Directory holding `<locale>/openapi_<api>.json`.
    pub input_dir: PathBuf,
    /// Content root receiving `<locale>/api-reference/<api>/`.
    pub output_dir: PathBuf,
    /// Locale codes.
    pub locales: Vec<String>,
    /// API names.
    pub apis: Vec<String>,
    /// Copy operation descriptions into the page body.
    pub include_description: bool,
}

/// Outcome of one (locale, API) pair.
#[derive(Debug)]
pub struct PairOutcome {
    /// Locale code.
    pub locale: String,
    /// API name.
    pub api: String,
    /// Written page paths, or the failure.
    pub result: Result<Vec<PathBuf>, OpenApiError>,
}

/// Outcome of a generator run.
#[derive(Debug, Default)]
pub struct GenerateSummary {
    /// Per-pair outcomes, in `locales × apis` order.
    pub pairs: Vec<PairOutcome>,
    /// Written `{ "root": true }` markers.
    pub markers: Vec<PathBuf>,
    /// Marker writes that failed.
    pub marker_failures: Vec<OpenApiError>,
}

impl GenerateSummary {
    /// Pairs that failed.
    pub fn failures(&self) -> impl Iterator<Item = (&PairOutcome, &OpenApiError)> {
        self.pairs
            .iter()
            .filter_map(|pair| pair.result.as_ref().err().map(|err| (pair, err)))
    }

    /// Total pages written.
    #[must_use]
    pub fn pages_written(&self) -> usize {
        self.pairs
            .iter()
            .filter_map(|pair| pair.result.as_ref().ok())
            .map(Vec::len)
            .sum()
    }

    /// Whether every pair and marker succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none() && self.marker_failures.is_empty()
    }
}

/// API reference generator.
///
/// Each pair reads `<input_dir>/<locale>/openapi_<api>.json` and writes one
/// MDX page per operation into `<output_dir>/<locale>/api-reference/<api>/`.
/// Pairs run as concurrent blocking tasks; a failing pair does not affect
/// the others.
#[derive(Debug)]
pub struct OpenApiGenerator {
    options: Arc<OpenApiOptions>,
}

impl OpenApiGenerator {
    /// Create a generator.
    #[must_use]
    pub fn new(options: OpenApiOptions) -> Self {
        Self {
            options: Arc::new(options),
        }
    }

    /// Generate all pairs, then the per-locale root markers.
    ///
    /// A locale gets its marker if at least one of its pairs succeeded.
    pub async fn run(&self) -> GenerateSummary {
        let mut handles = Vec::new();
        for locale in &self.options.locales {
            for api in &self.options.apis {
                let options = Arc::clone(&self.options);
                let (task_locale, task_api) = (locale.clone(), api.clone());
                let handle = tokio::task::spawn_blocking(move || {
                    generate_pair(&options, &task_locale, &task_api)
                });
                handles.push((locale.clone(), api.clone(), handle));
            }
        }

        let mut summary = GenerateSummary::default();
        for (locale, api, handle) in handles {
            let result = handle
                .await
                .unwrap_or_else(|e| Err(OpenApiError::Task(e.to_string())));
            match &result {
                Ok(pages) => {
                    tracing::info!(%locale, %api, pages = pages.len(), "Generated API reference");
                }
                Err(e) => tracing::error!(%locale, %api, error = %e, "API reference generation failed"),
            }
            summary.pairs.push(PairOutcome {
                locale,
                api,
                result,
            });
        }

        for locale in &self.options.locales {
            let succeeded = summary
                .pairs
                .iter()
                .any(|pair| &pair.locale == locale && pair.result.is_ok());
            if !succeeded {
                continue;
            }
            let path = self
                .options
                .output_dir
                .join(locale)
                .join(REFERENCE_DIR)
                .join("meta.json");
            match Meta::root_marker().write(&path) {
                Ok(()) => summary.markers.push(path),
                Err(e) => {
                    tracing::error!(%locale, error = %e, "Failed to write root marker");
                    summary.marker_failures.push(e.into());
                }
            }
        }

        summary
    }
}

/// Generate the pages of one pair.
fn generate_pair(
    options: &OpenApiOptions,
    locale: &str,
    api: &str,
) -> Result<Vec<PathBuf>, OpenApiError> {
    let input = options
        .input_dir
        .join(locale)
        .join(format!("openapi_{api}.json"));
    let text = std::fs::read_to_string(&input).map_err(|source| OpenApiError::Read {
        path: input.clone(),
        source,
    })?;
    let doc = ApiDocument::parse(&text).map_err(|source| OpenApiError::Parse {
        path: input.clone(),
        source,
    })?;

    let out_dir = options.output_dir.join(locale).join(REFERENCE_DIR).join(api);
    create_dir(&out_dir)?;

    let document = format!("{locale}/openapi_{api}.json");
    let mut stems: HashMap<String, usize> = HashMap::new();
    let mut written = Vec::new();
    for op in doc.operations() {
        let stem = unique_stem(&mut stems, file_stem(&op));
        let page = render_page(&doc, &op, &document, options.include_description)?;
        let path = out_dir.join(format!("{stem}.mdx"));
        std::fs::write(&path, page).map_err(|source| OpenApiError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), method = op.method, route = op.route, "Wrote API page");
        written.push(path);
    }
    Ok(written)
}

fn create_dir(dir: &Path) -> Result<(), OpenApiError> {
    std::fs::create_dir_all(dir).map_err(|source| OpenApiError::Write {
        path: dir.to_path_buf(),
        source,
    })
}

/// `stem`, then `stem-2`, `stem-3`, … on collisions.
fn unique_stem(stems: &mut HashMap<String, usize>, stem: String) -> String {
    let count = stems.entry(stem.clone()).or_insert(0);
    *count += 1;
    if *count == 1 {
        stem
    } else {
        let candidate = format!("{stem}-{count}");
        // A literal `name-2` operation could already exist.
        if stems.contains_key(&candidate) {
            unique_stem(stems, candidate)
        } else {
            stems.insert(candidate.clone(), 1);
            candidate
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    const CHAT: &str = r#"{
        "openapi": "3.0.1",
        "paths": {
            "/chat-messages": {
                "post": {"operationId": "createChatMessage", "summary": "Send"},
                "get": {"operationId": "createChatMessage", "summary": "Duplicate id"}
            },
            "/messages/{id}": {
                "delete": {"summary": "Delete"}
            }
        }
    }"#;

    fn options(root: &Path, locales: &[&str], apis: &[&str]) -> OpenApiOptions {
        OpenApiOptions {
            input_dir: root.join("api-reference"),
            output_dir: root.join("content/docs"),
            locales: locales.iter().map(|s| (*s).to_owned()).collect(),
            apis: apis.iter().map(|s| (*s).to_owned()).collect(),
            include_description: true,
        }
    }

    fn write_input(root: &Path, locale: &str, api: &str, text: &str) {
        let dir = root.join("api-reference").join(locale);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("openapi_{api}.json")), text).unwrap();
    }

    #[test]
    fn test_unique_stem() {
        let mut stems = HashMap::new();
        assert_eq!(unique_stem(&mut stems, "a".to_owned()), "a");
        assert_eq!(unique_stem(&mut stems, "a".to_owned()), "a-2");
        assert_eq!(unique_stem(&mut stems, "a".to_owned()), "a-3");
        assert_eq!(unique_stem(&mut stems, "a-2".to_owned()), "a-2-2");
    }

    #[tokio::test]
    async fn test_one_page_per_operation() {
        let dir = tempfile::tempdir().unwrap();
        write_input(dir.path(), "en", "chat", CHAT);

        let summary = OpenApiGenerator::new(options(dir.path(), &["en"], &["chat"]))
            .run()
            .await;
        assert!(summary.is_success());
        assert_eq!(summary.pages_written(), 3);

        let out = dir.path().join("content/docs/en/api-reference");
        let mut names: Vec<_> = fs::read_dir(out.join("chat"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "create-chat-message-2.mdx",
                "create-chat-message.mdx",
                "delete-messages-id.mdx"
            ]
        );
        assert_eq!(
            fs::read_to_string(out.join("meta.json")).unwrap(),
            "{\n  \"root\": true\n}\n"
        );
    }

    #[tokio::test]
    async fn test_missing_input_fails_only_its_pair() {
        let dir = tempfile::tempdir().unwrap();
        write_input(dir.path(), "en", "chat", CHAT);
        write_input(dir.path(), "zh", "workflow", "{broken");

        let summary = OpenApiGenerator::new(options(
            dir.path(),
            &["en", "zh", "ja"],
            &["chat", "workflow"],
        ))
        .run()
        .await;

        assert!(!summary.is_success());
        let failed: Vec<_> = summary
            .failures()
            .map(|(pair, _)| format!("{}/{}", pair.locale, pair.api))
            .collect();
        assert_eq!(
            failed,
            vec!["en/workflow", "zh/chat", "zh/workflow", "ja/chat", "ja/workflow"]
        );
        assert!(matches!(
            summary.pairs[3].result,
            Err(OpenApiError::Parse { .. })
        ));
        assert_eq!(
            summary.markers,
            vec![dir.path().join("content/docs/en/api-reference/meta.json")]
        );
        assert!(!dir.path().join("content/docs/zh/api-reference/meta.json").exists());
    }
}
