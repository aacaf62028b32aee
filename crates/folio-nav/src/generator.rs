//! `meta.json` generation from the navigation document.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use folio_storage::Meta;

use crate::NavError;
use crate::document::{Dropdown, Group, Language, NavDocument, NavItem, last_segment};
use crate::dropdown::DropdownDirs;

/// Root title for languages without a configured one.
const FALLBACK_ROOT_TITLE: &str = "Documentation";

/// Generator options.
#[derive(Clone, Debug, Default)]
pub struct NavOptions {
    /// Root that navigation page paths are relative to.
    pub output_dir: PathBuf,
    /// Title of each language's root `meta.json`, by locale.
    pub root_titles: BTreeMap<String, String>,
    /// Extra dropdown label to directory mappings.
    pub dropdown_aliases: BTreeMap<String, String>,
    /// Also write `<lang>/<dropdown>/meta.json`.
    pub dropdown_meta: bool,
}

/// Files written and directories skipped, in processing order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// Written `meta.json` paths.
    pub written: Vec<PathBuf>,
    /// Directories that did not exist.
    pub skipped: Vec<PathBuf>,
}

/// Navigation metadata generator.
///
/// Writes one `meta.json` per navigation group directory, one root
/// `meta.json` per language and, optionally, one per dropdown directory.
/// Directories are never created; missing ones are reported as skipped.
#[derive(Debug)]
pub struct NavGenerator {
    options: NavOptions,
    dirs: DropdownDirs,
}

impl NavGenerator {
    /// Create a generator.
    #[must_use]
    pub fn new(options: NavOptions) -> Self {
        let dirs = DropdownDirs::new(&options.dropdown_aliases);
        Self { options, dirs }
    }

    /// Read `docs_json` and generate metadata for it.
    ///
    /// # Errors
    ///
    /// Returns [`NavError`] if the document is missing or malformed, or a
    /// write fails. Files written before a failed write are kept.
    pub fn run(&self, docs_json: &Path) -> Result<GenerateReport, NavError> {
        let doc = NavDocument::from_path(docs_json)?;
        self.generate(&doc)
    }

    /// Generate metadata for a parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`NavError`] if a write fails.
    pub fn generate(&self, doc: &NavDocument) -> Result<GenerateReport, NavError> {
        let mut run = Run {
            root: &self.options.output_dir,
            visited: HashSet::new(),
            report: GenerateReport::default(),
        };
        for language in doc.languages() {
            tracing::info!(language = %language.language, "Processing language");
            self.language(&mut run, language)?;
        }
        Ok(run.report)
    }

    fn language(&self, run: &mut Run<'_>, language: &Language) -> Result<(), NavError> {
        let lang = language.language.as_str();

        for dropdown in &language.dropdowns {
            for section in dropdown.sections().filter(|s| s.openapi.is_none()) {
                for group in section.pages.iter().filter_map(NavItem::as_group) {
                    run.group(group)?;
                }
            }
        }

        let root_pages: Vec<String> = language
            .dropdowns
            .iter()
            .map(|d| self.dirs.resolve(&d.dropdown))
            .collect();
        let title = self
            .options
            .root_titles
            .get(lang)
            .map_or(FALLBACK_ROOT_TITLE, String::as_str);
        // Overrides any group that resolved to the language directory.
        run.visited.insert(lang.to_owned());
        run.write(lang, &Meta::listing(title, root_pages))?;

        if self.options.dropdown_meta {
            for dropdown in &language.dropdowns {
                self.dropdown(run, lang, dropdown)?;
            }
        }
        Ok(())
    }

    /// `<lang>/<dropdown>/meta.json` listing the section directories.
    fn dropdown(&self, run: &mut Run<'_>, lang: &str, dropdown: &Dropdown) -> Result<(), NavError> {
        let mut subdirs: Vec<String> = Vec::new();
        for section in dropdown.sections().filter(|s| s.openapi.is_none()) {
            let Some(third) = section.first_page().and_then(|p| p.split('/').nth(2)) else {
                continue;
            };
            if !subdirs.iter().any(|s| s == third) {
                subdirs.push(third.to_owned());
            }
        }
        if subdirs.is_empty() {
            return Ok(());
        }
        let dir = format!("{lang}/{}", self.dirs.resolve(&dropdown.dropdown));
        run.write_once(&dir, &Meta::listing(dropdown.dropdown.clone(), subdirs))
    }
}

/// State of one generator run.
struct Run<'a> {
    root: &'a Path,
    visited: HashSet<String>,
    report: GenerateReport,
}

impl Run<'_> {
    /// Visit a group: nested groups first, then the group's own file.
    fn group(&mut self, group: &Group) -> Result<(), NavError> {
        if group.openapi.is_some() {
            return Ok(());
        }
        let Some(dir) = group.dir() else {
            return Ok(());
        };
        if !self.visited.insert(dir.to_owned()) {
            return Ok(());
        }

        let mut pages: Vec<String> = Vec::new();
        for item in &group.pages {
            match item {
                NavItem::Page(path) => pages.push(last_segment(path).to_owned()),
                NavItem::Group(child) => {
                    if child.openapi.is_some() {
                        continue;
                    }
                    let Some(child_dir) = child.dir() else {
                        continue;
                    };
                    let name = last_segment(child_dir);
                    if !pages.iter().any(|p| p == name) {
                        pages.push(name.to_owned());
                    }
                    self.group(child)?;
                }
            }
        }

        self.write(dir, &Meta::listing(group.group.clone(), pages))
    }

    fn write_once(&mut self, dir: &str, meta: &Meta) -> Result<(), NavError> {
        if !self.visited.insert(dir.to_owned()) {
            return Ok(());
        }
        self.write(dir, meta)
    }

    fn write(&mut self, dir: &str, meta: &Meta) -> Result<(), NavError> {
        let full = dir
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root.to_path_buf(), |path, segment| path.join(segment));
        if !full.is_dir() {
            tracing::warn!(dir = %full.display(), "Directory does not exist, skipping");
            self.report.skipped.push(full);
            return Ok(());
        }
        let path = full.join("meta.json");
        meta.write(&path)?;
        tracing::info!(path = %path.display(), "Created meta.json");
        if !self.report.written.contains(&path) {
            self.report.written.push(path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    const DOCS_JSON: &str = r#"{
      "navigation": {
        "versions": [{
          "version": "latest",
          "languages": [
            {
              "language": "en",
              "dropdowns": [
                {
                  "dropdown": "Use Dify",
                  "pages": [{
                    "group": "Basics",
                    "pages": [
                      {
                        "group": "Getting Started",
                        "pages": [
                          "en/use-dify/getting-started/introduction",
                          "en/use-dify/getting-started/setup",
                          {
                            "group": "Advanced",
                            "pages": ["en/use-dify/getting-started/advanced/tuning"]
                          },
                          {
                            "group": "Advanced Again",
                            "pages": ["en/use-dify/getting-started/advanced/more"]
                          }
                        ]
                      },
                      {
                        "group": "Missing",
                        "pages": ["en/use-dify/missing/page"]
                      },
                      {
                        "group": "Spec",
                        "openapi": "en/spec.json",
                        "pages": ["en/use-dify/spec/op"]
                      },
                      {"group": "No Leaves", "pages": []}
                    ]
                  }]
                },
                {
                  "dropdown": "API Reference",
                  "groups": [{"group": "Chat", "openapi": "openapi_chat.json"}]
                }
              ]
            },
            {
              "language": "zh",
              "dropdowns": [{"dropdown": "API 参考", "groups": []}]
            }
          ]
        }]
      }
    }"#;

    fn setup() -> (tempfile::TempDir, NavDocument) {
        let dir = tempfile::tempdir().unwrap();
        for sub in [
            "en/use-dify/getting-started/advanced",
            "en/api-reference",
            "zh",
        ] {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        let doc = serde_json::from_str(DOCS_JSON).unwrap();
        (dir, doc)
    }

    fn generator(root: &Path, dropdown_meta: bool) -> NavGenerator {
        NavGenerator::new(NavOptions {
            output_dir: root.to_path_buf(),
            root_titles: BTreeMap::from([
                ("en".to_owned(), "Documentation".to_owned()),
                ("zh".to_owned(), "文档".to_owned()),
            ]),
            dropdown_aliases: BTreeMap::new(),
            dropdown_meta,
        })
    }

    fn read(root: &Path, path: &str) -> String {
        fs::read_to_string(root.join(path)).unwrap()
    }

    #[test]
    fn test_group_meta() {
        let (dir, doc) = setup();
        generator(dir.path(), false).generate(&doc).unwrap();

        assert_eq!(
            read(dir.path(), "en/use-dify/getting-started/meta.json"),
            "{\n  \"title\": \"Getting Started\",\n  \"pages\": [\n    \"introduction\",\n    \"setup\",\n    \"advanced\"\n  ]\n}\n"
        );
        // First visit wins for a shared directory.
        assert_eq!(
            read(dir.path(), "en/use-dify/getting-started/advanced/meta.json"),
            "{\n  \"title\": \"Advanced\",\n  \"pages\": [\n    \"tuning\"\n  ]\n}\n"
        );
    }

    #[test]
    fn test_root_meta_per_language() {
        let (dir, doc) = setup();
        generator(dir.path(), false).generate(&doc).unwrap();

        let en = Meta::from_json(&read(dir.path(), "en/meta.json")).unwrap();
        assert_eq!(
            en,
            Meta::listing(
                "Documentation",
                vec!["use-dify".to_owned(), "api-reference".to_owned()]
            )
        );
        assert_eq!(
            read(dir.path(), "zh/meta.json"),
            "{\n  \"title\": \"文档\",\n  \"pages\": [\n    \"api-reference\"\n  ]\n}\n"
        );
    }

    #[test]
    fn test_root_meta_wins_over_group_in_language_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("en")).unwrap();
        let doc: NavDocument = serde_json::from_str(
            r#"{"navigation": {"languages": [{
              "language": "en",
              "dropdowns": [{
                "dropdown": "Use Dify",
                "pages": [{
                  "group": "Top",
                  "pages": [{"group": "Intro", "pages": ["en/introduction"]}]
                }]
              }]
            }]}}"#,
        )
        .unwrap();

        let report = generator(dir.path(), false).generate(&doc).unwrap();

        assert_eq!(
            Meta::from_json(&read(dir.path(), "en/meta.json")).unwrap(),
            Meta::listing("Documentation", vec!["use-dify".to_owned()])
        );
        assert_eq!(report.written, vec![dir.path().join("en/meta.json")]);
    }

    #[test]
    fn test_root_title_fallback_for_unconfigured_locale() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("fr")).unwrap();
        let doc: NavDocument = serde_json::from_str(
            r#"{"navigation": {"languages": [{"language": "fr", "dropdowns": [{"dropdown": "Use Dify"}]}]}}"#,
        )
        .unwrap();

        generator(dir.path(), false).generate(&doc).unwrap();

        assert_eq!(
            Meta::from_json(&read(dir.path(), "fr/meta.json")).unwrap(),
            Meta::listing(FALLBACK_ROOT_TITLE, vec!["use-dify".to_owned()])
        );
    }

    #[test]
    fn test_groups_dropdown_visits_nested_groups() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("en/x")).unwrap();
        let doc: NavDocument = serde_json::from_str(
            r#"{"navigation": {"languages": [{
              "language": "en",
              "dropdowns": [{
                "dropdown": "Guides",
                "groups": [
                  {"group": "Section", "pages": [{"group": "Inner", "pages": ["en/x/a"]}]},
                  {"group": "Spec", "openapi": "spec.json", "pages": [{"group": "Ops", "pages": ["en/x/op"]}]}
                ]
              }]
            }]}}"#,
        )
        .unwrap();

        generator(dir.path(), false).generate(&doc).unwrap();

        assert_eq!(
            Meta::from_json(&read(dir.path(), "en/x/meta.json")).unwrap(),
            Meta::listing("Inner", vec!["a".to_owned()])
        );
    }

    #[test]
    fn test_report_order_and_skips() {
        let (dir, doc) = setup();
        let report = generator(dir.path(), false).generate(&doc).unwrap();

        let root = dir.path();
        assert_eq!(
            report.written,
            vec![
                root.join("en/use-dify/getting-started/advanced/meta.json"),
                root.join("en/use-dify/getting-started/meta.json"),
                root.join("en/meta.json"),
                root.join("zh/meta.json"),
            ]
        );
        assert_eq!(report.skipped, vec![root.join("en/use-dify/missing")]);
        assert!(!root.join("en/use-dify/spec").exists());
    }

    #[test]
    fn test_idempotent() {
        let (dir, doc) = setup();
        let generator = generator(dir.path(), false);
        generator.generate(&doc).unwrap();
        let first = read(dir.path(), "en/use-dify/getting-started/meta.json");
        generator.generate(&doc).unwrap();
        assert_eq!(read(dir.path(), "en/use-dify/getting-started/meta.json"), first);
    }

    #[test]
    fn test_dropdown_meta_opt_in() {
        let (dir, doc) = setup();
        fs::create_dir_all(dir.path().join("en/use-dify")).unwrap();

        generator(dir.path(), false).generate(&doc).unwrap();
        assert!(!dir.path().join("en/use-dify/meta.json").exists());

        let report = generator(dir.path(), true).generate(&doc).unwrap();
        let meta = Meta::from_json(&read(dir.path(), "en/use-dify/meta.json")).unwrap();
        assert_eq!(
            meta,
            Meta::listing("Use Dify", vec!["getting-started".to_owned()])
        );
        assert!(report.written.contains(&dir.path().join("en/use-dify/meta.json")));
        // OpenAPI-only dropdowns get no listing.
        assert!(!dir.path().join("en/api-reference/meta.json").exists());
    }

    #[test]
    fn test_run_missing_docs_json() {
        let dir = tempfile::tempdir().unwrap();
        let err = generator(dir.path(), false)
            .run(&dir.path().join("docs.json"))
            .unwrap_err();
        assert!(matches!(err, NavError::Read { .. }));
    }
}
