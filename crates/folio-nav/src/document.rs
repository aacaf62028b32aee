//! Navigation document (`docs.json`) model.

use std::path::Path;

use serde::Deserialize;

use crate::NavError;

/// Parsed navigation document.
#[derive(Debug, Default, Deserialize)]
pub struct NavDocument {
    /// Navigation root.
    #[serde(default)]
    pub navigation: Navigation,
}

/// Navigation root: versioned languages, or languages directly.
#[derive(Debug, Default, Deserialize)]
pub struct Navigation {
    /// Versions, each with its languages.
    #[serde(default)]
    pub versions: Vec<Version>,
    /// Languages without a version level.
    #[serde(default)]
    pub languages: Vec<Language>,
}

/// Documentation version.
#[derive(Debug, Deserialize)]
pub struct Version {
    /// Version label.
    #[serde(default)]
    pub version: Option<String>,
    /// Languages of this version.
    #[serde(default)]
    pub languages: Vec<Language>,
}

/// Navigation of one language.
#[derive(Debug, Deserialize)]
pub struct Language {
    /// Locale code, also the content directory name.
    pub language: String,
    /// Top-level sections.
    #[serde(default)]
    pub dropdowns: Vec<Dropdown>,
}

/// Top-level navigation section.
#[derive(Debug, Deserialize)]
pub struct Dropdown {
    /// Display label.
    pub dropdown: String,
    /// Icon name.
    #[serde(default)]
    pub icon: Option<String>,
    /// Page-based sections.
    #[serde(default)]
    pub pages: Option<Vec<NavItem>>,
    /// Group-based sections (API reference style).
    #[serde(default)]
    pub groups: Option<Vec<Group>>,
}

impl Dropdown {
    /// Section groups in source order, from `pages`, or from `groups` when
    /// the dropdown has no `pages`.
    pub fn sections(&self) -> impl Iterator<Item = &Group> {
        let pages = self.pages.iter().flatten().filter_map(NavItem::as_group);
        let groups = self
            .groups
            .iter()
            .filter(|_| self.pages.is_none())
            .flatten();
        pages.chain(groups)
    }
}

/// Navigation entry: a page path or a nested group.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NavItem {
    /// Page path relative to the content root, without extension.
    Page(String),
    /// Nested group.
    Group(Group),
}

impl NavItem {
    /// The group, if this item is one.
    #[must_use]
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(group) => Some(group),
            Self::Page(_) => None,
        }
    }
}

/// Named collection of pages.
#[derive(Debug, Deserialize)]
pub struct Group {
    /// Group title.
    pub group: String,
    /// Icon name.
    #[serde(default)]
    pub icon: Option<String>,
    /// Expanded by default.
    #[serde(default)]
    pub expanded: Option<bool>,
    /// `OpenAPI` source; such groups are generated separately.
    #[serde(default)]
    pub openapi: Option<serde_json::Value>,
    /// Entries in navigation order.
    #[serde(default)]
    pub pages: Vec<NavItem>,
}

impl Group {
    /// First page path found depth-first.
    #[must_use]
    pub fn first_page(&self) -> Option<&str> {
        first_page(&self.pages)
    }

    /// Directory of the group: the parent directory of its first page.
    #[must_use]
    pub fn dir(&self) -> Option<&str> {
        self.first_page().map(parent_dir)
    }
}

impl NavDocument {
    /// Read and parse a navigation document.
    ///
    /// # Errors
    ///
    /// Returns [`NavError`] if the file cannot be read or is not valid JSON.
    pub fn from_path(path: &Path) -> Result<Self, NavError> {
        let text = std::fs::read_to_string(path).map_err(|source| NavError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| NavError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// All languages, versioned ones first.
    pub fn languages(&self) -> impl Iterator<Item = &Language> {
        self.navigation
            .versions
            .iter()
            .flat_map(|v| &v.languages)
            .chain(&self.navigation.languages)
    }
}

/// First page path in `items`, searching nested groups depth-first.
#[must_use]
pub fn first_page(items: &[NavItem]) -> Option<&str> {
    items.iter().find_map(|item| match item {
        NavItem::Page(path) => Some(path.as_str()),
        NavItem::Group(group) => group.first_page(),
    })
}

/// Last segment of a `/`-separated path.
pub(crate) fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Path without its last segment (empty for a single segment).
pub(crate) fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const DOC: &str = r#"{
        "navigation": {
            "versions": [{
                "version": "latest",
                "languages": [{
                    "language": "en",
                    "dropdowns": [{
                        "dropdown": "Use Dify",
                        "pages": [{
                            "group": "Start",
                            "pages": [
                                {"group": "Nested", "pages": [{"group": "Deep", "pages": ["en/a/b/c"]}]},
                                "en/a/intro"
                            ]
                        }]
                    }, {
                        "dropdown": "API Reference",
                        "groups": [{"group": "Chat", "openapi": "en/openapi_chat.json"}]
                    }]
                }]
            }]
        }
    }"#;

    #[test]
    fn test_parse_versions() {
        let doc: NavDocument = serde_json::from_str(DOC).unwrap();
        let languages: Vec<_> = doc.languages().map(|l| l.language.as_str()).collect();
        assert_eq!(languages, vec!["en"]);
        let dropdowns = &doc.navigation.versions[0].languages[0].dropdowns;
        assert_eq!(dropdowns.len(), 2);
        assert!(dropdowns[1].groups.as_ref().unwrap()[0].openapi.is_some());
    }

    #[test]
    fn test_first_page_depth_first() {
        let doc: NavDocument = serde_json::from_str(DOC).unwrap();
        let dropdown = &doc.navigation.versions[0].languages[0].dropdowns[0];
        let section = dropdown.sections().next().unwrap();
        assert_eq!(section.first_page(), Some("en/a/b/c"));
        assert_eq!(section.dir(), Some("en/a/b"));
    }

    #[test]
    fn test_sections_prefer_pages_over_groups() {
        let dropdown: Dropdown = serde_json::from_str(
            r#"{
              "dropdown": "Mixed",
              "pages": [{"group": "From Pages", "pages": []}],
              "groups": [{"group": "From Groups", "pages": []}]
            }"#,
        )
        .unwrap();
        let names: Vec<_> = dropdown.sections().map(|g| g.group.as_str()).collect();
        assert_eq!(names, vec!["From Pages"]);

        let dropdown: Dropdown =
            serde_json::from_str(r#"{"dropdown": "Only", "groups": [{"group": "G", "pages": []}]}"#)
                .unwrap();
        assert_eq!(dropdown.sections().count(), 1);
    }

    #[test]
    fn test_unversioned_languages() {
        let doc: NavDocument =
            serde_json::from_str(r#"{"navigation": {"languages": [{"language": "zh"}]}}"#).unwrap();
        assert_eq!(doc.languages().count(), 1);
    }

    #[test]
    fn test_group_without_pages() {
        let group: Group = serde_json::from_str(r#"{"group": "Empty"}"#).unwrap();
        assert_eq!(group.first_page(), None);
    }

    #[test]
    fn test_path_helpers() {
        assert_eq!(last_segment("en/a/intro"), "intro");
        assert_eq!(last_segment("intro"), "intro");
        assert_eq!(parent_dir("en/a/intro"), "en/a");
        assert_eq!(parent_dir("intro"), "");
    }

    #[test]
    fn test_from_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("docs.json");
        assert!(matches!(
            NavDocument::from_path(&missing),
            Err(NavError::Read { .. })
        ));

        std::fs::write(&missing, "{not json").unwrap();
        assert!(matches!(
            NavDocument::from_path(&missing),
            Err(NavError::Parse { .. })
        ));
    }
}
