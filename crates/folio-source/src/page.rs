//! Indexed page.

use folio_renderer::{Frontmatter, OpenApiRef};
use serde::Serialize;

/// A content page keyed by locale and slugs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Locale code.
    pub locale: String,
    /// URL segments below the locale.
    pub slugs: Vec<String>,
    /// URL path (`/<locale>/<slug…>`).
    pub url: String,
    /// Storage path relative to the content root.
    pub path: String,
    /// Title: frontmatter title, else the title-cased file name.
    pub title: String,
    /// Frontmatter description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sidebar icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Render without the table of contents column.
    pub full: bool,
    /// API operation, for generated API reference pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openapi: Option<OpenApiRef>,
}

impl Page {
    pub(crate) fn new(
        locale: &str,
        slugs: Vec<String>,
        path: &str,
        frontmatter: Frontmatter,
        fallback_title: String,
    ) -> Self {
        Self {
            url: page_url(locale, &slugs),
            locale: locale.to_owned(),
            slugs,
            path: path.to_owned(),
            title: frontmatter.title.unwrap_or(fallback_title),
            description: frontmatter.description,
            icon: frontmatter.icon,
            full: frontmatter.full,
            openapi: frontmatter.openapi,
        }
    }

    /// Open Graph image for the page.
    #[must_use]
    pub fn image(&self) -> PageImage {
        let mut segments = self.slugs.clone();
        segments.push("image.png".to_owned());
        PageImage {
            url: format!("/og/{}", segments.join("/")),
            segments,
        }
    }
}

/// `/<locale>/<slug…>`; the locale root is `/<locale>`.
pub(crate) fn page_url(locale: &str, slugs: &[String]) -> String {
    if slugs.is_empty() {
        format!("/{locale}")
    } else {
        format!("/{locale}/{}", slugs.join("/"))
    }
}

/// Generated social image location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageImage {
    /// Route segments (`[...slugs, "image.png"]`).
    pub segments: Vec<String>,
    /// Image URL (`/og/<segments>`).
    pub url: String,
}

/// Static route parameters of a page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageParams {
    /// Locale code.
    pub lang: String,
    /// URL segments below the locale.
    pub slug: Vec<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn page(slugs: &[&str]) -> Page {
        Page::new(
            "en",
            slugs.iter().map(|s| (*s).to_owned()).collect(),
            "en/a/b.mdx",
            Frontmatter::default(),
            "B".to_owned(),
        )
    }

    #[test]
    fn test_url() {
        assert_eq!(page(&["a", "b"]).url, "/en/a/b");
        assert_eq!(page(&[]).url, "/en");
    }

    #[test]
    fn test_image() {
        let image = page(&["a", "b"]).image();
        assert_eq!(image.segments, vec!["a", "b", "image.png"]);
        assert_eq!(image.url, "/og/a/b/image.png");
    }

    #[test]
    fn test_fallback_title() {
        assert_eq!(page(&["a"]).title, "B");
    }
}
