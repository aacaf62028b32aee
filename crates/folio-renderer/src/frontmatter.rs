//! YAML frontmatter parsing.

use serde::{Deserialize, Serialize};

/// Page frontmatter.
///
/// Unknown keys are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Page title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Page description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sidebar icon name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Render without the table of contents column.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub full: bool,
    /// Operation rendered by an API reference page.
    #[serde(default, rename = "_openapi", skip_serializing_if = "Option::is_none")]
    pub openapi: Option<OpenApiRef>,
}

/// API operation reference carried by generated API pages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenApiRef {
    /// Upper-case HTTP method.
    #[serde(default)]
    pub method: String,
    /// Path template (e.g. `/chat-messages/{task_id}/stop`).
    #[serde(default)]
    pub route: String,
}

/// Errors emitted while extracting frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    /// Opening `---` without a closing one.
    #[error("Unterminated YAML frontmatter block: expected closing '---'")]
    Unterminated,
    /// YAML failed to parse or has the wrong shape.
    #[error("Frontmatter parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Split a document into its frontmatter and body.
///
/// Documents without a leading `---` fence have default frontmatter and the
/// whole input as body. A UTF-8 BOM and leading blank lines are skipped.
///
/// # Errors
///
/// Returns [`FrontmatterError`] if the block is unterminated or is not a
/// YAML mapping of the expected fields.
pub fn split_frontmatter(input: &str) -> Result<(Frontmatter, &str), FrontmatterError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);

    let mut lines = LineCursor::new(input);
    let Some(first) = lines.by_ref().find(|line| !line.trim().is_empty()) else {
        return Ok((Frontmatter::default(), input));
    };
    if !is_fence(first) {
        return Ok((Frontmatter::default(), input));
    }

    let block_start = lines.pos;
    loop {
        let line_start = lines.pos;
        let Some(line) = lines.next() else {
            return Err(FrontmatterError::Unterminated);
        };
        if is_fence(line) {
            let block = &input[block_start..line_start];
            let body = &input[lines.pos..];
            let frontmatter = if block.trim().is_empty() {
                Frontmatter::default()
            } else {
                serde_yaml::from_str::<Option<Frontmatter>>(block)?.unwrap_or_default()
            };
            return Ok((frontmatter, body));
        }
    }
}

fn is_fence(line: &str) -> bool {
    line.trim_end_matches('\r') == "---"
}

/// Iterates lines while tracking the byte offset of the next line.
struct LineCursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }
}

impl<'a> Iterator for LineCursor<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.input.len() {
            return None;
        }
        let rest = &self.input[self.pos..];
        let (line, advance) = match rest.find('\n') {
            Some(i) => (&rest[..i], i + 1),
            None => (rest, rest.len()),
        };
        self.pos += advance;
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_no_frontmatter() {
        let (fm, body) = split_frontmatter("# Title\n\nBody").unwrap();
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(body, "# Title\n\nBody");
    }

    #[test]
    fn test_basic_frontmatter() {
        let input = "---\ntitle: Introduction\ndescription: Start here\nicon: book\n---\n\n# Body\n";
        let (fm, body) = split_frontmatter(input).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Introduction"));
        assert_eq!(fm.description.as_deref(), Some("Start here"));
        assert_eq!(fm.icon.as_deref(), Some("book"));
        assert!(!fm.full);
        assert_eq!(body, "\n# Body\n");
    }

    #[test]
    fn test_openapi_frontmatter() {
        let input = "---\ntitle: Send Message\nfull: true\n_openapi:\n  method: POST\n  route: /chat-messages\n---\nBody";
        let (fm, body) = split_frontmatter(input).unwrap();
        assert!(fm.full);
        assert_eq!(
            fm.openapi,
            Some(OpenApiRef {
                method: "POST".to_owned(),
                route: "/chat-messages".to_owned(),
            })
        );
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_bom_and_crlf() {
        let input = "\u{feff}---\r\ntitle: 文档\r\n---\r\nBody";
        let (fm, body) = split_frontmatter(input).unwrap();
        assert_eq!(fm.title.as_deref(), Some("文档"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_empty_block() {
        let (fm, body) = split_frontmatter("---\n---\nBody").unwrap();
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let (fm, _) = split_frontmatter("---\ntitle: A\nsidebarTitle: B\n---\n").unwrap();
        assert_eq!(fm.title.as_deref(), Some("A"));
    }

    #[test]
    fn test_unterminated() {
        let err = split_frontmatter("---\ntitle: A\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Unterminated));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = split_frontmatter("---\ntitle: [unclosed\n---\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Parse(_)));
    }

    #[test]
    fn test_serialize_skips_defaults() {
        let fm = Frontmatter {
            title: Some("Stop".to_owned()),
            full: true,
            ..Frontmatter::default()
        };
        assert_eq!(serde_yaml::to_string(&fm).unwrap(), "title: Stop\nfull: true\n");
    }
}
