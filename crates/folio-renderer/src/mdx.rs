//! MDX-only syntax removal.
//!
//! Produces the "processed markdown" of a page body: ESM `import`/`export`
//! statements and `{/* */}` comments are removed, everything else (including
//! component tags) is kept verbatim. Fenced code blocks are never touched.

/// Fenced code block state shared by the line-based passes.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<(char, usize)>,
}

impl FenceTracker {
    /// Feed a line; returns `true` if the line belongs to a fenced block
    /// (including its opening and closing fence lines).
    pub(crate) fn observe(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();
        let fence = ['`', '~'].into_iter().find_map(|c| {
            let len = trimmed.chars().take_while(|&ch| ch == c).count();
            (len >= 3).then_some((c, len))
        });

        match (self.open, fence) {
            (Some((c, len)), Some((fc, flen))) if c == fc && flen >= len => {
                if trimmed[flen..].trim().is_empty() {
                    self.open = None;
                }
                true
            }
            (Some(_), _) => true,
            (None, Some(open)) => {
                self.open = Some(open);
                true
            }
            (None, None) => false,
        }
    }

    /// Whether a fenced block is currently open.
    pub(crate) fn is_open(&self) -> bool {
        self.open.is_some()
    }
}

/// Remove ESM statements and `{/* */}` comments from an MDX body.
///
/// The result is trimmed of leading and trailing blank lines.
#[must_use]
pub fn strip_mdx(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut fence = FenceTracker::default();
    let mut in_comment = false;
    let mut esm: Option<EsmStatement> = None;

    for line in body.lines() {
        if let Some(statement) = esm.as_mut() {
            if statement.feed(line) {
                esm = None;
            }
            continue;
        }

        if !in_comment && fence.observe(line) {
            out.push_str(line);
            out.push('\n');
            continue;
        }

        if !in_comment && (line.starts_with("import ") || line.starts_with("export ")) {
            let mut statement = EsmStatement::default();
            if !statement.feed(line) {
                esm = Some(statement);
            }
            continue;
        }

        let (kept, had_comment) = strip_comments(line, &mut in_comment);
        if had_comment && kept.trim().is_empty() {
            continue;
        }
        out.push_str(&kept);
        out.push('\n');
    }

    out.trim_matches('\n').to_owned()
}

/// Remove `{/* ... */}` spans from a line, carrying open comments across lines.
fn strip_comments(line: &str, in_comment: &mut bool) -> (String, bool) {
    let mut kept = String::new();
    let mut rest = line;
    let mut had_comment = *in_comment;

    loop {
        if *in_comment {
            match rest.find("*/}") {
                Some(end) => {
                    rest = &rest[end + 3..];
                    *in_comment = false;
                }
                None => break,
            }
        } else {
            match rest.find("{/*") {
                Some(start) => {
                    kept.push_str(&rest[..start]);
                    rest = &rest[start + 3..];
                    *in_comment = true;
                    had_comment = true;
                }
                None => {
                    kept.push_str(rest);
                    break;
                }
            }
        }
    }

    (kept, had_comment)
}

/// Multi-line ESM statement being skipped.
#[derive(Debug, Default)]
struct EsmStatement {
    text: String,
    depth: i32,
}

impl EsmStatement {
    /// Feed a line; returns `true` once the statement is complete.
    fn feed(&mut self, line: &str) -> bool {
        for c in line.chars() {
            match c {
                '{' | '(' | '[' => self.depth += 1,
                '}' | ')' | ']' => self.depth -= 1,
                _ => {}
            }
        }
        self.text.push_str(line);
        self.text.push(' ');

        if self.depth > 0 {
            return false;
        }
        let text = self.text.trim_start();
        if let Some(import) = text.strip_prefix("import ") {
            let import = import.trim_start();
            return import.starts_with(['"', '\''])
                || text.contains(" from ")
                || text.trim_end().ends_with(';');
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_removes_imports_and_exports() {
        let body = "import { Foo } from '@/components/foo';\nexport const meta = { a: 1 };\n\n# Title\n\nText";
        assert_eq!(strip_mdx(body), "# Title\n\nText");
    }

    #[test]
    fn test_multiline_import() {
        let body = "import {\n  A,\n  B,\n} from 'x'\n\nBody";
        assert_eq!(strip_mdx(body), "Body");
    }

    #[test]
    fn test_multiline_export() {
        let body = "export const data = {\n  title: 'x',\n};\n\nBody";
        assert_eq!(strip_mdx(body), "Body");
    }

    #[test]
    fn test_removes_comments() {
        let body = "Before {/* hidden */} after\n{/* whole line */}\nNext";
        assert_eq!(strip_mdx(body), "Before  after\nNext");
    }

    #[test]
    fn test_multiline_comment() {
        let body = "One\n{/*\n  spans\n  lines\n*/}\nTwo";
        assert_eq!(strip_mdx(body), "One\nTwo");
    }

    #[test]
    fn test_fenced_code_untouched() {
        let body = "```js\nimport x from 'y';\n{/* keep */}\n```\n";
        assert_eq!(strip_mdx(body), "```js\nimport x from 'y';\n{/* keep */}\n```");
    }

    #[test]
    fn test_components_kept() {
        let body = "<Note>\nHello\n</Note>";
        assert_eq!(strip_mdx(body), body);
    }

    #[test]
    fn test_fence_tracker_requires_matching_close() {
        let mut fence = FenceTracker::default();
        assert!(fence.observe("````md"));
        assert!(fence.observe("```"));
        assert!(fence.is_open());
        assert!(fence.observe("````"));
        assert!(!fence.is_open());
        assert!(!fence.observe("text"));
    }
}
