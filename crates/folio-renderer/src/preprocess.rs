//! Component tag preprocessing.
//!
//! Replaces registered component tags with `<!--folio:N-->` markers before
//! the markdown parser runs. A tag that starts a line (its attributes may
//! span several lines) is isolated onto its own line between blank lines so
//! it becomes an HTML block; any other tag becomes an inline marker. A
//! closing tag that ends a block-level component in the middle of a line is
//! isolated as well.
//!
//! Content nested in block components is re-indented relative to the
//! component's first content line, so indentation used for readability in
//! JSX does not turn into indented code blocks.
//!
//! Unknown capitalised tags are dropped (their children are kept) with a
//! warning. Fenced code blocks and inline code spans are left untouched.

use crate::component::{ComponentRegistry, ParsedTag, TagKind, parse_tag};
use crate::mdx::FenceTracker;

/// Marker prefix recognized by the renderer.
pub(crate) const MARKER_PREFIX: &str = "<!--folio:";
/// Marker suffix.
pub(crate) const MARKER_SUFFIX: &str = "-->";

/// A component tag replaced by a marker.
#[derive(Debug)]
pub(crate) struct Marker {
    pub tag: ParsedTag,
}

/// Preprocessing output.
#[derive(Debug, Default)]
pub(crate) struct Preprocessed {
    pub text: String,
    pub markers: Vec<Marker>,
    pub warnings: Vec<String>,
}

/// Parse a marker comment back into its index.
pub(crate) fn marker_index(html: &str) -> Option<usize> {
    html.trim()
        .strip_prefix(MARKER_PREFIX)?
        .strip_suffix(MARKER_SUFFIX)?
        .parse()
        .ok()
}

/// Replace registered component tags in `input` with markers.
pub(crate) fn preprocess(input: &str, registry: &ComponentRegistry) -> Preprocessed {
    Preprocessor {
        registry,
        out: Preprocessed::default(),
        frames: Vec::new(),
        fence: FenceTracker::default(),
    }
    .run(input)
}

/// Open block-level component.
#[derive(Debug)]
struct BlockFrame {
    name: String,
    /// Output indent of the opening tag.
    base: usize,
    /// Source indent of the first content line.
    content_indent: Option<usize>,
}

struct Preprocessor<'r> {
    registry: &'r ComponentRegistry,
    out: Preprocessed,
    frames: Vec<BlockFrame>,
    fence: FenceTracker,
}

/// How scanning a line ended.
enum LineEnd {
    /// The whole line was consumed.
    Done,
    /// A block marker was emitted mid-line; continue at this input offset.
    Continue(usize),
}

impl Preprocessor<'_> {
    fn run(mut self, input: &str) -> Preprocessed {
        let mut pos = 0;
        let mut carry: Option<usize> = None;

        while pos < input.len() {
            let line_end = input[pos..].find('\n').map_or(input.len(), |i| pos + i);
            let next_line = (line_end + 1).min(input.len());
            let line = &input[pos..line_end];

            let (indent, content) = match carry.take() {
                Some(indent) => (indent, line.trim_start()),
                None => {
                    if line.trim().is_empty() {
                        self.out.text.push('\n');
                        pos = next_line;
                        continue;
                    }
                    let (width, ws_len) = indent_of(line);
                    (self.map_indent(width), &line[ws_len..])
                }
            };
            let content = content.trim_end_matches('\r');

            if content.is_empty() {
                pos = next_line;
                continue;
            }

            if self.fence.observe(content) {
                self.push_line(indent, content);
                pos = next_line;
                continue;
            }

            let content_start = line_end - line.trim_start().len();
            let resume = if content.starts_with('<') {
                self.line_start_tag(input, content_start, indent)
            } else {
                None
            };
            if let Some(after) = resume {
                pos = resume_at(input, after, indent, &mut carry);
                continue;
            }

            match self.scan_inline(content, indent) {
                LineEnd::Done => pos = next_line,
                LineEnd::Continue(offset) => {
                    pos = resume_at(input, content_start + offset, indent, &mut carry);
                }
            }
        }

        self.out
    }

    /// Handle a registered tag at the start of a line; returns the input
    /// offset right after the tag.
    fn line_start_tag(&mut self, input: &str, start: usize, indent: usize) -> Option<usize> {
        let Some((tag, len)) = parse_tag(&input[start..]) else {
            if input[start + 1..].starts_with(|c: char| c.is_ascii_uppercase()) {
                self.out
                    .warnings
                    .push(format!("Malformed component tag: {}", first_line(&input[start..])));
            }
            return None;
        };
        if !self.registry.contains(&tag.name) {
            return None;
        }
        self.block_marker(tag, indent);
        Some(start + len)
    }

    /// Scan a line for inline component tags, writing it to the output.
    fn scan_inline(&mut self, content: &str, indent: usize) -> LineEnd {
        let mut buf = String::with_capacity(content.len());
        let mut i = 0;

        while i < content.len() {
            let rest = &content[i..];

            if rest.starts_with('`') {
                let len = code_span_len(rest);
                buf.push_str(&rest[..len]);
                i += len;
                continue;
            }

            if rest.starts_with('<')
                && let Some((tag, len)) = parse_tag(rest)
            {
                if self.registry.contains(&tag.name) {
                    let closes_block = tag.kind == TagKind::Close
                        && self.frames.last().is_some_and(|f| f.name == tag.name);
                    if closes_block {
                        if !buf.trim().is_empty() {
                            self.push_line(indent, buf.trim_end());
                        }
                        self.block_marker(tag, indent);
                        return LineEnd::Continue(i + len);
                    }
                    let n = self.out.markers.len();
                    self.out.markers.push(Marker { tag });
                    buf.push_str(&format!("{MARKER_PREFIX}{n}{MARKER_SUFFIX}"));
                    i += len;
                    continue;
                }
                if tag.name.starts_with(|c: char| c.is_ascii_uppercase()) {
                    if tag.kind != TagKind::Close {
                        self.out
                            .warnings
                            .push(format!("Unknown component <{}>", tag.name));
                    }
                    i += len;
                    continue;
                }
            }

            let ch = rest.chars().next().unwrap_or_default();
            buf.push(ch);
            i += ch.len_utf8();
        }

        self.push_line(indent, &buf);
        LineEnd::Done
    }

    /// Emit a marker on its own line, surrounded by blank lines.
    fn block_marker(&mut self, tag: ParsedTag, indent: usize) {
        if !self.out.text.is_empty() && !self.out.text.ends_with("\n\n") {
            if !self.out.text.ends_with('\n') {
                self.out.text.push('\n');
            }
            self.out.text.push('\n');
        }

        match tag.kind {
            TagKind::Open => self.frames.push(BlockFrame {
                name: tag.name.clone(),
                base: indent,
                content_indent: None,
            }),
            TagKind::Close => {
                if let Some(idx) = self.frames.iter().rposition(|f| f.name == tag.name) {
                    self.frames.truncate(idx);
                }
            }
            TagKind::SelfClosing => {}
        }

        let n = self.out.markers.len();
        self.out.markers.push(Marker { tag });
        self.push_line(indent, &format!("{MARKER_PREFIX}{n}{MARKER_SUFFIX}"));
        self.out.text.push('\n');
    }

    /// Map a source indent to an output indent inside the innermost block frame.
    fn map_indent(&mut self, width: usize) -> usize {
        match self.frames.last_mut() {
            Some(frame) => {
                let content_indent = *frame.content_indent.get_or_insert(width);
                frame.base + width.saturating_sub(content_indent)
            }
            None => width,
        }
    }

    fn push_line(&mut self, indent: usize, text: &str) {
        self.out.text.extend(std::iter::repeat_n(' ', indent));
        self.out.text.push_str(text);
        self.out.text.push('\n');
    }
}

/// Position to continue from after a block marker: the next line if the
/// rest of the current one is blank, otherwise the rest of the line with
/// the marker's indent.
fn resume_at(input: &str, after: usize, indent: usize, carry: &mut Option<usize>) -> usize {
    let rest_end = input[after..].find('\n').map_or(input.len(), |i| after + i);
    if input[after..rest_end].trim().is_empty() {
        (rest_end + 1).min(input.len())
    } else {
        *carry = Some(indent);
        after
    }
}

/// Indent width (tabs count as 4) and byte length of leading whitespace.
fn indent_of(line: &str) -> (usize, usize) {
    let mut width = 0;
    let mut len = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += 4 - width % 4,
            _ => break,
        }
        len += 1;
    }
    (width, len)
}

/// Length of a code span at the start of `s` (or of the bare backtick run).
fn code_span_len(s: &str) -> usize {
    let run = s.chars().take_while(|&c| c == '`').count();
    let delim = &s[..run];
    let mut search = run;
    while let Some(found) = s[search..].find(delim) {
        let start = search + found;
        let close_run = s[start..].chars().take_while(|&c| c == '`').count();
        if close_run == run {
            return start + run;
        }
        search = start + close_run;
    }
    run
}

fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or_default()
}
