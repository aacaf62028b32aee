//! Component tag parsing.
//!
//! Parses JSX-style tags: `<Name attr="str" other='str' expr={value} flag>`,
//! `</Name>` and `<Name ... />`. Attributes may span several lines.

/// Attribute value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrValue {
    /// Quoted string: `title="Setup"` or `title='Setup'`.
    Str(String),
    /// Expression between braces, without the braces: `cols={2}`.
    Expr(String),
    /// Bare attribute: `required`.
    Flag,
}

/// Parsed attributes of a component tag, in source order.
///
/// # Example
///
/// ```
/// use folio_renderer::ComponentArgs;
///
/// let args = ComponentArgs::parse(r#"title="Setup" cols={2} required"#).unwrap();
/// assert_eq!(args.get("title"), Some("Setup"));
/// assert_eq!(args.get("cols"), Some("2"));
/// assert!(args.flag("required"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentArgs {
    attrs: Vec<(String, AttrValue)>,
}

impl ComponentArgs {
    /// Parse an attribute list (the text between the tag name and `>`).
    ///
    /// Returns `None` on malformed input (unterminated quotes or braces).
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let mut args = Self::default();
        let mut rest = input.trim_start();
        while !rest.is_empty() {
            let (attr, remaining) = parse_attr(rest)?;
            if let Some((name, value)) = attr {
                args.attrs.push((name, value));
            }
            rest = remaining.trim_start();
        }
        Some(args)
    }

    /// Raw attribute value.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Attribute as text.
    ///
    /// Strings are returned as written; expressions holding a single string
    /// literal (`{"x"}`) are unquoted, other expressions are returned as
    /// written. Flags have no text.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        match self.value(key)? {
            AttrValue::Str(s) => Some(s),
            AttrValue::Expr(e) => Some(unquote(e.trim())),
            AttrValue::Flag => None,
        }
    }

    /// Attribute as a boolean: bare flags, `{true}` and `"true"` are true.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        match self.value(key) {
            Some(AttrValue::Flag) => true,
            Some(AttrValue::Expr(e)) => e.trim() == "true",
            Some(AttrValue::Str(s)) => s == "true",
            None => false,
        }
    }

    /// Whether no attributes were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

fn unquote(expr: &str) -> &str {
    for quote in ['"', '\'', '`'] {
        if let Some(inner) = expr
            .strip_prefix(quote)
            .and_then(|s| s.strip_suffix(quote))
            && !inner.contains(quote)
        {
            return inner;
        }
    }
    expr
}

/// Parse one attribute; spread attributes (`{...props}`) yield `None`.
fn parse_attr(input: &str) -> Option<(Option<(String, AttrValue)>, &str)> {
    if input.starts_with('{') {
        let end = scan_braces(input)?;
        return Some((None, &input[end..]));
    }

    let name_end = input
        .find(|c: char| c.is_whitespace() || matches!(c, '=' | '>' | '/' | '{' | '"' | '\''))
        .unwrap_or(input.len());
    if name_end == 0 {
        return None;
    }
    let name = input[..name_end].to_owned();
    let after_name = input[name_end..].trim_start();

    let Some(value_part) = after_name.strip_prefix('=') else {
        return Some((Some((name, AttrValue::Flag)), &input[name_end..]));
    };
    let value_part = value_part.trim_start();

    match value_part.chars().next()? {
        quote @ ('"' | '\'') => {
            let body = &value_part[1..];
            let end = body.find(quote)?;
            Some((
                Some((name, AttrValue::Str(body[..end].to_owned()))),
                &body[end + 1..],
            ))
        }
        '{' => {
            let end = scan_braces(value_part)?;
            let expr = value_part[1..end - 1].to_owned();
            Some((Some((name, AttrValue::Expr(expr))), &value_part[end..]))
        }
        _ => None,
    }
}

/// Length of a balanced `{...}` group at the start of `input`, honouring
/// string literals inside.
pub(crate) fn scan_braces(input: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in input.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Tag form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TagKind {
    /// `<Name ...>`
    Open,
    /// `</Name>`
    Close,
    /// `<Name ... />`
    SelfClosing,
}

/// A parsed component tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ParsedTag {
    pub name: String,
    pub kind: TagKind,
    pub args: ComponentArgs,
}

/// Parse a tag at the start of `input`, returning it and its byte length.
pub(crate) fn parse_tag(input: &str) -> Option<(ParsedTag, usize)> {
    let mut rest = input.strip_prefix('<')?;
    let closing = rest.starts_with('/');
    if closing {
        rest = &rest[1..];
    }

    if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let name_end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '.' || c == '_'))
        .unwrap_or(rest.len());
    let name = rest[..name_end].to_owned();
    rest = &rest[name_end..];

    if closing {
        let after = rest.trim_start();
        let after = after.strip_prefix('>')?;
        let len = input.len() - after.len();
        return Some((
            ParsedTag {
                name,
                kind: TagKind::Close,
                args: ComponentArgs::default(),
            },
            len,
        ));
    }

    // Attribute list must be separated from the name.
    if !rest.starts_with(|c: char| c.is_whitespace() || c == '>' || c == '/') {
        return None;
    }

    let mut args = ComponentArgs::default();
    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix("/>") {
            let len = input.len() - after.len();
            return Some((
                ParsedTag {
                    name,
                    kind: TagKind::SelfClosing,
                    args,
                },
                len,
            ));
        }
        if let Some(after) = rest.strip_prefix('>') {
            let len = input.len() - after.len();
            return Some((
                ParsedTag {
                    name,
                    kind: TagKind::Open,
                    args,
                },
                len,
            ));
        }
        if rest.is_empty() {
            return None;
        }
        let (attr, remaining) = parse_attr(rest)?;
        if let Some(attr) = attr {
            args.attrs.push(attr);
        }
        rest = remaining;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_args() {
        let args = ComponentArgs::parse(r#"title='Hello' href="/a" cols={2} required"#).unwrap();
        assert_eq!(args.get("title"), Some("Hello"));
        assert_eq!(args.get("href"), Some("/a"));
        assert_eq!(args.value("cols"), Some(&AttrValue::Expr("2".to_owned())));
        assert!(args.flag("required"));
        assert!(!args.flag("title"));
        assert_eq!(args.get("missing"), None);
    }

    #[test]
    fn test_expr_string_literal_unquoted() {
        let args = ComponentArgs::parse(r#"title={"Quoted"} ok={true}"#).unwrap();
        assert_eq!(args.get("title"), Some("Quoted"));
        assert!(args.flag("ok"));
    }

    #[test]
    fn test_nested_braces_and_strings() {
        let args = ComponentArgs::parse(r#"operations={[{"path":"/a}","method":"post"}]}"#).unwrap();
        assert_eq!(
            args.get("operations"),
            Some(r#"[{"path":"/a}","method":"post"}]"#)
        );
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(ComponentArgs::parse(r#"title="oops"#).is_none());
    }

    #[test]
    fn test_parse_open_tag() {
        let (tag, len) = parse_tag(r#"<Tab title="One">rest"#).unwrap();
        assert_eq!(tag.name, "Tab");
        assert_eq!(tag.kind, TagKind::Open);
        assert_eq!(tag.args.get("title"), Some("One"));
        assert_eq!(len, 17);
    }

    #[test]
    fn test_parse_close_tag() {
        let (tag, len) = parse_tag("</Tabs >\n").unwrap();
        assert_eq!(tag.name, "Tabs");
        assert_eq!(tag.kind, TagKind::Close);
        assert_eq!(len, 8);
    }

    #[test]
    fn test_parse_self_closing_multiline() {
        let input = "<Card\n  title=\"Docs\"\n  icon=\"book\"\n/>\nafter";
        let (tag, len) = parse_tag(input).unwrap();
        assert_eq!(tag.kind, TagKind::SelfClosing);
        assert_eq!(tag.args.get("icon"), Some("book"));
        assert_eq!(&input[len..], "\nafter");
    }

    #[test]
    fn test_spread_ignored() {
        let (tag, _) = parse_tag("<Card {...props} title=\"x\" />").unwrap();
        assert_eq!(tag.args.get("title"), Some("x"));
    }

    #[test]
    fn test_not_a_tag() {
        assert!(parse_tag("< Note>").is_none());
        assert!(parse_tag("<3 apples").is_none());
        assert!(parse_tag("<Note").is_none());
        assert!(parse_tag("<Note-x>").is_none());
    }
}
