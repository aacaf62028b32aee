//! MDX page for one operation.

use std::fmt::Write;

use folio_renderer::{Frontmatter, OpenApiRef};
use serde_json::Value;

use crate::document::{ApiDocument, Operation, ref_pointer};

/// Nesting limit for object fields.
const MAX_FIELD_DEPTH: usize = 4;

/// Parameter locations listed on the page.
const LOCATIONS: [&str; 4] = ["path", "query", "header", "body"];

/// File stem: kebab-cased `operationId`, else `<method>-<path slug>`.
pub(crate) fn file_stem(op: &Operation<'_>) -> String {
    let stem = match op.operation_id() {
        Some(id) => kebab_case(id),
        None => kebab_case(&format!("{} {}", op.method, op.route)),
    };
    if stem.is_empty() {
        op.method.to_owned()
    } else {
        stem
    }
}

/// `createChatMessage`, `get_user info` and `getHTTPResponse` become
/// `create-chat-message`, `get-user-info` and `get-http-response`.
pub(crate) fn kebab_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);
    let separate = |out: &mut String| {
        if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    };

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            separate(&mut out);
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower)
            {
                separate(&mut out);
            }
        }
        out.extend(c.to_lowercase());
    }

    out.trim_end_matches('-').to_owned()
}

/// Escape text so MDX does not read it as an expression or a tag.
pub(crate) fn escape_mdx(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '<' => out.push_str("&lt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Single-line attribute text without double quotes.
fn attr_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('"', "'")
}

/// Render the page for `op`.
///
/// # Errors
///
/// Returns an error if the frontmatter cannot be serialized.
pub(crate) fn render_page(
    doc: &ApiDocument,
    op: &Operation<'_>,
    document: &str,
    include_description: bool,
) -> Result<String, serde_yaml::Error> {
    let frontmatter = Frontmatter {
        title: Some(op.title()),
        description: op.description().map(ToOwned::to_owned),
        full: true,
        openapi: Some(OpenApiRef {
            method: op.method.to_uppercase(),
            route: op.route.to_owned(),
        }),
        ..Frontmatter::default()
    };
    let mut page = format!("---\n{}---\n", serde_yaml::to_string(&frontmatter)?);

    if include_description && let Some(description) = op.description() {
        let _ = write!(page, "\n{}\n", escape_mdx(description));
    }

    let operations = serde_json::json!([{ "path": op.route, "method": op.method }]);
    let _ = write!(
        page,
        "\n<APIPage document=\"{}\" operations={{{operations}}} />\n",
        attr_text(document)
    );

    let params: Vec<&Value> = op
        .parameters(doc)
        .into_iter()
        .filter(|p| p.get("in").and_then(Value::as_str).is_some_and(|l| LOCATIONS.contains(&l)))
        .collect();
    if !params.is_empty() {
        page.push_str("\n## Parameters\n\n");
        for param in params {
            write_param(&mut page, doc, param);
        }
    }

    if let Some(schema) = op.request_schema(doc) {
        let mut fields = String::new();
        write_fields(&mut fields, doc, schema, FieldKind::Body, 0, &mut Vec::new());
        if !fields.is_empty() {
            page.push_str("\n## Request Body\n\n");
            page.push_str(&fields);
        }
    }

    if let Some((status, schema)) = op.response(doc) {
        let mut fields = String::new();
        write_fields(&mut fields, doc, schema, FieldKind::Response, 0, &mut Vec::new());
        if !fields.is_empty() {
            let _ = write!(page, "\n## Response `{status}`\n\n");
            page.push_str(&fields);
        }
    }

    Ok(page)
}

#[derive(Clone, Copy)]
enum FieldKind {
    Body,
    Response,
}

fn write_param(out: &mut String, doc: &ApiDocument, param: &Value) {
    let name = param.get("name").and_then(Value::as_str).unwrap_or_default();
    let location = param.get("in").and_then(Value::as_str).unwrap_or("query");
    let schema = param.get("schema").map(|s| doc.resolve(s));
    let required = location == "path" || param.get("required").and_then(Value::as_bool) == Some(true);

    let mut head = format!(r#"<ParamField {location}="{}""#, attr_text(name));
    if let Some(schema) = schema {
        let _ = write!(head, r#" type="{}""#, attr_text(&type_name(doc, schema, 0)));
    }
    if required {
        head.push_str(" required");
    }
    if let Some(default) = schema.and_then(|s| s.get("default")) {
        let _ = write!(head, r#" default="{}""#, attr_text(&value_text(default)));
    }

    let description = param
        .get("description")
        .or_else(|| schema.and_then(|s| s.get("description")))
        .and_then(Value::as_str);
    write_element(out, 0, &head, "ParamField", description, "");
}

/// Write one field per property of an object schema, recursing into nested
/// objects and arrays of objects.
fn write_fields<'a>(
    out: &mut String,
    doc: &'a ApiDocument,
    schema: &'a Value,
    kind: FieldKind,
    depth: usize,
    seen: &mut Vec<&'a str>,
) {
    let mut properties = Vec::new();
    let mut required = Vec::new();
    collect_properties(doc, schema, &mut properties, &mut required, 0);

    for (name, raw) in properties {
        let prop = doc.resolve(raw);
        let is_required = required.contains(&name);
        let ty = type_name(doc, prop, 0);

        let mut head = match kind {
            FieldKind::Body => format!(r#"<ParamField body="{}" type="{}""#, attr_text(name), attr_text(&ty)),
            FieldKind::Response => {
                format!(r#"<ResponseField name="{}" type="{}""#, attr_text(name), attr_text(&ty))
            }
        };
        if is_required {
            head.push_str(" required");
        }
        if let Some(default) = prop.get("default") {
            let _ = write!(head, r#" default="{}""#, attr_text(&value_text(default)));
        }

        let mut children = String::new();
        let nested = nested_object(doc, raw);
        if let Some((pointer, object)) = nested
            && depth + 1 < MAX_FIELD_DEPTH
            && !pointer.is_some_and(|p| seen.contains(&p))
        {
            if let Some(p) = pointer {
                seen.push(p);
            }
            write_fields(&mut children, doc, object, kind, depth + 1, seen);
            if pointer.is_some() {
                seen.pop();
            }
        }

        let tag = match kind {
            FieldKind::Body => "ParamField",
            FieldKind::Response => "ResponseField",
        };
        let description = prop.get("description").and_then(Value::as_str);
        write_element(out, depth, &head, tag, description, &children);
    }
}

/// Properties of an object schema, merging `allOf` members.
fn collect_properties<'a>(
    doc: &'a ApiDocument,
    schema: &'a Value,
    properties: &mut Vec<(&'a str, &'a Value)>,
    required: &mut Vec<&'a str>,
    depth: usize,
) {
    let schema = doc.resolve(schema);
    if depth >= MAX_FIELD_DEPTH {
        return;
    }
    for member in schema.get("allOf").and_then(Value::as_array).into_iter().flatten() {
        collect_properties(doc, member, properties, required, depth + 1);
    }
    if let Some(props) = schema.get("properties").and_then(Value::as_object) {
        for (name, prop) in props {
            if !properties.iter().any(|(n, _)| n == name) {
                properties.push((name.as_str(), prop));
            }
        }
    }
    required.extend(
        schema
            .get("required")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str),
    );
}

/// Object schema nested in a property (directly or as array items), with
/// the `$ref` pointer it came from.
fn nested_object<'a>(doc: &'a ApiDocument, raw: &'a Value) -> Option<(Option<&'a str>, &'a Value)> {
    let prop = doc.resolve(raw);
    let (pointer, object) = match prop.get("items") {
        Some(items) if prop.get("type").and_then(Value::as_str) == Some("array") => {
            (ref_pointer(items), doc.resolve(items))
        }
        _ => (ref_pointer(raw), prop),
    };
    let has_fields = object.get("properties").is_some() || object.get("allOf").is_some();
    has_fields.then_some((pointer, object))
}

fn write_element(
    out: &mut String,
    depth: usize,
    head: &str,
    tag: &str,
    description: Option<&str>,
    children: &str,
) {
    let pad = "  ".repeat(depth);
    let description = description.map(str::trim).filter(|d| !d.is_empty());
    if description.is_none() && children.is_empty() {
        let _ = writeln!(out, "{pad}{head} />\n");
        return;
    }

    let _ = writeln!(out, "{pad}{head}>");
    if let Some(description) = description {
        for line in escape_mdx(description).lines() {
            if line.trim().is_empty() {
                out.push('\n');
            } else {
                let _ = writeln!(out, "{pad}  {line}");
            }
        }
    }
    if !children.is_empty() {
        out.push('\n');
        out.push_str(children);
    }
    let _ = writeln!(out, "{pad}</{tag}>\n");
}

/// Display type of a schema: `string`, `array<object>`, `string | null`.
fn type_name(doc: &ApiDocument, schema: &Value, depth: usize) -> String {
    let schema = doc.resolve(schema);
    if depth >= MAX_FIELD_DEPTH {
        return "any".to_owned();
    }
    if let Some(variants) = schema
        .get("oneOf")
        .or_else(|| schema.get("anyOf"))
        .and_then(Value::as_array)
    {
        return variants
            .iter()
            .map(|v| type_name(doc, v, depth + 1))
            .collect::<Vec<_>>()
            .join(" | ");
    }
    match schema.get("type") {
        Some(Value::String(ty)) if ty == "array" => {
            let items = schema
                .get("items")
                .map_or_else(|| "any".to_owned(), |items| type_name(doc, items, depth + 1));
            format!("array<{items}>")
        }
        Some(Value::String(ty)) => ty.clone(),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" | "),
        _ if schema.get("properties").is_some() || schema.get("allOf").is_some() => {
            "object".to_owned()
        }
        _ => "any".to_owned(),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const DOC: &str = r##"{
        "paths": {
            "/chat-messages/{task_id}/stop": {
                "post": {
                    "summary": "Stop <Generate>",
                    "description": "Stops a {streaming} task.",
                    "parameters": [
                        {"name": "task_id", "in": "path", "schema": {"type": "string"}, "description": "Task ID"},
                        {"name": "session", "in": "cookie"}
                    ],
                    "requestBody": {
                        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Stop"}}}
                    },
                    "responses": {
                        "200": {"content": {"application/json": {"schema": {
                            "type": "object",
                            "properties": {
                                "result": {"type": "string", "description": "Always \"success\""},
                                "items": {"type": "array", "items": {"$ref": "#/components/schemas/Node"}}
                            }
                        }}}}
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Stop": {
                    "type": "object",
                    "required": ["user"],
                    "properties": {
                        "user": {"type": "string", "description": "User id"},
                        "mode": {"type": ["string", "null"], "default": "fast"}
                    }
                },
                "Node": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "integer"},
                        "child": {"$ref": "#/components/schemas/Node"}
                    }
                }
            }
        }
    }"##;

    fn page(include_description: bool) -> String {
        let doc = ApiDocument::parse(DOC).unwrap();
        let op = doc.operations()[0];
        render_page(&doc, &op, "en/openapi_chat.json", include_description).unwrap()
    }

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("createChatMessage"), "create-chat-message");
        assert_eq!(kebab_case("get_user info"), "get-user-info");
        assert_eq!(kebab_case("getHTTPResponse"), "get-http-response");
        assert_eq!(kebab_case("post /chat-messages/{task_id}/stop"), "post-chat-messages-task-id-stop");
        assert_eq!(kebab_case("v1Files2Upload"), "v1-files2-upload");
    }

    #[test]
    fn test_escape_mdx() {
        assert_eq!(escape_mdx("Use {x} <b>"), "Use \\{x\\} &lt;b>");
    }

    #[test]
    fn test_frontmatter_round_trips() {
        let page = page(true);
        let (frontmatter, body) = folio_renderer::split_frontmatter(&page).unwrap();
        assert_eq!(frontmatter.title.as_deref(), Some("Stop <Generate>"));
        assert_eq!(
            frontmatter.description.as_deref(),
            Some("Stops a {streaming} task.")
        );
        assert!(frontmatter.full);
        let openapi = frontmatter.openapi.unwrap();
        assert_eq!(openapi.method, "POST");
        assert_eq!(openapi.route, "/chat-messages/{task_id}/stop");
        assert!(body.contains("Stops a \\{streaming\\} task."));
    }

    #[test]
    fn test_description_optional() {
        assert!(!page(false).contains("Stops a \\{streaming"));
    }

    #[test]
    fn test_api_page_tag() {
        assert!(page(true).contains(
            r#"<APIPage document="en/openapi_chat.json" operations={[{"path":"/chat-messages/{task_id}/stop","method":"post"}]} />"#
        ));
    }

    #[test]
    fn test_parameters_section() {
        let page = page(true);
        assert!(page.contains(
            "## Parameters\n\n<ParamField path=\"task_id\" type=\"string\" required>\n  Task ID\n</ParamField>\n"
        ));
        assert!(!page.contains("session"));
    }

    #[test]
    fn test_request_body_fields() {
        let page = page(true);
        assert!(page.contains(
            "<ParamField body=\"user\" type=\"string\" required>\n  User id\n</ParamField>"
        ));
        assert!(page.contains(
            "<ParamField body=\"mode\" type=\"string | null\" default=\"fast\" />"
        ));
    }

    #[test]
    fn test_response_fields_nested_without_cycles() {
        let page = page(true);
        assert!(page.contains("## Response `200`"));
        assert!(page.contains(
            "<ResponseField name=\"result\" type=\"string\">\n  Always \"success\"\n</ResponseField>"
        ));
        assert!(page.contains("<ResponseField name=\"items\" type=\"array<object>\">"));
        assert!(page.contains("  <ResponseField name=\"id\" type=\"integer\" />"));
        // The self-referencing child is listed once but not expanded again.
        assert_eq!(page.matches("name=\"child\"").count(), 1);
    }

    #[test]
    fn test_page_renders() {
        let rendered = folio_renderer::MdxRenderer::new(folio_renderer::RendererOptions::default())
            .render_document(&page(true))
            .unwrap();
        assert!(rendered.warnings.is_empty(), "{:?}", rendered.warnings);
        assert!(rendered.html.contains("api-method-post"));
        assert!(rendered.html.contains("field-name\">task_id"));
    }
}
