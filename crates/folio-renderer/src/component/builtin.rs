//! Built-in documentation components.

use std::fmt::Write;

use super::{Component, ComponentArgs, ComponentRegistry, Element};
use crate::util::escape_html;

pub(super) fn register_all(registry: &mut ComponentRegistry) {
    registry.register("Info", Callout::fixed("info"));
    registry.register("Note", Callout::fixed("info"));
    registry.register("Tip", Callout::fixed("info"));
    registry.register("Warning", Callout::fixed("warn"));
    registry.register("Danger", Callout::fixed("error"));
    registry.register("Callout", Callout { kind: None });

    registry.register("CardGroup", Cards);
    registry.register("Cards", Cards);
    registry.register("Card", Card);

    registry.register("Tabs", Tabs { code: false });
    registry.register("CodeGroup", Tabs { code: true });
    registry.register("Tab", Tab);

    registry.register("Steps", Wrapper::div("steps"));
    registry.register("Step", Step);

    registry.register("AccordionGroup", Wrapper::div("accordions"));
    registry.register("Accordions", Wrapper::div("accordions"));
    registry.register("Accordion", Accordion);

    registry.register("Frame", Frame);
    registry.register("Check", Check);
    registry.register("Icon", Icon);
    registry.register("Snippet", Snippet);
    registry.register("CheckList", Wrapper {
        tag: "ul",
        class: "checklist",
    });
    registry.register("CheckListItem", CheckListItem);
    registry.register("ResponseField", ResponseField);
    registry.register("ParamField", ParamField);
    registry.register("APIPage", ApiPage);
    registry.register("img", Image);
}

/// ` key="value"` with the value escaped.
fn attr(key: &str, value: &str) -> String {
    format!(r#" {key}="{}""#, escape_html(value))
}

/// Optional attribute copied from the tag.
fn attr_from(args: &ComponentArgs, key: &str, html_key: &str) -> String {
    args.get(key)
        .map(|value| attr(html_key, value))
        .unwrap_or_default()
}

const CHECK_SVG: &str = r#"<svg class="check-icon" fill="none" viewBox="0 0 24 24" stroke="currentColor"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M5 13l4 4L19 7"/></svg>"#;

/// Admonition box. `Callout` reads its kind from the `type` attribute.
struct Callout {
    kind: Option<&'static str>,
}

impl Callout {
    fn fixed(kind: &'static str) -> Self {
        Self { kind: Some(kind) }
    }
}

impl Component for Callout {
    fn open(&self, el: &Element<'_>) -> String {
        let kind = self.kind.unwrap_or(match el.args.get("type") {
            Some("warn" | "warning") => "warn",
            Some("error" | "danger") => "error",
            Some("success") => "success",
            _ => "info",
        });
        let mut html = format!(r#"<div class="callout callout-{kind}" role="note">"#);
        if let Some(title) = el.args.get("title") {
            let _ = write!(html, r#"<p class="callout-title">{}</p>"#, escape_html(title));
        }
        html.push_str(r#"<div class="callout-body">"#);
        html
    }

    fn close(&self, _el: &Element<'_>) -> String {
        "</div></div>".to_owned()
    }
}

/// Plain wrapper element.
struct Wrapper {
    tag: &'static str,
    class: &'static str,
}

impl Wrapper {
    fn div(class: &'static str) -> Self {
        Self { tag: "div", class }
    }
}

impl Component for Wrapper {
    fn open(&self, _el: &Element<'_>) -> String {
        format!(r#"<{} class="{}">"#, self.tag, self.class)
    }

    fn close(&self, _el: &Element<'_>) -> String {
        format!("</{}>", self.tag)
    }
}

/// Card grid.
struct Cards;

impl Component for Cards {
    fn open(&self, el: &Element<'_>) -> String {
        format!(r#"<div class="cards"{}>"#, attr_from(el.args, "cols", "data-cols"))
    }

    fn close(&self, _el: &Element<'_>) -> String {
        "</div>".to_owned()
    }
}

/// Link card; a string `icon` becomes an icon span.
struct Card;

impl Component for Card {
    fn open(&self, el: &Element<'_>) -> String {
        let mut html = match el.args.get("href") {
            Some(href) => format!(r#"<a class="card"{}>"#, attr("href", href)),
            None => r#"<div class="card">"#.to_owned(),
        };
        if let Some(icon) = el.args.get("icon") {
            let _ = write!(html, r#"<span class="card-icon icon"{}></span>"#, attr("data-icon", icon));
        }
        if let Some(title) = el.args.get("title") {
            let _ = write!(html, r#"<p class="card-title">{}</p>"#, escape_html(title));
        }
        if let Some(description) = el.args.get("description") {
            let _ = write!(html, r#"<p class="card-description">{}</p>"#, escape_html(description));
        }
        html.push_str(r#"<div class="card-body">"#);
        html
    }

    fn close(&self, el: &Element<'_>) -> String {
        if el.args.get("href").is_some() {
            "</div></a>".to_owned()
        } else {
            "</div></div>".to_owned()
        }
    }
}

/// Tab container; `CodeGroup` turns fenced code blocks into tabs.
struct Tabs {
    code: bool,
}

impl Component for Tabs {
    fn open(&self, _el: &Element<'_>) -> String {
        if self.code {
            r#"<div class="tabs code-group">"#.to_owned()
        } else {
            r#"<div class="tabs">"#.to_owned()
        }
    }

    fn close(&self, _el: &Element<'_>) -> String {
        "</div>".to_owned()
    }

    fn items_header(&self, el: &Element<'_>) -> Option<String> {
        let mut html = r#"<div class="tabs-list" role="tablist">"#.to_owned();
        for (i, item) in el.items.iter().enumerate() {
            let _ = write!(
                html,
                r#"<button class="tabs-trigger" role="tab"{} aria-selected="{}">{}</button>"#,
                attr("data-value", item),
                i == 0,
                escape_html(item)
            );
        }
        html.push_str("</div>");
        Some(html)
    }

    fn collects_code(&self) -> bool {
        self.code
    }
}

/// Single tab; its value is `value`, else `title`, else `tab-N`.
struct Tab;

impl Component for Tab {
    fn open(&self, el: &Element<'_>) -> String {
        let value = el.label.unwrap_or("tab");
        format!(r#"<div class="tabs-content" role="tabpanel"{}>"#, attr("data-value", value))
    }

    fn close(&self, _el: &Element<'_>) -> String {
        "</div>".to_owned()
    }

    fn item_label(&self, args: &ComponentArgs, index: usize) -> Option<String> {
        Some(
            args.get("value")
                .or_else(|| args.get("title"))
                .map_or_else(|| format!("tab-{index}"), ToOwned::to_owned),
        )
    }
}

struct Step;

impl Component for Step {
    fn open(&self, el: &Element<'_>) -> String {
        let mut html = r#"<div class="step">"#.to_owned();
        if let Some(title) = el.args.get("title") {
            let _ = write!(html, r#"<p class="step-title">{}</p>"#, escape_html(title));
        }
        html
    }

    fn close(&self, _el: &Element<'_>) -> String {
        "</div>".to_owned()
    }
}

/// Collapsible section, wrapped in an accordion group unless already inside one.
struct Accordion;

impl Accordion {
    fn grouped(el: &Element<'_>) -> bool {
        matches!(el.parent(), Some("AccordionGroup" | "Accordions"))
    }
}

impl Component for Accordion {
    fn open(&self, el: &Element<'_>) -> String {
        let mut html = String::new();
        if !Self::grouped(el) {
            html.push_str(r#"<div class="accordions">"#);
        }
        let id = attr_from(el.args, "id", "id");
        let open = if el.args.flag("defaultOpen") { " open" } else { "" };
        let title = el.args.get("title").unwrap_or_default();
        let _ = write!(
            html,
            r#"<details class="accordion"{id}{open}><summary>{}</summary><div class="accordion-body">"#,
            escape_html(title)
        );
        html
    }

    fn close(&self, el: &Element<'_>) -> String {
        if Self::grouped(el) {
            "</div></details>".to_owned()
        } else {
            "</div></details></div>".to_owned()
        }
    }
}

/// Figure with optional caption.
struct Frame;

impl Component for Frame {
    fn open(&self, _el: &Element<'_>) -> String {
        r#"<figure class="frame"><div class="frame-body">"#.to_owned()
    }

    fn close(&self, el: &Element<'_>) -> String {
        match el.args.get("caption") {
            Some(caption) => format!(
                "</div><figcaption>{}</figcaption></figure>",
                escape_html(caption)
            ),
            None => "</div></figure>".to_owned(),
        }
    }
}

struct Check;

impl Component for Check {
    fn open(&self, _el: &Element<'_>) -> String {
        format!(r#"<span class="check" aria-label="check">{CHECK_SVG}</span>"#)
    }
}

struct Icon;

impl Component for Icon {
    fn open(&self, el: &Element<'_>) -> String {
        format!(
            r#"<span class="icon"{}{}></span>"#,
            attr_from(el.args, "icon", "data-icon"),
            attr_from(el.args, "iconType", "data-icon-type")
        )
    }
}

struct Snippet;

impl Component for Snippet {
    fn open(&self, el: &Element<'_>) -> String {
        let mut html = r#"<div class="snippet">"#.to_owned();
        if let Some(file) = el.args.get("file") {
            let _ = write!(html, r#"<div class="snippet-file">{}</div>"#, escape_html(file));
        }
        html
    }

    fn close(&self, _el: &Element<'_>) -> String {
        "</div>".to_owned()
    }
}

struct CheckListItem;

impl Component for CheckListItem {
    fn open(&self, el: &Element<'_>) -> String {
        format!(
            r#"<li class="checklist-item"{}><span class="check" aria-hidden="true">{CHECK_SVG}</span><span>"#,
            attr_from(el.args, "id", "id")
        )
    }

    fn close(&self, _el: &Element<'_>) -> String {
        "</span></li>".to_owned()
    }
}

/// Header line shared by field listings.
fn field_header(name: &str, args: &ComponentArgs, location: Option<&str>) -> String {
    let mut html = format!(
        r#"<div class="field-header"><span class="field-name">{}</span>"#,
        escape_html(name)
    );
    if let Some(ty) = args.get("type") {
        let _ = write!(html, r#"<span class="field-type">{}</span>"#, escape_html(ty));
    }
    if let Some(location) = location {
        let _ = write!(html, r#"<span class="field-location">({location})</span>"#);
    }
    if args.flag("required") {
        html.push_str(r#"<span class="field-required">required</span>"#);
    }
    if let Some(default) = args.get("default") {
        let _ = write!(
            html,
            r#"<span class="field-default">default: {}</span>"#,
            escape_html(default)
        );
    }
    html.push_str("</div>");
    html
}

struct ResponseField;

impl Component for ResponseField {
    fn open(&self, el: &Element<'_>) -> String {
        let name = el.args.get("name").unwrap_or_default();
        format!(
            r#"<div class="field response-field">{}<div class="field-body">"#,
            field_header(name, el.args, None)
        )
    }

    fn close(&self, _el: &Element<'_>) -> String {
        "</div></div>".to_owned()
    }
}

/// Request parameter; the attribute naming it gives its location.
struct ParamField;

impl Component for ParamField {
    fn open(&self, el: &Element<'_>) -> String {
        let (location, name) = ["path", "query", "body", "header"]
            .into_iter()
            .find_map(|loc| el.args.get(loc).map(|name| (Some(loc), name)))
            .unwrap_or((None, ""));
        format!(
            r#"<div class="field param-field">{}<div class="field-body">"#,
            field_header(name, el.args, location)
        )
    }

    fn close(&self, _el: &Element<'_>) -> String {
        "</div></div>".to_owned()
    }
}

/// API operation summary.
///
/// `operations` is a JSON array of `{"path", "method"}` objects.
struct ApiPage;

impl Component for ApiPage {
    fn open(&self, el: &Element<'_>) -> String {
        let mut html = format!(
            r#"<div class="api-page"{}>"#,
            attr_from(el.args, "document", "data-document")
        );
        let operations: Vec<serde_json::Value> = el
            .args
            .get("operations")
            .and_then(|ops| serde_json::from_str(ops).ok())
            .unwrap_or_default();
        for op in &operations {
            let method = op["method"].as_str().unwrap_or_default().to_uppercase();
            let path = op["path"].as_str().unwrap_or_default();
            let _ = write!(
                html,
                r#"<div class="api-operation"><span class="api-method api-method-{}">{}</span> <code>{}</code></div>"#,
                escape_html(&method.to_lowercase()),
                escape_html(&method),
                escape_html(path)
            );
        }
        html.push_str("</div>");
        html
    }
}

/// Zoomable image.
struct Image;

impl Component for Image {
    fn open(&self, el: &Element<'_>) -> String {
        format!(
            r#"<img class="zoomable"{}{}{}{}{} loading="lazy">"#,
            attr_from(el.args, "src", "src"),
            attr(
                "alt",
                el.args.get("alt").unwrap_or_default()
            ),
            attr_from(el.args, "title", "title"),
            attr_from(el.args, "width", "width"),
            attr_from(el.args, "height", "height")
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn element<'a>(args: &'a ComponentArgs, ancestors: &'a [&'a str]) -> Element<'a> {
        Element {
            name: "Test",
            args,
            label: None,
            items: &[],
            ancestors,
        }
    }

    #[test]
    fn test_callout_type() {
        let args = ComponentArgs::parse(r#"type="warning" title="Heads up""#).unwrap();
        let html = Callout { kind: None }.open(&element(&args, &[]));
        assert_eq!(
            html,
            r#"<div class="callout callout-warn" role="note"><p class="callout-title">Heads up</p><div class="callout-body">"#
        );
    }

    #[test]
    fn test_tab_labels() {
        let titled = ComponentArgs::parse(r#"title="Python""#).unwrap();
        let valued = ComponentArgs::parse(r#"title="Python" value="py""#).unwrap();
        let bare = ComponentArgs::default();
        assert_eq!(Tab.item_label(&titled, 0).as_deref(), Some("Python"));
        assert_eq!(Tab.item_label(&valued, 0).as_deref(), Some("py"));
        assert_eq!(Tab.item_label(&bare, 2).as_deref(), Some("tab-2"));
    }

    #[test]
    fn test_accordion_wrapping() {
        let args = ComponentArgs::parse(r#"title="FAQ""#).unwrap();
        let alone = Accordion.open(&element(&args, &["Steps"]));
        let grouped = Accordion.open(&element(&args, &["AccordionGroup"]));
        assert!(alone.starts_with(r#"<div class="accordions">"#));
        assert!(grouped.starts_with(r#"<details class="accordion">"#));
        assert_eq!(Accordion.close(&element(&args, &["Accordions"])), "</div></details>");
    }

    #[test]
    fn test_param_field_location() {
        let args = ComponentArgs::parse(r#"query="user" type="string" required"#).unwrap();
        let html = ParamField.open(&element(&args, &[]));
        assert!(html.contains(r#"<span class="field-name">user</span>"#));
        assert!(html.contains("(query)"));
        assert!(html.contains("required"));
    }

    #[test]
    fn test_api_page_operations() {
        let args = ComponentArgs::parse(
            r#"document="chat" operations={[{"path":"/chat-messages","method":"post"}]}"#,
        )
        .unwrap();
        let html = ApiPage.open(&element(&args, &[]));
        assert!(html.contains(r#"data-document="chat""#));
        assert!(html.contains(r#"<span class="api-method api-method-post">POST</span> <code>/chat-messages</code>"#));
    }

    #[test]
    fn test_card_icon_and_link() {
        let args = ComponentArgs::parse(r#"title="Guide" icon="book" href="/en/guide""#).unwrap();
        let el = element(&args, &[]);
        let html = Card.open(&el);
        assert!(html.starts_with(r#"<a class="card" href="/en/guide">"#));
        assert!(html.contains(r#"data-icon="book""#));
        assert_eq!(Card.close(&el), "</div></a>");
    }

    #[test]
    fn test_image_escapes() {
        let args = ComponentArgs::parse(r#"src="/a.png" alt="A &quot;B""#).unwrap();
        let html = Image.open(&element(&args, &[]));
        assert!(html.starts_with(r#"<img class="zoomable" src="/a.png" alt="A &amp;quot;B""#));
    }
}
