//! MDX renderer: markdown events to HTML with components.

use std::collections::BTreeMap;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use serde::Serialize;

use crate::component::{Component, ComponentArgs, ComponentRegistry, Element, TagKind};
use crate::frontmatter::{FrontmatterError, split_frontmatter};
use crate::lang::LangAliases;
use crate::mdx::strip_mdx;
use crate::preprocess::{Marker, marker_index, preprocess};
use crate::slug::Slugger;
use crate::util::{escape_html, heading_level_to_num};

/// Renderer options.
#[derive(Clone, Debug)]
pub struct RendererOptions {
    /// Language used for fences without one.
    pub default_language: String,
    /// Extra code fence language aliases.
    pub lang_alias: BTreeMap<String, String>,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            default_language: "text".to_owned(),
            lang_alias: BTreeMap::new(),
        }
    }
}

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Heading level (2-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// Result of rendering a page.
#[derive(Clone, Debug, Default)]
pub struct RenderedPage {
    /// Rendered HTML.
    pub html: String,
    /// Table of contents (headings level 2-6).
    pub toc: Vec<TocEntry>,
    /// Frontmatter title, else the first H1.
    pub title: Option<String>,
    /// Frontmatter description.
    pub description: Option<String>,
    /// Problems found while rendering (unknown or unbalanced tags).
    pub warnings: Vec<String>,
}

/// MDX-flavoured markdown renderer.
///
/// Holds the component registry and language aliases; rendering state is
/// per call, so one renderer can be shared across threads.
#[derive(Debug)]
pub struct MdxRenderer {
    registry: ComponentRegistry,
    langs: LangAliases,
}

impl MdxRenderer {
    /// Create a renderer with the built-in components.
    #[must_use]
    pub fn new(options: RendererOptions) -> Self {
        Self {
            registry: ComponentRegistry::builtin(),
            langs: LangAliases::new(&options.default_language, &options.lang_alias),
        }
    }

    /// Register an additional component.
    #[must_use]
    pub fn with_component(mut self, name: &str, component: impl Component + 'static) -> Self {
        self.registry.register(name, component);
        self
    }

    /// Component registry in use.
    #[must_use]
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Parser options: GFM tables, strikethrough, task lists, alerts and
    /// `{#id}` heading attributes. Footnotes are off.
    fn parser_options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM
            | Options::ENABLE_HEADING_ATTRIBUTES
    }

    /// Render a full document, frontmatter included.
    ///
    /// # Errors
    ///
    /// Returns [`FrontmatterError`] if the frontmatter block is malformed.
    pub fn render_document(&self, source: &str) -> Result<RenderedPage, FrontmatterError> {
        let (frontmatter, body) = split_frontmatter(source)?;
        let mut page = self.render(body);
        if frontmatter.title.is_some() {
            page.title = frontmatter.title;
        }
        page.description = frontmatter.description;
        Ok(page)
    }

    /// Render a page body (without frontmatter).
    #[must_use]
    pub fn render(&self, body: &str) -> RenderedPage {
        let stripped = strip_mdx(body);
        let pre = preprocess(&stripped, &self.registry);
        let mut state = RenderState::new(self, &pre.markers);
        state.warnings = pre.warnings;

        for event in Parser::new_ext(&pre.text, Self::parser_options()) {
            state.event(event);
        }
        state.finish()
    }
}

/// Open component.
struct Frame<'m> {
    name: &'m str,
    args: &'m ComponentArgs,
    label: Option<String>,
    items: Vec<String>,
    /// Index of the placeholder event that receives the items header.
    header_at: usize,
}

struct HeadingState {
    level: HeadingLevel,
    id: Option<String>,
    classes: Vec<String>,
    text: String,
    start: usize,
}

struct CodeState {
    lang: String,
    title: Option<String>,
    text: String,
}

struct ImageState {
    src: String,
    title: String,
    alt: String,
}

struct RenderState<'a, 'm> {
    registry: &'m ComponentRegistry,
    langs: &'m LangAliases,
    markers: &'m [Marker],
    out: Vec<Event<'a>>,
    frames: Vec<Frame<'m>>,
    heading: Option<HeadingState>,
    code: Option<CodeState>,
    image: Option<ImageState>,
    slugger: Slugger,
    toc: Vec<TocEntry>,
    title: Option<String>,
    warnings: Vec<String>,
}

impl<'a, 'm> RenderState<'a, 'm> {
    fn new(renderer: &'m MdxRenderer, markers: &'m [Marker]) -> Self {
        Self {
            registry: &renderer.registry,
            langs: &renderer.langs,
            markers,
            out: Vec::new(),
            frames: Vec::new(),
            heading: None,
            code: None,
            image: None,
            slugger: Slugger::new(),
            toc: Vec::new(),
            title: None,
            warnings: Vec::new(),
        }
    }

    fn push_html(&mut self, html: String) {
        if !html.is_empty() {
            self.out.push(Event::Html(CowStr::from(html)));
        }
    }

    fn event(&mut self, event: Event<'a>) {
        if let Event::Html(html) | Event::InlineHtml(html) = &event
            && let Some(n) = marker_index(html)
        {
            self.marker(n);
            return;
        }

        match event {
            Event::Text(text) if self.code.is_some() => {
                if let Some(code) = self.code.as_mut() {
                    code.text.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => self.finish_code(),
            Event::Start(Tag::CodeBlock(kind)) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) => info.into_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                let (lang, title) = parse_fence_info(&info);
                self.code = Some(CodeState {
                    lang,
                    title,
                    text: String::new(),
                });
            }
            Event::Start(Tag::Image {
                dest_url, title, ..
            }) => {
                self.image = Some(ImageState {
                    src: dest_url.into_string(),
                    title: title.into_string(),
                    alt: String::new(),
                });
            }
            Event::Text(text) | Event::Code(text) if self.image.is_some() => {
                if let Some(image) = self.image.as_mut() {
                    image.alt.push_str(&text);
                }
            }
            Event::End(TagEnd::Image) => self.finish_image(),
            Event::Start(Tag::Heading {
                level, id, classes, ..
            }) => {
                self.heading = Some(HeadingState {
                    level,
                    id: id.map(CowStr::into_string),
                    classes: classes.into_iter().map(CowStr::into_string).collect(),
                    text: String::new(),
                    start: self.out.len(),
                });
                self.out.push(Event::Html(CowStr::Borrowed("")));
            }
            Event::End(TagEnd::Heading(_)) => self.finish_heading(),
            event @ (Event::Text(_) | Event::Code(_)) => {
                if let (Event::Text(text) | Event::Code(text), Some(heading)) =
                    (&event, self.heading.as_mut())
                {
                    heading.text.push_str(text);
                }
                self.out.push(event);
            }
            other => self.out.push(other),
        }
    }

    fn marker(&mut self, n: usize) {
        let markers = self.markers;
        let Some(Marker { tag }) = markers.get(n) else {
            return;
        };
        let registry = self.registry;
        let Some(component) = registry.get(&tag.name) else {
            return;
        };

        match tag.kind {
            TagKind::Open | TagKind::SelfClosing => {
                let label = self
                    .frames
                    .last()
                    .and_then(|parent| component.item_label(&tag.args, parent.items.len()));
                if let (Some(label), Some(parent)) = (&label, self.frames.last_mut()) {
                    parent.items.push(label.clone());
                }

                let (open, close) = {
                    let ancestors: Vec<&str> = self.frames.iter().map(|f| f.name).collect();
                    let el = Element {
                        name: &tag.name,
                        args: &tag.args,
                        label: label.as_deref(),
                        items: &[],
                        ancestors: &ancestors,
                    };
                    let close = (tag.kind == TagKind::SelfClosing).then(|| component.close(&el));
                    (component.open(&el), close)
                };

                self.push_html(open);
                match close {
                    Some(close) => self.push_html(close),
                    None => {
                        self.frames.push(Frame {
                            name: &tag.name,
                            args: &tag.args,
                            label,
                            items: Vec::new(),
                            header_at: self.out.len(),
                        });
                        self.out.push(Event::Html(CowStr::Borrowed("")));
                    }
                }
            }
            TagKind::Close => match self.frames.iter().rposition(|f| f.name == tag.name) {
                Some(idx) => {
                    while self.frames.len() > idx + 1 {
                        if let Some(frame) = self.frames.pop() {
                            self.warnings.push(format!(
                                "Unclosed <{}> closed by </{}>",
                                frame.name, tag.name
                            ));
                            self.close_frame(frame);
                        }
                    }
                    if let Some(frame) = self.frames.pop() {
                        self.close_frame(frame);
                    }
                }
                None => self
                    .warnings
                    .push(format!("Unmatched closing tag </{}>", tag.name)),
            },
        }
    }

    fn close_frame(&mut self, frame: Frame<'m>) {
        let Some(component) = self.registry.get(frame.name) else {
            return;
        };
        let (header, close) = {
            let ancestors: Vec<&str> = self.frames.iter().map(|f| f.name).collect();
            let el = Element {
                name: frame.name,
                args: frame.args,
                label: frame.label.as_deref(),
                items: &frame.items,
                ancestors: &ancestors,
            };
            (component.items_header(&el), component.close(&el))
        };
        if let Some(header) = header
            && let Some(slot) = self.out.get_mut(frame.header_at)
        {
            *slot = Event::Html(CowStr::from(header));
        }
        self.push_html(close);
    }

    fn finish_heading(&mut self) {
        let Some(heading) = self.heading.take() else {
            return;
        };
        let level = heading_level_to_num(heading.level);
        let text = heading.text.trim().to_owned();
        let id = match heading.id {
            Some(id) => {
                self.slugger.reserve(&id);
                id
            }
            None => self.slugger.slug(&text),
        };

        let class = if heading.classes.is_empty() {
            String::new()
        } else {
            format!(r#" class="{}""#, escape_html(&heading.classes.join(" ")))
        };
        if let Some(slot) = self.out.get_mut(heading.start) {
            *slot = Event::Html(CowStr::from(format!(
                r#"<h{level} id="{}"{class}>"#,
                escape_html(&id)
            )));
        }
        self.out.push(Event::Html(CowStr::from(format!("</h{level}>\n"))));

        if level == 1 && self.title.is_none() {
            self.title = Some(text.clone());
        }
        if level >= 2 {
            self.toc.push(TocEntry {
                level,
                title: text,
                id,
            });
        }
    }

    fn finish_code(&mut self) {
        let Some(code) = self.code.take() else {
            return;
        };
        let langs = self.langs;
        let lang = langs.resolve(&code.lang);
        let mut html = format!(
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            escape_html(lang),
            escape_html(&code.text)
        );

        let registry = self.registry;
        let collecting = self
            .frames
            .last_mut()
            .filter(|f| registry.get(f.name).is_some_and(|c| c.collects_code()));
        if let Some(parent) = collecting {
            let label = code.title.clone().unwrap_or_else(|| lang.to_owned());
            html = format!(
                r#"<div class="tabs-content" role="tabpanel" data-value="{}">{html}</div>"#,
                escape_html(&label)
            );
            parent.items.push(label);
        } else if let Some(title) = &code.title {
            html = format!(
                r#"<figure class="code-block"><figcaption>{}</figcaption>{html}</figure>"#,
                escape_html(title)
            );
        }
        html.push('\n');
        self.push_html(html);
    }

    fn finish_image(&mut self) {
        let Some(image) = self.image.take() else {
            return;
        };
        let title = if image.title.is_empty() {
            String::new()
        } else {
            format!(r#" title="{}""#, escape_html(&image.title))
        };
        self.push_html(format!(
            r#"<img class="zoomable" src="{}" alt="{}"{title} loading="lazy">"#,
            escape_html(&image.src),
            escape_html(&image.alt)
        ));
    }

    fn finish(mut self) -> RenderedPage {
        while let Some(frame) = self.frames.pop() {
            self.warnings.push(format!("Unclosed <{}>", frame.name));
            self.close_frame(frame);
        }

        let mut html = String::with_capacity(self.out.len() * 16);
        pulldown_cmark::html::push_html(&mut html, self.out.into_iter());

        RenderedPage {
            html,
            toc: self.toc,
            title: self.title,
            description: None,
            warnings: self.warnings,
        }
    }
}

/// Split fence info into language and optional title.
///
/// Accepts `lang`, `lang Title words`, `lang title="Title"` and ignores
/// `{...}` line-highlight groups.
fn parse_fence_info(info: &str) -> (String, Option<String>) {
    let info = info.trim();
    let (lang, rest) = info
        .split_once(char::is_whitespace)
        .map_or((info, ""), |(lang, rest)| (lang, rest.trim()));
    let lang = lang.split('{').next().unwrap_or_default().to_owned();

    let title = if let Some(idx) = rest.find("title=") {
        let value = &rest[idx + 6..];
        let quote = value.chars().next().filter(|c| matches!(c, '"' | '\''));
        match quote {
            Some(q) => value[1..].split(q).next().map(str::to_owned),
            None => value.split_whitespace().next().map(str::to_owned),
        }
    } else {
        let words: Vec<&str> = rest
            .split_whitespace()
            .filter(|w| !w.starts_with('{'))
            .collect();
        (!words.is_empty()).then(|| words.join(" "))
    };

    (lang, title.filter(|t| !t.is_empty()))
}
