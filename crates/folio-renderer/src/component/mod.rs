//! Component registry.
//!
//! Maps JSX-style tag names used in content (`<Note>`, `<Tabs>`, `<Card />`)
//! to [`Component`] implementations that emit HTML around the rendered
//! children.
//!
//! # Example
//!
//! ```
//! use folio_renderer::{Component, Element, MdxRenderer, RendererOptions, escape_html};
//!
//! struct Badge;
//!
//! impl Component for Badge {
//!     fn open(&self, el: &Element<'_>) -> String {
//!         format!(r#"<span class="badge">{}"#, escape_html(el.args.get("label").unwrap_or("")))
//!     }
//!
//!     fn close(&self, _el: &Element<'_>) -> String {
//!         "</span>".to_owned()
//!     }
//! }
//!
//! let renderer = MdxRenderer::new(RendererOptions::default()).with_component("Badge", Badge);
//! let page = renderer.render("Status: <Badge label=\"new\" />");
//! assert!(page.html.contains(r#"<span class="badge">new</span>"#));
//! ```

mod args;
mod builtin;

use std::collections::HashMap;

pub use args::{AttrValue, ComponentArgs};
pub(crate) use args::{ParsedTag, TagKind, parse_tag};

/// A component element being rendered.
#[derive(Debug)]
pub struct Element<'a> {
    /// Tag name as written.
    pub name: &'a str,
    /// Tag attributes.
    pub args: &'a ComponentArgs,
    /// Label contributed to the enclosing item container (see
    /// [`Component::item_label`]).
    pub label: Option<&'a str>,
    /// Labels contributed by child elements; only complete in
    /// [`Component::close`] and [`Component::items_header`].
    pub items: &'a [String],
    /// Names of enclosing components, innermost last.
    pub ancestors: &'a [&'a str],
}

impl Element<'_> {
    /// Name of the innermost enclosing component.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.ancestors.last().copied()
    }
}

/// Renders one component tag.
///
/// `open` is called for the opening tag (or once for a self-closing tag,
/// followed immediately by `close`); children are rendered between the
/// two calls.
pub trait Component: Send + Sync {
    /// HTML emitted at the opening tag.
    fn open(&self, el: &Element<'_>) -> String;

    /// HTML emitted at the closing tag.
    fn close(&self, _el: &Element<'_>) -> String {
        String::new()
    }

    /// Label this element contributes to its parent's item list, given the
    /// number of items the parent already has.
    fn item_label(&self, _args: &ComponentArgs, _index: usize) -> Option<String> {
        None
    }

    /// HTML inserted right after the opening tag once all child items are known.
    fn items_header(&self, _el: &Element<'_>) -> Option<String> {
        None
    }

    /// Whether fenced code blocks directly inside become items (tabs).
    fn collects_code(&self) -> bool {
        false
    }
}

/// Registry of components by tag name.
pub struct ComponentRegistry {
    components: HashMap<String, Box<dyn Component>>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ComponentRegistry {
    /// Registry without any components.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            components: HashMap::new(),
        }
    }

    /// Registry with the built-in documentation components.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        builtin::register_all(&mut registry);
        registry
    }

    /// Register (or replace) a component.
    pub fn register(&mut self, name: impl Into<String>, component: impl Component + 'static) {
        self.components.insert(name.into(), Box::new(component));
    }

    /// Look up a component by tag name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Component> {
        self.components.get(name).map(|c| c.as_ref())
    }

    /// Whether a tag name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Registered tag names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.components.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("components", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names() {
        let registry = ComponentRegistry::builtin();
        for name in [
            "Info",
            "Note",
            "Tip",
            "Warning",
            "Danger",
            "Callout",
            "CardGroup",
            "Cards",
            "Card",
            "Tabs",
            "Tab",
            "CodeGroup",
            "Steps",
            "Step",
            "Accordion",
            "AccordionGroup",
            "Accordions",
            "Frame",
            "Check",
            "Icon",
            "Snippet",
            "CheckList",
            "CheckListItem",
            "ResponseField",
            "ParamField",
            "APIPage",
            "img",
        ] {
            assert!(registry.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_register_replaces() {
        struct Empty;
        impl Component for Empty {
            fn open(&self, _el: &Element<'_>) -> String {
                String::new()
            }
        }

        let mut registry = ComponentRegistry::empty();
        assert!(!registry.contains("Note"));
        registry.register("Note", Empty);
        assert_eq!(registry.names(), vec!["Note"]);
    }
}
