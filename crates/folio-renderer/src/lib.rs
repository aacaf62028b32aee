//! MDX-flavoured markdown renderer with a component registry.
//!
//! Content pages are Markdown with YAML frontmatter, ESM lines, `{/* */}`
//! comments and JSX-style component tags (`<Note>`, `<Tabs>`, `<Card />`).
//! Rendering happens in two phases:
//!
//! 1. **Preprocessing**: registered component tags are replaced with
//!    `<!--folio:N-->` markers that pass through pulldown-cmark unchanged.
//!    Tags that start a line become block markers on their own line; the
//!    rest become inline markers.
//!
//! 2. **Event rewriting**: the pulldown-cmark event stream is rewritten,
//!    dispatching markers to [`Component`] implementations, assigning
//!    heading ids, collecting the table of contents and resolving code
//!    fence languages, and finally serialized to HTML.
//!
//! # Example
//!
//! ```
//! use folio_renderer::{MdxRenderer, RendererOptions};
//!
//! let renderer = MdxRenderer::new(RendererOptions::default());
//! let page = renderer.render_document("---\ntitle: Hello\n---\n\n<Note>\nHi\n</Note>\n").unwrap();
//! assert_eq!(page.title.as_deref(), Some("Hello"));
//! assert!(page.html.contains("callout-info"));
//! ```

mod component;
mod frontmatter;
mod lang;
mod mdx;
mod preprocess;
mod renderer;
mod slug;
mod util;

pub use component::{AttrValue, Component, ComponentArgs, ComponentRegistry, Element};
pub use frontmatter::{Frontmatter, FrontmatterError, OpenApiRef, split_frontmatter};
pub use lang::LangAliases;
pub use mdx::strip_mdx;
pub use renderer::{MdxRenderer, RenderedPage, RendererOptions, TocEntry};
pub use slug::Slugger;
pub use util::escape_html;
