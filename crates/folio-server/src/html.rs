//! HTML page documents.
//!
//! A document wraps the rendered page body with the site chrome: header
//! with locale switcher, sidebar built from the page tree, table of
//! contents and page actions (markdown export, source link).

use std::fmt::Write;

use folio_config::SiteConfig;
use folio_renderer::{RenderedPage, TocEntry, escape_html};
use folio_source::{Page, PageTree, Source, SourceError, TreeFolder, TreeNode, TreePage};

const STYLE: &str = "body{margin:0;font-family:system-ui,sans-serif;line-height:1.6;color:#1f2328}\
header{display:flex;justify-content:space-between;align-items:center;padding:.75rem 1.5rem;border-bottom:1px solid #d0d7de}\
.layout{display:flex;gap:2rem;padding:0 1.5rem}\
.sidebar{width:16rem;flex-shrink:0}.sidebar ul{list-style:none;padding-left:1rem}\
.sidebar a[aria-current]{font-weight:600}.separator{margin-top:1rem;font-weight:600;font-size:.85rem}\
main{flex:1;min-width:0}.toc{width:14rem;flex-shrink:0}\
.tabs{display:flex;gap:.5rem;flex-wrap:wrap;padding:0}\
pre{overflow-x:auto;padding:1rem;background:#f6f8fa}\
img.zoomable{max-width:100%}";

/// Render the full HTML document of a page.
///
/// # Errors
///
/// Returns [`SourceError`] if the page cannot be read.
pub fn page_html(source: &Source, site: &SiteConfig, page: &Page) -> Result<String, SourceError> {
    let rendered = source.render(page)?;
    let tree = source.page_tree(Some(page.locale.as_str()));
    Ok(document(source, site, page, &rendered, tree.as_deref()))
}

fn document(
    source: &Source,
    site: &SiteConfig,
    page: &Page,
    rendered: &RenderedPage,
    tree: Option<&PageTree>,
) -> String {
    let title = rendered.title.as_deref().unwrap_or(&page.title);
    let mut html = String::with_capacity(rendered.html.len() + 4096);

    html.push_str("<!DOCTYPE html>\n");
    let _ = writeln!(html, r#"<html lang="{}">"#, escape_html(&page.locale));
    html.push_str("<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
    );
    let _ = writeln!(
        html,
        "<title>{}</title>",
        escape_html(&site.page_title(title))
    );
    if let Some(description) = rendered.description.as_deref() {
        let _ = writeln!(
            html,
            r#"<meta name="description" content="{}">"#,
            escape_html(description)
        );
    }
    let image = source.page_image(page);
    let _ = writeln!(
        html,
        r#"<meta property="og:image" content="{}">"#,
        escape_html(&absolute(site, &image.url))
    );
    let _ = writeln!(
        html,
        r#"<link rel="alternate" type="text/markdown" href="{}.mdx">"#,
        escape_html(&page.url)
    );
    let _ = writeln!(html, "<style>{STYLE}</style>\n</head>\n<body>");

    header(&mut html, source, site, page);

    html.push_str("<div class=\"layout\">\n<aside class=\"sidebar\">\n");
    if let Some(tree) = tree {
        sidebar(&mut html, tree, &page.url);
    }
    html.push_str("</aside>\n<main>\n<article>\n");
    if !rendered.html.trim_start().starts_with("<h1") {
        let _ = writeln!(html, "<h1>{}</h1>", escape_html(title));
    }
    if let Some(description) = rendered.description.as_deref() {
        let _ = writeln!(
            html,
            r#"<p class="description">{}</p>"#,
            escape_html(description)
        );
    }
    html.push_str(&rendered.html);
    actions(&mut html, site, page);
    html.push_str("</article>\n</main>\n");
    if !page.full && !rendered.toc.is_empty() {
        toc(&mut html, &rendered.toc);
    }
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn absolute(site: &SiteConfig, url: &str) -> String {
    match site.base_url.as_deref() {
        Some(base) => format!("{}{url}", base.trim_end_matches('/')),
        None => url.to_owned(),
    }
}

fn header(html: &mut String, source: &Source, site: &SiteConfig, page: &Page) {
    let _ = writeln!(
        html,
        r#"<header>
<a class="site-title" href="/{}">{}</a>
<nav class="locale-switcher">"#,
        escape_html(&page.locale),
        escape_html(&site.title)
    );
    for locale in &source.i18n().languages {
        // Same page in the other locale, else that locale's root.
        let href = source
            .get_page(&page.slugs, Some(locale.locale.as_str()))
            .map_or_else(|| format!("/{}", locale.locale), |p| p.url);
        let current = if locale.locale == page.locale {
            r#" aria-current="true""#
        } else {
            ""
        };
        let _ = writeln!(
            html,
            r#"<a href="{}" hreflang="{}"{current}>{}</a>"#,
            escape_html(&href),
            escape_html(&locale.locale),
            escape_html(&locale.name)
        );
    }
    html.push_str("</nav>\n</header>\n");
}

/// Sidebar: root folders are tabs, and the one holding the current page
/// replaces the full tree.
fn sidebar(html: &mut String, tree: &PageTree, current: &str) {
    let tabs: Vec<&TreeFolder> = tree
        .children
        .iter()
        .filter_map(|node| match node {
            TreeNode::Folder(folder) if folder.root => Some(folder),
            _ => None,
        })
        .collect();
    if !tabs.is_empty() {
        html.push_str("<nav class=\"tabs\">\n");
        for tab in &tabs {
            let Some(target) = tab.index.as_ref().or_else(|| first_page(&tab.children)) else {
                continue;
            };
            let selected = if contains(&tab.children, tab.index.as_ref(), current) {
                r#" aria-current="true""#
            } else {
                ""
            };
            let _ = writeln!(
                html,
                r#"<a href="{}"{selected}>{}</a>"#,
                escape_html(&target.url),
                escape_html(&tab.name)
            );
        }
        html.push_str("</nav>\n");
    }

    let nodes = find_root(&tree.children, current).map_or(&tree.children, |f| &f.children);
    html.push_str("<nav class=\"page-tree\">\n");
    nodes_html(html, nodes, current);
    html.push_str("</nav>\n");
}

fn find_root<'a>(nodes: &'a [TreeNode], current: &str) -> Option<&'a TreeFolder> {
    nodes.iter().find_map(|node| match node {
        TreeNode::Folder(folder) => {
            find_root(&folder.children, current).or_else(|| {
                (folder.root && contains(&folder.children, folder.index.as_ref(), current))
                    .then_some(folder)
            })
        }
        _ => None,
    })
}

fn contains(nodes: &[TreeNode], index: Option<&TreePage>, current: &str) -> bool {
    index.is_some_and(|p| p.url == current)
        || nodes.iter().any(|node| match node {
            TreeNode::Page(page) => page.url == current,
            TreeNode::Folder(folder) => contains(&folder.children, folder.index.as_ref(), current),
            TreeNode::Separator { .. } => false,
        })
}

fn first_page(nodes: &[TreeNode]) -> Option<&TreePage> {
    nodes.iter().find_map(|node| match node {
        TreeNode::Page(page) if !page.external => Some(page),
        TreeNode::Folder(folder) => folder.index.as_ref().or_else(|| first_page(&folder.children)),
        _ => None,
    })
}

fn nodes_html(html: &mut String, nodes: &[TreeNode], current: &str) {
    html.push_str("<ul>\n");
    for node in nodes {
        match node {
            TreeNode::Page(page) => {
                html.push_str("<li>");
                link(html, page, current);
                html.push_str("</li>\n");
            }
            TreeNode::Separator { name } => {
                let _ = writeln!(html, r#"<li class="separator">{}</li>"#, escape_html(name));
            }
            TreeNode::Folder(folder) => {
                let open = folder.default_open
                    || contains(&folder.children, folder.index.as_ref(), current);
                let _ = write!(html, "<li><details{}><summary>", if open { " open" } else { "" });
                match &folder.index {
                    Some(index) => link(
                        html,
                        &TreePage {
                            name: folder.name.clone(),
                            ..index.clone()
                        },
                        current,
                    ),
                    None => html.push_str(&escape_html(&folder.name)),
                }
                html.push_str("</summary>\n");
                nodes_html(html, &folder.children, current);
                html.push_str("</details></li>\n");
            }
        }
    }
    html.push_str("</ul>\n");
}

fn link(html: &mut String, page: &TreePage, current: &str) {
    let mut attrs = String::new();
    if page.url == current {
        attrs.push_str(r#" aria-current="page""#);
    }
    if page.external {
        attrs.push_str(r#" target="_blank" rel="noopener noreferrer""#);
    }
    let _ = write!(
        html,
        r#"<a href="{}"{attrs}>{}</a>"#,
        escape_html(&page.url),
        escape_html(&page.name)
    );
}

fn toc(html: &mut String, entries: &[TocEntry]) {
    html.push_str("<aside class=\"toc\">\n<nav>\n<ul>\n");
    for entry in entries {
        let _ = writeln!(
            html,
            r##"<li class="toc-level-{}"><a href="#{}">{}</a></li>"##,
            entry.level,
            escape_html(&entry.id),
            escape_html(&entry.title)
        );
    }
    html.push_str("</ul>\n</nav>\n</aside>\n");
}

fn actions(html: &mut String, site: &SiteConfig, page: &Page) {
    html.push_str("<footer class=\"page-actions\">\n");
    let _ = writeln!(
        html,
        r#"<a href="{}.mdx">View as Markdown</a>"#,
        escape_html(&page.url)
    );
    if let Some(github) = &site.github {
        let _ = writeln!(
            html,
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">Edit on GitHub</a>"#,
            escape_html(&github.blob_url(&page.path))
        );
    }
    html.push_str("</footer>\n");
}
