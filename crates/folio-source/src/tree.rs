//! Page tree per locale.
//!
//! Folders follow the content directories. Within a folder, `meta.json`
//! `pages` sets the order:
//!
//! - `name`: page (file stem) or folder
//! - `---Label---`: separator
//! - `...` / `z...a`: remaining items, alphabetical / reverse
//! - `...folder`: the folder's items, inlined
//! - `[Text](url)`: link
//! - `!name`: hide an item from the remaining ones
//!
//! Without `pages`, the `index` page becomes the folder index and the other
//! items follow alphabetically.

use std::collections::{BTreeMap, HashSet};

use folio_storage::Meta;
use serde::Serialize;

use crate::path::title_case;

/// Navigation tree of one locale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageTree {
    /// Tree name (root `meta.json` title).
    pub name: String,
    /// Top-level nodes.
    pub children: Vec<TreeNode>,
}

/// Page tree node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    /// Page or link.
    Page(TreePage),
    /// Folder.
    Folder(TreeFolder),
    /// Labelled separator.
    Separator {
        /// Label.
        name: String,
    },
}

/// Page or link node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TreePage {
    /// Display name.
    pub name: String,
    /// Target URL.
    pub url: String,
    /// Icon name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Link leaves the site.
    pub external: bool,
}

/// Folder node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TreeFolder {
    /// Display name.
    pub name: String,
    /// Icon name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Folder landing page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<TreePage>,
    /// Navigation root (sidebar tab).
    pub root: bool,
    /// Starts expanded.
    #[serde(rename = "defaultOpen")]
    pub default_open: bool,
    /// Child nodes.
    pub children: Vec<TreeNode>,
}

impl PageTree {
    /// Depth-first iterator over page nodes, folder indexes included.
    pub fn pages(&self) -> Vec<&TreePage> {
        let mut pages = Vec::new();
        collect_pages(&self.children, &mut pages);
        pages
    }
}

fn collect_pages<'a>(nodes: &'a [TreeNode], out: &mut Vec<&'a TreePage>) {
    for node in nodes {
        match node {
            TreeNode::Page(page) => out.push(page),
            TreeNode::Folder(folder) => {
                if let Some(index) = &folder.index {
                    out.push(index);
                }
                collect_pages(&folder.children, out);
            }
            TreeNode::Separator { .. } => {}
        }
    }
}

/// `meta.json` `pages` entry.
#[derive(Debug, PartialEq, Eq)]
enum MetaEntry<'a> {
    Separator(&'a str),
    Rest { reverse: bool },
    Extract(&'a str),
    Link { text: &'a str, url: &'a str },
    Exclude(&'a str),
    Name(&'a str),
}

impl<'a> MetaEntry<'a> {
    fn parse(entry: &'a str) -> Self {
        let entry = entry.trim();
        if let Some(label) = entry
            .strip_prefix("---")
            .and_then(|s| s.strip_suffix("---"))
        {
            return Self::Separator(label.trim());
        }
        match entry {
            "..." => return Self::Rest { reverse: false },
            "z...a" => return Self::Rest { reverse: true },
            _ => {}
        }
        if let Some(name) = entry.strip_prefix("...") {
            return Self::Extract(name);
        }
        if let Some(name) = entry.strip_prefix('!') {
            return Self::Exclude(name);
        }
        if let Some((text, url)) = entry
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(')'))
            .and_then(|s| s.split_once("]("))
        {
            return Self::Link { text, url };
        }
        Self::Name(entry)
    }
}

/// Collects pages and metadata of one locale, then builds its tree.
#[derive(Debug, Default)]
pub(crate) struct FolderBuilder {
    pages: BTreeMap<String, TreePage>,
    folders: BTreeMap<String, FolderBuilder>,
    meta: Option<Meta>,
}

impl FolderBuilder {
    fn folder_mut(&mut self, dirs: &[&str]) -> &mut Self {
        dirs.iter().fold(self, |folder, dir| {
            folder.folders.entry((*dir).to_owned()).or_default()
        })
    }

    pub fn add_page(&mut self, dirs: &[&str], stem: &str, page: TreePage) {
        self.folder_mut(dirs)
            .pages
            .entry(stem.to_owned())
            .or_insert(page);
    }

    pub fn set_meta(&mut self, dirs: &[&str], meta: Meta) {
        self.folder_mut(dirs).meta = Some(meta);
    }

    /// Build the tree; `fallback_name` is used without a root title.
    pub fn build(self, fallback_name: &str) -> PageTree {
        let name = self
            .meta
            .as_ref()
            .and_then(|m| m.title.clone())
            .unwrap_or_else(|| fallback_name.to_owned());
        let (_, children) = self.into_children(false);
        PageTree { name, children }
    }

    fn into_folder(self, dir: &str) -> Option<TreeFolder> {
        let meta = self.meta.clone().unwrap_or_default();
        let (index, children) = self.into_children(true);
        if index.is_none() && children.is_empty() {
            return None;
        }
        let name = meta
            .title
            .or_else(|| index.as_ref().map(|page| page.name.clone()))
            .unwrap_or_else(|| title_case(dir));
        Some(TreeFolder {
            name,
            icon: meta.icon,
            index,
            root: meta.root.unwrap_or(false),
            default_open: meta.default_open.unwrap_or(false),
            children,
        })
    }

    /// Ordered children and, if `use_index`, the folder index page.
    fn into_children(self, use_index: bool) -> (Option<TreePage>, Vec<TreeNode>) {
        let Self {
            mut pages,
            mut folders,
            meta,
        } = self;
        let entries = meta.and_then(|m| m.pages);
        let explicit_index = entries
            .as_ref()
            .is_some_and(|e| e.iter().any(|entry| entry.trim() == "index"));
        let index = if use_index && !explicit_index {
            pages.remove("index")
        } else {
            None
        };

        let Some(entries) = entries else {
            let children = take_rest(&mut pages, &mut folders, &HashSet::new(), false);
            return (index, children);
        };

        let parsed: Vec<MetaEntry<'_>> = entries.iter().map(|e| MetaEntry::parse(e)).collect();
        let referenced: HashSet<&str> = parsed
            .iter()
            .filter_map(|entry| match entry {
                MetaEntry::Name(name) | MetaEntry::Extract(name) | MetaEntry::Exclude(name) => {
                    Some(*name)
                }
                _ => None,
            })
            .collect();

        let mut children = Vec::new();
        for entry in &parsed {
            match *entry {
                MetaEntry::Separator(label) => children.push(TreeNode::Separator {
                    name: label.to_owned(),
                }),
                MetaEntry::Rest { reverse } => {
                    children.extend(take_rest(&mut pages, &mut folders, &referenced, reverse));
                }
                MetaEntry::Extract(name) => {
                    if let Some(folder) = folders.remove(name) {
                        let (index, inner) = folder.into_children(true);
                        children.extend(index.map(TreeNode::Page));
                        children.extend(inner);
                    }
                }
                MetaEntry::Link { text, url } => children.push(TreeNode::Page(TreePage {
                    name: text.to_owned(),
                    url: url.to_owned(),
                    icon: None,
                    external: url.starts_with("http://") || url.starts_with("https://"),
                })),
                MetaEntry::Exclude(_) => {}
                MetaEntry::Name(name) => {
                    if let Some(page) = pages.remove(name) {
                        children.push(TreeNode::Page(page));
                    } else if let Some(node) = folders.remove(name).and_then(|f| f.into_folder(name)) {
                        children.push(TreeNode::Folder(node));
                    } else {
                        tracing::debug!(name, "meta.json entry matches no page or folder");
                    }
                }
            }
        }
        (index, children)
    }
}

/// Remove and return the unreferenced items, sorted by name.
fn take_rest(
    pages: &mut BTreeMap<String, TreePage>,
    folders: &mut BTreeMap<String, FolderBuilder>,
    referenced: &HashSet<&str>,
    reverse: bool,
) -> Vec<TreeNode> {
    let mut names: Vec<String> = pages
        .keys()
        .chain(folders.keys())
        .filter(|name| !referenced.contains(name.as_str()))
        .cloned()
        .collect();
    names.sort();
    names.dedup();
    if reverse {
        names.reverse();
    }

    let mut nodes = Vec::new();
    for name in names {
        if let Some(page) = pages.remove(&name) {
            nodes.push(TreeNode::Page(page));
        }
        if let Some(folder) = folders.remove(&name).and_then(|f| f.into_folder(&name)) {
            nodes.push(TreeNode::Folder(folder));
        }
    }
    nodes
}
