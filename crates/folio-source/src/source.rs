//! Locale-aware content source.
//!
//! [`Source`] indexes every page and `meta.json` of a [`Storage`] backend on
//! first use and then serves page lookups, page trees, renders and search
//! from the immutable snapshot.
//!
//! # Thread Safety
//!
//! - the index lives in a `RwLock<Arc<SourceState>>` swapped under a reload
//!   mutex (double-checked locking)
//! - rendered pages are cached per file and revalidated by mtime
//! - search indexes are built once per snapshot, on the first query

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, RwLock};

use folio_config::{I18nConfig, LocaleParser};
use folio_renderer::{
    Frontmatter, MdxRenderer, RenderedPage, RendererOptions, split_frontmatter, strip_mdx,
};
use folio_storage::{EntryKind, Meta, Storage, StorageError};
use rayon::prelude::*;

use crate::cache::RenderCache;
use crate::page::{Page, PageImage, PageParams};
use crate::path::{parse_content_path, title_case};
use crate::search::{SearchIndex, SearchResult, Tokenizer};
use crate::tree::{FolderBuilder, PageTree, TreePage};

/// Error returned by [`Source`] operations.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Storage backend failure.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Configuration for [`Source`].
#[derive(Clone, Debug)]
pub struct SourceConfig {
    /// Supported locales and path parser mode.
    pub i18n: I18nConfig,
    /// Markdown rendering options.
    pub renderer: RendererOptions,
    /// Tokenizer name per locale.
    pub tokenizers: BTreeMap<String, String>,
    /// Tree name used when the locale root has no `meta.json` title.
    pub tree_name: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            i18n: I18nConfig::default(),
            renderer: RendererOptions::default(),
            tokenizers: BTreeMap::new(),
            tree_name: "Docs".to_owned(),
        }
    }
}

/// Immutable index snapshot.
#[derive(Debug, Default)]
struct SourceState {
    pages: Vec<Page>,
    by_key: HashMap<String, usize>,
    trees: HashMap<String, Arc<PageTree>>,
    search: OnceLock<HashMap<String, SearchIndex>>,
}

impl SourceState {
    fn get(&self, locale: &str, slugs: &[impl AsRef<str>]) -> Option<&Page> {
        self.by_key
            .get(&page_key(locale, slugs))
            .map(|&idx| &self.pages[idx])
    }
}

fn page_key(locale: &str, slugs: &[impl AsRef<str>]) -> String {
    let mut key = locale.to_owned();
    for slug in slugs {
        key.push('/');
        key.push_str(slug.as_ref());
    }
    key
}

/// Frontmatter and body; malformed frontmatter falls back to defaults.
fn split_lenient<'t>(path: &str, text: &'t str) -> (Frontmatter, &'t str) {
    split_frontmatter(text).unwrap_or_else(|e| {
        tracing::warn!(path, error = %e, "Invalid frontmatter, using defaults");
        (Frontmatter::default(), text)
    })
}

/// Page file parsed during indexing.
struct IndexedFile {
    dirs: Vec<String>,
    stem: String,
    page: Page,
}

/// Content source over a storage backend.
pub struct Source {
    storage: Arc<dyn Storage>,
    config: SourceConfig,
    renderer: MdxRenderer,
    reload_lock: Mutex<()>,
    current_state: RwLock<Arc<SourceState>>,
    loaded: AtomicBool,
    cache: RenderCache,
}

impl Source {
    /// Create a source; nothing is read until first use.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, config: SourceConfig) -> Self {
        Self {
            storage,
            renderer: MdxRenderer::new(config.renderer.clone()),
            config,
            reload_lock: Mutex::new(()),
            current_state: RwLock::new(Arc::new(SourceState::default())),
            loaded: AtomicBool::new(false),
            cache: RenderCache::default(),
        }
    }

    /// Locale configuration.
    #[must_use]
    pub fn i18n(&self) -> &I18nConfig {
        &self.config.i18n
    }

    /// Page by slugs; `None` locale means the default one.
    ///
    /// Unsupported locales and unknown slugs give `None`.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    #[must_use]
    pub fn get_page(&self, slugs: &[impl AsRef<str>], locale: Option<&str>) -> Option<Page> {
        let locale = self.config.i18n.resolve(locale)?;
        self.load().get(locale, slugs).cloned()
    }

    /// Page tree of a locale; `None` locale means the default one.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    #[must_use]
    pub fn page_tree(&self, locale: Option<&str>) -> Option<Arc<PageTree>> {
        let locale = self.config.i18n.resolve(locale)?;
        self.load().trees.get(locale).cloned()
    }

    /// Every (locale, slugs) pair, for static generation.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    #[must_use]
    pub fn generate_params(&self) -> Vec<PageParams> {
        self.load()
            .pages
            .iter()
            .map(|page| PageParams {
                lang: page.locale.clone(),
                slug: page.slugs.clone(),
            })
            .collect()
    }

    /// Social image of a page.
    #[allow(clippy::unused_self)]
    #[must_use]
    pub fn page_image(&self, page: &Page) -> PageImage {
        page.image()
    }

    /// Source modification time of a page (Unix seconds).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Storage`] if the file is gone.
    pub fn modified(&self, page: &Page) -> Result<f64, SourceError> {
        Ok(self.storage.mtime(&page.path)?)
    }

    /// Render a page to HTML.
    ///
    /// Results are cached per file until its mtime changes. Component
    /// warnings are logged.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Storage`] if the file cannot be read.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn render(&self, page: &Page) -> Result<Arc<RenderedPage>, SourceError> {
        let mtime = self.storage.mtime(&page.path)?;
        if let Some(cached) = self.cache.get(&page.path, mtime) {
            return Ok(cached);
        }

        let text = self.storage.read(&page.path)?;
        let (frontmatter, body) = split_lenient(&page.path, &text);
        let mut rendered = self.renderer.render(body);
        rendered.title = frontmatter
            .title
            .or(rendered.title)
            .or_else(|| Some(page.title.clone()));
        rendered.description.clone_from(&page.description);
        for warning in &rendered.warnings {
            tracing::warn!(path = %page.path, %warning, "Render warning");
        }

        let rendered = Arc::new(rendered);
        self.cache.set(&page.path, mtime, Arc::clone(&rendered));
        Ok(rendered)
    }

    /// Markdown export: `# {title}` followed by the processed body.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Storage`] if the file cannot be read.
    pub fn llm_text(&self, page: &Page) -> Result<String, SourceError> {
        let text = self.storage.read(&page.path)?;
        let (_, body) = split_lenient(&page.path, &text);
        Ok(format!("# {}\n\n{}", page.title, strip_mdx(body)))
    }

    /// Full-text search within a locale; `None` locale means the default.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    #[must_use]
    pub fn search(&self, query: &str, locale: Option<&str>, limit: usize) -> Vec<SearchResult> {
        let Some(locale) = self.config.i18n.resolve(locale) else {
            return Vec::new();
        };
        if query.trim().is_empty() {
            return Vec::new();
        }
        let state = self.load();
        let indexes = state.search.get_or_init(|| self.build_search(&state));
        indexes
            .get(locale)
            .map(|index| index.search(query, limit))
            .unwrap_or_default()
    }

    /// Drop the index and render cache; the next call reloads.
    #[cfg(test)]
    pub(crate) fn invalidate(&self) {
        self.loaded.store(false, Ordering::Release);
        self.cache.clear();
    }

    fn state(&self) -> Arc<SourceState> {
        self.current_state.read().unwrap().clone()
    }

    /// Current snapshot, loading it on first use.
    fn load(&self) -> Arc<SourceState> {
        if self.loaded.load(Ordering::Acquire) {
            return self.state();
        }

        let _guard = self.reload_lock.lock().unwrap();
        if self.loaded.load(Ordering::Acquire) {
            return self.state();
        }

        let state = Arc::new(self.load_from_storage());
        *self.current_state.write().unwrap() = Arc::clone(&state);
        self.loaded.store(true, Ordering::Release);
        state
    }

    fn load_from_storage(&self) -> SourceState {
        let entries = match self.storage.scan() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to scan storage");
                return SourceState::default();
            }
        };
        let i18n = &self.config.i18n;

        let files: Vec<IndexedFile> = entries
            .par_iter()
            .filter(|entry| entry.kind == EntryKind::Page)
            .filter_map(|entry| {
                let content = parse_content_path(&entry.path, i18n)?;
                let text = match self.storage.read(&entry.path) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(path = %entry.path, error = %e, "Failed to read page");
                        return None;
                    }
                };
                let (frontmatter, _) = split_lenient(&entry.path, &text);
                let fallback = title_case(content.stem);
                Some(IndexedFile {
                    dirs: content.dirs.iter().map(|d| (*d).to_owned()).collect(),
                    stem: content.stem.to_owned(),
                    page: Page::new(
                        content.locale,
                        content.slugs(),
                        &entry.path,
                        frontmatter,
                        fallback,
                    ),
                })
            })
            .collect();

        let mut metas: HashMap<(String, Vec<String>), Meta> = HashMap::new();
        for entry in entries.iter().filter(|e| e.kind == EntryKind::Meta) {
            let Some(content) = parse_content_path(&entry.path, i18n) else {
                continue;
            };
            let meta = self
                .storage
                .read(&entry.path)
                .and_then(|text| Meta::from_json(&text));
            match meta {
                Ok(meta) => {
                    let dirs = content.dirs.iter().map(|d| (*d).to_owned()).collect();
                    metas.insert((content.locale.to_owned(), dirs), meta);
                }
                Err(e) => tracing::warn!(path = %entry.path, error = %e, "Invalid meta.json, using defaults"),
            }
        }

        let mut state = SourceState::default();
        let mut builders: HashMap<String, FolderBuilder> = i18n
            .codes()
            .map(|code| (code.to_owned(), FolderBuilder::default()))
            .collect();
        for file in files {
            let key = page_key(&file.page.locale, &file.page.slugs);
            if let Some(&existing) = state.by_key.get(&key) {
                tracing::warn!(
                    path = %file.page.path,
                    existing = %state.pages[existing].path,
                    "Duplicate page URL, keeping the first"
                );
                continue;
            }
            if let Some(builder) = builders.get_mut(&file.page.locale) {
                let dirs: Vec<&str> = file.dirs.iter().map(String::as_str).collect();
                builder.add_page(
                    &dirs,
                    &file.stem,
                    TreePage {
                        name: file.page.title.clone(),
                        url: file.page.url.clone(),
                        icon: file.page.icon.clone(),
                        external: false,
                    },
                );
            }
            state.by_key.insert(key, state.pages.len());
            state.pages.push(file.page);
        }

        let default_locale = i18n.default_language.as_str();
        for (locale, mut builder) in builders {
            let own: Vec<&Vec<String>> = metas
                .keys()
                .filter(|(l, _)| *l == locale)
                .map(|(_, dirs)| dirs)
                .collect();
            // Untranslated folders (dot mode) use the default locale's meta.
            let fallback: Vec<&Vec<String>> = metas
                .keys()
                .filter(|(l, dirs)| l == default_locale && !own.contains(&dirs))
                .map(|(_, dirs)| dirs)
                .collect();
            for dirs in own {
                let meta = metas[&(locale.clone(), dirs.clone())].clone();
                builder.set_meta(&dirs.iter().map(String::as_str).collect::<Vec<_>>(), meta);
            }
            if i18n.parser == LocaleParser::Dot {
                for dirs in fallback {
                    let meta = metas[&(default_locale.to_owned(), dirs.clone())].clone();
                    builder.set_meta(&dirs.iter().map(String::as_str).collect::<Vec<_>>(), meta);
                }
            }
            let tree = builder.build(&self.config.tree_name);
            state.trees.insert(locale, Arc::new(tree));
        }

        tracing::info!(pages = state.pages.len(), locales = state.trees.len(), "Indexed content");
        state
    }

    fn tokenizer(&self, locale: &str) -> Tokenizer {
        match self.config.tokenizers.get(locale) {
            Some(name) => Tokenizer::from_name(name).unwrap_or_else(|| {
                tracing::warn!(locale, tokenizer = %name, "Unknown tokenizer, using default");
                Tokenizer::Default
            }),
            None => match locale {
                "zh" | "cn" => Tokenizer::Mandarin,
                "ja" | "jp" => Tokenizer::Japanese,
                _ => Tokenizer::Default,
            },
        }
    }

    fn build_search(&self, state: &SourceState) -> HashMap<String, SearchIndex> {
        let bodies: Vec<Option<String>> = state
            .pages
            .par_iter()
            .map(|page| match self.storage.read(&page.path) {
                Ok(text) => Some(strip_mdx(split_lenient(&page.path, &text).1)),
                Err(e) => {
                    tracing::warn!(path = %page.path, error = %e, "Failed to read page for search");
                    None
                }
            })
            .collect();

        let mut indexes: HashMap<String, SearchIndex> = HashMap::new();
        for (page, body) in state.pages.iter().zip(bodies) {
            let index = indexes
                .entry(page.locale.clone())
                .or_insert_with(|| SearchIndex::new(self.tokenizer(&page.locale)));
            index.add_page(&page.url, &page.title, body.as_deref().unwrap_or_default());
        }
        tracing::debug!(locales = indexes.len(), "Built search indexes");
        indexes
    }
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("config", &self.config)
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}
