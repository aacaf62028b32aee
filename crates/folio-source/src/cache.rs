//! In-memory render cache validated by source mtime.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use folio_renderer::RenderedPage;

#[derive(Debug)]
struct CachedRender {
    mtime: f64,
    page: Arc<RenderedPage>,
}

/// Rendered pages keyed by storage path.
///
/// An entry is only returned while its source mtime is unchanged.
#[derive(Debug, Default)]
pub(crate) struct RenderCache {
    entries: RwLock<HashMap<String, CachedRender>>,
}

impl RenderCache {
    /// Cached render of `path` if it was rendered at `mtime`.
    pub fn get(&self, path: &str, mtime: f64) -> Option<Arc<RenderedPage>> {
        let entries = self.entries.read().unwrap();
        let entry = entries.get(path)?;
        // 1ms tolerance, matching filesystem timestamp precision.
        ((entry.mtime - mtime).abs() <= 0.001).then(|| Arc::clone(&entry.page))
    }

    pub fn set(&self, path: &str, mtime: f64, page: Arc<RenderedPage>) {
        self.entries
            .write()
            .unwrap()
            .insert(path.to_owned(), CachedRender { mtime, page });
    }

    #[cfg(test)]
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }
}
