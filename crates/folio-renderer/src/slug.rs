//! GitHub-style heading slugs.

use std::collections::HashMap;

/// Generates unique heading ids the way GitHub does.
///
/// Text is lower-cased, spaces become `-`, letters, digits, `-` and `_`
/// are kept and everything else is dropped. Repeated slugs get `-1`, `-2`, …
#[derive(Debug, Default)]
pub struct Slugger {
    counts: HashMap<String, usize>,
}

impl Slugger {
    /// Create a new slugger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unique slug for the given heading text.
    pub fn slug(&mut self, text: &str) -> String {
        let mut base = String::with_capacity(text.len());
        for ch in text.trim().chars() {
            if ch == ' ' {
                base.push('-');
            } else if ch.is_alphanumeric() || ch == '-' || ch == '_' {
                base.extend(ch.to_lowercase());
            }
        }
        if base.is_empty() {
            base.push_str("heading");
        }

        let mut slug = base.clone();
        let mut count = self.counts.get(&base).copied().unwrap_or(0);
        while count > 0 && self.counts.contains_key(&slug) {
            slug = format!("{base}-{count}");
            count += 1;
        }
        self.counts.insert(base, count.max(1));
        self.counts.entry(slug.clone()).or_insert(1);
        slug
    }

    /// Reserve an explicit id so generated slugs avoid it.
    pub fn reserve(&mut self, id: &str) {
        self.counts.entry(id.to_owned()).or_insert(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slug("Hello World"), "hello-world");
        assert_eq!(slugger.slug("What's new?"), "whats-new");
    }

    #[test]
    fn test_duplicates() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slug("Setup"), "setup");
        assert_eq!(slugger.slug("Setup"), "setup-1");
        assert_eq!(slugger.slug("Setup"), "setup-2");
    }

    #[test]
    fn test_unicode_kept() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slug("快速 开始"), "快速-开始");
        assert_eq!(slugger.slug("プラグイン開発"), "プラグイン開発");
    }

    #[test]
    fn test_reserved_id() {
        let mut slugger = Slugger::new();
        slugger.reserve("install");
        assert_eq!(slugger.slug("Install"), "install-1");
    }

    #[test]
    fn test_generated_suffix_collision() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slug("A 1"), "a-1");
        assert_eq!(slugger.slug("A"), "a");
        assert_eq!(slugger.slug("A"), "a-2");
    }

    #[test]
    fn test_empty_falls_back() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slug("!!!"), "heading");
    }
}
