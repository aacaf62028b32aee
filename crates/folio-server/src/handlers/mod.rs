//! HTTP request handlers.

pub(crate) mod markdown;
pub(crate) mod pages;
pub(crate) mod search;
pub(crate) mod tree;

/// Split a `/`-separated slug path, dropping empty segments.
pub(crate) fn split_slugs(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_slugs() {
        assert_eq!(split_slugs("a/b/"), vec!["a", "b"]);
        assert!(split_slugs("").is_empty());
    }
}
