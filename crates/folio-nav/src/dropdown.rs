//! Dropdown label to directory name mapping.

use std::collections::{BTreeMap, HashMap};

/// Localized dropdown labels (lower-cased) and their directories.
const BUILTIN_DIRS: &[(&str, &str)] = &[
    ("use dify", "use-dify"),
    ("使用 dify", "use-dify"),
    ("dify を使う", "use-dify"),
    ("self host", "self-host"),
    ("自托管", "self-host"),
    ("セルフホスト", "self-host"),
    ("develop plugin", "develop-plugin"),
    ("开发插件", "develop-plugin"),
    ("プラグイン開発", "develop-plugin"),
    ("api reference", "api-reference"),
    ("api 参考", "api-reference"),
    ("api リファレンス", "api-reference"),
];

/// Maps dropdown labels to content directory names.
///
/// Labels are matched exactly after lower-casing; unknown labels become a
/// slug with whitespace runs replaced by `-`.
#[derive(Clone, Debug)]
pub struct DropdownDirs {
    dirs: HashMap<String, String>,
}

impl Default for DropdownDirs {
    fn default() -> Self {
        Self::new(&BTreeMap::new())
    }
}

impl DropdownDirs {
    /// Built-in table plus `extra` aliases (which win).
    #[must_use]
    pub fn new(extra: &BTreeMap<String, String>) -> Self {
        let mut dirs: HashMap<String, String> = BUILTIN_DIRS
            .iter()
            .map(|&(label, dir)| (label.to_owned(), dir.to_owned()))
            .collect();
        dirs.extend(extra.iter().map(|(k, v)| (k.to_lowercase(), v.clone())));
        Self { dirs }
    }

    /// Directory name for a dropdown label.
    #[must_use]
    pub fn resolve(&self, label: &str) -> String {
        let lower = label.to_lowercase();
        if let Some(dir) = self.dirs.get(&lower) {
            return dir.clone();
        }
        lower.split_whitespace().collect::<Vec<_>>().join("-")
    }
}
