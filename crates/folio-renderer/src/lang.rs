//! Code fence language aliases.

use std::collections::{BTreeMap, HashMap};

/// Built-in aliases for language names found in legacy content.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    // Capitalised names
    ("YAML", "yaml"),
    ("JSON", "json"),
    ("Python", "python"),
    ("Bash", "bash"),
    ("Shell", "shell"),
    ("JavaScript", "javascript"),
    ("TypeScript", "typescript"),
    ("SQL", "sql"),
    ("HTML", "html"),
    ("CSS", "css"),
    ("XML", "xml"),
    // Short names
    ("py", "python"),
    ("sh", "bash"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("yml", "yaml"),
    // Languages without a highlighter of their own
    ("jinja2", "jinja"),
    ("jinja", "html"),
    ("curl", "bash"),
    ("env", "bash"),
    ("dotenv", "bash"),
    ("plaintext", "text"),
    ("txt", "text"),
];

/// Resolves code fence language names.
///
/// Aliases are applied once (`jinja2` becomes `jinja`, not `html`).
#[derive(Clone, Debug)]
pub struct LangAliases {
    aliases: HashMap<String, String>,
    default_language: String,
}

impl Default for LangAliases {
    fn default() -> Self {
        Self::new("text", &BTreeMap::new())
    }
}

impl LangAliases {
    /// Create the alias table from the built-ins plus `extra` (which wins).
    #[must_use]
    pub fn new(default_language: &str, extra: &BTreeMap<String, String>) -> Self {
        let mut aliases: HashMap<String, String> = BUILTIN_ALIASES
            .iter()
            .map(|&(from, to)| (from.to_owned(), to.to_owned()))
            .collect();
        aliases.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self {
            aliases,
            default_language: default_language.to_owned(),
        }
    }

    /// Resolve a fence language; empty resolves to the default language.
    #[must_use]
    pub fn resolve<'a>(&'a self, lang: &'a str) -> &'a str {
        if lang.is_empty() {
            return &self.default_language;
        }
        self.aliases.get(lang).map_or(lang, String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_aliases() {
        let langs = LangAliases::default();
        assert_eq!(langs.resolve("YAML"), "yaml");
        assert_eq!(langs.resolve("py"), "python");
        assert_eq!(langs.resolve("curl"), "bash");
        assert_eq!(langs.resolve("jinja2"), "jinja");
        assert_eq!(langs.resolve("jinja"), "html");
        assert_eq!(langs.resolve("txt"), "text");
    }

    #[test]
    fn test_unknown_and_empty() {
        let langs = LangAliases::default();
        assert_eq!(langs.resolve("rust"), "rust");
        assert_eq!(langs.resolve(""), "text");
    }

    #[test]
    fn test_extra_overrides() {
        let extra = BTreeMap::from([
            ("tsx".to_owned(), "typescript".to_owned()),
            ("jinja".to_owned(), "django".to_owned()),
        ]);
        let langs = LangAliases::new("plain", &extra);
        assert_eq!(langs.resolve("tsx"), "typescript");
        assert_eq!(langs.resolve("jinja"), "django");
        assert_eq!(langs.resolve(""), "plain");
    }
}
