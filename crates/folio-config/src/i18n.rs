//! Locale registry.
//!
//! Declares the supported locales, the default locale and how a locale is
//! derived from a content path:
//!
//! - [`LocaleParser::Dir`]: first path segment (`zh/guide/setup.mdx`)
//! - [`LocaleParser::Dot`]: file-name suffix (`guide/setup.zh.mdx`)

use std::collections::HashSet;

use serde::Deserialize;

use crate::ConfigError;

/// How the locale of a content file is determined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocaleParser {
    /// Locale is the first directory below the content root.
    #[default]
    Dir,
    /// Locale is a suffix of the file stem (`page.zh.mdx`, `meta.zh.json`).
    Dot,
}

/// A supported locale.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Locale {
    /// Locale code used in URLs and directory names (e.g. "en").
    pub locale: String,
    /// Display name for the locale switcher (e.g. "English").
    pub name: String,
}

impl Locale {
    fn new(locale: &str, name: &str) -> Self {
        Self {
            locale: locale.to_owned(),
            name: name.to_owned(),
        }
    }
}

/// Internationalization configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Locale used when a request or file carries none.
    pub default_language: String,
    /// Supported locales, in display order.
    pub languages: Vec<Locale>,
    /// Locale parser mode.
    pub parser: LocaleParser,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_language: "en".to_owned(),
            languages: vec![
                Locale::new("en", "English"),
                Locale::new("zh", "简体中文"),
                Locale::new("ja", "日本語"),
            ],
            parser: LocaleParser::Dir,
        }
    }
}

impl I18nConfig {
    /// Check whether a locale code is supported.
    #[must_use]
    pub fn is_supported(&self, code: &str) -> bool {
        self.languages.iter().any(|l| l.locale == code)
    }

    /// Iterate supported locale codes in declaration order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(|l| l.locale.as_str())
    }

    /// Look up a locale by code.
    #[must_use]
    pub fn locale(&self, code: &str) -> Option<&Locale> {
        self.languages.iter().find(|l| l.locale == code)
    }

    /// Resolve a requested locale.
    ///
    /// `None` resolves to the default locale; an unsupported code resolves
    /// to `None`.
    #[must_use]
    pub fn resolve<'a>(&'a self, code: Option<&'a str>) -> Option<&'a str> {
        match code {
            None => Some(self.default_language.as_str()),
            Some(code) if self.is_supported(code) => Some(code),
            Some(_) => None,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.languages.is_empty() {
            return Err(ConfigError::Validation(
                "i18n.languages must list at least one locale".to_owned(),
            ));
        }

        let mut seen = HashSet::new();
        for locale in &self.languages {
            if locale.locale.is_empty() || locale.locale.contains('/') {
                return Err(ConfigError::Validation(format!(
                    "i18n.languages: invalid locale code '{}'",
                    locale.locale
                )));
            }
            if !seen.insert(locale.locale.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "i18n.languages: duplicate locale '{}'",
                    locale.locale
                )));
            }
        }

        if !self.is_supported(&self.default_language) {
            return Err(ConfigError::Validation(format!(
                "i18n.default_language '{}' is not listed in i18n.languages",
                self.default_language
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locales() {
        let i18n = I18nConfig::default();
        assert_eq!(i18n.default_language, "en");
        assert_eq!(i18n.codes().collect::<Vec<_>>(), vec!["en", "zh", "ja"]);
        assert_eq!(i18n.locale("zh").unwrap().name, "简体中文");
        assert_eq!(i18n.parser, LocaleParser::Dir);
    }

    #[test]
    fn test_resolve() {
        let i18n = I18nConfig::default();
        assert_eq!(i18n.resolve(None), Some("en"));
        assert_eq!(i18n.resolve(Some("ja")), Some("ja"));
        assert_eq!(i18n.resolve(Some("fr")), None);
    }

    #[test]
    fn test_validate_default_passes() {
        assert!(I18nConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_default() {
        let i18n = I18nConfig {
            default_language: "fr".to_owned(),
            ..I18nConfig::default()
        };
        let err = i18n.validate().unwrap_err();
        assert!(err.to_string().contains("default_language"));
    }

    #[test]
    fn test_validate_duplicate_locale() {
        let i18n = I18nConfig {
            languages: vec![Locale::new("en", "English"), Locale::new("en", "Again")],
            ..I18nConfig::default()
        };
        let err = i18n.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_validate_empty_languages() {
        let i18n = I18nConfig {
            languages: Vec::new(),
            ..I18nConfig::default()
        };
        assert!(i18n.validate().is_err());
    }

    #[test]
    fn test_parse_dot_parser() {
        let i18n: I18nConfig = toml::from_str("parser = \"dot\"").unwrap();
        assert_eq!(i18n.parser, LocaleParser::Dot);
        assert_eq!(i18n.default_language, "en");
    }
}
