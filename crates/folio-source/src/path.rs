//! Content path parsing: locale, folders and slugs.

use folio_config::{I18nConfig, LocaleParser};

/// Parsed location of a content file.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ContentPath<'a> {
    /// Locale of the file.
    pub locale: &'a str,
    /// Folder segments below the locale root.
    pub dirs: Vec<&'a str>,
    /// File stem without extension and locale suffix.
    pub stem: &'a str,
}

impl ContentPath<'_> {
    /// URL slugs: folders without `(group)` segments, then the stem unless it
    /// is `index`.
    pub fn slugs(&self) -> Vec<String> {
        let mut slugs: Vec<String> = self
            .dirs
            .iter()
            .filter(|d| !is_group_folder(d))
            .map(|d| (*d).to_owned())
            .collect();
        if self.stem != "index" {
            slugs.push(self.stem.to_owned());
        }
        slugs
    }
}

/// Parse a storage path (`en/guide/setup.mdx`, `guide/setup.zh.mdx`).
///
/// Returns `None` for files outside a locale directory in `dir` mode.
pub(crate) fn parse_content_path<'a>(
    path: &'a str,
    i18n: &'a I18nConfig,
) -> Option<ContentPath<'a>> {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let name = segments.pop()?;
    let (stem, _ext) = name.rsplit_once('.')?;

    match i18n.parser {
        LocaleParser::Dir => {
            if segments.is_empty() {
                return None;
            }
            let locale = segments.remove(0);
            i18n.is_supported(locale).then_some(ContentPath {
                locale,
                dirs: segments,
                stem,
            })
        }
        LocaleParser::Dot => {
            let (stem, locale) = match stem.rsplit_once('.') {
                Some((base, suffix)) if i18n.is_supported(suffix) => (base, suffix),
                _ => (stem, i18n.default_language.as_str()),
            };
            Some(ContentPath {
                locale,
                dirs: segments,
                stem,
            })
        }
    }
}

/// `(group)` folders organize files without adding a URL segment.
pub(crate) fn is_group_folder(name: &str) -> bool {
    name.len() > 2 && name.starts_with('(') && name.ends_with(')')
}

/// `getting-started` becomes `Getting Started`.
pub(crate) fn title_case(name: &str) -> String {
    name.trim_matches(|c| c == '(' || c == ')')
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
