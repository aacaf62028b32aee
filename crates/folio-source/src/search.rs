//! Full-text search over page titles, headings and paragraphs.

use std::collections::HashSet;

use folio_renderer::Slugger;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;

/// Default number of pages returned by a search.
pub const DEFAULT_LIMIT: usize = 10;

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

const MANDARIN_STOP_WORDS: &[&str] = &[
    "的", "了", "和", "是", "在", "我", "有", "就", "不", "人", "都", "一", "也", "很", "到", "说",
    "要", "去", "你", "会", "着", "看", "好", "这", "那", "与", "及", "或", "等",
];

const JAPANESE_STOP_WORDS: &[&str] = &[
    "の", "に", "は", "を", "た", "が", "で", "て", "と", "し", "れ", "さ", "も", "な", "か", "だ",
    "へ", "や", "ます", "です", "する", "ある", "いる", "こと", "これ", "それ", "この", "その",
];

/// Tokenizer selected per locale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tokenizer {
    /// Lower-cased alphanumeric words, prefix match on the last query term,
    /// any term may match.
    #[default]
    Default,
    /// CJK bigrams with Mandarin stop words; every query token must match.
    Mandarin,
    /// CJK bigrams with Japanese stop words; every query token must match.
    Japanese,
}

impl Tokenizer {
    /// Look up a tokenizer by configuration name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "default" | "english" => Some(Self::Default),
            "mandarin" | "chinese" => Some(Self::Mandarin),
            "japanese" => Some(Self::Japanese),
            _ => None,
        }
    }

    fn stop_words(self) -> &'static [&'static str] {
        match self {
            Self::Default => ENGLISH_STOP_WORDS,
            Self::Mandarin => MANDARIN_STOP_WORDS,
            Self::Japanese => JAPANESE_STOP_WORDS,
        }
    }

    fn requires_all(self) -> bool {
        self != Self::Default
    }

    /// Split text into search tokens.
    #[must_use]
    pub fn tokenize(self, text: &str) -> Vec<String> {
        let stop = self.stop_words();
        let mut tokens = Vec::new();
        let mut word = String::new();
        let mut run: Vec<char> = Vec::new();

        let flush_word = |word: &mut String, tokens: &mut Vec<String>| {
            if !word.is_empty() {
                let token = std::mem::take(word).to_lowercase();
                if !ENGLISH_STOP_WORDS.contains(&token.as_str()) {
                    tokens.push(token);
                }
            }
        };
        let flush_run = |run: &mut Vec<char>, tokens: &mut Vec<String>| {
            let chars: Vec<char> = std::mem::take(run)
                .into_iter()
                .filter(|c| !stop.contains(&c.to_string().as_str()))
                .collect();
            match chars.len() {
                0 => {}
                1 => tokens.push(chars[0].to_string()),
                _ => tokens.extend(chars.windows(2).map(|pair| pair.iter().collect::<String>())),
            }
        };

        for ch in text.chars() {
            if self != Self::Default && is_cjk(ch) {
                flush_word(&mut word, &mut tokens);
                run.push(ch);
            } else if ch.is_alphanumeric() {
                flush_run(&mut run, &mut tokens);
                word.push(ch);
            } else {
                flush_word(&mut word, &mut tokens);
                flush_run(&mut run, &mut tokens);
            }
        }
        flush_word(&mut word, &mut tokens);
        flush_run(&mut run, &mut tokens);

        tokens.retain(|t| !stop.contains(&t.as_str()));
        tokens
    }
}

fn is_cjk(ch: char) -> bool {
    matches!(ch,
        '\u{3040}'..='\u{30ff}'
        | '\u{3400}'..='\u{4dbf}'
        | '\u{4e00}'..='\u{9fff}'
        | '\u{f900}'..='\u{faff}'
        | '\u{ff66}'..='\u{ff9f}')
}

/// Kind of an indexed document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    /// Page title.
    Page,
    /// Section heading.
    Heading,
    /// Paragraph-level text.
    Text,
}

impl DocKind {
    fn weight(self) -> usize {
        match self {
            Self::Page => 3,
            Self::Heading => 2,
            Self::Text => 1,
        }
    }
}

/// One search hit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Document id.
    pub id: String,
    /// Target URL.
    pub url: String,
    /// Document kind.
    #[serde(rename = "type")]
    pub kind: DocKind,
    /// Matched text.
    pub content: String,
}

#[derive(Debug)]
struct SearchDoc {
    result: SearchResult,
    tokens: HashSet<String>,
}

#[derive(Debug)]
struct PageDocs {
    title: SearchDoc,
    entries: Vec<SearchDoc>,
}

/// Search index of one locale.
#[derive(Debug, Default)]
pub struct SearchIndex {
    tokenizer: Tokenizer,
    pages: Vec<PageDocs>,
}

impl SearchIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            pages: Vec::new(),
        }
    }

    /// Index a page from its title and processed markdown.
    pub fn add_page(&mut self, url: &str, title: &str, markdown: &str) {
        let title_doc = self.doc(SearchResult {
            id: url.to_owned(),
            url: url.to_owned(),
            kind: DocKind::Page,
            content: title.to_owned(),
        });
        let entries = extract(url, markdown)
            .into_iter()
            .map(|result| self.doc(result))
            .collect();
        self.pages.push(PageDocs {
            title: title_doc,
            entries,
        });
    }

    fn doc(&self, result: SearchResult) -> SearchDoc {
        SearchDoc {
            tokens: self.tokenizer.tokenize(&result.content).into_iter().collect(),
            result,
        }
    }

    /// Number of indexed pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no page is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Search; results are grouped per page, page entry first.
    #[must_use]
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        let terms = self.tokenizer.tokenize(query);
        if terms.is_empty() {
            return Vec::new();
        }
        // Prefix matching applies to the term still being typed.
        let prefix = (self.tokenizer == Tokenizer::Default && !query.ends_with(char::is_whitespace))
            .then(|| terms.len() - 1);

        let mut hits: Vec<(usize, usize, Vec<&SearchResult>)> = Vec::new();
        for (order, page) in self.pages.iter().enumerate() {
            let title_score = self.score(&page.title, &terms, prefix);
            let entries: Vec<(usize, &SearchDoc)> = page
                .entries
                .iter()
                .map(|doc| (self.score(doc, &terms, prefix), doc))
                .filter(|(score, _)| *score > 0)
                .collect();
            if title_score == 0 && entries.is_empty() {
                continue;
            }
            let score = title_score * DocKind::Page.weight()
                + entries
                    .iter()
                    .map(|(s, doc)| s * doc.result.kind.weight())
                    .sum::<usize>();
            let mut results = vec![&page.title.result];
            results.extend(entries.into_iter().map(|(_, doc)| &doc.result));
            hits.push((score, order, results));
        }

        hits.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        hits.into_iter()
            .take(limit)
            .flat_map(|(_, _, results)| results.into_iter().cloned())
            .collect()
    }

    /// Number of matched terms, or 0 if the document does not match.
    fn score(&self, doc: &SearchDoc, terms: &[String], prefix: Option<usize>) -> usize {
        let matched = terms
            .iter()
            .enumerate()
            .filter(|(i, term)| {
                doc.tokens.contains(term.as_str())
                    || (Some(*i) == prefix && doc.tokens.iter().any(|t| t.starts_with(term.as_str())))
            })
            .count();
        if self.tokenizer.requires_all() && matched < terms.len() {
            0
        } else {
            matched
        }
    }
}

/// Heading and text documents of a page body.
fn extract(url: &str, markdown: &str) -> Vec<SearchResult> {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES;
    let mut slugger = Slugger::new();
    let mut docs = Vec::new();
    let mut anchor = url.to_owned();
    let mut text = String::new();
    let mut heading: Option<Option<String>> = None;
    let mut in_code = false;
    let mut counter = 0usize;

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::Heading { id, .. }) => {
                flush_text(&mut text, &anchor, url, &mut counter, &mut docs);
                heading = Some(id.map(CowStr::into_string));
            }
            Event::End(TagEnd::Heading(_)) => {
                let content = normalize(&std::mem::take(&mut text));
                let id = match heading.take().flatten() {
                    Some(id) => {
                        slugger.reserve(&id);
                        id
                    }
                    None => slugger.slug(&content),
                };
                anchor = format!("{url}#{id}");
                if !content.is_empty() {
                    docs.push(SearchResult {
                        id: anchor.clone(),
                        url: anchor.clone(),
                        kind: DocKind::Heading,
                        content,
                    });
                }
            }
            Event::Start(Tag::CodeBlock(_)) => in_code = true,
            Event::End(TagEnd::CodeBlock) => in_code = false,
            Event::End(TagEnd::Paragraph | TagEnd::Item | TagEnd::TableCell) => {
                if heading.is_none() {
                    flush_text(&mut text, &anchor, url, &mut counter, &mut docs);
                }
            }
            Event::Text(t) | Event::Code(t) if !in_code => {
                text.push_str(&t);
            }
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    flush_text(&mut text, &anchor, url, &mut counter, &mut docs);
    docs
}

fn flush_text(
    text: &mut String,
    anchor: &str,
    url: &str,
    counter: &mut usize,
    docs: &mut Vec<SearchResult>,
) {
    let content = normalize(&std::mem::take(text));
    if content.is_empty() {
        return;
    }
    *counter += 1;
    docs.push(SearchResult {
        id: format!("{url}-{counter}"),
        url: anchor.to_owned(),
        kind: DocKind::Text,
        content,
    });
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const BODY: &str = "Intro paragraph about installing.\n\n## Install {#setup}\n\nRun the installer.\n\n```bash\ninstaller --secret\n```\n\n## Configure\n\nEdit the file.\n";

    fn index() -> SearchIndex {
        let mut index = SearchIndex::new(Tokenizer::Default);
        index.add_page("/en/guide", "Guide", BODY);
        index.add_page("/en/install", "Installation", "Nothing else here.\n");
        index
    }

    #[test]
    fn test_extract() {
        let docs = extract("/en/guide", BODY);
        let summary: Vec<_> = docs
            .iter()
            .map(|d| (d.kind, d.url.as_str(), d.content.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (DocKind::Text, "/en/guide", "Intro paragraph about installing."),
                (DocKind::Heading, "/en/guide#setup", "Install"),
                (DocKind::Text, "/en/guide#setup", "Run the installer."),
                (DocKind::Heading, "/en/guide#configure", "Configure"),
                (DocKind::Text, "/en/guide#configure", "Edit the file."),
            ]
        );
    }

    #[test]
    fn test_default_tokenizer() {
        assert_eq!(
            Tokenizer::Default.tokenize("The Quick-start, for v2!"),
            vec!["quick", "start", "v2"]
        );
    }

    #[test]
    fn test_cjk_bigrams() {
        assert_eq!(
            Tokenizer::Mandarin.tokenize("安装指南 API"),
            vec!["安装", "装指", "指南", "api"]
        );
        assert_eq!(Tokenizer::Japanese.tokenize("設定"), vec!["設定"]);
    }

    #[test]
    fn test_search_groups_by_page() {
        let results = index().search("install", 10);
        let urls: Vec<_> = results.iter().map(|r| (r.kind, r.url.as_str())).collect();
        assert_eq!(
            urls,
            vec![
                (DocKind::Page, "/en/guide"),
                (DocKind::Text, "/en/guide"),
                (DocKind::Heading, "/en/guide#setup"),
                (DocKind::Text, "/en/guide#setup"),
                (DocKind::Page, "/en/install"),
            ]
        );
    }

    #[test]
    fn test_prefix_match_on_last_term() {
        let results = index().search("instal", 10);
        assert_eq!(results[0].url, "/en/guide");
        assert!(index().search("instal ", 10).is_empty());
    }

    #[test]
    fn test_code_is_not_indexed() {
        assert!(index().search("secret", 10).is_empty());
    }

    #[test]
    fn test_empty_query_and_limit() {
        assert!(index().search("", 10).is_empty());
        assert!(index().search("the", 10).is_empty());
        let results = index().search("install", 1);
        assert!(results.iter().all(|r| r.url.starts_with("/en/guide")));
    }

    #[test]
    fn test_cjk_requires_every_token() {
        let mut index = SearchIndex::new(Tokenizer::Mandarin);
        index.add_page("/zh/a", "安装指南", "");
        index.add_page("/zh/b", "安装", "");
        let urls: Vec<_> = index
            .search("安装指南", 10)
            .into_iter()
            .map(|r| r.url)
            .collect();
        assert_eq!(urls, vec!["/zh/a"]);
        assert_eq!(index.search("安装", 10).len(), 2);
    }

    #[test]
    fn test_result_json() {
        let results = index().search("configure", 10);
        let json = serde_json::to_value(&results[1]).unwrap();
        assert_eq!(json["type"], "heading");
        assert_eq!(json["url"], "/en/guide#configure");
    }
}
