// src/fetch/context.rs
// =============================================================================
// This module builds the DocumentContext a checker works against.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Besides the tree we keep the raw markup (some heuristics grep it directly)
// and a plain-text sample capped at TEXT_SAMPLE_CAP characters, so the text
// heuristics never cost more than a bounded amount of work.
// =============================================================================

use crate::config::TEXT_SAMPLE_CAP;
use crate::error::{EngineError, EngineResult};
use scraper::{ElementRef, Html, Selector};

// Elements whose text content never reaches a reader
const NON_RENDERED: &[&str] = &["script", "style", "noscript", "template"];

/// Parsed markup plus a bounded text sample, scoped to one checker call
pub struct DocumentContext {
    markup: String,
    document: Html,
    text_sample: String,
}

impl DocumentContext {
    /// Parses markup into a context
    ///
    /// Returns a parse error for an empty document; html5ever itself
    /// recovers from any malformed markup.
    pub fn parse(markup: impl Into<String>) -> EngineResult<Self> {
        let markup = markup.into();
        if markup.trim().is_empty() {
            return Err(EngineError::parse("empty document"));
        }

        let document = Html::parse_document(&markup);
        let text_sample = extract_text_sample(&document);

        Ok(DocumentContext {
            markup,
            document,
            text_sample,
        })
    }

    /// The markup exactly as fetched
    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Whitespace-collapsed visible text, at most TEXT_SAMPLE_CAP characters
    pub fn text_sample(&self) -> &str {
        &self.text_sample
    }

    /// All elements matching a CSS selector, in document order
    pub fn select(&self, css: &str) -> EngineResult<Vec<ElementRef<'_>>> {
        let selector = selector(css)?;
        Ok(self.document.select(&selector).collect())
    }

    /// True if at least one element matches
    pub fn exists(&self, css: &str) -> EngineResult<bool> {
        let selector = selector(css)?;
        let found = self.document.select(&selector).next().is_some();
        Ok(found)
    }
}

/// Compiles a CSS selector, reporting failures as engine errors
///
/// Our selectors are constants, so a failure here is a programming error;
/// it still degrades the report instead of panicking.
pub fn selector(css: &str) -> EngineResult<Selector> {
    Selector::parse(css)
        .map_err(|e| EngineError::Unclassified(format!("invalid selector '{}': {}", css, e)))
}

// Collects rendered text nodes, collapses whitespace and truncates
fn extract_text_sample(document: &Html) -> String {
    let mut pieces: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let text = match node.value().as_text() {
            Some(text) => text,
            None => continue,
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|el| NON_RENDERED.contains(&el.name()))
                .unwrap_or(false)
        });

        if !hidden {
            pieces.push(&**text);
        }
    }

    let collapsed = pieces
        .iter()
        .flat_map(|piece| piece.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ");

    collapsed.chars().take(TEXT_SAMPLE_CAP).collect()
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why keep the raw markup around?
//    - Some signals are cheaper (and more forgiving) to grep than to query,
//      e.g. setTimeout( calls inside inline scripts or an SSML <phoneme> tag
//
// 2. Why chars().take() and not slicing?
//    - Slicing a String by byte index panics in the middle of a multi-byte
//      character; take() counts characters
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_markup_is_parse_error() {
        let err = DocumentContext::parse("   \n ").err().unwrap();
        assert!(matches!(err, EngineError::Parse { .. }));
    }

    #[test]
    fn test_text_sample_collapses_whitespace_and_skips_scripts() {
        let html = r#"
            <html><head><style>body { color: red; }</style></head>
            <body>
                <h1>Hello
                    world</h1>
                <script>var hidden = "not text";</script>
                <p>Second   paragraph</p>
            </body></html>
        "#;
        let ctx = DocumentContext::parse(html).unwrap();
        assert_eq!(ctx.text_sample(), "Hello world Second paragraph");
    }

    #[test]
    fn test_text_sample_is_capped() {
        let body = "word ".repeat(5_000);
        let html = format!("<html><body><p>{}</p></body></html>", body);
        let ctx = DocumentContext::parse(html).unwrap();
        assert_eq!(ctx.text_sample().chars().count(), TEXT_SAMPLE_CAP);
    }

    #[test]
    fn test_select_and_exists() {
        let ctx = DocumentContext::parse(r#"<nav><a href="/">Home</a></nav>"#).unwrap();
        assert!(ctx.exists("nav").unwrap());
        assert!(!ctx.exists("marquee").unwrap());
        assert_eq!(ctx.select("a[href]").unwrap().len(), 1);
    }

    #[test]
    fn test_bad_selector_is_unclassified() {
        let ctx = DocumentContext::parse("<p>hi</p>").unwrap();
        let err = ctx.select("a[").err().unwrap();
        assert!(matches!(err, EngineError::Unclassified(_)));
    }
}
