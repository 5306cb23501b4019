//! Quote extraction from listing pages
//!
//! A listing page holds a sequence of quote blocks:
//!
//! ```html
//! <div class="quote">
//!     <span class="text">“…”</span>
//!     <span>by <small class="author">Name</small></span>
//!     <div class="tags"><a class="tag" href="…">tag</a> …</div>
//! </div>
//! ```
//!
//! Extraction is pure: no filtering and no deduplication happen here.

use crate::storage::Record;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

const QUOTE_SELECTOR: &str = "div.quote";
const TEXT_SELECTOR: &str = "span.text";
const AUTHOR_SELECTOR: &str = "small.author";
const TAG_SELECTOR: &str = "div.tags a.tag";

/// A page whose structure does not match the quote layout
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("quote #{index} has no {element} element")]
    MissingElement { index: usize, element: &'static str },

    #[error("invalid selector '{selector}': {message}")]
    Selector {
        selector: &'static str,
        message: String,
    },
}

/// Raw fields of one quote block, in page order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawQuote {
    pub text: String,
    pub author: String,
    pub tags: Vec<String>,
}

impl From<RawQuote> for Record {
    fn from(raw: RawQuote) -> Self {
        Record::new(&raw.text, &raw.author, raw.tags)
    }
}

fn selector(css: &'static str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|e| ExtractionError::Selector {
        selector: css,
        message: e.to_string(),
    })
}

/// Collects the trimmed text content of an element
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parses every quote block of a page into raw field triples
///
/// A block without a text or author element fails the whole page. A block
/// without tags yields an empty tag list.
///
/// # Example
///
/// ```
/// use quote_sieve::crawler::parse_quotes;
///
/// let html = r#"<div class="quote">
///     <span class="text">“Hello.”</span>
///     <small class="author">Anon</small>
///     <div class="tags"><a class="tag">greeting</a></div>
/// </div>"#;
/// let quotes = parse_quotes(html).unwrap();
/// assert_eq!(quotes[0].author, "Anon");
/// assert_eq!(quotes[0].tags, vec!["greeting"]);
/// ```
pub fn parse_quotes(html: &str) -> Result<Vec<RawQuote>, ExtractionError> {
    let document = Html::parse_document(html);

    let quote_selector = selector(QUOTE_SELECTOR)?;
    let text_selector = selector(TEXT_SELECTOR)?;
    let author_selector = selector(AUTHOR_SELECTOR)?;
    let tag_selector = selector(TAG_SELECTOR)?;

    let mut quotes = Vec::new();

    for (index, block) in document.select(&quote_selector).enumerate() {
        let text = block
            .select(&text_selector)
            .next()
            .map(element_text)
            .ok_or(ExtractionError::MissingElement {
                index,
                element: TEXT_SELECTOR,
            })?;

        let author = block
            .select(&author_selector)
            .next()
            .map(element_text)
            .ok_or(ExtractionError::MissingElement {
                index,
                element: AUTHOR_SELECTOR,
            })?;

        let tags = block.select(&tag_selector).map(element_text).collect();

        quotes.push(RawQuote { text, author, tags });
    }

    Ok(quotes)
}

/// Extracts the page's quotes as records, in page order
pub fn extract_records(html: &str) -> Result<Vec<Record>, ExtractionError> {
    Ok(parse_quotes(html)?.into_iter().map(Record::from).collect())
}
