use crate::error::{Result, ScraperError};
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| ScraperError::Selector(css.to_string()))
}

/// Whitespace-trimmed text of an element and its descendants.
pub fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Text of the first match under `el`, or `""` when nothing matches.
pub fn first_text(el: ElementRef<'_>, sel: &Selector) -> String {
    el.select(sel).next().map(element_text).unwrap_or_default()
}

/// Attribute of the first match under `el`, or `""` when the element or
/// attribute is absent.
pub fn first_attr(el: ElementRef<'_>, sel: &Selector, attr: &str) -> String {
    el.select(sel)
        .next()
        .and_then(|m| m.value().attr(attr))
        .unwrap_or_default()
        .to_string()
}

pub fn all_texts(el: ElementRef<'_>, sel: &Selector) -> Vec<String> {
    el.select(sel).map(element_text).collect()
}

/// A handful of facts about a page, pulled with the selector helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub title: String,
    pub first_quote: String,
    pub first_link_href: String,
    pub quote_count: usize,
    pub link_count: usize,
}

pub fn summarize_page(html: &str) -> Result<PageSummary> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let title = selector("title")?;
    let quote_text = selector("span.text")?;
    let link = selector("a")?;

    let first_link_href = match first_attr(root, &link, "href") {
        href if href.is_empty() => "N/A".to_string(),
        href => href,
    };

    Ok(PageSummary {
        title: first_text(root, &title),
        first_quote: first_text(root, &quote_text),
        first_link_href,
        quote_count: root.select(&quote_text).count(),
        link_count: root.select(&link).count(),
    })
}
