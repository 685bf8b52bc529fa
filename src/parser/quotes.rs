use super::selectors::{all_texts, first_text, selector};
use crate::error::Result;
use crate::types::Quote;
use scraper::Html;

/// Quotes found on one listing page, and whether a next page is linked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuotePage {
    pub quotes: Vec<Quote>,
    pub has_next: bool,
}

pub fn parse_quotes(html: &str) -> Result<QuotePage> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let container = selector("div.quote")?;
    let text = selector("span.text")?;
    let author = selector("small.author")?;
    let tag = selector("a.tag")?;
    let next = selector("li.next a")?;

    let quotes = root
        .select(&container)
        .map(|el| Quote {
            text: first_text(el, &text),
            author: first_text(el, &author),
            tags: all_texts(el, &tag),
        })
        .collect();

    Ok(QuotePage {
        quotes,
        has_next: root.select(&next).next().is_some(),
    })
}
