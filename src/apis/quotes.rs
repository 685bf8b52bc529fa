use crate::app::ports::PageFetcher;
use crate::constants::QUOTES_BASE_URL;
use crate::error::Result;
use crate::observability::metrics::record_extracted;
use crate::parser::{parse_quotes, summarize_page, PageSummary, QuotePage};
use crate::types::Quote;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct QuotesCrawler {
    fetcher: Arc<dyn PageFetcher>,
    base_url: String,
}

impl QuotesCrawler {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self::with_base_url(fetcher, QUOTES_BASE_URL)
    }

    pub fn with_base_url(fetcher: Arc<dyn PageFetcher>, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Follows `/page/N/` until a page fails, comes back empty, has no next
    /// link, or `max_pages` have been read.
    #[instrument(skip(self))]
    pub async fn scrape(&self, max_pages: u32) -> Result<Vec<Quote>> {
        let mut all_quotes = Vec::new();

        for page_number in 1..=max_pages {
            let url = format!("{}/page/{}/", self.base_url, page_number);
            let page = self.fetcher.fetch(&url).await?;
            if !page.is_success() {
                warn!(status = page.status, "Failed to fetch page {}", page_number);
                break;
            }

            let QuotePage { quotes, has_next } = parse_quotes(&page.body)?;
            if quotes.is_empty() {
                info!("No more quotes found on page {}", page_number);
                break;
            }
            info!("Page {}: {} quotes", page_number, quotes.len());
            all_quotes.extend(quotes);

            if !has_next {
                info!("Reached last page");
                break;
            }
        }

        record_extracted("quote", all_quotes.len());
        Ok(all_quotes)
    }

    #[instrument(skip(self))]
    pub async fn selector_demo(&self) -> Result<PageSummary> {
        let page = self.fetcher.fetch(&self.base_url).await?;
        summarize_page(&page.body)
    }

    /// Status and parsed quotes of the home page, without pagination.
    pub async fn home(&self) -> Result<(u16, QuotePage)> {
        let page = self.fetcher.fetch(&self.base_url).await?;
        Ok((page.status, parse_quotes(&page.body)?))
    }
}
