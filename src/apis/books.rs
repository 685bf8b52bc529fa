use crate::app::ports::PageFetcher;
use crate::constants::BOOKS_BASE_URL;
use crate::error::Result;
use crate::observability::metrics::record_extracted;
use crate::parser::parse_books;
use crate::types::Book;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct BooksCrawler {
    fetcher: Arc<dyn PageFetcher>,
    base_url: String,
}

impl BooksCrawler {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self::with_base_url(fetcher, BOOKS_BASE_URL)
    }

    pub fn with_base_url(fetcher: Arc<dyn PageFetcher>, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn page_url(&self, page_number: u32) -> String {
        if page_number <= 1 {
            format!("{}/index.html", self.base_url)
        } else {
            format!("{}/catalogue/page-{}.html", self.base_url, page_number)
        }
    }

    /// Reads catalogue pages 1..=max_pages. Pages that fail are skipped.
    #[instrument(skip(self))]
    pub async fn scrape(&self, max_pages: u32) -> Result<Vec<Book>> {
        let mut all_books = Vec::new();
        for page_number in 1..=max_pages {
            info!("Scraping page {}...", page_number);
            let page = self.fetcher.fetch(&self.page_url(page_number)).await?;
            if !page.is_success() {
                warn!(status = page.status, "Failed to fetch page {}", page_number);
                continue;
            }
            all_books.extend(parse_books(&page.body, Utc::now())?);
        }
        info!("Scraped {} books", all_books.len());
        record_extracted("book", all_books.len());
        Ok(all_books)
    }

    /// Status and the first `limit` books of the store front.
    pub async fn preview(&self, limit: usize) -> Result<(u16, Vec<Book>)> {
        let page = self.fetcher.fetch(&self.base_url).await?;
        let mut books = parse_books(&page.body, Utc::now())?;
        books.truncate(limit);
        Ok((page.status, books))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::Page;
    use crate::infra::StaticFetcher;

    fn catalogue(title: &str, price: &str) -> String {
        format!(
            r#"<article class="product_pod"><p class="star-rating Two"></p>
               <h3><a href="x.html" title="{title}">{title}</a></h3>
               <p class="price_color">£{price}</p></article>"#
        )
    }

    #[test]
    fn test_page_urls() {
        let crawler =
            BooksCrawler::with_base_url(Arc::new(StaticFetcher::new()), "https://books.test/");
        assert_eq!(crawler.page_url(1), "https://books.test/index.html");
        assert_eq!(crawler.page_url(3), "https://books.test/catalogue/page-3.html");
    }

    #[tokio::test]
    async fn test_failed_pages_are_skipped() {
        let fetcher = StaticFetcher::new()
            .with_page("https://books.test/index.html", &catalogue("One", "10.00"))
            .with_response(
                "https://books.test/catalogue/page-2.html",
                Page::new(503, "https://books.test/catalogue/page-2.html", ""),
            )
            .with_page("https://books.test/catalogue/page-3.html", &catalogue("Three", "30.50"));
        let crawler = BooksCrawler::with_base_url(Arc::new(fetcher), "https://books.test");

        let books = crawler.scrape(3).await.unwrap();
        let titles: Vec<_> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Three"]);
        assert_eq!(books[1].price, 30.5);
    }
}
