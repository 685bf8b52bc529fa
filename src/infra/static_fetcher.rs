use crate::app::ports::{Page, PageFetcher};
use crate::error::{Result, ScraperError};
use async_trait::async_trait;
use std::sync::Mutex;

/// Serves canned pages keyed by URL prefix. Used to drive crawlers and
/// dashboards without touching the network.
///
/// The longest matching prefix wins. Unmatched URLs get a 404 page unless
/// the fetcher was built with `failing()`, in which case they error.
#[derive(Default)]
pub struct StaticFetcher {
    routes: Vec<(String, Page)>,
    fail_unmatched: bool,
    requested: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_unmatched: true,
            ..Self::default()
        }
    }

    /// Registers a 200 page whose final URL equals the prefix.
    pub fn with_page(self, prefix: &str, body: &str) -> Self {
        self.with_response(prefix, Page::new(200, prefix, body))
    }

    pub fn with_response(mut self, prefix: &str, page: Page) -> Self {
        self.routes.push((prefix.to_string(), page));
        self
    }

    /// URLs requested so far, in order.
    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .map(|urls| urls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Page> {
        if let Ok(mut urls) = self.requested.lock() {
            urls.push(url.to_string());
        }
        let best = self
            .routes
            .iter()
            .filter(|(prefix, _)| url.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len());
        match best {
            Some((_, page)) => Ok(page.clone()),
            None if self.fail_unmatched => Err(ScraperError::Api {
                message: format!("connection refused: {url}"),
            }),
            None => Ok(Page::new(404, url, "")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_longest_prefix_wins() {
        let fetcher = StaticFetcher::new()
            .with_page("https://a.test/", "root")
            .with_page("https://a.test/page/2/", "two");
        assert_eq!(fetcher.fetch("https://a.test/page/2/").await.unwrap().body, "two");
        assert_eq!(fetcher.fetch("https://a.test/page/3/").await.unwrap().body, "root");
        assert_eq!(fetcher.requested().len(), 2);
    }

    #[tokio::test]
    async fn test_unmatched_urls() {
        let lenient = StaticFetcher::new();
        assert_eq!(lenient.fetch("https://x.test/").await.unwrap().status, 404);
        let strict = StaticFetcher::failing();
        assert!(strict.fetch("https://x.test/").await.is_err());
    }
}
