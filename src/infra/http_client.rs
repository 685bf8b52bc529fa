use crate::app::ports::{Page, PageFetcher};
use crate::config::FetchConfig;
use crate::error::Result;
use crate::observability::metrics::record_fetch;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Library user agent, no extra headers.
    Plain,
    /// Desktop browser header set. Does not execute scripts or solve challenges.
    Stealth,
}

pub struct ReqwestFetcher {
    client: Client,
    mode: FetchMode,
}

impl ReqwestFetcher {
    pub fn new(config: &FetchConfig, mode: FetchMode) -> Result<Self> {
        let (user_agent, headers) = match mode {
            FetchMode::Plain => (config.user_agent.clone(), HeaderMap::new()),
            FetchMode::Stealth => (BROWSER_USER_AGENT.to_string(), browser_headers()),
        };
        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .build()?;
        Ok(Self { client, mode })
    }

    /// Picks the mode from `[fetch].stealth`.
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        let mode = if config.stealth {
            FetchMode::Stealth
        } else {
            FetchMode::Plain
        };
        Self::new(config, mode)
    }

    pub fn mode(&self) -> FetchMode {
        self.mode
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    let extra: [(&'static str, &'static str); 8] = [
        ("sec-ch-ua", "\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"120\", \"Google Chrome\";v=\"120\""),
        ("sec-ch-ua-mobile", "?0"),
        ("sec-ch-ua-platform", "\"macOS\""),
        ("sec-fetch-dest", "document"),
        ("sec-fetch-mode", "navigate"),
        ("sec-fetch-site", "none"),
        ("sec-fetch-user", "?1"),
        ("upgrade-insecure-requests", "1"),
    ];
    for (name, value) in extra {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    headers
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    #[instrument(skip(self), fields(mode = ?self.mode))]
    async fn fetch(&self, url: &str) -> Result<Page> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status().as_u16();
        let final_url = resp.url().to_string();
        let body = resp.text().await?;

        record_fetch(status);
        info!(status, url = %final_url, bytes = body.len(), "fetched page");
        if final_url != url {
            debug!("redirected from {}", url);
        }

        let page = Page::new(status, final_url, body);
        if page.looks_like_challenge() {
            warn!(url = %page.url, "response looks like an anti-bot challenge page");
        }
        Ok(page)
    }
}
