use async_trait::async_trait;
use scraper::Html;

use crate::error::Result;

/// A fetched page: HTTP status, the final URL after redirects, and the body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub status: u16,
    pub url: String,
    pub body: String,
}

/// Markers that show up on Cloudflare interstitials instead of real content.
const CHALLENGE_MARKERS: [&str; 4] = [
    "cf-chl",
    "challenge-platform",
    "<title>Just a moment...</title>",
    "Attention Required! | Cloudflare",
];

impl Page {
    pub fn new(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            url: url.into(),
            body: body.into(),
        }
    }

    /// Only a plain 200 counts as usable content.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    pub fn looks_like_challenge(&self) -> bool {
        CHALLENGE_MARKERS.iter().any(|m| self.body.contains(m))
    }

    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// Retrieves pages over HTTP. Any HTTP status is returned as a `Page`;
/// only transport failures are errors.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page>;
}
