use crate::app::ports::PageFetcher;
use crate::constants::HTTPBIN_BASE_URL;
use crate::error::Result;
use crate::parser::selectors::{first_text, selector};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

const PROBES: [(&str, &str); 3] = [
    ("GET request", "/get"),
    ("Headers test", "/headers"),
    ("User-Agent test", "/user-agent"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub name: String,
    pub status: u16,
}

/// First `h1` of the httpbin sample document, used to check that a page
/// came through intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingProbe {
    pub status: u16,
    pub heading: Option<String>,
}

pub struct HttpbinProbe {
    fetcher: Arc<dyn PageFetcher>,
    base_url: String,
}

impl HttpbinProbe {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self::with_base_url(fetcher, HTTPBIN_BASE_URL)
    }

    pub fn with_base_url(fetcher: Arc<dyn PageFetcher>, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<Vec<ProbeResult>> {
        let mut results = Vec::with_capacity(PROBES.len());
        for (name, path) in PROBES {
            let page = self.fetcher.fetch(&format!("{}{}", self.base_url, path)).await?;
            info!(probe = name, status = page.status, "probe finished");
            results.push(ProbeResult {
                name: name.to_string(),
                status: page.status,
            });
        }
        Ok(results)
    }

    pub async fn html_heading(&self) -> Result<HeadingProbe> {
        let page = self.fetcher.fetch(&format!("{}/html", self.base_url)).await?;
        let h1 = selector("h1")?;
        let document = page.document();
        let heading = first_text(document.root_element(), &h1);
        Ok(HeadingProbe {
            status: page.status,
            heading: (!heading.is_empty()).then_some(heading),
        })
    }
}
