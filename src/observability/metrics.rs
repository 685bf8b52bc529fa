//! Prometheus metrics for fetches, extraction and dashboard searches.
//!
//! Recording goes through the `metrics` facade and is a no-op until
//! `install_recorder` has been called, so library code and tests can record
//! freely.

use crate::error::{Result, ScraperError};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fmt;
use tracing::info;

/// Every metric the crate records. Keeps names out of call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    FetchTotal,
    ExtractedValuesTotal,
    DashboardSearchesTotal,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::FetchTotal => "scraper_fetch_total",
            MetricName::ExtractedValuesTotal => "scraper_extracted_values_total",
            MetricName::DashboardSearchesTotal => "dashboard_searches_total",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MetricName::FetchTotal => "Pages fetched, by HTTP status",
            MetricName::ExtractedValuesTotal => "Values extracted from pages, by kind",
            MetricName::DashboardSearchesTotal => "Dashboard searches, by dashboard and outcome",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        [
            MetricName::FetchTotal,
            MetricName::ExtractedValuesTotal,
            MetricName::DashboardSearchesTotal,
        ]
        .into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Installs the global Prometheus recorder and returns the handle used to
/// render `/metrics`. Fails if a recorder is already installed.
pub fn install_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ScraperError::Config(format!("Failed to install Prometheus recorder: {e}")))?;
    for metric in MetricName::all_metrics() {
        metrics::describe_counter!(metric.as_str(), metric.description());
    }
    info!("Prometheus recorder installed");
    Ok(handle)
}

pub fn record_fetch(status: u16) {
    metrics::counter!(MetricName::FetchTotal.as_str(), "status" => status.to_string()).increment(1);
}

pub fn record_extracted(kind: &'static str, count: usize) {
    metrics::counter!(MetricName::ExtractedValuesTotal.as_str(), "kind" => kind).increment(count as u64);
}

pub fn record_search(dashboard: &'static str, outcome: &'static str) {
    metrics::counter!(
        MetricName::DashboardSearchesTotal.as_str(),
        "dashboard" => dashboard,
        "outcome" => outcome
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_are_prometheus_style() {
        for metric in MetricName::all_metrics() {
            let name = metric.to_string();
            assert!(name.ends_with("_total"), "{name}");
            assert!(name.chars().all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }

    #[test]
    fn test_recording_without_recorder_is_a_noop() {
        record_fetch(200);
        record_extracted("quote", 3);
        record_search("flights", "success");
    }
}
