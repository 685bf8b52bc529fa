use crate::app::ports::PageFetcher;
use crate::config::Config;
use crate::constants::{BUNDLES_JSON, FLIGHT_RESULTS_JSON, VIBE_SEARCH_JSON};
use crate::storage::ResultCache;
use crate::types::{BundleSearch, FlightPriceRecord, VibeSearch};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// The three dashboards the server can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DashboardKind {
    Flights,
    Vibes,
    Bundles,
}

impl DashboardKind {
    pub fn default_port(&self) -> u16 {
        match self {
            DashboardKind::Flights => 5000,
            DashboardKind::Vibes => 5001,
            DashboardKind::Bundles => 5002,
        }
    }

    /// Label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            DashboardKind::Flights => "flights",
            DashboardKind::Vibes => "vibes",
            DashboardKind::Bundles => "bundles",
        }
    }
}

// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub kind: DashboardKind,
    pub config: Arc<Config>,
    pub fetcher: Arc<dyn PageFetcher>,
    pub flight_cache: Arc<ResultCache<FlightPriceRecord>>,
    pub vibe_cache: Arc<ResultCache<VibeSearch>>,
    pub bundle_cache: Arc<ResultCache<BundleSearch>>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Cache files live under `[storage].data_dir`.
    pub fn new(kind: DashboardKind, config: Config, fetcher: Arc<dyn PageFetcher>) -> Self {
        let data_dir = config.storage.data_dir.clone();
        Self {
            kind,
            config: Arc::new(config),
            fetcher,
            flight_cache: Arc::new(ResultCache::new(data_dir.join(FLIGHT_RESULTS_JSON))),
            vibe_cache: Arc::new(ResultCache::new(data_dir.join(VIBE_SEARCH_JSON))),
            bundle_cache: Arc::new(ResultCache::new(data_dir.join(BUNDLES_JSON))),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
