use crate::error::{Result, ScraperError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Inclusive numeric bounds used to discard regex false positives.
///
/// These are example thresholds observed for particular routes and
/// currencies, not validated business rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlausibleRange {
    pub min: u32,
    pub max: u32,
}

impl PlausibleRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetch: FetchConfig,
    pub storage: StorageConfig,
    pub flights: FlightsConfig,
    pub bundles: BundlesConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub stealth: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("price_scraper/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_seconds: 60,
            stealth: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightsConfig {
    pub price_min: u32,
    pub price_max: u32,
    pub duration_min_hours: u32,
    pub duration_max_hours: u32,
    /// Price range for the standalone `flights` command.
    pub cli_price_min: u32,
    pub cli_price_max: u32,
}

impl Default for FlightsConfig {
    fn default() -> Self {
        Self {
            price_min: 400,
            price_max: 20_000,
            duration_min_hours: 10,
            duration_max_hours: 50,
            cli_price_min: 500,
            cli_price_max: 50_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BundlesConfig {
    pub flight_price_min: u32,
    pub flight_price_max: u32,
    pub hotel_price_min: u32,
    pub hotel_price_max: u32,
    pub max_flights: usize,
}

impl Default for BundlesConfig {
    fn default() -> Self {
        Self {
            flight_price_min: 400,
            flight_price_max: 15_000,
            hotel_price_min: 50,
            hotel_price_max: 5_000,
            max_flights: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    /// 0 means "use the dashboard's own default port".
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
        }
    }
}

/// Regex extraction thresholds for one kind of flight search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionRules {
    pub price_range: PlausibleRange,
    pub duration_hours: PlausibleRange,
}

impl FlightsConfig {
    pub fn rules(&self) -> ExtractionRules {
        ExtractionRules {
            price_range: PlausibleRange::new(self.price_min, self.price_max),
            duration_hours: PlausibleRange::new(self.duration_min_hours, self.duration_max_hours),
        }
    }

    pub fn cli_rules(&self) -> ExtractionRules {
        ExtractionRules {
            price_range: PlausibleRange::new(self.cli_price_min, self.cli_price_max),
            ..self.rules()
        }
    }
}

impl Config {
    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                ScraperError::Config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            info!("Loaded configuration from {}", path.display());
            toml::from_str::<Config>(&content)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Config::default()
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var("SCRAPER_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Ok(agent) = std::env::var("SCRAPER_USER_AGENT") {
            self.fetch.user_agent = agent;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    fn validate(&self) -> Result<()> {
        let ranges = [
            ("flights.price", self.flights.price_min, self.flights.price_max),
            (
                "flights.cli_price",
                self.flights.cli_price_min,
                self.flights.cli_price_max,
            ),
            (
                "flights.duration_hours",
                self.flights.duration_min_hours,
                self.flights.duration_max_hours,
            ),
            (
                "bundles.flight_price",
                self.bundles.flight_price_min,
                self.bundles.flight_price_max,
            ),
            (
                "bundles.hotel_price",
                self.bundles.hotel_price_min,
                self.bundles.hotel_price_max,
            ),
        ];
        for (name, min, max) in ranges {
            if min > max {
                return Err(ScraperError::Config(format!(
                    "{name}: min ({min}) is greater than max ({max})"
                )));
            }
        }
        Ok(())
    }

    pub fn bundle_flight_rules(&self) -> ExtractionRules {
        ExtractionRules {
            price_range: PlausibleRange::new(
                self.bundles.flight_price_min,
                self.bundles.flight_price_max,
            ),
            duration_hours: self.flights.rules().duration_hours,
        }
    }

    pub fn hotel_price_range(&self) -> PlausibleRange {
        PlausibleRange::new(self.bundles.hotel_price_min, self.bundles.hotel_price_max)
    }
}
