use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A quote scraped from quotes.toscrape.com
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
    pub tags: Vec<String>,
}

/// A single book listing with its price at scrape time.
///
/// Books are keyed by title when comparing snapshots. Titles are not a stable
/// identifier and can collide; the later entry wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub price: f64,
    pub availability: String,
    pub rating: String,
    pub url: String,
    pub scraped_at: DateTime<Utc>,
}

/// The overwrite-on-save JSON document holding the latest book prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub last_updated: DateTime<Utc>,
    pub count: usize,
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub title: String,
    pub old_price: f64,
    pub new_price: f64,
    pub change: f64,
    pub change_pct: f64,
}

impl PriceChange {
    pub fn dropped(&self) -> bool {
        self.change < 0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceComparison {
    /// Sorted by `change_pct` ascending, largest drop first.
    pub changes: Vec<PriceChange>,
    pub new_books: Vec<Book>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Sgd,
    Myr,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Sgd => "SGD",
            Currency::Myr => "MYR",
        }
    }

    /// Symbol used when displaying prices.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Sgd => "S$",
            Currency::Myr => "RM",
        }
    }

    /// Token that precedes prices in the page text. Singapore result pages
    /// print bare `$` amounts even though they are SGD.
    pub fn price_token(&self) -> &'static str {
        match self {
            Currency::Usd | Currency::Sgd => "$",
            Currency::Myr => "RM",
        }
    }

    /// Rough conversion rate to USD.
    pub fn usd_rate(&self) -> f64 {
        match self {
            Currency::Usd => 1.0,
            Currency::Sgd => 0.75,
            Currency::Myr => 0.21,
        }
    }

    pub fn to_usd(&self, amount: u32) -> u64 {
        (f64::from(amount) * self.usd_rate()).floor() as u64
    }
}

/// Price summary for one route and date, extracted from a flight search page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightPriceRecord {
    pub route: String,
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub currency: Currency,
    pub currency_symbol: String,
    pub usd_rate: f64,
    /// Distinct prices, ascending.
    pub prices: Vec<u32>,
    pub min_usd: u64,
    pub airlines: Vec<String>,
    pub times: Vec<String>,
    pub durations: Vec<String>,
    pub shortest_duration: String,
    pub scraped_at: DateTime<Utc>,
}

impl FlightPriceRecord {
    pub fn min_price(&self) -> Option<u32> {
        self.prices.first().copied()
    }

    pub fn max_price(&self) -> Option<u32> {
        self.prices.last().copied()
    }
}

/// A flight offer assembled positionally from extracted prices, airlines,
/// durations and times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub airline: String,
    pub emoji: String,
    pub price: u32,
    pub duration: String,
    pub duration_hours: u32,
    pub depart: String,
    pub arrive: String,
    pub stops: u32,
    /// Rough kg CO2 estimate.
    pub carbon: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VibeSearch {
    pub route: String,
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub flights: Vec<Flight>,
    pub min_price: u32,
    pub airlines: Vec<String>,
    pub scraped_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub name: String,
    pub price_total: u32,
    pub price_per_night: u32,
    pub stars: u8,
    pub score: f32,
    pub reviews: u32,
    pub location: String,
}

/// A flight paired with a hotel at a discounted combined price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    pub flight: Flight,
    pub hotel: Hotel,
    pub origin: String,
    pub destination: String,
    pub nights: u32,
    pub total_price: u32,
    pub savings: u32,
    pub vibe_text: String,
}

impl Bundle {
    pub fn separate_price(&self) -> u32 {
        self.flight.price.saturating_add(self.hotel.price_total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleSearch {
    pub bundles: Vec<Bundle>,
    pub origin: String,
    pub destination: String,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    pub travelers: u32,
    pub scraped_at: DateTime<Utc>,
}

/// Parses a travel date given either as `YYYY-MM-DD` or as the compact
/// `YYMMDD` form used in flight search URLs.
pub fn parse_travel_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            if trimmed.len() == 6 && trimmed.chars().all(|c| c.is_ascii_digit()) {
                NaiveDate::parse_from_str(trimmed, "%y%m%d").ok()
            } else {
                None
            }
        })
}
