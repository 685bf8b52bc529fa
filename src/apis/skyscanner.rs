use crate::app::ports::{Page, PageFetcher};
use crate::config::ExtractionRules;
use crate::constants::{SKYSCANNER_GLOBAL_HOST, SKYSCANNER_SG_HOST};
use crate::error::Result;
use crate::observability::metrics::record_extracted;
use crate::parser::FlightExtraction;
use crate::pipeline::flights::{build_offers, summarize_flights};
use crate::types::{Currency, Flight, FlightPriceRecord};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Which Skyscanner storefront to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Market {
    /// `www.skyscanner.com`; may redirect to a regional site.
    Global,
    /// `www.skyscanner.com.sg`, pinned to SGD.
    Singapore,
}

impl Currency {
    /// Infers the page currency from where the search ended up.
    pub fn detect(final_url: &str, market: Market) -> Currency {
        if final_url.contains(".my") && !final_url.contains("currency=SGD") {
            Currency::Myr
        } else if final_url.contains(".sg") || market == Market::Singapore {
            Currency::Sgd
        } else {
            Currency::Usd
        }
    }
}

/// Offers built from one search, with the raw price list and airline set.
pub type OfferSearch = (Vec<Flight>, Vec<u32>, Vec<String>);

pub struct SkyscannerClient {
    fetcher: Arc<dyn PageFetcher>,
    market: Market,
}

impl SkyscannerClient {
    pub fn new(fetcher: Arc<dyn PageFetcher>, market: Market) -> Self {
        Self { fetcher, market }
    }

    pub fn search_url(origin: &str, destination: &str, date: NaiveDate, market: Market) -> String {
        let origin = origin.to_lowercase();
        let destination = destination.to_lowercase();
        let sky_date = date.format("%y%m%d");
        match market {
            Market::Global => format!(
                "{SKYSCANNER_GLOBAL_HOST}/transport/flights/{origin}/{destination}/{sky_date}/"
            ),
            Market::Singapore => format!(
                "{SKYSCANNER_SG_HOST}/transport/flights/{origin}/{destination}/{sky_date}/?currency=SGD&locale=en-GB&market=SG"
            ),
        }
    }

    /// Fetches the result page and extracts it. `None` when the site does not
    /// answer with a 200.
    async fn fetch_extraction(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
        rules: &ExtractionRules,
    ) -> Result<Option<(Currency, FlightExtraction)>> {
        let url = Self::search_url(origin, destination, date, self.market);
        info!("Route: {} -> {} on {}", origin, destination, date);
        let page: Page = self.fetcher.fetch(&url).await?;
        if !page.is_success() {
            warn!(status = page.status, url = %url, "Failed to fetch flight results");
            return Ok(None);
        }

        let currency = Currency::detect(&page.url, self.market);
        let extraction = FlightExtraction::extract(&page.body, currency, rules)?;
        info!(
            currency = currency.code(),
            prices = extraction.prices.len(),
            airlines = extraction.airlines.len(),
            durations = extraction.durations.len(),
            "extracted flight results"
        );
        record_extracted("flight_price", extraction.prices.len());
        Ok(Some((currency, extraction)))
    }

    #[instrument(skip(self, rules))]
    pub async fn search(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
        rules: &ExtractionRules,
    ) -> Result<Option<FlightPriceRecord>> {
        Ok(self
            .fetch_extraction(origin, destination, date, rules)
            .await?
            .map(|(currency, extraction)| {
                summarize_flights(&extraction, currency, origin, destination, date)
            }))
    }

    /// Builds up to `limit` offers. An empty offer list means no prices were
    /// found, which is reported the same as a failed fetch.
    #[instrument(skip(self, rules))]
    pub async fn search_offers(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
        rules: &ExtractionRules,
        limit: usize,
        arrive_offset: usize,
    ) -> Result<Option<OfferSearch>> {
        let Some((_, extraction)) = self.fetch_extraction(origin, destination, date, rules).await?
        else {
            return Ok(None);
        };
        let flights = build_offers(&extraction, limit, arrive_offset);
        if flights.is_empty() {
            return Ok(None);
        }
        Ok(Some((flights, extraction.prices, extraction.airlines)))
    }
}
