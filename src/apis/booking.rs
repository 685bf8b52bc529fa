use crate::app::ports::PageFetcher;
use crate::config::PlausibleRange;
use crate::constants::{city, BOOKING_SEARCH_URL};
use crate::error::Result;
use crate::observability::metrics::record_extracted;
use crate::parser::HotelExtraction;
use crate::pipeline::bundles::build_hotels;
use crate::types::Hotel;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct BookingClient {
    fetcher: Arc<dyn PageFetcher>,
}

impl BookingClient {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Unknown city codes are searched as-is.
    pub fn search_url(city_code: &str, checkin: NaiveDate, checkout: NaiveDate, travelers: u32) -> String {
        let query = city(city_code).map_or(city_code, |c| c.booking_query);
        format!(
            "{BOOKING_SEARCH_URL}?ss={query}&checkin={checkin}&checkout={checkout}&group_adults={travelers}&no_rooms=1&selected_currency=SGD"
        )
    }

    /// Hotels for the stay, priced in SGD. Empty when the search page fails.
    #[instrument(skip(self, price_range))]
    pub async fn search_hotels(
        &self,
        city_code: &str,
        checkin: NaiveDate,
        checkout: NaiveDate,
        travelers: u32,
        price_range: &PlausibleRange,
    ) -> Result<Vec<Hotel>> {
        let url = Self::search_url(city_code, checkin, checkout, travelers);
        let page = self.fetcher.fetch(&url).await?;
        if !page.is_success() {
            warn!(status = page.status, "Failed to fetch hotel results");
            return Ok(Vec::new());
        }

        let nights = (checkout - checkin).num_days().max(0) as u32;
        let extraction = HotelExtraction::extract(&page.body, price_range);
        let hotels = build_hotels(&extraction, nights);
        info!(
            names = extraction.names.len(),
            prices = extraction.prices.len(),
            hotels = hotels.len(),
            "extracted hotel results"
        );
        record_extracted("hotel", hotels.len());
        Ok(hotels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::StaticFetcher;

    fn stay() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2026, 6, 12).unwrap(),
            NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
        )
    }

    #[test]
    fn test_search_url_uses_city_query() {
        let (checkin, checkout) = stay();
        assert_eq!(
            BookingClient::search_url("NYCA", checkin, checkout, 2),
            "https://www.booking.com/searchresults.html?ss=New+York&checkin=2026-06-12&checkout=2026-06-15&group_adults=2&no_rooms=1&selected_currency=SGD"
        );
        assert!(BookingClient::search_url("OSL", checkin, checkout, 1).contains("ss=OSL&"));
    }

    #[tokio::test]
    async fn test_search_hotels() {
        let (checkin, checkout) = stay();
        let url = BookingClient::search_url("LHR", checkin, checkout, 2);
        let html = r#"
            <div data-testid="title">The Savoy</div><span>9.1 Superb</span><span>SGD 3,300</span>
            <div data-testid="title">Premier Inn</div><span>SGD 600</span>
        "#;
        let client = BookingClient::new(Arc::new(StaticFetcher::new().with_page(&url, html)));
        let hotels = client
            .search_hotels("LHR", checkin, checkout, 2, &PlausibleRange::new(50, 5_000))
            .await
            .unwrap();
        assert_eq!(hotels.len(), 2);
        assert_eq!(hotels[0].name, "The Savoy");
        assert_eq!(hotels[0].price_per_night, 1100);
        assert_eq!(hotels[1].score, 8.1);
    }

    #[tokio::test]
    async fn test_failed_search_is_empty() {
        let (checkin, checkout) = stay();
        let client = BookingClient::new(Arc::new(StaticFetcher::new()));
        let hotels = client
            .search_hotels("LHR", checkin, checkout, 2, &PlausibleRange::new(50, 5_000))
            .await
            .unwrap();
        assert!(hotels.is_empty());
    }
}
