//! Regex heuristics over raw flight search HTML.
//!
//! Result pages render client-side and carry no stable markup, so prices,
//! airlines, times and durations are recovered from the text itself. The
//! plausible ranges from `[flights]` discard numbers that are not fares.

use crate::config::{ExtractionRules, PlausibleRange};
use crate::constants::airline_names;
use crate::error::{Result, ScraperError};
use crate::types::Currency;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashSet;

static TIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{1,2}:\d{2}\b").expect("time regex is valid"));
static DURATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,2}h\s*\d{0,2}m?").expect("duration regex is valid"));
static DURATION_PARTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)h\s*(\d+)?").expect("duration parts regex is valid"));

/// Everything pulled from one flight search page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightExtraction {
    /// Distinct prices in range, ascending.
    pub prices: Vec<u32>,
    pub airlines: Vec<String>,
    pub times: Vec<String>,
    pub durations: Vec<String>,
}

impl FlightExtraction {
    pub fn extract(html: &str, currency: Currency, rules: &ExtractionRules) -> Result<Self> {
        Ok(Self {
            prices: extract_prices(html, currency.price_token(), &rules.price_range)?,
            airlines: extract_airlines(html, &airline_names()),
            times: extract_times(html),
            durations: extract_durations(html, &rules.duration_hours),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
            && self.airlines.is_empty()
            && self.times.is_empty()
            && self.durations.is_empty()
    }
}

/// Numbers following `token`, commas stripped, kept when inside `range`.
/// Returned deduplicated and ascending. Values that overflow `u32` are dropped.
pub fn extract_prices(html: &str, token: &str, range: &PlausibleRange) -> Result<Vec<u32>> {
    let pattern = format!(r"{}\s*([\d,]+)", regex::escape(token));
    let re = Regex::new(&pattern)
        .map_err(|e| ScraperError::InvalidInput(format!("price token '{token}': {e}")))?;

    let mut prices: Vec<u32> = re
        .captures_iter(html)
        .filter_map(|caps| caps[1].replace(',', "").parse::<u32>().ok())
        .filter(|value| range.contains(*value))
        .collect();
    prices.sort_unstable();
    prices.dedup();
    Ok(prices)
}

/// Names from `names` that appear anywhere in the page, ignoring case.
pub fn extract_airlines(html: &str, names: &[&str]) -> Vec<String> {
    let haystack = html.to_lowercase();
    let mut found: Vec<String> = Vec::new();
    for name in names {
        if haystack.contains(&name.to_lowercase()) && !found.iter().any(|f| f == name) {
            found.push(name.to_string());
        }
    }
    found
}

pub fn extract_times(html: &str) -> Vec<String> {
    dedup_in_order(TIME.find_iter(html).map(|m| m.as_str().to_string()))
}

/// `18h 35m`-style tokens whose hour count lies in `hour_range`.
pub fn extract_durations(html: &str, hour_range: &PlausibleRange) -> Vec<String> {
    let tokens = DURATION
        .find_iter(html)
        .map(|m| m.as_str().trim().to_string())
        .filter(|token| leading_hours(token).is_some_and(|h| hour_range.contains(h)));
    dedup_in_order(tokens)
}

fn dedup_in_order(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.filter(|item| seen.insert(item.clone())).collect()
}

/// Whole hours at the start of a duration token.
pub fn leading_hours(duration: &str) -> Option<u32> {
    DURATION_PARTS
        .captures(duration)
        .and_then(|caps| caps[1].parse().ok())
}

/// `"18h 35m"` -> `18.583…`
pub fn duration_hours(duration: &str) -> Option<f64> {
    let caps = DURATION_PARTS.captures(duration.trim())?;
    let hours: f64 = caps[1].parse().ok()?;
    let minutes: f64 = caps
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0);
    Some(hours + minutes / 60.0)
}

pub fn shortest_duration(durations: &[String]) -> Option<String> {
    durations
        .iter()
        .filter_map(|d| duration_hours(d).map(|h| (h, d)))
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal))
        .map(|(_, d)| d.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS: &str = r#"
        <div class="FlightsTicket">
          <span>Singapore Airlines</span><span>08:45</span><span>18h 35m</span>
          <span>$1,234</span><span>$ 987</span><span>$1,234</span>
        </div>
        <div class="FlightsTicket">
          <span>EMIRATES</span><span>23:10</span><span>08:45</span><span>27h 5m</span>
          <span>$45</span><span>$99,999</span><span>$4,294,967,296</span>
          <span>Layover 2h 10m</span><span>$ 650</span>
        </div>
    "#;

    fn rules() -> ExtractionRules {
        ExtractionRules {
            price_range: PlausibleRange::new(400, 20_000),
            duration_hours: PlausibleRange::new(10, 50),
        }
    }

    #[test]
    fn test_prices_are_filtered_deduped_and_sorted() {
        let prices = extract_prices(RESULTS, "$", &rules().price_range).unwrap();
        assert_eq!(prices, vec![650, 987, 1234]);
    }

    #[test]
    fn test_prices_use_the_currency_token() {
        let html = "RM 2,150 and RM900 but $700";
        let prices = extract_prices(html, "RM", &PlausibleRange::new(400, 20_000)).unwrap();
        assert_eq!(prices, vec![900, 2150]);
    }

    #[test]
    fn test_airlines_match_case_insensitively_in_list_order() {
        let airlines = extract_airlines(RESULTS, &["Emirates", "Delta", "Singapore Airlines"]);
        assert_eq!(airlines, vec!["Emirates", "Singapore Airlines"]);
    }

    #[test]
    fn test_times_keep_first_seen_order() {
        assert_eq!(extract_times(RESULTS), vec!["08:45", "23:10"]);
    }

    #[test]
    fn test_durations_outside_hour_range_are_dropped() {
        let durations = extract_durations(RESULTS, &rules().duration_hours);
        assert_eq!(durations, vec!["18h 35m", "27h 5m"]);
    }

    #[test]
    fn test_duration_hours() {
        let hours = duration_hours("18h 35m").unwrap();
        assert!((hours - 18.583).abs() < 0.001);
        assert_eq!(duration_hours("20h"), Some(20.0));
        assert_eq!(duration_hours("soon"), None);
    }

    #[test]
    fn test_shortest_duration() {
        let durations = vec!["27h 5m".to_string(), "18h 35m".to_string(), "18h 40m".to_string()];
        assert_eq!(shortest_duration(&durations).as_deref(), Some("18h 35m"));
        assert_eq!(shortest_duration(&[]), None);
    }

    #[test]
    fn test_empty_document_yields_empty_extraction() {
        let extraction = FlightExtraction::extract("", Currency::Usd, &rules()).unwrap();
        assert!(extraction.is_empty());
    }
}
