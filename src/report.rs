//! Plain-text console reports. Each function returns the rendered block so
//! the CLI decides where it goes.

use crate::apis::httpbin::{HeadingProbe, ProbeResult};
use crate::parser::flights::leading_hours;
use crate::parser::{PageSummary, QuotePage};
use crate::pipeline::stats::{rating_bar, rating_distribution, PriceStats};
use crate::types::{Book, FlightPriceRecord, PriceComparison, Quote};
use std::collections::HashSet;

const RULE_WIDTH: usize = 60;
const TITLE_CHARS: usize = 40;
const NEW_BOOKS_SHOWN: usize = 5;
const PRICES_SHOWN: usize = 15;
const TIMES_SHOWN: usize = 12;

pub fn banner(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{rule}\n{title}\n{rule}")
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// `1234567` -> `"1,234,567"`
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn quote_block(quote: &Quote) -> String {
    format!(
        "\"{}...\"\n  - {}\n  Tags: {}",
        truncate(&quote.text, 50),
        quote.author,
        quote.tags.join(", ")
    )
}

pub fn quote_summary(quotes: &[Quote]) -> String {
    let authors: HashSet<&str> = quotes.iter().map(|q| q.author.as_str()).collect();
    format!(
        "=== Summary ===\nTotal quotes scraped: {}\nUnique authors: {}",
        quotes.len(),
        authors.len()
    )
}

pub fn selector_demo(summary: &PageSummary) -> String {
    [
        "=== Selector Demo ===".to_string(),
        "1. CSS Selectors:".to_string(),
        format!("   First quote: {}...", truncate(&summary.first_quote, 50)),
        format!("   First link href: {}", summary.first_link_href),
        "2. Title lookup:".to_string(),
        format!("   Page title: {}", summary.title),
        format!("3. Element count: {} quotes on page", summary.quote_count),
        format!("   Total links: {}", summary.link_count),
    ]
    .join("\n")
}

pub fn httpbin_report(probes: &[ProbeResult]) -> String {
    let mut lines = vec!["=== HTTPBin Tests ===".to_string()];
    for (i, probe) in probes.iter().enumerate() {
        lines.push(format!("{}. {}:", i + 1, probe.name));
        lines.push(format!("   Status: {}", probe.status));
    }
    lines.join("\n")
}

pub fn stealth_quotes(status: u16, page: &QuotePage) -> String {
    let mut lines = vec![format!("Status: {status}"), format!("Found {} quotes", page.quotes.len())];
    if let Some(first) = page.quotes.first() {
        lines.push(format!("First quote: {}...", truncate(&first.text, 60)));
    }
    lines.join("\n")
}

/// One titled demo section. A failed demo renders its error in place.
pub fn demo_section<T, E: std::fmt::Display>(
    title: &str,
    outcome: Result<T, E>,
    render: impl FnOnce(T) -> String,
) -> String {
    let body = match outcome {
        Ok(value) => render(value),
        Err(e) => format!("Error: {e}"),
    };
    format!("\n=== {title} ===\n{body}")
}

/// Outcome of waiting for `selector` on a fetched page.
pub fn element_wait(status: u16, selector: &str, found: usize) -> String {
    if found == 0 {
        format!("Status: {status}\nElement {selector} not found")
    } else {
        format!("Status: {status}\nElement {selector} present\nQuotes loaded: {found}")
    }
}

pub fn stealth_books(status: u16, books: &[Book]) -> String {
    let mut lines = vec![format!("Status: {status}")];
    for book in books {
        lines.push(format!("  - {}: {:.2}", book.title, book.price));
    }
    lines.join("\n")
}

pub fn heading_report(probe: &HeadingProbe) -> String {
    match &probe.heading {
        Some(heading) => format!("Status: {}\nPage heading: {}", probe.status, heading),
        None => format!("Status: {}\nPage content received", probe.status),
    }
}

pub fn book_statistics(books: &[Book]) -> String {
    let Some(stats) = PriceStats::from_books(books) else {
        return "STATISTICS:\n   No books scraped.".to_string();
    };
    let mut lines = vec![
        "STATISTICS:".to_string(),
        format!("   Total books: {}", stats.count),
        format!("   Price range: {:.2} - {:.2}", stats.min, stats.max),
        format!("   Average price: {:.2}", stats.average),
        String::new(),
        "   Rating distribution:".to_string(),
    ];
    for (label, count) in rating_distribution(books) {
        lines.push(format!("   {:6} {} ({})", label, rating_bar(count), count));
    }
    lines.join("\n")
}

/// `first_run` is true when there was no previous snapshot to compare with.
pub fn comparison_report(comparison: &PriceComparison, first_run: bool) -> String {
    let mut lines = vec![banner("PRICE COMPARISON REPORT")];
    if first_run {
        lines.push("No previous prices to compare (first run).".to_string());
        return lines.join("\n");
    }

    if comparison.changes.is_empty() {
        lines.push("No price changes detected.".to_string());
    } else {
        lines.push("PRICE CHANGES DETECTED:".to_string());
        for change in &comparison.changes {
            let direction = if change.dropped() { "DROPPED" } else { "INCREASED" };
            lines.push(format!("{}: {}...", direction, truncate(&change.title, TITLE_CHARS)));
            lines.push(format!(
                "   {:.2} -> {:.2} ({:+.1}%)",
                change.old_price, change.new_price, change.change_pct
            ));
        }
    }

    if !comparison.new_books.is_empty() {
        lines.push(format!("NEW BOOKS FOUND: {}", comparison.new_books.len()));
        for book in comparison.new_books.iter().take(NEW_BOOKS_SHOWN) {
            lines.push(format!(
                "   - {}... - {:.2}",
                truncate(&book.title, TITLE_CHARS),
                book.price
            ));
        }
        if comparison.new_books.len() > NEW_BOOKS_SHOWN {
            lines.push(format!(
                "   ... and {} more",
                comparison.new_books.len() - NEW_BOOKS_SHOWN
            ));
        }
    }
    lines.push("=".repeat(RULE_WIDTH));
    lines.join("\n")
}

pub fn flight_report(record: &FlightPriceRecord) -> String {
    let symbol = &record.currency_symbol;
    let to_usd = |price: u32| record.currency.to_usd(price);
    let mut lines = vec![
        banner("FLIGHT RESULTS"),
        format!("Route: {}", record.route),
        format!("Date: {}", record.date),
        format!("Detected currency: {}", record.currency.code()),
        String::new(),
        "Airlines Operating This Route".to_string(),
    ];

    let mut airlines = record.airlines.clone();
    airlines.sort();
    lines.extend(airlines.iter().map(|a| format!("  - {a}")));

    lines.push(String::new());
    lines.push(format!("Prices Found ({})", record.currency.code()));
    if let (Some(min), Some(max)) = (record.min_price(), record.max_price()) {
        lines.push(format!(
            "  Cheapest: {} {} (≈ ${} USD)",
            symbol,
            thousands(min.into()),
            thousands(to_usd(min))
        ));
        lines.push(format!(
            "  Most Expensive: {} {} (≈ ${} USD)",
            symbol,
            thousands(max.into()),
            thousands(to_usd(max))
        ));
        lines.push(format!("  All prices ({}):", record.currency.code()));
        for (i, price) in record.prices.iter().take(PRICES_SHOWN).enumerate() {
            lines.push(format!(
                "    {:2}. {} {:>6}  (≈ ${} USD)",
                i + 1,
                symbol,
                thousands((*price).into()),
                thousands(to_usd(*price))
            ));
        }
        if record.prices.len() > PRICES_SHOWN {
            lines.push(format!("    ... and {} more", record.prices.len() - PRICES_SHOWN));
        }
    } else {
        lines.push("  No price data extracted. Site may have changed structure.".to_string());
    }

    lines.push(String::new());
    lines.push("Flight Durations".to_string());
    let mut durations = record.durations.clone();
    durations.sort_by_key(|d| leading_hours(d).unwrap_or(u32::MAX));
    lines.extend(durations.iter().map(|d| format!("  - {d}")));

    lines.push(String::new());
    lines.push("Departure/Arrival Times Found".to_string());
    let mut times = record.times.clone();
    times.sort();
    let shown: Vec<&str> = times.iter().take(TIMES_SHOWN).map(String::as_str).collect();
    lines.push(format!("  {}", shown.join(", ")));
    if times.len() > TIMES_SHOWN {
        lines.push(format!("  ... and {} more", times.len() - TIMES_SHOWN));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Currency, PriceChange};
    use chrono::{NaiveDate, Utc};

    fn book(title: &str, price: f64, rating: &str) -> Book {
        Book {
            title: title.to_string(),
            price,
            availability: "In stock".to_string(),
            rating: rating.to_string(),
            url: String::new(),
            scraped_at: Utc::now(),
        }
    }

    #[test]
    fn test_element_wait_reports_missing_selector() {
        assert_eq!(element_wait(200, "div.quote", 0), "Status: 200\nElement div.quote not found");
        assert!(element_wait(200, "div.quote", 10).ends_with("Quotes loaded: 10"));
    }

    #[test]
    fn test_demo_section_renders_errors_in_place() {
        let failed: Result<u16, String> = Err("connection reset".to_string());
        assert_eq!(
            demo_section("Browser Headers", failed, |s| s.to_string()),
            "\n=== Browser Headers ===\nError: connection reset"
        );
        let ok: Result<u16, String> = Ok(200);
        assert_eq!(
            demo_section("Challenge Page", ok, |s| format!("Status: {s}")),
            "\n=== Challenge Page ===\nStatus: 200"
        );
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_comparison_report_lines() {
        let comparison = PriceComparison {
            changes: vec![PriceChange {
                title: "It's Only the Himalayas".to_string(),
                old_price: 45.17,
                new_price: 40.0,
                change: -5.17,
                change_pct: -11.445,
            }],
            new_books: (0..7).map(|i| book(&format!("Book {i}"), 10.0, "One")).collect(),
        };
        let report = comparison_report(&comparison, false);
        assert!(report.contains("DROPPED: It's Only the Himalayas..."));
        assert!(report.contains("   45.17 -> 40.00 (-11.4%)"));
        assert!(report.contains("NEW BOOKS FOUND: 7"));
        assert!(report.contains("   - Book 4... - 10.00"));
        assert!(!report.contains("Book 5..."));
        assert!(report.contains("   ... and 2 more"));
    }

    #[test]
    fn test_first_run_comparison() {
        let report = comparison_report(&PriceComparison::default(), true);
        assert!(report.contains("No previous prices to compare (first run)."));
    }

    #[test]
    fn test_book_statistics_histogram() {
        let books = vec![
            book("a", 10.0, "Five"),
            book("b", 20.0, "Five"),
            book("c", 30.0, "Five"),
            book("d", 40.0, "Five"),
        ];
        let report = book_statistics(&books);
        assert!(report.contains("Price range: 10.00 - 40.00"));
        assert!(report.contains("Average price: 25.00"));
        assert!(report.contains("   Five   ## (4)"));
        assert!(report.contains("   One     (0)"));
    }

    #[test]
    fn test_flight_report() {
        let record = FlightPriceRecord {
            route: "SIN → NYCA".to_string(),
            origin: "SIN".to_string(),
            destination: "NYCA".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 6, 12).unwrap(),
            currency: Currency::Sgd,
            currency_symbol: "S$".to_string(),
            usd_rate: 0.75,
            prices: (1..=17).map(|i| 1_000 + i * 100).collect(),
            min_usd: 825,
            airlines: vec!["United".to_string(), "Emirates".to_string()],
            times: vec!["23:10".to_string(), "08:45".to_string()],
            durations: vec!["27h 5m".to_string(), "18h 35m".to_string()],
            shortest_duration: "18h 35m".to_string(),
            scraped_at: Utc::now(),
        };
        let report = flight_report(&record);
        assert!(report.contains("  Cheapest: S$ 1,100 (≈ $825 USD)"));
        assert!(report.contains("  Most Expensive: S$ 2,700 (≈ $2,025 USD)"));
        assert!(report.contains("    ... and 2 more"));
        assert!(report.find("  - Emirates").unwrap() < report.find("  - United").unwrap());
        assert!(report.find("  - 18h 35m").unwrap() < report.find("  - 27h 5m").unwrap());
        assert!(report.contains("  08:45, 23:10"));
    }

    #[test]
    fn test_empty_flight_report_does_not_panic() {
        let record = FlightPriceRecord {
            route: "SIN → NYCA".to_string(),
            origin: "SIN".to_string(),
            destination: "NYCA".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 6, 12).unwrap(),
            currency: Currency::Usd,
            currency_symbol: "$".to_string(),
            usd_rate: 1.0,
            prices: vec![],
            min_usd: 0,
            airlines: vec![],
            times: vec![],
            durations: vec![],
            shortest_duration: "N/A".to_string(),
            scraped_at: Utc::now(),
        };
        assert!(flight_report(&record).contains("No price data extracted"));
    }
}
