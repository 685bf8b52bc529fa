//! Site endpoints and fixed lookup tables shared by the crawlers and dashboards.

pub const QUOTES_BASE_URL: &str = "https://quotes.toscrape.com";
pub const BOOKS_BASE_URL: &str = "https://books.toscrape.com";
pub const HTTPBIN_BASE_URL: &str = "https://httpbin.org";
pub const SKYSCANNER_GLOBAL_HOST: &str = "https://www.skyscanner.com";
pub const SKYSCANNER_SG_HOST: &str = "https://www.skyscanner.com.sg";
pub const BOOKING_SEARCH_URL: &str = "https://www.booking.com/searchresults.html";

pub const DEFAULT_ORIGIN: &str = "SIN";
pub const DEFAULT_DESTINATION: &str = "NYCA";

pub const DEFAULT_QUOTE_PAGES: u32 = 3;
pub const DEFAULT_BOOK_PAGES: u32 = 2;

pub const BOOK_PRICES_CSV: &str = "book_prices.csv";
pub const BOOK_PRICES_JSON: &str = "book_prices.json";
pub const FLIGHT_RESULTS_JSON: &str = "flight_results.json";
pub const VIBE_SEARCH_JSON: &str = "latest_search.json";
pub const BUNDLES_JSON: &str = "bundles.json";

/// Star rating labels in display order.
pub const RATING_LABELS: [&str; 5] = ["One", "Two", "Three", "Four", "Five"];

pub const AIRPORTS: &[(&str, &str)] = &[
    ("SIN", "Singapore"),
    ("NYCA", "New York (All)"),
    ("JFK", "New York JFK"),
    ("EWR", "Newark"),
    ("LAX", "Los Angeles"),
    ("SFO", "San Francisco"),
    ("LHR", "London Heathrow"),
    ("CDG", "Paris CDG"),
    ("NRT", "Tokyo Narita"),
    ("HND", "Tokyo Haneda"),
    ("HKG", "Hong Kong"),
    ("BKK", "Bangkok"),
    ("DXB", "Dubai"),
    ("SYD", "Sydney"),
    ("ICN", "Seoul Incheon"),
];

/// Airline names searched for in result pages, paired with a flag for display.
pub const AIRLINES: &[(&str, &str)] = &[
    ("Singapore Airlines", "🇸🇬"),
    ("Emirates", "🇦🇪"),
    ("Qatar Airways", "🇶🇦"),
    ("Cathay Pacific", "🇭🇰"),
    ("ANA", "🇯🇵"),
    ("All Nippon Airways", "🇯🇵"),
    ("JAL", "🇯🇵"),
    ("Japan Airlines", "🇯🇵"),
    ("United", "🇺🇸"),
    ("Delta", "🇺🇸"),
    ("American Airlines", "🇺🇸"),
    ("British Airways", "🇬🇧"),
    ("Lufthansa", "🇩🇪"),
    ("Turkish Airlines", "🇹🇷"),
    ("Korean Air", "🇰🇷"),
    ("Asiana", "🇰🇷"),
    ("EVA Air", "🇹🇼"),
    ("China Airlines", "🇹🇼"),
    ("Air China", "🇨🇳"),
];

pub const DEFAULT_AIRLINE_EMOJI: &str = "✈️";

pub fn airline_names() -> Vec<&'static str> {
    AIRLINES.iter().map(|(name, _)| *name).collect()
}

pub fn airline_emoji(airline: &str) -> &'static str {
    AIRLINES
        .iter()
        .find(|(name, _)| *name == airline)
        .map(|(_, flag)| *flag)
        .unwrap_or(DEFAULT_AIRLINE_EMOJI)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct City {
    pub code: &'static str,
    pub name: &'static str,
    /// Value used for booking.com's `ss` search parameter.
    pub booking_query: &'static str,
    pub flag: &'static str,
}

pub const CITIES: &[City] = &[
    City { code: "SIN", name: "Singapore", booking_query: "Singapore", flag: "🇸🇬" },
    City { code: "NYCA", name: "New York", booking_query: "New+York", flag: "🇺🇸" },
    City { code: "LHR", name: "London", booking_query: "London", flag: "🇬🇧" },
    City { code: "NRT", name: "Tokyo", booking_query: "Tokyo", flag: "🇯🇵" },
    City { code: "CDG", name: "Paris", booking_query: "Paris", flag: "🇫🇷" },
    City { code: "BKK", name: "Bangkok", booking_query: "Bangkok", flag: "🇹🇭" },
    City { code: "DXB", name: "Dubai", booking_query: "Dubai", flag: "🇦🇪" },
    City { code: "LAX", name: "Los Angeles", booking_query: "Los+Angeles", flag: "🇺🇸" },
];

pub fn city(code: &str) -> Option<&'static City> {
    CITIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

pub const HOTEL_LOCATIONS: [&str; 6] = [
    "City Center",
    "Downtown",
    "Near Airport",
    "Business District",
    "Waterfront",
    "Arts District",
];

pub const VIBE_TEXTS: [&str; 8] = [
    "Perfect for spontaneous travelers 🎲",
    "Best bang for your buck 💰",
    "Ideal for the comfort-seeker ✨",
    "Great for first-timers 🌟",
    "Solid all-rounder pick 👍",
    "Budget-friendly gem 💎",
    "Popular with solo travelers 🎒",
    "Top-rated combo 🏆",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airline_emoji_falls_back_to_plane() {
        assert_eq!(airline_emoji("Emirates"), "🇦🇪");
        assert_eq!(airline_emoji("Unknown"), DEFAULT_AIRLINE_EMOJI);
    }

    #[test]
    fn test_city_lookup_is_case_insensitive() {
        assert_eq!(city("nyca").map(|c| c.booking_query), Some("New+York"));
        assert!(city("XXX").is_none());
    }
}
