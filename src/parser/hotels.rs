use crate::config::PlausibleRange;
use once_cell::sync::Lazy;
use regex::Regex;

static HOTEL_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"data-testid="title"[^>]*>([^<]+)<"#).expect("hotel name regex is valid")
});
static HOTEL_PRICE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"SGD\s*([\d,]+)|S\$\s*([\d,]+)|\$\s*([\d,]+)").expect("hotel price regex is valid")
});
static REVIEW_SCORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d\.\d)\s*(?:Superb|Excellent|Very Good|Good|Pleasant)")
        .expect("review score regex is valid")
});

const MAX_NAMES: usize = 15;

/// Raw values from a hotel search results page, each in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotelExtraction {
    pub names: Vec<String>,
    pub prices: Vec<u32>,
    pub scores: Vec<f32>,
}

impl HotelExtraction {
    pub fn extract(html: &str, price_range: &PlausibleRange) -> Self {
        let names = HOTEL_NAME
            .captures_iter(html)
            .map(|caps| decode_entities(caps[1].trim()))
            .take(MAX_NAMES)
            .collect();

        let prices = HOTEL_PRICE
            .captures_iter(html)
            .filter_map(|caps| {
                caps.iter()
                    .skip(1)
                    .flatten()
                    .next()
                    .and_then(|m| m.as_str().replace(',', "").parse::<u32>().ok())
            })
            .filter(|value| price_range.contains(*value))
            .collect();

        let scores = REVIEW_SCORE
            .captures_iter(html)
            .filter_map(|caps| caps[1].parse().ok())
            .collect();

        Self {
            names,
            prices,
            scores,
        }
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}
