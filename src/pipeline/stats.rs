use crate::constants::RATING_LABELS;
use crate::types::Book;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

impl PriceStats {
    pub fn from_prices(prices: &[f64]) -> Option<Self> {
        if prices.is_empty() {
            return None;
        }
        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let sum: f64 = prices.iter().sum();
        Some(Self {
            count: prices.len(),
            min,
            max,
            average: sum / prices.len() as f64,
        })
    }

    pub fn from_books(books: &[Book]) -> Option<Self> {
        let prices: Vec<f64> = books.iter().map(|b| b.price).collect();
        Self::from_prices(&prices)
    }
}

/// Book counts per star rating, One through Five.
pub fn rating_distribution(books: &[Book]) -> Vec<(&'static str, usize)> {
    RATING_LABELS
        .iter()
        .map(|label| (*label, books.iter().filter(|b| b.rating == *label).count()))
        .collect()
}

/// One `#` per two books.
pub fn rating_bar(count: usize) -> String {
    "#".repeat(count / 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn book(rating: &str, price: f64) -> Book {
        Book {
            title: format!("{rating} {price}"),
            price,
            availability: "In stock".to_string(),
            rating: rating.to_string(),
            url: String::new(),
            scraped_at: Utc::now(),
        }
    }

    #[test]
    fn test_price_stats() {
        let stats = PriceStats::from_prices(&[10.0, 30.0, 20.0]).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 30.0);
        assert_eq!(stats.average, 20.0);
        assert!(PriceStats::from_prices(&[]).is_none());
    }

    #[test]
    fn test_rating_distribution_keeps_label_order() {
        let books = vec![
            book("Three", 1.0),
            book("One", 2.0),
            book("Three", 3.0),
            book("Three", 4.0),
            book("", 5.0),
        ];
        let distribution = rating_distribution(&books);
        assert_eq!(
            distribution,
            vec![("One", 1), ("Two", 0), ("Three", 3), ("Four", 0), ("Five", 0)]
        );
        assert_eq!(rating_bar(3), "#");
        assert_eq!(rating_bar(1), "");
    }
}
