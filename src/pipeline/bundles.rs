use crate::constants::{HOTEL_LOCATIONS, VIBE_TEXTS};
use crate::parser::flights::duration_hours;
use crate::parser::HotelExtraction;
use crate::types::{Bundle, Flight, Hotel};
use std::cmp::Ordering;

const MAX_HOTELS: usize = 8;
const MAX_NAME_CHARS: usize = 35;
pub const MAX_BUNDLES: usize = 6;
/// Discount applied to a customised bundle.
const CUSTOM_BUNDLE_FACTOR: f64 = 0.92;
const FALLBACK_NIGHTLY_RATE: u32 = 200;

pub fn build_hotels(extraction: &HotelExtraction, nights: u32) -> Vec<Hotel> {
    let count = MAX_HOTELS
        .min(extraction.names.len())
        .min(extraction.prices.len());

    (0..count)
        .map(|i| {
            let total = extraction.prices[i];
            Hotel {
                name: truncate_name(&extraction.names[i]),
                price_total: total,
                price_per_night: if nights > 0 { total / nights } else { total },
                stars: (3 + (i % 3) as u8).min(5),
                score: extraction
                    .scores
                    .get(i)
                    .copied()
                    .unwrap_or_else(|| (8.0 + (i % 15) as f64 / 10.0) as f32),
                reviews: 500 + (i as u32 * 234) % 2000,
                location: HOTEL_LOCATIONS[i % HOTEL_LOCATIONS.len()].to_string(),
            }
        })
        .collect()
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() > MAX_NAME_CHARS {
        let head: String = name.chars().take(MAX_NAME_CHARS).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

/// Stand-in used when the hotel search came back empty.
pub fn fallback_hotel(nights: u32) -> Hotel {
    Hotel {
        name: "City Hotel".to_string(),
        price_total: FALLBACK_NIGHTLY_RATE.saturating_mul(nights),
        price_per_night: FALLBACK_NIGHTLY_RATE,
        stars: 4,
        score: 8.5,
        reviews: 1000,
        location: "City Center".to_string(),
    }
}

/// Pairs flight i with hotel `i % hotels.len()`. Later pairs get a deeper
/// discount. Result is ordered by price per quality point.
pub fn create_bundles(
    flights: &[Flight],
    hotels: &[Hotel],
    origin: &str,
    destination: &str,
    nights: u32,
) -> Vec<Bundle> {
    let mut bundles: Vec<Bundle> = flights
        .iter()
        .take(MAX_BUNDLES)
        .enumerate()
        .map(|(i, flight)| {
            let hotel = if hotels.is_empty() {
                fallback_hotel(nights)
            } else {
                hotels[i % hotels.len()].clone()
            };
            let discount = 0.05 + i as f64 * 0.02;
            let separate = flight.price.saturating_add(hotel.price_total);
            let total = (f64::from(separate) * (1.0 - discount)).floor() as u32;
            Bundle {
                flight: flight.clone(),
                hotel,
                origin: origin.to_string(),
                destination: destination.to_string(),
                nights,
                total_price: total,
                savings: separate.saturating_sub(total),
                vibe_text: VIBE_TEXTS[i % VIBE_TEXTS.len()].to_string(),
            }
        })
        .collect();

    bundles.sort_by(|a, b| {
        let value = |bundle: &Bundle| f64::from(bundle.total_price) / (f64::from(bundle.hotel.score) + 0.1);
        value(a).partial_cmp(&value(b)).unwrap_or(Ordering::Equal)
    });
    bundles
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BundleSort {
    #[default]
    Value,
    Cheapest,
    Fastest,
}

impl BundleSort {
    pub fn from_key(key: &str) -> BundleSort {
        match key {
            "cheapest" => BundleSort::Cheapest,
            "fastest" => BundleSort::Fastest,
            _ => BundleSort::Value,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            BundleSort::Value => "value",
            BundleSort::Cheapest => "cheapest",
            BundleSort::Fastest => "fastest",
        }
    }
}

pub fn sort_bundles(bundles: &mut [Bundle], order: BundleSort) {
    match order {
        BundleSort::Value => bundles.sort_by(|a, b| {
            let value = |bundle: &Bundle| {
                if bundle.hotel.score > 0.0 {
                    f64::from(bundle.total_price) / f64::from(bundle.hotel.score)
                } else {
                    f64::INFINITY
                }
            };
            value(a).partial_cmp(&value(b)).unwrap_or(Ordering::Equal)
        }),
        BundleSort::Cheapest => bundles.sort_by_key(|b| b.total_price),
        BundleSort::Fastest => bundles.sort_by(|a, b| {
            let hours = |bundle: &Bundle| duration_hours(&bundle.flight.duration).unwrap_or(f64::MAX);
            hours(a).partial_cmp(&hours(b)).unwrap_or(Ordering::Equal)
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addon {
    Bag,
    Breakfast,
    Transfer,
}

impl Addon {
    pub fn from_key(key: &str) -> Option<Addon> {
        match key.trim() {
            "bag" => Some(Addon::Bag),
            "breakfast" => Some(Addon::Breakfast),
            "transfer" => Some(Addon::Transfer),
            _ => None,
        }
    }

    /// SGD
    pub fn price(&self) -> u32 {
        match self {
            Addon::Bag => 50,
            Addon::Breakfast => 30,
            Addon::Transfer => 80,
        }
    }

    /// Parses a comma-separated list, skipping unknown keys.
    pub fn parse_list(list: &str) -> Vec<Addon> {
        list.split(',').filter_map(Addon::from_key).collect()
    }
}

/// Price of a bundle after swapping its flight or hotel and adding extras.
pub fn customized_total(flight_price: u32, hotel_price: u32, addons: &[Addon]) -> u32 {
    let full = addons
        .iter()
        .map(Addon::price)
        .fold(flight_price.saturating_add(hotel_price), u32::saturating_add);
    (f64::from(full) * CUSTOM_BUNDLE_FACTOR).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight(price: u32, duration: &str) -> Flight {
        Flight {
            airline: "Emirates".to_string(),
            emoji: "🇦🇪".to_string(),
            price,
            duration: duration.to_string(),
            duration_hours: duration_hours(duration).unwrap_or(20.0) as u32,
            depart: "08:00".to_string(),
            arrive: "18:00".to_string(),
            stops: 1,
            carbon: 900,
        }
    }

    fn hotel(name: &str, price_total: u32, score: f32) -> Hotel {
        Hotel {
            name: name.to_string(),
            price_total,
            price_per_night: price_total / 3,
            stars: 4,
            score,
            reviews: 700,
            location: "Downtown".to_string(),
        }
    }

    #[test]
    fn test_build_hotels_derivations() {
        let extraction = HotelExtraction {
            names: vec![
                "The Extraordinarily Long Name Grand Hotel & Suites".to_string(),
                "Pod".to_string(),
                "Ace".to_string(),
            ],
            prices: vec![900, 301],
            scores: vec![9.2],
        };
        let hotels = build_hotels(&extraction, 3);
        assert_eq!(hotels.len(), 2);
        assert_eq!(hotels[0].name, "The Extraordinarily Long Name Grand...");
        assert_eq!(hotels[0].price_per_night, 300);
        assert_eq!(hotels[0].stars, 3);
        assert_eq!(hotels[0].score, 9.2);
        assert_eq!(hotels[0].reviews, 500);
        assert_eq!(hotels[1].price_per_night, 100);
        assert_eq!(hotels[1].stars, 4);
        assert_eq!(hotels[1].score, 8.1);
        assert_eq!(hotels[1].reviews, 734);
        assert_eq!(hotels[1].location, "Downtown");

        let zero_nights = build_hotels(&extraction, 0);
        assert_eq!(zero_nights[0].price_per_night, 900);
    }

    #[test]
    fn test_bundle_total_never_exceeds_separate_price() {
        let flights: Vec<Flight> = (0..8).map(|i| flight(700 + i * 137, "19h 5m")).collect();
        let hotels = vec![hotel("A", 1_000, 8.0), hotel("B", 333, 9.4), hotel("C", 57, 6.1)];
        let bundles = create_bundles(&flights, &hotels, "SIN", "NYCA", 3);

        assert_eq!(bundles.len(), MAX_BUNDLES);
        for bundle in &bundles {
            assert!(bundle.total_price <= bundle.separate_price());
            assert_eq!(bundle.savings, bundle.separate_price() - bundle.total_price);
            assert_eq!(bundle.nights, 3);
        }
    }

    #[test]
    fn test_first_bundle_gets_five_percent_off() {
        let bundles = create_bundles(&[flight(1000, "20h")], &[hotel("A", 1001, 8.0)], "SIN", "LHR", 3);
        assert_eq!(bundles[0].total_price, 1900);
        assert_eq!(bundles[0].savings, 101);
        assert_eq!(bundles[0].vibe_text, VIBE_TEXTS[0]);
    }

    #[test]
    fn test_fallback_hotel_when_none_found() {
        let bundles = create_bundles(&[flight(1000, "20h")], &[], "SIN", "LHR", 4);
        assert_eq!(bundles[0].hotel.name, "City Hotel");
        assert_eq!(bundles[0].hotel.price_total, 800);
        assert_eq!(bundles[0].hotel.score, 8.5);
    }

    #[test]
    fn test_huge_stays_saturate_instead_of_overflowing() {
        let bundles = create_bundles(&[flight(1000, "20h")], &[], "SIN", "LHR", u32::MAX);
        let bundle = &bundles[0];
        assert_eq!(bundle.hotel.price_total, u32::MAX);
        assert_eq!(bundle.separate_price(), u32::MAX);
        assert!(bundle.total_price <= bundle.separate_price());
        assert_eq!(bundle.savings, bundle.separate_price() - bundle.total_price);
        let capped = (f64::from(u32::MAX) * CUSTOM_BUNDLE_FACTOR).round() as u32;
        assert_eq!(customized_total(u32::MAX, u32::MAX, &[Addon::Bag]), capped);
    }

    #[test]
    fn test_bundles_sorted_by_value() {
        let flights = vec![flight(1000, "20h"), flight(1000, "20h")];
        let hotels = vec![hotel("meh", 1000, 5.0), hotel("great", 1000, 9.5)];
        let bundles = create_bundles(&flights, &hotels, "SIN", "LHR", 3);
        assert_eq!(bundles[0].hotel.name, "great");
    }

    #[test]
    fn test_sort_bundles() {
        let flights = vec![flight(900, "25h"), flight(1500, "18h 10m"), flight(1200, "18h 5m")];
        let hotels = vec![hotel("x", 500, 9.0)];
        let mut bundles = create_bundles(&flights, &hotels, "SIN", "LHR", 3);

        sort_bundles(&mut bundles, BundleSort::Cheapest);
        assert_eq!(bundles[0].flight.price, 900);
        sort_bundles(&mut bundles, BundleSort::Fastest);
        assert_eq!(bundles[0].flight.duration, "18h 5m");
        sort_bundles(&mut bundles, BundleSort::Value);
        assert_eq!(bundles[0].flight.price, 900);
    }

    #[test]
    fn test_customized_total() {
        let addons = Addon::parse_list("bag,transfer,spa");
        assert_eq!(addons, vec![Addon::Bag, Addon::Transfer]);
        assert_eq!(customized_total(1000, 870, &addons), 1840);
        assert_eq!(customized_total(1000, 1000, &[]), 1840);
        assert_eq!(BundleSort::from_key("fastest"), BundleSort::Fastest);
        assert_eq!(BundleSort::from_key("bogus"), BundleSort::Value);
    }
}
