use crate::constants::airline_emoji;
use crate::parser::flights::{leading_hours, shortest_duration};
use crate::parser::FlightExtraction;
use crate::types::{Currency, Flight, FlightPriceRecord};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

const FALLBACK_AIRLINE: &str = "Unknown";
const FALLBACK_DURATION: &str = "20h";
const FALLBACK_DEPART: &str = "08:00";
const FALLBACK_ARRIVE: &str = "18:00";
/// kg CO2 per flight hour.
const CARBON_PER_HOUR: u32 = 45;

pub fn summarize_flights(
    extraction: &FlightExtraction,
    currency: Currency,
    origin: &str,
    destination: &str,
    date: NaiveDate,
) -> FlightPriceRecord {
    let min_usd = extraction
        .prices
        .first()
        .map_or(0, |min| currency.to_usd(*min));
    FlightPriceRecord {
        route: format!("{origin} → {destination}"),
        origin: origin.to_string(),
        destination: destination.to_string(),
        date,
        currency,
        currency_symbol: currency.symbol().to_string(),
        usd_rate: currency.usd_rate(),
        prices: extraction.prices.clone(),
        min_usd,
        airlines: extraction.airlines.clone(),
        times: extraction.times.clone(),
        durations: extraction.durations.clone(),
        shortest_duration: shortest_duration(&extraction.durations)
            .unwrap_or_else(|| "N/A".to_string()),
        scraped_at: Utc::now(),
    }
}

fn cycle<'a>(items: &'a [String], index: usize, fallback: &'a str) -> &'a str {
    if items.is_empty() {
        fallback
    } else {
        &items[index % items.len()]
    }
}

/// Turns the cheapest `limit` prices into offers. Airlines, durations and
/// times are not tied to prices on the page, so they are assigned round-robin.
pub fn build_offers(extraction: &FlightExtraction, limit: usize, arrive_offset: usize) -> Vec<Flight> {
    extraction
        .prices
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, price)| {
            let airline = cycle(&extraction.airlines, i, FALLBACK_AIRLINE);
            let duration = cycle(&extraction.durations, i, FALLBACK_DURATION);
            let hours = leading_hours(duration).unwrap_or(20);
            Flight {
                airline: airline.to_string(),
                emoji: airline_emoji(airline).to_string(),
                price: *price,
                duration: duration.to_string(),
                duration_hours: hours,
                depart: cycle(&extraction.times, i, FALLBACK_DEPART).to_string(),
                arrive: cycle(&extraction.times, i + arrive_offset, FALLBACK_ARRIVE).to_string(),
                stops: if hours < 22 { 1 } else { 2 },
                carbon: hours * CARBON_PER_HOUR,
            }
        })
        .collect()
}

/// Mood-based flight filters for the vibes dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Vibe {
    OnAWhim,
    NeedSpeed,
    ExtraBaggage,
    EcoFriendly,
    RedEye,
    TreatYourself,
}

impl Vibe {
    pub const ALL: [Vibe; 6] = [
        Vibe::OnAWhim,
        Vibe::NeedSpeed,
        Vibe::ExtraBaggage,
        Vibe::EcoFriendly,
        Vibe::RedEye,
        Vibe::TreatYourself,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Vibe::OnAWhim => "on_a_whim",
            Vibe::NeedSpeed => "need_speed",
            Vibe::ExtraBaggage => "extra_baggage",
            Vibe::EcoFriendly => "eco_friendly",
            Vibe::RedEye => "red_eye",
            Vibe::TreatYourself => "treat_yourself",
        }
    }

    pub fn from_key(key: &str) -> Option<Vibe> {
        Self::ALL.into_iter().find(|v| v.key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Vibe::OnAWhim => "On a whim ✈️",
            Vibe::NeedSpeed => "Need for speed 🚀",
            Vibe::ExtraBaggage => "Extra baggage 🧳",
            Vibe::EcoFriendly => "Planet-friendly 🌍",
            Vibe::RedEye => "Red-eye warrior 🌙",
            Vibe::TreatYourself => "Treat yourself 💅",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Vibe::OnAWhim => "Spontaneous getaway energy",
            Vibe::NeedSpeed => "Get there fastest",
            Vibe::ExtraBaggage => "For the overpacker in you",
            Vibe::EcoFriendly => "Lowest carbon footprint",
            Vibe::RedEye => "Sleep on the plane, save on hotels",
            Vibe::TreatYourself => "You deserve this",
        }
    }

    pub fn tagline(&self) -> &'static str {
        match self {
            Vibe::OnAWhim => "Life's too short for planning",
            Vibe::NeedSpeed => "Time is money, bestie",
            Vibe::ExtraBaggage => "Yes, you need all 3 suitcases",
            Vibe::EcoFriendly => "Less stops = less emissions",
            Vibe::RedEye => "Arrive at dawn, ready to explore",
            Vibe::TreatYourself => "Premium vibes only",
        }
    }

    pub fn matches(&self, flight: &Flight) -> bool {
        match self {
            Vibe::OnAWhim => flight.price < 800,
            Vibe::NeedSpeed => flight.duration_hours < 20,
            Vibe::ExtraBaggage => {
                flight.airline.contains("Singapore Airlines") || flight.airline.contains("Emirates")
            }
            Vibe::EcoFriendly => flight.stops <= 1,
            Vibe::RedEye => depart_hour(flight).is_some_and(|hour| hour >= 20 || hour <= 6),
            Vibe::TreatYourself => flight.price > 1500,
        }
    }

    /// Comma-separated keys; unknown keys and repeats are dropped.
    pub fn parse_list(list: &str) -> Vec<Vibe> {
        let wanted: Vec<Vibe> = list.split(',').filter_map(|key| Vibe::from_key(key.trim())).collect();
        Self::ALL.into_iter().filter(|v| wanted.contains(v)).collect()
    }
}

fn depart_hour(flight: &Flight) -> Option<u32> {
    flight.depart.split(':').next()?.trim().parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Persona {
    pub key: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub vibe: &'static str,
}

impl Persona {
    pub fn from_key(key: &str) -> Option<Persona> {
        PERSONAS.into_iter().find(|p| p.key == key)
    }

    pub fn matches(&self, flight: &Flight) -> bool {
        match self.key {
            "budget_backpacker" => flight.price < 900,
            "digital_nomad" => flight.duration_hours > 15,
            "bougie_traveler" => ["Singapore", "Emirates", "Cathay"]
                .iter()
                .any(|name| flight.airline.contains(name)),
            "family_planner" => flight.stops <= 1,
            "eco_warrior" => flight.carbon < 1000,
            "spontaneous_soul" => flight.price < 850,
            _ => true,
        }
    }
}

pub const PERSONAS: [Persona; 6] = [
    Persona {
        key: "budget_backpacker",
        name: "Budget Backpacker",
        emoji: "🎒",
        description: "Maximum adventure, minimum spend",
        vibe: "You're not here for luxury. You're here for the story.",
    },
    Persona {
        key: "digital_nomad",
        name: "Digital Nomad",
        emoji: "💻",
        description: "Work from anywhere, live everywhere",
        vibe: "Your office has the best views in the world.",
    },
    Persona {
        key: "bougie_traveler",
        name: "Bougie Traveler",
        emoji: "✨",
        description: "Life's too short for budget airlines",
        vibe: "Main character energy, premium seats only.",
    },
    Persona {
        key: "family_planner",
        name: "Family Planner",
        emoji: "👨‍👩‍👧‍👦",
        description: "Keeping everyone happy (somehow)",
        vibe: "Snacks packed, tablets charged, let's go!",
    },
    Persona {
        key: "eco_warrior",
        name: "Eco Warrior",
        emoji: "🌱",
        description: "Travel light on the planet",
        vibe: "Adventure shouldn't cost the Earth.",
    },
    Persona {
        key: "spontaneous_soul",
        name: "Spontaneous Soul",
        emoji: "🎲",
        description: "Book now, figure it out later",
        vibe: "The best trips are the unplanned ones.",
    },
];

/// Selected vibes (any may match) narrowed by an optional persona.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightFilter {
    pub vibes: Vec<Vibe>,
    pub persona: Option<Persona>,
}

impl FlightFilter {
    pub fn is_empty(&self) -> bool {
        self.vibes.is_empty() && self.persona.is_none()
    }

    pub fn matches(&self, flight: &Flight) -> bool {
        let vibe_ok = self.vibes.is_empty() || self.vibes.iter().any(|v| v.matches(flight));
        vibe_ok && self.persona.map_or(true, |p| p.matches(flight))
    }

    /// Matching flights, cheapest first.
    pub fn apply<'a>(&self, flights: &'a [Flight]) -> Vec<&'a Flight> {
        let mut kept: Vec<&Flight> = flights.iter().filter(|f| self.matches(f)).collect();
        kept.sort_by_key(|f| f.price);
        kept
    }
}
