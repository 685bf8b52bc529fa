use crate::constants::{AIRPORTS, CITIES, DEFAULT_DESTINATION, DEFAULT_ORIGIN};
use crate::pipeline::{FlightFilter, Persona, Vibe, PERSONAS};
use crate::report::thousands;
use crate::types::{Bundle, Flight, FlightPriceRecord, VibeSearch};
use serde::Deserialize;

/// Rows shown on the flights dashboard before "... and N more".
pub const PRICE_ROWS: usize = 20;
/// Flights listed on the vibes dashboard before "+ N more".
pub const VIBE_ROWS: usize = 15;

// Query parameters

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VibeParams {
    pub vibe: Option<String>,
    pub persona: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SortParams {
    pub sort: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BundleParams {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub checkin: Option<String>,
    pub checkout: Option<String>,
    pub travelers: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteParams {
    pub bundle: Option<String>,
    pub flight: Option<String>,
    pub hotel: Option<String>,
    pub addons: Option<String>,
}

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

/// Present and non-blank.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl SearchParams {
    pub fn origin(&self) -> &str {
        or_default(&self.origin, DEFAULT_ORIGIN)
    }

    pub fn destination(&self) -> &str {
        or_default(&self.destination, DEFAULT_DESTINATION)
    }
}

impl VibeParams {
    pub fn filter(&self) -> FlightFilter {
        FlightFilter {
            vibes: non_empty(&self.vibe).map(Vibe::parse_list).unwrap_or_default(),
            persona: non_empty(&self.persona).and_then(Persona::from_key),
        }
    }
}

impl BundleParams {
    pub fn origin(&self) -> &str {
        or_default(&self.origin, DEFAULT_ORIGIN)
    }

    pub fn destination(&self) -> &str {
        or_default(&self.destination, DEFAULT_DESTINATION)
    }

    /// Defaults to 2 and never goes below 1.
    pub fn travelers(&self) -> u32 {
        non_empty(&self.travelers)
            .and_then(|t| t.parse().ok())
            .unwrap_or(2)
            .max(1)
    }
}

// View models handed to the templates

#[derive(Debug, Clone)]
pub struct LocationOption {
    pub code: &'static str,
    pub label: String,
    pub selected: bool,
}

pub fn airport_options(selected: &str) -> Vec<LocationOption> {
    AIRPORTS
        .iter()
        .map(|&(code, name)| LocationOption {
            code,
            label: format!("{code} - {name}"),
            selected: code == selected,
        })
        .collect()
}

pub fn city_options(selected: &str) -> Vec<LocationOption> {
    CITIES
        .iter()
        .map(|city| LocationOption {
            code: city.code,
            label: format!("{} {}", city.flag, city.name),
            selected: city.code == selected,
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct PriceRow {
    pub rank: usize,
    pub price: String,
    pub usd: String,
}

#[derive(Debug, Clone)]
pub struct FlightSummaryView {
    pub route: String,
    pub date: String,
    pub scraped_at: String,
    pub currency: &'static str,
    pub best_usd: String,
    pub min_price: String,
    pub max_price: String,
    pub airline_count: usize,
    pub airlines: Vec<String>,
    pub shortest_duration: String,
    pub rows: Vec<PriceRow>,
    pub remaining: usize,
}

impl From<&FlightPriceRecord> for FlightSummaryView {
    fn from(record: &FlightPriceRecord) -> Self {
        let symbol = &record.currency_symbol;
        let local = |price: u32| format!("{symbol}{}", thousands(u64::from(price)));
        let rows = record
            .prices
            .iter()
            .take(PRICE_ROWS)
            .enumerate()
            .map(|(i, price)| PriceRow {
                rank: i + 1,
                price: local(*price),
                usd: format!("${}", thousands(record.currency.to_usd(*price))),
            })
            .collect();
        Self {
            route: record.route.clone(),
            date: record.date.format("%Y-%m-%d").to_string(),
            scraped_at: record.scraped_at.format("%Y-%m-%d %H:%M").to_string(),
            currency: record.currency.code(),
            best_usd: format!("${}", thousands(record.min_usd)),
            min_price: record.min_price().map_or_else(|| "N/A".to_string(), local),
            max_price: record.max_price().map_or_else(|| "N/A".to_string(), local),
            airline_count: record.airlines.len(),
            airlines: record.airlines.clone(),
            shortest_duration: record.shortest_duration.clone(),
            rows,
            remaining: record.prices.len().saturating_sub(PRICE_ROWS),
        }
    }
}

/// Link to the vibes dashboard with `filter` applied.
pub fn filter_href(filter: &FlightFilter) -> String {
    let mut query = Vec::new();
    if !filter.vibes.is_empty() {
        let keys: Vec<&str> = filter.vibes.iter().map(Vibe::key).collect();
        query.push(format!("vibe={}", keys.join(",")));
    }
    if let Some(persona) = filter.persona {
        query.push(format!("persona={}", persona.key));
    }
    if query.is_empty() {
        "/".to_string()
    } else {
        format!("/?{}", query.join("&"))
    }
}

#[derive(Debug, Clone)]
pub struct VibeOption {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub tagline: &'static str,
    pub active: bool,
    /// Toggles this vibe, keeping the rest of the filter.
    pub href: String,
}

pub fn vibe_options(filter: &FlightFilter) -> Vec<VibeOption> {
    Vibe::ALL
        .into_iter()
        .map(|vibe| {
            let active = filter.vibes.contains(&vibe);
            let mut toggled = filter.clone();
            if active {
                toggled.vibes.retain(|v| *v != vibe);
            } else {
                toggled.vibes = Vibe::ALL
                    .into_iter()
                    .filter(|v| *v == vibe || filter.vibes.contains(v))
                    .collect();
            }
            VibeOption {
                key: vibe.key(),
                label: vibe.label(),
                description: vibe.description(),
                tagline: vibe.tagline(),
                active,
                href: filter_href(&toggled),
            }
        })
        .collect()
}

fn stops_label(stops: u32) -> String {
    if stops == 1 {
        "1 stop".to_string()
    } else {
        format!("{stops} stops")
    }
}

#[derive(Debug, Clone)]
pub struct FlightRow {
    pub airline: String,
    pub emoji: String,
    pub price: String,
    pub duration: String,
    pub depart: String,
    pub arrive: String,
    pub stops: String,
    pub carbon: u32,
}

impl From<&Flight> for FlightRow {
    fn from(flight: &Flight) -> Self {
        Self {
            airline: flight.airline.clone(),
            emoji: flight.emoji.clone(),
            price: format!("S${}", thousands(u64::from(flight.price))),
            duration: flight.duration.clone(),
            depart: flight.depart.clone(),
            arrive: flight.arrive.clone(),
            stops: stops_label(flight.stops),
            carbon: flight.carbon,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VibeSearchView {
    pub route: String,
    pub date: String,
    pub min_price: String,
    pub airline_count: usize,
    pub total: usize,
    pub matching: usize,
    pub flights: Vec<FlightRow>,
    pub remaining: usize,
}

impl VibeSearchView {
    pub fn new(search: &VibeSearch, filter: &FlightFilter) -> Self {
        let matching = filter.apply(&search.flights);
        Self {
            route: search.route.clone(),
            date: search.date.format("%Y-%m-%d").to_string(),
            min_price: format!("S${}", thousands(u64::from(search.min_price))),
            airline_count: search.airlines.len(),
            total: search.flights.len(),
            matching: matching.len(),
            flights: matching.iter().take(VIBE_ROWS).map(|f| FlightRow::from(*f)).collect(),
            remaining: matching.len().saturating_sub(VIBE_ROWS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PersonaView {
    pub key: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub vibe: &'static str,
    pub active: bool,
    pub href: String,
}

pub fn persona_options(filter: &FlightFilter) -> Vec<PersonaView> {
    PERSONAS
        .into_iter()
        .map(|persona| {
            let active = filter.persona == Some(persona);
            let toggled = FlightFilter {
                vibes: filter.vibes.clone(),
                persona: if active { None } else { Some(persona) },
            };
            PersonaView {
                key: persona.key,
                name: persona.name,
                emoji: persona.emoji,
                description: persona.description,
                vibe: persona.vibe,
                active,
                href: filter_href(&toggled),
            }
        })
        .collect()
}

/// One bundle card. `index` is the bundle's position in the cached search,
/// which is what the quote endpoint expects.
#[derive(Debug, Clone)]
pub struct BundleCard {
    pub index: usize,
    pub tag: &'static str,
    pub vibe_text: String,
    pub flight: FlightRow,
    pub origin: String,
    pub destination: String,
    pub nights: u32,
    pub hotel_name: String,
    pub stars: String,
    pub score: String,
    pub reviews: u32,
    pub location: String,
    pub per_night: String,
    pub total: String,
    pub savings: u32,
}

impl BundleCard {
    pub fn new(index: usize, position: usize, bundle: &Bundle) -> Self {
        let tag = if position == 0 {
            "🏆 BEST VALUE"
        } else if bundle.flight.duration_hours < 20 {
            "⚡ FASTEST"
        } else if bundle.flight.carbon < 800 {
            "🌱 ECO-FRIENDLY"
        } else {
            ""
        };
        Self {
            index,
            tag,
            vibe_text: bundle.vibe_text.clone(),
            flight: FlightRow::from(&bundle.flight),
            origin: bundle.origin.clone(),
            destination: bundle.destination.clone(),
            nights: bundle.nights,
            hotel_name: bundle.hotel.name.clone(),
            stars: "⭐".repeat(usize::from(bundle.hotel.stars)),
            score: format!("{:.1}", bundle.hotel.score),
            reviews: bundle.hotel.reviews,
            location: bundle.hotel.location.clone(),
            per_night: format!("S${}", thousands(u64::from(bundle.hotel.price_per_night))),
            total: format!("S${}", thousands(u64::from(bundle.total_price))),
            savings: bundle.savings,
        }
    }
}
