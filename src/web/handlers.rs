use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
};
use chrono::{Days, Local, Utc};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::apis::{BookingClient, Market, SkyscannerClient};
use crate::constants::{DEFAULT_DESTINATION, DEFAULT_ORIGIN};
use crate::observability::metrics::record_search;
use crate::pipeline::{create_bundles, customized_total, sort_bundles, Addon, BundleSort};
use crate::storage::ResultCache;
use crate::types::{parse_travel_date, BundleSearch, VibeSearch};
use crate::web::models::{
    airport_options, city_options, non_empty, persona_options, vibe_options, BundleCard,
    BundleParams, FlightSummaryView, QuoteParams, SearchParams, SortParams, VibeParams,
    VibeSearchView,
};
use crate::web::state::AppState;
use crate::web::templates::{BundlesTemplate, FlightsTemplate, VibesTemplate};

const VIBE_OFFERS: usize = 20;
const VIBE_ARRIVE_OFFSET: usize = 5;
const BUNDLE_ARRIVE_OFFSET: usize = 3;
const DEFAULT_LEAD_DAYS: u64 = 90;
const DEFAULT_STAY_NIGHTS: u64 = 3;
/// Longest stay a bundle search accepts.
const MAX_STAY_NIGHTS: i64 = 30;

fn default_date(extra_days: u64) -> String {
    let today = Local::now().date_naive();
    today
        .checked_add_days(Days::new(DEFAULT_LEAD_DAYS + extra_days))
        .unwrap_or(today)
        .format("%Y-%m-%d")
        .to_string()
}

fn render<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Template rendering failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!("<h1>Error rendering page: {}</h1>", e)),
            )
                .into_response()
        }
    }
}

/// A broken cache file renders like an empty one.
fn load_cached<T>(cache: &ResultCache<T>) -> Option<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    cache.load().unwrap_or_else(|e| {
        warn!(path = %cache.path().display(), "Failed to read cached results: {}", e);
        None
    })
}

fn failure(state: &AppState, message: impl Into<String>) -> Json<Value> {
    let message = message.into();
    warn!(dashboard = state.kind.label(), "Search failed: {}", message);
    record_search(state.kind.label(), "failure");
    Json(json!({ "success": false, "error": message }))
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "dashboard": state.kind.label(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

// Flights dashboard

pub async fn flights_index(State(state): State<AppState>) -> Response {
    let record = load_cached(&state.flight_cache);
    render(FlightsTemplate {
        origins: airport_options(DEFAULT_ORIGIN),
        destinations: airport_options(DEFAULT_DESTINATION),
        default_date: default_date(0),
        summary: record.as_ref().map(FlightSummaryView::from),
    })
}

pub async fn flights_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Value> {
    let Some(raw_date) = non_empty(&params.date) else {
        return failure(&state, "Date is required");
    };
    let Some(date) = parse_travel_date(raw_date) else {
        return failure(&state, format!("Invalid date '{raw_date}'"));
    };

    let client = SkyscannerClient::new(state.fetcher.clone(), Market::Singapore);
    let rules = state.config.flights.rules();
    match client.search(params.origin(), params.destination(), date, &rules).await {
        Ok(Some(record)) => {
            if let Err(e) = state.flight_cache.store(&record).await {
                return failure(&state, e.to_string());
            }
            info!(route = %record.route, prices = record.prices.len(), "Flight search stored");
            record_search(state.kind.label(), "success");
            Json(json!({ "success": true, "results": record }))
        }
        Ok(None) => failure(&state, "Failed to fetch results"),
        Err(e) => failure(&state, e.to_string()),
    }
}

// Vibes dashboard

pub async fn vibes_index(
    State(state): State<AppState>,
    Query(params): Query<VibeParams>,
) -> Response {
    let filter = params.filter();
    let vibes = vibe_options(&filter);
    let active = vibes.iter().filter(|v| v.active).cloned().collect();
    let search = load_cached(&state.vibe_cache);
    render(VibesTemplate {
        origins: airport_options(DEFAULT_ORIGIN),
        destinations: airport_options(DEFAULT_DESTINATION),
        default_date: default_date(0),
        vibes,
        active,
        filtered: !filter.is_empty(),
        personas: persona_options(&filter),
        search: search.as_ref().map(|s| VibeSearchView::new(s, &filter)),
    })
}

pub async fn vibes_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Value> {
    let Some(raw_date) = non_empty(&params.date) else {
        return failure(&state, "Date is required");
    };
    let Some(date) = parse_travel_date(raw_date) else {
        return failure(&state, format!("Invalid date '{raw_date}'"));
    };
    let (origin, destination) = (params.origin(), params.destination());

    let client = SkyscannerClient::new(state.fetcher.clone(), Market::Singapore);
    let rules = state.config.flights.rules();
    let offers = client
        .search_offers(origin, destination, date, &rules, VIBE_OFFERS, VIBE_ARRIVE_OFFSET)
        .await;
    match offers {
        Ok(Some((flights, prices, airlines))) => {
            let search = VibeSearch {
                route: format!("{origin} → {destination}"),
                origin: origin.to_string(),
                destination: destination.to_string(),
                date,
                min_price: prices.first().copied().unwrap_or(0),
                flights,
                airlines,
                scraped_at: Utc::now(),
            };
            if let Err(e) = state.vibe_cache.store(&search).await {
                return failure(&state, e.to_string());
            }
            info!(route = %search.route, flights = search.flights.len(), "Vibe search stored");
            record_search(state.kind.label(), "success");
            Json(json!({ "success": true }))
        }
        Ok(None) => failure(&state, "No results found"),
        Err(e) => failure(&state, e.to_string()),
    }
}

// Bundles dashboard

pub async fn bundles_index(
    State(state): State<AppState>,
    Query(params): Query<SortParams>,
) -> Response {
    let order = non_empty(&params.sort).map_or(BundleSort::default(), BundleSort::from_key);
    let cached = load_cached(&state.bundle_cache).map(|s| s.bundles).unwrap_or_default();

    let mut sorted = cached.clone();
    sort_bundles(&mut sorted, order);
    let bundles = sorted
        .iter()
        .enumerate()
        .map(|(position, bundle)| {
            let index = cached.iter().position(|b| b == bundle).unwrap_or(position);
            BundleCard::new(index, position, bundle)
        })
        .collect();

    render(BundlesTemplate {
        origins: city_options(DEFAULT_ORIGIN),
        destinations: city_options(DEFAULT_DESTINATION),
        default_checkin: default_date(0),
        default_checkout: default_date(DEFAULT_STAY_NIGHTS),
        sort: order.key(),
        bundles,
    })
}

pub async fn bundle_search(
    State(state): State<AppState>,
    Query(params): Query<BundleParams>,
) -> Json<Value> {
    let (Some(raw_checkin), Some(raw_checkout)) =
        (non_empty(&params.checkin), non_empty(&params.checkout))
    else {
        return failure(&state, "Dates required");
    };
    let (Some(checkin), Some(checkout)) = (parse_travel_date(raw_checkin), parse_travel_date(raw_checkout))
    else {
        return failure(&state, "Invalid dates");
    };
    let nights = (checkout - checkin).num_days();
    if !(1..=MAX_STAY_NIGHTS).contains(&nights) {
        return failure(&state, "Invalid dates");
    }
    let (origin, destination, travelers) =
        (params.origin(), params.destination(), params.travelers());

    let flights = SkyscannerClient::new(state.fetcher.clone(), Market::Singapore)
        .search_offers(
            origin,
            destination,
            checkin,
            &state.config.bundle_flight_rules(),
            state.config.bundles.max_flights,
            BUNDLE_ARRIVE_OFFSET,
        )
        .await;
    let flights = match flights {
        Ok(Some((flights, _, _))) => flights,
        Ok(None) => return failure(&state, "No flights found"),
        Err(e) => return failure(&state, e.to_string()),
    };

    let hotels = match BookingClient::new(state.fetcher.clone())
        .search_hotels(destination, checkin, checkout, travelers, &state.config.hotel_price_range())
        .await
    {
        Ok(hotels) => hotels,
        Err(e) => return failure(&state, e.to_string()),
    };

    let search = BundleSearch {
        bundles: create_bundles(&flights, &hotels, origin, destination, nights as u32),
        origin: origin.to_string(),
        destination: destination.to_string(),
        checkin,
        checkout,
        travelers,
        scraped_at: Utc::now(),
    };
    if let Err(e) = state.bundle_cache.store(&search).await {
        return failure(&state, e.to_string());
    }
    info!(
        origin,
        destination,
        nights,
        bundles = search.bundles.len(),
        "Bundle search stored"
    );
    record_search(state.kind.label(), "success");
    Json(json!({ "success": true }))
}

fn parse_index(raw: &Option<String>, what: &str) -> Result<Option<usize>, String> {
    match non_empty(raw) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| format!("Invalid {what} index '{value}'")),
    }
}

/// Reprices bundle `bundle` with the flight of cached bundle `flight` and the
/// hotel of cached bundle `hotel`, plus add-ons. Omitted indices keep the
/// bundle's own flight or hotel.
pub async fn bundle_quote(
    State(state): State<AppState>,
    Query(params): Query<QuoteParams>,
) -> Json<Value> {
    let error = |message: String| Json(json!({ "success": false, "error": message }));

    let indices = (
        parse_index(&params.bundle, "bundle"),
        parse_index(&params.flight, "flight"),
        parse_index(&params.hotel, "hotel"),
    );
    let (bundle_index, flight_index, hotel_index) = match indices {
        (Ok(b), Ok(f), Ok(h)) => (b.unwrap_or(0), f, h),
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => return error(e),
    };

    let Some(search) = load_cached(&state.bundle_cache) else {
        return error("No bundles available".to_string());
    };
    let Some(bundle) = search.bundles.get(bundle_index) else {
        return error(format!("Bundle {bundle_index} not found"));
    };
    let flight = match flight_index {
        Some(j) => match search.bundles.get(j) {
            Some(alt) => &alt.flight,
            None => return error(format!("Flight {j} not found")),
        },
        None => &bundle.flight,
    };
    let hotel = match hotel_index {
        Some(k) => match search.bundles.get(k) {
            Some(alt) => &alt.hotel,
            None => return error(format!("Hotel {k} not found")),
        },
        None => &bundle.hotel,
    };

    let addons = params.addons.as_deref().map(Addon::parse_list).unwrap_or_default();
    let total = customized_total(flight.price, hotel.price_total, &addons);
    Json(json!({ "success": true, "total": total }))
}
