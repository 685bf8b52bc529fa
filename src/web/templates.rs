use askama::Template;

use crate::web::models::{
    BundleCard, FlightSummaryView, LocationOption, PersonaView, VibeOption,
    VibeSearchView,
};

#[derive(Template)]
#[template(path = "flights.html")]
pub struct FlightsTemplate {
    pub origins: Vec<LocationOption>,
    pub destinations: Vec<LocationOption>,
    pub default_date: String,
    pub summary: Option<FlightSummaryView>,
}

#[derive(Template)]
#[template(path = "vibes.html")]
pub struct VibesTemplate {
    pub origins: Vec<LocationOption>,
    pub destinations: Vec<LocationOption>,
    pub default_date: String,
    pub vibes: Vec<VibeOption>,
    pub active: Vec<VibeOption>,
    pub filtered: bool,
    pub personas: Vec<PersonaView>,
    pub search: Option<VibeSearchView>,
}

#[derive(Template)]
#[template(path = "bundles.html")]
pub struct BundlesTemplate {
    pub origins: Vec<LocationOption>,
    pub destinations: Vec<LocationOption>,
    pub default_checkin: String,
    pub default_checkout: String,
    pub sort: &'static str,
    pub bundles: Vec<BundleCard>,
}
