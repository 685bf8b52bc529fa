pub mod bundles;
pub mod compare;
pub mod flights;
pub mod stats;

pub use bundles::{create_bundles, customized_total, sort_bundles, Addon, BundleSort};
pub use compare::compare_prices;
pub use flights::{build_offers, summarize_flights, FlightFilter, Persona, Vibe, PERSONAS};
pub use stats::{rating_distribution, PriceStats};
