use axum::{http::Method, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::web::handlers::{
    bundle_quote, bundle_search, bundles_index, flights_index, flights_search, health, metrics,
    vibes_index, vibes_search,
};
use crate::web::state::{AppState, DashboardKind};

/// Routes for the dashboard named by `state.kind`, plus `/health` and `/metrics`.
pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    let dashboard = match state.kind {
        DashboardKind::Flights => Router::new()
            .route("/", get(flights_index))
            .route("/api/search", get(flights_search)),
        DashboardKind::Vibes => Router::new()
            .route("/", get(vibes_index))
            .route("/api/search", get(vibes_search)),
        DashboardKind::Bundles => Router::new()
            .route("/", get(bundles_index))
            .route("/api/bundle", get(bundle_search))
            .route("/api/bundle/quote", get(bundle_quote)),
    };

    dashboard
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
