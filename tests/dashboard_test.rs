use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use price_scraper::apis::{BookingClient, Market, SkyscannerClient};
use price_scraper::config::Config;
use price_scraper::infra::StaticFetcher;
use price_scraper::web::{app_router, AppState, DashboardKind};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;
use tower::ServiceExt;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, day).unwrap()
}

fn router(kind: DashboardKind, data_dir: &Path, fetcher: StaticFetcher) -> Router {
    let mut config = Config::default();
    config.storage.data_dir = data_dir.to_path_buf();
    app_router(AppState::new(kind, config, Arc::new(fetcher)))
}

async fn get(app: &Router, uri: &str) -> Result<(StatusCode, String)> {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, String::from_utf8(bytes.to_vec())?))
}

async fn get_json(app: &Router, uri: &str) -> Result<Value> {
    let (status, body) = get(app, uri).await?;
    assert_eq!(status, StatusCode::OK, "{uri}: {body}");
    Ok(serde_json::from_str(&body)?)
}

#[tokio::test]
async fn test_health_and_metrics_without_recorder() -> Result<()> {
    let dir = tempdir()?;
    let app = router(DashboardKind::Vibes, dir.path(), StaticFetcher::new());

    let health = get_json(&app, "/health").await?;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["dashboard"], "vibes");

    let (status, _) = get(&app, "/metrics").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_flights_search_updates_dashboard() -> Result<()> {
    let dir = tempdir()?;
    let url = SkyscannerClient::search_url("SIN", "LHR", date(12), Market::Singapore);
    let fetcher = StaticFetcher::new().with_page(
        &url,
        "<div>Emirates 09:05 18h 35m $1,480</div><div>Emirates 22:40 $1,120</div>",
    );
    let app = router(DashboardKind::Flights, dir.path(), fetcher);

    let (status, body) = get(&app, "/").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No results yet"));

    let response = get_json(&app, "/api/search?origin=SIN&destination=LHR&date=2026-06-12").await?;
    assert_eq!(response["success"], true);
    assert_eq!(response["results"]["prices"], json!([1120, 1480]));
    assert_eq!(response["results"]["currency"], "SGD");
    assert_eq!(response["results"]["min_usd"], 840);
    assert!(dir.path().join("flight_results.json").exists());

    let (_, body) = get(&app, "/").await?;
    assert!(body.contains("SIN → LHR"));
    assert!(body.contains("S$1,120"));
    assert!(body.contains("18h 35m"));
    Ok(())
}

#[tokio::test]
async fn test_flights_search_errors() -> Result<()> {
    let dir = tempdir()?;
    let app = router(DashboardKind::Flights, dir.path(), StaticFetcher::new());

    let missing = get_json(&app, "/api/search?origin=SIN&destination=NYCA").await?;
    assert_eq!(missing, json!({ "success": false, "error": "Date is required" }));

    let failed = get_json(&app, "/api/search?date=2026-06-12").await?;
    assert_eq!(failed, json!({ "success": false, "error": "Failed to fetch results" }));

    let transport = router(DashboardKind::Flights, dir.path(), StaticFetcher::failing());
    let errored = get_json(&transport, "/api/search?date=2026-06-12").await?;
    assert_eq!(errored["success"], false);
    assert!(!errored["error"].as_str().unwrap_or_default().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_vibes_filter_cached_flights() -> Result<()> {
    let dir = tempdir()?;
    let url = SkyscannerClient::search_url("SIN", "NYCA", date(12), Market::Singapore);
    let fetcher = StaticFetcher::new()
        .with_page(&url, "Emirates 09:05 13:30 18h 35m $650 $1,120 $1,900");
    let app = router(DashboardKind::Vibes, dir.path(), fetcher);

    let empty = get_json(&app, "/api/search?date=2026-06-13").await?;
    assert_eq!(empty, json!({ "success": false, "error": "No results found" }));

    let stored = get_json(&app, "/api/search?date=2026-06-12").await?;
    assert_eq!(stored, json!({ "success": true }));

    let (_, all) = get(&app, "/").await?;
    assert!(all.contains("S$650"));
    assert!(all.contains("S$1,900"));
    assert!(all.contains("Budget Backpacker"));

    let (_, whim) = get(&app, "/?vibe=on_a_whim").await?;
    assert!(!whim.contains("S$1,900"));

    let (_, treat) = get(&app, "/?vibe=treat_yourself").await?;
    assert!(treat.contains("S$1,900"));
    assert!(!treat.contains("S$1,120"));

    let (_, either) = get(&app, "/?vibe=on_a_whim,treat_yourself").await?;
    assert!(either.contains("S$1,900"));
    assert!(!either.contains("S$1,120"));

    let (_, backpacker) = get(&app, "/?vibe=on_a_whim,treat_yourself&persona=budget_backpacker").await?;
    assert!(!backpacker.contains("S$1,900"));
    assert!(!backpacker.contains("S$1,120"));
    assert!(backpacker.contains("Budget Backpacker"));

    let (_, nomad) = get(&app, "/?persona=digital_nomad").await?;
    assert!(nomad.contains("S$1,120"));

    let (_, red_eye) = get(&app, "/?vibe=red_eye").await?;
    assert!(red_eye.contains("No flights match your vibe"));
    Ok(())
}

#[tokio::test]
async fn test_bundle_validation() -> Result<()> {
    let dir = tempdir()?;
    let app = router(DashboardKind::Bundles, dir.path(), StaticFetcher::new());

    let missing = get_json(&app, "/api/bundle?checkin=2026-06-12").await?;
    assert_eq!(missing, json!({ "success": false, "error": "Dates required" }));

    let reversed = get_json(&app, "/api/bundle?checkin=2026-06-15&checkout=2026-06-12").await?;
    assert_eq!(reversed, json!({ "success": false, "error": "Invalid dates" }));

    let same_day = get_json(&app, "/api/bundle?checkin=2026-06-12&checkout=2026-06-12").await?;
    assert_eq!(same_day["error"], "Invalid dates");

    let far_future = get_json(&app, "/api/bundle?checkin=2026-06-12&checkout=%2B99999-01-01").await?;
    assert_eq!(far_future, json!({ "success": false, "error": "Invalid dates" }));

    let two_months = get_json(&app, "/api/bundle?checkin=2026-06-12&checkout=2026-08-12").await?;
    assert_eq!(two_months["error"], "Invalid dates");

    let no_flights = get_json(&app, "/api/bundle?checkin=2026-06-12&checkout=2026-06-15").await?;
    assert_eq!(no_flights, json!({ "success": false, "error": "No flights found" }));

    let no_cache = get_json(&app, "/api/bundle/quote?bundle=0").await?;
    assert_eq!(no_cache["success"], false);
    Ok(())
}

#[tokio::test]
async fn test_bundle_search_and_quote() -> Result<()> {
    let dir = tempdir()?;
    let flights = SkyscannerClient::search_url("SIN", "NYCA", date(12), Market::Singapore);
    let hotels = BookingClient::search_url("NYCA", date(12), date(15), 2);
    let fetcher = StaticFetcher::new()
        .with_page(&flights, "Emirates 09:05 25h 10m $1,200")
        .with_page(&hotels, r#"<div data-testid="title">Harbour Inn</div><span>SGD 900</span>"#);
    let app = router(DashboardKind::Bundles, dir.path(), fetcher);

    let built = get_json(
        &app,
        "/api/bundle?origin=SIN&destination=NYCA&checkin=2026-06-12&checkout=2026-06-15&travelers=2",
    )
    .await?;
    assert_eq!(built, json!({ "success": true }));
    assert!(dir.path().join("bundles.json").exists());

    let (status, page) = get(&app, "/?sort=cheapest").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Harbour Inn"));
    assert!(page.contains("S$300/night"));

    let plain = get_json(&app, "/api/bundle/quote?bundle=0").await?;
    assert_eq!(plain, json!({ "success": true, "total": 1932 }));

    let extras = get_json(&app, "/api/bundle/quote?bundle=0&flight=0&hotel=0&addons=bag,transfer").await?;
    assert_eq!(extras, json!({ "success": true, "total": 2052 }));

    let missing = get_json(&app, "/api/bundle/quote?bundle=3").await?;
    assert_eq!(missing["success"], false);
    assert_eq!(missing["error"], "Bundle 3 not found");
    Ok(())
}
