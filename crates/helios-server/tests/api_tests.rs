//! Integration tests for the Helios API.
//!
//! Tests drive the Axum router directly via `tower::ServiceExt` without
//! a TCP listener, with the scripted ephemeris source and a manual
//! clock standing in for the upstream and wall time.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use helios_cache::CacheStore;
use helios_engine::derived::{C_KM_PER_S, KM_PER_AU};
use helios_engine::{Clock, EngineConfig, ManualClock, SnapshotEngine};
use helios_horizons::{EphemerisSource, ScriptedSource};
use helios_server::{build_router, AppState};
use helios_types::{catalog, BodyKind, Velocity};

const TTL: u64 = 120_000;
const STALE: u64 = 60_000;

const PLANET_COUNT: u64 = 9;
const PROBE_COUNT: u64 = 2;

fn test_app() -> (Router, Arc<ScriptedSource>, Arc<ManualClock>) {
    let scripted = Arc::new(ScriptedSource::new());
    for (i, entry) in catalog(BodyKind::Planet).iter().enumerate() {
        let r = (i + 1) as f64;
        scripted.place(entry.name, r, 0.0, 0.0, Some(Velocity { vx: 0.0, vy: 0.0172, vz: 0.0 }));
    }
    scripted.place("earth", 1.0, 0.0, 0.0, Some(Velocity { vx: 0.0, vy: 0.0172, vz: 0.0 }));
    scripted.place("voyager1", 100.0, 0.0, 0.0, Some(Velocity { vx: 0.0099, vy: 0.0, vz: 0.0035 }));
    scripted.place("voyager2", -80.0, 30.0, -10.0, Some(Velocity { vx: -0.008, vy: 0.003, vz: 0.0 }));

    let (clock, handle) = Clock::manual(Utc::now());
    let engine = SnapshotEngine::new(
        EphemerisSource::Scripted(Arc::clone(&scripted)),
        CacheStore::memory_only(),
        EngineConfig { ttl_ms: TTL, stale_ms: STALE, prewarm_interval_ms: 0 },
        clock,
    );
    let router = build_router(Arc::new(AppState::new(engine)));
    (router, scripted, handle)
}

async fn get(router: &Router, uri: &str) -> axum::response::Response {
    router
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn header<'a>(response: &'a axum::response::Response, name: &str) -> &'a str {
    response.headers().get(name).unwrap().to_str().unwrap()
}

async fn wait_for_calls(scripted: &ScriptedSource, target: u64) {
    for _ in 0..200 {
        if scripted.calls() >= target {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("provider call count never reached {target} (got {})", scripted.calls());
}

// =========================================================================
// Scenario 1: cold MISS
// =========================================================================

#[tokio::test]
async fn cold_miss_serves_fresh_snapshot() {
    let (router, scripted, _clock) = test_app();

    let response = get(&router, "/api/ephemeris/planets").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-horizons-cache"), "MISS");
    assert_eq!(header(&response, "x-horizons-cache-backend"), "memory");
    assert_eq!(header(&response, "x-horizons-cache-age"), "0");
    assert_eq!(header(&response, "x-horizons-ttl"), &TTL.to_string());
    assert_eq!(header(&response, "x-horizons-cache-stale"), "0");
    assert_eq!(header(&response, "x-horizons-frozen"), "0");

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["metadata"]["cacheStatus"], "MISS");
    assert_eq!(json["metadata"]["distanceUnit"], "AU");
    let earth = json["bodies"]
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["name"] == "earth")
        .unwrap();
    assert_eq!(earth["x_au"], 1.0);
    assert_eq!(earth["vy"], 0.0172);

    assert_eq!(scripted.calls(), PLANET_COUNT);
}

#[tokio::test]
async fn snapshot_bodies_follow_catalog_order() {
    let (router, _scripted, _clock) = test_app();
    let response = get(&router, "/api/ephemeris/planets").await;
    let json = body_to_json(response.into_body()).await;

    let names: Vec<&str> = json["bodies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    let expected: Vec<&str> = catalog(BodyKind::Planet).iter().map(|e| e.name).collect();
    assert_eq!(names, expected);
}

// =========================================================================
// Scenario 2: warm HIT
// =========================================================================

#[tokio::test]
async fn warm_hit_does_not_touch_upstream() {
    let (router, scripted, clock) = test_app();

    get(&router, "/api/ephemeris/planets").await;
    clock.advance_ms(1_000);

    let response = get(&router, "/api/ephemeris/planets").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-horizons-cache"), "HIT");
    let age: u64 = header(&response, "x-horizons-cache-age").parse().unwrap();
    assert!(age > 0 && age < TTL);

    assert_eq!(scripted.calls(), PLANET_COUNT);
}

// =========================================================================
// Scenario 3: stale-while-revalidate
// =========================================================================

#[tokio::test]
async fn stale_serves_previous_snapshot_and_revalidates() {
    let (router, scripted, clock) = test_app();

    let first = get(&router, "/api/ephemeris/planets").await;
    let first_json = body_to_json(first.into_body()).await;

    clock.advance_ms((TTL + 1) as i64);
    let response = get(&router, "/api/ephemeris/planets").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-horizons-cache"), "STALE");
    assert_eq!(header(&response, "x-horizons-cache-stale"), "1");
    let age: u64 = header(&response, "x-horizons-cache-age").parse().unwrap();
    assert!(age >= TTL && age < TTL + STALE);

    let stale_json = body_to_json(response.into_body()).await;
    assert_eq!(stale_json["bodies"], first_json["bodies"]);
    assert_eq!(stale_json["timestamp"], first_json["timestamp"]);
    assert_eq!(stale_json["metadata"]["cacheStale"], true);

    // Exactly one revalidation cycle runs in the background.
    wait_for_calls(&scripted, PLANET_COUNT * 2).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(scripted.calls(), PLANET_COUNT * 2);
}

// =========================================================================
// Scenario 4: forced refresh
// =========================================================================

#[tokio::test]
async fn refresh_header_bypasses_fresh_record() {
    let (router, scripted, clock) = test_app();

    let first = get(&router, "/api/ephemeris/planets").await;
    let first_json = body_to_json(first.into_body()).await;
    clock.advance_ms(10);

    let response = router
        .clone()
        .oneshot(
            Request::get("/api/ephemeris/planets")
                .header("x-refresh-cache", "1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(header(&response, "x-horizons-cache"), "MISS");
    assert_eq!(scripted.calls(), PLANET_COUNT * 2);

    let json = body_to_json(response.into_body()).await;
    // The new record is cached strictly later than the old one.
    assert!(json["timestamp"].as_str().unwrap() > first_json["timestamp"].as_str().unwrap());
}

#[tokio::test]
async fn refresh_query_parameter_is_equivalent() {
    let (router, scripted, _clock) = test_app();

    get(&router, "/api/ephemeris/planets").await;
    let response = get(&router, "/api/ephemeris/planets?refresh=true").await;
    assert_eq!(header(&response, "x-horizons-cache"), "MISS");
    assert_eq!(scripted.calls(), PLANET_COUNT * 2);
}

// =========================================================================
// Scenario 5: frozen fallback
// =========================================================================

#[tokio::test]
async fn frozen_fallback_when_upstream_fails_past_stale_window() {
    let (router, scripted, clock) = test_app();

    get(&router, "/api/ephemeris/planets").await;

    scripted.fail_with("upstream returned 503");
    clock.advance_ms((TTL + STALE + 1) as i64);

    let response = get(&router, "/api/ephemeris/planets").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-horizons-cache"), "FROZEN");
    assert_eq!(header(&response, "x-horizons-frozen"), "1");
    assert_eq!(header(&response, "x-horizons-cache-stale"), "1");

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["metadata"]["frozenSnapshot"], true);
    assert_eq!(json["metadata"]["cacheExpiresInMs"], 0);
    assert!(!json["metadata"]["freezeReason"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn refresh_failure_with_empty_cache_is_a_500() {
    let (router, scripted, _clock) = test_app();
    scripted.fail_with("upstream returned 503");

    let response = router
        .clone()
        .oneshot(
            Request::get("/api/ephemeris/planets")
                .header("x-request-id", "req-err")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_to_json(response.into_body()).await;
    assert!(!json["error"].as_str().unwrap().is_empty());
    assert_eq!(json["requestId"], "req-err");
}

// =========================================================================
// Scenario 6: Voyager enrichment
// =========================================================================

#[tokio::test]
async fn voyagers_route_enriches_with_earth_distance() {
    let (router, _scripted, _clock) = test_app();

    let response = get(&router, "/api/voyagers").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["metadata"]["unitDistanceBase"], "AU");

    let voyagers = json["voyagers"].as_array().unwrap();
    assert_eq!(voyagers.len(), PROBE_COUNT as usize);

    let v1 = &voyagers[0];
    assert_eq!(v1["id"], "voyager1");
    assert_eq!(v1["name"], "Voyager 1");
    assert_eq!(v1["horizonsId"], "-31");

    // Voyager 1 at (100, 0, 0), Earth at (1, 0, 0): 99 AU apart.
    let earth_distance = v1["distanceFromEarth"]["au"].as_f64().unwrap();
    assert!((earth_distance - 99.0).abs() < 1e-9);

    let expected_minutes = 99.0 * KM_PER_AU / C_KM_PER_S / 60.0;
    let one_way_minutes = v1["lightTime"]["oneWayMinutes"].as_f64().unwrap();
    assert!((one_way_minutes - expected_minutes).abs() < 1e-6);

    let sun_km = v1["distanceFromSun"]["km"].as_f64().unwrap();
    assert!((sun_km - 100.0 * KM_PER_AU).abs() < 1.0);

    // Velocity-derived values are present for scripted probes.
    assert!(v1["speed"]["kmPerS"].as_f64().unwrap() > 0.0);
    assert!(v1["trajectory"]["velocityLatDeg"].as_f64().is_some());
}

#[tokio::test]
async fn voyagers_shares_the_planets_cache() {
    let (router, scripted, _clock) = test_app();

    // Warm the planets snapshot first.
    get(&router, "/api/ephemeris/planets").await;
    assert_eq!(scripted.calls(), PLANET_COUNT);

    // The voyagers route fetches only the probes; Earth comes from cache.
    get(&router, "/api/voyagers").await;
    assert_eq!(scripted.calls(), PLANET_COUNT + PROBE_COUNT);
}

// =========================================================================
// Correlation ids, aliases, metrics, health
// =========================================================================

#[tokio::test]
async fn request_id_is_echoed_in_headers_and_body() {
    let (router, _scripted, _clock) = test_app();

    let response = router
        .clone()
        .oneshot(
            Request::get("/api/ephemeris/planets")
                .header("x-request-id", "trace-me-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(header(&response, "x-request-id"), "trace-me-42");

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["metadata"]["requestId"], "trace-me-42");
}

#[tokio::test]
async fn generated_request_id_when_headers_absent() {
    let (router, _scripted, _clock) = test_app();
    let response = get(&router, "/api/ephemeris/planets").await;
    assert!(!header(&response, "x-request-id").is_empty());
}

#[tokio::test]
async fn state_vectors_alias_matches_planets_route() {
    let (router, scripted, _clock) = test_app();

    let response = get(&router, "/api/ephemeris/planets/state-vectors").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-horizons-cache"), "MISS");
    assert_eq!(scripted.calls(), PLANET_COUNT);

    // Both routes share one cache key.
    let response = get(&router, "/api/ephemeris/planets").await;
    assert_eq!(header(&response, "x-horizons-cache"), "HIT");
}

#[tokio::test]
async fn probes_route_serves_raw_snapshot() {
    let (router, scripted, _clock) = test_app();

    let response = get(&router, "/api/ephemeris/probes").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let names: Vec<&str> = json["bodies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["voyager1", "voyager2"]);
    assert_eq!(scripted.calls(), PROBE_COUNT);
}

#[tokio::test]
async fn health_string_on_root() {
    let (router, _scripted, _clock) = test_app();
    let response = get(&router, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn metrics_endpoint_renders_prometheus_text() {
    let (router, _scripted, _clock) = test_app();
    helios_server::metrics::init_metrics();

    // Generate some traffic so the counters exist.
    get(&router, "/api/ephemeris/planets").await;

    let response = get(&router, "/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(header(&response, "content-type").starts_with("text/plain"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("cache_misses"));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (router, _scripted, _clock) = test_app();
    let response = get(&router, "/api/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
