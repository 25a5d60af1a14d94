// Integration tests: HTTP endpoints over a seeded SQLite store

mod common;

use axum_test::TestServer;
use chrono::Utc;
use common::MockStore;
use healthd::models::MetricKind;
use healthd::routes;
use healthd::store::SqliteHealthStore;
use healthd::version::{NAME, VERSION};
use std::sync::Arc;

async fn seeded_store(dir: &tempfile::TempDir, grant: bool) -> Arc<SqliteHealthStore> {
    let db_path = dir.path().join("health.db");
    let store = SqliteHealthStore::connect(db_path.to_str().unwrap(), 2)
        .await
        .unwrap();
    store.init().await.unwrap();
    if grant {
        store.grant_all().await.unwrap();
    }
    Arc::new(store)
}

#[tokio::test]
async fn root_greeting() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = seeded_store(&dir, true).await;
    let server = TestServer::new(routes::app(store)).unwrap();

    let res = server.get("/").await;
    res.assert_status_ok();
    assert!(res.text().contains("healthd"));
}

#[tokio::test]
async fn version_endpoint_reports_package_metadata() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = seeded_store(&dir, true).await;
    let server = TestServer::new(routes::app(store)).unwrap();

    let res = server.get("/version").await;
    res.assert_status_ok();
    let body: serde_json::Value = res.json();
    assert_eq!(body["name"], NAME);
    assert_eq!(body["version"], VERSION);
}

#[tokio::test]
async fn api_health_returns_all_six_keys() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = seeded_store(&dir, true).await;

    let now_ms = Utc::now().timestamp_millis();
    store
        .insert_quantity(MetricKind::HeartRate, 66.0, now_ms - 60_000, now_ms - 60_000)
        .await
        .unwrap();

    let server = TestServer::new(routes::app(store)).unwrap();
    let res = server.get("/api/health").await;
    res.assert_status_ok();

    let body: serde_json::Value = res.json();
    let map = body.as_object().unwrap();
    assert_eq!(map.len(), 6);
    for key in ["steps", "heart_rate", "hrv", "temperature", "spo2", "sleep_score"] {
        assert!(map.contains_key(key), "missing key {key}");
    }
    assert_eq!(body["heart_rate"], 66.0);
    assert_eq!(body["steps"], 0.0);
}

#[tokio::test]
async fn api_health_is_forbidden_without_granted_scopes() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = seeded_store(&dir, false).await;
    let server = TestServer::new(routes::app(store)).unwrap();

    let res = server.get("/api/health").await;
    res.assert_status(axum::http::StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json();
    assert!(body["error"].as_str().unwrap().contains("denied"));
}

#[tokio::test]
async fn api_health_is_service_unavailable_when_the_store_is_down() {
    let store = Arc::new(MockStore::unavailable());
    let server = TestServer::new(routes::app(store)).unwrap();

    let res = server.get("/api/health").await;
    res.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = res.json();
    assert!(body["error"].as_str().unwrap().contains("unavailable"));
}
