//! HTTP-level tests driving the router in-process

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use gridrisk_gateway::{
    build_router,
    routes::{AnalyzeResponse, SiteView},
    AppState, SiteAnalyzer,
};
use risk_scoring::{FixedScorer, LocationScorer, RiskScorer};
use site_report::PrintPdfEngine;
use site_store::{open_store, ConnectionMode, DbLocation, StoreConfig};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    router: Router,
    analyzer: SiteAnalyzer,
    _dir: TempDir,
}

fn test_app(scorer: Arc<dyn RiskScorer>, mode: ConnectionMode) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(DbLocation::File(dir.path().join("sites.db")), mode);
    let store = open_store(&config).unwrap();
    let analyzer = SiteAnalyzer::new(scorer, store, Arc::new(PrintPdfEngine));

    TestApp {
        router: build_router(AppState {
            analyzer: analyzer.clone(),
        }),
        analyzer,
        _dir: dir,
    }
}

fn fixed_app(score: i64) -> TestApp {
    test_app(Arc::new(FixedScorer::uniform(score)), ConnectionMode::PerRequest)
}

fn post_json(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn analyze(app: &TestApp, body: &str) -> AnalyzeResponse {
    let (status, body) = send(app, post_json("/analyze", body)).await;
    assert_eq!(status, StatusCode::OK, "body: {}", String::from_utf8_lossy(&body));
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_is_ok() {
    let app = fixed_app(7);
    for _ in 0..2 {
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "ok" }));
    }
}

#[tokio::test]
async fn test_analyze_with_fixed_score() {
    let app = fixed_app(7);
    let response = analyze(&app, r#"{"lat": 51.5, "lon": -0.12}"#).await;

    assert_eq!(response.score, 7);
    assert!(response.pdf_len > 0);
    assert!(Uuid::parse_str(&response.site_id).is_ok());
}

#[tokio::test]
async fn test_analyze_response_shape() {
    let app = fixed_app(7);
    let (_, body) = send(&app, post_json("/analyze", r#"{"lat": 51.5, "lon": -0.12}"#)).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    let keys: HashSet<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, HashSet::from(["site_id", "score", "pdf_len"]));
}

#[tokio::test]
async fn test_analyze_persists_exactly_one_row() {
    let app = fixed_app(7);
    let started = Utc::now();

    let response = analyze(&app, r#"{"lat": 51.5, "lon": -0.12}"#).await;

    let store = app.analyzer.store();
    assert_eq!(store.count().unwrap(), 1);

    let id = Uuid::parse_str(&response.site_id).unwrap();
    let record = store.get(&id).unwrap().unwrap();
    assert_eq!(record.lat, 51.5);
    assert_eq!(record.lon, -0.12);
    assert_eq!((record.connection, record.curtailment, record.delay), (7, 7, 7));
    assert!(record.created_at >= started);
}

#[tokio::test]
async fn test_same_coordinates_get_distinct_ids() {
    let app = fixed_app(7);
    let mut ids = HashSet::new();
    for _ in 0..3 {
        let response = analyze(&app, r#"{"lat": 51.5, "lon": -0.12}"#).await;
        assert!(ids.insert(response.site_id));
    }
    assert_eq!(app.analyzer.store().count().unwrap(), 3);
}

#[tokio::test]
async fn test_integer_coordinates_are_coerced() {
    let app = fixed_app(7);
    let response = analyze(&app, r#"{"lat": 51, "lon": 0}"#).await;
    assert_eq!(response.score, 7);
}

#[tokio::test]
async fn test_malformed_bodies_rejected_without_rows() {
    let app = fixed_app(7);
    let bodies = [
        r#"{"lat": "not-a-number"}"#,
        r#"{"lat": 51.5}"#,
        r#"{"lat": 51.5, "lon": null}"#,
        "not json",
    ];

    for body in bodies {
        let (status, _) = send(&app, post_json("/analyze", body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body: {}", body);
    }

    let missing_content_type = Request::builder()
        .method("POST")
        .uri("/analyze")
        .body(Body::from(r#"{"lat": 51.5, "lon": -0.12}"#))
        .unwrap();
    let (status, _) = send(&app, missing_content_type).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(app.analyzer.store().count().unwrap(), 0);
}

#[tokio::test]
async fn test_out_of_range_coordinates_rejected() {
    let app = fixed_app(7);
    let (status, body) = send(&app, post_json("/analyze", r#"{"lat": 123.0, "lon": 0.0}"#)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Coordinates out of range"));
    assert_eq!(app.analyzer.store().count().unwrap(), 0);
}

#[tokio::test]
async fn test_site_lookup_round_trip() {
    let app = test_app(
        Arc::new(FixedScorer::per_metric(90, 80, 70)),
        ConnectionMode::Shared,
    );
    let response = analyze(&app, r#"{"lat": 40.7128, "lon": -74.006}"#).await;
    assert_eq!(response.score, 80);

    let (status, body) = send(&app, get(&format!("/sites/{}", response.site_id))).await;
    assert_eq!(status, StatusCode::OK);

    let view: SiteView = serde_json::from_slice(&body).unwrap();
    assert_eq!(view.site_id, response.site_id);
    assert_eq!((view.connection, view.curtailment, view.delay), (90, 80, 70));
    assert_eq!(view.score, 80);
    assert_eq!(view.timeline_months, 12);
    assert!(view.risk_factors.is_empty());
}

#[tokio::test]
async fn test_site_lookup_errors() {
    let app = fixed_app(7);

    let (status, _) = send(&app, get(&format!("/sites/{}", Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get("/sites/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_site_report_is_pdf() {
    let app = test_app(Arc::new(LocationScorer::default()), ConnectionMode::PerRequest);
    let response = analyze(&app, r#"{"lat": 51.5, "lon": -0.12}"#).await;

    let request = get(&format!("/sites/{}/report", response.site_id));
    let raw = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(raw.status(), StatusCode::OK);
    assert_eq!(
        raw.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );

    let body = to_bytes(raw.into_body(), usize::MAX).await.unwrap();
    assert!(body.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn test_store_failure_is_opaque_500() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir(&data_dir).unwrap();
    let db_path = data_dir.join("sites.db");

    let config = StoreConfig::new(DbLocation::File(db_path.clone()), ConnectionMode::PerRequest);
    let store = open_store(&config).unwrap();
    let analyzer = SiteAnalyzer::new(
        Arc::new(FixedScorer::uniform(7)),
        store,
        Arc::new(PrintPdfEngine),
    );
    let router = build_router(AppState { analyzer });

    std::fs::remove_dir_all(&data_dir).unwrap();

    let response = router
        .oneshot(post_json("/analyze", r#"{"lat": 51.5, "lon": -0.12}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8_lossy(&body);
    assert!(!text.contains(&*db_path.to_string_lossy()));
    assert!(!text.contains("SQLite"));

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, serde_json::json!({ "error": "internal server error" }));
}
