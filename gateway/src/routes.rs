use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use risk_scoring::{BankabilityRating, Coordinates};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analyzer::{assessment_of, SiteAnalyzer};
use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: SiteAnalyzer,
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AnalyzeResponse {
    pub site_id: String,
    pub score: i64,
    pub pdf_len: usize,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SiteView {
    pub site_id: String,
    pub lat: f64,
    pub lon: f64,
    pub connection: i64,
    pub curtailment: i64,
    pub delay: i64,
    pub score: i64,
    pub rating: BankabilityRating,
    pub timeline_months: u32,
    pub risk_factors: Vec<String>,
    pub created_at: DateTime<Utc>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/sites/:id", get(get_site))
        .route("/sites/:id/report", get(get_site_report))
        .with_state(state)
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Score a coordinate pair, persist it and render its report
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let site = Coordinates::new(request.lat, request.lon);

    let analyzer = state.analyzer.clone();
    let analysis = run_blocking(move || analyzer.analyze(site)).await?;

    Ok(Json(AnalyzeResponse {
        site_id: analysis.record.id.to_string(),
        score: analysis.assessment.composite(),
        pdf_len: analysis.pdf_len,
    }))
}

pub async fn get_site(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SiteView>, ApiError> {
    let id = parse_site_id(&id)?;
    let analyzer = state.analyzer.clone();
    let record = run_blocking(move || analyzer.site(id)).await?;

    let assessment = assessment_of(&record);
    let rating = assessment.rating();
    Ok(Json(SiteView {
        site_id: record.id.to_string(),
        lat: record.lat,
        lon: record.lon,
        connection: record.connection,
        curtailment: record.curtailment,
        delay: record.delay,
        score: assessment.composite(),
        rating,
        timeline_months: rating.timeline_months(),
        risk_factors: assessment
            .risk_factors()
            .into_iter()
            .map(String::from)
            .collect(),
        created_at: record.created_at,
    }))
}

/// Re-render the PDF for a stored site
pub async fn get_site_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_site_id(&id)?;
    let analyzer = state.analyzer.clone();
    let pdf = run_blocking(move || analyzer.report(id)).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"site-{}.pdf\"", id),
        ),
    ];
    Ok((headers, pdf))
}

fn parse_site_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidSiteId(raw.to_string()))
}

async fn run_blocking<T, F>(op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| ApiError::Worker(e.to_string()))?
}
