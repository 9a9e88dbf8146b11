//! API error type and its HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use risk_scoring::ScoringError;
use serde::Serialize;
use site_report::ReportError;
use site_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    #[error("Invalid site id: {0}")]
    InvalidSiteId(String),
    #[error("Site not found: {0}")]
    SiteNotFound(uuid::Uuid),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("Worker failed: {0}")]
    Worker(String),
}

/// Body text for every 5xx; details stay in the server log
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBody(_) | Self::Scoring(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidSiteId(_) => StatusCode::BAD_REQUEST,
            Self::SiteNotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Report(_) | Self::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            tracing::debug!("Request rejected: {}", self);
            self.to_string()
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::InvalidBody("x".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(ScoringError::OutOfRange { lat: 91.0, lon: 0.0 }).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::SiteNotFound(uuid::Uuid::nil()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(ReportError::EmptyOutput).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(StoreError::CorruptId("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_server_errors_are_opaque() {
        let (status, body) = body_of(ApiError::from(StoreError::CorruptId(
            "/var/lib/gridrisk/secret.db".into(),
        )))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": INTERNAL_ERROR_MESSAGE }));

        let (_, body) = body_of(ApiError::Worker("task panicked".into())).await;
        assert_eq!(body, serde_json::json!({ "error": INTERNAL_ERROR_MESSAGE }));
    }

    #[tokio::test]
    async fn test_client_errors_keep_detail() {
        let (status, body) = body_of(ApiError::InvalidSiteId("abc".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "Invalid site id: abc" }));
    }
}
