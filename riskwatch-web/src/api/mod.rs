//! HTTP API handlers for riskwatch-web

pub mod auth;
pub mod health;
pub mod history;
pub mod predict;
pub mod ui;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use riskwatch_common::RiskTier;
use serde::Serialize;
use serde_json::json;

/// Error type returned by API handlers
///
/// Authorization failures on page routes are handled structurally by the
/// route gates (redirects); API routes answer with a status code and a
/// JSON error body instead.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized,
    NotFound(String),
    /// Inference endpoint failure, carrying the server-supplied message
    Upstream(String),
    Internal(String),
}

impl From<riskwatch_common::Error> for ApiError {
    fn from(err: riskwatch_common::Error) -> Self {
        match err {
            riskwatch_common::Error::Rejected(msg) => ApiError::BadRequest(msg),
            riskwatch_common::Error::Missing(msg) => ApiError::NotFound(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Not signed in".to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Display view of a risk tier, recomputed from the label on every render
#[derive(Debug, Clone, Serialize)]
pub struct RiskView {
    pub tier: &'static str,
    pub label: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

impl From<RiskTier> for RiskView {
    fn from(tier: RiskTier) -> Self {
        Self {
            tier: match tier {
                RiskTier::Normal => "Normal",
                RiskTier::Detected => "Detected",
            },
            label: tier.display_text(),
            color: tier.color_class(),
            icon: tier.icon(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_errors_map_to_statuses() {
        let bad: ApiError = riskwatch_common::Error::Rejected("too short".to_string()).into();
        assert_eq!(bad.into_response().status(), StatusCode::BAD_REQUEST);

        let missing: ApiError = riskwatch_common::Error::Missing("domain".to_string()).into();
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let corrupt: ApiError = riskwatch_common::Error::Corrupt("row".to_string()).into();
        assert_eq!(
            corrupt.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
