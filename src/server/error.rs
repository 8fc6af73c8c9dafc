//! Route-boundary errors.
//!
//! Every failure is logged where it happens and collapsed into one of these
//! variants, which always answer HTTP 500 with a fixed message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    AnalysisFailed,
    DashboardFailed,
}

impl ApiError {
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::AnalysisFailed => "Analysis failed",
            ApiError::DashboardFailed => "Failed to fetch dashboard data",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.message() })),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
