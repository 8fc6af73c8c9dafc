//! The two API routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use tracing::error;

use crate::models::{AnalysisOutcome, AnalyzeRequest, DashboardData};
use crate::server::error::{ApiError, ApiResult};
use crate::server::AppState;
use crate::store::parse_session_id;

/// Create the API router.
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/api/analyze-trends", post(analyze_trends))
        .route("/api/dashboard-data/:session_id", get(dashboard_data))
}

/// Generate, store, and return a new analysis session.
async fn analyze_trends(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalysisOutcome>> {
    let Json(request) = payload.map_err(|e| {
        error!("Error in trend analysis: malformed request body: {}", e);
        ApiError::AnalysisFailed
    })?;

    let outcome = state.analyzer.analyze(&request).await.map_err(|e| {
        error!("Error in trend analysis: {}", e);
        ApiError::AnalysisFailed
    })?;

    Ok(Json(outcome))
}

/// Aggregate the stored trends of one session.
async fn dashboard_data(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<DashboardData>> {
    let session_id = parse_session_id(&session_id).map_err(|e| {
        error!("Error fetching dashboard data: {}", e);
        ApiError::DashboardFailed
    })?;

    let dashboard = state.analyzer.dashboard(session_id).await.map_err(|e| {
        error!("Error fetching dashboard data: {}", e);
        ApiError::DashboardFailed
    })?;

    Ok(Json(dashboard))
}
