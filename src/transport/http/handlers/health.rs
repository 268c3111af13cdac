use crate::transport::http::handlers::common::data_response;
use crate::transport::http::types::{AppState, HealthReport};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = ApiResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    let report = HealthReport {
        status: "Healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: state.config.version.clone(),
        environment: state.config.environment.clone(),
    };
    data_response(StatusCode::OK, "API is healthy", &report, "reporting health")
}
