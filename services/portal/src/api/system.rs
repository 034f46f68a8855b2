//! System/health API handlers.
//!
//! # Key invariants and assumptions
//! - Health checks are fast and side-effect free; they never call the
//!   identity service.
use crate::api::types::HealthStatus;
use crate::app::AppState;
use axum::Json;
use axum::extract::State;

#[utoipa::path(
    get,
    path = "/v1/system/health",
    tag = "system",
    responses(
        (status = 200, description = "Portal health", body = HealthStatus)
    )
)]
/// Return portal health and whether session endpoints are wired.
pub(crate) async fn system_health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        identity_source: state.identity.is_some(),
    })
}
