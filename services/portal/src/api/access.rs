//! Access and action evaluation handlers.
//!
//! # Purpose and responsibility
//! Lets clients (and tests) ask what the guards would do for a given identity
//! without holding a live session.
//!
//! # Key invariants and assumptions
//! - Every decision is counted in `ridegate_access_decisions_total`.
//! - Unmounted paths are 404; malformed paths and identities are 400.
use crate::api::error::{ApiError, api_not_found, api_validation_error};
use crate::api::types::{
    AccessEvaluateRequest, ActionEvaluateRequest, DecisionResponse, ErrorResponse,
    VerdictResponse,
};
use crate::app::AppState;
use axum::Json;
use axum::extract::State;
use ridegate_access::{AccessDecision, Identity, RideAction, RouteManifest, RoutePath, check_action};

/// Evaluate `path` for `identity` against the manifest and record the outcome.
pub(crate) fn decide(
    manifest: &RouteManifest,
    identity: &Identity,
    path: &str,
) -> Result<DecisionResponse, ApiError> {
    let path = RoutePath::parse(path).map_err(|err| api_validation_error(&err.to_string()))?;
    let decision: AccessDecision = manifest
        .evaluate(identity, path.as_str())
        .ok_or_else(|| api_not_found("no route mounted at path"))?;
    metrics::counter!("ridegate_access_decisions_total", "decision" => decision.label())
        .increment(1);
    Ok(DecisionResponse::new(path.as_str(), identity, &decision))
}

#[utoipa::path(
    post,
    path = "/v1/access/evaluate",
    tag = "access",
    request_body = AccessEvaluateRequest,
    responses(
        (status = 200, description = "Guard decision for the path", body = DecisionResponse),
        (status = 400, description = "Malformed path or identity", body = ErrorResponse),
        (status = 404, description = "Path not mounted", body = ErrorResponse)
    )
)]
pub(crate) async fn evaluate_access(
    State(state): State<AppState>,
    Json(request): Json<AccessEvaluateRequest>,
) -> Result<Json<DecisionResponse>, ApiError> {
    let identity = request
        .identity
        .into_identity()
        .map_err(|message| api_validation_error(&message))?;
    decide(&state.manifest, &identity, &request.path).map(Json)
}

#[utoipa::path(
    post,
    path = "/v1/actions/evaluate",
    tag = "access",
    request_body = ActionEvaluateRequest,
    responses(
        (status = 200, description = "Action verdict", body = VerdictResponse),
        (status = 400, description = "Unknown action or malformed identity", body = ErrorResponse)
    )
)]
pub(crate) async fn evaluate_action(
    Json(request): Json<ActionEvaluateRequest>,
) -> Result<Json<VerdictResponse>, ApiError> {
    let action = RideAction::from_name(&request.action)
        .ok_or_else(|| api_validation_error(&format!("unknown action: {}", request.action)))?;
    let identity = request
        .identity
        .into_identity()
        .map_err(|message| api_validation_error(&message))?;
    let verdict = check_action(&identity, action);
    Ok(Json(VerdictResponse::new(action.as_str(), &verdict)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use ridegate_access::Role;

    #[test]
    fn decide_rejects_relative_paths() {
        let manifest = RouteManifest::standard();
        let err = decide(&manifest, &Identity::Absent, "rider/history").expect_err("relative");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn decide_reports_unmounted_paths() {
        let manifest = RouteManifest::standard();
        let err = decide(&manifest, &Identity::Absent, "/nowhere").expect_err("unmounted");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn decide_redirects_wrong_role() {
        let manifest = RouteManifest::standard();
        let rider = Identity::resolved(Role::Rider, true, "r@example.com");
        let response = decide(&manifest, &rider, "/driver/overview").expect("decision");
        assert_eq!(response.decision, "redirect");
        let redirect = response.redirect.expect("redirect");
        assert_eq!(redirect.to, "/unauthorized");
        assert_eq!(redirect.reason, "role_mismatch");
    }
}
