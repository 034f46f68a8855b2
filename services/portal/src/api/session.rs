//! Live-session handlers.
//!
//! # Purpose and responsibility
//! Resolves the caller's identity through the configured identity service
//! and reports what the guards decide for a path.
//!
//! # Key invariants and assumptions
//! - A request without a bearer token is evaluated as signed out; the
//!   identity service is not called.
//! - Identity-service failures never surface as errors: the resolver retries
//!   and then fails closed.
//!
//! # Security considerations
//! - Tokens are only forwarded to the identity service, never logged.
use crate::api::access::decide;
use crate::api::error::{ApiError, api_not_enabled, api_unauthorized, api_validation_error};
use crate::api::types::{DecisionResponse, ErrorResponse, InvalidateResponse};
use crate::app::{AppState, SharedIdentitySource};
use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use ridegate_access::Identity;
use ridegate_session::{SessionKey, resolve_identity};
use std::collections::HashMap;

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?;
    let value = value.to_str().ok()?;
    value.strip_prefix("Bearer ").filter(|token| !token.is_empty())
}

fn identity_source(state: &AppState) -> Result<&SharedIdentitySource, ApiError> {
    state
        .identity
        .as_ref()
        .ok_or_else(|| api_not_enabled("no identity service configured"))
}

#[utoipa::path(
    get,
    path = "/v1/session/access",
    tag = "session",
    params(
        ("path" = String, Query, description = "Path the session wants to view")
    ),
    responses(
        (status = 200, description = "Guard decision for the live session", body = DecisionResponse),
        (status = 400, description = "Missing or malformed path", body = ErrorResponse),
        (status = 404, description = "Path not mounted or sessions disabled", body = ErrorResponse)
    )
)]
pub(crate) async fn session_access(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<DecisionResponse>, ApiError> {
    let source = identity_source(&state)?;
    let path = params
        .get("path")
        .ok_or_else(|| api_validation_error("missing path query parameter"))?;
    let identity = match extract_bearer(&headers) {
        Some(token) => {
            resolve_identity(source, &SessionKey::new(token), &state.resolve_policy).await
        }
        None => Identity::Absent,
    };
    decide(&state.manifest, &identity, path).map(Json)
}

#[utoipa::path(
    post,
    path = "/v1/session/invalidate",
    tag = "session",
    responses(
        (status = 200, description = "Cached identity dropped", body = InvalidateResponse),
        (status = 401, description = "Missing bearer token", body = ErrorResponse),
        (status = 404, description = "Sessions disabled", body = ErrorResponse)
    )
)]
/// Drop the cached identity for the caller's session, e.g. after login,
/// logout or a role change.
pub(crate) async fn invalidate_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<InvalidateResponse>, ApiError> {
    let source = identity_source(&state)?;
    let token = extract_bearer(&headers).ok_or_else(|| api_unauthorized("missing bearer token"))?;
    let invalidated = source.invalidate(&SessionKey::new(token));
    tracing::debug!(invalidated, "session identity invalidated");
    Ok(Json(InvalidateResponse { invalidated }))
}
