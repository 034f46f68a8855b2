//! Portal HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
//!
//! # Notes
//! The route manifest is audited when state is built, so a portal configured
//! with looping redirect paths refuses to start.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::config::PortalConfig;
use anyhow::{Context, Result};
use axum::Router;
use ridegate_access::{RouteManifest, audit};
use ridegate_session::{
    CachedIdentitySource, HttpIdentitySource, IdentitySource, ResolvePolicy,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub type SharedIdentitySource = Arc<CachedIdentitySource<Arc<dyn IdentitySource>>>;

#[derive(Clone)]
pub struct AppState {
    pub manifest: Arc<RouteManifest>,
    pub longest_redirect_chain: usize,
    /// Absent when no identity service is configured.
    pub identity: Option<SharedIdentitySource>,
    pub resolve_policy: ResolvePolicy,
}

impl AppState {
    pub fn new(
        manifest: RouteManifest,
        identity: Option<SharedIdentitySource>,
        resolve_policy: ResolvePolicy,
    ) -> Result<Self> {
        let report = audit(&manifest).context("audit redirect graph")?;
        Ok(Self {
            manifest: Arc::new(manifest),
            longest_redirect_chain: report.longest_chain(),
            identity,
            resolve_policy,
        })
    }

    pub fn from_config(config: &PortalConfig) -> Result<Self> {
        let identity = config.identity_url.as_ref().map(|url| {
            tracing::info!(identity_url = %url, "session endpoints enabled");
            let source: Arc<dyn IdentitySource> = Arc::new(HttpIdentitySource::new(url.clone()));
            Arc::new(CachedIdentitySource::new(source, config.identity_ttl()))
        });
        Self::new(
            RouteManifest::with_paths(config.auth_paths.clone()),
            identity,
            config.resolve_policy(),
        )
    }
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            )
        });

    Router::new()
        .route(
            "/v1/system/health",
            axum::routing::get(api::system::system_health),
        )
        .route(
            "/v1/navigation",
            axum::routing::get(api::navigation::navigation),
        )
        .route("/v1/routes", axum::routing::get(api::navigation::routes))
        .route("/v1/manifest", axum::routing::get(api::navigation::manifest))
        .route(
            "/v1/access/evaluate",
            axum::routing::post(api::access::evaluate_access),
        )
        .route(
            "/v1/actions/evaluate",
            axum::routing::post(api::access::evaluate_action),
        )
        .route(
            "/v1/session/access",
            axum::routing::get(api::session::session_access),
        )
        .route(
            "/v1/session/invalidate",
            axum::routing::post(api::session::invalidate_session),
        )
        .route(
            "/v1/openapi.json",
            axum::routing::get(|| async { axum::Json(ApiDoc::openapi()) }),
        )
        .layer(trace_layer)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ridegate_access::AuthPaths;

    #[test]
    fn standard_manifest_passes_audit() {
        let state = AppState::new(RouteManifest::standard(), None, ResolvePolicy::default())
            .expect("state");
        assert!(state.longest_redirect_chain >= 1);
        assert!(state.identity.is_none());
    }

    #[test]
    fn looping_paths_refuse_to_start() {
        let paths = AuthPaths {
            verify: ridegate_access::RoutePath::from_static("/login"),
            ..AuthPaths::default()
        };
        let err = AppState::new(RouteManifest::with_paths(paths), None, ResolvePolicy::default())
            .err()
            .expect("audit failure");
        assert!(err.to_string().contains("audit redirect graph"));
    }

    #[test]
    fn config_with_identity_url_enables_sessions() {
        let config = PortalConfig {
            portal_bind: "127.0.0.1:0".parse().unwrap(),
            metrics_bind: "127.0.0.1:0".parse().unwrap(),
            identity_url: Some("http://identity.local/api/v1".to_string()),
            identity_ttl_ms: 1000,
            pending_timeout_ms: 1000,
            query_retries: 1,
            retry_backoff_ms: 10,
            auth_paths: AuthPaths::default(),
        };
        let state = AppState::from_config(&config).expect("state");
        assert!(state.identity.is_some());
        assert_eq!(state.resolve_policy.max_retries, 1);
    }
}
