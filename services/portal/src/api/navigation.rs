//! Navigation, route-table and manifest handlers.
//!
//! # Purpose and responsibility
//! Serves the static navigation data so clients can render menus and mount
//! routers without hard-coding role layouts.
//!
//! # Key invariants and assumptions
//! - An unknown or missing `role` yields the public navigation, never an
//!   error.
//! - Output order is the resolution order; clients must not re-sort.
use crate::api::types::{
    ManifestResponse, MountedRouteView, NavSectionView, NavigationResponse, RouteBindingView,
    RoutesResponse,
};
use crate::app::AppState;
use axum::Json;
use axum::extract::{Query, State};
use ridegate_access::{MAX_REDIRECT_HOPS, Role, RouteTable, generate_routes, sections_for};
use std::collections::HashMap;

fn role_param(params: &HashMap<String, String>) -> Option<Role> {
    Role::parse_lenient(params.get("role").map(String::as_str))
}

#[utoipa::path(
    get,
    path = "/v1/navigation",
    tag = "navigation",
    params(
        ("role" = Option<String>, Query, description = "Role whose dashboard navigation to return")
    ),
    responses(
        (status = 200, description = "Ordered navigation sections", body = NavigationResponse)
    )
)]
pub(crate) async fn navigation(
    Query(params): Query<HashMap<String, String>>,
) -> Json<NavigationResponse> {
    let role = role_param(&params);
    Json(NavigationResponse {
        role: role.map(|role| role.as_str().to_string()),
        sections: sections_for(role).iter().map(NavSectionView::from).collect(),
    })
}

#[utoipa::path(
    get,
    path = "/v1/routes",
    tag = "navigation",
    params(
        ("role" = Option<String>, Query, description = "Role whose route bindings to return")
    ),
    responses(
        (status = 200, description = "Flattened route bindings", body = RoutesResponse)
    )
)]
pub(crate) async fn routes(Query(params): Query<HashMap<String, String>>) -> Json<RoutesResponse> {
    let role = role_param(&params);
    let table = RouteTable::new(generate_routes(role));
    let shadowed = table
        .shadowed()
        .into_iter()
        .map(|binding| binding.path.to_string())
        .collect();
    Json(RoutesResponse {
        role: role.map(|role| role.as_str().to_string()),
        bindings: table.bindings().iter().map(RouteBindingView::from).collect(),
        shadowed,
    })
}

#[utoipa::path(
    get,
    path = "/v1/manifest",
    tag = "navigation",
    responses(
        (status = 200, description = "Mounted routes with guard chains", body = ManifestResponse)
    )
)]
/// Return every mounted route with its guards, outermost first.
pub(crate) async fn manifest(State(state): State<AppState>) -> Json<ManifestResponse> {
    let paths = state.manifest.paths();
    Json(ManifestResponse {
        login_path: paths.login.to_string(),
        unauthorized_path: paths.unauthorized.to_string(),
        verify_path: paths.verify.to_string(),
        routes: state
            .manifest
            .routes()
            .iter()
            .map(MountedRouteView::from)
            .collect(),
        longest_redirect_chain: state.longest_redirect_chain,
        max_redirect_hops: MAX_REDIRECT_HOPS,
    })
}
