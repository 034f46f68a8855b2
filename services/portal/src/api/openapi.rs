//! OpenAPI schema aggregation for the portal API.
use crate::api::{
    access, navigation, session, system,
    types::{
        AccessEvaluateRequest, ActionEvaluateRequest, DecisionResponse, ErrorResponse, GuardView,
        HealthStatus, IdentityInput, InvalidateResponse, ManifestResponse, MountedRouteView,
        NavEntryView, NavSectionView, NavigationResponse, RedirectView, RouteBindingView,
        RoutesResponse, VerdictResponse,
    },
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ridegate-portal",
        version = "v1",
        description = "Role-based navigation and access decisions for the ride-booking client"
    ),
    paths(
        system::system_health,
        navigation::navigation,
        navigation::routes,
        navigation::manifest,
        access::evaluate_access,
        access::evaluate_action,
        session::session_access,
        session::invalidate_session,
    ),
    components(schemas(
        ErrorResponse,
        HealthStatus,
        NavEntryView,
        NavSectionView,
        NavigationResponse,
        RouteBindingView,
        RoutesResponse,
        GuardView,
        MountedRouteView,
        ManifestResponse,
        IdentityInput,
        AccessEvaluateRequest,
        RedirectView,
        DecisionResponse,
        ActionEvaluateRequest,
        VerdictResponse,
        InvalidateResponse,
    )),
    tags(
        (name = "system", description = "Health"),
        (name = "navigation", description = "Navigation sections, route tables and the route manifest"),
        (name = "access", description = "Guard and action evaluation"),
        (name = "session", description = "Decisions for live sessions")
    )
)]
pub struct ApiDoc;
