//! HTTP API request/response types.
//!
//! # Purpose
//! Payload shapes for the portal REST API and its OpenAPI schema. Domain
//! values from `ridegate_access` are flattened into plain strings here so the
//! wire format stays stable when the domain types grow.
use ridegate_access::{
    AccessDecision, ActionVerdict, GuardPolicy, Identity, MountedRoute, NavEntry, NavSection,
    Profile, Redirect, Role, RouteBinding,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
    /// Whether session endpoints can reach an identity service.
    pub identity_source: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct NavEntryView {
    pub title: String,
    pub url: String,
    pub view: String,
}

impl From<&NavEntry> for NavEntryView {
    fn from(entry: &NavEntry) -> Self {
        Self {
            title: entry.title.to_string(),
            url: entry.url.to_string(),
            view: entry.view.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct NavSectionView {
    pub title: String,
    pub entries: Vec<NavEntryView>,
}

impl From<&NavSection> for NavSectionView {
    fn from(section: &NavSection) -> Self {
        Self {
            title: section.title.to_string(),
            entries: section.entries.iter().map(NavEntryView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NavigationResponse {
    /// Role the sections were built for; absent for the public navigation.
    pub role: Option<String>,
    pub sections: Vec<NavSectionView>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct RouteBindingView {
    pub path: String,
    pub view: String,
}

impl From<&RouteBinding> for RouteBindingView {
    fn from(binding: &RouteBinding) -> Self {
        Self {
            path: binding.path.to_string(),
            view: binding.view.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoutesResponse {
    pub role: Option<String>,
    /// Bindings in resolution order; the first match wins.
    pub bindings: Vec<RouteBindingView>,
    /// Bindings that can never match because an earlier one covers them.
    pub shadowed: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct GuardView {
    pub kind: String,
    pub role: Option<String>,
    pub target: Option<String>,
    pub excluded_roles: Vec<String>,
    pub feature: Option<String>,
}

impl From<&GuardPolicy> for GuardView {
    fn from(policy: &GuardPolicy) -> Self {
        match policy {
            GuardPolicy::RequireAuth { role } => Self {
                kind: "require_auth".to_string(),
                role: role.map(|role| role.as_str().to_string()),
                target: None,
                excluded_roles: Vec::new(),
                feature: None,
            },
            GuardPolicy::RedirectAuthenticated { target } => Self {
                kind: "redirect_authenticated".to_string(),
                role: None,
                target: Some(target.to_string()),
                excluded_roles: Vec::new(),
                feature: None,
            },
            GuardPolicy::ExcludeRoles { roles, feature } => Self {
                kind: "exclude_roles".to_string(),
                role: None,
                target: None,
                excluded_roles: roles.iter().map(|role| role.as_str().to_string()).collect(),
                feature: Some(feature.to_string()),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct MountedRouteView {
    pub path: String,
    pub view: String,
    /// Outermost guard first.
    pub guards: Vec<GuardView>,
}

impl From<&MountedRoute> for MountedRouteView {
    fn from(route: &MountedRoute) -> Self {
        Self {
            path: route.path.to_string(),
            view: route.view.as_str().to_string(),
            guards: route.guards.iter().map(GuardView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ManifestResponse {
    pub login_path: String,
    pub unauthorized_path: String,
    pub verify_path: String,
    pub routes: Vec<MountedRouteView>,
    /// Longest redirect chain found by the startup audit.
    pub longest_redirect_chain: usize,
    pub max_redirect_hops: usize,
}

/// Identity as supplied by callers of the evaluation endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct IdentityInput {
    /// One of `pending`, `resolved`, `absent`.
    pub status: String,
    pub role: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub email: String,
}

impl IdentityInput {
    /// Convert to a domain identity. Resolved identities with an unknown role
    /// are treated as signed out.
    pub fn into_identity(self) -> Result<Identity, String> {
        match self.status.as_str() {
            "pending" => Ok(Identity::Pending),
            "absent" => Ok(Identity::Absent),
            "resolved" => Ok(match Role::parse_lenient(self.role.as_deref()) {
                Some(role) => Identity::Resolved(Profile::new(role, self.verified, self.email)),
                None => Identity::Absent,
            }),
            other => Err(format!("unknown identity status: {other}")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct AccessEvaluateRequest {
    pub path: String,
    pub identity: IdentityInput,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct RedirectView {
    pub to: String,
    pub replace: bool,
    pub return_to: Option<String>,
    pub reason: String,
    pub notice: Option<String>,
}

impl From<&Redirect> for RedirectView {
    fn from(redirect: &Redirect) -> Self {
        Self {
            to: redirect.to.to_string(),
            replace: redirect.replace,
            return_to: redirect.return_to.as_ref().map(ToString::to_string),
            reason: redirect.reason.as_str().to_string(),
            notice: redirect.notice.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct DecisionResponse {
    pub path: String,
    /// Identity state the decision was made for.
    pub identity: String,
    /// One of `allow`, `placeholder`, `redirect`.
    pub decision: String,
    pub redirect: Option<RedirectView>,
}

impl DecisionResponse {
    pub fn new(path: &str, identity: &Identity, decision: &AccessDecision) -> Self {
        Self {
            path: path.to_string(),
            identity: identity.label().to_string(),
            decision: decision.label().to_string(),
            redirect: decision.redirect().map(RedirectView::from),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ActionEvaluateRequest {
    /// `submit_booking` or `estimate_fare`.
    pub action: String,
    pub identity: IdentityInput,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct VerdictResponse {
    pub action: String,
    /// One of `permitted`, `deferred`, `requires_authentication`,
    /// `forbidden_by_role`.
    pub verdict: String,
    pub permitted: bool,
    pub role: Option<String>,
    pub message: Option<String>,
}

impl VerdictResponse {
    pub fn new(action: &str, verdict: &ActionVerdict) -> Self {
        let (role, message) = match verdict {
            ActionVerdict::ForbiddenByRole { role, message } => {
                (Some(role.as_str().to_string()), Some(message.clone()))
            }
            ActionVerdict::Permitted
            | ActionVerdict::Deferred
            | ActionVerdict::RequiresAuthentication => (None, None),
        };
        Self {
            action: action.to_string(),
            verdict: verdict.label().to_string(),
            permitted: verdict.is_permitted(),
            role,
            message,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct InvalidateResponse {
    /// Whether a cached identity existed for the session.
    pub invalidated: bool,
}
