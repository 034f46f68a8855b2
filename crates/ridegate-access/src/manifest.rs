//! The application's mounted routes and the guards wrapping each of them.
//!
//! # Purpose
//! Joins the role registry with the access guard: public pages, auth entry
//! pages, redirect terminals, and one guarded tree per role.
//!
//! # Key invariants
//! - Every role dashboard route requires exactly that role.
//! - Redirect terminals (`/verify`, `/unauthorized`) carry no guards.
//! - Resolution is first-match-wins in mount order.
//!
//! # Examples
//! ```rust
//! use ridegate_access::{AccessDecision, Identity, Role, RouteManifest};
//!
//! let manifest = RouteManifest::standard();
//! let rider = Identity::resolved(Role::Rider, true, "r@example.com");
//! assert_eq!(
//!     manifest.evaluate(&rider, "/rider/wallet"),
//!     Some(AccessDecision::Allow)
//! );
//! ```
use crate::{
    AccessDecision, AuthPaths, GuardPolicy, Identity, Profile, Role, RouteBinding, RoutePath,
    RouteTable, ViewId, evaluate_chain, generate_routes, path_matches,
};
use serde::Serialize;

/// Roles turned away from the booking page.
pub const BOOKING_EXCLUDED_ROLES: &[Role] = &[Role::Driver, Role::Admin, Role::SuperAdmin];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MountedRoute {
    pub path: RoutePath,
    pub view: ViewId,
    /// Guards from outermost to innermost.
    pub guards: Vec<GuardPolicy>,
}

impl MountedRoute {
    fn new(path: RoutePath, view: ViewId, guards: Vec<GuardPolicy>) -> Self {
        Self { path, view, guards }
    }

    pub fn is_guard_free(&self) -> bool {
        self.guards.is_empty()
    }

    fn is_auth_entry(&self) -> bool {
        self.guards
            .iter()
            .any(|guard| matches!(guard, GuardPolicy::RedirectAuthenticated { .. }))
    }
}

#[derive(Debug, Clone)]
pub struct RouteManifest {
    routes: Vec<MountedRoute>,
    paths: AuthPaths,
}

impl RouteManifest {
    pub fn standard() -> Self {
        Self::with_paths(AuthPaths::default())
    }

    pub fn with_paths(paths: AuthPaths) -> Self {
        let mut routes = Vec::new();

        for RouteBinding { path, view } in generate_routes(None) {
            let guards = public_guards(view);
            routes.push(MountedRoute::new(path, view, guards));
        }

        let auth_entries = [
            (paths.login.clone(), ViewId::Login),
            (RoutePath::from_static("/register"), ViewId::Register),
            (
                RoutePath::from_static("/auth/google/callback"),
                ViewId::GoogleCallback,
            ),
        ];
        for (path, view) in auth_entries {
            routes.push(MountedRoute::new(
                path,
                view,
                vec![GuardPolicy::redirect_authenticated()],
            ));
        }

        routes.push(MountedRoute::new(paths.verify.clone(), ViewId::Verify, Vec::new()));
        routes.push(MountedRoute::new(
            paths.unauthorized.clone(),
            ViewId::Unauthorized,
            Vec::new(),
        ));

        for role in Role::ALL {
            for RouteBinding { path, view } in generate_routes(Some(role)) {
                routes.push(MountedRoute::new(
                    path,
                    view,
                    vec![GuardPolicy::require_role(role)],
                ));
            }
        }

        Self { routes, paths }
    }

    pub fn routes(&self) -> &[MountedRoute] {
        &self.routes
    }

    pub fn paths(&self) -> &AuthPaths {
        &self.paths
    }

    pub fn route_table(&self) -> RouteTable {
        RouteTable::new(
            self.routes
                .iter()
                .map(|route| RouteBinding {
                    path: route.path.clone(),
                    view: route.view,
                })
                .collect(),
        )
    }

    pub fn resolve(&self, path: &str) -> Option<&MountedRoute> {
        self.routes
            .iter()
            .find(|route| path_matches(route.path.as_str(), path))
    }

    /// Decision for a concrete path, or `None` when nothing is mounted there.
    pub fn evaluate(&self, identity: &Identity, path: &str) -> Option<AccessDecision> {
        let route = self.resolve(path)?;
        Some(evaluate_chain(&route.guards, &self.paths, identity, path))
    }

    /// Where to go once login succeeds: the saved location when the profile
    /// may view it, otherwise the role's dashboard. Login, verification and
    /// unauthorized pages are never resumed.
    pub fn resume_after_login(&self, return_to: Option<&RoutePath>, profile: &Profile) -> RoutePath {
        if !profile.verified {
            return self.paths.verify.clone();
        }
        let identity = Identity::Resolved(profile.clone());
        if let Some(target) = return_to
            && let Some(route) = self.resolve(target.as_str())
            && !route.is_auth_entry()
            && !matches!(route.view, ViewId::Unauthorized | ViewId::Verify)
            && evaluate_chain(&route.guards, &self.paths, &identity, target.as_str())
                == AccessDecision::Allow
        {
            return target.clone();
        }
        profile.role.home()
    }
}

fn public_guards(view: ViewId) -> Vec<GuardPolicy> {
    match view {
        ViewId::BookRide => vec![
            GuardPolicy::require_auth(),
            GuardPolicy::ExcludeRoles {
                roles: BOOKING_EXCLUDED_ROLES,
                feature: "the ride booking page",
            },
        ],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DenialReason;

    fn verified(role: Role) -> Identity {
        Identity::resolved(role, true, "user@example.com")
    }

    #[test]
    fn role_trees_require_their_role() {
        let manifest = RouteManifest::standard();
        for role in Role::ALL {
            for binding in generate_routes(Some(role)) {
                let route = manifest.resolve(binding.path.as_str()).expect("mounted");
                assert_eq!(route.guards, vec![GuardPolicy::require_role(role)]);
            }
        }
    }

    #[test]
    fn terminals_are_guard_free() {
        let manifest = RouteManifest::standard();
        for path in ["/verify", "/unauthorized", "/fares", "/"] {
            assert!(manifest.resolve(path).expect("mounted").is_guard_free(), "{path}");
        }
    }

    #[test]
    fn fares_open_to_drivers_booking_is_not() {
        let manifest = RouteManifest::standard();
        let driver = verified(Role::Driver);
        assert_eq!(manifest.evaluate(&driver, "/fares"), Some(AccessDecision::Allow));
        let booking = manifest.evaluate(&driver, "/book-ride").expect("mounted");
        let redirect = booking.redirect().expect("redirect");
        assert_eq!(redirect.reason, DenialReason::RoleExcluded);
        assert_eq!(redirect.to, Role::Driver.home());
    }

    #[test]
    fn booking_requires_login() {
        let manifest = RouteManifest::standard();
        let decision = manifest.evaluate(&Identity::Absent, "/book-ride").expect("mounted");
        let redirect = decision.redirect().expect("redirect");
        assert_eq!(redirect.to.as_str(), "/login");
        assert_eq!(
            redirect.return_to.as_ref().map(RoutePath::as_str),
            Some("/book-ride")
        );
        assert_eq!(
            manifest.evaluate(&verified(Role::Rider), "/book-ride"),
            Some(AccessDecision::Allow)
        );
    }

    #[test]
    fn unmounted_paths_have_no_decision() {
        let manifest = RouteManifest::standard();
        assert_eq!(manifest.evaluate(&Identity::Absent, "/nope"), None);
    }

    #[test]
    fn resume_prefers_saved_location() {
        let manifest = RouteManifest::standard();
        let profile = Profile::new(Role::Rider, true, "r@example.com");
        let saved = RoutePath::from_static("/rider/wallet");
        assert_eq!(manifest.resume_after_login(Some(&saved), &profile), saved);
    }

    #[test]
    fn resume_ignores_forbidden_and_auth_pages() {
        let manifest = RouteManifest::standard();
        let profile = Profile::new(Role::Driver, true, "d@example.com");
        let admin_page = RoutePath::from_static("/admin/users");
        assert_eq!(
            manifest.resume_after_login(Some(&admin_page), &profile),
            Role::Driver.home()
        );
        let login = RoutePath::from_static("/login");
        assert_eq!(
            manifest.resume_after_login(Some(&login), &profile),
            Role::Driver.home()
        );
        assert_eq!(manifest.resume_after_login(None, &profile), Role::Driver.home());
    }

    #[test]
    fn resume_skips_verification_page_once_verified() {
        let manifest = RouteManifest::standard();
        let profile = Profile::new(Role::Rider, true, "r@example.com");
        let verify = RoutePath::from_static("/verify");
        assert_eq!(
            manifest.resume_after_login(Some(&verify), &profile),
            Role::Rider.home()
        );
    }

    #[test]
    fn resume_sends_unverified_to_verification() {
        let manifest = RouteManifest::standard();
        let profile = Profile::new(Role::Rider, false, "r@example.com");
        assert_eq!(
            manifest.resume_after_login(None, &profile).as_str(),
            "/verify"
        );
    }

    #[test]
    fn route_table_has_no_shadowed_paths() {
        let manifest = RouteManifest::standard();
        assert!(manifest.route_table().shadowed().is_empty());
    }
}
