//! Access guard: decides what a guarded view does for the current identity.
//!
//! # Purpose
//! Maps (identity, guard policy, current path) to an [`AccessDecision`]:
//! render, show the interim placeholder, or redirect.
//!
//! # How it fits
//! Route manifests attach a chain of [`GuardPolicy`] values to each mounted
//! path. The chain is evaluated root-first and the first decision that is not
//! [`AccessDecision::Allow`] wins, so a nested guard never acts before its
//! parent lets the page render.
//!
//! # Key invariants
//! - A pending identity never yields `Allow` or `Redirect` from a guard.
//! - Query failures arrive as [`Identity::Absent`]; guards fail closed.
//! - Decisions are plain values; equal inputs give equal decisions.
//! - Verification is checked before the required role.
//!
//! # Examples
//! ```rust
//! use ridegate_access::{AccessDecision, AccessGuard, GuardPolicy, Identity, Role};
//!
//! let guard = AccessGuard::new(GuardPolicy::require_role(Role::Driver));
//! let decision = guard.evaluate(&Identity::Pending, "/driver/overview");
//! assert_eq!(decision, AccessDecision::ShowInterimPlaceholder);
//! ```
use crate::{Identity, Role, RoutePath};
use serde::Serialize;

/// Where guards send users who are turned away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthPaths {
    pub login: RoutePath,
    pub unauthorized: RoutePath,
    pub verify: RoutePath,
}

impl Default for AuthPaths {
    fn default() -> Self {
        Self {
            login: RoutePath::from_static("/login"),
            unauthorized: RoutePath::from_static("/unauthorized"),
            verify: RoutePath::from_static("/verify"),
        }
    }
}

/// Guard attached to a mounted route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuardPolicy {
    /// Requires a verified session, and the given role when set.
    RequireAuth { role: Option<Role> },
    /// Auth entry pages (login, register, OAuth callback) that signed-in
    /// users should not see.
    RedirectAuthenticated { target: RoutePath },
    /// Feature pages closed to some roles; they are sent to their dashboard.
    ExcludeRoles {
        roles: &'static [Role],
        feature: &'static str,
    },
}

impl GuardPolicy {
    pub fn require_auth() -> Self {
        GuardPolicy::RequireAuth { role: None }
    }

    pub fn require_role(role: Role) -> Self {
        GuardPolicy::RequireAuth { role: Some(role) }
    }

    pub fn redirect_authenticated() -> Self {
        GuardPolicy::RedirectAuthenticated {
            target: RoutePath::from_static("/"),
        }
    }

    /// Work out which guard state applies.
    pub fn assess(&self, identity: &Identity, path: &str, paths: &AuthPaths) -> GuardState {
        let profile = match identity {
            Identity::Pending => return GuardState::Unknown,
            Identity::Absent => {
                return match self {
                    GuardPolicy::RequireAuth { .. } => GuardState::DeniedNotAuthenticated {
                        return_to: RoutePath::parse(path).ok(),
                    },
                    GuardPolicy::RedirectAuthenticated { .. }
                    | GuardPolicy::ExcludeRoles { .. } => GuardState::Allowed,
                };
            }
            Identity::Resolved(profile) => profile,
        };

        match self {
            GuardPolicy::RequireAuth { role } => {
                if !profile.verified && path != paths.verify.as_str() {
                    return GuardState::DeniedUnverified;
                }
                match role {
                    Some(required) if *required != profile.role => GuardState::DeniedWrongRole {
                        required: *required,
                        actual: profile.role,
                    },
                    _ => GuardState::Allowed,
                }
            }
            GuardPolicy::RedirectAuthenticated { target } => {
                GuardState::DeniedAlreadyAuthenticated {
                    target: target.clone(),
                }
            }
            GuardPolicy::ExcludeRoles { roles, feature } => {
                if roles.contains(&profile.role) {
                    GuardState::RoleExclusion {
                        role: profile.role,
                        feature: *feature,
                    }
                } else {
                    GuardState::Allowed
                }
            }
        }
    }
}

/// Guard state for one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Unknown,
    DeniedNotAuthenticated { return_to: Option<RoutePath> },
    DeniedWrongRole { required: Role, actual: Role },
    DeniedUnverified,
    DeniedAlreadyAuthenticated { target: RoutePath },
    RoleExclusion { role: Role, feature: &'static str },
    Allowed,
}

impl GuardState {
    pub fn into_decision(self, paths: &AuthPaths) -> AccessDecision {
        match self {
            GuardState::Unknown => AccessDecision::ShowInterimPlaceholder,
            GuardState::Allowed => AccessDecision::Allow,
            GuardState::DeniedNotAuthenticated { return_to } => {
                AccessDecision::Redirect(Redirect {
                    to: paths.login.clone(),
                    replace: true,
                    return_to,
                    reason: DenialReason::AuthAbsent,
                    notice: None,
                })
            }
            GuardState::DeniedWrongRole { .. } => AccessDecision::Redirect(Redirect::new(
                paths.unauthorized.clone(),
                DenialReason::RoleMismatch,
            )),
            GuardState::DeniedUnverified => AccessDecision::Redirect(Redirect::new(
                paths.verify.clone(),
                DenialReason::UnverifiedAccount,
            )),
            GuardState::DeniedAlreadyAuthenticated { target } => AccessDecision::Redirect(
                Redirect::new(target, DenialReason::AlreadyAuthenticated),
            ),
            GuardState::RoleExclusion { role, feature } => {
                let mut redirect = Redirect::new(role.home(), DenialReason::RoleExcluded);
                redirect.notice = Some(exclusion_notice(role, feature));
                AccessDecision::Redirect(redirect)
            }
        }
    }
}

/// Why a guard redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    AuthAbsent,
    RoleMismatch,
    UnverifiedAccount,
    AlreadyAuthenticated,
    RoleExcluded,
}

impl DenialReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DenialReason::AuthAbsent => "auth_absent",
            DenialReason::RoleMismatch => "role_mismatch",
            DenialReason::UnverifiedAccount => "unverified_account",
            DenialReason::AlreadyAuthenticated => "already_authenticated",
            DenialReason::RoleExcluded => "role_excluded",
        }
    }
}

/// Navigation a guard asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub to: RoutePath,
    pub replace: bool,
    /// Original location, handed to the login page so it can resume.
    pub return_to: Option<RoutePath>,
    pub reason: DenialReason,
    /// User-visible message to surface alongside the redirect.
    pub notice: Option<String>,
}

impl Redirect {
    fn new(to: RoutePath, reason: DenialReason) -> Self {
        Self {
            to,
            replace: true,
            return_to: None,
            reason,
            notice: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    Allow,
    ShowInterimPlaceholder,
    Redirect(Redirect),
}

impl AccessDecision {
    pub fn label(&self) -> &'static str {
        match self {
            AccessDecision::Allow => "allow",
            AccessDecision::ShowInterimPlaceholder => "placeholder",
            AccessDecision::Redirect(_) => "redirect",
        }
    }

    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            AccessDecision::Redirect(redirect) => Some(redirect),
            AccessDecision::Allow | AccessDecision::ShowInterimPlaceholder => None,
        }
    }
}

/// A single guard with the redirect paths it reports.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    policy: GuardPolicy,
    paths: AuthPaths,
}

impl AccessGuard {
    pub fn new(policy: GuardPolicy) -> Self {
        Self::with_paths(policy, AuthPaths::default())
    }

    pub fn with_paths(policy: GuardPolicy, paths: AuthPaths) -> Self {
        Self { policy, paths }
    }

    pub fn policy(&self) -> &GuardPolicy {
        &self.policy
    }

    pub fn evaluate(&self, identity: &Identity, path: &str) -> AccessDecision {
        evaluate_chain(std::slice::from_ref(&self.policy), &self.paths, identity, path)
    }
}

/// Evaluate nested guards root-first; the first non-`Allow` decision wins.
pub fn evaluate_chain(
    policies: &[GuardPolicy],
    paths: &AuthPaths,
    identity: &Identity,
    path: &str,
) -> AccessDecision {
    for policy in policies {
        let decision = policy.assess(identity, path, paths).into_decision(paths);
        match &decision {
            AccessDecision::Allow => continue,
            AccessDecision::ShowInterimPlaceholder => {
                tracing::debug!(path, "identity pending; showing placeholder");
                return decision;
            }
            AccessDecision::Redirect(redirect) => {
                tracing::info!(
                    path,
                    to = %redirect.to,
                    reason = redirect.reason.as_str(),
                    identity = identity.label(),
                    "guard redirect"
                );
                return decision;
            }
        }
    }
    tracing::debug!(path, identity = identity.label(), "guard allowed");
    AccessDecision::Allow
}

fn exclusion_notice(role: Role, feature: &str) -> String {
    let subject = match role {
        Role::Rider => "Riders",
        Role::Driver => "Drivers",
        Role::Admin => "Admins",
        Role::SuperAdmin => "Super admins",
    };
    format!("{subject} cannot access {feature}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAFF_AND_DRIVERS: &[Role] = &[Role::Driver, Role::Admin, Role::SuperAdmin];

    fn booking_guard() -> AccessGuard {
        AccessGuard::new(GuardPolicy::ExcludeRoles {
            roles: STAFF_AND_DRIVERS,
            feature: "the ride booking page",
        })
    }

    fn redirect_target(decision: &AccessDecision) -> Option<&str> {
        decision.redirect().map(|redirect| redirect.to.as_str())
    }

    #[test]
    fn pending_shows_placeholder_for_every_policy() {
        let policies = vec![
            GuardPolicy::require_auth(),
            GuardPolicy::require_role(Role::Driver),
            GuardPolicy::require_role(Role::SuperAdmin),
            GuardPolicy::redirect_authenticated(),
            booking_guard().policy().clone(),
        ];
        for policy in policies {
            let decision = AccessGuard::new(policy).evaluate(&Identity::Pending, "/anything");
            assert_eq!(decision, AccessDecision::ShowInterimPlaceholder);
        }
    }

    #[test]
    fn absent_redirects_to_login_with_return_path() {
        let guard = AccessGuard::new(GuardPolicy::require_role(Role::Driver));
        let decision = guard.evaluate(&Identity::Absent, "/driver/earnings");
        let redirect = decision.redirect().expect("redirect");
        assert_eq!(redirect.to.as_str(), "/login");
        assert_eq!(redirect.reason, DenialReason::AuthAbsent);
        assert_eq!(
            redirect.return_to.as_ref().map(RoutePath::as_str),
            Some("/driver/earnings")
        );
    }

    #[test]
    fn wrong_role_redirects_to_unauthorized() {
        let guard = AccessGuard::new(GuardPolicy::require_role(Role::Driver));
        let identity = Identity::resolved(Role::Rider, true, "r@example.com");
        let decision = guard.evaluate(&identity, "/driver/overview");
        assert_eq!(redirect_target(&decision), Some("/unauthorized"));
        assert_eq!(
            decision.redirect().map(|r| r.reason),
            Some(DenialReason::RoleMismatch)
        );
    }

    #[test]
    fn super_admin_is_not_admin() {
        let guard = AccessGuard::new(GuardPolicy::require_role(Role::Admin));
        let identity = Identity::resolved(Role::SuperAdmin, true, "s@example.com");
        assert_eq!(
            redirect_target(&guard.evaluate(&identity, "/admin/users")),
            Some("/unauthorized")
        );
    }

    #[test]
    fn verification_gate_precedes_role_check() {
        let identity = Identity::resolved(Role::Rider, false, "r@example.com");
        let matching = AccessGuard::new(GuardPolicy::require_role(Role::Rider));
        assert_eq!(
            redirect_target(&matching.evaluate(&identity, "/dashboard")),
            Some("/verify")
        );
        let mismatched = AccessGuard::new(GuardPolicy::require_role(Role::Admin));
        assert_eq!(
            redirect_target(&mismatched.evaluate(&identity, "/admin/users")),
            Some("/verify")
        );
    }

    #[test]
    fn verification_page_itself_is_not_redirected() {
        let identity = Identity::resolved(Role::Rider, false, "r@example.com");
        let guard = AccessGuard::new(GuardPolicy::require_auth());
        assert_eq!(guard.evaluate(&identity, "/verify"), AccessDecision::Allow);
    }

    #[test]
    fn matching_verified_role_is_allowed() {
        let identity = Identity::resolved(Role::Driver, true, "d@example.com");
        let guard = AccessGuard::new(GuardPolicy::require_role(Role::Driver));
        assert_eq!(
            guard.evaluate(&identity, "/driver/overview"),
            AccessDecision::Allow
        );
    }

    #[test]
    fn login_page_redirects_authenticated_users() {
        let guard = AccessGuard::new(GuardPolicy::redirect_authenticated());
        let identity = Identity::resolved(Role::Rider, true, "r@example.com");
        let decision = guard.evaluate(&identity, "/login");
        assert_eq!(redirect_target(&decision), Some("/"));
        assert_eq!(
            decision.redirect().map(|r| r.reason),
            Some(DenialReason::AlreadyAuthenticated)
        );
        assert_eq!(guard.evaluate(&Identity::Absent, "/login"), AccessDecision::Allow);
    }

    #[test]
    fn login_page_honours_configured_target() {
        let guard = AccessGuard::new(GuardPolicy::RedirectAuthenticated {
            target: RoutePath::from_static("/welcome-back"),
        });
        let identity = Identity::resolved(Role::Admin, true, "a@example.com");
        assert_eq!(
            redirect_target(&guard.evaluate(&identity, "/register")),
            Some("/welcome-back")
        );
    }

    #[test]
    fn excluded_roles_go_home_with_notice() {
        let guard = booking_guard();
        let identity = Identity::resolved(Role::Driver, true, "d@example.com");
        let decision = guard.evaluate(&identity, "/book-ride");
        let redirect = decision.redirect().expect("redirect");
        assert_eq!(redirect.to, Role::Driver.home());
        assert_eq!(
            redirect.notice.as_deref(),
            Some("Drivers cannot access the ride booking page")
        );

        let rider = Identity::resolved(Role::Rider, true, "r@example.com");
        assert_eq!(guard.evaluate(&rider, "/book-ride"), AccessDecision::Allow);
        assert_eq!(guard.evaluate(&Identity::Absent, "/book-ride"), AccessDecision::Allow);
    }

    #[test]
    fn repeated_evaluation_is_stable() {
        let guard = AccessGuard::new(GuardPolicy::require_role(Role::Driver));
        let identity = Identity::resolved(Role::Rider, true, "r@example.com");
        assert_eq!(
            guard.evaluate(&identity, "/driver/wallet"),
            guard.evaluate(&identity, "/driver/wallet")
        );
    }

    #[test]
    fn chain_stops_at_first_denial() {
        let policies = [
            GuardPolicy::require_auth(),
            booking_guard().policy().clone(),
        ];
        let paths = AuthPaths::default();
        let unverified_driver = Identity::resolved(Role::Driver, false, "d@example.com");
        let decision = evaluate_chain(&policies, &paths, &unverified_driver, "/book-ride");
        assert_eq!(redirect_target(&decision), Some("/verify"));

        let driver = Identity::resolved(Role::Driver, true, "d@example.com");
        let decision = evaluate_chain(&policies, &paths, &driver, "/book-ride");
        assert_eq!(
            decision.redirect().map(|r| r.reason),
            Some(DenialReason::RoleExcluded)
        );
    }

    #[test]
    fn custom_auth_paths_are_used() {
        let paths = AuthPaths {
            login: RoutePath::from_static("/sign-in"),
            unauthorized: RoutePath::from_static("/403"),
            verify: RoutePath::from_static("/confirm-email"),
        };
        let guard = AccessGuard::with_paths(GuardPolicy::require_role(Role::Admin), paths);
        assert_eq!(
            redirect_target(&guard.evaluate(&Identity::Absent, "/admin/users")),
            Some("/sign-in")
        );
        let unverified = Identity::resolved(Role::Admin, false, "a@example.com");
        assert_eq!(
            redirect_target(&guard.evaluate(&unverified, "/admin/users")),
            Some("/confirm-email")
        );
        assert_eq!(
            guard.evaluate(&unverified, "/confirm-email"),
            AccessDecision::Allow
        );
    }
}
