//! Role-based access and navigation for the ride-booking client.
//!
//! # Purpose
//! Decides, for the current session, which views may render, where turned
//! away users are sent, and which navigation each role is offered.
//!
//! # How it fits
//! The session crate resolves an [`Identity`] and feeds it to [`Boundary`]
//! values built from the [`RouteManifest`]. Routers consume the flattened
//! [`RouteTable`]; navigation menus render [`sections_for`].
//!
//! # Key invariants
//! - [`Role`] is closed; every decision point matches it exhaustively.
//! - Pending identities show a placeholder; absent or failed ones fail closed.
//! - Redirect chains settle within [`MAX_REDIRECT_HOPS`].
//!
//! # Examples
//! ```rust
//! use ridegate_access::{AccessDecision, Identity, Role, RouteManifest};
//!
//! let manifest = RouteManifest::standard();
//! let driver = Identity::resolved(Role::Driver, true, "d@example.com");
//! let decision = manifest.evaluate(&driver, "/admin/users").expect("mounted");
//! assert_eq!(decision.redirect().map(|r| r.to.as_str()), Some("/unauthorized"));
//! ```
//!
//! # Common pitfalls
//! - Treating [`check_action`] as a security boundary; the booking API must
//!   enforce its own rules.
//! - Mounting a guard on `/verify` or `/unauthorized` creates redirect loops;
//!   [`audit`] catches it.

mod action;
mod boundary;
mod errors;
mod guard;
mod identity;
mod manifest;
mod path;
mod redirect_graph;
mod registry;
mod role;
mod routes;

pub use action::{ActionVerdict, RideAction, check_action};
pub use boundary::{Boundary, BoundaryUpdate, NavigationCommand};
pub use errors::{AccessError, AccessResult};
pub use guard::{
    AccessDecision, AccessGuard, AuthPaths, DenialReason, GuardPolicy, GuardState, Redirect,
    evaluate_chain,
};
pub use identity::{Identity, Profile};
pub use manifest::{BOOKING_EXCLUDED_ROLES, MountedRoute, RouteManifest};
pub use path::{RoutePath, ViewId};
pub use redirect_graph::{
    AuditReport, MAX_REDIRECT_HOPS, RedirectChain, audit, identity_scenarios,
};
pub use registry::{NavEntry, NavSection, sections_for};
pub use role::Role;
pub use routes::{RouteBinding, RouteTable, flatten, generate_routes, path_matches};
