//! Guarded view boundaries.
//!
//! # Purpose
//! Turns the stream of identity changes seen by one mounted view into at
//! most one navigation per transition.
//!
//! # Key invariants
//! - A redirect command is issued only when the decision changes into a
//!   redirect not already issued.
//! - A pending identity after a settled one is a revalidation: it reports the
//!   placeholder but keeps the settled decision, so settling back to the same
//!   redirect does not navigate again.
use crate::{
    AccessDecision, AuthPaths, GuardPolicy, Identity, Redirect, RouteManifest, RoutePath,
    evaluate_chain,
};
use serde::Serialize;

/// Imperative navigation requested by a guarded boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationCommand {
    pub to: RoutePath,
    pub replace: bool,
    /// Location to resume after the target page finishes (login).
    pub state: Option<RoutePath>,
    pub notice: Option<String>,
}

impl From<&Redirect> for NavigationCommand {
    fn from(redirect: &Redirect) -> Self {
        Self {
            to: redirect.to.clone(),
            replace: redirect.replace,
            state: redirect.return_to.clone(),
            notice: redirect.notice.clone(),
        }
    }
}

/// Result of re-evaluating a boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryUpdate {
    pub decision: AccessDecision,
    /// Present only when the boundary just transitioned into a new redirect.
    pub command: Option<NavigationCommand>,
}

/// One mounted guarded view, re-evaluated on every identity change.
///
/// Remembers the previous decision so a redirect is issued once per
/// transition rather than on every re-render.
#[derive(Debug, Clone)]
pub struct Boundary {
    guards: Vec<GuardPolicy>,
    paths: AuthPaths,
    path: RoutePath,
    last: Option<AccessDecision>,
}

impl Boundary {
    pub fn new(guards: Vec<GuardPolicy>, paths: AuthPaths, path: RoutePath) -> Self {
        Self {
            guards,
            paths,
            path,
            last: None,
        }
    }

    /// Boundary for whatever the manifest mounts at `path`.
    pub fn for_path(manifest: &RouteManifest, path: RoutePath) -> Option<Self> {
        let route = manifest.resolve(path.as_str())?;
        Some(Self::new(route.guards.clone(), manifest.paths().clone(), path))
    }

    pub fn path(&self) -> &RoutePath {
        &self.path
    }

    /// Last settled decision, or the placeholder if nothing has settled yet.
    pub fn decision(&self) -> Option<&AccessDecision> {
        self.last.as_ref()
    }

    pub fn observe(&mut self, identity: &Identity) -> BoundaryUpdate {
        let decision = evaluate_chain(&self.guards, &self.paths, identity, self.path.as_str());
        let settled = self
            .last
            .as_ref()
            .is_some_and(|last| *last != AccessDecision::ShowInterimPlaceholder);
        if decision == AccessDecision::ShowInterimPlaceholder && settled {
            return BoundaryUpdate {
                decision,
                command: None,
            };
        }
        let changed = self.last.as_ref() != Some(&decision);
        let command = match (&decision, changed) {
            (AccessDecision::Redirect(redirect), true) => Some(NavigationCommand::from(redirect)),
            _ => None,
        };
        self.last = Some(decision.clone());
        BoundaryUpdate { decision, command }
    }
}
