//! Redirect graph audit.
//!
//! Follows every redirect chain the manifest can produce, for every identity
//! a session can be in, and checks that each chain settles on a rendered page
//! within [`MAX_REDIRECT_HOPS`].
use crate::{AccessDecision, AccessError, AccessResult, Identity, Role, RouteManifest, RoutePath};

pub const MAX_REDIRECT_HOPS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectChain {
    pub identity: Identity,
    pub start: RoutePath,
    /// Redirect targets in the order they were followed.
    pub hops: Vec<RoutePath>,
}

#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    pub chains: Vec<RedirectChain>,
}

impl AuditReport {
    pub fn longest_chain(&self) -> usize {
        self.chains
            .iter()
            .map(|chain| chain.hops.len())
            .max()
            .unwrap_or(0)
    }
}

/// Every identity a guard can observe.
pub fn identity_scenarios() -> Vec<Identity> {
    let mut scenarios = vec![Identity::Pending, Identity::Absent];
    for role in Role::ALL {
        for verified in [true, false] {
            scenarios.push(Identity::resolved(role, verified, "audit@example.com"));
        }
    }
    scenarios
}

/// Walk the redirect graph of `manifest`.
///
/// # Errors
/// - [`AccessError::GuardedTerminal`] if a redirect terminal has guards.
/// - [`AccessError::UnmountedRedirect`] if a redirect points nowhere.
/// - [`AccessError::RedirectLoop`] if a chain does not settle in time.
pub fn audit(manifest: &RouteManifest) -> AccessResult<AuditReport> {
    for terminal in [&manifest.paths().verify, &manifest.paths().unauthorized] {
        match manifest.resolve(terminal.as_str()) {
            Some(route) if route.is_guard_free() => {}
            Some(_) => return Err(AccessError::GuardedTerminal(terminal.to_string())),
            None => {
                return Err(AccessError::UnmountedRedirect {
                    from: "guard".to_string(),
                    target: terminal.to_string(),
                });
            }
        }
    }

    let mut report = AuditReport::default();
    for identity in identity_scenarios() {
        for route in manifest.routes() {
            let start = sample_path(&route.path);
            let hops = follow(manifest, &identity, &start)?;
            report.chains.push(RedirectChain {
                identity: identity.clone(),
                start,
                hops,
            });
        }
    }
    tracing::debug!(
        chains = report.chains.len(),
        longest = report.longest_chain(),
        "redirect graph audited"
    );
    Ok(report)
}

fn follow(
    manifest: &RouteManifest,
    identity: &Identity,
    start: &RoutePath,
) -> AccessResult<Vec<RoutePath>> {
    let mut hops = Vec::new();
    let mut previous = start.clone();
    let mut current = start.clone();
    loop {
        let decision = manifest.evaluate(identity, current.as_str()).ok_or_else(|| {
            AccessError::UnmountedRedirect {
                from: previous.to_string(),
                target: current.to_string(),
            }
        })?;
        match decision {
            AccessDecision::Allow | AccessDecision::ShowInterimPlaceholder => return Ok(hops),
            AccessDecision::Redirect(redirect) => {
                if hops.len() == MAX_REDIRECT_HOPS {
                    return Err(AccessError::RedirectLoop {
                        start: start.to_string(),
                        hops: MAX_REDIRECT_HOPS,
                    });
                }
                hops.push(redirect.to.clone());
                previous = std::mem::replace(&mut current, redirect.to);
            }
        }
    }
}

/// Fill `:param` segments so a pattern can be evaluated as a concrete path.
fn sample_path(pattern: &RoutePath) -> RoutePath {
    if !pattern.as_str().contains(':') && !pattern.as_str().contains('*') {
        return pattern.clone();
    }
    let filled: Vec<&str> = pattern
        .segments()
        .map(|segment| {
            if segment.starts_with(':') || segment == "*" {
                "sample"
            } else {
                segment
            }
        })
        .collect();
    RoutePath::parse(format!("/{}", filled.join("/"))).unwrap_or_else(|_| pattern.clone())
}
