//! Drives a guarded boundary from a live identity channel.
//!
//! # Key invariants
//! - Only the latest identity is evaluated; intermediate values may be
//!   skipped.
//! - A refresh (settled, then pending, then the same identity) never
//!   navigates twice.
use ridegate_access::{Boundary, Identity, NavigationCommand};
use tokio::sync::watch;

/// Imperative navigation primitive supplied by the host router.
pub trait Navigator: Send + Sync {
    fn navigate(&self, command: &NavigationCommand);
}

/// Keep a guarded boundary in step with the live identity.
///
/// Each change is evaluated against the latest identity only, and the
/// navigator is called once per transition into a redirect. Returns the
/// boundary when the identity channel closes.
pub async fn drive_boundary<N>(
    mut boundary: Boundary,
    mut identity: watch::Receiver<Identity>,
    navigator: &N,
) -> Boundary
where
    N: Navigator + ?Sized,
{
    loop {
        let current = identity.borrow_and_update().clone();
        let update = boundary.observe(&current);
        if let Some(command) = update.command {
            tracing::info!(
                from = %boundary.path(),
                to = %command.to,
                "navigating away from guarded view"
            );
            navigator.navigate(&command);
        }
        if identity.changed().await.is_err() {
            return boundary;
        }
    }
}
