//! Live identity for one session.
//!
//! # Purpose
//! Publishes the session's [`Identity`] through a `watch` channel so every
//! mounted guard reads the same, latest value.
//!
//! # Key invariants
//! - Each refresh supersedes the previous one; a superseded query can never
//!   publish its result.
//! - Guards only read; login and logout go through [`SessionWatcher::refresh`]
//!   and [`SessionWatcher::sign_out`].
use crate::{IdentitySource, ResolvePolicy, SessionKey, resolve_identity};
use ridegate_access::Identity;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct SessionWatcher {
    source: Arc<dyn IdentitySource>,
    session: SessionKey,
    policy: ResolvePolicy,
    sender: Arc<watch::Sender<Identity>>,
    generation: Arc<AtomicU64>,
    inflight: Mutex<Option<JoinHandle<()>>>,
}

impl SessionWatcher {
    /// Create a watcher in the pending state. Call [`Self::refresh`] from
    /// within a Tokio runtime to start resolving.
    pub fn new(source: Arc<dyn IdentitySource>, session: SessionKey, policy: ResolvePolicy) -> Self {
        let (sender, _) = watch::channel(Identity::Pending);
        Self {
            source,
            session,
            policy,
            sender: Arc::new(sender),
            generation: Arc::new(AtomicU64::new(0)),
            inflight: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Identity> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> Identity {
        self.sender.borrow().clone()
    }

    /// Mark the identity stale and query it again.
    ///
    /// Subscribers see `Pending` until the query settles; a
    /// [`ridegate_access::Boundary`] treats that as a revalidation and does
    /// not repeat a redirect it already issued.
    pub fn refresh(&self) {
        let generation = self.supersede();
        self.sender.send_replace(Identity::Pending);

        let source = self.source.clone();
        let session = self.session.clone();
        let policy = self.policy.clone();
        let sender = self.sender.clone();
        let current = self.generation.clone();
        let handle = tokio::spawn(async move {
            let identity = resolve_identity(source.as_ref(), &session, &policy).await;
            // Checked under the channel lock so a newer refresh always wins.
            sender.send_if_modified(|value| {
                if current.load(Ordering::SeqCst) != generation {
                    tracing::debug!(generation, "dropping superseded identity result");
                    return false;
                }
                if *value == identity {
                    return false;
                }
                *value = identity;
                true
            });
        });
        self.store_inflight(Some(handle));
    }

    /// Publish a signed-out identity without asking the remote service.
    pub fn sign_out(&self) {
        self.supersede();
        self.store_inflight(None);
        self.sender.send_replace(Identity::Absent);
    }

    fn supersede(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn store_inflight(&self, handle: Option<JoinHandle<()>>) {
        let mut inflight = self
            .inflight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = inflight.take() {
            previous.abort();
        }
        *inflight = handle;
    }
}

impl Drop for SessionWatcher {
    fn drop(&mut self) {
        self.store_inflight(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::testing::{ScriptedSource, Step};
    use ridegate_access::{Profile, Role};
    use std::time::Duration;

    fn policy() -> ResolvePolicy {
        ResolvePolicy {
            pending_timeout: Duration::from_secs(2),
            max_retries: 0,
            retry_backoff: Duration::from_millis(1),
        }
    }

    async fn wait_until_settled(rx: &mut watch::Receiver<Identity>) -> Identity {
        tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|id| !id.is_pending()))
            .await
            .expect("settled in time")
            .expect("channel open")
            .clone()
    }

    #[tokio::test]
    async fn refresh_publishes_resolved_identity() {
        let profile = Profile::new(Role::Admin, true, "a@example.com");
        let source = Arc::new(ScriptedSource::new(vec![Step::Profile(
            profile.clone(),
            Duration::ZERO,
        )]));
        let watcher = SessionWatcher::new(source, SessionKey::new("t"), policy());
        let mut rx = watcher.subscribe();
        assert!(watcher.current().is_pending());
        watcher.refresh();
        assert_eq!(wait_until_settled(&mut rx).await, Identity::Resolved(profile));
    }

    #[tokio::test]
    async fn newer_refresh_wins_over_slow_query() {
        let slow = Profile::new(Role::Driver, true, "d@example.com");
        let fast = Profile::new(Role::Rider, true, "r@example.com");
        let source = Arc::new(ScriptedSource::new(vec![
            Step::Profile(slow, Duration::from_millis(150)),
            Step::Profile(fast.clone(), Duration::ZERO),
        ]));
        let watcher = SessionWatcher::new(source, SessionKey::new("t"), policy());
        let mut rx = watcher.subscribe();
        watcher.refresh();
        tokio::task::yield_now().await;
        watcher.refresh();
        assert_eq!(
            wait_until_settled(&mut rx).await,
            Identity::Resolved(fast.clone())
        );
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(watcher.current(), Identity::Resolved(fast));
    }

    #[tokio::test]
    async fn sign_out_cancels_pending_query() {
        let profile = Profile::new(Role::Rider, true, "r@example.com");
        let source = Arc::new(ScriptedSource::new(vec![Step::Profile(
            profile,
            Duration::from_millis(100),
        )]));
        let watcher = SessionWatcher::new(source, SessionKey::new("t"), policy());
        watcher.refresh();
        watcher.sign_out();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(watcher.current(), Identity::Absent);
    }

    #[tokio::test]
    async fn failing_source_settles_absent() {
        let source = Arc::new(ScriptedSource::new(vec![Step::Fail]));
        let watcher = SessionWatcher::new(source, SessionKey::new("t"), policy());
        let mut rx = watcher.subscribe();
        watcher.refresh();
        assert_eq!(wait_until_settled(&mut rx).await, Identity::Absent);
    }
}
