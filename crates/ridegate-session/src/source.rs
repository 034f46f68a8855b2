//! Identity sources and the bounded resolver.
//!
//! # Purpose
//! Defines the seam to the remote data service and turns its answers into a
//! guard-ready [`Identity`], retrying transient failures and bounding how
//! long a session may stay pending.
//!
//! # Key invariants
//! - A definite "not signed in" answer is never retried.
//! - Failures are retried at most `max_retries` times, then fail closed.
//! - The whole resolution finishes within `pending_timeout`.
use crate::SessionResult;
use async_trait::async_trait;
use ridegate_access::{Identity, Profile};
use std::sync::Arc;
use std::time::Duration;

/// Opaque credential identifying a browser session (bearer token).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKey(<redacted>)")
    }
}

/// Remote lookup of the account behind a session.
///
/// `Ok(None)` means the service positively reported no session.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    async fn fetch(&self, session: &SessionKey) -> SessionResult<Option<Profile>>;
}

#[async_trait]
impl<S> IdentitySource for Arc<S>
where
    S: IdentitySource + ?Sized,
{
    async fn fetch(&self, session: &SessionKey) -> SessionResult<Option<Profile>> {
        (**self).fetch(session).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvePolicy {
    /// Upper bound on time spent pending before failing closed.
    pub pending_timeout: Duration,
    pub max_retries: u32,
    /// Base delay between attempts; grows linearly with the attempt number.
    pub retry_backoff: Duration,
}

impl Default for ResolvePolicy {
    fn default() -> Self {
        Self {
            pending_timeout: Duration::from_secs(5),
            max_retries: 2,
            retry_backoff: Duration::from_millis(200),
        }
    }
}

/// Resolve the identity for `session`, never leaving it pending.
pub async fn resolve_identity<S>(source: &S, session: &SessionKey, policy: &ResolvePolicy) -> Identity
where
    S: IdentitySource + ?Sized,
{
    let attempts = async {
        let mut attempt: u32 = 0;
        loop {
            match source.fetch(session).await {
                Ok(Some(profile)) => {
                    metrics::counter!("ridegate_identity_queries_total", "outcome" => "resolved")
                        .increment(1);
                    return Identity::Resolved(profile);
                }
                Ok(None) => {
                    metrics::counter!("ridegate_identity_queries_total", "outcome" => "absent")
                        .increment(1);
                    return Identity::Absent;
                }
                Err(err) if attempt < policy.max_retries => {
                    attempt += 1;
                    tracing::warn!(error = %err, attempt, "identity query failed; retrying");
                    tokio::time::sleep(policy.retry_backoff * attempt).await;
                }
                Err(err) => {
                    metrics::counter!("ridegate_identity_queries_total", "outcome" => err.label())
                        .increment(1);
                    tracing::warn!(error = %err, "identity query failed; treating as signed out");
                    return Identity::Absent;
                }
            }
        }
    };

    match tokio::time::timeout(policy.pending_timeout, attempts).await {
        Ok(identity) => identity,
        Err(_) => {
            metrics::counter!("ridegate_identity_queries_total", "outcome" => "timeout")
                .increment(1);
            tracing::warn!(
                timeout_ms = policy.pending_timeout.as_millis() as u64,
                "identity query timed out; treating as signed out"
            );
            Identity::Absent
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{ScriptedSource, Step};
    use super::*;
    use ridegate_access::Role;

    fn fast_policy() -> ResolvePolicy {
        ResolvePolicy {
            pending_timeout: Duration::from_millis(500),
            max_retries: 2,
            retry_backoff: Duration::from_millis(1),
        }
    }

    fn rider() -> Profile {
        Profile::new(Role::Rider, true, "r@example.com")
    }

    #[tokio::test]
    async fn resolves_profile() {
        let source = ScriptedSource::new(vec![Step::Profile(rider(), Duration::ZERO)]);
        let identity = resolve_identity(&source, &SessionKey::new("t"), &fast_policy()).await;
        assert_eq!(identity, Identity::Resolved(rider()));
    }

    #[tokio::test]
    async fn signed_out_is_not_retried() {
        let source = ScriptedSource::new(vec![Step::SignedOut]);
        let identity = resolve_identity(&source, &SessionKey::new("t"), &fast_policy()).await;
        assert_eq!(identity, Identity::Absent);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn transient_failure_is_retried() {
        let source = ScriptedSource::new(vec![
            Step::Fail,
            Step::Fail,
            Step::Profile(rider(), Duration::ZERO),
        ]);
        let identity = resolve_identity(&source, &SessionKey::new("t"), &fast_policy()).await;
        assert_eq!(identity, Identity::Resolved(rider()));
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn persistent_failure_fails_closed() {
        let source = ScriptedSource::new(vec![Step::Fail]);
        let identity = resolve_identity(&source, &SessionKey::new("t"), &fast_policy()).await;
        assert_eq!(identity, Identity::Absent);
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn slow_source_times_out() {
        let source = ScriptedSource::new(vec![Step::Profile(rider(), Duration::from_secs(10))]);
        let policy = ResolvePolicy {
            pending_timeout: Duration::from_millis(50),
            ..fast_policy()
        };
        let identity = resolve_identity(&source, &SessionKey::new("t"), &policy).await;
        assert_eq!(identity, Identity::Absent);
    }

    #[test]
    fn session_key_debug_is_redacted() {
        let key = SessionKey::new("secret-token");
        assert!(!format!("{key:?}").contains("secret"));
    }
}
