//! Per-session identity cache.
//!
//! # Purpose
//! Sits in front of a remote [`IdentitySource`] so repeated guard evaluations
//! for one session cost one remote read per TTL.
//!
//! # Key invariants
//! - Concurrent lookups for one session share a single remote read.
//! - Failed lookups are never cached and leave no entry behind.
//! - Expired entries are swept at most once per TTL, so the map only holds
//!   sessions seen within roughly the last two TTLs.
//!
//! # Security considerations
//! - Keys are caller-supplied bearer tokens; the sweep keeps an attacker
//!   cycling tokens from growing the map without bound.
use crate::{IdentitySource, SessionKey, SessionResult};
use async_trait::async_trait;
use dashmap::DashMap;
use ridegate_access::Profile;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

#[derive(Clone)]
struct CachedProfile {
    profile: Option<Profile>,
    expires_at: Instant,
}

type Slot = Arc<Mutex<Option<CachedProfile>>>;

/// Per-session identity cache in front of another source.
///
/// Each session key owns a slot guarded by an async mutex, so concurrent
/// lookups for one session share a single remote read. Failures are not
/// cached.
pub struct CachedIdentitySource<S> {
    inner: S,
    entries: Arc<DashMap<SessionKey, Slot>>,
    ttl: Duration,
    last_sweep: StdMutex<Instant>,
}

impl<S> CachedIdentitySource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            entries: Arc::new(DashMap::new()),
            ttl,
            last_sweep: StdMutex::new(Instant::now()),
        }
    }

    /// Drop expired entries and slots left empty by failed lookups. Slots
    /// with a lookup in flight are kept. Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, slot| match slot.try_lock() {
            Ok(cached) => cached.as_ref().is_some_and(|entry| entry.expires_at > now),
            Err(_) => true,
        });
        before.saturating_sub(self.entries.len())
    }

    fn sweep_if_due(&self) {
        let now = Instant::now();
        {
            let mut last = self
                .last_sweep
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if now.duration_since(*last) < self.ttl {
                return;
            }
            *last = now;
        }
        let purged = self.purge_expired();
        if purged > 0 {
            tracing::debug!(purged, remaining = self.entries.len(), "evicted expired identities");
        }
    }

    /// Forget a session, e.g. after login or logout. Returns whether an
    /// entry existed.
    pub fn invalidate(&self, session: &SessionKey) -> bool {
        self.entries.remove(session).is_some()
    }

    pub fn invalidate_all(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl<S> IdentitySource for CachedIdentitySource<S>
where
    S: IdentitySource,
{
    async fn fetch(&self, session: &SessionKey) -> SessionResult<Option<Profile>> {
        self.sweep_if_due();
        // Clone the slot out so no map shard lock is held across the await.
        let slot: Slot = self.entries.entry(session.clone()).or_default().clone();
        let mut cached = slot.lock().await;
        if let Some(entry) = cached.as_ref()
            && entry.expires_at > Instant::now()
        {
            return Ok(entry.profile.clone());
        }

        let profile = match self.inner.fetch(session).await {
            Ok(profile) => profile,
            Err(err) => {
                let empty = cached.is_none();
                drop(cached);
                if empty {
                    self.entries
                        .remove_if(session, |_, current| Arc::ptr_eq(current, &slot));
                }
                return Err(err);
            }
        };
        *cached = Some(CachedProfile {
            profile: profile.clone(),
            expires_at: Instant::now() + self.ttl,
        });
        Ok(profile)
    }
}
