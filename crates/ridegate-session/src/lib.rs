//! Session plumbing between the remote identity service and access guards.
//!
//! # Purpose
//! Resolves who a session belongs to, caches the answer per session, keeps a
//! live [`ridegate_access::Identity`] per browser session, and drives guarded
//! boundaries so redirects fire once per transition.
//!
//! # Key invariants
//! - Identity is injected through [`IdentitySource`]; nothing here is global.
//! - Query failures are retried a bounded number of times, then fail closed.
//! - Pending never lasts longer than the configured timeout.
//!
//! # Examples
//! ```rust,no_run
//! use ridegate_session::{HttpIdentitySource, ResolvePolicy, SessionKey, resolve_identity};
//!
//! # async fn demo() {
//! let source = HttpIdentitySource::new("https://api.example.com/api/v1");
//! let identity =
//!     resolve_identity(&source, &SessionKey::new("token"), &ResolvePolicy::default()).await;
//! let _ = identity;
//! # }
//! ```

mod cache;
mod driver;
mod errors;
mod http;
mod source;
mod watcher;

pub use cache::CachedIdentitySource;
pub use driver::{Navigator, drive_boundary};
pub use errors::{SessionError, SessionResult};
pub use http::HttpIdentitySource;
pub use source::{IdentitySource, ResolvePolicy, SessionKey, resolve_identity};
pub use watcher::SessionWatcher;
