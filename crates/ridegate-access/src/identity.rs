//! Authentication state as seen by guards.
//!
//! The identity is owned by whatever resolves the session; guards only read
//! it. Failed lookups never reach this type as a separate state: the session
//! layer retries them and then reports [`Identity::Absent`].
use crate::Role;
use serde::{Deserialize, Serialize};

/// Resolved account facts for an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Profile {
    pub role: Role,
    pub verified: bool,
    pub email: String,
}

impl Profile {
    pub fn new(role: Role, verified: bool, email: impl Into<String>) -> Self {
        Self {
            role,
            verified,
            email: email.into(),
        }
    }
}

/// Tri-state outcome of the authentication query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Identity {
    /// The query has not settled yet.
    Pending,
    Resolved(Profile),
    /// No authenticated session, or the query could not be completed.
    Absent,
}

impl Identity {
    pub fn resolved(role: Role, verified: bool, email: impl Into<String>) -> Self {
        Identity::Resolved(Profile::new(role, verified, email))
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Identity::Resolved(profile) => Some(profile.role),
            Identity::Pending | Identity::Absent => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Identity::Pending)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Identity::Pending => "pending",
            Identity::Resolved(_) => "resolved",
            Identity::Absent => "absent",
        }
    }
}
