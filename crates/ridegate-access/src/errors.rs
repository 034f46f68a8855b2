//! Errors for role and path parsing and for manifest audits.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("unknown role: {0}")]
    UnknownRole(String),
    #[error("invalid route path: {0}")]
    InvalidPath(String),
    #[error("redirect chain from {start} exceeded {hops} hops")]
    RedirectLoop { start: String, hops: usize },
    #[error("redirect from {from} targets unmounted path {target}")]
    UnmountedRedirect { from: String, target: String },
    #[error("redirect terminal {0} must not carry guards")]
    GuardedTerminal(String),
}

pub type AccessResult<T> = Result<T, AccessError>;
