//! Identity lookup errors.
use thiserror::Error;

/// Failures while asking the remote service who the session belongs to.
///
/// None of these reach guards directly: the resolver retries them and then
/// reports an absent identity.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("identity request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("identity service returned status {0}")]
    Status(u16),
    #[error("identity response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;

impl SessionError {
    pub fn label(&self) -> &'static str {
        match self {
            SessionError::Transport(_) => "transport",
            SessionError::Status(_) => "status",
            SessionError::Decode(_) => "decode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display() {
        let err = SessionError::Status(502);
        assert_eq!(err.to_string(), "identity service returned status 502");
        assert_eq!(err.label(), "status");
    }
}
