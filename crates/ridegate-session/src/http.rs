//! Identity source backed by the platform HTTP API.
//!
//! # Key invariants
//! - 401 and 403 mean signed out and are not errors.
//! - An unrecognized role in the payload is treated as signed out.
//!
//! # Security considerations
//! - The session token is sent only as a bearer header and never logged.
use crate::{IdentitySource, SessionError, SessionKey, SessionResult};
use async_trait::async_trait;
use reqwest::StatusCode;
use ridegate_access::{Profile, Role};
use serde::Deserialize;

/// Identity source backed by the platform's `GET /user/me` endpoint.
#[derive(Clone)]
pub struct HttpIdentitySource {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct MeEnvelope {
    data: Option<MePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MePayload {
    email: String,
    role: String,
    #[serde(default)]
    is_verified: bool,
}

impl HttpIdentitySource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn me_url(&self) -> String {
        format!("{}/user/me", self.base_url)
    }
}

#[async_trait]
impl IdentitySource for HttpIdentitySource {
    async fn fetch(&self, session: &SessionKey) -> SessionResult<Option<Profile>> {
        let response = self
            .client
            .get(self.me_url())
            .bearer_auth(session.as_str())
            .send()
            .await
            .map_err(SessionError::Transport)?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Ok(None),
            status if !status.is_success() => return Err(SessionError::Status(status.as_u16())),
            _ => {}
        }

        let envelope: MeEnvelope = response.json().await.map_err(SessionError::Decode)?;
        let Some(payload) = envelope.data else {
            return Ok(None);
        };
        // A role outside the closed set gets the most restrictive treatment.
        match payload.role.parse::<Role>() {
            Ok(role) => Ok(Some(Profile::new(role, payload.is_verified, payload.email))),
            Err(err) => {
                tracing::warn!(error = %err, "identity service reported unknown role");
                Ok(None)
            }
        }
    }
}
