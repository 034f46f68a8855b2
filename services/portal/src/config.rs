//! Portal service configuration.
//!
//! # Purpose
//! Loads listener addresses, identity-service wiring and guard redirect paths
//! from `RIDEGATE_*` environment variables, then applies an optional YAML
//! override file named by `RIDEGATE_PORTAL_CONFIG`.
//!
//! # Key invariants
//! - Durations and retry counts fall back to defaults when unset, unparsable
//!   or zero (retries may be zero).
//! - Redirect paths must be absolute; a bad override fails startup.
use anyhow::{Context, Result};
use ridegate_access::{AuthPaths, RoutePath};
use ridegate_session::ResolvePolicy;
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_IDENTITY_TTL_MS: u64 = 30_000;
const DEFAULT_PENDING_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_QUERY_RETRIES: u32 = 2;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 200;

#[derive(Debug, Clone)]
pub struct PortalConfig {
    // HTTP API listener.
    pub portal_bind: SocketAddr,
    // Prometheus scrape listener.
    pub metrics_bind: SocketAddr,
    // Base URL of the remote identity service; session endpoints are
    // disabled without it.
    pub identity_url: Option<String>,
    // How long a resolved profile stays cached per session.
    pub identity_ttl_ms: u64,
    // Upper bound on how long an identity may stay pending.
    pub pending_timeout_ms: u64,
    // Extra attempts after a failed identity query.
    pub query_retries: u32,
    // Linear backoff step between attempts.
    pub retry_backoff_ms: u64,
    pub auth_paths: AuthPaths,
}

#[derive(Debug, Deserialize)]
struct PortalConfigOverride {
    portal_bind: Option<String>,
    metrics_bind: Option<String>,
    identity_url: Option<String>,
    identity_ttl_ms: Option<u64>,
    pending_timeout_ms: Option<u64>,
    query_retries: Option<u32>,
    retry_backoff_ms: Option<u64>,
    login_path: Option<String>,
    unauthorized_path: Option<String>,
    verify_path: Option<String>,
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

impl PortalConfig {
    pub fn from_env() -> Result<Self> {
        let portal_bind = std::env::var("RIDEGATE_PORTAL_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8088".to_string())
            .parse()
            .with_context(|| "parse RIDEGATE_PORTAL_BIND")?;
        let metrics_bind = std::env::var("RIDEGATE_METRICS_BIND")
            .unwrap_or_else(|_| "0.0.0.0:9098".to_string())
            .parse()
            .with_context(|| "parse RIDEGATE_METRICS_BIND")?;
        let identity_url = std::env::var("RIDEGATE_IDENTITY_URL")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let query_retries = std::env::var("RIDEGATE_QUERY_RETRIES")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(DEFAULT_QUERY_RETRIES);
        Ok(Self {
            portal_bind,
            metrics_bind,
            identity_url,
            identity_ttl_ms: env_u64("RIDEGATE_IDENTITY_TTL_MS", DEFAULT_IDENTITY_TTL_MS),
            pending_timeout_ms: env_u64("RIDEGATE_PENDING_TIMEOUT_MS", DEFAULT_PENDING_TIMEOUT_MS),
            query_retries,
            retry_backoff_ms: env_u64("RIDEGATE_RETRY_BACKOFF_MS", DEFAULT_RETRY_BACKOFF_MS),
            auth_paths: AuthPaths::default(),
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("RIDEGATE_PORTAL_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read RIDEGATE_PORTAL_CONFIG: {path}"))?;
            let override_cfg: PortalConfigOverride =
                serde_yaml::from_str(&contents).with_context(|| "parse portal config yaml")?;
            config.apply(override_cfg)?;
        }
        Ok(config)
    }

    fn apply(&mut self, override_cfg: PortalConfigOverride) -> Result<()> {
        if let Some(value) = override_cfg.portal_bind {
            self.portal_bind = value.parse().with_context(|| "parse portal_bind")?;
        }
        if let Some(value) = override_cfg.metrics_bind {
            self.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(value) = override_cfg.identity_url {
            self.identity_url = Some(value);
        }
        if let Some(value) = override_cfg.identity_ttl_ms
            && value > 0
        {
            self.identity_ttl_ms = value;
        }
        if let Some(value) = override_cfg.pending_timeout_ms
            && value > 0
        {
            self.pending_timeout_ms = value;
        }
        if let Some(value) = override_cfg.query_retries {
            self.query_retries = value;
        }
        if let Some(value) = override_cfg.retry_backoff_ms {
            self.retry_backoff_ms = value;
        }
        if let Some(value) = override_cfg.login_path {
            self.auth_paths.login = RoutePath::parse(value).with_context(|| "parse login_path")?;
        }
        if let Some(value) = override_cfg.unauthorized_path {
            self.auth_paths.unauthorized =
                RoutePath::parse(value).with_context(|| "parse unauthorized_path")?;
        }
        if let Some(value) = override_cfg.verify_path {
            self.auth_paths.verify =
                RoutePath::parse(value).with_context(|| "parse verify_path")?;
        }
        Ok(())
    }

    pub fn identity_ttl(&self) -> Duration {
        Duration::from_millis(self.identity_ttl_ms)
    }

    pub fn resolve_policy(&self) -> ResolvePolicy {
        ResolvePolicy {
            pending_timeout: Duration::from_millis(self.pending_timeout_ms),
            max_retries: self.query_retries,
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}
