//! ridegate portal HTTP service entry point.
//!
//! # Purpose
//! Loads configuration, audits the route manifest, then serves the portal API
//! and the Prometheus scrape endpoint until interrupted.
use anyhow::Context;
use portal::app::{AppState, build_router};
use portal::config::PortalConfig;
use portal::observability;
use std::future::Future;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = PortalConfig::from_env_or_yaml().context("portal config")?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: PortalConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability();
    let state = AppState::from_config(&config)?;
    tracing::info!(
        routes = state.manifest.routes().len(),
        longest_redirect_chain = state.longest_redirect_chain,
        "route manifest audited"
    );
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let app = build_router(state);
    let addr = config.portal_bind;
    tracing::info!(%addr, "portal listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {}
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    Ok(())
}
