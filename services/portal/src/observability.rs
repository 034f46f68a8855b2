//! Logging and metrics wiring for the portal service.
//!
//! # Purpose
//! Installs the `tracing` subscriber and the Prometheus recorder, and serves
//! the scrape endpoint on its own listener.
//!
//! # Notes
//! Initialization is guarded by `OnceLock` so tests and `main` can call it
//! more than once.
use metrics_exporter_prometheus::PrometheusBuilder;
use metrics_exporter_prometheus::PrometheusHandle;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
static OBS_INIT: OnceLock<()> = OnceLock::new();

pub fn init_observability() -> PrometheusHandle {
    OBS_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer();
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init();
    });

    install_metrics_recorder()
}

pub async fn serve_metrics(handle: PrometheusHandle, addr: SocketAddr) -> std::io::Result<()> {
    serve_metrics_with_shutdown(handle, addr, std::future::pending()).await
}

pub async fn serve_metrics_with_shutdown<F>(
    handle: PrometheusHandle,
    addr: SocketAddr,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_metrics_with_listener(handle, listener, shutdown).await
}

async fn serve_metrics_with_listener<F>(
    handle: PrometheusHandle,
    listener: tokio::net::TcpListener,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = axum::Router::new().route(
        "/metrics",
        axum::routing::get(move || async move { handle.render() }),
    );
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
}

fn install_metrics_recorder() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            // Another recorder may already be global (tests, embedding);
            // keep the handle so /metrics still renders.
            if let Err(err) = metrics::set_global_recorder(recorder) {
                tracing::warn!(error = %err, "metrics recorder already installed");
            }
            handle
        })
        .clone()
}
