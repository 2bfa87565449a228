mod config;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use tokio::{net::TcpListener, sync::mpsc};
use tracing::{info, warn};

use tick_core::{MemoryStore, Reconciler};
use tick_model::{ResourceKey, TickerSpec};
use tick_observe::{LoggerConfig, init_logger};
use tick_prometheus::{Encoder, PrometheusMetrics, TextEncoder};

use crate::config::AgentConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AgentConfig::from_env()?;

    init_logger(&LoggerConfig {
        format: cfg.log_format,
        level: cfg.log_level.clone(),
        ..LoggerConfig::default()
    })?;
    info!("logger initialized");

    let metrics = PrometheusMetrics::new().context("failed to build metrics registry")?;
    let store = MemoryStore::new();
    let reconciler = Arc::new(Reconciler::new(store.clone(), Arc::new(metrics.clone())));

    // Trigger queue. The single consumer keeps reconciles per-key
    // serialized; duplicate deliveries are fine since unchanged state
    // reconciles to a no-op.
    let (triggers, mut inbox) = mpsc::channel::<ResourceKey>(64);

    {
        let reconciler = Arc::clone(&reconciler);
        let triggers = triggers.clone();
        tokio::spawn(async move {
            while let Some(key) = inbox.recv().await {
                if let Err(e) = reconciler.reconcile(&key).await {
                    warn!(key = %key, error = %e, "reconcile failed, requeueing");
                    if triggers.try_send(key).is_err() {
                        warn!("trigger queue full, dropping retry; resync will pick it up");
                    }
                }
            }
        });
    }

    // Periodic resync re-enqueues every known key, which doubles as the
    // retry path of last resort for dropped triggers.
    {
        let store = store.clone();
        let triggers = triggers.clone();
        let period = cfg.resync;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await; // interval's first tick is immediate
            loop {
                ticker.tick().await;
                for key in store.keys() {
                    let _ = triggers.try_send(key);
                }
            }
        });
    }

    serve_metrics_endpoint(&cfg.metrics_addr, metrics.clone()).await?;

    // Seed a demo resource so the daemon has something to run; in a real
    // deployment triggers come from whatever watches the declared state.
    let key = ResourceKey::new("default", "clock");
    store.apply(key.clone(), TickerSpec::new(cfg.demo_interval_seconds));
    triggers
        .send(key)
        .await
        .map_err(|_| anyhow::anyhow!("trigger worker is gone"))?;

    info!("agent is running; press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;

    let stopped = reconciler.shutdown();
    info!(stopped, "shut down");
    Ok(())
}

async fn serve_metrics_endpoint(addr: &str, metrics: PrometheusMetrics) -> anyhow::Result<()> {
    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind metrics endpoint on {addr}"))?;
    info!(addr, "metrics endpoint listening");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            warn!(error = %e, "metrics server stopped");
        }
    });
    Ok(())
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metrics.gather(), &mut buffer) {
        warn!(error = %e, "failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        [(header::CONTENT_TYPE, encoder.format_type().to_owned())],
        buffer,
    )
        .into_response()
}
