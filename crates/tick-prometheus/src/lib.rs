//! Prometheus metrics backend for the tick runner core.
//!
//! This crate provides [`PrometheusMetrics`], an implementation of
//! [`tick_core::Metrics`] that exposes runner and firing signals in
//! Prometheus format.
//!
//! ## Metrics
//! - `tick_active_runners` - Gauge
//! - `tick_last_fired_timestamp_seconds{namespace, name}` - Gauge
//! - `tick_fires_total{namespace, name}` - Counter
//!
//! ## HTTP Server
//! This crate does NOT serve a `/metrics` endpoint. Wire [`gather`]
//! output through your application's HTTP framework:
//!
//! ```rust,ignore
//! // Example with axum
//! async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> Response {
//!     let families = metrics.gather();
//!     let encoder = prometheus::TextEncoder::new();
//!     let mut buffer = vec![];
//!     encoder.encode(&families, &mut buffer).unwrap();
//!     // ...
//! }
//! ```
//!
//! [`gather`]: PrometheusMetrics::gather

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
