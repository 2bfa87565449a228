use prometheus::{IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry, proto::MetricFamily};

use tick_core::Metrics;
use tick_model::ResourceKey;

/// Prometheus-backed [`Metrics`] sink.
///
/// Cheap to clone; all clones share one registry. Per-key series are
/// labeled `{namespace, name}` and updated concurrently by independent
/// tickers, which the prometheus primitives handle without extra
/// locking.
#[derive(Clone)]
pub struct PrometheusMetrics {
    registry: Registry,
    active_runners: IntGauge,
    last_fired: IntGaugeVec,
    fires_total: IntCounterVec,
}

impl PrometheusMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let active_runners = IntGauge::new(
            "tick_active_runners",
            "Number of live periodic runners",
        )?;
        let last_fired = IntGaugeVec::new(
            Opts::new(
                "tick_last_fired_timestamp_seconds",
                "Unix timestamp of the most recent fire per resource",
            ),
            &["namespace", "name"],
        )?;
        let fires_total = IntCounterVec::new(
            Opts::new("tick_fires_total", "Total fires per resource"),
            &["namespace", "name"],
        )?;

        registry.register(Box::new(active_runners.clone()))?;
        registry.register(Box::new(last_fired.clone()))?;
        registry.register(Box::new(fires_total.clone()))?;

        Ok(Self {
            registry,
            active_runners,
            last_fired,
            fires_total,
        })
    }

    /// Snapshot every registered metric family, ready for encoding.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Metrics for PrometheusMetrics {
    fn runner_started(&self) {
        self.active_runners.inc();
    }

    fn runner_stopped(&self) {
        self.active_runners.dec();
    }

    fn ticker_fired(&self, key: &ResourceKey, unix_ts: i64) {
        let labels = [key.namespace.as_str(), key.name.as_str()];
        self.last_fired.with_label_values(&labels).set(unix_ts);
        self.fires_total.with_label_values(&labels).inc();
    }
}
