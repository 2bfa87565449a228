use std::{env, time::Duration};

use anyhow::Context;

use tick_observe::LogFormat;

/// Daemon configuration, read from `TICK_*` environment variables with
/// sensible defaults for a local run.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub log_level: String,
    pub log_format: LogFormat,
    pub metrics_addr: String,
    /// How often every known key is re-enqueued for reconciliation.
    pub resync: Duration,
    /// Interval of the seeded demo resource.
    pub demo_interval_seconds: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            metrics_addr: "127.0.0.1:9464".to_string(),
            resync: Duration::from_secs(30),
            demo_interval_seconds: 5,
        }
    }
}

impl AgentConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let mut cfg = Self::default();

        if let Ok(v) = env::var("TICK_LOG_LEVEL") {
            cfg.log_level = v;
        }
        if let Ok(v) = env::var("TICK_LOG_FORMAT") {
            cfg.log_format = v.parse()?;
        }
        if let Ok(v) = env::var("TICK_METRICS_ADDR") {
            cfg.metrics_addr = v;
        }
        if let Ok(v) = env::var("TICK_RESYNC_SECONDS") {
            let secs: u64 = v
                .parse()
                .with_context(|| format!("invalid TICK_RESYNC_SECONDS: {v}"))?;
            cfg.resync = Duration::from_secs(secs);
        }
        if let Ok(v) = env::var("TICK_DEMO_INTERVAL_SECONDS") {
            cfg.demo_interval_seconds = v
                .parse()
                .with_context(|| format!("invalid TICK_DEMO_INTERVAL_SECONDS: {v}"))?;
        }

        Ok(cfg)
    }
}
