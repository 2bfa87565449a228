use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ResourceKey, TickerStatus};

/// Desired state of a ticker: how often it should fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerSpec {
    /// Firing period in whole seconds. Must be at least 1.
    pub interval_seconds: u32,
}

/// Rejection reason for a declared spec that cannot be run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    #[error("intervalSeconds must be at least 1")]
    ZeroInterval,
}

impl TickerSpec {
    pub fn new(interval_seconds: u32) -> Self {
        Self { interval_seconds }
    }

    /// A zero interval would spin the runner without ever waiting,
    /// so it is rejected up front instead of started.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.interval_seconds == 0 {
            return Err(SpecError::ZeroInterval);
        }
        Ok(())
    }
}

/// Snapshot of a declared resource as observed at reconcile time.
///
/// Owned by an external actor; the reconciler only reads the spec and
/// writes back [`TickerStatus`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerResource {
    pub key: ResourceKey,
    pub spec: TickerSpec,
    #[serde(default)]
    pub status: TickerStatus,
}

impl TickerResource {
    pub fn new(key: ResourceKey, spec: TickerSpec) -> Self {
        Self {
            key,
            spec,
            status: TickerStatus::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_is_rejected() {
        assert_eq!(TickerSpec::new(0).validate(), Err(SpecError::ZeroInterval));
        assert!(TickerSpec::new(1).validate().is_ok());
    }

    #[test]
    fn resource_serializes_camel_case() {
        let resource = TickerResource::new(ResourceKey::new("demo", "clock"), TickerSpec::new(5));

        let json = serde_json::to_string(&resource).unwrap();
        assert!(json.contains(r#""intervalSeconds":5"#));

        let back: TickerResource = serde_json::from_str(&json).unwrap();
        assert_eq!(back.spec, resource.spec);
        assert_eq!(back.key, resource.key);
    }

    #[test]
    fn missing_status_defaults_to_empty() {
        let json = r#"{"key":{"namespace":"demo","name":"clock"},"spec":{"intervalSeconds":2}}"#;
        let resource: TickerResource = serde_json::from_str(json).unwrap();

        assert!(resource.status.start_time.is_none());
        assert!(resource.status.conditions.is_empty());
    }
}
