use serde::{Deserialize, Serialize};

/// Observed state reported back to the declared-state store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerStatus {
    /// RFC 3339 moment the first runner for this resource started.
    /// Written once and never overwritten, even across runner restarts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl TickerStatus {
    /// Stamp `start_time` if it is still unset.
    ///
    /// Returns `true` when this call set it.
    pub fn stamp_start_time(&mut self, ts: impl Into<String>) -> bool {
        if self.start_time.is_some() {
            return false;
        }
        self.start_time = Some(ts.into());
        true
    }

    /// Insert `condition`, replacing any prior condition of the same kind
    /// in place. Order of unrelated conditions is preserved.
    pub fn upsert_condition(&mut self, condition: Condition) {
        match self.conditions.iter_mut().find(|c| c.kind == condition.kind) {
            Some(slot) => *slot = condition,
            None => self.conditions.push(condition),
        }
    }

    pub fn condition(&self, kind: ConditionKind) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.kind == kind)
    }
}

/// Well-known condition types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionKind {
    /// Whether a runner is currently firing for this resource.
    Running,
}

/// One observation about a resource at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub kind: ConditionKind,
    pub status: bool,
    /// Machine-readable cause, e.g. `Started`.
    pub reason: String,
    /// Human-readable detail.
    pub message: String,
    pub last_transition_time: String,
}

impl Condition {
    pub fn new(
        kind: ConditionKind,
        status: bool,
        reason: impl Into<String>,
        message: impl Into<String>,
        last_transition_time: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            status,
            reason: reason.into(),
            message: message.into(),
            last_transition_time: last_transition_time.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(status: bool, reason: &str, ts: &str) -> Condition {
        Condition::new(ConditionKind::Running, status, reason, "", ts)
    }

    #[test]
    fn start_time_is_set_once() {
        let mut status = TickerStatus::default();

        assert!(status.stamp_start_time("2026-08-04T10:00:00Z"));
        assert!(!status.stamp_start_time("2026-08-04T11:00:00Z"));
        assert_eq!(status.start_time.as_deref(), Some("2026-08-04T10:00:00Z"));
    }

    #[test]
    fn upsert_replaces_same_kind_in_place() {
        let mut status = TickerStatus::default();

        status.upsert_condition(running(true, "Started", "t0"));
        status.upsert_condition(running(true, "Restarted", "t1"));

        assert_eq!(status.conditions.len(), 1);
        let cond = status.condition(ConditionKind::Running).unwrap();
        assert_eq!(cond.reason, "Restarted");
        assert_eq!(cond.last_transition_time, "t1");
    }

    #[test]
    fn condition_serializes_with_type_field() {
        let cond = running(true, "Started", "2026-08-04T10:00:00Z");
        let json = serde_json::to_string(&cond).unwrap();

        assert!(json.contains(r#""type":"running""#));
        assert!(json.contains(r#""lastTransitionTime""#));

        let back: Condition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cond);
    }

    #[test]
    fn empty_status_serializes_to_empty_object() {
        let status = TickerStatus::default();
        assert_eq!(serde_json::to_string(&status).unwrap(), "{}");
    }
}
