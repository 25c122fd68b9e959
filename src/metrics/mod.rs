use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Running counters for mutator activity.
#[derive(Debug, Default, Clone)]
pub struct MutationMetrics {
    applied: u64,
    rejected: u64,
    invariant_violations: u64,
    rows_created: u64,
    rows_dropped: u64,
}

impl MutationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_applied(&mut self, rows_before: usize, rows_after: usize) {
        self.applied = self.applied.saturating_add(1);
        if rows_after > rows_before {
            self.rows_created = self
                .rows_created
                .saturating_add((rows_after - rows_before) as u64);
        } else {
            self.rows_dropped = self
                .rows_dropped
                .saturating_add((rows_before - rows_after) as u64);
        }
    }

    pub fn record_rejected(&mut self) {
        self.rejected = self.rejected.saturating_add(1);
    }

    pub fn record_invariant_violation(&mut self) {
        self.invariant_violations = self.invariant_violations.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            applied: self.applied,
            rejected: self.rejected,
            invariant_violations: self.invariant_violations,
            rows_created: self.rows_created,
            rows_dropped: self.rows_dropped,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub applied: u64,
    pub rejected: u64,
    pub invariant_violations: u64,
    pub rows_created: u64,
    pub rows_dropped: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "mutation_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("applied".to_string(), json!(self.applied));
        map.insert("rejected".to_string(), json!(self.rejected));
        map.insert(
            "invariant_violations".to_string(),
            json!(self.invariant_violations),
        );
        map.insert("rows_created".to_string(), json!(self.rows_created));
        map.insert("rows_dropped".to_string(), json!(self.rows_dropped));
        map
    }
}
