use std::collections::HashMap;

use parking_lot::RwLock;
use serde::Serialize;

use crate::now_ns;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Default)]
struct HealthEntry {
    consecutive_failures: u32,
    total_successes: u64,
    total_failures: u64,
    last_success_ns: Option<i128>,
    last_failure_ns: Option<i128>,
}

impl HealthEntry {
    fn state(&self) -> HealthState {
        if self.consecutive_failures >= 5 {
            HealthState::Unhealthy
        } else if self.consecutive_failures >= 2 {
            HealthState::Degraded
        } else {
            HealthState::Healthy
        }
    }
}

/// Snapshot of one tool's health, safe to serialize and hand to a caller.
#[derive(Debug, Clone, Serialize)]
pub struct ToolHealthSnapshot {
    pub tool_name: String,
    pub state: HealthState,
    pub consecutive_failures: u32,
    pub total_successes: u64,
    pub total_failures: u64,
    pub last_success_ns: Option<i128>,
    pub last_failure_ns: Option<i128>,
}

/// Per-tool health tracker, keyed by tool name. Mirrors the per-agent
/// quota tracker: one `RwLock<HashMap<..>>`, short critical sections.
#[derive(Default)]
pub struct ToolHealthTracker {
    entries: RwLock<HashMap<String, HealthEntry>>,
}

impl ToolHealthTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, tool_name: &str) {
        let mut entries = self.entries.write();
        let entry = entries.entry(tool_name.to_string()).or_default();
        entry.consecutive_failures = 0;
        entry.total_successes += 1;
        entry.last_success_ns = Some(now_ns());
    }

    pub fn record_failure(&self, tool_name: &str) {
        let mut entries = self.entries.write();
        let entry = entries.entry(tool_name.to_string()).or_default();
        entry.consecutive_failures += 1;
        entry.total_failures += 1;
        entry.last_failure_ns = Some(now_ns());
    }

    pub fn state(&self, tool_name: &str) -> HealthState {
        self.entries
            .read()
            .get(tool_name)
            .map(HealthEntry::state)
            .unwrap_or(HealthState::Healthy)
    }

    pub fn snapshot(&self, tool_name: &str) -> ToolHealthSnapshot {
        let entries = self.entries.read();
        let entry = entries.get(tool_name).cloned().unwrap_or_default();
        ToolHealthSnapshot {
            tool_name: tool_name.to_string(),
            state: entry.state(),
            consecutive_failures: entry.consecutive_failures,
            total_successes: entry.total_successes,
            total_failures: entry.total_failures,
            last_success_ns: entry.last_success_ns,
            last_failure_ns: entry.last_failure_ns,
        }
    }

    pub fn snapshot_all(&self) -> Vec<ToolHealthSnapshot> {
        self.entries
            .read()
            .keys()
            .map(|name| self.snapshot(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tool_is_healthy() {
        let tracker = ToolHealthTracker::new();
        assert_eq!(tracker.state("fetch"), HealthState::Healthy);
    }

    #[test]
    fn one_failure_is_still_healthy() {
        let tracker = ToolHealthTracker::new();
        tracker.record_failure("fetch");
        assert_eq!(tracker.state("fetch"), HealthState::Healthy);
    }

    #[test]
    fn two_consecutive_failures_is_degraded() {
        let tracker = ToolHealthTracker::new();
        tracker.record_failure("fetch");
        tracker.record_failure("fetch");
        assert_eq!(tracker.state("fetch"), HealthState::Degraded);
    }

    #[test]
    fn five_consecutive_failures_is_unhealthy() {
        let tracker = ToolHealthTracker::new();
        for _ in 0..5 {
            tracker.record_failure("fetch");
        }
        assert_eq!(tracker.state("fetch"), HealthState::Unhealthy);
    }

    #[test]
    fn success_resets_consecutive_failures() {
        let tracker = ToolHealthTracker::new();
        for _ in 0..5 {
            tracker.record_failure("fetch");
        }
        tracker.record_success("fetch");
        assert_eq!(tracker.state("fetch"), HealthState::Healthy);
        let snapshot = tracker.snapshot("fetch");
        assert_eq!(snapshot.consecutive_failures, 0);
        assert_eq!(snapshot.total_failures, 5);
        assert_eq!(snapshot.total_successes, 1);
    }

    #[test]
    fn tools_are_tracked_independently() {
        let tracker = ToolHealthTracker::new();
        for _ in 0..5 {
            tracker.record_failure("fetch");
        }
        tracker.record_success("write_file");
        assert_eq!(tracker.state("fetch"), HealthState::Unhealthy);
        assert_eq!(tracker.state("write_file"), HealthState::Healthy);
    }
}
