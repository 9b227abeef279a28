use std::collections::HashMap;

use nc_domain::config::reliability::CircuitBreakerConfig;
use parking_lot::RwLock;
use serde::Serialize;

use crate::now_ns;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone)]
struct BreakerEntry {
    state: CircuitState,
    consecutive_failures: u32,
    opened_at_ns: Option<i128>,
    half_open_probes_used: u32,
}

impl Default for BreakerEntry {
    fn default() -> Self {
        Self {
            state: CircuitState::Closed,
            consecutive_failures: 0,
            opened_at_ns: None,
            half_open_probes_used: 0,
        }
    }
}

/// Per-tool circuit breaker, keyed by tool name. Same one-lock-many-keys
/// shape as [`crate::health::ToolHealthTracker`].
pub struct CircuitBreakerTracker {
    config: CircuitBreakerConfig,
    entries: RwLock<HashMap<String, BreakerEntry>>,
}

impl CircuitBreakerTracker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Must be called before attempting a call. Transitions `open` to
    /// `half_open` once the recovery timeout has elapsed, then permits
    /// up to `half_open_max_probes` calls before rejecting again.
    pub fn is_call_permitted(&self, tool_name: &str) -> bool {
        self.is_call_permitted_at(tool_name, now_ns())
    }

    pub fn is_call_permitted_at(&self, tool_name: &str, now: i128) -> bool {
        let mut entries = self.entries.write();
        let entry = entries.entry(tool_name.to_string()).or_default();
        match entry.state {
            CircuitState::Closed => true,
            CircuitState::Open => {
                let opened_at = entry.opened_at_ns.unwrap_or(now);
                let elapsed = now.saturating_sub(opened_at);
                if elapsed >= self.config.recovery_timeout_ns as i128 {
                    entry.state = CircuitState::HalfOpen;
                    entry.half_open_probes_used = 1;
                    true
                } else {
                    false
                }
            }
            CircuitState::HalfOpen => {
                if entry.half_open_probes_used < self.config.half_open_max_probes {
                    entry.half_open_probes_used += 1;
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn record_success(&self, tool_name: &str) {
        let mut entries = self.entries.write();
        let entry = entries.entry(tool_name.to_string()).or_default();
        entry.consecutive_failures = 0;
        entry.state = CircuitState::Closed;
        entry.opened_at_ns = None;
        entry.half_open_probes_used = 0;
    }

    pub fn record_failure(&self, tool_name: &str) {
        self.record_failure_at(tool_name, now_ns());
    }

    pub fn record_failure_at(&self, tool_name: &str, now: i128) {
        let mut entries = self.entries.write();
        let entry = entries.entry(tool_name.to_string()).or_default();
        entry.consecutive_failures += 1;
        match entry.state {
            CircuitState::HalfOpen => {
                entry.state = CircuitState::Open;
                entry.opened_at_ns = Some(now);
                entry.half_open_probes_used = 0;
            }
            CircuitState::Closed if entry.consecutive_failures >= self.config.failure_threshold => {
                entry.state = CircuitState::Open;
                entry.opened_at_ns = Some(now);
            }
            _ => {}
        }
    }

    pub fn state(&self, tool_name: &str) -> CircuitState {
        self.entries
            .read()
            .get(tool_name)
            .map(|e| e.state)
            .unwrap_or(CircuitState::Closed)
    }
}
