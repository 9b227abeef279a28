use std::collections::HashMap;

use crate::event::{EventKind, Severity, TimelineEvent};

/// Cost summary returned by an external cost-tracking collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostSummary {
    pub total_usd: f64,
    pub total_tokens: u64,
}

/// External collaborator that knows how to price a session or the whole
/// instance. Not implemented by this core (§6).
pub trait CostTracker {
    fn cost_summary(&self, session_id: Option<&str>) -> CostSummary;
}

/// Latency aggregate for one event kind.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatencyStats {
    pub count: u64,
    pub total_ns: u64,
    pub min_ns: u64,
    pub max_ns: u64,
    pub mean_ns: f64,
}

impl LatencyStats {
    fn record(&mut self, duration_ns: u64) {
        self.count += 1;
        self.total_ns += duration_ns;
        self.min_ns = if self.count == 1 {
            duration_ns
        } else {
            self.min_ns.min(duration_ns)
        };
        self.max_ns = self.max_ns.max(duration_ns);
        self.mean_ns = self.total_ns as f64 / self.count as f64;
    }
}

/// Pure aggregation over a slice of (already filtered) timeline events.
#[derive(Debug, Clone, Default)]
pub struct BudgetMetrics {
    pub cost: CostSummary,
    pub latency_by_kind: HashMap<String, LatencyStats>,
    pub error_rate: f64,
}

impl BudgetMetrics {
    pub fn compute(
        events: &[TimelineEvent],
        cost_tracker: &dyn CostTracker,
        session_id: Option<&str>,
    ) -> Self {
        let mut latency_by_kind: HashMap<String, LatencyStats> = HashMap::new();
        let mut errors: u64 = 0;

        for event in events {
            if matches!(event.kind, EventKind::Llm | EventKind::Tool) {
                if let Some(duration) = event.duration_ns {
                    latency_by_kind
                        .entry(event.kind.as_str().to_string())
                        .or_default()
                        .record(duration);
                }
            }
            if event.severity == Severity::Error {
                errors += 1;
            }
        }

        let error_rate = if events.is_empty() {
            0.0
        } else {
            errors as f64 / events.len() as f64
        };

        Self {
            cost: cost_tracker.cost_summary(session_id),
            latency_by_kind,
            error_rate,
        }
    }
}
