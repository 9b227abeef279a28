use serde::Serialize;

/// Structured trace events emitted across all nullclaw crates.
///
/// These are ambient `tracing` log lines, distinct from the durable,
/// replayable [`TimelineEvent`](../../nc_timeline/struct.TimelineEvent.html)
/// records appended by `nc-timeline` — a `TraceEvent` exists purely for
/// operator-facing logs and carries no invariants of its own.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    PolicyDenied {
        reason: String,
        matched_rule: Option<String>,
    },
    PolicyAllowed {
        risk: String,
    },
    CircuitOpened {
        tool: String,
        consecutive_failures: u32,
    },
    CircuitHalfOpen {
        tool: String,
    },
    CircuitClosed {
        tool: String,
    },
    ToolRetried {
        tool: String,
        attempt: u32,
    },
    ConflictResolved {
        record_id: String,
        winner: String,
        decided_by: String,
    },
    PeerTransition {
        node: String,
        from: String,
        to: String,
    },
    PipelineTransition {
        task_id: String,
        from: String,
        to: String,
    },
    BusDispatched {
        channel: String,
    },
    BusChannelNotFound {
        channel: String,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "nc_event");
    }
}
