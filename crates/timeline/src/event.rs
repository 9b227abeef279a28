use serde::{Deserialize, Serialize};

/// Coarse origin of a timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Agent,
    Llm,
    Tool,
    Channel,
    Task,
    Memory,
    System,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Llm => "llm",
            Self::Tool => "tool",
            Self::Channel => "channel",
            Self::Task => "task",
            Self::Memory => "memory",
            Self::System => "system",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "agent" => Self::Agent,
            "llm" => Self::Llm,
            "tool" => Self::Tool,
            "channel" => Self::Channel,
            "task" => Self::Task,
            "memory" => Self::Memory,
            "system" => Self::System,
            _ => return None,
        })
    }
}

/// Severity, ordered `Debug < Info < Warn < Error` for threshold filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "debug" => Self::Debug,
            "info" => Self::Info,
            "warn" => Self::Warn,
            "error" => Self::Error,
            _ => return None,
        })
    }
}

/// A single timeline event. `id` is unique within a store; `ts` is a
/// nanosecond timestamp. `name` is a dotted identifier such as
/// `policy.denied` or `tool.retried`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    pub ts: i128,
    pub kind: EventKind,
    pub severity: Severity,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ns: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

impl TimelineEvent {
    pub fn new(id: impl Into<String>, ts: i128, kind: EventKind, severity: Severity, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ts,
            kind,
            severity,
            name: name.into(),
            session_id: None,
            task_id: None,
            span_id: None,
            parent_span_id: None,
            duration_ns: None,
            message: None,
            component: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordinal_order() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
    }

    #[test]
    fn event_kind_round_trips_through_str() {
        for kind in [
            EventKind::Agent,
            EventKind::Llm,
            EventKind::Tool,
            EventKind::Channel,
            EventKind::Task,
            EventKind::Memory,
            EventKind::System,
        ] {
            assert_eq!(EventKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn severity_round_trips_through_str() {
        for sev in [Severity::Debug, Severity::Info, Severity::Warn, Severity::Error] {
            assert_eq!(Severity::parse(sev.as_str()), Some(sev));
        }
    }

    #[test]
    fn unknown_kind_and_severity_are_rejected() {
        assert_eq!(EventKind::parse("bogus"), None);
        assert_eq!(Severity::parse("bogus"), None);
    }
}
