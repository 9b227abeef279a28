use nc_domain::config::sync::SCHEMA_VERSION;
use nc_domain::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaKind {
    Memory,
    Task,
    Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaOp {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeltaHeader {
    pub schema_version: u32,
    pub source_node: String,
    pub sequence: u64,
    pub timestamp: i64,
    pub kind: DeltaKind,
    pub op: DeltaOp,
    pub record_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryDelta {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDelta {
    pub task_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDelta {
    pub event_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_json: Option<serde_json::Value>,
}

/// A single sync delta. Exactly one of `memory`/`task`/`event` is set,
/// and it must match `header.kind` — see [`validate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncMessage {
    pub header: DeltaHeader,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryDelta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskDelta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EventDelta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncCursor {
    pub remote_node: String,
    pub last_sequence: u64,
    pub last_sync_ts: i64,
}

/// Reject outright unless all four conditions hold: schema version
/// matches, `source_node` length is in `[1, 64]`, exactly one payload
/// is set, and the set payload matches `header.kind`.
pub fn validate(message: &SyncMessage) -> Result<()> {
    if message.header.schema_version != SCHEMA_VERSION {
        return Err(Error::Protocol(format!(
            "unsupported schema version {}",
            message.header.schema_version
        )));
    }
    let len = message.header.source_node.len();
    if !(1..=64).contains(&len) {
        return Err(Error::Protocol(format!(
            "source_node length {len} out of range [1,64]"
        )));
    }
    let set_count = [
        message.memory.is_some(),
        message.task.is_some(),
        message.event.is_some(),
    ]
    .into_iter()
    .filter(|set| *set)
    .count();
    if set_count != 1 {
        return Err(Error::Protocol(format!(
            "expected exactly one payload, found {set_count}"
        )));
    }
    let kind_matches = match message.header.kind {
        DeltaKind::Memory => message.memory.is_some(),
        DeltaKind::Task => message.task.is_some(),
        DeltaKind::Event => message.event.is_some(),
    };
    if !kind_matches {
        return Err(Error::Protocol("payload does not match header.kind".into()));
    }
    Ok(())
}
