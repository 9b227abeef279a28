use serde::{Deserialize, Serialize};

/// Schema version implemented by this core. Messages at any other version
/// are rejected outright.
pub const SCHEMA_VERSION: u32 = 1;

/// Protocol magic identifying sync messages at [`SCHEMA_VERSION`].
pub const PROTOCOL_MAGIC: &str = "nullclaw-sync-v1";

/// Hub snapshot format magic.
pub const HUB_SNAPSHOT_FORMAT: &str = "nullclaw-hub-snapshot";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub heartbeat: HeartbeatConfig,
    /// This node's identity, used as the tiebreak source in conflict
    /// resolution and as `source_node` in emitted deltas.
    #[serde(default = "d_node_id")]
    pub node_id: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            heartbeat: HeartbeatConfig::default(),
            node_id: d_node_id(),
        }
    }
}

fn d_node_id() -> String {
    "huginn".into()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HeartbeatConfig {
    #[serde(default = "d_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "d_degraded_after_missed")]
    pub degraded_after_missed: u32,
    #[serde(default = "d_offline_after_missed")]
    pub offline_after_missed: u32,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval_ms: d_interval_ms(),
            degraded_after_missed: d_degraded_after_missed(),
            offline_after_missed: d_offline_after_missed(),
        }
    }
}

fn d_interval_ms() -> u64 {
    30_000
}
fn d_degraded_after_missed() -> u32 {
    2
}
fn d_offline_after_missed() -> u32 {
    5
}
