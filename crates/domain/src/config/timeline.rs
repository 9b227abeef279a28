use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Append-only event store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineConfig {
    #[serde(default = "d_path")]
    pub path: PathBuf,
    /// Maximum serialized size of a single event, in bytes. Oversize
    /// events are dropped and reported to the caller, never truncated.
    #[serde(default = "d_max_event_bytes")]
    pub max_event_bytes: usize,
    /// Replay scan buffer size, in bytes.
    #[serde(default = "d_scan_buffer_bytes")]
    pub scan_buffer_bytes: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            path: d_path(),
            max_event_bytes: d_max_event_bytes(),
            scan_buffer_bytes: d_scan_buffer_bytes(),
        }
    }
}

fn d_path() -> PathBuf {
    PathBuf::from("./data/timeline.jsonl")
}
fn d_max_event_bytes() -> usize {
    4096
}
fn d_scan_buffer_bytes() -> usize {
    8192
}
