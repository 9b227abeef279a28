use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::event::TimelineEvent;

/// Outcome of a single append attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Written,
    /// The serialized event exceeded `max_event_bytes`; nothing was written.
    Oversize,
}

/// Append-only JSONL event store.
///
/// Every [`Self::append`] call opens the file (creating it if missing),
/// writes one line, and closes it — no descriptor is cached across idle
/// time. A [`Mutex`] serializes writers so appends are totally ordered per
/// store even from multiple threads.
pub struct TimelineStore {
    path: PathBuf,
    max_event_bytes: usize,
    write_lock: Mutex<()>,
    seq: AtomicU64,
}

impl TimelineStore {
    pub fn new(path: impl Into<PathBuf>, max_event_bytes: usize) -> Self {
        Self {
            path: path.into(),
            max_event_bytes,
            write_lock: Mutex::new(()),
            seq: AtomicU64::new(0),
        }
    }

    /// Lock-free monotonic counter, useful for generating event ids.
    pub fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize and append one event. Returns [`AppendOutcome::Oversize`]
    /// without writing anything when the serialized line would exceed
    /// `max_event_bytes`.
    pub fn append(&self, event: &TimelineEvent) -> nc_domain::Result<AppendOutcome> {
        let line = serde_json::to_string(event)?;
        if line.len() > self.max_event_bytes {
            return Ok(AppendOutcome::Oversize);
        }

        let _guard = self.write_lock.lock();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(AppendOutcome::Written)
    }
}
