//! Append-only observability timeline: event definitions, a JSONL store, a
//! streaming replay reader, and budget/cost aggregation.
//!
//! The store follows the open-write-close discipline of a transcript
//! writer — every append opens the file, writes one line, and closes it.
//! No file descriptor is held across idle time.

pub mod budget;
pub mod event;
pub mod replay;
pub mod store;

pub use budget::{BudgetMetrics, CostSummary, CostTracker, LatencyStats};
pub use event::{EventKind, Severity, TimelineEvent};
pub use replay::{ReplayFilter, ReplayReader, ReplaySessionSummary};
pub use store::{AppendOutcome, TimelineStore};
