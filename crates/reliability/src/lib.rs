//! Tool reliability envelope: retry with backoff, per-tool health
//! tracking, a circuit breaker, and a TTL cache for idempotent calls.

pub mod backoff;
pub mod breaker;
pub mod cache;
pub mod classify;
pub mod envelope;
pub mod health;

pub use backoff::delay_for_attempt;
pub use breaker::{CircuitBreakerTracker, CircuitState};
pub use cache::{CacheKey, CacheStats, ToolCache};
pub use envelope::{reliable_execute, ReliableOutcome, Tool, ToolResult};
pub use health::{HealthState, ToolHealthSnapshot, ToolHealthTracker};

pub(crate) fn now_ns() -> i128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as i128)
        .unwrap_or(0)
}
