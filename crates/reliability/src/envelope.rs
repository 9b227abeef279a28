use std::thread;
use std::time::Duration;

use nc_domain::config::reliability::ReliabilityConfig;
use serde::{Deserialize, Serialize};

use crate::backoff::delay_for_attempt;
use crate::breaker::CircuitBreakerTracker;
use crate::cache::{CacheKey, ToolCache};
use crate::classify::{is_retryable_tool_error, is_transient};
use crate::health::ToolHealthTracker;

/// Outcome of a single tool invocation. The error channel is a plain
/// message rather than a typed error — tools are opaque collaborators
/// outside this core, and classification only ever looks at the text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub output: serde_json::Value,
    pub error: Option<String>,
}

/// A tool this envelope can wrap. Implementations are expected to be
/// collaborators defined elsewhere; this core only needs enough surface
/// to call and classify the result.
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn execute(&self, args: &serde_json::Value) -> Result<ToolResult, String>;
}

/// Result of running a tool through the full reliability envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ReliableOutcome {
    pub result: Result<ToolResult, String>,
    pub attempts: u32,
    pub retried: bool,
    pub cache_hit: bool,
}

/// Run `tool` through cache lookup, circuit breaker admission, retried
/// execution with backoff, and health/breaker bookkeeping, in that order.
///
/// A cache hit bypasses the tool entirely (`attempts == 0`). On a miss the
/// tool is called at least once and up to `1 + max_retries` times total,
/// stopping as soon as a call succeeds, a call fails non-transiently, or
/// the breaker denies admission.
pub fn reliable_execute(
    tool: &dyn Tool,
    args: &serde_json::Value,
    config: &ReliabilityConfig,
    health: &ToolHealthTracker,
    breaker: &CircuitBreakerTracker,
    cache: Option<&ToolCache>,
) -> ReliableOutcome {
    let tool_name = tool.name();
    let cache_key = cache.map(|_| CacheKey::new(tool_name, args));

    if let (Some(cache), Some(key)) = (cache, &cache_key) {
        if let Some(cached) = cache.get(key) {
            return ReliableOutcome {
                result: Ok(cached),
                attempts: 0,
                retried: false,
                cache_hit: true,
            };
        }
    }

    let max_attempts = 1 + config.max_retries;
    let mut attempts = 0u32;
    let mut last_result: Result<ToolResult, String> =
        Err("circuit breaker denied all attempts".to_string());

    for attempt in 0..max_attempts {
        if !breaker.is_call_permitted(tool_name) {
            tracing::warn!(tool = tool_name, "circuit breaker open, call denied");
            last_result = Err("circuit open".to_string());
            break;
        }

        attempts += 1;
        let outcome = tool.execute(args);
        last_result = match outcome {
            Ok(tool_result) if tool_result.success => {
                health.record_success(tool_name);
                breaker.record_success(tool_name);
                if let (Some(cache), Some(key)) = (cache, &cache_key) {
                    cache.insert(key.clone(), tool_result.clone(), config.cache.default_ttl_ns);
                }
                Ok(tool_result)
            }
            Ok(tool_result) => {
                health.record_failure(tool_name);
                breaker.record_failure(tool_name);
                let retryable = is_retryable_tool_error(tool_result.error.as_deref());
                let give_up = !retryable || attempt + 1 >= max_attempts;
                let result = Ok(tool_result);
                if give_up {
                    result
                } else {
                    sleep_for_attempt(config, attempt);
                    continue;
                }
            }
            Err(message) => {
                health.record_failure(tool_name);
                breaker.record_failure(tool_name);
                let retryable = is_transient(&message);
                let give_up = !retryable || attempt + 1 >= max_attempts;
                if give_up {
                    Err(message)
                } else {
                    sleep_for_attempt(config, attempt);
                    continue;
                }
            }
        };
        break;
    }

    ReliableOutcome {
        result: last_result,
        attempts,
        retried: attempts > 1,
        cache_hit: false,
    }
}

fn sleep_for_attempt(config: &ReliabilityConfig, attempt: u32) {
    let delay_ms = delay_for_attempt(
        config.backoff,
        config.base_delay_ms,
        config.max_delay_ms,
        config.multiplier_fp,
        attempt,
    );
    if delay_ms > 0 {
        thread::sleep(Duration::from_millis(delay_ms));
    }
}
