use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Retry / backoff
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Shared by the tool reliability envelope and the step retry policy —
/// both describe the same backoff math over an attempt index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffStrategy {
    Constant,
    Linear,
    Exponential,
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::Exponential
    }
}

/// Retry/backoff/circuit-breaker/cache policy for the tool reliability
/// envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReliabilityConfig {
    #[serde(default = "d_max_retries")]
    pub max_retries: u32,
    #[serde(default)]
    pub backoff: BackoffStrategy,
    #[serde(default = "d_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "d_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Fixed-point backoff multiplier, scaled by 1000 (2000 == 2.0x).
    #[serde(default = "d_multiplier_fp")]
    pub multiplier_fp: u64,
    #[serde(default)]
    pub breaker: CircuitBreakerConfig,
    #[serde(default)]
    pub cache: ToolCacheConfig,
    /// Carried but not enforced — timeout *cancellation* is out of scope
    /// for this core (documented limitation). Callers needing cancellation
    /// compose with an external task framework.
    #[serde(default)]
    pub timeout_ns: Option<u64>,
}

impl Default for ReliabilityConfig {
    fn default() -> Self {
        Self {
            max_retries: d_max_retries(),
            backoff: BackoffStrategy::default(),
            base_delay_ms: d_base_delay_ms(),
            max_delay_ms: d_max_delay_ms(),
            multiplier_fp: d_multiplier_fp(),
            breaker: CircuitBreakerConfig::default(),
            cache: ToolCacheConfig::default(),
            timeout_ns: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    #[serde(default = "d_failure_threshold")]
    pub failure_threshold: u32,
    #[serde(default = "d_recovery_timeout_ns")]
    pub recovery_timeout_ns: u64,
    #[serde(default = "d_half_open_max_probes")]
    pub half_open_max_probes: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: d_failure_threshold(),
            recovery_timeout_ns: d_recovery_timeout_ns(),
            half_open_max_probes: d_half_open_max_probes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCacheConfig {
    #[serde(default = "d_cache_capacity")]
    pub capacity: usize,
    #[serde(default)]
    pub default_ttl_ns: u64,
}

impl Default for ToolCacheConfig {
    fn default() -> Self {
        Self {
            capacity: d_cache_capacity(),
            default_ttl_ns: 0,
        }
    }
}

fn d_max_retries() -> u32 {
    3
}
fn d_base_delay_ms() -> u64 {
    100
}
fn d_max_delay_ms() -> u64 {
    30_000
}
fn d_multiplier_fp() -> u64 {
    2000
}
fn d_failure_threshold() -> u32 {
    5
}
fn d_recovery_timeout_ns() -> u64 {
    30_000_000_000
}
fn d_half_open_max_probes() -> u32 {
    1
}
fn d_cache_capacity() -> usize {
    256
}
