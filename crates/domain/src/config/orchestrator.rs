use serde::{Deserialize, Serialize};

use super::reliability::BackoffStrategy;

/// Planner/executor/verifier pipeline configuration. Disabled by default —
/// when `enabled` is false (or the planner/executor hooks are absent at the
/// call site) the daemon bypasses orchestration and dispatches the task
/// through the direct path; observable behavior is unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub step_retry: StepRetryConfig,
    /// Maximum concurrently in-flight tasks. Clamped to `1..=20`, mirroring
    /// the semaphore-bounded task queue this is modeled on.
    #[serde(default = "d_max_concurrent_tasks")]
    pub max_concurrent_tasks: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            step_retry: StepRetryConfig::default(),
            max_concurrent_tasks: d_max_concurrent_tasks(),
        }
    }
}

impl PipelineConfig {
    /// Clamp `max_concurrent_tasks` to the allowed range `1..=20`.
    pub fn clamped(&self) -> Self {
        Self {
            max_concurrent_tasks: self.max_concurrent_tasks.clamp(1, 20),
            ..self.clone()
        }
    }
}

/// Step-level retry policy (§3 Step record & step retry policy).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRetryConfig {
    #[serde(default = "d_step_max_retries")]
    pub max_retries: u32,
    #[serde(default)]
    pub backoff: BackoffStrategy,
    #[serde(default = "d_step_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "d_step_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Fixed-point backoff multiplier, scaled by 1000 (2000 == 2.0x) — same
    /// convention as `ReliabilityConfig::multiplier_fp`, so both policies
    /// drive the identical backoff formula.
    #[serde(default = "d_step_multiplier_fp")]
    pub multiplier_fp: u64,
}

impl Default for StepRetryConfig {
    fn default() -> Self {
        Self {
            max_retries: d_step_max_retries(),
            backoff: BackoffStrategy::default(),
            base_delay_ms: d_step_base_delay_ms(),
            max_delay_ms: d_step_max_delay_ms(),
            multiplier_fp: d_step_multiplier_fp(),
        }
    }
}

fn d_max_concurrent_tasks() -> usize {
    5
}
fn d_step_max_retries() -> u32 {
    2
}
fn d_step_base_delay_ms() -> u64 {
    200
}
fn d_step_max_delay_ms() -> u64 {
    10_000
}
fn d_step_multiplier_fp() -> u64 {
    2000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_by_default() {
        assert!(!PipelineConfig::default().enabled);
    }

    #[test]
    fn clamp_above_max() {
        let cfg = PipelineConfig {
            max_concurrent_tasks: 99,
            ..PipelineConfig::default()
        };
        assert_eq!(cfg.clamped().max_concurrent_tasks, 20);
    }

    #[test]
    fn clamp_below_min() {
        let cfg = PipelineConfig {
            max_concurrent_tasks: 0,
            ..PipelineConfig::default()
        };
        assert_eq!(cfg.clamped().max_concurrent_tasks, 1);
    }
}
