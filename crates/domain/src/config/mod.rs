pub mod bus;
pub mod gateway;
pub mod hardware;
pub mod memory;
pub mod orchestrator;
pub mod policy;
pub mod reliability;
pub mod secret_scope;
pub mod sync;
pub mod timeline;
pub mod workspace;

pub use bus::*;
pub use gateway::*;
pub use hardware::*;
pub use memory::*;
pub use orchestrator::*;
pub use policy::*;
pub use reliability::*;
pub use secret_scope::*;
pub use sync::*;
pub use timeline::*;
pub use workspace::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub bus: BusConfig,
    #[serde(default)]
    pub reliability: ReliabilityConfig,
    #[serde(default)]
    pub orchestrator: PipelineConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub secrets: SecretScopeConfig,
    #[serde(default)]
    pub doctor: DoctorConfig,
    #[serde(default)]
    pub hardware: HardwareConfig,
    #[serde(default)]
    pub peripherals: PeripheralsConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.gateway.host.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "gateway.host".into(),
                message: "host must not be empty".into(),
            });
        }

        if self.policy.max_actions_per_hour == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "policy.max_actions_per_hour".into(),
                message: "must be greater than 0".into(),
            });
        }

        for (i, pattern) in self.policy.denied_patterns.iter().enumerate() {
            if let Err(e) = regex::Regex::new(pattern) {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Error,
                    field: format!("policy.denied_patterns[{i}]"),
                    message: format!("invalid regex \"{pattern}\": {e}"),
                });
            }
        }

        if self.policy.allowed_commands.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "policy.allowed_commands".into(),
                message: "empty allowlist — every command will be denied".into(),
            });
        }

        for (name, ov) in self.policy.workspace_policies.iter() {
            if let (Some(autonomy), inst) = (ov.autonomy, self.policy.autonomy) {
                if autonomy > inst {
                    errors.push(ConfigError {
                        severity: ConfigSeverity::Error,
                        field: format!("policy.workspace_policies.{name}.autonomy"),
                        message: format!(
                            "override autonomy {autonomy:?} widens instance autonomy {inst:?} — overrides may only narrow"
                        ),
                    });
                }
            }
        }

        if self.reliability.max_retries == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "reliability.max_retries".into(),
                message: "max_retries is 0 — tool calls will never retry".into(),
            });
        }

        if self.reliability.breaker.failure_threshold == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "reliability.breaker.failure_threshold".into(),
                message: "must be greater than 0".into(),
            });
        }

        if self.orchestrator.max_concurrent_tasks == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "orchestrator.max_concurrent_tasks".into(),
                message: "must be greater than 0".into(),
            });
        }

        if self.sync.node_id.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "sync.node_id".into(),
                message: "node_id must not be empty".into(),
            });
        }

        if self.sync.heartbeat.degraded_after_missed == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "sync.heartbeat.degraded_after_missed".into(),
                message: "must be greater than 0".into(),
            });
        }

        if self.sync.heartbeat.offline_after_missed <= self.sync.heartbeat.degraded_after_missed {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "sync.heartbeat.offline_after_missed".into(),
                message: "must be greater than degraded_after_missed".into(),
            });
        }

        if self.memory.decay.semantic_half_life_hours <= 0.0
            || self.memory.decay.episodic_half_life_hours <= 0.0
            || self.memory.decay.procedural_half_life_hours <= 0.0
        {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "memory.decay".into(),
                message: "half-life values must be greater than 0".into(),
            });
        }

        if self.timeline.max_event_bytes == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "timeline.max_event_bytes".into(),
                message: "must be greater than 0".into(),
            });
        }

        errors
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    fn find_issue<'a>(issues: &'a [ConfigError], field_prefix: &str) -> Option<&'a ConfigError> {
        issues.iter().find(|e| e.field.starts_with(field_prefix))
    }

    #[test]
    fn default_config_has_no_errors() {
        let issues = Config::default().validate();
        let errors: Vec<_> = issues
            .iter()
            .filter(|e| e.severity == ConfigSeverity::Error)
            .collect();
        assert!(errors.is_empty(), "expected no errors, got: {errors:?}");
    }

    #[test]
    fn gateway_host_empty_is_error() {
        let mut cfg = Config::default();
        cfg.gateway.host = String::new();
        let issues = cfg.validate();
        let issue = find_issue(&issues, "gateway.host").expect("expected gateway.host error");
        assert_eq!(issue.severity, ConfigSeverity::Error);
    }

    #[test]
    fn invalid_denied_pattern_is_error() {
        let mut cfg = Config::default();
        cfg.policy.denied_patterns = vec![r"[invalid".into()];
        let issues = cfg.validate();
        let issue = find_issue(&issues, "policy.denied_patterns[0]")
            .expect("expected regex error");
        assert_eq!(issue.severity, ConfigSeverity::Error);
    }

    #[test]
    fn empty_allowlist_is_warning() {
        let mut cfg = Config::default();
        cfg.policy.allowed_commands.clear();
        let issues = cfg.validate();
        let issue =
            find_issue(&issues, "policy.allowed_commands").expect("expected allowlist warning");
        assert_eq!(issue.severity, ConfigSeverity::Warning);
    }

    #[test]
    fn workspace_override_widening_autonomy_is_error() {
        let mut cfg = Config::default();
        cfg.policy.autonomy = Autonomy::ReadOnly;
        cfg.policy.workspace_policies.insert(
            "demo".into(),
            WorkspacePolicyOverride {
                autonomy: Some(Autonomy::Full),
                ..Default::default()
            },
        );
        let issues = cfg.validate();
        let issue = find_issue(&issues, "policy.workspace_policies.demo.autonomy")
            .expect("expected widening-autonomy error");
        assert_eq!(issue.severity, ConfigSeverity::Error);
    }

    #[test]
    fn workspace_override_narrowing_autonomy_is_ok() {
        let mut cfg = Config::default();
        cfg.policy.autonomy = Autonomy::Full;
        cfg.policy.workspace_policies.insert(
            "demo".into(),
            WorkspacePolicyOverride {
                autonomy: Some(Autonomy::ReadOnly),
                ..Default::default()
            },
        );
        let issues = cfg.validate();
        assert!(find_issue(&issues, "policy.workspace_policies.demo.autonomy").is_none());
    }

    #[test]
    fn heartbeat_offline_must_exceed_degraded() {
        let mut cfg = Config::default();
        cfg.sync.heartbeat.degraded_after_missed = 3;
        cfg.sync.heartbeat.offline_after_missed = 3;
        let issues = cfg.validate();
        let issue = find_issue(&issues, "sync.heartbeat.offline_after_missed")
            .expect("expected offline/degraded ordering error");
        assert_eq!(issue.severity, ConfigSeverity::Error);
    }

    #[test]
    fn zero_half_life_is_error() {
        let mut cfg = Config::default();
        cfg.memory.decay.episodic_half_life_hours = 0.0;
        let issues = cfg.validate();
        let issue = find_issue(&issues, "memory.decay").expect("expected decay error");
        assert_eq!(issue.severity, ConfigSeverity::Error);
    }

    #[test]
    fn config_error_display_format() {
        let err = ConfigError {
            severity: ConfigSeverity::Error,
            field: "gateway.host".into(),
            message: "host must not be empty".into(),
        };
        assert_eq!(
            format!("{err}"),
            "[ERROR] gateway.host: host must not be empty"
        );
    }
}
