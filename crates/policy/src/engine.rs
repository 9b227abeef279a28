use nc_domain::config::policy::{Autonomy, PolicyConfig};

use crate::command::check_command_execution;
use crate::command::CommandDecision;
use crate::denial::PolicyDenial;
use crate::rate::RateTracker;

/// Fire-and-forget observer, invoked for every denial. Implementations
/// must not fail — errors are swallowed by the caller, not this crate.
pub trait DenyHook: Send + Sync {
    fn on_denied(&self, denial: &PolicyDenial);
}

/// Merge the instance policy with a workspace's override, applying the
/// tighten-only clamps: autonomy takes the ordinal minimum, approval/block
/// flags OR together, the per-hour limit takes the minimum, and the
/// workspace's extra allowlist entries extend (never replace) the
/// instance list.
pub fn effective_policy(base: &PolicyConfig, workspace: &str) -> PolicyConfig {
    let Some(over) = base.workspace_policies.get(workspace) else {
        return base.clone();
    };

    let mut effective = base.clone();
    if let Some(autonomy) = over.autonomy {
        effective.autonomy = effective.autonomy.min(autonomy);
    }
    if let Some(max) = over.max_actions_per_hour {
        effective.max_actions_per_hour = effective.max_actions_per_hour.min(max);
    }
    if let Some(flag) = over.require_approval_for_medium_risk {
        effective.require_approval_for_medium_risk |= flag;
    }
    if let Some(flag) = over.block_high_risk_commands {
        effective.block_high_risk_commands |= flag;
    }
    for extra in &over.extra_allowed_commands {
        if !effective.allowed_commands.contains(extra) {
            effective.allowed_commands.push(extra.clone());
        }
    }
    effective
}

/// Ties the policy config, rate tracker, and optional deny-hook together
/// behind a single evaluation entrypoint.
pub struct PolicyEngine {
    policy: PolicyConfig,
    rate_tracker: RateTracker,
    deny_hook: Option<Box<dyn DenyHook>>,
}

impl PolicyEngine {
    pub fn new(policy: PolicyConfig) -> Self {
        Self {
            policy,
            rate_tracker: RateTracker::new(),
            deny_hook: None,
        }
    }

    pub fn with_deny_hook(mut self, hook: Box<dyn DenyHook>) -> Self {
        self.deny_hook = Some(hook);
        self
    }

    /// Evaluate `command` for execution in `workspace`, applying the
    /// workspace override, the full gating pipeline, and the rate
    /// tracker, then firing the deny-hook on any denial.
    pub fn evaluate(
        &self,
        command: &str,
        workspace: &str,
        approved: bool,
        now_hour_bucket: i64,
    ) -> CommandDecision {
        let policy = effective_policy(&self.policy, workspace);
        let decision = check_command_execution(
            command,
            &policy,
            approved,
            Some(&self.rate_tracker),
            now_hour_bucket,
        );
        if let CommandDecision::Denied(denial) = &decision {
            if let Some(hook) = &self.deny_hook {
                hook.on_denied(denial);
            }
            tracing::info!(reason = ?denial.reason, "command denied");
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nc_domain::config::policy::WorkspacePolicyOverride;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn no_override_returns_base_policy_unchanged() {
        let base = PolicyConfig::default();
        let effective = effective_policy(&base, "unknown-workspace");
        assert_eq!(effective.max_actions_per_hour, base.max_actions_per_hour);
    }

    #[test]
    fn override_narrows_autonomy_to_ordinal_minimum() {
        let mut base = PolicyConfig {
            autonomy: Autonomy::Full,
            ..PolicyConfig::default()
        };
        base.workspace_policies.insert(
            "w1".to_string(),
            WorkspacePolicyOverride {
                autonomy: Some(Autonomy::ReadOnly),
                ..Default::default()
            },
        );
        let effective = effective_policy(&base, "w1");
        assert_eq!(effective.autonomy, Autonomy::ReadOnly);
    }

    #[test]
    fn override_min_caps_per_hour_limit() {
        let mut base = PolicyConfig {
            max_actions_per_hour: 100,
            ..PolicyConfig::default()
        };
        base.workspace_policies.insert(
            "w1".to_string(),
            WorkspacePolicyOverride {
                max_actions_per_hour: Some(10),
                ..Default::default()
            },
        );
        let effective = effective_policy(&base, "w1");
        assert_eq!(effective.max_actions_per_hour, 10);
    }

    #[test]
    fn override_extends_allowlist_without_replacing() {
        let mut base = PolicyConfig::default();
        let original_len = base.allowed_commands.len();
        base.workspace_policies.insert(
            "w1".to_string(),
            WorkspacePolicyOverride {
                extra_allowed_commands: vec!["zig".to_string()],
                ..Default::default()
            },
        );
        let effective = effective_policy(&base, "w1");
        assert_eq!(effective.allowed_commands.len(), original_len + 1);
        assert!(effective.allowed_commands.contains(&"zig".to_string()));
        assert!(effective.allowed_commands.contains(&"ls".to_string()));
    }

    struct CountingHook {
        count: AtomicU32,
    }

    impl DenyHook for CountingHook {
        fn on_denied(&self, _denial: &PolicyDenial) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn deny_hook_fires_on_denial_not_on_allow() {
        let hook = Arc::new(CountingHook {
            count: AtomicU32::new(0),
        });
        struct Forwarder(Arc<CountingHook>);
        impl DenyHook for Forwarder {
            fn on_denied(&self, denial: &PolicyDenial) {
                self.0.on_denied(denial);
            }
        }
        let engine =
            PolicyEngine::new(PolicyConfig::default()).with_deny_hook(Box::new(Forwarder(hook.clone())));

        engine.evaluate("ls", "default", false, 0);
        assert_eq!(hook.count.load(Ordering::SeqCst), 0);

        engine.evaluate("rm -rf /", "default", false, 0);
        assert_eq!(hook.count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn rate_limit_trips_after_max_actions_per_hour() {
        let policy = PolicyConfig {
            max_actions_per_hour: 2,
            ..PolicyConfig::default()
        };
        let engine = PolicyEngine::new(policy);
        assert!(matches!(engine.evaluate("ls", "default", false, 0), CommandDecision::Allowed(_)));
        assert!(matches!(engine.evaluate("ls", "default", false, 0), CommandDecision::Allowed(_)));
        match engine.evaluate("ls", "default", false, 0) {
            CommandDecision::Denied(denial) => {
                assert_eq!(denial.reason, crate::denial::DenialReason::RateLimited)
            }
            other => panic!("expected Denied, got {other:?}"),
        }
    }
}
