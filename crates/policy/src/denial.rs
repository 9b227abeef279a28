use serde::{Deserialize, Serialize};

use crate::risk::RiskLevel;

/// Why a command was denied. Carries enough structure for an audit log
/// without the caller re-parsing the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    ReadOnlyMode,
    OversizedCommand,
    SubshellExpansion,
    ProcessSubstitution,
    WindowsEnvExpansion,
    TeeBlocked,
    BackgroundChaining,
    OutputRedirection,
    CommandNotInAllowlist,
    DangerousArguments,
    EmptyCommand,
    HighRiskBlocked,
    ApprovalRequired,
    RateLimited,
}

/// A structured denial, suitable for audit logging and for the deny-hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDenial {
    pub reason: DenialReason,
    pub matched_rule: Option<String>,
    pub risk_level: Option<RiskLevel>,
}

impl PolicyDenial {
    pub fn new(reason: DenialReason) -> Self {
        Self {
            reason,
            matched_rule: None,
            risk_level: None,
        }
    }

    pub fn with_matched_rule(mut self, matched_rule: impl Into<String>) -> Self {
        self.matched_rule = Some(matched_rule.into());
        self
    }

    pub fn with_risk_level(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = Some(risk_level);
        self
    }
}
