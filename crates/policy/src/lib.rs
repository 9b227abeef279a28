//! Security policy engine: command allowlisting, risk classification,
//! approval gating, rate limiting, and workspace-scoped overrides.

pub mod command;
pub mod denial;
pub mod engine;
pub mod rate;
pub mod risk;

pub use command::{check_command, check_command_execution, command_risk_level, CommandDecision};
pub use denial::{DenialReason, PolicyDenial};
pub use engine::{effective_policy, DenyHook, PolicyEngine};
pub use rate::RateTracker;
pub use risk::RiskLevel;
