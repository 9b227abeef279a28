use regex::Regex;

use nc_domain::config::policy::PolicyConfig;

use crate::denial::{DenialReason, PolicyDenial};
use crate::rate::RateTracker;
use crate::risk::{classify_segment, RiskLevel};

/// Commands longer than this are rejected outright, never truncated or
/// partially analyzed. A classic "append junk, then sneak `&& rm -rf /`"
/// bypass depends on partial analysis; this removes that option.
pub const MAX_ANALYSIS_LEN: usize = 16384;

/// Outcome of evaluating a command against a policy.
#[derive(Debug, Clone)]
pub enum CommandDecision {
    Allowed(RiskLevel),
    Denied(PolicyDenial),
}

struct ParsedSegment {
    basename: String,
    body: String,
}

/// Structural/allowlist check and risk classification only (steps 1–2 of
/// the execution pipeline). Does not apply autonomy, approval, or rate
/// gating — see [`check_command_execution`] for the full pipeline.
pub fn check_command(command: &str, policy: &PolicyConfig) -> CommandDecision {
    if command.len() > MAX_ANALYSIS_LEN {
        return CommandDecision::Denied(
            PolicyDenial::new(DenialReason::OversizedCommand).with_risk_level(RiskLevel::High),
        );
    }

    if let Some(denial) = check_subshell_expansion(command) {
        return CommandDecision::Denied(denial);
    }
    if let Some(denial) = check_process_substitution(command) {
        return CommandDecision::Denied(denial);
    }
    if let Some(denial) = check_windows_env_expansion(command) {
        return CommandDecision::Denied(denial);
    }

    let segments = match parse_segments(command, policy) {
        Ok(segments) => segments,
        Err(denial) => return CommandDecision::Denied(denial),
    };

    let risk = segments
        .iter()
        .map(|seg| classify_segment(&seg.basename, &seg.body))
        .max()
        .unwrap_or(RiskLevel::Low);

    CommandDecision::Allowed(risk)
}

/// Standalone risk query used by the oversized-command invariant: an
/// oversized command is `high` risk even though it will be denied before
/// any execution is attempted.
pub fn command_risk_level(command: &str) -> RiskLevel {
    if command.len() > MAX_ANALYSIS_LEN {
        return RiskLevel::High;
    }
    split_into_segments(command)
        .iter()
        .filter_map(|raw| {
            let stripped = strip_env_assignments(raw);
            first_token(stripped).map(|tok| classify_segment(basename_of(tok), stripped))
        })
        .max()
        .unwrap_or(RiskLevel::Low)
}

/// Full execution pipeline (`check_command_execution`): structural check,
/// risk classification, then autonomy/approval/rate gating.
pub fn check_command_execution(
    command: &str,
    policy: &PolicyConfig,
    approved: bool,
    rate_tracker: Option<&RateTracker>,
    now_hour_bucket: i64,
) -> CommandDecision {
    use nc_domain::config::policy::Autonomy;

    if policy.autonomy == Autonomy::ReadOnly {
        return CommandDecision::Denied(PolicyDenial::new(DenialReason::ReadOnlyMode));
    }

    let risk = match check_command(command, policy) {
        CommandDecision::Denied(denial) => return CommandDecision::Denied(denial),
        CommandDecision::Allowed(risk) => risk,
    };

    if risk == RiskLevel::High {
        if policy.block_high_risk_commands {
            return CommandDecision::Denied(
                PolicyDenial::new(DenialReason::HighRiskBlocked).with_risk_level(risk),
            );
        }
        if policy.autonomy == Autonomy::Supervised && !approved {
            return CommandDecision::Denied(
                PolicyDenial::new(DenialReason::ApprovalRequired).with_risk_level(risk),
            );
        }
    }

    if risk == RiskLevel::Medium
        && policy.autonomy == Autonomy::Supervised
        && policy.require_approval_for_medium_risk
        && !approved
    {
        return CommandDecision::Denied(
            PolicyDenial::new(DenialReason::ApprovalRequired).with_risk_level(risk),
        );
    }

    if let Some(tracker) = rate_tracker {
        if tracker.record_and_check("default", policy.max_actions_per_hour, now_hour_bucket) {
            return CommandDecision::Denied(
                PolicyDenial::new(DenialReason::RateLimited).with_risk_level(risk),
            );
        }
    }

    CommandDecision::Allowed(risk)
}

fn check_subshell_expansion(command: &str) -> Option<PolicyDenial> {
    if command.contains('`') || command.contains("$(") || command.contains("${") {
        return Some(PolicyDenial::new(DenialReason::SubshellExpansion));
    }
    None
}

fn check_process_substitution(command: &str) -> Option<PolicyDenial> {
    if command.contains("<(") || command.contains(">(") {
        return Some(PolicyDenial::new(DenialReason::ProcessSubstitution));
    }
    None
}

fn check_windows_env_expansion(command: &str) -> Option<PolicyDenial> {
    if std::env::consts::OS != "windows" {
        return None;
    }
    let pattern = Regex::new(r"%[A-Za-z_][A-Za-z0-9_]*%").expect("static pattern");
    if pattern.is_match(command) {
        return Some(PolicyDenial::new(DenialReason::WindowsEnvExpansion));
    }
    None
}

fn parse_segments(command: &str, policy: &PolicyConfig) -> Result<Vec<ParsedSegment>, PolicyDenial> {
    let mut parsed = Vec::new();
    for raw in split_into_segments(command) {
        let stripped = strip_env_assignments(&raw);
        if stripped.trim().is_empty() {
            continue;
        }
        if contains_tee(stripped) {
            return Err(PolicyDenial::new(DenialReason::TeeBlocked).with_matched_rule(stripped));
        }
        if contains_lone_ampersand(&raw) {
            return Err(PolicyDenial::new(DenialReason::BackgroundChaining));
        }
        if stripped.contains('>') {
            return Err(PolicyDenial::new(DenialReason::OutputRedirection));
        }
        let Some(token) = first_token(stripped) else {
            continue;
        };
        let basename = basename_of(token).to_string();
        if !policy.allowed_commands.iter().any(|c| c == &basename) {
            return Err(
                PolicyDenial::new(DenialReason::CommandNotInAllowlist).with_matched_rule(basename)
            );
        }
        if has_dangerous_arguments(&basename, stripped) {
            return Err(PolicyDenial::new(DenialReason::DangerousArguments));
        }
        parsed.push(ParsedSegment {
            basename,
            body: stripped.to_string(),
        });
    }
    if parsed.is_empty() {
        return Err(PolicyDenial::new(DenialReason::EmptyCommand));
    }
    Ok(parsed)
}

fn split_into_segments(command: &str) -> Vec<String> {
    let mut buf = command.to_string();
    for sep in ["&&", "||", "\n", ";", "|"] {
        buf = buf.replace(sep, "\0");
    }
    buf.split('\0').map(str::trim).map(String::from).collect()
}

fn contains_lone_ampersand(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'&' {
            if bytes.get(i + 1) == Some(&b'&') {
                i += 2;
                continue;
            }
            return true;
        }
        i += 1;
    }
    false
}

/// Strip leading `VAR=value` assignments (letter/underscore start).
fn strip_env_assignments(segment: &str) -> &str {
    let mut rest = segment.trim_start();
    loop {
        let Some(token_end) = rest.find(char::is_whitespace) else {
            if is_env_assignment(rest) {
                return "";
            }
            return rest;
        };
        let (token, remainder) = rest.split_at(token_end);
        if is_env_assignment(token) {
            rest = remainder.trim_start();
        } else {
            return rest;
        }
    }
}

fn is_env_assignment(token: &str) -> bool {
    let Some(eq_idx) = token.find('=') else {
        return false;
    };
    let name = &token[..eq_idx];
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    !name.is_empty() && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn first_token(segment: &str) -> Option<&str> {
    segment.split_whitespace().next()
}

fn basename_of(token: &str) -> &str {
    token.rsplit('/').next().unwrap_or(token)
}

fn contains_tee(segment: &str) -> bool {
    segment
        .split_whitespace()
        .any(|word| word == "tee" || basename_of(word) == "tee")
}

fn has_dangerous_arguments(basename: &str, segment: &str) -> bool {
    match basename {
        "find" => segment.contains("-exec") || segment.contains("-ok"),
        "git" => segment.contains("config") || segment.contains("alias") || segment.contains("-c"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PolicyConfig {
        PolicyConfig::default()
    }

    #[test]
    fn pipe_chain_of_allowed_commands_is_allowed_low_risk() {
        match check_command("ls | grep foo", &policy()) {
            CommandDecision::Allowed(RiskLevel::Low) => {}
            other => panic!("expected Allowed(Low), got {other:?}"),
        }
    }

    #[test]
    fn rm_rf_root_is_high_risk() {
        match check_command("rm -rf /", &policy()) {
            CommandDecision::Allowed(RiskLevel::High) => {}
            other => panic!("expected Allowed(High), got {other:?}"),
        }
    }

    #[test]
    fn oversized_command_is_denied_and_never_partially_analyzed() {
        let n = MAX_ANALYSIS_LEN - 3 + 1;
        let command = format!("ls {}{}", "A".repeat(n), " && rm -rf /");
        match check_command(&command, &policy()) {
            CommandDecision::Denied(denial) => {
                assert_eq!(denial.reason, DenialReason::OversizedCommand);
                assert_eq!(denial.risk_level, Some(RiskLevel::High));
            }
            other => panic!("expected Denied, got {other:?}"),
        }
        assert_eq!(command_risk_level(&command), RiskLevel::High);
    }

    #[test]
    fn subshell_expansion_is_denied() {
        match check_command("echo $(whoami)", &policy()) {
            CommandDecision::Denied(denial) => {
                assert_eq!(denial.reason, DenialReason::SubshellExpansion)
            }
            other => panic!("expected Denied, got {other:?}"),
        }
    }

    #[test]
    fn process_substitution_is_denied() {
        match check_command("diff <(ls) <(ls)", &policy()) {
            CommandDecision::Denied(denial) => {
                assert_eq!(denial.reason, DenialReason::ProcessSubstitution)
            }
            other => panic!("expected Denied, got {other:?}"),
        }
    }

    #[test]
    fn tee_as_bare_word_is_blocked() {
        match check_command("echo hi | tee out.txt", &policy()) {
            CommandDecision::Denied(denial) => assert_eq!(denial.reason, DenialReason::TeeBlocked),
            other => panic!("expected Denied, got {other:?}"),
        }
    }

    #[test]
    fn tee_with_path_prefix_is_blocked() {
        match check_command("echo hi | /usr/bin/tee out.txt", &policy()) {
            CommandDecision::Denied(denial) => assert_eq!(denial.reason, DenialReason::TeeBlocked),
            other => panic!("expected Denied, got {other:?}"),
        }
    }

    #[test]
    fn lone_ampersand_is_background_chaining() {
        match check_command("ls &", &policy()) {
            CommandDecision::Denied(denial) => {
                assert_eq!(denial.reason, DenialReason::BackgroundChaining)
            }
            other => panic!("expected Denied, got {other:?}"),
        }
    }

    #[test]
    fn double_ampersand_is_not_background_chaining() {
        match check_command("ls && pwd", &policy()) {
            CommandDecision::Allowed(_) => {}
            other => panic!("expected Allowed, got {other:?}"),
        }
    }

    #[test]
    fn output_redirection_is_denied() {
        match check_command("ls > out.txt", &policy()) {
            CommandDecision::Denied(denial) => {
                assert_eq!(denial.reason, DenialReason::OutputRedirection)
            }
            other => panic!("expected Denied, got {other:?}"),
        }
    }

    #[test]
    fn command_not_in_allowlist_is_denied() {
        match check_command("emacs file.txt", &policy()) {
            CommandDecision::Denied(denial) => {
                assert_eq!(denial.reason, DenialReason::CommandNotInAllowlist)
            }
            other => panic!("expected Denied, got {other:?}"),
        }
    }

    #[test]
    fn find_exec_is_dangerous_arguments() {
        match check_command("find . -exec rm {} \\;", &policy()) {
            CommandDecision::Denied(denial) => {
                assert_eq!(denial.reason, DenialReason::DangerousArguments)
            }
            other => panic!("expected Denied, got {other:?}"),
        }
    }

    #[test]
    fn git_dash_c_is_dangerous_arguments() {
        match check_command("git -c color.ui=false status", &policy()) {
            CommandDecision::Denied(denial) => {
                assert_eq!(denial.reason, DenialReason::DangerousArguments)
            }
            other => panic!("expected Denied, got {other:?}"),
        }
    }

    #[test]
    fn env_only_segment_with_no_other_segment_is_empty_command() {
        match check_command("FOO=bar", &policy()) {
            CommandDecision::Denied(denial) => assert_eq!(denial.reason, DenialReason::EmptyCommand),
            other => panic!("expected Denied, got {other:?}"),
        }
    }

    #[test]
    fn leading_env_assignment_is_stripped_before_allowlist_check() {
        match check_command("FOO=bar ls", &policy()) {
            CommandDecision::Allowed(_) => {}
            other => panic!("expected Allowed, got {other:?}"),
        }
    }

    #[test]
    fn denial_determinism() {
        let command = "rm -rf /";
        let first = check_command(command, &policy());
        let second = check_command(command, &policy());
        assert_eq!(format!("{first:?}"), format!("{second:?}"));
    }

    #[test]
    fn allowlist_symmetry_no_structural_denial_for_bare_allowed_commands() {
        for cmd in nc_domain::config::policy::default_allowed_commands() {
            match check_command(&cmd, &policy()) {
                CommandDecision::Allowed(_) => {}
                CommandDecision::Denied(denial) => {
                    assert_ne!(
                        denial.reason,
                        DenialReason::CommandNotInAllowlist,
                        "{cmd} should not be denied as not-in-allowlist"
                    );
                }
            }
        }
    }

    #[test]
    fn execution_pipeline_high_risk_blocked_by_default() {
        let decision =
            check_command_execution("rm -rf /", &policy(), false, None, 0);
        match decision {
            CommandDecision::Denied(denial) => {
                assert_eq!(denial.reason, DenialReason::HighRiskBlocked)
            }
            other => panic!("expected Denied, got {other:?}"),
        }
    }

    #[test]
    fn execution_pipeline_medium_risk_requires_approval() {
        let decision = check_command_execution("touch x.txt", &policy(), false, None, 0);
        match decision {
            CommandDecision::Denied(denial) => {
                assert_eq!(denial.reason, DenialReason::ApprovalRequired);
                assert_eq!(denial.risk_level, Some(RiskLevel::Medium));
            }
            other => panic!("expected Denied, got {other:?}"),
        }

        let decision = check_command_execution("touch x.txt", &policy(), true, None, 0);
        match decision {
            CommandDecision::Allowed(RiskLevel::Medium) => {}
            other => panic!("expected Allowed(Medium), got {other:?}"),
        }
    }

    #[test]
    fn read_only_autonomy_denies_everything() {
        let mut p = policy();
        p.autonomy = nc_domain::config::policy::Autonomy::ReadOnly;
        let decision = check_command_execution("ls", &p, true, None, 0);
        match decision {
            CommandDecision::Denied(denial) => {
                assert_eq!(denial.reason, DenialReason::ReadOnlyMode)
            }
            other => panic!("expected Denied, got {other:?}"),
        }
    }
}
