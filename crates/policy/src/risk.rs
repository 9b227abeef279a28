use serde::{Deserialize, Serialize};

/// Risk classification of a command segment. Ordinal order matters —
/// callers take the max across segments in a chained command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

const HIGH_RISK_COMMANDS: &[&str] = &[
    "rm", "mkfs", "dd", "shutdown", "reboot", "halt", "poweroff", "sudo", "su", "chown", "chmod",
    "useradd", "userdel", "usermod", "passwd", "mount", "umount", "iptables", "ufw",
    "firewall-cmd", "curl", "wget", "nc", "ncat", "netcat", "scp", "ssh", "ftp", "telnet",
];

const HIGH_RISK_SUBSTRINGS: &[&str] = &["rm -rf /", "rm -fr /", ":(){:|:&};:"];

const GIT_MEDIUM_VERBS: &[&str] = &[
    "commit",
    "push",
    "reset",
    "clean",
    "rebase",
    "merge",
    "cherry-pick",
    "revert",
    "branch",
    "checkout",
    "switch",
    "tag",
];

const NPM_MEDIUM_VERBS: &[&str] = &["install", "add", "remove", "uninstall", "update", "publish"];
const CARGO_MEDIUM_VERBS: &[&str] = &["add", "remove", "install", "clean", "publish"];
const ALWAYS_MEDIUM_COMMANDS: &[&str] = &["touch", "mkdir", "mv", "cp", "ln"];

/// Classify a single segment given its extracted basename and the full
/// segment text (needed to find the verb following `git`/`npm`/`cargo`).
pub fn classify_segment(basename: &str, segment: &str) -> RiskLevel {
    if HIGH_RISK_SUBSTRINGS.iter().any(|s| segment.contains(s)) {
        return RiskLevel::High;
    }
    if HIGH_RISK_COMMANDS.contains(&basename) {
        return RiskLevel::High;
    }

    let mut tokens = segment.split_whitespace();
    let _cmd = tokens.next();
    let verb = tokens.next().unwrap_or("");

    match basename {
        "git" if GIT_MEDIUM_VERBS.contains(&verb) => RiskLevel::Medium,
        "npm" | "pnpm" | "yarn" if NPM_MEDIUM_VERBS.contains(&verb) => RiskLevel::Medium,
        "cargo" if CARGO_MEDIUM_VERBS.contains(&verb) => RiskLevel::Medium,
        _ if ALWAYS_MEDIUM_COMMANDS.contains(&basename) => RiskLevel::Medium,
        _ => RiskLevel::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rm_is_always_high() {
        assert_eq!(classify_segment("rm", "rm file.txt"), RiskLevel::High);
    }

    #[test]
    fn fork_bomb_literal_is_high() {
        assert_eq!(classify_segment("bash", ":(){:|:&};:"), RiskLevel::High);
    }

    #[test]
    fn rm_rf_root_is_high_even_without_basename_match() {
        assert_eq!(classify_segment("sudo", "sudo rm -rf /"), RiskLevel::High);
    }

    #[test]
    fn git_commit_is_medium() {
        assert_eq!(classify_segment("git", "git commit -m x"), RiskLevel::Medium);
    }

    #[test]
    fn git_status_is_low() {
        assert_eq!(classify_segment("git", "git status"), RiskLevel::Low);
    }

    #[test]
    fn touch_is_always_medium() {
        assert_eq!(classify_segment("touch", "touch x.txt"), RiskLevel::Medium);
    }

    #[test]
    fn ls_is_low() {
        assert_eq!(classify_segment("ls", "ls -la"), RiskLevel::Low);
    }

    #[test]
    fn ordinal_order() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
    }
}
