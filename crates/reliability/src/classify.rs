/// Keywords that mark a tool-level failure (`ToolResult { success: false, .. }`)
/// as worth retrying. Matched case-insensitively against the tool's own
/// error message.
const TOOL_RETRYABLE_KEYWORDS: &[&str] = &["timeout", "transient", "temporary", "retry", "connection"];

/// Keywords that mark an infrastructure-level error (the outer `Result::Err`
/// from `Tool::execute`, not a tool-reported failure) as a transient
/// network condition worth retrying.
const INFRA_RETRYABLE_KEYWORDS: &[&str] = &[
    "refused",
    "reset",
    "timed out",
    "broken pipe",
    "network unreachable",
    "host unreachable",
];

/// Is a tool-reported failure message retryable?
pub fn is_retryable_tool_error(message: Option<&str>) -> bool {
    let Some(message) = message else { return false };
    let lower = message.to_lowercase();
    TOOL_RETRYABLE_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Is an infrastructure-level error message a transient network condition?
pub fn is_transient(message: &str) -> bool {
    let lower = message.to_lowercase();
    INFRA_RETRYABLE_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_error_keyword_match_is_case_insensitive() {
        assert!(is_retryable_tool_error(Some("Connection reset by peer")));
        assert!(is_retryable_tool_error(Some("TEMPORARY failure")));
    }

    #[test]
    fn tool_error_without_keyword_is_not_retryable() {
        assert!(!is_retryable_tool_error(Some("permission denied")));
    }

    #[test]
    fn tool_error_none_is_not_retryable() {
        assert!(!is_retryable_tool_error(None));
    }

    #[test]
    fn infra_error_matches_transient_network_class() {
        assert!(is_transient("Connection refused"));
        assert!(is_transient("read: broken pipe"));
        assert!(is_transient("dial tcp: i/o timeout: timed out"));
    }

    #[test]
    fn infra_error_without_keyword_is_not_transient() {
        assert!(!is_transient("invalid argument"));
    }
}
