use serde::{Deserialize, Serialize};

/// Visibility scope for a stored secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SecretScope {
    Global,
    Session,
    Workspace { qualifier: String },
    /// Group resolution is deferred to an external collaborator; the
    /// policy layer always treats this scope as not-visible (§9 OQ2).
    Group { qualifier: String },
}

impl SecretScope {
    /// Whether a secret in this scope is visible from workspace `workspace`.
    pub fn visible_in(&self, workspace: &str) -> bool {
        match self {
            Self::Global | Self::Session => true,
            Self::Workspace { qualifier } => qualifier == workspace,
            Self::Group { .. } => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretScopeConfig {
    #[serde(default)]
    pub default_scope: DefaultSecretScope,
}

impl Default for SecretScopeConfig {
    fn default() -> Self {
        Self {
            default_scope: DefaultSecretScope::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultSecretScope {
    Global,
    Session,
}

impl Default for DefaultSecretScope {
    fn default() -> Self {
        Self::Session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_always_visible() {
        assert!(SecretScope::Global.visible_in("w1"));
        assert!(SecretScope::Global.visible_in("anything"));
    }

    #[test]
    fn session_always_visible() {
        assert!(SecretScope::Session.visible_in("w1"));
    }

    #[test]
    fn workspace_requires_matching_qualifier() {
        let scope = SecretScope::Workspace {
            qualifier: "w1".into(),
        };
        assert!(scope.visible_in("w1"));
        assert!(!scope.visible_in("w2"));
    }

    #[test]
    fn group_is_never_visible_at_this_layer() {
        let scope = SecretScope::Group {
            qualifier: "admins".into(),
        };
        assert!(!scope.visible_in("w1"));
        assert!(!scope.visible_in("admins"));
    }
}
