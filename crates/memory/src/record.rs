use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    Semantic,
    Episodic,
    Procedural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryTier {
    Pinned,
    Standard,
    Ephemeral,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMeta {
    pub origin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_tag: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypedMemoryRecord {
    pub id: String,
    pub key: String,
    pub content: String,
    pub kind: MemoryKind,
    pub tier: MemoryTier,
    pub source: SourceMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<i64>,
}

impl TypedMemoryRecord {
    /// `confidence` defaults to `1.0` when unset — the decay formula's
    /// `initial` parameter.
    pub fn initial_confidence(&self) -> f64 {
        self.confidence.unwrap_or(1.0)
    }
}
