//! Cross-cutting id and time newtypes shared by the sync, timeline, and
//! orchestrator crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A peer/node identifier. Must be 1..=64 bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(String);

/// Reason a [`NodeId`] failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeIdError {
    Empty,
    TooLong,
}

impl fmt::Display for NodeIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "node id must not be empty"),
            Self::TooLong => write!(f, "node id must not exceed 64 bytes"),
        }
    }
}

impl NodeId {
    pub const MAX_LEN: usize = 64;

    pub fn new(raw: impl Into<String>) -> Result<Self, NodeIdError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(NodeIdError::Empty);
        }
        if raw.len() > Self::MAX_LEN {
            return Err(NodeIdError::TooLong);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A monotonically increasing sequence number scoped to a single source node.
pub type SequenceNum = u64;

/// Milliseconds since the Unix epoch. Informational only — never used for
/// causal ordering (sequence numbers are).
pub type TimestampMs = i64;

/// Nanosecond timestamp used by the timeline store.
pub type TimestampNs = i128;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty() {
        assert_eq!(NodeId::new("").unwrap_err(), NodeIdError::Empty);
    }

    #[test]
    fn rejects_too_long() {
        let raw = "a".repeat(65);
        assert_eq!(NodeId::new(raw).unwrap_err(), NodeIdError::TooLong);
    }

    #[test]
    fn accepts_boundary_lengths() {
        assert!(NodeId::new("a").is_ok());
        assert!(NodeId::new("a".repeat(64)).is_ok());
    }

    #[test]
    fn ord_is_lexicographic() {
        let huginn = NodeId::new("huginn").unwrap();
        let muninn = NodeId::new("muninn").unwrap();
        assert!(huginn < muninn);
    }
}
