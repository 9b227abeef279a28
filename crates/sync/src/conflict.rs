use serde::{Deserialize, Serialize};

/// Which rule in the precedence chain made the call — recorded on every
/// outcome so callers can audit why a side won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictRule {
    LastConfirmedWins,
    HighestConfidence,
    LastWriterWins,
    SourcePriority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Local,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictResolution {
    pub winner: Winner,
    pub rule: ConflictRule,
}

/// One side of a conflicting delta for the same `record_id`.
#[derive(Debug, Clone)]
pub struct ConflictSide {
    pub source_node: String,
    pub last_confirmed_at: Option<i64>,
    pub confidence: Option<f64>,
    pub updated_at: i64,
}

/// Full deterministic precedence chain: `last_confirmed_wins` →
/// `highest_confidence` → `last_writer_wins` → `source_priority`. Applied
/// independently on each side, so both sides reach the same verdict
/// without coordination.
pub fn resolve(local: &ConflictSide, remote: &ConflictSide) -> ConflictResolution {
    if let (Some(l), Some(r)) = (local.last_confirmed_at, remote.last_confirmed_at) {
        if l != r {
            return ConflictResolution {
                winner: if l > r { Winner::Local } else { Winner::Remote },
                rule: ConflictRule::LastConfirmedWins,
            };
        }
    }
    if let (Some(l), Some(r)) = (local.confidence, remote.confidence) {
        if l != r {
            return ConflictResolution {
                winner: if l > r { Winner::Local } else { Winner::Remote },
                rule: ConflictRule::HighestConfidence,
            };
        }
    }
    if local.updated_at != remote.updated_at {
        return ConflictResolution {
            winner: if local.updated_at > remote.updated_at {
                Winner::Local
            } else {
                Winner::Remote
            },
            rule: ConflictRule::LastWriterWins,
        };
    }
    source_priority(local, remote)
}

/// Single-rule variant: decide purely on the named criterion, falling
/// back to `source_priority` only to break a tie within that criterion.
pub fn resolve_with_rule(local: &ConflictSide, remote: &ConflictSide, rule: ConflictRule) -> ConflictResolution {
    match rule {
        ConflictRule::LastConfirmedWins => match (local.last_confirmed_at, remote.last_confirmed_at) {
            (Some(l), Some(r)) if l != r => ConflictResolution {
                winner: if l > r { Winner::Local } else { Winner::Remote },
                rule,
            },
            _ => source_priority(local, remote),
        },
        ConflictRule::HighestConfidence => match (local.confidence, remote.confidence) {
            (Some(l), Some(r)) if l != r => ConflictResolution {
                winner: if l > r { Winner::Local } else { Winner::Remote },
                rule,
            },
            _ => source_priority(local, remote),
        },
        ConflictRule::LastWriterWins => {
            if local.updated_at != remote.updated_at {
                ConflictResolution {
                    winner: if local.updated_at > remote.updated_at {
                        Winner::Local
                    } else {
                        Winner::Remote
                    },
                    rule,
                }
            } else {
                source_priority(local, remote)
            }
        }
        ConflictRule::SourcePriority => source_priority(local, remote),
    }
}

/// Lexicographically smaller `source_node` wins; identical ids default
/// to local.
fn source_priority(local: &ConflictSide, remote: &ConflictSide) -> ConflictResolution {
    let winner = if local.source_node == remote.source_node {
        Winner::Local
    } else if local.source_node < remote.source_node {
        Winner::Local
    } else {
        Winner::Remote
    };
    ConflictResolution {
        winner,
        rule: ConflictRule::SourcePriority,
    }
}
