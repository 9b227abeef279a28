//! Typed memory records, decay/relevance scoring, and recall ranking.

pub mod decay;
pub mod rank;
pub mod record;

pub use decay::{combined_relevance, default_half_life, effective_confidence, recency_score, tier_multiplier};
pub use rank::RecallRanker;
pub use record::{MemoryKind, MemoryTier, SourceMeta, TypedMemoryRecord};
