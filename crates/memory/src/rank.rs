use nc_domain::config::memory::DecayConfig;

use crate::decay::{combined_relevance, default_half_life, effective_confidence, recency_score, tier_multiplier};
use crate::record::TypedMemoryRecord;

/// Scores and orders memory records by combined relevance. A pure
/// transform over a slice — it never mutates the records it ranks.
pub struct RecallRanker {
    config: DecayConfig,
    alpha: f64,
}

impl RecallRanker {
    pub fn new(config: DecayConfig, alpha: f64) -> Self {
        Self {
            config,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    fn elapsed_hours(record: &TypedMemoryRecord, now_ms: i64) -> f64 {
        let reference_ms = record.last_accessed.unwrap_or(record.created_at);
        (now_ms - reference_ms) as f64 / 3_600_000.0
    }

    pub fn score(&self, record: &TypedMemoryRecord, now_ms: i64) -> f64 {
        let elapsed_h = Self::elapsed_hours(record, now_ms);
        let decayed = effective_confidence(
            record.kind,
            record.tier,
            record.initial_confidence(),
            elapsed_h,
            &self.config,
        );
        let half_life = default_half_life(record.kind, &self.config) * tier_multiplier(record.tier, &self.config);
        let recency = recency_score(elapsed_h, half_life);
        combined_relevance(decayed, recency, self.alpha)
    }

    /// Return a new, relevance-sorted copy of `records` (highest first).
    pub fn rank(&self, records: &[TypedMemoryRecord], now_ms: i64) -> Vec<TypedMemoryRecord> {
        let mut scored: Vec<(f64, &TypedMemoryRecord)> =
            records.iter().map(|r| (self.score(r, now_ms), r)).collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().map(|(_, r)| r.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{MemoryKind, MemoryTier, SourceMeta};

    fn record(id: &str, kind: MemoryKind, tier: MemoryTier, confidence: f64, created_at: i64) -> TypedMemoryRecord {
        TypedMemoryRecord {
            id: id.into(),
            key: id.into(),
            content: "content".into(),
            kind,
            tier,
            source: SourceMeta {
                origin: "test".into(),
                context_id: None,
                tool_tag: None,
            },
            confidence: Some(confidence),
            created_at,
            last_accessed: None,
        }
    }

    #[test]
    fn ranks_fresher_record_above_stale_one() {
        let ranker = RecallRanker::new(DecayConfig::default(), 0.5);
        let now_ms = 10 * 3_600_000;
        let fresh = record("fresh", MemoryKind::Episodic, MemoryTier::Standard, 0.9, now_ms - 3_600_000);
        let stale = record("stale", MemoryKind::Episodic, MemoryTier::Standard, 0.9, 0);
        let ranked = ranker.rank(&[stale, fresh], now_ms);
        assert_eq!(ranked[0].id, "fresh");
    }

    #[test]
    fn pinned_record_outranks_decayed_peer_over_long_horizon() {
        let ranker = RecallRanker::new(DecayConfig::default(), 0.8);
        let now_ms = 10_000 * 3_600_000;
        let pinned = record("pinned", MemoryKind::Semantic, MemoryTier::Pinned, 0.6, 0);
        let standard = record("standard", MemoryKind::Semantic, MemoryTier::Standard, 0.6, 0);
        let ranked = ranker.rank(&[standard, pinned], now_ms);
        assert_eq!(ranked[0].id, "pinned");
    }

    #[test]
    fn rank_preserves_record_count() {
        let ranker = RecallRanker::new(DecayConfig::default(), 0.5);
        let records = vec![
            record("a", MemoryKind::Semantic, MemoryTier::Standard, 0.5, 0),
            record("b", MemoryKind::Episodic, MemoryTier::Ephemeral, 0.5, 0),
            record("c", MemoryKind::Procedural, MemoryTier::Pinned, 0.5, 0),
        ];
        assert_eq!(ranker.rank(&records, 3_600_000).len(), 3);
    }
}
