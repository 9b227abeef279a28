use nc_domain::config::memory::DecayConfig;

use crate::record::{MemoryKind, MemoryTier};

/// Half-life, in hours, before tier multiplier is applied.
pub fn default_half_life(kind: MemoryKind, config: &DecayConfig) -> f64 {
    match kind {
        MemoryKind::Semantic => config.semantic_half_life_hours,
        MemoryKind::Episodic => config.episodic_half_life_hours,
        MemoryKind::Procedural => config.procedural_half_life_hours,
    }
}

/// Pinned is `+∞` — it never decays regardless of configuration.
pub fn tier_multiplier(tier: MemoryTier, config: &DecayConfig) -> f64 {
    match tier {
        MemoryTier::Pinned => f64::INFINITY,
        MemoryTier::Standard => config.standard_tier_multiplier,
        MemoryTier::Ephemeral => config.ephemeral_tier_multiplier,
    }
}

/// `0.5^(elapsed/half_life)`, clamped to `[0,1]`. `elapsed <= 0` returns
/// `1.0`; `half_life <= 0` returns `0.0`; an infinite half-life divides
/// any finite elapsed down to a ratio of `0.0`, yielding `1.0`.
fn decay_factor(elapsed_h: f64, half_life_h: f64) -> f64 {
    if elapsed_h <= 0.0 {
        return 1.0;
    }
    if half_life_h <= 0.0 {
        return 0.0;
    }
    (0.5f64).powf(elapsed_h / half_life_h).clamp(0.0, 1.0)
}

pub fn recency_score(elapsed_h: f64, half_life_h: f64) -> f64 {
    decay_factor(elapsed_h, half_life_h)
}

/// `floor + (initial - floor) * decay_factor`, clamped to `[0,1]`.
/// Composes `default_half_life(kind) * tier_multiplier(tier)` as the
/// effective half-life.
pub fn effective_confidence(
    kind: MemoryKind,
    tier: MemoryTier,
    initial: f64,
    elapsed_h: f64,
    config: &DecayConfig,
) -> f64 {
    let initial = initial.clamp(0.0, 1.0);
    if elapsed_h <= 0.0 {
        return initial;
    }
    let half_life = default_half_life(kind, config) * tier_multiplier(tier, config);
    let factor = decay_factor(elapsed_h, half_life);
    (config.floor + (initial - config.floor) * factor).clamp(0.0, 1.0)
}

/// `alpha * decayed + (1 - alpha) * recency`, clamped to `[0,1]`.
pub fn combined_relevance(decayed: f64, recency: f64, alpha: f64) -> f64 {
    let alpha = alpha.clamp(0.0, 1.0);
    (alpha * decayed + (1.0 - alpha) * recency).clamp(0.0, 1.0)
}
