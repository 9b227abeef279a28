use serde::{Deserialize, Serialize};

/// Decay/relevance tuning for typed memory records. Defaults match the
/// core specification's constants exactly; they are exposed as config so
/// operators can retune half-lives without a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default)]
    pub decay: DecayConfig,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            decay: DecayConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecayConfig {
    #[serde(default = "d_semantic_half_life")]
    pub semantic_half_life_hours: f64,
    #[serde(default = "d_episodic_half_life")]
    pub episodic_half_life_hours: f64,
    #[serde(default = "d_procedural_half_life")]
    pub procedural_half_life_hours: f64,
    #[serde(default = "d_standard_multiplier")]
    pub standard_tier_multiplier: f64,
    #[serde(default = "d_ephemeral_multiplier")]
    pub ephemeral_tier_multiplier: f64,
    /// Confidence floor that decay asymptotically approaches.
    #[serde(default)]
    pub floor: f64,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            semantic_half_life_hours: d_semantic_half_life(),
            episodic_half_life_hours: d_episodic_half_life(),
            procedural_half_life_hours: d_procedural_half_life(),
            standard_tier_multiplier: d_standard_multiplier(),
            ephemeral_tier_multiplier: d_ephemeral_multiplier(),
            floor: 0.0,
        }
    }
}

fn d_semantic_half_life() -> f64 {
    720.0
}
fn d_episodic_half_life() -> f64 {
    48.0
}
fn d_procedural_half_life() -> f64 {
    168.0
}
fn d_standard_multiplier() -> f64 {
    1.0
}
fn d_ephemeral_multiplier() -> f64 {
    0.25
}
