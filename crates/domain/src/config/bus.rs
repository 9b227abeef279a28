use serde::{Deserialize, Serialize};

/// Outbound channel dispatch bus configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    /// Bounded capacity of the outbound queue. `0` means unbounded.
    #[serde(default = "d_capacity")]
    pub capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            capacity: d_capacity(),
        }
    }
}

fn d_capacity() -> usize {
    1024
}
