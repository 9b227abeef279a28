use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Gateway
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Top-level process binding. `host` defaults to loopback per the
/// configuration surface — the core never listens on a socket itself, but
/// carries the option for the HTTP/channel front ends that wrap it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "d_host")]
    pub host: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self { host: d_host() }
    }
}

fn d_host() -> String {
    "127.0.0.1".into()
}
