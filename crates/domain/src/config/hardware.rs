use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Pass-through config surface (§6)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// These fields only gate external collaborators (hardware probing,
// sandbox backend selection) that this core does not implement. They are
// still parsed and carried — a complete config surface is part of the
// ambient stack even when most of its effects are someone else's problem.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoctorProfile {
    /// Suppresses hardware readiness warnings.
    SoftwareOnly,
    Full,
}

impl Default for DoctorProfile {
    fn default() -> Self {
        Self::SoftwareOnly
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorConfig {
    #[serde(default)]
    pub profile: DoctorProfile,
}

impl Default for DoctorConfig {
    fn default() -> Self {
        Self {
            profile: DoctorProfile::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardwareTransport {
    None,
    Serial,
    Gpio,
}

impl Default for HardwareTransport {
    fn default() -> Self {
        Self::None
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub transport: HardwareTransport,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            transport: HardwareTransport::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeripheralsConfig {
    #[serde(default)]
    pub enabled: bool,
}

impl Default for PeripheralsConfig {
    fn default() -> Self {
        Self { enabled: false }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// `"auto"` selects the best available backend at the collaborator
    /// layer; any other value names a specific backend tag.
    #[serde(default = "d_backend")]
    pub backend: String,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            backend: d_backend(),
        }
    }
}

fn d_backend() -> String {
    "auto".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub sandbox: SandboxConfig,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            sandbox: SandboxConfig::default(),
        }
    }
}
