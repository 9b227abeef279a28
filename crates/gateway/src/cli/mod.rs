pub mod config;
pub mod doctor;

use clap::{Parser, Subcommand};

/// nullclaw — a local-first autonomous agent runtime core.
#[derive(Debug, Parser)]
#[command(name = "nullclaw", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Wire the runtime and stay resident (default when no subcommand is given).
    Run,
    /// Run diagnostic checks against the current configuration.
    Doctor,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path named by `NULLCLAW_CONFIG` (or
/// `config.toml` by default). Returns the parsed [`nc_domain::config::Config`]
/// and the path that was used.
///
/// Shared by `run`, `doctor`, and `config` so the logic lives in one place.
pub fn load_config() -> anyhow::Result<(nc_domain::config::Config, String)> {
    let config_path = std::env::var("NULLCLAW_CONFIG").unwrap_or_else(|_| "config.toml".into());

    let config = if std::path::Path::new(&config_path).exists() {
        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
        toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))?
    } else {
        nc_domain::config::Config::default()
    };

    Ok((config, config_path))
}
