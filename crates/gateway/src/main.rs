mod bootstrap;
mod cli;

use nc_domain::config::{Config, ConfigSeverity};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, ConfigCommand};

fn main() -> anyhow::Result<()> {
    use clap::Parser;
    let args = Cli::parse();

    match args.command {
        None | Some(Command::Run) => {
            init_tracing();
            let (config, _config_path) = cli::load_config()?;
            run(&config)
        }
        Some(Command::Doctor) => {
            let (config, config_path) = cli::load_config()?;
            let passed = cli::doctor::run(&config, &config_path)?;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Validate)) => {
            let (config, config_path) = cli::load_config()?;
            let valid = cli::config::validate(&config, &config_path);
            if !valid {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Show)) => {
            let (config, _config_path) = cli::load_config()?;
            cli::config::show(&config);
            Ok(())
        }
        Some(Command::Version) => {
            println!("nullclaw {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Initialize structured JSON tracing (only for the `run` command).
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,nc_gateway=debug")))
        .json()
        .init();
}

/// Wire the runtime from `config` and hand control to it.
///
/// There's no server loop to drive here: this core has no HTTP/channel
/// front end of its own (§6, §9) — `run` wires every subsystem and
/// leaves them ready for an external collaborator (or an embedder) to
/// drive. The outbound dispatcher is left running so bus sends are
/// actually delivered.
fn run(config: &Config) -> anyhow::Result<()> {
    tracing::info!("nullclaw starting");

    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    if issues.iter().any(|i| i.severity == ConfigSeverity::Error) {
        anyhow::bail!(
            "config validation failed with {} error(s)",
            issues.iter().filter(|i| i.severity == ConfigSeverity::Error).count()
        );
    }

    let (runtime, dispatcher) = bootstrap::Runtime::bootstrap(config)?;
    tracing::info!(
        node_id = %config.sync.node_id,
        workspace = %config.workspace.path.display(),
        "runtime wired"
    );

    // The outbound dispatcher is driven on its own thread so bus sends
    // made by whatever drives the runtime (an embedder, a test harness)
    // are actually delivered. `run` itself has no agent loop of its own
    // to drive — the planner/executor/channel adapters that would are
    // external collaborators (§6, §9).
    let stop = std::sync::atomic::AtomicBool::new(false);
    std::thread::spawn(move || {
        while let Some(message) = dispatcher.consume_outbound(&stop) {
            dispatcher.dispatch_one(message);
        }
    });

    tracing::info!("nullclaw ready");
    let _ = runtime;
    Ok(())
}
