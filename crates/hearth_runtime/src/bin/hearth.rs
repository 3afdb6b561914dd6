//! Hearth server entry point.

use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::Context;
use clap::Parser;
use hearth_runtime::bootstrap::starter_world;
use hearth_runtime::{Config, Driver, Gateway, Sessions, logging};
use tracing::info;

/// Command-line flags. Flags override values from the config file.
#[derive(Debug, Parser)]
#[command(name = "hearth", version, about = "A small text-world server")]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "HEARTH_CONFIG")]
    config: Option<PathBuf>,

    /// Address to accept connections on.
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log);

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind = bind;
    }

    let world = starter_world().context("building the starter world")?;
    let sessions = Arc::new(Sessions::new());
    let driver = Driver::new(world, sessions.clone(), config.driver.clone())
        .spawn()
        .context("starting the driver")?;

    let listener = TcpListener::bind(config.listener.bind)
        .with_context(|| format!("binding {}", config.listener.bind))?;
    let gateway = Gateway::new(
        driver.submitter(),
        sessions,
        config.listener.clone(),
        config.driver.starting_location.clone(),
    );

    let stop = AtomicBool::new(false);
    gateway.serve(&listener, &stop).context("accepting connections")?;

    let driver = driver.stop().context("stopping the driver")?;
    info!(stats = ?driver.stats(), "shut down");
    Ok(())
}
