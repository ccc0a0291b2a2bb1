use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use display_bridge::cli::Cli;
use display_bridge::config::{self, BridgeConfig};
use display_bridge::logging;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Environment first, CLI overrides
    let config = config::load_config()?;
    let config = cli.merge_into_config(config)?;

    logging::init(config.log_file.as_deref().map(Path::new), config.log_level)
        .context("Failed to open log file")?;
    log::info!("display-bridge starting...");
    log::debug!("configuration: {:?}", config);

    run(&cli, &config)
}

#[cfg(windows)]
fn run(cli: &Cli, config: &BridgeConfig) -> Result<()> {
    use display_bridge::display::{SessionController, Win32Platform};

    let mut controller = SessionController::with_config(Win32Platform::new(), config);
    let stdout = std::io::stdout();
    display_bridge::cli::execute(&cli.command, &mut controller, &mut stdout.lock())
}

#[cfg(not(windows))]
fn run(_cli: &Cli, _config: &BridgeConfig) -> Result<()> {
    anyhow::bail!("No native display platform is available on this host")
}
