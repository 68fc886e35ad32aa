//! Folio - A static generator for single-person portfolio sites.

mod analytics;
mod build;
mod cli;
mod config;
mod data;
mod init;
mod logger;
mod nav;
mod preview;
mod render;
mod router;
mod serve;
mod sitemap;
mod theme;
mod tracker;
mod utils;
mod watch;

use anyhow::{Result, bail};
use build::build_site;
use clap::Parser;
use cli::{Cli, Commands};
use config::{SiteConfig, cfg, init_config};
use init::new_site;
use serve::serve_site;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    init_config(load_config(cli)?);
    let config = cfg();

    match &cli.command {
        Commands::Init { .. } => new_site(&config),
        Commands::Build { .. } => build_site(&config).map(drop),
        Commands::Serve { .. } => serve_site(),
        Commands::Preview { theme } => preview::run_preview(&config, *theme),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &'static Cli) -> Result<SiteConfig> {
    let config = SiteConfig::load(cli)?;

    match (cli.is_init(), config.config_path.exists()) {
        (true, true) => {
            bail!("Config file already exists. Remove it manually or init in a different path.")
        }
        (false, false) => bail!("Config file not found."),
        _ => {}
    }

    if !cli.is_init() {
        config.validate()?;
    }
    Ok(config)
}
