//! Folio - content build model for Markdown blogs.

mod build;
mod cli;
mod config;
mod init;
mod logger;
mod source;

use anyhow::{Result, bail};
use build::{build_site, check_site, print_layout, write_manifest};
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use init::new_site;
use std::path::PathBuf;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Init { name } => new_site(&config, name.is_some()),
        Commands::Build { .. } => {
            let manifest = build_site(&config)?;
            write_manifest(&config, &manifest).map(|_| ())
        }
        Commands::Check { .. } => check_site(&config),
        Commands::Layout { width } => print_layout(&config, *width),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = cli
        .root
        .as_deref()
        .map(config::expand_tilde)
        .unwrap_or_else(|| PathBuf::from("./"));
    let config_path = root.join(&cli.config);

    let mut config = if !cli.is_init() && config_path.exists() {
        SiteConfig::from_path(&config_path)?
    } else {
        SiteConfig::default()
    };
    config.update_with_cli(cli);

    // Validate config state based on command
    let config_exists = config.config_path.exists();
    match (cli.is_init(), config_exists) {
        (true, true) => {
            bail!("Config file already exists. Remove it manually or init in a different path.")
        }
        (false, false) => bail!("Config file not found."),
        _ => {}
    }

    if !cli.is_init() {
        config.validate(cli)?;
    }

    Ok(config)
}
