use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

#[derive(Debug, Args)]
pub struct ConfigArgs {}

/// Print the effective configuration, defaults filled in
pub fn show_config(_args: ConfigArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let source = Path::new(cwd).join(DEFAULT_CONFIG_NAME);

    if source.exists() {
        eprintln!("⚙️  {} {}", "Loaded".green().bold(), source.display());
    } else {
        eprintln!("⚙️  {} no {}, using defaults", "Note:".yellow().bold(), DEFAULT_CONFIG_NAME);
    }

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
