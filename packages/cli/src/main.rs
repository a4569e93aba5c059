mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{export, preview, show_config, validate, ConfigArgs, ExportArgs, PreviewArgs, ValidateArgs};
use tracing_subscriber::EnvFilter;

/// Tutorly CLI - preview, check, and export lesson content
#[derive(Parser, Debug)]
#[command(name = "tutorly")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a stored lesson as json, html, or text
    Export(ExportArgs),

    /// Render a tutorial or lesson file to HTML
    Preview(PreviewArgs),

    /// Check that every block in a file is well formed
    Validate(ValidateArgs),

    /// Print the effective configuration
    Config(ConfigArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Export(args) => export(args, &cwd).await,
        Command::Preview(args) => preview(args, &cwd),
        Command::Validate(args) => validate(args, &cwd),
        Command::Config(args) => show_config(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
