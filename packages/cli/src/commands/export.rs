use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use tracing::debug;
use tutorly_export::{export_lesson, ExportFormat};
use tutorly_store::JsonDirStore;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Id of the lesson in the store
    pub lesson_id: String,

    /// Output format (json, html, text)
    #[arg(short, long, default_value = "html")]
    pub format: ExportFormat,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Print to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,
}

pub async fn export(args: ExportArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let store_dir = config.get_store_dir(cwd);

    if !store_dir.exists() {
        return Err(anyhow!("Store directory does not exist: {:?}", store_dir));
    }

    debug!(store = %store_dir.display(), "Opening lesson store");
    let store = JsonDirStore::new(store_dir);

    let exported = export_lesson(&store, &args.lesson_id, args.format).await?;

    if args.stdout {
        print!("{}", exported.data);
        return Ok(());
    }

    let out_dir = args.out.unwrap_or_else(|| config.get_out_dir(cwd));
    fs::create_dir_all(&out_dir)?;
    let out_path = out_dir.join(&exported.filename);
    fs::write(&out_path, &exported.data)?;

    println!(
        "📦 {} lesson {} as {} → {}",
        "Exported".green().bold(),
        args.lesson_id,
        args.format,
        out_path.display()
    );

    Ok(())
}
