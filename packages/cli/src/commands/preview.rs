use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tutorly_model::BlockDocument;
use tutorly_renderer::{render_document, render_tutorial, DisplayNode};

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Tutorial, lesson, or block document JSON file
    pub input: PathBuf,

    /// Write the HTML here instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub fn preview(args: PreviewArgs, cwd: &str) -> Result<()> {
    let input = resolve(cwd, &args.input);
    let source = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let value: Value = serde_json::from_str(&source)
        .with_context(|| format!("{} is not valid JSON", input.display()))?;

    let html = render_value(&value)?.to_html();

    match args.out {
        Some(out) => {
            let out = resolve(cwd, &out);
            fs::write(&out, html)?;
            println!(
                "👀 {} {} → {}",
                "Rendered".green().bold(),
                input.display(),
                out.display()
            );
        }
        None => println!("{}", html),
    }

    Ok(())
}

/// Accepts a bare block document, a single lesson record, or a whole
/// tutorial view.
fn render_value(value: &Value) -> Result<DisplayNode> {
    if value.get("blocks").is_some() {
        let document: BlockDocument = serde_json::from_value(value.clone())?;
        return Ok(render_document(&document));
    }

    let is_lesson = value
        .get("content")
        .map(|c| c.get("blocks").is_some())
        .unwrap_or(false);

    if is_lesson {
        let title = value.get("title").cloned().unwrap_or(Value::Null);
        return Ok(render_tutorial(&json!({ "title": title, "lessons": [value] })));
    }

    Ok(render_tutorial(value))
}

fn resolve(cwd: &str, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        Path::new(cwd).join(path)
    }
}
