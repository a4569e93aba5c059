use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tutorly_model::{is_valid_block, Block};

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Tutorial, lesson, or block document JSON file
    pub input: PathBuf,
}

#[derive(Debug, Default, PartialEq)]
pub struct ValidationReport {
    pub checked: usize,
    /// Blocks whose shape is wrong, as `(location, reason)`
    pub invalid: Vec<(String, String)>,
    /// Well-formed blocks of a type nothing here understands
    pub unknown: Vec<(String, String)>,
}

pub fn validate(args: ValidateArgs, cwd: &str) -> Result<()> {
    let input = if args.input.is_absolute() {
        args.input.clone()
    } else {
        Path::new(cwd).join(&args.input)
    };

    let source = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let value: Value = serde_json::from_str(&source)
        .with_context(|| format!("{} is not valid JSON", input.display()))?;

    println!("🔍 {} {}", "Validating".bright_blue().bold(), input.display());

    let report = check(&value);

    for (location, kind) in &report.unknown {
        println!("  {} {} - unknown block type \"{}\"", "⚠".yellow(), location, kind);
    }
    for (location, reason) in &report.invalid {
        eprintln!("  {} {} - {}", "✗".red(), location, reason);
    }

    if !report.invalid.is_empty() {
        return Err(anyhow!(
            "{} of {} blocks are malformed",
            report.invalid.len(),
            report.checked
        ));
    }

    println!("{} {} blocks checked", "✓".green(), report.checked);
    Ok(())
}

/// Walk every block list in `value`, wherever it lives
pub fn check(value: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (prefix, blocks) in block_lists(value) {
        for (i, raw) in blocks.iter().enumerate() {
            let location = format!("{}[{}]", prefix, i);
            report.checked += 1;

            if !is_valid_block(raw) {
                report
                    .invalid
                    .push((location, "expected a string `type` and an object `data`".to_string()));
                continue;
            }

            match Block::from_value(raw.clone()) {
                Ok(block) if block.is_unknown() => {
                    report.unknown.push((location, block.type_name().to_string()));
                }
                Ok(_) => {}
                Err(e) => report.invalid.push((location, e.to_string())),
            }
        }
    }

    report
}

fn block_lists(value: &Value) -> Vec<(String, &Vec<Value>)> {
    let mut lists = Vec::new();

    if let Some(Value::Array(blocks)) = value.get("blocks") {
        lists.push(("blocks".to_string(), blocks));
    }

    if let Some(Value::Array(blocks)) = value.get("content").and_then(|c| c.get("blocks")) {
        lists.push(("content.blocks".to_string(), blocks));
    }

    if let Some(Value::Array(lessons)) = value.get("lessons") {
        for (i, lesson) in lessons.iter().enumerate() {
            match lesson.get("content") {
                Some(Value::Array(blocks)) => {
                    lists.push((format!("lessons[{}].content", i), blocks));
                }
                Some(content) => {
                    if let Some(Value::Array(blocks)) = content.get("blocks") {
                        lists.push((format!("lessons[{}].content.blocks", i), blocks));
                    }
                }
                None => {}
            }
        }
    }

    lists
}
