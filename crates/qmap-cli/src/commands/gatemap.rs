//! Gatemap command implementation.

use anyhow::{Context, Result};
use console::style;
use std::fs;

use qmap_catalog::suggest_gatemap;
use qmap_engine::Platform;

/// Execute the gatemap command.
pub fn execute(platform_path: &str, output: Option<&str>) -> Result<()> {
    let platform = Platform::from_file(platform_path)
        .with_context(|| format!("Failed to load platform: {platform_path}"))?;

    let suggestion = suggest_gatemap(platform.instruction_names());
    let json = serde_json::to_string_pretty(&suggestion.gatemap)
        .context("Failed to serialize gatemap")?;

    match output {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("Failed to write file: {path}"))?;
            eprintln!(
                "{} Wrote {} entries to {}",
                style("✓").green().bold(),
                suggestion.gatemap.len(),
                style(path).green()
            );
        }
        None => println!("{json}"),
    }

    if !suggestion.is_complete() {
        eprintln!(
            "{} Unrecognized gates (set to null, edit before use): {}",
            style("!").yellow().bold(),
            suggestion.unknown.join(", ")
        );
    }

    Ok(())
}
