//! Check-gatemap command implementation.

use anyhow::{Context, Result};
use console::style;

use qmap_catalog::{GateCatalog, GateFamily};

/// Execute the check-gatemap command.
pub fn execute(path: &str, epsilon: f64) -> Result<()> {
    if !(epsilon.is_finite() && epsilon > 0.0) {
        anyhow::bail!("Epsilon must be a positive number, got {epsilon}");
    }

    let catalog = GateCatalog::from_file(path, epsilon)
        .with_context(|| format!("Invalid gatemap: {path}"))?;

    println!(
        "{} {} is valid ({} entries)",
        style("✓").green().bold(),
        style(path).green(),
        catalog.len()
    );

    for family in [
        GateFamily::Fixed,
        GateFamily::Parameterized,
        GateFamily::Measurement,
        GateFamily::Prep,
    ] {
        let entries: Vec<_> = catalog
            .entries()
            .filter(|entry| entry.family() == family)
            .collect();
        if entries.is_empty() {
            continue;
        }
        println!();
        println!("{}", style(family).cyan().bold());
        for entry in entries {
            let mut notes = Vec::new();
            if entry.num_controls() > 0 {
                notes.push(format!("{} control(s)", entry.num_controls()));
            }
            if entry.is_parallel() {
                notes.push("parallel".to_string());
            }
            if notes.is_empty() {
                println!("  {}", entry.name());
            } else {
                println!("  {} {}", entry.name(), style(notes.join(", ")).dim());
            }
        }
    }

    Ok(())
}
