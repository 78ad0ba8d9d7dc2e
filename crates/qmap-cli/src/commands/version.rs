//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - qubit mapping for fixed-size platforms",
        style("qmap").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qmap-ir       Qubit identities, index maps and canonical gates");
    println!("  qmap-catalog  Gatemap parsing, gate detection and construction");
    println!("  qmap-engine   Translation, batching and routing");
    println!("  qmap-cli      Command-line interface");
    println!();
    println!(
        "Repository: {}",
        style("https://github.com/qmap-rs/qmap").underlined()
    );
    println!("License:    {}", style("Apache-2.0").dim());
}
