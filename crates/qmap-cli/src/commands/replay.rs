//! Replay command implementation.

use anyhow::{Context, Result};
use console::style;
use std::path::Path;
use tracing::info;

use qmap_engine::{
    Engine, EngineConfig, InitCommand, RecordingDownstream, RoutingOracle, Session, load_trace,
};
use qmap_ir::Gate;

/// Execute the replay command.
pub fn execute(
    trace: &str,
    config: Option<&str>,
    init: &[String],
    seed: Option<u64>,
    show_map: bool,
) -> Result<()> {
    let mut engine_config = EngineConfig::load(config.map(Path::new))
        .with_context(|| format!("Failed to load configuration: {}", config.unwrap_or("-")))?;

    let commands = init
        .iter()
        .map(|command| {
            command
                .parse::<InitCommand>()
                .with_context(|| format!("Invalid init command: {command}"))
        })
        .collect::<Result<Vec<_>>>()?;
    engine_config.apply_commands(commands);
    if let Some(seed) = seed {
        engine_config.seed = seed;
    }

    let engine = Engine::initialize(&engine_config, RecordingDownstream::new())
        .context("Failed to initialize the mapping engine")?;
    println!(
        "{} Mapping onto {} qubits ({} gatemap entries, oracle {})",
        style("→").cyan().bold(),
        style(engine.num_qubits()).yellow(),
        engine.catalog().len(),
        style(engine.oracle().name()).green()
    );

    let events = load_trace(trace).with_context(|| format!("Failed to read trace: {trace}"))?;
    info!("Replaying {} events from {trace}", events.len());
    println!("  Loaded: {} events", events.len());

    let mut session = Session::new(engine);
    session.replay(&events).context("Replay failed")?;

    let engine = session.engine();
    println!(
        "{} Replay complete: {} block(s) flushed",
        style("✓").green().bold(),
        engine.blocks_flushed()
    );
    if !engine.pending().is_empty() {
        println!(
            "  {} {} gate(s) still pending (no drop event)",
            style("!").yellow().bold(),
            engine.pending().len()
        );
    }

    for batch in engine.downstream().batches() {
        println!();
        println!("{}", style(&batch.name).cyan().bold());
        for gate in &batch.gates {
            println!("  {}", describe(engine, gate));
        }
    }

    if !session.measurements().is_empty() {
        println!();
        println!("{}", style("Measurements").cyan().bold());
        for (i, set) in session.measurements().iter().enumerate() {
            let values: Vec<String> = set
                .iter()
                .map(|m| format!("{}={}", m.qubit, m.value))
                .collect();
            println!("  #{i}: {}", values.join(" "));
        }
    }

    if show_map {
        println!();
        println!("{}", engine.qubit_map_report());
    }

    Ok(())
}

/// Render a downstream gate through the catalog, falling back to its kind.
fn describe<O: RoutingOracle>(
    engine: &Engine<O, RecordingDownstream>,
    gate: &Gate,
) -> String {
    match engine.catalog().detect(gate) {
        Ok(descriptor) => descriptor.to_string(),
        Err(_) => {
            let operands: Vec<String> = gate.operands().map(|q| q.to_string()).collect();
            format!("<{}> {}", gate.kind.name(), operands.join(", "))
        }
    }
}
