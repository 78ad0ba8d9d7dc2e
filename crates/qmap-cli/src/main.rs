//! qmap Command-Line Interface
//!
//! Drives the mapping engine from recorded event traces and helps write
//! gatemaps for a platform.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{check_gatemap, gatemap, replay, version};

/// qmap - qubit mapping between an upstream gate stream and a fixed platform
#[derive(Parser)]
#[command(name = "qmap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay an event trace through the mapping engine
    Replay {
        /// Event trace (JSON array of events)
        #[arg(short, long)]
        trace: String,

        /// Engine configuration file (JSON)
        #[arg(short, long)]
        config: Option<String>,

        /// Initialization command, e.g. "gatemap gates.json" (repeatable)
        #[arg(short, long = "init")]
        init: Vec<String>,

        /// Seed for the routing oracle
        #[arg(long)]
        seed: Option<u64>,

        /// Print the qubit map after the replay
        #[arg(long)]
        show_map: bool,
    },

    /// Validate a gatemap and list its entries
    CheckGatemap {
        /// Gatemap file (JSON)
        gatemap: String,

        /// Matching tolerance
        #[arg(short, long, default_value = "1e-6")]
        epsilon: f64,
    },

    /// Suggest a gatemap for a platform description
    Gatemap {
        /// Platform file (JSON)
        platform: String,

        /// Output file (stdout if omitted)
        output: Option<String>,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Replay {
            trace,
            config,
            init,
            seed,
            show_map,
        } => replay::execute(&trace, config.as_deref(), &init, seed, show_map),

        Commands::CheckGatemap { gatemap, epsilon } => check_gatemap::execute(&gatemap, epsilon),

        Commands::Gatemap { platform, output } => gatemap::execute(&platform, output.as_deref()),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
