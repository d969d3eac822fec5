//! Niche CLI - run, sweep and evolve the niche construction model.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "niche")]
#[command(author, version, about = "Niche - agent-based niche construction on a torus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default niche.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Run a single model
    Run {
        /// Number of steps (default: [model].steps)
        #[arg(short, long)]
        steps: Option<u64>,

        /// Random seed (default: [model].seed)
        #[arg(long)]
        seed: Option<u64>,

        /// Write params and reporter series under the output directory
        #[arg(short, long)]
        save: bool,
    },

    /// Run one model per recharge rate
    Sweep {
        /// Number of steps per run (default: [sweep].steps)
        #[arg(short, long)]
        steps: Option<u64>,

        /// Comma-separated recharge rates (default: [sweep].rates)
        #[arg(short, long, value_delimiter = ',')]
        rates: Option<Vec<f64>>,
    },

    /// Run the evolutionary loop
    Evolve {
        /// Number of epochs (default: [evolution].epochs)
        #[arg(short, long)]
        epochs: Option<usize>,

        /// Write the epoch history as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let verbose = cli.verbose > 0;

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Run { steps, seed, save } => commands::run::run(steps, seed, save, verbose),
        Commands::Sweep { steps, rates } => commands::sweep::run(steps, rates),
        Commands::Evolve { epochs, output } => commands::evolve::run(epochs, output, verbose),
    }
}
