//! Run the evolutionary loop.

use anyhow::{Context, Result};
use colored::Colorize;
use niche::prelude::*;
use std::path::PathBuf;

use super::progress;
use crate::config::Config;

pub fn run(epochs: Option<usize>, output: Option<PathBuf>, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let mut evolution_config = config.evolution.clone();
    if let Some(epochs) = epochs {
        evolution_config.epochs = epochs;
    }
    let epochs = evolution_config.epochs;

    println!(
        "{} Evolving {} organisms for {} epochs of {} steps...",
        "→".blue(),
        evolution_config.population.to_string().cyan(),
        epochs.to_string().cyan(),
        evolution_config.steps_per_epoch
    );
    let mut evolution = Evolution::new(config.model_config(), evolution_config)
        .context("Invalid evolution configuration")?;

    let pb = progress(epochs as u64, "epochs");
    for _ in 0..epochs {
        let summary = evolution.run_epoch()?;
        if verbose {
            pb.println(format!(
                "  epoch {}: {} survivors, max fitness {:.3}",
                summary.epoch, summary.survivors, summary.max_fitness
            ));
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    println!();
    println!("{}", "Evolution".white().bold());
    println!("{}", "═".repeat(64).dimmed());
    println!(
        "  {:>5}  {:>9}  {:>8}  {:>11}  {:>8}  {:>10}",
        "epoch", "survivors", "energy", "cooperation", "fitness", "divergence"
    );
    for s in evolution.history() {
        let survivors = if s.survivors == 0 {
            s.survivors.to_string().red()
        } else {
            s.survivors.to_string().green()
        };
        println!(
            "  {:>5}  {:>9}  {:>8.3}  {:>11.3}  {:>8.3}  {:>10.4}",
            s.epoch, survivors, s.mean_energy, s.mean_cooperation, s.mean_fitness, s.genome_divergence
        );
    }
    println!("{}", "═".repeat(64).dimmed());

    if let Some(path) = output {
        write_json(&evolution.history(), &path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("  {} Saved to {}", "✓".green(), path.display());
    }

    Ok(())
}
