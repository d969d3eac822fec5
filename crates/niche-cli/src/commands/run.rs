//! Run a single model.

use anyhow::{Context, Result};
use colored::Colorize;
use niche::prelude::*;

use super::{progress, run_id};
use crate::config::Config;

pub fn run(steps: Option<u64>, seed: Option<u64>, save: bool, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let steps = steps.unwrap_or(config.model.steps);
    let mut model_config = config.model_config();
    if let Some(seed) = seed {
        model_config.seed = seed;
    }

    println!(
        "{} Building a {}x{} torus with {} organisms (seed {})...",
        "→".blue(),
        model_config.width,
        model_config.height,
        model_config.n_agents.to_string().cyan(),
        model_config.seed
    );
    let mut model = Model::new(model_config).context("Invalid model configuration")?;
    let initial = model.stats();

    println!("{} Running {} steps...", "→".blue(), steps.to_string().cyan());
    let pb = progress(steps, "steps");
    for _ in 0..steps {
        let events = model.step();
        if verbose {
            let births = events.iter().filter(|e| matches!(e, ModelEvent::Born { .. })).count();
            let shared = events.iter().filter(|e| matches!(e, ModelEvent::Shared { .. })).count();
            if births + shared > 0 {
                pb.println(format!(
                    "  step {}: {} births, {} gifts, {} alive",
                    model.tick() - 1,
                    births,
                    shared,
                    model.organism_count()
                ));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    let stats = model.stats();
    println!();
    println!("{} Simulation complete!", "✓".green().bold());
    println!(
        "  Organisms:     {} → {}",
        initial.organisms.to_string().yellow(),
        stats.organisms.to_string().green()
    );
    println!("  Structures:    {}", stats.structures.to_string().cyan());
    println!(
        "  Births/deaths: {} / {}",
        stats.total_births.to_string().green(),
        stats.total_deaths.to_string().red()
    );
    println!("  Mean energy:   {:.3}", stats.mean_energy);
    println!("  Mean resource: {:.3}", stats.mean_resource);
    if let Some(latest) = model.collector().latest() {
        println!(
            "  Cooperators:   {} / freeloaders {}",
            latest.get(Reporter::Cooperators).to_string().cyan(),
            latest.get(Reporter::Freeloaders).to_string().cyan()
        );
        println!("  Mean lifespan: {:.2}", latest.get(Reporter::MeanLifespan));
    }

    if save {
        let dir = config.output.dir.join(run_id());
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        write_json(&RunReport::from_model(&model), dir.join("params.json"))
            .context("Failed to write params.json")?;
        write_csv(model.collector(), dir.join("series.csv"))
            .context("Failed to write series.csv")?;
        println!();
        println!("  {} Saved to {}", "✓".green(), dir.display());
    }

    Ok(())
}
