//! Sweep the recharge rate.
//!
//! Every rate gets its own directory under `<output>/run_<id>/`, holding the
//! exact parameters used and the full reporter series.

use anyhow::{Context, Result};
use colored::Colorize;
use niche::prelude::*;
use niche::runtime::sweep::recharge_sweep_with;
use std::path::Path;

use super::{progress, run_id};
use crate::config::Config;

pub fn run(steps: Option<u64>, rates: Option<Vec<f64>>) -> Result<()> {
    let config = Config::load()?;
    let sweep = SweepConfig {
        steps: steps.unwrap_or(config.sweep.steps),
        rates: rates.unwrap_or_else(|| config.sweep.rates.clone()),
        ..config.sweep.clone()
    };
    let base = sweep.apply(&config.model_config());
    let run_dir = config.output.dir.join(run_id());

    println!(
        "{} Sweeping {} recharge rates, {} steps each...",
        "→".blue(),
        sweep.rates.len().to_string().cyan(),
        sweep.steps.to_string().cyan()
    );

    let pb = progress(sweep.rates.len() as u64, "runs");
    let mut write_error = None;
    let results = recharge_sweep_with(&base, &sweep.rates, sweep.steps, |_, result| {
        if write_error.is_none() {
            write_error = save_result(&run_dir, &base, result).err();
        }
        pb.inc(1);
    })
    .context("Sweep failed")?;
    pb.finish_with_message("done");
    if let Some(e) = write_error {
        return Err(e);
    }

    println!();
    println!("{}", "Recharge sweep".white().bold());
    println!("{}", "═".repeat(48).dimmed());
    println!(
        "  {:>8}  {:>9}  {:>11}  {:>12}",
        "rate", "organisms", "mean energy", "cooperators"
    );
    for result in &results {
        let record = result.final_record.as_ref();
        let get = |r: Reporter| record.map(|rec| rec.get(r)).unwrap_or(0.0);
        println!(
            "  {:>8.2}  {:>9}  {:>11.3}  {:>12}",
            result.recharge_rate,
            get(Reporter::Organisms),
            get(Reporter::MeanEnergy),
            get(Reporter::Cooperators)
        );
    }
    println!("{}", "═".repeat(48).dimmed());
    println!("  {} Saved to {}", "✓".green(), run_dir.display());

    Ok(())
}

fn save_result(run_dir: &Path, base: &ModelConfig, result: &SweepResult) -> Result<()> {
    let dir = run_dir.join(format!("recharge_rate_{}", result.recharge_rate));
    std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let params = ModelConfig {
        recharge_rate: result.recharge_rate,
        ..base.clone()
    };
    write_json(&params, dir.join("params.json"))
        .with_context(|| format!("Failed to write params in {}", dir.display()))?;
    write_csv(&result.collector, dir.join("series.csv"))
        .with_context(|| format!("Failed to write series in {}", dir.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_land_in_per_rate_directories() {
        let dir = tempfile::tempdir().unwrap();
        let base = ModelConfig {
            width: 5,
            height: 5,
            n_agents: 4,
            ..ModelConfig::default()
        };
        let results = niche::runtime::sweep::recharge_sweep(&base, &[0.5], 3).unwrap();
        save_result(dir.path(), &base, &results[0]).unwrap();

        let rate_dir = dir.path().join("recharge_rate_0.5");
        let params: ModelConfig = serde_json::from_str(
            &std::fs::read_to_string(rate_dir.join("params.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(params.recharge_rate, 0.5);
        let csv = std::fs::read_to_string(rate_dir.join("series.csv")).unwrap();
        assert_eq!(csv.lines().count(), 4);
    }
}
