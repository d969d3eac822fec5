//! Configuration management for the niche CLI.

use anyhow::{Context, Result};
use niche::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "niche.toml";

/// Project configuration, one table per concern.
///
/// `[organism]` is kept as its own table in the file and folded into the
/// model config when a model is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelSection,
    #[serde(default)]
    pub organism: OrganismParams,
    #[serde(default)]
    pub evolution: EvolutionConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[model]`: everything in [`ModelConfig`] except organism parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    pub width: usize,
    pub height: usize,
    pub n_agents: usize,
    pub steps: u64,
    pub mutation_rate: f64,
    pub mutation_scale: f64,
    pub max_resource: f64,
    pub initial_resource: f64,
    pub recharge_rate: f64,
    pub structure_lifespan: u32,
    pub exclusive_cells: bool,
    pub tiles: bool,
    pub species_mix: SpeciesMix,
    pub dna_seed: DnaSeed,
    pub seed: u64,
}

impl Default for ModelSection {
    fn default() -> Self {
        let d = ModelConfig::default();
        Self {
            width: d.width,
            height: d.height,
            n_agents: d.n_agents,
            steps: 500,
            mutation_rate: d.mutation_rate,
            mutation_scale: d.mutation_scale,
            max_resource: d.max_resource,
            initial_resource: d.initial_resource,
            recharge_rate: d.recharge_rate,
            structure_lifespan: d.structure_lifespan,
            exclusive_cells: d.exclusive_cells,
            tiles: d.tiles,
            species_mix: d.species_mix,
            dna_seed: d.dna_seed,
            seed: d.seed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where run directories are created.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("runs")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Load config from niche.toml in the current or parent directories.
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// The full model configuration, organism table included.
    pub fn model_config(&self) -> ModelConfig {
        let m = &self.model;
        ModelConfig {
            width: m.width,
            height: m.height,
            n_agents: m.n_agents,
            mutation_rate: m.mutation_rate,
            mutation_scale: m.mutation_scale,
            max_resource: m.max_resource,
            initial_resource: m.initial_resource,
            recharge_rate: m.recharge_rate,
            structure_lifespan: m.structure_lifespan,
            exclusive_cells: m.exclusive_cells,
            tiles: m.tiles,
            species_mix: m.species_mix,
            dna_seed: m.dna_seed,
            seed: m.seed,
            organism: self.organism.clone(),
        }
    }
}

/// Find niche.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("[model]"));
        assert!(text.contains("[organism]"));
        assert!(text.contains("[evolution]"));
        assert!(text.contains("[sweep]"));
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.model_config(), config.model_config());
        assert_eq!(back.evolution, config.evolution);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [model]
            width = 12
            species_mix = "split"

            [organism]
            reproduce_threshold = 8.0
            "#,
        )
        .unwrap();
        let model = config.model_config();
        assert_eq!(model.width, 12);
        assert_eq!(model.height, 20);
        assert_eq!(model.species_mix, SpeciesMix::Split);
        assert_eq!(model.organism.reproduce_threshold, 8.0);
        assert_eq!(model.organism.initial_energy, 5.0);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut config = Config::default();
        config.model.seed = 99;
        config.save(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.model.seed, 99);
    }
}
