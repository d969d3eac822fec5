//! Initialize a new niche project.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE};

pub fn run(path: Option<PathBuf>) -> Result<()> {
    let base_path = match path {
        Some(p) => p,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    println!("{} Initializing niche project...", "→".blue());

    std::fs::create_dir_all(&base_path)
        .with_context(|| format!("Failed to create {}", base_path.display()))?;

    let config = Config::default();
    let config_path = base_path.join(CONFIG_FILE);
    if !config_path.exists() {
        config.save(&config_path)?;
        println!("  {} Created {}", "✓".green(), config_path.display());
    } else {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    }

    let runs_dir = base_path.join(&config.output.dir);
    std::fs::create_dir_all(&runs_dir)
        .with_context(|| format!("Failed to create {}", runs_dir.display()))?;
    println!("  {} Created {}", "✓".green(), runs_dir.display());

    let gitignore_path = runs_dir.join(".gitignore");
    if !gitignore_path.exists() {
        std::fs::write(&gitignore_path, "*\n!.gitignore\n")?;
        println!("  {} Created {}", "✓".green(), gitignore_path.display());
    }

    println!();
    println!("{} Niche project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  {} edit {}", "1.".blue(), CONFIG_FILE);
    println!("  {} niche run --save", "2.".blue());
    println!("  {} niche sweep", "3.".blue());
    println!("  {} niche evolve", "4.".blue());

    Ok(())
}
