//! # Niche
//!
//! Agent-based niche construction on a toroidal grid.
//!
//! Organisms carry a DNA vector on the probability simplex. Every step each
//! organism draws one action (move, consume, cooperate, build, reproduce or
//! plant) with probability proportional to its genes, pays for it in
//! energy, and dies when it can no longer afford to act. The resource field
//! recharges every step except under structures, which organisms build and
//! which decay after a fixed lifespan. Children inherit their parent's DNA,
//! mutated with Gaussian noise at a configurable rate.
//!
//! ## Quick Start
//!
//! ```rust
//! use niche::prelude::*;
//!
//! let mut model = ModelBuilder::new()
//!     .grid(10, 10)
//!     .agents(20)
//!     .recharge_rate(0.3)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! model.run(50);
//!
//! let latest = model.collector().latest().unwrap();
//! println!(
//!     "{} organisms, mean energy {:.2}",
//!     latest.get(Reporter::Organisms),
//!     latest.get(Reporter::MeanEnergy),
//! );
//! ```
//!
//! ## Architecture
//!
//! - [`niche_core`] - DNA, shared types, the `Agent`, `Habitat` and
//!   `SpatialIndex` traits, errors and seeded randomness
//! - [`niche_agents`] - Organisms, structures and tiles, species
//!   archetypes, fitness scoring and seeding policies
//! - [`niche_runtime`] - The model and its step loop, resource grid,
//!   torus, reporters, the evolutionary loop, sweeps and exporters
//!
//! ## Species
//!
//! | Species | Pinned genes | Cooperate | Plant |
//! |---------|--------------|-----------|-------|
//! | Generic | none | repair and gift | enrich |
//! | Enricher | planting 0.3, cooperation 0.25 | repair and gift | enrich |
//! | Consumer | consumption 0.35, planting 0.05 | repair only | corrupt |
//!
//! ## Evolution
//!
//! ```rust
//! use niche::prelude::*;
//!
//! let model = ModelConfig { width: 6, height: 6, ..ModelConfig::default() };
//! let config = EvolutionConfig {
//!     epochs: 2,
//!     steps_per_epoch: 10,
//!     population: 8,
//!     parents: 3,
//!     ..EvolutionConfig::default()
//! };
//! let mut evolution = Evolution::new(model, config).unwrap();
//! for summary in evolution.run().unwrap() {
//!     println!("epoch {}: {} survivors", summary.epoch, summary.survivors);
//! }
//! ```

// Re-export all subcrates
pub use niche_core as core;
pub use niche_agents as agents;
pub use niche_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use niche::prelude::*;
/// ```
pub mod prelude {
    pub use niche_runtime::prelude::*;

    pub use niche_runtime::export::{to_csv, write_csv, write_json, RunReport};
    pub use niche_runtime::sweep::default_rates;
    pub use niche_agents::fitness::rank;
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
