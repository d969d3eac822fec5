//! Niche Runtime Prelude — convenient imports for common usage.
//!
//! ```rust
//! use niche_runtime::prelude::*;
//! ```

// Re-export the model
pub use crate::model::{Model, ModelEvent, ModelStats};
pub use crate::config::ModelConfig;

// Re-export model builder
pub use crate::model_builder::ModelBuilder;

// Re-export the world
pub use crate::environment::ResourceGrid;
pub use crate::grid::TorusGrid;

// Re-export metrics
pub use crate::metrics::{DataCollector, Reporter, StepRecord};

// Re-export experiments
pub use crate::evolution::{EpochSummary, Evolution, EvolutionConfig};
pub use crate::sweep::{recharge_sweep, SweepConfig, SweepResult};

// Re-export from agents
pub use niche_agents::prelude::*;
