//! Organism parameters: the action cost table and behavioral policies.
//!
//! Every organism in a model shares one `OrganismParams`, held behind an
//! `Arc`. The values are loaded from the `[organism]` section of the CLI
//! config or set through the model builder.

use niche_core::error::{ensure_non_negative, ensure_probability, Result, SimError};
use niche_core::types::Action;
use serde::{Deserialize, Serialize};

/// Energy charged for each action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionCosts {
    pub movement: f64,
    pub consume: f64,
    pub cooperate: f64,
    pub build: f64,
    pub reproduce: f64,
    pub plant: f64,
}

impl Default for ActionCosts {
    fn default() -> Self {
        Self {
            movement: 0.5,
            consume: 0.1,
            cooperate: 0.3,
            build: 1.0,
            reproduce: 2.0,
            plant: 0.2,
        }
    }
}

impl ActionCosts {
    pub fn cost(&self, action: Action) -> f64 {
        match action {
            Action::Move => self.movement,
            Action::Consume => self.consume,
            Action::Cooperate => self.cooperate,
            Action::Build => self.build,
            Action::Reproduce => self.reproduce,
            Action::Plant => self.plant,
        }
    }

    /// The lowest cost in the table. An organism holding less energy than
    /// this can no longer act.
    pub fn cheapest(&self) -> f64 {
        Action::ALL
            .iter()
            .map(|a| self.cost(*a))
            .fold(f64::INFINITY, f64::min)
    }

    fn validate(&self) -> Result<()> {
        for action in Action::ALL {
            ensure_non_negative(&format!("costs.{}", action.name()), self.cost(action))?;
        }
        Ok(())
    }
}

/// How much an organism may take from its cell in one consume action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsumptionPolicy {
    /// A fixed amount per action.
    Fixed { rate: f64 },
    /// The consumption gene times the cell capacity.
    DnaScaled,
}

impl Default for ConsumptionPolicy {
    fn default() -> Self {
        ConsumptionPolicy::Fixed { rate: 1.0 }
    }
}

/// How a parent's energy is split with its child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReproductionPolicy {
    /// Parent and child each keep half of what is left after the cost.
    #[default]
    Split,
    /// The parent pays only the cost; the child starts with the initial energy.
    FlatCost,
}

/// Parameters shared by every organism in a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganismParams {
    /// Energy a freshly seeded organism starts with.
    pub initial_energy: f64,
    pub costs: ActionCosts,
    pub consumption: ConsumptionPolicy,
    pub reproduction: ReproductionPolicy,
    /// Energy needed before reproduction is attempted.
    pub reproduce_threshold: f64,
    /// Whether reproduction needs a structure within `struct_radius`.
    pub require_structure: bool,
    pub struct_radius: usize,
    /// Neighborhood radius of the cooperate action.
    pub coop_radius: usize,
    /// Neighbors below this energy are eligible for a gift.
    pub low_energy_threshold: f64,
    /// Most energy handed over in a single gift.
    pub share_amount: f64,
    /// Cooperation gene above which an organism counts as a cooperator.
    pub cooperation_threshold: f64,
    /// Extra repair per cooperator nearby, as a fraction of the recharge rate.
    pub cooperator_bonus: f64,
    /// Resource added (or removed, for consumers) by one plant action.
    pub plant_amount: f64,
}

impl Default for OrganismParams {
    fn default() -> Self {
        Self {
            initial_energy: 5.0,
            costs: ActionCosts::default(),
            consumption: ConsumptionPolicy::default(),
            reproduction: ReproductionPolicy::default(),
            reproduce_threshold: 6.0,
            require_structure: false,
            struct_radius: 2,
            coop_radius: 1,
            low_energy_threshold: 2.0,
            share_amount: 1.0,
            cooperation_threshold: 0.15,
            cooperator_bonus: 0.1,
            plant_amount: 0.5,
        }
    }
}

impl OrganismParams {
    /// Reject values the action economy cannot work with.
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("initial_energy", self.initial_energy)?;
        self.costs.validate()?;
        if let ConsumptionPolicy::Fixed { rate } = self.consumption {
            ensure_non_negative("consumption.rate", rate)?;
        }
        ensure_non_negative("reproduce_threshold", self.reproduce_threshold)?;
        ensure_non_negative("low_energy_threshold", self.low_energy_threshold)?;
        ensure_non_negative("share_amount", self.share_amount)?;
        ensure_probability("cooperation_threshold", self.cooperation_threshold)?;
        ensure_non_negative("cooperator_bonus", self.cooperator_bonus)?;
        ensure_non_negative("plant_amount", self.plant_amount)?;
        if self.coop_radius == 0 {
            return Err(SimError::invalid_config("coop_radius", 0, "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cheapest_cost_is_consume_by_default() {
        let costs = ActionCosts::default();
        assert_eq!(costs.cheapest(), 0.1);
        assert_eq!(costs.cost(Action::Reproduce), 2.0);
    }

    #[test]
    fn defaults_validate() {
        assert!(OrganismParams::default().validate().is_ok());
    }

    #[test]
    fn negative_cost_rejected() {
        let mut params = OrganismParams::default();
        params.costs.plant = -1.0;
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("costs.plant"));
    }

    #[test]
    fn consumption_policy_serializes_with_kind_tag() {
        let json = serde_json::to_string(&ConsumptionPolicy::Fixed { rate: 2.0 }).unwrap();
        assert_eq!(json, r#"{"kind":"fixed","rate":2.0}"#);
        let back: ConsumptionPolicy = serde_json::from_str(r#"{"kind":"dna_scaled"}"#).unwrap();
        assert_eq!(back, ConsumptionPolicy::DnaScaled);
    }

    #[test]
    fn partial_params_fill_defaults() {
        let params: OrganismParams =
            serde_json::from_str(r#"{"initial_energy": 8.0, "costs": {"movement": 0.25}}"#).unwrap();
        assert_eq!(params.initial_energy, 8.0);
        assert_eq!(params.costs.movement, 0.25);
        assert_eq!(params.costs.build, 1.0);
        assert_eq!(params.reproduction, ReproductionPolicy::Split);
    }
}
