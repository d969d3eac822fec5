//! Organism — the acting agent of the model.
//!
//! Each activation an organism first assesses itself. If it is unplaced,
//! out of energy, or unable to afford even the cheapest action, it reports
//! its death and does nothing else. Otherwise it ages one step, draws an
//! action with probability proportional to its DNA, and tries to perform
//! it against the habitat.
//!
//! Actions change the organism and the habitat directly. Anything that
//! touches another agent (an energy gift, a new structure, a child) comes
//! back in the returned [`Activation`] for the runtime to apply.
//!
//! Costs are charged per action:
//! - move pays for trying, even when every neighboring cell is taken;
//! - consume, build and reproduce decline without charge when they cannot
//!   take effect;
//! - cooperate and plant always take effect and always pay.

use crate::params::{ConsumptionPolicy, OrganismParams, ReproductionPolicy};
use crate::species::Archetype;
use niche_core::agent::Agent;
use niche_core::dna::{Dna, Gene};
use niche_core::habitat::Habitat;
use niche_core::types::*;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use tracing::{trace, warn};

/// An energy transfer from the acting organism to a neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Gift {
    pub recipient: AgentId,
    pub amount: f64,
}

/// What a performed action did.
#[derive(Debug, Clone)]
pub enum Effect {
    Moved { from: Cell, to: Cell },
    /// Move was paid for but every neighboring cell was occupied.
    Stayed,
    Consumed { amount: f64 },
    Cooperated { gift: Option<Gift>, repaired: f64 },
    /// The runtime places a structure on `cell`.
    Built { cell: Cell },
    /// The runtime registers the child at its position.
    Reproduced { child: Box<Organism> },
    Planted { delta: f64 },
}

/// Why a chosen action did not happen. No energy was charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decline {
    /// The organism has no position to act from.
    Unplaced,
    CannotAfford,
    NothingToConsume,
    AlreadyBuilt,
    StructurePresent,
    BelowThreshold,
    NoStructureNearby,
    NoFreeCell,
}

/// Outcome of one organism activation.
#[derive(Debug, Clone)]
pub enum Activation {
    Performed { action: Action, effect: Effect },
    Declined { action: Action, reason: Decline },
    Died(DeathCause),
}

/// The gene that weights an action's selection.
///
/// Metabolism has no action of its own; it dilutes every other choice.
pub fn selection_gene(action: Action) -> Gene {
    match action {
        Action::Move => Gene::Movement,
        Action::Consume => Gene::Consumption,
        Action::Cooperate => Gene::Cooperation,
        Action::Build => Gene::Builder,
        Action::Reproduce => Gene::Reproduction,
        Action::Plant => Gene::Planting,
    }
}

/// An energy-budgeted organism driven by its DNA.
#[derive(Debug, Clone)]
pub struct Organism {
    id: AgentId,
    position: Option<Cell>,
    energy: f64,
    dna: Dna,
    species: Species,
    generation: u32,
    born_at: Tick,
    steps_alive: Tick,
    energy_gathered: f64,
    offspring: u32,
    has_built: bool,
    params: Arc<OrganismParams>,
}

impl Organism {
    /// A first-generation organism with the configured starting energy.
    ///
    /// The DNA is constrained by the species' pinned genes.
    pub fn new(id: AgentId, species: Species, dna: Dna, params: Arc<OrganismParams>) -> Self {
        Self {
            id,
            position: None,
            energy: params.initial_energy,
            dna: species.constrain(dna),
            species,
            generation: 0,
            born_at: 0,
            steps_alive: 0,
            energy_gathered: 0.0,
            offspring: 0,
            has_built: false,
            params,
        }
    }

    pub fn with_energy(mut self, energy: f64) -> Self {
        self.energy = energy;
        self
    }

    pub fn with_position(mut self, cell: Cell) -> Self {
        self.position = Some(cell);
        self
    }

    pub fn with_generation(mut self, generation: u32) -> Self {
        self.generation = generation;
        self
    }

    pub fn born_at(mut self, tick: Tick) -> Self {
        self.born_at = tick;
        self
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn dna(&self) -> &Dna {
        &self.dna
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn birth_tick(&self) -> Tick {
        self.born_at
    }

    pub fn steps_alive(&self) -> Tick {
        self.steps_alive
    }

    /// Total energy taken from the environment.
    pub fn energy_gathered(&self) -> f64 {
        self.energy_gathered
    }

    pub fn offspring(&self) -> u32 {
        self.offspring
    }

    pub fn has_built(&self) -> bool {
        self.has_built
    }

    pub fn params(&self) -> &OrganismParams {
        &self.params
    }

    /// Credit energy handed over by a neighbor.
    pub fn receive(&mut self, amount: f64) {
        self.energy += amount;
    }

    /// Whether the cooperation gene counts this organism as a cooperator.
    pub fn is_cooperator(&self) -> bool {
        self.dna.get(Gene::Cooperation) > self.params.cooperation_threshold
    }

    /// What a neighbor gets to see.
    pub fn view(&self) -> NeighborView {
        NeighborView {
            id: self.id,
            energy: self.energy,
            cooperation: self.dna.get(Gene::Cooperation),
            species: self.species,
        }
    }

    /// Run one activation.
    pub fn step<R: Rng + ?Sized>(&mut self, habitat: &mut dyn Habitat, rng: &mut R) -> Activation {
        if let Some(cause) = self.self_assess().death_cause() {
            if cause == DeathCause::InvalidState {
                warn!(organism = %self.id, "activated without a position");
            }
            return Activation::Died(cause);
        }
        self.steps_alive += 1;

        let action = self.choose_action(rng);
        match self.perform(action, habitat, rng) {
            Ok(effect) => {
                trace!(organism = %self.id, %action, energy = self.energy, "performed");
                Activation::Performed { action, effect }
            }
            Err(reason) => Activation::Declined { action, reason },
        }
    }

    /// Attempt one specific action, skipping self-assessment. Unplaced
    /// organisms decline every action.
    pub fn perform<R: Rng + ?Sized>(
        &mut self,
        action: Action,
        habitat: &mut dyn Habitat,
        rng: &mut R,
    ) -> Result<Effect, Decline> {
        if self.position.is_none() {
            return Err(Decline::Unplaced);
        }
        match action {
            Action::Move => self.move_randomly(habitat, rng),
            Action::Consume => self.consume(habitat),
            Action::Cooperate => self.cooperate(habitat, rng),
            Action::Build => self.build(habitat),
            Action::Reproduce => self.reproduce(habitat, rng),
            Action::Plant => self.plant(habitat),
        }
    }

    /// Draw an action weighted by the matching genes.
    pub fn choose_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        let weights = Action::ALL.map(|a| self.dna.get(selection_gene(a)));
        match WeightedIndex::new(weights) {
            Ok(dist) => Action::ALL[dist.sample(rng)],
            Err(_) => Action::ALL[rng.random_range(0..Action::ALL.len())],
        }
    }

    fn afford(&self, action: Action) -> Result<f64, Decline> {
        let cost = self.params.costs.cost(action);
        if self.energy < cost {
            Err(Decline::CannotAfford)
        } else {
            Ok(cost)
        }
    }

    // `perform` has already declined for unplaced organisms.
    fn cell(&self) -> Cell {
        self.position.unwrap_or_default()
    }

    fn free_neighbor<R: Rng + ?Sized>(&self, habitat: &dyn Habitat, rng: &mut R) -> Option<Cell> {
        let mut cells = habitat.neighborhood(self.cell(), 1, false);
        cells.shuffle(rng);
        cells.into_iter().find(|c| !habitat.has_organism(*c))
    }

    fn move_randomly<R: Rng + ?Sized>(
        &mut self,
        habitat: &mut dyn Habitat,
        rng: &mut R,
    ) -> Result<Effect, Decline> {
        let cost = self.afford(Action::Move)?;
        self.energy -= cost;
        let from = self.cell();
        match self.free_neighbor(habitat, rng) {
            Some(to) => {
                habitat.relocate(self.id, from, to);
                self.position = Some(to);
                Ok(Effect::Moved { from, to })
            }
            None => Ok(Effect::Stayed),
        }
    }

    fn consume(&mut self, habitat: &mut dyn Habitat) -> Result<Effect, Decline> {
        let cost = self.afford(Action::Consume)?;
        let cell = self.cell();
        let capacity = match self.params.consumption {
            ConsumptionPolicy::Fixed { rate } => rate,
            ConsumptionPolicy::DnaScaled => self.dna.get(Gene::Consumption) * habitat.max_resource(),
        };
        if habitat.resource(cell).min(capacity) <= 0.0 {
            return Err(Decline::NothingToConsume);
        }
        self.energy -= cost;
        let amount = habitat.consume(cell, capacity);
        self.energy += amount;
        self.energy_gathered += amount;
        Ok(Effect::Consumed { amount })
    }

    /// Gift energy to one needy neighbor, then repair the neighborhood.
    ///
    /// Repair adds `recharge_rate * (1 + bonus * cooperators)` to every
    /// cell within the cooperation radius, the organism's own cell
    /// included. The gift never leaves the giver short of the action cost.
    fn cooperate<R: Rng + ?Sized>(
        &mut self,
        habitat: &mut dyn Habitat,
        rng: &mut R,
    ) -> Result<Effect, Decline> {
        let cost = self.afford(Action::Cooperate)?;
        let cell = self.cell();
        let radius = self.params.coop_radius;
        let area = habitat.neighborhood(cell, radius, true);
        let nearby: Vec<NeighborView> = area
            .iter()
            .flat_map(|c| habitat.organisms_at(*c))
            .filter(|id| *id != self.id)
            .filter_map(|id| habitat.neighbor(id))
            .collect();

        let mut gift = None;
        if self.species.shares_energy() {
            let needy: Vec<&NeighborView> = nearby
                .iter()
                .filter(|n| n.energy < self.params.low_energy_threshold)
                .collect();
            if let Some(recipient) = needy.choose(rng) {
                let amount = self.params.share_amount.min(self.energy - cost);
                if amount > 0.0 {
                    self.energy -= amount;
                    gift = Some(Gift {
                        recipient: recipient.id,
                        amount,
                    });
                }
            }
        }

        let threshold = self.params.cooperation_threshold;
        let helpers = nearby.iter().filter(|n| n.cooperation > threshold).count();
        let boost = habitat.recharge_rate() * (1.0 + self.params.cooperator_bonus * helpers as f64);
        let repaired = area.iter().map(|c| habitat.enrich(*c, boost)).sum();

        self.energy -= cost;
        Ok(Effect::Cooperated { gift, repaired })
    }

    fn build(&mut self, habitat: &dyn Habitat) -> Result<Effect, Decline> {
        let cost = self.afford(Action::Build)?;
        let cell = self.cell();
        if self.has_built {
            return Err(Decline::AlreadyBuilt);
        }
        if habitat.has_structure(cell) {
            return Err(Decline::StructurePresent);
        }
        self.energy -= cost;
        self.has_built = true;
        Ok(Effect::Built { cell })
    }

    fn reproduce<R: Rng + ?Sized>(
        &mut self,
        habitat: &mut dyn Habitat,
        rng: &mut R,
    ) -> Result<Effect, Decline> {
        let cost = self.afford(Action::Reproduce)?;
        if self.energy < self.params.reproduce_threshold {
            return Err(Decline::BelowThreshold);
        }
        let cell = self.cell();
        if self.params.require_structure
            && !habitat.structure_within(cell, self.params.struct_radius)
        {
            return Err(Decline::NoStructureNearby);
        }
        let target = self.free_neighbor(habitat, rng).ok_or(Decline::NoFreeCell)?;

        self.energy -= cost;
        let child_energy = match self.params.reproduction {
            ReproductionPolicy::Split => {
                self.energy /= 2.0;
                self.energy
            }
            ReproductionPolicy::FlatCost => self.params.initial_energy,
        };
        let dna = self.species.constrain(self.dna.inherit(rng, &habitat.mutation()));
        let child = Organism::new(habitat.next_id(), self.species, dna, Arc::clone(&self.params))
            .with_energy(child_energy)
            .with_position(target)
            .with_generation(self.generation + 1)
            .born_at(habitat.current_tick());
        self.offspring += 1;
        Ok(Effect::Reproduced {
            child: Box::new(child),
        })
    }

    fn plant(&mut self, habitat: &mut dyn Habitat) -> Result<Effect, Decline> {
        let cost = self.afford(Action::Plant)?;
        self.energy -= cost;
        let amount = self.species.planting_sign() * self.params.plant_amount;
        let delta = habitat.enrich(self.cell(), amount);
        Ok(Effect::Planted { delta })
    }
}

impl Agent for Organism {
    fn id(&self) -> AgentId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Organism
    }

    fn position(&self) -> Option<Cell> {
        self.position
    }

    fn set_position(&mut self, position: Option<Cell>) {
        self.position = position;
    }

    fn age(&self) -> Tick {
        self.steps_alive
    }

    fn self_assess(&self) -> Vitality {
        if self.position.is_none() {
            Vitality::Unplaced
        } else if self.energy <= 0.0 {
            Vitality::Starved
        } else if self.energy < self.params.costs.cheapest() {
            Vitality::Exhausted
        } else {
            Vitality::Viable
        }
    }
}
