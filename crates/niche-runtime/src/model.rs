//! Model — population lifecycle and the step loop.
//!
//! The model owns the resource field, the spatial index and the registry of
//! every agent. Each step:
//! 1. Every cell not covered by a structure recharges
//! 2. If the registry is empty the step is quiescent
//! 3. Otherwise every agent present at the start of the step is activated
//!    once, in a freshly shuffled order. Agents born during the step first
//!    act on the next one; agents removed earlier in the step are skipped
//! 4. Reporters are collected
//! 5. The step counter advances
//!
//! Activation is sequential: the acting agent is taken out of the registry,
//! runs against a [`Habitat`] view of everything else, and is put back
//! before the next agent acts. Later agents observe earlier agents' effects
//! within the same step.

use crate::config::ModelConfig;
use crate::environment::ResourceGrid;
use crate::grid::TorusGrid;
use crate::metrics::{self, DataCollector};
use niche_agents::entity::Entity;
use niche_agents::organism::{Activation, Decline, Effect, Organism};
use niche_agents::params::OrganismParams;
use niche_agents::spawn::{MixedSeed, SeedPolicy};
use niche_agents::structure::Structure;
use niche_agents::tile::Tile;
use niche_core::agent::Agent;
use niche_core::dna::{Dna, MutationParams};
use niche_core::error::{Result, SimError};
use niche_core::habitat::Habitat;
use niche_core::rng::{seeded, SimRng};
use niche_core::spatial::SpatialIndex;
use niche_core::types::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Event emitted by the model during a step.
#[derive(Debug, Clone, Serialize)]
pub enum ModelEvent {
    /// An organism reproduced.
    Born { parent: AgentId, child: AgentId, cell: Cell },
    /// An organism put up a structure.
    Built { builder: AgentId, structure: AgentId, cell: Cell },
    /// Energy changed hands during cooperation.
    Shared { from: AgentId, to: AgentId, amount: f64 },
    /// An agent was removed.
    Died { record: DeathRecord },
    /// A step completed.
    StepComplete { tick: Tick, organisms: usize, births: usize, deaths: usize },
}

/// Statistics about the model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelStats {
    pub tick: Tick,
    pub organisms: usize,
    pub structures: usize,
    pub tiles: usize,
    pub total_births: usize,
    pub total_deaths: usize,
    pub mean_energy: f64,
    pub mean_resource: f64,
}

/// Owns the world and runs the simulation.
pub struct Model {
    config: ModelConfig,
    params: Arc<OrganismParams>,
    environment: ResourceGrid,
    grid: TorusGrid,
    agents: BTreeMap<AgentId, Entity>,
    rng: SimRng,
    next_id: u64,
    tick: Tick,
    dead_ages: Vec<Tick>,
    death_records: Vec<DeathRecord>,
    births_this_step: usize,
    deaths_this_step: usize,
    total_births: usize,
    total_deaths: usize,
    collector: DataCollector,
}

impl Model {
    /// Build a model and seed its population from the config's species
    /// mix and DNA distribution.
    pub fn new(config: ModelConfig) -> Result<Self> {
        let mut policy = MixedSeed::new(config.species_mix, config.dna_seed);
        Self::with_seed_policy(config, &mut policy)
    }

    /// Build a model whose initial organisms come from `policy`.
    pub fn with_seed_policy(config: ModelConfig, policy: &mut dyn SeedPolicy) -> Result<Self> {
        let mut model = Self::empty(config)?;
        model.populate(policy)?;
        if model.config.tiles {
            model.lay_tiles();
        }
        Ok(model)
    }

    /// Build a model with no agents at all, regardless of `n_agents`.
    pub fn empty(config: ModelConfig) -> Result<Self> {
        config.validate()?;
        let environment = ResourceGrid::new(
            config.width,
            config.height,
            config.max_resource,
            config.recharge_rate,
            config.initial_resource,
        )?;
        Ok(Self {
            params: Arc::new(config.organism.clone()),
            grid: TorusGrid::new(config.width, config.height),
            rng: seeded(config.seed),
            environment,
            agents: BTreeMap::new(),
            next_id: 0,
            tick: 0,
            dead_ages: Vec::new(),
            death_records: Vec::new(),
            births_this_step: 0,
            deaths_this_step: 0,
            total_births: 0,
            total_deaths: 0,
            collector: DataCollector::new(),
            config,
        })
    }

    fn populate(&mut self, policy: &mut dyn SeedPolicy) -> Result<()> {
        let n = self.config.n_agents;
        let mut free = self.grid.cells_without(EntityKind::Organism);
        for i in 0..n {
            let (species, dna) = policy.seed(i, n, &mut self.rng);
            let cell = if self.config.exclusive_cells {
                if free.is_empty() {
                    return Err(SimError::placement(format!(
                        "no free cell left for organism {} of {n}",
                        i + 1
                    )));
                }
                let k = self.rng.random_range(0..free.len());
                free.swap_remove(k)
            } else {
                Cell::new(
                    self.rng.random_range(0..self.config.width),
                    self.rng.random_range(0..self.config.height),
                )
            };
            let organism = self.new_organism(species, dna);
            self.insert_organism(organism, cell);
        }
        debug!(organisms = n, "population seeded");
        Ok(())
    }

    fn lay_tiles(&mut self) {
        let cells: Vec<Cell> = self.grid.cells().collect();
        for cell in cells {
            let tile = Tile::new(self.allocate_id(), cell);
            self.grid.place(tile.id(), EntityKind::Tile, cell);
            self.agents.insert(tile.id(), tile.into());
        }
    }

    fn allocate_id(&mut self) -> AgentId {
        allocate(&mut self.next_id)
    }

    /// A fresh, unplaced organism using the model's parameters and a new id.
    pub fn new_organism(&mut self, species: Species, dna: Dna) -> Organism {
        Organism::new(self.allocate_id(), species, dna, Arc::clone(&self.params))
    }

    /// Register an organism at `cell` (wrapped onto the torus).
    pub fn insert_organism(&mut self, mut organism: Organism, cell: Cell) -> AgentId {
        let cell = self.grid.wrap(cell.x as i64, cell.y as i64);
        let id = organism.id();
        organism.set_position(Some(cell));
        self.grid.place(id, EntityKind::Organism, cell);
        self.agents.insert(id, organism.into());
        id
    }

    /// Create and register an organism in one go.
    pub fn spawn_organism(&mut self, species: Species, dna: Dna, cell: Cell) -> AgentId {
        let organism = self.new_organism(species, dna);
        self.insert_organism(organism, cell)
    }

    /// Register a structure at `cell`.
    pub fn place_structure(&mut self, cell: Cell, lifespan: u32) -> AgentId {
        let cell = self.grid.wrap(cell.x as i64, cell.y as i64);
        let structure = Structure::new(self.allocate_id(), cell, lifespan);
        let id = structure.id();
        self.grid.place(id, EntityKind::Structure, cell);
        self.agents.insert(id, structure.into());
        id
    }

    /// Run one step.
    pub fn step(&mut self) -> Vec<ModelEvent> {
        let mut events = Vec::new();
        self.births_this_step = 0;
        self.deaths_this_step = 0;

        let covered = self.structure_cells();
        self.environment.recharge(&covered);

        if self.agents.is_empty() {
            debug!(tick = self.tick, "no agents, step is quiescent");
        } else {
            let mut order: Vec<AgentId> = self.agents.keys().copied().collect();
            order.shuffle(&mut self.rng);
            for id in order {
                self.activate(id, &mut events);
            }
        }

        let record = metrics::measure(self);
        self.collector.collect(record);
        events.push(ModelEvent::StepComplete {
            tick: self.tick,
            organisms: self.organism_count(),
            births: self.births_this_step,
            deaths: self.deaths_this_step,
        });
        self.tick += 1;
        events
    }

    /// Run `steps` steps, discarding events.
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    fn activate(&mut self, id: AgentId, events: &mut Vec<ModelEvent>) {
        // Removed earlier in this step.
        let Some(mut entity) = self.agents.remove(&id) else {
            return;
        };
        let outcome = match &mut entity {
            Entity::Organism(organism) => {
                let (mut world, rng) = self.world();
                Some(organism.step(&mut world, rng))
            }
            Entity::Structure(structure) => structure.step().death_cause().map(Activation::Died),
            Entity::Tile(tile) => {
                tile.step();
                None
            }
        };
        match outcome {
            Some(Activation::Died(cause)) => {
                let record = self.bury(entity, cause);
                events.push(ModelEvent::Died { record });
            }
            Some(Activation::Performed { effect, .. }) => {
                self.agents.insert(id, entity);
                self.apply(id, effect, events);
            }
            _ => {
                self.agents.insert(id, entity);
            }
        }
    }

    /// Have one organism attempt `action` right now, outside the step loop.
    ///
    /// Self-assessment is skipped and the organism does not age. Effects on
    /// other agents are applied as they would be during a step. Returns
    /// `None` if `id` is not a registered organism.
    pub fn act(
        &mut self,
        id: AgentId,
        action: Action,
    ) -> Option<std::result::Result<Effect, Decline>> {
        self.act_with_events(id, action, &mut Vec::new())
    }

    /// Like [`Model::act`], pushing the births, builds and gifts it causes
    /// onto `events`.
    pub fn act_with_events(
        &mut self,
        id: AgentId,
        action: Action,
        events: &mut Vec<ModelEvent>,
    ) -> Option<std::result::Result<Effect, Decline>> {
        let mut entity = self.agents.remove(&id)?;
        let result = match &mut entity {
            Entity::Organism(organism) => {
                let (mut world, rng) = self.world();
                Some(organism.perform(action, &mut world, rng))
            }
            _ => None,
        };
        self.agents.insert(id, entity);
        if let Some(Ok(effect)) = &result {
            self.apply(id, effect.clone(), events);
        }
        result
    }

    /// Split the model into the habitat seen by an acting organism and the
    /// random generator.
    fn world(&mut self) -> (World<'_>, &mut SimRng) {
        let world = World {
            environment: &mut self.environment,
            grid: &mut self.grid,
            agents: &self.agents,
            next_id: &mut self.next_id,
            mutation: self.config.mutation(),
            tick: self.tick,
        };
        (world, &mut self.rng)
    }

    /// Carry out the parts of an effect that touch other agents.
    fn apply(&mut self, actor: AgentId, effect: Effect, events: &mut Vec<ModelEvent>) {
        match effect {
            Effect::Cooperated { gift: Some(gift), .. } => {
                let recipient = self
                    .agents
                    .get_mut(&gift.recipient)
                    .and_then(Entity::as_organism_mut);
                match recipient {
                    Some(recipient) => {
                        recipient.receive(gift.amount);
                        events.push(ModelEvent::Shared {
                            from: actor,
                            to: gift.recipient,
                            amount: gift.amount,
                        });
                    }
                    None => {
                        // Recipient vanished; the energy goes back to the giver.
                        if let Some(giver) = self.agents.get_mut(&actor).and_then(Entity::as_organism_mut) {
                            giver.receive(gift.amount);
                        }
                    }
                }
            }
            Effect::Built { cell } => {
                let structure = self.place_structure(cell, self.config.structure_lifespan);
                debug!(builder = %actor, %structure, %cell, "structure built");
                events.push(ModelEvent::Built {
                    builder: actor,
                    structure,
                    cell,
                });
            }
            Effect::Reproduced { child } => {
                let Some(cell) = child.position() else {
                    return;
                };
                let child = self.insert_organism(*child, cell);
                self.births_this_step += 1;
                self.total_births += 1;
                debug!(parent = %actor, %child, %cell, "organism born");
                events.push(ModelEvent::Born {
                    parent: actor,
                    child,
                    cell,
                });
            }
            _ => {}
        }
    }

    fn bury(&mut self, mut entity: Entity, cause: DeathCause) -> DeathRecord {
        let id = entity.id();
        let kind = entity.kind();
        if let Some(cell) = entity.position() {
            self.grid.remove(id, cell);
            // Harvested survivors did not die; keep them out of lifespans.
            if kind == EntityKind::Organism && cause != DeathCause::RuntimeTermination {
                self.dead_ages.push(entity.age());
            }
        }
        entity.set_position(None);
        if kind == EntityKind::Organism {
            self.deaths_this_step += 1;
            self.total_deaths += 1;
        }
        let record = DeathRecord {
            agent_id: id,
            kind,
            age: entity.age(),
            tick: self.tick,
            cause,
        };
        debug!(agent = %id, ?kind, ?cause, age = record.age, "agent removed");
        self.death_records.push(record.clone());
        record
    }

    /// Remove an agent. Removing an agent that is already gone does
    /// nothing and returns `None`.
    pub fn kill(&mut self, id: AgentId, cause: DeathCause) -> Option<DeathRecord> {
        let entity = self.agents.remove(&id)?;
        Some(self.bury(entity, cause))
    }

    /// Remove every organism and hand them back, recording each removal as
    /// a runtime termination.
    pub fn harvest(&mut self) -> Vec<Organism> {
        let ids: Vec<AgentId> = self.organisms().map(|o| o.id()).collect();
        let mut harvested = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(Entity::Organism(organism)) = self.agents.get(&id).cloned() {
                self.kill(id, DeathCause::RuntimeTermination);
                harvested.push(organism);
            }
        }
        harvested
    }

    fn structure_cells(&self) -> HashSet<Cell> {
        self.structures().filter_map(|s| s.position()).collect()
    }

    pub fn stats(&self) -> ModelStats {
        ModelStats {
            tick: self.tick,
            organisms: self.organism_count(),
            structures: self.structures().count(),
            tiles: self.tile_count(),
            total_births: self.total_births,
            total_deaths: self.total_deaths,
            mean_energy: metrics::mean(self.organisms().map(|o| o.energy())),
            mean_resource: self.environment.mean_level(),
        }
    }

    pub fn organisms(&self) -> impl Iterator<Item = &Organism> + '_ {
        self.agents.values().filter_map(Entity::as_organism)
    }

    pub fn structures(&self) -> impl Iterator<Item = &Structure> + '_ {
        self.agents.values().filter_map(Entity::as_structure)
    }

    pub fn organism(&self, id: AgentId) -> Option<&Organism> {
        self.agents.get(&id).and_then(Entity::as_organism)
    }

    pub fn organism_mut(&mut self, id: AgentId) -> Option<&mut Organism> {
        self.agents.get_mut(&id).and_then(Entity::as_organism_mut)
    }

    /// Whether an agent of any kind is registered under `id`.
    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    pub fn organism_count(&self) -> usize {
        self.organisms().count()
    }

    pub fn tile_count(&self) -> usize {
        self.agents
            .values()
            .filter(|e| matches!(e, Entity::Tile(_)))
            .count()
    }

    /// Every registered agent, organisms, structures and tiles alike.
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn is_extinct(&self) -> bool {
        self.organisms().next().is_none()
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn environment(&self) -> &ResourceGrid {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut ResourceGrid {
        &mut self.environment
    }

    pub fn grid(&self) -> &TorusGrid {
        &self.grid
    }

    /// Ages of organisms that died while placed. Runtime terminations are
    /// not deaths and are left out.
    pub fn dead_ages(&self) -> &[Tick] {
        &self.dead_ages
    }

    pub fn death_records(&self) -> &[DeathRecord] {
        &self.death_records
    }

    pub fn births_this_step(&self) -> usize {
        self.births_this_step
    }

    pub fn deaths_this_step(&self) -> usize {
        self.deaths_this_step
    }

    pub fn collector(&self) -> &DataCollector {
        &self.collector
    }

    pub fn into_collector(self) -> DataCollector {
        self.collector
    }
}

fn allocate(next_id: &mut u64) -> AgentId {
    let id = AgentId(*next_id);
    *next_id += 1;
    id
}

/// The model as seen by the organism currently acting.
struct World<'a> {
    environment: &'a mut ResourceGrid,
    grid: &'a mut TorusGrid,
    agents: &'a BTreeMap<AgentId, Entity>,
    next_id: &'a mut u64,
    mutation: MutationParams,
    tick: Tick,
}

impl Habitat for World<'_> {
    fn neighborhood(&self, cell: Cell, radius: usize, include_center: bool) -> Vec<Cell> {
        self.grid.neighborhood(cell, radius, include_center)
    }

    fn organisms_at(&self, cell: Cell) -> Vec<AgentId> {
        self.grid
            .occupants(cell)
            .iter()
            .filter(|o| o.kind == EntityKind::Organism)
            .map(|o| o.id)
            .collect()
    }

    fn has_organism(&self, cell: Cell) -> bool {
        self.grid.contains_kind(cell, EntityKind::Organism)
    }

    fn has_structure(&self, cell: Cell) -> bool {
        self.grid.contains_kind(cell, EntityKind::Structure)
    }

    fn relocate(&mut self, id: AgentId, from: Cell, to: Cell) {
        self.grid.move_to(id, from, to);
    }

    fn resource(&self, cell: Cell) -> f64 {
        self.environment.level(cell)
    }

    fn consume(&mut self, cell: Cell, requested: f64) -> f64 {
        self.environment.consume(cell, requested)
    }

    fn enrich(&mut self, cell: Cell, amount: f64) -> f64 {
        self.environment.enrich(cell, amount)
    }

    fn max_resource(&self) -> f64 {
        self.environment.max_resource()
    }

    fn recharge_rate(&self) -> f64 {
        self.environment.recharge_rate()
    }

    fn neighbor(&self, id: AgentId) -> Option<NeighborView> {
        self.agents
            .get(&id)
            .and_then(Entity::as_organism)
            .map(Organism::view)
    }

    fn next_id(&mut self) -> AgentId {
        allocate(self.next_id)
    }

    fn mutation(&self) -> MutationParams {
        self.mutation
    }

    fn current_tick(&self) -> Tick {
        self.tick
    }
}
