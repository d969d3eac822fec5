//! End-to-end scenarios run against a full model.

use niche_runtime::prelude::*;

fn empty_model(width: usize, height: usize) -> Model {
    let config = ModelConfig {
        width,
        height,
        n_agents: 0,
        ..ModelConfig::default()
    };
    Model::empty(config).unwrap()
}

#[test]
fn consume_drains_the_cell_into_the_organism() {
    let mut model = empty_model(10, 10);
    let cell = Cell::new(3, 3);
    let dna = Dna::uniform();
    let organism = model.new_organism(Species::Generic, dna).with_energy(10.0);
    let id = model.insert_organism(organism, cell);

    let effect = model.act(id, Action::Consume).unwrap().unwrap();
    let Effect::Consumed { amount } = effect else {
        panic!("expected a consume effect, got {effect:?}");
    };

    // Default capacity is a fixed 1.0 per action.
    assert_eq!(amount, 1.0);
    assert_eq!(model.environment().level(cell), 1.0);
    let energy = model.organism(id).unwrap().energy();
    assert!((energy - (10.0 - 0.1 + amount)).abs() < 1e-12);

    // A second bite empties it, a third has nothing left to take.
    model.act(id, Action::Consume).unwrap().unwrap();
    assert_eq!(model.environment().level(cell), 0.0);
    let before = model.organism(id).unwrap().energy();
    assert_eq!(
        model.act(id, Action::Consume).unwrap().unwrap_err(),
        Decline::NothingToConsume
    );
    assert_eq!(model.organism(id).unwrap().energy(), before);
}

#[test]
fn structure_expires_and_its_cell_recharges_again() {
    let mut model = empty_model(4, 4);
    let cell = Cell::new(1, 2);
    model.environment_mut().set_level(cell, 0.0);
    let id = model.place_structure(cell, 5);

    for _ in 0..4 {
        model.step();
        assert!(model.contains(id));
        assert_eq!(model.environment().level(cell), 0.0);
    }
    model.step();
    assert!(!model.contains(id));
    assert_eq!(model.structures().count(), 0);
    assert_eq!(model.environment().level(cell), 0.0);

    let record = model.death_records().last().unwrap();
    assert_eq!(record.agent_id, id);
    assert_eq!(record.cause, DeathCause::Expired);

    model.step();
    assert_eq!(model.environment().level(cell), 0.25);
}

fn breeding_model(
    species: Species,
    mutation_rate: f64,
    mutation_scale: f64,
    seed: u64,
) -> (Model, AgentId) {
    let config = ModelConfig {
        width: 6,
        height: 6,
        n_agents: 0,
        mutation_rate,
        mutation_scale,
        seed,
        ..ModelConfig::default()
    };
    let mut model = Model::empty(config).unwrap();
    let dna = Dna::random(&mut seeded(seed.wrapping_add(1000)));
    let organism = model.new_organism(species, dna).with_energy(50.0);
    let id = model.insert_organism(organism, Cell::new(2, 2));
    (model, id)
}

fn child_dna(model: &mut Model, parent: AgentId) -> Dna {
    match model.act(parent, Action::Reproduce) {
        Some(Ok(Effect::Reproduced { child })) => child.dna().clone(),
        other => panic!("expected a birth, got {other:?}"),
    }
}

const EVERY_SPECIES: [Species; 3] = [Species::Generic, Species::Enricher, Species::Consumer];

#[test]
fn zero_mutation_rate_copies_dna_exactly() {
    for species in EVERY_SPECIES {
        for seed in 0..20 {
            let (mut model, parent) = breeding_model(species, 0.0, 0.5, seed);
            let dna = child_dna(&mut model, parent);
            assert_eq!(&dna, model.organism(parent).unwrap().dna(), "{species:?} seed {seed}");
            assert_eq!(model.organism_count(), 2);
        }
    }
}

#[test]
fn zero_mutation_scale_is_a_no_op() {
    for species in EVERY_SPECIES {
        for seed in 0..20 {
            let (mut model, parent) = breeding_model(species, 1.0, 0.0, seed);
            let dna = child_dna(&mut model, parent);
            assert_eq!(&dna, model.organism(parent).unwrap().dna(), "{species:?} seed {seed}");
        }
    }
}

#[test]
fn mutated_children_stay_on_the_simplex() {
    for species in EVERY_SPECIES {
        let mut changed = 0;
        for seed in 0..10 {
            let (mut model, parent) = breeding_model(species, 1.0, 0.1, seed);
            let dna = child_dna(&mut model, parent);
            assert!(dna.is_normalized());
            assert!(dna.iter().all(|(_, w)| w >= DNA_FLOOR - 1e-12));
            assert!((dna.sum() - 1.0).abs() < 1e-9);
            for (gene, value) in species.pinned_genes() {
                assert!((dna.get(*gene) - value).abs() < 1e-9);
            }
            if &dna != model.organism(parent).unwrap().dna() {
                changed += 1;
            }
        }
        assert!(changed > 0, "{species:?} children never mutated");
    }
}

#[test]
fn gift_moves_energy_between_organisms() {
    let mut model = empty_model(6, 6);
    let giver = model.new_organism(Species::Generic, Dna::uniform()).with_energy(10.0);
    let giver = model.insert_organism(giver, Cell::new(2, 2));
    let needy = model.new_organism(Species::Generic, Dna::uniform()).with_energy(1.0);
    let needy = model.insert_organism(needy, Cell::new(2, 3));

    let mut events = Vec::new();
    let effect = model
        .act_with_events(giver, Action::Cooperate, &mut events)
        .unwrap()
        .unwrap();
    let Effect::Cooperated { gift: Some(gift), .. } = effect else {
        panic!("expected a gift, got {effect:?}");
    };
    assert_eq!(gift.recipient, needy);
    assert_eq!(gift.amount, 1.0);

    let giver_energy = model.organism(giver).unwrap().energy();
    let needy_energy = model.organism(needy).unwrap().energy();
    assert!((giver_energy - (10.0 - 0.3 - gift.amount)).abs() < 1e-12);
    assert_eq!(needy_energy, 1.0 + gift.amount);
    // Only the action cost leaves the pair.
    assert!((giver_energy + needy_energy - (11.0 - 0.3)).abs() < 1e-12);
    assert!(matches!(
        events.as_slice(),
        [ModelEvent::Shared { from, to, amount }]
            if *from == giver && *to == needy && *amount == gift.amount
    ));
}

#[test]
fn harvested_survivors_do_not_count_as_lifespans() {
    let config = ModelConfig {
        width: 5,
        height: 5,
        n_agents: 6,
        ..ModelConfig::default()
    };
    let mut model = Model::new(config).unwrap();
    model.run(3);
    let died = model.dead_ages().len();
    let harvested = model.harvest();
    assert_eq!(model.dead_ages().len(), died);
    assert!(model
        .death_records()
        .iter()
        .filter(|r| r.cause == DeathCause::RuntimeTermination)
        .count()
        == harvested.len());
}

#[test]
fn empty_model_still_recharges_and_reports_zeros() {
    let mut model = empty_model(5, 5);
    let cell = Cell::new(0, 4);
    model.environment_mut().set_level(cell, 1.0);

    let events = model.step();
    assert_eq!(model.environment().level(cell), 1.25);
    assert_eq!(model.tick(), 1);
    assert!(matches!(
        events.as_slice(),
        [ModelEvent::StepComplete { tick: 0, organisms: 0, .. }]
    ));

    let record = model.collector().latest().unwrap();
    for reporter in Reporter::ALL {
        let value = record.get(reporter);
        assert!(value.is_finite(), "{} is not finite", reporter.name());
    }
    assert_eq!(record.get(Reporter::Organisms), 0.0);
    assert_eq!(record.get(Reporter::MeanEnergy), 0.0);
    assert_eq!(record.get(Reporter::MeanLifespan), 0.0);
    assert_eq!(record.get(Reporter::AvgCooperation), 0.0);
}
