//! Properties that must hold across many steps of a busy model.

use niche_runtime::prelude::*;
use niche_runtime::sweep;

fn busy_config(seed: u64) -> ModelConfig {
    ModelConfig {
        width: 8,
        height: 8,
        n_agents: 24,
        recharge_rate: 0.5,
        seed,
        species_mix: SpeciesMix::Alternate,
        ..ModelConfig::default()
    }
}

#[test]
fn resource_levels_stay_within_bounds() {
    let mut model = Model::new(busy_config(7)).unwrap();
    let max = model.environment().max_resource();
    for _ in 0..100 {
        model.step();
        assert!(model
            .environment()
            .levels()
            .iter()
            .all(|l| (0.0..=max).contains(l)));
    }
}

#[test]
fn energy_never_goes_negative_for_the_living() {
    let mut model = Model::new(busy_config(11)).unwrap();
    for _ in 0..100 {
        model.step();
        assert!(model.organisms().all(|o| o.energy() >= 0.0));
        assert!(model.organisms().all(|o| o.dna().is_normalized()));
    }
}

#[test]
fn newborns_wait_a_step_before_acting() {
    let config = ModelConfig {
        organism: OrganismParams {
            initial_energy: 30.0,
            ..OrganismParams::default()
        },
        ..busy_config(3)
    };
    let mut model = Model::new(config).unwrap();
    let mut births = 0;
    for _ in 0..30 {
        let events = model.step();
        for event in &events {
            if let ModelEvent::Born { child, .. } = event {
                births += 1;
                if let Some(child) = model.organism(*child) {
                    assert_eq!(child.steps_alive(), 0);
                    assert_eq!(child.birth_tick(), model.tick() - 1);
                }
            }
        }
    }
    assert!(births > 0);
}

#[test]
fn births_and_deaths_match_the_reporters() {
    let mut model = Model::new(busy_config(5)).unwrap();
    for _ in 0..50 {
        let events = model.step();
        let born = events
            .iter()
            .filter(|e| matches!(e, ModelEvent::Born { .. }))
            .count();
        let record = model.collector().latest().unwrap();
        assert_eq!(record.get(Reporter::Births), born as f64);
        assert_eq!(record.get(Reporter::Organisms), model.organism_count() as f64);
        assert_eq!(
            record.get(Reporter::Cooperators) + record.get(Reporter::Freeloaders),
            record.get(Reporter::Organisms)
        );
    }
    let stats = model.stats();
    assert_eq!(stats.tick, 50);
    assert_eq!(stats.total_deaths, model.dead_ages().len());
}

#[test]
fn same_seed_same_run() {
    let run = |seed| {
        let mut model = Model::new(busy_config(seed)).unwrap();
        model.run(60);
        model.into_collector()
    };
    assert_eq!(run(9).records(), run(9).records());
    assert_ne!(run(9).records(), run(10).records());
}

#[test]
fn builder_matches_hand_written_config() {
    let built = ModelBuilder::new()
        .grid(8, 8)
        .agents(24)
        .recharge_rate(0.5)
        .species_mix(SpeciesMix::Alternate)
        .seed(7)
        .build()
        .unwrap();
    assert_eq!(built.config(), &busy_config(7));
}

#[test]
fn evolution_runs_every_epoch() {
    let model = ModelConfig {
        width: 6,
        height: 6,
        ..ModelConfig::default()
    };
    let config = EvolutionConfig {
        epochs: 3,
        steps_per_epoch: 20,
        population: 12,
        parents: 4,
        ..EvolutionConfig::default()
    };
    let mut evolution = Evolution::new(model, config).unwrap();
    let history = evolution.run().unwrap();

    assert_eq!(history.len(), 3);
    assert_eq!(
        history.iter().map(|s| s.epoch).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert_eq!(evolution.seeds().len(), 12);
    assert!(evolution.seeds().iter().all(|d| d.is_normalized()));
    for summary in &history {
        assert!(summary.survivors <= 12);
        assert!(summary.max_fitness >= summary.mean_fitness);
        assert!(summary.genome_divergence >= 0.0);
    }
}

#[test]
fn sweep_produces_one_series_per_rate() {
    let base = ModelConfig {
        width: 6,
        height: 6,
        n_agents: 8,
        ..ModelConfig::default()
    };
    let rates = [0.1, 0.5, 1.0];
    let results = sweep::recharge_sweep(&base, &rates, 15).unwrap();

    assert_eq!(results.len(), 3);
    for (result, rate) in results.iter().zip(rates) {
        assert_eq!(result.recharge_rate, rate);
        assert_eq!(result.collector.len(), 15);
        assert_eq!(result.final_record.as_ref().map(|r| r.tick), Some(14));
    }
}
