//! Reporters and the per-step data collector.
//!
//! After every step the model measures a fixed set of named reporters:
//! population counts by kind, strategy and species, mean energy and
//! resource, mean lifespan of the dead, per-gene DNA averages, and the
//! births and deaths of the step. Empty populations report 0.0, never NaN.

use crate::model::Model;
use niche_core::dna::Gene;
use niche_core::types::{Species, Tick};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named per-step measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Reporter {
    Organisms,
    Structures,
    Tiles,
    Cooperators,
    Freeloaders,
    Enrichers,
    Consumers,
    MeanEnergy,
    MeanResource,
    MeanLifespan,
    AvgCooperation,
    AvgConsumption,
    AvgMetabolism,
    AvgBuilder,
    AvgMovement,
    AvgReproduction,
    AvgPlanting,
    Births,
    Deaths,
}

impl Reporter {
    pub const ALL: [Reporter; 19] = [
        Reporter::Organisms,
        Reporter::Structures,
        Reporter::Tiles,
        Reporter::Cooperators,
        Reporter::Freeloaders,
        Reporter::Enrichers,
        Reporter::Consumers,
        Reporter::MeanEnergy,
        Reporter::MeanResource,
        Reporter::MeanLifespan,
        Reporter::AvgCooperation,
        Reporter::AvgConsumption,
        Reporter::AvgMetabolism,
        Reporter::AvgBuilder,
        Reporter::AvgMovement,
        Reporter::AvgReproduction,
        Reporter::AvgPlanting,
        Reporter::Births,
        Reporter::Deaths,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Reporter::Organisms => "Organisms",
            Reporter::Structures => "Structures",
            Reporter::Tiles => "Tiles",
            Reporter::Cooperators => "Cooperators",
            Reporter::Freeloaders => "Freeloaders",
            Reporter::Enrichers => "Enrichers",
            Reporter::Consumers => "Consumers",
            Reporter::MeanEnergy => "MeanEnergy",
            Reporter::MeanResource => "MeanResource",
            Reporter::MeanLifespan => "MeanLifespan",
            Reporter::AvgCooperation => "AvgCooperation",
            Reporter::AvgConsumption => "AvgConsumption",
            Reporter::AvgMetabolism => "AvgMetabolism",
            Reporter::AvgBuilder => "AvgBuilder",
            Reporter::AvgMovement => "AvgMovement",
            Reporter::AvgReproduction => "AvgReproduction",
            Reporter::AvgPlanting => "AvgPlanting",
            Reporter::Births => "Births",
            Reporter::Deaths => "Deaths",
        }
    }

    pub fn from_name(name: &str) -> Option<Reporter> {
        Reporter::ALL.into_iter().find(|r| r.name() == name)
    }

    /// The per-gene average reporter for `gene`.
    pub fn average_of(gene: Gene) -> Reporter {
        match gene {
            Gene::Cooperation => Reporter::AvgCooperation,
            Gene::Consumption => Reporter::AvgConsumption,
            Gene::Metabolism => Reporter::AvgMetabolism,
            Gene::Builder => Reporter::AvgBuilder,
            Gene::Movement => Reporter::AvgMovement,
            Gene::Reproduction => Reporter::AvgReproduction,
            Gene::Planting => Reporter::AvgPlanting,
        }
    }
}

/// Reporter values measured at the end of one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub tick: Tick,
    pub values: BTreeMap<Reporter, f64>,
}

impl StepRecord {
    /// Value of a reporter; 0.0 if it was not measured.
    pub fn get(&self, reporter: Reporter) -> f64 {
        self.values.get(&reporter).copied().unwrap_or(0.0)
    }
}

/// Pull-based store of step records.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DataCollector {
    records: Vec<StepRecord>,
}

impl DataCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(&mut self, record: StepRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&StepRecord> {
        self.records.last()
    }

    /// One reporter across every collected step.
    pub fn series(&self, reporter: Reporter) -> Vec<f64> {
        self.records.iter().map(|r| r.get(reporter)).collect()
    }

    /// Like [`DataCollector::series`], looked up by reporter name.
    pub fn series_named(&self, name: &str) -> Option<Vec<f64>> {
        Reporter::from_name(name).map(|r| self.series(r))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Mean of an iterator; 0.0 when it is empty.
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Measure every reporter on the model's current state.
pub fn measure(model: &Model) -> StepRecord {
    let organisms: Vec<_> = model.organisms().collect();
    let count = organisms.len();
    let cooperators = organisms.iter().filter(|o| o.is_cooperator()).count();
    let of_species = |s: Species| organisms.iter().filter(|o| o.species() == s).count() as f64;

    let mut values = BTreeMap::new();
    values.insert(Reporter::Organisms, count as f64);
    values.insert(Reporter::Structures, model.structures().count() as f64);
    values.insert(Reporter::Tiles, model.tile_count() as f64);
    values.insert(Reporter::Cooperators, cooperators as f64);
    values.insert(Reporter::Freeloaders, (count - cooperators) as f64);
    values.insert(Reporter::Enrichers, of_species(Species::Enricher));
    values.insert(Reporter::Consumers, of_species(Species::Consumer));
    values.insert(
        Reporter::MeanEnergy,
        mean(organisms.iter().map(|o| o.energy())),
    );
    values.insert(Reporter::MeanResource, model.environment().mean_level());
    values.insert(
        Reporter::MeanLifespan,
        mean(model.dead_ages().iter().map(|a| *a as f64)),
    );
    for gene in Gene::ALL {
        values.insert(
            Reporter::average_of(gene),
            mean(organisms.iter().map(|o| o.dna().get(gene))),
        );
    }
    values.insert(Reporter::Births, model.births_this_step() as f64);
    values.insert(Reporter::Deaths, model.deaths_this_step() as f64);

    StepRecord {
        tick: model.tick(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reporter_names_round_trip() {
        for r in Reporter::ALL {
            assert_eq!(Reporter::from_name(r.name()), Some(r));
        }
        assert_eq!(Reporter::from_name("Nope"), None);
    }

    #[test]
    fn mean_of_nothing_is_zero() {
        assert_eq!(mean(std::iter::empty::<f64>()), 0.0);
        assert_eq!(mean([1.0, 2.0, 3.0]), 2.0);
    }

    #[test]
    fn series_pulls_one_reporter() {
        let mut collector = DataCollector::new();
        for tick in 0..3 {
            collector.collect(StepRecord {
                tick,
                values: BTreeMap::from([(Reporter::Births, tick as f64)]),
            });
        }
        assert_eq!(collector.series(Reporter::Births), vec![0.0, 1.0, 2.0]);
        assert_eq!(collector.series(Reporter::Deaths), vec![0.0; 3]);
        assert_eq!(collector.series_named("Births").map(|s| s.len()), Some(3));
        assert_eq!(collector.latest().map(|r| r.tick), Some(2));
    }

    #[test]
    fn record_serializes_with_reporter_names() {
        let record = StepRecord {
            tick: 4,
            values: BTreeMap::from([(Reporter::MeanEnergy, 1.5)]),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"tick":4,"values":{"MeanEnergy":1.5}}"#);
    }
}
