//! DNA — the organism's resource-allocation genome.
//!
//! DNA is a probability simplex over a fixed set of genes: every weight is
//! at least [`DNA_FLOOR`] and the weights sum to 1.0. The weights double as
//! action-selection probabilities, so a gene that reached zero could never
//! be selected again and would stop evolving. The floor keeps every gene
//! mutable and selectable.
//!
//! All constructors and operators return normalized DNA.

use rand::seq::index;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Smallest weight any gene may carry.
pub const DNA_FLOOR: f64 = 0.001;

/// Tolerance used when checking the simplex invariant.
pub const SIMPLEX_TOLERANCE: f64 = 1e-9;

/// A named DNA trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gene {
    Cooperation,
    Consumption,
    Metabolism,
    Builder,
    Movement,
    Reproduction,
    Planting,
}

impl Gene {
    pub const COUNT: usize = 7;

    /// Canonical gene order, used for vector views and crossover.
    pub const ALL: [Gene; Gene::COUNT] = [
        Gene::Cooperation,
        Gene::Consumption,
        Gene::Metabolism,
        Gene::Builder,
        Gene::Movement,
        Gene::Reproduction,
        Gene::Planting,
    ];

    pub fn index(&self) -> usize {
        match self {
            Gene::Cooperation => 0,
            Gene::Consumption => 1,
            Gene::Metabolism => 2,
            Gene::Builder => 3,
            Gene::Movement => 4,
            Gene::Reproduction => 5,
            Gene::Planting => 6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Gene::Cooperation => "cooperation",
            Gene::Consumption => "consumption",
            Gene::Metabolism => "metabolism",
            Gene::Builder => "builder",
            Gene::Movement => "movement",
            Gene::Reproduction => "reproduction",
            Gene::Planting => "planting",
        }
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mutation parameters shared by in-simulation reproduction and the
/// external evolutionary loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutationParams {
    /// Probability that an offspring's DNA is mutated at all.
    pub rate: f64,
    /// Standard deviation of the per-gene Gaussian noise.
    pub scale: f64,
}

impl Default for MutationParams {
    fn default() -> Self {
        Self {
            rate: 0.01,
            scale: 0.05,
        }
    }
}

/// Simplex-normalized genome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Gene, f64>", into = "BTreeMap<Gene, f64>")]
pub struct Dna {
    weights: [f64; Gene::COUNT],
}

impl Dna {
    /// Every gene carries the same weight.
    pub fn uniform() -> Self {
        Self {
            weights: [1.0 / Gene::COUNT as f64; Gene::COUNT],
        }
    }

    /// Independent uniform draws per gene, normalized.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut raw = [0.0; Gene::COUNT];
        for w in raw.iter_mut() {
            *w = rng.random::<f64>();
        }
        Self::from_raw(raw)
    }

    /// Build DNA from arbitrary weights. Missing genes start at zero;
    /// everything is floored and renormalized.
    pub fn from_weights(weights: impl IntoIterator<Item = (Gene, f64)>) -> Self {
        let mut raw = [0.0; Gene::COUNT];
        for (gene, w) in weights {
            raw[gene.index()] = w;
        }
        Self::from_raw(raw)
    }

    /// Build DNA from a vector in canonical gene order.
    pub fn from_raw(raw: [f64; Gene::COUNT]) -> Self {
        Self {
            weights: redistribute(raw, [false; Gene::COUNT]),
        }
    }

    /// Build DNA from a slice in canonical gene order. Returns `None`
    /// unless the slice has exactly one value per gene.
    pub fn from_vec(values: &[f64]) -> Option<Self> {
        let raw: [f64; Gene::COUNT] = values.try_into().ok()?;
        Some(Self::from_raw(raw))
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.weights.to_vec()
    }

    pub fn get(&self, gene: Gene) -> f64 {
        self.weights[gene.index()]
    }

    /// Weights in canonical gene order.
    pub fn as_array(&self) -> &[f64; Gene::COUNT] {
        &self.weights
    }

    pub fn iter(&self) -> impl Iterator<Item = (Gene, f64)> + '_ {
        Gene::ALL.iter().map(move |g| (*g, self.weights[g.index()]))
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Whether the simplex invariant holds.
    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() <= SIMPLEX_TOLERANCE
            && self.weights.iter().all(|w| *w >= DNA_FLOOR - SIMPLEX_TOLERANCE)
    }

    /// Perturb every gene with independent Gaussian noise N(0, scale),
    /// floor at [`DNA_FLOOR`] and renormalize.
    ///
    /// A scale of zero (or any non-positive scale) returns an exact copy.
    pub fn mutate<R: Rng + ?Sized>(&self, rng: &mut R, scale: f64) -> Self {
        if !(scale > 0.0) {
            return self.clone();
        }
        let noise = match Normal::new(0.0, scale) {
            Ok(n) => n,
            Err(_) => return self.clone(),
        };
        let mut raw = self.weights;
        for w in raw.iter_mut() {
            *w += noise.sample(rng);
        }
        Self::from_raw(raw)
    }

    /// Inherit DNA: mutated with probability `params.rate`, otherwise an
    /// exact copy.
    pub fn inherit<R: Rng + ?Sized>(&self, rng: &mut R, params: &MutationParams) -> Self {
        if params.rate > 0.0 && rng.random::<f64>() < params.rate {
            self.mutate(rng, params.scale)
        } else {
            self.clone()
        }
    }

    /// k-point crossover over the canonical gene vector.
    ///
    /// `points` distinct cut points are drawn from `1..COUNT` and sorted;
    /// segments alternate between the parents starting with `a`. The
    /// result is floored and renormalized. `points` is clamped to
    /// `COUNT - 1`; zero points returns a copy of `a`.
    pub fn crossover<R: Rng + ?Sized>(a: &Dna, b: &Dna, points: usize, rng: &mut R) -> Dna {
        let k = points.min(Gene::COUNT - 1);
        if k == 0 {
            return a.clone();
        }
        let mut cuts: Vec<usize> = index::sample(rng, Gene::COUNT - 1, k)
            .into_iter()
            .map(|i| i + 1)
            .collect();
        cuts.sort_unstable();

        let mut raw = [0.0; Gene::COUNT];
        let mut from_a = true;
        let mut next_cut = cuts.iter().peekable();
        for (i, w) in raw.iter_mut().enumerate() {
            if next_cut.peek().is_some_and(|c| **c == i) {
                from_a = !from_a;
                next_cut.next();
            }
            *w = if from_a { a.weights[i] } else { b.weights[i] };
        }
        Dna::from_raw(raw)
    }

    /// Fix some genes to given values and rescale the rest so the
    /// simplex invariant still holds.
    ///
    /// Pinned values are clamped so every other gene can keep its floor.
    /// DNA whose genes already sit exactly at their pins is returned
    /// unchanged, so pinning is idempotent bit for bit.
    pub fn pinned(&self, pins: &[(Gene, f64)]) -> Self {
        let free_after = Gene::COUNT.saturating_sub(pins.len());
        let max_pinned_total = 1.0 - free_after as f64 * DNA_FLOOR;
        let requested: f64 = pins.iter().map(|(_, v)| v.max(DNA_FLOOR)).sum();
        let shrink = if requested > max_pinned_total {
            max_pinned_total / requested
        } else {
            1.0
        };
        let target = |value: f64| (value.max(DNA_FLOOR) * shrink).max(DNA_FLOOR);
        if pins.iter().all(|(gene, value)| self.get(*gene) == target(*value)) {
            return self.clone();
        }

        let mut raw = self.weights;
        let mut locked = [false; Gene::COUNT];
        for (gene, value) in pins {
            raw[gene.index()] = target(*value);
            locked[gene.index()] = true;
        }
        Self {
            weights: redistribute(raw, locked),
        }
    }

    /// Fix a single gene; shorthand for [`Dna::pinned`].
    pub fn pin(&self, gene: Gene, value: f64) -> Self {
        self.pinned(&[(gene, value)])
    }

    /// Euclidean distance between two genomes.
    pub fn distance(&self, other: &Dna) -> f64 {
        self.weights
            .iter()
            .zip(other.weights.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    /// Genome whose genes are the per-gene means of `genomes`.
    ///
    /// Returns `None` for an empty slice.
    pub fn mean_weights(genomes: &[&Dna]) -> Option<[f64; Gene::COUNT]> {
        if genomes.is_empty() {
            return None;
        }
        let mut sums = [0.0; Gene::COUNT];
        for dna in genomes {
            for (s, w) in sums.iter_mut().zip(dna.weights.iter()) {
                *s += w;
            }
        }
        let n = genomes.len() as f64;
        Some(sums.map(|s| s / n))
    }
}

impl Default for Dna {
    fn default() -> Self {
        Self::uniform()
    }
}

impl From<BTreeMap<Gene, f64>> for Dna {
    fn from(map: BTreeMap<Gene, f64>) -> Self {
        Dna::from_weights(map)
    }
}

impl From<Dna> for BTreeMap<Gene, f64> {
    fn from(dna: Dna) -> Self {
        dna.iter().collect()
    }
}

/// Floor and renormalize `raw` onto the simplex.
///
/// Locked genes keep their value and use up part of the unit budget. Free
/// genes share what remains in proportion to their raw weight; any free
/// gene that would fall below the floor is set to the floor and the rest
/// are rescaled again.
fn redistribute(raw: [f64; Gene::COUNT], locked: [bool; Gene::COUNT]) -> [f64; Gene::COUNT] {
    let mut v = raw.map(|w| if w.is_finite() { w.max(0.0) } else { 0.0 });
    let locked_mass: f64 = (0..Gene::COUNT).filter(|i| locked[*i]).map(|i| v[i]).sum();
    let mut floored = [false; Gene::COUNT];

    loop {
        let free: Vec<usize> = (0..Gene::COUNT)
            .filter(|i| !locked[*i] && !floored[*i])
            .collect();
        let floored_count = floored.iter().filter(|f| **f).count();
        let budget = (1.0 - locked_mass - floored_count as f64 * DNA_FLOOR).max(0.0);

        if free.is_empty() {
            break;
        }

        let free_mass: f64 = free.iter().map(|i| v[*i]).sum();
        if free_mass <= 0.0 {
            let share = budget / free.len() as f64;
            for i in free {
                v[i] = share.max(DNA_FLOOR);
            }
            break;
        }

        let scale = budget / free_mass;
        let mut newly_floored = false;
        for &i in &free {
            if v[i] * scale < DNA_FLOOR {
                floored[i] = true;
                v[i] = DNA_FLOOR;
                newly_floored = true;
            }
        }
        if !newly_floored {
            for i in free {
                v[i] *= scale;
            }
            break;
        }
    }

    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn vec_view_needs_every_gene() {
        let dna = Dna::uniform();
        let back = Dna::from_vec(&dna.to_vec()).unwrap();
        assert!(back.distance(&dna) < 1e-12);
        assert!(Dna::from_vec(&[0.5, 0.5]).is_none());
    }

    #[test]
    fn repinning_is_exact() {
        let mut rng = ChaCha12Rng::seed_from_u64(21);
        let pins = [(Gene::Consumption, 0.35), (Gene::Planting, 0.05)];
        for _ in 0..50 {
            let once = Dna::random(&mut rng).pinned(&pins);
            assert_eq!(once.pinned(&pins), once);
        }
        let moved = Dna::uniform().pinned(&pins).pin(Gene::Consumption, 0.5);
        assert!((moved.get(Gene::Consumption) - 0.5).abs() < 1e-12);
        assert!(moved.is_normalized());
    }

    #[test]
    fn pin_single_gene() {
        let dna = Dna::uniform().pin(Gene::Builder, 0.5);
        assert!((dna.get(Gene::Builder) - 0.5).abs() < 1e-9);
        assert!(dna.is_normalized());
    }

    #[test]
    fn uniform_is_normalized() {
        let dna = Dna::uniform();
        assert!(dna.is_normalized());
        assert!((dna.get(Gene::Planting) - 1.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn zero_weights_are_floored() {
        let dna = Dna::from_weights([(Gene::Consumption, 1.0)]);
        assert!(dna.is_normalized());
        assert!((dna.get(Gene::Cooperation) - DNA_FLOOR).abs() < 1e-12);
        assert!((dna.get(Gene::Consumption) - (1.0 - 6.0 * DNA_FLOOR)).abs() < 1e-12);
    }

    #[test]
    fn normalized_input_is_preserved() {
        let dna = Dna::from_weights([
            (Gene::Cooperation, 0.4),
            (Gene::Consumption, 0.3),
            (Gene::Metabolism, 0.1),
            (Gene::Builder, 0.05),
            (Gene::Movement, 0.05),
            (Gene::Reproduction, 0.05),
            (Gene::Planting, 0.05),
        ]);
        let again = Dna::from_raw(*dna.as_array());
        assert!(dna.distance(&again) < 1e-12);
        assert!((dna.get(Gene::Cooperation) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn non_finite_weights_do_not_poison() {
        let dna = Dna::from_raw([f64::NAN, f64::INFINITY, -3.0, 1.0, 1.0, 1.0, 1.0]);
        assert!(dna.is_normalized());
    }

    #[test]
    fn mutation_keeps_simplex() {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let mut dna = Dna::uniform();
        for _ in 0..500 {
            dna = dna.mutate(&mut rng, 0.3);
            assert!(dna.is_normalized(), "broken simplex: {:?}", dna);
        }
    }

    #[test]
    fn zero_scale_mutation_is_identity() {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let dna = Dna::random(&mut rng);
        assert_eq!(dna.mutate(&mut rng, 0.0), dna);
    }

    #[test]
    fn mutation_changes_genome() {
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        let dna = Dna::uniform();
        let mutated = dna.mutate(&mut rng, 0.1);
        assert!(dna.distance(&mutated) > 0.0);
    }

    #[test]
    fn inherit_with_zero_rate_copies() {
        let mut rng = ChaCha12Rng::seed_from_u64(11);
        let dna = Dna::random(&mut rng);
        let params = MutationParams {
            rate: 0.0,
            scale: 1.0,
        };
        for _ in 0..50 {
            assert_eq!(dna.inherit(&mut rng, &params), dna);
        }
    }

    #[test]
    fn crossover_of_identical_parents_is_parent() {
        let mut rng = ChaCha12Rng::seed_from_u64(5);
        let dna = Dna::random(&mut rng);
        let child = Dna::crossover(&dna, &dna, 3, &mut rng);
        assert!(child.distance(&dna) < 1e-12);
    }

    #[test]
    fn crossover_takes_genes_from_both_parents() {
        let mut rng = ChaCha12Rng::seed_from_u64(9);
        let a = Dna::from_weights([(Gene::Cooperation, 1.0)]);
        let b = Dna::from_weights([(Gene::Planting, 1.0)]);
        // One cut: a prefix from `a`, a suffix from `b`, so cooperation
        // (first gene) comes from `a` and planting (last gene) from `b`.
        let child = Dna::crossover(&a, &b, 1, &mut rng);
        assert!(child.is_normalized());
        assert!(child.get(Gene::Cooperation) > 0.4);
        assert!(child.get(Gene::Planting) > 0.4);
    }

    #[test]
    fn crossover_clamps_points() {
        let mut rng = ChaCha12Rng::seed_from_u64(2);
        let a = Dna::random(&mut rng);
        let b = Dna::random(&mut rng);
        let child = Dna::crossover(&a, &b, 50, &mut rng);
        assert!(child.is_normalized());
    }

    #[test]
    fn pinning_fixes_values_and_keeps_simplex() {
        let dna = Dna::uniform().pinned(&[(Gene::Planting, 0.3), (Gene::Cooperation, 0.3)]);
        assert!(dna.is_normalized());
        assert!((dna.get(Gene::Planting) - 0.3).abs() < 1e-12);
        assert!((dna.get(Gene::Cooperation) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn oversized_pins_are_shrunk() {
        let dna = Dna::uniform().pinned(&[(Gene::Planting, 0.9), (Gene::Consumption, 0.9)]);
        assert!(dna.is_normalized());
        assert!((dna.get(Gene::Planting) - dna.get(Gene::Consumption)).abs() < 1e-12);
    }

    #[test]
    fn serde_uses_gene_names() {
        let dna = Dna::uniform();
        let json = serde_json::to_string(&dna).unwrap();
        assert!(json.contains("\"cooperation\""));
        let back: Dna = serde_json::from_str(&json).unwrap();
        assert!(back.distance(&dna) < 1e-12);
    }

    #[test]
    fn mean_weights_of_empty_is_none() {
        assert!(Dna::mean_weights(&[]).is_none());
        let a = Dna::uniform();
        let mean = Dna::mean_weights(&[&a, &a]).unwrap();
        assert!((mean.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }
}
