//! Tournament selection.
//!
//! # References
//!
//! - Miller & Goldberg (1995), "Genetic Algorithms, Tournament Selection,
//!   and the Effects of Noise"
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::types::Individual;
use rand::Rng;

/// Picks `k` individuals uniformly with replacement and returns the index
/// of the fittest (lowest fitness, first one on ties).
///
/// Returns `None` for an empty population. `k = 0` behaves like `k = 1`.
pub fn tournament<I: Individual, R: Rng>(population: &[I], k: usize, rng: &mut R) -> Option<usize> {
    let n = population.len();
    if n == 0 {
        return None;
    }

    let mut best = rng.random_range(0..n);
    for _ in 1..k.max(1) {
        let idx = rng.random_range(0..n);
        if population[idx].fitness() < population[best].fitness() {
            best = idx;
        }
    }
    Some(best)
}

/// Selects `count` parents by repeated tournaments and clones them.
pub fn select_parents<I: Individual, R: Rng>(
    population: &[I],
    count: usize,
    k: usize,
    rng: &mut R,
) -> Vec<I> {
    (0..count)
        .filter_map(|_| tournament(population, k, rng))
        .map(|idx| population[idx].clone())
        .collect()
}
