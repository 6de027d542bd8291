//! Generational loop.
//!
//! Each generation selects a full set of parents by tournament, mates
//! consecutive pairs with probability `crossover_rate`, mutates every
//! offspring with probability `mutation_rate`, evaluates, and replaces the
//! population (minus any elites). A hall of fame of size one keeps the best
//! individual ever evaluated.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rand::Rng;
use rayon::prelude::*;

use super::config::GaConfig;
use super::selection::select_parents;
use super::types::{GaProblem, Individual};
use crate::error::ConfigError;
use crate::random::rng_from;

/// Outcome of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// Best individual ever evaluated.
    pub best: I,

    pub best_fitness: f64,

    /// Generations actually executed.
    pub generations: usize,

    /// Stopped by the stagnation limit.
    pub stagnated: bool,

    /// Stopped by the wall-clock limit.
    pub timed_out: bool,

    /// Stopped through the cancellation flag.
    pub cancelled: bool,

    /// Hall-of-fame fitness after initialisation and after every
    /// generation.
    pub fitness_history: Vec<f64>,
}

/// Executes the generational loop.
///
/// # Examples
///
/// ```ignore
/// let config = GaConfig::default().with_seed(42).with_parallel(false);
/// let result = GaRunner::run(&problem, &config)?;
/// println!("best: {}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs with a generator built from `config.seed`.
    pub fn run<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
    ) -> Result<GaResult<P::Individual>, ConfigError> {
        let mut rng = rng_from(config.seed);
        Self::run_with_rng(problem, config, &mut rng)
    }

    /// Runs with the caller's generator.
    pub fn run_with_rng<P: GaProblem, R: Rng>(
        problem: &P,
        config: &GaConfig,
        rng: &mut R,
    ) -> Result<GaResult<P::Individual>, ConfigError> {
        Self::run_with_cancel(problem, config, rng, None)
    }

    /// Runs until done or until `cancel` is raised.
    ///
    /// The flag is polled at the start of each generation; the best
    /// individual found so far is returned.
    pub fn run_with_cancel<P: GaProblem, R: Rng>(
        problem: &P,
        config: &GaConfig,
        rng: &mut R,
        cancel: Option<&AtomicBool>,
    ) -> Result<GaResult<P::Individual>, ConfigError> {
        config.validate()?;
        let started = Instant::now();
        let population_size = config.population_size;
        let elites = config.elite_count();

        let mut population: Vec<P::Individual> = (0..population_size)
            .map(|_| problem.create_individual(rng))
            .collect();
        evaluate(problem, &mut population, config.parallel);

        let mut best = population[fittest(&population)].clone();
        let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
        fitness_history.push(best.fitness());

        let mut generations = 0;
        let mut stagnation = 0usize;
        let mut stagnated = false;
        let mut timed_out = false;
        let mut cancelled = false;

        for gen in 0..config.max_generations {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                cancelled = true;
                break;
            }
            if let Some(limit) = config.time_limit_ms {
                if started.elapsed().as_millis() >= u128::from(limit) {
                    timed_out = true;
                    break;
                }
            }

            let mut next: Vec<P::Individual> = if elites > 0 {
                let mut order: Vec<usize> = (0..population.len()).collect();
                order.sort_by(|&a, &b| {
                    population[a]
                        .fitness()
                        .partial_cmp(&population[b].fitness())
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                order[..elites].iter().map(|&i| population[i].clone()).collect()
            } else {
                Vec::with_capacity(population_size)
            };

            let mut offspring = select_parents(
                &population,
                population_size - elites,
                config.tournament_size,
                rng,
            );

            for i in (1..offspring.len()).step_by(2) {
                if rng.random::<f64>() < config.crossover_rate {
                    let (head, tail) = offspring.split_at_mut(i);
                    problem.crossover(&mut head[i - 1], &mut tail[0], rng);
                }
            }
            for child in offspring.iter_mut() {
                if rng.random::<f64>() < config.mutation_rate {
                    problem.mutate(child, rng);
                }
            }

            evaluate(problem, &mut offspring, config.parallel);
            next.extend(offspring);
            population = next;
            generations = gen + 1;

            let champion = &population[fittest(&population)];
            if champion.fitness() < best.fitness() {
                best = champion.clone();
                stagnation = 0;
            } else {
                stagnation += 1;
            }
            fitness_history.push(best.fitness());

            tracing::trace!(generation = generations, best = best.fitness(), "ga generation");

            if config.stagnation_limit > 0 && stagnation >= config.stagnation_limit {
                stagnated = true;
                break;
            }
        }

        Ok(GaResult {
            best_fitness: best.fitness(),
            best,
            generations,
            stagnated,
            timed_out,
            cancelled,
            fitness_history,
        })
    }
}

fn evaluate<P: GaProblem>(problem: &P, population: &mut [P::Individual], parallel: bool) {
    if parallel {
        population.par_iter_mut().for_each(|ind| {
            let f = problem.evaluate(ind);
            ind.set_fitness(f);
        });
    } else {
        for ind in population.iter_mut() {
            let f = problem.evaluate(ind);
            ind.set_fitness(f);
        }
    }
}

/// Index of the lowest-fitness individual (first on ties, 0 when empty).
fn fittest<I: Individual>(population: &[I]) -> usize {
    let mut best = 0;
    for (i, ind) in population.iter().enumerate().skip(1) {
        if ind.fitness() < population[best].fitness() {
            best = i;
        }
    }
    best
}
