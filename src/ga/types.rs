//! Trait contract between the GA engine and a concrete problem.

use rand::Rng;

/// A candidate solution carrying its own fitness.
///
/// Fitness is minimised. The engine stores it through
/// [`set_fitness`](Individual::set_fitness) after every evaluation.
pub trait Individual: Clone + Send + Sync {
    fn fitness(&self) -> f64;

    fn set_fitness(&mut self, fitness: f64);
}

/// A problem the generational engine can evolve.
///
/// `Send + Sync` because [`GaRunner`](super::GaRunner) may evaluate the
/// population on rayon. Evaluation must be pure: all randomness goes
/// through the generator handed to the other methods, which the engine
/// only ever touches on the calling thread.
pub trait GaProblem: Send + Sync {
    type Individual: Individual;

    /// Samples a fresh individual for the initial population.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Fitness of an individual (lower is better).
    fn evaluate(&self, individual: &Self::Individual) -> f64;

    /// Recombines two mates in place.
    ///
    /// The default leaves both unchanged.
    fn crossover<R: Rng>(
        &self,
        _first: &mut Self::Individual,
        _second: &mut Self::Individual,
        _rng: &mut R,
    ) {
    }

    /// Perturbs an individual in place. The default is a no-op.
    fn mutate<R: Rng>(&self, _individual: &mut Self::Individual, _rng: &mut R) {}
}
