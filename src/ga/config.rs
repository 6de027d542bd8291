//! GA configuration.

use crate::error::ConfigError;

/// Parameters of the generational loop.
///
/// Defaults follow the small-instance sizing of
/// [`for_item_count`](GaConfig::for_item_count): population 100,
/// 50 generations, crossover 0.7, mutation 0.2, tournament of 3, no
/// elitism, no stagnation stop.
///
/// # Examples
///
/// ```
/// use u_foodnet::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(40)
///     .with_max_generations(20)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
///
/// let large = GaConfig::for_item_count(250);
/// assert_eq!(large.population_size, 300);
/// assert_eq!(large.max_generations, 150);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of individuals per generation.
    pub population_size: usize,

    pub max_generations: usize,

    /// Aspirants per tournament.
    pub tournament_size: usize,

    /// Fraction of the population copied unchanged into the next
    /// generation. 0 reproduces a plain generational replacement.
    pub elite_ratio: f64,

    /// Probability of mating each consecutive pair of parents.
    pub crossover_rate: f64,

    /// Probability of mutating each offspring.
    pub mutation_rate: f64,

    /// Generations without improvement before stopping (0 disables).
    pub stagnation_limit: usize,

    /// Evaluate offspring on rayon.
    pub parallel: bool,

    /// Fixed seed. When set, the optimizer ignores the generator it is
    /// handed and runs from this seed instead.
    pub seed: Option<u64>,

    /// Wall-clock budget, checked at the start of every generation.
    pub time_limit_ms: Option<u64>,

    /// Re-size population, generations and crossover rate from the item
    /// count of every pass (see [`sized_for`](GaConfig::sized_for)). The
    /// explicit sizing setters turn this off.
    pub adaptive_sizing: bool,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 50,
            tournament_size: 3,
            elite_ratio: 0.0,
            crossover_rate: 0.7,
            mutation_rate: 0.2,
            stagnation_limit: 0,
            parallel: true,
            seed: None,
            time_limit_ms: None,
            adaptive_sizing: true,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self.adaptive_sizing = false;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self.adaptive_sizing = false;
        self
    }

    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the elite ratio, clamped to `[0, 1]`.
    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover rate, clamped to `[0, 1]`.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self.adaptive_sizing = false;
        self
    }

    pub fn with_adaptive_sizing(mut self, adaptive: bool) -> Self {
        self.adaptive_sizing = adaptive;
        self
    }

    /// Sets the mutation rate, clamped to `[0, 1]`.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Fixed sizing for a pass over `item_count` candidate items.
    ///
    /// | items   | population | generations | crossover |
    /// |---------|-----------:|------------:|----------:|
    /// | ≤ 100   | 100        | 50          | 0.7       |
    /// | ≤ 200   | 200        | 100         | 0.9       |
    /// | > 200   | 300        | 150         | 0.9       |
    pub fn for_item_count(item_count: usize) -> Self {
        Self {
            adaptive_sizing: false,
            ..Self::default().resized(item_count)
        }
    }

    /// The configuration a pass over `item_count` items runs with.
    ///
    /// With `adaptive_sizing` on, population, generations and crossover
    /// rate follow the [`for_item_count`](GaConfig::for_item_count) table;
    /// otherwise the configuration is returned unchanged.
    pub fn sized_for(&self, item_count: usize) -> Self {
        if self.adaptive_sizing {
            self.clone().resized(item_count)
        } else {
            self.clone()
        }
    }

    fn resized(mut self, item_count: usize) -> Self {
        let (population_size, max_generations, crossover_rate) = if item_count > 200 {
            (300, 150, 0.9)
        } else if item_count > 100 {
            (200, 100, 0.9)
        } else {
            (100, 50, 0.7)
        };
        self.population_size = population_size;
        self.max_generations = max_generations;
        self.crossover_rate = crossover_rate;
        self
    }

    /// Number of elites carried per generation.
    pub fn elite_count(&self) -> usize {
        (self.population_size as f64 * self.elite_ratio) as usize
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::TooSmall {
                name: "population_size",
                min: 2,
                value: self.population_size,
            });
        }
        if self.max_generations == 0 {
            return Err(ConfigError::TooSmall {
                name: "max_generations",
                min: 1,
                value: 0,
            });
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::TooSmall {
                name: "tournament_size",
                min: 1,
                value: 0,
            });
        }
        for (name, value) in [
            ("elite_ratio", self.elite_ratio),
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    name,
                    lo: 0.0,
                    hi: 1.0,
                    value,
                });
            }
        }
        let elites = self.elite_count();
        if elites >= self.population_size {
            return Err(ConfigError::EliteOverflow {
                elites,
                population: self.population_size,
            });
        }
        if self.time_limit_ms == Some(0) {
            return Err(ConfigError::ZeroTimeLimit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.max_generations, 50);
        assert_eq!(config.tournament_size, 3);
        assert_eq!(config.elite_count(), 0);
        assert!((config.crossover_rate - 0.7).abs() < 1e-12);
        assert!((config.mutation_rate - 0.2).abs() < 1e-12);
        assert_eq!(config.stagnation_limit, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sizing_thresholds() {
        assert_eq!(GaConfig::for_item_count(0).population_size, 100);
        assert_eq!(GaConfig::for_item_count(100).max_generations, 50);
        let mid = GaConfig::for_item_count(101);
        assert_eq!((mid.population_size, mid.max_generations), (200, 100));
        assert!((mid.crossover_rate - 0.9).abs() < 1e-12);
        assert_eq!(GaConfig::for_item_count(201).population_size, 300);
    }

    #[test]
    fn test_adaptive_sizing_follows_item_count() {
        let config = GaConfig::default().with_mutation_rate(0.3);
        assert!(config.adaptive_sizing);
        let sized = config.sized_for(150);
        assert_eq!((sized.population_size, sized.max_generations), (200, 100));
        assert!((sized.crossover_rate - 0.9).abs() < 1e-12);
        assert!((sized.mutation_rate - 0.3).abs() < 1e-12);
        assert_eq!(config.sized_for(250).max_generations, 150);
        assert_eq!(config.sized_for(3).population_size, 100);
    }

    #[test]
    fn test_explicit_sizing_wins() {
        let config = GaConfig::default().with_max_generations(7);
        assert!(!config.adaptive_sizing);
        assert_eq!(config.sized_for(250).max_generations, 7);
        assert_eq!(config.sized_for(250).population_size, 100);

        let fixed = GaConfig::for_item_count(150);
        assert_eq!(fixed.sized_for(5).population_size, 200);

        let reopened = GaConfig::for_item_count(150).with_adaptive_sizing(true);
        assert_eq!(reopened.sized_for(5).population_size, 100);
    }

    #[test]
    fn test_builders_clamp_rates() {
        let config = GaConfig::default()
            .with_crossover_rate(-0.5)
            .with_mutation_rate(2.0)
            .with_elite_ratio(0.1);
        assert_eq!(config.crossover_rate, 0.0);
        assert_eq!(config.mutation_rate, 1.0);
        assert_eq!(config.elite_count(), 10);
    }

    #[test]
    fn test_validate_errors() {
        assert!(matches!(
            GaConfig::default().with_population_size(1).validate(),
            Err(ConfigError::TooSmall {
                name: "population_size",
                ..
            })
        ));
        assert!(GaConfig::default().with_max_generations(0).validate().is_err());
        assert!(GaConfig::default().with_tournament_size(0).validate().is_err());
        assert!(matches!(
            GaConfig::default()
                .with_population_size(10)
                .with_elite_ratio(1.0)
                .validate(),
            Err(ConfigError::EliteOverflow { .. })
        ));
        assert_eq!(
            GaConfig::default().with_time_limit_ms(0).validate(),
            Err(ConfigError::ZeroTimeLimit)
        );

        let mut raw = GaConfig::default();
        raw.mutation_rate = 1.5;
        assert!(matches!(
            raw.validate(),
            Err(ConfigError::OutOfRange {
                name: "mutation_rate",
                ..
            })
        ));
    }
}
