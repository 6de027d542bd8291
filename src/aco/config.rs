//! ACO configuration.

use crate::error::ConfigError;

/// Colony parameters.
///
/// # Examples
///
/// ```
/// use u_foodnet::aco::AcoConfig;
///
/// let config = AcoConfig::default().with_ants(10).with_seed(3);
/// assert_eq!(config.n_ants, 10);
/// assert_eq!(config.n_iterations, 20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoConfig {
    /// Ants per iteration.
    pub n_ants: usize,

    pub n_iterations: usize,

    /// Pheromone exponent α.
    pub alpha: f64,

    /// Inverse-distance exponent β.
    pub beta: f64,

    /// Urgency exponent γ.
    pub gamma: f64,

    /// Evaporation rate ρ in (0, 1].
    pub rho: f64,

    /// Deposit constant: the iteration-best ant lays `q / score` per edge.
    pub q: f64,

    /// Iterations without a new global best before stopping (0 disables).
    pub patience: usize,

    /// Items closer to expiry than this are left out of the colony.
    pub min_hours_to_expiry: f64,

    /// Cost added per pick, multiplied by the node's urgency.
    pub urgency_surcharge: f64,

    /// Cost added per kilometre on top of fuel.
    pub distance_surcharge: f64,

    /// Fixed seed. When set, the optimizer ignores the generator it is
    /// handed.
    pub seed: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            n_ants: 5,
            n_iterations: 20,
            alpha: 1.0,
            beta: 3.0,
            gamma: 2.0,
            rho: 0.1,
            q: 1.0,
            patience: 5,
            min_hours_to_expiry: 1.0,
            urgency_surcharge: 100.0,
            distance_surcharge: 0.5,
            seed: None,
        }
    }
}

impl AcoConfig {
    pub fn with_ants(mut self, n: usize) -> Self {
        self.n_ants = n;
        self
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.n_iterations = n;
        self
    }

    /// Sets α, β and γ.
    pub fn with_exponents(mut self, alpha: f64, beta: f64, gamma: f64) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self.gamma = gamma;
        self
    }

    pub fn with_evaporation(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    pub fn with_deposit(mut self, q: f64) -> Self {
        self.q = q;
        self
    }

    pub fn with_patience(mut self, patience: usize) -> Self {
        self.patience = patience;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_ants == 0 {
            return Err(ConfigError::TooSmall {
                name: "n_ants",
                min: 1,
                value: 0,
            });
        }
        if self.n_iterations == 0 {
            return Err(ConfigError::TooSmall {
                name: "n_iterations",
                min: 1,
                value: 0,
            });
        }
        if !(self.rho > 0.0 && self.rho <= 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "rho",
                lo: 0.0,
                hi: 1.0,
                value: self.rho,
            });
        }
        for (name, value) in [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("gamma", self.gamma),
            ("q", self.q),
            ("min_hours_to_expiry", self.min_hours_to_expiry),
            ("urgency_surcharge", self.urgency_surcharge),
            ("distance_surcharge", self.distance_surcharge),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = AcoConfig::default();
        assert_eq!((c.n_ants, c.n_iterations, c.patience), (5, 20, 5));
        assert_eq!((c.alpha, c.beta, c.gamma), (1.0, 3.0, 2.0));
        assert!((c.rho - 0.1).abs() < 1e-12);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_invalid() {
        assert!(AcoConfig::default().with_ants(0).validate().is_err());
        assert!(AcoConfig::default().with_iterations(0).validate().is_err());
        assert!(AcoConfig::default().with_evaporation(0.0).validate().is_err());
        assert!(AcoConfig::default().with_evaporation(1.0).validate().is_ok());
        assert!(matches!(
            AcoConfig::default().with_exponents(1.0, -3.0, 2.0).validate(),
            Err(ConfigError::Negative { name: "beta", .. })
        ));
    }
}
