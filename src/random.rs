//! Seedable random sources and weighted sampling.
//!
//! Every stochastic routine in this crate takes `&mut R where R: Rng`
//! explicitly; nothing reads a global generator. [`create_rng`] gives a
//! reproducible source for tests and replays.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates a deterministic generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from an optional seed (`None` draws a random seed).
pub fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}

/// Roulette-wheel choice of an index proportional to `weights`.
///
/// Negative and non-finite weights count as zero. When the total weight is
/// zero or NaN the choice falls back to a uniform draw over all candidates.
/// Returns `None` only for an empty slice.
///
/// # Examples
///
/// ```
/// use u_foodnet::random::{create_rng, roulette};
///
/// let mut rng = create_rng(7);
/// assert_eq!(roulette(&[0.0, 5.0, 0.0], &mut rng), Some(1));
/// assert!(roulette(&[0.0, 0.0], &mut rng).is_some());
/// assert_eq!(roulette(&[], &mut rng), None);
/// ```
pub fn roulette<R: Rng>(weights: &[f64], rng: &mut R) -> Option<usize> {
    let n = weights.len();
    if n == 0 {
        return None;
    }

    let clean = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
    let total: f64 = weights.iter().map(|&w| clean(w)).sum();
    if total.is_nan() || total <= 0.0 || !total.is_finite() {
        return Some(rng.random_range(0..n));
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (i, &w) in weights.iter().enumerate() {
        let w = clean(w);
        if w > 0.0 {
            last_positive = i;
        }
        cumulative += w;
        if cumulative > threshold {
            return Some(i);
        }
    }

    Some(last_positive) // floating-point fallback
}
