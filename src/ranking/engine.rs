//! Rule chain evaluation.

use super::types::PriorityRule;

/// Width of the buckets scores are snapped to before comparison.
const TIE_EPSILON: f64 = 1e-9;

/// Snaps a score to its `TIE_EPSILON` bucket so that the comparison below
/// is a total order.
fn bucket(score: f64) -> f64 {
    (score / TIE_EPSILON).round()
}

/// Orders items by a chain of [`PriorityRule`]s.
///
/// # Examples
///
/// ```ignore
/// let engine = RuleEngine::new()
///     .with_rule(ShortestWindow)
///     .with_rule(RichestNutrition);
///
/// let order = engine.sort_indices(&candidates, &());
/// ```
pub struct RuleEngine<T, C> {
    rules: Vec<Box<dyn PriorityRule<T, C>>>,
}

impl<T, C> RuleEngine<T, C> {
    /// Creates an engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule to the chain.
    pub fn with_rule<R: PriorityRule<T, C> + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Returns the names of all rules in order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Sorts items by priority (lowest score first = highest priority).
    ///
    /// Returns indices into the original slice. Scores falling in the same
    /// 1e-9 bucket tie; items tied on every rule keep their original
    /// relative order. NaN scores sort last.
    pub fn sort_indices(&self, items: &[T], context: &C) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..items.len()).collect();
        if self.rules.is_empty() {
            return indices;
        }

        let keys: Vec<Vec<f64>> = items
            .iter()
            .map(|item| {
                self.rules
                    .iter()
                    .map(|r| bucket(r.score(item, context)))
                    .collect()
            })
            .collect();

        indices.sort_by(|&a, &b| {
            keys[a]
                .iter()
                .zip(&keys[b])
                .map(|(ka, kb)| ka.total_cmp(kb))
                .find(|o| o.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        indices
    }
}

impl<T, C> Default for RuleEngine<T, C> {
    fn default() -> Self {
        Self::new()
    }
}
