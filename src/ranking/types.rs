//! Core trait for priority rules.

/// A scoring rule that assigns a priority value to an item.
///
/// Rules return `f64` scores where **lower is higher priority**. To rank
/// larger values first, negate them.
///
/// # Examples
///
/// ```
/// use u_foodnet::ranking::PriorityRule;
/// use u_foodnet::snapshot::Candidate;
///
/// // Soonest-to-spoil first.
/// struct ShortestWindow;
///
/// impl PriorityRule<Candidate, ()> for ShortestWindow {
///     fn name(&self) -> &str { "ShortestWindow" }
///     fn score(&self, c: &Candidate, _ctx: &()) -> f64 {
///         c.item.perishability_hours
///     }
/// }
/// ```
pub trait PriorityRule<T, C>: Send + Sync {
    /// Returns the name of this rule.
    fn name(&self) -> &str;

    /// Computes a priority score for the given item.
    ///
    /// Lower scores indicate higher priority.
    fn score(&self, item: &T, context: &C) -> f64;
}
