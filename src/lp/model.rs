//! Continuous assignment model.

use good_lp::{
    constraint, microlp, variable, Constraint, Expression, ProblemVariables, ResolutionError,
    Solution, SolverModel, Variable,
};

use super::config::LpConfig;
use crate::cost::DistanceMetric;
use crate::snapshot::Snapshot;

/// `x[i, j, k] ≥ 0`: kilograms of item `i` carried to recipient `j` by
/// vehicle `k`, subject to item supply, vehicle capacity and recipient
/// demand.
pub struct AssignmentModel {
    vars: ProblemVariables,
    x: Vec<Variable>,
    objective: Expression,
    constraints: Vec<Constraint>,
    recipients: usize,
    vehicles: usize,
}

impl AssignmentModel {
    pub fn build<M: DistanceMetric + ?Sized>(
        snapshot: &Snapshot,
        config: &LpConfig,
        metric: &M,
    ) -> Self {
        let (n_items, n_recipients, n_vehicles) = (
            snapshot.candidates.len(),
            snapshot.recipients.len(),
            snapshot.vehicles.len(),
        );
        let mut vars = ProblemVariables::new();
        let x: Vec<Variable> = (0..n_items * n_recipients * n_vehicles)
            .map(|_| vars.add(variable().min(0.0)))
            .collect();

        let mut model = Self {
            vars,
            x,
            objective: Expression::from(0.0),
            constraints: Vec::with_capacity(n_items + n_recipients + n_vehicles),
            recipients: n_recipients,
            vehicles: n_vehicles,
        };

        let mut objective = Expression::from(0.0);
        for (i, c) in snapshot.candidates.iter().enumerate() {
            let spoilage = config.perishability_weight / c.item.perishability_hours.max(1e-6);
            for (j, r) in snapshot.recipients.iter().enumerate() {
                let delivery = metric.distance(c.donor.location, r.location);
                for (k, v) in snapshot.vehicles.iter().enumerate() {
                    let pickup = metric.distance(v.location, c.donor.location);
                    let unit_cost = pickup + delivery + spoilage - config.quantity_reward;
                    objective += unit_cost * model.var(i, j, k);
                }
            }
        }
        model.objective = objective;

        for (i, c) in snapshot.candidates.iter().enumerate() {
            let supply: Expression = (0..n_recipients)
                .flat_map(|j| (0..n_vehicles).map(move |k| (j, k)))
                .fold(Expression::from(0.0), |acc, (j, k)| acc + model.var(i, j, k));
            let bound = c.item.quantity_kg.max(0.0);
            model.constraints.push(constraint!(supply <= bound));
        }
        for (k, v) in snapshot.vehicles.iter().enumerate() {
            let load: Expression = (0..n_items)
                .flat_map(|i| (0..n_recipients).map(move |j| (i, j)))
                .fold(Expression::from(0.0), |acc, (i, j)| acc + model.var(i, j, k));
            let bound = v.capacity_kg.max(0.0);
            model.constraints.push(constraint!(load <= bound));
        }
        for (j, r) in snapshot.recipients.iter().enumerate() {
            let received: Expression = (0..n_items)
                .flat_map(|i| (0..n_vehicles).map(move |k| (i, k)))
                .fold(Expression::from(0.0), |acc, (i, k)| acc + model.var(i, j, k));
            let bound = r.current_demand.max(0.0);
            model.constraints.push(constraint!(received <= bound));
        }

        model
    }

    fn var(&self, i: usize, j: usize, k: usize) -> Variable {
        self.x[(i * self.recipients + j) * self.vehicles + k]
    }

    /// Number of decision variables.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Solves with the pure-Rust simplex backend and returns
    /// `x` in `(i, j, k)` lexicographic order.
    pub fn solve(self) -> Result<Vec<f64>, ResolutionError> {
        let mut problem = self.vars.minimise(self.objective).using(microlp);
        for c in self.constraints {
            problem = problem.with(c);
        }
        let solution = problem.solve()?;
        Ok(self.x.iter().map(|&v| solution.value(v)).collect())
    }
}
