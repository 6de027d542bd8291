//! Allocation and routing optimizers for perishable food redistribution.
//!
//! Donors hold perishable items, recipients carry demand with a priority
//! tier, and an optional vehicle fleet moves food between them. Every pass
//! takes an immutable [`Snapshot`](snapshot::Snapshot) and returns a
//! [`Plan`](plan::Plan): grouped assignments of derived items plus the
//! state deltas the host applies afterwards.
//!
//! Four interchangeable strategies:
//!
//! - **Greedy**: deterministic priority floor and best-fit pass, no vehicles.
//! - **Genetic Algorithm (GA)**: evolves item → (recipient, vehicle,
//!   quantity) assignments under a penalised travel cost.
//! - **Ant Colony Optimization (ACO)**: per-vehicle pickup/drop-off tours
//!   guided by pheromone, distance and urgency.
//! - **Linear Programming (LP)**: a transportation model solved exactly.
//!
//! [`strategy::Strategy`] selects one from configuration;
//! [`network::Network`] is a small host that builds snapshots and applies
//! plans.
//!
//! # Architecture
//!
//! Optimizers never mutate their input. Randomness is passed in as
//! `&mut impl Rng`, so a seeded generator replays a pass exactly. Distances
//! go through [`cost::DistanceMetric`], planar Euclidean by default.

pub mod aco;
pub mod cost;
pub mod error;
pub mod ga;
pub mod greedy;
pub mod lp;
pub mod models;
pub mod network;
pub mod plan;
pub mod random;
pub mod ranking;
pub mod snapshot;
pub mod strategy;
