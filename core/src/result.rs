//! Solve result record (§6 "Result").

use crate::{ConstraintID, VariableID};
use std::collections::BTreeMap;

/// One feasible assignment observed during the search, recorded only when
/// `is_enabled_store_feasible_solutions` is set.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeasibleIncumbentRecord {
    pub iteration: u64,
    pub objective: f64,
    pub values: BTreeMap<VariableID, i64>,
}

/// Outcome of a [`crate::solve`] call.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SolverResult {
    pub incumbent_objective: f64,
    pub is_feasible: bool,
    pub total_violation: f64,
    pub values: BTreeMap<VariableID, i64>,
    pub violations: BTreeMap<ConstraintID, f64>,
    pub total_iterations: u64,
    pub total_outer_iterations: u64,
    pub elapsed_seconds: f64,
    /// Iteration index at which each accepted feasible incumbent was found, paired
    /// with the assignment, present only when requested via `Options`.
    pub feasible_incumbent_history: Option<Vec<FeasibleIncumbentRecord>>,
    /// Iteration indices at which any move was accepted, present only when requested.
    pub accept_timestamps: Option<Vec<u64>>,
}
