//! Crate-wide error type composed from each module boundary's own error enum.

use thiserror::Error;

/// Top-level error surfaced by the public API (the builder and [`crate::solve`]).
///
/// Every variant wraps a module-boundary error so callers can match on the
/// originating subsystem while still getting one error type at the edge.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error(transparent)]
    Model(#[from] crate::model::ModelError),

    #[error(transparent)]
    Presolve(#[from] crate::presolve::PresolveError),

    #[error(transparent)]
    TabuSearch(#[from] crate::tabu_search::TabuSearchError),

    #[error(transparent)]
    Neighborhood(#[from] crate::neighborhood::NeighborhoodError),

    #[error(transparent)]
    Penalty(#[from] crate::penalty::PenaltyError),

    #[error(transparent)]
    Options(#[from] crate::options::OptionsError),
}
