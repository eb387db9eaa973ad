use thiserror::Error;

/// Errors raised while adapting penalty coefficients between tabu passes (§4.6).
#[derive(Debug, Error)]
pub enum PenaltyError {
    #[error("restart was triggered but no feasible incumbent has been recorded yet")]
    RestartWithoutIncumbent,
}
