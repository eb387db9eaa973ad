use thiserror::Error;

/// Errors raised while assembling the neighborhood's generator set (§4.3).
#[derive(Debug, Error)]
pub enum NeighborhoodError {
    #[error("neighborhood.is_enabled_user_defined_move is set but no user-defined move callback was supplied")]
    MissingUserDefinedCallback,
}
