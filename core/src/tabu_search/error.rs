use thiserror::Error;

/// Errors raised while constructing or driving the tabu-search core (§4.5).
#[derive(Debug, Error)]
pub enum TabuSearchError {
    #[error("model has {0} variables, which exceeds the u32 id space this solver indexes into")]
    TooManyVariables(usize),
}
