use thiserror::Error;

#[derive(Debug, Error)]
pub enum PresolveError {
    #[error(transparent)]
    Bound(#[from] crate::bound::BoundError),
}
