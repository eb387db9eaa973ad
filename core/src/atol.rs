use ordered_float::NotNan;
use std::ops::Deref;

#[derive(Debug, thiserror::Error)]
pub enum ATolError {
    #[error("ATol must be positive: {0}")]
    NotPositive(f64),
    #[error("ATol must not be NaN")]
    NaN,
}

/// Absolute tolerance used when comparing constraint violations and bound margins against zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ATol(NotNan<f64>);

impl Deref for ATol {
    type Target = f64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ATol {
    pub fn new(value: f64) -> Result<Self, ATolError> {
        if value.is_nan() {
            return Err(ATolError::NaN);
        }
        if value <= 0.0 {
            return Err(ATolError::NotPositive(value));
        }
        Ok(ATol(NotNan::new(value).map_err(|_| ATolError::NaN)?))
    }

    pub fn into_inner(&self) -> f64 {
        self.0.into_inner()
    }
}

impl Default for ATol {
    fn default() -> Self {
        ATol::new(1e-6).expect("1e-6 is a valid ATol")
    }
}

impl PartialEq<f64> for ATol {
    fn eq(&self, other: &f64) -> bool {
        NotNan::new(*other).map(|o| self.0 == o).unwrap_or(false)
    }
}

impl PartialOrd<f64> for ATol {
    fn partial_cmp(&self, other: &f64) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(&NotNan::new(*other).ok()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive() {
        assert!(ATol::new(0.0).is_err());
        assert!(ATol::new(-1.0).is_err());
    }

    #[test]
    fn rejects_nan() {
        assert!(ATol::new(f64::NAN).is_err());
    }

    #[test]
    fn default_is_small_and_positive() {
        let atol = ATol::default();
        assert!(*atol > 0.0);
        assert!(*atol < 1e-3);
    }
}
