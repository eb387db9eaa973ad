//! Box bounds on integer decision variables.
use crate::macros::{impl_add_from, impl_add_inverse};
use std::ops::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoundError {
    #[error("lower({lower}) is larger than upper({upper})")]
    LowerAboveUpper { lower: i64, upper: i64 },
}

impl BoundError {
    fn check(lower: i64, upper: i64) -> Result<(), BoundError> {
        if lower > upper {
            return Err(BoundError::LowerAboveUpper { lower, upper });
        }
        Ok(())
    }
}

/// Inclusive box bound `[lower, upper]` on an integer decision variable.
///
/// Invariant
/// ---------
/// - `lower <= upper`
///
/// ```rust
/// use tabumip::Bound;
///
/// let bound = Bound::new(0, 10).unwrap();
/// assert!(bound.contains(7));
/// assert!(!bound.contains(11));
/// assert_eq!(Bound::of_binary(), Bound::new(0, 1).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bound {
    lower: i64,
    upper: i64,
}

/// A generously wide default range, well short of `i64::MAX` so that interval
/// arithmetic performed during presolve (sums and products of bounds) does not overflow.
pub const DEFAULT_LOWER: i64 = -1_000_000_000;
pub const DEFAULT_UPPER: i64 = 1_000_000_000;

impl Default for Bound {
    fn default() -> Self {
        Self {
            lower: DEFAULT_LOWER,
            upper: DEFAULT_UPPER,
        }
    }
}

impl Bound {
    pub fn new(lower: i64, upper: i64) -> Result<Self, BoundError> {
        BoundError::check(lower, upper)?;
        Ok(Self { lower, upper })
    }

    pub fn of_binary() -> Self {
        Self { lower: 0, upper: 1 }
    }

    pub fn fixed(value: i64) -> Self {
        Self {
            lower: value,
            upper: value,
        }
    }

    pub fn lower(&self) -> i64 {
        self.lower
    }

    pub fn upper(&self) -> i64 {
        self.upper
    }

    pub fn set_lower(&mut self, lower: i64) -> Result<(), BoundError> {
        BoundError::check(lower, self.upper)?;
        self.lower = lower;
        Ok(())
    }

    pub fn set_upper(&mut self, upper: i64) -> Result<(), BoundError> {
        BoundError::check(self.lower, upper)?;
        self.upper = upper;
        Ok(())
    }

    pub fn contains(&self, value: i64) -> bool {
        self.lower <= value && value <= self.upper
    }

    pub fn is_fixed(&self) -> bool {
        self.lower == self.upper
    }

    pub fn is_binary(&self) -> bool {
        self.lower == 0 && self.upper == 1
    }

    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.lower, self.upper)
    }

    pub fn width(&self) -> i64 {
        self.upper - self.lower
    }

    pub fn midpoint(&self) -> i64 {
        self.lower + self.width() / 2
    }

    /// Intersect two bounds, used by bound tightening during presolve.
    pub fn intersect(&self, other: &Bound) -> Option<Bound> {
        let lower = self.lower.max(other.lower);
        let upper = self.upper.min(other.upper);
        Bound::new(lower, upper).ok()
    }
}

impl Add for Bound {
    type Output = Bound;
    fn add(self, rhs: Self) -> Self::Output {
        Bound {
            lower: self.lower.saturating_add(rhs.lower),
            upper: self.upper.saturating_add(rhs.upper),
        }
    }
}
impl_add_from!(Bound, i64);
impl_add_inverse!(i64, Bound);

impl AddAssign for Bound {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul<i64> for Bound {
    type Output = Bound;
    fn mul(self, rhs: i64) -> Self::Output {
        let a = self.lower.saturating_mul(rhs);
        let b = self.upper.saturating_mul(rhs);
        Bound {
            lower: a.min(b),
            upper: a.max(b),
        }
    }
}

impl From<i64> for Bound {
    fn from(value: i64) -> Self {
        Bound::fixed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_bounds() {
        assert!(Bound::new(5, 1).is_err());
    }

    #[test]
    fn interval_sum_widens() {
        let a = Bound::new(0, 3).unwrap();
        let b = Bound::new(-2, 1).unwrap();
        let sum = a + b;
        assert_eq!(sum, Bound::new(-2, 4).unwrap());
    }

    #[test]
    fn scale_by_negative_flips() {
        let a = Bound::new(1, 5).unwrap();
        assert_eq!(a * -2, Bound::new(-10, -2).unwrap());
    }

    #[test]
    fn intersect_narrows() {
        let a = Bound::new(0, 10).unwrap();
        let b = Bound::new(5, 20).unwrap();
        assert_eq!(a.intersect(&b), Some(Bound::new(5, 10).unwrap()));
        let c = Bound::new(11, 20).unwrap();
        assert_eq!(a.intersect(&c), None);
    }
}
