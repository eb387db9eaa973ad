use crate::coefficient::{Coefficient, CoefficientError};
use crate::VariableID;
use indexmap::IndexMap;

/// Sparse affine form `Σ coefficient * variable + constant`.
///
/// Invariant: no stored coefficient is exactly zero; adding a term that cancels
/// an existing one removes the entry rather than leaving a zero behind.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expression {
    terms: IndexMap<VariableID, f64>,
    constant: f64,
}

impl Expression {
    pub fn constant(constant: f64) -> Self {
        Expression {
            terms: IndexMap::new(),
            constant,
        }
    }

    pub fn single_term(var: VariableID, coefficient: f64) -> Self {
        let mut e = Expression::constant(0.0);
        e.add_term(var, coefficient);
        e
    }

    pub fn add_term(&mut self, var: VariableID, coefficient: f64) {
        if coefficient == 0.0 {
            return;
        }
        match self.terms.get_mut(&var) {
            Some(existing) => {
                *existing += coefficient;
                if *existing == 0.0 {
                    self.terms.swap_remove(&var);
                }
            }
            None => {
                self.terms.insert(var, coefficient);
            }
        }
    }

    /// Validates `coefficient` as a well-formed, non-zero, finite [`Coefficient`]
    /// before folding it in, so a caller-supplied coefficient (e.g. from a
    /// model-builder boundary) can never silently introduce a zero, NaN, or
    /// infinite sensitivity into the expression.
    pub fn add_checked_term(&mut self, var: VariableID, coefficient: f64) -> Result<(), CoefficientError> {
        let checked = Coefficient::try_from(coefficient)?;
        self.add_term(var, checked.into_inner());
        Ok(())
    }

    pub fn coefficient(&self, var: VariableID) -> f64 {
        self.terms.get(&var).copied().unwrap_or(0.0)
    }

    pub fn constant_term(&self) -> f64 {
        self.constant
    }

    pub fn set_constant(&mut self, constant: f64) {
        self.constant = constant;
    }

    pub fn terms(&self) -> impl Iterator<Item = (VariableID, f64)> + '_ {
        self.terms.iter().map(|(&v, &c)| (v, c))
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn variables(&self) -> impl Iterator<Item = VariableID> + '_ {
        self.terms.keys().copied()
    }

    /// Full evaluation against a value lookup function.
    pub fn evaluate(&self, value_of: impl Fn(VariableID) -> i64) -> f64 {
        let mut acc = self.constant;
        for (var, coef) in self.terms() {
            acc += coef * value_of(var) as f64;
        }
        acc
    }

    /// Evaluate the delta caused by a set of (variable, new value) pairs against
    /// a prior full value. Used for incremental move scoring (O(related terms)).
    pub fn evaluate_delta(
        &self,
        alterations: &[(VariableID, i64)],
        old_value_of: impl Fn(VariableID) -> i64,
    ) -> f64 {
        let mut delta = 0.0;
        for &(var, new_value) in alterations {
            let coef = self.coefficient(var);
            if coef == 0.0 {
                continue;
            }
            delta += coef * (new_value - old_value_of(var)) as f64;
        }
        delta
    }

    /// Interval bound on the expression's value given a bound lookup per variable.
    pub fn value_bound(&self, bound_of: impl Fn(VariableID) -> (i64, i64)) -> (f64, f64) {
        let mut lower = self.constant;
        let mut upper = self.constant;
        for (var, coef) in self.terms() {
            let (lo, hi) = bound_of(var);
            let (a, b) = (coef * lo as f64, coef * hi as f64);
            lower += a.min(b);
            upper += a.max(b);
        }
        (lower, upper)
    }
}

impl std::ops::AddAssign<&Expression> for Expression {
    fn add_assign(&mut self, rhs: &Expression) {
        self.constant += rhs.constant;
        for (var, coef) in rhs.terms() {
            self.add_term(var, coef);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(id: u32) -> VariableID {
        VariableID::from(id)
    }

    #[test]
    fn checked_term_rejects_zero_and_nan() {
        let mut e = Expression::constant(0.0);
        assert!(e.add_checked_term(v(0), 0.0).is_err());
        assert!(e.add_checked_term(v(0), f64::NAN).is_err());
        assert!(e.add_checked_term(v(0), 2.0).is_ok());
        assert_eq!(e.coefficient(v(0)), 2.0);
    }

    #[test]
    fn cancelling_terms_are_removed() {
        let mut e = Expression::constant(0.0);
        e.add_term(v(0), 2.0);
        e.add_term(v(0), -2.0);
        assert_eq!(e.num_terms(), 0);
        assert_eq!(e.coefficient(v(0)), 0.0);
    }

    #[test]
    fn evaluate_matches_manual_sum() {
        let mut e = Expression::constant(5.0);
        e.add_term(v(0), 2.0);
        e.add_term(v(1), -1.0);
        let value = |id: VariableID| if id == v(0) { 3 } else { 4 };
        assert_eq!(e.evaluate(value), 5.0 + 2.0 * 3.0 - 4.0);
    }

    #[test]
    fn delta_matches_full_reevaluation() {
        let mut e = Expression::constant(1.0);
        e.add_term(v(0), 3.0);
        e.add_term(v(1), -2.0);
        let old = |id: VariableID| if id == v(0) { 1 } else { 2 };
        let full_before = e.evaluate(old);
        let alterations = [(v(0), 4i64)];
        let delta = e.evaluate_delta(&alterations, old);
        let new = |id: VariableID| if id == v(0) { 4 } else { 2 };
        let full_after = e.evaluate(new);
        assert_eq!(full_before + delta, full_after);
    }
}
