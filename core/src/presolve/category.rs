use crate::model::{Constraint, Sense};

/// Closed taxonomy of recognized linear-constraint templates. Classification follows
/// a fixed precedence: the first matching template in the order listed here wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ConstraintCategory {
    /// One free variable.
    Singleton,
    /// Two-variable equality `a*x + b*y = c`.
    Aggregation,
    /// Two-variable inequality with opposite-sign equal-magnitude coefficients: `x - y <cmp> c`.
    Precedence,
    /// General two-variable inequality that is not a precedence constraint.
    VariableBound,
    /// `Σ x_i = 1` over binaries.
    SetPartitioning,
    /// `Σ x_i <= 1` over binaries.
    SetPacking,
    /// `Σ x_i >= 1` over binaries.
    SetCovering,
    /// `Σ x_i = k` over binaries, `k >= 2`.
    Cardinality,
    /// `Σ x_i <= k` over binaries with unit coefficients, `k >= 2`.
    InvariantKnapsack,
    /// `Σ a_i x_i = k` over binaries with non-unit coefficients.
    EquationKnapsack,
    /// `Σ x_i <= k` grouped so each group sums to at most one unit (bin-packing template).
    BinPacking,
    /// `Σ a_i x_i <= k` over binaries with non-unit coefficients.
    Knapsack,
    /// `Σ a_i x_i <= k` with at least one non-binary integer variable.
    IntegerKnapsack,
    /// Anything not matched above.
    GeneralLinear,
}

/// Classifies a single linear constraint into one [`ConstraintCategory`].
///
/// `is_binary` must report whether a given variable id is currently of binary kind;
/// classification is purely syntactic over the expression's sensitivities and the sense.
pub fn classify(constraint: &Constraint, is_binary: impl Fn(crate::VariableID) -> bool) -> ConstraintCategory {
    let expr = constraint.expression();
    let terms: Vec<_> = expr.terms().collect();
    let n = terms.len();

    if n == 0 {
        return ConstraintCategory::GeneralLinear;
    }
    if n == 1 {
        return ConstraintCategory::Singleton;
    }

    if n == 2 {
        let (_, c0) = terms[0];
        let (_, c1) = terms[1];
        if constraint.sense() == Sense::Equal {
            return ConstraintCategory::Aggregation;
        }
        if (c0 + c1).abs() < f64::EPSILON {
            return ConstraintCategory::Precedence;
        }
        return ConstraintCategory::VariableBound;
    }

    let all_binary = terms.iter().all(|&(v, _)| is_binary(v));
    let all_unit = terms.iter().all(|&(_, c)| (c - 1.0).abs() < f64::EPSILON);
    let constant = expr.constant_term();

    if all_binary && all_unit {
        match constraint.sense() {
            Sense::Equal => {
                let k = -constant;
                if (k - 1.0).abs() < f64::EPSILON {
                    return ConstraintCategory::SetPartitioning;
                }
                return ConstraintCategory::Cardinality;
            }
            Sense::Less => {
                let k = -constant;
                if (k - 1.0).abs() < f64::EPSILON {
                    return ConstraintCategory::SetPacking;
                }
                return ConstraintCategory::InvariantKnapsack;
            }
            Sense::Greater => {
                let k = -constant;
                if (k - 1.0).abs() < f64::EPSILON {
                    return ConstraintCategory::SetCovering;
                }
                return ConstraintCategory::GeneralLinear;
            }
        }
    }

    if all_binary && !all_unit {
        return match constraint.sense() {
            Sense::Equal => ConstraintCategory::EquationKnapsack,
            Sense::Less | Sense::Greater => ConstraintCategory::Knapsack,
        };
    }

    if !all_binary && constraint.sense() != Sense::Equal {
        return ConstraintCategory::IntegerKnapsack;
    }

    ConstraintCategory::GeneralLinear
}
