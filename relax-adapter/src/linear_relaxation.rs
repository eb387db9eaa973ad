//! Flattens a [`tabumip::model::Model`] into a plain linear system both solvers
//! in this crate share, so the Lagrangian and PDLP loops read off the same
//! rows/bounds instead of re-walking `Model` independently.

use tabumip::model::{Model, ObjectiveSense, Sense};

#[derive(Debug, thiserror::Error)]
pub enum LinearRelaxationError {
    #[error("model has no variables to relax")]
    NoVariables,
}

/// One constraint row, normalized to `coeffs . x <op> rhs` with `op` carried
/// in `sense` (unchanged from the source [`Sense`]; callers that need a single
/// `<=` direction flip the sign themselves, since the two solvers here treat
/// `Less`/`Greater`/`Equal` differently).
pub struct Row {
    pub coeffs: Vec<(usize, f64)>,
    pub rhs: f64,
    pub sense: Sense,
}

/// A box-constrained linear relaxation: the model's objective and constraints
/// with their original (integer) bounds still attached, but no further
/// integrality requirement. Minimization is canonical; a maximizing model is
/// negated on the way in.
pub struct LinearRelaxation {
    pub objective: Vec<(usize, f64)>,
    pub rows: Vec<Row>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub negated: bool,
}

impl LinearRelaxation {
    pub fn from_model(model: &Model) -> Result<Self, LinearRelaxationError> {
        if model.variables().is_empty() {
            return Err(LinearRelaxationError::NoVariables);
        }

        let negated = model.sense() == ObjectiveSense::Maximize;
        let sign = if negated { -1.0 } else { 1.0 };

        let objective = model
            .objective()
            .terms()
            .map(|(var, coef)| (var.index(), sign * coef))
            .collect();

        let rows = model
            .constraints()
            .iter()
            .filter(|c| c.is_enabled())
            .map(|c| Row {
                coeffs: c.expression().terms().map(|(v, coef)| (v.index(), coef)).collect(),
                rhs: -c.expression().constant_term(),
                sense: c.sense(),
            })
            .collect();

        let lower = model.variables().iter().map(|v| v.bound().lower() as f64).collect();
        let upper = model.variables().iter().map(|v| v.bound().upper() as f64).collect();

        Ok(LinearRelaxation {
            objective,
            rows,
            lower,
            upper,
            negated,
        })
    }

    pub fn num_vars(&self) -> usize {
        self.lower.len()
    }

    pub fn objective_as_dense(&self, num_vars: usize) -> Vec<f64> {
        let mut dense = vec![0.0; num_vars];
        for &(var, coef) in &self.objective {
            dense[var] += coef;
        }
        dense
    }
}

/// Minimizes a separable linear form `effective . x` over the box
/// `[lower, upper]`: since there is no coupling between variables beyond the
/// additive coefficients already folded into `effective`, the minimizer sits
/// at a corner — `lower` where the coefficient is positive, `upper` where it's
/// negative, either corner where it's exactly zero.
pub fn minimize_over_box(effective: &[f64], lower: &[f64], upper: &[f64]) -> Vec<f64> {
    effective
        .iter()
        .zip(lower.iter().zip(upper.iter()))
        .map(|(&coef, (&lo, &hi))| if coef > 0.0 { lo } else { hi })
        .collect()
}
