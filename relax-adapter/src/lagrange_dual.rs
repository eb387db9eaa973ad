//! Subgradient ascent on the Lagrangian dual of a model's linear relaxation.
//!
//! Constraints are dualized into the objective with one multiplier each; the
//! resulting box-separable inner minimization has a closed-form corner
//! solution (see [`crate::linear_relaxation::minimize_over_box`]), so each
//! outer iteration costs one pass over the variables plus one pass over the
//! rows — no LP solver is invoked.

use std::time::Instant;

use tabumip::model::{Model, Sense};
use tabumip::{RelaxationAdvice, RelaxationSolver};
use tracing::{debug, instrument, warn};

use crate::linear_relaxation::{minimize_over_box, LinearRelaxation};

/// Mirrors `printemps`'s `lagrange_dual` option block: a fixed iteration/time
/// budget, a step size that geometrically extends on improvement and
/// contracts otherwise, and a convergence tolerance on the dual step norm.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LagrangeDualOptions {
    pub iteration_max: u32,
    pub time_max: f64,
    pub step_size_initial: f64,
    pub step_size_extend_rate: f64,
    pub step_size_reduce_rate: f64,
    pub tolerance: f64,
}

impl Default for LagrangeDualOptions {
    fn default() -> Self {
        LagrangeDualOptions {
            iteration_max: 10_000,
            time_max: 120.0,
            step_size_initial: 1.0,
            step_size_extend_rate: 1.05,
            step_size_reduce_rate: 0.95,
            tolerance: 1e-5,
        }
    }
}

pub struct LagrangeDualSolver {
    pub options: LagrangeDualOptions,
}

impl LagrangeDualSolver {
    pub fn new(options: LagrangeDualOptions) -> Self {
        LagrangeDualSolver { options }
    }
}

impl Default for LagrangeDualSolver {
    fn default() -> Self {
        LagrangeDualSolver::new(LagrangeDualOptions::default())
    }
}

impl RelaxationSolver for LagrangeDualSolver {
    #[instrument(skip_all, name = "lagrange_dual_solve")]
    fn solve(&self, model: &Model) -> RelaxationAdvice {
        let relaxation = match LinearRelaxation::from_model(model) {
            Ok(r) => r,
            Err(err) => {
                warn!(%err, "falling back to identity advice");
                return identity_advice(model);
            }
        };

        let num_vars = relaxation.num_vars();
        let mut duals = vec![0.0; relaxation.rows.len()];
        let mut best_dual_value = f64::NEG_INFINITY;
        let mut step = self.options.step_size_initial;
        let start = Instant::now();
        let mut x = relaxation.lower.clone();

        for iteration in 0..self.options.iteration_max {
            if start.elapsed().as_secs_f64() >= self.options.time_max {
                break;
            }

            let mut effective = relaxation.objective_as_dense(num_vars);
            for (row, &lambda) in relaxation.rows.iter().zip(&duals) {
                for &(var, coef) in &row.coeffs {
                    effective[var] += lambda * coef;
                }
            }

            x = minimize_over_box(&effective, &relaxation.lower, &relaxation.upper);

            let mut dual_value: f64 = x
                .iter()
                .zip(relaxation.objective_as_dense(num_vars))
                .map(|(&xi, c)| c * xi)
                .sum();

            let mut subgradient = vec![0.0; relaxation.rows.len()];
            for (i, row) in relaxation.rows.iter().enumerate() {
                let lhs: f64 = row.coeffs.iter().map(|&(var, coef)| coef * x[var]).sum();
                let g = lhs - row.rhs;
                subgradient[i] = g;
                dual_value += duals[i] * g;
            }

            if dual_value > best_dual_value {
                best_dual_value = dual_value;
                step *= self.options.step_size_extend_rate;
            } else {
                step *= self.options.step_size_reduce_rate;
            }

            let norm: f64 = subgradient.iter().map(|g| g * g).sum::<f64>().sqrt();
            if norm < self.options.tolerance {
                debug!(iteration, norm, "subgradient converged");
                break;
            }

            for (i, row) in relaxation.rows.iter().enumerate() {
                let updated = duals[i] + step * subgradient[i];
                duals[i] = match row.sense {
                    Sense::Equal => updated,
                    Sense::Less => updated.max(0.0),
                    Sense::Greater => updated.min(0.0),
                };
            }
        }

        let sign = if relaxation.negated { -1.0 } else { 1.0 };
        RelaxationAdvice {
            values: x.iter().map(|&v| v.round() as i64).collect(),
            duals: duals.iter().map(|&d| sign * d).collect(),
        }
    }
}

fn identity_advice(model: &Model) -> RelaxationAdvice {
    RelaxationAdvice {
        values: model.variables().iter().map(|v| v.value()).collect(),
        duals: vec![0.0; model.constraints().len()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabumip::model::Expression;

    #[test]
    fn relaxes_a_single_knapsack_constraint() {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 1).unwrap();
        let y = model.create_variable("y", 0, 1).unwrap();
        let mut objective = Expression::constant(0.0);
        objective.add_term(x, 3.0);
        objective.add_term(y, 2.0);
        model.set_objective(objective);
        let mut weight = Expression::constant(-1.0);
        weight.add_term(x, 1.0);
        weight.add_term(y, 1.0);
        model.create_constraint("capacity", weight, Sense::Less).unwrap();
        model.setup();

        let advice = LagrangeDualSolver::default().solve(&model);
        assert_eq!(advice.values.len(), 2);
        assert_eq!(advice.duals.len(), 1);
        assert!(advice.duals[0] >= 0.0);
    }

    #[test]
    fn falls_back_on_an_empty_model() {
        let model = Model::new();
        let advice = LagrangeDualSolver::default().solve(&model);
        assert!(advice.values.is_empty());
        assert!(advice.duals.is_empty());
    }
}
