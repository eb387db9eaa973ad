//! A primal-dual hybrid gradient loop on a model's linear relaxation,
//! mirroring `printemps`'s `pdlp` option block's iteration/tolerance/step-size
//! fields without reproducing its full Ruiz/Pock-Chambolle rescaling machinery.
//!
//! Every row is treated as `coeffs . x <= rhs` internally (an `Equal` row
//! keeps its dual unclamped instead of being split into two inequalities, and
//! a `Greater` row is negated once up front), which keeps the update loop a
//! single uniform clamp-project step.

use std::time::Instant;

use tabumip::model::{Model, Sense};
use tabumip::{RelaxationAdvice, RelaxationSolver};
use tracing::{debug, instrument, warn};

use crate::linear_relaxation::LinearRelaxation;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PdlpOptions {
    pub iteration_max: u32,
    pub time_max: f64,
    pub tolerance: f64,
    pub step_size_extend_exponent: f64,
    pub step_size_reduce_exponent: f64,
    pub restart_check_interval: u32,
}

impl Default for PdlpOptions {
    fn default() -> Self {
        PdlpOptions {
            iteration_max: 100_000,
            time_max: 120.0,
            tolerance: 1e-5,
            step_size_extend_exponent: -0.6,
            step_size_reduce_exponent: -0.3,
            restart_check_interval: 10,
        }
    }
}

pub struct PdlpSolver {
    pub options: PdlpOptions,
}

impl PdlpSolver {
    pub fn new(options: PdlpOptions) -> Self {
        PdlpSolver { options }
    }
}

impl Default for PdlpSolver {
    fn default() -> Self {
        PdlpSolver::new(PdlpOptions::default())
    }
}

/// Row normalized to `coeffs . x <= rhs`, with the sign flip for `Greater`
/// applied once so the hot loop never branches on sense again.
struct NormalizedRow {
    coeffs: Vec<(usize, f64)>,
    rhs: f64,
    is_equality: bool,
}

fn normalize_rows(relaxation: &LinearRelaxation) -> Vec<NormalizedRow> {
    relaxation
        .rows
        .iter()
        .map(|row| match row.sense {
            Sense::Less => NormalizedRow {
                coeffs: row.coeffs.clone(),
                rhs: row.rhs,
                is_equality: false,
            },
            Sense::Greater => NormalizedRow {
                coeffs: row.coeffs.iter().map(|&(v, c)| (v, -c)).collect(),
                rhs: -row.rhs,
                is_equality: false,
            },
            Sense::Equal => NormalizedRow {
                coeffs: row.coeffs.clone(),
                rhs: row.rhs,
                is_equality: true,
            },
        })
        .collect()
}

/// Frobenius norm of the constraint matrix, used as a crude Lipschitz estimate
/// for the primal/dual step sizes (a stand-in for PDLP's Ruiz-scaled operator
/// norm, which this crate doesn't implement).
fn matrix_norm_estimate(rows: &[NormalizedRow]) -> f64 {
    rows.iter()
        .flat_map(|r| r.coeffs.iter().map(|&(_, c)| c * c))
        .sum::<f64>()
        .sqrt()
        .max(1.0)
}

impl RelaxationSolver for PdlpSolver {
    #[instrument(skip_all, name = "pdlp_solve")]
    fn solve(&self, model: &Model) -> RelaxationAdvice {
        let relaxation = match LinearRelaxation::from_model(model) {
            Ok(r) => r,
            Err(err) => {
                warn!(%err, "falling back to identity advice");
                return RelaxationAdvice {
                    values: model.variables().iter().map(|v| v.value()).collect(),
                    duals: vec![0.0; model.constraints().len()],
                };
            }
        };

        let num_vars = relaxation.num_vars();
        let rows = normalize_rows(&relaxation);
        let objective = relaxation.objective_as_dense(num_vars);
        let norm = matrix_norm_estimate(&rows);

        let mut eta = 1.0 / norm;
        let mut tau = 1.0 / norm;
        let mut x = relaxation.lower.clone();
        let mut y = vec![0.0; rows.len()];
        let mut best_gap = f64::INFINITY;
        let start = Instant::now();

        for iteration in 0..self.options.iteration_max {
            if start.elapsed().as_secs_f64() >= self.options.time_max {
                break;
            }

            let mut grad = objective.clone();
            for (row, &dual) in rows.iter().zip(&y) {
                for &(var, coef) in &row.coeffs {
                    grad[var] += dual * coef;
                }
            }
            let x_next: Vec<f64> = (0..num_vars)
                .map(|i| (x[i] - eta * grad[i]).clamp(relaxation.lower[i], relaxation.upper[i]))
                .collect();

            let x_bar: Vec<f64> = x_next.iter().zip(&x).map(|(&xn, &xo)| 2.0 * xn - xo).collect();

            let mut y_next = y.clone();
            for (i, row) in rows.iter().enumerate() {
                let lhs: f64 = row.coeffs.iter().map(|&(var, coef)| coef * x_bar[var]).sum();
                let step = tau * (lhs - row.rhs);
                y_next[i] = if row.is_equality {
                    y[i] + step
                } else {
                    (y[i] + step).max(0.0)
                };
            }

            let primal_gap: f64 = x_next
                .iter()
                .zip(&x)
                .map(|(&a, &b)| (a - b).powi(2))
                .sum::<f64>()
                .sqrt();

            x = x_next;
            y = y_next;

            if iteration % self.options.restart_check_interval.max(1) == 0 {
                if primal_gap < best_gap {
                    best_gap = primal_gap;
                    eta *= 1.0 + (-self.options.step_size_extend_exponent).min(1.0) * 0.01;
                    tau = eta;
                } else {
                    eta *= 1.0 + self.options.step_size_reduce_exponent.min(0.0) * 0.01;
                    tau = eta;
                }
            }

            if primal_gap < self.options.tolerance {
                debug!(iteration, primal_gap, "primal-dual loop converged");
                break;
            }
        }

        let sign = if relaxation.negated { -1.0 } else { 1.0 };
        RelaxationAdvice {
            values: x.iter().map(|&v| v.round() as i64).collect(),
            duals: y.iter().map(|&d| sign * d).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabumip::model::Expression;

    #[test]
    fn pdlp_solves_a_box_constrained_knapsack_relaxation() {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 1).unwrap();
        let y = model.create_variable("y", 0, 1).unwrap();
        let mut objective = Expression::constant(0.0);
        objective.add_term(x, 1.0);
        objective.add_term(y, 1.0);
        model.set_objective(objective);
        let mut weight = Expression::constant(-1.0);
        weight.add_term(x, 1.0);
        weight.add_term(y, 1.0);
        model.create_constraint("capacity", weight, Sense::Less).unwrap();
        model.setup();

        let advice = PdlpSolver::default().solve(&model);
        assert_eq!(advice.values.len(), 2);
        assert_eq!(advice.duals.len(), 1);
    }
}
