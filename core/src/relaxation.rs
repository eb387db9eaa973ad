//! The external-solver boundary (§6 "External solver delegation"): a narrow
//! trait that advisory Lagrange-dual / PDLP / local-search submodules
//! implement to hand the tabu-search core a warm-started assignment and a
//! per-constraint dual estimate before the first pass. The core never calls
//! into a concrete relaxation solver directly — it only ever sees this trait,
//! so `tabumip-relax-adapter` (or any other crate) can supply one without the
//! core depending on it.

use crate::model::Model;

/// Output of a [`RelaxationSolver`]: a full variable assignment (not
/// necessarily feasible, not necessarily within bounds — the core clamps and
/// validates it like any other candidate) plus one dual-value estimate per
/// constraint, in constraint-id order.
#[derive(Debug, Clone)]
pub struct RelaxationAdvice {
    pub values: Vec<i64>,
    pub duals: Vec<f64>,
}

/// Advisory relaxation solver invoked once, before the tabu-search loop
/// starts, to seed an initial point and a set of Lagrangian multipliers that
/// the scoring function (§4.5 step 3, `lagrangian_penalty_coefficient`) can
/// fold in as a soft, fixed-per-pass bias. The core treats both outputs as
/// advisory: a solver that fails to converge may simply return the model's
/// current assignment and all-zero duals.
pub trait RelaxationSolver: Send + Sync {
    fn solve(&self, model: &Model) -> RelaxationAdvice;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sense;

    struct Identity;
    impl RelaxationSolver for Identity {
        fn solve(&self, model: &Model) -> RelaxationAdvice {
            RelaxationAdvice {
                values: model.variables().iter().map(|v| v.value()).collect(),
                duals: vec![0.0; model.constraints().len()],
            }
        }
    }

    #[test]
    fn identity_advice_matches_current_assignment() {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 5).unwrap();
        model.set_objective(crate::model::Expression::single_term(x, 1.0));
        let mut e = crate::model::Expression::constant(-3.0);
        e.add_term(x, 1.0);
        model.create_constraint("c0", e, Sense::Less).unwrap();
        model.setup();

        let advice = Identity.solve(&model);
        assert_eq!(advice.values, vec![model.variable(x).value()]);
        assert_eq!(advice.duals, vec![0.0]);
    }
}
