use crate::model::{Model, Sense};
use crate::{Bound, VariableID};

/// Absolute cap on a bound derived by tightening, guarding against a near-zero
/// coefficient blowing a tightened bound up to an unusable magnitude.
pub const BOUND_TIGHTENING_MAGNITUDE_CAP: i64 = 100_000;

fn bound_sum(
    terms: &[(VariableID, f64)],
    constant: f64,
    bounds: &[(i64, i64)],
    exclude: Option<VariableID>,
) -> (f64, f64) {
    let mut lower = constant;
    let mut upper = constant;
    for &(v, coef) in terms {
        if Some(v) == exclude {
            continue;
        }
        let (lo, hi) = bounds[v.index()];
        let (a, b) = (coef * lo as f64, coef * hi as f64);
        lower += a.min(b);
        upper += a.max(b);
    }
    (lower, upper)
}

/// One fixed-point sweep of bound tightening and redundancy removal over every
/// enabled constraint. Returns the number of variable bounds it narrowed.
pub fn tighten_bounds(model: &mut Model) -> usize {
    let mut tightened = 0usize;
    let bounds: Vec<(i64, i64)> = model
        .variables()
        .iter()
        .map(|v| (v.bound().lower(), v.bound().upper()))
        .collect();

    struct Pending {
        constraint_id: crate::ConstraintID,
        sense: Sense,
        constant: f64,
        terms: Vec<(VariableID, f64)>,
    }

    let pending: Vec<Pending> = model
        .constraints()
        .iter()
        .filter(|c| c.is_enabled())
        .map(|c| Pending {
            constraint_id: c.id(),
            sense: c.sense(),
            constant: c.expression().constant_term(),
            terms: c.expression().terms().collect(),
        })
        .collect();

    let mut new_bounds = bounds.clone();
    let mut disabled = Vec::new();

    for p in &pending {
        if p.terms.is_empty() {
            continue;
        }

        if p.terms.len() >= 2 {
            let (full_lower, full_upper) = bound_sum(&p.terms, p.constant, &bounds, None);
            let always_satisfied = match p.sense {
                Sense::Less => full_upper <= 0.0,
                Sense::Greater => full_lower >= 0.0,
                Sense::Equal => false,
            };
            if always_satisfied {
                disabled.push(p.constraint_id);
                continue;
            }
        }

        if p.sense == Sense::Equal {
            continue;
        }

        for &(target_var, coef) in &p.terms {
            if coef == 0.0 || model.variable(target_var).is_fixed() {
                continue;
            }
            let (other_lower, other_upper) = bound_sum(&p.terms, p.constant, &bounds, Some(target_var));
            let (rhs_lower, rhs_upper) = match p.sense {
                Sense::Less => (f64::NEG_INFINITY, -other_lower),
                Sense::Greater => (-other_upper, f64::INFINITY),
                Sense::Equal => unreachable!(),
            };

            let (cur_lower, cur_upper) = new_bounds[target_var.index()];
            let mut lower = cur_lower;
            let mut upper = cur_upper;

            if coef > 0.0 {
                if rhs_upper.is_finite() {
                    let candidate = (rhs_upper / coef).floor() as i64;
                    upper = upper.min(candidate.clamp(-BOUND_TIGHTENING_MAGNITUDE_CAP, BOUND_TIGHTENING_MAGNITUDE_CAP));
                }
                if rhs_lower.is_finite() {
                    let candidate = (rhs_lower / coef).ceil() as i64;
                    lower = lower.max(candidate.clamp(-BOUND_TIGHTENING_MAGNITUDE_CAP, BOUND_TIGHTENING_MAGNITUDE_CAP));
                }
            } else {
                if rhs_upper.is_finite() {
                    let candidate = (rhs_upper / coef).ceil() as i64;
                    lower = lower.max(candidate.clamp(-BOUND_TIGHTENING_MAGNITUDE_CAP, BOUND_TIGHTENING_MAGNITUDE_CAP));
                }
                if rhs_lower.is_finite() {
                    let candidate = (rhs_lower / coef).floor() as i64;
                    upper = upper.min(candidate.clamp(-BOUND_TIGHTENING_MAGNITUDE_CAP, BOUND_TIGHTENING_MAGNITUDE_CAP));
                }
            }

            if lower <= upper {
                new_bounds[target_var.index()] = (lower, upper);
            }
        }
    }

    for constraint_id in disabled {
        model.constraint_mut(constraint_id).disable();
    }

    for (i, (lower, upper)) in new_bounds.into_iter().enumerate() {
        let id = VariableID::from(i);
        if (lower, upper) != bounds[i] {
            if let Ok(tightened_bound) = Bound::new(lower, upper) {
                let current = model.variable(id).bound();
                if let Some(intersected) = current.intersect(&tightened_bound) {
                    if intersected != current {
                        model.variable_mut(id).set_bound(intersected);
                        tightened += 1;
                    }
                }
            }
        }
    }

    tightened
}

/// Fixes variables that are implicitly fixed (`lo == hi`) and variables absent from
/// both the objective and every enabled constraint.
pub fn fix_independent_and_implicit(model: &mut Model) -> usize {
    let mut fixed = 0usize;
    let ids: Vec<_> = model.variables().iter().map(|v| v.id()).collect();
    for id in ids {
        let var = model.variable(id);
        if var.is_fixed() {
            continue;
        }
        if var.bound().is_fixed() {
            let value = var.bound().lower();
            model.variable_mut(id).fix(value);
            fixed += 1;
            continue;
        }
        let has_constraint = !model.graph().constraints_of(id).is_empty();
        let in_objective = model.graph().is_in_objective(id);
        if !has_constraint {
            let value = if !in_objective {
                0
            } else {
                let coef = var.objective_coefficient();
                let minimizing = matches!(model.sense(), crate::model::ObjectiveSense::Minimize);
                let want_low = (coef > 0.0) == minimizing;
                if want_low {
                    var.bound().lower()
                } else {
                    var.bound().upper()
                }
            };
            model.variable_mut(id).fix(value);
            fixed += 1;
        }
    }
    fixed
}

/// Runs independent-variable fixing, redundancy removal with bound tightening, and
/// implicit fixing to a fixed point, per the presolve pipeline of §4.4.
pub fn run(model: &mut Model) {
    model.setup();
    loop {
        let mut changed = fix_independent_and_implicit(model) > 0;
        changed |= tighten_bounds(model) > 0;
        model.setup();
        changed |= fix_independent_and_implicit(model) > 0;
        if !changed {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Expression;

    #[test]
    fn singleton_constraint_tightens_bound() {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 100).unwrap();
        let mut e = Expression::constant(-10.0);
        e.add_term(x, 1.0);
        model.create_constraint("c0", e, Sense::Less).unwrap();
        run(&mut model);
        assert_eq!(model.variable(x).bound().upper(), 10);
    }

    #[test]
    fn fixed_bound_is_marked_fixed() {
        let mut model = Model::new();
        let x = model.create_variable("x", 7, 7).unwrap();
        run(&mut model);
        assert!(model.variable(x).is_fixed());
        assert_eq!(model.variable(x).value(), 7);
    }

    #[test]
    fn unconstrained_variable_outside_objective_fixes_to_zero() {
        let mut model = Model::new();
        let x = model.create_variable("x", -5, 5).unwrap();
        run(&mut model);
        assert!(model.variable(x).is_fixed());
        assert_eq!(model.variable(x).value(), 0);
    }
}
