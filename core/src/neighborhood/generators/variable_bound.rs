//! Two-variable inequality moves `a*x + b*y + c <cmp> 0` that are not precedence
//! constraints. Grounded on `printemps::neighborhood::VariableBoundMoveGenerator`:
//! four moves per binomial (shift either variable by `+1`/`-1`, solve the other to
//! the tightest integer value that keeps the inequality satisfied). Which way to
//! round — floor or ceil — depends on the sign of the solved variable's own
//! coefficient and the constraint's sense, since that determines which rounding
//! direction stays on the feasible side of the inequality.

use super::two_variable::{effective_binomials, related_constraints, Binomial};
use crate::model::{Model, Sense};
use crate::neighborhood::generator::{filter_move, passes_mask, AcceptMask, MoveGenerator};
use crate::neighborhood::{Move, MoveType};
use crate::presolve::ConstraintCategory;
use smallvec::smallvec;

fn solve_rounded(constant: f64, shifted_coef: f64, shifted_value: i64, solved_coef: f64, sense: Sense) -> i64 {
    let raw = (-constant - shifted_coef * shifted_value as f64) / solved_coef;
    let round_down = (solved_coef > 0.0 && sense == Sense::Less) || (solved_coef < 0.0 && sense == Sense::Greater);
    if round_down {
        raw.floor() as i64
    } else {
        raw.ceil() as i64
    }
}

#[derive(Debug, Default)]
pub struct VariableBoundMoveGenerator {
    binomials: Vec<Binomial>,
}

impl MoveGenerator for VariableBoundMoveGenerator {
    fn move_type(&self) -> MoveType {
        MoveType::VariableBound
    }

    fn setup(&mut self, model: &Model) {
        self.binomials = effective_binomials(model, ConstraintCategory::VariableBound);
    }

    fn update_moves(&mut self, model: &Model, mask: AcceptMask) -> Vec<Move> {
        let mut moves = Vec::with_capacity(self.binomials.len() * 4);
        for b in &self.binomials {
            let related = related_constraints(model, b);
            let value_first = model.variable(b.first).value();
            let value_second = model.variable(b.second).value();

            for delta in [1i64, -1] {
                let shifted = value_first + delta;
                let solved = solve_rounded(b.constant, b.coefficient_first, shifted, b.coefficient_second, b.sense);
                let candidate = Move::new(
                    smallvec![(b.first, shifted), (b.second, solved)],
                    related.clone(),
                    MoveType::VariableBound,
                );
                if filter_move(model, &candidate) && passes_mask(model, &candidate, mask) {
                    moves.push(candidate);
                }
            }
            for delta in [1i64, -1] {
                let shifted = value_second + delta;
                let solved = solve_rounded(b.constant, b.coefficient_second, shifted, b.coefficient_first, b.sense);
                let candidate = Move::new(
                    smallvec![(b.second, shifted), (b.first, solved)],
                    related.clone(),
                    MoveType::VariableBound,
                );
                if filter_move(model, &candidate) && passes_mask(model, &candidate, mask) {
                    moves.push(candidate);
                }
            }
        }
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Expression;

    #[test]
    fn solved_partner_stays_on_feasible_side() {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 20).unwrap();
        let y = model.create_variable("y", 0, 20).unwrap();
        model.variable_mut(x).assign_unchecked(5);
        model.variable_mut(y).assign_unchecked(5);
        let mut e = Expression::constant(-10.0);
        e.add_term(x, 2.0);
        e.add_term(y, 3.0);
        model.create_constraint("c", e, Sense::Less).unwrap();
        crate::presolve::presolve(&mut model);

        let mut gen = VariableBoundMoveGenerator::default();
        gen.setup(&model);
        let moves = gen.update_moves(&model, AcceptMask::all());
        assert!(!moves.is_empty());
        for mv in &moves {
            let x_val = mv.alterations().iter().find(|&&(v, _)| v == x).unwrap().1;
            let y_val = mv.alterations().iter().find(|&&(v, _)| v == y).unwrap().1;
            assert!(2.0 * x_val as f64 + 3.0 * y_val as f64 - 10.0 <= 1e-9);
        }
    }
}
