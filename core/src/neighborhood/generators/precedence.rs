//! Two-variable precedence moves: `x - y <cmp> c` (opposite-sign, equal-magnitude
//! coefficients). Grounded on `printemps::neighborhood::PrecedenceMoveGenerator`:
//! two moves per binomial, shifting both variables together by `+1` or `-1` so the
//! difference `x - y` is preserved exactly.

use super::two_variable::{effective_binomials, related_constraints, Binomial};
use crate::model::Model;
use crate::neighborhood::generator::{filter_move, passes_mask, AcceptMask, MoveGenerator};
use crate::neighborhood::{Move, MoveType};
use crate::presolve::ConstraintCategory;
use smallvec::smallvec;

#[derive(Debug, Default)]
pub struct PrecedenceMoveGenerator {
    binomials: Vec<Binomial>,
}

impl MoveGenerator for PrecedenceMoveGenerator {
    fn move_type(&self) -> MoveType {
        MoveType::Precedence
    }

    fn setup(&mut self, model: &Model) {
        self.binomials = effective_binomials(model, ConstraintCategory::Precedence);
    }

    fn update_moves(&mut self, model: &Model, mask: AcceptMask) -> Vec<Move> {
        let mut moves = Vec::with_capacity(self.binomials.len() * 2);
        for b in &self.binomials {
            let related = related_constraints(model, b);
            let value_first = model.variable(b.first).value();
            let value_second = model.variable(b.second).value();

            for delta in [1i64, -1] {
                let candidate = Move::new(
                    smallvec![(b.first, value_first + delta), (b.second, value_second + delta)],
                    related.clone(),
                    MoveType::Precedence,
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
    use crate::model::{Expression, Sense};

    #[test]
    fn shifts_both_variables_together() {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 20).unwrap();
        let y = model.create_variable("y", 0, 20).unwrap();
        model.variable_mut(x).assign_unchecked(10);
        model.variable_mut(y).assign_unchecked(5);
        let mut e = Expression::constant(-5.0);
        e.add_term(x, 1.0);
        e.add_term(y, -1.0);
        model.create_constraint("c", e, Sense::Less).unwrap();
        crate::presolve::presolve(&mut model);

        let mut gen = PrecedenceMoveGenerator::default();
        gen.setup(&model);
        let moves = gen.update_moves(&model, AcceptMask::all());
        assert_eq!(moves.len(), 2);
        for mv in &moves {
            let dx = mv.alterations()[0].1 - 10;
            let dy = mv.alterations()[1].1 - 5;
            assert_eq!(dx, dy);
        }
    }
}
