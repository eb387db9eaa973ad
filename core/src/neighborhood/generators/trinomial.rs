//! Trinomial exclusive-nor moves: a three-variable binary equality `a*x + b*y +
//! c*z + d = 0` whose coefficients all share the same magnitude but not all the
//! same sign (the all-same-sign case is already covered by the
//! `SetPartitioning`/`Cardinality` categories). Grounded on
//! `printemps::neighborhood::TrinomialConstraint` (the data record the teacher
//! builds for this family); the retrieval pack's trinomial move generator header
//! itself was not included, so the move set here is derived directly rather than
//! transliterated — see `DESIGN.md`. With only three binary unknowns, every
//! feasible assignment is found by brute force over the 8 sign combinations.

use crate::model::Model;
use crate::neighborhood::generator::{filter_move, passes_mask, AcceptMask, MoveGenerator};
use crate::neighborhood::{Move, MoveType};
use crate::VariableID;
use smallvec::smallvec;

#[derive(Debug, Clone, Copy)]
struct Trinomial {
    vars: [VariableID; 3],
    coefficients: [f64; 3],
    constant: f64,
}

#[derive(Debug, Default)]
pub struct TrinomialExclusiveNorMoveGenerator {
    trinomials: Vec<Trinomial>,
}

impl MoveGenerator for TrinomialExclusiveNorMoveGenerator {
    fn move_type(&self) -> MoveType {
        MoveType::TrinomialExclusiveNor
    }

    fn setup(&mut self, model: &Model) {
        self.trinomials.clear();
        for constraint in model.constraints() {
            if !constraint.is_enabled() || constraint.sense() != crate::model::Sense::Equal {
                continue;
            }
            let terms: Vec<_> = constraint.expression().terms().collect();
            if terms.len() != 3 {
                continue;
            }
            if !terms.iter().all(|&(v, _)| model.variable(v).bound().is_binary() && !model.variable(v).is_fixed()) {
                continue;
            }
            let magnitude = terms[0].1.abs();
            if terms.iter().any(|&(_, c)| (c.abs() - magnitude).abs() > f64::EPSILON) {
                continue;
            }
            let reference_sign = terms[0].1.signum();
            if terms.iter().all(|&(_, c)| c.signum() == reference_sign) {
                continue;
            }
            self.trinomials.push(Trinomial {
                vars: [terms[0].0, terms[1].0, terms[2].0],
                coefficients: [terms[0].1, terms[1].1, terms[2].1],
                constant: constraint.expression().constant_term(),
            });
        }
    }

    fn update_moves(&mut self, model: &Model, mask: AcceptMask) -> Vec<Move> {
        let mut moves = Vec::new();
        for t in &self.trinomials {
            let related = model.graph().related_constraints(t.vars).into();
            for bits in 0u8..8 {
                let values = [(bits & 1) as i64, (bits >> 1 & 1) as i64, (bits >> 2 & 1) as i64];
                let residual = t.constant
                    + t.coefficients[0] * values[0] as f64
                    + t.coefficients[1] * values[1] as f64
                    + t.coefficients[2] * values[2] as f64;
                if residual.abs() > f64::EPSILON {
                    continue;
                }
                let alterations = smallvec![(t.vars[0], values[0]), (t.vars[1], values[1]), (t.vars[2], values[2])];
                let candidate = Move::new(alterations, related.clone(), MoveType::TrinomialExclusiveNor);
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
    fn locks_three_same_sign_binaries_together() {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 1).unwrap();
        let y = model.create_variable("y", 0, 1).unwrap();
        let z = model.create_variable("z", 0, 1).unwrap();
        model.variable_mut(x).assign_unchecked(0);
        model.variable_mut(y).assign_unchecked(0);
        model.variable_mut(z).assign_unchecked(0);
        let mut e = Expression::constant(0.0);
        e.add_term(x, 1.0);
        e.add_term(y, -1.0);
        e.add_term(z, 1.0);
        model.create_constraint("c", e, Sense::Equal).unwrap();
        model.setup();

        let mut gen = TrinomialExclusiveNorMoveGenerator::default();
        gen.setup(&model);
        let moves = gen.update_moves(&model, AcceptMask::all());
        assert_eq!(moves.len(), 2);
        for mv in &moves {
            let x_target = mv.alterations().iter().find(|&&(v, _)| v == x).unwrap().1;
            let y_target = mv.alterations().iter().find(|&&(v, _)| v == y).unwrap().1;
            let z_target = mv.alterations().iter().find(|&&(v, _)| v == z).unwrap().1;
            assert_eq!((x_target - y_target + z_target), 0);
        }
    }
}
