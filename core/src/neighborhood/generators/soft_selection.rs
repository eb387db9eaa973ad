//! Soft-selection moves: within one enabled constraint, pair every non-key binary
//! variable with a designated "key" variable and toggle both together, `0/0` or
//! `1/1`. Grounded on `printemps::neighborhood::SoftSelectionMoveGenerator`; the
//! key variable there comes from the constraint's own `key_variable_ptr()`
//! bookkeeping, which this crate does not track separately, so the key is instead
//! taken as the term with the largest-magnitude coefficient (the same heuristic
//! [`super::ratio::ConstantRatioMoveGenerator`] uses to pick a lead variable).
//!
//! Unlike [`crate::model::SelectionGroup`] (a hard one-hot), this produces a
//! *soft* coupling: any number of members may end up at `1` at once, the move only
//! proposes moving one member in lockstep with the key.

use crate::model::Model;
use crate::neighborhood::generator::{filter_move, passes_mask, AcceptMask, MoveGenerator};
use crate::neighborhood::{Move, MoveType};
use crate::VariableID;
use smallvec::smallvec;

#[derive(Debug, Default)]
pub struct SoftSelectionMoveGenerator {
    templates: Vec<(VariableID, VariableID)>,
}

impl MoveGenerator for SoftSelectionMoveGenerator {
    fn move_type(&self) -> MoveType {
        MoveType::SoftSelection
    }

    fn setup(&mut self, model: &Model) {
        self.templates.clear();
        for constraint in model.constraints() {
            if !constraint.is_enabled() {
                continue;
            }
            let terms: Vec<_> = constraint.expression().terms().collect();
            if terms.len() < 2 || !terms.iter().all(|&(v, _)| model.variable(v).bound().is_binary()) {
                continue;
            }
            if terms.iter().any(|&(v, _)| model.variable(v).is_fixed()) {
                continue;
            }
            let key = terms
                .iter()
                .copied()
                .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
                .unwrap()
                .0;
            for &(member, _) in &terms {
                if member != key {
                    self.templates.push((member, key));
                }
            }
        }
    }

    fn update_moves(&mut self, model: &Model, mask: AcceptMask) -> Vec<Move> {
        let mut moves = Vec::with_capacity(self.templates.len() * 2);
        for &(member, key) in &self.templates {
            let related = model.graph().related_constraints([member, key]).into();
            for target in [0i64, 1] {
                let candidate = Move::new(smallvec![(member, target), (key, target)], related, MoveType::SoftSelection);
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
    fn pairs_every_member_with_the_largest_coefficient_term() {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 1).unwrap();
        let y = model.create_variable("y", 0, 1).unwrap();
        let z = model.create_variable("z", 0, 1).unwrap();
        let mut e = Expression::constant(0.0);
        e.add_term(x, 1.0);
        e.add_term(y, 1.0);
        e.add_term(z, 3.0);
        model.create_constraint("c", e, Sense::Less).unwrap();
        model.setup();

        let mut gen = SoftSelectionMoveGenerator::default();
        gen.setup(&model);
        let moves = gen.update_moves(&model, AcceptMask::all());
        assert_eq!(moves.len(), 4);
        for mv in &moves {
            assert!(mv.alterations().iter().any(|&(v, _)| v == z));
        }
    }
}
