//! Two-flip moves: set one binary variable to `1` while setting a second to `0`
//! (and the reverse), for pairs of binary variables that co-occur in some
//! constraint. Grounded on `printemps::neighborhood::TwoFlipMoveGenerator`; the
//! teacher takes its flippable-pair list as a precomputed external input. This
//! crate derives that list itself: consecutive pairs, within each constraint's
//! binary variables in id order, one pair per constraint to keep the move count
//! linear rather than quadratic in group size.

use crate::model::Model;
use crate::neighborhood::generator::{filter_move, passes_mask, AcceptMask, MoveGenerator};
use crate::neighborhood::{Move, MoveType};
use crate::VariableID;
use smallvec::smallvec;
use std::collections::BTreeSet;

#[derive(Debug, Default)]
pub struct TwoFlipMoveGenerator {
    pairs: Vec<(VariableID, VariableID)>,
}

impl MoveGenerator for TwoFlipMoveGenerator {
    fn move_type(&self) -> MoveType {
        MoveType::TwoFlip
    }

    fn setup(&mut self, model: &Model) {
        let mut seen = BTreeSet::new();
        self.pairs.clear();
        for constraint in model.constraints() {
            if !constraint.is_enabled() {
                continue;
            }
            let mut binaries: Vec<VariableID> = constraint
                .expression()
                .variables()
                .filter(|&v| {
                    let var = model.variable(v);
                    var.bound().is_binary() && var.selection().is_none() && !var.is_fixed()
                })
                .collect();
            binaries.sort_by_key(|v| v.0);
            for window in binaries.windows(2) {
                let pair = (window[0], window[1]);
                if seen.insert(pair) {
                    self.pairs.push(pair);
                }
            }
        }
    }

    fn update_moves(&mut self, model: &Model, mask: AcceptMask) -> Vec<Move> {
        let mut moves = Vec::with_capacity(self.pairs.len() * 2);
        for &(a, b) in &self.pairs {
            let related = model.graph().related_constraints([a, b]).into();
            for &(target_a, target_b) in &[(1i64, 0i64), (0, 1)] {
                let candidate = Move::new(smallvec![(a, target_a), (b, target_b)], related, MoveType::TwoFlip);
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
    use crate::model::Sense;

    #[test]
    fn pairs_co_occurring_binaries() {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 1).unwrap();
        let y = model.create_variable("y", 0, 1).unwrap();
        model.variable_mut(x).assign_unchecked(0);
        model.variable_mut(y).assign_unchecked(1);
        let mut e = Expression::constant(-1.0);
        e.add_term(x, 1.0);
        e.add_term(y, 1.0);
        model.create_constraint("c", e, Sense::Less).unwrap();
        model.setup();

        let mut gen = TwoFlipMoveGenerator::default();
        gen.setup(&model);
        let moves = gen.update_moves(&model, AcceptMask::all());
        assert_eq!(moves.len(), 1);
    }
}
