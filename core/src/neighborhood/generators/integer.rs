use crate::model::Model;
use crate::neighborhood::generator::{filter_move, passes_mask, AcceptMask, MoveGenerator};
use crate::neighborhood::{Move, MoveType};
use crate::VariableID;
use smallvec::smallvec;

/// Cap on the midpoint-shift offset (§4.3, §9 open question (i)); keeps the coarse
/// "jump toward the far bound" moves from degenerating into the near-±10^9 default
/// bound range.
pub const INTEGER_SHIFT_DELTA_MAX: i64 = 10_000;

/// Four alterations per mutable non-binary integer variable: `+1`, `-1`, a jump
/// partway to the upper bound, and a jump partway to the lower bound.
///
/// Grounded on `printemps::neighborhood::IntegerMoveGenerator`; the midpoint jumps
/// are skipped within 4 units of the respective bound (too little room to matter)
/// or when that bound is still at the default wide-open range.
#[derive(Debug, Default)]
pub struct IntegerMoveGenerator {
    variables: Vec<VariableID>,
}

impl IntegerMoveGenerator {
    fn midpoint_toward_upper(value: i64, upper: i64) -> Option<i64> {
        if value >= upper - 4 || upper >= crate::bound::DEFAULT_UPPER {
            return None;
        }
        let delta = INTEGER_SHIFT_DELTA_MAX.min((upper - value) / 2);
        Some(value + delta)
    }

    fn midpoint_toward_lower(value: i64, lower: i64) -> Option<i64> {
        if value <= lower + 4 || lower <= crate::bound::DEFAULT_LOWER {
            return None;
        }
        let delta = (-INTEGER_SHIFT_DELTA_MAX).max((lower - value) / 2);
        Some(value + delta)
    }
}

impl MoveGenerator for IntegerMoveGenerator {
    fn move_type(&self) -> MoveType {
        MoveType::Integer
    }

    fn setup(&mut self, model: &Model) {
        self.variables = model
            .variables()
            .iter()
            .filter(|v| v.is_mutable() && !v.bound().is_binary())
            .map(|v| v.id())
            .collect();
    }

    fn update_moves(&mut self, model: &Model, mask: AcceptMask) -> Vec<Move> {
        let mut moves = Vec::with_capacity(self.variables.len() * 4);
        for &id in &self.variables {
            let var = model.variable(id);
            let value = var.value();
            let bound = var.bound();
            let related: smallvec::SmallVec<[_; 8]> = model.graph().constraints_of(id).to_vec().into();

            let mut targets = smallvec::SmallVec::<[i64; 4]>::new();
            if value < bound.upper() {
                targets.push(value + 1);
            }
            if value > bound.lower() {
                targets.push(value - 1);
            }
            if let Some(t) = Self::midpoint_toward_upper(value, bound.upper()) {
                targets.push(t);
            }
            if let Some(t) = Self::midpoint_toward_lower(value, bound.lower()) {
                targets.push(t);
            }

            for target in targets {
                let candidate = Move::new(smallvec![(id, target)], related.clone(), MoveType::Integer);
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

    #[test]
    fn emits_unit_and_midpoint_shifts() {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 10_000).unwrap();
        model.variable_mut(x).assign_unchecked(100);
        model.setup();

        let mut gen = IntegerMoveGenerator::default();
        gen.setup(&model);
        let moves = gen.update_moves(&model, crate::neighborhood::generator::AcceptMask::all());
        let targets: Vec<i64> = moves.iter().map(|m| m.alterations()[0].1).collect();
        assert!(targets.contains(&101));
        assert!(targets.contains(&99));
        assert!(targets.len() >= 3);
    }

    #[test]
    fn respects_bounds_at_edges() {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 5).unwrap();
        model.variable_mut(x).assign_unchecked(5);
        model.setup();

        let mut gen = IntegerMoveGenerator::default();
        gen.setup(&model);
        let moves = gen.update_moves(&model, crate::neighborhood::generator::AcceptMask::all());
        assert!(moves.iter().all(|m| m.alterations()[0].1 != 6));
    }
}
