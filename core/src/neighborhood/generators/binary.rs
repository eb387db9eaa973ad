use crate::model::Model;
use crate::neighborhood::generator::{filter_move, passes_mask, AcceptMask, MoveGenerator};
use crate::neighborhood::{Move, MoveType};
use crate::VariableID;
use smallvec::smallvec;

/// One flip move per mutable binary variable: `v -> 1 - v`.
///
/// Grounded on `printemps::neighborhood::BinaryMoveGenerator`: a fixed-size move
/// array of one alteration each, rebuilt only at `setup` (the variable set never
/// changes mid-solve), refreshed in `update_moves` from the current value.
#[derive(Debug, Default)]
pub struct BinaryMoveGenerator {
    variables: Vec<VariableID>,
}

impl MoveGenerator for BinaryMoveGenerator {
    fn move_type(&self) -> MoveType {
        MoveType::Binary
    }

    fn setup(&mut self, model: &Model) {
        self.variables = model
            .variables()
            .iter()
            .filter(|v| v.is_mutable() && v.bound().is_binary())
            .map(|v| v.id())
            .collect();
    }

    fn update_moves(&mut self, model: &Model, mask: AcceptMask) -> Vec<Move> {
        self.variables
            .iter()
            .filter_map(|&id| {
                let value = model.variable(id).value();
                let related = model.graph().constraints_of(id).to_vec().into();
                let candidate = Move::new(smallvec![(id, 1 - value)], related, MoveType::Binary);
                (filter_move(model, &candidate) && passes_mask(model, &candidate, mask)).then_some(candidate)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Expression;

    #[test]
    fn flips_every_mutable_binary() {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 1).unwrap();
        model.set_objective(Expression::single_term(x, 1.0));
        model.setup();

        let mut gen = BinaryMoveGenerator::default();
        gen.setup(&model);
        let moves = gen.update_moves(&model, AcceptMask::all());
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].alterations(), &[(x, 1)]);
    }

    #[test]
    fn skips_fixed_binary() {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 1).unwrap();
        model.variable_mut(x).fix(0);
        model.setup();

        let mut gen = BinaryMoveGenerator::default();
        gen.setup(&model);
        assert!(gen.update_moves(&model, AcceptMask::all()).is_empty());
    }
}
