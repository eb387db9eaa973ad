//! User-defined moves: an escape hatch for caller-supplied move templates that
//! don't fit any built-in category. Grounded on
//! `printemps::neighborhood::UserDefinedMoveGenerator`, which wraps a callback the
//! caller installs before solving; here the callback is a boxed closure supplied
//! at construction instead of a post-construction setter, since this crate builds
//! the generator set once per solve.

use crate::model::Model;
use crate::neighborhood::generator::{filter_move, passes_mask, AcceptMask, MoveGenerator};
use crate::neighborhood::{Move, MoveType};

/// Produces the current pool of user-defined candidate moves from the model state.
/// Selection-variable alterations are rejected by the standard filter regardless
/// of what the callback proposes, matching the teacher's `has_selection_variable` check.
pub type UserDefinedMoveUpdater = Box<dyn Fn(&Model) -> Vec<Move> + Send + Sync>;

pub struct UserDefinedMoveGenerator {
    updater: UserDefinedMoveUpdater,
}

impl std::fmt::Debug for UserDefinedMoveGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDefinedMoveGenerator").finish_non_exhaustive()
    }
}

impl UserDefinedMoveGenerator {
    pub fn new(updater: UserDefinedMoveUpdater) -> Self {
        UserDefinedMoveGenerator { updater }
    }
}

impl MoveGenerator for UserDefinedMoveGenerator {
    fn move_type(&self) -> MoveType {
        MoveType::UserDefined
    }

    fn setup(&mut self, _model: &Model) {}

    fn update_moves(&mut self, model: &Model, mask: AcceptMask) -> Vec<Move> {
        (self.updater)(model)
            .into_iter()
            .filter(|candidate| !candidate.alterations().iter().any(|&(v, _)| model.variable(v).selection().is_some()))
            .filter(|candidate| filter_move(model, candidate) && passes_mask(model, candidate, mask))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn delegates_to_the_supplied_callback() {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 10).unwrap();
        model.setup();

        let mut gen = UserDefinedMoveGenerator::new(Box::new(move |_model| {
            vec![Move::new(smallvec![(x, 5)], smallvec![], MoveType::UserDefined)]
        }));
        gen.setup(&model);
        let moves = gen.update_moves(&model, AcceptMask::all());
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].alterations(), &[(x, 5)]);
    }
}
