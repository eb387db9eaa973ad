use crate::model::Model;
use crate::neighborhood::generator::{passes_mask, AcceptMask, MoveGenerator};
use crate::neighborhood::{Move, MoveType};
use crate::{SelectionID, VariableID};
use smallvec::smallvec;

/// One "swap" move per non-selected member of every [`crate::model::SelectionGroup`]:
/// deselect the currently-selected member, select this one.
///
/// Grounded on `printemps::neighborhood::SelectionMoveGenerator`. The template's
/// first alteration (which variable to deselect) is re-read from the group's
/// `selected()` pointer on every `update_moves` call since it changes as the search
/// progresses; the second alteration (which variable to select) is fixed at setup.
#[derive(Debug, Default)]
pub struct SelectionMoveGenerator {
    templates: Vec<(SelectionID, VariableID)>,
}

impl MoveGenerator for SelectionMoveGenerator {
    fn move_type(&self) -> MoveType {
        MoveType::Selection
    }

    fn setup(&mut self, model: &Model) {
        self.templates.clear();
        for group in model.selections() {
            for &member in group.variables() {
                if model.variable(member).is_fixed() {
                    continue;
                }
                self.templates.push((group.id(), member));
            }
        }
    }

    fn update_moves(&mut self, model: &Model, mask: AcceptMask) -> Vec<Move> {
        let mut moves = Vec::with_capacity(self.templates.len());
        for &(group_id, member) in &self.templates {
            let group = &model.selections()[group_id.index()];
            let Some(selected) = group.selected() else {
                continue;
            };
            if selected == member {
                continue;
            }
            let related = group.related_constraints().to_vec().into();
            let candidate = Move::new(smallvec![(selected, 0), (member, 1)], related, MoveType::Selection);
            if passes_mask(model, &candidate, mask) {
                moves.push(candidate);
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
    fn swaps_selected_member() {
        let mut model = Model::new();
        let vars = model
            .create_variables("x", &crate::multi_array::Shape::new(vec![3]), 0, 1)
            .unwrap();
        let mut e = Expression::constant(-1.0);
        for &v in &vars {
            e.add_term(v, 1.0);
        }
        model.create_constraint("c", e, Sense::Equal).unwrap();
        crate::presolve::presolve(&mut model);
        assert_eq!(model.selections().len(), 1);

        let mut gen = SelectionMoveGenerator::default();
        gen.setup(&model);
        let moves = gen.update_moves(&model, crate::neighborhood::generator::AcceptMask::all());
        assert_eq!(moves.len(), 2);
        for mv in &moves {
            assert_eq!(mv.alterations().len(), 2);
            assert_eq!(mv.alterations()[0].1, 0);
            assert_eq!(mv.alterations()[1].1, 1);
        }
    }
}
