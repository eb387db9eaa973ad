use crate::{ConstraintID, SelectionID, VariableID};
use smallvec::SmallVec;

/// A set of binary variables known, by presolve, to sum to exactly one: a one-hot group
/// detected from a [`crate::presolve::ConstraintCategory::SetPartitioning`] (or tight
/// `SetPacking`/`SetCovering`) constraint.
///
/// Invariant: exactly one member has value 1, and `selected()` points at that member.
#[derive(Debug, Clone)]
pub struct SelectionGroup {
    id: SelectionID,
    variables: Vec<VariableID>,
    selected: Option<VariableID>,
    related_constraints: SmallVec<[ConstraintID; 4]>,
}

impl SelectionGroup {
    pub fn new(id: SelectionID, variables: Vec<VariableID>) -> Self {
        SelectionGroup {
            id,
            variables,
            selected: None,
            related_constraints: SmallVec::new(),
        }
    }

    pub fn id(&self) -> SelectionID {
        self.id
    }

    pub fn variables(&self) -> &[VariableID] {
        &self.variables
    }

    pub fn selected(&self) -> Option<VariableID> {
        self.selected
    }

    pub fn set_selected(&mut self, variable: VariableID) {
        debug_assert!(self.variables.contains(&variable));
        self.selected = Some(variable);
    }

    pub fn related_constraints(&self) -> &[ConstraintID] {
        &self.related_constraints
    }

    pub fn set_related_constraints(&mut self, constraints: SmallVec<[ConstraintID; 4]>) {
        self.related_constraints = constraints;
    }

    pub fn others(&self, than: VariableID) -> impl Iterator<Item = VariableID> + '_ {
        self.variables.iter().copied().filter(move |&v| v != than)
    }
}
