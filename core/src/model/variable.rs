use crate::{Bound, SelectionID, VariableID};
use getset::{CopyGetters, Getters};

/// The structural role of a variable, set by [`crate::presolve`] and consumed by
/// the neighborhood generators to decide which move types apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum VariableKind {
    Binary,
    Integer,
    /// Member of a one-hot [`crate::model::SelectionGroup`].
    Selection,
}

/// A single integer decision variable.
///
/// Invariants
/// ----------
/// - `bound.contains(value)` always holds.
/// - `has_lower_margin() == (value > bound.lower())`
/// - `has_upper_margin() == (value < bound.upper())`
/// - If `is_fixed()`, every accepted move leaves `value` unchanged.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct Variable {
    #[getset(get_copy = "pub")]
    id: VariableID,
    #[getset(get = "pub")]
    name: String,
    #[getset(get_copy = "pub")]
    bound: Bound,
    #[getset(get_copy = "pub")]
    value: i64,
    #[getset(get_copy = "pub")]
    kind: VariableKind,
    fixed: bool,
    #[getset(get_copy = "pub")]
    selection: Option<SelectionID>,
    #[getset(get_copy = "pub")]
    objective_coefficient: f64,
    is_objective_improvable: bool,
    is_feasibility_improvable: bool,
}

impl Variable {
    pub fn new(id: VariableID, name: impl Into<String>, bound: Bound) -> Self {
        let kind = if bound.is_binary() {
            VariableKind::Binary
        } else {
            VariableKind::Integer
        };
        Variable {
            id,
            name: name.into(),
            bound,
            value: bound.clamp(0),
            kind,
            fixed: false,
            selection: None,
            objective_coefficient: 0.0,
            is_objective_improvable: true,
            is_feasibility_improvable: true,
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn is_mutable(&self) -> bool {
        !self.fixed && !self.bound.is_fixed()
    }

    pub fn has_lower_margin(&self) -> bool {
        self.value > self.bound.lower()
    }

    pub fn has_upper_margin(&self) -> bool {
        self.value < self.bound.upper()
    }

    pub fn is_objective_improvable(&self) -> bool {
        self.is_objective_improvable
    }

    pub fn is_feasibility_improvable(&self) -> bool {
        self.is_feasibility_improvable
    }

    pub fn set_improvability(&mut self, objective: bool, feasibility: bool) {
        self.is_objective_improvable = objective;
        self.is_feasibility_improvable = feasibility;
    }

    pub fn set_objective_coefficient(&mut self, coefficient: f64) {
        self.objective_coefficient = coefficient;
    }

    pub fn set_selection(&mut self, group: SelectionID) {
        self.selection = Some(group);
        self.kind = VariableKind::Selection;
    }

    /// Assigns a value already known to satisfy the bound; used by the search
    /// hot path where move generators pre-filter out-of-bound targets.
    pub fn assign_unchecked(&mut self, value: i64) {
        debug_assert!(self.bound.contains(value));
        self.value = value;
    }

    pub fn set_bound(&mut self, bound: Bound) {
        self.bound = bound;
        if bound.is_binary() && !matches!(self.kind, VariableKind::Selection) {
            self.kind = VariableKind::Binary;
        }
        self.value = bound.clamp(self.value);
    }

    pub fn fix(&mut self, value: i64) {
        debug_assert!(self.bound.contains(value));
        self.value = value;
        self.bound = Bound::fixed(value);
        self.fixed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_bound_sets_binary_kind() {
        let v = Variable::new(VariableID::from(0u32), "x", Bound::of_binary());
        assert_eq!(v.kind(), VariableKind::Binary);
    }

    #[test]
    fn margins_track_bound_position() {
        let mut v = Variable::new(VariableID::from(0u32), "x", Bound::new(0, 5).unwrap());
        v.assign_unchecked(0);
        assert!(!v.has_lower_margin());
        assert!(v.has_upper_margin());
        v.assign_unchecked(5);
        assert!(v.has_lower_margin());
        assert!(!v.has_upper_margin());
    }

    #[test]
    fn fixing_freezes_bound() {
        let mut v = Variable::new(VariableID::from(0u32), "x", Bound::new(0, 5).unwrap());
        v.fix(3);
        assert!(v.is_fixed());
        assert!(!v.is_mutable());
        assert_eq!(v.bound(), Bound::fixed(3));
    }
}
