use crate::model::Expression;
use crate::presolve::ConstraintCategory;
use crate::{ATol, ConstraintID};
use getset::{CopyGetters, Getters};

/// The relational sense of a constraint, expressed as `expression <sense> 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Sense {
    /// `expression <= 0`
    Less,
    /// `expression == 0`
    Equal,
    /// `expression >= 0`
    Greater,
}

/// A single linear constraint over the model's variables.
///
/// Invariants
/// ----------
/// - `violation_value == max(0, constraint_value)` for [`Sense::Less`]
/// - `violation_value == |constraint_value|` for [`Sense::Equal`]
/// - `violation_value == max(0, -constraint_value)` for [`Sense::Greater`]
/// - `local_penalty_coefficient` is reset to `global_penalty_coefficient` on restart.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct Constraint {
    #[getset(get_copy = "pub")]
    id: ConstraintID,
    #[getset(get = "pub")]
    name: String,
    #[getset(get_copy = "pub")]
    sense: Sense,
    #[getset(get = "pub")]
    expression: Expression,
    category: Option<ConstraintCategory>,
    enabled: bool,
    #[getset(get_copy = "pub")]
    local_penalty_coefficient: f64,
    #[getset(get_copy = "pub")]
    global_penalty_coefficient: f64,
    #[getset(get_copy = "pub")]
    constraint_value: f64,
    #[getset(get_copy = "pub")]
    violation_value: f64,
}

impl Constraint {
    pub fn new(id: ConstraintID, name: impl Into<String>, expression: Expression, sense: Sense) -> Self {
        Constraint {
            id,
            name: name.into(),
            sense,
            expression,
            category: None,
            enabled: true,
            local_penalty_coefficient: 1.0,
            global_penalty_coefficient: 1.0,
            constraint_value: 0.0,
            violation_value: 0.0,
        }
    }

    pub fn category(&self) -> Option<ConstraintCategory> {
        self.category
    }

    pub fn set_category(&mut self, category: ConstraintCategory) {
        self.category = Some(category);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn violation_of(sense: Sense, constraint_value: f64) -> f64 {
        match sense {
            Sense::Less => constraint_value.max(0.0),
            Sense::Equal => constraint_value.abs(),
            Sense::Greater => (-constraint_value).max(0.0),
        }
    }

    /// Recomputes `constraint_value`/`violation_value` from a freshly evaluated expression value.
    pub fn refresh(&mut self, constraint_value: f64) {
        self.constraint_value = constraint_value;
        self.violation_value = Self::violation_of(self.sense, constraint_value);
    }

    pub fn is_feasible(&self, atol: ATol) -> bool {
        self.violation_value <= *atol
    }

    pub fn set_local_penalty_coefficient(&mut self, value: f64) {
        self.local_penalty_coefficient = value.max(0.0);
    }

    pub fn set_global_penalty_coefficient(&mut self, value: f64) {
        self.global_penalty_coefficient = value.max(0.0);
    }

    pub fn reset_local_to_global(&mut self) {
        self.local_penalty_coefficient = self.global_penalty_coefficient;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_matches_sense() {
        assert_eq!(Constraint::violation_of(Sense::Less, 3.0), 3.0);
        assert_eq!(Constraint::violation_of(Sense::Less, -3.0), 0.0);
        assert_eq!(Constraint::violation_of(Sense::Equal, -2.0), 2.0);
        assert_eq!(Constraint::violation_of(Sense::Greater, -4.0), 4.0);
        assert_eq!(Constraint::violation_of(Sense::Greater, 4.0), 0.0);
    }
}
