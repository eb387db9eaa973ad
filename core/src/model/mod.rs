//! The algebraic model: variables, expressions, constraints, objective, and the
//! reverse variable-to-constraint dependency graph (component B).

mod constraint;
mod error;
mod expression;
mod graph;
mod selection;
mod variable;

pub use constraint::{Constraint, Sense};
pub use error::ModelError;
pub use expression::Expression;
pub use graph::DependencyGraph;
pub use selection::SelectionGroup;
pub use variable::{Variable, VariableKind};

use crate::multi_array::Shape;
use crate::{ConstraintID, SelectionID, VariableID};

/// Optimization direction of the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ObjectiveSense {
    Minimize,
    Maximize,
}

/// Owns the full algebraic model and its reverse dependency graph.
///
/// Built incrementally through `create_variable`/`create_constraint`/`set_objective`;
/// call [`Model::setup`] once construction is complete to freeze the dependency graph,
/// then use [`Model::update`]/[`Model::apply_alterations`] to keep cached values current.
#[derive(Debug, Clone)]
pub struct Model {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    selections: Vec<SelectionGroup>,
    objective: Expression,
    objective_set: bool,
    sense: ObjectiveSense,
    objective_value: f64,
    graph: DependencyGraph,
}

impl Default for Model {
    fn default() -> Self {
        Model {
            variables: Vec::new(),
            constraints: Vec::new(),
            selections: Vec::new(),
            objective: Expression::constant(0.0),
            objective_set: false,
            sense: ObjectiveSense::Minimize,
            objective_value: 0.0,
            graph: DependencyGraph::default(),
        }
    }
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates `shape.len()` fresh integer variables sharing one `[lower, upper]` bound,
    /// returning their ids in row-major (flat) order. Mirrors the builder's `create_variable`.
    pub fn create_variables(
        &mut self,
        name_prefix: &str,
        shape: &Shape,
        lower: i64,
        upper: i64,
    ) -> Result<Vec<VariableID>, ModelError> {
        let bound = crate::Bound::new(lower, upper)?;
        let mut ids = Vec::with_capacity(shape.len());
        for flat in 0..shape.len() {
            let id = VariableID::from(self.variables.len());
            let idx = shape.unflat(flat);
            let joined = idx
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join(",");
            let name = if idx.is_empty() {
                name_prefix.to_string()
            } else {
                format!("{name_prefix}[{joined}]")
            };
            self.variables.push(Variable::new(id, name, bound));
            ids.push(id);
        }
        Ok(ids)
    }

    pub fn create_variable(&mut self, name: &str, lower: i64, upper: i64) -> Result<VariableID, ModelError> {
        Ok(self.create_variables(name, &Shape::scalar(), lower, upper)?[0])
    }

    pub fn create_constraint(
        &mut self,
        name: &str,
        expression: Expression,
        sense: Sense,
    ) -> Result<ConstraintID, ModelError> {
        for var in expression.variables() {
            if var.index() >= self.variables.len() {
                return Err(ModelError::UndefinedVariableID { id: var });
            }
        }
        let id = ConstraintID::from(self.constraints.len());
        self.constraints
            .push(Constraint::new(id, name, expression, sense));
        Ok(id)
    }

    pub fn create_selection_group(&mut self, variables: Vec<VariableID>) -> SelectionID {
        let id = SelectionID::from(self.selections.len());
        for &var in &variables {
            self.variables[var.index()].set_selection(id);
        }
        self.selections.push(SelectionGroup::new(id, variables));
        id
    }

    pub fn set_objective(&mut self, expression: Expression) {
        for (var, coef) in expression.terms() {
            if var.index() < self.variables.len() {
                self.variables[var.index()].set_objective_coefficient(coef);
            }
        }
        self.objective = expression;
        self.objective_set = true;
    }

    pub fn is_objective_set(&self) -> bool {
        self.objective_set
    }

    /// Checks builder-level preconditions that `setup()` itself can't enforce
    /// (e.g. an objective expression must be supplied, even a constant one,
    /// before the model is handed to [`crate::solve`]).
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.objective_set {
            return Err(ModelError::ObjectiveNotSet);
        }
        Ok(())
    }

    pub fn set_sense(&mut self, sense: ObjectiveSense) {
        self.sense = sense;
    }

    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, id: VariableID) -> &Variable {
        &self.variables[id.index()]
    }

    pub fn variable_mut(&mut self, id: VariableID) -> &mut Variable {
        &mut self.variables[id.index()]
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn constraint(&self, id: ConstraintID) -> &Constraint {
        &self.constraints[id.index()]
    }

    pub fn constraint_mut(&mut self, id: ConstraintID) -> &mut Constraint {
        &mut self.constraints[id.index()]
    }

    pub fn selections(&self) -> &[SelectionGroup] {
        &self.selections
    }

    pub fn selection_mut(&mut self, id: SelectionID) -> &mut SelectionGroup {
        &mut self.selections[id.index()]
    }

    pub fn objective(&self) -> &Expression {
        &self.objective
    }

    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Freezes the reverse dependency graph and refreshes every cache. Call once after
    /// the model has been fully built (and, ordinarily, after presolve has run).
    pub fn setup(&mut self) {
        let constraint_vars: Vec<_> = self
            .constraints
            .iter()
            .map(|c| (c.id(), c.expression().variables().collect()))
            .collect();
        self.graph = DependencyGraph::build(
            self.variables.len(),
            constraint_vars,
            self.objective.variables(),
        );
        for group in &mut self.selections {
            let related = self.graph.related_constraints(group.variables().iter().copied());
            group.set_related_constraints(related.into());
            if let Some(&selected) = group.variables().iter().find(|&&v| self.variables[v.index()].value() == 1) {
                group.set_selected(selected);
            }
        }
        self.update();
    }

    /// Recomputes every expression/constraint/objective cache from current variable values.
    pub fn update(&mut self) {
        let value_of = |id: VariableID| self.variables[id.index()].value();
        self.objective_value = self.objective.evaluate(value_of);
        for constraint in &mut self.constraints {
            let v = constraint.expression().evaluate(value_of);
            constraint.refresh(v);
        }
    }

    /// Applies a move's alterations in one shot and incrementally refreshes only
    /// the caches that changed: the objective (if any altered variable appears in it)
    /// and each related constraint reached through the dependency graph.
    pub fn apply_alterations(&mut self, alterations: &[(VariableID, i64)]) -> Result<(), ModelError> {
        for &(id, value) in alterations {
            let var = &self.variables[id.index()];
            if var.is_fixed() && value != var.value() {
                return Err(ModelError::FixedVariableReassignment {
                    id,
                    fixed_value: var.value(),
                    attempted: value,
                });
            }
            if !var.bound().contains(value) {
                return Err(ModelError::BoundViolation {
                    id,
                    value,
                    lower: var.bound().lower(),
                    upper: var.bound().upper(),
                });
            }
        }

        let old_value_of = |id: VariableID| self.variables[id.index()].value();
        if alterations
            .iter()
            .any(|&(id, _)| self.graph.is_in_objective(id))
        {
            self.objective_value += self.objective.evaluate_delta(alterations, old_value_of);
        }

        let touched_vars = alterations.iter().map(|&(id, _)| id);
        let related = self.graph.related_constraints(touched_vars);

        for &constraint_id in &related {
            let constraint = &self.constraints[constraint_id.index()];
            let delta = constraint.expression().evaluate_delta(alterations, old_value_of);
            let new_value = constraint.constraint_value() + delta;
            self.constraints[constraint_id.index()].refresh(new_value);
        }

        for &(id, value) in alterations {
            self.variables[id.index()].assign_unchecked(value);
        }

        for &(id, _) in alterations {
            if let Some(group_id) = self.variables[id.index()].selection() {
                if self.variables[id.index()].value() == 1 {
                    self.selections[group_id.index()].set_selected(id);
                }
            }
        }

        Ok(())
    }

    pub fn total_violation(&self) -> f64 {
        self.constraints
            .iter()
            .filter(|c| c.is_enabled())
            .map(|c| c.violation_value())
            .sum()
    }

    pub fn is_feasible(&self, atol: crate::ATol) -> bool {
        self.constraints
            .iter()
            .filter(|c| c.is_enabled())
            .all(|c| c.is_feasible(atol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_alterations_matches_full_update() {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 5).unwrap();
        let y = model.create_variable("y", 0, 5).unwrap();
        let mut obj = Expression::constant(0.0);
        obj.add_term(x, 1.0);
        obj.add_term(y, 2.0);
        model.set_objective(obj);
        let mut expr = Expression::constant(-4.0);
        expr.add_term(x, 1.0);
        expr.add_term(y, 1.0);
        model.create_constraint("c0", expr, Sense::Less).unwrap();
        model.setup();

        model.apply_alterations(&[(x, 3)]).unwrap();
        let incremental_obj = model.objective_value();
        let incremental_violation = model.constraint(ConstraintID::from(0u32)).violation_value();

        model.update();
        assert_eq!(model.objective_value(), incremental_obj);
        assert_eq!(
            model.constraint(ConstraintID::from(0u32)).violation_value(),
            incremental_violation
        );
    }

    #[test]
    fn validate_requires_an_objective() {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 5).unwrap();
        assert!(matches!(model.validate(), Err(ModelError::ObjectiveNotSet)));
        model.set_objective(Expression::single_term(x, 1.0));
        assert!(model.validate().is_ok());
    }

    #[test]
    fn fixed_variable_rejects_reassignment() {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 5).unwrap();
        model.variable_mut(x).fix(2);
        model.setup();
        assert!(model.apply_alterations(&[(x, 3)]).is_err());
        assert!(model.apply_alterations(&[(x, 2)]).is_ok());
    }
}
