//! The problem-input boundary (§6 "Problem input"): a plain JSON schema this
//! crate owns and translates into calls on the core's model builder. The core
//! itself never parses a file — it only ever sees `Model::create_variable`,
//! `create_constraint`, and `set_objective`.

use std::collections::BTreeMap;

use serde::Deserialize;
use tabumip::model::{Expression, Model, ObjectiveSense, Sense};

#[derive(Debug, thiserror::Error)]
pub enum ProblemError {
    #[error("objective references undefined variable index {0}")]
    UndefinedObjectiveVariable(usize),
    #[error("constraint {name:?} references undefined variable index {index}")]
    UndefinedConstraintVariable { name: String, index: usize },
    #[error(transparent)]
    Model(#[from] tabumip::model::ModelError),
}

#[derive(Debug, Deserialize)]
pub struct VariableSpec {
    pub name: String,
    pub lower: i64,
    pub upper: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenseSpec {
    Minimize,
    Maximize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintSenseSpec {
    Less,
    Equal,
    Greater,
}

impl From<ConstraintSenseSpec> for Sense {
    fn from(value: ConstraintSenseSpec) -> Self {
        match value {
            ConstraintSenseSpec::Less => Sense::Less,
            ConstraintSenseSpec::Equal => Sense::Equal,
            ConstraintSenseSpec::Greater => Sense::Greater,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ObjectiveSpec {
    pub sense: SenseSpec,
    /// Variable index (as a string, since JSON object keys are strings) to coefficient.
    pub terms: BTreeMap<usize, f64>,
    #[serde(default)]
    pub constant: f64,
}

#[derive(Debug, Deserialize)]
pub struct ConstraintSpec {
    pub name: String,
    pub terms: BTreeMap<usize, f64>,
    #[serde(default)]
    pub constant: f64,
    pub sense: ConstraintSenseSpec,
}

#[derive(Debug, Deserialize)]
pub struct ProblemSpec {
    pub variables: Vec<VariableSpec>,
    pub objective: ObjectiveSpec,
    #[serde(default)]
    pub constraints: Vec<ConstraintSpec>,
}

impl ProblemSpec {
    pub fn into_model(self) -> Result<Model, ProblemError> {
        let mut model = Model::new();
        let mut ids = Vec::with_capacity(self.variables.len());
        for var in &self.variables {
            ids.push(model.create_variable(&var.name, var.lower, var.upper)?);
        }

        let mut objective = Expression::constant(self.objective.constant);
        for (&index, &coefficient) in &self.objective.terms {
            let id = *ids
                .get(index)
                .ok_or(ProblemError::UndefinedObjectiveVariable(index))?;
            objective.add_term(id, coefficient);
        }
        model.set_objective(objective);
        model.set_sense(match self.objective.sense {
            SenseSpec::Minimize => ObjectiveSense::Minimize,
            SenseSpec::Maximize => ObjectiveSense::Maximize,
        });

        for constraint in self.constraints {
            let mut expression = Expression::constant(constraint.constant);
            for (&index, &coefficient) in &constraint.terms {
                let id = *ids.get(index).ok_or_else(|| ProblemError::UndefinedConstraintVariable {
                    name: constraint.name.clone(),
                    index,
                })?;
                expression.add_term(id, coefficient);
            }
            model.create_constraint(&constraint.name, expression, constraint.sense.into())?;
        }

        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_two_variable_knapsack_from_json() {
        let json = r#"{
            "variables": [{"name": "x0", "lower": 0, "upper": 1}, {"name": "x1", "lower": 0, "upper": 1}],
            "objective": {"sense": "minimize", "terms": {"0": -1.0, "1": -1.0}},
            "constraints": [{"name": "capacity", "terms": {"0": 1.0, "1": 1.0}, "constant": -1.0, "sense": "less"}]
        }"#;
        let spec: ProblemSpec = serde_json::from_str(json).unwrap();
        let model = spec.into_model().unwrap();
        assert_eq!(model.variables().len(), 2);
        assert_eq!(model.constraints().len(), 1);
    }

    #[test]
    fn rejects_an_out_of_range_objective_term() {
        let json = r#"{
            "variables": [{"name": "x0", "lower": 0, "upper": 1}],
            "objective": {"sense": "minimize", "terms": {"5": 1.0}}
        }"#;
        let spec: ProblemSpec = serde_json::from_str(json).unwrap();
        assert!(matches!(
            spec.into_model(),
            Err(ProblemError::UndefinedObjectiveVariable(5))
        ));
    }
}
