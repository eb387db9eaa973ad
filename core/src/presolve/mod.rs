//! Constraint categorization and presolve (component D): classifies every linear
//! constraint into a closed taxonomy and runs bound tightening / fixing to a fixed point.

mod bound_tightening;
mod category;
mod error;

pub use bound_tightening::{fix_independent_and_implicit, tighten_bounds, BOUND_TIGHTENING_MAGNITUDE_CAP};
pub use category::{classify, ConstraintCategory};
pub use error::PresolveError;

use crate::model::{Model, VariableKind};

/// Classifies every enabled constraint in-place, then runs the presolve fixed point
/// (independent-variable fixing, redundancy removal with bound tightening, implicit
/// fixing) and re-detects Selection groups from newly recognized set-partitioning
/// constraints over binaries. Idempotent: running it twice is a no-op the second time.
pub fn presolve(model: &mut Model) {
    bound_tightening::run(model);
    categorize(model);
    detect_selection_groups(model);
    model.setup();
}

fn categorize(model: &mut Model) {
    let is_binary: Vec<bool> = model
        .variables()
        .iter()
        .map(|v| matches!(v.kind(), VariableKind::Binary | VariableKind::Selection))
        .collect();
    let ids: Vec<_> = model.constraints().iter().map(|c| c.id()).collect();
    for id in ids {
        if !model.constraint(id).is_enabled() {
            continue;
        }
        let category = classify(model.constraint(id), |v| is_binary[v.index()]);
        model.constraint_mut(id).set_category(category);
    }
}

/// Promotes every enabled `SetPartitioning` constraint over binaries into a
/// [`crate::model::SelectionGroup`], matching the original solver's one-hot detection.
fn detect_selection_groups(model: &mut Model) {
    let partitions: Vec<Vec<crate::VariableID>> = model
        .constraints()
        .iter()
        .filter(|c| c.is_enabled() && c.category() == Some(ConstraintCategory::SetPartitioning))
        .map(|c| c.expression().variables().collect())
        .collect();
    for variables in partitions {
        if variables
            .iter()
            .any(|&v| model.variable(v).selection().is_some())
        {
            continue;
        }
        model.create_selection_group(variables);
    }
}
