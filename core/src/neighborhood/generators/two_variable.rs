//! Shared extraction for the two-variable move generators: every generator in
//! [`super::equality`], [`super::ratio`], [`super::precedence`], and
//! [`super::variable_bound`] starts from the same "binomial" view of a presolve
//! category — a constraint over exactly two free (non-fixed, non-selection)
//! variables — so the pair/coefficient bookkeeping lives here once.
//!
//! Grounded on `printemps::neighborhood::BinomialConstraint`, which every
//! `*_move_generator.h` in the teacher's neighborhood directory converts its
//! input constraints to before building move templates.

use crate::model::{Constraint, Model, Sense, VariableKind};
use crate::presolve::ConstraintCategory;
use crate::VariableID;

#[derive(Debug, Clone, Copy)]
pub struct Binomial {
    pub constraint_id: crate::ConstraintID,
    pub first: VariableID,
    pub second: VariableID,
    pub coefficient_first: f64,
    pub coefficient_second: f64,
    pub constant: f64,
    pub sense: Sense,
}

fn as_binomial(constraint: &Constraint) -> Option<Binomial> {
    let terms: Vec<_> = constraint.expression().terms().collect();
    if terms.len() != 2 {
        return None;
    }
    Some(Binomial {
        constraint_id: constraint.id(),
        first: terms[0].0,
        second: terms[1].0,
        coefficient_first: terms[0].1,
        coefficient_second: terms[1].1,
        constant: constraint.expression().constant_term(),
        sense: constraint.sense(),
    })
}

/// Every enabled constraint of `category` reduced to a [`Binomial`], excluding
/// constraints that touch a fixed or Selection-group variable (those move under
/// the selection/fixed-variable machinery instead).
pub fn effective_binomials(model: &Model, category: ConstraintCategory) -> Vec<Binomial> {
    model
        .constraints()
        .iter()
        .filter(|c| c.is_enabled() && c.category() == Some(category))
        .filter_map(as_binomial)
        .filter(|b| {
            let v1 = model.variable(b.first);
            let v2 = model.variable(b.second);
            !v1.is_fixed()
                && !v2.is_fixed()
                && v1.kind() != VariableKind::Selection
                && v2.kind() != VariableKind::Selection
        })
        .collect()
}

pub fn is_binary(model: &Model, var: VariableID) -> bool {
    model.variable(var).bound().is_binary()
}

pub fn related_constraints(model: &Model, b: &Binomial) -> smallvec::SmallVec<[crate::ConstraintID; 8]> {
    model.graph().related_constraints([b.first, b.second]).into()
}
