//! `ConstantRatioIntegers` moves: an alternative move family over the same
//! two-variable integer equalities covered by [`super::equality`], using the
//! "key variable leads" technique from
//! `printemps::neighborhood::ConstantRatioIntegersMoveGenerator` instead of that
//! generator's symmetric shift-both-sides technique.
//!
//! The key variable is the one with the larger-magnitude coefficient (the one
//! whose unit shift moves the partner by the smallest amount, keeping the solved
//! partner value close to its current value); only the key variable is shifted,
//! the partner is solved to restore the equality.

use super::two_variable::{effective_binomials, is_binary, related_constraints, Binomial};
use crate::model::Model;
use crate::neighborhood::generator::{filter_move, passes_mask, AcceptMask, MoveGenerator};
use crate::neighborhood::{Move, MoveType};
use crate::presolve::ConstraintCategory;
use smallvec::smallvec;

#[derive(Debug, Clone, Copy)]
struct KeyedBinomial {
    binomial: Binomial,
    key_is_first: bool,
}

#[derive(Debug, Default)]
pub struct ConstantRatioMoveGenerator {
    binomials: Vec<KeyedBinomial>,
}

impl MoveGenerator for ConstantRatioMoveGenerator {
    fn move_type(&self) -> MoveType {
        MoveType::ConstantRatioIntegers
    }

    fn setup(&mut self, model: &Model) {
        self.binomials = effective_binomials(model, ConstraintCategory::Aggregation)
            .into_iter()
            .filter(|b| !(is_binary(model, b.first) && is_binary(model, b.second)))
            .filter(|b| (b.coefficient_first.abs() - b.coefficient_second.abs()).abs() > f64::EPSILON)
            .map(|binomial| KeyedBinomial {
                binomial,
                key_is_first: binomial.coefficient_first.abs() >= binomial.coefficient_second.abs(),
            })
            .collect();
    }

    fn update_moves(&mut self, model: &Model, mask: AcceptMask) -> Vec<Move> {
        let mut moves = Vec::with_capacity(self.binomials.len() * 2);
        for keyed in &self.binomials {
            let b = &keyed.binomial;
            let related = related_constraints(model, b);
            let (key_var, key_coef, partner_var, partner_coef) = if keyed.key_is_first {
                (b.first, b.coefficient_first, b.second, b.coefficient_second)
            } else {
                (b.second, b.coefficient_second, b.first, b.coefficient_first)
            };
            let key_value = model.variable(key_var).value();

            for delta in [1i64, -1] {
                let key_target = key_value + delta;
                let partner_target = ((-b.constant - key_coef * key_target as f64) / partner_coef).round() as i64;
                let candidate = Move::new(
                    smallvec![(key_var, key_target), (partner_var, partner_target)],
                    related.clone(),
                    MoveType::ConstantRatioIntegers,
                );
                if filter_move(model, &candidate) && passes_mask(model, &candidate, mask) {
                    moves.push(candidate);
                }
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
    fn key_variable_leads_the_shift() {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 100).unwrap();
        let y = model.create_variable("y", 0, 100).unwrap();
        model.variable_mut(x).assign_unchecked(10);
        model.variable_mut(y).assign_unchecked(20);
        let mut e = Expression::constant(-50.0);
        e.add_term(x, 3.0);
        e.add_term(y, 1.0);
        model.create_constraint("c", e, Sense::Equal).unwrap();
        crate::presolve::presolve(&mut model);

        let mut gen = ConstantRatioMoveGenerator::default();
        gen.setup(&model);
        let moves = gen.update_moves(&model, AcceptMask::all());
        assert_eq!(moves.len(), 2);
        for mv in &moves {
            assert_eq!(mv.alterations()[0].0, x);
            let fx = mv.alterations()[0].1 as f64;
            let fy = mv.alterations()[1].1 as f64;
            assert!((3.0 * fx + fy - 50.0).abs() < 1e-9);
        }
    }
}
