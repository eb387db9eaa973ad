//! The neighborhood (component C): owns every move generator, builds the
//! candidate pool for one tabu-search iteration, and folds in the chain-move
//! composition workflow (§4.3, §4.5).

pub mod evaluator;
mod error;
pub mod generator;
mod generators;
mod moves;

pub use error::NeighborhoodError;
pub use evaluator::{baseline_penalty_term, evaluate_all, MoveScore, ScoringContext};
pub use generator::{AcceptMask, MoveGenerator};
pub use generators::{
    BinaryMoveGenerator, ChainMoveGenerator, ConstantRatioMoveGenerator, EqualityMoveGenerator,
    IntegerMoveGenerator, PrecedenceMoveGenerator, SelectionMoveGenerator, SoftSelectionMoveGenerator,
    TrinomialExclusiveNorMoveGenerator, TwoFlipMoveGenerator, UserDefinedMoveGenerator, UserDefinedMoveUpdater,
    VariableBoundMoveGenerator, INTEGER_SHIFT_DELTA_MAX,
};
pub use moves::{Alteration, Move, MoveType};

use crate::model::Model;
use crate::options::{ChainMoveReduceMode, NeighborhoodOptions, SelectionMode};
use rand::Rng;

/// Whether moves of `move_type` should be kept, per the matching
/// `is_enabled_*_move` flag. [`MoveType::Selection`] is gated structurally (the
/// generator is only constructed when `selection_mode != Off`), not here.
fn move_type_enabled(move_type: MoveType, options: &NeighborhoodOptions) -> bool {
    match move_type {
        MoveType::Binary => options.is_enabled_binary_move,
        MoveType::Integer => options.is_enabled_integer_move,
        MoveType::Selection => true,
        MoveType::ExclusiveOr => options.is_enabled_exclusive_or_move,
        MoveType::ExclusiveNor => options.is_enabled_exclusive_nor_move,
        MoveType::InvertedIntegers => options.is_enabled_inverted_integers_move,
        MoveType::BalancedIntegers => options.is_enabled_balanced_integers_move,
        MoveType::ConstantSumIntegers => options.is_enabled_constant_sum_integers_move,
        MoveType::ConstantDifferenceIntegers => options.is_enabled_constant_difference_integers_move,
        MoveType::ConstantRatioIntegers => options.is_enabled_constant_ratio_integers_move,
        MoveType::Aggregation => options.is_enabled_aggregation_move,
        MoveType::Precedence => options.is_enabled_precedence_move,
        MoveType::VariableBound => options.is_enabled_variable_bound_move,
        MoveType::SoftSelection => options.is_enabled_soft_selection_move,
        MoveType::TrinomialExclusiveNor => options.is_enabled_trinomial_exclusive_nor_move,
        MoveType::Chain => options.is_enabled_chain_move,
        MoveType::TwoFlip => options.is_enabled_two_flip_move,
        MoveType::UserDefined => options.is_enabled_user_defined_move,
    }
}

/// Owns every configured move generator and drives one candidate-pool refresh
/// per tabu-search iteration.
pub struct Neighborhood {
    generators: Vec<Box<dyn MoveGenerator>>,
    chain: Option<ChainMoveGenerator>,
    /// Chain candidates synthesized by the tabu-search core from two recently
    /// accepted moves (§4.5 step 7), staged here until the next `update_moves`
    /// folds them into the chain generator's pool.
    pending_chain: Vec<Move>,
}

impl Neighborhood {
    pub fn new(
        options: &NeighborhoodOptions,
        user_defined_updater: Option<UserDefinedMoveUpdater>,
    ) -> Result<Self, NeighborhoodError> {
        if options.is_enabled_user_defined_move && user_defined_updater.is_none() {
            return Err(NeighborhoodError::MissingUserDefinedCallback);
        }

        let mut generators: Vec<Box<dyn MoveGenerator>> = Vec::new();
        if options.is_enabled_binary_move {
            generators.push(Box::new(BinaryMoveGenerator::default()));
        }
        if options.is_enabled_integer_move {
            generators.push(Box::new(IntegerMoveGenerator::default()));
        }
        if options.selection_mode != SelectionMode::Off {
            generators.push(Box::new(SelectionMoveGenerator::default()));
        }
        let any_equality_family = options.is_enabled_exclusive_or_move
            || options.is_enabled_exclusive_nor_move
            || options.is_enabled_balanced_integers_move
            || options.is_enabled_inverted_integers_move
            || options.is_enabled_constant_sum_integers_move
            || options.is_enabled_constant_difference_integers_move
            || options.is_enabled_aggregation_move;
        if any_equality_family {
            generators.push(Box::new(EqualityMoveGenerator::default()));
        }
        if options.is_enabled_constant_ratio_integers_move {
            generators.push(Box::new(ConstantRatioMoveGenerator::default()));
        }
        if options.is_enabled_precedence_move {
            generators.push(Box::new(PrecedenceMoveGenerator::default()));
        }
        if options.is_enabled_variable_bound_move {
            generators.push(Box::new(VariableBoundMoveGenerator::default()));
        }
        if options.is_enabled_soft_selection_move {
            generators.push(Box::new(SoftSelectionMoveGenerator::default()));
        }
        if options.is_enabled_trinomial_exclusive_nor_move {
            generators.push(Box::new(TrinomialExclusiveNorMoveGenerator::default()));
        }
        if options.is_enabled_two_flip_move {
            generators.push(Box::new(TwoFlipMoveGenerator::default()));
        }
        if options.is_enabled_user_defined_move {
            if let Some(updater) = user_defined_updater {
                generators.push(Box::new(UserDefinedMoveGenerator::new(updater)));
            }
        }

        let chain = options.is_enabled_chain_move.then(ChainMoveGenerator::default);

        Ok(Neighborhood {
            generators,
            chain,
            pending_chain: Vec::new(),
        })
    }

    pub fn setup(&mut self, model: &Model) {
        for generator in &mut self.generators {
            generator.setup(model);
        }
    }

    /// Stages a chain candidate (typically a composition of two just-accepted
    /// moves) to be folded into the chain generator's pool on the next refresh.
    /// A no-op when chain moves are disabled.
    pub fn register_chain_candidate(&mut self, candidate: Move) {
        if self.chain.is_some() {
            self.pending_chain.push(candidate);
        }
    }

    /// Refreshes every generator's move pool, filters by the per-type enable
    /// flags and `mask`, and appends chain-move compositions when enabled.
    /// `parallel_update` gates the move-update region (§5 region 1,
    /// `parallel.is_enabled_move_update_parallelization`): generators are
    /// mutually independent, so when enabled they're fanned out over the
    /// worker pool one generator per task rather than serially.
    pub fn update_moves(
        &mut self,
        model: &Model,
        options: &NeighborhoodOptions,
        mask: AcceptMask,
        rng: &mut impl Rng,
        parallel_update: bool,
    ) -> Vec<Move> {
        let generated: Vec<Move> = {
            #[cfg(feature = "parallel")]
            if parallel_update {
                use rayon::prelude::*;
                self.generators
                    .par_iter_mut()
                    .flat_map_iter(|generator| generator.update_moves(model, mask).into_iter())
                    .collect()
            } else {
                self.generators.iter_mut().flat_map(|generator| generator.update_moves(model, mask)).collect()
            }
            #[cfg(not(feature = "parallel"))]
            {
                let _ = parallel_update;
                self.generators.iter_mut().flat_map(|generator| generator.update_moves(model, mask)).collect()
            }
        };
        let mut pool: Vec<Move> = generated
            .into_iter()
            .filter(|candidate| move_type_enabled(candidate.move_type(), options))
            .collect();

        if let Some(chain) = &mut self.chain {
            chain.clear();
            for candidate in self.pending_chain.drain(..) {
                chain.register(candidate);
            }
            let mut seen_vars = std::collections::HashSet::new();
            let univariable: Vec<&Move> = pool
                .iter()
                .filter(|m| m.is_univariable() && !m.is_special())
                .filter(|m| seen_vars.insert(m.alterations()[0].0))
                .collect();

            for pair in univariable.chunks(2) {
                if let [first, second] = pair {
                    if first.alterations()[0].0 != second.alterations()[0].0 {
                        chain.register(first.compose_chain(second));
                    }
                }
            }
            chain.deduplicate();
            chain.reduce(options.chain_move_capacity, options.chain_move_reduce_mode, rng);
            pool.extend(
                chain
                    .moves()
                    .iter()
                    .filter(|m| m.overlap_rate() <= options.chain_move_overlap_rate_threshold)
                    .cloned(),
            );
        }

        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Expression;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn disabling_a_flag_drops_its_move_type() {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 1).unwrap();
        model.set_objective(Expression::single_term(x, 1.0));
        model.setup();

        let mut options = NeighborhoodOptions::default();
        options.is_enabled_integer_move = false;
        options.is_enabled_aggregation_move = false;
        options.is_enabled_chain_move = false;
        options.selection_mode = SelectionMode::Off;

        let mut neighborhood = Neighborhood::new(&options, None).unwrap();
        neighborhood.setup(&model);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let moves = neighborhood.update_moves(&model, &options, AcceptMask::all(), &mut rng, true);
        assert!(moves.iter().all(|m| m.move_type() == MoveType::Binary));
    }

    #[test]
    fn user_defined_move_requires_a_callback() {
        let mut options = NeighborhoodOptions::default();
        options.is_enabled_user_defined_move = true;
        assert!(matches!(
            Neighborhood::new(&options, None),
            Err(NeighborhoodError::MissingUserDefinedCallback)
        ));
    }
}
