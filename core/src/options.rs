//! Flat, serde-derived options record supplied once to [`crate::solve`] (§6).
//!
//! Every group mirrors a table in the specification; every field carries the same
//! default the teacher solver ships so that deserializing a partial JSON document
//! (the CLI boundary's job, not this crate's) yields the documented defaults for
//! everything else.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("penalty.relaxing_rate_min ({min}) must be <= relaxing_rate_max ({max})")]
    RelaxingRateRange { min: f64, max: f64 },
    #[error("penalty.relaxing_rate ({0}) must lie in (0, 1]")]
    RelaxingRateOutOfRange(f64),
    #[error("penalty.tightening_rate ({0}) must be >= 1")]
    TighteningRateTooSmall(f64),
    #[error("penalty.updating_balance ({0}) must lie in [0, 1]")]
    UpdatingBalanceOutOfRange(f64),
    #[error("tabu_search.initial_tabu_tenure must be at least 1, got {0}")]
    TenureTooSmall(i64),
    #[error("general.iteration_max must be positive, got {0}")]
    IterationMaxNotPositive(i64),
    #[error(transparent)]
    ATol(#[from] crate::atol::ATolError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestartMode {
    Simple,
    Smart,
}
impl Default for RestartMode {
    fn default() -> Self {
        RestartMode::Smart
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabuMode {
    All,
    Any,
}
impl Default for TabuMode {
    fn default() -> Self {
        TabuMode::All
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainMoveReduceMode {
    OverlapRate,
    Shuffle,
}
impl Default for ChainMoveReduceMode {
    fn default() -> Self {
        ChainMoveReduceMode::OverlapRate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    Off,
    Defined,
    Smaller,
    Larger,
    Independent,
    UserDefined,
}
impl Default for SelectionMode {
    fn default() -> Self {
        SelectionMode::Defined
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImprovabilityScreeningMode {
    Off,
    Soft,
    Aggressive,
    Intensive,
    Automatic,
}
impl Default for ImprovabilityScreeningMode {
    fn default() -> Self {
        ImprovabilityScreeningMode::Intensive
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralOptions {
    pub iteration_max: i64,
    pub time_max: f64,
    pub time_offset: f64,
    pub target_objective_value: f64,
    pub seed: u64,
    pub is_enabled_fast_evaluation: bool,
    /// Absolute tolerance used when comparing violations and bound margins
    /// against zero; fed to [`crate::ATol::new`] once by [`crate::solve`].
    pub atol: f64,
}
impl Default for GeneralOptions {
    fn default() -> Self {
        GeneralOptions {
            iteration_max: 100,
            time_max: 120.0,
            time_offset: 0.0,
            target_objective_value: f64::NEG_INFINITY,
            seed: 1,
            is_enabled_fast_evaluation: true,
            atol: 1e-6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyOptions {
    pub initial_penalty_coefficient: f64,
    pub relaxing_rate: f64,
    pub tightening_rate: f64,
    pub updating_balance: f64,
    pub relaxing_rate_min: f64,
    pub relaxing_rate_max: f64,
    pub relaxing_rate_increase_rate: f64,
    pub relaxing_rate_decrease_rate: f64,
    pub inner_stagnation_threshold: i64,
    pub outer_stagnation_threshold: i64,
    pub is_enabled_group_penalty_coefficient: bool,
    pub is_enabled_shrink_penalty_coefficient: bool,
}
impl Default for PenaltyOptions {
    fn default() -> Self {
        PenaltyOptions {
            initial_penalty_coefficient: 1e7,
            relaxing_rate: 0.9,
            tightening_rate: 1.0,
            updating_balance: 0.0,
            relaxing_rate_min: 0.3,
            relaxing_rate_max: 1.0 - 1e-4,
            relaxing_rate_increase_rate: 0.1,
            relaxing_rate_decrease_rate: 0.9,
            inner_stagnation_threshold: 20,
            outer_stagnation_threshold: 80,
            is_enabled_group_penalty_coefficient: false,
            is_enabled_shrink_penalty_coefficient: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelOptions {
    pub is_enabled_move_update_parallelization: bool,
    pub is_enabled_move_evaluation_parallelization: bool,
    pub number_of_threads_move_update: usize,
    pub number_of_threads_move_evaluation: usize,
    pub is_enabled_thread_count_optimization: bool,
    pub thread_count_optimization_decay_factor_milli: u32,
}
impl Default for ParallelOptions {
    fn default() -> Self {
        ParallelOptions {
            is_enabled_move_update_parallelization: true,
            is_enabled_move_evaluation_parallelization: true,
            number_of_threads_move_update: 0,
            number_of_threads_move_evaluation: 0,
            is_enabled_thread_count_optimization: false,
            thread_count_optimization_decay_factor_milli: 700,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    pub is_enabled_presolve: bool,
    pub is_enabled_initial_value_correction: bool,
}
impl Default for PreprocessOptions {
    fn default() -> Self {
        PreprocessOptions {
            is_enabled_presolve: true,
            is_enabled_initial_value_correction: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestartOptions {
    pub restart_mode: RestartMode,
}
impl Default for RestartOptions {
    fn default() -> Self {
        RestartOptions {
            restart_mode: RestartMode::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeighborhoodOptions {
    pub is_enabled_binary_move: bool,
    pub is_enabled_integer_move: bool,
    pub is_enabled_exclusive_or_move: bool,
    pub is_enabled_exclusive_nor_move: bool,
    pub is_enabled_inverted_integers_move: bool,
    pub is_enabled_balanced_integers_move: bool,
    pub is_enabled_constant_sum_integers_move: bool,
    pub is_enabled_constant_difference_integers_move: bool,
    pub is_enabled_constant_ratio_integers_move: bool,
    pub is_enabled_aggregation_move: bool,
    pub is_enabled_precedence_move: bool,
    pub is_enabled_variable_bound_move: bool,
    pub is_enabled_trinomial_exclusive_nor_move: bool,
    pub is_enabled_soft_selection_move: bool,
    pub is_enabled_chain_move: bool,
    pub is_enabled_two_flip_move: bool,
    pub is_enabled_user_defined_move: bool,
    pub chain_move_capacity: usize,
    pub chain_move_reduce_mode: ChainMoveReduceMode,
    pub chain_move_overlap_rate_threshold: f64,
    pub selection_mode: SelectionMode,
    pub improvability_screening_mode: ImprovabilityScreeningMode,
}
impl Default for NeighborhoodOptions {
    fn default() -> Self {
        NeighborhoodOptions {
            is_enabled_binary_move: true,
            is_enabled_integer_move: true,
            is_enabled_exclusive_or_move: true,
            is_enabled_exclusive_nor_move: true,
            is_enabled_inverted_integers_move: true,
            is_enabled_balanced_integers_move: true,
            is_enabled_constant_sum_integers_move: true,
            is_enabled_constant_difference_integers_move: true,
            is_enabled_constant_ratio_integers_move: true,
            is_enabled_aggregation_move: true,
            is_enabled_precedence_move: false,
            is_enabled_variable_bound_move: false,
            is_enabled_trinomial_exclusive_nor_move: false,
            is_enabled_soft_selection_move: false,
            is_enabled_chain_move: true,
            is_enabled_two_flip_move: false,
            is_enabled_user_defined_move: false,
            chain_move_capacity: 10_000,
            chain_move_reduce_mode: ChainMoveReduceMode::default(),
            chain_move_overlap_rate_threshold: 0.2,
            selection_mode: SelectionMode::default(),
            improvability_screening_mode: ImprovabilityScreeningMode::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabuSearchOptions {
    pub iteration_max: i64,
    pub initial_tabu_tenure: i64,
    pub tabu_tenure_randomize_rate: f64,
    pub tabu_mode: TabuMode,
    pub move_preserve_rate: f64,
    pub frequency_penalty_coefficient: f64,
    pub lagrangian_penalty_coefficient: f64,
    pub pruning_rate_threshold: f64,
    pub is_enabled_shuffle: bool,
    pub is_enabled_move_curtail: bool,
    pub is_enabled_automatic_break: bool,
    pub is_enabled_automatic_tabu_tenure_adjustment: bool,
    pub is_enabled_automatic_iteration_adjustment: bool,
    pub is_enabled_initial_modification: bool,
    pub intensity_increase_count_threshold: i64,
    pub intensity_decrease_count_threshold: i64,
    pub iteration_increase_rate: f64,
    pub iteration_decrease_rate: f64,
    pub ignore_tabu_if_global_incumbent: bool,
    pub number_of_initial_modification: usize,
    /// Used to derive the initial-modification move count when
    /// `number_of_initial_modification == 0`: `(fixed_rate + U(0,1) *
    /// randomize_rate) * #mutable_variables`, rounded (§4.5 "Initial modification").
    pub initial_modification_fixed_rate: f64,
    pub initial_modification_randomize_rate: f64,
}
impl Default for TabuSearchOptions {
    fn default() -> Self {
        TabuSearchOptions {
            iteration_max: 200,
            initial_tabu_tenure: 10,
            tabu_tenure_randomize_rate: 0.3,
            tabu_mode: TabuMode::default(),
            move_preserve_rate: 1.0,
            frequency_penalty_coefficient: 1e-4,
            lagrangian_penalty_coefficient: 1.0,
            pruning_rate_threshold: 1.0,
            is_enabled_shuffle: true,
            is_enabled_move_curtail: false,
            is_enabled_automatic_break: true,
            is_enabled_automatic_tabu_tenure_adjustment: true,
            is_enabled_automatic_iteration_adjustment: true,
            is_enabled_initial_modification: true,
            intensity_increase_count_threshold: 10,
            intensity_decrease_count_threshold: 10,
            iteration_increase_rate: 1.5,
            iteration_decrease_rate: 0.9,
            ignore_tabu_if_global_incumbent: true,
            number_of_initial_modification: 0,
            initial_modification_fixed_rate: 0.1,
            initial_modification_randomize_rate: 0.05,
        }
    }
}

/// Root options record; see module docs and §6 for the group breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Options {
    pub general: GeneralOptions,
    pub penalty: PenaltyOptions,
    pub parallel: ParallelOptions,
    pub preprocess: PreprocessOptions,
    pub restart: RestartOptions,
    pub neighborhood: NeighborhoodOptions,
    pub tabu_search: TabuSearchOptions,
    /// Whether [`crate::SolverResult`] should retain the full accept-timestamp /
    /// feasible-incumbent history (`is_enabled_store_feasible_solutions`, §6).
    pub is_enabled_store_feasible_solutions: bool,
}

impl Options {
    /// Validates cross-field invariants the plain defaults can't express, returning
    /// a typed [`OptionsError`] on the first violation found. Called once by
    /// [`crate::solve`] before the first pass.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.penalty.relaxing_rate_min > self.penalty.relaxing_rate_max {
            return Err(OptionsError::RelaxingRateRange {
                min: self.penalty.relaxing_rate_min,
                max: self.penalty.relaxing_rate_max,
            });
        }
        if !(0.0..=1.0).contains(&self.penalty.relaxing_rate) || self.penalty.relaxing_rate <= 0.0 {
            return Err(OptionsError::RelaxingRateOutOfRange(self.penalty.relaxing_rate));
        }
        if self.penalty.tightening_rate < 1.0 {
            return Err(OptionsError::TighteningRateTooSmall(self.penalty.tightening_rate));
        }
        if !(0.0..=1.0).contains(&self.penalty.updating_balance) {
            return Err(OptionsError::UpdatingBalanceOutOfRange(self.penalty.updating_balance));
        }
        if self.tabu_search.initial_tabu_tenure < 1 {
            return Err(OptionsError::TenureTooSmall(self.tabu_search.initial_tabu_tenure));
        }
        if self.general.iteration_max <= 0 {
            return Err(OptionsError::IterationMaxNotPositive(self.general.iteration_max));
        }
        crate::ATol::new(self.general.atol)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(Options::default().validate().is_ok());
    }

    #[test]
    fn partial_json_fills_in_documented_defaults() {
        let opts: Options = serde_json::from_str(r#"{"tabu_search": {"initial_tabu_tenure": 5}}"#).unwrap();
        assert_eq!(opts.tabu_search.initial_tabu_tenure, 5);
        assert_eq!(opts.tabu_search.iteration_max, TabuSearchOptions::default().iteration_max);
        assert_eq!(opts.general, GeneralOptions::default());
    }

    #[test]
    fn rejects_inverted_relaxing_rate_range() {
        let mut opts = Options::default();
        opts.penalty.relaxing_rate_min = 0.9;
        opts.penalty.relaxing_rate_max = 0.1;
        assert!(opts.validate().is_err());
    }
}
