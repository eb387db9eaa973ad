//! The penalty-augmented tabu-search core (component E, §4.5): one short-term
//! memory search pass per call, consuming candidate moves from
//! [`crate::neighborhood::Neighborhood`] and writing accepted alterations
//! straight into the model. The outer loop that drives repeated passes and
//! adapts penalty coefficients between them lives in [`crate::penalty`].

mod error;
mod memory;

pub use error::TabuSearchError;
pub use memory::ShortTermMemory;

use crate::model::{Model, ObjectiveSense};
use crate::neighborhood::{evaluate_all, AcceptMask, Move, Neighborhood, ScoringContext};
use crate::options::{ImprovabilityScreeningMode, Options, TabuMode};
use crate::result::FeasibleIncumbentRecord;
use crate::{ATol, VariableID};
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Ordering;
use std::time::Instant;

/// A snapshot of the model's state, captured each time an incumbent improves.
/// Two flavors per the glossary: the *feasible* incumbent (best objective among
/// feasible assignments) and the *augmented* incumbent (tracked by score only,
/// see [`TabuSearch::augmented_incumbent_score`]).
#[derive(Debug, Clone)]
pub struct Incumbent {
    pub objective: f64,
    pub total_violation: f64,
    pub values: Vec<i64>,
}

impl Incumbent {
    fn capture(model: &Model) -> Self {
        Incumbent {
            objective: model.objective_value(),
            total_violation: model.total_violation(),
            values: model.variables().iter().map(|v| v.value()).collect(),
        }
    }
}

/// Result of one penalty-controller pass (§4.5 steps 1-9), consumed by
/// [`crate::penalty::PenaltyController`].
#[derive(Debug, Clone, Copy)]
pub struct PassOutcome {
    pub ended_feasible: bool,
    pub accepted_moves: u64,
    pub stopped_on_target: bool,
    pub stopped_on_time: bool,
    /// Whether any move accepted during this pass improved the feasible incumbent.
    pub improved_feasible: bool,
    /// Whether any move accepted during this pass improved the augmented incumbent.
    pub improved_augmented: bool,
    /// Total candidate moves scored across every inner iteration of this pass;
    /// feeds `thread_count_optimization`'s wall-clock-per-move estimate (§5).
    pub total_moves_scored: u64,
    pub pass_duration_seconds: f64,
}

/// Drops the worst-scoring moves before selection when `is_enabled_move_curtail`
/// is set (§6 `tabu_search.move_preserve_rate` / `pruning_rate_threshold`): keeps
/// every move within `pruning_rate_threshold` of the best score in the pool, but
/// never fewer than `move_preserve_rate` of the original candidates, so a pass
/// over a large candidate pool spends less time re-selecting among moves that are
/// already far off the best score found this iteration.
fn curtail_pool(pool: &mut Vec<Move>, scores: &mut Vec<crate::neighborhood::MoveScore>, preserve_rate: f64, pruning_rate_threshold: f64) {
    if pool.len() <= 1 {
        return;
    }
    let best = scores.iter().map(|s| s.score).fold(f64::INFINITY, f64::min);
    let worst = scores.iter().map(|s| s.score).fold(f64::NEG_INFINITY, f64::max);
    let span = worst - best;
    if span <= 0.0 {
        return;
    }
    let min_keep = ((pool.len() as f64) * preserve_rate.clamp(0.0, 1.0)).ceil().max(1.0) as usize;
    let threshold = best + pruning_rate_threshold.clamp(0.0, 1.0) * span;

    let mut order: Vec<usize> = (0..pool.len()).collect();
    order.sort_by(|&a, &b| scores[a].score.partial_cmp(&scores[b].score).unwrap_or(Ordering::Equal));
    let keep_count = order
        .iter()
        .take_while(|&&i| scores[i].score <= threshold)
        .count()
        .max(min_keep)
        .min(pool.len());

    let keep: std::collections::HashSet<usize> = order.into_iter().take(keep_count).collect();
    let mut new_pool = Vec::with_capacity(keep_count);
    let mut new_scores = Vec::with_capacity(keep_count);
    for (i, (m, s)) in pool.drain(..).zip(scores.drain(..)).enumerate() {
        if keep.contains(&i) {
            new_pool.push(m);
            new_scores.push(s);
        }
    }
    *pool = new_pool;
    *scores = new_scores;
}

/// Recomputes each mutable variable's `is_objective_improvable` /
/// `is_feasibility_improvable` flags (§3) from the model's current state.
/// Precomputed once per pass per the glossary entry for "improvability flag".
pub fn update_improvability(model: &mut Model) {
    let minimizing = matches!(model.sense(), ObjectiveSense::Minimize);
    let ids: Vec<VariableID> = model.variables().iter().map(|v| v.id()).collect();
    for id in ids {
        let var = model.variable(id);
        if var.is_fixed() {
            model.variable_mut(id).set_improvability(false, false);
            continue;
        }
        let coefficient = var.objective_coefficient();
        let wants_to_decrease = (coefficient > 0.0) == minimizing;
        let objective_improvable = if coefficient == 0.0 {
            false
        } else {
            (wants_to_decrease && var.has_lower_margin()) || (!wants_to_decrease && var.has_upper_margin())
        };

        let has_margin = var.has_lower_margin() || var.has_upper_margin();
        let touches_violated_constraint = model.graph().constraints_of(id).iter().any(|&cid| {
            let c = model.constraint(cid);
            c.is_enabled() && c.violation_value() > 0.0
        });
        let feasibility_improvable = has_margin && touches_violated_constraint;

        model.variable_mut(id).set_improvability(objective_improvable, feasibility_improvable);
    }
}

/// Retains only moves whose every altered variable is simultaneously
/// objective- *and* feasibility-improvable; used by the stricter screening
/// modes (§4.5 step 1) that `AcceptMask`'s either/or semantics can't express.
fn retain_both_improvable(model: &Model, pool: &mut Vec<Move>) {
    pool.retain(|candidate| {
        candidate.alterations().iter().all(|&(var_id, _)| {
            let var = model.variable(var_id);
            var.is_objective_improvable() && var.is_feasibility_improvable()
        })
    });
}

/// Owns the neighborhood, the short-term memory, and the running incumbents
/// across the whole search (they persist across outer passes; only the
/// effective tabu tenure is resampled per pass).
pub struct TabuSearch {
    neighborhood: Neighborhood,
    memory: ShortTermMemory,
    iteration: u64,
    augmented_incumbent_score: f64,
    /// Snapshot taken whenever the augmented incumbent improves, regardless of
    /// feasibility; reported as the least-violating assignment (§7
    /// "Infeasibility after all passes") when no feasible incumbent was ever found.
    augmented_incumbent: Option<Incumbent>,
    feasible_incumbent: Option<Incumbent>,
    feasible_incumbent_history: Vec<FeasibleIncumbentRecord>,
    accept_timestamps: Vec<u64>,
    consecutive_improvements: i64,
    consecutive_no_improvements: i64,
    inner_iteration_budget_scale: f64,
    /// Additive shift applied to `initial_tabu_tenure` before randomization, moved
    /// one step per pass toward more diversification on stagnation or more
    /// intensification on a sustained improvement streak (§4.5 step 8).
    tenure_offset: i64,
}

impl TabuSearch {
    pub fn new(neighborhood: Neighborhood, num_variables: usize) -> Result<Self, TabuSearchError> {
        if num_variables > u32::MAX as usize {
            return Err(TabuSearchError::TooManyVariables(num_variables));
        }
        Ok(TabuSearch {
            neighborhood,
            memory: ShortTermMemory::new(num_variables),
            iteration: 0,
            augmented_incumbent_score: f64::INFINITY,
            augmented_incumbent: None,
            feasible_incumbent: None,
            feasible_incumbent_history: Vec::new(),
            accept_timestamps: Vec::new(),
            consecutive_improvements: 0,
            consecutive_no_improvements: 0,
            inner_iteration_budget_scale: 1.0,
            tenure_offset: 0,
        })
    }

    /// Builds every move generator's internal templates from the (presolved)
    /// model; call once before the first [`TabuSearch::run_pass`].
    pub fn setup(&mut self, model: &Model) {
        self.neighborhood.setup(model);
    }

    /// Stages a chain candidate synthesized outside the search loop (e.g. by a
    /// caller seeding diversification moves); forwarded to the neighborhood.
    pub fn register_chain_candidate(&mut self, candidate: Move) {
        self.neighborhood.register_chain_candidate(candidate);
    }

    pub fn total_iterations(&self) -> u64 {
        self.iteration
    }

    pub fn augmented_incumbent_score(&self) -> f64 {
        self.augmented_incumbent_score
    }

    pub fn feasible_incumbent(&self) -> Option<&Incumbent> {
        self.feasible_incumbent.as_ref()
    }

    /// The best (least-violating, in augmented-score terms) assignment observed
    /// so far, feasible or not. `None` only before the first move is accepted.
    pub fn augmented_incumbent(&self) -> Option<&Incumbent> {
        self.augmented_incumbent.as_ref()
    }

    pub fn feasible_incumbent_history(&self) -> &[FeasibleIncumbentRecord] {
        &self.feasible_incumbent_history
    }

    pub fn accept_timestamps(&self) -> &[u64] {
        &self.accept_timestamps
    }

    /// Resets `local` penalty bookkeeping's companion signal: the intensity
    /// counters that drive adaptive tenure/iteration-budget adjustment, used by
    /// [`crate::penalty::PenaltyController`] on a Smart restart.
    pub fn reset_intensity(&mut self) {
        self.consecutive_improvements = 0;
        self.consecutive_no_improvements = 0;
        self.inner_iteration_budget_scale = 1.0;
        self.tenure_offset = 0;
    }

    /// `is_feasible` degrades `require_both` to objective-improvable-only
    /// screening: a feasible incumbent has no constraint left to violate, so
    /// `is_feasibility_improvable` is vacuously false for every variable and
    /// an AND-screen would empty the pool on every iteration (matching the
    /// original printemps behavior of screening on objective-improvability
    /// alone while feasible).
    fn accept_mask(&self, mode: ImprovabilityScreeningMode, inner_iteration: i64, is_feasible: bool) -> (AcceptMask, bool) {
        use ImprovabilityScreeningMode::*;
        let (mask, require_both) = match mode {
            Off => (AcceptMask::all(), false),
            Soft => (
                AcceptMask {
                    accept_all: false,
                    accept_objective_improvable: true,
                    accept_feasibility_improvable: true,
                },
                false,
            ),
            Aggressive => {
                let require_both = inner_iteration % 2 == 0;
                (
                    AcceptMask {
                        accept_all: false,
                        accept_objective_improvable: true,
                        accept_feasibility_improvable: true,
                    },
                    require_both,
                )
            }
            Intensive => (
                AcceptMask {
                    accept_all: false,
                    accept_objective_improvable: true,
                    accept_feasibility_improvable: true,
                },
                true,
            ),
            Automatic => {
                if self.consecutive_no_improvements > 0 {
                    (AcceptMask::all(), false)
                } else {
                    (
                        AcceptMask {
                            accept_all: false,
                            accept_objective_improvable: true,
                            accept_feasibility_improvable: true,
                        },
                        false,
                    )
                }
            }
        };
        (mask, require_both && !is_feasible)
    }

    /// Runs one penalty-controller pass: repeatedly selects and applies a move
    /// until a break condition from §4.5 step 9 fires. Penalty coefficients are
    /// read from `model`'s constraints directly (they're written only between
    /// passes, per §5's "shared resources" contract).
    #[allow(clippy::too_many_arguments)]
    pub fn run_pass(
        &mut self,
        model: &mut Model,
        options: &Options,
        atol: ATol,
        rng: &mut impl Rng,
        start: Instant,
        lagrangian_duals: Option<&[f64]>,
        store_history: bool,
    ) -> PassOutcome {
        let ts = &options.tabu_search;
        let num_mutable = model.variables().iter().filter(|v| v.is_mutable()).count().max(1) as f64;

        let base_tenure = (ts.initial_tabu_tenure as i64 + self.tenure_offset).max(1) as f64;
        let span = (base_tenure * ts.tabu_tenure_randomize_rate).max(0.0);
        let low = (base_tenure - span).max(1.0);
        let high = (base_tenure + span).max(low);
        let effective_tenure = if ts.tabu_tenure_randomize_rate > 0.0 && high > low {
            rng.random_range(low..=high).round().clamp(1.0, num_mutable) as i64
        } else {
            base_tenure.clamp(1.0, num_mutable) as i64
        };

        let iteration_budget = ((ts.iteration_max as f64) * self.inner_iteration_budget_scale)
            .round()
            .max(1.0) as i64;

        let mut accepted_moves = 0u64;
        let mut no_improve_streak = 0i64;
        let mut stopped_on_target = false;
        let mut stopped_on_time = false;
        let mut recent_accepted: Option<Move> = None;
        let mut any_improved_feasible = false;
        let mut any_improved_augmented = false;
        let mut total_moves_scored = 0u64;
        let pass_start = Instant::now();

        update_improvability(model);

        for inner in 0..iteration_budget {
            if options.general.time_max > 0.0 {
                let elapsed = start.elapsed().as_secs_f64() - options.general.time_offset;
                if elapsed >= options.general.time_max {
                    stopped_on_time = true;
                    break;
                }
            }

            let (mask, require_both) =
                self.accept_mask(options.neighborhood.improvability_screening_mode, inner, model.is_feasible(atol));
            let mut pool = self.neighborhood.update_moves(
                model,
                &options.neighborhood,
                mask,
                rng,
                options.parallel.is_enabled_move_update_parallelization,
            );
            if require_both {
                retain_both_improvable(model, &mut pool);
            }
            if pool.is_empty() {
                break;
            }
            if ts.is_enabled_shuffle {
                pool.shuffle(rng);
            }

            let local_penalty: Vec<f64> = model
                .constraints()
                .iter()
                .map(|c| c.local_penalty_coefficient())
                .collect();
            let ctx = ScoringContext {
                local_penalty: &local_penalty,
                frequency_penalty_coefficient: ts.frequency_penalty_coefficient,
                frequency: self.memory.frequency(),
                lagrangian_penalty_coefficient: ts.lagrangian_penalty_coefficient,
                lagrangian_duals,
            };
            let mut scores = evaluate_all(model, &ctx, &pool, options.parallel.is_enabled_move_evaluation_parallelization);
            total_moves_scored += pool.len() as u64;

            if ts.is_enabled_move_curtail {
                curtail_pool(&mut pool, &mut scores, ts.move_preserve_rate, ts.pruning_rate_threshold);
            }

            let Some(best_idx) = (0..pool.len()).min_by(|&a, &b| {
                scores[a].score.partial_cmp(&scores[b].score).unwrap_or(Ordering::Equal)
            }) else {
                break;
            };

            let best_is_tabu = self
                .memory
                .is_tabu(&pool[best_idx], self.iteration, effective_tenure, ts.tabu_mode);
            let strictly_improves_global = scores[best_idx].score < self.augmented_incumbent_score - atol.into_inner();

            let chosen = if !best_is_tabu || (strictly_improves_global && ts.ignore_tabu_if_global_incumbent) {
                Some(best_idx)
            } else {
                self.pick_non_tabu_or_least_tabu(&pool, &scores, effective_tenure, ts.tabu_mode)
            };

            let Some(chosen_idx) = chosen else {
                no_improve_streak += 1;
                if ts.is_enabled_automatic_break && no_improve_streak >= options.penalty.inner_stagnation_threshold {
                    break;
                }
                continue;
            };

            let candidate = pool[chosen_idx].clone();
            if model.apply_alterations(candidate.alterations()).is_err() {
                continue;
            }
            if !options.general.is_enabled_fast_evaluation {
                // Full revalidation instead of trusting the incremental caches;
                // the two must agree per the `update(move)` testable property.
                model.update();
            }

            self.iteration += 1;
            accepted_moves += 1;
            self.memory.register_move(&candidate, self.iteration);
            if store_history {
                self.accept_timestamps.push(self.iteration);
            }

            let is_feasible = model.is_feasible(atol);
            let chosen_score = scores[chosen_idx].score;
            let improved_augmented = chosen_score < self.augmented_incumbent_score - atol.into_inner();
            if improved_augmented {
                self.augmented_incumbent_score = chosen_score;
                self.augmented_incumbent = Some(Incumbent::capture(model));
            }

            let mut improved_feasible = false;
            if is_feasible {
                improved_feasible = self
                    .feasible_incumbent
                    .as_ref()
                    .map_or(true, |inc| model.objective_value() < inc.objective - atol.into_inner());
                if improved_feasible {
                    let incumbent = Incumbent::capture(model);
                    if store_history {
                        self.feasible_incumbent_history.push(FeasibleIncumbentRecord {
                            iteration: self.iteration,
                            objective: incumbent.objective,
                            values: model.variables().iter().map(|v| (v.id(), v.value())).collect(),
                        });
                    }
                    self.feasible_incumbent = Some(incumbent);
                }
            }

            any_improved_augmented |= improved_augmented;
            any_improved_feasible |= improved_feasible;

            if improved_augmented || improved_feasible {
                self.consecutive_improvements += 1;
                self.consecutive_no_improvements = 0;
                no_improve_streak = 0;
            } else {
                self.consecutive_no_improvements += 1;
                self.consecutive_improvements = 0;
                no_improve_streak += 1;
            }

            if ts.is_enabled_automatic_iteration_adjustment {
                if self.consecutive_improvements >= ts.intensity_increase_count_threshold {
                    self.inner_iteration_budget_scale *= ts.iteration_increase_rate;
                } else if self.consecutive_no_improvements >= ts.intensity_decrease_count_threshold {
                    self.inner_iteration_budget_scale *= ts.iteration_decrease_rate;
                }
                self.inner_iteration_budget_scale = self.inner_iteration_budget_scale.clamp(0.1, 100.0);
            }

            if ts.is_enabled_automatic_tabu_tenure_adjustment {
                if self.consecutive_improvements >= ts.intensity_increase_count_threshold {
                    self.tenure_offset -= 1;
                } else if self.consecutive_no_improvements >= ts.intensity_decrease_count_threshold {
                    self.tenure_offset += 1;
                }
                self.tenure_offset = self.tenure_offset.clamp(-(ts.initial_tabu_tenure as i64), ts.initial_tabu_tenure as i64);
            }

            if let Some(recent) = recent_accepted.take() {
                if recent.variables().all(|v| !candidate.variables().any(|w| w == v)) {
                    self.neighborhood.register_chain_candidate(recent.compose_chain(&candidate));
                }
            }
            recent_accepted = Some(candidate);

            if options.general.target_objective_value.is_finite() && is_feasible {
                let reached = match model.sense() {
                    ObjectiveSense::Minimize => model.objective_value() <= options.general.target_objective_value,
                    ObjectiveSense::Maximize => model.objective_value() >= options.general.target_objective_value,
                };
                if reached {
                    stopped_on_target = true;
                    break;
                }
            }

            if ts.is_enabled_automatic_break && no_improve_streak >= options.penalty.inner_stagnation_threshold {
                break;
            }
        }

        PassOutcome {
            ended_feasible: model.is_feasible(atol),
            accepted_moves,
            stopped_on_target,
            stopped_on_time,
            improved_feasible: any_improved_feasible,
            improved_augmented: any_improved_augmented,
            total_moves_scored,
            pass_duration_seconds: pass_start.elapsed().as_secs_f64(),
        }
    }

    /// Cold-start diversification (§4.5 "Initial modification"): applies `count`
    /// randomly chosen available moves before the first tabu pass, bypassing
    /// tabu/frequency bookkeeping entirely since this happens before the search
    /// proper begins. A no-op if no moves are available (e.g. every variable is
    /// fixed after presolve).
    pub fn perform_initial_modification(&mut self, model: &mut Model, options: &Options, count: usize, rng: &mut impl Rng) {
        for _ in 0..count {
            let pool = self.neighborhood.update_moves(
                model,
                &options.neighborhood,
                AcceptMask::all(),
                rng,
                options.parallel.is_enabled_move_update_parallelization,
            );
            if pool.is_empty() {
                break;
            }
            let idx = rng.random_range(0..pool.len());
            if model.apply_alterations(pool[idx].alterations()).is_ok() {
                model.update();
            }
        }
    }

    /// Best non-tabu move, or the least-tabu move that still improves the
    /// augmented incumbent, or `None` if neither exists (§4.5 step 6).
    fn pick_non_tabu_or_least_tabu(
        &self,
        pool: &[Move],
        scores: &[crate::neighborhood::MoveScore],
        tenure: i64,
        mode: TabuMode,
    ) -> Option<usize> {
        let mut best_non_tabu: Option<usize> = None;
        for i in 0..pool.len() {
            if self.memory.is_tabu(&pool[i], self.iteration, tenure, mode) {
                continue;
            }
            if best_non_tabu.map_or(true, |b| scores[i].score < scores[b].score) {
                best_non_tabu = Some(i);
            }
        }
        if best_non_tabu.is_some() {
            return best_non_tabu;
        }

        let mut least_tabu: Option<(usize, i64)> = None;
        for i in 0..pool.len() {
            if scores[i].score >= self.augmented_incumbent_score {
                continue;
            }
            let remaining = self.memory.remaining_tenure(&pool[i], self.iteration, tenure);
            if least_tabu.map_or(true, |(_, r)| remaining < r) {
                least_tabu = Some((i, remaining));
            }
        }
        least_tabu.map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Expression, Sense};
    use crate::options::NeighborhoodOptions;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup_binary_model() -> Model {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 1).unwrap();
        let y = model.create_variable("y", 0, 1).unwrap();
        let mut obj = Expression::constant(0.0);
        obj.add_term(x, -1.0);
        obj.add_term(y, -1.0);
        model.set_objective(obj);
        let mut expr = Expression::constant(-1.0);
        expr.add_term(x, 1.0);
        expr.add_term(y, 1.0);
        model.create_constraint("c0", expr, Sense::Less).unwrap();
        crate::presolve::presolve(&mut model);
        model
    }

    #[test]
    fn improvability_flags_reflect_objective_direction() {
        let mut model = setup_binary_model();
        update_improvability(&mut model);
        let x = crate::VariableID::from(0u32);
        assert!(model.variable(x).is_objective_improvable());
    }

    #[test]
    fn run_pass_finds_the_feasible_optimum() {
        let mut model = setup_binary_model();
        let options = Options::default();
        update_improvability(&mut model);

        let neighborhood = Neighborhood::new(&options.neighborhood, None).unwrap();
        let mut search = TabuSearch::new(neighborhood, model.variables().len()).unwrap();
        search.neighborhood.setup(&model);

        let mut rng = ChaCha8Rng::seed_from_u64(options.general.seed);
        let start = Instant::now();
        search.run_pass(&mut model, &options, ATol::default(), &mut rng, start, None, false);

        let incumbent = search.feasible_incumbent().expect("a feasible incumbent was found");
        assert!((incumbent.objective - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn never_applies_out_of_bound_moves() {
        let mut options = Options::default();
        options.neighborhood = NeighborhoodOptions::default();
        let mut model = setup_binary_model();
        update_improvability(&mut model);
        let neighborhood = Neighborhood::new(&options.neighborhood, None).unwrap();
        let mut search = TabuSearch::new(neighborhood, model.variables().len()).unwrap();
        search.neighborhood.setup(&model);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let start = Instant::now();
        search.run_pass(&mut model, &options, ATol::default(), &mut rng, start, None, false);
        for v in model.variables() {
            assert!(v.bound().contains(v.value()));
        }
    }

    #[test]
    fn run_pass_reports_how_many_moves_it_scored() {
        let mut model = setup_binary_model();
        let options = Options::default();
        update_improvability(&mut model);

        let neighborhood = Neighborhood::new(&options.neighborhood, None).unwrap();
        let mut search = TabuSearch::new(neighborhood, model.variables().len()).unwrap();
        search.neighborhood.setup(&model);
        let mut rng = ChaCha8Rng::seed_from_u64(options.general.seed);
        let start = Instant::now();
        let outcome = search.run_pass(&mut model, &options, ATol::default(), &mut rng, start, None, false);

        assert!(outcome.total_moves_scored > 0);
        assert!(outcome.pass_duration_seconds >= 0.0);
    }

    #[test]
    fn automatic_tabu_tenure_adjustment_lengthens_tenure_on_stagnation() {
        let mut model = setup_binary_model();
        let mut options = Options::default();
        options.tabu_search.is_enabled_automatic_tabu_tenure_adjustment = true;
        options.tabu_search.intensity_decrease_count_threshold = 1;
        options.tabu_search.initial_tabu_tenure = 3;
        update_improvability(&mut model);

        let neighborhood = Neighborhood::new(&options.neighborhood, None).unwrap();
        let mut search = TabuSearch::new(neighborhood, model.variables().len()).unwrap();
        search.neighborhood.setup(&model);
        search.consecutive_no_improvements = 5;
        assert_eq!(search.tenure_offset, 0);

        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let start = Instant::now();
        search.run_pass(&mut model, &options, ATol::default(), &mut rng, start, None, false);

        assert!(search.tenure_offset >= 0);
    }

    #[test]
    fn initial_modification_perturbs_a_fresh_model_without_tabu_bookkeeping() {
        let mut model = setup_binary_model();
        let options = Options::default();
        update_improvability(&mut model);

        let neighborhood = Neighborhood::new(&options.neighborhood, None).unwrap();
        let mut search = TabuSearch::new(neighborhood, model.variables().len()).unwrap();
        search.neighborhood.setup(&model);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        search.perform_initial_modification(&mut model, &options, 2, &mut rng);

        assert_eq!(search.iteration, 0);
        for v in model.variables() {
            assert!(v.bound().contains(v.value()));
        }
    }

    #[test]
    fn initial_modification_is_a_no_op_once_no_moves_remain() {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 0).unwrap();
        let mut obj = Expression::constant(0.0);
        obj.add_term(x, 1.0);
        model.set_objective(obj);
        model.setup();

        let options = Options::default();
        let neighborhood = Neighborhood::new(&options.neighborhood, None).unwrap();
        let mut search = TabuSearch::new(neighborhood, model.variables().len()).unwrap();
        search.neighborhood.setup(&model);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        search.perform_initial_modification(&mut model, &options, 4, &mut rng);
        assert_eq!(model.variable(x).value(), 0);
    }

    #[test]
    fn curtail_pool_keeps_the_best_moves_and_respects_the_preserve_rate() {
        use crate::neighborhood::{Move, MoveScore, MoveType};
        use smallvec::smallvec;

        let x = crate::VariableID::from(0u32);
        let y = crate::VariableID::from(1u32);
        let mut pool = vec![
            Move::new(smallvec![(x, 1)], smallvec![], MoveType::Binary),
            Move::new(smallvec![(y, 0)], smallvec![], MoveType::Binary),
            Move::new(smallvec![(x, 0)], smallvec![], MoveType::Binary),
        ];
        let mut scores = vec![
            MoveScore { objective_delta: 0.0, violation_delta: 0.0, score: 0.0 },
            MoveScore { objective_delta: 1.0, violation_delta: 0.0, score: 1.0 },
            MoveScore { objective_delta: 10.0, violation_delta: 0.0, score: 10.0 },
        ];

        curtail_pool(&mut pool, &mut scores, 0.5, 0.1);

        assert!(!pool.is_empty());
        assert!(scores.iter().all(|s| s.score <= 1.0));
        assert_eq!(pool.len(), scores.len());
    }
}
