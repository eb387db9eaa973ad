//! # tabumip — a tabu-search metaheuristic solver for mixed-integer programs
//!
//! Given an algebraic model of integer decision variables, box bounds, a
//! linear (or user-supplied) objective, and linear constraints, [`solve`]
//! searches for an assignment that minimizes or maximizes the objective while
//! satisfying every constraint, using a penalty-augmented tabu search.
//!
//! ## Building a model
//!
//! ```rust
//! use tabumip::model::{Model, Expression, Sense, ObjectiveSense};
//!
//! let mut model = Model::new();
//! let x = model.create_variable("x", 0, 1).unwrap();
//! let y = model.create_variable("y", 0, 1).unwrap();
//!
//! let mut objective = Expression::constant(0.0);
//! objective.add_term(x, -1.0);
//! objective.add_term(y, -1.0);
//! model.set_objective(objective);
//! model.set_sense(ObjectiveSense::Minimize);
//!
//! let mut capacity = Expression::constant(-1.0);
//! capacity.add_term(x, 1.0);
//! capacity.add_term(y, 1.0);
//! model.create_constraint("capacity", capacity, Sense::Less).unwrap();
//!
//! let result = tabumip::solve(&mut model, &tabumip::Options::default()).unwrap();
//! assert!(result.is_feasible);
//! assert_eq!(result.incumbent_objective, -1.0);
//! ```
//!
//! ## Crate layout
//!
//! - [`multi_array`] — N-dimensional indexing over flat storage (§4.1).
//! - [`model`] — the algebraic model and its reverse dependency graph (§4.2).
//! - [`presolve`] — constraint categorization and presolve (§4.4).
//! - [`neighborhood`] — move generators and incremental evaluation (§4.3).
//! - [`tabu_search`] — the penalty-augmented search loop itself (§4.5).
//! - [`penalty`] — the penalty controller driving the outer loop (§4.6).
//! - [`relaxation`] — the boundary trait for advisory warm-start solvers (§6).
//! - [`options`] / [`result`] — the public configuration and result records (§6).

pub mod model;
pub mod multi_array;
pub mod neighborhood;
pub mod options;
pub mod penalty;
pub mod presolve;
pub mod relaxation;
pub mod result;
pub mod tabu_search;

mod atol;
mod bound;
mod coefficient;
mod error;
mod ids;
mod macros;

pub use atol::{ATol, ATolError};
pub use bound::{Bound, BoundError, DEFAULT_LOWER, DEFAULT_UPPER};
pub use coefficient::{Coefficient, CoefficientError};
pub use error::SolverError;
pub use ids::{ConstraintID, ExpressionID, SelectionID, VariableID};
pub use options::Options;
pub use relaxation::{RelaxationAdvice, RelaxationSolver};
pub use result::SolverResult;

use model::Model;
use neighborhood::{Neighborhood, UserDefinedMoveUpdater};
use penalty::{PenaltyController, RestartDecision};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::time::Instant;
use tabu_search::{update_improvability, Incumbent, TabuSearch};
use tracing::{debug, info, instrument};

/// Sizes rayon's process-global thread pool from the larger of
/// `number_of_threads_move_update`/`number_of_threads_move_evaluation` (0 means
/// "let rayon pick", per §6). Rayon's global pool can only be configured once
/// per process, so later calls (or a later `solve` in the same process with
/// different thread counts) silently keep whatever was configured first — this
/// is a best-effort hint, not a per-solve guarantee.
#[cfg(feature = "parallel")]
fn configure_thread_pool(options: &options::ParallelOptions) {
    let threads = options
        .number_of_threads_move_update
        .max(options.number_of_threads_move_evaluation);
    if threads > 0 {
        let _ = rayon::ThreadPoolBuilder::new().num_threads(threads).build_global();
    }
}

#[cfg(not(feature = "parallel"))]
fn configure_thread_pool(_options: &options::ParallelOptions) {}

/// Clamps every mutable variable's current value into its (possibly
/// presolve-tightened) bound; the `is_enabled_initial_value_correction`
/// option (§6).
fn correct_initial_values(model: &mut Model) {
    let ids: Vec<VariableID> = model.variables().iter().map(|v| v.id()).collect();
    for id in ids {
        let var = model.variable(id);
        if var.is_fixed() {
            continue;
        }
        let clamped = var.bound().clamp(var.value());
        if clamped != var.value() {
            let _ = model.apply_alterations(&[(id, clamped)]);
        }
    }
}

/// Applies a [`RelaxationAdvice`]'s assignment as the model's starting point.
/// Values outside a variable's bound are clamped rather than rejected, and
/// fixed variables are left untouched — the advice is only ever a suggestion.
fn apply_relaxation_advice(model: &mut Model, advice: &RelaxationAdvice) {
    let alterations: Vec<(VariableID, i64)> = model
        .variables()
        .iter()
        .enumerate()
        .filter(|(_, var)| !var.is_fixed())
        .filter_map(|(i, var)| {
            let proposed = *advice.values.get(i)?;
            let clamped = var.bound().clamp(proposed);
            (clamped != var.value()).then_some((var.id(), clamped))
        })
        .collect();
    let _ = model.apply_alterations(&alterations);
}

fn initialize_penalty_coefficients(model: &mut Model, initial: f64) {
    let ids: Vec<crate::ConstraintID> = model.constraints().iter().map(|c| c.id()).collect();
    for id in ids {
        model.constraint_mut(id).set_local_penalty_coefficient(initial);
        model.constraint_mut(id).set_global_penalty_coefficient(initial);
    }
}

fn build_result(
    model: &Model,
    search: &TabuSearch,
    total_outer_iterations: u64,
    elapsed_seconds: f64,
    options: &Options,
) -> SolverResult {
    let (incumbent, is_feasible): (Option<&Incumbent>, bool) = match search.feasible_incumbent() {
        Some(inc) => (Some(inc), true),
        None => (search.augmented_incumbent(), false),
    };

    let (values, objective, total_violation) = match incumbent {
        Some(inc) => (
            inc.values
                .iter()
                .enumerate()
                .map(|(i, &v)| (VariableID::from(i), v))
                .collect::<BTreeMap<_, _>>(),
            inc.objective,
            inc.total_violation,
        ),
        None => (
            model
                .variables()
                .iter()
                .map(|v| (v.id(), v.value()))
                .collect::<BTreeMap<_, _>>(),
            model.objective_value(),
            model.total_violation(),
        ),
    };

    let violations = model
        .constraints()
        .iter()
        .map(|c| (c.id(), c.violation_value()))
        .collect();

    SolverResult {
        incumbent_objective: objective,
        is_feasible,
        total_violation,
        values,
        violations,
        total_iterations: search.total_iterations(),
        total_outer_iterations,
        elapsed_seconds,
        feasible_incumbent_history: options
            .is_enabled_store_feasible_solutions
            .then(|| search.feasible_incumbent_history().to_vec()),
        accept_timestamps: options
            .is_enabled_store_feasible_solutions
            .then(|| search.accept_timestamps().to_vec()),
    }
}

/// Composes an optional advisory [`RelaxationSolver`] and an optional
/// user-defined move callback around [`solve`]; most callers only need the
/// free function, which is equivalent to `SolverBuilder::new().solve(...)`.
#[derive(Default)]
pub struct SolverBuilder<'a> {
    relaxation: Option<&'a dyn RelaxationSolver>,
    user_defined_move: Option<UserDefinedMoveUpdater>,
}

impl<'a> SolverBuilder<'a> {
    pub fn new() -> Self {
        SolverBuilder {
            relaxation: None,
            user_defined_move: None,
        }
    }

    /// Installs an advisory Lagrange-dual / PDLP-style solver invoked once,
    /// before the first tabu pass, to seed an initial assignment and dual
    /// estimates (§6 "External solver delegation").
    pub fn with_relaxation(mut self, solver: &'a dyn RelaxationSolver) -> Self {
        self.relaxation = Some(solver);
        self
    }

    /// Installs the callback backing `neighborhood.is_enabled_user_defined_move`.
    pub fn with_user_defined_move(mut self, updater: UserDefinedMoveUpdater) -> Self {
        self.user_defined_move = Some(updater);
        self
    }

    /// Runs the full outer loop (§4.6) over repeated tabu-search passes (§4.5)
    /// until a stop condition fires, returning the best incumbent found.
    #[instrument(skip_all, fields(variables = model.variables().len(), constraints = model.constraints().len()))]
    pub fn solve(self, model: &mut Model, options: &Options) -> Result<SolverResult, SolverError> {
        let start = Instant::now();
        model.validate()?;
        options.validate()?;
        let atol = ATol::new(options.general.atol)?;

        configure_thread_pool(&options.parallel);

        if options.preprocess.is_enabled_presolve {
            presolve::presolve(model);
        } else {
            model.setup();
        }
        if options.preprocess.is_enabled_initial_value_correction {
            correct_initial_values(model);
        }

        let relaxation_advice = self.relaxation.map(|solver| solver.solve(model));
        if let Some(advice) = &relaxation_advice {
            apply_relaxation_advice(model, advice);
        }
        let lagrangian_duals: Option<Vec<f64>> = relaxation_advice.map(|advice| advice.duals);

        initialize_penalty_coefficients(model, options.penalty.initial_penalty_coefficient);
        update_improvability(model);

        if options.general.time_max <= 0.0 {
            debug!("time_max <= 0, returning the initial assignment without running any pass");
            let neighborhood = Neighborhood::new(&options.neighborhood, self.user_defined_move)?;
            let search = TabuSearch::new(neighborhood, model.variables().len())?;
            return Ok(build_result(model, &search, 0, start.elapsed().as_secs_f64(), options));
        }

        let neighborhood = Neighborhood::new(&options.neighborhood, self.user_defined_move)?;
        let mut search = TabuSearch::new(neighborhood, model.variables().len())?;
        search.setup(model);

        let mut rng = ChaCha8Rng::seed_from_u64(options.general.seed);
        let mut penalty_controller = PenaltyController::new(&options.penalty);
        let mut total_outer_iterations = 0u64;

        if options.tabu_search.is_enabled_initial_modification {
            let num_mutable = model.variables().iter().filter(|v| v.is_mutable()).count();
            let count = if options.tabu_search.number_of_initial_modification > 0 {
                options.tabu_search.number_of_initial_modification
            } else {
                let rate = options.tabu_search.initial_modification_fixed_rate
                    + rng.random::<f64>() * options.tabu_search.initial_modification_randomize_rate;
                (num_mutable as f64 * rate).round() as usize
            };
            debug!(count, "performing initial modification before the first pass");
            search.perform_initial_modification(model, options, count, &mut rng);
        }

        // Exponential moving average of wall-clock-per-move, used only to log the
        // `thread_count_optimization` trend (§5); rayon's global pool size is fixed
        // at the first parallel call in this process, so it cannot be resized
        // between passes — see DESIGN.md for why this stays observability-only.
        let mut wall_clock_per_move_ema: Option<f64> = None;
        let decay = (options.parallel.thread_count_optimization_decay_factor_milli as f64 / 1000.0).clamp(0.0, 1.0);

        for outer in 0..options.general.iteration_max {
            let pass_span = tracing::info_span!("outer_pass", outer);
            let _enter = pass_span.enter();

            let outcome = search.run_pass(
                model,
                options,
                atol,
                &mut rng,
                start,
                lagrangian_duals.as_deref(),
                options.is_enabled_store_feasible_solutions,
            );
            total_outer_iterations += 1;

            if options.parallel.is_enabled_thread_count_optimization && outcome.total_moves_scored > 0 {
                let sample = outcome.pass_duration_seconds / outcome.total_moves_scored as f64;
                let updated = match wall_clock_per_move_ema {
                    Some(prev) => prev * decay + sample * (1.0 - decay),
                    None => sample,
                };
                wall_clock_per_move_ema = Some(updated);
                debug!(
                    wall_clock_per_move_seconds = updated,
                    "thread_count_optimization EMA updated"
                );
            }

            if outcome.improved_augmented {
                penalty_controller.snapshot_global(model);
            }
            penalty_controller.update(model, &options.penalty, &outcome);

            let improved = outcome.improved_feasible || outcome.improved_augmented;
            let restart = penalty_controller.check_restart(improved, &options.penalty, options.restart.restart_mode);
            if restart != RestartDecision::None {
                debug!(?restart, "outer stagnation threshold reached, restarting");
                penalty_controller.apply_restart(model, search.feasible_incumbent(), restart)?;
                search.reset_intensity();
            }

            if outcome.stopped_on_target {
                info!(outer, "target objective value reached");
                break;
            }
            if outcome.stopped_on_time {
                info!(outer, "time_max exceeded");
                break;
            }
            if outer + 1 >= options.general.iteration_max {
                break;
            }
        }

        Ok(build_result(model, &search, total_outer_iterations, start.elapsed().as_secs_f64(), options))
    }
}

/// Runs [`SolverBuilder::solve`] with no relaxation solver and no
/// user-defined move callback — the common case.
pub fn solve(model: &mut Model, options: &Options) -> Result<SolverResult, SolverError> {
    SolverBuilder::new().solve(model, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{Expression, Sense};

    fn two_binary_knapsack() -> Model {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 1).unwrap();
        let y = model.create_variable("y", 0, 1).unwrap();
        let mut objective = Expression::constant(0.0);
        objective.add_term(x, -1.0);
        objective.add_term(y, -1.0);
        model.set_objective(objective);
        let mut capacity = Expression::constant(-1.0);
        capacity.add_term(x, 1.0);
        capacity.add_term(y, 1.0);
        model.create_constraint("capacity", capacity, Sense::Less).unwrap();
        model
    }

    #[test]
    fn solves_the_two_binary_knapsack_to_optimality() {
        let mut model = two_binary_knapsack();
        let result = solve(&mut model, &Options::default()).unwrap();
        assert!(result.is_feasible);
        assert_eq!(result.incumbent_objective, -1.0);
    }

    #[test]
    fn set_partitioning_picks_the_cheapest_member() {
        let mut model = Model::new();
        let vars = model
            .create_variables("x", &multi_array::Shape::new(vec![3]), 0, 1)
            .unwrap();
        let mut objective = Expression::constant(0.0);
        let coefficients = [3.0, 2.0, 1.0];
        for (&v, &c) in vars.iter().zip(coefficients.iter()) {
            objective.add_term(v, c);
        }
        model.set_objective(objective);
        let mut partition = Expression::constant(-1.0);
        for &v in &vars {
            partition.add_term(v, 1.0);
        }
        model.create_constraint("partition", partition, Sense::Equal).unwrap();

        let result = solve(&mut model, &Options::default()).unwrap();
        assert!(result.is_feasible);
        assert_eq!(result.incumbent_objective, 1.0);
        assert_eq!(result.values[&vars[2]], 1);
    }

    #[test]
    fn zero_time_max_returns_initial_assignment_without_a_pass() {
        let mut model = two_binary_knapsack();
        let options = Options {
            general: options::GeneralOptions {
                time_max: 0.0,
                ..Options::default().general
            },
            ..Options::default()
        };
        let result = solve(&mut model, &options).unwrap();
        assert_eq!(result.total_iterations, 0);
        assert_eq!(result.total_outer_iterations, 0);
    }

    #[test]
    fn fixed_bound_variable_is_returned_unchanged() {
        let mut model = Model::new();
        let x = model.create_variable("x", 7, 7).unwrap();
        model.set_objective(Expression::single_term(x, 1.0));
        let result = solve(&mut model, &Options::default()).unwrap();
        assert_eq!(result.values[&x], 7);
    }

    #[test]
    fn missing_objective_is_rejected() {
        let mut model = Model::new();
        model.create_variable("x", 0, 5).unwrap();
        let err = solve(&mut model, &Options::default()).unwrap_err();
        assert!(matches!(err, SolverError::Model(model::ModelError::ObjectiveNotSet)));
    }

    #[test]
    fn relaxation_advice_seeds_the_initial_assignment() {
        struct AllUpper;
        impl RelaxationSolver for AllUpper {
            fn solve(&self, model: &Model) -> RelaxationAdvice {
                RelaxationAdvice {
                    values: model.variables().iter().map(|v| v.bound().upper()).collect(),
                    duals: vec![0.0; model.constraints().len()],
                }
            }
        }

        let mut model = Model::new();
        let x = model.create_variable("x", 0, 9).unwrap();
        model.set_objective(Expression::single_term(x, 1.0));
        let mut options = Options::default();
        options.general.time_max = 0.0;

        let solver = AllUpper;
        let result = SolverBuilder::new().with_relaxation(&solver).solve(&mut model, &options).unwrap();
        assert_eq!(result.values[&x], 9);
    }
}
