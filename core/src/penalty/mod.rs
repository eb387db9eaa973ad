//! The penalty controller & outer loop (component F, §4.6): adapts every
//! constraint's `local_penalty_coefficient` between tabu passes and decides
//! when the search should restart from the incumbent.

mod error;

pub use error::PenaltyError;

use crate::model::Model;
use crate::options::{PenaltyOptions, RestartMode};
use crate::tabu_search::{Incumbent, PassOutcome};
use crate::{ConstraintID, VariableID};

/// What the outer loop should do after a stagnant run of passes, per
/// `restart_mode` (§4.6, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartDecision {
    None,
    Simple,
    Smart,
}

/// Owns the adaptive relaxing rate and outer-stagnation counter; every other
/// piece of penalty state (the coefficients themselves) lives on `Model`'s
/// constraints, per §5's "shared resources" contract.
pub struct PenaltyController {
    relaxing_rate: f64,
    outer_stagnation_count: i64,
    best_feasible_objective: Option<f64>,
}

impl PenaltyController {
    pub fn new(options: &PenaltyOptions) -> Self {
        PenaltyController {
            relaxing_rate: options.relaxing_rate,
            outer_stagnation_count: 0,
            best_feasible_objective: None,
        }
    }

    pub fn relaxing_rate(&self) -> f64 {
        self.relaxing_rate
    }

    /// Applies §4.6's tightening/relaxing rules to every enabled constraint's
    /// `local_penalty_coefficient`, then the optional group-tying and
    /// shrink-towards-global passes.
    pub fn update(&mut self, model: &mut Model, options: &PenaltyOptions, outcome: &PassOutcome) {
        let ids: Vec<ConstraintID> = model.constraints().iter().map(|c| c.id()).collect();

        if outcome.ended_feasible {
            for &id in &ids {
                let current = model.constraint(id).local_penalty_coefficient();
                model.constraint_mut(id).set_local_penalty_coefficient(current * self.relaxing_rate);
            }
            self.adapt_relaxing_rate(model, options);
        } else {
            let max_violation = ids
                .iter()
                .filter(|&&id| model.constraint(id).is_enabled())
                .map(|&id| model.constraint(id).violation_value())
                .fold(0.0_f64, f64::max);

            for &id in &ids {
                let constraint = model.constraint(id);
                if !constraint.is_enabled() || constraint.violation_value() <= 0.0 {
                    continue;
                }
                let proportional_share = if max_violation > 0.0 {
                    constraint.violation_value() / max_violation
                } else {
                    0.0
                };
                let weight = options.updating_balance * proportional_share + (1.0 - options.updating_balance);
                let factor = 1.0 + (options.tightening_rate - 1.0) * weight;
                let current = constraint.local_penalty_coefficient();
                model.constraint_mut(id).set_local_penalty_coefficient(current * factor);
            }
        }

        if options.is_enabled_group_penalty_coefficient {
            self.tie_group_coefficients(model);
        }

        if options.is_enabled_shrink_penalty_coefficient && self.best_feasible_objective.is_some() {
            for &id in &ids {
                let constraint = model.constraint(id);
                let local = constraint.local_penalty_coefficient();
                let global = constraint.global_penalty_coefficient();
                let shrunk = global + (local - global) * self.relaxing_rate;
                model.constraint_mut(id).set_local_penalty_coefficient(shrunk);
            }
        }
    }

    /// Ties every constraint sharing a Selection group to that group's maximum
    /// local penalty coefficient.
    fn tie_group_coefficients(&self, model: &mut Model) {
        let groups: Vec<Vec<ConstraintID>> = model
            .selections()
            .iter()
            .map(|g| g.related_constraints().to_vec())
            .collect();
        for constraints in groups {
            if constraints.is_empty() {
                continue;
            }
            let max = constraints
                .iter()
                .map(|&id| model.constraint(id).local_penalty_coefficient())
                .fold(0.0_f64, f64::max);
            for id in constraints {
                model.constraint_mut(id).set_local_penalty_coefficient(max);
            }
        }
    }

    /// Adapts the relaxing rate itself within `[min, max]`: a feasible pass that
    /// improved the incumbent objective nudges it down (relax less next time,
    /// favor exploitation); one that didn't nudges it up (relax more, favor
    /// exploration).
    fn adapt_relaxing_rate(&mut self, model: &Model, options: &PenaltyOptions) {
        let objective = model.objective_value();
        let improved = self
            .best_feasible_objective
            .map_or(true, |best| objective < best - 1e-9);
        if improved {
            self.best_feasible_objective = Some(objective);
            self.relaxing_rate = (self.relaxing_rate * options.relaxing_rate_decrease_rate)
                .clamp(options.relaxing_rate_min, options.relaxing_rate_max);
        } else {
            self.relaxing_rate = (self.relaxing_rate * (1.0 + options.relaxing_rate_increase_rate))
                .clamp(options.relaxing_rate_min, options.relaxing_rate_max);
        }
    }

    /// Snapshots every constraint's `global_penalty_coefficient` to its current
    /// `local` value; call this when a pass produces a new best augmented
    /// incumbent, so `global` tracks the best-known configuration (§3).
    pub fn snapshot_global(&self, model: &mut Model) {
        let ids: Vec<ConstraintID> = model.constraints().iter().map(|c| c.id()).collect();
        for id in ids {
            let local = model.constraint(id).local_penalty_coefficient();
            model.constraint_mut(id).set_global_penalty_coefficient(local);
        }
    }

    /// Updates the outer-stagnation counter and returns whether (and how) the
    /// outer loop should restart (§4.6).
    pub fn check_restart(&mut self, improved_this_pass: bool, options: &PenaltyOptions, restart_mode: RestartMode) -> RestartDecision {
        if improved_this_pass {
            self.outer_stagnation_count = 0;
            return RestartDecision::None;
        }
        self.outer_stagnation_count += 1;
        if self.outer_stagnation_count < options.outer_stagnation_threshold {
            return RestartDecision::None;
        }
        self.outer_stagnation_count = 0;
        match restart_mode {
            RestartMode::Simple => RestartDecision::Simple,
            RestartMode::Smart => RestartDecision::Smart,
        }
    }

    /// Reinitializes the model's values from `incumbent`; `Smart` additionally
    /// resets every constraint's `local` penalty to its `global` value.
    pub fn apply_restart(&self, model: &mut Model, incumbent: Option<&Incumbent>, decision: RestartDecision) -> Result<(), PenaltyError> {
        if decision == RestartDecision::None {
            return Ok(());
        }
        let incumbent = incumbent.ok_or(PenaltyError::RestartWithoutIncumbent)?;
        let alterations: Vec<(VariableID, i64)> = incumbent
            .values
            .iter()
            .enumerate()
            .map(|(i, &value)| (VariableID::from(i), value))
            .collect();
        let _ = model.apply_alterations(&alterations);

        if decision == RestartDecision::Smart {
            let ids: Vec<ConstraintID> = model.constraints().iter().map(|c| c.id()).collect();
            for id in ids {
                model.constraint_mut(id).reset_local_to_global();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Expression, Sense};
    use crate::tabu_search::PassOutcome;

    fn setup_model() -> Model {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 5).unwrap();
        let mut expr = Expression::constant(-2.0);
        expr.add_term(x, 1.0);
        model.create_constraint("c0", expr, Sense::Less).unwrap();
        model.setup();
        model
    }

    #[test]
    fn feasible_pass_relaxes_every_coefficient() {
        let mut model = setup_model();
        let options = PenaltyOptions::default();
        let mut controller = PenaltyController::new(&options);
        let before = model.constraint(ConstraintID::from(0u32)).local_penalty_coefficient();

        controller.update(
            &mut model,
            &options,
            &PassOutcome {
                ended_feasible: true,
                accepted_moves: 1,
                stopped_on_target: false,
                stopped_on_time: false,
                improved_feasible: true,
                improved_augmented: true,
                total_moves_scored: 1,
                pass_duration_seconds: 0.0,
            },
        );

        let after = model.constraint(ConstraintID::from(0u32)).local_penalty_coefficient();
        assert!(after < before);
    }

    #[test]
    fn infeasible_pass_tightens_violated_constraints_only() {
        let mut model = setup_model();
        model.variable_mut(VariableID::from(0u32)).assign_unchecked(5);
        model.update();
        let options = PenaltyOptions::default();
        let mut controller = PenaltyController::new(&options);
        let before = model.constraint(ConstraintID::from(0u32)).local_penalty_coefficient();

        controller.update(
            &mut model,
            &options,
            &PassOutcome {
                ended_feasible: false,
                accepted_moves: 1,
                stopped_on_target: false,
                stopped_on_time: false,
                improved_feasible: false,
                improved_augmented: false,
                total_moves_scored: 1,
                pass_duration_seconds: 0.0,
            },
        );

        let after = model.constraint(ConstraintID::from(0u32)).local_penalty_coefficient();
        assert!(after > before);
    }

    #[test]
    fn restart_without_incumbent_is_an_error() {
        let mut model = setup_model();
        let controller = PenaltyController::new(&PenaltyOptions::default());
        assert!(matches!(
            controller.apply_restart(&mut model, None, RestartDecision::Simple),
            Err(PenaltyError::RestartWithoutIncumbent)
        ));
    }

    #[test]
    fn stagnation_threshold_triggers_restart_decision() {
        let options = PenaltyOptions {
            outer_stagnation_threshold: 2,
            ..PenaltyOptions::default()
        };
        let mut controller = PenaltyController::new(&options);
        assert_eq!(controller.check_restart(false, &options, RestartMode::Smart), RestartDecision::None);
        assert_eq!(controller.check_restart(false, &options, RestartMode::Smart), RestartDecision::Smart);
    }
}
