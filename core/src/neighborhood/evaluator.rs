use crate::model::Model;
use crate::neighborhood::Move;
use crate::VariableID;

/// Outcome of scoring one candidate move against the current model state and
/// per-constraint penalty coefficients.
#[derive(Debug, Clone, Copy)]
pub struct MoveScore {
    pub objective_delta: f64,
    pub violation_delta: f64,
    /// `objective_after + Σ penalty * violation_after + frequency_penalty + lagrangian_term`
    pub score: f64,
}

/// Per-constraint penalty coefficients and frequency/lagrangian weighting inputs
/// needed to score a move, kept separate from [`Model`] so scoring stays read-only.
pub struct ScoringContext<'a> {
    pub local_penalty: &'a [f64],
    pub frequency_penalty_coefficient: f64,
    pub frequency: &'a [u64],
    pub lagrangian_penalty_coefficient: f64,
    pub lagrangian_duals: Option<&'a [f64]>,
}

fn score_one(model: &Model, ctx: &ScoringContext, candidate: &Move) -> MoveScore {
    let old_value_of = |id: VariableID| model.variable(id).value();
    let alterations = candidate.alterations();

    let objective_delta = if alterations.iter().any(|&(id, _)| model.graph().is_in_objective(id)) {
        model.objective().evaluate_delta(alterations, old_value_of)
    } else {
        0.0
    };

    let mut violation_delta = 0.0;
    let mut penalty_term = 0.0;
    let mut lagrangian_term = 0.0;
    for &constraint_id in candidate.related_constraints() {
        let constraint = model.constraint(constraint_id);
        let delta = constraint
            .expression()
            .evaluate_delta(alterations, old_value_of);
        let new_value = constraint.constraint_value() + delta;
        let new_violation = crate::model::Constraint::violation_of(constraint.sense(), new_value);
        let delta_violation = new_violation - constraint.violation_value();
        violation_delta += delta_violation;
        penalty_term += ctx.local_penalty[constraint_id.index()] * delta_violation;
        if let Some(duals) = ctx.lagrangian_duals {
            lagrangian_term += duals[constraint_id.index()] * new_value;
        }
    }
    // penalty_term is Σ_related local_penalty * delta_violation, not the absolute
    // post-move penalty: constraints unaffected by this move keep their existing
    // penalty term, a constant offset across every candidate in one pass, so only
    // the *change* needs to be comparable here.

    let mut frequency_term = 0.0;
    for &(var, _) in alterations {
        frequency_term += ctx.frequency_penalty_coefficient * ctx.frequency[var.index()] as f64;
    }

    let score = model.objective_value() + objective_delta + penalty_term + frequency_term
        + ctx.lagrangian_penalty_coefficient * lagrangian_term;

    MoveScore {
        objective_delta,
        violation_delta,
        score,
    }
}

/// Scores every candidate move. Each score is written into its own output slot so
/// the region can run in parallel without any shared mutable state (§5). `parallel`
/// gates the region per `parallel.is_enabled_move_evaluation_parallelization`
/// (§6) — disabled explicitly, or the `parallel` feature compiled out, both fall
/// back to the sequential loop.
pub fn evaluate_all(model: &Model, ctx: &ScoringContext, candidates: &[Move], parallel: bool) -> Vec<MoveScore> {
    #[cfg(feature = "parallel")]
    if parallel {
        use rayon::prelude::*;
        return candidates.par_iter().map(|candidate| score_one(model, ctx, candidate)).collect();
    }
    let _ = parallel;
    candidates.iter().map(|candidate| score_one(model, ctx, candidate)).collect()
}

/// Related constraints untouched by a move still contribute their own fixed penalty
/// term to the *absolute* augmented objective; this returns that baseline so callers
/// who need an absolute (not delta) score can add it once per pass.
pub fn baseline_penalty_term(model: &Model, local_penalty: &[f64]) -> f64 {
    model
        .constraints()
        .iter()
        .filter(|c| c.is_enabled())
        .map(|c| local_penalty[c.id().index()] * c.violation_value())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Expression, Sense};

    #[test]
    fn score_prefers_lower_objective_after_move() {
        let mut model = Model::new();
        let x = model.create_variable("x", 0, 5).unwrap();
        let mut obj = Expression::constant(0.0);
        obj.add_term(x, 1.0);
        model.set_objective(obj);
        model.variable_mut(x).assign_unchecked(3);
        model.setup();

        let ctx = ScoringContext {
            local_penalty: &[],
            frequency_penalty_coefficient: 0.0,
            frequency: &[0, 0],
            lagrangian_penalty_coefficient: 0.0,
            lagrangian_duals: None,
        };
        let mv = Move::new(
            smallvec::smallvec![(x, 0)],
            smallvec::smallvec![],
            crate::neighborhood::MoveType::Integer,
        );
        let score = score_one(&model, &ctx, &mv);
        assert!(score.objective_delta < 0.0);
        let scores = evaluate_all(&model, &ctx, &[mv], true);
        assert_eq!(scores[0].score, score.score);
    }
}
