use crate::model::Model;
use crate::neighborhood::Move;

/// Masks controlling which candidate moves a generator emits this pass, set by the
/// tabu-search core's `improvability_screening_mode` (§4.5).
#[derive(Debug, Clone, Copy)]
pub struct AcceptMask {
    pub accept_all: bool,
    pub accept_objective_improvable: bool,
    pub accept_feasibility_improvable: bool,
}

impl AcceptMask {
    pub fn all() -> Self {
        AcceptMask {
            accept_all: true,
            accept_objective_improvable: true,
            accept_feasibility_improvable: true,
        }
    }

    /// Whether a variable with the given improvability flags should be considered.
    pub fn accepts(&self, objective_improvable: bool, feasibility_improvable: bool) -> bool {
        self.accept_all || (self.accept_objective_improvable && objective_improvable) || (self.accept_feasibility_improvable && feasibility_improvable)
    }
}

/// One family of candidate moves (§4.3). `setup` builds the generator's internal
/// move templates once, after categorization; `update_moves` refreshes each
/// template's target value(s) from current variable state and returns the
/// filtered, currently-available candidate pool.
pub trait MoveGenerator: Send + Sync {
    fn move_type(&self) -> crate::neighborhood::MoveType;

    /// Builds (or rebuilds, if the model's structure changed) this generator's
    /// internal move templates from the model's current variables/constraints.
    fn setup(&mut self, model: &Model);

    /// Refreshes templates against current variable values and returns the moves
    /// that pass bound/fixed-variable/availability filtering and the accept mask.
    fn update_moves(&mut self, model: &Model, mask: AcceptMask) -> Vec<Move>;
}

/// Drops moves touching fixed variables, moves with an out-of-bound target, and
/// moves that are a no-op (every alteration equal to the current value).
/// Shared by every concrete generator's `update_moves` implementation.
pub fn filter_move(model: &Model, candidate: &Move) -> bool {
    let mut any_change = false;
    for &(var_id, target) in candidate.alterations() {
        let var = model.variable(var_id);
        if var.is_fixed() {
            return false;
        }
        if !var.bound().contains(target) {
            return false;
        }
        if target != var.value() {
            any_change = true;
        }
    }
    any_change && candidate.is_available()
}

/// A move passes the accept mask if any altered variable is objective- or
/// feasibility-improvable according to the mask's requirements.
pub fn passes_mask(model: &Model, candidate: &Move, mask: AcceptMask) -> bool {
    if mask.accept_all {
        return true;
    }
    candidate.alterations().iter().any(|&(var_id, _)| {
        let var = model.variable(var_id);
        mask.accepts(var.is_objective_improvable(), var.is_feasibility_improvable())
    })
}
