use crate::VariableID;
use thiserror::Error;

/// Violations of the model's structural invariants, raised by the builder API.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("undefined variable id used in expression: {id:?}")]
    UndefinedVariableID { id: VariableID },

    #[error("variable {id:?} is fixed to {fixed_value}; cannot assign {attempted}")]
    FixedVariableReassignment {
        id: VariableID,
        fixed_value: i64,
        attempted: i64,
    },

    #[error("value {value} is outside bound [{lower}, {upper}] for variable {id:?}")]
    BoundViolation {
        id: VariableID,
        value: i64,
        lower: i64,
        upper: i64,
    },

    #[error(transparent)]
    Bound(#[from] crate::bound::BoundError),

    #[error("objective must be set before calling solve()")]
    ObjectiveNotSet,

    #[error(transparent)]
    MultiArray(#[from] crate::multi_array::MultiArrayError),

    #[error(transparent)]
    Coefficient(#[from] crate::coefficient::CoefficientError),
}
