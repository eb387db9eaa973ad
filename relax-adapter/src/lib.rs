//! Advisory relaxation solvers implementing [`tabumip::RelaxationSolver`]:
//! [`LagrangeDualSolver`] (subgradient ascent on the Lagrangian dual) and
//! [`PdlpSolver`] (a primal-dual hybrid gradient loop), both operating on the
//! model's linear relaxation and both optional — the tabu-search core never
//! depends on this crate, only on the trait it implements.
//!
//! ```
//! use tabumip::model::{Expression, Model, Sense};
//! use tabumip::RelaxationSolver;
//! use tabumip_relax_adapter::LagrangeDualSolver;
//!
//! let mut model = Model::new();
//! let x = model.create_variable("x", 0, 1).unwrap();
//! model.set_objective(Expression::single_term(x, 1.0));
//! let mut e = Expression::constant(-1.0);
//! e.add_term(x, 1.0);
//! model.create_constraint("c0", e, Sense::Less).unwrap();
//! model.setup();
//!
//! let advice = LagrangeDualSolver::default().solve(&model);
//! assert_eq!(advice.values.len(), 1);
//! ```

mod lagrange_dual;
mod linear_relaxation;
mod pdlp;

pub use lagrange_dual::{LagrangeDualOptions, LagrangeDualSolver};
pub use linear_relaxation::{LinearRelaxation, LinearRelaxationError, Row};
pub use pdlp::{PdlpOptions, PdlpSolver};
