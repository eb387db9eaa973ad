//! Small helper macros for generic operator-overload boilerplate, in the style of
//! the additive/multiplicative trait forwarding used throughout the model types.

macro_rules! impl_add_inverse {
    ($lhs:ty, $rhs:ty) => {
        impl ::std::ops::Add<$rhs> for $lhs {
            type Output = <$rhs as ::std::ops::Add<$lhs>>::Output;
            fn add(self, rhs: $rhs) -> Self::Output {
                rhs + self
            }
        }
    };
}
pub(crate) use impl_add_inverse;

macro_rules! impl_add_from {
    ($lhs:ty, $rhs:ty) => {
        impl ::std::ops::Add<$rhs> for $lhs {
            type Output = $lhs;
            fn add(self, rhs: $rhs) -> Self::Output {
                self + <$lhs>::from(rhs)
            }
        }
    };
}
pub(crate) use impl_add_from;

/// Builds a sparse [`crate::model::Expression`] from `coefficient * variable` terms
/// plus an optional trailing constant, mirroring the teacher crate's `linear!`/`coeff!` pair
/// but folded into a single macro since our [`crate::model::Expression`] has no monomial hierarchy.
///
/// ```rust
/// use tabumip::{expr, VariableID};
///
/// let e = expr!(2.0 * VariableID::from(0u32), -1.0 * VariableID::from(1u32); 5.0);
/// assert_eq!(e.constant_term(), 5.0);
/// ```
#[macro_export]
macro_rules! expr {
    ($($coef:literal * $var:expr),* $(,)? ; $constant:literal) => {{
        let mut e = $crate::model::Expression::constant($constant);
        $(e.add_term($var, $coef);)*
        e
    }};
    ($($coef:literal * $var:expr),* $(,)?) => {
        $crate::expr!($($coef * $var),* ; 0.0)
    };
}
