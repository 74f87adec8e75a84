//! Widest-numeric-type resolution.
//!
//! A single literal table drives both the compile-time trait [`WidestWith`] (used by
//! expression nodes to pick their element type) and the runtime mirror
//! [`ElementType::widest`] (used by runtime-typed trees). Adding an element type means
//! adding its row and column here; nothing else changes.
use crate::element::{CastTo, Element, ElementType, Numeric};

/// Result type of combining `Self` with `R`, and the widening of both sides into it.
///
/// Only implemented for pairs present in the promotion table: combining two element
/// types without an entry does not compile.
pub trait WidestWith<R: Element>: Element {
    /// The widest of `Self` and `R`.
    type Output: Numeric;

    /// Widen a left operand into the result type.
    fn widen_lhs(self) -> Self::Output;

    /// Widen a right operand into the result type.
    fn widen_rhs(rhs: R) -> Self::Output;
}

/// The widest numeric type of `A` and `B`.
pub type Widest<A, B> = <A as WidestWith<B>>::Output;

macro_rules! native {
    (Integer) => {
        i32
    };
    (Real) => {
        f64
    };
}

macro_rules! widest_table {
    ($( $lhs:ident, $rhs:ident => $out:ident; )*) => {
        $(
            impl WidestWith<native!($rhs)> for native!($lhs) {
                type Output = native!($out);

                #[inline]
                fn widen_lhs(self) -> Self::Output {
                    CastTo::<native!($out)>::cast(self)
                }

                #[inline]
                fn widen_rhs(rhs: native!($rhs)) -> Self::Output {
                    CastTo::<native!($out)>::cast(rhs)
                }
            }
        )*

        impl ElementType {
            /// Result element type of combining `self` with `other`.
            ///
            /// Total, reflexive and symmetric; never narrower than either input.
            pub const fn widest(self, other: ElementType) -> ElementType {
                match (self, other) {
                    $( (ElementType::$lhs, ElementType::$rhs) => ElementType::$out, )*
                }
            }
        }
    };
}

widest_table! {
    Integer, Integer => Integer;
    Integer, Real    => Real;
    Real,    Integer => Real;
    Real,    Real    => Real;
}

/// Tag of [`Widest<A, B>`], resolved at compile time.
#[inline]
pub const fn widest_of<A: WidestWith<B>, B: Element>() -> ElementType {
    <Widest<A, B> as Element>::TYPE
}
