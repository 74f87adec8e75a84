//! Free-function builders mirroring the [`VecExpr`] helpers.
use crate::element::Element;
use crate::expr::defs::{Binary, Leaf, Scalar};
use crate::expr::ops::{Max, Min};
use crate::expr::{IntoVecExpr, VecExpr};
use crate::source::Source;
use crate::widest::WidestWith;

/// Wrap a finite operand. Pass a reference (`&vec`) for a zero-copy leaf.
#[inline]
pub fn leaf<S: Source>(source: S) -> Leaf<S> {
    Leaf::new(source)
}

/// A scalar repeated for as long as the other operands last.
#[inline]
pub fn scalar<T: Element>(value: T) -> Scalar<T> {
    Scalar::new(value)
}

/// The missing scalar of type `T`.
#[inline]
pub fn na_scalar<T: Element>() -> Scalar<T> {
    Scalar::na()
}

/// Element-wise minimum of two operands.
#[inline]
pub fn pmin<P: IntoVecExpr, Q: IntoVecExpr>(lhs: P, rhs: Q) -> Binary<Min, P::Expr, Q::Expr>
where
    <P::Expr as VecExpr>::Elem: WidestWith<<Q::Expr as VecExpr>::Elem>,
{
    Binary::new(lhs.into_vec_expr(), rhs.into_vec_expr())
}

/// Element-wise maximum of two operands.
#[inline]
pub fn pmax<P: IntoVecExpr, Q: IntoVecExpr>(lhs: P, rhs: Q) -> Binary<Max, P::Expr, Q::Expr>
where
    <P::Expr as VecExpr>::Elem: WidestWith<<Q::Expr as VecExpr>::Elem>,
{
    Binary::new(lhs.into_vec_expr(), rhs.into_vec_expr())
}
