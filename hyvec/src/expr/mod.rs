//! Lazy expression trees over vectors and scalars.
//!
//! Role
//! - Typed builders in [`defs`] record the shape of an expression; nothing is computed at
//!   construction time, but every node resolves its element type immediately through the
//!   [`WidestWith`] table, so mismatched operands are rejected by the compiler.
//! - [`VecExpr::cursor`] starts a fresh, single-pass traversal. Cursors own all of the
//!   iteration state, which keeps trees immutable and lets independent passes over the same
//!   tree run side by side.
//! - [`dynamic::DynExpr`] is the runtime-typed counterpart for operands whose element type
//!   is only known at run time.
//!
//! Example
//! ```
//! use hyvec::prelude::*;
//!
//! let ints = vec![1, NA_INTEGER, 3];
//! let reals = vec![1.5, 2.5, NA_REAL];
//! let sum = leaf(&ints) + leaf(&reals);
//! assert_eq!(sum.element_type(), ElementType::Real);
//!
//! let out = sum.materialize().unwrap();
//! assert_eq!(out[0], 2.5);
//! assert!(is_na(out[1]) && is_na(out[2]));
//! ```
pub mod defs;
pub mod dynamic;
pub mod func;
pub mod ops;
pub mod pretty;
pub mod view;

use either::Either;

use crate::element::{CastTo, Element, ElementType, Numeric};
use crate::error::HvResult;
use crate::expr::defs::{Binary, Coerce, Scalar, Unary};
use crate::expr::ops::{Abs, Add, BinaryOp, Div, Exp, Ln, Max, Min, Mul, Neg, Sqrt, Sub, UnaryOp};
use crate::expr::pretty::Pretty;
use crate::expr::view::ExprShape;
use crate::materialize;
use crate::source::Length;
use crate::widest::WidestWith;

/// Trait implemented by every typed expression node.
///
/// Role
/// - Reports the node's element type and logical length without evaluating anything; the
///   structure itself is exposed through the [`ExprShape`] supertrait.
/// - Starts pull-based traversals through [`VecExpr::cursor`].
/// - Provides builder helpers (`add`, `pmin`, `sqrt`, `coerce`, ...) available on any node.
///
/// Performance
/// - Cursors are statically dispatched; a whole tree compiles down to one fused loop.
pub trait VecExpr: ExprShape + Sized {
    /// Element type produced by this node.
    type Elem: Element;

    /// Iteration state of one pass over this node.
    type Cursor<'c>: Iterator<Item = Self::Elem>
    where
        Self: 'c;

    /// Start a fresh pass. Each call gets independent state.
    fn cursor(&self) -> Self::Cursor<'_>;

    /// Logical length: the minimum over all finite leaves, or unbounded for scalar-only trees.
    fn length(&self) -> Length;

    /// Canonical element type of this node's output.
    #[inline]
    fn element_type(&self) -> ElementType {
        <Self::Elem as Element>::TYPE
    }

    /// Display adapter printing the tree, e.g. `((integer[3] + 2L) * real[3])`.
    #[inline]
    fn pretty(&self) -> Pretty<'_, Self> {
        Pretty::new(self)
    }

    /// Combine with `rhs` through operator `O`.
    #[inline]
    fn binary<O: BinaryOp, Q: IntoVecExpr>(self, rhs: Q) -> Binary<O, Self, Q::Expr>
    where
        Self::Elem: WidestWith<<Q::Expr as VecExpr>::Elem>,
    {
        Binary::new(self, rhs.into_vec_expr())
    }

    /// `self + rhs`
    #[inline]
    fn add<Q: IntoVecExpr>(self, rhs: Q) -> Binary<Add, Self, Q::Expr>
    where
        Self::Elem: WidestWith<<Q::Expr as VecExpr>::Elem>,
    {
        self.binary(rhs)
    }

    /// `self - rhs`
    #[inline]
    fn sub<Q: IntoVecExpr>(self, rhs: Q) -> Binary<Sub, Self, Q::Expr>
    where
        Self::Elem: WidestWith<<Q::Expr as VecExpr>::Elem>,
    {
        self.binary(rhs)
    }

    /// `self * rhs`
    #[inline]
    fn mul<Q: IntoVecExpr>(self, rhs: Q) -> Binary<Mul, Self, Q::Expr>
    where
        Self::Elem: WidestWith<<Q::Expr as VecExpr>::Elem>,
    {
        self.binary(rhs)
    }

    /// `self / rhs`
    #[inline]
    fn div<Q: IntoVecExpr>(self, rhs: Q) -> Binary<Div, Self, Q::Expr>
    where
        Self::Elem: WidestWith<<Q::Expr as VecExpr>::Elem>,
    {
        self.binary(rhs)
    }

    /// Element-wise minimum.
    #[inline]
    fn pmin<Q: IntoVecExpr>(self, rhs: Q) -> Binary<Min, Self, Q::Expr>
    where
        Self::Elem: WidestWith<<Q::Expr as VecExpr>::Elem>,
    {
        self.binary(rhs)
    }

    /// Element-wise maximum.
    #[inline]
    fn pmax<Q: IntoVecExpr>(self, rhs: Q) -> Binary<Max, Self, Q::Expr>
    where
        Self::Elem: WidestWith<<Q::Expr as VecExpr>::Elem>,
    {
        self.binary(rhs)
    }

    /// Apply unary operator `O`.
    #[inline]
    fn unary<O: UnaryOp>(self) -> Unary<O, Self>
    where
        Self::Elem: Numeric,
    {
        Unary::new(self)
    }

    #[inline]
    fn neg(self) -> Unary<Neg, Self>
    where
        Self::Elem: Numeric,
    {
        self.unary()
    }

    #[inline]
    fn abs(self) -> Unary<Abs, Self>
    where
        Self::Elem: Numeric,
    {
        self.unary()
    }

    #[inline]
    fn sqrt(self) -> Unary<Sqrt, Self>
    where
        Self::Elem: Numeric,
    {
        self.unary()
    }

    #[inline]
    fn exp(self) -> Unary<Exp, Self>
    where
        Self::Elem: Numeric,
    {
        self.unary()
    }

    #[inline]
    fn ln(self) -> Unary<Ln, Self>
    where
        Self::Elem: Numeric,
    {
        self.unary()
    }

    /// Explicitly convert every element to `T`, overriding automatic widening.
    #[inline]
    fn coerce<T: Element>(self) -> Coerce<Self, T>
    where
        Self::Elem: CastTo<T>,
    {
        Coerce::new(self)
    }

    /// Materialize the natural length of this expression into a `Vec`.
    #[inline]
    fn materialize(&self) -> HvResult<Vec<Self::Elem>> {
        materialize::materialize(self)
    }

    /// `true` as soon as one element is missing.
    #[inline]
    fn any_na(&self) -> bool {
        materialize::any_na(self)
    }
}

impl<E: VecExpr> VecExpr for &E {
    type Elem = E::Elem;
    type Cursor<'c>
        = E::Cursor<'c>
    where
        Self: 'c;

    #[inline]
    fn cursor(&self) -> Self::Cursor<'_> {
        (**self).cursor()
    }

    #[inline]
    fn length(&self) -> Length {
        (**self).length()
    }
}

impl<L, R> VecExpr for Either<L, R>
where
    L: VecExpr,
    R: VecExpr<Elem = L::Elem>,
{
    type Elem = L::Elem;
    type Cursor<'c>
        = Either<L::Cursor<'c>, R::Cursor<'c>>
    where
        Self: 'c;

    fn cursor(&self) -> Self::Cursor<'_> {
        match self {
            Either::Left(l) => Either::Left(l.cursor()),
            Either::Right(r) => Either::Right(r.cursor()),
        }
    }

    fn length(&self) -> Length {
        either::for_both!(self, e => e.length())
    }
}

/// Conversion into an expression node: nodes convert to themselves, `i32`/`f64` literals
/// become [`Scalar`] leaves.
pub trait IntoVecExpr {
    type Expr: VecExpr;

    fn into_vec_expr(self) -> Self::Expr;
}

impl<'a, E: VecExpr> IntoVecExpr for &'a E {
    type Expr = &'a E;

    #[inline]
    fn into_vec_expr(self) -> Self::Expr {
        self
    }
}

impl<L, R> IntoVecExpr for Either<L, R>
where
    L: VecExpr,
    R: VecExpr<Elem = L::Elem>,
{
    type Expr = Self;

    #[inline]
    fn into_vec_expr(self) -> Self::Expr {
        self
    }
}

impl IntoVecExpr for i32 {
    type Expr = Scalar<i32>;

    #[inline]
    fn into_vec_expr(self) -> Self::Expr {
        Scalar::new(self)
    }
}

impl IntoVecExpr for f64 {
    type Expr = Scalar<f64>;

    #[inline]
    fn into_vec_expr(self) -> Self::Expr {
        Scalar::new(self)
    }
}
