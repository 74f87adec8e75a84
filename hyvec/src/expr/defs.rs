//! Concrete expression nodes and their cursors.
//!
//! All node types implement [`VecExpr`] and [`ExprShape`]. Nodes hold only their
//! children and payload; iteration state lives in the matching `*Cursor` type, created
//! fresh by every call to [`VecExpr::cursor`].
use std::iter::{Fuse, FusedIterator, Repeat};
use std::marker::PhantomData;

use crate::element::{CastTo, Element, Numeric};
use crate::expr::ops::{Add, BinaryOp, Div, Mul, Neg, Sub, UnaryOp};
use crate::expr::view::{ExprShape, NodeView};
use crate::expr::{IntoVecExpr, VecExpr};
use crate::na::either_na;
use crate::source::{Length, Source};
use crate::widest::{Widest, WidestWith};

// Operator sugar: `+ - * /` and unary `-` on every node, with `i32`/`f64` literals
// accepted on either side.
macro_rules! define_ops_vec_expr {
    ([$($gen:tt)*] $node:ty) => {
        impl<$($gen)*> IntoVecExpr for $node
        where
            Self: VecExpr,
        {
            type Expr = Self;

            #[inline]
            fn into_vec_expr(self) -> Self::Expr {
                self
            }
        }

        impl<$($gen)*> std::ops::Neg for $node
        where
            Self: VecExpr,
            <Self as VecExpr>::Elem: Numeric,
        {
            type Output = Unary<Neg, Self>;

            #[inline]
            fn neg(self) -> Self::Output {
                Unary::new(self)
            }
        }

        define_ops_vec_expr!(@binary [$($gen)*] $node; Add add);
        define_ops_vec_expr!(@binary [$($gen)*] $node; Sub sub);
        define_ops_vec_expr!(@binary [$($gen)*] $node; Mul mul);
        define_ops_vec_expr!(@binary [$($gen)*] $node; Div div);
    };
    (@binary [$($gen:tt)*] $node:ty; $op:ident $method:ident) => {
        impl<$($gen)* _Q: IntoVecExpr> std::ops::$op<_Q> for $node
        where
            Self: VecExpr,
            <Self as VecExpr>::Elem: WidestWith<<_Q::Expr as VecExpr>::Elem>,
        {
            type Output = Binary<$op, Self, _Q::Expr>;

            #[inline]
            fn $method(self, rhs: _Q) -> Self::Output {
                Binary::new(self, rhs.into_vec_expr())
            }
        }

        impl<'r, $($gen)* _Q: IntoVecExpr> std::ops::$op<_Q> for &'r $node
        where
            $node: VecExpr,
            <$node as VecExpr>::Elem: WidestWith<<_Q::Expr as VecExpr>::Elem>,
        {
            type Output = Binary<$op, &'r $node, _Q::Expr>;

            #[inline]
            fn $method(self, rhs: _Q) -> Self::Output {
                Binary::new(self, rhs.into_vec_expr())
            }
        }

        define_ops_vec_expr!(@scalar [$($gen)*] $node; $op $method; i32);
        define_ops_vec_expr!(@scalar [$($gen)*] $node; $op $method; f64);
    };
    (@scalar [$($gen:tt)*] $node:ty; $op:ident $method:ident; $lit:ty) => {
        impl<$($gen)*> std::ops::$op<$node> for $lit
        where
            $node: VecExpr,
            $lit: WidestWith<<$node as VecExpr>::Elem>,
        {
            type Output = Binary<$op, Scalar<$lit>, $node>;

            #[inline]
            fn $method(self, rhs: $node) -> Self::Output {
                Binary::new(Scalar::new(self), rhs)
            }
        }
    };
}

// ================================= Leaf =================================

/// Finite operand, owned or borrowed depending on `S`.
#[derive(Debug, Clone, Copy)]
pub struct Leaf<S> {
    pub source: S,
}

impl<S: Source> Leaf<S> {
    #[inline]
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: Source> VecExpr for Leaf<S> {
    type Elem = S::Elem;
    type Cursor<'c>
        = Fuse<S::Iter<'c>>
    where
        Self: 'c;

    #[inline]
    fn cursor(&self) -> Self::Cursor<'_> {
        self.source.elements().fuse()
    }

    #[inline]
    fn length(&self) -> Length {
        Length::Finite(self.source.len())
    }
}

impl<S: Source> ExprShape for Leaf<S> {
    fn view(&self) -> NodeView<impl ExprShape, impl ExprShape> {
        NodeView::<Scalar<i32>, Scalar<i32>>::Leaf {
            element_type: <S::Elem as Element>::TYPE,
            len: self.source.len(),
        }
    }
}

define_ops_vec_expr! { [S: Source,] Leaf<S> }

// ================================ Scalar ================================

/// A single value repeated forever; combining it with a finite node broadcasts it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scalar<T> {
    pub value: T,
}

impl<T: Element> Scalar<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        Self { value }
    }

    /// The missing scalar of type `T`.
    #[inline]
    pub fn na() -> Self {
        Self { value: T::na() }
    }
}

impl<T: Element> VecExpr for Scalar<T> {
    type Elem = T;
    type Cursor<'c>
        = Repeat<T>
    where
        Self: 'c;

    #[inline]
    fn cursor(&self) -> Self::Cursor<'_> {
        std::iter::repeat(self.value)
    }

    #[inline]
    fn length(&self) -> Length {
        Length::Unbounded
    }
}

impl<T: Element> ExprShape for Scalar<T> {
    fn view(&self) -> NodeView<impl ExprShape, impl ExprShape> {
        NodeView::<Scalar<i32>, Scalar<i32>>::Scalar(self.value.into_value())
    }
}

define_ops_vec_expr! { [T: Element,] Scalar<T> }

// ================================ Binary ================================

/// `lhs op rhs`, element type `Widest<L::Elem, R::Elem>`.
#[derive(Debug, Clone, Copy)]
pub struct Binary<O, L, R> {
    pub op: O,
    pub lhs: L,
    pub rhs: R,
}

impl<O: BinaryOp, L, R> Binary<O, L, R> {
    #[inline]
    pub fn new(lhs: L, rhs: R) -> Self {
        Self {
            op: O::default(),
            lhs,
            rhs,
        }
    }
}

impl<O, L, R> VecExpr for Binary<O, L, R>
where
    O: BinaryOp,
    L: VecExpr,
    R: VecExpr,
    L::Elem: WidestWith<R::Elem>,
{
    type Elem = Widest<L::Elem, R::Elem>;
    type Cursor<'c>
        = BinaryCursor<O, L::Cursor<'c>, R::Cursor<'c>>
    where
        Self: 'c;

    #[inline]
    fn cursor(&self) -> Self::Cursor<'_> {
        BinaryCursor {
            lhs: self.lhs.cursor(),
            rhs: self.rhs.cursor(),
            exhausted: false,
            _op: PhantomData,
        }
    }

    #[inline]
    fn length(&self) -> Length {
        self.lhs.length().min(self.rhs.length())
    }
}

impl<O: BinaryOp, L: ExprShape, R: ExprShape> ExprShape for Binary<O, L, R> {
    fn view(&self) -> NodeView<impl ExprShape, impl ExprShape> {
        NodeView::Binary {
            op: O::KIND,
            lhs: &self.lhs,
            rhs: &self.rhs,
        }
    }
}

define_ops_vec_expr! { [O: BinaryOp, L, R,] Binary<O, L, R> }

/// One pass over a [`Binary`] node.
///
/// Stops at the first exhausted child and stays exhausted afterwards.
pub struct BinaryCursor<O, A, B> {
    lhs: A,
    rhs: B,
    exhausted: bool,
    _op: PhantomData<O>,
}

impl<O, A, B> Iterator for BinaryCursor<O, A, B>
where
    O: BinaryOp,
    A: Iterator,
    B: Iterator,
    A::Item: WidestWith<B::Item>,
    B::Item: Element,
{
    type Item = Widest<A::Item, B::Item>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let pair = match self.lhs.next() {
            Some(l) => self.rhs.next().map(|r| (l, r)),
            None => None,
        };
        let Some((l, r)) = pair else {
            self.exhausted = true;
            return None;
        };

        if either_na(l, r) {
            return Some(<Self::Item as Element>::na());
        }
        Some(O::apply(
            l.widen_lhs(),
            <A::Item as WidestWith<B::Item>>::widen_rhs(r),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.exhausted {
            return (0, Some(0));
        }
        let (l_lo, l_hi) = self.lhs.size_hint();
        let (r_lo, r_hi) = self.rhs.size_hint();
        let hi = match (l_hi, r_hi) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, None) => a,
            (None, b) => b,
        };
        (l_lo.min(r_lo), hi)
    }
}

impl<O, A, B> FusedIterator for BinaryCursor<O, A, B>
where
    O: BinaryOp,
    A: Iterator,
    B: Iterator,
    A::Item: WidestWith<B::Item>,
    B::Item: Element,
{
}

// ================================= Unary =================================

/// `op(inner)`, element type `O::Output<N::Elem>`.
#[derive(Debug, Clone, Copy)]
pub struct Unary<O, N> {
    pub op: O,
    pub inner: N,
}

impl<O: UnaryOp, N> Unary<O, N> {
    #[inline]
    pub fn new(inner: N) -> Self {
        Self {
            op: O::default(),
            inner,
        }
    }
}

impl<O, N> VecExpr for Unary<O, N>
where
    O: UnaryOp,
    N: VecExpr,
    N::Elem: Numeric,
{
    type Elem = O::Output<N::Elem>;
    type Cursor<'c>
        = UnaryCursor<O, N::Cursor<'c>>
    where
        Self: 'c;

    #[inline]
    fn cursor(&self) -> Self::Cursor<'_> {
        UnaryCursor {
            inner: self.inner.cursor(),
            _op: PhantomData,
        }
    }

    #[inline]
    fn length(&self) -> Length {
        self.inner.length()
    }
}

impl<O: UnaryOp, N: ExprShape> ExprShape for Unary<O, N> {
    fn view(&self) -> NodeView<impl ExprShape, impl ExprShape> {
        NodeView::<&N, Scalar<i32>>::Unary {
            op: O::KIND,
            inner: &self.inner,
        }
    }
}

define_ops_vec_expr! { [O: UnaryOp, N,] Unary<O, N> }

/// One pass over a [`Unary`] node.
pub struct UnaryCursor<O, C> {
    inner: C,
    _op: PhantomData<O>,
}

impl<O, C> Iterator for UnaryCursor<O, C>
where
    O: UnaryOp,
    C: Iterator,
    C::Item: Numeric,
{
    type Item = O::Output<C::Item>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.inner.next()?;
        if x.is_na() {
            return Some(<Self::Item as Element>::na());
        }
        Some(O::apply(x))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<O, C> FusedIterator for UnaryCursor<O, C>
where
    O: UnaryOp,
    C: FusedIterator,
    C::Item: Numeric,
{
}

// ================================ Coerce ================================

/// Explicit element conversion of `inner` to `T`.
#[derive(Debug, Clone, Copy)]
pub struct Coerce<N, T> {
    pub inner: N,
    _target: PhantomData<T>,
}

impl<N, T: Element> Coerce<N, T> {
    #[inline]
    pub fn new(inner: N) -> Self {
        Self {
            inner,
            _target: PhantomData,
        }
    }
}

impl<N, T> VecExpr for Coerce<N, T>
where
    N: VecExpr,
    T: Element,
    N::Elem: CastTo<T>,
{
    type Elem = T;
    type Cursor<'c>
        = CoerceCursor<N::Cursor<'c>, T>
    where
        Self: 'c;

    #[inline]
    fn cursor(&self) -> Self::Cursor<'_> {
        CoerceCursor {
            inner: self.inner.cursor(),
            _target: PhantomData,
        }
    }

    #[inline]
    fn length(&self) -> Length {
        self.inner.length()
    }
}

impl<N: ExprShape, T: Element> ExprShape for Coerce<N, T> {
    fn view(&self) -> NodeView<impl ExprShape, impl ExprShape> {
        NodeView::<&N, Scalar<i32>>::Coerce {
            target: T::TYPE,
            inner: &self.inner,
        }
    }
}

define_ops_vec_expr! { [N, T: Element,] Coerce<N, T> }

/// One pass over a [`Coerce`] node.
pub struct CoerceCursor<C, T> {
    inner: C,
    _target: PhantomData<T>,
}

impl<C, T> Iterator for CoerceCursor<C, T>
where
    C: Iterator,
    C::Item: CastTo<T>,
    T: Element,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.next().map(CastTo::<T>::cast)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<C, T> FusedIterator for CoerceCursor<C, T>
where
    C: FusedIterator,
    C::Item: CastTo<T>,
    T: Element,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::func::{leaf, scalar};
    use crate::na::NA_INTEGER;

    fn assert_fused<I: FusedIterator>(_: &I) {}

    #[test]
    fn every_node_kind_supports_arithmetic_sugar() {
        let v = vec![6, 8, 10];

        assert_eq!((leaf(&v) + 1).materialize().unwrap(), vec![7, 9, 11]);
        assert_eq!((leaf(&v) - leaf(&v)).materialize().unwrap(), vec![0, 0, 0]);
        assert_eq!((scalar(2) * leaf(&v)).materialize().unwrap(), vec![12, 16, 20]);
        assert_eq!(((leaf(&v) + 2) / 4).materialize().unwrap(), vec![2, 2, 3]);
        assert_eq!((-leaf(&v) * 2).materialize().unwrap(), vec![-12, -16, -20]);
        assert_eq!(
            (leaf(&v).coerce::<f64>() / 4).materialize().unwrap(),
            vec![1.5, 2.0, 2.5]
        );
    }

    #[test]
    fn literals_work_on_both_sides() {
        let v = vec![1, NA_INTEGER, 4];

        assert_eq!((10 - leaf(&v)).materialize().unwrap(), vec![9, NA_INTEGER, 6]);
        let out = (0.5 * leaf(&v)).materialize().unwrap();
        assert_eq!(out[0], 0.5);
        assert!(out[1].is_na());
        assert_eq!(out[2], 2.0);
        assert_eq!((8 / scalar(2)).cursor().next(), Some(4));
    }

    #[test]
    fn borrowed_nodes_combine_without_moving() {
        let v = vec![3, 4];
        let sq = leaf(&v) * leaf(&v);
        let sum = &sq + &sq;
        let diff = &sq - 1.0;
        assert_eq!(sum.materialize().unwrap(), vec![18, 32]);
        assert_eq!(diff.materialize().unwrap(), vec![8.0, 15.0]);
        assert_eq!(sq.materialize().unwrap(), vec![9, 16]);
    }

    #[test]
    fn cursors_stay_exhausted() {
        let v = vec![1.9, -1.9];
        let e = leaf(&v).coerce::<i32>();
        let mut cursor = e.cursor();
        assert_fused(&cursor);
        assert_eq!(cursor.next(), Some(1));
        assert_eq!(cursor.next(), Some(-1));
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.next(), None);

        let e = -leaf(&v) + leaf(&v);
        let mut cursor = e.cursor();
        assert_fused(&cursor);
        assert_eq!(cursor.by_ref().count(), 2);
        assert_eq!(cursor.next(), None);
    }
}
