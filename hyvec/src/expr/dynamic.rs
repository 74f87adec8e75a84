//! Runtime-typed expression trees.
//!
//! Host runtimes usually hand over vectors whose element type is only known once the
//! program runs. [`DynExpr`] mirrors the typed nodes of [`crate::expr::defs`] as a single
//! sum type: the element type of every node is still resolved when the node is built, but
//! elements travel as [`Value`]s and dispatch happens per element.
//!
//! ```
//! use hyvec::prelude::*;
//!
//! let ints = vec![1, NA_INTEGER, 3];
//! let reals = vec![1.5, 2.5, NA_REAL];
//! let e = DynExpr::leaf(&ints[..]) + DynExpr::leaf(&reals[..]);
//! assert_eq!(e.element_type(), ElementType::Real);
//!
//! let out = e.materialize().unwrap().try_as_real().unwrap();
//! assert_eq!(out[0], 2.5);
//! assert!(is_na(out[1]) && is_na(out[2]));
//! ```
use std::borrow::Cow;
use std::fmt;
use std::iter::FusedIterator;
use std::slice;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIs, EnumTryAs};

use crate::element::{Element, ElementType};
use crate::error::{HvError, HvResult};
use crate::expr::ops::{BinaryOpKind, UnaryOpKind};
use crate::expr::pretty::write_shape;
use crate::expr::view::{ExprShape, NodeView};
use crate::materialize::{Sink, drain_into, resolve_len};
use crate::source::Length;
use crate::value::Value;

// ============================== Host buffers ==============================

/// Borrowed or owned operand data tagged with its element type.
#[derive(Debug, Clone, PartialEq, EnumIs)]
pub enum HostSlice<'a> {
    Integer(Cow<'a, [i32]>),
    Real(Cow<'a, [f64]>),
}

impl HostSlice<'_> {
    #[inline]
    pub fn element_type(&self) -> ElementType {
        match self {
            HostSlice::Integer(_) => ElementType::Integer,
            HostSlice::Real(_) => ElementType::Real,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match self {
            HostSlice::Integer(v) => v.len(),
            HostSlice::Real(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`, if in bounds.
    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            HostSlice::Integer(v) => v.get(index).copied().map(Value::Integer),
            HostSlice::Real(v) => v.get(index).copied().map(Value::Real),
        }
    }

    /// Detach from the borrowed data.
    pub fn into_owned(self) -> HostVector {
        match self {
            HostSlice::Integer(v) => HostVector::Integer(v.into_owned()),
            HostSlice::Real(v) => HostVector::Real(v.into_owned()),
        }
    }
}

impl<'a> From<&'a [i32]> for HostSlice<'a> {
    fn from(value: &'a [i32]) -> Self {
        HostSlice::Integer(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a [f64]> for HostSlice<'a> {
    fn from(value: &'a [f64]) -> Self {
        HostSlice::Real(Cow::Borrowed(value))
    }
}

impl From<Vec<i32>> for HostSlice<'_> {
    fn from(value: Vec<i32>) -> Self {
        HostSlice::Integer(Cow::Owned(value))
    }
}

impl From<Vec<f64>> for HostSlice<'_> {
    fn from(value: Vec<f64>) -> Self {
        HostSlice::Real(Cow::Owned(value))
    }
}

impl<'a> From<&'a HostVector> for HostSlice<'a> {
    fn from(value: &'a HostVector) -> Self {
        match value {
            HostVector::Integer(v) => HostSlice::Integer(Cow::Borrowed(v)),
            HostVector::Real(v) => HostSlice::Real(Cow::Borrowed(v)),
        }
    }
}

/// Owned materialization result of a [`DynExpr`].
#[derive(Debug, Clone, PartialEq, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HostVector {
    Integer(Vec<i32>),
    Real(Vec<f64>),
}

impl HostVector {
    /// Empty vector of type `ty`.
    pub fn with_capacity(ty: ElementType, capacity: usize) -> Self {
        match ty {
            ElementType::Integer => HostVector::Integer(Vec::with_capacity(capacity)),
            ElementType::Real => HostVector::Real(Vec::with_capacity(capacity)),
        }
    }

    #[inline]
    pub fn element_type(&self) -> ElementType {
        match self {
            HostVector::Integer(_) => ElementType::Integer,
            HostVector::Real(_) => ElementType::Real,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match self {
            HostVector::Integer(v) => v.len(),
            HostVector::Real(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            HostVector::Integer(v) => v.get(index).copied().map(Value::Integer),
            HostVector::Real(v) => v.get(index).copied().map(Value::Real),
        }
    }

    /// Number of missing elements.
    pub fn count_na(&self) -> usize {
        match self {
            HostVector::Integer(v) => v.iter().filter(|x| x.is_na()).count(),
            HostVector::Real(v) => v.iter().filter(|x| x.is_na()).count(),
        }
    }
}

impl Sink<Value> for HostVector {
    fn reserve(&mut self, additional: usize) {
        match self {
            HostVector::Integer(v) => v.reserve(additional),
            HostVector::Real(v) => v.reserve(additional),
        }
    }

    fn push(&mut self, value: Value) -> HvResult<()> {
        match (self, value) {
            (HostVector::Integer(v), Value::Integer(x)) => v.push(x),
            (HostVector::Real(v), Value::Real(x)) => v.push(x),
            (this, value) => {
                return Err(HvError::TypeMismatch {
                    expected: this.element_type(),
                    found: value.element_type(),
                });
            }
        }
        Ok(())
    }
}

// ================================ DynExpr ================================

/// Runtime-typed expression node.
///
/// Build it with the constructors ([`DynExpr::leaf`], [`DynExpr::scalar`], ...) or the
/// `std::ops` operators; they resolve the node's element type immediately.
#[derive(Debug, Clone, PartialEq, EnumIs)]
pub enum DynExpr<'a> {
    Leaf(HostSlice<'a>),
    Scalar(Value),
    Unary {
        op: UnaryOpKind,
        ty: ElementType,
        inner: Box<DynExpr<'a>>,
    },
    Binary {
        op: BinaryOpKind,
        ty: ElementType,
        lhs: Box<DynExpr<'a>>,
        rhs: Box<DynExpr<'a>>,
    },
    Coerce {
        target: ElementType,
        inner: Box<DynExpr<'a>>,
    },
}

impl<'a> DynExpr<'a> {
    /// Finite operand.
    #[inline]
    pub fn leaf(data: impl Into<HostSlice<'a>>) -> Self {
        DynExpr::Leaf(data.into())
    }

    /// A scalar repeated for as long as the other operands last.
    #[inline]
    pub fn scalar(value: impl Into<Value>) -> Self {
        DynExpr::Scalar(value.into())
    }

    /// The missing scalar of type `ty`.
    #[inline]
    pub fn na(ty: ElementType) -> Self {
        DynExpr::Scalar(Value::na(ty))
    }

    pub fn unary(op: UnaryOpKind, inner: impl Into<DynExpr<'a>>) -> Self {
        let inner = inner.into();
        DynExpr::Unary {
            op,
            ty: op.output_type(inner.element_type()),
            inner: Box::new(inner),
        }
    }

    pub fn binary(op: BinaryOpKind, lhs: impl Into<DynExpr<'a>>, rhs: impl Into<DynExpr<'a>>) -> Self {
        let (lhs, rhs) = (lhs.into(), rhs.into());
        DynExpr::Binary {
            op,
            ty: lhs.element_type().widest(rhs.element_type()),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Explicitly convert every element to `target`.
    pub fn coerce(self, target: ElementType) -> Self {
        DynExpr::Coerce {
            target,
            inner: Box::new(self),
        }
    }

    pub fn pmin(self, rhs: impl Into<DynExpr<'a>>) -> Self {
        Self::binary(BinaryOpKind::Min, self, rhs)
    }

    pub fn pmax(self, rhs: impl Into<DynExpr<'a>>) -> Self {
        Self::binary(BinaryOpKind::Max, self, rhs)
    }

    pub fn abs(self) -> Self {
        Self::unary(UnaryOpKind::Abs, self)
    }

    pub fn sqrt(self) -> Self {
        Self::unary(UnaryOpKind::Sqrt, self)
    }

    pub fn exp(self) -> Self {
        Self::unary(UnaryOpKind::Exp, self)
    }

    pub fn ln(self) -> Self {
        Self::unary(UnaryOpKind::Ln, self)
    }

    /// Element type of this node's output.
    pub fn element_type(&self) -> ElementType {
        match self {
            DynExpr::Leaf(data) => data.element_type(),
            DynExpr::Scalar(value) => value.element_type(),
            DynExpr::Unary { ty, .. } | DynExpr::Binary { ty, .. } => *ty,
            DynExpr::Coerce { target, .. } => *target,
        }
    }

    /// Logical length: the minimum over all finite leaves.
    pub fn length(&self) -> Length {
        match self {
            DynExpr::Leaf(data) => Length::Finite(data.len()),
            DynExpr::Scalar(_) => Length::Unbounded,
            DynExpr::Unary { inner, .. } | DynExpr::Coerce { inner, .. } => inner.length(),
            DynExpr::Binary { lhs, rhs, .. } => lhs.length().min(rhs.length()),
        }
    }

    /// Start a fresh pass over this tree.
    pub fn cursor(&self) -> DynCursor<'_> {
        let state = match self {
            DynExpr::Leaf(HostSlice::Integer(v)) => CursorState::Integer(v.iter()),
            DynExpr::Leaf(HostSlice::Real(v)) => CursorState::Real(v.iter()),
            DynExpr::Scalar(value) => CursorState::Scalar(*value),
            DynExpr::Unary { op, inner, .. } => CursorState::Unary {
                op: *op,
                inner: Box::new(inner.cursor()),
            },
            DynExpr::Binary { op, lhs, rhs, .. } => CursorState::Binary {
                op: *op,
                lhs: Box::new(lhs.cursor()),
                rhs: Box::new(rhs.cursor()),
                exhausted: false,
            },
            DynExpr::Coerce { target, inner } => CursorState::Coerce {
                target: *target,
                inner: Box::new(inner.cursor()),
            },
        };
        DynCursor(state)
    }

    /// Write exactly `len` elements into `sink`, returning the count written.
    pub fn materialize_into<S: Sink<Value>>(&self, len: usize, sink: &mut S) -> HvResult<usize> {
        drain_into(self.cursor(), self.element_type(), len, sink)
    }

    /// Materialize the natural length of this tree.
    pub fn materialize(&self) -> HvResult<HostVector> {
        let len = resolve_len(self.length())?;
        self.materialize_len(len)
    }

    /// Materialize exactly `len` elements.
    pub fn materialize_len(&self, len: usize) -> HvResult<HostVector> {
        let mut out = HostVector::with_capacity(self.element_type(), len);
        self.materialize_into(len, &mut out)?;
        Ok(out)
    }

    /// `true` as soon as one element is missing.
    pub fn any_na(&self) -> bool {
        let limit = self.length().finite().unwrap_or(1);
        self.cursor().take(limit).any(Value::is_na)
    }

    /// Number of missing elements over the natural length.
    pub fn count_na(&self) -> HvResult<usize> {
        let len = resolve_len(self.length())?;
        Ok(self.cursor().take(len).filter(|v| v.is_na()).count())
    }
}

impl<'a> From<HostSlice<'a>> for DynExpr<'a> {
    fn from(value: HostSlice<'a>) -> Self {
        DynExpr::Leaf(value)
    }
}

impl From<Value> for DynExpr<'_> {
    fn from(value: Value) -> Self {
        DynExpr::Scalar(value)
    }
}

impl From<i32> for DynExpr<'_> {
    fn from(value: i32) -> Self {
        DynExpr::Scalar(Value::Integer(value))
    }
}

impl From<f64> for DynExpr<'_> {
    fn from(value: f64) -> Self {
        DynExpr::Scalar(Value::Real(value))
    }
}

macro_rules! dyn_binary_ops {
    ($($trait:ident $method:ident => $kind:ident),* $(,)?) => {
        $(
            impl<'a, Q: Into<DynExpr<'a>>> std::ops::$trait<Q> for DynExpr<'a> {
                type Output = DynExpr<'a>;

                #[inline]
                fn $method(self, rhs: Q) -> Self::Output {
                    DynExpr::binary(BinaryOpKind::$kind, self, rhs)
                }
            }

            impl<'a> std::ops::$trait<DynExpr<'a>> for i32 {
                type Output = DynExpr<'a>;

                #[inline]
                fn $method(self, rhs: DynExpr<'a>) -> Self::Output {
                    DynExpr::binary(BinaryOpKind::$kind, self, rhs)
                }
            }

            impl<'a> std::ops::$trait<DynExpr<'a>> for f64 {
                type Output = DynExpr<'a>;

                #[inline]
                fn $method(self, rhs: DynExpr<'a>) -> Self::Output {
                    DynExpr::binary(BinaryOpKind::$kind, self, rhs)
                }
            }
        )*
    };
}

dyn_binary_ops! {
    Add add => Add,
    Sub sub => Sub,
    Mul mul => Mul,
    Div div => Div,
}

impl std::ops::Neg for DynExpr<'_> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        DynExpr::unary(UnaryOpKind::Neg, self)
    }
}

impl ExprShape for DynExpr<'_> {
    fn view(&self) -> NodeView<impl ExprShape, impl ExprShape> {
        match self {
            DynExpr::Leaf(data) => NodeView::Leaf {
                element_type: data.element_type(),
                len: data.len(),
            },
            DynExpr::Scalar(value) => NodeView::Scalar(*value),
            DynExpr::Unary { op, inner, .. } => NodeView::Unary {
                op: *op,
                inner: &**inner,
            },
            DynExpr::Binary { op, lhs, rhs, .. } => NodeView::Binary {
                op: *op,
                lhs: &**lhs,
                rhs: &**rhs,
            },
            DynExpr::Coerce { target, inner } => NodeView::Coerce {
                target: *target,
                inner: &**inner,
            },
        }
    }
}

impl fmt::Display for DynExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_shape(self, f)
    }
}

// ================================ Cursor ================================

/// One pass over a [`DynExpr`], yielding [`Value`]s of the node's element type.
pub struct DynCursor<'c>(CursorState<'c>);

enum CursorState<'c> {
    Integer(slice::Iter<'c, i32>),
    Real(slice::Iter<'c, f64>),
    Scalar(Value),
    Unary {
        op: UnaryOpKind,
        inner: Box<DynCursor<'c>>,
    },
    Binary {
        op: BinaryOpKind,
        lhs: Box<DynCursor<'c>>,
        rhs: Box<DynCursor<'c>>,
        exhausted: bool,
    },
    Coerce {
        target: ElementType,
        inner: Box<DynCursor<'c>>,
    },
}

impl Iterator for DynCursor<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        match &mut self.0 {
            CursorState::Integer(it) => it.next().copied().map(Value::Integer),
            CursorState::Real(it) => it.next().copied().map(Value::Real),
            CursorState::Scalar(value) => Some(*value),
            CursorState::Unary { op, inner } => inner.next().map(|x| Value::unary(*op, x)),
            CursorState::Binary {
                op,
                lhs,
                rhs,
                exhausted,
            } => {
                if *exhausted {
                    return None;
                }
                let pair = match lhs.next() {
                    Some(l) => rhs.next().map(|r| (l, r)),
                    None => None,
                };
                let Some((l, r)) = pair else {
                    *exhausted = true;
                    return None;
                };
                Some(Value::binary(*op, l, r))
            }
            CursorState::Coerce { target, inner } => inner.next().map(|x| x.cast(*target)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.0 {
            CursorState::Integer(it) => it.size_hint(),
            CursorState::Real(it) => it.size_hint(),
            CursorState::Scalar(_) => (usize::MAX, None),
            CursorState::Unary { inner, .. } | CursorState::Coerce { inner, .. } => inner.size_hint(),
            CursorState::Binary { exhausted: true, .. } => (0, Some(0)),
            CursorState::Binary { lhs, rhs, .. } => {
                let (l_lo, l_hi) = lhs.size_hint();
                let (r_lo, r_hi) = rhs.size_hint();
                let hi = match (l_hi, r_hi) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, None) => a,
                    (None, b) => b,
                };
                (l_lo.min(r_lo), hi)
            }
        }
    }
}

impl FusedIterator for DynCursor<'_> {}
