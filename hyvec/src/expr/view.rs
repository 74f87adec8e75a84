//! Structural view of expression nodes.
//!
//! Every node, typed or runtime-typed, decodes to a single [`NodeView`] describing its
//! outer constructor and borrowing its children. Views never evaluate anything.
use either::Either;
use strum::{EnumDiscriminants, EnumIs};

use crate::element::ElementType;
use crate::expr::ops::{BinaryOpKind, UnaryOpKind};
use crate::value::Value;

/// Describes the outer constructor of a node and borrows its children.
#[derive(Debug, Clone, Copy, EnumIs, EnumDiscriminants)]
#[strum_discriminants(derive(PartialOrd, Ord, Hash))]
#[strum_discriminants(name(NodeKind))]
#[strum_discriminants(vis(pub))]
pub enum NodeView<L, R> {
    /// Finite operand of `len` elements.
    Leaf { element_type: ElementType, len: usize },
    /// A single value repeated forever.
    Scalar(Value),
    /// `op(inner)`
    Unary { op: UnaryOpKind, inner: L },
    /// `lhs op rhs`
    Binary { op: BinaryOpKind, lhs: L, rhs: R },
    /// Explicit conversion of `inner` to `target`.
    Coerce { target: ElementType, inner: L },
}

impl<L, R> NodeView<L, R> {
    /// Map the children, keeping the constructor.
    #[inline]
    pub fn map<L2, R2>(self, f: impl FnOnce(L) -> L2, g: impl FnOnce(R) -> R2) -> NodeView<L2, R2> {
        match self {
            NodeView::Leaf { element_type, len } => NodeView::Leaf { element_type, len },
            NodeView::Scalar(v) => NodeView::Scalar(v),
            NodeView::Unary { op, inner } => NodeView::Unary { op, inner: f(inner) },
            NodeView::Binary { op, lhs, rhs } => NodeView::Binary {
                op,
                lhs: f(lhs),
                rhs: g(rhs),
            },
            NodeView::Coerce { target, inner } => NodeView::Coerce {
                target,
                inner: f(inner),
            },
        }
    }

    /// Constructor of this node.
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.into()
    }
}

/// Anything that can be inspected as a tree of [`NodeView`]s.
pub trait ExprShape {
    /// Describe the outer constructor and borrow the children.
    fn view(&self) -> NodeView<impl ExprShape, impl ExprShape>;

    /// Number of nodes in the tree.
    fn node_count(&self) -> usize {
        match self.view() {
            NodeView::Leaf { .. } | NodeView::Scalar(_) => 1,
            NodeView::Unary { inner, .. } | NodeView::Coerce { inner, .. } => 1 + inner.node_count(),
            NodeView::Binary { lhs, rhs, .. } => 1 + lhs.node_count() + rhs.node_count(),
        }
    }

    /// Length of the longest root-to-leaf path, counting nodes.
    fn depth(&self) -> usize {
        match self.view() {
            NodeView::Leaf { .. } | NodeView::Scalar(_) => 1,
            NodeView::Unary { inner, .. } | NodeView::Coerce { inner, .. } => 1 + inner.depth(),
            NodeView::Binary { lhs, rhs, .. } => 1 + lhs.depth().max(rhs.depth()),
        }
    }
}

impl<E: ExprShape> ExprShape for &E {
    fn view(&self) -> NodeView<impl ExprShape, impl ExprShape> {
        (**self).view()
    }
}

impl<L: ExprShape, R: ExprShape> ExprShape for Either<L, R> {
    fn view(&self) -> NodeView<impl ExprShape, impl ExprShape> {
        match self {
            Either::Left(l) => l.view().map(Either::Left, Either::Left),
            Either::Right(r) => r.view().map(Either::Right, Either::Right),
        }
    }
}
