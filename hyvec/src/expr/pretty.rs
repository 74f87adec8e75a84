//! Pretty printing of expression trees.
//!
//! Leaves print as `type[len]`, scalars as literals (`2L`, `1.5`, `NA`), infix operators
//! fully parenthesised and everything else in call syntax:
//!
//! ```
//! use hyvec::prelude::*;
//!
//! let v = vec![1, 2, 3];
//! let w = vec![0.5, 1.5, 2.5];
//! let e = (leaf(&v) + 2) * leaf(&w).sqrt();
//! assert_eq!(e.pretty().to_string(), "((integer[3] + 2L) * sqrt(real[3]))");
//! ```
use std::fmt;

use crate::expr::ops::UnaryOpKind;
use crate::expr::view::{ExprShape, NodeView};

/// Display adapter returned by [`crate::expr::VecExpr::pretty`].
pub struct Pretty<'a, E>(&'a E);

impl<'a, E: ExprShape> Pretty<'a, E> {
    #[inline]
    pub fn new(expr: &'a E) -> Self {
        Self(expr)
    }
}

impl<E: ExprShape> fmt::Display for Pretty<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_shape(self.0, f)
    }
}

pub(crate) fn write_shape<E: ExprShape>(expr: &E, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match expr.view() {
        NodeView::Leaf { element_type, len } => write!(f, "{element_type}[{len}]"),
        NodeView::Scalar(value) => write!(f, "{value}"),
        NodeView::Unary {
            op: UnaryOpKind::Neg,
            inner,
        } => {
            f.write_str("-")?;
            write_shape(&inner, f)
        }
        NodeView::Unary { op, inner } => {
            write!(f, "{op}(")?;
            write_shape(&inner, f)?;
            f.write_str(")")
        }
        NodeView::Binary { op, lhs, rhs } if op.is_infix() => {
            f.write_str("(")?;
            write_shape(&lhs, f)?;
            write!(f, " {op} ")?;
            write_shape(&rhs, f)?;
            f.write_str(")")
        }
        NodeView::Binary { op, lhs, rhs } => {
            write!(f, "{op}(")?;
            write_shape(&lhs, f)?;
            f.write_str(", ")?;
            write_shape(&rhs, f)?;
            f.write_str(")")
        }
        NodeView::Coerce { target, inner } => {
            write!(f, "as.{target}(")?;
            write_shape(&inner, f)?;
            f.write_str(")")
        }
    }
}
