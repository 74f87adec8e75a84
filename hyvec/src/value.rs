//! Runtime-typed element values.
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIs, EnumTryAs};

use crate::element::{CastTo, Element, ElementType, Numeric};
use crate::expr::ops::{BinaryOpKind, UnaryOpKind};

/// A single element whose type is only known at run time.
#[derive(Debug, Clone, Copy, PartialEq, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    Integer(i32),
    Real(f64),
}

impl Value {
    /// The sentinel of `ty`.
    #[inline]
    pub fn na(ty: ElementType) -> Self {
        match ty {
            ElementType::Integer => Value::Integer(i32::na()),
            ElementType::Real => Value::Real(f64::na()),
        }
    }

    #[inline]
    pub fn element_type(self) -> ElementType {
        match self {
            Value::Integer(_) => ElementType::Integer,
            Value::Real(_) => ElementType::Real,
        }
    }

    #[inline]
    pub fn is_na(self) -> bool {
        match self {
            Value::Integer(v) => v.is_na(),
            Value::Real(v) => v.is_na(),
        }
    }

    /// Convert to `ty`, keeping missing values missing.
    pub fn cast(self, ty: ElementType) -> Self {
        match (self, ty) {
            (Value::Integer(v), ElementType::Integer) => Value::Integer(v),
            (Value::Integer(v), ElementType::Real) => Value::Real(CastTo::<f64>::cast(v)),
            (Value::Real(v), ElementType::Integer) => Value::Integer(CastTo::<i32>::cast(v)),
            (Value::Real(v), ElementType::Real) => Value::Real(v),
        }
    }

    /// Combine two values, widening both to the widest of their types first.
    pub fn binary(op: BinaryOpKind, lhs: Value, rhs: Value) -> Value {
        let ty = lhs.element_type().widest(rhs.element_type());
        if lhs.is_na() || rhs.is_na() {
            return Value::na(ty);
        }
        match (lhs.cast(ty), rhs.cast(ty)) {
            (Value::Integer(l), Value::Integer(r)) => Value::Integer(i32::binary(op, l, r)),
            (Value::Real(l), Value::Real(r)) => Value::Real(f64::binary(op, l, r)),
            _ => unreachable!("operands widened to {ty}"),
        }
    }

    /// Apply a unary operator.
    pub fn unary(op: UnaryOpKind, x: Value) -> Value {
        let ty = op.output_type(x.element_type());
        if x.is_na() {
            return Value::na(ty);
        }
        match (op, x) {
            (UnaryOpKind::Neg, Value::Integer(v)) => Value::Integer(v.negate()),
            (UnaryOpKind::Abs, Value::Integer(v)) => Value::Integer(v.absolute()),
            (op, v) => Value::Real(op.eval_real(v.to_real())),
        }
    }

    /// Widen to a real, mapping the sentinel to the real sentinel.
    #[inline]
    pub fn to_real(self) -> f64 {
        match self {
            Value::Integer(v) => v.to_real(),
            Value::Real(v) => v,
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_na() {
            return write!(f, "NA");
        }
        match self {
            Value::Integer(v) => write!(f, "{v}L"),
            Value::Real(v) => write!(f, "{v:?}"),
        }
    }
}
