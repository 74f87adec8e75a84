//! Canonical element types and the per-type missing-value contract.
//!
//! Every native representation that may appear inside a vector maps to exactly one
//! [`ElementType`] tag. The mapping is carried by the sealed [`Element`] trait, so asking
//! for the tag of an unsupported type is a compile error rather than a runtime check.
//!
//! | Tag                     | Native | Sentinel                 | Host code        |
//! |-------------------------|--------|--------------------------|------------------|
//! | [`ElementType::Integer`] | `i32`  | `i32::MIN`               | `INTSXP` (13)    |
//! | [`ElementType::Real`]    | `f64`  | NaN with low word `1954` | `REALSXP` (14)   |
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIter, FromRepr, IntoStaticStr};

use crate::expr::ops::{BinaryOpKind, UnaryOpKind};
use crate::na::{NA_INTEGER, NA_REAL, NA_REAL_LOW_WORD};
use crate::value::Value;

/// Host vector type code for integer vectors.
pub const INTSXP: u32 = 13;
/// Host vector type code for real vectors.
pub const REALSXP: u32 = 14;

/// Tag identifying which missing-value contract and host representation applies.
///
/// The discriminant order is the promotion order: a tag never widens to one with a
/// smaller discriminant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    FromRepr,
    IntoStaticStr,
    strum::Display,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum ElementType {
    /// 32-bit signed integer.
    Integer,
    /// Double-precision real.
    Real,
}

impl ElementType {
    /// Human readable name of the tag (`"integer"` or `"real"`).
    #[inline]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Position of the tag in the promotion order.
    #[inline]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Type code of the host vector holding elements of this tag.
    #[inline]
    pub const fn host_code(self) -> u32 {
        match self {
            ElementType::Integer => INTSXP,
            ElementType::Real => REALSXP,
        }
    }

    /// Tag for a host vector type code, `None` for codes with no element contract.
    #[inline]
    pub const fn from_host_code(code: u32) -> Option<Self> {
        match code {
            INTSXP => Some(ElementType::Integer),
            REALSXP => Some(ElementType::Real),
            _ => None,
        }
    }
}

pub(crate) mod sealed {
    pub trait Sealed {}

    impl Sealed for i32 {}
    impl Sealed for f64 {}
}

/// A native element representation together with its missing-value contract.
///
/// Sealed: only `i32` and `f64` implement it.
pub trait Element:
    sealed::Sealed + Copy + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Canonical tag of this representation.
    const TYPE: ElementType;

    /// Host vector type code, always `Self::TYPE.host_code()`.
    const HOST_CODE: u32 = Self::TYPE.host_code();

    /// The reserved value representing "missing".
    fn na() -> Self;

    /// `true` iff `self` is the missing sentinel under this type's own equality rule.
    fn is_na(self) -> bool;

    /// Widen to a real, mapping the sentinel to the real sentinel.
    fn to_real(self) -> f64;

    /// Erase the static type.
    fn into_value(self) -> Value;
}

impl Element for i32 {
    const TYPE: ElementType = ElementType::Integer;

    #[inline]
    fn na() -> Self {
        NA_INTEGER
    }

    #[inline]
    fn is_na(self) -> bool {
        self == NA_INTEGER
    }

    #[inline]
    fn to_real(self) -> f64 {
        if self.is_na() { NA_REAL } else { self as f64 }
    }

    #[inline]
    fn into_value(self) -> Value {
        Value::Integer(self)
    }
}

impl Element for f64 {
    const TYPE: ElementType = ElementType::Real;

    #[inline]
    fn na() -> Self {
        NA_REAL
    }

    /// Payload comparison: a quieted copy of the sentinel is still missing, an
    /// ordinary NaN is not.
    #[inline]
    fn is_na(self) -> bool {
        self.is_nan() && (self.to_bits() as u32) == NA_REAL_LOW_WORD
    }

    #[inline]
    fn to_real(self) -> f64 {
        self
    }

    #[inline]
    fn into_value(self) -> Value {
        Value::Real(self)
    }
}

/// Resolve the canonical tag of a native representation at compile time.
#[inline]
pub const fn element_type_of<T: Element>() -> ElementType {
    T::TYPE
}

/// Arithmetic kernels for non-missing operands.
///
/// Callers check [`crate::na::either_na`] first; kernels never see a sentinel as input,
/// but may still produce one (integer overflow, integer division by zero).
pub trait Numeric: Element {
    /// Apply a binary operator to two operands of the same type.
    fn binary(op: BinaryOpKind, lhs: Self, rhs: Self) -> Self;

    /// Arithmetic negation.
    fn negate(self) -> Self;

    /// Absolute value.
    fn absolute(self) -> Self;
}

impl Numeric for i32 {
    fn binary(op: BinaryOpKind, lhs: Self, rhs: Self) -> Self {
        let out = match op {
            BinaryOpKind::Add => lhs.checked_add(rhs),
            BinaryOpKind::Sub => lhs.checked_sub(rhs),
            BinaryOpKind::Mul => lhs.checked_mul(rhs),
            // None for a zero divisor and for MIN / -1
            BinaryOpKind::Div => lhs.checked_div(rhs),
            BinaryOpKind::Min => Some(lhs.min(rhs)),
            BinaryOpKind::Max => Some(lhs.max(rhs)),
        };
        // A result landing exactly on i32::MIN is the sentinel as well.
        out.unwrap_or(NA_INTEGER)
    }

    #[inline]
    fn negate(self) -> Self {
        self.checked_neg().unwrap_or(NA_INTEGER)
    }

    #[inline]
    fn absolute(self) -> Self {
        self.checked_abs().unwrap_or(NA_INTEGER)
    }
}

impl Numeric for f64 {
    fn binary(op: BinaryOpKind, lhs: Self, rhs: Self) -> Self {
        match op {
            BinaryOpKind::Add => lhs + rhs,
            BinaryOpKind::Sub => lhs - rhs,
            BinaryOpKind::Mul => lhs * rhs,
            BinaryOpKind::Div => lhs / rhs,
            BinaryOpKind::Min | BinaryOpKind::Max if lhs.is_nan() || rhs.is_nan() => f64::NAN,
            BinaryOpKind::Min => lhs.min(rhs),
            BinaryOpKind::Max => lhs.max(rhs),
        }
    }

    #[inline]
    fn negate(self) -> Self {
        -self
    }

    #[inline]
    fn absolute(self) -> Self {
        self.abs()
    }
}

impl UnaryOpKind {
    /// Evaluate a real-valued function (`sqrt`, `exp`, `ln`) on a non-missing real.
    ///
    /// Type-preserving operators are evaluated through [`Numeric`] instead.
    #[inline]
    pub(crate) fn eval_real(self, x: f64) -> f64 {
        match self {
            UnaryOpKind::Neg => -x,
            UnaryOpKind::Abs => x.abs(),
            UnaryOpKind::Sqrt => x.sqrt(),
            UnaryOpKind::Exp => x.exp(),
            UnaryOpKind::Ln => x.ln(),
        }
    }
}

/// Element conversion that maps the source sentinel to the destination sentinel.
///
/// Widening conversions are exact. The only narrowing conversion (real to integer)
/// truncates toward zero; NaN, infinities and values outside the integer range become
/// missing.
pub trait CastTo<T: Element>: Element {
    /// Convert `self` to `T`.
    fn cast(self) -> T;
}

impl CastTo<i32> for i32 {
    #[inline]
    fn cast(self) -> i32 {
        self
    }
}

impl CastTo<f64> for f64 {
    #[inline]
    fn cast(self) -> f64 {
        self
    }
}

impl CastTo<f64> for i32 {
    #[inline]
    fn cast(self) -> f64 {
        self.to_real()
    }
}

impl CastTo<i32> for f64 {
    #[inline]
    fn cast(self) -> i32 {
        if self.is_nan() {
            return NA_INTEGER;
        }
        let t = self.trunc();
        if t > NA_INTEGER as f64 && t <= i32::MAX as f64 {
            t as i32
        } else {
            NA_INTEGER
        }
    }
}
