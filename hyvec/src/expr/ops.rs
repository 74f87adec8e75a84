//! Operator tags.
//!
//! Each operator exists twice: as a zero-sized type implementing [`BinaryOp`] or
//! [`UnaryOp`] (statically dispatched inside typed nodes), and as a variant of
//! [`BinaryOpKind`] / [`UnaryOpKind`] (runtime-typed trees, views, printing).
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIter, FromRepr};

use crate::element::{ElementType, Numeric};

/// Runtime tag of a binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, FromRepr, strum::Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum BinaryOpKind {
    #[strum(to_string = "+")]
    Add,
    #[strum(to_string = "-")]
    Sub,
    #[strum(to_string = "*")]
    Mul,
    #[strum(to_string = "/")]
    Div,
    #[strum(to_string = "pmin")]
    Min,
    #[strum(to_string = "pmax")]
    Max,
}

impl BinaryOpKind {
    /// `true` for operators printed between their operands.
    #[inline]
    pub const fn is_infix(self) -> bool {
        !matches!(self, BinaryOpKind::Min | BinaryOpKind::Max)
    }
}

/// Runtime tag of a unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, FromRepr, strum::Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum UnaryOpKind {
    #[strum(to_string = "-")]
    Neg,
    Abs,
    Sqrt,
    Exp,
    #[strum(to_string = "log")]
    Ln,
}

impl UnaryOpKind {
    /// Element type produced when applied to an operand of type `input`.
    #[inline]
    pub const fn output_type(self, input: ElementType) -> ElementType {
        match self {
            UnaryOpKind::Neg | UnaryOpKind::Abs => input,
            UnaryOpKind::Sqrt | UnaryOpKind::Exp | UnaryOpKind::Ln => ElementType::Real,
        }
    }
}

/// Statically dispatched binary operator.
pub trait BinaryOp: Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// Runtime tag of this operator.
    const KIND: BinaryOpKind;

    /// Apply to two non-missing operands already widened to a common type.
    #[inline]
    fn apply<T: Numeric>(lhs: T, rhs: T) -> T {
        T::binary(Self::KIND, lhs, rhs)
    }
}

/// Statically dispatched unary operator.
pub trait UnaryOp: Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// Runtime tag of this operator.
    const KIND: UnaryOpKind;

    /// Result element type for an operand of type `T`.
    type Output<T: Numeric>: Numeric;

    /// Apply to a non-missing operand.
    fn apply<T: Numeric>(x: T) -> Self::Output<T>;
}

macro_rules! binary_ops {
    ($( $(#[$meta:meta])* $name:ident; )*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
            pub struct $name;

            impl BinaryOp for $name {
                const KIND: BinaryOpKind = BinaryOpKind::$name;
            }
        )*
    };
}

binary_ops! {
    /// `lhs + rhs`
    Add;
    /// `lhs - rhs`
    Sub;
    /// `lhs * rhs`
    Mul;
    /// `lhs / rhs`; truncating for integers.
    Div;
    /// Element-wise minimum.
    Min;
    /// Element-wise maximum.
    Max;
}

/// `-x`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Neg;

impl UnaryOp for Neg {
    const KIND: UnaryOpKind = UnaryOpKind::Neg;
    type Output<T: Numeric> = T;

    #[inline]
    fn apply<T: Numeric>(x: T) -> T {
        x.negate()
    }
}

/// `|x|`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Abs;

impl UnaryOp for Abs {
    const KIND: UnaryOpKind = UnaryOpKind::Abs;
    type Output<T: Numeric> = T;

    #[inline]
    fn apply<T: Numeric>(x: T) -> T {
        x.absolute()
    }
}

macro_rules! real_unary_ops {
    ($( $(#[$meta:meta])* $name:ident; )*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
            pub struct $name;

            impl UnaryOp for $name {
                const KIND: UnaryOpKind = UnaryOpKind::$name;
                type Output<T: Numeric> = f64;

                #[inline]
                fn apply<T: Numeric>(x: T) -> f64 {
                    Self::KIND.eval_real(x.to_real())
                }
            }
        )*
    };
}

real_unary_ops! {
    /// Square root; always real.
    Sqrt;
    /// Natural exponential; always real.
    Exp;
    /// Natural logarithm; always real.
    Ln;
}
