//! Missing-value (NA) contract consumers.
//!
//! The per-type sentinel and detection live on [`Element`]; this module exposes the
//! generic helpers every operator goes through before computing anything.
use crate::element::Element;

/// Sentinel of [`crate::element::ElementType::Integer`].
pub const NA_INTEGER: i32 = i32::MIN;

/// Low 32 bits of the real sentinel's NaN payload.
pub const NA_REAL_LOW_WORD: u32 = 1954;

/// Bit pattern of the real sentinel.
pub const NA_REAL_BITS: u64 = 0x7FF0_0000_0000_0000 | NA_REAL_LOW_WORD as u64;

/// Sentinel of [`crate::element::ElementType::Real`].
///
/// Never compare against it with `==`: use [`is_na`].
pub const NA_REAL: f64 = f64::from_bits(NA_REAL_BITS);

/// The sentinel of `T`.
#[inline]
pub fn na<T: Element>() -> T {
    T::na()
}

/// `true` iff `x` is missing, resolved through `x`'s canonical element type.
#[inline]
pub fn is_na<T: Element>(x: T) -> bool {
    x.is_na()
}

/// `true` iff either operand is missing.
///
/// An operator whose operands satisfy this must produce the sentinel of its own result
/// type instead of computing.
#[inline]
pub fn either_na<T: Element, U: Element>(x: T, y: U) -> bool {
    x.is_na() || y.is_na()
}
