//! Input contract: operands that leaf nodes pull elements from.
use std::borrow::Cow;
use std::iter::Copied;
use std::slice;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::element::Element;

/// Logical length of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Length {
    /// Produces exactly this many elements.
    Finite(usize),
    /// Repeats forever (scalar-only trees).
    Unbounded,
}

impl Length {
    /// Length of a node combining two children: the shorter one wins, and an unbounded
    /// child never limits the other.
    #[inline]
    pub const fn min(self, other: Length) -> Length {
        match (self, other) {
            (Length::Finite(a), Length::Finite(b)) => Length::Finite(if a < b { a } else { b }),
            (Length::Finite(a), Length::Unbounded) | (Length::Unbounded, Length::Finite(a)) => {
                Length::Finite(a)
            }
            (Length::Unbounded, Length::Unbounded) => Length::Unbounded,
        }
    }

    /// The finite length, if any.
    #[inline]
    pub const fn finite(self) -> Option<usize> {
        match self {
            Length::Finite(n) => Some(n),
            Length::Unbounded => None,
        }
    }

    #[inline]
    pub const fn is_unbounded(self) -> bool {
        matches!(self, Length::Unbounded)
    }
}

/// A finite, re-iterable operand yielding elements of a known type.
///
/// Every call to [`Source::elements`] starts a fresh pass; the source itself is never
/// advanced, so several passes may run side by side.
pub trait Source {
    /// Element type of the operand.
    type Elem: Element;

    /// Iterator over one pass of the operand.
    type Iter<'s>: Iterator<Item = Self::Elem>
    where
        Self: 's;

    /// Start a new pass over the operand.
    fn elements(&self) -> Self::Iter<'_>;

    /// Number of elements a pass yields.
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Element> Source for [T] {
    type Elem = T;
    type Iter<'s>
        = Copied<slice::Iter<'s, T>>
    where
        Self: 's;

    #[inline]
    fn elements(&self) -> Self::Iter<'_> {
        self.iter().copied()
    }

    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }
}

impl<T: Element, const N: usize> Source for [T; N] {
    type Elem = T;
    type Iter<'s>
        = Copied<slice::Iter<'s, T>>
    where
        Self: 's;

    #[inline]
    fn elements(&self) -> Self::Iter<'_> {
        self.iter().copied()
    }

    #[inline]
    fn len(&self) -> usize {
        N
    }
}

impl<T: Element> Source for Vec<T> {
    type Elem = T;
    type Iter<'s>
        = Copied<slice::Iter<'s, T>>
    where
        Self: 's;

    #[inline]
    fn elements(&self) -> Self::Iter<'_> {
        self.iter().copied()
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl<T: Element> Source for Cow<'_, [T]> {
    type Elem = T;
    type Iter<'s>
        = Copied<slice::Iter<'s, T>>
    where
        Self: 's;

    #[inline]
    fn elements(&self) -> Self::Iter<'_> {
        self.iter().copied()
    }

    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }
}

impl<S: Source + ?Sized> Source for &S {
    type Elem = S::Elem;
    type Iter<'s>
        = S::Iter<'s>
    where
        Self: 's;

    #[inline]
    fn elements(&self) -> Self::Iter<'_> {
        (**self).elements()
    }

    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_never_limits_a_finite_length() {
        assert_eq!(Length::Finite(3).min(Length::Unbounded), Length::Finite(3));
        assert_eq!(Length::Unbounded.min(Length::Finite(0)), Length::Finite(0));
        assert_eq!(Length::Finite(5).min(Length::Finite(2)), Length::Finite(2));
        assert!(Length::Unbounded.min(Length::Unbounded).is_unbounded());
    }

    #[test]
    fn borrowed_and_owned_sources_agree() {
        let owned = vec![1, 2, 3];
        let borrowed: &[i32] = &owned;
        let cow: Cow<'_, [i32]> = Cow::Borrowed(borrowed);
        assert_eq!(owned.elements().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(Source::len(&borrowed), 3);
        assert_eq!(cow.elements().sum::<i32>(), 6);
        assert!(!Source::is_empty(&[0.5_f64; 2]));
    }
}
