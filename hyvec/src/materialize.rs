//! Materialization: draining an expression's cursor into an output buffer.
//!
//! Every pass goes through a fresh cursor, so materializing the same tree twice (or from
//! several threads at once) yields identical results.
use log::{debug, trace, warn};
use smallvec::SmallVec;

use crate::element::{Element, ElementType};
use crate::error::{HvError, HvResult};
use crate::expr::VecExpr;
use crate::source::Length;

/// Output contract for materialization.
pub trait Sink<T> {
    /// Hint that `additional` more elements are about to be pushed.
    #[inline]
    fn reserve(&mut self, additional: usize) {
        let _ = additional;
    }

    /// Append one element.
    fn push(&mut self, value: T) -> HvResult<()>;
}

impl<T> Sink<T> for Vec<T> {
    #[inline]
    fn reserve(&mut self, additional: usize) {
        Vec::reserve(self, additional);
    }

    #[inline]
    fn push(&mut self, value: T) -> HvResult<()> {
        Vec::push(self, value);
        Ok(())
    }
}

impl<A: smallvec::Array> Sink<A::Item> for SmallVec<A> {
    #[inline]
    fn reserve(&mut self, additional: usize) {
        SmallVec::reserve(self, additional);
    }

    #[inline]
    fn push(&mut self, value: A::Item) -> HvResult<()> {
        SmallVec::push(self, value);
        Ok(())
    }
}

/// Caller-supplied fixed buffer. Refuses to write past its end.
#[derive(Debug)]
pub struct SliceSink<'a, T> {
    buf: &'a mut [T],
    filled: usize,
}

impl<'a, T> SliceSink<'a, T> {
    #[inline]
    pub fn new(buf: &'a mut [T]) -> Self {
        Self { buf, filled: 0 }
    }

    /// Number of elements written so far.
    #[inline]
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// The written prefix of the buffer.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.buf[..self.filled]
    }
}

impl<T> Sink<T> for SliceSink<'_, T> {
    #[inline]
    fn push(&mut self, value: T) -> HvResult<()> {
        let capacity = self.buf.len();
        let slot = self
            .buf
            .get_mut(self.filled)
            .ok_or(HvError::SinkFull { capacity })?;
        *slot = value;
        self.filled += 1;
        Ok(())
    }
}

/// Natural number of elements to materialize for a tree of logical length `length`.
#[inline]
pub fn resolve_len(length: Length) -> HvResult<usize> {
    length.finite().ok_or(HvError::UnboundedLength)
}

/// Pull exactly `len` items from `cursor` into `sink`.
pub(crate) fn drain_into<I, S>(mut cursor: I, ty: ElementType, len: usize, sink: &mut S) -> HvResult<usize>
where
    I: Iterator,
    S: Sink<I::Item>,
{
    debug!("Materializing {len} {ty} elements");
    sink.reserve(len);

    let mut produced = 0;
    while produced < len {
        let Some(value) = cursor.next() else {
            warn!("Expression ended after {produced} of {len} requested {ty} elements");
            return Err(HvError::Exhausted {
                requested: len,
                produced,
            });
        };
        sink.push(value)?;
        produced += 1;
    }

    debug!("Materialized {produced} {ty} elements");
    Ok(produced)
}

/// Write exactly `len` elements of `expr` into `sink`, returning the count written.
///
/// A scalar-only tree broadcasts to `len`; a finite tree shorter than `len` fails with
/// [`HvError::Exhausted`].
pub fn materialize_into<E, S>(expr: &E, len: usize, sink: &mut S) -> HvResult<usize>
where
    E: VecExpr,
    S: Sink<E::Elem>,
{
    drain_into(expr.cursor(), expr.element_type(), len, sink)
}

/// Materialize the natural length of `expr`.
pub fn materialize<E: VecExpr>(expr: &E) -> HvResult<Vec<E::Elem>> {
    let len = resolve_len(expr.length())?;
    materialize_len(expr, len)
}

/// Materialize exactly `len` elements of `expr`.
pub fn materialize_len<E: VecExpr>(expr: &E, len: usize) -> HvResult<Vec<E::Elem>> {
    let mut out = Vec::with_capacity(len);
    materialize_into(expr, len, &mut out)?;
    Ok(out)
}

/// `true` as soon as one element of `expr` is missing.
///
/// Stops pulling at the first missing element. A scalar-only tree is inspected once.
pub fn any_na<E: VecExpr>(expr: &E) -> bool {
    let limit = expr.length().finite().unwrap_or(1);
    match expr.cursor().take(limit).position(<E::Elem as Element>::is_na) {
        Some(index) => {
            trace!("Found missing element at index {index}, stopping early");
            true
        }
        None => false,
    }
}

/// Number of missing elements over the natural length of `expr`.
pub fn count_na<E: VecExpr>(expr: &E) -> HvResult<usize> {
    let len = resolve_len(expr.length())?;
    Ok(expr.cursor().take(len).filter(|x| x.is_na()).count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_sink_stops_at_capacity() {
        let mut buf = [0i32; 2];
        let mut sink = SliceSink::new(&mut buf);
        sink.push(1).unwrap();
        sink.push(2).unwrap();
        assert_eq!(sink.push(3), Err(HvError::SinkFull { capacity: 2 }));
        assert_eq!(sink.filled(), 2);
        assert_eq!(sink.as_slice(), &[1, 2]);
    }

    #[test]
    fn slice_sink_rejects_empty_buffer() {
        let mut buf: [f64; 0] = [];
        let mut sink = SliceSink::new(&mut buf);
        assert_eq!(sink.push(1.0), Err(HvError::SinkFull { capacity: 0 }));
        assert_eq!(sink.filled(), 0);
    }

    #[test]
    fn drain_reports_short_cursor() {
        let mut out: Vec<i32> = Vec::new();
        let err = drain_into([1, 2].into_iter(), ElementType::Integer, 3, &mut out).unwrap_err();
        assert_eq!(
            err,
            HvError::Exhausted {
                requested: 3,
                produced: 2
            }
        );
        assert_eq!(out, vec![1, 2]);
    }

    #[test]
    fn unbounded_length_needs_explicit_len() {
        assert_eq!(resolve_len(Length::Unbounded), Err(HvError::UnboundedLength));
        assert_eq!(resolve_len(Length::Finite(4)), Ok(4));
    }
}
