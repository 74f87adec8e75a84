use thiserror::Error;

use crate::element::ElementType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HvError {
    #[error("Cannot materialize an expression of unbounded length without an explicit length")]
    UnboundedLength,

    #[error("Expression ended after {produced} elements, {requested} were requested")]
    Exhausted { requested: usize, produced: usize },

    #[error("Output buffer is full (capacity {capacity})")]
    SinkFull { capacity: usize },

    #[error("Element type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: ElementType,
        found: ElementType,
    },
}

pub type HvResult<T> = Result<T, HvError>;
