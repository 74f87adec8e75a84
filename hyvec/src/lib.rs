//! Hyvec: lazy, missing-value aware arithmetic over integer and real vectors.
//!
//! Expressions such as `a + b * 2` are recorded as trees instead of being evaluated
//! eagerly. Materializing a tree walks all of its operands in lock-step and computes each
//! output element exactly once, without allocating intermediate vectors.
//!
//! Element model
//!  - Two element types exist, [`ElementType::Integer`] (`i32`) and [`ElementType::Real`]
//!    (`f64`). Each reserves one bit pattern as its missing-value ("NA") sentinel.
//!  - Combining two operands widens both to the widest of their types. The widening table
//!    is resolved at compile time for typed trees and at node construction for
//!    runtime-typed ones.
//!  - An operator never computes on a missing operand: it yields the sentinel of its own
//!    result type instead.
//!
//! Trees
//!  - Typed trees ([`expr::defs`]) are monomorphised; a whole tree becomes one fused loop.
//!  - Runtime-typed trees ([`expr::dynamic::DynExpr`]) serve operands whose type is only
//!    known at run time.
//!
//! Example
//! ```
//! use hyvec::prelude::*;
//!
//! let a = vec![1, 2, 3, 4];
//! let b = vec![0.5, NA_REAL, 1.5, 2.0];
//!
//! // integer * integer stays integer, then widens to real when adding `b`
//! let e = leaf(&a) * 2 + leaf(&b);
//! assert_eq!(e.element_type(), ElementType::Real);
//! assert_eq!(e.length(), Length::Finite(4));
//!
//! let out = e.materialize().unwrap();
//! assert_eq!(out[0], 2.5);
//! assert!(is_na(out[1]));
//! assert_eq!(&out[2..], &[7.5, 10.0]);
//! assert!(e.any_na());
//! ```

/// Element types, the sealed element trait and arithmetic kernels.
pub mod element;
/// Error type shared by every fallible operation.
pub mod error;
/// Lazy expression trees: typed builders, runtime-typed trees, views and printing.
pub mod expr;
/// Draining expressions into output buffers.
pub mod materialize;
/// Missing-value sentinels and helpers.
pub mod na;
/// Operands that leaves read from.
pub mod source;
/// Runtime-typed single values.
pub mod value;
/// Widest-type resolution table.
pub mod widest;

pub mod prelude {
    //! Convenient re-exports for end users.
    //!
    //! - `VecExpr` trait with builder helpers and `ExprShape` for inspection
    //! - Concrete nodes from `defs::*` and free-function builders from `func::*`
    //! - Runtime-typed trees and host buffers
    //! - Missing-value sentinels and helpers
    pub use crate::element::{Element, ElementType, INTSXP, REALSXP};
    pub use crate::error::{HvError, HvResult};
    pub use crate::expr::{
        IntoVecExpr, VecExpr,
        defs::*,
        dynamic::{DynExpr, HostSlice, HostVector},
        func::*,
        ops::{BinaryOpKind, UnaryOpKind},
        view::{ExprShape, NodeKind, NodeView},
    };
    pub use crate::materialize::{Sink, SliceSink, count_na, materialize_into, materialize_len};
    pub use crate::na::{NA_INTEGER, NA_REAL, either_na, is_na};
    pub use crate::source::{Length, Source};
    pub use crate::value::Value;
}
