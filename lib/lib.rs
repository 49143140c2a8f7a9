//! A relational numeric abstract interpretation domain.
//!
//! This crate implements the octagon abstract domain for a configurable
//! program-analysis framework: it over-approximates the reachable value
//! combinations of scalar program variables as conjunctions of `±x ±y ≤ c`
//! constraints. The pieces fit together as follows:
//!
//! * [`il`] — the consumed program representation: scope-qualified
//!   [`il::Variable`], typed [`il::Expression`] trees, and the
//!   [`il::Edge`] enumeration handed over by the control-flow layer.
//! * [`numeric`] and [`interval`] — tagged arbitrary-precision numbers and
//!   the interval algebra the rest of the domain is built on.
//! * [`namespace`] — the insertion-ordered bijection between variables and
//!   dense constraint-store indices.
//! * [`coefficients`] — affine expressions over tracked variables, the
//!   vocabulary passed to the constraint-store kernel.
//! * [`kernel`] — the opaque constraint-store boundary, plus a
//!   self-contained reference store.
//! * [`state`] — the abstract state: one namespace, one store handle.
//! * [`transfer`], [`merge`], [`stop`] — the transfer relation and the
//!   pluggable lattice-consolidation policies.
//! * [`analysis`] — the façade bundling the four operations the hosting
//!   framework consumes.
//!
//! The outer fixpoint driver, the control-flow construction and any report
//! formats live outside this crate.

pub mod analysis;
pub mod coefficients;
pub mod il;
pub mod interval;
pub mod kernel;
pub mod merge;
pub mod namespace;
pub mod numeric;
pub mod state;
pub mod stop;
pub mod transfer;

#[cfg(test)]
mod tests;

/// Error type for the octagon domain.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Division by an exact zero. A zero-straddling divisor interval is
    /// recovered as a universal coefficient vector instead; only the exact
    /// point zero is fatal.
    #[error("division by zero")]
    DivisionByZero,
    /// An edge or guard this domain has no sound handling for. Guards are
    /// never approximated as no-ops, so this propagates to the driver as a
    /// hard failure.
    #[error("unhandled transfer: {0}")]
    UnhandledTransfer(String),
    /// A coefficient-vector multiplication or division with no
    /// single-valued operand. Callers fall back to `forget` before issuing
    /// such an operation.
    #[error("illegal coefficient operation: {0}")]
    IllegalCoefficients(&'static str),
    /// An assignment to a variable the namespace does not track.
    #[error("variable is not tracked: {0}")]
    UntrackedVariable(String),
}

pub use crate::analysis::OctagonAnalysis;
pub use crate::coefficients::CoefficientVector;
pub use crate::interval::{Bound, Interval};
pub use crate::kernel::{BoundsStore, ConstraintStore};
pub use crate::merge::{MergeOperator, WideningHint};
pub use crate::namespace::VariableNamespace;
pub use crate::numeric::NumericValue;
pub use crate::state::AbstractState;
pub use crate::stop::StopOperator;
pub use crate::transfer::TransferRelation;
