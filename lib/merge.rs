//! Lattice consolidation of states reaching the same location.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::kernel::ConstraintStore;
use crate::state::AbstractState;

/// Whether a joining merge should widen right now.
///
/// The hint is threaded explicitly into every merge call by the scheduling
/// policy — typically set once when a loop head has been revisited often
/// enough — rather than living in shared mutable state. One hint governs
/// exactly one merge.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum WideningHint {
    /// Apply the widening operator; guarantees termination of ascending
    /// chains.
    Widen,
    /// Take the precise union; no termination guarantee by itself.
    Precise,
}

/// The pluggable merge policy.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum MergeOperator {
    /// Never combine: the successor stands alone next to the reached
    /// state. Maximal precision, no termination guarantee by itself.
    Separate,
    /// Combine the successor with the reached state, widening when the
    /// hint says so.
    Join,
}

impl MergeOperator {
    /// Consolidate `successor` (the newer state) with `reached` (the state
    /// already in the reached set). Both inputs must have equal dimension;
    /// a mismatch is an internal-consistency fault, not recoverable input.
    pub fn merge<S: ConstraintStore>(
        &self,
        reached: &AbstractState<S>,
        successor: &AbstractState<S>,
        hint: WideningHint,
    ) -> AbstractState<S> {
        match self {
            MergeOperator::Separate => successor.clone(),
            MergeOperator::Join => {
                assert_eq!(
                    reached.dimension(),
                    successor.dimension(),
                    "merging abstract states of differing dimension"
                );
                match hint {
                    WideningHint::Widen => {
                        trace!("widening {} onto {}", successor, reached);
                        successor.widen(reached)
                    }
                    WideningHint::Precise => successor.union(reached),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::CoefficientVector;
    use crate::il::var;
    use crate::interval::{Bound, Interval};
    use crate::kernel::BoundsStore;
    use crate::numeric::NumericValue;

    fn pinned(value: i64) -> AbstractState<BoundsStore> {
        let mut state = AbstractState::new();
        state.add_variable(var("x", "main"));
        state.assign(0, &CoefficientVector::constant(1, NumericValue::from(value)));
        state
    }

    #[test]
    fn separate_returns_the_successor_unchanged() {
        let reached = pinned(1);
        let successor = pinned(2);
        let merged = MergeOperator::Separate.merge(&reached, &successor, WideningHint::Precise);
        assert_eq!(merged, successor);
    }

    #[test]
    fn separate_merge_is_idempotent() {
        let state = pinned(5);
        assert_eq!(
            MergeOperator::Separate.merge(&state, &state, WideningHint::Precise),
            state
        );
    }

    #[test]
    fn join_unions_precisely() {
        let merged = MergeOperator::Join.merge(&pinned(1), &pinned(4), WideningHint::Precise);
        assert_eq!(
            merged.bounds_of(&var("x", "main")),
            Some(Interval::new(
                Bound::Finite(NumericValue::from(1)),
                Bound::Finite(NumericValue::from(4))
            ))
        );
    }

    #[test]
    fn join_widens_on_hint() {
        let merged = MergeOperator::Join.merge(&pinned(1), &pinned(4), WideningHint::Widen);
        assert_eq!(
            merged.bounds_of(&var("x", "main")),
            Some(Interval::new(
                Bound::Finite(NumericValue::from(1)),
                Bound::PositiveInfinite
            ))
        );
    }
}
