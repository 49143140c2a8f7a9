//! Pruning of already-covered exploration candidates.

use crate::kernel::ConstraintStore;
use crate::state::AbstractState;
use serde::{Deserialize, Serialize};

/// The pluggable stop policy: decides whether exploration from a candidate
/// state can be pruned because the reached set already covers it.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum StopOperator {
    /// A candidate is subsumed iff it is included in at least one member
    /// of the reached set at its location.
    Separate,
    /// Incomplete: always reports the candidate as not subsumed, so the
    /// driver keeps exploring.
    // TODO: decide whether this should delegate to the inclusion test the
    // way Separate does, or stay a pure always-continue policy.
    Join,
}

impl StopOperator {
    pub fn stop<S: ConstraintStore>(
        &self,
        candidate: &AbstractState<S>,
        reached: &[AbstractState<S>],
    ) -> bool {
        match self {
            StopOperator::Separate => reached.iter().any(|state| state.includes(candidate)),
            StopOperator::Join => false,
        }
    }
}
