//! The analysis-operator protocol exposed to the hosting framework.
//!
//! The host drives exploration itself: it holds the reached-state sets,
//! iterates the worklist and decides when to widen. What it consumes from
//! this crate are four independently swappable operations — domain access
//! (initial/bottom/top states plus the partial order on
//! [`AbstractState`]), the transfer relation, the merge operator and the
//! stop operator — bundled here behind one constructor.

use crate::il::Edge;
use crate::kernel::ConstraintStore;
use crate::merge::{MergeOperator, WideningHint};
use crate::state::AbstractState;
use crate::stop::StopOperator;
use crate::transfer::TransferRelation;
use crate::Error;

/// The configured octagon analysis: one transfer relation plus the chosen
/// merge and stop policies.
#[derive(Clone, Copy, Debug)]
pub struct OctagonAnalysis {
    transfer: TransferRelation,
    merge: MergeOperator,
    stop: StopOperator,
}

impl OctagonAnalysis {
    pub fn new(merge: MergeOperator, stop: StopOperator) -> OctagonAnalysis {
        OctagonAnalysis {
            transfer: TransferRelation::new(),
            merge,
            stop,
        }
    }

    /// The state analysis starts from: no variables, feasible.
    pub fn initial_state<S: ConstraintStore>(&self) -> AbstractState<S> {
        AbstractState::new()
    }

    pub fn transfer_relation(&self) -> &TransferRelation {
        &self.transfer
    }

    pub fn merge_operator(&self) -> MergeOperator {
        self.merge
    }

    pub fn stop_operator(&self) -> StopOperator {
        self.stop
    }

    /// The successor of `state` across `edge`.
    pub fn successor<S: ConstraintStore>(
        &self,
        state: &AbstractState<S>,
        edge: &Edge,
    ) -> Result<AbstractState<S>, Error> {
        self.transfer.successor(state, edge)
    }

    /// Consolidate a successor with a previously reached state.
    pub fn merge<S: ConstraintStore>(
        &self,
        reached: &AbstractState<S>,
        successor: &AbstractState<S>,
        hint: WideningHint,
    ) -> AbstractState<S> {
        self.merge.merge(reached, successor, hint)
    }

    /// Whether exploration from `candidate` can be pruned.
    pub fn stop<S: ConstraintStore>(
        &self,
        candidate: &AbstractState<S>,
        reached: &[AbstractState<S>],
    ) -> bool {
        self.stop.stop(candidate, reached)
    }
}

impl Default for OctagonAnalysis {
    fn default() -> OctagonAnalysis {
        OctagonAnalysis::new(MergeOperator::Separate, StopOperator::Separate)
    }
}
