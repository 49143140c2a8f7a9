//! Whole-domain scenarios driving declarations, assignments, guards and
//! calls through the transfer relation the way an outer driver would.

mod scenarios;

use crate::il::{var, Edge, Expression};
use crate::kernel::BoundsStore;
use crate::state::AbstractState;
use crate::transfer::TransferRelation;

/// Run `state` through `edges`, failing the test on any unhandled edge.
pub fn run(
    state: AbstractState<BoundsStore>,
    edges: &[Edge],
) -> AbstractState<BoundsStore> {
    let transfer = TransferRelation::new();
    edges.iter().fold(state, |state, edge| {
        transfer
            .successor(&state, edge)
            .unwrap_or_else(|error| panic!("transfer across \"{}\" failed: {}", edge, error))
    })
}

pub fn declare(name: &str, scope: &str) -> Edge {
    Edge::Declaration {
        variable: var(name, scope),
    }
}

pub fn assign(name: &str, scope: &str, rhs: Expression) -> Edge {
    Edge::Assignment {
        lhs: var(name, scope),
        rhs,
    }
}

pub fn assume(condition: Expression, truth: bool) -> Edge {
    Edge::Assume { condition, truth }
}

pub fn call(callee: &str, formals: &[&str], actuals: Vec<Expression>) -> Edge {
    Edge::Call {
        callee: callee.to_string(),
        formals: formals.iter().map(|name| name.to_string()).collect(),
        actuals,
    }
}

pub fn return_edge(callee: &str, result: Option<Expression>) -> Edge {
    Edge::Return {
        callee: callee.to_string(),
        result,
    }
}

pub fn return_to_call_site(lhs: Option<(&str, &str)>, callee: &str) -> Edge {
    Edge::ReturnToCallSite {
        lhs: lhs.map(|(name, scope)| var(name, scope)),
        callee: callee.to_string(),
    }
}
