//! Typed control-flow edges.
//!
//! Edges arrive from the control-flow layer fully typed; no parsing happens
//! in this crate. The transfer relation dispatches on the edge kind and
//! never mutates the edge.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::il::{Expression, Variable};

/// A control-flow edge between two program locations.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Edge {
    /// A variable enters its scope.
    Declaration { variable: Variable },
    /// A strong update of one variable.
    Assignment { lhs: Variable, rhs: Expression },
    /// A branch guard, entered when `condition` evaluates to `truth`.
    Assume { condition: Expression, truth: bool },
    /// A call site: formals live in the callee's scope, actuals are
    /// evaluated in the caller's.
    Call {
        callee: String,
        formals: Vec<String>,
        actuals: Vec<Expression>,
    },
    /// A `return` statement inside `callee`.
    Return {
        callee: String,
        result: Option<Expression>,
    },
    /// The edge back into the caller after `callee` has returned.
    ReturnToCallSite {
        lhs: Option<Variable>,
        callee: String,
    },
    /// A no-op edge.
    Skip,
    /// An inter-procedural summary placeholder; treated as a no-op.
    Summary { callee: String },
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Edge::Declaration { variable } => write!(f, "declare {}", variable),
            Edge::Assignment { lhs, rhs } => write!(f, "{} = {}", lhs, rhs),
            Edge::Assume { condition, truth } => {
                if *truth {
                    write!(f, "assume {}", condition)
                } else {
                    write!(f, "assume !{}", condition)
                }
            }
            Edge::Call { callee, actuals, .. } => {
                write!(f, "call {}/{}", callee, actuals.len())
            }
            Edge::Return { callee, result } => match result {
                Some(expression) => write!(f, "return {} from {}", expression, callee),
                None => write!(f, "return from {}", callee),
            },
            Edge::ReturnToCallSite { lhs, callee } => match lhs {
                Some(lhs) => write!(f, "{} = result of {}", lhs, callee),
                None => write!(f, "drop result of {}", callee),
            },
            Edge::Skip => write!(f, "skip"),
            Edge::Summary { callee } => write!(f, "summary of {}", callee),
        }
    }
}
