//! Scope-qualified scalar program variables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar program variable, qualified by the scope that owns it.
///
/// Equality requires an exact match of both name and scope; the same name
/// in two scopes names two unrelated variables.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Variable {
    name: String,
    scope: String,
}

impl Variable {
    pub fn new<N, S>(name: N, scope: S) -> Variable
    where
        N: Into<String>,
        S: Into<String>,
    {
        Variable {
            name: name.into(),
            scope: scope.into(),
        }
    }

    /// The reserved pseudo-variable a function's return value binds to.
    ///
    /// It lives in the callee's scope and is pruned together with the
    /// formals when the call returns.
    pub fn function_return<S>(callee: S) -> Variable
    where
        S: Into<String>,
    {
        let callee = callee.into();
        Variable {
            name: format!("{}#return", callee),
            scope: callee,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}::{}", self.scope, self.name)
    }
}
