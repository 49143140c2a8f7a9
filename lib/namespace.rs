//! The bijection between tracked variables and constraint-store indices.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::il::Variable;

/// An insertion-ordered bijection from scope-qualified variables to dense
/// indices in `[0, size)`.
///
/// Every namespace edit must be paired, in the same operation, with the
/// matching dimension edit on the constraint-store handle that shares its
/// indexing — otherwise indices alias. [`crate::state::AbstractState`]
/// performs that pairing; the namespace itself only maintains the
/// bijection.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct VariableNamespace {
    ordered: Vec<Variable>,
    indices: FxHashMap<Variable, usize>,
}

impl VariableNamespace {
    pub fn new() -> VariableNamespace {
        VariableNamespace::default()
    }

    pub fn size(&self) -> usize {
        self.ordered.len()
    }

    pub fn contains(&self, variable: &Variable) -> bool {
        self.indices.contains_key(variable)
    }

    /// Append a variable at index `size`, returning that index.
    pub fn add(&mut self, variable: Variable) -> usize {
        assert!(
            !self.contains(&variable),
            "variable {} is already tracked",
            variable
        );
        let index = self.ordered.len();
        self.indices.insert(variable.clone(), index);
        self.ordered.push(variable);
        index
    }

    pub fn index_of(&self, variable: &Variable) -> Option<usize> {
        self.indices.get(variable).copied()
    }

    pub fn variable_at(&self, index: usize) -> Option<&Variable> {
        self.ordered.get(index)
    }

    pub fn variables(&self) -> &[Variable] {
        &self.ordered
    }

    /// Remove one variable, shifting every later index down by one.
    /// Returns the position the variable occupied.
    pub fn remove(&mut self, variable: &Variable) -> Option<usize> {
        let position = self.indices.remove(variable)?;
        self.ordered.remove(position);
        for shifted in &self.ordered[position..] {
            if let Some(index) = self.indices.get_mut(shifted) {
                *index -= 1;
            }
        }
        Some(position)
    }

    /// Remove every variable of a scope, returning how many were removed.
    /// Used on function return, where the departing scope occupies the
    /// trailing index block.
    pub fn remove_all_of_scope(&mut self, scope: &str) -> usize {
        let before = self.ordered.len();
        self.ordered.retain(|variable| variable.scope() != scope);
        self.indices.clear();
        for (index, variable) in self.ordered.iter().enumerate() {
            self.indices.insert(variable.clone(), index);
        }
        before - self.ordered.len()
    }
}

impl fmt::Display for VariableNamespace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (index, variable) in self.ordered.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}↦{}", variable, index)?;
        }
        write!(f, "}}")
    }
}
