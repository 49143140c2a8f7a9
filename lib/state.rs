//! The abstract state: one variable namespace, one constraint-store handle.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::coefficients::CoefficientVector;
use crate::il::Variable;
use crate::interval::Interval;
use crate::kernel::ConstraintStore;
use crate::namespace::VariableNamespace;

/// One element of the octagon domain.
///
/// An abstract state owns exactly one opaque constraint-store handle plus
/// the namespace mapping tracked variables onto the store's indices; the
/// namespace size always matches the store's tracked-variable count. States
/// start empty (dimension 0) at analysis entry and are edited only on
/// clones — the transfer relation clones the predecessor, edits the clone
/// and hands it back, so a caller observes a state fully-before or
/// fully-after an edit, never in between.
///
/// Equality is semantic, not structural: two states are equal when their
/// namespaces match and each store includes the other. The domain's partial
/// order is the same inclusion, exposed through `PartialOrd`
/// (`None` for incomparable states).
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AbstractState<S> {
    namespace: VariableNamespace,
    store: S,
}

impl<S: ConstraintStore> AbstractState<S> {
    /// The initial state: no variables, feasible.
    pub fn new() -> AbstractState<S> {
        AbstractState {
            namespace: VariableNamespace::new(),
            store: S::universe(0),
        }
    }

    pub fn namespace(&self) -> &VariableNamespace {
        &self.namespace
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The number of tracked variables.
    pub fn size(&self) -> usize {
        self.namespace.size()
    }

    /// The constraint-matrix dimension of the underlying store.
    pub fn dimension(&self) -> usize {
        self.store.dimension()
    }

    /// Replace both fields at once. A state is never partially updated.
    pub fn update(&mut self, other: AbstractState<S>) {
        *self = other;
    }

    /// True when this state describes an infeasible program point.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The infeasible state over the same namespace.
    pub fn bottom(&self) -> AbstractState<S> {
        AbstractState {
            namespace: self.namespace.clone(),
            store: S::empty(self.namespace.size()),
        }
    }

    /// The unconstrained state over the same namespace.
    pub fn top(&self) -> AbstractState<S> {
        AbstractState {
            namespace: self.namespace.clone(),
            store: S::universe(self.namespace.size()),
        }
    }

    pub fn contains(&self, variable: &Variable) -> bool {
        self.namespace.contains(variable)
    }

    pub fn index_of(&self, variable: &Variable) -> Option<usize> {
        self.namespace.index_of(variable)
    }

    /// Track a new variable: namespace append and store dimension grow,
    /// paired in one operation.
    pub fn add_variable(&mut self, variable: Variable) -> usize {
        let index = self.namespace.add(variable);
        self.store = self.store.add_dimension(1);
        debug_assert_eq!(self.namespace.size(), self.store.size());
        index
    }

    /// Stop tracking one variable: namespace removal and store dimension
    /// drop, paired in one operation. The kernel only releases trailing
    /// positions, so the variable must currently hold the highest index.
    pub fn remove_variable(&mut self, variable: &Variable) -> Option<usize> {
        let position = self.namespace.remove(variable)?;
        assert_eq!(
            position,
            self.namespace.size(),
            "removed variable {} was not at the trailing position",
            variable
        );
        self.store = self.store.remove_dimension(1);
        debug_assert_eq!(self.namespace.size(), self.store.size());
        Some(position)
    }

    /// Drop every variable of `scope`, returning how many were dropped.
    /// The departing scope must occupy the trailing index block — calls
    /// nest, so a returning callee's variables always do.
    pub fn remove_all_variables_of_scope(&mut self, scope: &str) -> usize {
        debug_assert!({
            let variables = self.namespace.variables();
            let count = variables
                .iter()
                .filter(|variable| variable.scope() == scope)
                .count();
            variables[variables.len() - count..]
                .iter()
                .all(|variable| variable.scope() == scope)
        });
        let removed = self.namespace.remove_all_of_scope(scope);
        self.store = self.store.remove_dimension(removed);
        debug_assert_eq!(self.namespace.size(), self.store.size());
        removed
    }

    pub fn assign(&mut self, index: usize, vector: &CoefficientVector) {
        self.store = self.store.assign(index, vector);
    }

    pub fn forget(&mut self, index: usize) {
        self.store = self.store.forget(index);
    }

    pub fn add_constraint(&mut self, vector: &CoefficientVector) {
        self.store = self.store.add_constraint(vector);
    }

    pub fn variable_bounds(&self, index: usize) -> Interval {
        self.store.variable_bounds(index)
    }

    /// The current bounds of a tracked variable, by key.
    pub fn bounds_of(&self, variable: &Variable) -> Option<Interval> {
        self.index_of(variable)
            .map(|index| self.variable_bounds(index))
    }

    /// True when every valuation of `other` is also one of `self`.
    pub fn includes(&self, other: &AbstractState<S>) -> bool {
        self.namespace == other.namespace && self.store.includes(&other.store)
    }

    /// The smallest state containing both operands. Both must track the
    /// same namespace.
    pub fn union(&self, other: &AbstractState<S>) -> AbstractState<S> {
        assert_eq!(
            self.namespace, other.namespace,
            "uniting abstract states over differing namespaces"
        );
        AbstractState {
            namespace: self.namespace.clone(),
            store: self.store.union(&other.store),
        }
    }

    /// Widen, with `self` the newer state.
    pub fn widen(&self, older: &AbstractState<S>) -> AbstractState<S> {
        assert_eq!(
            self.namespace, older.namespace,
            "widening abstract states over differing namespaces"
        );
        AbstractState {
            namespace: self.namespace.clone(),
            store: self.store.widen(&older.store),
        }
    }
}

impl<S: ConstraintStore> Default for AbstractState<S> {
    fn default() -> AbstractState<S> {
        AbstractState::new()
    }
}

impl<S: ConstraintStore> PartialEq for AbstractState<S> {
    fn eq(&self, other: &AbstractState<S>) -> bool {
        self.includes(other) && other.includes(self)
    }
}

impl<S: ConstraintStore> Eq for AbstractState<S> {}

impl<S: ConstraintStore> PartialOrd for AbstractState<S> {
    fn partial_cmp(&self, other: &AbstractState<S>) -> Option<Ordering> {
        if self.namespace != *other.namespace() {
            return None;
        }
        let forward = self.store.includes(&other.store);
        let backward = other.store.includes(&self.store);
        match (forward, backward) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Greater),
            (false, true) => Some(Ordering::Less),
            (false, false) => None,
        }
    }
}

impl<S: ConstraintStore> fmt::Display for AbstractState<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "⊥");
        }
        write!(f, "⟨")?;
        for (index, variable) in self.namespace.variables().iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}∈{}", variable, self.variable_bounds(index))?;
        }
        write!(f, "⟩")
    }
}
