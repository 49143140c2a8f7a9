//! A self-contained reference constraint store.
//!
//! `BoundsStore` keeps one interval per tracked variable and refines it by
//! propagating affine constraints: for `Σ aᵢ·xᵢ + c ≤ 0` and a variable
//! with a known point coefficient, the residual of the remaining terms
//! bounds that variable from one side. This is sound for every operation
//! of the [`ConstraintStore`] contract and precise enough for tests and
//! small analyses; it does not retain relations between variables the way
//! a closed octagon matrix does.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::coefficients::CoefficientVector;
use crate::interval::{Bound, Interval};
use crate::kernel::ConstraintStore;
use crate::numeric::NumericValue;

/// One interval per tracked variable; `None` marks the infeasible store.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BoundsStore {
    variables: usize,
    bounds: Option<Vec<Interval>>,
}

impl BoundsStore {
    /// Evaluate an affine vector to the interval of its possible values
    /// under the current bounds.
    fn evaluate(&self, slots: &[Interval]) -> Interval {
        debug_assert_eq!(slots.len(), self.variables + 1);
        let bounds = self.bounds.as_ref().expect("evaluating a feasible store");
        let mut value = slots[self.variables].clone();
        for (slot, variable) in slots[..self.variables].iter().zip(bounds) {
            value = value.add(&slot.mul(variable));
        }
        value
    }

    /// One propagation pass over a constraint `Σ aᵢ·xᵢ + c ≤ 0`. Returns
    /// `None` when the constraint is unsatisfiable under the current
    /// bounds.
    fn propagate(mut bounds: Vec<Interval>, slots: &[Interval]) -> Option<Vec<Interval>> {
        let variables = bounds.len();
        debug_assert_eq!(slots.len(), variables + 1);

        // A constraint with no variable term is a plain feasibility test.
        let constrained: Vec<usize> = (0..variables)
            .filter(|&index| {
                !slots[index]
                    .as_point()
                    .map(NumericValue::is_zero)
                    .unwrap_or(false)
            })
            .collect();
        if constrained.is_empty() {
            let constant = &slots[variables];
            if constant.lower().compare(&Bound::Finite(NumericValue::zero()))
                == Ordering::Greater
            {
                return None;
            }
            return Some(bounds);
        }

        for &index in &constrained {
            // Only a point coefficient admits a sound division.
            let coefficient = match slots[index].as_point() {
                Some(value) => value.clone(),
                None => continue,
            };
            // residual = c + Σ_{i≠index} aᵢ·xᵢ, lower end only:
            // a·x ≤ -residual holds for the actual residual, so the
            // weakest sound deduction is a·x ≤ -inf(residual).
            let mut residual_lower = slots[variables].lower().clone();
            for (other, slot) in bounds.iter().enumerate() {
                if other == index {
                    continue;
                }
                residual_lower = residual_lower.add(slots[other].mul(slot).lower());
            }
            let limit = match residual_lower.neg() {
                Bound::PositiveInfinite => continue,
                finite => finite.div_value(&coefficient),
            };
            let half_line = if coefficient.is_positive() {
                Interval::new(Bound::NegativeInfinite, limit)
            } else {
                Interval::new(limit, Bound::PositiveInfinite)
            };
            match bounds[index].intersect(&half_line) {
                Some(refined) => bounds[index] = refined,
                None => return None,
            }
        }
        Some(bounds)
    }
}

impl ConstraintStore for BoundsStore {
    fn empty(variables: usize) -> BoundsStore {
        BoundsStore {
            variables,
            bounds: None,
        }
    }

    fn universe(variables: usize) -> BoundsStore {
        BoundsStore {
            variables,
            bounds: Some(vec![Interval::unbounded(); variables]),
        }
    }

    fn size(&self) -> usize {
        self.variables
    }

    fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    fn includes(&self, other: &BoundsStore) -> bool {
        debug_assert_eq!(self.variables, other.variables);
        match (&self.bounds, &other.bounds) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(ours), Some(theirs)) => ours
                .iter()
                .zip(theirs)
                .all(|(a, b)| a.includes(b)),
        }
    }

    fn add_dimension(&self, count: usize) -> BoundsStore {
        BoundsStore {
            variables: self.variables + count,
            bounds: self.bounds.as_ref().map(|bounds| {
                let mut grown = bounds.clone();
                grown.extend(std::iter::repeat(Interval::unbounded()).take(count));
                grown
            }),
        }
    }

    fn remove_dimension(&self, count: usize) -> BoundsStore {
        assert!(count <= self.variables);
        BoundsStore {
            variables: self.variables - count,
            bounds: self.bounds.as_ref().map(|bounds| {
                bounds[..self.variables - count].to_vec()
            }),
        }
    }

    fn add_constraint(&self, vector: &CoefficientVector) -> BoundsStore {
        let slots = match vector.interval_slots() {
            Some(slots) => slots,
            None => return self.clone(),
        };
        let bounds = match &self.bounds {
            Some(bounds) => bounds.clone(),
            None => return self.clone(),
        };
        BoundsStore {
            variables: self.variables,
            bounds: BoundsStore::propagate(bounds, &slots),
        }
    }

    fn assign(&self, index: usize, vector: &CoefficientVector) -> BoundsStore {
        debug_assert!(index < self.variables);
        if self.bounds.is_none() {
            return self.clone();
        }
        let value = match vector.interval_slots() {
            Some(slots) => self.evaluate(&slots),
            None => Interval::unbounded(),
        };
        let mut bounds = self.bounds.clone().expect("feasible store");
        bounds[index] = value;
        BoundsStore {
            variables: self.variables,
            bounds: Some(bounds),
        }
    }

    fn forget(&self, index: usize) -> BoundsStore {
        debug_assert!(index < self.variables);
        BoundsStore {
            variables: self.variables,
            bounds: self.bounds.as_ref().map(|bounds| {
                let mut bounds = bounds.clone();
                bounds[index] = Interval::unbounded();
                bounds
            }),
        }
    }

    fn union(&self, other: &BoundsStore) -> BoundsStore {
        debug_assert_eq!(self.variables, other.variables);
        let bounds = match (&self.bounds, &other.bounds) {
            (None, theirs) => theirs.clone(),
            (ours, None) => ours.clone(),
            (Some(ours), Some(theirs)) => {
                Some(ours.iter().zip(theirs).map(|(a, b)| a.join(b)).collect())
            }
        };
        BoundsStore {
            variables: self.variables,
            bounds,
        }
    }

    fn widen(&self, older: &BoundsStore) -> BoundsStore {
        debug_assert_eq!(self.variables, older.variables);
        let bounds = match (&self.bounds, &older.bounds) {
            (None, theirs) => theirs.clone(),
            (ours, None) => ours.clone(),
            (Some(newer), Some(older)) => Some(
                newer
                    .iter()
                    .zip(older)
                    .map(|(n, o)| n.widen(o))
                    .collect(),
            ),
        };
        BoundsStore {
            variables: self.variables,
            bounds,
        }
    }

    fn variable_bounds(&self, index: usize) -> Interval {
        debug_assert!(index < self.variables);
        match &self.bounds {
            Some(bounds) => bounds[index].clone(),
            None => Interval::unbounded(),
        }
    }
}

impl fmt::Display for BoundsStore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.bounds {
            None => write!(f, "⊥:{}", self.variables),
            Some(bounds) => {
                write!(f, "⟨")?;
                for (index, interval) in bounds.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "v{}∈{}", index, interval)?;
                }
                write!(f, "⟩")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(value: i64) -> NumericValue {
        NumericValue::from(value)
    }

    fn range(lower: i64, upper: i64) -> Interval {
        Interval::new(Bound::Finite(int(lower)), Bound::Finite(int(upper)))
    }

    /// x₀ - K ≤ 0, i.e. x₀ ≤ K.
    fn upper_constraint(size: usize, index: usize, k: i64) -> CoefficientVector {
        CoefficientVector::variable(size, index)
            .add(&CoefficientVector::constant(size, int(-k)))
    }

    /// -x₀ + K ≤ 0, i.e. x₀ ≥ K.
    fn lower_constraint(size: usize, index: usize, k: i64) -> CoefficientVector {
        CoefficientVector::scaled_variable(size, index, int(-1))
            .add(&CoefficientVector::constant(size, int(k)))
    }

    #[test]
    fn constraints_refine_bounds() {
        let store = BoundsStore::universe(1)
            .add_constraint(&upper_constraint(1, 0, 9))
            .add_constraint(&lower_constraint(1, 0, 1));
        assert_eq!(store.variable_bounds(0), range(1, 9));
        assert!(!store.is_empty());
    }

    #[test]
    fn contradictory_constraints_empty_the_store() {
        let store = BoundsStore::universe(1)
            .add_constraint(&upper_constraint(1, 0, 3))
            .add_constraint(&lower_constraint(1, 0, 5));
        assert!(store.is_empty());
    }

    #[test]
    fn pure_constant_constraints_are_feasibility_tests() {
        // 1 ≤ 0 is unsatisfiable
        let store = BoundsStore::universe(1)
            .add_constraint(&CoefficientVector::constant(1, int(1)));
        assert!(store.is_empty());
        // -1 ≤ 0 always holds
        let store = BoundsStore::universe(1)
            .add_constraint(&CoefficientVector::constant(1, int(-1)));
        assert!(!store.is_empty());
    }

    #[test]
    fn two_variable_constraints_propagate() {
        // x₀ ∈ [0, 5], then x₁ - x₀ ≤ 0 bounds x₁ from above
        let store = BoundsStore::universe(2)
            .add_constraint(&upper_constraint(2, 0, 5))
            .add_constraint(&lower_constraint(2, 0, 0));
        let difference = CoefficientVector::variable(2, 1)
            .add(&CoefficientVector::scaled_variable(2, 0, int(-1)));
        let store = store.add_constraint(&difference);
        assert_eq!(
            store.variable_bounds(1),
            Interval::new(Bound::NegativeInfinite, Bound::Finite(int(5)))
        );
    }

    #[test]
    fn assignment_is_a_strong_update() {
        let store = BoundsStore::universe(2)
            .add_constraint(&upper_constraint(2, 0, 4))
            .add_constraint(&lower_constraint(2, 0, 4));
        // x₁ = x₀ + 1
        let vector = CoefficientVector::variable(2, 0)
            .add(&CoefficientVector::constant(2, int(1)));
        let store = store.assign(1, &vector);
        assert_eq!(store.variable_bounds(1), range(5, 5));
        // overwrite: x₁ = 0
        let store = store.assign(1, &CoefficientVector::constant(2, int(0)));
        assert_eq!(store.variable_bounds(1), range(0, 0));
    }

    #[test]
    fn forget_drops_one_variable_only() {
        let store = BoundsStore::universe(2)
            .add_constraint(&upper_constraint(2, 0, 2))
            .add_constraint(&lower_constraint(2, 0, 2))
            .add_constraint(&upper_constraint(2, 1, 7));
        let store = store.forget(0);
        assert_eq!(store.variable_bounds(0), Interval::unbounded());
        assert_eq!(
            store.variable_bounds(1),
            Interval::new(Bound::NegativeInfinite, Bound::Finite(int(7)))
        );
        assert!(!store.is_empty());
    }

    #[test]
    fn union_is_the_pointwise_hull() {
        let a = BoundsStore::universe(1)
            .add_constraint(&upper_constraint(1, 0, 2))
            .add_constraint(&lower_constraint(1, 0, 0));
        let b = BoundsStore::universe(1)
            .add_constraint(&upper_constraint(1, 0, 9))
            .add_constraint(&lower_constraint(1, 0, 5));
        assert_eq!(a.union(&b).variable_bounds(0), range(0, 9));
        assert_eq!(BoundsStore::empty(1).union(&a).variable_bounds(0), range(0, 2));
    }

    #[test]
    fn widening_stabilizes_growing_bounds() {
        let older = BoundsStore::universe(1)
            .add_constraint(&upper_constraint(1, 0, 2))
            .add_constraint(&lower_constraint(1, 0, 0));
        let newer = BoundsStore::universe(1)
            .add_constraint(&upper_constraint(1, 0, 4))
            .add_constraint(&lower_constraint(1, 0, 0));
        let widened = newer.widen(&older);
        assert_eq!(
            widened.variable_bounds(0),
            Interval::new(Bound::Finite(int(0)), Bound::PositiveInfinite)
        );
        // a second round no longer grows
        assert_eq!(widened.widen(&widened), widened);
    }

    #[test]
    fn inclusion_orders_stores() {
        let narrow = BoundsStore::universe(1)
            .add_constraint(&upper_constraint(1, 0, 3))
            .add_constraint(&lower_constraint(1, 0, 1));
        let wide = BoundsStore::universe(1)
            .add_constraint(&upper_constraint(1, 0, 9))
            .add_constraint(&lower_constraint(1, 0, 0));
        assert!(wide.includes(&narrow));
        assert!(!narrow.includes(&wide));
        assert!(narrow.includes(&BoundsStore::empty(1)));
        assert!(!BoundsStore::empty(1).includes(&narrow));
    }

    #[test]
    fn dimension_reports_two_rows_per_variable() {
        let store = BoundsStore::universe(3);
        assert_eq!(store.size(), 3);
        assert_eq!(store.dimension(), 6);
        assert_eq!(store.add_dimension(2).dimension(), 10);
        assert_eq!(store.remove_dimension(1).size(), 2);
    }
}
