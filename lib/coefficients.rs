//! Affine expressions over tracked variables.
//!
//! A coefficient vector is the constraint vocabulary handed to the kernel:
//! `size + 1` slots, one coefficient per tracked variable followed by one
//! constant. The `Exact` shape holds point values, the `Interval` shape
//! holds a range per slot, and `Universal` is the absorbing "no derivable
//! information" sentinel.
//!
//! Addition and subtraction are free-standing, but multiplication and
//! division are state-aware: scaling by a single variable requires that
//! variable's current bounds from the owning abstract state.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::interval::Interval;
use crate::kernel::ConstraintStore;
use crate::numeric::NumericValue;
use crate::state::AbstractState;
use crate::Error;

/// An affine expression over the tracked variables of one abstract state.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CoefficientVector {
    /// One exact value per slot.
    Exact(Vec<NumericValue>),
    /// One range per slot, bounds possibly infinite.
    Interval(Vec<Interval>),
    /// No derivable information; absorbs every operation.
    Universal,
}

impl CoefficientVector {
    /// The constant `value`, over `size` tracked variables.
    pub fn constant(size: usize, value: NumericValue) -> CoefficientVector {
        let mut slots = vec![NumericValue::zero(); size + 1];
        slots[size] = value;
        CoefficientVector::Exact(slots)
    }

    /// The single variable at `index` with coefficient one.
    pub fn variable(size: usize, index: usize) -> CoefficientVector {
        CoefficientVector::scaled_variable(size, index, NumericValue::one())
    }

    /// The single variable at `index` with the given coefficient.
    pub fn scaled_variable(
        size: usize,
        index: usize,
        coefficient: NumericValue,
    ) -> CoefficientVector {
        debug_assert!(index < size);
        let mut slots = vec![NumericValue::zero(); size + 1];
        slots[index] = coefficient;
        CoefficientVector::Exact(slots)
    }

    /// The number of tracked variables this vector ranges over; `None` for
    /// the universal sentinel.
    pub fn size(&self) -> Option<usize> {
        match self {
            CoefficientVector::Exact(slots) => Some(slots.len() - 1),
            CoefficientVector::Interval(slots) => Some(slots.len() - 1),
            CoefficientVector::Universal => None,
        }
    }

    /// Grow to `size` variables by appending zero coefficients before the
    /// constant slot. Vectors never shrink.
    pub fn expand_to_size(self, size: usize) -> CoefficientVector {
        match self {
            CoefficientVector::Exact(mut slots) => {
                assert!(slots.len() <= size + 1);
                let constant = slots.pop().expect("vector has a constant slot");
                slots.resize(size, NumericValue::zero());
                slots.push(constant);
                CoefficientVector::Exact(slots)
            }
            CoefficientVector::Interval(mut slots) => {
                assert!(slots.len() <= size + 1);
                let constant = slots.pop().expect("vector has a constant slot");
                slots.resize(size, Interval::point(NumericValue::zero()));
                slots.push(constant);
                CoefficientVector::Interval(slots)
            }
            CoefficientVector::Universal => CoefficientVector::Universal,
        }
    }

    /// True when every per-variable coefficient is zero.
    pub fn has_only_constant_value(&self) -> bool {
        match self {
            CoefficientVector::Exact(slots) => {
                slots[..slots.len() - 1].iter().all(NumericValue::is_zero)
            }
            CoefficientVector::Interval(slots) => slots[..slots.len() - 1]
                .iter()
                .all(|slot| slot.as_point().map(NumericValue::is_zero).unwrap_or(false)),
            CoefficientVector::Universal => false,
        }
    }

    /// True when at most one slot, the constant included, is non-zero.
    /// The zero vector qualifies, so scaling by zero stays legal.
    pub fn has_only_one_value(&self) -> bool {
        match self {
            CoefficientVector::Exact(slots) => {
                slots.iter().filter(|slot| !slot.is_zero()).count() <= 1
            }
            CoefficientVector::Interval(slots) => {
                slots
                    .iter()
                    .filter(|slot| {
                        !slot.as_point().map(NumericValue::is_zero).unwrap_or(false)
                    })
                    .count()
                    <= 1
            }
            CoefficientVector::Universal => false,
        }
    }

    /// The index of the single non-zero variable slot. Defined only when
    /// [`has_only_one_value`](Self::has_only_one_value) holds and
    /// [`has_only_constant_value`](Self::has_only_constant_value) does not.
    pub fn variable_index(&self) -> Option<usize> {
        if !self.has_only_one_value() || self.has_only_constant_value() {
            return None;
        }
        match self {
            CoefficientVector::Exact(slots) => slots[..slots.len() - 1]
                .iter()
                .position(|slot| !slot.is_zero()),
            CoefficientVector::Interval(slots) => {
                slots[..slots.len() - 1].iter().position(|slot| {
                    !slot.as_point().map(NumericValue::is_zero).unwrap_or(false)
                })
            }
            CoefficientVector::Universal => None,
        }
    }

    /// Every slot lifted to an interval; `None` for the universal sentinel.
    pub fn interval_slots(&self) -> Option<Vec<Interval>> {
        match self {
            CoefficientVector::Exact(slots) => Some(
                slots
                    .iter()
                    .map(|slot| Interval::point(slot.clone()))
                    .collect(),
            ),
            CoefficientVector::Interval(slots) => Some(slots.clone()),
            CoefficientVector::Universal => None,
        }
    }

    /// Element-wise sum. Exact ⊕ Exact stays exact; an interval operand
    /// lifts the exact side to degenerate ranges; universal absorbs.
    /// Both operands must already range over the same size.
    pub fn add(&self, other: &CoefficientVector) -> CoefficientVector {
        match (self, other) {
            (CoefficientVector::Universal, _) | (_, CoefficientVector::Universal) => {
                CoefficientVector::Universal
            }
            (CoefficientVector::Exact(a), CoefficientVector::Exact(b)) => {
                assert_eq!(a.len(), b.len(), "adding vectors of differing size");
                CoefficientVector::Exact(
                    a.iter().zip(b).map(|(x, y)| x.add(y)).collect(),
                )
            }
            _ => {
                let a = self.interval_slots().expect("non-universal operand");
                let b = other.interval_slots().expect("non-universal operand");
                assert_eq!(a.len(), b.len(), "adding vectors of differing size");
                CoefficientVector::Interval(
                    a.iter().zip(&b).map(|(x, y)| x.add(y)).collect(),
                )
            }
        }
    }

    /// Element-wise difference, with the same shape rules as
    /// [`add`](Self::add).
    pub fn sub(&self, other: &CoefficientVector) -> CoefficientVector {
        self.add(&other.neg())
    }

    pub fn neg(&self) -> CoefficientVector {
        match self {
            CoefficientVector::Exact(slots) => {
                CoefficientVector::Exact(slots.iter().map(NumericValue::neg).collect())
            }
            CoefficientVector::Interval(slots) => {
                CoefficientVector::Interval(slots.iter().map(Interval::neg).collect())
            }
            CoefficientVector::Universal => CoefficientVector::Universal,
        }
    }

    /// Multiply two affine expressions. Legal in closed form only when one
    /// operand is single-valued: a bare constant scales the other side
    /// uniformly; a single variable is resolved to its current bounds in
    /// `state` and scales the other side as a range. An unbounded
    /// resolution loses all information and yields the universal sentinel.
    pub fn mul<S: ConstraintStore>(
        &self,
        other: &CoefficientVector,
        state: &AbstractState<S>,
    ) -> Result<CoefficientVector, Error> {
        if matches!(self, CoefficientVector::Universal)
            || matches!(other, CoefficientVector::Universal)
        {
            return Ok(CoefficientVector::Universal);
        }
        let (scaling, target) = if self.has_only_one_value() {
            (self, other)
        } else if other.has_only_one_value() {
            (other, self)
        } else {
            return Err(Error::IllegalCoefficients(
                "multiplication requires a single-valued operand",
            ));
        };
        match scaling.resolve_scale(state) {
            Scale::Value(value) => Ok(target.scale_exact(&value)),
            Scale::Range(range) => Ok(target.scale_interval(&range)),
            Scale::Unbounded => {
                debug!("multiplication by an unbounded variable loses all information");
                Ok(CoefficientVector::Universal)
            }
        }
    }

    /// Divide by a single-valued divisor. A zero-straddling divisor range
    /// is sound total loss (universal); the exact point zero is an
    /// arithmetic error.
    pub fn div<S: ConstraintStore>(
        &self,
        divisor: &CoefficientVector,
        state: &AbstractState<S>,
    ) -> Result<CoefficientVector, Error> {
        if matches!(self, CoefficientVector::Universal)
            || matches!(divisor, CoefficientVector::Universal)
        {
            return Ok(CoefficientVector::Universal);
        }
        if !divisor.has_only_one_value() {
            return Err(Error::IllegalCoefficients(
                "division requires a single-valued divisor",
            ));
        }
        match divisor.resolve_scale(state) {
            Scale::Value(value) => {
                if value.is_zero() {
                    return Err(Error::DivisionByZero);
                }
                Ok(match self {
                    CoefficientVector::Exact(slots) => CoefficientVector::Exact(
                        slots.iter().map(|slot| slot.div(&value)).collect(),
                    ),
                    _ => self.scale_interval(&Interval::point(value).recip()),
                })
            }
            Scale::Range(range) => {
                if range.as_point().map(NumericValue::is_zero).unwrap_or(false) {
                    return Err(Error::DivisionByZero);
                }
                if range.contains_zero() {
                    debug!("division by a zero-straddling range loses all information");
                    return Ok(CoefficientVector::Universal);
                }
                Ok(self.scale_interval(&range.recip()))
            }
            Scale::Unbounded => {
                debug!("division by an unbounded variable loses all information");
                Ok(CoefficientVector::Universal)
            }
        }
    }

    /// Resolve a single-valued vector to its scaling factor: the bare
    /// constant, or the single variable's coefficient times its current
    /// bounds.
    fn resolve_scale<S: ConstraintStore>(&self, state: &AbstractState<S>) -> Scale {
        if self.has_only_constant_value() {
            return match self {
                CoefficientVector::Exact(slots) => {
                    Scale::Value(slots[slots.len() - 1].clone())
                }
                CoefficientVector::Interval(slots) => {
                    let constant = &slots[slots.len() - 1];
                    match constant.as_point() {
                        Some(value) => Scale::Value(value.clone()),
                        None => Scale::Range(constant.clone()),
                    }
                }
                CoefficientVector::Universal => unreachable!("guarded by callers"),
            };
        }
        let index = self
            .variable_index()
            .expect("single-valued, non-constant vector has a variable slot");
        let bounds = state.variable_bounds(index);
        if bounds.has_infinite_endpoint() {
            return Scale::Unbounded;
        }
        let coefficient = match self {
            CoefficientVector::Exact(slots) => Interval::point(slots[index].clone()),
            CoefficientVector::Interval(slots) => slots[index].clone(),
            CoefficientVector::Universal => unreachable!("guarded by callers"),
        };
        match coefficient.mul(&bounds).as_point() {
            Some(value) => Scale::Value(value.clone()),
            None => Scale::Range(coefficient.mul(&bounds)),
        }
    }

    fn scale_exact(&self, factor: &NumericValue) -> CoefficientVector {
        match self {
            CoefficientVector::Exact(slots) => CoefficientVector::Exact(
                slots.iter().map(|slot| slot.mul(factor)).collect(),
            ),
            _ => self.scale_interval(&Interval::point(factor.clone())),
        }
    }

    fn scale_interval(&self, factor: &Interval) -> CoefficientVector {
        let slots = self.interval_slots().expect("non-universal operand");
        CoefficientVector::Interval(
            slots.iter().map(|slot| slot.mul(factor)).collect(),
        )
    }
}

enum Scale {
    Value(NumericValue),
    Range(Interval),
    Unbounded,
}

impl fmt::Display for CoefficientVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CoefficientVector::Universal => write!(f, "⊤"),
            CoefficientVector::Exact(slots) => {
                let size = slots.len() - 1;
                for (index, slot) in slots[..size].iter().enumerate() {
                    if !slot.is_zero() {
                        write!(f, "{}·v{} + ", slot, index)?;
                    }
                }
                write!(f, "{}", slots[size])
            }
            CoefficientVector::Interval(slots) => {
                let size = slots.len() - 1;
                for (index, slot) in slots[..size].iter().enumerate() {
                    write!(f, "{}·v{} + ", slot, index)?;
                }
                write!(f, "{}", slots[size])
            }
        }
    }
}
