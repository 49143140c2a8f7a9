//! Interval endpoints and closed intervals over [`NumericValue`].
//!
//! Intervals carry the results of the kernel bounds query and the slots of
//! interval-shaped coefficient vectors. Endpoints may be infinite; an
//! infinite bound propagates through arithmetic and comparison and is never
//! equal to a finite one.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::numeric::NumericValue;

/// An interval endpoint: finite or infinite.
///
/// Ordering is exposed through [`Bound::compare`], mirroring
/// [`NumericValue::compare`]: two negative-infinite bounds order as equal,
/// but `==` on bounds is structural and follows the representation quirk of
/// the finite values inside.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Bound {
    NegativeInfinite,
    Finite(NumericValue),
    PositiveInfinite,
}

impl Bound {
    pub fn is_finite(&self) -> bool {
        matches!(self, Bound::Finite(_))
    }

    pub fn is_infinite(&self) -> bool {
        !self.is_finite()
    }

    pub fn compare(&self, other: &Bound) -> Ordering {
        match (self, other) {
            (Bound::NegativeInfinite, Bound::NegativeInfinite) => Ordering::Equal,
            (Bound::NegativeInfinite, _) => Ordering::Less,
            (_, Bound::NegativeInfinite) => Ordering::Greater,
            (Bound::PositiveInfinite, Bound::PositiveInfinite) => Ordering::Equal,
            (Bound::PositiveInfinite, _) => Ordering::Greater,
            (_, Bound::PositiveInfinite) => Ordering::Less,
            (Bound::Finite(a), Bound::Finite(b)) => a.compare(b),
        }
    }

    pub fn min(self, other: Bound) -> Bound {
        match self.compare(&other) {
            Ordering::Greater => other,
            _ => self,
        }
    }

    pub fn max(self, other: Bound) -> Bound {
        match self.compare(&other) {
            Ordering::Less => other,
            _ => self,
        }
    }

    /// Add two bounds. An infinite operand absorbs; the endpoints handed in
    /// here never mix opposite infinities (a lower endpoint is never
    /// positive-infinite and an upper endpoint never negative-infinite).
    pub fn add(&self, other: &Bound) -> Bound {
        match (self, other) {
            (Bound::Finite(a), Bound::Finite(b)) => Bound::Finite(a.add(b)),
            (Bound::NegativeInfinite, Bound::PositiveInfinite)
            | (Bound::PositiveInfinite, Bound::NegativeInfinite) => {
                unreachable!("adding opposite infinite bounds")
            }
            (Bound::NegativeInfinite, _) | (_, Bound::NegativeInfinite) => {
                Bound::NegativeInfinite
            }
            (Bound::PositiveInfinite, _) | (_, Bound::PositiveInfinite) => {
                Bound::PositiveInfinite
            }
        }
    }

    pub fn neg(&self) -> Bound {
        match self {
            Bound::NegativeInfinite => Bound::PositiveInfinite,
            Bound::Finite(v) => Bound::Finite(v.neg()),
            Bound::PositiveInfinite => Bound::NegativeInfinite,
        }
    }

    /// Multiply two bounds with the interval-arithmetic convention
    /// `0 · ∞ = 0`.
    pub fn mul(&self, other: &Bound) -> Bound {
        if let Bound::Finite(v) = self {
            if v.is_zero() {
                return Bound::Finite(NumericValue::zero());
            }
        }
        if let Bound::Finite(v) = other {
            if v.is_zero() {
                return Bound::Finite(NumericValue::zero());
            }
        }
        match (self, other) {
            (Bound::Finite(a), Bound::Finite(b)) => Bound::Finite(a.mul(b)),
            _ => {
                // at least one infinite operand, neither side zero
                if self.sign_negative() == other.sign_negative() {
                    Bound::PositiveInfinite
                } else {
                    Bound::NegativeInfinite
                }
            }
        }
    }

    /// Divide by a non-zero finite value. Infinite bounds keep their
    /// magnitude and follow the divisor's sign.
    pub fn div_value(&self, divisor: &NumericValue) -> Bound {
        debug_assert!(!divisor.is_zero());
        match self {
            Bound::Finite(v) => Bound::Finite(v.div(divisor)),
            infinite => {
                if divisor.is_negative() {
                    infinite.neg()
                } else {
                    infinite.clone()
                }
            }
        }
    }

    /// The reciprocal of a non-zero bound. Infinite bounds collapse to zero.
    pub fn recip(&self) -> Bound {
        match self {
            Bound::Finite(v) => Bound::Finite(NumericValue::one().div(v)),
            _ => Bound::Finite(NumericValue::zero()),
        }
    }

    fn sign_negative(&self) -> bool {
        match self {
            Bound::NegativeInfinite => true,
            Bound::Finite(v) => v.is_negative(),
            Bound::PositiveInfinite => false,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Bound::NegativeInfinite => write!(f, "-∞"),
            Bound::Finite(v) => v.fmt(f),
            Bound::PositiveInfinite => write!(f, "∞"),
        }
    }
}

/// A closed, non-empty interval. The lower bound never exceeds the upper.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Interval {
    lower: Bound,
    upper: Bound,
}

impl Interval {
    pub fn new(lower: Bound, upper: Bound) -> Interval {
        debug_assert!(lower.compare(&upper) != Ordering::Greater);
        Interval { lower, upper }
    }

    /// The degenerate interval holding exactly one value.
    pub fn point(value: NumericValue) -> Interval {
        Interval {
            lower: Bound::Finite(value.clone()),
            upper: Bound::Finite(value),
        }
    }

    pub fn unbounded() -> Interval {
        Interval {
            lower: Bound::NegativeInfinite,
            upper: Bound::PositiveInfinite,
        }
    }

    pub fn lower(&self) -> &Bound {
        &self.lower
    }

    pub fn upper(&self) -> &Bound {
        &self.upper
    }

    pub fn is_point(&self) -> bool {
        self.lower.is_finite() && self.lower.compare(&self.upper) == Ordering::Equal
    }

    /// The single value of a degenerate interval.
    pub fn as_point(&self) -> Option<&NumericValue> {
        if !self.is_point() {
            return None;
        }
        match &self.lower {
            Bound::Finite(v) => Some(v),
            _ => None,
        }
    }

    pub fn has_infinite_endpoint(&self) -> bool {
        self.lower.is_infinite() || self.upper.is_infinite()
    }

    pub fn contains_zero(&self) -> bool {
        let zero = Bound::Finite(NumericValue::zero());
        self.lower.compare(&zero) != Ordering::Greater
            && self.upper.compare(&zero) != Ordering::Less
    }

    pub fn add(&self, other: &Interval) -> Interval {
        Interval::new(self.lower.add(&other.lower), self.upper.add(&other.upper))
    }

    pub fn neg(&self) -> Interval {
        Interval::new(self.upper.neg(), self.lower.neg())
    }

    pub fn sub(&self, other: &Interval) -> Interval {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Interval) -> Interval {
        let products = [
            self.lower.mul(&other.lower),
            self.lower.mul(&other.upper),
            self.upper.mul(&other.lower),
            self.upper.mul(&other.upper),
        ];
        let mut lower = products[0].clone();
        let mut upper = products[0].clone();
        for product in &products[1..] {
            lower = lower.min(product.clone());
            upper = upper.max(product.clone());
        }
        Interval::new(lower, upper)
    }

    /// The reciprocal of an interval that does not contain zero.
    pub fn recip(&self) -> Interval {
        debug_assert!(!self.contains_zero());
        Interval::new(self.upper.recip(), self.lower.recip())
    }

    /// The smallest interval containing both operands.
    pub fn join(&self, other: &Interval) -> Interval {
        Interval::new(
            self.lower.clone().min(other.lower.clone()),
            self.upper.clone().max(other.upper.clone()),
        )
    }

    /// Widen, with `self` the newer interval. An endpoint that moved past
    /// the older one becomes infinite; stable endpoints keep the older
    /// value, so ascending chains stabilize in finitely many steps.
    pub fn widen(&self, older: &Interval) -> Interval {
        let lower = if self.lower.compare(&older.lower) == Ordering::Less {
            Bound::NegativeInfinite
        } else {
            older.lower.clone()
        };
        let upper = if self.upper.compare(&older.upper) == Ordering::Greater {
            Bound::PositiveInfinite
        } else {
            older.upper.clone()
        };
        Interval::new(lower, upper)
    }

    pub fn includes(&self, other: &Interval) -> bool {
        self.lower.compare(&other.lower) != Ordering::Greater
            && self.upper.compare(&other.upper) != Ordering::Less
    }

    /// Intersect two intervals; `None` when they are disjoint.
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        let lower = self.lower.clone().max(other.lower.clone());
        let upper = self.upper.clone().min(other.upper.clone());
        if lower.compare(&upper) == Ordering::Greater {
            None
        } else {
            Some(Interval::new(lower, upper))
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(value: i64) -> NumericValue {
        NumericValue::from(value)
    }

    fn iv(lower: i64, upper: i64) -> Interval {
        Interval::new(Bound::Finite(int(lower)), Bound::Finite(int(upper)))
    }

    #[test]
    fn zero_times_infinity_is_zero() {
        let zero = Bound::Finite(int(0));
        assert_eq!(zero.mul(&Bound::PositiveInfinite), Bound::Finite(int(0)));
        assert_eq!(Bound::NegativeInfinite.mul(&zero), Bound::Finite(int(0)));
    }

    #[test]
    fn infinite_bounds_never_equal_finite() {
        assert_ne!(Bound::PositiveInfinite, Bound::Finite(int(5)));
        assert_eq!(
            Bound::PositiveInfinite.compare(&Bound::Finite(int(5))),
            Ordering::Greater
        );
    }

    #[test]
    fn multiplication_orders_endpoint_products() {
        assert_eq!(iv(-2, 3).mul(&iv(4, 5)), iv(-10, 15));
        assert_eq!(iv(-2, -1).mul(&iv(-3, -2)), iv(2, 6));
        let half_line = Interval::new(Bound::Finite(int(1)), Bound::PositiveInfinite);
        let product = half_line.mul(&iv(-1, -1));
        assert_eq!(
            product,
            Interval::new(Bound::NegativeInfinite, Bound::Finite(int(-1)))
        );
    }

    #[test]
    fn reciprocal_of_signed_intervals() {
        let positive = iv(2, 4).recip();
        assert_eq!(positive.lower().compare(positive.upper()), Ordering::Less);
        assert!(iv(1, 1).recip().is_point());
        let half_line = Interval::new(Bound::Finite(int(2)), Bound::PositiveInfinite);
        assert_eq!(
            half_line.recip(),
            Interval::new(
                Bound::Finite(int(0)),
                Bound::Finite(NumericValue::one().div(&int(2)))
            )
        );
    }

    #[test]
    fn widening_opens_moving_endpoints() {
        let widened = iv(0, 10).widen(&iv(0, 5));
        assert_eq!(
            widened,
            Interval::new(Bound::Finite(int(0)), Bound::PositiveInfinite)
        );
        // stable endpoints keep the older value
        assert_eq!(iv(0, 5).widen(&iv(0, 5)), iv(0, 5));
    }

    #[test]
    fn intersection_detects_disjoint_intervals() {
        assert_eq!(iv(0, 5).intersect(&iv(3, 9)), Some(iv(3, 5)));
        assert!(iv(0, 2).intersect(&iv(3, 9)).is_none());
    }

    #[test]
    fn join_is_the_hull() {
        assert_eq!(iv(0, 2).join(&iv(5, 9)), iv(0, 9));
    }
}
