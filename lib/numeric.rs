//! Tagged arbitrary-precision numbers.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::Error;

/// A tagged arbitrary-precision number, either an integer or a decimal.
///
/// Mixed-representation arithmetic and comparison promote the integer side
/// to decimal. Equality does not: `Integer(3)` and `Decimal(3.0)` are never
/// `==`, even though they denote the same number. Use
/// [`NumericValue::compare`] for the numeric ordering; a `PartialOrd` impl
/// would contradict the derived `PartialEq` and is deliberately absent.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum NumericValue {
    Integer(BigInt),
    Decimal(BigRational),
}

impl NumericValue {
    /// Create an integer value.
    pub fn integer<T: Into<BigInt>>(value: T) -> NumericValue {
        NumericValue::Integer(value.into())
    }

    /// Create a decimal value.
    pub fn decimal(value: BigRational) -> NumericValue {
        NumericValue::Decimal(value)
    }

    /// The integer zero.
    pub fn zero() -> NumericValue {
        NumericValue::Integer(BigInt::zero())
    }

    /// The integer one.
    pub fn one() -> NumericValue {
        NumericValue::Integer(BigInt::one())
    }

    pub fn is_zero(&self) -> bool {
        match self {
            NumericValue::Integer(i) => i.is_zero(),
            NumericValue::Decimal(r) => r.is_zero(),
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            NumericValue::Integer(i) => i.is_negative(),
            NumericValue::Decimal(r) => r.is_negative(),
        }
    }

    pub fn is_positive(&self) -> bool {
        match self {
            NumericValue::Integer(i) => i.is_positive(),
            NumericValue::Decimal(r) => r.is_positive(),
        }
    }

    /// Promote to the decimal representation.
    fn promote(&self) -> BigRational {
        match self {
            NumericValue::Integer(i) => BigRational::from_integer(i.clone()),
            NumericValue::Decimal(r) => r.clone(),
        }
    }

    pub fn add(&self, other: &NumericValue) -> NumericValue {
        match (self, other) {
            (NumericValue::Integer(a), NumericValue::Integer(b)) => {
                NumericValue::Integer(a + b)
            }
            _ => NumericValue::Decimal(self.promote() + other.promote()),
        }
    }

    pub fn sub(&self, other: &NumericValue) -> NumericValue {
        match (self, other) {
            (NumericValue::Integer(a), NumericValue::Integer(b)) => {
                NumericValue::Integer(a - b)
            }
            _ => NumericValue::Decimal(self.promote() - other.promote()),
        }
    }

    pub fn mul(&self, other: &NumericValue) -> NumericValue {
        match (self, other) {
            (NumericValue::Integer(a), NumericValue::Integer(b)) => {
                NumericValue::Integer(a * b)
            }
            _ => NumericValue::Decimal(self.promote() * other.promote()),
        }
    }

    /// Divide by a non-zero value. Integer division that does not come out
    /// even falls back to the decimal representation.
    ///
    /// The divisor must be non-zero; use [`NumericValue::checked_div`] when
    /// that is not established.
    pub fn div(&self, other: &NumericValue) -> NumericValue {
        debug_assert!(!other.is_zero());
        match (self, other) {
            (NumericValue::Integer(a), NumericValue::Integer(b))
                if (a % b).is_zero() =>
            {
                NumericValue::Integer(a / b)
            }
            _ => NumericValue::Decimal(self.promote() / other.promote()),
        }
    }

    /// Divide, failing on an exact-zero divisor.
    pub fn checked_div(&self, other: &NumericValue) -> Result<NumericValue, Error> {
        if other.is_zero() {
            Err(Error::DivisionByZero)
        } else {
            Ok(self.div(other))
        }
    }

    pub fn neg(&self) -> NumericValue {
        match self {
            NumericValue::Integer(i) => NumericValue::Integer(-i),
            NumericValue::Decimal(r) => NumericValue::Decimal(-r),
        }
    }

    /// Numeric ordering across representations. Unlike `==`, this treats
    /// `Integer(3)` and `Decimal(3.0)` as equal.
    pub fn compare(&self, other: &NumericValue) -> Ordering {
        match (self, other) {
            (NumericValue::Integer(a), NumericValue::Integer(b)) => a.cmp(b),
            _ => self.promote().cmp(&other.promote()),
        }
    }
}

impl From<i64> for NumericValue {
    fn from(value: i64) -> NumericValue {
        NumericValue::Integer(BigInt::from(value))
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NumericValue::Integer(i) => write!(f, "{}", i),
            NumericValue::Decimal(r) => write!(f, "{}", r),
        }
    }
}
