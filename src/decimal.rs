//! Exact signed quantities and totals.
//!
//! Wraps `rust_decimal` so that summing contributions is exact: the order and
//! grouping of additions never changes a total, which keeps every aggregation
//! strategy byte-identical.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};
use std::str::FromStr;

/// A net transaction amount or running total.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use movement_summary::Amount;
///
/// let amount = Amount::from_str("0000000004").unwrap();
/// assert_eq!(amount.to_string(), "4.0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Creates an amount from a `Decimal`, folding negative zero into zero.
    pub fn new(value: Decimal) -> Self {
        if value.is_zero() {
            Amount::ZERO
        } else {
            Amount(value)
        }
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Nearest double-precision value, for structured renderings.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::new(Decimal::from(value))
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    /// Accepts an optional sign, digits and at most one decimal point.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        // `Decimal` also takes `_` digit separators, which no quantity carries.
        if !s
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.'))
        {
            return Err(rust_decimal::Error::ErrorString(format!(
                "invalid character in {s:?}"
            )));
        }
        let decimal = Decimal::from_str(s)?;
        Ok(Amount::new(decimal))
    }
}

/// Plain decimal notation with at least one fractional digit: `285.0`, `-0.5`.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_zero() {
            return f.write_str("0.0");
        }
        let normalized = self.0.normalize();
        if normalized.scale() == 0 {
            write!(f, "{}.0", normalized)
        } else {
            write!(f, "{}", normalized)
        }
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount::new(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount::new(self.0 - rhs.0)
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Amount::new(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

/// Serialized in its display form, so CSV cells read `285.0`.
impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_zero_padded_quantities() {
        assert_eq!(Amount::from_str("0000000004").unwrap(), Amount::from(4));
        assert_eq!(Amount::from_str("0000000000").unwrap(), Amount::ZERO);
        assert_eq!(Amount::from_str("  12  ").unwrap(), Amount::from(12));
        assert_eq!(Amount::from_str("-3").unwrap(), Amount::from(-3));
    }

    #[test]
    fn test_from_str_rejects_non_numbers() {
        assert!(Amount::from_str("").is_err());
        assert!(Amount::from_str("INVALID").is_err());
        assert!(Amount::from_str("12AB").is_err());
        assert!(Amount::from_str("1_000").is_err());
        assert!(Amount::from_str("1e3").is_err());
        assert!(Amount::from_str("0x10").is_err());
    }

    #[test]
    fn test_serializes_as_display_string() {
        let json = serde_json::to_value(Amount::from(-215)).unwrap();
        assert_eq!(json, serde_json::Value::from("-215.0"));
    }

    #[test]
    fn test_display_always_has_fraction() {
        assert_eq!(Amount::from(285).to_string(), "285.0");
        assert_eq!(Amount::from(-215).to_string(), "-215.0");
        assert_eq!(Amount::ZERO.to_string(), "0.0");
        assert_eq!(
            Amount::from_str("1234567.890").unwrap().to_string(),
            "1234567.89"
        );
    }

    #[test]
    fn test_negated_zero_is_zero() {
        let zero = -Amount::ZERO;
        assert_eq!(zero.to_string(), "0.0");
        assert!((Amount::from(4) - Amount::from(4)).is_zero());
    }

    #[test]
    fn test_sum_and_f64() {
        let total: Amount = [1, 2, -10].into_iter().map(Amount::from).sum();
        assert_eq!(total, Amount::from(-7));
        assert_eq!(total.to_f64(), -7.0);
    }
}
