//! Amount type for handling transaction values exactly.
//!
//! This module provides the `Amount` type which wraps `Decimal`. Amounts arrive as JSON numbers,
//! are compared for exact equality by the amount filter and are summed by the aggregator, so a
//! binary float would make both of those lossy.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;
use tracing::warn;

/// Represents a transaction amount.
///
/// Equality is numeric, so `50`, `50.0` and `50.00` are the same amount.
///
/// # Examples
///
/// ```
/// # use customer_spend::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("50").unwrap();
/// let b = Amount::from_str("50.00").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(b.to_string(), "50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);
    pub const MAX: Amount = Amount(Decimal::MAX);
    pub const MIN: Amount = Amount(Decimal::MIN);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Lossy conversion used when handing values to a renderer.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// Returns `None` instead of overflowing.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Clamps to `Amount::MAX` or `Amount::MIN` instead of overflowing.
    pub fn saturating_add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }

    /// Formats the amount with thousands separators and two decimals, e.g. `1,250.50`.
    pub fn formatted(&self) -> String {
        let num = self.0.abs().to_f64().unwrap_or_default();
        let sign = if self.0.is_sign_negative() && !self.0.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{sign}{}", format_num::format_num!(",.2", num))
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub enum AmountError {
    /// The text is not written as a number at all, e.g. `abc` or `1_000`.
    NotANumber(String),
    /// The text is a number that `Decimal` cannot hold.
    Decimal(rust_decimal::Error),
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::NotANumber(s) => write!(f, "NotANumber({s:?})"),
            AmountError::Decimal(e) => Debug::fmt(e, f),
        }
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::NotANumber(s) => write!(f, "'{s}' is not a number"),
            AmountError::Decimal(e) => Display::fmt(e, f),
        }
    }
}

impl Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AmountError::NotANumber(_) => None,
            AmountError::Decimal(e) => Some(e),
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parses plain (`-12.5`) and scientific (`1e2`) notation. Surrounding whitespace is ignored,
    /// anything else is an error, including the empty string and digit separators (`1_000`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // `Decimal` accepts `_` between digits, the float grammar does not.
        if trimmed.parse::<f64>().is_err() {
            return Err(AmountError::NotANumber(trimmed.to_string()));
        }
        match Decimal::from_str(trimmed) {
            Ok(value) => Ok(Amount(value)),
            Err(e) => match Decimal::from_scientific(trimmed) {
                Ok(value) => Ok(Amount(value)),
                Err(_) => Err(AmountError::Decimal(e)),
            },
        }
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// Saturates at `Amount::MAX` and `Amount::MIN`. Use `checked_add` to detect overflow.
impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.saturating_add(rhs)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Renderers and the dataset contract both expect a JSON number.
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        Ok(Amount(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount(Decimal::from(v)))
    }

    /// JSON numbers arrive as `f64`. The shortest text that round-trips is what the document
    /// said, so `5e28` stays `5e28` and `0.1` stays `0.1`. Finite values beyond the range of
    /// `Decimal` are clamped to `Amount::MAX` or `Amount::MIN`.
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        if !v.is_finite() {
            return Err(E::custom(format!("{v} cannot be represented as an amount")));
        }
        if let Ok(value) = Decimal::from_str(&v.to_string()) {
            return Ok(Amount(value));
        }
        if let Some(value) = Decimal::from_f64(v) {
            return Ok(Amount(value));
        }
        warn!("The amount {v} is out of range and is clamped");
        Ok(if v.is_sign_negative() {
            Amount::MIN
        } else {
            Amount::MAX
        })
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::from_str(v).map_err(E::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<i32> for Amount {
    fn from(value: i32) -> Self {
        Amount(Decimal::from(value))
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount(Decimal::from(value))
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        let amount = Amount::from_str("50").unwrap();
        assert_eq!(amount.value(), Decimal::from(50));
    }

    #[test]
    fn test_parse_negative_fraction() {
        let amount = Amount::from_str("-12.75").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-12.75").unwrap());
    }

    #[test]
    fn test_parse_whitespace() {
        let amount = Amount::from_str("  50.00  ").unwrap();
        assert_eq!(amount, Amount::from(50));
    }

    #[test]
    fn test_parse_scientific() {
        let amount = Amount::from_str("1e2").unwrap();
        assert_eq!(amount, Amount::from(100));
    }

    #[test]
    fn test_parse_rejects_text() {
        assert!(Amount::from_str("abc").is_err());
        assert!(Amount::from_str("").is_err());
        assert!(Amount::from_str("5 0").is_err());
    }

    #[test]
    fn test_parse_rejects_digit_separators() {
        assert!(Amount::from_str("1_000").is_err());
        assert!(Amount::from_str("1_000.5").is_err());
        assert!(Amount::from_str("1,000").is_err());
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        assert!(Amount::from_str("inf").is_err());
        assert!(Amount::from_str("NaN").is_err());
    }

    #[test]
    fn test_add_saturates_instead_of_overflowing() {
        let half = Amount::from_str("50000000000000000000000000000").unwrap();
        assert_eq!(half.checked_add(half), None);
        assert_eq!(half + half, Amount::MAX);
        assert_eq!(Amount::MIN + Amount::from(-1), Amount::MIN);

        let mut total = Amount::MAX;
        total += Amount::from(30);
        assert_eq!(total, Amount::MAX);
    }

    #[test]
    fn test_checked_add_in_range() {
        let sum = Amount::from(20).checked_add(Amount::from_str("0.5").unwrap());
        assert_eq!(sum, Some(Amount::from_str("20.5").unwrap()));
    }

    #[test]
    fn test_equality_ignores_scale() {
        let a = Amount::from_str("50").unwrap();
        let b = Amount::from_str("50.000").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_display_is_normalized() {
        assert_eq!(Amount::from_str("70.00").unwrap().to_string(), "70");
        assert_eq!(Amount::from_str("12.50").unwrap().to_string(), "12.5");
    }

    #[test]
    fn test_formatted() {
        assert_eq!(Amount::from_str("1250.5").unwrap().formatted(), "1,250.50");
        assert_eq!(Amount::from_str("-4.5").unwrap().formatted(), "-4.50");
        assert_eq!(Amount::ZERO.formatted(), "0.00");
    }

    #[test]
    fn test_sum_is_exact() {
        let parts = ["0.1", "0.2", "0.3"].map(|s| Amount::from_str(s).unwrap());
        let total: Amount = parts.iter().sum();
        assert_eq!(total, Amount::from_str("0.6").unwrap());
    }

    #[test]
    fn test_serialize_as_number() {
        let amount = Amount::from_str("50.25").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "50.25");
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let a: Amount = serde_json::from_str("20").unwrap();
        let b: Amount = serde_json::from_str("20.5").unwrap();
        let c: Amount = serde_json::from_str("\"20.5\"").unwrap();
        assert_eq!(a, Amount::from(20));
        assert_eq!(b, c);
    }

    #[test]
    fn test_deserialize_large_number_is_exact() {
        let a: Amount = serde_json::from_str("5e28").unwrap();
        assert_eq!(
            a,
            Amount::from_str("50000000000000000000000000000").unwrap()
        );
        let b: Amount = serde_json::from_str("0.1").unwrap();
        assert_eq!(b, Amount::from_str("0.1").unwrap());
    }

    #[test]
    fn test_deserialize_out_of_range_is_clamped() {
        let big: Amount = serde_json::from_str("1e29").unwrap();
        assert_eq!(big, Amount::MAX);
        let small: Amount = serde_json::from_str("-1e300").unwrap();
        assert_eq!(small, Amount::MIN);
    }

    #[test]
    fn test_deserialize_rejects_bool() {
        let result: Result<Amount, _> = serde_json::from_str("true");
        assert!(result.is_err());
    }
}
