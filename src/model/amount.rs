//! Amount type for signed monetary values.
//!
//! This module provides the `Amount` type which wraps `Decimal`. Negative amounts are expenses and
//! positive amounts are income. Parsing accepts values that may or may not include a currency sign
//! and thousands separators.

use crate::error::ValidationError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Currency symbols that are stripped during parsing.
const CURRENCY_SIGNS: [char; 4] = ['$', '€', '£', '¥'];

/// Represents a signed monetary amount.
///
/// `Decimal` cannot hold NaN or infinity, so every `Amount` is a finite number. Equality and
/// ordering compare the numeric value, so `1.0` and `1.00` are equal.
///
/// # Examples
///
/// ```
/// # use expenses::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("-$1,250.50").unwrap();
/// assert!(amount.is_negative());
/// assert_eq!(amount.to_string(), "-$1,250.50");
/// assert_eq!(amount.magnitude(), Amount::from_str("1250.5").unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// The absolute value, used when comparing expenses and income by size.
    pub fn magnitude(&self) -> Amount {
        Amount(self.0.abs())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true for income. Zero is neither income nor expense.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true for an expense. Zero is neither income nor expense.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Adds two amounts, returning `None` if the result does not fit in a `Decimal`.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Totals the amounts, returning `None` on overflow.
    pub fn checked_sum<I>(amounts: I) -> Option<Amount>
    where
        I: IntoIterator<Item = Amount>,
    {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |total, amount| total.checked_add(amount))
    }

    /// Formats the amount with thousands separators, two decimal places and the given currency
    /// symbol placed after the sign, e.g. `-€60,000.00`. Halves round away from zero.
    pub fn display_with(&self, symbol: &str) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let sign = if !rounded.is_zero() && rounded.is_sign_negative() {
            "-"
        } else {
            ""
        };
        let fixed = format!("{:.2}", rounded.abs());
        let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        format!("{sign}{symbol}{}.{cents}", group_thousands(whole))
    }
}

/// Inserts a comma between each group of three digits, e.g. `1234567` becomes `1,234,567`.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidAmount(s.to_string());
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(invalid());
        }

        // "-$50.00", "$-50.00" and "-50.00" are all accepted
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let rest = rest.trim_start_matches(CURRENCY_SIGNS);
        let without_commas = rest.replace(',', "");
        let text = if negative {
            format!("-{without_commas}")
        } else {
            without_commas
        };

        Decimal::from_str(&text).map(Amount).map_err(|_| invalid())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_with("$"))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Plain decimal text keeps the exact value, e.g. "-15.50"
        serializer.serialize_str(&self.0.to_string())
    }
}

/// Stored amounts may be JSON strings or JSON numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredAmount {
    Text(String),
    Number(f64),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = match StoredAmount::deserialize(deserializer)? {
            StoredAmount::Text(s) => s,
            StoredAmount::Number(n) => n.to_string(),
        };
        Amount::from_str(&text).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<i32> for Amount {
    fn from(value: i32) -> Self {
        Amount::new(Decimal::from(value))
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::new(Decimal::from(value))
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

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("-15").unwrap();
        assert_eq!(amount.value(), dec("-15"));
    }

    #[test]
    fn test_parse_with_dollar_sign() {
        assert_eq!(Amount::from_str("$50.00").unwrap().value(), dec("50.00"));
        assert_eq!(Amount::from_str("-$50.00").unwrap().value(), dec("-50.00"));
    }

    #[test]
    fn test_parse_with_commas() {
        let amount = Amount::from_str("-$60,000.00").unwrap();
        assert_eq!(amount.value(), dec("-60000.00"));
    }

    #[test]
    fn test_parse_whitespace() {
        let amount = Amount::from_str("  12.5  ").unwrap();
        assert_eq!(amount.value(), dec("12.5"));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(
            Amount::from_str("  "),
            Err(ValidationError::InvalidAmount("  ".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(Amount::from_str("twelve").is_err());
        assert!(Amount::from_str("NaN").is_err());
        assert!(Amount::from_str("inf").is_err());
        assert!(Amount::from_str("12abc").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::from(2000).to_string(), "$2,000.00");
        assert_eq!(Amount::from(-15).to_string(), "-$15.00");
        assert_eq!(Amount::ZERO.to_string(), "$0.00");
        assert_eq!(Amount::from(-15).display_with("€"), "-€15.00");
    }

    #[test]
    fn test_zero_is_not_positive_or_negative() {
        let zero = Amount::from_str("0.00").unwrap();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
        let negative_zero = Amount::from_str("-0").unwrap();
        assert!(!negative_zero.is_negative());
    }

    #[test]
    fn test_magnitude() {
        assert_eq!(Amount::from(-200).magnitude(), Amount::from(200));
        assert_eq!(Amount::from(100).magnitude(), Amount::from(100));
    }

    #[test]
    fn test_value_equality_ignores_scale() {
        let a = Amount::from_str("1.0").unwrap();
        let b = Amount::from_str("1.00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_display_large_values_keep_every_digit() {
        let amount = Amount::from_str("12345678901234567.89").unwrap();
        assert_eq!(amount.to_string(), "$12,345,678,901,234,567.89");
        let max = Amount::new(Decimal::MAX);
        assert_eq!(max.to_string(), "$79,228,162,514,264,337,593,543,950,335.00");
    }

    #[test]
    fn test_display_rounds_to_cents() {
        assert_eq!(Amount::from_str("1.005").unwrap().to_string(), "$1.01");
        assert_eq!(Amount::from_str("-2.344").unwrap().to_string(), "-$2.34");
        assert_eq!(Amount::from_str("-0.004").unwrap().to_string(), "$0.00");
        assert_eq!(Amount::from_str("999.999").unwrap().to_string(), "$1,000.00");
        assert_eq!(Amount::from_str("100").unwrap().to_string(), "$100.00");
    }

    #[test]
    fn test_checked_sum() {
        let amounts = [Amount::from(-15), Amount::from(2000), Amount::from(5)];
        assert_eq!(Amount::checked_sum(amounts), Some(Amount::from(1990)));
        assert_eq!(Amount::checked_sum([]), Some(Amount::ZERO));
    }

    #[test]
    fn test_checked_sum_overflow() {
        let max = Amount::from_str("79228162514264337593543950335").unwrap();
        assert_eq!(Amount::checked_sum([max, max]), None);
        let almost = Amount::new(Decimal::MAX - Decimal::ONE);
        assert_eq!(max.checked_add(Amount::from(-1)), Some(almost));
    }

    #[test]
    fn test_serialize() {
        let amount = Amount::from_str("-15.50").unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "\"-15.50\"");
    }

    #[test]
    fn test_deserialize_string_or_number() {
        let a: Amount = serde_json::from_str("\"-15.50\"").unwrap();
        let b: Amount = serde_json::from_str("-15.5").unwrap();
        assert_eq!(a, b);
        let c: Amount = serde_json::from_str("2000").unwrap();
        assert_eq!(c, Amount::from(2000));
    }

    #[test]
    fn test_deserialize_garbage() {
        assert!(serde_json::from_str::<Amount>("\"abc\"").is_err());
        assert!(serde_json::from_str::<Amount>("true").is_err());
    }
}
