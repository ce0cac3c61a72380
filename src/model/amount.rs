//! Amount type for monetary values read from loosely formatted spreadsheet cells.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that
//! may include a currency symbol, thousands separators or surrounding whitespace.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Characters removed from a cell before it is parsed as a number.
const STRIPPED_CHARS: &[char] = &['$', '€', '£', '¥', ','];

/// Represents a cash amount in the base currency unit.
///
/// Unlike a plain `Decimal`, an `Amount` can be parsed from the formatted strings that a
/// spreadsheet hands back, and it prints itself the way a dashboard shows money.
///
/// # Examples
///
/// ```
/// # use travel_spend::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("$1,234.56").unwrap();
/// let b = Amount::from_str("1234.56").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "$1,234.56");
/// ```
///
/// Unparseable input coerces to zero when using `Amount::coerce`:
/// ```
/// # use travel_spend::model::Amount;
/// assert!(Amount::coerce("n/a").is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.is_zero()
    }

    /// Parses `s` with [`parse_number`], falling back to zero when the cell is empty or is not
    /// a number.
    pub fn coerce(s: &str) -> Self {
        Self(parse_number(s).unwrap_or_default())
    }
}

/// An error that can occur when parsing strings into `Decimal` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

/// Strips currency symbols, thousands separators and whitespace from `s`, then parses what is
/// left as a plain or scientific-notation decimal.
///
/// Returns `None` for a cell that is empty once cleaned or that is not a number.
pub fn parse_number(s: &str) -> Option<Decimal> {
    try_parse_number(s).ok().flatten()
}

fn try_parse_number(s: &str) -> Result<Option<Decimal>, AmountError> {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && !STRIPPED_CHARS.contains(c))
        .collect();
    if cleaned.is_empty() {
        return Ok(None);
    }
    match Decimal::from_str(&cleaned) {
        Ok(value) => Ok(Some(value)),
        Err(e) => Decimal::from_scientific(&cleaned)
            .map(Some)
            .map_err(|_| AmountError(e)),
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Amount(try_parse_number(s)?.unwrap_or_default()))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.0.abs().to_f64().unwrap_or_default();
        write!(f, "{sign}${}", format_num::format_num!(",.2", num))
    }
}

impl Add for Amount {
    type Output = Amount;

    /// Saturates at the largest representable amount instead of overflowing.
    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Chart renderers and JSON consumers want a number, not a formatted string.
        Serialize::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        <Decimal as Deserialize>::deserialize(deserializer).map(Amount)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
