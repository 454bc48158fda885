//! Monetary amounts using decimal arithmetic.
//!
//! All prices and totals in the system are [`Money`] values. Amounts are
//! stored in the currency's standard unit (e.g. 50.00, not 5000) and use
//! `rust_decimal` to avoid floating point drift in cart and order math.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes supported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// Bangladeshi Taka, the store's home currency.
    #[default]
    BDT,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// The ISO 4217 code as a string.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BDT => "BDT",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BDT" => Ok(Self::BDT),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            _ => Err(format!("unsupported currency code: {s}")),
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary amount in the store currency.
///
/// The currency is carried by configuration rather than per value; `Money`
/// is a thin wrapper over [`Decimal`] that keeps arithmetic explicit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// A zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// The amount in minor units (e.g. poisha, cents), rounded to the
    /// nearest whole unit. Payment gateways bill in minor units.
    #[must_use]
    pub fn minor_units(&self) -> i64 {
        use rust_decimal::prelude::ToPrimitive;

        (self.0 * Decimal::from(100))
            .round()
            .to_i64()
            .unwrap_or(i64::MAX)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_times_and_sum() {
        let unit = Money::new(Decimal::from(100));
        let line = unit.times(2);
        assert_eq!(line.amount(), Decimal::from(200));

        let total: Money = [line, Money::new(Decimal::from(50))].into_iter().sum();
        assert_eq!(total.amount(), Decimal::from(250));
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(Money::new(Decimal::new(1999, 2)).minor_units(), 1999);
        assert_eq!(Money::new(Decimal::from(50)).minor_units(), 5000);
    }

    #[test]
    fn test_display_two_places() {
        assert_eq!(Money::new(Decimal::from(50)).to_string(), "50.00");
        assert_eq!(Money::new(Decimal::new(199, 1)).to_string(), "19.90");
    }

    #[test]
    fn test_currency_code_parse() {
        assert_eq!("BDT".parse::<CurrencyCode>().unwrap(), CurrencyCode::BDT);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }
}
