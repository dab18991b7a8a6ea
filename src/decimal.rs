use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

/// Money type with 8 decimal places of precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const MAX: Money = Money(Decimal::MAX);

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d.round_dp(8))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s)?.round_dp(8)))
    }

    /// create from integer amount (pesos, dollars, etc)
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from minor amount (cents)
    pub fn from_minor(amount: i64, scale: u32) -> Self {
        let d = Decimal::from(amount) / Decimal::from(10_u64.pow(scale));
        Money(d.round_dp(8))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// round to specified decimal places
    pub fn round_dp(&self, dp: u32) -> Self {
        Money(self.0.round_dp(dp))
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// `None` on overflow
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(|d| Money(d.round_dp(8)))
    }

    /// grow the amount by a rate: `self * (1 + rate)`, `None` on overflow
    pub fn grown_by(&self, rate: Rate) -> Option<Money> {
        let factor = Decimal::ONE.checked_add(rate.as_decimal())?;
        self.0.checked_mul(factor).map(|d| Money(d.round_dp(8)))
    }

    /// simple (non-compounding) daily accrual: `self * daily_rate * days`, `None` on overflow
    pub fn accrue_daily(&self, daily_rate: Rate, days: u32) -> Option<Money> {
        self.0
            .checked_mul(daily_rate.as_decimal())?
            .checked_mul(Decimal::from(days))
            .map(|d| Money(d.round_dp(8)))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i32> for Money {
    fn from(i: i32) -> Self {
        Money::from_major(i as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money((self.0 + other.0).round_dp(8))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 = (self.0 + other.0).round_dp(8);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money((self.0 - other.0).round_dp(8))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 = (self.0 - other.0).round_dp(8);
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money((self.0 * other).round_dp(8))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

/// rate type for interest rates, penalty rates and ratios
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from decimal (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from percentage (e.g., 5 for 5%)
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p) / Decimal::from(100))
    }

    /// create from basis points (e.g., 500 for 5%)
    pub fn from_bps(bps: u32) -> Self {
        Rate(Decimal::from(bps) / Decimal::from(10000))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::from(100)
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().normalize())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_precision() {
        let m = Money::from_str_exact("100.123456789").unwrap();
        assert_eq!(m.to_string(), "100.12345679"); // rounded to 8 places
    }

    #[test]
    fn test_minor_units() {
        let m = Money::from_minor(123_456, 2);
        assert_eq!(m, Money::from_str_exact("1234.56").unwrap());
    }

    #[test]
    fn test_grown_by() {
        let principal = Money::from_major(1_000);
        assert_eq!(principal.grown_by(Rate::from_percentage(20)), Some(Money::from_major(1_200)));
        assert_eq!(principal.grown_by(Rate::from_percentage(100)), Some(Money::from_major(2_000)));
    }

    #[test]
    fn test_overflow_is_none() {
        assert_eq!(Money::MAX.grown_by(Rate::from_percentage(20)), None);
        assert_eq!(Money::MAX.accrue_daily(Rate::from_percentage(5), 30), None);
        assert_eq!(Money::MAX.checked_add(Money::from_major(1)), None);
        assert_eq!(
            Money::from_major(1).checked_add(Money::from_major(2)),
            Some(Money::from_major(3))
        );
    }

    #[test]
    fn test_daily_accrual_is_linear() {
        let base = Money::from_major(1_200);
        let rate = Rate::from_percentage(5);

        assert_eq!(base.accrue_daily(rate, 0), Some(Money::ZERO));
        assert_eq!(base.accrue_daily(rate, 1), Some(Money::from_major(60)));
        assert_eq!(base.accrue_daily(rate, 3), Some(Money::from_major(180)));
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::from_major(1), Money::from_major(2), Money::from_major(3)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_major(6));
    }

    #[test]
    fn test_rate_display_and_sign() {
        assert_eq!(Rate::from_percentage(20).to_string(), "20%");
        assert_eq!(Rate::from_bps(500).as_decimal(), dec!(0.05));
        assert!(Rate::from_bps(1).is_positive());
        assert!(!Rate::ZERO.is_positive());
        assert!(!Rate::from_decimal(dec!(-0.1)).is_positive());
    }
}
