use std::{
    fmt,
    ops::{Add, Sub},
    str::FromStr,
};

use crate::EngineError;

/// Basis points in 100%.
const BPS_SCALE: i64 = 10_000;

/// Money amount represented as **integer minor units** (cents for EUR/USD).
///
/// Use this type for **all** monetary values in the engine (prices, booking
/// totals, commission splits) to avoid floating-point drift. The currency is
/// carried separately by whoever owns the amount.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let price = Money::new(12_34);
/// assert_eq!(price.minor(), 1234);
/// assert_eq!(price.to_string(), "12.34");
/// assert_eq!(Money::new(10_000).percent_bps(500).unwrap().minor(), 500);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Multiplies by an integer quantity (participants, nights, ...).
    pub fn times(self, quantity: i64) -> Result<Money, EngineError> {
        self.0
            .checked_mul(quantity)
            .map(Money)
            .ok_or_else(|| EngineError::InvalidInput("amount too large".to_string()))
    }

    /// Returns `bps` basis points of the amount, rounded half away from zero.
    ///
    /// `500` bps is 5%.
    pub fn percent_bps(self, bps: i64) -> Result<Money, EngineError> {
        let scaled = self
            .0
            .checked_mul(bps)
            .ok_or_else(|| EngineError::InvalidInput("amount too large".to_string()))?;
        let quotient = scaled / BPS_SCALE;
        let remainder = scaled % BPS_SCALE;
        let rounded = if remainder.abs() * 2 >= BPS_SCALE {
            quotient + scaled.signum()
        } else {
            quotient
        };
        Ok(Money(rounded))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses `"12"`, `"12.5"`, `"12,50"` or `"-3.10"` into minor units.
    /// More than two decimals are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidInput(format!("invalid amount: {s:?}"));

        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (units, fraction) = match digits.split_once(['.', ',']) {
            Some((units, fraction)) => (units, fraction),
            None => (digits, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if units.is_empty() || !all_digits(units) || !all_digits(fraction) || fraction.len() > 2 {
            return Err(invalid());
        }

        let units: i64 = units.parse().map_err(|_| invalid())?;
        let cents = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse::<i64>().map_err(|_| invalid())?,
        };
        let minor = units
            .checked_mul(100)
            .and_then(|value| value.checked_add(cents))
            .ok_or_else(|| EngineError::InvalidInput("amount too large".to_string()))?;

        Ok(Money(if negative { -minor } else { minor }))
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(Money::new(0).to_string(), "0.00");
        assert_eq!(Money::new(1).to_string(), "0.01");
        assert_eq!(Money::new(1050).to_string(), "10.50");
        assert_eq!(Money::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn percent_rounds_half_away_from_zero() {
        // 5% of 0.10 is 0.005 -> 0.01
        assert_eq!(Money::new(10).percent_bps(500).unwrap(), Money::new(1));
        // 5% of 0.09 is 0.0045 -> 0.00
        assert_eq!(Money::new(9).percent_bps(500).unwrap(), Money::new(0));
        assert_eq!(Money::new(-10).percent_bps(500).unwrap(), Money::new(-1));
        assert_eq!(Money::new(19_999).percent_bps(500).unwrap(), Money::new(1_000));
    }

    #[test]
    fn parses_both_decimal_separators() {
        assert_eq!("12".parse::<Money>().unwrap(), Money::new(1200));
        assert_eq!("12.5".parse::<Money>().unwrap(), Money::new(1250));
        assert_eq!(" 12,05 ".parse::<Money>().unwrap(), Money::new(1205));
        assert_eq!("-3.10".parse::<Money>().unwrap(), Money::new(-310));
        assert_eq!("7.".parse::<Money>().unwrap(), Money::new(700));
    }

    #[test]
    fn rejects_malformed_amounts() {
        for raw in ["", "-", "1.234", "1.2.3", "abc", ".50", "1e3", "99999999999999999999"] {
            assert!(raw.parse::<Money>().is_err(), "{raw} should not parse");
        }
    }

    #[test]
    fn times_detects_overflow() {
        assert_eq!(Money::new(2_500).times(3).unwrap(), Money::new(7_500));
        assert!(Money::new(i64::MAX).times(2).is_err());
    }
}
