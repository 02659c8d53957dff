//! Money type for representing currency amounts
//!
//! Wraps a `rust_decimal::Decimal` so rates and totals keep exact decimal
//! arithmetic. Unit rates are canonicalised to two decimal places; computed
//! totals keep the full precision of `hours × rate` and are rounded only when
//! displayed.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

/// Number of decimal places used by unit rates
pub const RATE_SCALE: u32 = 2;

/// Represents a monetary amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Create a Money amount from a decimal value
    pub const fn from_decimal(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use manhours_cli::models::Money;
    /// let amount = Money::from_cents(5000); // 50.00
    /// assert_eq!(amount.to_string(), "50.00");
    /// ```
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, RATE_SCALE))
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Get the underlying decimal
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Round to the canonical rate scale (two decimal places)
    pub fn to_rate_scale(&self) -> Self {
        let mut rounded = self
            .0
            .round_dp_with_strategy(RATE_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(RATE_SCALE);
        Self(rounded)
    }

    /// Multiply by a quantity; overflow yields zero instead of panicking
    pub fn times(&self, quantity: Decimal) -> Self {
        match self.0.checked_mul(quantity) {
            Some(value) => Self(value),
            None => {
                tracing::warn!(amount = %self.0, %quantity, "amount overflowed, using zero");
                Self::zero()
            }
        }
    }

    /// Lossy conversion for spreadsheet cells
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    /// Parse a money amount from a string
    ///
    /// Accepts "10.50", "-10.50", "1,250.00", "SAR 10.50", "$10.50", "10".
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped.trim_start()),
            None => (false, trimmed),
        };

        // Drop any leading currency symbol or code
        let digits_start = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .ok_or_else(|| MoneyParseError::InvalidFormat(s.to_string()))?;
        let prefix = rest[..digits_start].trim();
        if !prefix.chars().all(|c| c.is_alphabetic() || c == '$') {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let number: String = rest[digits_start..]
            .chars()
            .filter(|c| *c != ',')
            .collect();

        let value = Decimal::from_str(number.trim())
            .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?;

        Ok(Self(if negative { -value } else { value }))
    }

    /// Parse a unit rate leniently: unparsable or negative input becomes zero,
    /// and the result is canonicalised to two decimal places.
    pub fn parse_rate_lenient(s: &str) -> Self {
        match Self::parse(s) {
            Ok(money) if !money.is_negative() => money.to_rate_scale(),
            _ => Self::zero().to_rate_scale(),
        }
    }

    /// Format with a currency code or symbol, using thousands separators
    pub fn format_with_currency(&self, currency: &str) -> String {
        format!("{} {}", group_thousands(&self.to_string()), currency)
    }
}

fn group_thousands(plain: &str) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rate_scale().0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        match self.0.checked_add(other.0) {
            Some(value) => Self(value),
            None => {
                tracing::warn!(total = %self.0, dropped = %other.0, "sum overflowed, amount dropped");
                self
            }
        }
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        match self.0.checked_sub(other.0) {
            Some(value) => Self(value),
            None => {
                tracing::warn!(total = %self.0, dropped = %other.0, "difference overflowed, amount dropped");
                self
            }
        }
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLog {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn with_captured_log<T>(f: impl FnOnce() -> T) -> (T, String) {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        (result, log.contents())
    }

    #[test]
    fn test_overflowing_sum_keeps_total_and_warns() {
        let max = Money::from_decimal(Decimal::MAX);
        let (total, log) = with_captured_log(|| max + Money::from_cents(100));
        assert_eq!(total, max);
        assert!(log.contains("sum overflowed"));
    }

    #[test]
    fn test_overflowing_times_is_zero_and_warns() {
        let max = Money::from_decimal(Decimal::MAX);
        let (value, log) = with_captured_log(|| max.times(Decimal::from(2)));
        assert!(value.is_zero());
        assert!(log.contains("amount overflowed"));
    }

    #[test]
    fn test_regular_sum_is_silent() {
        let (total, log) =
            with_captured_log(|| Money::from_cents(150) + Money::from_cents(250));
        assert_eq!(total, Money::from_cents(400));
        assert!(log.is_empty());
    }

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.amount(), Decimal::new(1050, 2));
        assert_eq!(m.to_string(), "10.50");
    }

    #[test]
    fn test_display_rounds_to_two_places() {
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::from_decimal(Decimal::new(25825, 3)).to_string(), "25.83");
        assert_eq!(Money::from_decimal(Decimal::from(500)).to_string(), "500.00");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap(), Money::from_cents(1050));
        assert_eq!(Money::parse("$10.50").unwrap(), Money::from_cents(1050));
        assert_eq!(Money::parse("SAR 1,250.5").unwrap(), Money::from_cents(125050));
        assert_eq!(Money::parse("-10.50").unwrap(), Money::from_cents(-1050));
        assert_eq!(Money::parse("10").unwrap(), Money::from_cents(1000));
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("").is_err());
        assert!(Money::parse("12x").is_err());
    }

    #[test]
    fn test_parse_rate_lenient() {
        let rate = Money::parse_rate_lenient("50");
        assert_eq!(rate.amount().scale(), 2);
        assert_eq!(rate.amount().to_string(), "50.00");
        assert_eq!(Money::parse_rate_lenient("garbage"), Money::zero());
        assert_eq!(Money::parse_rate_lenient("-4"), Money::zero());
        assert_eq!(Money::parse_rate_lenient("12.345").to_string(), "12.35");
    }

    #[test]
    fn test_times() {
        let rate = Money::from_cents(5000);
        assert_eq!(rate.times(Decimal::from(10)), Money::from_cents(50000));
        assert_eq!(rate.times(Decimal::new(25, 1)), Money::from_cents(12500));
        assert_eq!(Money::from_decimal(Decimal::MAX).times(Decimal::from(2)), Money::zero());
    }

    #[test]
    fn test_sum_and_format() {
        let amounts = vec![
            Money::from_cents(50000),
            Money::from_cents(10000),
            Money::from_cents(25000),
        ];
        let total: Money = amounts.iter().sum();
        assert_eq!(total, Money::from_cents(85000));
        assert_eq!(total.format_with_currency("SAR"), "850.00 SAR");
        assert_eq!(
            Money::from_cents(123456789).format_with_currency("SAR"),
            "1,234,567.89 SAR"
        );
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"10.50\"");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
