//! # Money Module
//!
//! Provides the `Money` type for Turkish lira amounts stored in kuruş.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer kuruş (1 TL = 100 kuruş)                         │
//! │    Latte 85,00 TL  → 8500                                               │
//! │    2 × Latte       → 17000  (exact, always)                             │
//! │                                                                         │
//! │  Only the display layer turns 17000 into "₺170,00".                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Display Format
//! Turkish convention: `.` groups thousands, `,` separates kuruş.
//! `Money::from_kurus(123450)` displays as `₺1.234,50`.
//!
//! ## Usage
//! ```rust
//! use cafe_core::money::Money;
//!
//! let price = Money::from_kurus(4_750);        // 47,50 TL
//! let doubled = price * 2i64;                   // 95,00 TL
//! assert_eq!(doubled.format_try(), "₺95,00");
//! assert_eq!(Money::parse_display("95,00 TL").unwrap(), doubled);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use thiserror::Error;
use ts_rs::TS;

/// Currency symbol used for display.
pub const CURRENCY_SYMBOL: &str = "₺";

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in kuruş (1/100 TRY).
///
/// ## Where Money is Used
/// ```text
/// Product.price_kurus ──► CartItem.unit_price (+ option deltas) ──► line total
///                                                                     │
/// Cart.subtotal ──► PromoCode discount ──► Cart.total ──► Order.total_kurus
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from kuruş.
    ///
    /// ```rust
    /// use cafe_core::money::Money;
    ///
    /// let price = Money::from_kurus(8_500); // 85,00 TL
    /// assert_eq!(price.kurus(), 8_500);
    /// ```
    #[inline]
    pub const fn from_kurus(kurus: i64) -> Self {
        Money(kurus)
    }

    /// Creates a Money value from lira and kuruş parts.
    ///
    /// For negative amounts only the lira part carries the sign:
    /// `from_lira_kurus(-5, 50)` is -5,50 TL.
    #[inline]
    pub const fn from_lira_kurus(lira: i64, kurus: i64) -> Self {
        if lira < 0 {
            Money(lira * 100 - kurus)
        } else {
            Money(lira * 100 + kurus)
        }
    }

    /// Returns the value in kuruş.
    #[inline]
    pub const fn kurus(&self) -> i64 {
        self.0
    }

    /// Returns the whole-lira portion (truncated toward zero).
    #[inline]
    pub const fn lira(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the kuruş portion (always 0-99).
    #[inline]
    pub const fn kurus_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ```rust
    /// use cafe_core::money::Money;
    ///
    /// let simit = Money::from_kurus(1_500);
    /// assert_eq!(simit.multiply_quantity(3).kurus(), 4_500);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Returns `bps` basis points of this amount, rounded half-up.
    ///
    /// 1000 bps = 10%.
    ///
    /// ```rust
    /// use cafe_core::money::Money;
    ///
    /// // 10% of 47,55 TL = 4,755 → 4,76
    /// assert_eq!(Money::from_kurus(4_755).percentage_of(1_000).kurus(), 476);
    /// ```
    pub fn percentage_of(&self, bps: u32) -> Money {
        // i128 so large totals cannot overflow mid-calculation
        let amount = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_kurus(amount as i64)
    }

    /// Applies a percentage discount and returns the discounted amount.
    pub fn apply_percentage_discount(&self, discount_bps: u32) -> Money {
        *self - self.percentage_of(discount_bps)
    }

    /// Returns the smaller of two amounts.
    #[inline]
    pub fn min(self, other: Money) -> Money {
        if self <= other {
            self
        } else {
            other
        }
    }

    /// Formats the amount for display: `₺1.234,50`, `-₺5,50`.
    pub fn format_try(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}{},{:02}",
            sign,
            CURRENCY_SYMBOL,
            group_thousands(self.lira().unsigned_abs()),
            self.kurus_part()
        )
    }

    /// Parses a displayed amount back into kuruş.
    ///
    /// ## Accepted Shapes
    /// ```text
    /// "₺1.234,50"   "1.234,50 TL"   "1234,5"   "12.50"   "-₺5,50"   "85"
    /// ```
    ///
    /// `,` is always the decimal separator. Without a `,`, a single `.`
    /// followed by one or two digits is read as a decimal point, any other
    /// `.` is a thousands separator.
    pub fn parse_display(input: &str) -> Result<Money, ParseMoneyError> {
        let mut s = input.trim();
        let negative = s.starts_with('-');
        if negative {
            s = s[1..].trim_start();
        }
        s = s.strip_prefix(CURRENCY_SYMBOL).unwrap_or(s).trim();
        if let Some(rest) = s.strip_suffix(CURRENCY_SYMBOL) {
            s = rest.trim_end();
        } else if let Some(rest) = strip_tl_suffix(s) {
            s = rest.trim_end();
        }

        if s.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let (whole, fraction) = split_decimal(s)?;

        let whole: String = whole.chars().filter(|c| *c != '.').collect();
        if whole.is_empty() && fraction.is_empty() {
            return Err(ParseMoneyError::Empty);
        }
        if let Some(bad) = whole.chars().chain(fraction.chars()).find(|c| !c.is_ascii_digit()) {
            return Err(ParseMoneyError::InvalidCharacter(bad));
        }
        if fraction.len() > 2 {
            return Err(ParseMoneyError::TooManyDecimals);
        }

        let lira: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| ParseMoneyError::Overflow)?
        };
        let kurus: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| ParseMoneyError::Overflow)? * 10,
            _ => fraction.parse().map_err(|_| ParseMoneyError::Overflow)?,
        };

        let total = lira
            .checked_mul(100)
            .and_then(|v| v.checked_add(kurus))
            .ok_or(ParseMoneyError::Overflow)?;

        Ok(Money(if negative { -total } else { total }))
    }
}

/// `"12 TL"` → `"12 "`, any letter case. `None` when the text does not end
/// in the two ASCII letters.
fn strip_tl_suffix(s: &str) -> Option<&str> {
    let cut = s.len().checked_sub(2)?;
    let tail = s.get(cut..)?;
    tail.eq_ignore_ascii_case("tl").then(|| &s[..cut])
}

/// Splits a numeric string into (whole, fraction) using the rules of
/// [`Money::parse_display`].
fn split_decimal(s: &str) -> Result<(&str, &str), ParseMoneyError> {
    if s.contains(',') {
        let mut parts = s.splitn(2, ',');
        let whole = parts.next().unwrap_or_default();
        let fraction = parts.next().unwrap_or_default();
        if fraction.contains(',') || fraction.contains('.') {
            return Err(ParseMoneyError::InvalidCharacter(','));
        }
        return Ok((whole, fraction));
    }

    if s.matches('.').count() == 1 {
        if let Some((whole, fraction)) = s.split_once('.') {
            if (1..=2).contains(&fraction.len()) {
                return Ok((whole, fraction));
            }
        }
    }

    Ok((s, ""))
}

/// Inserts `.` every three digits from the right.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Errors from [`Money::parse_display`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMoneyError {
    #[error("amount is empty")]
    Empty,

    #[error("unexpected character '{0}' in amount")]
    InvalidCharacter(char),

    #[error("amount has more than two decimal places")]
    TooManyDecimals,

    #[error("amount is too large")]
    Overflow,
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_try())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_kurus() {
        let money = Money::from_kurus(4_750);
        assert_eq!(money.kurus(), 4_750);
        assert_eq!(money.lira(), 47);
        assert_eq!(money.kurus_part(), 50);
    }

    #[test]
    fn test_from_lira_kurus() {
        assert_eq!(Money::from_lira_kurus(85, 0).kurus(), 8_500);
        assert_eq!(Money::from_lira_kurus(-5, 50).kurus(), -550);
    }

    #[test]
    fn test_format_try() {
        assert_eq!(Money::from_kurus(8_500).format_try(), "₺85,00");
        assert_eq!(Money::from_kurus(5).format_try(), "₺0,05");
        assert_eq!(Money::from_kurus(123_450).format_try(), "₺1.234,50");
        assert_eq!(Money::from_kurus(100_000_000).format_try(), "₺1.000.000,00");
        assert_eq!(Money::from_kurus(-550).format_try(), "-₺5,50");
        assert_eq!(Money::zero().to_string(), "₺0,00");
    }

    #[test]
    fn test_parse_display_shapes() {
        assert_eq!(Money::parse_display("₺1.234,50").unwrap().kurus(), 123_450);
        assert_eq!(Money::parse_display("1.234,50 TL").unwrap().kurus(), 123_450);
        assert_eq!(Money::parse_display("85").unwrap().kurus(), 8_500);
        assert_eq!(Money::parse_display("85,5").unwrap().kurus(), 8_550);
        assert_eq!(Money::parse_display("12.50").unwrap().kurus(), 1_250);
        assert_eq!(Money::parse_display("1.250").unwrap().kurus(), 125_000);
        assert_eq!(Money::parse_display("-₺5,50").unwrap().kurus(), -550);
        assert_eq!(Money::parse_display("  40 ₺ ").unwrap().kurus(), 4_000);
    }

    #[test]
    fn test_parse_display_rejects_garbage() {
        assert_eq!(Money::parse_display(""), Err(ParseMoneyError::Empty));
        assert_eq!(Money::parse_display("₺"), Err(ParseMoneyError::Empty));
        assert_eq!(Money::parse_display("12,345"), Err(ParseMoneyError::TooManyDecimals));
        assert_eq!(Money::parse_display("12a"), Err(ParseMoneyError::InvalidCharacter('a')));
        assert!(Money::parse_display("1,2,3").is_err());
        assert!(Money::parse_display("5€").is_err());
        assert!(Money::parse_display("€").is_err());
        assert_eq!(Money::parse_display("5ş"), Err(ParseMoneyError::InvalidCharacter('ş')));
        assert_eq!(Money::parse_display("7 tl").unwrap().kurus(), 700);
        assert_eq!(
            Money::parse_display("99999999999999999999"),
            Err(ParseMoneyError::Overflow)
        );
    }

    #[test]
    fn test_format_parse_round_trip() {
        for kurus in [0, 1, 99, 100, 8_500, 123_456, 99_999_999, -550] {
            let money = Money::from_kurus(kurus);
            assert_eq!(Money::parse_display(&money.format_try()).unwrap(), money);
        }
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_kurus(1_000);
        let b = Money::from_kurus(500);

        assert_eq!((a + b).kurus(), 1_500);
        assert_eq!((a - b).kurus(), 500);
        assert_eq!((a * 3).kurus(), 3_000);

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.kurus(), 2_000);
    }

    #[test]
    fn test_percentage_rounding() {
        // 10% of 100,00 TL
        assert_eq!(Money::from_kurus(10_000).percentage_of(1_000).kurus(), 1_000);
        // 15% of 33,33 TL = 4,9995 → 5,00
        assert_eq!(Money::from_kurus(3_333).percentage_of(1_500).kurus(), 500);
        assert_eq!(
            Money::from_kurus(10_000).apply_percentage_discount(2_500).kurus(),
            7_500
        );
    }

    #[test]
    fn test_min_and_checks() {
        let small = Money::from_kurus(100);
        let big = Money::from_kurus(200);
        assert_eq!(small.min(big), small);
        assert_eq!(big.min(small), small);

        assert!(Money::zero().is_zero());
        assert!(small.is_positive());
        assert!(Money::from_kurus(-1).is_negative());
        assert_eq!(Money::from_kurus(-1).abs().kurus(), 1);
    }
}
