//! # Money Module
//!
//! Provides the `Money` type for reading the fixed two-decimal amounts that
//! receipts carry as text (`"12.25"`, `"9.00"`).
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    "12.25" → 1225 cents                                                 │
//! │    price × 0.2, rounded up → ceil(1225 × 2000 / 1_000_000) = 3          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts stay as text everywhere else (wire, validation, storage). Only the
//! points calculator turns them into `Money`.
//!
//! ## Usage
//! ```rust
//! use receipt_core::money::Money;
//!
//! let price: Money = "12.25".parse().unwrap();
//! assert_eq!(price.cents(), 1225);
//! ```

use std::str::FromStr;

use thiserror::Error;

/// `cents × bps / RATE_DIVISOR` is an amount in dollars at a rate.
const RATE_DIVISOR: i128 = 100 * 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A non-negative amount in cents, parsed from a `digits.dd` string.
///
/// Backed by `i128`, so amounts up to 36 dollar digits parse exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i128);

/// Failure to read a `digits.dd` amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMoneyError {
    #[error("amount must have the form <digits>.<two digits>: {0:?}")]
    Shape(String),

    #[error("amount is too large: {0:?}")]
    Overflow(String),
}

impl Money {
    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i128 {
        self.0
    }

    /// Applies a rate in basis points and rounds the result UP to whole
    /// dollars, saturating at `i64::MAX`.
    ///
    /// ## Implementation
    /// `amount × rate` in dollars is `cents × bps / (100 × 10000)`. The
    /// cents are split into whole divisor units and a remainder so the
    /// product never overflows, and the remainder is rounded up exactly:
    /// no float can push `2.0000000001` to 3.
    ///
    /// ## Example
    /// ```rust
    /// use receipt_core::money::Money;
    ///
    /// // $12.25 × 20% = $2.45 → 3
    /// let price: Money = "12.25".parse().unwrap();
    /// assert_eq!(price.ceil_dollars_at_rate(2000), 3);
    /// // $5.00 × 20% = $1.00 → 1
    /// let price: Money = "5.00".parse().unwrap();
    /// assert_eq!(price.ceil_dollars_at_rate(2000), 1);
    /// ```
    pub fn ceil_dollars_at_rate(&self, bps: u32) -> i64 {
        let bps = i128::from(bps);
        let whole = self.0 / RATE_DIVISOR;
        let rest = self.0 % RATE_DIVISOR;
        let rest_dollars = (rest * bps + RATE_DIVISOR - 1) / RATE_DIVISOR;

        whole
            .checked_mul(bps)
            .and_then(|d| d.checked_add(rest_dollars))
            .and_then(|d| i64::try_from(d).ok())
            .unwrap_or(i64::MAX)
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    /// Parses exactly `<one or more ASCII digits>.<two ASCII digits>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let shape = || ParseMoneyError::Shape(s.to_string());

        let (major, minor) = s.split_once('.').ok_or_else(shape)?;
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if major.is_empty() || minor.len() != 2 || !all_digits(major) || !all_digits(minor) {
            return Err(shape());
        }

        let overflow = || ParseMoneyError::Overflow(s.to_string());
        let major: i128 = major.parse().map_err(|_| overflow())?;
        let minor: i128 = minor.parse().map_err(|_| shape())?;

        major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .map(Money)
            .ok_or_else(overflow)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
