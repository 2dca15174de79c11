//! # Points Calculator
//!
//! Deterministic reward points for a validated receipt.
//!
//! ## Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Rule                                             Points               │
//! │  ───────────────────────────────────────────────  ─────────────────    │
//! │  1. ASCII letter/digit in retailer                +1 each              │
//! │  2. total cents == 00                             +50                  │
//! │  3. total cents in {00, 25, 50, 75}               +25                  │
//! │  4. every two items                               +5 per pair          │
//! │  5. trimmed description length % 3 == 0           +ceil(price × 0.2)   │
//! │  6. last character of purchaseDate is odd digit   +6                   │
//! │  7. purchaseTime hour is 14 or 15                 +10                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rules 2 and 3 both fire for a round total (75 points). Rule 6 reads the
//! final character of the date string, not the parsed day. Both are kept
//! as-is for compatibility with existing scores.
//!
//! ## Input Contract
//! The receipt must already have passed [`crate::validation::validate`].
//! An amount of the wrong shape scores zero for the rules that need it.
//!
//! Amounts have no upper bound. Rules 2 and 3 read the digits after the
//! point straight from the text, and every sum saturates at `i64::MAX`, so
//! the score is never negative.

use crate::money::{Money, ParseMoneyError};
use crate::types::{Item, Receipt};

/// Points for a round-dollar total.
pub const ROUND_DOLLAR_POINTS: i64 = 50;

/// Points for a total that is a multiple of a quarter.
pub const QUARTER_MULTIPLE_POINTS: i64 = 25;

/// Points per pair of items.
pub const ITEM_PAIR_POINTS: i64 = 5;

/// Rate applied to qualifying item prices, in basis points (20%).
pub const DESCRIPTION_BONUS_RATE_BPS: u32 = 2000;

/// Points for an odd purchase day.
pub const ODD_DAY_POINTS: i64 = 6;

/// Points for a purchase between 14:00 and 15:59.
pub const AFTERNOON_POINTS: i64 = 10;

/// Per-rule contributions to a receipt's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointsBreakdown {
    pub retailer_alphanumerics: i64,
    pub round_dollar: i64,
    pub quarter_multiple: i64,
    pub item_pairs: i64,
    pub item_descriptions: i64,
    pub odd_day: i64,
    pub afternoon: i64,
}

impl PointsBreakdown {
    /// Scores every rule independently.
    pub fn for_receipt(receipt: &Receipt) -> Self {
        let total_fraction = fraction_digits(&receipt.total);

        PointsBreakdown {
            retailer_alphanumerics: receipt
                .retailer
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .count() as i64,
            round_dollar: match total_fraction {
                Some("00") => ROUND_DOLLAR_POINTS,
                _ => 0,
            },
            quarter_multiple: match total_fraction {
                Some("00" | "25" | "50" | "75") => QUARTER_MULTIPLE_POINTS,
                _ => 0,
            },
            item_pairs: ITEM_PAIR_POINTS
                .saturating_mul(i64::try_from(receipt.items.len() / 2).unwrap_or(i64::MAX)),
            item_descriptions: receipt
                .items
                .iter()
                .map(description_bonus)
                .fold(0, i64::saturating_add),
            odd_day: match receipt.purchase_date.chars().last() {
                Some('1' | '3' | '5' | '7' | '9') => ODD_DAY_POINTS,
                _ => 0,
            },
            afternoon: match receipt.purchase_time.get(..2) {
                Some("14" | "15") => AFTERNOON_POINTS,
                _ => 0,
            },
        }
    }

    /// Sum of all rules, saturating at `i64::MAX`.
    pub fn total(&self) -> i64 {
        [
            self.retailer_alphanumerics,
            self.round_dollar,
            self.quarter_multiple,
            self.item_pairs,
            self.item_descriptions,
            self.odd_day,
            self.afternoon,
        ]
        .into_iter()
        .fold(0, i64::saturating_add)
    }
}

/// Calculates the points for a validated receipt.
///
/// ## Example
/// ```rust
/// use receipt_core::{calculate_points, Item, Receipt};
///
/// let receipt = Receipt::new(
///     "M&M Corner Market",
///     "2022-03-20",
///     "14:33",
///     "9.00",
///     vec![Item::new("Gatorade", "2.25"); 4],
/// );
/// assert_eq!(calculate_points(&receipt), 109);
/// ```
pub fn calculate_points(receipt: &Receipt) -> i64 {
    PointsBreakdown::for_receipt(receipt).total()
}

fn description_bonus(item: &Item) -> i64 {
    // `trim` strips Unicode whitespace; descriptions are ASCII after validation.
    let trimmed_len = item.short_description.trim().chars().count();
    if trimmed_len % 3 != 0 {
        return 0;
    }

    match item.price.parse::<Money>() {
        Ok(price) => price.ceil_dollars_at_rate(DESCRIPTION_BONUS_RATE_BPS),
        // Too many digits for i128 cents: the bonus is far past i64 anyway.
        Err(ParseMoneyError::Overflow(_)) => i64::MAX,
        Err(ParseMoneyError::Shape(_)) => 0,
    }
}

/// The two digits after the point of a `digits.dd` amount.
fn fraction_digits(amount: &str) -> Option<&str> {
    amount.rsplit_once('.').map(|(_, fraction)| fraction)
}

// =============================================================================
// Unit Tests
// =============================================================================
