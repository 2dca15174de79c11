//! # Domain Types
//!
//! Core domain types used throughout Receipt Points.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────┐              │
//! │  │       Receipt        │ 1    n │        Item          │              │
//! │  │  ──────────────────  │───────►│  ──────────────────  │              │
//! │  │  id (UUID, server)   │        │  short_description   │              │
//! │  │  retailer            │        │  price ("1.25")      │              │
//! │  │  purchase_date       │        └──────────────────────┘              │
//! │  │  purchase_time       │                                               │
//! │  │  total ("9.00")      │                                               │
//! │  │  items               │                                               │
//! │  └──────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Text-Typed Amounts
//! `total` and `price` stay strings. The schema validates their shape as
//! text and only the points calculator parses them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Item
// =============================================================================

/// One line entry on a receipt.
///
/// Items have no identity of their own; the storage row id is never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Description printed on the receipt line.
    pub short_description: String,

    /// Price as a `digits.dd` string.
    pub price: String,
}

impl Item {
    /// Creates an item.
    pub fn new(short_description: impl Into<String>, price: impl Into<String>) -> Self {
        Item {
            short_description: short_description.into(),
            price: price.into(),
        }
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// A submitted purchase receipt.
///
/// ## Wire Shape
/// ```json
/// {
///   "retailer": "M&M Corner Market",
///   "purchaseDate": "2022-03-20",
///   "purchaseTime": "14:33",
///   "items": [{ "shortDescription": "Gatorade", "price": "2.25" }],
///   "total": "9.00"
/// }
/// ```
/// `id` is assigned by the server and never read from or written to JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Server-generated identifier (UUID v4). Empty until assigned.
    #[serde(skip)]
    pub id: String,

    /// Store name.
    pub retailer: String,

    /// `YYYY-MM-DD`.
    pub purchase_date: String,

    /// `HH:MM`, 24-hour.
    pub purchase_time: String,

    /// Total as a `digits.dd` string.
    pub total: String,

    /// Line items in submission order.
    pub items: Vec<Item>,
}

impl Receipt {
    /// Creates a receipt without an identifier.
    pub fn new(
        retailer: impl Into<String>,
        purchase_date: impl Into<String>,
        purchase_time: impl Into<String>,
        total: impl Into<String>,
        items: Vec<Item>,
    ) -> Self {
        Receipt {
            id: String::new(),
            retailer: retailer.into(),
            purchase_date: purchase_date.into(),
            purchase_time: purchase_time.into(),
            total: total.into(),
            items,
        }
    }

    /// Assigns a fresh UUID v4 identifier.
    pub fn with_generated_id(mut self) -> Self {
        self.id = generate_receipt_id();
        self
    }

    /// Whether the server has assigned an identifier yet.
    #[inline]
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Generates a new receipt ID.
pub fn generate_receipt_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
