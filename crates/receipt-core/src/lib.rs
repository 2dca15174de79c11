//! # receipt-core: Pure Business Logic for Receipt Points
//!
//! This crate is the **heart** of Receipt Points. It contains the schema
//! validator and the points calculator as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Receipt Points Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 receipt-api (axum HTTP server)                  │   │
//! │  │     POST /receipts/process      GET /receipts/{id}/points       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ receipt-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │validation │  │  points   │  │   │
//! │  │   │  Receipt  │  │   Money   │  │  Schema   │  │ calculate │  │   │
//! │  │   │   Item    │  │  parse    │  │ FieldRule │  │ breakdown │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  receipt-db (Database Layer)                    │   │
//! │  │            SQLite receipt + item rows, migrations               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Receipt, Item)
//! - [`money`] - Fixed two-decimal amounts parsed into integer cents
//! - [`validation`] - Declarative schema tables and the generic evaluator
//! - [`points`] - The reward points calculator
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use receipt_core::{calculate_points, validate, Item, Receipt};
//!
//! let receipt = Receipt::new(
//!     "Target",
//!     "2022-01-02",
//!     "13:13",
//!     "1.25",
//!     vec![Item::new("Pepsi - 12-oz", "1.25")],
//! );
//!
//! validate(&receipt).unwrap();
//! assert_eq!(calculate_points(&receipt), 31);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod points;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::Money;
pub use points::{calculate_points, PointsBreakdown};
pub use types::{Item, Receipt};
pub use validation::{validate, Schema};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum number of items a receipt must carry.
pub const MIN_RECEIPT_ITEMS: usize = 1;
