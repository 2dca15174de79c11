//! # Receipt Service
//!
//! The submit/lookup boundary that composes validation, storage and scoring.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  submit(receipt)                                                       │
//! │     └── validate ── rejected? → ServiceError::Validation               │
//! │     └── assign fresh id                                                │
//! │     └── store (one transaction) ── failed? → ServiceError::Storage     │
//! │     └── Ok(id)                                                         │
//! │                                                                         │
//! │  lookup(id)                                                            │
//! │     └── read ── absent? → ServiceError::NotFound                       │
//! │     └── calculate points                                               │
//! │     └── Ok(points)                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Points are recomputed from the stored receipt on every lookup.

use receipt_core::{validate, PointsBreakdown, Receipt, ValidationError};
use receipt_db::{Database, DbError};
use thiserror::Error;
use tracing::{debug, warn};

/// Failures at the submit/lookup boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The receipt broke a schema rule.
    #[error("Receipt is invalid: {0}")]
    Validation(#[from] ValidationError),

    /// No receipt has the given id.
    #[error("No receipt found for id {0}")]
    NotFound(String),

    /// The store failed.
    #[error("Storage failure: {0}")]
    Storage(#[from] DbError),
}

/// Submit and lookup operations over a receipt store.
#[derive(Debug, Clone)]
pub struct ReceiptService {
    db: Database,
}

impl ReceiptService {
    /// Creates a service backed by the given database.
    pub fn new(db: Database) -> Self {
        ReceiptService { db }
    }

    /// The backing database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Validates and stores a receipt, returning its new id.
    ///
    /// Any id already present on `receipt` is replaced. Nothing is stored
    /// when validation fails.
    pub async fn submit(&self, receipt: Receipt) -> Result<String, ServiceError> {
        if let Err(e) = validate(&receipt) {
            warn!(field = %e.field(), error = %e, "Receipt rejected");
            return Err(e.into());
        }

        let receipt = receipt.with_generated_id();
        let id = self.db.receipts().insert(&receipt).await?;

        Ok(id)
    }

    /// Returns the points for a previously submitted receipt.
    pub async fn lookup(&self, id: &str) -> Result<i64, ServiceError> {
        let receipt = self
            .db
            .receipts()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;

        let breakdown = PointsBreakdown::for_receipt(&receipt);
        let points = breakdown.total();
        debug!(id = %id, points, ?breakdown, "Points calculated");

        Ok(points)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
