//! # Error Types
//!
//! Domain-specific error types for receipt-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  receipt-core errors (this file)                                       │
//! │  └── ValidationError  - Schema rule violations                         │
//! │                                                                         │
//! │  receipt-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  receipt-api errors (in app)                                           │
//! │  ├── ServiceError     - submit / lookup boundary                       │
//! │  └── ApiError         - What HTTP clients see (serialized)             │
//! │                                                                         │
//! │  Flow: ValidationError → ServiceError → ApiError → Client              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The field name travels with the error so it can be logged. Clients only
//! ever see a single opaque "invalid receipt" message.

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Schema validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A text field does not match its declared pattern.
    #[error("{field} does not match pattern {pattern}")]
    PatternMismatch { field: String, pattern: String },

    /// A sequence field has fewer elements than required.
    #[error("{field} must contain at least {min} element(s), found {actual}")]
    TooFew {
        field: String,
        min: usize,
        actual: usize,
    },

    /// An element of a sequence field failed its own schema.
    #[error("{field}[{index}]: {source}")]
    Element {
        field: String,
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },

    /// A rule was declared against a field of the wrong shape.
    ///
    /// ## When This Occurs
    /// - `pattern` declared on a sequence field
    /// - `min_count` declared on a text field
    #[error("{field} cannot be checked with a {rule} rule")]
    RuleMismatch { field: String, rule: &'static str },
}

impl ValidationError {
    /// Name of the top-level field that failed.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::PatternMismatch { field, .. }
            | ValidationError::TooFew { field, .. }
            | ValidationError::Element { field, .. }
            | ValidationError::RuleMismatch { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
