//! # receipt-api: HTTP Server for Receipt Points
//!
//! Accepts receipts over HTTP, stores them, and answers points lookups.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Receipt API Server                               │
//! │                                                                         │
//! │  Client ──► axum Router (routes.rs)                                    │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │            ReceiptService (service.rs)                                 │
//! │             │            │             │                                │
//! │             ▼            ▼             ▼                                │
//! │         validate    ReceiptRepository  calculate_points                │
//! │       (receipt-core)  (receipt-db)     (receipt-core)                  │
//! │                                                                         │
//! │  Failures ──► ApiError (error.rs) ──► {"status_code","message"}        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Environment configuration
//! - [`service`] - Submit/lookup boundary
//! - [`routes`] - HTTP handlers and router
//! - [`error`] - HTTP error projection

pub mod config;
pub mod error;
pub mod routes;
pub mod service;

pub use config::{ApiConfig, ConfigError};
pub use error::ApiError;
pub use routes::{build_router, AppState};
pub use service::{ReceiptService, ServiceError};
