//! # Repository Module
//!
//! Database repository implementations for the receipt store.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ReceiptService                                                        │
//! │       │                                                                 │
//! │       │  db.receipts().insert(&receipt)                                │
//! │       ▼                                                                 │
//! │  ReceiptRepository                                                     │
//! │  ├── insert(&self, receipt)     one write transaction                  │
//! │  ├── get_by_id(&self, id)       one read transaction                   │
//! │  └── count(&self)                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod receipt;
