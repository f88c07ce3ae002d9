//! # Repository Module
//!
//! Database repository implementations for Kasir POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │  db.items().list(Some("teh"))                                  │
//! │       ▼                                                                 │
//! │  ItemRepository                      (pool-backed, one query per call) │
//! │  ├── list / get_by_id / count                                          │
//! │  ├── insert / update / delete                                          │
//! │  └── fetch_in / decrement_stock_in   (inside a checkout transaction)   │
//! │                                                                         │
//! │  TransactionRepository                                                 │
//! │  ├── get_by_id / count                                                 │
//! │  └── insert_header_in / insert_detail_in                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Functions with an `_in` suffix take a `&mut SqliteConnection` instead of
//! using the pool, so the checkout engine can run them inside one
//! `sqlx::Transaction`. Nothing outside [`crate::checkout`] calls them.

pub mod item;
pub mod transaction;
