//! # Checkout Engine
//!
//! Runs one checkout as a single atomic unit of work: validate stock,
//! decrement inventory and record the transaction, or change nothing.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout(items)                                                        │
//! │    │                                                                    │
//! │    ├── validate shape (non-empty, qty > 0)   no connection acquired     │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  BEGIN IMMEDIATE ───────────────────────────────────────────────────┐   │
//! │    for each line, in request order:                                 │   │
//! │      read item            → missing?        ItemNotFound            │   │
//! │      tally.add_line       → short?          InsufficientStock       │   │
//! │                           → overflow?       InvalidRequest          │   │
//! │      conditional decrement→ 0 rows?         ConcurrentStockConflict │   │
//! │    insert header (total)  → id                                      │   │
//! │    insert details, stamped with id                                  │   │
//! │  COMMIT ────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Any early return drops the sqlx::Transaction, which rolls back.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repeated item ids in one request are checked against the stock left by
//! the earlier lines, since every read happens after the previous
//! decrement on the same connection.

use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::DbError;
use crate::repository::item::ItemRepository;
use crate::repository::transaction::TransactionRepository;
use kasir_core::checkout::CheckoutTally;
use kasir_core::validation::validate_checkout_items;
use kasir_core::{CheckoutItem, CoreError, Transaction, ValidationError};

// =============================================================================
// Errors
// =============================================================================

/// Every way a checkout can fail. None of them leaves a partial write.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Empty request, non-positive quantity, or a total too large to
    /// represent. Detected before anything is written.
    #[error("Invalid checkout request: {0}")]
    InvalidRequest(#[from] ValidationError),

    #[error("Item not found: {0}")]
    ItemNotFound(i64),

    #[error("Insufficient stock for item {item_id}: available {available}, requested {requested}")]
    InsufficientStock {
        item_id: i64,
        available: i64,
        requested: i64,
    },

    /// Another checkout took the stock between our read and our write.
    /// Transient: the caller may retry the whole checkout.
    #[error("Stock for item {0} changed during checkout, please retry")]
    ConcurrentStockConflict(i64),

    /// The store failed. Not retried by policy.
    #[error("Storage failure: {0}")]
    StorageFailure(#[from] DbError),
}

impl CheckoutError {
    /// True when re-running the same checkout may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CheckoutError::ConcurrentStockConflict(_))
    }
}

impl From<CoreError> for CheckoutError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientStock {
                item_id,
                available,
                requested,
            } => CheckoutError::InsufficientStock {
                item_id,
                available,
                requested,
            },
            CoreError::Validation(e) => CheckoutError::InvalidRequest(e),
        }
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Executes checkouts against the pool.
///
/// Holds no state of its own besides the pool handle, so any number of
/// checkouts may run concurrently; the conditional decrement is what keeps
/// them from overselling.
#[derive(Debug, Clone)]
pub struct CheckoutEngine {
    pool: SqlitePool,
}

impl CheckoutEngine {
    pub fn new(pool: SqlitePool) -> Self {
        CheckoutEngine { pool }
    }

    /// Sells `items` in one atomic step and returns the recorded transaction.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let sale = db
    ///     .checkout_engine()
    ///     .checkout(&[CheckoutItem::new(1, 2), CheckoutItem::new(2, 3)])
    ///     .await?;
    /// assert_eq!(sale.details.len(), 2);
    /// ```
    ///
    /// ## Errors
    /// See [`CheckoutError`]. On any error the store is exactly as it was.
    pub async fn checkout(&self, items: &[CheckoutItem]) -> Result<Transaction, CheckoutError> {
        if let Err(err) = validate_checkout_items(items) {
            warn!(error = %err, "Checkout rejected");
            return Err(err.into());
        }

        debug!(lines = items.len(), "Starting checkout");

        match self.run(items).await {
            Ok(record) => {
                info!(
                    transaction_id = record.id,
                    total_amount = record.total_amount,
                    lines = record.details.len(),
                    "Checkout committed"
                );
                Ok(record)
            }
            Err(err) => {
                warn!(error = %err, retryable = err.is_retryable(), "Checkout rolled back");
                Err(err)
            }
        }
    }

    async fn run(&self, items: &[CheckoutItem]) -> Result<Transaction, CheckoutError> {
        // IMMEDIATE takes the write lock up front, so checkouts queue on the
        // busy timeout instead of failing a read-to-write upgrade. WAL readers
        // are not blocked by it.
        let mut tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(DbError::from)?;

        let mut tally = CheckoutTally::with_capacity(items.len());

        for line in items {
            let item = ItemRepository::fetch_in(&mut tx, line.item_id)
                .await?
                .ok_or(CheckoutError::ItemNotFound(line.item_id))?;

            tally.add_line(&item, line.quantity)?;

            let decremented =
                ItemRepository::decrement_stock_in(&mut tx, line.item_id, line.quantity).await?;
            if !decremented {
                return Err(CheckoutError::ConcurrentStockConflict(line.item_id));
            }
        }

        let created_at = Utc::now();
        let id =
            TransactionRepository::insert_header_in(&mut tx, tally.total().amount(), created_at)
                .await?;

        let record = tally.into_transaction(id, created_at);
        for detail in &record.details {
            TransactionRepository::insert_detail_in(&mut tx, detail).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(record)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
