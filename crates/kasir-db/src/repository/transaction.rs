//! # Transaction Repository
//!
//! Persistence for completed checkouts.
//!
//! Records are append-only: this repository can insert and read, but
//! never updates or deletes a transaction or its details.
//!
//! ## Schema
//! ```text
//! transactions (id, total_amount, created_at)
//!      ▲
//!      │ transaction_id
//! transaction_details (id, transaction_id, item_id, item_name,
//!                      unit_price, quantity, subtotal)
//! ```
//! Details are read back ordered by their own id, which is the order the
//! checkout inserted them in: the order the lines were requested.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use kasir_core::{Transaction, TransactionDetail};

/// Header row as stored, before details are attached.
#[derive(Debug, FromRow)]
struct TransactionRow {
    id: i64,
    total_amount: i64,
    created_at: DateTime<Utc>,
}

/// Repository for transaction records.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Gets a transaction with all its details.
    ///
    /// ## Returns
    /// * `Ok(Some(Transaction))` - Found, details in request order
    /// * `Ok(None)` - No transaction with that id
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Transaction>> {
        let header = sqlx::query_as::<_, TransactionRow>(
            "SELECT id, total_amount, created_at FROM transactions WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        let details = sqlx::query_as::<_, TransactionDetail>(
            r#"
            SELECT transaction_id, item_id, item_name, unit_price, quantity, subtotal
            FROM transaction_details
            WHERE transaction_id = ?1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        debug!(id = id, details = details.len(), "Loaded transaction");

        Ok(Some(Transaction {
            id: header.id,
            total_amount: header.total_amount,
            created_at: header.created_at,
            details,
        }))
    }

    /// Counts recorded transactions.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // In-transaction primitives
    // =========================================================================

    /// Inserts a transaction header and returns its store-assigned id.
    pub async fn insert_header_in(
        conn: &mut SqliteConnection,
        total_amount: i64,
        created_at: DateTime<Utc>,
    ) -> DbResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO transactions (total_amount, created_at)
            VALUES (?1, ?2)
            RETURNING id
            "#,
        )
        .bind(total_amount)
        .bind(created_at)
        .fetch_one(&mut *conn)
        .await?;

        debug!(id = id, total_amount = total_amount, "Inserted transaction header");
        Ok(id)
    }

    /// Inserts one detail line. `detail.transaction_id` must already be set.
    pub async fn insert_detail_in(
        conn: &mut SqliteConnection,
        detail: &TransactionDetail,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO transaction_details (
                transaction_id, item_id, item_name, unit_price, quantity, subtotal
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(detail.transaction_id)
        .bind(detail.item_id)
        .bind(&detail.item_name)
        .bind(detail.unit_price)
        .bind(detail.quantity)
        .bind(detail.subtotal)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::{Database, DbConfig};
    use kasir_core::NewItem;

    #[tokio::test]
    async fn test_missing_transaction_is_none() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert_eq!(db.transactions().get_by_id(1).await.unwrap(), None);
        assert_eq!(db.transactions().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_header_and_details_round_trip_in_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for (name, price) in [("Aqua 600ml", 4000), ("Indomie Goreng", 3500)] {
            db.items()
                .insert(&NewItem {
                    name: name.to_string(),
                    price,
                    stock: 10,
                })
                .await
                .unwrap();
        }

        let mut tx = db.pool().begin().await.unwrap();
        let id = TransactionRepository::insert_header_in(&mut tx, 11500, Utc::now())
            .await
            .unwrap();
        // Deliberately not in item id order.
        for (item_id, name, price, qty) in [(2, "Indomie Goreng", 3500, 1), (1, "Aqua 600ml", 4000, 2)] {
            let detail = TransactionDetail {
                transaction_id: id,
                item_id,
                item_name: name.to_string(),
                unit_price: price,
                quantity: qty,
                subtotal: price * qty,
            };
            TransactionRepository::insert_detail_in(&mut tx, &detail)
                .await
                .unwrap();
        }
        tx.commit().await.unwrap();

        let stored = db.transactions().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.total_amount, 11500);
        assert_eq!(stored.details.len(), 2);
        assert_eq!(stored.details[0].item_id, 2);
        assert_eq!(stored.details[1].item_id, 1);
        assert_eq!(stored.details[1].subtotal, 8000);
    }

    #[tokio::test]
    async fn test_detail_requires_existing_header() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let orphan = TransactionDetail {
            transaction_id: 42,
            item_id: 1,
            item_name: "Nothing".to_string(),
            unit_price: 1,
            quantity: 1,
            subtotal: 1,
        };
        let result = TransactionRepository::insert_detail_in(&mut conn, &orphan).await;

        assert!(matches!(result, Err(DbError::ForeignKeyViolation { .. })));
    }
}
