//! # Item Repository
//!
//! Database operations for the inventory ledger.
//!
//! ## Key Operations
//! - CRUD for the catalogue
//! - Case-insensitive name filter
//! - The conditional stock decrement used by checkout
//!
//! ## Conditional Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UPDATE items SET stock = stock - :qty                                  │
//! │  WHERE id = :id AND stock >= :qty                                       │
//! │                                                                         │
//! │  1 row  → decremented, stock still >= 0                                 │
//! │  0 rows → someone else took the stock since we read it                  │
//! │                                                                         │
//! │  The guard lives in the same statement as the write, so no reader ever  │
//! │  sees a negative level regardless of how checkouts interleave.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasir_core::{Item, NewItem};

/// Repository for item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ItemRepository::new(pool);
///
/// let all = repo.list(None).await?;
/// let item = repo.get_by_id(1).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Lists items ordered by id.
    ///
    /// ## Arguments
    /// * `name` - Optional case-insensitive substring filter. Blank means no
    ///   filter. `%` and `_` are matched literally.
    pub async fn list(&self, name: Option<&str>) -> DbResult<Vec<Item>> {
        let pattern = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(|n| format!("%{}%", escape_like(n)));

        debug!(filter = ?pattern, "Listing items");

        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, price, stock
            FROM items
            WHERE ?1 IS NULL OR name LIKE ?1 ESCAPE '\'
            ORDER BY id
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = items.len(), "Listed items");
        Ok(items)
    }

    /// Gets an item by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Item))` - Item found
    /// * `Ok(None)` - Item not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            "SELECT id, name, price, stock FROM items WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Inserts a new item and returns it with its store-assigned id.
    ///
    /// The payload is expected to be validated already; the table's CHECK
    /// constraints reject anything that slipped through.
    pub async fn insert(&self, item: &NewItem) -> DbResult<Item> {
        debug!(name = %item.name, price = item.price, stock = item.stock, "Inserting item");

        let created = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (name, price, stock)
            VALUES (?1, ?2, ?3)
            RETURNING id, name, price, stock
            "#,
        )
        .bind(item.name.trim())
        .bind(item.price)
        .bind(item.stock)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Replaces name, price and stock of an existing item.
    ///
    /// ## Returns
    /// * `Ok(Item)` - The updated row
    /// * `Err(DbError::NotFound)` - Item doesn't exist
    pub async fn update(&self, id: i64, item: &NewItem) -> DbResult<Item> {
        debug!(id = id, "Updating item");

        let updated = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items SET
                name = ?2,
                price = ?3,
                stock = ?4
            WHERE id = ?1
            RETURNING id, name, price, stock
            "#,
        )
        .bind(id)
        .bind(item.name.trim())
        .bind(item.price)
        .bind(item.stock)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| DbError::not_found("Item", id))
    }

    /// Deletes an item.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Item doesn't exist
    /// * `Err(DbError::ForeignKeyViolation)` - Item appears in a recorded
    ///   transaction and must stay for the history to remain valid
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting item");

        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }

    /// Counts all items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // In-transaction primitives
    // =========================================================================

    /// Point read of an item on the given connection.
    pub async fn fetch_in(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            "SELECT id, name, price, stock FROM items WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(item)
    }

    /// Decrements stock by `quantity` only if at least that much is on hand.
    ///
    /// ## Returns
    /// * `Ok(true)` - Exactly one row was decremented
    /// * `Ok(false)` - The guard failed (or the item vanished)
    /// * `Err(DbError::Busy)` - The write lock was not granted in time
    pub async fn decrement_stock_in(
        conn: &mut SqliteConnection,
        id: i64,
        quantity: i64,
    ) -> DbResult<bool> {
        debug!(id = id, quantity = quantity, "Decrementing stock");

        let result = sqlx::query(
            r#"
            UPDATE items
            SET stock = stock - ?2
            WHERE id = ?1 AND stock >= ?2
            "#,
        )
        .bind(id)
        .bind(quantity)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

/// Escapes LIKE wildcards so user input is matched literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn new_item(name: &str, price: i64, stock: i64) -> NewItem {
        NewItem {
            name: name.to_string(),
            price,
            stock,
        }
    }

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.items();
        repo.insert(&new_item("Indomie Goreng", 3500, 100)).await.unwrap();
        repo.insert(&new_item("Teh Botol Sosro", 5000, 50)).await.unwrap();
        repo.insert(&new_item("Aqua 600ml", 4000, 200)).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let db = seeded().await;
        let items = db.items().list(None).await.unwrap();

        assert_eq!(items.len(), 3);
        assert!(items.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(items[0].name, "Indomie Goreng");
        assert_eq!(db.items().count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_list_filters_by_name_case_insensitively() {
        let db = seeded().await;

        let hits = db.items().list(Some("TEH")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Teh Botol Sosro");

        let all = db.items().list(Some("   ")).await.unwrap();
        assert_eq!(all.len(), 3);

        let none = db.items().list(Some("100%")).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_get_update_delete() {
        let db = seeded().await;
        let repo = db.items();

        let aqua = repo.list(Some("aqua")).await.unwrap().remove(0);
        assert_eq!(repo.get_by_id(aqua.id).await.unwrap(), Some(aqua.clone()));

        let updated = repo
            .update(aqua.id, &new_item("Aqua 1500ml", 6000, 20))
            .await
            .unwrap();
        assert_eq!(updated.id, aqua.id);
        assert_eq!(updated.price, 6000);

        repo.delete(aqua.id).await.unwrap();
        assert_eq!(repo.get_by_id(aqua.id).await.unwrap(), None);
        assert!(matches!(
            repo.delete(aqua.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_missing_item_is_not_found() {
        let db = seeded().await;
        let result = db.items().update(999, &new_item("Ghost", 1, 1)).await;

        assert!(matches!(result, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_negative_stock_rejected_by_schema() {
        let db = seeded().await;
        let result = db.items().insert(&new_item("Broken", 1000, -1)).await;

        assert!(result.is_err());
        assert_eq!(db.items().count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_conditional_decrement() {
        let db = seeded().await;
        let mut conn = db.pool().acquire().await.unwrap();

        assert!(ItemRepository::decrement_stock_in(&mut conn, 2, 50).await.unwrap());
        assert!(!ItemRepository::decrement_stock_in(&mut conn, 2, 1).await.unwrap());
        assert!(!ItemRepository::decrement_stock_in(&mut conn, 999, 1).await.unwrap());

        let teh = ItemRepository::fetch_in(&mut conn, 2).await.unwrap().unwrap();
        assert_eq!(teh.stock, 0);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("teh"), "teh");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
