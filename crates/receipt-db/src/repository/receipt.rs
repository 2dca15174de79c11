//! # Receipt Repository
//!
//! Atomic persistence of a receipt together with its items.
//!
//! ## Write / Read Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Receipt Persistence                               │
//! │                                                                         │
//! │  insert(receipt)                                                       │
//! │     └── BEGIN                                                          │
//! │     └── INSERT receipts row                                            │
//! │     └── INSERT items row × N (position 0..N)                           │
//! │     └── COMMIT  (any failure: ROLLBACK, nothing visible)               │
//! │                                                                         │
//! │  get_by_id(id)                                                         │
//! │     └── BEGIN  (one snapshot for both queries)                         │
//! │     └── SELECT receipts row ── none? → Ok(None)                        │
//! │     └── SELECT items ORDER BY position                                 │
//! │     └── COMMIT                                                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A reader therefore sees either the whole receipt with every item, or
//! nothing at all.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use receipt_core::{Item, Receipt};

/// Row shape of the `receipts` table.
#[derive(Debug, sqlx::FromRow)]
struct ReceiptRow {
    id: String,
    retailer: String,
    purchase_date: String,
    purchase_time: String,
    total: String,
}

/// Row shape of the `items` table, as read back for a receipt.
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    short_description: String,
    price: String,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            short_description: row.short_description,
            price: row.price,
        }
    }
}

/// Repository for receipt database operations.
#[derive(Debug, Clone)]
pub struct ReceiptRepository {
    pool: SqlitePool,
}

impl ReceiptRepository {
    /// Creates a new ReceiptRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReceiptRepository { pool }
    }

    /// Stores a receipt and all of its items in one transaction.
    ///
    /// The receipt must already carry its id, which is returned on success.
    /// Items are stored with their submission index so reads return them in
    /// the same order.
    ///
    /// ## Errors
    /// - `DbError::UniqueViolation` if the id is already taken
    /// - any other `DbError` on storage failure; nothing is persisted
    pub async fn insert(&self, receipt: &Receipt) -> DbResult<String> {
        if !receipt.has_id() {
            return Err(DbError::Internal("Receipt has no id".to_string()));
        }

        debug!(id = %receipt.id, items = receipt.items.len(), "Inserting receipt");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO receipts (
                id, retailer, purchase_date, purchase_time, total, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&receipt.id)
        .bind(&receipt.retailer)
        .bind(&receipt.purchase_date)
        .bind(&receipt.purchase_time)
        .bind(&receipt.total)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        for (position, item) in receipt.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO items (
                    id, receipt_id, position, short_description, price
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(generate_item_id())
            .bind(&receipt.id)
            .bind(position as i64)
            .bind(&item.short_description)
            .bind(&item.price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %receipt.id, items = receipt.items.len(), "Receipt stored");
        Ok(receipt.id.clone())
    }

    /// Gets a receipt and its items by ID.
    ///
    /// Returns `Ok(None)` when no receipt has that id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Receipt>> {
        let mut tx = self.pool.begin().await?;

        let row: Option<ReceiptRow> = sqlx::query_as(
            r#"
            SELECT id, retailer, purchase_date, purchase_time, total
            FROM receipts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            debug!(id = %id, "Receipt not found");
            return Ok(None);
        };

        let items: Vec<ItemRow> = sqlx::query_as(
            r#"
            SELECT short_description, price
            FROM items
            WHERE receipt_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(Some(Receipt {
            id: row.id,
            retailer: row.retailer,
            purchase_date: row.purchase_date,
            purchase_time: row.purchase_time,
            total: row.total,
            items: items.into_iter().map(Item::from).collect(),
        }))
    }

    /// Number of stored receipts.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM receipts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Generates a new item ID.
///
/// Item ids are internal: they never leave the store.
pub fn generate_item_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn memory_repo() -> (Database, ReceiptRepository) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.receipts();
        (db, repo)
    }

    fn sample(items: Vec<Item>) -> Receipt {
        Receipt::new("Target", "2022-01-01", "13:01", "35.35", items).with_generated_id()
    }

    #[tokio::test]
    async fn test_insert_then_read_back() {
        let (_db, repo) = memory_repo().await;
        let receipt = sample(vec![
            Item::new("Mountain Dew 12PK", "6.49"),
            Item::new("Emils Cheese Pizza", "12.25"),
        ]);

        let id = repo.insert(&receipt).await.unwrap();
        assert_eq!(id, receipt.id);

        let loaded = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(loaded, receipt);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_id_is_none() {
        let (_db, repo) = memory_repo().await;
        assert!(repo.get_by_id("does-not-exist").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_item_order_preserved() {
        let (_db, repo) = memory_repo().await;
        let items: Vec<Item> = (0..12)
            .map(|i| Item::new(format!("item {i}"), format!("{i}.00")))
            .collect();
        let receipt = sample(items.clone());

        repo.insert(&receipt).await.unwrap();

        let loaded = repo.get_by_id(&receipt.id).await.unwrap().unwrap();
        assert_eq!(loaded.items, items);
    }

    #[tokio::test]
    async fn test_values_stored_verbatim() {
        let (_db, repo) = memory_repo().await;
        let receipt = sample(vec![Item::new("   Klarbrunn 12-PK 12 FL OZ  ", "12.00")]);

        repo.insert(&receipt).await.unwrap();

        let loaded = repo.get_by_id(&receipt.id).await.unwrap().unwrap();
        assert_eq!(loaded.items[0].short_description, "   Klarbrunn 12-PK 12 FL OZ  ");
        assert_eq!(loaded.total, "35.35");
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let (_db, repo) = memory_repo().await;
        let receipt = sample(vec![Item::new("Dasani", "1.40")]);

        repo.insert(&receipt).await.unwrap();
        let err = repo.insert(&receipt).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_id_rejected() {
        let (_db, repo) = memory_repo().await;
        let receipt = Receipt::new("Target", "2022-01-01", "13:01", "1.00", vec![]);

        assert!(matches!(
            repo.insert(&receipt).await,
            Err(DbError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_item_rolls_back_whole_receipt() {
        let (db, repo) = memory_repo().await;
        sqlx::query(
            r#"
            CREATE TRIGGER reject_boom BEFORE INSERT ON items
            WHEN NEW.short_description = 'boom'
            BEGIN
                SELECT RAISE(ABORT, 'boom');
            END
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        let receipt = sample(vec![
            Item::new("fine", "1.00"),
            Item::new("also fine", "2.00"),
            Item::new("boom", "3.00"),
        ]);

        assert!(repo.insert(&receipt).await.is_err());

        assert!(repo.get_by_id(&receipt.id).await.unwrap().is_none());
        let orphan_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphan_items, 0);
    }

    #[tokio::test]
    async fn test_closed_pool_reports_connection_failure() {
        let (db, repo) = memory_repo().await;
        db.close().await;

        assert!(matches!(
            repo.insert(&sample(vec![Item::new("a", "1.00")])).await,
            Err(DbError::ConnectionFailed(_))
        ));
        assert!(matches!(
            repo.get_by_id("anything").await,
            Err(DbError::ConnectionFailed(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("receipts.db")).max_connections(4))
            .await
            .unwrap();

        let receipts: Vec<Receipt> = (0..8)
            .map(|n| {
                let items = (0..5)
                    .map(|i| Item::new(format!("writer {n} item {i}"), format!("{n}.{i}0")))
                    .collect();
                sample(items)
            })
            .collect();

        let mut handles = Vec::new();
        for receipt in receipts.clone() {
            let repo = db.receipts();
            handles.push(tokio::spawn(async move { repo.insert(&receipt).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let repo = db.receipts();
        for receipt in &receipts {
            let loaded = repo.get_by_id(&receipt.id).await.unwrap().unwrap();
            assert_eq!(&loaded, receipt);
        }
        assert_eq!(repo.count().await.unwrap(), 8);
        db.close().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reads_see_complete_receipts() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("receipts.db")).max_connections(4))
            .await
            .unwrap();

        let receipt = sample((0..20).map(|i| Item::new(format!("i{i}"), "1.00")).collect());
        let id = receipt.id.clone();

        let writer = {
            let repo = db.receipts();
            tokio::spawn(async move { repo.insert(&receipt).await })
        };

        let mut readers = Vec::new();
        for _ in 0..4 {
            let repo = db.receipts();
            let id = id.clone();
            readers.push(tokio::spawn(async move {
                for _ in 0..20 {
                    if let Some(found) = repo.get_by_id(&id).await.unwrap() {
                        assert_eq!(found.items.len(), 20);
                    }
                    tokio::task::yield_now().await;
                }
            }));
        }

        writer.await.unwrap().unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
        db.close().await;
    }
}
