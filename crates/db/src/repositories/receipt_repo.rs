//! Repository for the `receipts` and `line_items` tables.

use chrono::Utc;
use sqlx::SqlitePool;

use receiptvault_core::types::DbId;

use crate::models::receipt::{
    CreateReceipt, LineItemRow, Receipt, ReceiptFilter, SpendingTotals,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, bill_id, vendor, category, date, subtotal, tax, amount, created_at";

/// Provides CRUD operations for receipts.
pub struct ReceiptRepo;

impl ReceiptRepo {
    /// Insert a receipt and its line items in one transaction.
    pub async fn create(pool: &SqlitePool, input: &CreateReceipt) -> Result<Receipt, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO receipts
                (bill_id, vendor, category, date, subtotal, tax, amount, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        let receipt = sqlx::query_as::<_, Receipt>(&query)
            .bind(&input.bill_id)
            .bind(&input.vendor)
            .bind(&input.category)
            .bind(&input.date)
            .bind(input.subtotal)
            .bind(input.tax)
            .bind(input.amount)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

        for item in &input.items {
            sqlx::query(
                "INSERT INTO line_items (receipt_id, name, quantity, price)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(receipt.id)
            .bind(&item.name)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(bill_id = %receipt.bill_id, "Receipt stored");
        Ok(receipt)
    }

    /// Point read for duplicate detection: does a bill id already exist?
    pub async fn exists(pool: &SqlitePool, bill_id: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM receipts WHERE bill_id = ?)")
            .bind(bill_id)
            .fetch_one(pool)
            .await
    }

    /// Find a receipt by its business identifier.
    pub async fn find_by_bill_id(
        pool: &SqlitePool,
        bill_id: &str,
    ) -> Result<Option<Receipt>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM receipts WHERE bill_id = ?");
        sqlx::query_as::<_, Receipt>(&query)
            .bind(bill_id)
            .fetch_optional(pool)
            .await
    }

    /// List receipts, newest first, applying the dashboard's substring
    /// filters. Numeric columns filter on their text rendering.
    pub async fn list(
        pool: &SqlitePool,
        filter: &ReceiptFilter,
    ) -> Result<Vec<Receipt>, sqlx::Error> {
        let mut sql = format!("SELECT {COLUMNS} FROM receipts WHERE 1 = 1");
        let mut binds: Vec<String> = Vec::new();

        if let Some(bill_id) = &filter.bill_id {
            sql.push_str(" AND bill_id LIKE ?");
            binds.push(format!("%{bill_id}%"));
        }
        if let Some(vendor) = &filter.vendor {
            sql.push_str(" AND vendor LIKE ?");
            binds.push(format!("%{vendor}%"));
        }
        if let Some(subtotal) = &filter.subtotal {
            sql.push_str(" AND CAST(subtotal AS TEXT) LIKE ?");
            binds.push(format!("%{subtotal}%"));
        }
        if let Some(tax) = &filter.tax {
            sql.push_str(" AND CAST(tax AS TEXT) LIKE ?");
            binds.push(format!("%{tax}%"));
        }
        if let Some(amount) = &filter.amount {
            sql.push_str(" AND CAST(amount AS TEXT) LIKE ?");
            binds.push(format!("%{amount}%"));
        }
        sql.push_str(" ORDER BY date DESC, id DESC");

        let mut query = sqlx::query_as::<_, Receipt>(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        query.fetch_all(pool).await
    }

    /// List receipts within an inclusive date range, oldest first.
    ///
    /// ISO dates compare correctly as text; either bound may be omitted.
    pub async fn list_between(
        pool: &SqlitePool,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<Receipt>, sqlx::Error> {
        let mut sql = format!("SELECT {COLUMNS} FROM receipts WHERE 1 = 1");
        let mut binds: Vec<&str> = Vec::new();

        if let Some(start) = start {
            sql.push_str(" AND date >= ?");
            binds.push(start);
        }
        if let Some(end) = end {
            sql.push_str(" AND date <= ?");
            binds.push(end);
        }
        sql.push_str(" ORDER BY date ASC, id ASC");

        let mut query = sqlx::query_as::<_, Receipt>(&sql);
        for bind in &binds {
            query = query.bind(*bind);
        }
        query.fetch_all(pool).await
    }

    /// Delete one receipt by bill id. Returns whether a row was removed.
    pub async fn delete_by_bill_id(
        pool: &SqlitePool,
        bill_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM receipts WHERE bill_id = ?")
            .bind(bill_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a batch of receipts by bill id. Returns the number removed.
    pub async fn delete_many(pool: &SqlitePool, bill_ids: &[String]) -> Result<u64, sqlx::Error> {
        if bill_ids.is_empty() {
            return Ok(0);
        }

        let placeholders = vec!["?"; bill_ids.len()].join(", ");
        let sql = format!("DELETE FROM receipts WHERE bill_id IN ({placeholders})");

        let mut query = sqlx::query(&sql);
        for bill_id in bill_ids {
            query = query.bind(bill_id);
        }
        let result = query.execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Store-wide spend totals for the dashboard header.
    pub async fn totals(pool: &SqlitePool) -> Result<SpendingTotals, sqlx::Error> {
        sqlx::query_as::<_, SpendingTotals>(
            "SELECT COALESCE(SUM(amount), 0.0) AS total_spend,
                    COALESCE(SUM(tax), 0.0)    AS total_tax,
                    COUNT(*)                   AS receipt_count
             FROM receipts",
        )
        .fetch_one(pool)
        .await
    }

    /// Line items for one receipt, in insertion order.
    pub async fn list_items(
        pool: &SqlitePool,
        receipt_id: DbId,
    ) -> Result<Vec<LineItemRow>, sqlx::Error> {
        sqlx::query_as::<_, LineItemRow>(
            "SELECT id, receipt_id, name, quantity, price
             FROM line_items
             WHERE receipt_id = ?
             ORDER BY id ASC",
        )
        .bind(receipt_id)
        .fetch_all(pool)
        .await
    }
}
