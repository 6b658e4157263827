//! # Sale Repository
//!
//! Atomic billing and receipt lookup.
//!
//! ## create_sale Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    create_sale (one SQLite transaction)                 │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │   │                                                                     │
//! │   ├── ensure owner row, read default GST rate                          │
//! │   ├── load every referenced product                                    │
//! │   ├── kiosk_core::billing::price_order()  ── error? ──► drop = ROLLBACK│
//! │   ├── INSERT sales (totals, date, payment mode)                        │
//! │   ├── UPDATE sales SET invoice_no = 'INV-' || id (zero-padded)         │
//! │   ├── INSERT sale_items (snapshots)                                    │
//! │   └── UPDATE products SET stock = MAX(0, stock - qty)                  │
//! │   │                                                                     │
//! │  COMMIT                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The invoice number derives from the row id SQLite assigns inside the
//! write transaction, and `invoice_no` is UNIQUE. Two concurrent bills can
//! never share a number.

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::owner::{ensure_owner_row, fetch_owner};
use kiosk_core::billing::{price_order, OrderLine};
use kiosk_core::{PaymentMode, Product, Sale, SaleItem, TaxRate};

/// A sale together with its lines.
#[derive(Debug, Clone)]
pub struct SaleReceipt {
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Validates, prices and records a sale, decrementing stock.
    ///
    /// ## Arguments
    /// * `lines` - Requested lines (product, qty, optional price override)
    /// * `payment_mode` - How the bill was settled
    /// * `date` - Local calendar date to record
    /// * `default_rate` - Owner default used if the profile row is created here
    ///
    /// ## Errors
    /// - `DbError::Core(..)` for any billing rule violation; nothing is written
    /// - `DbError::TransactionFailed` for any storage failure; nothing is written
    pub async fn create_sale(
        &self,
        lines: &[OrderLine],
        payment_mode: PaymentMode,
        date: NaiveDate,
        default_rate: TaxRate,
    ) -> DbResult<SaleReceipt> {
        debug!(lines = lines.len(), %payment_mode, "Creating sale");

        self.record_sale(lines, payment_mode, date, default_rate)
            .await
            .map_err(DbError::into_transaction_failure)
    }

    async fn record_sale(
        &self,
        lines: &[OrderLine],
        payment_mode: PaymentMode,
        date: NaiveDate,
        default_rate: TaxRate,
    ) -> DbResult<SaleReceipt> {
        let mut tx = self.pool.begin().await?;

        ensure_owner_row(&mut tx, default_rate).await?;
        let owner_rate = fetch_owner(&mut tx).await?.default_gst_rate();

        let mut catalog: HashMap<i64, Product> = HashMap::new();
        for line in lines {
            if catalog.contains_key(&line.product_id) {
                continue;
            }
            let product = sqlx::query_as::<_, Product>(
                r#"
                SELECT id, name, category, price_cents, stock, gst_rate_bps, created_at
                FROM products
                WHERE id = ?1
                "#,
            )
            .bind(line.product_id)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(product) = product {
                catalog.insert(product.id, product);
            }
        }

        // Any rule violation returns here; dropping `tx` rolls back
        let order = price_order(lines, &catalog, owner_rate)?;

        let sale_id = sqlx::query(
            r#"
            INSERT INTO sales (date, subtotal_cents, gst_cents, grand_total_cents, payment_mode)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(date)
        .bind(order.totals.subtotal.cents())
        .bind(order.totals.gst.cents())
        .bind(order.totals.grand_total.cents())
        .bind(payment_mode)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        let invoice_no = Sale::invoice_number_for(sale_id);
        sqlx::query("UPDATE sales SET invoice_no = ?1 WHERE id = ?2")
            .bind(&invoice_no)
            .bind(sale_id)
            .execute(&mut *tx)
            .await?;

        let mut items = Vec::with_capacity(order.lines.len());
        for line in &order.lines {
            let item_id = sqlx::query(
                r#"
                INSERT INTO sale_items (sale_id, product_id, name, qty, price_cents, gst_rate_bps)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(sale_id)
            .bind(line.product_id)
            .bind(&line.name)
            .bind(line.qty)
            .bind(line.unit_price.cents())
            .bind(line.gst_rate.bps())
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

            sqlx::query("UPDATE products SET stock = MAX(0, stock - ?1) WHERE id = ?2")
                .bind(line.qty)
                .bind(line.product_id)
                .execute(&mut *tx)
                .await?;

            items.push(SaleItem {
                id: item_id,
                sale_id,
                product_id: line.product_id,
                name: line.name.clone(),
                qty: line.qty,
                price_cents: line.unit_price.cents(),
                gst_rate_bps: line.gst_rate.bps(),
            });
        }

        tx.commit().await?;

        info!(
            sale_id,
            invoice_no = %invoice_no,
            grand_total = %order.totals.grand_total,
            "Sale recorded"
        );

        Ok(SaleReceipt {
            sale: Sale {
                id: sale_id,
                date,
                subtotal_cents: order.totals.subtotal.cents(),
                gst_cents: order.totals.gst.cents(),
                grand_total_cents: order.totals.grand_total.cents(),
                payment_mode,
                invoice_no,
            },
            items,
        })
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, date, subtotal_cents, gst_cents, grand_total_cents, payment_mode, invoice_no
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets all items for a sale, in entry order.
    pub async fn get_items(&self, sale_id: i64) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, name, qty, price_cents, gst_rate_bps
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets a sale with its items, for reprinting a receipt.
    pub async fn get_receipt(&self, id: i64) -> DbResult<Option<SaleReceipt>> {
        let Some(sale) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let items = self.get_items(sale.id).await?;
        Ok(Some(SaleReceipt { sale, items }))
    }

    /// Counts recorded sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
