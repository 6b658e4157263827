//! # Product Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! - Substring search on name or category
//! - CRUD operations (hard delete; sale history keeps its own snapshot)
//!
//! ## Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  User types: "bis"                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  pattern = "%bis%"   (%, _ and \ in the query are escaped)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  name LIKE pattern OR category LIKE pattern  (case-insensitive)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Parle-G Biscuits | Snacks   ← name match                              │
//! │  Bourbon          | Biscuits ← category match                          │
//! │                                                                         │
//! │  Newest first (id DESC)                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kiosk_core::{Money, Product, TaxRate};

const PRODUCT_COLUMNS: &str = "id, name, category, price_cents, stock, gst_rate_bps, created_at";

/// A validated product ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price: Money,
    pub stock: i64,
    pub gst_rate: Option<TaxRate>,
}

/// Partial product update. `None` keeps the stored value.
///
/// `gst_rate` is doubly optional: `Some(None)` clears the override so the
/// owner default applies again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Money>,
    pub stock: Option<i64>,
    pub gst_rate: Option<Option<TaxRate>>,
}

impl ProductPatch {
    fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(category) = &self.category {
            product.category = category.clone();
        }
        if let Some(price) = self.price {
            product.price_cents = price.cents();
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(rate) = self.gst_rate {
            product.gst_rate_bps = rate.map(|r| r.bps());
        }
    }
}

/// Escapes LIKE wildcards so user input matches literally.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let results = repo.list(Some("chai")).await?;
/// let product = repo.get_by_id(42).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products, newest first.
    ///
    /// With a non-empty query, only products whose name or category contains
    /// it (case-insensitive) are returned.
    pub async fn list(&self, query: Option<&str>) -> DbResult<Vec<Product>> {
        let pattern = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(like_pattern);

        debug!(pattern = ?pattern, "Listing products");

        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE ?1 IS NULL
               OR name LIKE ?1 ESCAPE '\'
               OR category LIKE ?1 ESCAPE '\'
            ORDER BY id DESC
            "#
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Product list returned");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product and returns it with its assigned id.
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        debug!(name = %product.name, category = %product.category, "Inserting product");

        let created_at = Utc::now();
        let gst_rate_bps = product.gst_rate.map(|r| r.bps());

        let id = sqlx::query(
            r#"
            INSERT INTO products (name, category, price_cents, stock, gst_rate_bps, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price.cents())
        .bind(product.stock)
        .bind(gst_rate_bps)
        .bind(created_at)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(Product {
            id,
            name: product.name.clone(),
            category: product.category.clone(),
            price_cents: product.price.cents(),
            stock: product.stock,
            gst_rate_bps,
            created_at,
        })
    }

    /// Applies a partial update.
    ///
    /// ## Errors
    /// `DbError::NotFound` if the product does not exist.
    pub async fn update(&self, id: i64, patch: &ProductPatch) -> DbResult<Product> {
        debug!(id, ?patch, "Updating product");

        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let mut product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        patch.apply(&mut product);

        sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                category = ?3,
                price_cents = ?4,
                stock = ?5,
                gst_rate_bps = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.gst_rate_bps)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(product)
    }

    /// Deletes a product permanently.
    ///
    /// ## Errors
    /// `DbError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
