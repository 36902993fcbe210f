//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Hard Delete
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DELETE FROM products WHERE id = 7                                      │
//! │                                                                         │
//! │  bill_items.product_id = 7  ── untouched, no FK                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Price and cost were snapshotted at sale time, so bill totals and       │
//! │  invoices stay exact. Only the name is lost: "Unknown Product".         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use tally_core::{NewProduct, Product};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let product = repo.create(&new_product).await?;
/// let all = repo.list().await?;
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

    /// Inserts a product and returns it with its generated id.
    pub async fn create(&self, product: &NewProduct) -> DbResult<Product> {
        debug!(
            name = %product.name,
            selling_price = product.selling_price.cents(),
            "Inserting product"
        );

        let created = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, cost_price_cents, selling_price_cents)
            VALUES (?1, ?2, ?3)
            RETURNING id, name, cost_price_cents, selling_price_cents
            "#,
        )
        .bind(&product.name)
        .bind(product.cost_price.cents())
        .bind(product.selling_price.cents())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Replaces every field of an existing product.
    ///
    /// Historical bill items are not affected: they carry their own price
    /// snapshots.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Updated product
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: i64, product: &NewProduct) -> DbResult<Product> {
        debug!(id = id, name = %product.name, "Updating product");

        let updated = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = ?2,
                cost_price_cents = ?3,
                selling_price_cents = ?4
            WHERE id = ?1
            RETURNING id, name, cost_price_cents, selling_price_cents
            "#,
        )
        .bind(id)
        .bind(&product.name)
        .bind(product.cost_price.cents())
        .bind(product.selling_price.cents())
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product from the catalog.
    ///
    /// ## Returns
    /// * `Ok(())` - Product removed
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found (never existed or deleted)
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, cost_price_cents, selling_price_cents
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists all products in creation order.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, cost_price_cents, selling_price_cents
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Counts products (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
