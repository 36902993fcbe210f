//! # Shop Repository
//!
//! Database operations for shops. Shops are never deleted: bills keep
//! pointing at them forever.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use tally_core::{NewShop, Shop};

/// Repository for shop database operations.
#[derive(Debug, Clone)]
pub struct ShopRepository {
    pool: SqlitePool,
}

impl ShopRepository {
    /// Creates a new ShopRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShopRepository { pool }
    }

    /// Inserts a shop and returns it with its generated id.
    pub async fn create(&self, shop: &NewShop) -> DbResult<Shop> {
        debug!(name = %shop.name, "Inserting shop");

        let created = sqlx::query_as::<_, Shop>(
            r#"
            INSERT INTO shops (name, phone, address)
            VALUES (?1, ?2, ?3)
            RETURNING id, name, phone, address
            "#,
        )
        .bind(&shop.name)
        .bind(&shop.phone)
        .bind(&shop.address)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Replaces every field of an existing shop.
    ///
    /// ## Returns
    /// * `Ok(Shop)` - Updated shop
    /// * `Err(DbError::NotFound)` - Shop doesn't exist
    pub async fn update(&self, id: i64, shop: &NewShop) -> DbResult<Shop> {
        debug!(id = id, name = %shop.name, "Updating shop");

        let updated = sqlx::query_as::<_, Shop>(
            r#"
            UPDATE shops SET
                name = ?2,
                phone = ?3,
                address = ?4
            WHERE id = ?1
            RETURNING id, name, phone, address
            "#,
        )
        .bind(id)
        .bind(&shop.name)
        .bind(&shop.phone)
        .bind(&shop.address)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| DbError::not_found("Shop", id))
    }

    /// Gets a shop by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Shop>> {
        let shop = sqlx::query_as::<_, Shop>(
            r#"
            SELECT id, name, phone, address
            FROM shops
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shop)
    }

    /// Lists all shops in creation order.
    pub async fn list(&self) -> DbResult<Vec<Shop>> {
        let shops = sqlx::query_as::<_, Shop>(
            r#"
            SELECT id, name, phone, address
            FROM shops
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(shops)
    }

    /// Counts all shops (dashboard).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shops")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn new_shop(name: &str) -> NewShop {
        NewShop {
            name: name.to_string(),
            phone: Some("555-0100".to_string()),
            address: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let shop = db.shops().create(&new_shop("Acme")).await.unwrap();
        assert!(shop.id > 0);
        assert_eq!(shop.name, "Acme");
        assert_eq!(shop.phone.as_deref(), Some("555-0100"));
        assert_eq!(shop.address, None);

        let fetched = db.shops().get_by_id(shop.id).await.unwrap();
        assert_eq!(fetched, Some(shop));
    }

    #[tokio::test]
    async fn test_list_in_id_order_and_count() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let a = db.shops().create(&new_shop("Zeta")).await.unwrap();
        let b = db.shops().create(&new_shop("Alpha")).await.unwrap();

        let ids: Vec<i64> = db.shops().list().await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
        assert_eq!(db.shops().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let shop = db.shops().create(&new_shop("Acme")).await.unwrap();

        let edit = NewShop {
            name: "Acme Traders".to_string(),
            phone: None,
            address: Some("1 Main St".to_string()),
        };
        let updated = db.shops().update(shop.id, &edit).await.unwrap();

        assert_eq!(updated.id, shop.id);
        assert_eq!(updated.name, "Acme Traders");
        assert_eq!(updated.phone, None);
        assert_eq!(updated.address.as_deref(), Some("1 Main St"));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db.shops().update(99, &new_shop("Ghost")).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(db.shops().count().await.unwrap(), 0);
    }
}
