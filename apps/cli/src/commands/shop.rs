//! # Shop Commands
//!
//! Shops are the customers bills are issued to. They can be created and
//! edited but never deleted, so history always resolves their names.
//!
//! ## Edit Flow
//! ```text
//! shop edit 3 --phone 011-555
//!      │
//!      ▼
//! shop_form(&existing) ──► ShopInput (prefilled, as the edit modal)
//!      │
//!      ▼ overlay given flags
//! update_shop(3, &input) ──► validate_shop ──► ShopRepository::update
//! ```

use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::DbState;
use tally_core::validation::{validate_shop, ShopInput};
use tally_core::Shop;

/// Raw form values for an existing shop.
pub fn shop_form(shop: &Shop) -> ShopInput {
    ShopInput {
        name: shop.name.clone(),
        phone: shop.phone.clone().unwrap_or_default(),
        address: shop.address.clone().unwrap_or_default(),
    }
}

/// Lists all shops in creation order.
pub async fn list_shops(db: &DbState) -> Result<Vec<Shop>, ApiError> {
    debug!("list_shops command");
    Ok(db.inner().shops().list().await?)
}

/// Gets a single shop.
pub async fn get_shop(db: &DbState, id: i64) -> Result<Shop, ApiError> {
    debug!(id = id, "get_shop command");
    db.inner()
        .shops()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Shop", id))
}

/// Creates a shop from raw form input.
///
/// ## Returns
/// * `Ok(Shop)` - The stored shop with its new id
/// * `Err(ValidationError)` - Name missing or too long; nothing stored
pub async fn create_shop(db: &DbState, input: &ShopInput) -> Result<Shop, ApiError> {
    let shop = validate_shop(input)?;
    let created = db.inner().shops().create(&shop).await?;

    info!(id = created.id, name = %created.name, "Shop created");
    Ok(created)
}

/// Replaces a shop's fields from raw form input.
pub async fn update_shop(db: &DbState, id: i64, input: &ShopInput) -> Result<Shop, ApiError> {
    let shop = validate_shop(input)?;
    let updated = db.inner().shops().update(id, &shop).await?;

    info!(id = updated.id, name = %updated.name, "Shop updated");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::test_state;
    use crate::error::ErrorCode;

    fn input(name: &str, phone: &str) -> ShopInput {
        ShopInput {
            name: name.to_string(),
            phone: phone.to_string(),
            address: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let state = test_state().await;

        let shop = create_shop(&state.db, &input("  Acme ", "011-1")).await.unwrap();
        assert_eq!(shop.name, "Acme");
        assert_eq!(shop.phone.as_deref(), Some("011-1"));
        assert_eq!(shop.address, None);

        let shops = list_shops(&state.db).await.unwrap();
        assert_eq!(shops, vec![shop]);
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let state = test_state().await;

        let err = create_shop(&state.db, &input("   ", "")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Shop name is required");
        assert!(list_shops(&state.db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_through_form() {
        let state = test_state().await;
        let shop = create_shop(&state.db, &input("Acme", "011-1")).await.unwrap();

        let mut form = shop_form(&shop);
        form.phone = String::new();
        let updated = update_shop(&state.db, shop.id, &form).await.unwrap();

        assert_eq!(updated.name, "Acme");
        assert_eq!(updated.phone, None);
    }

    #[tokio::test]
    async fn test_missing_shop() {
        let state = test_state().await;

        let err = get_shop(&state.db, 99).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = update_shop(&state.db, 99, &input("X", "")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
