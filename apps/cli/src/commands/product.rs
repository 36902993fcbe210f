//! # Product Commands
//!
//! Catalog maintenance. Prices are entered as text and parsed leniently:
//! anything unparseable counts as zero, which then fails the positive
//! selling price rule instead of erroring on the number itself.

use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::DbState;
use tally_core::validation::{validate_product, ProductInput};
use tally_core::Product;

/// Raw form values for an existing product.
pub fn product_form(product: &Product) -> ProductInput {
    ProductInput {
        name: product.name.clone(),
        cost_price: product.cost_price().to_string(),
        selling_price: product.selling_price().to_string(),
    }
}

/// Lists the catalog in creation order.
pub async fn list_products(db: &DbState) -> Result<Vec<Product>, ApiError> {
    debug!("list_products command");
    Ok(db.inner().products().list().await?)
}

/// Gets a single product.
pub async fn get_product(db: &DbState, id: i64) -> Result<Product, ApiError> {
    debug!(id = id, "get_product command");
    db.inner()
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))
}

/// Creates a product from raw form input.
pub async fn create_product(db: &DbState, input: &ProductInput) -> Result<Product, ApiError> {
    let product = validate_product(input)?;
    let created = db.inner().products().create(&product).await?;

    info!(
        id = created.id,
        name = %created.name,
        selling_price = created.selling_price_cents,
        "Product created"
    );
    Ok(created)
}

/// Replaces a product's fields. Existing bills keep their price snapshots.
pub async fn update_product(
    db: &DbState,
    id: i64,
    input: &ProductInput,
) -> Result<Product, ApiError> {
    let product = validate_product(input)?;
    let updated = db.inner().products().update(id, &product).await?;

    info!(id = updated.id, name = %updated.name, "Product updated");
    Ok(updated)
}

/// Removes a product from the catalog. Bill items that reference it stay
/// and show as "Unknown Product".
pub async fn delete_product(db: &DbState, id: i64) -> Result<(), ApiError> {
    db.inner().products().delete(id).await?;

    info!(id = id, "Product deleted");
    Ok(())
}
