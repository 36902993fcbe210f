//! End-to-end ledger scenario: a shop buys three widgets, returns one, then
//! returns the rest. After every step the bill's cached aggregates must equal
//! the sums over its surviving items.

use chrono::{FixedOffset, Utc};
use tally_core::cart::Cart;
use tally_core::history::BillFilter;
use tally_core::invoice::InvoiceDocument;
use tally_core::ledger::{draft_bill, BillTotals};
use tally_core::validation::{validate_product, validate_shop, ProductInput, ShopInput};
use tally_db::{Database, DbConfig};

async fn assert_invariant(db: &Database, bill_id: i64) {
    let bill = db.bills().get_by_id(bill_id).await.unwrap().unwrap();
    let items = db.bills().get_items(bill_id).await.unwrap();
    let totals = BillTotals::from_items(&items).unwrap();

    assert_eq!(bill.total_amount(), totals.total_amount);
    assert_eq!(bill.total_cost(), totals.total_cost);
}

#[tokio::test]
async fn sell_then_return_in_two_steps() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();

    let shop = db
        .shops()
        .create(
            &validate_shop(&ShopInput {
                name: "Acme".to_string(),
                ..ShopInput::default()
            })
            .unwrap(),
        )
        .await
        .unwrap();

    let widget = db
        .products()
        .create(
            &validate_product(&ProductInput {
                name: "Widget".to_string(),
                cost_price: "10".to_string(),
                selling_price: "25".to_string(),
            })
            .unwrap(),
        )
        .await
        .unwrap();

    // Buy 3
    let mut cart = Cart::new();
    cart.add_item(&widget, 3).unwrap();
    let draft = draft_bill(Some(shop.id), &cart, Utc::now()).unwrap();
    let bill = db.bills().commit_bill(&draft).await.unwrap();

    assert_eq!(bill.total_amount().cents(), 7500);
    assert_eq!(bill.total_cost().cents(), 3000);
    assert_invariant(&db, bill.id).await;

    let item_id = db.bills().get_items(bill.id).await.unwrap()[0].id;

    // Return 1
    let receipt = db.bills().return_item(item_id, 1).await.unwrap();
    assert_eq!(receipt.remaining_quantity, 2);
    assert_eq!(receipt.totals.total_amount.cents(), 5000);
    assert_eq!(receipt.totals.total_cost.cents(), 2000);
    assert_invariant(&db, bill.id).await;

    let invoice =
        InvoiceDocument::project(&db.bills().bill_details(bill.id).await.unwrap()).unwrap();
    assert_eq!(invoice.rows.len(), 1);
    assert_eq!(invoice.rows[0].quantity, 2);
    assert_eq!(invoice.grand_total.cents(), 5000);
    assert_eq!(invoice.file_name(), format!("Invoice_{}_Acme.pdf", bill.id));

    // Return the remaining 2
    let receipt = db.bills().return_item(item_id, 2).await.unwrap();
    assert_eq!(receipt.remaining_quantity, 0);
    assert!(db.bills().get_items(bill.id).await.unwrap().is_empty());
    assert_invariant(&db, bill.id).await;

    let bill = db.bills().get_by_id(bill.id).await.unwrap().unwrap();
    assert_eq!(bill.total_amount_cents, 0);
    assert_eq!(bill.total_cost_cents, Some(0));

    // A fully returned bill stays in history.
    let history = db
        .bills()
        .list_bills(&BillFilter::default(), FixedOffset::east_opt(0).unwrap())
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].shop_display_name(), "Acme");
}

#[tokio::test]
async fn rejected_commit_leaves_store_untouched() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();

    // No shop selected
    let err = draft_bill(None, &Cart::new(), Utc::now()).unwrap_err();
    assert!(!err.is_not_found());

    let recent = db.bills().recent_bills(5).await.unwrap();
    assert!(recent.is_empty());
}
