//! # Bill Repository
//!
//! The ledger's storage side: committing carts as bills, returning bill
//! items, and the read queries behind history, dashboard and invoices.
//!
//! ## Transaction Boundaries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  commit_bill(draft)                  return_item(item_id, qty)          │
//! │  ──────────────────                  ─────────────────────────          │
//! │  BEGIN                               BEGIN                              │
//! │   ├─ shop exists?  ──no──► rollback   ├─ load item ──missing──► rollback│
//! │   ├─ INSERT bills                     ├─ plan_return ──invalid─► rollbk │
//! │   ├─ INSERT bill_items × n            ├─ DELETE or UPDATE item          │
//! │  COMMIT                               ├─ SELECT surviving items         │
//! │                                       ├─ UPDATE bills (recomputed)      │
//! │                                      COMMIT                             │
//! │                                                                         │
//! │  Any error drops the transaction, which rolls it back: a bill never    │
//! │  exists without its items, and an item never changes without its bill. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, FixedOffset, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use tally_core::history::{self, BillFilter};
use tally_core::ledger::{self, BillDraft, BillTotals, ReturnAction, ReturnReceipt};
use tally_core::{
    Bill, BillDetails, BillItem, BillLine, BillSummary, CoreError, Money, ValidationError,
};

/// Bill columns with the shop's name, as produced by a LEFT JOIN.
#[derive(Debug, FromRow)]
struct BillSummaryRow {
    #[sqlx(flatten)]
    bill: Bill,
    shop_name: Option<String>,
}

impl From<BillSummaryRow> for BillSummary {
    fn from(row: BillSummaryRow) -> Self {
        BillSummary {
            bill: row.bill,
            shop_name: row.shop_name,
        }
    }
}

/// Bill item columns with the product's current name.
#[derive(Debug, FromRow)]
struct BillLineRow {
    #[sqlx(flatten)]
    item: BillItem,
    product_name: Option<String>,
}

impl From<BillLineRow> for BillLine {
    fn from(row: BillLineRow) -> Self {
        BillLine {
            item: row.item,
            product_name: row.product_name,
        }
    }
}

const SUMMARY_SELECT: &str = r#"
    SELECT
        b.id,
        b.shop_id,
        b.total_amount_cents,
        b.total_cost_cents,
        b.date,
        s.name AS shop_name
    FROM bills b
    LEFT JOIN shops s ON s.id = b.shop_id
"#;

/// Repository for bill and bill item database operations.
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: SqlitePool,
}

impl BillRepository {
    /// Creates a new BillRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BillRepository { pool }
    }

    // =========================================================================
    // Ledger Writes
    // =========================================================================

    /// Persists a bill and all of its items atomically.
    ///
    /// ## Returns
    /// * `Ok(Bill)` - The stored bill with its generated id
    /// * `Err(DbError::Domain(ShopNotFound))` - Shop was deleted or never existed
    /// * `Err(DbError::Domain(Validation))` - Draft has no items
    ///
    /// Nothing is written unless every statement succeeds.
    pub async fn commit_bill(&self, draft: &BillDraft) -> DbResult<Bill> {
        if draft.items.is_empty() {
            return Err(CoreError::from(ValidationError::required("Cart items")).into());
        }

        debug!(
            shop_id = draft.shop_id,
            items = draft.items.len(),
            total = draft.total_amount.cents(),
            "Committing bill"
        );

        let mut tx = self.pool.begin().await?;

        let shop: Option<i64> = sqlx::query_scalar("SELECT id FROM shops WHERE id = ?1")
            .bind(draft.shop_id)
            .fetch_optional(&mut *tx)
            .await?;

        if shop.is_none() {
            return Err(CoreError::ShopNotFound(draft.shop_id).into());
        }

        let bill = sqlx::query_as::<_, Bill>(
            r#"
            INSERT INTO bills (shop_id, total_amount_cents, total_cost_cents, date)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, shop_id, total_amount_cents, total_cost_cents, date
            "#,
        )
        .bind(draft.shop_id)
        .bind(draft.total_amount.cents())
        .bind(draft.total_cost.cents())
        .bind(draft.date)
        .fetch_one(&mut *tx)
        .await?;

        for item in &draft.items {
            sqlx::query(
                r#"
                INSERT INTO bill_items (
                    bill_id, product_id, quantity,
                    price_at_time_cents, cost_at_time_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(bill.id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.price_at_time.cents())
            .bind(item.cost_at_time.cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            bill_id = bill.id,
            shop_id = bill.shop_id,
            total = bill.total_amount_cents,
            "Bill committed"
        );

        Ok(bill)
    }

    /// Returns `return_qty` units of a bill item and rewrites the bill's
    /// aggregates from its surviving items, in one transaction.
    ///
    /// ## Returns
    /// * `Ok(ReturnReceipt)` - Refund and the bill's new totals
    /// * `Err(DbError::Domain(BillItemNotFound))` - Item is gone
    /// * `Err(DbError::Domain(Validation))` - `return_qty` outside `[1, quantity]`
    pub async fn return_item(&self, bill_item_id: i64, return_qty: i64) -> DbResult<ReturnReceipt> {
        debug!(bill_item_id = bill_item_id, return_qty = return_qty, "Returning item");

        let mut tx = self.pool.begin().await?;

        let item = sqlx::query_as::<_, BillItem>(
            r#"
            SELECT id, bill_id, product_id, quantity, price_at_time_cents, cost_at_time_cents
            FROM bill_items
            WHERE id = ?1
            "#,
        )
        .bind(bill_item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CoreError::BillItemNotFound(bill_item_id))?;

        let plan = ledger::plan_return(&item, return_qty)?;

        match plan.action {
            ReturnAction::Remove => {
                sqlx::query("DELETE FROM bill_items WHERE id = ?1")
                    .bind(item.id)
                    .execute(&mut *tx)
                    .await?;
            }
            ReturnAction::Decrement { remaining } => {
                sqlx::query("UPDATE bill_items SET quantity = ?2 WHERE id = ?1")
                    .bind(item.id)
                    .bind(remaining)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        let survivors = sqlx::query_as::<_, BillItem>(
            r#"
            SELECT id, bill_id, product_id, quantity, price_at_time_cents, cost_at_time_cents
            FROM bill_items
            WHERE bill_id = ?1
            "#,
        )
        .bind(item.bill_id)
        .fetch_all(&mut *tx)
        .await?;

        let totals = BillTotals::from_items(&survivors).map_err(CoreError::from)?;

        let result = sqlx::query(
            r#"
            UPDATE bills SET
                total_amount_cents = ?2,
                total_cost_cents = ?3
            WHERE id = ?1
            "#,
        )
        .bind(item.bill_id)
        .bind(totals.total_amount.cents())
        .bind(totals.total_cost.cents())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::BillNotFound(item.bill_id).into());
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let receipt = ReturnReceipt::new(&item, &plan, totals);

        info!(
            bill_id = receipt.bill_id,
            bill_item_id = receipt.bill_item_id,
            returned = receipt.returned_quantity,
            remaining = receipt.remaining_quantity,
            refund = receipt.refund_amount.cents(),
            "Item returned"
        );

        Ok(receipt)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a bill by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Bill>> {
        let bill = sqlx::query_as::<_, Bill>(
            r#"
            SELECT id, shop_id, total_amount_cents, total_cost_cents, date
            FROM bills
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bill)
    }

    /// Gets the current items of a bill, in insertion order.
    pub async fn get_items(&self, bill_id: i64) -> DbResult<Vec<BillItem>> {
        let items = sqlx::query_as::<_, BillItem>(
            r#"
            SELECT id, bill_id, product_id, quantity, price_at_time_cents, cost_at_time_cents
            FROM bill_items
            WHERE bill_id = ?1
            ORDER BY id
            "#,
        )
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Loads a bill with its shop and its current items joined to product
    /// names. Deleted products and shops come back as `None` names.
    ///
    /// ## Returns
    /// * `Err(DbError::Domain(BillNotFound))` - No such bill
    pub async fn bill_details(&self, bill_id: i64) -> DbResult<BillDetails> {
        let bill = self
            .get_by_id(bill_id)
            .await?
            .ok_or(CoreError::BillNotFound(bill_id))?;

        let shop = sqlx::query_as::<_, tally_core::Shop>(
            "SELECT id, name, phone, address FROM shops WHERE id = ?1",
        )
        .bind(bill.shop_id)
        .fetch_optional(&self.pool)
        .await?;

        let lines = sqlx::query_as::<_, BillLineRow>(
            r#"
            SELECT
                i.id,
                i.bill_id,
                i.product_id,
                i.quantity,
                i.price_at_time_cents,
                i.cost_at_time_cents,
                p.name AS product_name
            FROM bill_items i
            LEFT JOIN products p ON p.id = i.product_id
            WHERE i.bill_id = ?1
            ORDER BY i.id
            "#,
        )
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(BillLine::from)
        .collect();

        Ok(BillDetails { bill, shop, lines })
    }

    /// Lists bills newest first (by id) with their shop names, filtered by
    /// shop, local calendar day range and search text.
    ///
    /// The shop criterion is applied in SQL; the day bounds and the search
    /// text depend on the local offset and are applied afterwards.
    pub async fn list_bills(
        &self,
        filter: &BillFilter,
        offset: FixedOffset,
    ) -> DbResult<Vec<BillSummary>> {
        let rows = match filter.shop_id {
            Some(shop_id) => {
                let sql = format!("{SUMMARY_SELECT} WHERE b.shop_id = ?1 ORDER BY b.id DESC");
                sqlx::query_as::<_, BillSummaryRow>(&sql)
                    .bind(shop_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("{SUMMARY_SELECT} ORDER BY b.id DESC");
                sqlx::query_as::<_, BillSummaryRow>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        let summaries: Vec<BillSummary> = rows.into_iter().map(BillSummary::from).collect();
        let matched = filter.apply(summaries, offset);

        debug!(count = matched.len(), "Listed bills");
        Ok(matched)
    }

    /// The `limit` most recent bills (by id) with shop names.
    pub async fn recent_bills(&self, limit: u32) -> DbResult<Vec<BillSummary>> {
        let sql = format!("{SUMMARY_SELECT} ORDER BY b.id DESC LIMIT ?1");

        let rows = sqlx::query_as::<_, BillSummaryRow>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(BillSummary::from).collect())
    }

    /// Σ total_amount of the bills dated in the current local month.
    ///
    /// Only bills on or after the UTC instant of the local month start are
    /// loaded (through `idx_bills_date`). Dates are always written by the
    /// same encoder as the bound parameter, so the text comparison orders
    /// them chronologically.
    pub async fn month_to_date_sales(
        &self,
        now: DateTime<Utc>,
        offset: FixedOffset,
    ) -> DbResult<Money> {
        let since = history::month_start(now, offset);

        let bills = sqlx::query_as::<_, Bill>(
            r#"
            SELECT id, shop_id, total_amount_cents, total_cost_cents, date
            FROM bills
            WHERE date >= ?1
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        debug!(since = %since, bills = bills.len(), "Month-to-date bills loaded");
        Ok(history::month_to_date_sales(&bills, now, offset))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::{Duration, TimeZone};
    use tally_core::cart::Cart;
    use tally_core::ledger::draft_bill;
    use tally_core::{NewProduct, NewShop, Product, Shop};

    async fn setup() -> (Database, Shop, Product) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let shop = db
            .shops()
            .create(&NewShop {
                name: "Acme".to_string(),
                phone: None,
                address: None,
            })
            .await
            .unwrap();

        let widget = db
            .products()
            .create(&NewProduct {
                name: "Widget".to_string(),
                cost_price: Money::from_cents(1000),
                selling_price: Money::from_cents(2500),
            })
            .await
            .unwrap();

        (db, shop, widget)
    }

    async fn sell(db: &Database, shop_id: i64, product: &Product, qty: i64, at: DateTime<Utc>) -> Bill {
        let mut cart = Cart::new();
        cart.add_item(product, qty).unwrap();
        let draft = draft_bill(Some(shop_id), &cart, at).unwrap();
        db.bills().commit_bill(&draft).await.unwrap()
    }

    async fn assert_aggregates_hold(db: &Database, bill_id: i64) {
        let bill = db.bills().get_by_id(bill_id).await.unwrap().unwrap();
        let items = db.bills().get_items(bill_id).await.unwrap();
        let totals = BillTotals::from_items(&items).unwrap();

        assert_eq!(bill.total_amount(), totals.total_amount);
        assert_eq!(bill.total_cost(), totals.total_cost);
    }

    #[tokio::test]
    async fn test_commit_bill() {
        let (db, shop, widget) = setup().await;

        let bill = sell(&db, shop.id, &widget, 3, Utc::now()).await;

        assert_eq!(bill.shop_id, shop.id);
        assert_eq!(bill.total_amount_cents, 7500);
        assert_eq!(bill.total_cost_cents, Some(3000));

        let items = db.bills().get_items(bill.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].price_at_time_cents, 2500);
        assert_eq!(items[0].cost_at_time_cents, Some(1000));
        assert_aggregates_hold(&db, bill.id).await;
    }

    #[tokio::test]
    async fn test_commit_bill_stale_shop_writes_nothing() {
        let (db, _shop, widget) = setup().await;

        let mut cart = Cart::new();
        cart.add_item(&widget, 1).unwrap();
        let draft = draft_bill(Some(999), &cart, Utc::now()).unwrap();

        let err = db.bills().commit_bill(&draft).await.unwrap_err();
        assert!(err.is_not_found());

        let all = db
            .bills()
            .list_bills(&BillFilter::default(), FixedOffset::east_opt(0).unwrap())
            .await
            .unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_survives_price_edit() {
        let (db, shop, widget) = setup().await;
        let bill = sell(&db, shop.id, &widget, 2, Utc::now()).await;

        db.products()
            .update(
                widget.id,
                &NewProduct {
                    name: "Widget".to_string(),
                    cost_price: Money::from_cents(5000),
                    selling_price: Money::from_cents(9900),
                },
            )
            .await
            .unwrap();

        let details = db.bills().bill_details(bill.id).await.unwrap();
        assert_eq!(details.lines[0].item.price_at_time_cents, 2500);
        assert_eq!(details.bill.total_amount_cents, 5000);
    }

    #[tokio::test]
    async fn test_partial_then_full_return() {
        let (db, shop, widget) = setup().await;
        let bill = sell(&db, shop.id, &widget, 3, Utc::now()).await;
        let item_id = db.bills().get_items(bill.id).await.unwrap()[0].id;

        let receipt = db.bills().return_item(item_id, 1).await.unwrap();
        assert_eq!(receipt.bill_id, bill.id);
        assert_eq!(receipt.remaining_quantity, 2);
        assert_eq!(receipt.refund_amount.cents(), 2500);
        assert_eq!(receipt.refund_cost.cents(), 1000);
        assert_eq!(receipt.totals.total_amount.cents(), 5000);
        assert_eq!(receipt.totals.total_cost.cents(), 2000);
        assert_aggregates_hold(&db, bill.id).await;

        let receipt = db.bills().return_item(item_id, 2).await.unwrap();
        assert_eq!(receipt.remaining_quantity, 0);
        assert!(receipt.totals.total_amount.is_zero());
        assert!(db.bills().get_items(bill.id).await.unwrap().is_empty());
        assert_aggregates_hold(&db, bill.id).await;

        // The bill itself survives a full return.
        assert!(db.bills().get_by_id(bill.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_return_rejects_out_of_range_without_writing() {
        let (db, shop, widget) = setup().await;
        let bill = sell(&db, shop.id, &widget, 2, Utc::now()).await;
        let item_id = db.bills().get_items(bill.id).await.unwrap()[0].id;

        for qty in [0, 3, -1] {
            let err = db.bills().return_item(item_id, qty).await.unwrap_err();
            assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
        }

        let items = db.bills().get_items(bill.id).await.unwrap();
        assert_eq!(items[0].quantity, 2);
        assert_eq!(
            db.bills().get_by_id(bill.id).await.unwrap().unwrap().total_amount_cents,
            5000
        );
    }

    #[tokio::test]
    async fn test_return_missing_item() {
        let (db, shop, widget) = setup().await;
        let bill = sell(&db, shop.id, &widget, 1, Utc::now()).await;
        let item_id = db.bills().get_items(bill.id).await.unwrap()[0].id;

        db.bills().return_item(item_id, 1).await.unwrap();
        let err = db.bills().return_item(item_id, 1).await.unwrap_err();

        assert!(matches!(err, DbError::Domain(CoreError::BillItemNotFound(_))));
    }

    #[tokio::test]
    async fn test_return_repairs_legacy_cost() {
        let (db, shop, _widget) = setup().await;

        // A bill written before cost tracking existed.
        let bill_id: i64 = sqlx::query_scalar(
            "INSERT INTO bills (shop_id, total_amount_cents, total_cost_cents, date) VALUES (?1, 1000, NULL, ?2) RETURNING id",
        )
        .bind(shop.id)
        .bind(Utc::now())
        .fetch_one(db.pool())
        .await
        .unwrap();
        let item_id: i64 = sqlx::query_scalar(
            "INSERT INTO bill_items (bill_id, product_id, quantity, price_at_time_cents, cost_at_time_cents) VALUES (?1, 1, 2, 500, NULL) RETURNING id",
        )
        .bind(bill_id)
        .fetch_one(db.pool())
        .await
        .unwrap();

        let receipt = db.bills().return_item(item_id, 1).await.unwrap();
        assert!(receipt.refund_cost.is_zero());

        let bill = db.bills().get_by_id(bill_id).await.unwrap().unwrap();
        assert_eq!(bill.total_amount_cents, 500);
        assert_eq!(bill.total_cost_cents, Some(0));
    }

    #[tokio::test]
    async fn test_bill_details_with_deleted_product() {
        let (db, shop, widget) = setup().await;
        let bill = sell(&db, shop.id, &widget, 1, Utc::now()).await;

        db.products().delete(widget.id).await.unwrap();

        let details = db.bills().bill_details(bill.id).await.unwrap();
        assert_eq!(details.shop_display_name(), "Acme");
        assert_eq!(details.lines.len(), 1);
        assert_eq!(details.lines[0].product_display_name(), "Unknown Product");
        assert_eq!(details.bill.total_amount_cents, 2500);
    }

    #[tokio::test]
    async fn test_bill_details_missing() {
        let (db, _shop, _widget) = setup().await;

        let err = db.bills().bill_details(42).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_bills_newest_first_and_filtered() {
        let (db, acme, widget) = setup().await;
        let globex = db
            .shops()
            .create(&NewShop {
                name: "Globex".to_string(),
                phone: None,
                address: None,
            })
            .await
            .unwrap();
        let utc0 = FixedOffset::east_opt(0).unwrap();
        let day1 = Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();
        let day2 = day1 + Duration::days(1);

        // Inserted out of date order: listing must follow ids, not dates.
        let b1 = sell(&db, acme.id, &widget, 1, day2).await;
        let b2 = sell(&db, globex.id, &widget, 1, day1).await;
        let b3 = sell(&db, acme.id, &widget, 1, day1).await;

        let all = db.bills().list_bills(&BillFilter::default(), utc0).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|s| s.bill.id).collect();
        assert_eq!(ids, vec![b3.id, b2.id, b1.id]);
        assert_eq!(all[1].shop_name.as_deref(), Some("Globex"));

        let by_shop = BillFilter {
            shop_id: Some(acme.id),
            ..BillFilter::default()
        };
        let ids: Vec<i64> = db
            .bills()
            .list_bills(&by_shop, utc0)
            .await
            .unwrap()
            .iter()
            .map(|s| s.bill.id)
            .collect();
        assert_eq!(ids, vec![b3.id, b1.id]);

        let by_day = BillFilter {
            date_start: Some(day1.date_naive()),
            date_end: Some(day1.date_naive()),
            ..BillFilter::default()
        };
        assert_eq!(db.bills().list_bills(&by_day, utc0).await.unwrap().len(), 2);

        let by_search = BillFilter {
            search: Some("glob".to_string()),
            ..BillFilter::default()
        };
        let found = db.bills().list_bills(&by_search, utc0).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].bill.id, b2.id);
    }

    #[tokio::test]
    async fn test_recent_bills_and_month_to_date() {
        let (db, shop, widget) = setup().await;
        let utc0 = FixedOffset::east_opt(0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();

        sell(&db, shop.id, &widget, 4, Utc.with_ymd_and_hms(2024, 2, 28, 12, 0, 0).unwrap()).await;
        for _ in 0..6 {
            sell(&db, shop.id, &widget, 1, now).await;
        }

        let recent = db.bills().recent_bills(5).await.unwrap();
        assert_eq!(recent.len(), 5);
        assert!(recent.windows(2).all(|w| w[0].bill.id > w[1].bill.id));
        assert_eq!(recent[0].shop_display_name(), "Acme");

        let mtd = db.bills().month_to_date_sales(now, utc0).await.unwrap();
        assert_eq!(mtd.cents(), 6 * 2500);
    }

    #[tokio::test]
    async fn test_month_to_date_starts_at_local_midnight() {
        let (db, shop, widget) = setup().await;
        let plus_5 = FixedOffset::east_opt(5 * 3600).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        // 2024-03-01 00:00 at +05:00
        let start = Utc.with_ymd_and_hms(2024, 2, 29, 19, 0, 0).unwrap();
        assert_eq!(history::month_start(now, plus_5), start);

        sell(&db, shop.id, &widget, 1, start - Duration::seconds(1)).await;
        sell(&db, shop.id, &widget, 2, start).await;
        sell(&db, shop.id, &widget, 1, start + Duration::milliseconds(250)).await;
        sell(&db, shop.id, &widget, 5, Utc.with_ymd_and_hms(2024, 1, 31, 23, 0, 0).unwrap()).await;

        let mtd = db.bills().month_to_date_sales(now, plus_5).await.unwrap();
        assert_eq!(mtd.cents(), 3 * 2500);

        let all: Vec<Bill> = db
            .bills()
            .list_bills(&BillFilter::default(), plus_5)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.bill)
            .collect();
        assert_eq!(all.len(), 4);
        assert_eq!(mtd, history::month_to_date_sales(&all, now, plus_5));
    }

    #[tokio::test]
    async fn test_month_to_date_empty_ledger() {
        let (db, _, _) = setup().await;
        let mtd = db
            .bills()
            .month_to_date_sales(Utc::now(), FixedOffset::east_opt(0).unwrap())
            .await
            .unwrap();
        assert!(mtd.is_zero());
    }
}
