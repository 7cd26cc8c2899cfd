//! # Operator Session
//!
//! `PosSession` owns the catalog, the floor and the bill ledger for one
//! register. It is the only entry point a front end needs.
//!
//! ## Operator Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  select_table ──► add_product_to_table ──► generate_bill ──► mark_paid  │
//! │       │           set_item_quantity             │               │       │
//! │       │           remove_item_from_table        ▼               ▼       │
//! │       │           set_item_notes             Billing        Available   │
//! │       │           set_table_customer_name                               │
//! │       ▼                  │                                              │
//! │   selected_table()       ▼                                              │
//! │   (looked up fresh    Occupied                                          │
//! │    on every call)                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every method runs to completion before returning and hands back a clone of
//! the changed entity so the caller can re-render. On error nothing changed.

use tableside_core::order_lines::{self, find_line};
use tableside_core::{
    Bill, BillingWorkflow, Catalog, CoreError, CoreResult, ErrorKind, FloorSummary, OptionKey,
    OrderLine, OrderTotals, PricingEngine, Product, Table, TableStore,
};
use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::error::{ApiError, ApiResult, ConfigError};

/// In-memory state of one register.
#[derive(Debug, Clone)]
pub struct PosSession {
    catalog: Catalog,
    tables: TableStore,
    billing: BillingWorkflow,
    selected_table_id: Option<String>,
}

impl PosSession {
    pub fn new(catalog: Catalog, table_count: u32, pricing: PricingEngine) -> CoreResult<Self> {
        Ok(PosSession {
            catalog,
            tables: TableStore::with_tables(table_count)?,
            billing: BillingWorkflow::new(pricing),
            selected_table_id: None,
        })
    }

    /// Builds a session from loaded configuration.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ConfigError> {
        let catalog = config.load_catalog()?;
        let session = PosSession::new(
            catalog,
            config.floor.table_count,
            config.pricing_engine(),
        )?;

        info!(
            tables = config.floor.table_count,
            products = session.catalog.list_products().len(),
            tax_rate_bps = config.pricing.tax_rate_bps,
            "Session ready"
        );
        Ok(session)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn list_tables(&self) -> &[Table] {
        self.tables.list_tables()
    }

    pub fn list_products(&self) -> &[Product] {
        self.catalog.list_products()
    }

    pub fn categories(&self) -> Vec<&str> {
        self.catalog.categories()
    }

    pub fn floor_summary(&self) -> FloorSummary {
        self.tables.summary()
    }

    /// Subtotal, tax and total of a table's current order.
    pub fn order_totals(&self, table_id: &str) -> ApiResult<OrderTotals> {
        let table = self
            .tables
            .select_table(table_id)
            .map_err(|e| reject("order_totals", e))?;
        Ok(self.billing.pricing().order_totals(&table.items))
    }

    pub fn bills(&self) -> &[Bill] {
        self.billing.bills()
    }

    pub fn bill(&self, bill_id: &str) -> ApiResult<Bill> {
        self.billing
            .bill(bill_id)
            .cloned()
            .map_err(|e| reject("bill", e))
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Makes a table the operator's current table.
    pub fn select_table(&mut self, table_id: &str) -> ApiResult<Table> {
        debug!(table_id = %table_id, "select_table");
        let table = self
            .tables
            .select_table(table_id)
            .cloned()
            .map_err(|e| reject("select_table", e))?;
        self.selected_table_id = Some(table.id.clone());
        Ok(table)
    }

    /// The selected table as it is now, never a stale copy.
    pub fn selected_table(&self) -> Option<&Table> {
        self.selected_table_id
            .as_deref()
            .and_then(|id| self.tables.select_table(id).ok())
    }

    pub fn clear_selection(&mut self) {
        self.selected_table_id = None;
    }

    // =========================================================================
    // Order Lines
    // =========================================================================

    /// Adds one unit of a product with the given options to a table.
    ///
    /// Adding the same product with the same options again increments the
    /// existing line; option order does not matter.
    pub fn add_product_to_table(
        &mut self,
        table_id: &str,
        product_id: &str,
        option_ids: &[String],
    ) -> ApiResult<Table> {
        debug!(table_id = %table_id, product_id = %product_id, options = ?option_ids, "add_product_to_table");

        self.add_line(table_id, product_id, option_ids)
            .map_err(|e| reject("add_product_to_table", e))
    }

    fn add_line(
        &mut self,
        table_id: &str,
        product_id: &str,
        option_ids: &[String],
    ) -> CoreResult<Table> {
        self.tables.select_table(table_id)?;
        let product = self.catalog.product(product_id)?;
        let options = Catalog::resolve_options(product, option_ids)?;
        change_lines(&mut self.tables, &mut self.billing, table_id, |lines| {
            order_lines::add_item(lines, product, &options)
        })
    }

    /// Sets a line's quantity. Zero or less removes the line.
    pub fn set_item_quantity(
        &mut self,
        table_id: &str,
        product_id: &str,
        option_ids: &[String],
        quantity: i64,
    ) -> ApiResult<Table> {
        debug!(table_id = %table_id, product_id = %product_id, options = ?option_ids, quantity, "set_item_quantity");

        let key = OptionKey::from_ids(option_ids);
        change_lines(&mut self.tables, &mut self.billing, table_id, |lines| {
            order_lines::set_quantity(lines, product_id, &key, quantity)
        })
        .map_err(|e| reject("set_item_quantity", e))
    }

    pub fn remove_item_from_table(
        &mut self,
        table_id: &str,
        product_id: &str,
        option_ids: &[String],
    ) -> ApiResult<Table> {
        debug!(table_id = %table_id, product_id = %product_id, options = ?option_ids, "remove_item_from_table");

        let key = OptionKey::from_ids(option_ids);
        change_lines(&mut self.tables, &mut self.billing, table_id, |lines| {
            Ok(order_lines::remove_item(lines, product_id, &key))
        })
        .map_err(|e| reject("remove_item_from_table", e))
    }

    /// Sets or clears the kitchen note on a line.
    pub fn set_item_notes(
        &mut self,
        table_id: &str,
        product_id: &str,
        option_ids: &[String],
        notes: Option<&str>,
    ) -> ApiResult<Table> {
        debug!(table_id = %table_id, product_id = %product_id, "set_item_notes");

        let key = OptionKey::from_ids(option_ids);
        change_lines(&mut self.tables, &mut self.billing, table_id, |lines| {
            Ok(order_lines::set_notes(lines, product_id, &key, notes))
        })
        .map_err(|e| reject("set_item_notes", e))
    }

    /// Finds a line on a table by product and options.
    pub fn find_item(
        &self,
        table_id: &str,
        product_id: &str,
        option_ids: &[String],
    ) -> ApiResult<Option<OrderLine>> {
        let table = self
            .tables
            .select_table(table_id)
            .map_err(|e| reject("find_item", e))?;
        let key = OptionKey::from_ids(option_ids);
        Ok(find_line(&table.items, product_id, &key).cloned())
    }

    pub fn set_table_customer_name(
        &mut self,
        table_id: &str,
        name: Option<&str>,
    ) -> ApiResult<Table> {
        debug!(table_id = %table_id, name = ?name, "set_table_customer_name");
        self.tables
            .set_customer_name(table_id, name)
            .cloned()
            .map_err(|e| reject("set_table_customer_name", e))
    }

    // =========================================================================
    // Billing
    // =========================================================================

    /// Issues a bill for a table's current order.
    pub fn generate_bill(&mut self, table_id: &str) -> ApiResult<Bill> {
        debug!(table_id = %table_id, "generate_bill");
        let superseded = self
            .billing
            .pending_bill_for(&self.tables, table_id)
            .map(|b| b.id.clone());
        let bill = self
            .billing
            .generate_bill(&mut self.tables, table_id)
            .map_err(|e| reject("generate_bill", e))?;

        info!(
            bill_id = %bill.id,
            table_id = %bill.table_id,
            lines = bill.items.len(),
            total = %bill.total,
            superseded = ?superseded,
            "Bill generated"
        );
        Ok(bill)
    }

    /// Settles a bill. Paying a bill twice returns it unchanged.
    pub fn mark_bill_paid(&mut self, bill_id: &str) -> ApiResult<Bill> {
        debug!(bill_id = %bill_id, "mark_bill_paid");
        let bill = self
            .billing
            .mark_paid(&mut self.tables, bill_id)
            .map_err(|e| reject("mark_bill_paid", e))?;

        let table_cleared = self
            .tables
            .select_table(&bill.table_id)
            .map(Table::is_empty)
            .unwrap_or(false);
        if table_cleared && self.selected_table_id.as_deref() == Some(bill.table_id.as_str()) {
            self.selected_table_id = None;
        }

        info!(bill_id = %bill.id, table_id = %bill.table_id, total = %bill.total, "Bill paid");
        Ok(bill)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Adds or replaces a menu product. Lines already placed keep their copy.
    pub fn upsert_product(&mut self, product: Product) -> ApiResult<Product> {
        debug!(product_id = %product.id, "upsert_product");
        self.catalog
            .upsert_product(product.clone())
            .map_err(|e| reject("upsert_product", e))?;
        Ok(product)
    }

    pub fn remove_product(&mut self, product_id: &str) -> ApiResult<Product> {
        debug!(product_id = %product_id, "remove_product");
        self.catalog
            .remove_product(product_id)
            .map_err(|e| reject("remove_product", e))
    }
}

/// Computes a table's new lines from its current ones and swaps them in.
/// Goes through the billing ledger so an emptied table drops its bill.
fn change_lines<F>(
    tables: &mut TableStore,
    billing: &mut BillingWorkflow,
    table_id: &str,
    f: F,
) -> CoreResult<Table>
where
    F: FnOnce(&[OrderLine]) -> CoreResult<Vec<OrderLine>>,
{
    let new_lines = f(&tables.select_table(table_id)?.items)?;
    billing.apply_item_change(tables, table_id, new_lines).cloned()
}

/// Logs a rejected operation and converts the error for the caller.
fn reject(operation: &'static str, err: CoreError) -> ApiError {
    match err.kind() {
        ErrorKind::NoOp => info!(operation, error = %err, "Operation had no effect"),
        ErrorKind::NotFound | ErrorKind::Validation => {
            warn!(operation, error = %err, "Operation rejected")
        }
    }
    ApiError::from(err)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::seed::sample_catalog;
    use rust_decimal::Decimal;
    use tableside_core::{pricing, Money, PaymentStatus, TableStatus};

    fn session() -> PosSession {
        PosSession::new(sample_catalog().unwrap(), 6, PricingEngine::default()).unwrap()
    }

    fn opts(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn assert_floor_invariants(session: &PosSession) {
        for table in session.list_tables() {
            assert_eq!(
                table.status == TableStatus::Available,
                table.items.is_empty(),
                "table {}",
                table.id
            );
            assert_eq!(table.total, pricing::subtotal(&table.items));
            let mut keys: Vec<_> = table.items.iter().map(OrderLine::key).collect();
            keys.sort();
            keys.dedup();
            assert_eq!(keys.len(), table.items.len(), "duplicate line on {}", table.id);
        }
    }

    #[test]
    fn test_burger_with_cheese_scenario() {
        let mut s = session();
        let cheese = opts(&["extra-cheese"]);
        s.add_product_to_table("table-1", "1", &cheese).unwrap();
        let table = s.add_product_to_table("table-1", "1", &cheese).unwrap();

        assert_eq!(table.items.len(), 1);
        assert_eq!(table.items[0].quantity, 2);
        assert_eq!(table.items[0].final_price, Money::from_cents(1449));
        assert_eq!(table.total, Money::from_cents(2898));
        assert_eq!(table.status, TableStatus::Occupied);

        let bill = s.generate_bill("table-1").unwrap();
        assert_eq!(bill.subtotal, Money::from_cents(2898));
        assert_eq!(bill.tax.amount(), Decimal::new(2898, 3));
        assert_eq!(bill.total.amount(), Decimal::new(31878, 3));
        assert_floor_invariants(&s);
    }

    #[test]
    fn test_repeated_adds_count_up_one_line() {
        let mut s = session();
        for _ in 0..7 {
            s.add_product_to_table("table-2", "4", &[]).unwrap();
            s.add_product_to_table("table-2", "4", &opts(&["large"])).unwrap();
        }
        let table = s.select_table("table-2").unwrap();
        assert_eq!(table.items.len(), 2);
        assert!(table.items.iter().all(|l| l.quantity == 7));
        assert_floor_invariants(&s);
    }

    #[test]
    fn test_option_order_does_not_matter() {
        let mut s = session();
        s.add_product_to_table("table-1", "1", &opts(&["bacon", "extra-cheese"]))
            .unwrap();
        let table = s
            .add_product_to_table("table-1", "1", &opts(&["extra-cheese", "bacon"]))
            .unwrap();
        assert_eq!(table.items.len(), 1);
        assert_eq!(table.items[0].quantity, 2);

        let line = s
            .find_item("table-1", "1", &opts(&["extra-cheese", "bacon"]))
            .unwrap();
        assert_eq!(line.unwrap().final_price, Money::from_cents(1649));
    }

    #[test]
    fn test_zero_quantity_equals_remove() {
        let mut a = session();
        let mut b = session();
        for s in [&mut a, &mut b] {
            s.add_product_to_table("table-3", "6", &[]).unwrap();
            s.add_product_to_table("table-3", "2", &[]).unwrap();
        }

        let via_qty = a.set_item_quantity("table-3", "6", &[], 0).unwrap();
        let via_remove = b.remove_item_from_table("table-3", "6", &[]).unwrap();
        assert_eq!(via_qty.items, via_remove.items);
        assert_eq!(via_qty.status, via_remove.status);

        let emptied = a.set_item_quantity("table-3", "2", &[], -4).unwrap();
        assert_eq!(emptied.status, TableStatus::Available);
        assert_floor_invariants(&a);
    }

    #[test]
    fn test_quantity_limit() {
        let mut s = session();
        s.add_product_to_table("table-1", "4", &[]).unwrap();
        let err = s.set_item_quantity("table-1", "4", &[], 1000).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(s.select_table("table-1").unwrap().items[0].quantity, 1);
    }

    #[test]
    fn test_unknown_entities() {
        let mut s = session();
        let err = s.add_product_to_table("table-99", "1", &[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = s.add_product_to_table("table-1", "999", &[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = s
            .add_product_to_table("table-1", "4", &opts(&["bacon"]))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(s.mark_bill_paid("nope").unwrap_err().code, ErrorCode::NotFound);
        assert_eq!(s.floor_summary().available, 6);
    }

    #[test]
    fn test_empty_bill_is_noop() {
        let mut s = session();
        let err = s.generate_bill("table-4").unwrap_err();
        assert_eq!(err.code, ErrorCode::NoOp);
        assert_eq!(
            s.select_table("table-4").unwrap().status,
            TableStatus::Available
        );
        assert!(s.bills().is_empty());
    }

    #[test]
    fn test_full_service_cycle() {
        let mut s = session();
        s.select_table("table-5").unwrap();
        s.set_table_customer_name("table-5", Some("Grace")).unwrap();
        s.add_product_to_table("table-5", "3", &opts(&["gluten-free"]))
            .unwrap();
        s.set_item_notes("table-5", "3", &opts(&["gluten-free"]), Some("well done"))
            .unwrap();
        assert_eq!(s.selected_table().unwrap().items.len(), 1);

        let bill = s.generate_bill("table-5").unwrap();
        assert_eq!(bill.customer_name.as_deref(), Some("Grace"));
        assert_eq!(bill.items[0].notes.as_deref(), Some("well done"));
        assert_eq!(s.floor_summary().billing, 1);

        let paid = s.mark_bill_paid(&bill.id).unwrap();
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        assert!(s.selected_table().is_none());

        let table = s.select_table("table-5").unwrap();
        assert_eq!(table.status, TableStatus::Available);
        assert!(table.customer_name.is_none());

        // paying twice changes nothing
        let again = s.mark_bill_paid(&bill.id).unwrap();
        assert_eq!(again, paid);
        assert_floor_invariants(&s);
    }

    #[test]
    fn test_selected_table_is_live() {
        let mut s = session();
        let snapshot = s.select_table("table-1").unwrap();
        s.add_product_to_table("table-1", "5", &[]).unwrap();

        assert!(snapshot.items.is_empty());
        assert_eq!(s.selected_table().unwrap().items.len(), 1);

        s.clear_selection();
        assert!(s.selected_table().is_none());
    }

    #[test]
    fn test_bill_snapshot_survives_table_edits() {
        let mut s = session();
        s.add_product_to_table("table-2", "1", &[]).unwrap();
        let bill = s.generate_bill("table-2").unwrap();

        let table = s.add_product_to_table("table-2", "6", &[]).unwrap();
        assert_eq!(table.status, TableStatus::Billing);
        assert_eq!(s.bill(&bill.id).unwrap().items.len(), 1);
    }

    #[test]
    fn test_emptied_table_drops_old_bill() {
        let mut s = session();
        s.add_product_to_table("table-1", "1", &[]).unwrap();
        let old = s.generate_bill("table-1").unwrap();

        let table = s.remove_item_from_table("table-1", "1", &[]).unwrap();
        assert_eq!(table.status, TableStatus::Available);
        assert!(s.bills().is_empty());

        s.add_product_to_table("table-1", "2", &[]).unwrap();
        let new = s.generate_bill("table-1").unwrap();
        assert_eq!(s.bills().len(), 1);
        assert_eq!(s.bills()[0].id, new.id);

        let err = s.mark_bill_paid(&old.id).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        let table = s.select_table("table-1").unwrap();
        assert_eq!(table.status, TableStatus::Billing);
        assert_eq!(table.items[0].product_id, "2");
    }

    #[test]
    fn test_catalog_edits_do_not_touch_placed_lines() {
        let mut s = session();
        s.add_product_to_table("table-1", "1", &opts(&["extra-cheese"]))
            .unwrap();

        let mut burger = s.list_products()[0].clone();
        burger.base_price = Money::from_cents(2000);
        burger.options.clear();
        s.upsert_product(burger).unwrap();
        s.remove_product("6").unwrap();

        let table = s.select_table("table-1").unwrap();
        assert_eq!(table.items[0].final_price, Money::from_cents(1449));
        assert_eq!(table.items[0].product.base_price, Money::from_cents(1299));
        assert_eq!(s.list_products().len(), 5);
    }

    #[test]
    fn test_order_totals() {
        let mut s = session();
        s.add_product_to_table("table-6", "4", &[]).unwrap();
        s.set_item_quantity("table-6", "4", &[], 3).unwrap();

        let totals = s.order_totals("table-6").unwrap();
        assert_eq!(totals.total_quantity, 3);
        assert_eq!(totals.subtotal, Money::from_cents(897));
        assert_eq!(totals.tax.amount(), Decimal::new(897, 3));
    }

    #[test]
    fn test_from_config() {
        let mut config = ServiceConfig::default();
        config.floor.table_count = 10;
        let s = PosSession::from_config(&config).unwrap();
        assert_eq!(s.floor_summary().total_tables, 10);
        assert_eq!(s.categories().len(), 5);
    }
}
