//! # Domain Types
//!
//! Core domain types used throughout Tableside POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    OrderLine    │   │     Table       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  product (copy) │◄──│  items          │       │
//! │  │  base_price     │   │  options (copy) │   │  status         │       │
//! │  │  options[]      │   │  final_price    │   │  total          │       │
//! │  └─────────────────┘   │  quantity       │   └────────┬────────┘       │
//! │                        └─────────────────┘            │ snapshot       │
//! │                                                       ▼                │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │  TableStatus    │   │      Bill       │       │
//! │  │  bps (u32)      │   │  Available      │   │  items (copy)   │       │
//! │  │  1000 = 10%     │   │  Occupied       │   │  subtotal/tax   │       │
//! │  └─────────────────┘   │  Billing        │   │  payment_status │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! An [`OrderLine`] owns a frozen copy of the product and selected options
//! taken when it was added. A [`Bill`] owns a frozen copy of the table's lines
//! taken when it was generated. Nothing is shared by reference, so editing the
//! catalog or the table afterwards cannot change what was already ordered or
//! billed.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10% (the default restaurant rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// An optional customization of a product with an additive price delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductOption {
    pub id: String,
    pub name: String,
    /// Added to the base price. May be negative.
    pub price_modifier: Money,
}

/// A product on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier.
    pub id: String,

    /// Display name shown to the operator and on the bill.
    pub name: String,

    /// Price before any option modifiers. Never negative.
    pub base_price: Money,

    /// Menu section ("Main Course", "Beverages", ...).
    pub category: String,

    /// Optional description for product details.
    #[serde(default)]
    pub description: Option<String>,

    /// Options the operator may select, in menu order.
    #[serde(default)]
    pub options: Vec<ProductOption>,
}

impl Product {
    /// Finds an option offered by this product.
    pub fn option(&self, option_id: &str) -> Option<&ProductOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

// =============================================================================
// Identity Keys
// =============================================================================

/// Canonical form of a set of selected options: option ids sorted and
/// de-duplicated.
///
/// Two selections compare equal whatever order the options were picked in.
///
/// ```rust
/// use tableside_core::types::OptionKey;
///
/// let a = OptionKey::from_ids(["bacon", "cheese"]);
/// let b = OptionKey::from_ids(["cheese", "bacon", "cheese"]);
/// assert_eq!(a, b);
/// ```
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct OptionKey(Vec<String>);

impl OptionKey {
    /// Builds a key from option ids in any order.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        ids.sort();
        ids.dedup();
        OptionKey(ids)
    }

    /// Builds a key from selected options.
    pub fn from_options(options: &[ProductOption]) -> Self {
        Self::from_ids(options.iter().map(|o| o.id.as_str()))
    }

    /// The empty selection.
    pub fn none() -> Self {
        OptionKey(Vec::new())
    }

    /// The sorted option ids.
    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(","))
    }
}

/// Merge identity of an order line: product plus canonical option set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineKey {
    pub product_id: String,
    pub options: OptionKey,
}

impl LineKey {
    pub fn new(product_id: impl Into<String>, options: OptionKey) -> Self {
        LineKey {
            product_id: product_id.into(),
            options,
        }
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.product_id, self.options)
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// One distinct product+options selection and its quantity within a table's
/// current order.
///
/// `final_price` is fixed when the line is created and never recomputed, so a
/// later catalog price change does not reach lines already on the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,

    /// Frozen copy of the product at time of adding.
    pub product: Product,

    /// Always at least 1; a line reaching 0 is removed.
    pub quantity: u32,

    /// Frozen copies of the selected options, sorted by id.
    pub selected_options: Vec<ProductOption>,

    /// Base price plus option modifiers.
    pub final_price: Money,

    /// Kitchen note ("no onions").
    #[serde(default)]
    pub notes: Option<String>,
}

impl OrderLine {
    /// The canonical option set of this line.
    pub fn option_key(&self) -> OptionKey {
        OptionKey::from_options(&self.selected_options)
    }

    /// The merge identity of this line.
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id.clone(), self.option_key())
    }

    /// Checks whether this line has the given identity.
    pub fn matches(&self, product_id: &str, options: &OptionKey) -> bool {
        self.product_id == product_id && self.option_key() == *options
    }

    /// final_price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.final_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Table
// =============================================================================

/// Lifecycle of a physical table.
///
/// ```text
///               add item                 generate bill
///  Available ─────────────► Occupied ─────────────────► Billing
///      ▲                        │                           │
///      │    last item removed   │                           │
///      └────────────────────────┘                           │
///      ▲                        bill paid (table cleared)   │
///      └────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    /// No items on the table.
    Available,
    /// Items ordered, no unpaid bill.
    Occupied,
    /// An unpaid bill is pending for the table.
    Billing,
}

impl Default for TableStatus {
    fn default() -> Self {
        TableStatus::Available
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TableStatus::Available => "available",
            TableStatus::Occupied => "occupied",
            TableStatus::Billing => "billing",
        };
        f.write_str(s)
    }
}

/// A physical seating unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,

    /// Number painted on the table. Display only, unique.
    pub number: u32,

    pub status: TableStatus,

    pub customer_name: Option<String>,

    /// Current order, in the order lines were first added.
    pub items: Vec<OrderLine>,

    /// Cached Σ(final_price × quantity) of `items`, before tax.
    pub total: Money,

    /// When the table last left `Available`.
    #[ts(as = "Option<String>")]
    pub opened_at: Option<DateTime<Utc>>,

    /// Unpaid bill currently issued for this table.
    pub pending_bill_id: Option<String>,
}

impl Table {
    /// Creates an empty, available table.
    pub fn new(id: impl Into<String>, number: u32) -> Self {
        Table {
            id: id.into(),
            number,
            status: TableStatus::Available,
            customer_name: None,
            items: Vec::new(),
            total: Money::zero(),
            opened_at: None,
            pending_bill_id: None,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities over all lines.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Bill
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Issued, awaiting payment.
    Pending,
    /// Settled. Terminal.
    Paid,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

/// Financial snapshot of a table's order.
///
/// Everything except `payment_status`/`paid_at` is frozen at generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    pub table_id: String,
    pub table_number: u32,
    pub customer_name: Option<String>,
    pub items: Vec<OrderLine>,
    pub subtotal: Money,
    pub tax_rate: TaxRate,
    pub tax: Money,
    pub total: Money,
    pub payment_status: PaymentStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Bill {
    #[inline]
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: &str, cents: i64) -> ProductOption {
        ProductOption {
            id: id.to_string(),
            name: id.to_string(),
            price_modifier: Money::from_cents(cents),
        }
    }

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1000);
        assert_eq!(rate.bps(), 1000);
        assert!((rate.percentage() - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        assert_eq!(TaxRate::from_percentage(8.25).bps(), 825);
    }

    #[test]
    fn test_option_key_is_order_insensitive() {
        let a = OptionKey::from_options(&[option("b", 0), option("a", 0)]);
        let b = OptionKey::from_ids(["a", "b"]);
        assert_eq!(a, b);
        assert_eq!(a.ids(), &["a".to_string(), "b".to_string()]);
        assert_eq!(a.to_string(), "[a,b]");
    }

    #[test]
    fn test_option_key_no_concatenation_collision() {
        // "a,b" as one id must not equal the pair "a" + "b"
        let joined = OptionKey::from_ids(["a,b"]);
        let pair = OptionKey::from_ids(["a", "b"]);
        assert_ne!(joined, pair);
    }

    #[test]
    fn test_table_defaults() {
        let table = Table::new("table-1", 1);
        assert_eq!(table.status, TableStatus::Available);
        assert!(table.is_empty());
        assert!(table.total.is_zero());
        assert_eq!(table.total_quantity(), 0);
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&TableStatus::Billing).unwrap();
        assert_eq!(json, "\"billing\"");
        let json = serde_json::to_string(&PaymentStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
    }

    #[test]
    fn test_product_deserializes_without_options() {
        let product: Product = serde_json::from_str(
            r#"{"id":"4","name":"Coca Cola","basePrice":"2.99","category":"Beverages"}"#,
        )
        .unwrap();
        assert_eq!(product.base_price, Money::from_cents(299));
        assert!(product.options.is_empty());
        assert!(product.description.is_none());
    }
}
