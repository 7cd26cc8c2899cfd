//! # tableside-core: Pure Business Logic for Tableside POS
//!
//! This crate is the **heart** of Tableside POS. It holds the order/table
//! state machine as pure functions and plain in-memory values, with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Tableside POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Front end (register app)                     │   │
//! │  │    Tables ──► Products ──► Order panel ──► Bill                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tableside-service: PosSession                   │   │
//! │  │    add_product_to_table, generate_bill, mark_bill_paid, ...     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tableside-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   pricing ◄── order_lines ◄── tables ◄── billing    catalog     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOGGING SINKS • NO GLOBAL STATE                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, OrderLine, Table, Bill, ...)
//! - [`money`] - Exact decimal Money type
//! - [`pricing`] - Line prices and order totals
//! - [`order_lines`] - Add / set quantity / remove on a table's line list
//! - [`tables`] - TableStore, the owner of all tables
//! - [`billing`] - Bill generation and settlement
//! - [`catalog`] - The menu
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tableside_core::billing::BillingWorkflow;
//! use tableside_core::order_lines::add_item;
//! use tableside_core::tables::TableStore;
//! use tableside_core::{Money, Product, TableStatus};
//!
//! let burger = Product {
//!     id: "1".into(),
//!     name: "Burger Deluxe".into(),
//!     base_price: Money::from_cents(1299),
//!     category: "Main Course".into(),
//!     description: None,
//!     options: vec![],
//! };
//!
//! let mut store = TableStore::with_tables(6).unwrap();
//! let mut billing = BillingWorkflow::default();
//!
//! let lines = add_item(&store.select_table("table-1").unwrap().items, &burger, &[]).unwrap();
//! store.apply_item_change("table-1", lines).unwrap();
//!
//! let bill = billing.generate_bill(&mut store, "table-1").unwrap();
//! assert_eq!(bill.total.to_string(), "$14.29");
//!
//! billing.mark_paid(&mut store, &bill.id).unwrap();
//! assert_eq!(store.select_table("table-1").unwrap().status, TableStatus::Available);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod catalog;
pub mod error;
pub mod money;
pub mod order_lines;
pub mod pricing;
pub mod tables;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use billing::BillingWorkflow;
pub use catalog::Catalog;
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use pricing::{OrderTotals, PricingEngine};
pub use tables::{FloorSummary, TableStore};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default tax rate in basis points (10%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 1000;

/// Default number of tables on the floor.
pub const DEFAULT_TABLE_COUNT: u32 = 6;

/// Maximum number of tables a floor can be configured with.
pub const MAX_TABLES: u32 = 200;

/// Maximum distinct order lines on one table.
///
/// ## Business Reason
/// Prevents runaway orders and keeps bills printable.
pub const MAX_TABLE_LINES: usize = 100;

/// Maximum quantity of a single order line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum catalog price, in whole currency units.
///
/// Applies to base prices and to the size of option modifiers. Keeps line
/// and bill arithmetic far away from `Decimal`'s limits.
pub const MAX_UNIT_PRICE: i64 = 1_000_000;

/// Maximum length of a customer name.
pub const MAX_CUSTOMER_NAME_LEN: usize = 100;
