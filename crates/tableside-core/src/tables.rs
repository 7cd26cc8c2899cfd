//! # Table Store
//!
//! Owns every table on the floor together with its order lines.
//!
//! ## Status Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  apply_item_change(table, new_lines)   ← the only place status is      │
//! │         │                                derived from item presence     │
//! │         ├── new_lines empty ─────────────► Available                    │
//! │         │                                 (pending bill link dropped)   │
//! │         ├── pending bill on table ───────► Billing                      │
//! │         └── otherwise ───────────────────► Occupied                     │
//! │                                                                         │
//! │  mark_billing(table, bill)  ─────────────► Billing                      │
//! │  clear(table)               ─────────────► Available                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutator replaces a table's state in one step after all checks pass,
//! so an error never leaves a table half-updated.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing;
use crate::types::{OrderLine, Table, TableStatus};
use crate::validation::{validate_customer_name, validate_table_count};

/// Table counts per status, as shown in the dashboard header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FloorSummary {
    pub total_tables: usize,
    pub available: usize,
    pub occupied: usize,
    pub billing: usize,
}

/// In-memory collection of tables.
#[derive(Debug, Clone, Default)]
pub struct TableStore {
    tables: Vec<Table>,
}

impl TableStore {
    /// Creates `table-1` .. `table-{count}`, numbered 1..=count, all available.
    pub fn with_tables(count: u32) -> CoreResult<Self> {
        validate_table_count(count)?;
        let tables = (1..=count)
            .map(|n| Table::new(format!("table-{}", n), n))
            .collect();
        Ok(TableStore { tables })
    }

    /// All tables in floor order.
    pub fn list_tables(&self) -> &[Table] {
        &self.tables
    }

    /// Read-only fetch of one table.
    pub fn select_table(&self, table_id: &str) -> CoreResult<&Table> {
        self.tables
            .iter()
            .find(|t| t.id == table_id)
            .ok_or_else(|| CoreError::TableNotFound(table_id.to_string()))
    }

    fn table_mut(&mut self, table_id: &str) -> CoreResult<&mut Table> {
        self.tables
            .iter_mut()
            .find(|t| t.id == table_id)
            .ok_or_else(|| CoreError::TableNotFound(table_id.to_string()))
    }

    /// Replaces a table's lines, recomputes its total and derives its status.
    pub fn apply_item_change(
        &mut self,
        table_id: &str,
        new_lines: Vec<OrderLine>,
    ) -> CoreResult<&Table> {
        let table = self.table_mut(table_id)?;

        let total = pricing::subtotal(&new_lines);
        if new_lines.is_empty() {
            table.status = TableStatus::Available;
            table.pending_bill_id = None;
            table.opened_at = None;
        } else {
            if table.status == TableStatus::Available {
                table.opened_at = Some(Utc::now());
            }
            table.status = if table.pending_bill_id.is_some() {
                TableStatus::Billing
            } else {
                TableStatus::Occupied
            };
        }
        table.items = new_lines;
        table.total = total;

        Ok(&*table)
    }

    /// Sets the customer name. Blank input unsets it. Status is untouched.
    pub fn set_customer_name(&mut self, table_id: &str, name: Option<&str>) -> CoreResult<&Table> {
        if let Some(name) = name {
            validate_customer_name(name)?;
        }
        let table = self.table_mut(table_id)?;
        table.customer_name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        Ok(&*table)
    }

    /// Records `bill_id` as the table's pending bill and moves it to Billing.
    ///
    /// Billing an empty table is refused with `EmptyOrder`.
    pub fn mark_billing(&mut self, table_id: &str, bill_id: &str) -> CoreResult<&Table> {
        let table = self.table_mut(table_id)?;
        if table.is_empty() {
            return Err(CoreError::EmptyOrder {
                table_id: table_id.to_string(),
            });
        }
        table.pending_bill_id = Some(bill_id.to_string());
        table.status = TableStatus::Billing;
        Ok(&*table)
    }

    /// Resets the table for the next party.
    pub fn clear(&mut self, table_id: &str) -> CoreResult<&Table> {
        let table = self.table_mut(table_id)?;
        table.items = Vec::new();
        table.total = Money::zero();
        table.customer_name = None;
        table.pending_bill_id = None;
        table.opened_at = None;
        table.status = TableStatus::Available;
        Ok(&*table)
    }

    /// Counts tables per status.
    pub fn summary(&self) -> FloorSummary {
        self.tables.iter().fold(
            FloorSummary {
                total_tables: self.tables.len(),
                ..FloorSummary::default()
            },
            |mut acc, t| {
                match t.status {
                    TableStatus::Available => acc.available += 1,
                    TableStatus::Occupied => acc.occupied += 1,
                    TableStatus::Billing => acc.billing += 1,
                }
                acc
            },
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
