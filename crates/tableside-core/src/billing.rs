//! # Billing
//!
//! Issues bills from table snapshots and settles them.
//!
//! ## Bill Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   NoBill ──generate_bill──► Pending ──mark_paid──► Paid                 │
//! │                                │                    │                   │
//! │                    table → Billing       table cleared → Available      │
//! │                                                                         │
//! │   generate_bill again on the same table: the old Pending bill is        │
//! │   superseded (dropped from the ledger) by the new snapshot.             │
//! │                                                                         │
//! │   Emptying a table in Billing through apply_item_change drops its       │
//! │   Pending bill the same way.                                            │
//! │                                                                         │
//! │   mark_paid on a Paid bill: returns it unchanged, touches nothing.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A bill owns a copy of the table's lines. Editing the table afterwards
//! never changes an issued bill.

use chrono::Utc;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::pricing::PricingEngine;
use crate::tables::TableStore;
use crate::types::{Bill, OrderLine, PaymentStatus, Table};

/// Ledger of bills issued during the session.
#[derive(Debug, Clone, Default)]
pub struct BillingWorkflow {
    pricing: PricingEngine,
    bills: Vec<Bill>,
}

impl BillingWorkflow {
    pub fn new(pricing: PricingEngine) -> Self {
        BillingWorkflow {
            pricing,
            bills: Vec::new(),
        }
    }

    pub fn pricing(&self) -> &PricingEngine {
        &self.pricing
    }

    /// All bills still in the ledger, oldest first.
    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    pub fn bill(&self, bill_id: &str) -> CoreResult<&Bill> {
        self.bills
            .iter()
            .find(|b| b.id == bill_id)
            .ok_or_else(|| CoreError::BillNotFound(bill_id.to_string()))
    }

    /// The unpaid bill the table is currently linked to.
    pub fn pending_bill_for(&self, store: &TableStore, table_id: &str) -> Option<&Bill> {
        let bill_id = store.select_table(table_id).ok()?.pending_bill_id.as_deref()?;
        self.bills.iter().find(|b| b.id == bill_id && !b.is_paid())
    }

    /// Replaces a table's lines through [`TableStore::apply_item_change`].
    ///
    /// When the change empties a table in Billing, the table loses its link
    /// and the Pending bill it pointed at is dropped from the ledger.
    pub fn apply_item_change<'s>(
        &mut self,
        store: &'s mut TableStore,
        table_id: &str,
        new_lines: Vec<OrderLine>,
    ) -> CoreResult<&'s Table> {
        let dropped = if new_lines.is_empty() {
            store.select_table(table_id)?.pending_bill_id.clone()
        } else {
            None
        };

        let table = store.apply_item_change(table_id, new_lines)?;
        if let Some(bill_id) = dropped {
            self.bills.retain(|b| b.id != bill_id || b.is_paid());
        }
        Ok(table)
    }

    /// Snapshots the table's order into a new Pending bill and moves the
    /// table to Billing.
    ///
    /// ## Errors
    /// - `TableNotFound` for an unknown table
    /// - `EmptyOrder` if the table has no lines (nothing changes)
    ///
    /// Any unpaid bill previously issued for the table is superseded.
    pub fn generate_bill(&mut self, store: &mut TableStore, table_id: &str) -> CoreResult<Bill> {
        let table = store.select_table(table_id)?;
        if table.is_empty() {
            return Err(CoreError::EmptyOrder {
                table_id: table_id.to_string(),
            });
        }

        let totals = self.pricing.order_totals(&table.items);
        let bill = Bill {
            id: Uuid::new_v4().to_string(),
            table_id: table.id.clone(),
            table_number: table.number,
            customer_name: table.customer_name.clone(),
            items: table.items.clone(),
            subtotal: totals.subtotal,
            tax_rate: self.pricing.tax_rate(),
            tax: totals.tax,
            total: totals.total,
            payment_status: PaymentStatus::Pending,
            created_at: Utc::now(),
            paid_at: None,
        };

        store.mark_billing(table_id, &bill.id)?;
        self.bills.retain(|b| b.table_id != table_id || b.is_paid());
        self.bills.push(bill.clone());

        Ok(bill)
    }

    /// Settles a bill and clears its table.
    ///
    /// The table is cleared only while this bill is still the table's pending
    /// bill; a table that was emptied and reopened since is left alone.
    /// Paying an already-paid bill returns it unchanged.
    pub fn mark_paid(&mut self, store: &mut TableStore, bill_id: &str) -> CoreResult<Bill> {
        let bill = self
            .bills
            .iter_mut()
            .find(|b| b.id == bill_id)
            .ok_or_else(|| CoreError::BillNotFound(bill_id.to_string()))?;

        if bill.is_paid() {
            return Ok(bill.clone());
        }

        let still_linked = store
            .select_table(&bill.table_id)
            .map(|t| t.pending_bill_id.as_deref() == Some(bill_id))
            .unwrap_or(false);
        if still_linked {
            store.clear(&bill.table_id)?;
        }

        bill.payment_status = PaymentStatus::Paid;
        bill.paid_at = Some(Utc::now());
        Ok(bill.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
