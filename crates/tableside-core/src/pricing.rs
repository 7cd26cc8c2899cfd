//! # Pricing
//!
//! Line prices and order totals.
//!
//! ```text
//!   base_price ──┐
//!                ├─► line_final_price ─► × quantity ─► Σ = subtotal
//!   Σ modifiers ─┘                                        │
//!                                                         ├─► × tax rate = tax
//!                                                         └─► subtotal + tax = total
//! ```
//!
//! Everything here is a pure function of its inputs.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{OrderLine, ProductOption, TaxRate};
use crate::DEFAULT_TAX_RATE_BPS;

/// Totals of a list of order lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub line_count: usize,
    pub total_quantity: u32,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

/// Base price plus the sum of the selected options' modifiers.
///
/// No lower bound is applied: options are operator-curated and a large
/// negative modifier yields a negative line price.
///
/// ```rust
/// use tableside_core::money::Money;
/// use tableside_core::pricing::line_final_price;
/// use tableside_core::types::ProductOption;
///
/// let cheese = ProductOption {
///     id: "extra-cheese".into(),
///     name: "Extra Cheese".into(),
///     price_modifier: Money::from_cents(150),
/// };
/// assert_eq!(
///     line_final_price(Money::from_cents(1299), &[cheese]),
///     Money::from_cents(1449)
/// );
/// ```
pub fn line_final_price(base_price: Money, selected_options: &[ProductOption]) -> Money {
    base_price
        + selected_options
            .iter()
            .map(|o| o.price_modifier)
            .sum::<Money>()
}

/// Σ(final_price × quantity) over the lines.
pub fn subtotal(lines: &[OrderLine]) -> Money {
    lines.iter().map(OrderLine::line_total).sum()
}

/// Computes order totals with a configured tax rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingEngine {
    tax_rate: TaxRate,
}

impl PricingEngine {
    pub fn new(tax_rate: TaxRate) -> Self {
        PricingEngine { tax_rate }
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Subtotal, tax and total of the lines.
    ///
    /// Tax is `subtotal × rate` kept at full precision.
    pub fn order_totals(&self, lines: &[OrderLine]) -> OrderTotals {
        let subtotal = subtotal(lines);
        let tax = subtotal.calculate_tax(self.tax_rate);
        OrderTotals {
            line_count: lines.len(),
            total_quantity: lines.iter().map(|l| l.quantity).sum(),
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

impl Default for PricingEngine {
    /// 10% tax.
    fn default() -> Self {
        PricingEngine::new(TaxRate::from_bps(DEFAULT_TAX_RATE_BPS))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
