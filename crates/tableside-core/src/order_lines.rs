//! # Order Lines
//!
//! Pure transformations of one table's list of order lines.
//!
//! ## Line Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Operator Action          Function                 Result               │
//! │  ───────────────          ────────                 ──────               │
//! │                                                                         │
//! │  Tap product ───────────► add_item() ────────────► merge (+1) or push  │
//! │                                                                         │
//! │  "+" / "-" ─────────────► set_quantity() ────────► replace qty         │
//! │                                      └── qty 0 ──► remove_item()        │
//! │                                                                         │
//! │  Trash icon ────────────► remove_item() ─────────► filter out          │
//! │                                                                         │
//! │  Note field ────────────► set_notes() ───────────► replace note        │
//! │                                                                         │
//! │  Every function borrows the current lines and returns a NEW Vec.        │
//! │  The input is never touched, so a failed call leaves nothing behind.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines are identified by [`LineKey`](crate::types::LineKey): the product id
//! plus the canonical set of selected option ids. At most one line per key
//! exists in a list produced by this module.

use crate::error::{CoreError, CoreResult};
use crate::pricing::line_final_price;
use crate::types::{OptionKey, OrderLine, Product, ProductOption};
use crate::validation::validate_table_lines;
use crate::{MAX_ITEM_QUANTITY, MAX_TABLE_LINES};

/// Sorts selected options by id, drops duplicates, and swaps each one for the
/// product's own copy. Fails if the product doesn't offer one of them.
fn canonical_options(
    product: &Product,
    selected_options: &[ProductOption],
) -> CoreResult<Vec<ProductOption>> {
    let mut options = Vec::with_capacity(selected_options.len());
    for selected in selected_options {
        let offered = product
            .option(&selected.id)
            .ok_or_else(|| CoreError::OptionNotOffered {
                product_id: product.id.clone(),
                option_id: selected.id.clone(),
            })?;
        options.push(offered.clone());
    }
    options.sort_by(|a, b| a.id.cmp(&b.id));
    options.dedup_by(|a, b| a.id == b.id);
    Ok(options)
}

/// Finds the line with the given identity.
pub fn find_line<'a>(
    lines: &'a [OrderLine],
    product_id: &str,
    options: &OptionKey,
) -> Option<&'a OrderLine> {
    lines.iter().find(|l| l.matches(product_id, options))
}

/// Adds one unit of `product` with `selected_options`.
///
/// ## Behavior
/// - Line with the same product and option set exists: quantity + 1
/// - Otherwise: a new line with quantity 1 is appended, its `final_price`
///   computed once here and frozen
///
/// ## Errors
/// - `OptionNotOffered` if an option isn't on the product
/// - `QuantityTooLarge` if the merged quantity would pass 999
/// - `TableFull` if a new line would pass 100 lines
///
/// ```rust
/// use tableside_core::money::Money;
/// use tableside_core::order_lines::add_item;
/// use tableside_core::types::Product;
///
/// let cola = Product {
///     id: "4".into(),
///     name: "Coca Cola".into(),
///     base_price: Money::from_cents(299),
///     category: "Beverages".into(),
///     description: None,
///     options: vec![],
/// };
///
/// let lines = add_item(&[], &cola, &[]).unwrap();
/// let lines = add_item(&lines, &cola, &[]).unwrap();
/// assert_eq!(lines.len(), 1);
/// assert_eq!(lines[0].quantity, 2);
/// ```
pub fn add_item(
    lines: &[OrderLine],
    product: &Product,
    selected_options: &[ProductOption],
) -> CoreResult<Vec<OrderLine>> {
    let options = canonical_options(product, selected_options)?;
    let key = OptionKey::from_options(&options);

    if let Some(index) = lines.iter().position(|l| l.matches(&product.id, &key)) {
        let new_qty = lines[index].quantity as i64 + 1;
        if new_qty > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: new_qty,
                max: MAX_ITEM_QUANTITY,
            });
        }

        let mut updated = lines.to_vec();
        updated[index].quantity = new_qty as u32;
        return Ok(updated);
    }

    validate_table_lines(lines.len()).map_err(|_| CoreError::TableFull {
        max: MAX_TABLE_LINES,
    })?;

    let mut updated = Vec::with_capacity(lines.len() + 1);
    updated.extend_from_slice(lines);
    updated.push(OrderLine {
        product_id: product.id.clone(),
        final_price: line_final_price(product.base_price, &options),
        product: product.clone(),
        quantity: 1,
        selected_options: options,
        notes: None,
    });
    Ok(updated)
}

/// Sets the quantity of the line with the given identity.
///
/// ## Behavior
/// - Negative quantity is clamped to 0
/// - Quantity 0: same as [`remove_item`]
/// - No matching line: lines returned unchanged
///
/// ## Errors
/// - `QuantityTooLarge` above 999 (lines unchanged)
pub fn set_quantity(
    lines: &[OrderLine],
    product_id: &str,
    options: &OptionKey,
    quantity: i64,
) -> CoreResult<Vec<OrderLine>> {
    let quantity = quantity.max(0);
    if quantity == 0 {
        return Ok(remove_item(lines, product_id, options));
    }

    if quantity > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: quantity,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(lines
        .iter()
        .map(|line| {
            if line.matches(product_id, options) {
                OrderLine {
                    quantity: quantity as u32,
                    ..line.clone()
                }
            } else {
                line.clone()
            }
        })
        .collect())
}

/// Removes the line with the given identity, if present.
pub fn remove_item(lines: &[OrderLine], product_id: &str, options: &OptionKey) -> Vec<OrderLine> {
    lines
        .iter()
        .filter(|l| !l.matches(product_id, options))
        .cloned()
        .collect()
}

/// Sets or clears the kitchen note on a line. Blank notes clear it.
pub fn set_notes(
    lines: &[OrderLine],
    product_id: &str,
    options: &OptionKey,
    notes: Option<&str>,
) -> Vec<OrderLine> {
    let notes = notes
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    lines
        .iter()
        .map(|line| {
            if line.matches(product_id, options) {
                OrderLine {
                    notes: notes.clone(),
                    ..line.clone()
                }
            } else {
                line.clone()
            }
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use std::collections::HashSet;

    fn option(id: &str, cents: i64) -> ProductOption {
        ProductOption {
            id: id.to_string(),
            name: format!("Option {}", id),
            price_modifier: Money::from_cents(cents),
        }
    }

    fn burger() -> Product {
        Product {
            id: "1".to_string(),
            name: "Burger Deluxe".to_string(),
            base_price: Money::from_cents(1299),
            category: "Main Course".to_string(),
            description: Some("Beef burger with cheese, lettuce, tomato".to_string()),
            options: vec![option("extra-cheese", 150), option("bacon", 200)],
        }
    }

    fn salad() -> Product {
        Product {
            id: "2".to_string(),
            name: "Caesar Salad".to_string(),
            base_price: Money::from_cents(899),
            category: "Salads".to_string(),
            description: None,
            options: vec![],
        }
    }

    #[test]
    fn test_repeated_adds_merge_into_one_line() {
        let product = burger();
        let cheese = [option("extra-cheese", 150)];
        let mut lines = Vec::new();
        for _ in 0..5 {
            lines = add_item(&lines, &product, &cheese).unwrap();
        }

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 5);
        assert_eq!(lines[0].final_price, Money::from_cents(1449));
    }

    #[test]
    fn test_option_order_does_not_split_lines() {
        let product = burger();
        let lines = add_item(
            &[],
            &product,
            &[option("extra-cheese", 150), option("bacon", 200)],
        )
        .unwrap();
        let lines = add_item(
            &lines,
            &product,
            &[option("bacon", 200), option("extra-cheese", 150)],
        )
        .unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].selected_options[0].id, "bacon");
    }

    #[test]
    fn test_different_options_make_separate_lines() {
        let product = burger();
        let lines = add_item(&[], &product, &[]).unwrap();
        let lines = add_item(&lines, &product, &[option("bacon", 200)]).unwrap();
        let lines = add_item(&lines, &salad(), &[]).unwrap();

        assert_eq!(lines.len(), 3);
        let keys: HashSet<_> = lines.iter().map(OrderLine::key).collect();
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn test_duplicate_option_selection_collapses() {
        let lines = add_item(
            &[],
            &burger(),
            &[option("bacon", 200), option("bacon", 200)],
        )
        .unwrap();
        assert_eq!(lines[0].selected_options.len(), 1);
        assert_eq!(lines[0].final_price, Money::from_cents(1499));
    }

    #[test]
    fn test_unknown_option_rejected() {
        let err = add_item(&[], &salad(), &[option("extra-cheese", 150)]).unwrap_err();
        assert!(matches!(err, CoreError::OptionNotOffered { .. }));
    }

    #[test]
    fn test_option_price_taken_from_product() {
        // A caller-supplied modifier can't override the menu price
        let lines = add_item(&[], &burger(), &[option("bacon", 1)]).unwrap();
        assert_eq!(lines[0].final_price, Money::from_cents(1499));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let product = salad();
        let original = add_item(&[], &product, &[]).unwrap();
        let snapshot = original.clone();

        let _ = add_item(&original, &product, &[]).unwrap();
        let _ = set_quantity(&original, "2", &OptionKey::none(), 7).unwrap();
        let _ = remove_item(&original, "2", &OptionKey::none());

        assert_eq!(original, snapshot);
    }

    #[test]
    fn test_set_quantity_zero_equals_remove() {
        let lines = add_item(&[], &burger(), &[]).unwrap();
        let lines = add_item(&lines, &salad(), &[]).unwrap();

        let by_quantity = set_quantity(&lines, "1", &OptionKey::none(), 0).unwrap();
        let by_remove = remove_item(&lines, "1", &OptionKey::none());
        assert_eq!(by_quantity, by_remove);
        assert_eq!(by_remove.len(), 1);
    }

    #[test]
    fn test_set_quantity_negative_is_clamped() {
        let lines = add_item(&[], &salad(), &[]).unwrap();
        let lines = set_quantity(&lines, "2", &OptionKey::none(), -3).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_set_quantity_missing_line_is_noop() {
        let lines = add_item(&[], &salad(), &[]).unwrap();
        let after = set_quantity(&lines, "99", &OptionKey::none(), 4).unwrap();
        assert_eq!(after, lines);

        let key = OptionKey::from_ids(["bacon"]);
        let after = set_quantity(&lines, "2", &key, 4).unwrap();
        assert_eq!(after, lines);
    }

    #[test]
    fn test_set_quantity_too_large() {
        let lines = add_item(&[], &salad(), &[]).unwrap();
        let err = set_quantity(&lines, "2", &OptionKey::none(), 1000).unwrap_err();
        assert!(matches!(
            err,
            CoreError::QuantityTooLarge {
                requested: 1000,
                max: MAX_ITEM_QUANTITY
            }
        ));
        assert!(set_quantity(&lines, "2", &OptionKey::none(), MAX_ITEM_QUANTITY).is_ok());
    }

    #[test]
    fn test_add_past_max_quantity_fails() {
        let product = salad();
        let lines = add_item(&[], &product, &[]).unwrap();
        let lines = set_quantity(&lines, "2", &OptionKey::none(), MAX_ITEM_QUANTITY).unwrap();
        let err = add_item(&lines, &product, &[]).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { requested: 1000, .. }));
    }

    #[test]
    fn test_table_full() {
        let mut lines = Vec::new();
        for i in 0..MAX_TABLE_LINES {
            let mut product = salad();
            product.id = format!("p{}", i);
            lines = add_item(&lines, &product, &[]).unwrap();
        }
        let err = add_item(&lines, &burger(), &[]).unwrap_err();
        assert!(matches!(err, CoreError::TableFull { .. }));

        // merging into an existing line still works
        let mut existing = salad();
        existing.id = "p0".to_string();
        assert!(add_item(&lines, &existing, &[]).is_ok());
    }

    #[test]
    fn test_line_keeps_product_snapshot() {
        let mut product = burger();
        let lines = add_item(&[], &product, &[]).unwrap();

        product.base_price = Money::from_cents(9999);
        product.name = "Renamed".to_string();
        let lines = add_item(&lines, &product, &[]).unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product.name, "Burger Deluxe");
        assert_eq!(lines[0].final_price, Money::from_cents(1299));
    }

    #[test]
    fn test_set_notes() {
        let lines = add_item(&[], &burger(), &[]).unwrap();
        let lines = set_notes(&lines, "1", &OptionKey::none(), Some("  no onions "));
        assert_eq!(lines[0].notes.as_deref(), Some("no onions"));

        let lines = set_notes(&lines, "1", &OptionKey::none(), Some(""));
        assert!(lines[0].notes.is_none());
    }

    #[test]
    fn test_find_line() {
        let lines = add_item(&[], &burger(), &[option("bacon", 200)]).unwrap();
        assert!(find_line(&lines, "1", &OptionKey::from_ids(["bacon"])).is_some());
        assert!(find_line(&lines, "1", &OptionKey::none()).is_none());
    }
}
