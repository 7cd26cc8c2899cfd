//! # Validation Module
//!
//! Input validation utilities for Tableside POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end                                                    │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Session (tableside-service)                                  │
//! │  ├── Id resolution (table, product, option)                            │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Core operations                                              │
//! │  └── Limits enforced while computing the new state                     │
//! │                                                                         │
//! │  Nothing is mutated until every check has passed                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tableside_core::validation::{validate_customer_name, validate_tax_rate_bps};
//!
//! assert!(validate_tax_rate_bps(1000).is_ok());
//! assert!(validate_customer_name("Ada").is_ok());
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Product;
use crate::{MAX_CUSTOMER_NAME_LEN, MAX_TABLES, MAX_TABLE_LINES, MAX_UNIT_PRICE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
///
/// ```rust
/// use tableside_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Burger Deluxe").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_required("name", name, 200)
}

/// Validates a menu category. Required, at most 100 characters.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    validate_required("category", category, 100)
}

/// Validates an optional customer name.
///
/// Blank names are allowed (they unset the name); long names are not.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    if name.trim().chars().count() > MAX_CUSTOMER_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "customer name".to_string(),
            max: MAX_CUSTOMER_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a base price.
///
/// ## Rules
/// - Zero is allowed (free items), negative is not
/// - Must not exceed MAX_UNIT_PRICE
pub fn validate_base_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price > max_unit_price() {
        return Err(ValidationError::OutOfRange {
            field: "base price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE,
        });
    }

    Ok(())
}

/// Validates an option's price modifier. Discounts are allowed, up to the
/// same magnitude as a base price.
pub fn validate_price_modifier(modifier: Money) -> ValidationResult<()> {
    if modifier.abs() > max_unit_price() {
        return Err(ValidationError::OutOfRange {
            field: "price modifier".to_string(),
            min: -MAX_UNIT_PRICE,
            max: MAX_UNIT_PRICE,
        });
    }

    Ok(())
}

fn max_unit_price() -> Money {
    Money::from_cents(MAX_UNIT_PRICE * 100)
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates the number of tables on the floor.
pub fn validate_table_count(count: u32) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::MustBePositive {
            field: "table_count".to_string(),
        });
    }

    if count > MAX_TABLES {
        return Err(ValidationError::OutOfRange {
            field: "table_count".to_string(),
            min: 1,
            max: MAX_TABLES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that one more line fits on a table.
///
/// ## Rules
/// - Must not exceed MAX_TABLE_LINES (100)
pub fn validate_table_lines(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_TABLE_LINES {
        return Err(ValidationError::OutOfRange {
            field: "order lines".to_string(),
            min: 0,
            max: MAX_TABLE_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Catalog ids are single tokens: no whitespace, no commas.
fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    if id.chars().any(|c| c.is_whitespace() || c == ',') {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not contain whitespace or commas".to_string(),
        });
    }
    Ok(())
}

/// Validates a product before it enters the catalog.
///
/// ## Rules
/// - Id, name and category are required
/// - Base price is between 0 and MAX_UNIT_PRICE
/// - Option modifiers are within MAX_UNIT_PRICE either way
/// - Every option has an id and a name, and option ids are unique
/// - Ids contain no whitespace or commas
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_id("id", &product.id)?;
    validate_product_name(&product.name)?;
    validate_category(&product.category)?;
    validate_base_price(product.base_price)?;

    let mut seen = HashSet::new();
    for option in &product.options {
        validate_id("option id", &option.id)?;
        validate_required("option name", &option.name, 100)?;
        validate_price_modifier(option.price_modifier)?;
        if !seen.insert(option.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "option id".to_string(),
                value: option.id.clone(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
