//! # Error Types
//!
//! Domain-specific error types for tableside-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tableside-core errors (this file)                                     │
//! │  ├── CoreError        - Lookup, precondition and limit failures        │
//! │  └── ValidationError  - Malformed input                                │
//! │                                                                         │
//! │  tableside-service errors (separate crate)                             │
//! │  └── ApiError         - What the front end sees (serialized)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Front end              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Kinds
//! Every `CoreError` falls in exactly one [`ErrorKind`]:
//! - `NotFound`: the referenced table, bill or product does not exist
//! - `NoOp`: a precondition was not met (e.g. billing an empty table)
//! - `Validation`: the input was malformed and was rejected before any mutation
//!
//! None of them is fatal. An operation that returns an error has not changed
//! any state.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No table with this id exists on the floor.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// No bill with this id exists in the ledger.
    #[error("Bill not found: {0}")]
    BillNotFound(String),

    /// Product cannot be found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The table has no order lines to bill.
    ///
    /// ## User Workflow
    /// ```text
    /// Table 3 (Available, 0 items)
    ///      │
    ///      ▼
    /// Generate Bill
    ///      │
    ///      ▼
    /// EmptyOrder { table_id: "table-3" }
    ///      │
    ///      ▼
    /// UI shows: "Table 3 has nothing to bill"
    /// ```
    #[error("Table {table_id} has no items to bill")]
    EmptyOrder { table_id: String },

    /// A selected option is not one the product offers.
    #[error("Option {option_id} is not offered for product {product_id}")]
    OptionNotOffered {
        product_id: String,
        option_id: String,
    },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Table has reached the maximum number of distinct order lines.
    #[error("Table cannot have more than {max} order lines")]
    TableFull { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Coarse classification of a [`CoreError`], used by callers to decide how to
/// surface it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced entity does not exist. Log and ignore.
    NotFound,
    /// Precondition not met. Show a notice, state is unchanged.
    NoOp,
    /// Malformed input, rejected before mutation.
    Validation,
}

impl CoreError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::TableNotFound(_)
            | CoreError::BillNotFound(_)
            | CoreError::ProductNotFound(_) => ErrorKind::NotFound,
            CoreError::EmptyOrder { .. } => ErrorKind::NoOp,
            CoreError::OptionNotOffered { .. }
            | CoreError::QuantityTooLarge { .. }
            | CoreError::TableFull { .. }
            | CoreError::Validation(_) => ErrorKind::Validation,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when operator input or catalog data doesn't meet
/// requirements. They are raised before any state is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., two options sharing an id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::EmptyOrder {
            table_id: "table-3".to_string(),
        };
        assert_eq!(err.to_string(), "Table table-3 has no items to bill");

        let err = CoreError::OptionNotOffered {
            product_id: "1".to_string(),
            option_id: "opt-9".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Option opt-9 is not offered for product 1"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::TooLong {
            field: "customer name".to_string(),
            max: 100,
        };
        assert_eq!(err.to_string(), "customer name must be at most 100 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "category".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            CoreError::TableNotFound("t".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            CoreError::BillNotFound("b".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            CoreError::EmptyOrder {
                table_id: "t".into()
            }
            .kind(),
            ErrorKind::NoOp
        );
        assert_eq!(
            CoreError::TableFull { max: 100 }.kind(),
            ErrorKind::Validation
        );
    }
}
