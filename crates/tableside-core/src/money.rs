//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    12.99 + 1.50 = 14.490000000000002  ❌ WRONG!                         │
//! │                                                                         │
//! │  With integer cents, tax gets rounded on every bill:                   │
//! │    $28.98 × 10% = $2.898 → $2.90      (sub-cent lost)                  │
//! │                                                                         │
//! │  OUR SOLUTION: Base-10 Decimal                                          │
//! │    28.98 × 0.10 = 2.898 exactly                                         │
//! │    Rounding happens only when an amount is displayed                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tableside_core::money::Money;
//!
//! // Create from cents
//! let burger = Money::from_cents(1299); // $12.99
//! let cheese = Money::from_cents(150);  // $1.50
//!
//! // Arithmetic operations
//! let line = (burger + cheese) * 2u32;
//! assert_eq!(line, Money::from_cents(2898));
//!
//! // NEVER do this:
//! // let bad = Money::from_float(12.99); // NO SUCH METHOD EXISTS!
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

/// Number of decimal places shown for an amount.
const DISPLAY_DECIMALS: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value as an exact base-10 decimal.
///
/// ## Design Decisions
/// - **Signed**: option modifiers may be negative ("No Cheese -$0.50")
/// - **Single field tuple struct**: zero-cost wrapper over `Decimal`
/// - **Serialized as a string**: `"14.49"`, never a float
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  Product.base_price ──┐                                                 │
/// │                       ├──► OrderLine.final_price ──► × quantity         │
/// │  Option.price_modifier┘                                                 │
/// │                                                                         │
/// │  Σ lines ──► Table.total / Bill.subtotal ──► tax ──► Bill.total         │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(#[ts(as = "String")] Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tableside_core::money::Money;
    ///
    /// let price = Money::from_cents(1299); // Represents $12.99
    /// assert_eq!(price.to_string(), "$12.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50
    ///
    /// ```rust
    /// use tableside_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(12, 99), Money::from_cents(1299));
    /// assert_eq!(Money::from_major_minor(-5, 50), Money::from_cents(-550));
    /// ```
    #[inline]
    pub fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money::from_cents(major * 100 - minor)
        } else {
            Money::from_cents(major * 100 + minor)
        }
    }

    /// Returns the exact decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Rounds to whole cents, half away from zero.
    ///
    /// Only used for presentation. Stored totals keep full precision.
    ///
    /// ```rust
    /// use tableside_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let tax = Money::new(Decimal::new(2898, 3)); // 2.898
    /// assert_eq!(tax.rounded(), Money::from_cents(290));
    /// ```
    pub fn rounded(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Calculates tax on this amount. The result is exact, not rounded.
    ///
    /// ## Example
    /// ```rust
    /// use tableside_core::money::Money;
    /// use tableside_core::types::TaxRate;
    /// use rust_decimal::Decimal;
    ///
    /// let subtotal = Money::from_cents(2898); // $28.98
    /// let rate = TaxRate::from_bps(1000);     // 10%
    ///
    /// let tax = subtotal.calculate_tax(rate);
    /// assert_eq!(tax.amount(), Decimal::new(2898, 3)); // 2.898
    /// ```
    ///
    /// ## User Workflow
    /// ```text
    /// Bill Subtotal: $28.98
    ///      │
    ///      ▼
    /// calculate_tax(10%) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Tax: 2.898 (shown as $2.90)
    ///      │
    ///      ▼
    /// Total: 31.878 (shown as $31.88)
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        Money(self.0 * Decimal::from(rate.bps()) / Decimal::from(10_000u32))
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use tableside_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// assert_eq!(unit_price.multiply_quantity(3), Money::from_cents(897));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * Decimal::from(qty))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount rounded to cents, e.g. `$31.88`.
///
/// ## Note
/// For debugging and logs. The front end formats with its own locale rules.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded().0;
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        write!(f, "{}${:.2}", sign, rounded.abs())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a line quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
