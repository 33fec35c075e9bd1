//! Domain validation errors for core domain types.
//!
//! These errors signal violated preconditions of pure domain computations.
//! Callers are expected to filter inputs before reaching them, so seeing one
//! at runtime indicates a logic defect rather than a recoverable condition.
//!
//! ```
//! use referee::domain::cost::CostModel;
//! use referee::domain::error::DomainError;
//! use rust_decimal_macros::dec;
//!
//! let model = CostModel::new(dec!(1000), dec!(5));
//! let result = model.evaluate(dec!(0), dec!(100), dec!(0.1), dec!(0.1));
//! assert!(matches!(result, Err(DomainError::NonPositiveBuyPrice { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The buy price divides the notional, so it must be positive.
    #[error("buy price must be positive, got {price}")]
    NonPositiveBuyPrice {
        /// The invalid price that was provided.
        price: rust_decimal::Decimal,
    },

    /// An intermediate cost value left the representable decimal range.
    #[error("arithmetic overflow computing {step}")]
    Overflow {
        /// The formula step that overflowed.
        step: &'static str,
    },
}
