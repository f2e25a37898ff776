//! Unified error handling for repository operations.

use thiserror::Error;

use tailordesk_core::PhoneError;

use crate::store::StoreError;

/// Input rejected before any store call was made.
///
/// A validation failure is never partially applied: the record store is not
/// touched once any field fails.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A phone number failed structural validation.
    #[error("invalid phone number: {0}")]
    Phone(#[from] PhoneError),

    /// A numeric field could not be parsed as a number.
    #[error("{field} must be a number, got \"{value}\"")]
    InvalidAmount {
        /// Field name as shown on the form.
        field: &'static str,
        /// The rejected input.
        value: String,
    },

    /// A date field could not be parsed as `YYYY-MM-DD`.
    #[error("invalid delivery date \"{0}\", expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Advance paid exceeds the order price.
    #[error("advance paid cannot be greater than price")]
    AdvanceExceedsPrice,
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Input failed validation; the store was not called.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Requested record was not found (or belongs to another shop).
    #[error("not found")]
    NotFound,

    /// The underlying record store call failed. Propagated to the caller
    /// with no automatic retry; retries are a UI concern.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A stored document no longer deserializes into its record type.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}
