//! Structural contracts for flow inputs and outputs.
//!
//! Serde handles shape and enumerations; `Validate` covers the constraints serde
//! cannot express (non-empty strings, bounded ticker length). Every flow runs
//! input and output through here and gets a `Result`, never a panic.

use thiserror::Error;

/// Longest ticker symbol the dashboard accepts.
pub const MAX_TICKER_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{path}: {reason}")]
    Nested { path: String, reason: Box<SchemaViolation> },
}

pub trait Validate {
    fn validate(&self) -> Result<(), SchemaViolation>;
}

pub fn require_non_empty(field: &'static str, value: &str) -> Result<(), SchemaViolation> {
    if value.trim().is_empty() {
        return Err(SchemaViolation::Empty { field });
    }
    Ok(())
}

/// Ticker: non-empty after trimming, bounded length.
pub fn validate_ticker(value: &str) -> Result<(), SchemaViolation> {
    require_non_empty("ticker", value)?;
    if value.trim().chars().count() > MAX_TICKER_LEN {
        return Err(SchemaViolation::TooLong {
            field: "ticker",
            max: MAX_TICKER_LEN,
        });
    }
    Ok(())
}

/// Validates each element, reporting the first failure with its index.
pub fn validate_each<T: Validate>(field: &str, items: &[T]) -> Result<(), SchemaViolation> {
    for (i, item) in items.iter().enumerate() {
        item.validate().map_err(|reason| SchemaViolation::Nested {
            path: format!("{field}[{i}]"),
            reason: Box::new(reason),
        })?;
    }
    Ok(())
}
