//! Core domain errors.

use thiserror::Error;

/// Core domain errors for CartChat.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Market not present in the result set.
    #[error("Market not found: {0}")]
    MarketNotFound(String),

    /// Category not present in the market.
    #[error("Category '{category}' not found in market '{market}'")]
    CategoryNotFound { market: String, category: String },

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
