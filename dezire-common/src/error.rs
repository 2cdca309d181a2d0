//! Standardized error handling for the Dezire wallet
//!
//! This module provides the error hierarchy shared by the selection core and the
//! ambient layers around it (configuration, logging, candidate ingestion).
//!
//! Two kinds of failure are deliberately kept apart:
//!
//! - Business outcomes such as "the candidates do not cover the target" are NOT errors
//!   inside the selector. A short [`SelectionResult`](crate::utxo_selection::SelectionResult)
//!   is returned and callers may translate it into [`DezireError::InsufficientFunds`].
//! - Data-integrity violations coming from the ledger layer (negative values, duplicate
//!   outputs, unparsable transaction ids) are rejected at ingestion with a
//!   [`CandidateError`]. Candidates built directly are re-checked by the selector, which
//!   fails with the same error instead of returning a wrong total.
//!
//! # Usage
//!
//! ```
//! use dezire_common::error::{DezireError, ErrorContext};
//!
//! fn read_snapshot(path: &str) -> Result<String, DezireError> {
//!     let content = std::fs::read_to_string(path)
//!         .context("Failed to read output snapshot")?;
//!     Ok(content)
//! }
//! ```

use bitcoin::{Amount, OutPoint};
use std::error::Error as StdError;
use std::io;
use thiserror::Error;

/// Errors raised while turning ledger records into selectable candidates
///
/// Every variant is a precondition failure: the upstream ledger handed over data that
/// violates the candidate data model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CandidateError {
    /// Parent transaction id is not a 32-byte hex hash
    #[error("Invalid parent transaction id: {0}")]
    InvalidParentId(String),

    /// Output position does not fit an unsigned 32-bit index
    #[error("Invalid output index {index} for output of {parent}")]
    InvalidOutputIndex { parent: String, index: i64 },

    /// Output carries a negative amount
    #[error("Negative value {value} for output {outpoint}")]
    NegativeValue { outpoint: OutPoint, value: i64 },

    /// Output amount exceeds the network's maximum money
    #[error("Value {value} for output {outpoint} exceeds maximum money {max}")]
    ValueOutOfRange { outpoint: OutPoint, value: u64, max: u64 },

    /// Confirmation depth is negative or does not fit an unsigned 32-bit count
    #[error("Invalid confirmation depth {depth} for output {outpoint}")]
    InvalidDepth { outpoint: OutPoint, depth: i64 },

    /// The same (parent id, output index) appears twice in one candidate set
    #[error("Duplicate output {0} in candidate set")]
    DuplicateOutput(OutPoint),

    /// Adding this output's value to the running total exceeds the 64-bit range
    #[error("Total value overflows when adding output {outpoint} ({value} sat)")]
    TotalOverflow { outpoint: OutPoint, value: u64 },
}

/// The main error type for the Dezire wallet libraries
#[derive(Debug, Error)]
pub enum DezireError {
    /// A ledger record failed candidate validation
    #[error("Candidate error: {0}")]
    Candidate(#[from] CandidateError),

    /// Eligible candidates could not cover the requested amount
    #[error("Insufficient funds: available {available}, required {required}")]
    InsufficientFunds { available: Amount, required: Amount },

    /// Configuration errors
    #[error("Configuration error: {context}")]
    Config {
        context: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// I/O errors
    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        context: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

/// Extension trait for adding context to error types
pub trait ErrorContext<T, E> {
    /// Add human-readable context to an error, keeping the original as the source
    fn context(self, context: impl Into<String>) -> Result<T, E>;
}

impl<T, E: Into<DezireError>> ErrorContext<T, DezireError> for Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T, DezireError> {
        self.map_err(|err| match err.into() {
            DezireError::Config { source, .. } => DezireError::Config {
                context: context.into(),
                source,
            },
            DezireError::Io { source, .. } => DezireError::Io {
                context: context.into(),
                source,
            },
            DezireError::Serialization { source, .. } => DezireError::Serialization {
                context: context.into(),
                source,
            },
            // Candidate and funding errors already describe themselves precisely
            other => other,
        })
    }
}

impl From<io::Error> for DezireError {
    fn from(err: io::Error) -> Self {
        DezireError::Io {
            context: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for DezireError {
    fn from(err: serde_json::Error) -> Self {
        DezireError::Serialization {
            context: format!("JSON serialization error: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::de::Error> for DezireError {
    fn from(err: toml::de::Error) -> Self {
        DezireError::Serialization {
            context: format!("TOML deserialization error: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::ser::Error> for DezireError {
    fn from(err: toml::ser::Error) -> Self {
        DezireError::Serialization {
            context: format!("TOML serialization error: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

/// Create a new configuration error with context and source
pub fn config_error_with_source<S: Into<String>, E: StdError + Send + Sync + 'static>(
    context: S,
    source: E,
) -> DezireError {
    DezireError::Config {
        context: context.into(),
        source: Some(Box::new(source)),
    }
}

/// Type alias for a Result with DezireError
pub type DezireResult<T> = Result<T, DezireError>;

impl DezireError {
    /// Whether this error is the caller-side translation of an under-covered selection
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, DezireError::InsufficientFunds { .. })
    }

    /// Get a message suitable for displaying to users
    pub fn user_message(&self) -> String {
        match self {
            DezireError::InsufficientFunds { .. } => "Insufficient balance".to_string(),
            DezireError::Candidate(_) => {
                "Wallet data is inconsistent, please resynchronize".to_string()
            }
            DezireError::Config { context, .. } => format!("Configuration error: {}", context),
            DezireError::Io { context, .. } => format!("File operation error: {}", context),
            DezireError::Serialization { context, .. } => format!("Data format error: {}", context),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_replaces_io_message() {
        let result: Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let err = result.context("Failed to open snapshot").unwrap_err();
        match err {
            DezireError::Io { context, source } => {
                assert_eq!(context, "Failed to open snapshot");
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn context_keeps_candidate_errors() {
        let result: Result<(), CandidateError> =
            Err(CandidateError::InvalidParentId("zz".to_string()));
        let err = result.context("ignored").unwrap_err();
        assert!(matches!(
            err,
            DezireError::Candidate(CandidateError::InvalidParentId(_))
        ));
    }

    #[test]
    fn insufficient_funds_message_is_generic() {
        let err = DezireError::InsufficientFunds {
            available: Amount::from_sat(100),
            required: Amount::from_sat(120),
        };
        assert!(err.is_insufficient_funds());
        assert_eq!(err.user_message(), "Insufficient balance");
        assert!(err.to_string().contains("required"));
    }
}
