//! Dezire Common Library
//!
//! Shared functionality for the Dezire Bitcoin wallet: the coin selection used when
//! building transactions, together with the types, errors, logging and configuration
//! it depends on.
//!
//! # Modules
//!
//! - `types`: Network constants and parsing helpers
//! - `error`: Error types for candidate validation, selection and configuration
//! - `logging`: Structured logging infrastructure
//! - `config`: Configuration management
//! - `utxo_selection`: Coin-age priority UTXO selection

/// Network constants and helpers
pub mod types;

/// Error handling
pub mod error;

/// Structured logging functionality
pub mod logging;

/// Configuration management
pub mod config;

/// UTXO selection algorithms and utilities
pub mod utxo_selection;

/// Re-export UTXO selection types
pub use utxo_selection::{
    CandidateSet, CoinAgePriorityStrategy, Confidence, ExclusionSet, RawOutput, SelectionResult,
    SpendableOutput, Strategy, TxConfidence, UtxoSelector,
};

pub use error::{CandidateError, DezireError, DezireResult, ErrorContext};

// Re-export important Bitcoin types
pub use bitcoin::{Amount, Network, OutPoint, Txid};

/// Re-export common constants and helpers
pub use types::{max_money, parse_network, MAX_MONEY_SATS, SATS_PER_COIN};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library from a loaded configuration
///
/// Installs the logger described by the `[logging]` section and checks the
/// remaining settings.
pub fn init(config: &config::Config) -> anyhow::Result<()> {
    logging::init(&config.logging).map_err(|e| anyhow::anyhow!(e))?;
    config.validate()?;
    log::info!("Dezire common library v{} initialized", VERSION);
    Ok(())
}
