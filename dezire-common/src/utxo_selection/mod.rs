//! UTXO selection module
//!
//! Decides which existing unspent outputs a new transaction spends. The selection
//! prefers outputs that destroy the most coin-age (value × confirmation depth) so the
//! transaction gets the best possible priority, never touches outputs reserved by other
//! in-flight transactions or outputs whose parent transaction is not yet safe to spend,
//! and ranks candidates by a strict total order so identical inputs always produce the
//! identical choice.
//!
//! # Module Structure
//!
//! - `types.rs` - Candidate data model, ingestion and the selection result
//! - `exclusion.rs` - Outputs already reserved by pending operations
//! - `eligibility.rs` - Whether a candidate may be spent this round
//! - `selector.rs` - Main selector (Strategy pattern context)
//! - `strategies/` - Strategy implementations
//!   - `coin_age_priority.rs` - Highest coin-age first
//!   - `utils.rs` - Coin depth and ranking key
//!
//! # Control Flow
//!
//! 1. The ledger layer hands over a snapshot of outputs ([`RawOutput`] records are
//!    validated into a [`CandidateSet`]).
//! 2. The caller builds an [`ExclusionSet`] from outputs already committed elsewhere.
//! 3. [`UtxoSelector::select`] filters, ranks and accumulates, returning a
//!    [`SelectionResult`].
//! 4. The transaction builder checks the total against target plus fee; under-coverage
//!    is reported to the user as insufficient balance.
//!
//! Fee estimation, change outputs, signing and broadcast are out of scope here.

pub mod eligibility;
pub mod exclusion;
pub mod selector;
pub mod strategies;
pub mod types;

pub use eligibility::{eligible_outputs, is_eligible};
pub use exclusion::ExclusionSet;
pub use selector::UtxoSelector;
pub use strategies::{CoinAgePriorityStrategy, Strategy};
pub use types::{
    CandidateSet, Confidence, ConfidenceSource, ConfidenceType, OutputKey, RawOutput,
    SelectionResult, SpendableOutput, TxConfidence,
};
