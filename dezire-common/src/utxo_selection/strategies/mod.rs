//! UTXO selection strategies
//!
//! Each strategy implements the [`Strategy`] trait. The selector context owns the
//! strategy and hands it the target, the candidates and the per-attempt exclusions.

use bitcoin::Amount;

use crate::error::CandidateError;
use crate::utxo_selection::exclusion::ExclusionSet;
use crate::utxo_selection::types::{SelectionResult, SpendableOutput};

pub mod coin_age_priority;
pub mod utils;

// Re-export implementations
pub use coin_age_priority::CoinAgePriorityStrategy;

/// Trait defining a UTXO selection strategy
///
/// Implementations must be pure: no mutation of the candidates or exclusions and no
/// state carried between calls.
pub trait Strategy: Send + Sync {
    /// Name of this strategy
    fn name(&self) -> &'static str;

    /// Select outputs covering `target`
    ///
    /// # Arguments
    /// * `target` - Minimum total to reach
    /// * `candidates` - Spendable outputs snapshot
    /// * `exclusions` - Outputs reserved by other pending operations
    /// * `max_money` - Network maximum; as a target it means "select everything"
    ///
    /// # Returns
    /// * Selection result; its total may fall short of `target`
    /// * `CandidateError` if a candidate violates the data model (value above maximum
    ///   money, or a total that no longer fits)
    fn select(
        &self,
        target: Amount,
        candidates: &[SpendableOutput],
        exclusions: &ExclusionSet,
        max_money: Amount,
    ) -> Result<SelectionResult, CandidateError>;
}
