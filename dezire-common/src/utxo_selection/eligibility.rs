//! Eligibility predicate
//!
//! Decides, independent of ordering, whether a candidate may be spent in the current
//! selection round. Pure: neither the output nor the exclusion set is touched.

use crate::utxo_selection::exclusion::ExclusionSet;
use crate::utxo_selection::types::SpendableOutput;

/// Whether `output` may be selected this round
///
/// Reserved outputs are never eligible. Otherwise the parent's confidence decides:
/// chain-included and sufficiently broadcast self-originated outputs are spendable,
/// everything else is not.
pub fn is_eligible(output: &SpendableOutput, exclusions: &ExclusionSet) -> bool {
    if exclusions.contains(output) {
        return false;
    }
    output.confidence.is_spendable()
}

/// Eligible outputs in their original order
pub fn eligible_outputs<'a>(
    candidates: &'a [SpendableOutput],
    exclusions: &ExclusionSet,
) -> Vec<&'a SpendableOutput> {
    candidates
        .iter()
        .filter(|output| is_eligible(output, exclusions))
        .collect()
}
