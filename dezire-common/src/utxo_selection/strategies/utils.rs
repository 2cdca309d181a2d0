//! Utility functions for UTXO selection
//!
//! Ranking helpers shared by selection strategies.

use bitcoin::hashes::Hash;
use bitcoin::{Amount, Txid};
use std::cmp::Reverse;

use crate::error::CandidateError;
use crate::utxo_selection::types::SpendableOutput;

/// Coin-age of an output: value times confirmation depth
///
/// Computed in 128 bits; the product of any `u64` value and `u32` depth fits.
pub fn coin_depth(output: &SpendableOutput) -> u128 {
    u128::from(output.value.to_sat()) * u128::from(output.confirmation_depth)
}

/// Parent transaction id as a big-endian number
///
/// `Txid` stores its bytes in wire order, which is the reverse of the displayed hex.
/// Reversing yields bytes whose lexicographic order equals the numeric order of the
/// displayed id.
pub fn txid_numeric_bytes(txid: &Txid) -> [u8; 32] {
    let mut bytes = txid.to_byte_array();
    bytes.reverse();
    bytes
}

/// Composite ranking key; smaller keys are selected first
///
/// Ordering: higher coin depth, then lower value, then lower parent id, then lower
/// output index. The last component only separates outputs of the same parent that are
/// otherwise identical, making the order total without relying on input order.
pub type RankingKey = (Reverse<u128>, u64, [u8; 32], u32);

/// Ranking key of an output
pub fn ranking_key(output: &SpendableOutput) -> RankingKey {
    (
        Reverse(coin_depth(output)),
        output.value.to_sat(),
        txid_numeric_bytes(&output.outpoint.txid),
        output.outpoint.vout,
    )
}

/// Sort outputs by priority (highest coin depth first)
pub fn sort_by_priority(outputs: &mut [&SpendableOutput]) {
    outputs.sort_by_cached_key(|output| ranking_key(output));
}

/// Add an output's value to a running total
pub fn checked_accumulate(
    total: Amount,
    output: &SpendableOutput,
) -> Result<Amount, CandidateError> {
    total
        .to_sat()
        .checked_add(output.value.to_sat())
        .map(Amount::from_sat)
        .ok_or(CandidateError::TotalOverflow {
            outpoint: output.outpoint,
            value: output.value.to_sat(),
        })
}

/// Calculate the total value of a set of outputs
pub fn total_amount<'a, I>(outputs: I) -> Result<Amount, CandidateError>
where
    I: IntoIterator<Item = &'a SpendableOutput>,
{
    outputs
        .into_iter()
        .try_fold(Amount::ZERO, checked_accumulate)
}
