//! Coin-age priority selection strategy
//!
//! Spends the outputs that destroy the most coin-age (value times confirmation depth)
//! first, which gives the resulting transaction the highest possible priority. This may
//! spend more priority than strictly needed to get the transaction confirmed.

use bitcoin::Amount;

use crate::error::CandidateError;
use crate::utxo_selection::eligibility::eligible_outputs;
use crate::utxo_selection::exclusion::ExclusionSet;
use crate::utxo_selection::strategies::utils;
use crate::utxo_selection::strategies::Strategy;
use crate::utxo_selection::types::{SelectionResult, SpendableOutput};

/// Strategy selecting the highest coin-age outputs first
#[derive(Debug, Clone, Copy, Default)]
pub struct CoinAgePriorityStrategy;

impl CoinAgePriorityStrategy {
    /// Create a new CoinAgePriorityStrategy
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for CoinAgePriorityStrategy {
    fn name(&self) -> &'static str {
        "CoinAgePriority"
    }

    fn select(
        &self,
        target: Amount,
        candidates: &[SpendableOutput],
        exclusions: &ExclusionSet,
        max_money: Amount,
    ) -> Result<SelectionResult, CandidateError> {
        for candidate in candidates {
            candidate.check_value()?;
        }

        let mut ordered = eligible_outputs(candidates, exclusions);

        // Whole-balance requests take everything, so ordering is irrelevant
        if target != max_money {
            utils::sort_by_priority(&mut ordered);
        }

        let mut chosen = Vec::new();
        let mut total = Amount::ZERO;
        for output in ordered {
            if total >= target {
                break;
            }
            total = utils::checked_accumulate(total, output)?;
            chosen.push(output.clone());
        }

        // Total may be lower than target when the candidates were insufficient
        SelectionResult::from_chosen(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{max_money, MAX_MONEY_SATS};
    use crate::utxo_selection::types::Confidence;
    use bitcoin::hashes::Hash;
    use bitcoin::{Network, OutPoint, Txid};

    fn output(byte: u8, sats: u64, depth: u32) -> SpendableOutput {
        SpendableOutput::new(
            OutPoint::new(Txid::from_byte_array([byte; 32]), 0),
            Amount::from_sat(sats),
            depth,
            Confidence::Building,
        )
    }

    fn select(
        target: Amount,
        candidates: &[SpendableOutput],
    ) -> Result<SelectionResult, CandidateError> {
        CoinAgePriorityStrategy::new().select(
            target,
            candidates,
            &ExclusionSet::empty(),
            max_money(Network::Bitcoin),
        )
    }

    #[test]
    fn zero_target_selects_nothing() {
        let result = select(Amount::ZERO, &[output(1, 500, 3)]).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.total_value(), Amount::ZERO);
    }

    #[test]
    fn stops_once_target_is_met() {
        let candidates = vec![output(1, 500, 3), output(2, 400, 3), output(3, 300, 3)];
        let result = select(Amount::from_sat(500), &candidates).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.total_value(), Amount::from_sat(500));
    }

    #[test]
    fn value_above_max_money_is_rejected() {
        let candidates = vec![output(1, u64::MAX - 1, 1), output(2, 5, 1)];
        let err = select(Amount::from_sat(u64::MAX), &candidates).unwrap_err();
        assert!(matches!(
            err,
            CandidateError::ValueOutOfRange { value, max: MAX_MONEY_SATS, .. }
                if value == u64::MAX - 1
        ));
    }

    #[test]
    fn ineligible_oversized_value_is_still_rejected() {
        let mut bad = output(1, u64::MAX, 1);
        bad.confidence = Confidence::PendingOther;
        assert!(select(Amount::from_sat(1), &[bad, output(2, 5, 1)]).is_err());
    }

    #[test]
    fn running_total_overflow_is_an_error() {
        // Each value is within max money, their sum is not within u64
        let count = u64::MAX / MAX_MONEY_SATS + 1;
        let candidates: Vec<_> = (0..count)
            .map(|i| {
                SpendableOutput::new(
                    OutPoint::new(Txid::from_byte_array([7; 32]), i as u32),
                    Amount::from_sat(MAX_MONEY_SATS),
                    1,
                    Confidence::Building,
                )
            })
            .collect();
        let err = select(Amount::from_sat(u64::MAX), &candidates).unwrap_err();
        assert!(matches!(
            err,
            CandidateError::TotalOverflow { value: MAX_MONEY_SATS, .. }
        ));
    }
}
