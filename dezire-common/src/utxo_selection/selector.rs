//! Main UTXO selector implementation
//!
//! The `UtxoSelector` is the entry point the transaction-building layer uses to decide
//! which existing outputs to spend. It holds the network parameters (the "select
//! everything" sentinel and the propagation threshold used when classifying ledger
//! records) and delegates the actual choice to a [`Strategy`], by default
//! [`CoinAgePriorityStrategy`].
//!
//! # Usage
//!
//! ```
//! use dezire_common::utxo_selection::selector::UtxoSelector;
//! use dezire_common::utxo_selection::exclusion::ExclusionSet;
//! use dezire_common::utxo_selection::types::{Confidence, SpendableOutput};
//! use bitcoin::{Amount, OutPoint, Txid};
//! use std::str::FromStr;
//!
//! let txid = Txid::from_str("7967a5185e907a25225574544c31f7b059c1a191d65b53dcc1554d339c4f9efc").unwrap();
//! let candidates = vec![
//!     SpendableOutput::new(OutPoint::new(txid, 0), Amount::from_sat(100), 10, Confidence::Building),
//!     SpendableOutput::new(OutPoint::new(txid, 1), Amount::from_sat(50), 50, Confidence::Building),
//! ];
//!
//! let selector = UtxoSelector::new();
//! let result = selector
//!     .select(Amount::from_sat(120), &candidates, &ExclusionSet::empty())
//!     .unwrap();
//! assert_eq!(result.total_value(), Amount::from_sat(150));
//! assert_eq!(result.chosen()[0].outpoint.vout, 1);
//! ```
//!
//! # Concurrency
//!
//! A selector carries no per-call state. It is `Send + Sync` and may be shared between
//! threads as long as each call receives its own candidate snapshot and exclusion set.

use bitcoin::{Amount, Network};
use serde_json::json;

use crate::config::SelectionConfig;
use crate::error::DezireResult;
use crate::logging::{self, LogLevel};
use crate::types::{self, parse_network, DEFAULT_MIN_BROADCAST_PEERS};
use crate::utxo_selection::exclusion::ExclusionSet;
use crate::utxo_selection::strategies::{CoinAgePriorityStrategy, Strategy};
use crate::utxo_selection::types::{CandidateSet, RawOutput, SelectionResult, SpendableOutput};

/// UTXO selector delegating to a selection strategy
///
/// # Design Pattern
///
/// - `UtxoSelector` is the context
/// - `Strategy` trait defines the interface for strategies
/// - `CoinAgePriorityStrategy` is the default concrete strategy
pub struct UtxoSelector {
    /// Network the candidates belong to
    network: Network,
    /// Explicit "select everything" sentinel, overriding the network maximum
    max_money_override: Option<Amount>,
    /// Self-originated pending transactions need strictly more peers than this
    min_broadcast_peers: u32,
    /// Strategy making the actual choice
    strategy: Box<dyn Strategy>,
}

impl UtxoSelector {
    /// Create a new UTXO selector with default settings
    ///
    /// # Returns
    ///
    /// A new `UtxoSelector` with:
    /// - Network set to mainnet
    /// - Propagation threshold of one peer
    /// - The coin-age priority strategy
    pub fn new() -> Self {
        Self {
            network: Network::Bitcoin,
            max_money_override: None,
            min_broadcast_peers: DEFAULT_MIN_BROADCAST_PEERS,
            strategy: Box::new(CoinAgePriorityStrategy::new()),
        }
    }

    /// Create a selector from the `[selection]` configuration section
    pub fn from_config(config: &SelectionConfig) -> DezireResult<Self> {
        let network = parse_network(&config.network)?;
        let mut selector = Self::new()
            .with_network(network)
            .with_min_broadcast_peers(config.min_broadcast_peers);
        if let Some(sats) = config.max_money_sats {
            selector = selector.with_max_money(Amount::from_sat(sats));
        }
        Ok(selector)
    }

    /// Set the network for this selector
    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    /// Override the "select everything" sentinel
    pub fn with_max_money(mut self, max_money: Amount) -> Self {
        self.max_money_override = Some(max_money);
        self
    }

    /// Set the propagation threshold used when ingesting ledger records
    pub fn with_min_broadcast_peers(mut self, peers: u32) -> Self {
        self.min_broadcast_peers = peers;
        self
    }

    /// Replace the selection strategy
    pub fn with_strategy<S: Strategy + 'static>(mut self, strategy: S) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    /// Network this selector works on
    pub fn network(&self) -> Network {
        self.network
    }

    /// Propagation threshold for self-originated pending transactions
    pub fn min_broadcast_peers(&self) -> u32 {
        self.min_broadcast_peers
    }

    /// Name of the active strategy
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// The target value meaning "select everything"
    pub fn max_money(&self) -> Amount {
        self.max_money_override
            .unwrap_or_else(|| types::max_money(self.network))
    }

    /// Validate a ledger snapshot into a candidate set
    ///
    /// Classification uses this selector's network and propagation threshold. Any
    /// malformed record fails the whole snapshot.
    pub fn ingest(&self, raw: &[RawOutput]) -> DezireResult<CandidateSet> {
        let candidates =
            CandidateSet::from_raw_with_threshold(raw, self.network, self.min_broadcast_peers)?;
        logging::log_ledger(
            LogLevel::Debug,
            "ledger snapshot ingested",
            Some(json!({
                "records": raw.len(),
                "network": self.network.to_string(),
            })),
        );
        Ok(candidates)
    }

    /// Select outputs covering `target`
    ///
    /// # Arguments
    ///
    /// * `target` - Minimum total to reach; [`max_money`](Self::max_money) selects everything
    /// * `candidates` - Spendable outputs snapshot, keys assumed unique
    /// * `exclusions` - Outputs reserved by other pending operations
    ///
    /// # Returns
    ///
    /// * `SelectionResult` - chosen outputs in selection order; the total is below
    ///   `target` when the eligible candidates were insufficient
    /// * `DezireError::Candidate` - a candidate's value exceeds maximum money, or the
    ///   chosen total does not fit in 64 bits
    pub fn select(
        &self,
        target: Amount,
        candidates: &[SpendableOutput],
        exclusions: &ExclusionSet,
    ) -> DezireResult<SelectionResult> {
        logging::log_selection(
            LogLevel::Debug,
            "selection requested",
            Some(json!({
                "strategy": self.strategy.name(),
                "target": target.to_sat(),
                "candidates": candidates.len(),
                "excluded": exclusions.len(),
            })),
        );

        let result = self
            .strategy
            .select(target, candidates, exclusions, self.max_money())
            .map_err(|e| {
                logging::log_selection(
                    LogLevel::Warn,
                    "selection rejected malformed candidates",
                    Some(logging::log_params(vec![("error", e.to_string())])),
                );
                e
            })?;

        logging::log_selection(
            LogLevel::Debug,
            "selection finished",
            Some(json!({
                "total": result.total_value().to_sat(),
                "sufficient": result.is_sufficient(target),
                "chosen": result
                    .chosen()
                    .iter()
                    .map(|o| logging::sanitize_outpoint(&o.outpoint))
                    .collect::<Vec<_>>(),
            })),
        );

        Ok(result)
    }

    /// Select outputs, building the exclusion set from outputs already used elsewhere
    pub fn select_excluding(
        &self,
        target: Amount,
        candidates: &[SpendableOutput],
        already_used: &[SpendableOutput],
    ) -> DezireResult<SelectionResult> {
        let exclusions = ExclusionSet::build(already_used);
        self.select(target, candidates, &exclusions)
    }

    /// Select every eligible, non-excluded output in input order
    pub fn select_all(
        &self,
        candidates: &[SpendableOutput],
        exclusions: &ExclusionSet,
    ) -> DezireResult<SelectionResult> {
        self.select(self.max_money(), candidates, exclusions)
    }

    /// Total value currently spendable
    pub fn spendable_balance(
        &self,
        candidates: &[SpendableOutput],
        exclusions: &ExclusionSet,
    ) -> DezireResult<Amount> {
        Ok(self.select_all(candidates, exclusions)?.total_value())
    }

    /// Select outputs and fail with `InsufficientFunds` when `target` is not covered
    pub fn select_or_insufficient(
        &self,
        target: Amount,
        candidates: &[SpendableOutput],
        exclusions: &ExclusionSet,
    ) -> DezireResult<SelectionResult> {
        self.select(target, candidates, exclusions)?
            .ensure_covers(target)
    }
}

impl Default for UtxoSelector {
    fn default() -> Self {
        Self::new()
    }
}
