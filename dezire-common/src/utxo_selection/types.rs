//! Core types for UTXO selection
//!
//! This module defines the data model the selector works on:
//!
//! - [`OutputKey`]: identity of an output, (parent transaction id, output index)
//! - [`TxConfidence`]: raw confidence observation reported by chain synchronization
//! - [`Confidence`]: the closed classification the selector decides eligibility on
//! - [`SpendableOutput`]: one validated, immutable candidate
//! - [`RawOutput`]: the unvalidated ledger record a candidate is ingested from
//! - [`CandidateSet`]: a validated snapshot with unique output keys
//! - [`SelectionResult`]: chosen outputs in selection order plus their total
//!
//! # Example
//!
//! ```
//! use dezire_common::utxo_selection::types::{Confidence, SpendableOutput};
//! use bitcoin::{Amount, OutPoint, Txid};
//! use std::str::FromStr;
//!
//! let output = SpendableOutput::new(
//!     OutPoint::new(
//!         Txid::from_str("7967a5185e907a25225574544c31f7b059c1a191d65b53dcc1554d339c4f9efc").unwrap(),
//!         0,
//!     ),
//!     Amount::from_sat(10_000),
//!     6,
//!     Confidence::Building,
//! );
//! assert!(output.confidence.is_spendable());
//! ```

use bitcoin::{Amount, Network, OutPoint, Txid};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{CandidateError, DezireError};
use crate::utxo_selection::strategies::utils::total_amount;
use crate::types::{is_single_peer_network, max_money, DEFAULT_MIN_BROADCAST_PEERS, MAX_MONEY_SATS};

/// Identity of an output: (parent transaction id, output index)
///
/// Equality, hashing and ordering derive from the outpoint's bytes, never from
/// memory addresses, so keys built from different snapshots of the same output match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputKey(OutPoint);

impl OutputKey {
    /// Create a key from a parent transaction id and output index
    pub fn new(parent_tx_id: Txid, output_index: u32) -> Self {
        Self(OutPoint::new(parent_tx_id, output_index))
    }

    /// The outpoint this key stands for
    pub fn outpoint(&self) -> OutPoint {
        self.0
    }
}

impl From<OutPoint> for OutputKey {
    fn from(outpoint: OutPoint) -> Self {
        Self(outpoint)
    }
}

impl From<&SpendableOutput> for OutputKey {
    fn from(output: &SpendableOutput) -> Self {
        Self(output.outpoint)
    }
}

impl fmt::Display for OutputKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.0.txid, self.0.vout)
    }
}

/// Chain state of a parent transaction as reported by synchronization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceType {
    /// Included in the best chain
    Building,
    /// Seen but not yet included in a block
    Pending,
    /// Double spent or otherwise invalidated
    Dead,
    /// No information
    Unknown,
}

/// Who created a parent transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceSource {
    /// Created and broadcast by this wallet
    SelfOriginated,
    /// Received from the network (a counterparty created it)
    Network,
    /// Origin not recorded
    Unknown,
}

/// Raw confidence observation for a parent transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxConfidence {
    /// Chain state
    pub kind: ConfidenceType,
    /// Origin of the transaction
    pub source: ConfidenceSource,
    /// Number of peers the transaction has been announced by
    #[serde(default)]
    pub broadcast_peers: u32,
}

impl TxConfidence {
    /// A transaction included in the chain
    pub fn building() -> Self {
        Self {
            kind: ConfidenceType::Building,
            source: ConfidenceSource::Unknown,
            broadcast_peers: 0,
        }
    }

    /// A pending transaction this wallet broadcast, seen on `peers` peers
    pub fn pending_self(peers: u32) -> Self {
        Self {
            kind: ConfidenceType::Pending,
            source: ConfidenceSource::SelfOriginated,
            broadcast_peers: peers,
        }
    }

    /// A pending transaction received from the network
    pub fn pending_network(peers: u32) -> Self {
        Self {
            kind: ConfidenceType::Pending,
            source: ConfidenceSource::Network,
            broadcast_peers: peers,
        }
    }

    /// A dead (conflicted) transaction
    pub fn dead() -> Self {
        Self {
            kind: ConfidenceType::Dead,
            source: ConfidenceSource::Unknown,
            broadcast_peers: 0,
        }
    }
}

/// Classification of how safely an output's parent transaction can be spent from
///
/// The set of variants is closed; eligibility is an exhaustive match over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Included in the authoritative chain
    Building,
    /// Unconfirmed, self-originated and propagated to enough peers
    /// (or on a single-peer test network)
    PendingSelfBroadcastSufficient,
    /// Any other unconfirmed state
    PendingOther,
}

impl Confidence {
    /// Classify an observation with the default propagation threshold
    pub fn classify(observation: &TxConfidence, network: Network) -> Self {
        Self::classify_with_threshold(observation, network, DEFAULT_MIN_BROADCAST_PEERS)
    }

    /// Classify an observation
    ///
    /// A self-originated pending transaction counts as sufficiently broadcast when it was
    /// announced by strictly more than `min_broadcast_peers` peers, or unconditionally on
    /// a single-peer test network.
    pub fn classify_with_threshold(
        observation: &TxConfidence,
        network: Network,
        min_broadcast_peers: u32,
    ) -> Self {
        match (observation.kind, observation.source) {
            (ConfidenceType::Building, _) => Confidence::Building,
            (ConfidenceType::Pending, ConfidenceSource::SelfOriginated)
                if observation.broadcast_peers > min_broadcast_peers
                    || is_single_peer_network(network) =>
            {
                Confidence::PendingSelfBroadcastSufficient
            }
            _ => Confidence::PendingOther,
        }
    }

    /// Whether outputs with this confidence may be selected
    pub fn is_spendable(self) -> bool {
        match self {
            Confidence::Building => true,
            Confidence::PendingSelfBroadcastSufficient => true,
            Confidence::PendingOther => false,
        }
    }
}

/// One unspent output eligible for consideration
///
/// Constructed by the ledger layer (directly or through [`RawOutput`] ingestion) and
/// never mutated by the selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SpendableOutputRecord", into = "SpendableOutputRecord")]
pub struct SpendableOutput {
    /// Parent transaction id and position within it
    pub outpoint: OutPoint,

    /// Amount in the smallest currency unit
    pub value: Amount,

    /// Blocks since inclusion (0 for unconfirmed)
    pub confirmation_depth: u32,

    /// Spendability classification of the parent transaction
    pub confidence: Confidence,
}

impl SpendableOutput {
    /// Create a new output from already validated parts
    pub fn new(
        outpoint: OutPoint,
        value: Amount,
        confirmation_depth: u32,
        confidence: Confidence,
    ) -> Self {
        Self {
            outpoint,
            value,
            confirmation_depth,
            confidence,
        }
    }

    /// Validate and classify a ledger record with the default propagation threshold
    pub fn try_from_raw(raw: &RawOutput, network: Network) -> Result<Self, CandidateError> {
        Self::try_from_raw_with_threshold(raw, network, DEFAULT_MIN_BROADCAST_PEERS)
    }

    /// Validate and classify a ledger record
    pub fn try_from_raw_with_threshold(
        raw: &RawOutput,
        network: Network,
        min_broadcast_peers: u32,
    ) -> Result<Self, CandidateError> {
        let parent_tx_id = Txid::from_str(raw.parent_tx_id.trim())
            .map_err(|_| CandidateError::InvalidParentId(raw.parent_tx_id.clone()))?;

        let output_index =
            u32::try_from(raw.output_index).map_err(|_| CandidateError::InvalidOutputIndex {
                parent: raw.parent_tx_id.clone(),
                index: raw.output_index,
            })?;
        let outpoint = OutPoint::new(parent_tx_id, output_index);

        if raw.value < 0 {
            return Err(CandidateError::NegativeValue {
                outpoint,
                value: raw.value,
            });
        }
        // Non-negative here, so the cast is lossless
        let value = raw.value as u64;
        let max = max_money(network).to_sat();
        if value > max {
            return Err(CandidateError::ValueOutOfRange {
                outpoint,
                value,
                max,
            });
        }

        let confirmation_depth = u32::try_from(raw.confirmation_depth).map_err(|_| {
            CandidateError::InvalidDepth {
                outpoint,
                depth: raw.confirmation_depth,
            }
        })?;

        let confidence =
            Confidence::classify_with_threshold(&raw.confidence, network, min_broadcast_peers);

        Ok(Self {
            outpoint,
            value: Amount::from_sat(value),
            confirmation_depth,
            confidence,
        })
    }

    /// Parent transaction id
    pub fn parent_tx_id(&self) -> Txid {
        self.outpoint.txid
    }

    /// Position within the parent transaction
    pub fn output_index(&self) -> u32 {
        self.outpoint.vout
    }

    /// Exclusion key of this output
    pub fn key(&self) -> OutputKey {
        OutputKey::from(self)
    }

    /// Reject values above the maximum money of any network
    ///
    /// [`new`](Self::new) and the public fields accept any amount, so code summing
    /// candidates built outside ingestion checks them first.
    pub fn check_value(&self) -> Result<(), CandidateError> {
        if self.value.to_sat() > MAX_MONEY_SATS {
            return Err(CandidateError::ValueOutOfRange {
                outpoint: self.outpoint,
                value: self.value.to_sat(),
                max: MAX_MONEY_SATS,
            });
        }
        Ok(())
    }
}

/// Serialized shape of a [`SpendableOutput`]: amounts as satoshis, txid as hex
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SpendableOutputRecord {
    parent_tx_id: String,
    output_index: u32,
    value_sats: u64,
    confirmation_depth: u32,
    confidence: Confidence,
}

impl From<SpendableOutput> for SpendableOutputRecord {
    fn from(output: SpendableOutput) -> Self {
        Self {
            parent_tx_id: output.outpoint.txid.to_string(),
            output_index: output.outpoint.vout,
            value_sats: output.value.to_sat(),
            confirmation_depth: output.confirmation_depth,
            confidence: output.confidence,
        }
    }
}

impl TryFrom<SpendableOutputRecord> for SpendableOutput {
    type Error = CandidateError;

    fn try_from(record: SpendableOutputRecord) -> Result<Self, Self::Error> {
        let txid = Txid::from_str(&record.parent_tx_id)
            .map_err(|_| CandidateError::InvalidParentId(record.parent_tx_id.clone()))?;
        let outpoint = OutPoint::new(txid, record.output_index);
        let output = Self::new(
            outpoint,
            Amount::from_sat(record.value_sats),
            record.confirmation_depth,
            record.confidence,
        );
        output.check_value()?;
        Ok(output)
    }
}

/// Unvalidated output record as exported by the ledger layer
///
/// Numeric fields are signed because the ledger's storage format is; validation into a
/// [`SpendableOutput`] rejects anything the candidate model cannot represent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOutput {
    /// Parent transaction id, 64 hex characters in display order
    pub parent_tx_id: String,
    /// Position within the parent transaction
    pub output_index: i64,
    /// Amount in the smallest currency unit
    pub value: i64,
    /// Blocks since inclusion
    pub confirmation_depth: i64,
    /// Confidence observation for the parent transaction
    pub confidence: TxConfidence,
}

/// Validated snapshot of candidate outputs
///
/// Guarantees that no two outputs share an [`OutputKey`]. Order is preserved as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    outputs: Vec<SpendableOutput>,
}

impl CandidateSet {
    /// Build a candidate set, rejecting duplicate output keys
    pub fn new(outputs: Vec<SpendableOutput>) -> Result<Self, CandidateError> {
        let mut seen = HashSet::with_capacity(outputs.len());
        for output in &outputs {
            if !seen.insert(output.key()) {
                return Err(CandidateError::DuplicateOutput(output.outpoint));
            }
        }
        Ok(Self { outputs })
    }

    /// Validate a batch of ledger records with the default propagation threshold
    pub fn from_raw(raw: &[RawOutput], network: Network) -> Result<Self, DezireError> {
        Self::from_raw_with_threshold(raw, network, DEFAULT_MIN_BROADCAST_PEERS)
    }

    /// Validate a batch of ledger records
    ///
    /// Fails on the first violation; no partial set is ever returned.
    pub fn from_raw_with_threshold(
        raw: &[RawOutput],
        network: Network,
        min_broadcast_peers: u32,
    ) -> Result<Self, DezireError> {
        let outputs = raw
            .iter()
            .map(|r| SpendableOutput::try_from_raw_with_threshold(r, network, min_broadcast_peers))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                log::warn!("Rejected ledger snapshot: {}", e);
                e
            })?;
        Ok(Self::new(outputs)?)
    }

    /// Outputs in their original order
    pub fn as_slice(&self) -> &[SpendableOutput] {
        &self.outputs
    }

    /// Iterate over the outputs
    pub fn iter(&self) -> std::slice::Iter<'_, SpendableOutput> {
        self.outputs.iter()
    }

    /// Number of outputs
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Take the outputs out of the set
    pub fn into_inner(self) -> Vec<SpendableOutput> {
        self.outputs
    }
}

impl AsRef<[SpendableOutput]> for CandidateSet {
    fn as_ref(&self) -> &[SpendableOutput] {
        &self.outputs
    }
}

/// Outcome of one selection attempt
///
/// `total_value` always equals the sum of `chosen`. A total below the requested target
/// is a normal outcome meaning the eligible candidates were insufficient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    total_value: Amount,
    chosen: Vec<SpendableOutput>,
}

impl SelectionResult {
    /// An empty selection
    pub fn empty() -> Self {
        Self {
            total_value: Amount::ZERO,
            chosen: Vec::new(),
        }
    }

    /// Build a result from outputs in selection order, computing the total
    ///
    /// Fails with [`CandidateError::TotalOverflow`] rather than report a total that
    /// differs from the sum of `chosen`.
    pub fn from_chosen(chosen: Vec<SpendableOutput>) -> Result<Self, CandidateError> {
        let total_value = total_amount(&chosen)?;
        Ok(Self { total_value, chosen })
    }

    /// Sum of the chosen outputs' values
    pub fn total_value(&self) -> Amount {
        self.total_value
    }

    /// Chosen outputs in selection order
    pub fn chosen(&self) -> &[SpendableOutput] {
        &self.chosen
    }

    /// Outpoints of the chosen outputs, for the transaction builder
    pub fn outpoints(&self) -> Vec<OutPoint> {
        self.chosen.iter().map(|o| o.outpoint).collect()
    }

    /// Number of chosen outputs
    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    /// Whether nothing was chosen
    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    /// Whether the selection reaches `target`
    pub fn is_sufficient(&self, target: Amount) -> bool {
        self.total_value >= target
    }

    /// Amount still missing to reach `target` (zero when covered)
    pub fn shortfall(&self, target: Amount) -> Amount {
        Amount::from_sat(target.to_sat().saturating_sub(self.total_value.to_sat()))
    }

    /// Translate under-coverage into [`DezireError::InsufficientFunds`]
    pub fn ensure_covers(self, target: Amount) -> Result<Self, DezireError> {
        if self.is_sufficient(target) {
            Ok(self)
        } else {
            Err(DezireError::InsufficientFunds {
                available: self.total_value,
                required: target,
            })
        }
    }
}

impl Default for SelectionResult {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn building_is_spendable_regardless_of_source() {
        let mut obs = TxConfidence::building();
        obs.source = ConfidenceSource::Network;
        assert_eq!(Confidence::classify(&obs, Network::Bitcoin), Confidence::Building);
    }

    #[test]
    fn self_pending_needs_more_than_one_peer() {
        assert_eq!(
            Confidence::classify(&TxConfidence::pending_self(1), Network::Bitcoin),
            Confidence::PendingOther
        );
        assert_eq!(
            Confidence::classify(&TxConfidence::pending_self(2), Network::Bitcoin),
            Confidence::PendingSelfBroadcastSufficient
        );
    }

    #[test]
    fn regtest_waives_propagation() {
        assert_eq!(
            Confidence::classify(&TxConfidence::pending_self(0), Network::Regtest),
            Confidence::PendingSelfBroadcastSufficient
        );
        // Counterparty transactions stay ineligible even on regtest
        assert_eq!(
            Confidence::classify(&TxConfidence::pending_network(5), Network::Regtest),
            Confidence::PendingOther
        );
    }

    #[test]
    fn dead_and_unknown_are_other() {
        let unknown = TxConfidence {
            kind: ConfidenceType::Unknown,
            source: ConfidenceSource::SelfOriginated,
            broadcast_peers: 10,
        };
        assert_eq!(Confidence::classify(&unknown, Network::Bitcoin), Confidence::PendingOther);
        assert_eq!(
            Confidence::classify(&TxConfidence::dead(), Network::Regtest),
            Confidence::PendingOther
        );
    }

    #[test]
    fn custom_threshold_is_strict() {
        let obs = TxConfidence::pending_self(3);
        assert_eq!(
            Confidence::classify_with_threshold(&obs, Network::Testnet, 3),
            Confidence::PendingOther
        );
        assert_eq!(
            Confidence::classify_with_threshold(&obs, Network::Testnet, 2),
            Confidence::PendingSelfBroadcastSufficient
        );
    }

    #[test]
    fn only_pending_other_is_unspendable() {
        assert!(Confidence::Building.is_spendable());
        assert!(Confidence::PendingSelfBroadcastSufficient.is_spendable());
        assert!(!Confidence::PendingOther.is_spendable());
    }

    #[test]
    fn oversized_value_fails_check() {
        let txid = Txid::from_str(
            "7967a5185e907a25225574544c31f7b059c1a191d65b53dcc1554d339c4f9efc",
        )
        .unwrap();
        let output = SpendableOutput::new(
            OutPoint::new(txid, 0),
            Amount::from_sat(u64::MAX - 1),
            1,
            Confidence::Building,
        );
        assert_eq!(
            output.check_value(),
            Err(CandidateError::ValueOutOfRange {
                outpoint: OutPoint::new(txid, 0),
                value: u64::MAX - 1,
                max: MAX_MONEY_SATS,
            })
        );
    }

    #[test]
    fn deserialized_oversized_value_keeps_amount() {
        let json = r#"{
            "parent_tx_id": "7967a5185e907a25225574544c31f7b059c1a191d65b53dcc1554d339c4f9efc",
            "output_index": 0,
            "value_sats": 18446744073709551615,
            "confirmation_depth": 1,
            "confidence": "building"
        }"#;
        let err = serde_json::from_str::<SpendableOutput>(json).unwrap_err();
        assert!(err.to_string().contains("18446744073709551615"));
    }

    #[test]
    fn shortfall_saturates() {
        let result = SelectionResult::empty();
        assert_eq!(result.shortfall(Amount::from_sat(5)), Amount::from_sat(5));
        assert!(result.is_sufficient(Amount::ZERO));
        assert_eq!(result.shortfall(Amount::ZERO), Amount::ZERO);
    }
}
