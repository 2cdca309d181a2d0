//! Common data types and network constants for the Dezire wallet
//!
//! These values describe the currency the wallet operates on. They are shared by
//! candidate ingestion (value bounds), the selector (the "select everything" sentinel)
//! and configuration parsing.

use bitcoin::{Amount, Network};
use std::str::FromStr;

use crate::error::{config_error_with_source, DezireResult};

/// Constant for satoshis per coin
pub const SATS_PER_COIN: u64 = 100_000_000;

/// Maximum money in the smallest currency unit
///
/// Used both as the upper bound of a single output's value and as the
/// "select everything" target understood by the selector.
pub const MAX_MONEY_SATS: u64 = 21_000_000 * SATS_PER_COIN;

/// Default number of peers a self-originated pending transaction must be seen on
/// before its outputs are spendable (the count must be strictly greater than this)
pub const DEFAULT_MIN_BROADCAST_PEERS: u32 = 1;

/// Maximum money for the given network
///
/// All supported networks share one monetary policy; the function exists so the
/// bound is always looked up per network rather than hard-coded at call sites.
pub fn max_money(_network: Network) -> Amount {
    Amount::from_sat(MAX_MONEY_SATS)
}

/// Whether the network is a single-peer test network
///
/// On such networks a locally broadcast transaction can never be observed on more
/// than one peer, so propagation is not required before spending its outputs.
pub fn is_single_peer_network(network: Network) -> bool {
    network == Network::Regtest
}

/// Parse a network name as used in configuration files
///
/// Accepts the canonical lowercase names (`bitcoin`, `testnet`, `signet`, `regtest`)
/// case-insensitively, plus `mainnet` as an alias for `bitcoin`.
pub fn parse_network(name: &str) -> DezireResult<Network> {
    let normalized = name.trim().to_lowercase();
    let canonical = match normalized.as_str() {
        "mainnet" => "bitcoin",
        other => other,
    };
    Network::from_str(canonical)
        .map_err(|e| config_error_with_source(format!("Unknown network: {}", name), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_network_aliases() {
        assert_eq!(parse_network("Bitcoin").unwrap(), Network::Bitcoin);
        assert_eq!(parse_network("mainnet").unwrap(), Network::Bitcoin);
        assert_eq!(parse_network(" regtest ").unwrap(), Network::Regtest);
    }

    #[test]
    fn unknown_network_keeps_parse_error_as_source() {
        let err = parse_network("dogecoin").unwrap_err();
        assert_eq!(err.user_message(), "Configuration error: Unknown network: dogecoin");
        let source = std::error::Error::source(&err).expect("parse error kept as source");
        assert!(source.to_string().contains("dogecoin"));
    }

    #[test]
    fn only_regtest_is_single_peer() {
        assert!(is_single_peer_network(Network::Regtest));
        assert!(!is_single_peer_network(Network::Testnet));
        assert!(!is_single_peer_network(Network::Bitcoin));
    }

    #[test]
    fn max_money_matches_constant() {
        assert_eq!(max_money(Network::Signet).to_sat(), MAX_MONEY_SATS);
    }
}
