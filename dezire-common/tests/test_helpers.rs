//! Shared helpers for the integration tests
#![allow(dead_code)]

use bitcoin::hashes::Hash;
use bitcoin::{Amount, OutPoint, Txid};
use dezire_common::utxo_selection::{Confidence, RawOutput, SpendableOutput, TxConfidence};
use lazy_static::lazy_static;
use log::LevelFilter;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, Once};

static INIT: Once = Once::new();

lazy_static! {
    static ref TEST_MUTEX: Mutex<()> = Mutex::new(());
}

/// Initialize logging for tests
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .try_init();
    });
}

/// Serialize tests that touch process-wide state (the logger, the filesystem)
pub fn serial_guard() -> MutexGuard<'static, ()> {
    TEST_MUTEX.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Txid whose displayed hex reads as the number `n`
pub fn txid_from_number(n: u64) -> Txid {
    let mut display = [0u8; 32];
    display[24..].copy_from_slice(&n.to_be_bytes());
    // Internal byte order is the reverse of the displayed hex
    display.reverse();
    Txid::from_byte_array(display)
}

/// Txid parsed from 64 hex characters
pub fn txid(hex: &str) -> Txid {
    Txid::from_str(hex).expect("valid txid hex")
}

/// Output with an explicit confidence
pub fn output(
    parent: u64,
    vout: u32,
    sats: u64,
    depth: u32,
    confidence: Confidence,
) -> SpendableOutput {
    SpendableOutput::new(
        OutPoint::new(txid_from_number(parent), vout),
        Amount::from_sat(sats),
        depth,
        confidence,
    )
}

/// Confirmed output at vout 0
pub fn building(parent: u64, sats: u64, depth: u32) -> SpendableOutput {
    output(parent, 0, sats, depth, Confidence::Building)
}

/// Unconfirmed output that may not be spent yet
pub fn pending_other(parent: u64, sats: u64) -> SpendableOutput {
    output(parent, 0, sats, 0, Confidence::PendingOther)
}

/// Ledger record for a confirmed output
pub fn raw_building(parent: &str, index: i64, value: i64, depth: i64) -> RawOutput {
    RawOutput {
        parent_tx_id: parent.to_string(),
        output_index: index,
        value,
        confirmation_depth: depth,
        confidence: TxConfidence::building(),
    }
}

/// Sum of the values of `outputs`
pub fn sum(outputs: &[SpendableOutput]) -> u64 {
    outputs.iter().map(|o| o.value.to_sat()).sum()
}
