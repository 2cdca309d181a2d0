use bitcoin::{Amount, OutPoint};
use dezire_common::utxo_selection::{
    eligible_outputs, is_eligible, Confidence, ExclusionSet, OutputKey, UtxoSelector,
};

mod test_helpers;
use test_helpers::*;

#[test]
fn test_exclusion_matches_by_key_not_identity() {
    let original = building(1, 100, 10);
    // Same key, different value and depth: a snapshot taken at another time
    let later_snapshot = output(1, 0, 100, 11, Confidence::Building);

    let exclusions = ExclusionSet::build([&original]);
    assert!(exclusions.contains(&later_snapshot));
    assert!(!exclusions.contains(&building(2, 100, 10)));
}

#[test]
fn test_exclusion_distinguishes_output_index() {
    let used = output(4, 0, 10, 3, Confidence::Building);
    let sibling = output(4, 1, 10, 3, Confidence::Building);

    let exclusions = ExclusionSet::build([&used]);
    assert!(exclusions.contains(&used));
    assert!(!exclusions.contains(&sibling));
    assert!(exclusions.contains_key(&OutputKey::new(txid_from_number(4), 0)));
}

#[test]
fn test_duplicate_build_input_collapses() {
    let used = building(1, 100, 10);
    let exclusions: ExclusionSet = [&used, &used, &used].into_iter().collect();
    assert_eq!(exclusions.len(), 1);
}

#[test]
fn test_from_outpoints() {
    let exclusions = ExclusionSet::from_outpoints(vec![
        OutPoint::new(txid_from_number(1), 0),
        OutPoint::new(txid_from_number(2), 3),
    ]);
    assert!(exclusions.contains(&building(1, 1, 1)));
    assert!(exclusions.contains(&output(2, 3, 1, 1, Confidence::Building)));
    assert!(!exclusions.contains(&building(2, 1, 1)));
}

#[test]
fn test_empty_exclusion_set() {
    let exclusions = ExclusionSet::empty();
    assert!(exclusions.is_empty());
    assert!(!exclusions.contains(&building(1, 1, 1)));
}

#[test]
fn test_eligibility_by_confidence() {
    let exclusions = ExclusionSet::empty();
    assert!(is_eligible(&building(1, 1, 1), &exclusions));
    assert!(is_eligible(
        &output(2, 0, 1, 0, Confidence::PendingSelfBroadcastSufficient),
        &exclusions
    ));
    assert!(!is_eligible(&pending_other(3, 1), &exclusions));
}

#[test]
fn test_excluded_output_is_ineligible_whatever_its_confidence() {
    let confirmed = building(1, 1, 1);
    let exclusions = ExclusionSet::build([&confirmed]);
    assert!(!is_eligible(&confirmed, &exclusions));
}

#[test]
fn test_eligible_outputs_preserve_order() {
    let candidates = vec![
        building(3, 1, 1),
        pending_other(2, 1),
        building(1, 1, 1),
        building(5, 1, 1),
    ];
    let exclusions = ExclusionSet::build(&candidates[3..]);

    let parents: Vec<_> = eligible_outputs(&candidates, &exclusions)
        .iter()
        .map(|o| o.parent_tx_id())
        .collect();
    assert_eq!(parents, vec![txid_from_number(3), txid_from_number(1)]);
}

#[test]
fn test_every_excluded_output_stays_out_of_selection() {
    let candidates: Vec<_> = (1..=10).map(|i| building(i, 100, i as u32)).collect();
    let used: Vec<_> = candidates.iter().step_by(3).cloned().collect();
    let exclusions = ExclusionSet::build(&used);

    let result = UtxoSelector::new()
        .select_all(&candidates, &exclusions)
        .unwrap();
    assert_eq!(result.len(), candidates.len() - used.len());
    assert!(result.chosen().iter().all(|o| !exclusions.contains(o)));
    assert_eq!(
        result.total_value(),
        Amount::from_sat(100 * (candidates.len() - used.len()) as u64)
    );
}
