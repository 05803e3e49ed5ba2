//! Integration tests for the single-hop consistency check

use super::test_utils::leaves;
use modelseal::proof::{check_consistency, ConsistencyOutcome};
use modelseal::tree::build_root;

#[test]
fn test_identical_sequences_are_consistent() {
    let a = leaves(&["m1", "m2", "m3"]);
    let outcome = check_consistency(&a, &a);
    let root = build_root(&a).unwrap();
    assert!(outcome.is_consistent());
    assert_eq!(outcome.evidence(), vec![root.as_str(), root.as_str()]);
}

#[test]
fn test_non_prefix_is_not_comparable() {
    let a = leaves(&["m1", "m2"]);
    let b = leaves(&["m1", "mX", "m3"]);
    assert_eq!(check_consistency(&a, &b), ConsistencyOutcome::NotComparable);
}

#[test]
fn test_append_is_not_a_single_hop() {
    let a = leaves(&["m1", "m2", "m3", "m4"]);
    let b = leaves(&["m1", "m2", "m3", "m4", "m5"]);
    let outcome = check_consistency(&a, &b);
    assert!(!outcome.is_consistent());
    assert!(outcome.evidence().is_empty());
}

#[test]
fn test_outcome_json_is_tagged() {
    let a = leaves(&["x"]);
    let json = serde_json::to_value(check_consistency(&a, &a)).unwrap();
    assert_eq!(json["outcome"], "identical");
    let json = serde_json::to_value(check_consistency(&a, &leaves(&["y"]))).unwrap();
    assert_eq!(json["outcome"], "not_comparable");
}
