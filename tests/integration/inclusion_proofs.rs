//! Integration tests for inclusion proofs

use super::test_utils::leaves;
use modelseal::proof::{check_inclusion, prove_inclusion, prove_inclusion_at, InclusionProof, Side};
use modelseal::tree::build_root;
use modelseal::tree::hasher::digest_hex;

#[test]
fn test_prove_and_check_b_in_four_leaves() {
    let seq = leaves(&["a", "b", "c", "d"]);
    let root = build_root(&seq).unwrap();

    let proof = prove_inclusion("b", &seq).unwrap();
    assert_eq!(proof.leaf_index, 1);
    assert_eq!(proof.steps.len(), 2);
    assert_eq!(proof.steps[0].sibling, digest_hex("a"));
    assert_eq!(proof.steps[0].side, Side::Left);
    assert_eq!(proof.steps[1].side, Side::Right);

    assert!(check_inclusion("b", &proof, &root));

    // Same proof against an unrelated root
    let other_root = build_root(&["x", "y"]).unwrap();
    assert!(!check_inclusion("b", &proof, &other_root));
}

#[test]
fn test_every_index_of_odd_trees() {
    for n in [1usize, 3, 5, 7, 9, 11] {
        let seq: Vec<String> = (0..n).map(|i| format!("leaf-{}", i)).collect();
        let root = build_root(&seq).unwrap();
        for (index, leaf) in seq.iter().enumerate() {
            let proof = prove_inclusion_at(index, &seq).unwrap();
            assert!(
                check_inclusion(leaf, &proof, &root),
                "leaf {} of {} failed",
                index,
                n
            );
        }
    }
}

#[test]
fn test_single_leaf_proof_is_empty() {
    let seq = leaves(&["only"]);
    let proof = prove_inclusion("only", &seq).unwrap();
    assert!(proof.steps.is_empty());
    assert!(check_inclusion("only", &proof, &digest_hex("only")));
}

#[test]
fn test_absent_leaf_has_no_proof() {
    let seq = leaves(&["a", "b"]);
    assert!(prove_inclusion("z", &seq).is_none());
    assert!(prove_inclusion_at(2, &seq).is_none());
    let empty: Vec<String> = Vec::new();
    assert!(prove_inclusion("a", &empty).is_none());
}

#[test]
fn test_wrong_leaf_fails() {
    let seq = leaves(&["a", "b", "c", "d"]);
    let root = build_root(&seq).unwrap();
    let proof = prove_inclusion("b", &seq).unwrap();
    assert!(!check_inclusion("c", &proof, &root));
}

#[test]
fn test_truncated_proof_rejected() {
    let seq = leaves(&["a", "b", "c", "d", "e"]);
    let root = build_root(&seq).unwrap();
    let mut proof = prove_inclusion("c", &seq).unwrap();
    proof.steps.pop();
    assert!(!check_inclusion("c", &proof, &root));
}

#[test]
fn test_flipped_side_rejected() {
    let seq = leaves(&["a", "b", "c", "d"]);
    let root = build_root(&seq).unwrap();
    let mut proof = prove_inclusion("a", &seq).unwrap();
    proof.steps[0].side = Side::Left;
    assert!(!check_inclusion("a", &proof, &root));
}

#[test]
fn test_duplicate_leaf_proves_first_occurrence() {
    let seq = leaves(&["a", "dup", "c", "dup"]);
    let root = build_root(&seq).unwrap();
    let proof = prove_inclusion("dup", &seq).unwrap();
    assert_eq!(proof.leaf_index, 1);
    assert!(check_inclusion("dup", &proof, &root));

    let last = prove_inclusion_at(3, &seq).unwrap();
    assert!(check_inclusion("dup", &last, &root));
}

#[test]
fn test_proof_json_shape() {
    let seq = leaves(&["a", "b"]);
    let proof = prove_inclusion("a", &seq).unwrap();
    let json = serde_json::to_value(&proof).unwrap();
    assert_eq!(json["leaf_index"], 0);
    assert_eq!(json["leaf_count"], 2);
    assert_eq!(json["steps"][0]["side"], "right");

    let back: InclusionProof = serde_json::from_value(json).unwrap();
    assert_eq!(back, proof);
}
