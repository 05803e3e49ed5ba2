//! Property-based tests for determinism and proof guarantees

use modelseal::proof::{check_inclusion, prove_inclusion_at};
use modelseal::tree::hasher::digest_hex;
use modelseal::tree::{build, build_root};
use proptest::prelude::*;

fn leaf_sequence() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9 ]{0,8}", 1..40)
}

/// Same leaves always produce the same root
#[test]
fn test_root_determinism_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&leaf_sequence(), |leaves| {
            let root1 = build_root(&leaves).unwrap();
            let root2 = build_root(&leaves.clone()).unwrap();
            prop_assert_eq!(root1, root2);
            Ok(())
        })
        .unwrap();
}

proptest! {
    /// Every leaf of every sequence has a proof that checks against the root
    #[test]
    fn inclusion_holds_for_every_index(leaves in leaf_sequence()) {
        let root = build_root(&leaves).unwrap();
        for (index, leaf) in leaves.iter().enumerate() {
            let proof = prove_inclusion_at(index, &leaves).unwrap();
            prop_assert!(check_inclusion(leaf, &proof, &root));
        }
    }

    /// A proof never verifies against the root of a different sequence
    #[test]
    fn inclusion_fails_against_other_root(
        leaves in leaf_sequence(),
        extra in "[A-Z]{1,4}",
    ) {
        let mut other = leaves.clone();
        other.push(extra);
        let other_root = build_root(&other).unwrap();
        let proof = prove_inclusion_at(0, &leaves).unwrap();
        prop_assert!(!check_inclusion(&leaves[0], &proof, &other_root));
    }

    /// Trees never grow padding nodes: n leaves give exactly 2n - 1 nodes
    #[test]
    fn odd_levels_are_not_padded(leaves in leaf_sequence()) {
        let tree = build(&leaves, None).unwrap();
        prop_assert_eq!(tree.node_count(), 2 * leaves.len() - 1);
        for (leaf, node) in leaves.iter().zip(tree.leaves()) {
            prop_assert_eq!(node.digest(), digest_hex(leaf));
        }
    }

    /// Swapping two distinct adjacent leaves changes the root
    #[test]
    fn order_changes_root(mut leaves in prop::collection::vec("[a-z]{1,6}", 2..20)) {
        prop_assume!(leaves[0] != leaves[1]);
        let before = build_root(&leaves).unwrap();
        leaves.swap(0, 1);
        prop_assert_ne!(before, build_root(&leaves).unwrap());
    }
}
