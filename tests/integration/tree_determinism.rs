//! Integration tests for tree building determinism

use modelseal::tree::hasher::{combine, digest_hex};
use modelseal::tree::{build, build_root};

/// Test that the same leaves produce the same root
#[test]
fn test_same_leaves_same_root() {
    let leaves = ["m1", "m2", "m3", "m4"];
    assert_eq!(build_root(&leaves).unwrap(), build_root(&leaves).unwrap());
}

/// Test that leaf order is part of the fingerprint
#[test]
fn test_order_sensitivity() {
    let root_ab = build_root(&["a", "b"]).unwrap();
    let root_ba = build_root(&["b", "a"]).unwrap();
    assert_ne!(root_ab, root_ba);
}

#[test]
fn test_single_leaf_root_is_leaf_digest() {
    assert_eq!(build_root(&["x"]).unwrap(), digest_hex("x"));
    assert_eq!(
        build_root(&["a"]).unwrap(),
        "ca978112ca1bbdcafac231b39a23dc4da786eff8147c4e72b9807785afee48bb"
    );
}

/// The trailing leaf of an odd level is carried, not paired with itself
#[test]
fn test_odd_count_is_not_duplicated() {
    let odd = build_root(&["a", "b", "c"]).unwrap();
    let padded = build_root(&["a", "b", "c", "c"]).unwrap();
    assert_ne!(odd, padded);

    let expected = combine(&combine(&digest_hex("a"), &digest_hex("b")), &digest_hex("c"));
    assert_eq!(odd, expected);
}

#[test]
fn test_five_leaves_carry_twice() {
    let h: Vec<String> = ["a", "b", "c", "d", "e"].iter().map(|l| digest_hex(l)).collect();
    let abcd = combine(&combine(&h[0], &h[1]), &combine(&h[2], &h[3]));
    assert_eq!(build_root(&["a", "b", "c", "d", "e"]).unwrap(), combine(&abcd, &h[4]));
}

/// Parent digest is the hash of the two hex strings joined, not of raw bytes
#[test]
fn test_parent_hashes_hex_concatenation() {
    let left = digest_hex("a");
    let right = digest_hex("b");
    let tree = build(&["a", "b"], None).unwrap();
    let root = tree.root();
    assert_eq!(root.content(), format!("{}{}", left, right));
    assert_eq!(root.digest(), digest_hex(&format!("{}{}", left, right)));
}

#[test]
fn test_empty_leaves_are_ordinary_content() {
    let with_empty = build_root(&["a", "", "b"]).unwrap();
    let without = build_root(&["a", "b"]).unwrap();
    assert_ne!(with_empty, without);
}

#[test]
fn test_every_internal_node_obeys_digest_invariant() {
    let leaves: Vec<String> = (0..13).map(|i| format!("chunk{}", i)).collect();
    let tree = build(&leaves, None).unwrap();
    assert_eq!(tree.leaf_count(), 13);

    let mut internal = 0;
    for (_, node) in tree.iter() {
        assert_eq!(node.digest(), digest_hex(node.content()));
        if let Some((left, right)) = node.children() {
            internal += 1;
            assert_eq!(
                node.digest(),
                combine(tree.node(left).digest(), tree.node(right).digest())
            );
        }
    }
    // A binary tree without duplication has n - 1 internal nodes
    assert_eq!(internal, 12);
}
