// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::*;
use proptest::prelude::*;

/// `H`, then `Foo` holding `X` and `Bar`, which holds `Z`.
fn tree() -> Vec<Operation> {
    vec![
        Operation::new("H", &[0]),
        Operation::new("Foo", &[0, 1]).with_children(vec![
            Operation::new("X", &[1]),
            Operation::new("Bar", &[0]).with_children(vec![Operation::new("Z", &[0])]),
        ]),
    ]
}

#[test]
fn empty_id_is_the_root() {
    assert_eq!(indexes_of(""), Some(vec![]));
    assert_eq!(last_index_of(""), None);
}

#[test]
fn ids_split_into_indexes() {
    assert_eq!(indexes_of("0-1-2"), Some(vec![0, 1, 2]));
    assert_eq!(indexes_of("12"), Some(vec![12]));
    assert_eq!(last_index_of("3-4"), Some(4));
}

#[test]
fn malformed_ids_do_not_resolve() {
    for id in ["a", "1--2", "-1", "1-", "+1", "1-x", " 1"] {
        assert_eq!(indexes_of(id), None, "{id:?} should not parse");
    }
}

#[test]
fn child_ids_extend_the_parent() {
    assert_eq!(child_id("", 3), "3");
    assert_eq!(child_id("1-0", 2), "1-0-2");
    assert_eq!(join(&[1, 0, 2]), "1-0-2");
    assert_eq!(join(&[]), "");
}

#[test]
fn operations_resolve_by_id() {
    let ops = tree();
    let gate = |id: &str| operation_of(id, &ops).map(|op| op.gate.as_str());
    assert_eq!(gate("0"), Some("H"));
    assert_eq!(gate("1-0"), Some("X"));
    assert_eq!(gate("1-1-0"), Some("Z"));
    assert_eq!(gate("5"), None);
    assert_eq!(gate("0-0"), None);
    assert_eq!(gate("1-2"), None);
    assert_eq!(gate(""), None);
}

#[test]
fn parents_resolve_by_id() {
    let ops = tree();
    let parent = parent_operation_of("1-1-0", &ops).expect("Z should have a parent");
    assert_eq!(parent.gate, "Bar");
    assert!(parent_operation_of("0", &ops).is_none());

    let siblings = parent_array_of("1-1-0", &ops).expect("Z should have a parent list");
    assert_eq!(siblings.len(), 1);
    assert_eq!(siblings[0].gate, "Z");

    // The parent list of a root-level id is the root, even past its end.
    let root = parent_array_of("7", &ops).expect("root should resolve");
    assert_eq!(root.len(), 2);
    assert!(parent_array_of("", &ops).is_none());
    assert!(parent_array_of("0-0", &ops).is_none());
}

#[test]
fn mutable_resolution_edits_in_place() {
    let mut ops = tree();
    operation_of_mut("1-0", &mut ops)
        .expect("X should resolve")
        .gate = "T".to_string();
    operation_of_mut("1-1", &mut ops)
        .expect("Bar should resolve")
        .is_adjoint = true;

    assert_eq!(ops[1].children()[0].gate, "T");
    assert!(ops[1].children()[1].is_adjoint);
    assert!(operation_of_mut("1-1-5", &mut ops).is_none());
}

proptest! {
    #[test]
    fn joined_indexes_round_trip(indexes in prop::collection::vec(0usize..1000, 0..6)) {
        prop_assert_eq!(indexes_of(&join(&indexes)), Some(indexes));
    }
}
