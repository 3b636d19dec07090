// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::*;
use expect_test::expect;
use indoc::indoc;

#[test]
fn measurement_registers_use_numeric_types() {
    let op: Operation = serde_json::from_str(indoc! {r#"
        {
            "gate": "Measure",
            "isMeasurement": true,
            "controls": [{ "qId": 0 }],
            "targets": [{ "type": 1, "qId": 0, "cId": 0 }]
        }
    "#})
    .expect("operation should deserialize");

    assert_eq!(op, Operation::measurement(0, 0));
    assert!(op.targets[0].is_classical());
    assert!(!op.controls[0].is_classical());
}

#[test]
fn branch_pair_children_are_flattened_with_render_flags() {
    let op: Operation = serde_json::from_str(indoc! {r#"
        {
            "gate": "if",
            "isConditional": true,
            "controls": [{ "type": 1, "qId": 0, "cId": 0 }],
            "targets": [],
            "children": [
                [{ "gate": "Z", "targets": [{ "qId": 1 }] }],
                [{ "gate": "X", "targets": [{ "qId": 1 }] }]
            ]
        }
    "#})
    .expect("operation should deserialize");

    let children = op.children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].gate, "Z");
    assert_eq!(children[0].conditional_render, ConditionalRender::OnZero);
    assert_eq!(children[1].gate, "X");
    assert_eq!(children[1].conditional_render, ConditionalRender::OnOne);

    let (zero, one) = op.branches();
    assert_eq!(
        zero.iter().map(|(i, op)| (*i, op.gate.as_str())).collect::<Vec<_>>(),
        vec![(0, "Z")]
    );
    assert_eq!(
        one.iter().map(|(i, op)| (*i, op.gate.as_str())).collect::<Vec<_>>(),
        vec![(1, "X")]
    );
}

#[test]
fn plain_children_keep_their_render_mode() {
    let op: Operation = serde_json::from_str(indoc! {r#"
        {
            "gate": "Foo",
            "conditionalRender": 3,
            "targets": [{ "qId": 0 }, { "qId": 1 }],
            "children": [
                { "gate": "H", "targets": [{ "qId": 1 }] },
                { "gate": "RX", "displayArgs": "(0.25)", "isControlled": true,
                  "controls": [{ "qId": 1 }], "targets": [{ "qId": 0 }] }
            ]
        }
    "#})
    .expect("operation should deserialize");

    assert_eq!(op.conditional_render, ConditionalRender::AsGroup);
    assert!(op.has_children());
    assert_eq!(op.children()[1].display_args.as_deref(), Some("(0.25)"));
    assert!(
        op.children()
            .iter()
            .all(|c| c.conditional_render == ConditionalRender::Always)
    );
}

#[test]
fn expanded_branch_children_keep_their_branch() {
    let op: Operation = serde_json::from_str(indoc! {r#"
        {
            "gate": "if",
            "isConditional": true,
            "controls": [{ "type": 1, "qId": 0, "cId": 0 }],
            "targets": [],
            "children": [
                [],
                [{ "gate": "Foo", "conditionalRender": 3, "targets": [{ "qId": 1 }],
                   "children": [{ "gate": "H", "targets": [{ "qId": 1 }] }] }]
            ]
        }
    "#})
    .expect("operation should deserialize");

    let foo = &op.children()[0];
    assert_eq!(foo.conditional_render, ConditionalRender::OnOne);
    assert!(foo.is_expanded());
    let (zero, one) = op.branches();
    assert!(zero.is_empty());
    assert_eq!(one.len(), 1);
}

#[test]
fn zooming_a_branch_child_keeps_its_branch() {
    let mut op = Operation::new("Foo", &[1])
        .with_children(vec![Operation::new("H", &[1])])
        .with_render(ConditionalRender::OnZero);
    assert!(!op.is_expanded());

    op.set_expanded(true);
    assert!(op.is_expanded());
    assert_eq!(op.conditional_render, ConditionalRender::OnZero);

    op.set_expanded(false);
    assert!(!op.is_expanded());
    assert_eq!(op.conditional_render, ConditionalRender::OnZero);
}

#[test]
fn zooming_a_plain_operation_switches_its_render_mode() {
    let mut op = Operation::new("Foo", &[0]);
    op.set_expanded(true);
    assert_eq!(op.conditional_render, ConditionalRender::AsGroup);
    op.set_expanded(false);
    assert_eq!(op.conditional_render, ConditionalRender::Always);
}

#[test]
fn unconditional_branches_appear_in_both() {
    let op = Operation::default().with_children(vec![
        Operation::new("H", &[0]),
        Operation::new("X", &[0]).with_render(ConditionalRender::OnOne),
    ]);
    let (zero, one) = op.branches();
    assert_eq!(zero.len(), 1);
    assert_eq!(one.len(), 2);
}

#[test]
fn serialization_skips_defaults() {
    let op = Operation::controlled("X", &[0], &[1]);
    expect![[r#"{"gate":"X","isControlled":true,"controls":[{"qId":0}],"targets":[{"qId":1}]}"#]]
        .assert_eq(&serde_json::to_string(&op).expect("operation should serialize"));

    let op = Operation::measurement(1, 0);
    expect![[r#"{"gate":"Measure","isMeasurement":true,"controls":[{"qId":1}],"targets":[{"type":1,"qId":1,"cId":0}]}"#]]
        .assert_eq(&serde_json::to_string(&op).expect("operation should serialize"));
}

#[test]
fn render_mode_serializes_as_number() {
    let op = Operation::new("Foo", &[0])
        .with_children(vec![])
        .with_render(ConditionalRender::AsGroup);
    expect![[r#"{"gate":"Foo","targets":[{"qId":0}],"children":[],"conditionalRender":3}"#]]
        .assert_eq(&serde_json::to_string(&op).expect("operation should serialize"));
}

#[test]
fn qubits_default_to_no_result_wires() {
    let qubits: Vec<Qubit> = serde_json::from_str(r#"[{ "id": 0 }, { "id": 1, "numChildren": 2 }]"#)
        .expect("qubits should deserialize");
    assert_eq!(qubits, vec![Qubit::new(0), Qubit::with_results(1, 2)]);
    expect![[r#"[{"id":0},{"id":1,"numChildren":2}]"#]]
        .assert_eq(&serde_json::to_string(&qubits).expect("qubits should serialize"));
}

#[test]
fn unknown_register_type_is_rejected() {
    let err = serde_json::from_str::<Register>(r#"{ "type": 2, "qId": 0 }"#)
        .expect_err("register type 2 should be rejected");
    assert!(err.to_string().contains("unknown register type 2"));
}

#[test]
fn circuit_without_operations_is_empty() {
    let circuit: Circuit =
        serde_json::from_str(r#"{ "qubits": [{ "id": 0 }] }"#).expect("circuit should deserialize");
    assert_eq!(circuit.qubits.len(), 1);
    assert!(circuit.operations.is_empty());
}
