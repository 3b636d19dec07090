// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::*;
use crate::circuit::{ConditionalRender, Qubit};

fn layout(qubits: &[Qubit], operations: &[Operation]) -> Result<Layout, Error> {
    let config = LayoutConfig::default();
    let wires = WireTable::allocate(qubits, &config);
    compute_layout(operations, &wires, &config)
}

fn layout_ok(qubits: &[Qubit], operations: &[Operation]) -> Layout {
    layout(qubits, operations).expect("layout should succeed")
}

fn qubits(n: usize) -> Vec<Qubit> {
    (0..n).map(Qubit::new).collect()
}

fn xs(metadata: &[Metadata]) -> Vec<f64> {
    metadata.iter().map(|md| md.x).collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn nested(md: &Metadata) -> &[Metadata] {
    match &md.children {
        Some(MetadataChildren::Nested(children)) => children,
        other => panic!("expected nested children, found {other:?}"),
    }
}

#[test]
fn gates_are_placed_left_to_right() {
    let layout = layout_ok(
        &[Qubit::new(0), Qubit::with_results(1, 1)],
        &[
            Operation::new("H", &[0]),
            Operation::controlled("X", &[0], &[1]),
            Operation::measurement(1, 0),
        ],
    );
    assert_eq!(xs(&layout.metadata), vec![100.0, 160.0, 220.0]);
    assert_eq!(layout.width, 260.0);

    let [h, cnot, measure] = layout.metadata.as_slice() else {
        panic!("expected three entries");
    };
    assert_eq!(h.gate_type, GateType::Unitary);
    assert_eq!(h.width, 40.0);
    assert_eq!(h.targets_y, TargetsY::Grouped(vec![vec![40.0]]));

    assert_eq!(cnot.gate_type, GateType::Cnot);
    assert_eq!(cnot.controls_y, vec![40.0]);
    assert_eq!(cnot.targets_y, TargetsY::Flat(vec![100.0]));

    assert_eq!(measure.gate_type, GateType::Measure);
    assert_eq!(measure.controls_y, vec![100.0]);
    assert_eq!(measure.targets_y, TargetsY::Flat(vec![120.0]));
}

#[test]
fn gates_on_disjoint_wires_share_a_column() {
    let layout = layout_ok(
        &qubits(2),
        &[Operation::new("H", &[0]), Operation::new("X", &[1])],
    );
    assert_eq!(xs(&layout.metadata), vec![100.0, 100.0]);
    assert_eq!(layout.width, 140.0);
}

#[test]
fn multi_wire_gates_block_the_wires_between() {
    let layout = layout_ok(
        &qubits(3),
        &[
            Operation::controlled("X", &[0], &[2]),
            Operation::new("H", &[1]),
        ],
    );
    assert_eq!(xs(&layout.metadata), vec![100.0, 160.0]);
    assert_eq!(layout.width, 200.0);
}

#[test]
fn long_labels_widen_the_gate() {
    let rotation = layout_ok(&qubits(1), &[Operation::new("Rotation", &[0])]);
    assert_close(rotation.metadata[0].width, 87.2);

    let mut rx = Operation::new("RX", &[0]);
    rx.display_args = Some("(0.25)".to_string());
    let rx = layout_ok(&qubits(1), &[rx]);
    assert_close(rx.metadata[0].width, 63.2);
    assert_eq!(rx.metadata[0].display_args.as_deref(), Some("(0.25)"));
}

#[test]
fn adjoint_gates_are_primed() {
    let mut s = Operation::new("S", &[0]);
    s.is_adjoint = true;
    let layout = layout_ok(&qubits(1), &[s]);
    assert_eq!(layout.metadata[0].label, "S'");
}

#[test]
fn operations_without_wires_take_no_space() {
    let layout = layout_ok(
        &qubits(1),
        &[Operation::new("Barrier", &[]), Operation::new("H", &[0])],
    );
    assert_eq!(layout.metadata[0].width, 0.0);
    assert_eq!(layout.metadata[0].x, 80.0);
    assert_eq!(layout.metadata[1].x, 100.0);
    assert_eq!(layout.width, 140.0);
}

#[test]
fn expanded_group_encloses_its_children() {
    let group = Operation::new("Foo", &[0, 1])
        .with_children(vec![
            Operation::new("H", &[1]),
            Operation::controlled("RX", &[1], &[0]),
        ])
        .with_render(ConditionalRender::AsGroup);
    let layout = layout_ok(&qubits(2), &[group]);

    let md = &layout.metadata[0];
    assert_eq!(md.gate_type, GateType::Group);
    assert_eq!(md.x, 140.0);
    assert_eq!(md.width, 120.0);
    assert_eq!(layout.width, 220.0);
    assert!(md.data.expanded);
    assert!(md.data.zoom_in);
    assert!(!md.data.zoom_out);

    let children = nested(md);
    assert_eq!(xs(children), vec![110.0, 170.0]);
    assert_eq!(children[1].gate_type, GateType::ControlledUnitary);
    assert_eq!(
        children.iter().map(|c| c.data.id.as_str()).collect::<Vec<_>>(),
        vec!["0-0", "0-1"]
    );
    assert!(children.iter().all(|c| c.data.zoom_out));
    assert_eq!(md.descendants().len(), 3);
}

#[test]
fn nested_groups_use_less_padding() {
    let inner = Operation::new("Inner", &[0])
        .with_children(vec![Operation::new("H", &[0])])
        .with_render(ConditionalRender::AsGroup);
    let outer = Operation::new("Outer", &[0])
        .with_children(vec![inner])
        .with_render(ConditionalRender::AsGroup);
    let layout = layout_ok(&qubits(1), &[outer]);

    let outer = &layout.metadata[0];
    let inner = &nested(outer)[0];
    let h = &nested(inner)[0];
    assert_eq!(outer.width, 76.0);
    assert_eq!(inner.width, 56.0);
    assert_eq!(h.x, 118.0);
    assert_eq!(h.data.id, "0-0-0");
    assert_eq!(layout.width, 176.0);
}

#[test]
fn collapsed_operations_are_drawn_as_gates() {
    let op = Operation::new("Foo", &[0]).with_children(vec![Operation::new("H", &[0])]);
    let layout = layout_ok(&qubits(1), &[op]);
    let md = &layout.metadata[0];
    assert_eq!(md.gate_type, GateType::Unitary);
    assert!(md.children.is_none());
    assert!(md.data.zoom_in);
    assert!(!md.data.expanded);
}

fn classically_controlled() -> Operation {
    Operation {
        gate: "if".to_string(),
        is_conditional: true,
        controls: vec![Register::classical(0, 0)],
        children: Some(vec![
            Operation::new("X", &[1]).with_render(ConditionalRender::OnOne),
            Operation::new("Z", &[1]).with_render(ConditionalRender::OnZero),
        ]),
        ..Operation::default()
    }
}

#[test]
fn classically_controlled_branches_share_an_origin() {
    let layout = layout_ok(
        &[Qubit::with_results(0, 1), Qubit::new(1)],
        &[Operation::measurement(0, 0), classically_controlled()],
    );
    assert_eq!(layout.metadata[0].x, 100.0);
    assert_eq!(layout.width, 260.0);

    let md = &layout.metadata[1];
    assert_eq!(md.gate_type, GateType::ClassicallyControlled);
    assert_eq!(md.left(), 140.0);
    assert_eq!(md.x, 190.0);
    assert_eq!(md.width, 100.0);
    assert_eq!(md.controls_y, vec![60.0]);
    assert_eq!(md.targets_y, TargetsY::Flat(vec![40.0, 120.0]));

    let Some(MetadataChildren::Branches { zero, one }) = &md.children else {
        panic!("expected branches, found {:?}", md.children);
    };
    assert_eq!(zero.len(), 1);
    assert_eq!(one.len(), 1);
    assert_eq!((zero[0].label.as_str(), zero[0].data.id.as_str()), ("Z", "1-1"));
    assert_eq!((one[0].label.as_str(), one[0].data.id.as_str()), ("X", "1-0"));
    assert_eq!(zero[0].x, 210.0);
    assert_eq!(one[0].x, 210.0);
}

#[test]
fn distant_targets_split_into_clusters() {
    let layout = layout_ok(&qubits(4), &[Operation::new("ZZ", &[0, 1, 3])]);
    assert_eq!(
        layout.metadata[0].targets_y,
        TargetsY::Grouped(vec![vec![40.0, 100.0], vec![220.0]])
    );
}

#[test]
fn classical_wire_in_use_splits_targets() {
    let qubits = [Qubit::with_results(0, 1), Qubit::new(1)];
    let unused = layout_ok(&qubits, &[Operation::new("ZZ", &[0, 1])]);
    assert_eq!(
        unused.metadata[0].targets_y,
        TargetsY::Grouped(vec![vec![40.0, 120.0]])
    );

    let in_use = layout_ok(
        &qubits,
        &[Operation::measurement(0, 0), Operation::new("ZZ", &[0, 1])],
    );
    assert_eq!(
        in_use.metadata[1].targets_y,
        TargetsY::Grouped(vec![vec![40.0], vec![120.0]])
    );
}

#[test]
fn swap_is_its_own_gate_type() {
    let layout = layout_ok(
        &qubits(3),
        &[
            Operation::new("SWAP", &[0, 1]),
            Operation::controlled("SWAP", &[2], &[0, 1]),
        ],
    );
    assert_eq!(layout.metadata[0].gate_type, GateType::Swap);
    assert_eq!(layout.metadata[0].targets_y, TargetsY::Flat(vec![40.0, 100.0]));
    assert_eq!(layout.metadata[1].gate_type, GateType::ControlledUnitary);
}

#[test]
fn malformed_operations_are_rejected() {
    let mut conditional = classically_controlled();
    conditional.controls = vec![Register::qubit(0)];
    assert_eq!(
        layout(&qubits(2), &[conditional]),
        Err(Error::MissingClassicalControl("if".to_string()))
    );

    let mut empty = classically_controlled();
    empty.children = None;
    assert_eq!(
        layout(&[Qubit::with_results(0, 1), Qubit::new(1)], &[empty]),
        Err(Error::EmptyConditional("if".to_string()))
    );

    assert_eq!(
        layout(&qubits(2), &[Operation::new("H", &[7])]),
        Err(Error::UnknownQubit(7))
    );
    assert_eq!(
        layout(&qubits(3), &[Operation::new("SWAP", &[0, 1, 2])]),
        Err(Error::InvalidSwap(3))
    );

    let mut uncontrolled = Operation::new("X", &[0]);
    uncontrolled.is_controlled = true;
    assert_eq!(
        layout(&qubits(1), &[uncontrolled]),
        Err(Error::MissingControls("X".to_string()))
    );

    let mut unmeasured = Operation::measurement(0, 0);
    unmeasured.controls.clear();
    assert_eq!(
        layout(&[Qubit::with_results(0, 1)], &[unmeasured]),
        Err(Error::MissingMeasuredQubit("Measure".to_string()))
    );
}

#[test]
fn render_depth_replaces_operations_by_their_children() {
    let ops = vec![
        Operation::new("H", &[0]),
        Operation::new("Foo", &[0]).with_children(vec![
            Operation::new("X", &[0]),
            Operation::new("Bar", &[0]).with_children(vec![Operation::new("Y", &[0])]),
        ]),
    ];
    let ids = |depth| {
        select_at_depth(&ops, depth)
            .into_iter()
            .map(|(id, _)| id)
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(0), vec!["0", "1"]);
    assert_eq!(ids(1), vec!["0", "1-0", "1-1"]);
    assert_eq!(ids(2), vec!["0", "1-0", "1-1-0"]);
    assert_eq!(ids(9), vec!["0", "1-0", "1-1-0"]);

    let config = LayoutConfig::default();
    let wires = WireTable::allocate(&qubits(1), &config);
    let deep = compute_layout_at_depth(&ops, &wires, &config, 2).expect("layout should succeed");
    assert_eq!(xs(&deep.metadata), vec![100.0, 160.0, 220.0]);
    assert!(deep.metadata[2].data.zoom_out);
}
