// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::*;
use crate::{
    bridge::list_host_elements,
    circuit::{Operation, Qubit},
    composer::compose,
    config::LayoutConfig,
};

fn dropzones(qubits: &[Qubit], operations: &[Operation]) -> Vec<Dropzone> {
    let rendered =
        compose(qubits, operations, 0, &LayoutConfig::default()).expect("circuit should render");
    let ys = rendered.wires.ys();
    let hosts = list_host_elements(&rendered.svg, &ys);
    synthesize(
        &hosts,
        &ys,
        rendered.layout.width,
        operations.len(),
        &DropzoneConfig::default(),
    )
}

fn zone(x: f64, y: f64, width: f64, data_id: &str, wire: usize) -> Dropzone {
    Dropzone {
        x,
        y,
        width,
        height: 40.0,
        data_id: data_id.to_string(),
        wire,
    }
}

#[test]
fn cnot_closes_a_zone_on_each_wire() {
    let zones = dropzones(
        &[Qubit::new(0), Qubit::new(1)],
        &[Operation::controlled("X", &[0], &[1])],
    );
    assert_eq!(
        zones,
        vec![
            zone(40.0, 80.0, 60.0, "0", 1),
            zone(40.0, 20.0, 60.0, "0", 0),
            zone(100.0, 20.0, 40.0, "1", 0),
            zone(100.0, 80.0, 40.0, "1", 1),
        ]
    );
}

#[test]
fn consecutive_gates_split_a_wire() {
    let zones = dropzones(
        &[Qubit::new(0)],
        &[Operation::new("H", &[0]), Operation::new("X", &[0])],
    );
    assert_eq!(
        zones,
        vec![
            zone(40.0, 20.0, 60.0, "0", 0),
            zone(100.0, 20.0, 60.0, "1", 0),
            zone(160.0, 20.0, 40.0, "2", 0),
        ]
    );
}

#[test]
fn box_across_wires_closes_at_its_left_edge() {
    let zones = dropzones(
        &[Qubit::new(0), Qubit::new(1)],
        &[Operation::new("ZZ", &[0, 1])],
    );
    assert_eq!(
        zones,
        vec![
            zone(40.0, 20.0, 40.0, "0", 0),
            zone(40.0, 80.0, 40.0, "0", 1),
            zone(80.0, 20.0, 60.0, "1", 0),
            zone(80.0, 80.0, 60.0, "1", 1),
        ]
    );
}

#[test]
fn nested_gates_insert_inside_their_group() {
    let zones = dropzones(
        &[Qubit::new(0)],
        &[Operation::new("Foo", &[0])
            .with_children(vec![Operation::new("H", &[0])])
            .with_render(crate::circuit::ConditionalRender::AsGroup)],
    );
    let ids: Vec<_> = zones.iter().map(|z| z.data_id.as_str()).collect();
    assert_eq!(ids, vec!["0-0", "1"]);
    assert!(zones.iter().all(|z| z.width >= 0.0));
}

#[test]
fn every_wire_gets_an_append_zone() {
    let zones = dropzones(&[Qubit::with_results(0, 1), Qubit::new(1)], &[]);
    assert_eq!(
        zones,
        vec![
            zone(40.0, 20.0, 40.0, "0", 0),
            zone(40.0, 40.0, 40.0, "0", 1),
            zone(40.0, 100.0, 40.0, "0", 2),
        ]
    );
}

#[test]
fn overlapping_hosts_never_produce_negative_widths() {
    let host = |x: f64| HostElement {
        path: vec![],
        bbox: crate::svg::BBox {
            x,
            y: 20.0,
            width: 40.0,
            height: 40.0,
        },
        wire: Some(0),
        gate_path: None,
        data_id: Some("0".to_string()),
    };
    let zones = synthesize(
        &[host(100.0), host(0.0)],
        &[40.0],
        50.0,
        1,
        &DropzoneConfig::default(),
    );
    assert_eq!(zones.len(), 3);
    assert!(zones.iter().all(|z| z.width >= 0.0));
    assert_eq!(zones[1].x, 20.0);
    assert_eq!(zones[2].x, 120.0);
}

#[test]
fn layer_elements_carry_their_target() {
    let zones = vec![zone(40.0, 20.0, 60.0, "0-1", 2)];
    let layer = dropzone_layer(&zones);
    assert!(layer.has_class(DROPZONE_LAYER));
    assert_eq!(layer.element_count(), 1);

    let element = layer.at(&[0]).expect("dropzone should be drawn");
    assert!(element.has_class("dropzone"));
    assert_eq!(read_dropzone(element), Ok(("0-1".to_string(), 2)));
}

#[test]
fn dropzone_without_target_is_an_error() {
    let element = rect(0.0, 0.0, 1.0, 1.0).attr("data-dropzone-wire", 0);
    assert_eq!(
        read_dropzone(&element),
        Err(Error::AttributeNotFound {
            tag: "rect".to_string(),
            attribute: "data-dropzone-id".to_string(),
        })
    );

    let element = rect(0.0, 0.0, 1.0, 1.0)
        .attr("data-dropzone-id", "0")
        .attr("data-dropzone-wire", "two");
    assert_eq!(
        read_dropzone(&element),
        Err(Error::AttributeNotFound {
            tag: "rect".to_string(),
            attribute: "data-dropzone-wire".to_string(),
        })
    );
}
