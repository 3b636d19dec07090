// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Reads the model back out of a rendered diagram: the wire table, and the
//! gate parts that can be grabbed, together with the wire and the operation
//! each one belongs to.


use crate::{
    Error,
    dropzone::DROPZONE_LAYER,
    formatter::WIRE_LAYER,
    svg::{BBox, Element},
};

const WIRE_TOLERANCE: f64 = 1e-9;

/// A grabbable part of a rendered gate.
#[derive(Clone, Debug, PartialEq)]
pub struct HostElement {
    /// Path of the element from the root.
    pub path: Vec<usize>,
    /// Bounding box in diagram coordinates.
    pub bbox: BBox,
    pub wire: Option<usize>,
    /// Path of the closest enclosing element with a `data-id`.
    pub gate_path: Option<Vec<usize>>,
    pub data_id: Option<String>,
}

/// The groups of the wire layer that draw a wire. Measurement connectors have
/// more parts and are skipped.
fn wire_groups(root: &Element) -> Result<impl Iterator<Item = &Element>, Error> {
    let layer = root
        .elements()
        .find(|e| e.has_class(WIRE_LAYER))
        .ok_or(Error::WireLayerNotFound)?;
    Ok(layer
        .elements()
        .filter(|g| g.tag == "g" && g.element_count() < 3))
}

/// Recovers the y coordinate of every wire, in wire order.
pub fn read_wire_table(root: &Element) -> Result<Vec<f64>, Error> {
    wire_groups(root)?
        .map(|g| {
            g.elements()
                .next()
                .and_then(|line| line.number("y1"))
                .ok_or(Error::WireYNotFound)
        })
        .collect()
}

/// Whether the element is a grabbable gate part: a gate body, a control dot,
/// a target symbol or a swap cross. Zoom buttons and swap backgrounds are not.
#[must_use]
pub fn is_host(element: &Element) -> bool {
    let gate_part = element
        .attribute("class")
        .is_some_and(|c| c.starts_with("gate-"))
        && !element.has_class("gate-control")
        && !element.has_class("gate-swap");
    gate_part || ["control-dot", "oplus", "cross"].iter().any(|c| element.has_class(c))
}

/// Lists the visible host elements under `root`, mapping each to a wire of `wire_ys`.
#[must_use]
pub fn list_host_elements(root: &Element, wire_ys: &[f64]) -> Vec<HostElement> {
    let mut collector = HostCollector {
        wire_ys,
        hosts: Vec::new(),
    };
    collector.visit(root, &mut Vec::new(), (0.0, 0.0), None);
    collector.hosts
}

struct HostCollector<'a> {
    wire_ys: &'a [f64],
    hosts: Vec<HostElement>,
}

impl HostCollector<'_> {
    fn visit(
        &mut self,
        element: &Element,
        path: &mut Vec<usize>,
        offset: (f64, f64),
        gate: Option<&(Vec<usize>, String)>,
    ) {
        if element.has_class("hidden") || element.has_class(DROPZONE_LAYER) {
            return;
        }

        let own_gate;
        let gate = match element.attribute("data-id") {
            Some(id) => {
                own_gate = (path.clone(), id.to_string());
                Some(&own_gate)
            }
            None => gate,
        };

        if is_host(element)
            && let Some(bbox) = element.bbox()
        {
            let bbox = BBox {
                x: bbox.x + offset.0,
                y: bbox.y + offset.1,
                ..bbox
            };
            self.hosts.push(HostElement {
                path: path.clone(),
                bbox,
                wire: wire_index(&bbox, self.wire_ys),
                gate_path: gate.map(|(p, _)| p.clone()),
                data_id: gate.map(|(_, id)| id.clone()),
            });
        }

        let (dx, dy) = element.translation();
        let offset = (offset.0 + dx, offset.1 + dy);
        for (i, child) in element.elements().enumerate() {
            path.push(i);
            self.visit(child, path, offset, gate);
            path.pop();
        }
    }
}

/// The wire through the center of `bbox`, or failing that the first wire
/// passing strictly inside it.
#[must_use]
pub fn wire_index(bbox: &BBox, wire_ys: &[f64]) -> Option<usize> {
    let (_, center_y) = bbox.center();
    wire_ys
        .iter()
        .position(|&y| (y - center_y).abs() < WIRE_TOLERANCE)
        .or_else(|| spanned_wires(bbox, wire_ys).first().copied())
}

/// Wires passing strictly between the top and bottom of `bbox`.
#[must_use]
pub fn spanned_wires(bbox: &BBox, wire_ys: &[f64]) -> Vec<usize> {
    wire_ys
        .iter()
        .enumerate()
        .filter(|&(_, &y)| bbox.y < y && y < bbox.bottom())
        .map(|(i, _)| i)
        .collect()
}

/// Path of the closest element, starting at `path` and walking up to `root`,
/// that satisfies `predicate`.
pub fn closest(
    root: &Element,
    path: &[usize],
    predicate: impl Fn(&Element) -> bool,
) -> Option<Vec<usize>> {
    (0..=path.len())
        .rev()
        .map(|len| &path[..len])
        .find(|p| root.at(p).is_some_and(&predicate))
        .map(<[usize]>::to_vec)
}
