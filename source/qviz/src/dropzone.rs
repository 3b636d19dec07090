// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#[cfg(test)]
mod tests;

use crate::{
    Error,
    bridge::{HostElement, spanned_wires},
    config::DropzoneConfig,
    svg::{Element, group, rect},
};

/// Class of the layer holding the dropzones.
pub const DROPZONE_LAYER: &str = "dropzone-layer";

/// A region of a wire where a dragged operation can be dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct Dropzone {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Identifier the dropped operation is inserted at.
    pub data_id: String,
    pub wire: usize,
}

/// Builds the dropzones of a diagram.
///
/// Walking the hosts from left to right, each host closes a dropzone on its wire
/// that runs from the end of the previous dropzone to the host's center. A host
/// covering several wires closes one dropzone on each of them, ending at its
/// left edge. Every wire then gets a final dropzone reaching `width`, which
/// appends to the root list of `root_len` operations.
#[must_use]
pub fn synthesize(
    hosts: &[HostElement],
    wire_ys: &[f64],
    width: f64,
    root_len: usize,
    config: &DropzoneConfig,
) -> Vec<Dropzone> {
    let mut hosts: Vec<&HostElement> = hosts.iter().collect();
    hosts.sort_by(|a, b| a.bbox.x.total_cmp(&b.bbox.x));

    let mut cursors = vec![config.prefix_x; wire_ys.len()];
    let mut dropzones = Vec::new();
    let mut close = |wire: usize, end: f64, data_id: &str| {
        let start = cursors[wire];
        dropzones.push(Dropzone {
            x: start,
            y: wire_ys[wire] - config.padding_y,
            width: (end - start).max(0.0),
            height: 2.0 * config.padding_y,
            data_id: data_id.to_string(),
            wire,
        });
        cursors[wire] = end;
    };

    for host in hosts {
        let data_id = host.data_id.as_deref().unwrap_or_default();
        let spanned = spanned_wires(&host.bbox, wire_ys);
        if spanned.len() > 1 {
            for wire in spanned {
                close(wire, host.bbox.x, data_id);
            }
        } else if let Some(wire) = host.wire.filter(|&w| w < wire_ys.len()) {
            close(wire, host.bbox.center().0, data_id);
        }
    }

    let append_id = root_len.to_string();
    for wire in 0..wire_ys.len() {
        close(wire, width, &append_id);
    }
    dropzones
}

/// Draws the dropzones as a layer of tagged rectangles.
#[must_use]
pub fn dropzone_layer(dropzones: &[Dropzone]) -> Element {
    group(dropzones.iter().map(|zone| {
        rect(zone.x, zone.y, zone.width, zone.height)
            .class("dropzone")
            .attr("data-dropzone-id", &zone.data_id)
            .attr("data-dropzone-wire", zone.wire)
    }))
    .class(DROPZONE_LAYER)
}

/// Reads the insertion identifier and wire back from a dropzone element.
pub fn read_dropzone(element: &Element) -> Result<(String, usize), Error> {
    let missing = |attribute: &str| Error::AttributeNotFound {
        tag: element.tag.clone(),
        attribute: attribute.to_string(),
    };
    let data_id = element
        .attribute("data-dropzone-id")
        .ok_or_else(|| missing("data-dropzone-id"))?;
    let wire = element
        .attribute("data-dropzone-wire")
        .and_then(|w| w.parse().ok())
        .ok_or_else(|| missing("data-dropzone-wire"))?;
    Ok((data_id.to_string(), wire))
}
