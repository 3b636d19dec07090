// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.


use crate::{
    Error,
    circuit::{Operation, Qubit},
    config::LayoutConfig,
    formatter::{format_gates, format_inputs, format_wires},
    layout::{Layout, compute_layout_at_depth},
    registers::WireTable,
    svg::Element,
};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Output of one render pass.
#[derive(Clone, Debug)]
pub struct Rendered {
    pub svg: Element,
    pub wires: WireTable,
    pub layout: Layout,
}

/// Allocates wires, lays out the operations visible at `render_depth` and
/// draws them. Fails without output if any operation cannot be classified.
pub fn compose(
    qubits: &[Qubit],
    operations: &[Operation],
    render_depth: usize,
    config: &LayoutConfig,
) -> Result<Rendered, Error> {
    let wires = WireTable::allocate(qubits, config);
    let layout = compute_layout_at_depth(operations, &wires, config, render_depth)?;
    let width = layout.width;
    let height = wires.height();

    let svg = Element::new("svg")
        .attr("xmlns", SVG_NAMESPACE)
        .class("qviz")
        .attr("width", width)
        .attr("height", height)
        .attr("viewBox", format!("0 0 {width} {height}"))
        .child(format_inputs(&wires, config))
        .child(format_wires(&wires, &layout.metadata, width, config))
        .child(format_gates(&layout.metadata, config));

    log::debug!(
        "rendered {} qubits on {} wires, {width}x{height}",
        qubits.len(),
        wires.len()
    );
    Ok(Rendered { svg, wires, layout })
}
