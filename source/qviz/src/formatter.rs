// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Converts laid-out metadata into SVG elements.


use crate::{
    config::LayoutConfig,
    layout::{GateType, Metadata, MetadataChildren, TargetsY},
    registers::{WireKind, WireTable},
    svg::{Element, arc, circle, control_dot, dashed_box, dashed_line, group, line, rect, text},
};

/// Class of the layer holding one group per wire.
pub const WIRE_LAYER: &str = "wires";
/// Class of the layer holding the gates.
pub const GATE_LAYER: &str = "gates";

const WIRE_LABEL_FONT_SIZE: f64 = 12.0;
const QUBIT_LABEL_OFFSET: f64 = 16.0;
const CLASSICAL_LABEL_OFFSET: f64 = 8.0;
const CLASSICAL_LINE_PADDING: f64 = 1.0;

/// Text measured with the configured glyph width.
fn label(content: &str, x: f64, y: f64, font_size: f64, config: &LayoutConfig) -> Element {
    text(content, x, y, font_size).measured(config.text_width(content, font_size))
}

/// The `|0⟩` labels in front of the qubit wires.
#[must_use]
pub fn format_inputs(wires: &WireTable, config: &LayoutConfig) -> Element {
    group(
        wires
            .qubit_ys()
            .into_iter()
            .map(|y| label("|0⟩", config.input_label_x, y, config.label_font_size, config)),
    )
    .class("qubit-input-states")
}

/// The wire layer: a line and a label for every wire in table order, followed by
/// the connectors from each measurement down to its classical wire.
#[must_use]
pub fn format_wires(
    wires: &WireTable,
    metadata: &[Metadata],
    end_x: f64,
    config: &LayoutConfig,
) -> Element {
    let measurements: Vec<&Metadata> = metadata
        .iter()
        .flat_map(Metadata::descendants)
        .filter(|md| md.gate_type == GateType::Measure)
        .collect();

    let mut layer = Element::new("g").class(WIRE_LAYER);
    for wire in wires.wires() {
        let y = wire.y;
        let wire_group = match wire.kind {
            WireKind::Qubit { q_id } => group([
                line(config.reg_line_start, y, end_x, y),
                label(
                    &format!("q{q_id}"),
                    config.reg_line_start,
                    y - QUBIT_LABEL_OFFSET,
                    WIRE_LABEL_FONT_SIZE,
                    config,
                ),
            ])
            .class("qubit-wire"),
            WireKind::Classical { q_id, c_id } => {
                let start = measurements
                    .iter()
                    .filter(|md| md.targets_y.all().contains(&y))
                    .map(|md| md.x)
                    .reduce(f64::min)
                    .unwrap_or(config.reg_line_start);
                group([
                    line(start, y, end_x, y).class("register-classical"),
                    label(
                        &format!("c{q_id}.{c_id}"),
                        start,
                        y - CLASSICAL_LABEL_OFFSET,
                        WIRE_LABEL_FONT_SIZE,
                        config,
                    ),
                ])
                .class("classical-wire")
            }
        };
        layer.push(wire_group);
    }

    for md in measurements {
        let Some(&gate_y) = md.controls_y.first() else {
            continue;
        };
        for wire_y in md.targets_y.all() {
            layer.push(measurement_connector(md.x, gate_y, wire_y));
        }
    }
    layer
}

fn measurement_connector(x: f64, gate_y: f64, wire_y: f64) -> Element {
    let pad = CLASSICAL_LINE_PADDING;
    group([
        line(x + pad, gate_y, x + pad, wire_y).class("register-classical"),
        line(x - pad, gate_y, x - pad, wire_y).class("register-classical"),
        circle(x, wire_y, 2.0 * pad).class("classical-junction"),
    ])
}

/// The gate layer.
#[must_use]
pub fn format_gates(metadata: &[Metadata], config: &LayoutConfig) -> Element {
    Element::new("g")
        .class(GATE_LAYER)
        .children(metadata.iter().map(|md| format_gate(md, 0, config)))
}

fn format_gate(md: &Metadata, depth: usize, config: &LayoutConfig) -> Element {
    let mut gate = Element::new("g")
        .class("gate")
        .attr("data-id", &md.data.id)
        .attr("data-zoom-in", md.data.zoom_in)
        .attr("data-zoom-out", md.data.zoom_out)
        .attr("data-expanded", md.data.expanded);

    match md.gate_type {
        GateType::Measure => {
            for &y in md.controls_y.iter().take(1) {
                gate.push(measure(md.x, y, config));
            }
        }
        GateType::Unitary => {
            if let TargetsY::Grouped(clusters) = &md.targets_y {
                for element in unitary(md, clusters, true, config) {
                    gate.push(element);
                }
            }
        }
        GateType::Cnot => {
            let targets = md.targets_y.all();
            gate.push(control_line(md, config));
            for y in targets {
                gate.push(oplus(md.x, y, config.oplus_radius));
            }
        }
        GateType::ControlledUnitary => {
            gate.push(control_line(md, config));
            if let TargetsY::Grouped(clusters) = &md.targets_y {
                for element in unitary(md, clusters, false, config) {
                    gate.push(element);
                }
            }
        }
        GateType::Swap => {
            for element in swap(md, config) {
                gate.push(element);
            }
        }
        GateType::Group => {
            let (top, bottom) = vertical_extent(md).unwrap_or_default();
            let padding = config.group_padding(depth);
            let y = top - config.gate_height / 2.0 - padding;
            let height = bottom - top + config.gate_height + 2.0 * padding;
            gate.push(dashed_box(md.left(), y, md.width, height).class("group-box"));
            if let Some(MetadataChildren::Nested(children)) = &md.children {
                for child in children {
                    gate.push(format_gate(child, depth + 1, config));
                }
            }
        }
        GateType::ClassicallyControlled => {
            for element in classically_controlled(md, depth, config) {
                gate.push(element);
            }
            gate.add_class("classically-controlled-unknown");
        }
    }

    if md.gate_type != GateType::ClassicallyControlled && (md.data.zoom_in || md.data.expanded) {
        gate.push(zoom_button(md, depth, config));
    }
    gate
}

/// Smallest and largest y among this entry's wires and those of its descendants.
fn vertical_extent(md: &Metadata) -> Option<(f64, f64)> {
    let ys: Vec<f64> = md
        .descendants()
        .into_iter()
        .flat_map(|d| d.controls_y.iter().copied().chain(d.targets_y.all()))
        .collect();
    let top = ys.iter().copied().reduce(f64::min)?;
    let bottom = ys.iter().copied().reduce(f64::max)?;
    Some((top, bottom))
}

fn measure(x: f64, y: f64, config: &LayoutConfig) -> Element {
    let width = config.min_gate_width;
    let height = config.gate_height;
    group([
        rect(x - width / 2.0, y - height / 2.0, width, height).class("gate-measure"),
        arc(x - 10.0, y - 4.0, 10.0, 8.0),
        line(x, y + 8.0, x + 8.0, y - 8.0),
    ])
}

fn unitary(
    md: &Metadata,
    clusters: &[Vec<f64>],
    connect_clusters: bool,
    config: &LayoutConfig,
) -> Vec<Element> {
    let mut elements = Vec::new();
    let bounds = |ys: &[f64]| {
        let top = ys.iter().copied().fold(f64::INFINITY, f64::min);
        let bottom = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (top, bottom)
    };

    if connect_clusters && clusters.len() > 1 {
        let (top, bottom) = bounds(&clusters.concat());
        elements.push(dashed_line(md.x, top, md.x, bottom));
    }

    for cluster in clusters.iter().filter(|c| !c.is_empty()) {
        let (top, bottom) = bounds(cluster);
        let y = top - config.gate_height / 2.0;
        let height = bottom - top + config.gate_height;
        let center = y + height / 2.0;
        elements.push(rect(md.left(), y, md.width, height).class("gate-unitary"));
        match &md.display_args {
            Some(args) => {
                let label_y = center - 7.0;
                elements.push(label(&md.label, md.x, label_y, config.label_font_size, config));
                elements.push(
                    label(args, md.x, label_y + 20.0, config.args_font_size, config)
                        .class("arg-button"),
                );
            }
            None => elements.push(label(&md.label, md.x, center, config.label_font_size, config)),
        }
    }
    elements
}

/// Vertical line joining all controls and targets, plus the control dots.
fn control_line(md: &Metadata, config: &LayoutConfig) -> Element {
    let ys: Vec<f64> = md
        .controls_y
        .iter()
        .copied()
        .chain(md.targets_y.all())
        .collect();
    let top = ys.iter().copied().fold(f64::INFINITY, f64::min);
    let bottom = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    group(
        std::iter::once(line(md.x, top, md.x, bottom).class("control-line")).chain(
            md.controls_y
                .iter()
                .map(|&y| control_dot(md.x, y, config.control_dot_radius)),
        ),
    )
}

fn oplus(x: f64, y: f64, r: f64) -> Element {
    group([
        circle(x, y, r),
        line(x, y - r, x, y + r),
        line(x - r, y, x + r, y),
    ])
    .class("oplus")
}

fn swap(md: &Metadata, config: &LayoutConfig) -> Vec<Element> {
    let ys = md.targets_y.all();
    let top = ys.iter().copied().fold(f64::INFINITY, f64::min);
    let bottom = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let background = rect(
        md.left(),
        top - config.gate_height / 2.0,
        md.width,
        bottom - top + config.gate_height,
    )
    .class("gate-swap");

    let arm = config.gate_height / 5.0;
    let crosses = ys.iter().map(|&y| {
        group([
            line(md.x - arm, y - arm, md.x + arm, y + arm),
            line(md.x - arm, y + arm, md.x + arm, y - arm),
        ])
        .class("cross")
    });

    std::iter::once(background)
        .chain(crosses)
        .chain(std::iter::once(line(md.x, top, md.x, bottom)))
        .collect()
}

fn classically_controlled(md: &Metadata, depth: usize, config: &LayoutConfig) -> Vec<Element> {
    let (top, bottom) = md.targets_y.bounds().unwrap_or_default();
    let padding = config.group_padding(depth);
    let left = md.left();
    let container_left = left + config.control_btn_offset;
    let y = top - config.gate_height / 2.0 - padding;
    let height = bottom - top + config.gate_height + 2.0 * padding;

    let mut elements = Vec::new();
    if let Some(&control_y) = md.controls_y.first() {
        let button_x = left + config.control_btn_offset / 2.0;
        elements.push(dashed_line(
            button_x + config.control_btn_radius,
            control_y,
            container_left,
            control_y,
        ));
        elements.push(
            group([
                circle(button_x, control_y, config.control_btn_radius),
                label("?", button_x, control_y, config.args_font_size, config),
            ])
            .class("classically-controlled-btn"),
        );
    }

    let (zero, one) = match &md.children {
        Some(MetadataChildren::Branches { zero, one }) => (zero.as_slice(), one.as_slice()),
        _ => (&[][..], &[][..]),
    };
    elements.push(
        group(zero.iter().map(|child| format_gate(child, depth + 1, config))).class("gates-zero"),
    );
    elements.push(
        group(one.iter().map(|child| format_gate(child, depth + 1, config))).class("gates-one"),
    );
    elements.push(
        dashed_box(container_left, y, md.width - config.control_btn_offset, height)
            .class("classical-container"),
    );
    elements
}

/// Expand or collapse button at the top-left corner of a gate.
fn zoom_button(md: &Metadata, depth: usize, config: &LayoutConfig) -> Element {
    let (top, _) = vertical_extent(md).unwrap_or_default();
    let mut y = top - config.gate_height / 2.0;
    if md.data.expanded {
        y -= config.group_padding(depth);
    }
    let (class, symbol) = if md.data.expanded {
        ("gate-collapse", "-")
    } else {
        ("gate-expand", "+")
    };
    group([
        circle(0.0, 0.0, config.control_btn_radius),
        label(symbol, 0.0, 0.0, config.args_font_size, config),
    ])
    .class("gate-control")
    .class(class)
    .attr("transform", format!("translate({}, {y})", md.left()))
}
