// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#[cfg(test)]
mod tests;

use crate::{
    Error,
    circuit::{Operation, Register},
    config::LayoutConfig,
    data_id::{SEPARATOR, child_id},
    registers::{WireKind, WireTable},
};
use std::ops::RangeInclusive;

/// How an operation is drawn. Assigned once during layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateType {
    Measure,
    Unitary,
    Cnot,
    Swap,
    ControlledUnitary,
    Group,
    ClassicallyControlled,
}

/// Vertical positions of an operation's targets.
#[derive(Clone, Debug, PartialEq)]
pub enum TargetsY {
    Flat(Vec<f64>),
    /// Targets split into clusters of adjacent wires, each drawn as its own box.
    Grouped(Vec<Vec<f64>>),
}

impl TargetsY {
    #[must_use]
    pub fn all(&self) -> Vec<f64> {
        match self {
            TargetsY::Flat(ys) => ys.clone(),
            TargetsY::Grouped(groups) => groups.iter().flatten().copied().collect(),
        }
    }

    /// The topmost and bottommost target.
    #[must_use]
    pub fn bounds(&self) -> Option<(f64, f64)> {
        let ys = self.all();
        let min = ys.iter().copied().reduce(f64::min)?;
        let max = ys.iter().copied().reduce(f64::max)?;
        Some((min, max))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MetadataChildren {
    Nested(Vec<Metadata>),
    Branches {
        zero: Vec<Metadata>,
        one: Vec<Metadata>,
    },
}

/// Attributes attached to the rendered gate element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataAttributes {
    /// Path identifier of the operation.
    pub id: String,
    /// The operation has children to expand into.
    pub zoom_in: bool,
    /// The operation is nested inside another one.
    pub zoom_out: bool,
    /// The operation is drawn as an expanded group.
    pub expanded: bool,
}

/// Placement of one rendered operation.
#[derive(Clone, Debug, PartialEq)]
pub struct Metadata {
    pub gate_type: GateType,
    /// Horizontal center.
    pub x: f64,
    pub width: f64,
    pub controls_y: Vec<f64>,
    pub targets_y: TargetsY,
    pub label: String,
    pub display_args: Option<String>,
    pub children: Option<MetadataChildren>,
    pub data: DataAttributes,
}

impl Metadata {
    #[must_use]
    pub fn left(&self) -> f64 {
        self.x - self.width / 2.0
    }

    /// This entry followed by all nested entries, depth first.
    #[must_use]
    pub fn descendants(&self) -> Vec<&Metadata> {
        let mut all = vec![self];
        match &self.children {
            Some(MetadataChildren::Nested(children)) => {
                all.extend(children.iter().flat_map(Metadata::descendants));
            }
            Some(MetadataChildren::Branches { zero, one }) => {
                all.extend(zero.iter().chain(one).flat_map(Metadata::descendants));
            }
            None => {}
        }
        all
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub metadata: Vec<Metadata>,
    /// Total diagram width.
    pub width: f64,
}

/// Lays out the root operations of a circuit.
pub fn compute_layout(
    operations: &[Operation],
    wires: &WireTable,
    config: &LayoutConfig,
) -> Result<Layout, Error> {
    compute_layout_at_depth(operations, wires, config, 0)
}

/// Lays out the operations visible at `depth`; see [`select_at_depth`].
pub fn compute_layout_at_depth(
    operations: &[Operation],
    wires: &WireTable,
    config: &LayoutConfig,
    depth: usize,
) -> Result<Layout, Error> {
    let selected = select_at_depth(operations, depth);
    let mut engine = LayoutEngine {
        wires,
        config,
        measured_at: vec![None; wires.len()],
    };
    let (metadata, width) = engine.layout_ops(&selected, config.start_x, 0)?;
    log::debug!(
        "laid out {} operations at depth {depth}, width {width}",
        selected.len()
    );
    Ok(Layout { metadata, width })
}

/// The operations drawn at a render depth, paired with their path identifiers.
/// At depth 0 these are the root operations. At each further depth, operations
/// with children are replaced by their children.
#[must_use]
pub fn select_at_depth(operations: &[Operation], depth: usize) -> Vec<(String, &Operation)> {
    let mut selected = Vec::new();
    select_into(operations, "", depth, &mut selected);
    selected
}

fn select_into<'a>(
    operations: &'a [Operation],
    parent: &str,
    depth: usize,
    selected: &mut Vec<(String, &'a Operation)>,
) {
    for (i, op) in operations.iter().enumerate() {
        let id = child_id(parent, i);
        if depth > 0 && op.has_children() {
            select_into(op.children(), &id, depth - 1, selected);
        } else {
            selected.push((id, op));
        }
    }
}

fn with_ids<'a>(
    parent: &str,
    children: Vec<(usize, &'a Operation)>,
) -> Vec<(String, &'a Operation)> {
    children
        .into_iter()
        .map(|(i, child)| (child_id(parent, i), child))
        .collect()
}

fn classify(op: &Operation) -> Result<GateType, Error> {
    if op.is_conditional {
        if !op.controls.iter().any(Register::is_classical) {
            return Err(Error::MissingClassicalControl(op.gate.clone()));
        }
        if !op.has_children() {
            return Err(Error::EmptyConditional(op.gate.clone()));
        }
        return Ok(GateType::ClassicallyControlled);
    }
    if op.has_children() && op.is_expanded() {
        return Ok(GateType::Group);
    }
    if op.is_measurement {
        if op.controls.is_empty() {
            return Err(Error::MissingMeasuredQubit(op.gate.clone()));
        }
        return Ok(GateType::Measure);
    }
    if op.gate == "SWAP" && !op.is_controlled {
        if op.targets.len() != 2 {
            return Err(Error::InvalidSwap(op.targets.len()));
        }
        return Ok(GateType::Swap);
    }
    if op.is_controlled {
        if op.controls.is_empty() {
            return Err(Error::MissingControls(op.gate.clone()));
        }
        if op.gate == "X" && op.targets.len() == 1 {
            return Ok(GateType::Cnot);
        }
        return Ok(GateType::ControlledUnitary);
    }
    Ok(GateType::Unitary)
}

struct LayoutEngine<'a> {
    wires: &'a WireTable,
    config: &'a LayoutConfig,
    /// x of the first measurement writing each classical wire.
    measured_at: Vec<Option<f64>>,
}

impl LayoutEngine<'_> {
    /// Places `ops` left to right starting at `origin`, keeping a cursor per
    /// wire. Returns the metadata and the rightmost cursor.
    fn layout_ops(
        &mut self,
        ops: &[(String, &Operation)],
        origin: f64,
        depth: usize,
    ) -> Result<(Vec<Metadata>, f64), Error> {
        let mut cursors = vec![origin; self.wires.len()];
        let mut metadata = Vec::with_capacity(ops.len());

        for (id, op) in ops {
            let span = self.span(op)?;
            let left = span.clone().map_or(origin, |span| {
                cursors[span].iter().copied().fold(origin, f64::max)
            });
            let mut md = self.operation_metadata(id, op, left, depth)?;
            match span {
                Some(span) => {
                    let right = left + md.width + 2.0 * self.config.gate_padding;
                    cursors[span].fill(right);
                }
                None => {
                    md.width = 0.0;
                    md.x = left;
                }
            }
            log::trace!("{id} `{}` at x={} width={}", op.gate, md.x, md.width);
            metadata.push(md);
        }

        let end = cursors.iter().copied().fold(origin, f64::max);
        Ok((metadata, end))
    }

    /// Contiguous range of wires the operation blocks.
    fn span(&self, op: &Operation) -> Result<Option<RangeInclusive<usize>>, Error> {
        let mut wires = Vec::new();
        self.footprint(op, &mut wires)?;
        let lo = wires.iter().min();
        let hi = wires.iter().max();
        Ok(lo.zip(hi).map(|(&lo, &hi)| lo..=hi))
    }

    fn footprint(&self, op: &Operation, wires: &mut Vec<usize>) -> Result<(), Error> {
        if op.is_conditional {
            // The classical control box covers the whole diagram.
            if !self.wires.is_empty() {
                wires.extend([0, self.wires.len() - 1]);
            }
            return Ok(());
        }
        for register in op.controls.iter().chain(&op.targets) {
            wires.push(self.wires.wire_of(register)?);
        }
        for child in op.children() {
            self.footprint(child, wires)?;
        }
        Ok(())
    }

    fn ys(&self, registers: &[Register]) -> Result<Vec<f64>, Error> {
        registers.iter().map(|r| self.wires.y_of(r)).collect()
    }

    fn operation_metadata(
        &mut self,
        id: &str,
        op: &Operation,
        left: f64,
        depth: usize,
    ) -> Result<Metadata, Error> {
        let gate_type = classify(op)?;
        let label = if op.is_adjoint {
            format!("{}'", op.gate)
        } else {
            op.gate.clone()
        };
        let data = DataAttributes {
            id: id.to_string(),
            zoom_in: op.has_children(),
            zoom_out: id.contains(SEPARATOR),
            expanded: gate_type == GateType::Group,
        };
        let mut controls_y = self.ys(&op.controls)?;
        let mut children = None;

        let (width, targets_y) = match gate_type {
            GateType::Measure => {
                controls_y.truncate(1);
                let width = self.config.min_gate_width;
                let x = left + width / 2.0;
                for target in op.targets.iter().filter(|t| t.is_classical()) {
                    let started = &mut self.measured_at[self.wires.wire_of(target)?];
                    *started = Some(started.map_or(x, |s| s.min(x)));
                }
                (width, TargetsY::Flat(self.ys(&op.targets)?))
            }
            GateType::Cnot | GateType::Swap => (
                self.config.min_gate_width,
                TargetsY::Flat(self.ys(&op.targets)?),
            ),
            GateType::Unitary | GateType::ControlledUnitary => (
                self.gate_width(&label, op.display_args.as_deref()),
                TargetsY::Grouped(self.cluster_targets(&op.targets, left)?),
            ),
            GateType::Group => {
                let padding = self.config.group_padding(depth);
                let origin = left + padding;
                let selected = with_ids(id, op.children().iter().enumerate().collect());
                let (nested, end) = self.layout_ops(&selected, origin, depth + 1)?;
                children = Some(MetadataChildren::Nested(nested));
                (
                    self.enclosing_width(left, origin, end, padding),
                    TargetsY::Flat(self.ys(&op.targets)?),
                )
            }
            GateType::ClassicallyControlled => {
                let padding = self.config.group_padding(depth);
                let origin = left + self.config.control_btn_offset + padding;
                controls_y = op
                    .controls
                    .iter()
                    .filter(|c| c.is_classical())
                    .map(|c| self.wires.y_of(c))
                    .collect::<Result<_, _>>()?;
                let (zero, one) = op.branches();
                let (zero, zero_end) = self.layout_ops(&with_ids(id, zero), origin, depth + 1)?;
                let (one, one_end) = self.layout_ops(&with_ids(id, one), origin, depth + 1)?;
                children = Some(MetadataChildren::Branches { zero, one });

                let qubit_ys = self.wires.qubit_ys();
                let top = qubit_ys.iter().copied().reduce(f64::min);
                let bottom = qubit_ys.iter().copied().reduce(f64::max);
                (
                    self.enclosing_width(left, origin, zero_end.max(one_end), padding),
                    TargetsY::Flat(top.into_iter().chain(bottom).collect()),
                )
            }
        };

        Ok(Metadata {
            gate_type,
            x: left + width / 2.0,
            width,
            controls_y,
            targets_y,
            label,
            display_args: op.display_args.clone(),
            children,
            data,
        })
    }

    /// Width of a box starting at `left` that encloses children laid out from
    /// `origin` up to the cursor `end`.
    fn enclosing_width(&self, left: f64, origin: f64, end: f64, padding: f64) -> f64 {
        let inner_right = (end - 2.0 * self.config.gate_padding).max(origin);
        inner_right + padding - left
    }

    fn gate_width(&self, label: &str, display_args: Option<&str>) -> f64 {
        let config = self.config;
        let label_width = config.text_width(label, config.label_font_size);
        let args_width =
            display_args.map_or(0.0, |args| config.text_width(args, config.args_font_size));
        (label_width.max(args_width) + 2.0 * config.label_padding).max(config.min_gate_width)
    }

    /// Groups target ys into clusters of adjacent qubit rows. A cluster also
    /// ends where a classical wire that is already in use at `x` runs between
    /// two targets.
    fn cluster_targets(&self, targets: &[Register], x: f64) -> Result<Vec<Vec<f64>>, Error> {
        let mut wires = targets
            .iter()
            .map(|t| self.wires.wire_of(t))
            .collect::<Result<Vec<_>, _>>()?;
        wires.sort_unstable();
        wires.dedup();

        let table = self.wires.wires();
        let mut clusters: Vec<Vec<f64>> = Vec::new();
        let mut prev: Option<usize> = None;
        for wire in wires {
            let y = table[wire].y;
            let joins = prev.is_some_and(|prev| {
                table[wire].row - table[prev].row <= self.config.max_target_gap
                    && !self.classical_in_use_between(prev, wire, x)
            });
            match clusters.last_mut() {
                Some(cluster) if joins => cluster.push(y),
                _ => clusters.push(vec![y]),
            }
            prev = Some(wire);
        }
        Ok(clusters)
    }

    fn classical_in_use_between(&self, from: usize, to: usize, x: f64) -> bool {
        (from + 1..to).any(|wire| {
            matches!(self.wires.wires()[wire].kind, WireKind::Classical { .. })
                && self.measured_at[wire].is_some_and(|start| start <= x)
        })
    }
}
