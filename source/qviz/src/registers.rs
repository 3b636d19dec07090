// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.


use crate::{
    Error,
    circuit::{Qubit, Register},
    config::LayoutConfig,
};
use rustc_hash::FxHashMap;

/// What a wire carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireKind {
    Qubit { q_id: usize },
    Classical { q_id: usize, c_id: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Wire {
    pub y: f64,
    pub kind: WireKind,
    /// Position of the owning qubit in declaration order.
    pub row: usize,
}

/// Vertical placement of every qubit wire and the classical result wires beneath it.
///
/// Wire indices follow allocation order: a qubit's wire, then each of its
/// classical result wires, then the next qubit.
#[derive(Clone, Debug, Default)]
pub struct WireTable {
    wires: Vec<Wire>,
    qubit_wires: FxHashMap<usize, usize>,
    /// Qubit ids in row order.
    qubits: Vec<usize>,
    height: f64,
}

impl WireTable {
    #[must_use]
    pub fn allocate(qubits: &[Qubit], config: &LayoutConfig) -> Self {
        let mut wires = Vec::new();
        let mut qubit_wires = FxHashMap::default();
        let mut y = config.start_y;

        for (row, qubit) in qubits.iter().enumerate() {
            qubit_wires.insert(qubit.id, wires.len());
            wires.push(Wire {
                y,
                kind: WireKind::Qubit { q_id: qubit.id },
                row,
            });
            for c_id in 0..qubit.num_children {
                y += config.classical_register_height;
                wires.push(Wire {
                    y,
                    kind: WireKind::Classical {
                        q_id: qubit.id,
                        c_id,
                    },
                    row,
                });
            }
            y += config.register_height;
        }

        Self {
            wires,
            qubit_wires,
            qubits: qubits.iter().map(|q| q.id).collect(),
            height: y,
        }
    }

    #[must_use]
    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.wires.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    /// Total diagram height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn qubit_count(&self) -> usize {
        self.qubits.len()
    }

    /// The y coordinate of every wire, indexed by wire number.
    #[must_use]
    pub fn ys(&self) -> Vec<f64> {
        self.wires.iter().map(|w| w.y).collect()
    }

    /// Resolves a register to its wire number.
    pub fn wire_of(&self, register: &Register) -> Result<usize, Error> {
        let &qubit_wire = self
            .qubit_wires
            .get(&register.q_id)
            .ok_or(Error::UnknownQubit(register.q_id))?;
        if !register.is_classical() {
            return Ok(qubit_wire);
        }

        let c_id = register.c_id.ok_or(Error::MissingResultId(register.q_id))?;
        let wire = qubit_wire + 1 + c_id;
        match self.wires.get(wire) {
            Some(Wire {
                kind: WireKind::Classical { q_id, .. },
                ..
            }) if *q_id == register.q_id => Ok(wire),
            _ => Err(Error::UnknownClassicalRegister {
                q_id: register.q_id,
                c_id,
            }),
        }
    }

    pub fn y_of(&self, register: &Register) -> Result<f64, Error> {
        Ok(self.wires[self.wire_of(register)?].y)
    }

    /// Row of the qubit owning the given wire.
    #[must_use]
    pub fn row_of(&self, wire: usize) -> Option<usize> {
        self.wires.get(wire).map(|w| w.row)
    }

    /// Row of the qubit with the given id.
    #[must_use]
    pub fn row_of_qubit(&self, q_id: usize) -> Option<usize> {
        self.qubit_wires.get(&q_id).map(|&wire| self.wires[wire].row)
    }

    /// Id of the qubit drawn on the given row.
    #[must_use]
    pub fn qubit_at_row(&self, row: usize) -> Option<usize> {
        self.qubits.get(row).copied()
    }

    /// The y coordinates of the qubit wires only.
    #[must_use]
    pub fn qubit_ys(&self) -> Vec<f64> {
        self.wires
            .iter()
            .filter(|w| matches!(w.kind, WireKind::Qubit { .. }))
            .map(|w| w.y)
            .collect()
    }
}
