// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#[cfg(test)]
mod tests;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::ops::Not;

/// Representation of a quantum circuit.
#[derive(Clone, Serialize, Deserialize, Default, Debug, PartialEq)]
pub struct Circuit {
    pub qubits: Vec<Qubit>,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Qubit {
    pub id: usize,
    /// Number of classical result wires rendered beneath this qubit.
    #[serde(rename = "numChildren")]
    #[serde(skip_serializing_if = "is_zero")]
    #[serde(default)]
    pub num_children: usize,
}

impl Qubit {
    #[must_use]
    pub fn new(id: usize) -> Self {
        Self {
            id,
            num_children: 0,
        }
    }

    #[must_use]
    pub fn with_results(id: usize, num_children: usize) -> Self {
        Self { id, num_children }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Kind of wire a register points at. Serialized as its numeric discriminant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RegisterType {
    #[default]
    Qubit = 0,
    Classical = 1,
}

impl RegisterType {
    #[allow(clippy::trivially_copy_pass_by_ref)]
    fn is_qubit(&self) -> bool {
        *self == Self::Qubit
    }
}

impl Serialize for RegisterType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for RegisterType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(Self::Qubit),
            1 => Ok(Self::Classical),
            n => Err(de::Error::custom(format!("unknown register type {n}"))),
        }
    }
}

/// Reference to a qubit wire, or to one of the classical result wires of a qubit.
#[derive(Serialize, Deserialize, Debug, Eq, Hash, PartialEq, Clone)]
pub struct Register {
    #[serde(rename = "type")]
    #[serde(skip_serializing_if = "RegisterType::is_qubit")]
    #[serde(default)]
    pub reg_type: RegisterType,
    #[serde(rename = "qId")]
    pub q_id: usize,
    #[serde(rename = "cId")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub c_id: Option<usize>,
}

impl Register {
    #[must_use]
    pub fn qubit(q_id: usize) -> Self {
        Self {
            reg_type: RegisterType::Qubit,
            q_id,
            c_id: None,
        }
    }

    #[must_use]
    pub fn classical(q_id: usize, c_id: usize) -> Self {
        Self {
            reg_type: RegisterType::Classical,
            q_id,
            c_id: Some(c_id),
        }
    }

    #[must_use]
    pub fn is_classical(&self) -> bool {
        self.reg_type == RegisterType::Classical
    }
}

/// Controls how an operation with children is drawn, and on which
/// branch of a classically-controlled parent it appears.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConditionalRender {
    #[default]
    Always = 0,
    OnZero = 1,
    OnOne = 2,
    AsGroup = 3,
}

impl ConditionalRender {
    #[allow(clippy::trivially_copy_pass_by_ref)]
    fn is_always(&self) -> bool {
        *self == Self::Always
    }
}

impl Serialize for ConditionalRender {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for ConditionalRender {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(Self::Always),
            1 => Ok(Self::OnZero),
            2 => Ok(Self::OnOne),
            3 => Ok(Self::AsGroup),
            n => Err(de::Error::custom(format!("unknown conditional render mode {n}"))),
        }
    }
}

/// Node of the operation tree.
#[derive(Clone, Serialize, Deserialize, Default, Debug, PartialEq)]
pub struct Operation {
    pub gate: String,
    #[serde(rename = "displayArgs")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub display_args: Option<String>,
    #[serde(rename = "isControlled")]
    #[serde(skip_serializing_if = "Not::not")]
    #[serde(default)]
    pub is_controlled: bool,
    #[serde(rename = "isAdjoint")]
    #[serde(skip_serializing_if = "Not::not")]
    #[serde(default)]
    pub is_adjoint: bool,
    #[serde(rename = "isMeasurement")]
    #[serde(skip_serializing_if = "Not::not")]
    #[serde(default)]
    pub is_measurement: bool,
    #[serde(rename = "isConditional")]
    #[serde(skip_serializing_if = "Not::not")]
    #[serde(default)]
    pub is_conditional: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub controls: Vec<Register>,
    #[serde(default)]
    pub targets: Vec<Register>,
    /// Sub-operations. Branches of a classically-controlled operation are
    /// kept in this single list and told apart by their `conditional_render`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "deserialize_children")]
    #[serde(default)]
    pub children: Option<Vec<Operation>>,
    #[serde(rename = "conditionalRender")]
    #[serde(skip_serializing_if = "ConditionalRender::is_always")]
    #[serde(default)]
    pub conditional_render: ConditionalRender,
    /// Zoom state of a branch child, whose `conditional_render` names its branch.
    #[serde(skip)]
    pub branch_expanded: bool,
}

impl Operation {
    /// Creates an uncontrolled gate acting on the given qubits.
    #[must_use]
    pub fn new(gate: &str, targets: &[usize]) -> Self {
        Self {
            gate: gate.to_string(),
            targets: targets.iter().copied().map(Register::qubit).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn controlled(gate: &str, controls: &[usize], targets: &[usize]) -> Self {
        Self {
            is_controlled: true,
            controls: controls.iter().copied().map(Register::qubit).collect(),
            ..Self::new(gate, targets)
        }
    }

    /// Creates a measurement of `q_id` reporting into classical result `c_id`.
    #[must_use]
    pub fn measurement(q_id: usize, c_id: usize) -> Self {
        Self {
            gate: "Measure".to_string(),
            is_measurement: true,
            controls: vec![Register::qubit(q_id)],
            targets: vec![Register::classical(q_id, c_id)],
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Operation>) -> Self {
        self.children = Some(children);
        self
    }

    #[must_use]
    pub fn with_render(mut self, conditional_render: ConditionalRender) -> Self {
        self.conditional_render = conditional_render;
        self
    }

    /// Whether the operation is drawn as a group showing its children.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        match self.conditional_render {
            ConditionalRender::AsGroup => true,
            ConditionalRender::OnZero | ConditionalRender::OnOne => self.branch_expanded,
            ConditionalRender::Always => false,
        }
    }

    /// Sets the zoom state. Branch tags are kept.
    pub fn set_expanded(&mut self, expanded: bool) {
        match self.conditional_render {
            ConditionalRender::OnZero | ConditionalRender::OnOne => {
                self.branch_expanded = expanded;
            }
            ConditionalRender::Always | ConditionalRender::AsGroup => {
                self.conditional_render = if expanded {
                    ConditionalRender::AsGroup
                } else {
                    ConditionalRender::Always
                };
            }
        }
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        self.children.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Returns the children, or an empty slice when there are none.
    #[must_use]
    pub fn children(&self) -> &[Operation] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Splits the children of a classically-controlled operation into the
    /// branch rendered when the bit is zero and the one rendered when it is one.
    /// Each child is paired with its index in `children`.
    #[must_use]
    pub fn branches(&self) -> (Vec<(usize, &Operation)>, Vec<(usize, &Operation)>) {
        let children = self.children().iter().enumerate();
        let zero = children
            .clone()
            .filter(|(_, op)| op.conditional_render != ConditionalRender::OnOne)
            .collect();
        let one = children
            .filter(|(_, op)| op.conditional_render != ConditionalRender::OnZero)
            .collect();
        (zero, one)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChildrenRepr {
    Branches(Vec<Operation>, Vec<Operation>),
    List(Vec<Operation>),
}

fn deserialize_children<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<Operation>>, D::Error> {
    let repr = Option::<ChildrenRepr>::deserialize(deserializer)?;
    Ok(repr.map(|repr| match repr {
        ChildrenRepr::List(ops) => ops,
        ChildrenRepr::Branches(zero, one) => zero
            .into_iter()
            .map(|op| into_branch(op, ConditionalRender::OnZero))
            .chain(
                one.into_iter()
                    .map(|op| into_branch(op, ConditionalRender::OnOne)),
            )
            .collect(),
    }))
}

fn into_branch(mut op: Operation, branch: ConditionalRender) -> Operation {
    op.branch_expanded = op.is_expanded();
    op.conditional_render = branch;
    op
}
