// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Clone, Debug, Diagnostic, Error, PartialEq)]
pub enum Error {
    #[error("qubit {0} is not declared in the circuit")]
    #[diagnostic(code("Qviz.Layout.UnknownQubit"))]
    UnknownQubit(usize),
    #[error("qubit {q_id} has no classical result wire {c_id}")]
    #[diagnostic(
        code("Qviz.Layout.UnknownClassicalRegister"),
        help("increase `numChildren` on the qubit to declare more result wires")
    )]
    UnknownClassicalRegister { q_id: usize, c_id: usize },
    #[error("classical register on qubit {0} has no result id")]
    #[diagnostic(code("Qviz.Layout.MissingResultId"))]
    MissingResultId(usize),
    #[error("classically-controlled operation `{0}` has no classical control")]
    #[diagnostic(code("Qviz.Layout.MissingClassicalControl"))]
    MissingClassicalControl(String),
    #[error("classically-controlled operation `{0}` has no children")]
    #[diagnostic(code("Qviz.Layout.EmptyConditional"))]
    EmptyConditional(String),
    #[error("measurement `{0}` does not name the measured qubit")]
    #[diagnostic(code("Qviz.Layout.MissingMeasuredQubit"))]
    MissingMeasuredQubit(String),
    #[error("controlled operation `{0}` has no controls")]
    #[diagnostic(code("Qviz.Layout.MissingControls"))]
    MissingControls(String),
    #[error("swap must act on exactly two targets, found {0}")]
    #[diagnostic(code("Qviz.Layout.InvalidSwap"))]
    InvalidSwap(usize),
    #[error("wire layer not found")]
    #[diagnostic(code("Qviz.Bridge.WireLayerNotFound"))]
    WireLayerNotFound,
    #[error("y not found")]
    #[diagnostic(code("Qviz.Bridge.WireYNotFound"))]
    WireYNotFound,
    #[error("Text not found")]
    #[diagnostic(code("Qviz.Bridge.TextNotFound"))]
    TextNotFound,
    #[error("{attribute} not found on <{tag}>")]
    #[diagnostic(code("Qviz.Bridge.AttributeNotFound"))]
    AttributeNotFound { tag: String, attribute: String },
}
