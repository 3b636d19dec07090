// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

pub mod bridge;
pub mod circuit;
mod composer;
pub mod config;
pub mod data_id;
mod draggable;
pub mod dropzone;
pub mod editor;
mod error;
pub mod formatter;
pub mod layout;
pub mod registers;
pub mod svg;
mod visualizer;

pub use circuit::{Circuit, ConditionalRender, Operation, Qubit, Register, RegisterType};
pub use composer::{Rendered, compose};
pub use config::{Config, DropzoneConfig, LayoutConfig};
pub use draggable::{DragMode, Draggable};
pub use error::Error;
pub use layout::{GateType, Layout, Metadata, compute_layout};
pub use registers::WireTable;
pub use visualizer::{ClassicalState, CoreApi, Event, Extension, OnCircuitChange, Visualizer};
