// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.


use crate::{
    Error,
    bridge::closest,
    circuit::{Circuit, Operation},
    composer::{Rendered, compose},
    config::Config,
    data_id::operation_of_mut,
    draggable::Draggable,
    layout::select_at_depth,
    svg::Element,
};

/// Input event on the rendered diagram. Targets are element paths from the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    MouseDown { target: Vec<usize> },
    MouseUp { target: Vec<usize>, ctrl_key: bool },
    Click { target: Vec<usize> },
    KeyDown { ctrl_key: bool },
    KeyUp { ctrl_key: bool },
}

/// What an extension may do to the visualizer.
pub struct CoreApi<'a> {
    circuit: &'a mut Circuit,
    rerender: bool,
}

impl<'a> CoreApi<'a> {
    pub(crate) fn new(circuit: &'a mut Circuit) -> Self {
        Self {
            circuit,
            rerender: false,
        }
    }

    #[must_use]
    pub fn circuit(&self) -> &Circuit {
        self.circuit
    }

    pub fn operations_mut(&mut self) -> &mut Vec<Operation> {
        &mut self.circuit.operations
    }

    /// Asks for a new render pass once the current event has been handled.
    pub fn request_rerender(&mut self) {
        self.rerender = true;
    }

    #[must_use]
    pub fn rerender_requested(&self) -> bool {
        self.rerender
    }
}

/// A capability layered on top of the rendered diagram.
pub trait Extension {
    /// Called after every render pass, once the diagram is complete.
    fn attach(&mut self, rendered: &mut Rendered, api: &mut CoreApi<'_>) -> Result<(), Error>;

    fn handle_event(
        &mut self,
        _event: &Event,
        _rendered: &mut Rendered,
        _api: &mut CoreApi<'_>,
    ) -> Result<(), Error> {
        Ok(())
    }
}

/// Calls back with the circuit after every render pass.
pub struct OnCircuitChange<F> {
    callback: F,
}

impl<F: FnMut(&Circuit)> OnCircuitChange<F> {
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F: FnMut(&Circuit)> Extension for OnCircuitChange<F> {
    fn attach(&mut self, _rendered: &mut Rendered, api: &mut CoreApi<'_>) -> Result<(), Error> {
        (self.callback)(api.circuit());
        Ok(())
    }
}

/// Renders a circuit and keeps the diagram in sync with edits made through it.
///
/// The visualizer works on its own copy of the circuit, so the caller's
/// circuit is never modified.
pub struct Visualizer {
    circuit: Circuit,
    config: Config,
    render_depth: usize,
    extensions: Vec<Box<dyn Extension>>,
    rendered: Option<Rendered>,
}

impl Visualizer {
    #[must_use]
    pub fn new(circuit: &Circuit, config: Config) -> Self {
        Self {
            circuit: circuit.clone(),
            config,
            render_depth: 0,
            extensions: Vec::new(),
            rendered: None,
        }
    }

    #[must_use]
    pub fn with_extension(mut self, extension: impl Extension + 'static) -> Self {
        self.extensions.push(Box::new(extension));
        self
    }

    /// Enables editing by dragging gates between dropzones.
    #[must_use]
    pub fn use_draggable(self) -> Self {
        let draggable = Draggable::new(self.config.dropzone.clone());
        self.with_extension(draggable)
    }

    #[must_use]
    pub fn use_on_circuit_change(self, callback: impl FnMut(&Circuit) + 'static) -> Self {
        self.with_extension(OnCircuitChange::new(callback))
    }

    #[must_use]
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    #[must_use]
    pub fn rendered(&self) -> Option<&Rendered> {
        self.rendered.as_ref()
    }

    #[must_use]
    pub fn svg(&self) -> Option<&Element> {
        self.rendered.as_ref().map(|r| &r.svg)
    }

    #[must_use]
    pub fn render_depth(&self) -> usize {
        self.render_depth
    }

    /// Renders the circuit with operations nested up to `render_depth` levels
    /// deep replaced by their children.
    pub fn draw(&mut self, render_depth: usize) -> Result<&Rendered, Error> {
        self.render_depth = render_depth;
        self.render()
    }

    fn render(&mut self) -> Result<&Rendered, Error> {
        let mut operations = self.circuit.operations.clone();
        expand_single_operation(&mut operations, self.render_depth);

        let mut rendered = compose(
            &self.circuit.qubits,
            &operations,
            self.render_depth,
            &self.config.layout,
        )?;
        let mut api = CoreApi::new(&mut self.circuit);
        for extension in &mut self.extensions {
            extension.attach(&mut rendered, &mut api)?;
        }
        Ok(&*self.rendered.insert(rendered))
    }

    /// Draws the operation at `id` as a group showing its children.
    pub fn expand(&mut self, id: &str) -> bool {
        expand(&mut self.circuit.operations, id)
    }

    /// Draws the operation at `id`, and every group nested in it, as a single gate.
    pub fn collapse(&mut self, id: &str) -> bool {
        collapse(&mut self.circuit.operations, id)
    }

    /// Handles an input event, re-rendering if the circuit or its zoom state
    /// changed. Returns whether a new render pass happened.
    pub fn dispatch(&mut self, event: &Event) -> Result<bool, Error> {
        let Some(rendered) = self.rendered.as_mut() else {
            return Ok(false);
        };

        let mut rerender = false;
        if let Event::Click { target } = event {
            if let Some((id, expanding)) = zoom_request(&rendered.svg, target) {
                rerender |= if expanding {
                    expand(&mut self.circuit.operations, &id)
                } else {
                    collapse(&mut self.circuit.operations, &id)
                };
            }
            toggle_classical_control(&mut rendered.svg, target)?;
        }

        let mut api = CoreApi::new(&mut self.circuit);
        for extension in &mut self.extensions {
            extension.handle_event(event, rendered, &mut api)?;
        }
        rerender |= api.rerender_requested();

        if rerender {
            self.render()?;
        }
        Ok(rerender)
    }
}

fn expand(operations: &mut [Operation], id: &str) -> bool {
    match operation_of_mut(id, operations) {
        Some(op) if op.has_children() => {
            op.set_expanded(true);
            true
        }
        _ => false,
    }
}

fn collapse(operations: &mut [Operation], id: &str) -> bool {
    let Some(op) = operation_of_mut(id, operations) else {
        return false;
    };
    collapse_recursively(op);
    true
}

fn collapse_recursively(op: &mut Operation) {
    op.set_expanded(false);
    for child in op.children.iter_mut().flatten() {
        collapse_recursively(child);
    }
}

/// A lone operation with children is always shown expanded.
fn expand_single_operation(operations: &mut [Operation], render_depth: usize) {
    let selected = select_at_depth(operations, render_depth);
    let [(id, op)] = selected.as_slice() else {
        return;
    };
    if !op.has_children() {
        return;
    }
    let id = id.clone();
    expand(operations, &id);
}

/// The operation to expand or collapse when `target` is a zoom button.
fn zoom_request(svg: &Element, target: &[usize]) -> Option<(String, bool)> {
    let button_path = closest(svg, target, |e| e.has_class("gate-control"))?;
    let button = svg.at(&button_path)?;
    let gate = svg.at(button_path.split_last()?.1)?;
    let id = gate.attribute("data-id")?.to_string();
    Some((id, button.has_class("gate-expand")))
}

/// Value shown by the button of a classically-controlled operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassicalState {
    Unknown,
    One,
    Zero,
}

impl ClassicalState {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim() {
            "?" => Some(Self::Unknown),
            "1" => Some(Self::One),
            "0" => Some(Self::Zero),
            _ => None,
        }
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Unknown => "?",
            Self::One => "1",
            Self::Zero => "0",
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Unknown => Self::One,
            Self::One => Self::Zero,
            Self::Zero => Self::Unknown,
        }
    }

    fn class(self) -> &'static str {
        match self {
            Self::Unknown => "classically-controlled-unknown",
            Self::One => "classically-controlled-one",
            Self::Zero => "classically-controlled-zero",
        }
    }
}

/// Advances the classical button under `target`, if any, and shows the
/// matching branch. Returns the new state.
fn toggle_classical_control(
    svg: &mut Element,
    target: &[usize],
) -> Result<Option<ClassicalState>, Error> {
    let Some(button_path) = closest(svg, target, |e| e.has_class("classically-controlled-btn"))
    else {
        return Ok(None);
    };
    let Some((_, gate_path)) = button_path.split_last() else {
        return Ok(None);
    };

    let Some(label) = svg
        .at_mut(&button_path)
        .and_then(|button| button.elements_mut().find(|e| e.tag == "text"))
    else {
        return Err(Error::TextNotFound);
    };
    let state = ClassicalState::from_symbol(&label.text_content())
        .ok_or(Error::TextNotFound)?
        .next();
    label.set_text(state.symbol());

    if let Some(gate) = svg.at_mut(gate_path) {
        for other in [
            ClassicalState::Unknown,
            ClassicalState::One,
            ClassicalState::Zero,
        ] {
            gate.toggle_class(other.class(), other == state);
        }
        for branch in gate.elements_mut() {
            if branch.has_class("gates-zero") {
                branch.toggle_class("hidden", state == ClassicalState::One);
            } else if branch.has_class("gates-one") {
                branch.toggle_class("hidden", state == ClassicalState::Zero);
            }
        }
    }
    Ok(Some(state))
}
