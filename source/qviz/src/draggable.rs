// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.


use crate::{
    Error,
    bridge::{HostElement, list_host_elements, read_wire_table},
    composer::Rendered,
    config::DropzoneConfig,
    dropzone::{Dropzone, dropzone_layer, read_dropzone, synthesize},
    editor::{DropGesture, apply_drop},
    registers::WireTable,
    visualizer::{CoreApi, Event, Extension},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragMode {
    #[default]
    Idle,
    Moving,
    Copying,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Selection {
    /// Operation being dragged. Expanded groups cannot be dragged as a whole.
    id: Option<String>,
    wire: Option<usize>,
}

/// Moves or copies operations by dragging a gate onto a dropzone.
/// Holding ctrl while releasing copies instead of moving.
#[derive(Debug, Default)]
pub struct Draggable {
    config: DropzoneConfig,
    hosts: Vec<HostElement>,
    dropzones: Vec<Dropzone>,
    layer_path: Option<Vec<usize>>,
    wires: WireTable,
    selection: Option<Selection>,
    mode: DragMode,
}

impl Draggable {
    #[must_use]
    pub fn new(config: DropzoneConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn dropzones(&self) -> &[Dropzone] {
        &self.dropzones
    }

    #[must_use]
    pub fn hosts(&self) -> &[HostElement] {
        &self.hosts
    }

    #[must_use]
    pub fn mode(&self) -> DragMode {
        self.mode
    }

    fn set_layer_visible(&self, rendered: &mut Rendered, visible: bool) {
        if let Some(layer) = self
            .layer_path
            .as_ref()
            .and_then(|path| rendered.svg.at_mut(path))
        {
            layer.toggle_class("hidden", !visible);
        }
    }

    fn start_drag(&mut self, target: &[usize], rendered: &mut Rendered) {
        // The innermost host under the pointer.
        let Some(host) = self
            .hosts
            .iter()
            .filter(|h| target.starts_with(&h.path))
            .max_by_key(|h| h.path.len())
        else {
            return;
        };
        let expanded = host
            .gate_path
            .as_ref()
            .and_then(|path| rendered.svg.at(path))
            .is_some_and(|gate| gate.attribute("data-expanded") == Some("true"));
        let id = if expanded { None } else { host.data_id.clone() };

        if id.is_some() {
            self.mode = DragMode::Moving;
            self.set_layer_visible(rendered, true);
        }
        self.selection = Some(Selection {
            id,
            wire: host.wire,
        });
    }

    fn drop_on(
        &mut self,
        target: &[usize],
        copy: bool,
        rendered: &mut Rendered,
        api: &mut CoreApi<'_>,
    ) -> Result<(), Error> {
        let selection = self.selection.take();
        self.mode = DragMode::Idle;
        self.set_layer_visible(rendered, false);

        let Some(layer) = &self.layer_path else {
            return Ok(());
        };
        if target.len() != layer.len() + 1 || !target.starts_with(layer) {
            return Ok(());
        }
        let Some(zone) = rendered.svg.at(target) else {
            return Ok(());
        };
        let (target_id, target_wire) = read_dropzone(zone)?;

        let Some(Selection {
            id: Some(source_id),
            wire: Some(source_wire),
        }) = selection
        else {
            return Ok(());
        };
        let (Some(source_row), Some(target_row)) =
            (self.wires.row_of(source_wire), self.wires.row_of(target_wire))
        else {
            return Ok(());
        };

        let gesture = DropGesture {
            source_id,
            source_row,
            target_id,
            target_row,
            copy,
        };
        if apply_drop(api.operations_mut(), &gesture, &self.wires) {
            api.request_rerender();
        }
        Ok(())
    }
}

impl Extension for Draggable {
    fn attach(&mut self, rendered: &mut Rendered, api: &mut CoreApi<'_>) -> Result<(), Error> {
        let wire_ys = read_wire_table(&rendered.svg)?;
        if wire_ys != rendered.wires.ys() {
            log::warn!("wires read from the diagram do not match the allocated wires");
        }

        let hosts = list_host_elements(&rendered.svg, &wire_ys);
        for host in &hosts {
            if let Some(wire) = host.wire
                && let Some(element) = rendered.svg.at_mut(&host.path)
            {
                element.set_attribute("data-wire", wire);
            }
        }

        let dropzones = synthesize(
            &hosts,
            &wire_ys,
            rendered.layout.width,
            api.circuit().operations.len(),
            &self.config,
        );
        rendered.svg.push(dropzone_layer(&dropzones).class("hidden"));
        self.layer_path = Some(vec![rendered.svg.element_count() - 1]);

        self.wires = rendered.wires.clone();
        self.hosts = hosts;
        self.dropzones = dropzones;
        self.selection = None;
        self.mode = DragMode::Idle;
        Ok(())
    }

    fn handle_event(
        &mut self,
        event: &Event,
        rendered: &mut Rendered,
        api: &mut CoreApi<'_>,
    ) -> Result<(), Error> {
        match event {
            Event::MouseDown { target } => self.start_drag(target, rendered),
            Event::MouseUp { target, ctrl_key } => {
                self.drop_on(target, *ctrl_key, rendered, api)?;
            }
            Event::KeyDown { ctrl_key: true } if self.mode == DragMode::Moving => {
                self.mode = DragMode::Copying;
            }
            Event::KeyUp { .. } if self.mode == DragMode::Copying => {
                self.mode = DragMode::Moving;
            }
            _ => {}
        }
        Ok(())
    }
}
