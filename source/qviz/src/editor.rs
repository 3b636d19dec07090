// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Structural edits on the operation tree.
//!
//! Edits address operations by path identifier and either apply completely
//! or leave the tree untouched. Resolution failures are reported as `None`.


use crate::{
    circuit::{Operation, Register},
    data_id::{array_at, array_at_mut, indexes_of, operation_at, operation_at_mut},
    registers::WireTable,
};

/// Shifts `value` by `offset` on a ring of `total` slots. The result is always
/// in `0..total`; with no slots the value is returned unchanged.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
pub fn circular_shift(value: usize, offset: isize, total: usize) -> usize {
    if total == 0 {
        return value;
    }
    (value as i128 + offset as i128).rem_euclid(total as i128) as usize
}

/// Moves the operation at `source_id` so that it ends up at `target_id`,
/// returning the moved operation. Moving an operation onto itself leaves the
/// tree alone and returns it unchanged.
pub fn apply_move<'a>(
    source_id: &str,
    target_id: &str,
    operations: &'a mut Vec<Operation>,
) -> Option<&'a mut Operation> {
    let placed = relocate(source_id, target_id, operations, false)?;
    operation_at_mut(operations, &placed.path)
}

/// Inserts a deep copy of the operation at `source_id` at `target_id`,
/// returning the copy.
pub fn apply_copy<'a>(
    source_id: &str,
    target_id: &str,
    operations: &'a mut Vec<Operation>,
) -> Option<&'a mut Operation> {
    let placed = relocate(source_id, target_id, operations, true)?;
    operation_at_mut(operations, &placed.path)
}

struct Placement {
    /// Final path of the inserted operation.
    path: Vec<usize>,
    /// Path of the operation whose children lost the moved operation.
    vacated: Option<Vec<usize>>,
}

fn relocate(
    source_id: &str,
    target_id: &str,
    operations: &mut Vec<Operation>,
    keep_source: bool,
) -> Option<Placement> {
    let source = indexes_of(source_id)?;
    let target = indexes_of(target_id)?;
    let (&insert_at, target_parent) = target.split_last()?;
    let operation = operation_at(operations, &source)?.clone();

    if !keep_source {
        if source == target {
            return Some(Placement {
                path: source,
                vacated: None,
            });
        }
        if target.starts_with(&source) {
            log::debug!("cannot move {source_id} into its own subtree at {target_id}");
            return None;
        }
    }

    if insert_at > array_at(operations, target_parent)?.len() {
        return None;
    }
    array_at_mut(operations, target_parent)?.insert(insert_at, operation);

    if keep_source {
        return Some(Placement {
            path: target,
            vacated: None,
        });
    }

    // The insertion may have shifted the source or one of its ancestors.
    let source = shift_after_insert(source, target_parent, insert_at);
    let (&remove_at, source_parent) = source
        .split_last()
        .expect("source path should not be empty");
    array_at_mut(operations, source_parent)
        .expect("source list should survive an insertion")
        .remove(remove_at);

    Some(Placement {
        path: shift_after_remove(target, source_parent, remove_at),
        vacated: Some(source_parent.to_vec()),
    })
}

fn shift_after_insert(mut path: Vec<usize>, list: &[usize], index: usize) -> Vec<usize> {
    let depth = list.len();
    if path.len() > depth && path.starts_with(list) && path[depth] >= index {
        path[depth] += 1;
    }
    path
}

fn shift_after_remove(mut path: Vec<usize>, list: &[usize], index: usize) -> Vec<usize> {
    let depth = list.len();
    if path.len() > depth && path.starts_with(list) && path[depth] > index {
        path[depth] -= 1;
    }
    path
}

/// Moves an operation and all of its descendants from `source_wire` to
/// `target_wire`, wrapping around `total_wires`. Measurements are pinned to
/// the classical register they report into and are left unchanged.
pub fn retarget_vertical(
    source_wire: usize,
    target_wire: usize,
    operation: &mut Operation,
    total_wires: usize,
) {
    if operation.is_measurement {
        return;
    }
    #[allow(clippy::cast_possible_wrap)]
    let offset = target_wire as isize - source_wire as isize;
    offset_recursively(operation, offset, total_wires);
}

fn offset_recursively(operation: &mut Operation, offset: isize, total_wires: usize) {
    for target in &mut operation.targets {
        target.q_id = circular_shift(target.q_id, offset, total_wires);
        if let Some(c_id) = target.c_id {
            target.c_id = Some(circular_shift(c_id, offset, total_wires));
        }
    }
    for control in &mut operation.controls {
        control.q_id = circular_shift(control.q_id, offset, total_wires);
    }
    for child in operation.children.iter_mut().flatten() {
        offset_recursively(child, offset, total_wires);
    }
}

/// Moves an operation and its descendants from one qubit row to another.
///
/// Registers are shifted by row and mapped back to the qubit drawn on that
/// row, so qubit ids need not be consecutive. Returns `None` and leaves the
/// operation untouched when a register names a qubit `wires` does not know.
pub fn retarget_rows(
    source_row: usize,
    target_row: usize,
    operation: &mut Operation,
    wires: &WireTable,
) -> Option<()> {
    let mut shifted = operation.clone();
    map_qubits(&mut shifted, &|q_id| wires.row_of_qubit(q_id))?;
    retarget_vertical(source_row, target_row, &mut shifted, wires.qubit_count());
    map_qubits(&mut shifted, &|row| wires.qubit_at_row(row))?;
    *operation = shifted;
    Some(())
}

fn map_qubits(operation: &mut Operation, map: &impl Fn(usize) -> Option<usize>) -> Option<()> {
    for register in operation.targets.iter_mut().chain(&mut operation.controls) {
        register.q_id = map(register.q_id)?;
    }
    for child in operation.children.iter_mut().flatten() {
        map_qubits(child, map)?;
    }
    Some(())
}

fn registers_resolve(operation: &Operation, wires: &WireTable) -> bool {
    operation
        .targets
        .iter()
        .chain(&operation.controls)
        .all(|register| wires.wire_of(register).is_ok())
        && operation
            .children
            .iter()
            .flatten()
            .all(|child| registers_resolve(child, wires))
}

/// The qubits touched by the leaves under `operation`, in order of first
/// occurrence, as qubit registers. A childless operation has none.
#[must_use]
pub fn recompute_group_targets(operation: &Operation) -> Vec<Register> {
    let mut q_ids = Vec::new();
    collect_leaf_qubits(operation.children(), &mut q_ids);
    q_ids.into_iter().map(Register::qubit).collect()
}

fn collect_leaf_qubits(operations: &[Operation], q_ids: &mut Vec<usize>) {
    for op in operations {
        if op.has_children() {
            collect_leaf_qubits(op.children(), q_ids);
            continue;
        }
        for register in op.targets.iter().chain(&op.controls) {
            if !q_ids.contains(&register.q_id) {
                q_ids.push(register.q_id);
            }
        }
    }
}

/// Refreshes the targets of every group on the way from the root to `path`,
/// innermost first.
fn refresh_group_targets(operations: &mut [Operation], path: &[usize]) {
    for depth in (1..path.len()).rev() {
        if let Some(group) = operation_at_mut(operations, &path[..depth])
            && !group.is_conditional
        {
            group.targets = recompute_group_targets(group);
        }
    }
}

/// Removes the operation at `index`, if there is one.
pub fn delete_at(operations: &mut Vec<Operation>, index: usize) -> Option<Operation> {
    (index < operations.len()).then(|| operations.remove(index))
}

/// Inserts `operation` in front of `index`, or at the end when `index` is past it.
pub fn insert_before(operations: &mut Vec<Operation>, index: usize, operation: Operation) {
    let index = index.min(operations.len());
    operations.insert(index, operation);
}

/// Inserts `operation` right after `index`, or at the end when `index` is past it.
pub fn insert_after(operations: &mut Vec<Operation>, index: usize, operation: Operation) {
    insert_before(operations, index.saturating_add(1), operation);
}

/// A completed drag-and-drop gesture over the rendered diagram.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropGesture {
    pub source_id: String,
    /// Qubit row the operation was grabbed on.
    pub source_row: usize,
    /// Identifier of the insertion point.
    pub target_id: String,
    /// Qubit row the operation was dropped on.
    pub target_row: usize,
    /// Duplicate instead of moving.
    pub copy: bool,
}

/// Applies a drop gesture to the tree and reports whether the tree changed.
///
/// The gesture relocates the operation, shifts it to the drop row, and refreshes
/// the targets of the groups that gained or lost it. A gesture that fails to
/// resolve, or whose result names a register missing from `wires`, leaves the
/// tree untouched.
pub fn apply_drop(
    operations: &mut Vec<Operation>,
    gesture: &DropGesture,
    wires: &WireTable,
) -> bool {
    let snapshot = operations.clone();

    let Some(placed) = relocate(
        &gesture.source_id,
        &gesture.target_id,
        operations,
        gesture.copy,
    ) else {
        log::debug!(
            "dropping {} at {} did not resolve",
            gesture.source_id,
            gesture.target_id
        );
        return false;
    };

    let retargeted = operation_at_mut(operations, &placed.path).is_some_and(|operation| {
        retarget_rows(gesture.source_row, gesture.target_row, operation, wires).is_some()
            && registers_resolve(operation, wires)
    });
    if !retargeted {
        log::debug!(
            "{} does not fit on row {}, drop discarded",
            gesture.source_id,
            gesture.target_row
        );
        *operations = snapshot;
        return false;
    }
    refresh_group_targets(operations, &placed.path);
    if let Some(vacated) = &placed.vacated {
        let mut path = vacated.clone();
        // Any index works here, only the ancestors of the list are refreshed.
        path.push(0);
        refresh_group_targets(operations, &path);
    }

    let changed = *operations != snapshot;
    log::debug!(
        "{} {} to {} (row {} -> {}), changed: {changed}",
        if gesture.copy { "copied" } else { "moved" },
        gesture.source_id,
        gesture.target_id,
        gesture.source_row,
        gesture.target_row,
    );
    changed
}
