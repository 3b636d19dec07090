// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Path identifiers for operations in the operation tree.
//!
//! An identifier such as `2-0-1` lists the child index taken at every level,
//! starting from the root operation list. Identifiers encode positions, not
//! object identity, so they are invalidated by any structural edit and must be
//! recomputed on every render.
//!
//! Every resolver returns `None` when a segment is malformed or an index is out
//! of range.

#[cfg(test)]
mod tests;

use crate::circuit::Operation;

pub const SEPARATOR: char = '-';

/// Splits an identifier into child indices. The empty identifier is the root.
#[must_use]
pub fn indexes_of(id: &str) -> Option<Vec<usize>> {
    if id.is_empty() {
        return Some(Vec::new());
    }
    id.split(SEPARATOR)
        .map(|s| {
            if s.bytes().all(|b| b.is_ascii_digit()) {
                s.parse().ok()
            } else {
                None
            }
        })
        .collect()
}

/// The index of the operation within its parent list.
#[must_use]
pub fn last_index_of(id: &str) -> Option<usize> {
    indexes_of(id)?.last().copied()
}

/// Builds the identifier for a list of child indices.
#[must_use]
pub fn join(indexes: &[usize]) -> String {
    indexes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(&SEPARATOR.to_string())
}

/// Identifier of the `index`th child of the operation at `parent`.
#[must_use]
pub fn child_id(parent: &str, index: usize) -> String {
    if parent.is_empty() {
        index.to_string()
    } else {
        format!("{parent}{SEPARATOR}{index}")
    }
}

/// The list that holds the operation at `id`.
#[must_use]
pub fn parent_array_of<'a>(id: &str, root: &'a [Operation]) -> Option<&'a [Operation]> {
    let indexes = indexes_of(id)?;
    let (_, parent) = indexes.split_last()?;
    array_at(root, parent)
}

/// The operation whose children hold the operation at `id`. Root-level
/// operations have no parent operation.
#[must_use]
pub fn parent_operation_of<'a>(id: &str, root: &'a [Operation]) -> Option<&'a Operation> {
    let indexes = indexes_of(id)?;
    let (_, parent) = indexes.split_last()?;
    if parent.is_empty() {
        return None;
    }
    operation_at(root, parent)
}

#[must_use]
pub fn operation_of<'a>(id: &str, root: &'a [Operation]) -> Option<&'a Operation> {
    operation_at(root, &indexes_of(id)?)
}

pub fn operation_of_mut<'a>(id: &str, root: &'a mut [Operation]) -> Option<&'a mut Operation> {
    operation_at_mut(root, &indexes_of(id)?)
}

/// Descends through the children lists named by `path`.
pub(crate) fn array_at<'a>(root: &'a [Operation], path: &[usize]) -> Option<&'a [Operation]> {
    path.iter().try_fold(root, |ops, &i| ops.get(i)?.children.as_deref())
}

pub(crate) fn array_at_mut<'a>(
    root: &'a mut Vec<Operation>,
    path: &[usize],
) -> Option<&'a mut Vec<Operation>> {
    path.iter()
        .try_fold(root, |ops, &i| ops.get_mut(i)?.children.as_mut())
}

pub(crate) fn operation_at<'a>(root: &'a [Operation], path: &[usize]) -> Option<&'a Operation> {
    let (&last, parent) = path.split_last()?;
    array_at(root, parent)?.get(last)
}

pub(crate) fn operation_at_mut<'a>(
    root: &'a mut [Operation],
    path: &[usize],
) -> Option<&'a mut Operation> {
    let (&first, rest) = path.split_first()?;
    rest.iter().try_fold(root.get_mut(first)?, |op, &i| {
        op.children.as_mut()?.get_mut(i)
    })
}
