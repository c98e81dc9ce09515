//! # Drop Resolution
//!
//! Decides what a finished drag gesture does to the tree. The drag-and-drop
//! layer hands over abstract descriptors; hit-testing and collision
//! detection happen before this point, so everything here is a plain
//! function of the tree and the two descriptors.
//!
//! ## Addressing
//!
//! - Gap markers: zero-based index into the root sequence; `i` inserts before
//!   element `i`, `len` appends
//! - Existing nodes: the node id, meaning "insert after"
//! - Container columns: `(container_id, column_index)`
//! - Grid cells: `(grid_id, row * 1000 + col)`

use crate::factory::create_node;
use crate::ids::IdSource;
use crate::mutations::Mutation;
use crate::node::{GridCell, Node, NodeKind};
use crate::store::{self, find_by_id, locate};
use serde::{Deserialize, Serialize};

/// What is being dragged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DragSource {
    /// A new node of the given kind, dragged from the palette
    Palette { kind: NodeKind },
    /// A node already in the tree
    Existing { node_id: String },
}

/// Where it was released
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum DropTarget {
    Gap { index: usize },
    Node { node_id: String },
    Slot { container_id: String, slot_index: u32 },
    Nothing,
}

/// The resolved insertion point and kind of placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropResolution {
    /// New node inserted into the root sequence at `index`
    InsertAtIndex { kind: NodeKind, index: usize },
    /// New node inserted right after an existing node
    InsertAfter { kind: NodeKind, target_id: String },
    /// New node placed into a container column
    InsertIntoSlot {
        kind: NodeKind,
        container_id: String,
        slot_index: u32,
    },
    /// New node written into a grid cell, replacing any occupant
    ReplaceSlot {
        kind: NodeKind,
        grid_id: String,
        cell: GridCell,
    },
    /// New node appended to the root sequence
    AppendRoot { kind: NodeKind },
    /// Existing root node moved within the root sequence
    Reorder { from: usize, to: usize },
    /// Existing node moved into a container column or grid cell
    MoveIntoSlot {
        node_id: String,
        container_id: String,
        slot_index: u32,
    },
    Noop,
}

impl DropResolution {
    pub fn is_noop(&self) -> bool {
        matches!(self, DropResolution::Noop)
    }

    /// Turn the resolution into a mutation, instantiating palette items
    pub fn into_mutation(self, ids: &mut dyn IdSource) -> Option<Mutation> {
        let mutation = match self {
            DropResolution::InsertAtIndex { kind, index } => Mutation::InsertAt {
                index,
                node: create_node(kind, ids),
            },
            DropResolution::InsertAfter { kind, target_id } => Mutation::AddAfter {
                target_id,
                node: create_node(kind, ids),
            },
            DropResolution::InsertIntoSlot {
                kind,
                container_id,
                slot_index,
            } => Mutation::AddIntoSlot {
                container_id,
                node: create_node(kind, ids),
                slot: Some(slot_index),
            },
            DropResolution::ReplaceSlot {
                kind,
                grid_id,
                cell,
            } => Mutation::AddIntoSlot {
                container_id: grid_id,
                node: create_node(kind, ids),
                slot: Some(cell.to_slot()),
            },
            DropResolution::AppendRoot { kind } => Mutation::AddRoot {
                node: create_node(kind, ids),
            },
            DropResolution::Reorder { from, to } => Mutation::Reorder { from, to },
            DropResolution::MoveIntoSlot {
                node_id,
                container_id,
                slot_index,
            } => Mutation::MoveIntoSlot {
                node_id,
                container_id,
                slot: Some(slot_index),
            },
            DropResolution::Noop => return None,
        };
        Some(mutation)
    }
}

/// Resolve a drag gesture against the current tree
pub fn resolve(tree: &[Node], source: &DragSource, target: &DropTarget) -> DropResolution {
    match source {
        DragSource::Palette { kind } => resolve_new(tree, kind.clone(), target),
        DragSource::Existing { node_id } => resolve_existing(tree, node_id, target),
    }
}

fn resolve_new(tree: &[Node], kind: NodeKind, target: &DropTarget) -> DropResolution {
    match target {
        DropTarget::Gap { index } => DropResolution::InsertAtIndex {
            kind,
            index: (*index).min(tree.len()),
        },
        DropTarget::Node { node_id } if store::contains(tree, node_id) => {
            DropResolution::InsertAfter {
                kind,
                target_id: node_id.clone(),
            }
        }
        DropTarget::Slot {
            container_id,
            slot_index,
        } => match find_by_id(tree, container_id) {
            Some(grid) if grid.kind.is_grid() => DropResolution::ReplaceSlot {
                kind,
                grid_id: container_id.clone(),
                cell: GridCell::from_slot(*slot_index),
            },
            Some(container) if container.is_container() => DropResolution::InsertIntoSlot {
                kind,
                container_id: container_id.clone(),
                slot_index: *slot_index,
            },
            _ => DropResolution::AppendRoot { kind },
        },
        DropTarget::Node { .. } | DropTarget::Nothing => DropResolution::AppendRoot { kind },
    }
}

fn resolve_existing(tree: &[Node], node_id: &str, target: &DropTarget) -> DropResolution {
    match target {
        DropTarget::Node { node_id: target_id } => {
            if target_id == node_id {
                return DropResolution::Noop;
            }
            match (
                store::root_index(tree, node_id),
                store::root_index(tree, target_id),
            ) {
                (Some(from), Some(to)) => DropResolution::Reorder { from, to },
                _ => DropResolution::Noop,
            }
        }

        DropTarget::Gap { index } => {
            let Some(from) = store::root_index(tree, node_id) else {
                return DropResolution::Noop;
            };
            // Removing the source shifts every later gap down by one
            let to = if *index > from { *index - 1 } else { *index };
            let to = to.min(tree.len().saturating_sub(1));
            if to == from {
                DropResolution::Noop
            } else {
                DropResolution::Reorder { from, to }
            }
        }

        DropTarget::Slot {
            container_id,
            slot_index,
        } => {
            let (Some(node_path), Some(container_path)) =
                (locate(tree, node_id), locate(tree, container_id))
            else {
                return DropResolution::Noop;
            };
            if container_path.starts_with(&node_path) {
                return DropResolution::Noop;
            }
            match find_by_id(tree, container_id) {
                Some(container) if container.is_container() => DropResolution::MoveIntoSlot {
                    node_id: node_id.to_string(),
                    container_id: container_id.clone(),
                    slot_index: *slot_index,
                },
                _ => DropResolution::Noop,
            }
        }

        DropTarget::Nothing => DropResolution::Noop,
    }
}
