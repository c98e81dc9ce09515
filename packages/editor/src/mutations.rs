//! # Tree Mutations
//!
//! Semantic operations on the root sequence. Every mutation is pure: it reads
//! the current tree and returns a brand-new one, leaving the input untouched.
//! Committing the result to history is the caller's job.
//!
//! ## Failure semantics
//!
//! [`Mutation::try_apply`] reports why a mutation could not be applied.
//! [`Mutation::apply`] is what the editor uses: a failed lookup is a no-op that
//! hands back an unchanged copy of the tree.
//!
//! ## Slots
//!
//! - **Container**: a slot index addresses a position in `children`. An empty
//!   position receives the node; an occupied one gets the node inserted right
//!   after it. Indices are not checked against `props.columns`.
//! - **Grid**: the slot index encodes `row * 1000 + col` and writes (or
//!   replaces) `gridData["row-col"]`. The grid's `children` are untouched.

use crate::factory::refresh_ids;
use crate::ids::IdSource;
use crate::node::{GridCell, Node};
use crate::store::{self, collect_ids, enclosing_list_mut, locate, node_at, node_at_mut, take_at};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Structural edits to the component tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// Append a node to the end of the root sequence
    AddRoot { node: Node },

    /// Insert a node into the root sequence before index `index`
    InsertAt { index: usize, node: Node },

    /// Insert a node right after `target_id` in whatever list holds it
    AddAfter { target_id: String, node: Node },

    /// Place a node into a container column or grid cell
    AddIntoSlot {
        container_id: String,
        node: Node,
        slot: Option<u32>,
    },

    /// Replace a node (and its subtree) wholesale
    UpdateNode { node_id: String, node: Node },

    /// Remove a node and all descendants
    DeleteNode { node_id: String },

    /// Clone a subtree with fresh ids and insert it after the original
    DuplicateNode { node_id: String },

    /// Swap a root node with its previous sibling
    MoveUp { node_id: String },

    /// Swap a root node with its next sibling
    MoveDown { node_id: String },

    AddColumn { container_id: String },

    RemoveColumn { container_id: String },

    /// Move a root node from one index to another
    Reorder { from: usize, to: usize },

    /// Detach an existing node and place it into a container/grid slot
    MoveIntoSlot {
        node_id: String,
        container_id: String,
        slot: Option<u32>,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    #[error("Node {0} cannot hold children")]
    NotAContainer(String),

    #[error("Node {0} is not in the root sequence")]
    NotRootLevel(String),

    #[error("Node {0} is not part of an ordered list")]
    NoEnclosingList(String),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Duplicate node id: {0}")]
    DuplicateId(String),

    #[error("Replacement id {found} does not match target {expected}")]
    IdMismatch { expected: String, found: String },

    #[error("Node type is immutable ({from} -> {to})")]
    KindChanged { from: String, to: String },

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

impl Mutation {
    /// Apply to `tree`, treating any failure as a no-op
    pub fn apply(&self, tree: &[Node], ids: &mut dyn IdSource) -> Vec<Node> {
        match self.try_apply(tree, ids) {
            Ok(next) => next,
            Err(error) => {
                tracing::debug!(mutation = self.name(), %error, "mutation skipped");
                tree.to_vec()
            }
        }
    }

    /// Apply to `tree`, reporting why the mutation could not be applied
    pub fn try_apply(
        &self,
        tree: &[Node],
        ids: &mut dyn IdSource,
    ) -> Result<Vec<Node>, MutationError> {
        let mut next = tree.to_vec();

        match self {
            Mutation::AddRoot { node } => {
                check_insertable(tree, node)?;
                next.push(node.clone());
            }

            Mutation::InsertAt { index, node } => {
                check_insertable(tree, node)?;
                let index = (*index).min(next.len());
                next.insert(index, node.clone());
            }

            Mutation::AddAfter { target_id, node } => {
                check_insertable(tree, node)?;
                let path = locate(&next, target_id)
                    .ok_or_else(|| MutationError::NodeNotFound(target_id.clone()))?;
                let (list, index) = enclosing_list_mut(&mut next, &path)
                    .ok_or_else(|| MutationError::NoEnclosingList(target_id.clone()))?;
                list.insert(index + 1, node.clone());
            }

            Mutation::AddIntoSlot {
                container_id,
                node,
                slot,
            } => {
                check_insertable(tree, node)?;
                place_into_slot(&mut next, container_id, node.clone(), *slot)?;
            }

            Mutation::UpdateNode { node_id, node } => {
                Self::apply_update(&mut next, node_id, node)?;
            }

            Mutation::DeleteNode { node_id } => {
                let path = locate(&next, node_id)
                    .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;
                take_at(&mut next, &path);
            }

            Mutation::DuplicateNode { node_id } => {
                Self::apply_duplicate(&mut next, node_id, ids)?;
            }

            Mutation::MoveUp { node_id } => {
                let index = store::root_index(&next, node_id)
                    .ok_or_else(|| root_lookup_error(&next, node_id))?;
                if index > 0 {
                    next.swap(index, index - 1);
                }
            }

            Mutation::MoveDown { node_id } => {
                let index = store::root_index(&next, node_id)
                    .ok_or_else(|| root_lookup_error(&next, node_id))?;
                if index + 1 < next.len() {
                    next.swap(index, index + 1);
                }
            }

            Mutation::AddColumn { container_id } => {
                let container = container_mut(&mut next, container_id)?;
                let columns = container.columns() + 1;
                container.props.insert("columns".to_string(), Value::from(columns));
            }

            Mutation::RemoveColumn { container_id } => {
                let container = container_mut(&mut next, container_id)?;
                let columns = container.columns().saturating_sub(1).max(1);
                container.props.insert("columns".to_string(), Value::from(columns));
            }

            Mutation::Reorder { from, to } => {
                let len = next.len();
                if from == to {
                    return Ok(next);
                }
                for index in [*from, *to] {
                    if index >= len {
                        return Err(MutationError::IndexOutOfBounds { index, len });
                    }
                }
                let node = next.remove(*from);
                next.insert(*to, node);
            }

            Mutation::MoveIntoSlot {
                node_id,
                container_id,
                slot,
            } => {
                let node_path = locate(&next, node_id)
                    .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;
                let container_path = locate(&next, container_id)
                    .ok_or_else(|| MutationError::ContainerNotFound(container_id.clone()))?;
                if container_path.starts_with(&node_path) {
                    return Err(MutationError::CycleDetected);
                }

                let node = take_at(&mut next, &node_path)
                    .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;
                place_into_slot(&mut next, container_id, node, *slot)?;
            }
        }

        Ok(next)
    }

    fn apply_update(next: &mut [Node], node_id: &str, node: &Node) -> Result<(), MutationError> {
        if node.id != node_id {
            return Err(MutationError::IdMismatch {
                expected: node_id.to_string(),
                found: node.id.clone(),
            });
        }

        let path =
            locate(next, node_id).ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;
        let current = node_at(next, &path)
            .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;

        if current.kind != node.kind {
            return Err(MutationError::KindChanged {
                from: current.kind.to_string(),
                to: node.kind.to_string(),
            });
        }
        check_structure(node)?;

        // Ids of the replaced subtree may be reused; anything else may not
        let replaced: HashSet<String> = collect_ids(std::slice::from_ref(current))
            .into_iter()
            .collect();
        let elsewhere: HashSet<String> = collect_ids(next)
            .into_iter()
            .filter(|id| !replaced.contains(id))
            .collect();
        check_fresh_ids(node, &elsewhere)?;

        store::replace_at(next, &path, node.clone());
        Ok(())
    }

    fn apply_duplicate(
        next: &mut Vec<Node>,
        node_id: &str,
        ids: &mut dyn IdSource,
    ) -> Result<(), MutationError> {
        let path =
            locate(next, node_id).ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;
        let original = node_at(next, &path)
            .cloned()
            .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;

        let clone = refresh_ids(&original, ids);
        let existing: HashSet<String> = collect_ids(next).into_iter().collect();
        check_fresh_ids(&clone, &existing)?;

        let (list, index) = enclosing_list_mut(next, &path)
            .ok_or_else(|| MutationError::NoEnclosingList(node_id.to_string()))?;
        list.insert(index + 1, clone);
        Ok(())
    }

    /// Debug name of the mutation kind
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddRoot { .. } => "add_root",
            Mutation::InsertAt { .. } => "insert_at",
            Mutation::AddAfter { .. } => "add_after",
            Mutation::AddIntoSlot { .. } => "add_into_slot",
            Mutation::UpdateNode { .. } => "update_node",
            Mutation::DeleteNode { .. } => "delete_node",
            Mutation::DuplicateNode { .. } => "duplicate_node",
            Mutation::MoveUp { .. } => "move_up",
            Mutation::MoveDown { .. } => "move_down",
            Mutation::AddColumn { .. } => "add_column",
            Mutation::RemoveColumn { .. } => "remove_column",
            Mutation::Reorder { .. } => "reorder",
            Mutation::MoveIntoSlot { .. } => "move_into_slot",
        }
    }

    /// Human readable label for history entries
    pub fn describe(&self) -> String {
        match self {
            Mutation::AddRoot { node }
            | Mutation::InsertAt { node, .. }
            | Mutation::AddAfter { node, .. }
            | Mutation::AddIntoSlot { node, .. } => format!("Add {}", node.kind),
            Mutation::UpdateNode { node, .. } => format!("Edit {}", node.kind),
            Mutation::DeleteNode { .. } => "Delete".to_string(),
            Mutation::DuplicateNode { .. } => "Duplicate".to_string(),
            Mutation::MoveUp { .. } => "Move up".to_string(),
            Mutation::MoveDown { .. } => "Move down".to_string(),
            Mutation::AddColumn { .. } => "Add column".to_string(),
            Mutation::RemoveColumn { .. } => "Remove column".to_string(),
            Mutation::Reorder { .. } => "Reorder".to_string(),
            Mutation::MoveIntoSlot { .. } => "Move into container".to_string(),
        }
    }
}

/// Put `node` into the slot of `container_id` (see module docs for slot rules)
fn place_into_slot(
    tree: &mut Vec<Node>,
    container_id: &str,
    node: Node,
    slot: Option<u32>,
) -> Result<(), MutationError> {
    let path = locate(tree, container_id)
        .ok_or_else(|| MutationError::ContainerNotFound(container_id.to_string()))?;
    let container = node_at_mut(tree, &path)
        .ok_or_else(|| MutationError::ContainerNotFound(container_id.to_string()))?;

    if !container.is_container() {
        return Err(MutationError::NotAContainer(container_id.to_string()));
    }

    match slot {
        Some(slot) if container.kind.is_grid() => {
            let cell = GridCell::from_slot(slot);
            container
                .grid_data
                .get_or_insert_with(BTreeMap::new)
                .insert(cell.key(), node);
        }
        Some(slot) => {
            let children = container.children.get_or_insert_with(Vec::new);
            let slot = slot as usize;
            if slot < children.len() {
                children.insert(slot + 1, node);
            } else {
                children.push(node);
            }
        }
        None => {
            container.children.get_or_insert_with(Vec::new).push(node);
        }
    }

    Ok(())
}

fn container_mut<'a>(tree: &'a mut [Node], container_id: &str) -> Result<&'a mut Node, MutationError> {
    let path = locate(tree, container_id)
        .ok_or_else(|| MutationError::ContainerNotFound(container_id.to_string()))?;
    let container = node_at_mut(tree, &path)
        .ok_or_else(|| MutationError::ContainerNotFound(container_id.to_string()))?;
    if !container.is_container() {
        return Err(MutationError::NotAContainer(container_id.to_string()));
    }
    Ok(container)
}

fn root_lookup_error(tree: &[Node], node_id: &str) -> MutationError {
    if store::contains(tree, node_id) {
        MutationError::NotRootLevel(node_id.to_string())
    } else {
        MutationError::NodeNotFound(node_id.to_string())
    }
}

/// A new subtree may enter the tree only if none of its ids are taken
fn check_insertable(tree: &[Node], node: &Node) -> Result<(), MutationError> {
    check_structure(node)?;
    let existing: HashSet<String> = collect_ids(tree).into_iter().collect();
    check_fresh_ids(node, &existing)
}

fn check_fresh_ids(node: &Node, taken: &HashSet<String>) -> Result<(), MutationError> {
    let mut seen = HashSet::new();
    for id in collect_ids(std::slice::from_ref(node)) {
        if taken.contains(&id) || !seen.insert(id.clone()) {
            return Err(MutationError::DuplicateId(id));
        }
    }
    Ok(())
}

/// Leaf kinds never carry children, anywhere in the subtree
pub(crate) fn check_structure(node: &Node) -> Result<(), MutationError> {
    if !node.kind.accepts_children() && !node.children().is_empty() {
        return Err(MutationError::InvalidStructure(format!(
            "{} nodes cannot hold children",
            node.kind
        )));
    }
    for child in node.children() {
        check_structure(child)?;
    }
    if let Some(cells) = &node.grid_data {
        for cell in cells.values() {
            check_structure(cell)?;
        }
    }
    Ok(())
}
