//! # Node Store
//!
//! Structural queries over the root sequence.
//!
//! Every lookup goes through one recursive locator that returns a
//! [`NodePath`]: a sequence of steps starting at the root sequence and
//! descending through `children` indices or grid cell keys. Higher level
//! operations splice at a path instead of re-implementing the search for
//! root nodes, container children and grid cells separately.
//!
//! The pure helpers (`replace_by_id`, `remove_by_id`) never fail: an id that
//! is not in the tree yields an unchanged copy.

use crate::node::Node;
use crate::visitor::{IdCollector, Visitor};
use std::collections::HashSet;
use std::fmt;

/// One step of a [`NodePath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Index into the root sequence (first step) or a node's `children`
    Child(usize),
    /// Key into a grid node's `gridData`
    GridCell(String),
}

/// Address of a node inside the root sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath(Vec<PathStep>);

impl NodePath {
    pub fn new(steps: Vec<PathStep>) -> Self {
        Self(steps)
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    pub fn last(&self) -> Option<&PathStep> {
        self.0.last()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// True for nodes sitting directly in the root sequence
    pub fn is_root_level(&self) -> bool {
        self.0.len() == 1
    }

    /// Path of the enclosing node; `None` for root-level nodes
    pub fn parent(&self) -> Option<NodePath> {
        match self.0.split_last() {
            Some((_, parent)) if !parent.is_empty() => Some(NodePath(parent.to_vec())),
            _ => None,
        }
    }

    /// Whether `self` addresses `other` or one of its descendants
    pub fn starts_with(&self, other: &NodePath) -> bool {
        self.0.starts_with(&other.0)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.0 {
            match step {
                PathStep::Child(i) => write!(f, "/{i}")?,
                PathStep::GridCell(key) => write!(f, "/[{key}]")?,
            }
        }
        Ok(())
    }
}

/// The owner of a node's position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentRef {
    Root,
    Node(String),
}

/// Find the path of `id`, depth-first in document order
pub fn locate(tree: &[Node], id: &str) -> Option<NodePath> {
    let mut steps = Vec::new();
    for (index, node) in tree.iter().enumerate() {
        steps.push(PathStep::Child(index));
        if locate_in(node, id, &mut steps) {
            return Some(NodePath(steps));
        }
        steps.pop();
    }
    None
}

fn locate_in(node: &Node, id: &str, steps: &mut Vec<PathStep>) -> bool {
    if node.id == id {
        return true;
    }

    for (index, child) in node.children().iter().enumerate() {
        steps.push(PathStep::Child(index));
        if locate_in(child, id, steps) {
            return true;
        }
        steps.pop();
    }

    if let Some(cells) = &node.grid_data {
        for (key, cell) in cells {
            steps.push(PathStep::GridCell(key.clone()));
            if locate_in(cell, id, steps) {
                return true;
            }
            steps.pop();
        }
    }

    false
}

pub fn node_at<'a>(tree: &'a [Node], path: &NodePath) -> Option<&'a Node> {
    let (first, rest) = path.0.split_first()?;
    let PathStep::Child(index) = first else {
        return None;
    };

    let mut node = tree.get(*index)?;
    for step in rest {
        node = match step {
            PathStep::Child(i) => node.children.as_ref()?.get(*i)?,
            PathStep::GridCell(key) => node.grid_data.as_ref()?.get(key)?,
        };
    }
    Some(node)
}

pub fn node_at_mut<'a>(tree: &'a mut [Node], path: &NodePath) -> Option<&'a mut Node> {
    node_at_steps_mut(tree, &path.0)
}

fn node_at_steps_mut<'a>(tree: &'a mut [Node], steps: &[PathStep]) -> Option<&'a mut Node> {
    let (first, rest) = steps.split_first()?;
    let PathStep::Child(index) = first else {
        return None;
    };

    let mut node = tree.get_mut(*index)?;
    for step in rest {
        node = match step {
            PathStep::Child(i) => node.children.as_mut()?.get_mut(*i)?,
            PathStep::GridCell(key) => node.grid_data.as_mut()?.get_mut(key)?,
        };
    }
    Some(node)
}

/// The ordered list a node lives in, plus its index there
///
/// Grid cells are not part of any list, so this is `None` for them.
pub fn enclosing_list_mut<'a>(
    tree: &'a mut Vec<Node>,
    path: &NodePath,
) -> Option<(&'a mut Vec<Node>, usize)> {
    let (last, parent) = path.0.split_last()?;
    let PathStep::Child(index) = last else {
        return None;
    };

    if parent.is_empty() {
        return Some((tree, *index));
    }

    let owner = node_at_steps_mut(tree, parent)?;
    Some((owner.children.as_mut()?, *index))
}

/// Detach the node at `path` and return it
pub fn take_at(tree: &mut Vec<Node>, path: &NodePath) -> Option<Node> {
    let (last, parent) = path.0.split_last()?;

    if parent.is_empty() {
        return match last {
            PathStep::Child(i) if *i < tree.len() => Some(tree.remove(*i)),
            _ => None,
        };
    }

    let owner = node_at_steps_mut(tree, parent)?;
    match last {
        PathStep::Child(i) => {
            let children = owner.children.as_mut()?;
            (*i < children.len()).then(|| children.remove(*i))
        }
        PathStep::GridCell(key) => owner.grid_data.as_mut()?.remove(key),
    }
}

/// Overwrite the node at `path`; returns false if the path does not resolve
pub fn replace_at(tree: &mut [Node], path: &NodePath, node: Node) -> bool {
    match node_at_mut(tree, path) {
        Some(slot) => {
            *slot = node;
            true
        }
        None => false,
    }
}

pub fn find_by_id<'a>(tree: &'a [Node], id: &str) -> Option<&'a Node> {
    let path = locate(tree, id)?;
    node_at(tree, &path)
}

pub fn contains(tree: &[Node], id: &str) -> bool {
    locate(tree, id).is_some()
}

/// Copy of `tree` with the node `id` structurally replaced
pub fn replace_by_id(tree: &[Node], id: &str, node: Node) -> Vec<Node> {
    let mut next = tree.to_vec();
    if let Some(path) = locate(&next, id) {
        replace_at(&mut next, &path, node);
    }
    next
}

/// Copy of `tree` without the node `id` (and its subtree)
pub fn remove_by_id(tree: &[Node], id: &str) -> Vec<Node> {
    let mut next = tree.to_vec();
    if let Some(path) = locate(&next, id) {
        take_at(&mut next, &path);
    }
    next
}

pub fn parent_of(tree: &[Node], id: &str) -> Option<ParentRef> {
    let path = locate(tree, id)?;
    match path.parent() {
        None => Some(ParentRef::Root),
        Some(parent) => node_at(tree, &parent).map(|owner| ParentRef::Node(owner.id.clone())),
    }
}

/// Index of a root-level node in the root sequence
pub fn root_index(tree: &[Node], id: &str) -> Option<usize> {
    tree.iter().position(|node| node.id == id)
}

/// Index of a node within the list it lives in (root or `children`)
pub fn sibling_index(tree: &[Node], id: &str) -> Option<usize> {
    match locate(tree, id)?.last()? {
        PathStep::Child(index) => Some(*index),
        PathStep::GridCell(_) => None,
    }
}

/// Every id in the tree, in document order
pub fn collect_ids(tree: &[Node]) -> Vec<String> {
    let mut collector = IdCollector::default();
    collector.visit_tree(tree);
    collector.ids
}

/// Ids that occur more than once
pub fn duplicate_ids(tree: &[Node]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for id in collect_ids(tree) {
        if !seen.insert(id.clone()) && !duplicates.contains(&id) {
            duplicates.push(id);
        }
    }
    duplicates
}

/// Number of nodes in the tree, grid cells included
pub fn count_nodes(tree: &[Node]) -> usize {
    collect_ids(tree).len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::GridCell;

    fn sample() -> Vec<Node> {
        vec![
            Node::new("h", "heading"),
            Node::new("c", "container")
                .with_child(Node::new("b", "button"))
                .with_child(Node::new("inner", "container").with_child(Node::new("i", "image"))),
            Node::new("g", "grid").with_cell(GridCell::new(1, 2), Node::new("t", "text")),
        ]
    }

    #[test]
    fn test_locate_paths() {
        let tree = sample();
        assert_eq!(locate(&tree, "h").unwrap().to_string(), "/0");
        assert_eq!(locate(&tree, "i").unwrap().to_string(), "/1/1/0");
        assert_eq!(locate(&tree, "t").unwrap().to_string(), "/2/[1-2]");
        assert!(locate(&tree, "missing").is_none());
    }

    #[test]
    fn test_find_by_id_recurses_everywhere() {
        let tree = sample();
        assert_eq!(find_by_id(&tree, "i").unwrap().kind.as_str(), "image");
        assert_eq!(find_by_id(&tree, "t").unwrap().kind.as_str(), "text");
    }

    #[test]
    fn test_replace_by_id_is_pure() {
        let tree = sample();
        let next = replace_by_id(&tree, "b", Node::new("b", "button").with_content("Go"));
        assert_eq!(find_by_id(&next, "b").unwrap().content.as_deref(), Some("Go"));
        assert!(find_by_id(&tree, "b").unwrap().content.is_none());
    }

    #[test]
    fn test_missing_ids_are_noops() {
        let tree = sample();
        assert_eq!(replace_by_id(&tree, "nope", Node::new("x", "text")), tree);
        assert_eq!(remove_by_id(&tree, "nope"), tree);
    }

    #[test]
    fn test_remove_by_id_takes_subtree() {
        let tree = sample();
        let next = remove_by_id(&tree, "inner");
        assert!(!contains(&next, "inner"));
        assert!(!contains(&next, "i"));
        assert_eq!(count_nodes(&next), count_nodes(&tree) - 2);

        let next = remove_by_id(&tree, "t");
        assert!(next[2].grid_data.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_parent_and_sibling_queries() {
        let tree = sample();
        assert_eq!(parent_of(&tree, "c"), Some(ParentRef::Root));
        assert_eq!(parent_of(&tree, "i"), Some(ParentRef::Node("inner".into())));
        assert_eq!(parent_of(&tree, "t"), Some(ParentRef::Node("g".into())));
        assert_eq!(sibling_index(&tree, "inner"), Some(1));
        assert_eq!(sibling_index(&tree, "t"), None);
        assert_eq!(root_index(&tree, "g"), Some(2));
        assert_eq!(root_index(&tree, "b"), None);
    }

    #[test]
    fn test_duplicate_ids_detected() {
        let mut tree = sample();
        assert!(duplicate_ids(&tree).is_empty());
        tree.push(Node::new("b", "button"));
        assert_eq!(duplicate_ids(&tree), vec!["b".to_string()]);
    }

    #[test]
    fn test_path_prefixes() {
        let tree = sample();
        let outer = locate(&tree, "c").unwrap();
        let deep = locate(&tree, "i").unwrap();
        assert!(deep.starts_with(&outer));
        assert!(!outer.starts_with(&deep));
        assert_eq!(deep.parent(), locate(&tree, "inner"));
    }
}
