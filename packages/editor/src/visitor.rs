use crate::node::Node;

/// Visitor pattern for traversing node trees immutably
///
/// The default implementations walk the whole tree, grid cells included.
/// Override `visit_node` to act on each node and call [`walk_node`] to keep
/// descending.
pub trait Visitor: Sized {
    fn visit_tree(&mut self, nodes: &[Node]) {
        walk_tree(self, nodes);
    }

    fn visit_node(&mut self, node: &Node) {
        walk_node(self, node);
    }
}

/// Mutable visitor pattern for transforming node trees
pub trait VisitorMut: Sized {
    fn visit_tree_mut(&mut self, nodes: &mut [Node]) {
        walk_tree_mut(self, nodes);
    }

    fn visit_node_mut(&mut self, node: &mut Node) {
        walk_node_mut(self, node);
    }
}

pub fn walk_tree<V: Visitor>(visitor: &mut V, nodes: &[Node]) {
    for node in nodes {
        visitor.visit_node(node);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node) {
    for child in node.children() {
        visitor.visit_node(child);
    }
    if let Some(cells) = &node.grid_data {
        for cell in cells.values() {
            visitor.visit_node(cell);
        }
    }
}

pub fn walk_tree_mut<V: VisitorMut>(visitor: &mut V, nodes: &mut [Node]) {
    for node in nodes {
        visitor.visit_node_mut(node);
    }
}

pub fn walk_node_mut<V: VisitorMut>(visitor: &mut V, node: &mut Node) {
    if let Some(children) = &mut node.children {
        for child in children {
            visitor.visit_node_mut(child);
        }
    }
    if let Some(cells) = &mut node.grid_data {
        for cell in cells.values_mut() {
            visitor.visit_node_mut(cell);
        }
    }
}

/// Collects every id in visiting order
#[derive(Debug, Default)]
pub struct IdCollector {
    pub ids: Vec<String>,
}

impl Visitor for IdCollector {
    fn visit_node(&mut self, node: &Node) {
        self.ids.push(node.id.clone());
        walk_node(self, node);
    }
}
