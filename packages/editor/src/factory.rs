//! # Node Factory
//!
//! Instantiates palette items. Each kind gets its starting content, props and
//! style from a static defaults table; kinds the table does not know produce
//! an empty node rather than an error.

use crate::ids::IdSource;
use crate::node::{Node, NodeKind, PropMap};
use crate::visitor::{walk_node_mut, VisitorMut};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Starting values for a freshly created node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeDefaults {
    pub content: Option<String>,
    pub props: PropMap,
    pub style: PropMap,
}

/// Default content/props/style for `kind`
pub fn defaults_for(kind: &NodeKind) -> NodeDefaults {
    let (content, props, style) = match kind {
        NodeKind::Heading => (Some("New heading"), json!({ "level": 2 }), json!({})),
        NodeKind::Text => (
            Some("<p>Add your text here</p>"),
            json!({}),
            json!({ "lineHeight": "1.5" }),
        ),
        NodeKind::Button => (
            Some("Click me"),
            json!({ "href": "#", "variant": "primary", "openInNewTab": false }),
            json!({ "padding": "8px 16px" }),
        ),
        NodeKind::Image => (
            None,
            json!({ "src": "", "alt": "" }),
            json!({ "width": "100%" }),
        ),
        NodeKind::Video => (
            None,
            json!({ "src": "", "autoplay": false, "controls": true }),
            json!({ "width": "100%" }),
        ),
        NodeKind::Spacer => (None, json!({}), json!({ "height": "32px" })),
        NodeKind::Divider => (None, json!({}), json!({ "borderTop": "1px solid #e5e7eb" })),
        NodeKind::Container => (
            None,
            json!({ "columns": 2, "gap": 16 }),
            json!({ "padding": "16px" }),
        ),
        NodeKind::Grid => (
            None,
            json!({ "rows": 2, "columns": 2, "gap": 16 }),
            json!({}),
        ),
        NodeKind::Header => (None, json!({ "sticky": false }), json!({ "padding": "16px" })),
        NodeKind::Footer => (None, json!({}), json!({ "padding": "16px" })),
        NodeKind::Section => (None, json!({}), json!({ "padding": "32px 16px" })),
        NodeKind::Form => (None, json!({ "action": "", "method": "post" }), json!({})),
        NodeKind::Input => (
            None,
            json!({ "name": "", "placeholder": "", "inputType": "text" }),
            json!({}),
        ),
        NodeKind::Link => (Some("Link"), json!({ "href": "#" }), json!({})),
        NodeKind::Icon => (None, json!({ "name": "star", "size": 24 }), json!({})),
        NodeKind::List => (None, json!({ "ordered": false }), json!({})),
        NodeKind::Navbar => (None, json!({ "links": [] }), json!({})),
        NodeKind::Hero => (
            None,
            json!({}),
            json!({ "minHeight": "320px", "padding": "48px 16px" }),
        ),
        NodeKind::Card => (None, json!({}), json!({ "padding": "16px", "borderRadius": "8px" })),
        NodeKind::Other(_) => (None, json!({}), json!({})),
    };

    NodeDefaults {
        content: content.map(str::to_string),
        props: into_map(props),
        style: into_map(style),
    }
}

fn into_map(value: Value) -> PropMap {
    match value {
        Value::Object(map) => map,
        _ => PropMap::new(),
    }
}

/// Create a node of `kind` with a fresh id and the kind's defaults
pub fn create_node(kind: impl Into<NodeKind>, ids: &mut dyn IdSource) -> Node {
    let kind = kind.into();
    let NodeDefaults {
        content,
        props,
        style,
    } = defaults_for(&kind);

    let mut node = Node::new(ids.next_id(), kind);
    node.content = content;
    node.props = props;
    node.style = style;
    if node.kind.is_grid() {
        node.grid_data = Some(BTreeMap::new());
    }
    node
}

struct FreshIds<'a> {
    ids: &'a mut dyn IdSource,
}

impl VisitorMut for FreshIds<'_> {
    fn visit_node_mut(&mut self, node: &mut Node) {
        node.id = self.ids.next_id();
        walk_node_mut(self, node);
    }
}

/// Deep clone of `node` where the node and every descendant get a new id
pub fn refresh_ids(node: &Node, ids: &mut dyn IdSource) -> Node {
    let mut clone = node.clone();
    FreshIds { ids }.visit_node_mut(&mut clone);
    clone
}
