//! # Page Component Nodes
//!
//! The unit of a page document. A node carries a kind tag, opaque
//! `props`/`style` maps that only the renderer interprets, an optional
//! content payload and, for container-like kinds, an ordered list of
//! children.
//!
//! Grid nodes own a second addressable container: `props.gridData`, a sparse
//! map keyed by `"{row}-{col}"` whose values are full nodes. On the wire the
//! map stays inside `props`; in memory it is lifted into [`Node::grid_data`]
//! so traversal never has to re-parse JSON values.
//!
//! ## Wire format
//!
//! ```text
//! { "id": string, "type": string, "content"?: string,
//!   "props": { ... }, "style": { ... }, "children"?: [Node, ...] }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Key under `props` holding a grid's cell contents
pub const GRID_DATA_KEY: &str = "gridData";

/// Slot indices for grid cells encode `row * GRID_SLOT_STRIDE + col`
pub const GRID_SLOT_STRIDE: u32 = 1000;

/// Opaque key/value map used for `props` and `style`
pub type PropMap = Map<String, Value>;

/// Component kind tag
///
/// Unknown tags are preserved verbatim in [`NodeKind::Other`] so that
/// documents written by newer editors survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Heading,
    Text,
    Button,
    Image,
    Video,
    Spacer,
    Divider,
    Container,
    Grid,
    Header,
    Footer,
    Section,
    Form,
    Input,
    Link,
    Icon,
    List,
    Navbar,
    Hero,
    Card,
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Heading => "heading",
            NodeKind::Text => "text",
            NodeKind::Button => "button",
            NodeKind::Image => "image",
            NodeKind::Video => "video",
            NodeKind::Spacer => "spacer",
            NodeKind::Divider => "divider",
            NodeKind::Container => "container",
            NodeKind::Grid => "grid",
            NodeKind::Header => "header",
            NodeKind::Footer => "footer",
            NodeKind::Section => "section",
            NodeKind::Form => "form",
            NodeKind::Input => "input",
            NodeKind::Link => "link",
            NodeKind::Icon => "icon",
            NodeKind::List => "list",
            NodeKind::Navbar => "navbar",
            NodeKind::Hero => "hero",
            NodeKind::Card => "card",
            NodeKind::Other(tag) => tag,
        }
    }

    /// Whether nodes of this kind may hold children
    pub fn accepts_children(&self) -> bool {
        matches!(
            self,
            NodeKind::Container
                | NodeKind::Grid
                | NodeKind::Header
                | NodeKind::Footer
                | NodeKind::Section
                | NodeKind::Form
                | NodeKind::List
                | NodeKind::Navbar
                | NodeKind::Hero
                | NodeKind::Card
        )
    }

    pub fn is_grid(&self) -> bool {
        matches!(self, NodeKind::Grid)
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "heading" => NodeKind::Heading,
            "text" => NodeKind::Text,
            "button" => NodeKind::Button,
            "image" => NodeKind::Image,
            "video" => NodeKind::Video,
            "spacer" => NodeKind::Spacer,
            "divider" => NodeKind::Divider,
            "container" => NodeKind::Container,
            "grid" => NodeKind::Grid,
            "header" => NodeKind::Header,
            "footer" => NodeKind::Footer,
            "section" => NodeKind::Section,
            "form" => NodeKind::Form,
            "input" => NodeKind::Input,
            "link" => NodeKind::Link,
            "icon" => NodeKind::Icon,
            "list" => NodeKind::List,
            "navbar" => NodeKind::Navbar,
            "hero" => NodeKind::Hero,
            "card" => NodeKind::Card,
            _ => NodeKind::Other(tag),
        }
    }
}

impl From<&str> for NodeKind {
    fn from(tag: &str) -> Self {
        NodeKind::from(tag.to_string())
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for NodeKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(NodeKind::from(s))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single addressable element of the component tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NodeRecord", into = "NodeRecord")]
pub struct Node {
    /// Unique within a document, immutable after creation
    pub id: String,

    pub kind: NodeKind,

    /// Opaque payload (rich text, markup) for the renderer
    pub content: Option<String>,

    pub props: PropMap,

    pub style: PropMap,

    /// `None` means the node is not a container
    pub children: Option<Vec<Node>>,

    /// Grid cell contents keyed by `"{row}-{col}"` (serialized as `props.gridData`)
    pub grid_data: Option<BTreeMap<String, Node>>,
}

impl Node {
    /// Create a bare node with empty maps
    pub fn new(id: impl Into<String>, kind: impl Into<NodeKind>) -> Self {
        let kind = kind.into();
        let children = kind.accepts_children().then(Vec::new);
        Self {
            id: id.into(),
            kind,
            content: None,
            props: PropMap::new(),
            style: PropMap::new(),
            children,
            grid_data: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.style.insert(key.into(), value.into());
        self
    }

    /// Append a child (only for kinds that accept children)
    pub fn with_child(mut self, child: Node) -> Self {
        if self.kind.accepts_children() {
            self.children.get_or_insert_with(Vec::new).push(child);
        }
        self
    }

    pub fn with_cell(mut self, cell: GridCell, node: Node) -> Self {
        self.grid_data
            .get_or_insert_with(BTreeMap::new)
            .insert(cell.key(), node);
        self
    }

    pub fn children(&self) -> &[Node] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn is_container(&self) -> bool {
        self.kind.accepts_children()
    }

    /// Column count of a container, never below 1
    pub fn columns(&self) -> u32 {
        self.props
            .get("columns")
            .and_then(Value::as_u64)
            .map(|c| c.max(1) as u32)
            .unwrap_or(1)
    }

    /// Grid cell at `cell`, if any
    pub fn cell(&self, cell: GridCell) -> Option<&Node> {
        self.grid_data.as_ref()?.get(&cell.key())
    }

    /// Read a pixel-valued style declaration such as `"240px"` or a bare number
    pub fn style_px(&self, key: &str) -> Option<f64> {
        match self.style.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_px(s),
            _ => None,
        }
    }
}

/// Parse `"12px"`, `"12.5px"` or `"12"`; other units are rejected
pub fn parse_px(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Row/column address of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    pub row: u32,
    pub col: u32,
}

impl GridCell {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Decode a drop slot index (`row * 1000 + col`)
    pub fn from_slot(slot: u32) -> Self {
        Self {
            row: slot / GRID_SLOT_STRIDE,
            col: slot % GRID_SLOT_STRIDE,
        }
    }

    pub fn to_slot(self) -> u32 {
        self.row * GRID_SLOT_STRIDE + self.col
    }

    /// `gridData` key, e.g. `"1-2"`
    pub fn key(self) -> String {
        format!("{}-{}", self.row, self.col)
    }

    pub fn parse_key(key: &str) -> Option<Self> {
        let (row, col) = key.split_once('-')?;
        Some(Self {
            row: row.parse().ok()?,
            col: col.parse().ok()?,
        })
    }
}

/// Wire shape of a node; `gridData` still nested in `props`
#[derive(Serialize, Deserialize)]
struct NodeRecord {
    id: String,
    #[serde(rename = "type")]
    kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default)]
    props: PropMap,
    #[serde(default)]
    style: PropMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<Node>>,
}

impl TryFrom<NodeRecord> for Node {
    type Error = String;

    fn try_from(record: NodeRecord) -> Result<Self, Self::Error> {
        let NodeRecord {
            id,
            kind,
            content,
            mut props,
            style,
            children,
        } = record;

        // Only grids own cells; elsewhere gridData is an ordinary prop
        let lifted = if kind.is_grid() {
            props.remove(GRID_DATA_KEY)
        } else {
            None
        };
        let grid_data = match lifted {
            Some(Value::Object(cells)) => {
                let mut parsed = BTreeMap::new();
                for (key, value) in cells {
                    let cell: Node = serde_json::from_value(value)
                        .map_err(|e| format!("invalid grid cell {key:?} in node {id:?}: {e}"))?;
                    parsed.insert(key, cell);
                }
                Some(parsed)
            }
            Some(other) => {
                props.insert(GRID_DATA_KEY.to_string(), other);
                None
            }
            None => None,
        };

        Ok(Node {
            id,
            kind,
            content,
            props,
            style,
            children,
            grid_data,
        })
    }
}

impl From<Node> for NodeRecord {
    fn from(node: Node) -> Self {
        let Node {
            id,
            kind,
            content,
            mut props,
            style,
            children,
            grid_data,
        } = node;

        if let Some(cells) = grid_data {
            let cells: Map<String, Value> = cells
                .into_iter()
                .filter_map(|(key, cell)| serde_json::to_value(cell).ok().map(|v| (key, v)))
                .collect();
            props.insert(GRID_DATA_KEY.to_string(), Value::Object(cells));
        }

        NodeRecord {
            id,
            kind,
            content,
            props,
            style,
            children,
        }
    }
}
