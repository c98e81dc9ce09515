//! # Import / Export
//!
//! JSON interchange for the root sequence. Export is pretty-printed; import
//! is all-or-nothing: a payload that is not valid JSON, not an array, holds a
//! malformed node, gives a leaf kind children, or repeats an id is rejected
//! as a whole.

use crate::document::Document;
use crate::mutations::check_structure;
use crate::node::Node;
use crate::store::duplicate_ids;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Expected an array of nodes, found {0}")]
    NotAnArray(&'static str),

    #[error("Invalid node at index {index}: {message}")]
    InvalidNode { index: usize, message: String },

    #[error("Duplicate node id: {0}")]
    DuplicateId(String),
}

/// Serialize the root sequence with indentation
pub fn export_nodes(nodes: &[Node]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(nodes)
}

/// Parse a root sequence
pub fn import_nodes(text: &str) -> Result<Vec<Node>, ImportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ImportError::InvalidJson(e.to_string()))?;

    let items = match value {
        Value::Array(items) => items,
        other => return Err(ImportError::NotAnArray(json_kind(&other))),
    };

    let nodes = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<Node>(item).map_err(|e| ImportError::InvalidNode {
                index,
                message: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    validate_nodes(&nodes)?;
    Ok(nodes)
}

/// Structural checks every installed tree must pass
pub(crate) fn validate_nodes(nodes: &[Node]) -> Result<(), ImportError> {
    for (index, node) in nodes.iter().enumerate() {
        check_structure(node).map_err(|e| ImportError::InvalidNode {
            index,
            message: e.to_string(),
        })?;
    }
    if let Some(id) = duplicate_ids(nodes).into_iter().next() {
        return Err(ImportError::DuplicateId(id));
    }
    Ok(())
}

/// Serialize a whole page (metadata + nodes)
pub fn export_document(doc: &Document) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(doc)
}

/// Parse a whole page file
pub fn import_document(text: &str) -> Result<Document, ImportError> {
    let doc: Document =
        serde_json::from_str(text).map_err(|e| ImportError::InvalidJson(e.to_string()))?;
    validate_nodes(&doc.nodes)?;
    Ok(doc)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
