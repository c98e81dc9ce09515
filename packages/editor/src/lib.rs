//! # Pagecraft Editor
//!
//! Editable document engine for the Pagecraft page builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ canvas UI: pointer events, drag descriptors │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: session + engine                    │
//! │  - Resolve drops and resize gestures        │
//! │  - Pure tree mutations                      │
//! │  - Snapshot undo/redo history               │
//! │  - Import/export, page storage boundary     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ renderer: node tree → visual output         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **One write path**: every change is a [`Mutation`] applied by the engine
//! 2. **Pure mutations**: `(tree, mutation) -> tree`, the input is never touched
//! 3. **Snapshots, not diffs**: history stores whole trees
//! 4. **Lookups never throw**: unknown ids are no-ops
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_editor::{Document, EditSession, Mutation, PageMeta};
//!
//! let mut session = EditSession::new("client-1", Document::new(PageMeta::new("Home")));
//!
//! let heading = session.create_node("heading");
//! session.apply(Mutation::AddRoot { node: heading });
//!
//! session.undo();
//! session.redo();
//!
//! let json = session.export_json()?;
//! ```

mod document;
mod drop_target;
mod errors;
mod factory;
mod history;
mod ids;
mod interchange;
mod mutations;
mod node;
mod resize;
mod session;
mod storage;
mod visitor;

pub mod store;

pub use document::{slugify, Document, PageMeta};
pub use drop_target::{resolve, DragSource, DropResolution, DropTarget};
pub use errors::EditorError;
pub use factory::{create_node, defaults_for, refresh_ids, NodeDefaults};
pub use history::{History, HistoryEntry, DEFAULT_MAX_LEVELS};
pub use ids::{IdGenerator, IdSource};
pub use interchange::{export_document, export_nodes, import_document, import_nodes, ImportError};
pub use mutations::{Mutation, MutationError};
pub use node::{parse_px, GridCell, Node, NodeKind, PropMap, GRID_DATA_KEY, GRID_SLOT_STRIDE};
pub use resize::{
    compute_geometry, BoxGeometry, Point, Rect, ResizeGesture, ResizeHandle, ResizeState,
    BORDER_ZONE, CLICK_THRESHOLD, MIN_HEIGHT, MIN_WIDTH,
};
pub use session::{EditSession, MutationResult, Selection};
pub use storage::{FileStorage, MemoryStorage, PageStorage, StorageError};
pub use visitor::{walk_node, walk_node_mut, walk_tree, walk_tree_mut, IdCollector, Visitor, VisitorMut};
