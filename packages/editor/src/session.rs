//! # Edit Session Management
//!
//! One user's editing state for one page: the document, its undo history,
//! the transient selection/hover state and any in-flight resize gesture.
//!
//! Every gesture funnels through the same path:
//!
//! ```text
//! gesture → Mutation → Mutation::apply → History::commit → Document
//! ```
//!
//! Nothing else writes to the document's nodes.

use crate::document::Document;
use crate::drop_target::{self, DragSource, DropTarget};
use crate::errors::EditorError;
use crate::factory::create_node;
use crate::history::{History, DEFAULT_MAX_LEVELS};
use crate::ids::IdGenerator;
use crate::interchange::{export_nodes, import_nodes};
use crate::mutations::{Mutation, MutationError};
use crate::node::{Node, NodeKind};
use crate::resize::{BoxGeometry, Point, Rect, ResizeHandle, ResizeState};
use crate::storage::PageStorage;
use crate::store;

/// Selected and hovered node ids; never persisted, never part of history
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub selected: Option<String>,
    pub hovered: Option<String>,
}

impl Selection {
    /// Forget ids that are no longer in `tree`
    fn retain_existing(&mut self, tree: &[Node]) {
        for slot in [&mut self.selected, &mut self.hovered] {
            if slot.as_deref().is_some_and(|id| !store::contains(tree, id)) {
                *slot = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.hovered = None;
    }
}

/// Result of applying a mutation through the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationResult {
    /// Document version after the call
    pub version: u64,

    /// False when the mutation was a no-op and nothing was committed
    pub changed: bool,
}

/// Single-user edit session
pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    document: Document,

    history: History,

    selection: Selection,

    ids: IdGenerator,

    resize: ResizeState,
}

impl EditSession {
    /// Create new edit session
    pub fn new(id: impl Into<String>, document: Document) -> Self {
        Self::with_history_limit(id, document, DEFAULT_MAX_LEVELS)
    }

    pub fn with_history_limit(id: impl Into<String>, document: Document, max_levels: usize) -> Self {
        let history = History::with_max_levels(document.nodes.clone(), max_levels);
        Self {
            id: id.into(),
            document,
            history,
            selection: Selection::default(),
            ids: IdGenerator::new(),
            resize: ResizeState::Idle,
        }
    }

    /// Replace the id generator (deterministic ids in tests and replays)
    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// Open a stored page in a new session
    pub fn load(
        id: impl Into<String>,
        storage: &dyn PageStorage,
        page_id: &str,
    ) -> Result<Self, EditorError> {
        let document = storage.load(page_id)?;
        tracing::info!(page = %document.meta.slug, nodes = document.nodes.len(), "page loaded");
        Ok(Self::new(id, document))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn nodes(&self) -> &[Node] {
        self.document.nodes()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn resize_state(&self) -> &ResizeState {
        &self.resize
    }

    /// Instantiate a palette item with a session-unique id
    pub fn create_node(&mut self, kind: impl Into<NodeKind>) -> Node {
        create_node(kind, &mut self.ids)
    }

    /// Apply a mutation and commit the result
    ///
    /// No-op mutations (unknown ids, boundary moves) leave history alone.
    pub fn apply(&mut self, mutation: Mutation) -> MutationResult {
        let next = mutation.apply(self.document.nodes(), &mut self.ids);
        self.commit(&mutation, next)
    }

    /// Like [`apply`](Self::apply), but reports why a mutation was rejected
    pub fn try_apply(&mut self, mutation: Mutation) -> Result<MutationResult, MutationError> {
        let next = mutation.try_apply(self.document.nodes(), &mut self.ids)?;
        Ok(self.commit(&mutation, next))
    }

    fn commit(&mut self, mutation: &Mutation, next: Vec<Node>) -> MutationResult {
        if next.as_slice() == self.document.nodes() {
            tracing::debug!(mutation = mutation.name(), "no change, nothing committed");
            return self.result(false);
        }

        self.history.commit(next.clone(), Some(mutation.describe()));
        self.install(next);
        tracing::info!(
            mutation = mutation.name(),
            version = self.document.version,
            "mutation committed"
        );
        self.result(true)
    }

    pub fn undo(&mut self) -> bool {
        let Some(nodes) = self.history.undo().map(<[Node]>::to_vec) else {
            return false;
        };
        self.install(nodes);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(nodes) = self.history.redo().map(<[Node]>::to_vec) else {
            return false;
        };
        self.install(nodes);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn install(&mut self, nodes: Vec<Node>) {
        self.document.replace_nodes(nodes);
        self.selection.retain_existing(self.document.nodes());
        let stale = self
            .resize
            .gesture()
            .is_some_and(|g| !store::contains(self.document.nodes(), &g.node_id));
        if stale {
            self.resize.cancel();
        }
    }

    fn result(&self, changed: bool) -> MutationResult {
        MutationResult {
            version: self.document.version,
            changed,
        }
    }

    /// Select a node; ids not in the tree clear the selection
    pub fn select(&mut self, node_id: Option<&str>) {
        self.selection.selected = node_id
            .filter(|id| store::contains(self.document.nodes(), id))
            .map(str::to_string);
    }

    pub fn hover(&mut self, node_id: Option<&str>) {
        self.selection.hovered = node_id
            .filter(|id| store::contains(self.document.nodes(), id))
            .map(str::to_string);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Finish a drag gesture
    pub fn drop_item(&mut self, source: &DragSource, target: &DropTarget) -> MutationResult {
        let resolution = drop_target::resolve(self.document.nodes(), source, target);
        tracing::debug!(?resolution, "drop resolved");
        match resolution.into_mutation(&mut self.ids) {
            Some(mutation) => self.apply(mutation),
            None => self.result(false),
        }
    }

    /// Pointer pressed on a selected or hovered node drawn at `bounds`
    ///
    /// Starts a resize when the pointer is inside the border zone and returns
    /// the grabbed handle.
    pub fn pointer_down(&mut self, node_id: &str, pointer: Point, bounds: Rect) -> Option<ResizeHandle> {
        let active = self.selection.selected.as_deref() == Some(node_id)
            || self.selection.hovered.as_deref() == Some(node_id);
        if !active {
            return None;
        }

        let node = store::find_by_id(self.document.nodes(), node_id)?;
        let handle = ResizeHandle::hit_test(bounds, pointer)?;
        self.resize.begin(node, handle, pointer, bounds);
        Some(handle)
    }

    /// Live geometry while resizing; never touches the document
    pub fn pointer_move(&mut self, pointer: Point) -> Option<BoxGeometry> {
        self.resize.update(pointer)
    }

    /// End a resize, committing a single style update if the pointer moved
    pub fn pointer_up(&mut self, pointer: Point) -> MutationResult {
        let Some(node_id) = self.resize.gesture().map(|g| g.node_id.clone()) else {
            return self.result(false);
        };
        let Some(node) = store::find_by_id(self.document.nodes(), &node_id).cloned() else {
            self.resize.cancel();
            return self.result(false);
        };

        match self.resize.finish(pointer, &node) {
            Some(patched) => self.apply(Mutation::UpdateNode {
                node_id,
                node: patched,
            }),
            None => self.result(false),
        }
    }

    pub fn cancel_resize(&mut self) -> bool {
        self.resize.cancel()
    }

    /// Replace the whole tree with an imported one, discarding history
    ///
    /// On failure the session is left exactly as it was.
    pub fn import_json(&mut self, text: &str) -> Result<(), EditorError> {
        let nodes = import_nodes(text).inspect_err(|e| tracing::warn!(error = %e, "import rejected"))?;

        self.history.reset(nodes.clone());
        self.document.replace_nodes(nodes);
        self.selection.clear();
        self.resize.cancel();
        tracing::info!(nodes = self.document.nodes.len(), "document imported");
        Ok(())
    }

    pub fn export_json(&self) -> Result<String, EditorError> {
        Ok(export_nodes(self.document.nodes())?)
    }

    /// Save through the page store
    ///
    /// A failed save is reported and changes nothing locally. A successful
    /// one adopts the id the store assigned.
    pub fn save(&mut self, storage: &mut dyn PageStorage) -> Result<(), EditorError> {
        match storage.save(&self.document) {
            Ok(stored) => {
                self.document.meta = stored.meta;
                self.document.mark_saved();
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, page = %self.document.meta.slug, "save failed");
                Err(error.into())
            }
        }
    }

    /// Publish through the page store, adopting the stored metadata like `save`
    pub fn publish(&mut self, storage: &mut dyn PageStorage) -> Result<(), EditorError> {
        match storage.publish(&self.document) {
            Ok(stored) => {
                self.document.meta = stored.meta;
                self.document.mark_saved();
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, page = %self.document.meta.slug, "publish failed");
                Err(error.into())
            }
        }
    }
}
