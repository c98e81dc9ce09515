use pagecraft_editor::{
    export_document, store, Document, DragSource, DropTarget, EditSession, EditorError, Mutation,
    PageMeta, Point, Rect,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_js(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, EditorError> {
    Ok(serde_json::to_string(value)?)
}

/// One page open in the browser editor
///
/// Everything crosses the boundary as JSON text in the same shapes the
/// editor crate serializes: nodes, mutations, drag sources and drop targets.
#[wasm_bindgen]
pub struct Editor {
    session: EditSession,
}

#[wasm_bindgen]
impl Editor {
    #[wasm_bindgen(constructor)]
    pub fn new(title: &str) -> Editor {
        Editor {
            session: EditSession::new("browser", Document::new(PageMeta::new(title))),
        }
    }

    /// Open a stored page file (`Document` JSON)
    #[wasm_bindgen(js_name = fromDocument)]
    pub fn from_document(json: &str) -> Result<Editor, JsValue> {
        Self::open_document(json).map_err(to_js)
    }

    #[wasm_bindgen(getter)]
    pub fn version(&self) -> f64 {
        self.session.document().version as f64
    }

    /// Root sequence as a JSON array
    pub fn nodes(&self) -> Result<String, JsValue> {
        to_json(&self.session.nodes()).map_err(to_js)
    }

    /// Whole page (metadata + nodes) as JSON
    #[wasm_bindgen(js_name = documentJson)]
    pub fn document_json(&self) -> Result<String, JsValue> {
        export_document(self.session.document()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = findNode)]
    pub fn find_node(&self, node_id: &str) -> Option<String> {
        store::find_by_id(self.session.nodes(), node_id)
            .and_then(|node| serde_json::to_string(node).ok())
    }

    /// Instantiate a palette item; the node is not inserted
    #[wasm_bindgen(js_name = createNode)]
    pub fn create_node(&mut self, kind: &str) -> Result<String, JsValue> {
        let node = self.session.create_node(kind);
        to_json(&node).map_err(to_js)
    }

    /// Apply a mutation; returns whether the tree changed
    pub fn apply(&mut self, mutation_json: &str) -> Result<bool, JsValue> {
        self.apply_json(mutation_json).map_err(to_js)
    }

    #[wasm_bindgen(js_name = dropItem)]
    pub fn drop_item(&mut self, source_json: &str, target_json: &str) -> Result<bool, JsValue> {
        self.drop_json(source_json, target_json).map_err(to_js)
    }

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    #[wasm_bindgen(js_name = undoLabel)]
    pub fn undo_label(&self) -> Option<String> {
        self.session.history().undo_description().map(str::to_string)
    }

    #[wasm_bindgen(js_name = redoLabel)]
    pub fn redo_label(&self) -> Option<String> {
        self.session.history().redo_description().map(str::to_string)
    }

    pub fn select(&mut self, node_id: Option<String>) {
        self.session.select(node_id.as_deref());
    }

    pub fn hover(&mut self, node_id: Option<String>) {
        self.session.hover(node_id.as_deref());
    }

    #[wasm_bindgen(getter)]
    pub fn selected(&self) -> Option<String> {
        self.session.selection().selected.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn hovered(&self) -> Option<String> {
        self.session.selection().hovered.clone()
    }

    /// Pointer pressed over a node drawn at the given bounds; returns the
    /// grabbed handle (`"top-left"`, `"right"`, ...) when a resize starts
    #[wasm_bindgen(js_name = pointerDown)]
    #[allow(clippy::too_many_arguments)]
    pub fn pointer_down(
        &mut self,
        node_id: &str,
        x: f64,
        y: f64,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> Option<String> {
        let handle = self.session.pointer_down(
            node_id,
            Point::new(x, y),
            Rect::new(left, top, width, height),
        )?;
        serde_json::to_value(handle)
            .ok()
            .and_then(|value| value.as_str().map(str::to_string))
    }

    /// Live geometry JSON while resizing, for visual feedback only
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<String> {
        let geometry = self.session.pointer_move(Point::new(x, y))?;
        serde_json::to_string(&geometry).ok()
    }

    /// Finish a resize; returns whether a style update was committed
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.session.pointer_up(Point::new(x, y)).changed
    }

    #[wasm_bindgen(js_name = cancelResize)]
    pub fn cancel_resize(&mut self) -> bool {
        self.session.cancel_resize()
    }

    /// Replace the tree with an imported node array; history is discarded
    #[wasm_bindgen(js_name = importJson)]
    pub fn import_json(&mut self, text: &str) -> Result<(), JsValue> {
        self.session.import_json(text).map_err(to_js)
    }

    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&self) -> Result<String, JsValue> {
        self.session.export_json().map_err(to_js)
    }
}

impl Editor {
    fn open_document(json: &str) -> Result<Editor, EditorError> {
        let document = pagecraft_editor::import_document(json)?;
        Ok(Editor {
            session: EditSession::new("browser", document),
        })
    }

    fn apply_json(&mut self, mutation_json: &str) -> Result<bool, EditorError> {
        let mutation: Mutation = serde_json::from_str(mutation_json)?;
        Ok(self.session.apply(mutation).changed)
    }

    fn drop_json(&mut self, source_json: &str, target_json: &str) -> Result<bool, EditorError> {
        let source: DragSource = serde_json::from_str(source_json)?;
        let target: DropTarget = serde_json::from_str(target_json)?;
        Ok(self.session.drop_item(&source, &target).changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_drop_then_undo() {
        let mut editor = Editor::new("Home");
        let dropped = editor
            .drop_item(r#"{"source":"palette","kind":"heading"}"#, r#"{"target":"nothing"}"#)
            .unwrap();
        assert!(dropped);
        assert!(editor.nodes().unwrap().contains(r#""type":"heading""#));
        assert_eq!(editor.undo_label().as_deref(), Some("Add heading"));

        assert!(editor.undo());
        assert_eq!(editor.nodes().unwrap(), "[]");
        assert!(editor.can_redo());
    }

    #[test]
    fn test_apply_mutation_json() {
        let mut editor = Editor::new("Home");
        let node = editor.create_node("container").unwrap();
        let id = serde_json::from_str::<serde_json::Value>(&node).unwrap()["id"]
            .as_str()
            .unwrap()
            .to_string();

        let mutation = format!(r#"{{"op":"add_root","node":{node}}}"#);
        assert!(editor.apply(&mutation).unwrap());

        let column = format!(r#"{{"op":"add_column","container_id":"{id}"}}"#);
        assert!(editor.apply(&column).unwrap());
        assert!(editor.find_node(&id).unwrap().contains(r#""columns":3"#));

        assert!(editor.apply_json("not json").is_err());
    }

    #[test]
    fn test_resize_through_bindings() {
        let mut editor = Editor::new("Home");
        let node = editor.create_node("image").unwrap();
        editor
            .apply(&format!(r#"{{"op":"add_root","node":{node}}}"#))
            .unwrap();
        let id = serde_json::from_str::<serde_json::Value>(&node).unwrap()["id"]
            .as_str()
            .unwrap()
            .to_string();

        editor.select(Some(id.clone()));
        let handle = editor.pointer_down(&id, 200.0, 50.0, 0.0, 0.0, 200.0, 100.0);
        assert_eq!(handle.as_deref(), Some("right"));
        assert!(editor.pointer_move(260.0, 50.0).unwrap().contains(r#""width":260.0"#));
        assert!(editor.pointer_up(260.0, 50.0));
        assert!(editor.find_node(&id).unwrap().contains("260px"));
    }

    #[test]
    fn test_document_round_trip() {
        let mut editor = Editor::new("About");
        editor
            .drop_item(r#"{"source":"palette","kind":"text"}"#, r#"{"target":"gap","index":0}"#)
            .unwrap();
        let json = editor.document_json().unwrap();

        let reopened = Editor::open_document(&json).unwrap();
        assert_eq!(reopened.nodes().unwrap(), editor.nodes().unwrap());
        assert!(!reopened.can_undo());
    }
}
