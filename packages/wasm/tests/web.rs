//! Browser tests for the bindings; run with `wasm-pack test --headless --chrome`

#![cfg(target_arch = "wasm32")]

use pagecraft_wasm::Editor;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn rejects_malformed_mutation() {
    let mut editor = Editor::new("Home");
    let err = editor.apply(r#"{"op":"explode"}"#).unwrap_err();
    assert!(err.as_string().unwrap().contains("Serialization error"));
    assert!(!editor.can_undo());
}

#[wasm_bindgen_test]
fn failed_import_keeps_tree() {
    let mut editor = Editor::new("Home");
    editor
        .drop_item(r#"{"source":"palette","kind":"button"}"#, r#"{"target":"nothing"}"#)
        .unwrap();
    let before = editor.nodes().unwrap();

    assert!(editor.import_json(r#"{"nodes":[]}"#).is_err());
    assert_eq!(editor.nodes().unwrap(), before);
    assert!(editor.can_undo());
}
