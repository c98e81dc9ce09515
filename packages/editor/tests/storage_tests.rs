//! File-backed page storage

use pagecraft_editor::{
    Document, EditSession, FileStorage, GridCell, Mutation, Node, PageMeta, PageStorage,
    StorageError,
};
use tempfile::TempDir;

fn page(title: &str) -> Document {
    Document::with_nodes(
        PageMeta::new(title),
        vec![
            Node::new("h", "heading").with_content(title),
            Node::new("g", "grid").with_cell(GridCell::new(0, 1), Node::new("t", "text")),
        ],
    )
}

#[test]
fn test_save_creates_page_file() {
    let dir = TempDir::new().unwrap();
    let mut storage = FileStorage::new(dir.path().join("pages"));

    let stored = storage.save(&page("About Us")).unwrap();
    assert_eq!(stored.meta.slug, "about-us");
    assert!(stored.meta.id.is_some());
    assert!(stored.meta.updated_at.is_some());
    assert!(storage.page_path("about-us").exists());

    let loaded = storage.load("about-us").unwrap();
    assert_eq!(loaded.nodes, stored.nodes);
    assert_eq!(loaded.meta.id, stored.meta.id);
}

#[test]
fn test_load_by_id() {
    let dir = TempDir::new().unwrap();
    let mut storage = FileStorage::new(dir.path());

    storage.save(&page("First")).unwrap();
    let second = storage.save(&page("Second")).unwrap();
    let id = second.meta.id.unwrap();

    assert_eq!(storage.load(&id).unwrap().meta.slug, "second");
}

#[test]
fn test_resave_keeps_id() {
    let dir = TempDir::new().unwrap();
    let mut storage = FileStorage::new(dir.path());

    let first = storage.save(&page("Home")).unwrap();
    let mut fresh = page("Home");
    fresh.meta.id = None;
    let second = storage.save(&fresh).unwrap();

    assert_eq!(first.meta.id, second.meta.id);
    assert_eq!(storage.list().unwrap().len(), 1);
}

#[test]
fn test_publish_writes_snapshot() {
    let dir = TempDir::new().unwrap();
    let mut storage = FileStorage::new(dir.path());

    storage.publish(&page("Blog")).unwrap();
    assert!(storage.published_path("blog").exists());
    assert!(storage.load("blog").unwrap().meta.published);

    // Published snapshots are not listed as separate pages
    let pages = storage.list().unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].slug, "blog");
}

#[test]
fn test_missing_page() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());
    assert!(matches!(storage.load("nope"), Err(StorageError::NotFound(_))));
    assert!(storage.list().unwrap().is_empty());
}

#[test]
fn test_corrupt_page_file_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    let storage = FileStorage::new(dir.path());

    assert!(matches!(
        storage.load("broken"),
        Err(StorageError::Serialization(_))
    ));
}

#[test]
fn test_id_lookup_skips_corrupt_siblings() {
    let dir = TempDir::new().unwrap();
    let mut storage = FileStorage::new(dir.path());
    let stored = storage.save(&page("Home")).unwrap();
    std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

    let id = stored.meta.id.unwrap();
    assert_eq!(storage.load(&id).unwrap().meta.slug, "home");
    assert!(matches!(
        storage.load("5f0c-missing-id"),
        Err(StorageError::NotFound(_))
    ));
}

#[test]
fn test_page_file_with_leaf_children_is_rejected() {
    let dir = TempDir::new().unwrap();
    let text = r#"{
        "meta": { "title": "Bad", "slug": "bad" },
        "nodes": [ { "id": "b", "type": "button", "children": [ { "id": "t", "type": "text" } ] } ]
    }"#;
    std::fs::write(dir.path().join("bad.json"), text).unwrap();
    let storage = FileStorage::new(dir.path());

    assert!(matches!(storage.load("bad"), Err(StorageError::Invalid(_))));
}

#[test]
fn test_session_round_trip_through_files() {
    let dir = TempDir::new().unwrap();
    let mut storage = FileStorage::new(dir.path());

    let mut session = EditSession::new("writer", Document::new(PageMeta::new("Landing")));
    let hero = session.create_node("hero");
    let hero_id = hero.id.clone();
    session.apply(Mutation::AddRoot { node: hero });
    let button = session.create_node("button");
    session.apply(Mutation::AddIntoSlot {
        container_id: hero_id,
        node: button,
        slot: None,
    });
    session.save(&mut storage).unwrap();

    let reopened = EditSession::load("reader", &storage, "landing").unwrap();
    assert_eq!(reopened.nodes(), session.nodes());
    assert!(!reopened.can_undo());
}
