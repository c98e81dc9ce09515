//! Comprehensive mutation tests

use pagecraft_editor::{store, GridCell, IdGenerator, Mutation, MutationError, Node, NodeKind};

fn ids() -> IdGenerator {
    IdGenerator::from_seed("mt")
}

fn apply(tree: &[Node], mutation: Mutation) -> Vec<Node> {
    mutation.apply(tree, &mut ids())
}

fn root_ids(tree: &[Node]) -> Vec<&str> {
    tree.iter().map(|n| n.id.as_str()).collect()
}

fn page() -> Vec<Node> {
    vec![
        Node::new("h1", "heading").with_content("Title"),
        Node::new("c1", "container")
            .with_prop("columns", 2)
            .with_child(Node::new("b1", "button"))
            .with_child(Node::new("b2", "button")),
        Node::new("g1", "grid")
            .with_prop("rows", 2)
            .with_prop("columns", 2)
            .with_cell(GridCell::new(0, 0), Node::new("t1", "text")),
        Node::new("f1", "footer"),
    ]
}

#[test]
fn test_add_root_appends() {
    let tree = page();
    let next = apply(&tree, Mutation::AddRoot {
        node: Node::new("x", "spacer"),
    });
    assert_eq!(next.len(), 5);
    assert_eq!(next[4].id, "x");
    // Input untouched
    assert_eq!(tree.len(), 4);
}

#[test]
fn test_insert_at_clamps_index() {
    let tree = page();
    let next = apply(&tree, Mutation::InsertAt {
        index: 1,
        node: Node::new("x", "divider"),
    });
    assert_eq!(root_ids(&next), vec!["h1", "x", "c1", "g1", "f1"]);

    let next = apply(&tree, Mutation::InsertAt {
        index: 99,
        node: Node::new("x", "divider"),
    });
    assert_eq!(next.last().map(|n| n.id.as_str()), Some("x"));
}

#[test]
fn test_add_after_root_and_nested() {
    let tree = page();

    let next = apply(&tree, Mutation::AddAfter {
        target_id: "h1".into(),
        node: Node::new("x", "text"),
    });
    assert_eq!(root_ids(&next), vec!["h1", "x", "c1", "g1", "f1"]);

    let next = apply(&tree, Mutation::AddAfter {
        target_id: "b1".into(),
        node: Node::new("x", "text"),
    });
    let children: Vec<_> = next[1].children().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(children, vec!["b1", "x", "b2"]);
}

#[test]
fn test_add_after_missing_target_is_noop() {
    let tree = page();
    let next = apply(&tree, Mutation::AddAfter {
        target_id: "ghost".into(),
        node: Node::new("x", "text"),
    });
    assert_eq!(next, tree);
}

#[test]
fn test_add_after_grid_cell_is_noop() {
    let tree = page();
    let mutation = Mutation::AddAfter {
        target_id: "t1".into(),
        node: Node::new("x", "text"),
    };
    assert_eq!(
        mutation.try_apply(&tree, &mut ids()),
        Err(MutationError::NoEnclosingList("t1".into()))
    );
}

#[test]
fn test_add_into_container_slots() {
    let tree = page();

    // Occupied position: inserted right after it
    let next = apply(&tree, Mutation::AddIntoSlot {
        container_id: "c1".into(),
        node: Node::new("x", "image"),
        slot: Some(0),
    });
    let children: Vec<_> = next[1].children().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(children, vec!["b1", "x", "b2"]);

    // Empty position, even past props.columns: appended
    let next = apply(&tree, Mutation::AddIntoSlot {
        container_id: "c1".into(),
        node: Node::new("x", "image"),
        slot: Some(7),
    });
    assert_eq!(next[1].children()[2].id, "x");

    // No slot: appended
    let next = apply(&tree, Mutation::AddIntoSlot {
        container_id: "c1".into(),
        node: Node::new("x", "image"),
        slot: None,
    });
    assert_eq!(next[1].children()[2].id, "x");
}

#[test]
fn test_slot_past_end_of_empty_container_lands_first() {
    let tree = vec![Node::new("c", "container").with_prop("columns", 4)];
    let next = apply(&tree, Mutation::AddIntoSlot {
        container_id: "c".into(),
        node: Node::new("x", "button"),
        slot: Some(3),
    });
    let children: Vec<_> = next[0].children().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(children, vec!["x"]);
}

#[test]
fn test_add_into_grid_cell_replaces_occupant() {
    let tree = page();
    let next = apply(&tree, Mutation::AddIntoSlot {
        container_id: "g1".into(),
        node: Node::new("x", "image"),
        slot: Some(0),
    });

    let grid = &next[2];
    assert_eq!(grid.cell(GridCell::new(0, 0)).map(|n| n.id.as_str()), Some("x"));
    assert!(!store::contains(&next, "t1"));
    assert!(grid.children().is_empty());
}

#[test]
fn test_add_into_grid_without_slot_appends_child() {
    let tree = page();
    let next = apply(&tree, Mutation::AddIntoSlot {
        container_id: "g1".into(),
        node: Node::new("x", "image"),
        slot: None,
    });
    assert_eq!(next[2].children()[0].id, "x");
}

#[test]
fn test_add_into_nested_container() {
    let tree = vec![Node::new("s", "section").with_child(Node::new("c", "container"))];
    let next = apply(&tree, Mutation::AddIntoSlot {
        container_id: "c".into(),
        node: Node::new("x", "text"),
        slot: Some(0),
    });
    assert_eq!(next[0].children()[0].children()[0].id, "x");
}

#[test]
fn test_insert_rejects_duplicate_ids() {
    let tree = page();
    let mutation = Mutation::AddRoot {
        node: Node::new("b1", "button"),
    };
    assert_eq!(
        mutation.try_apply(&tree, &mut ids()),
        Err(MutationError::DuplicateId("b1".into()))
    );
    assert_eq!(mutation.apply(&tree, &mut ids()), tree);
}

#[test]
fn test_update_node_replaces_subtree() {
    let tree = page();
    let replacement = Node::new("c1", "container")
        .with_prop("columns", 3)
        .with_child(Node::new("b2", "button").with_content("Kept"));

    let next = apply(&tree, Mutation::UpdateNode {
        node_id: "c1".into(),
        node: replacement.clone(),
    });
    assert_eq!(next[1], replacement);
    assert!(!store::contains(&next, "b1"));
}

#[test]
fn test_update_grid_cell() {
    let tree = page();
    let next = apply(&tree, Mutation::UpdateNode {
        node_id: "t1".into(),
        node: Node::new("t1", "text").with_content("Edited"),
    });
    let cell = next[2].cell(GridCell::new(0, 0)).unwrap();
    assert_eq!(cell.content.as_deref(), Some("Edited"));
}

#[test]
fn test_update_rejects_kind_change_and_id_mismatch() {
    let tree = page();

    let kind_change = Mutation::UpdateNode {
        node_id: "h1".into(),
        node: Node::new("h1", "text"),
    };
    assert!(matches!(
        kind_change.try_apply(&tree, &mut ids()),
        Err(MutationError::KindChanged { .. })
    ));

    let mismatch = Mutation::UpdateNode {
        node_id: "h1".into(),
        node: Node::new("other", "heading"),
    };
    assert!(matches!(
        mismatch.try_apply(&tree, &mut ids()),
        Err(MutationError::IdMismatch { .. })
    ));

    let collision = Mutation::UpdateNode {
        node_id: "c1".into(),
        node: Node::new("c1", "container").with_child(Node::new("h1", "heading")),
    };
    assert_eq!(
        collision.try_apply(&tree, &mut ids()),
        Err(MutationError::DuplicateId("h1".into()))
    );
}

#[test]
fn test_delete_removes_subtree() {
    let tree = page();
    let next = apply(&tree, Mutation::DeleteNode {
        node_id: "c1".into(),
    });
    assert_eq!(root_ids(&next), vec!["h1", "g1", "f1"]);
    assert!(!store::contains(&next, "b1"));
    assert!(!store::contains(&next, "b2"));
}

#[test]
fn test_delete_nested_and_grid_cell() {
    let tree = page();

    let next = apply(&tree, Mutation::DeleteNode {
        node_id: "b1".into(),
    });
    assert_eq!(next[1].children().len(), 1);

    let next = apply(&tree, Mutation::DeleteNode {
        node_id: "t1".into(),
    });
    assert!(next[2].grid_data.as_ref().unwrap().is_empty());
}

#[test]
fn test_duplicate_inserts_fresh_copy_after_original() {
    let tree = page();
    let next = apply(&tree, Mutation::DuplicateNode {
        node_id: "c1".into(),
    });

    assert_eq!(next.len(), 5);
    let copy = &next[2];
    assert_eq!(copy.kind, NodeKind::Container);
    assert_ne!(copy.id, "c1");
    assert_eq!(copy.props, next[1].props);
    assert_eq!(copy.children().len(), 2);
    for (original, cloned) in next[1].children().iter().zip(copy.children()) {
        assert_ne!(original.id, cloned.id);
        assert_eq!(original.kind, cloned.kind);
    }
    assert!(store::duplicate_ids(&next).is_empty());
}

#[test]
fn test_duplicate_grid_refreshes_cell_ids() {
    let tree = page();
    let next = apply(&tree, Mutation::DuplicateNode {
        node_id: "g1".into(),
    });
    let copy = &next[3];
    let cell = copy.cell(GridCell::new(0, 0)).unwrap();
    assert_ne!(cell.id, "t1");
    assert!(store::duplicate_ids(&next).is_empty());
}

#[test]
fn test_duplicate_nested_child() {
    let tree = page();
    let next = apply(&tree, Mutation::DuplicateNode {
        node_id: "b1".into(),
    });
    let children = next[1].children();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0].id, "b1");
    assert_eq!(children[2].id, "b2");
}

#[test]
fn test_move_up_and_down_at_boundaries() {
    let tree = page();

    let next = apply(&tree, Mutation::MoveUp {
        node_id: "c1".into(),
    });
    assert_eq!(root_ids(&next), vec!["c1", "h1", "g1", "f1"]);

    assert_eq!(
        apply(&tree, Mutation::MoveUp {
            node_id: "h1".into()
        }),
        tree
    );
    assert_eq!(
        apply(&tree, Mutation::MoveDown {
            node_id: "f1".into()
        }),
        tree
    );
}

#[test]
fn test_move_nested_node_is_rejected() {
    let tree = page();
    let mutation = Mutation::MoveDown {
        node_id: "b1".into(),
    };
    assert_eq!(
        mutation.try_apply(&tree, &mut ids()),
        Err(MutationError::NotRootLevel("b1".into()))
    );
}

#[test]
fn test_column_count_floor() {
    let tree = page();

    let next = apply(&tree, Mutation::AddColumn {
        container_id: "c1".into(),
    });
    assert_eq!(next[1].columns(), 3);

    let mut next = tree.clone();
    for _ in 0..5 {
        next = apply(&next, Mutation::RemoveColumn {
            container_id: "c1".into(),
        });
    }
    assert_eq!(next[1].columns(), 1);
    // Children are never removed by a column change
    assert_eq!(next[1].children().len(), 2);
}

#[test]
fn test_column_change_on_leaf_is_rejected() {
    let tree = page();
    let mutation = Mutation::AddColumn {
        container_id: "h1".into(),
    };
    assert_eq!(
        mutation.try_apply(&tree, &mut ids()),
        Err(MutationError::NotAContainer("h1".into()))
    );
}

#[test]
fn test_reorder() {
    let tree = page();

    let next = apply(&tree, Mutation::Reorder { from: 0, to: 3 });
    assert_eq!(root_ids(&next), vec!["c1", "g1", "f1", "h1"]);

    let next = apply(&tree, Mutation::Reorder { from: 3, to: 1 });
    assert_eq!(root_ids(&next), vec!["h1", "f1", "c1", "g1"]);

    assert_eq!(apply(&tree, Mutation::Reorder { from: 2, to: 2 }), tree);
    assert!(matches!(
        Mutation::Reorder { from: 0, to: 9 }.try_apply(&tree, &mut ids()),
        Err(MutationError::IndexOutOfBounds { index: 9, len: 4 })
    ));
}

#[test]
fn test_move_into_slot() {
    let tree = page();
    let next = apply(&tree, Mutation::MoveIntoSlot {
        node_id: "h1".into(),
        container_id: "g1".into(),
        slot: Some(GridCell::new(1, 1).to_slot()),
    });

    assert_eq!(root_ids(&next), vec!["c1", "g1", "f1"]);
    let cell = next[1].cell(GridCell::new(1, 1)).unwrap();
    assert_eq!(cell.id, "h1");
}

#[test]
fn test_move_into_own_descendant_is_rejected() {
    let tree = vec![Node::new("s", "section").with_child(Node::new("c", "container"))];
    let mutation = Mutation::MoveIntoSlot {
        node_id: "s".into(),
        container_id: "c".into(),
        slot: None,
    };
    assert_eq!(
        mutation.try_apply(&tree, &mut ids()),
        Err(MutationError::CycleDetected)
    );
}
