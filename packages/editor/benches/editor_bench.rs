use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pagecraft_editor::{
    create_node, export_nodes, import_nodes, EditSession, IdGenerator, Mutation, Node, PageMeta,
    Document,
};

fn build_page(sections: usize) -> Vec<Node> {
    let mut ids = IdGenerator::from_seed("bench");
    let mut nodes = Vec::new();
    for _ in 0..sections {
        let mut container = create_node("container", &mut ids);
        for kind in ["heading", "text", "button", "image"] {
            container = container.with_child(create_node(kind, &mut ids));
        }
        nodes.push(container);
    }
    nodes
}

fn duplicate_section(c: &mut Criterion) {
    let tree = build_page(50);
    let target = tree[25].id.clone();
    let mut ids = IdGenerator::from_seed("dup");

    c.bench_function("duplicate_section", |b| {
        b.iter(|| {
            Mutation::DuplicateNode {
                node_id: target.clone(),
            }
            .apply(black_box(&tree), &mut ids)
        })
    });
}

fn commit_and_undo(c: &mut Criterion) {
    c.bench_function("commit_and_undo_100", |b| {
        b.iter(|| {
            let doc = Document::with_nodes(PageMeta::new("Bench"), build_page(20));
            let mut session = EditSession::new("bench", doc);
            for _ in 0..100 {
                let node = session.create_node("text");
                session.apply(Mutation::AddRoot { node });
            }
            while session.undo() {}
        })
    });
}

fn export_import(c: &mut Criterion) {
    let tree = build_page(50);
    let text = export_nodes(&tree).unwrap();

    c.bench_function("import_page", |b| b.iter(|| import_nodes(black_box(&text))));
}

criterion_group!(benches, duplicate_section, commit_and_undo, export_import);
criterion_main!(benches);
