use super::{parse_assignment, slot_from, Project};
use anyhow::{anyhow, Context, Result};
use clap::{ArgGroup, Args};
use colored::Colorize;
use pagecraft_editor::{store, EditSession, Mutation, MutationResult};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Page slug or id
    pub page: String,

    /// Node type (heading, text, button, image, container, grid, ...)
    pub kind: String,

    /// Insert after this node
    #[arg(long, conflicts_with_all = ["into", "at"])]
    pub after: Option<String>,

    /// Place into this container or grid
    #[arg(long, conflicts_with = "at")]
    pub into: Option<String>,

    /// Column slot inside the container
    #[arg(long, requires = "into")]
    pub slot: Option<u32>,

    /// Grid cell as ROW-COL
    #[arg(long, requires = "into", conflicts_with = "slot")]
    pub cell: Option<String>,

    /// Insert into the root sequence at this index
    #[arg(long)]
    pub at: Option<usize>,

    /// Text content
    #[arg(long)]
    pub content: Option<String>,

    /// Set a prop (repeatable)
    #[arg(long = "prop", value_name = "KEY=VALUE")]
    pub props: Vec<String>,

    /// Set a style property (repeatable)
    #[arg(long = "style", value_name = "KEY=VALUE")]
    pub styles: Vec<String>,
}

pub fn add(args: AddArgs, project: &mut Project) -> Result<()> {
    let mut session = project.open(&args.page)?;

    let mut node = session.create_node(args.kind.as_str());
    if let Some(content) = args.content {
        node.content = Some(content);
    }
    for prop in &args.props {
        let (key, value) = parse_assignment(prop)?;
        node.props.insert(key, value);
    }
    for style in &args.styles {
        let (key, value) = parse_assignment(style)?;
        node.style.insert(key, value);
    }

    let (kind, id) = (node.kind.clone(), node.id.clone());
    let mutation = match (args.after, args.into, args.at) {
        (Some(target_id), _, _) => Mutation::AddAfter { target_id, node },
        (_, Some(container_id), _) => Mutation::AddIntoSlot {
            container_id,
            node,
            slot: slot_from(args.slot, args.cell.as_deref())?,
        },
        (_, _, Some(index)) => Mutation::InsertAt { index, node },
        _ => Mutation::AddRoot { node },
    };

    commit(&mut session, project, mutation)?;
    println!("{} Added {} {}", "✓".green(), kind.to_string().cyan(), id.bright_white());
    Ok(())
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Page slug or id
    pub page: String,

    /// Node to remove (with its subtree)
    pub node_id: String,
}

pub fn delete(args: DeleteArgs, project: &mut Project) -> Result<()> {
    let mut session = project.open(&args.page)?;
    let removed = store::find_by_id(session.nodes(), &args.node_id)
        .map(|node| store::count_nodes(std::slice::from_ref(node)))
        .unwrap_or_default();

    commit(
        &mut session,
        project,
        Mutation::DeleteNode {
            node_id: args.node_id.clone(),
        },
    )?;
    println!(
        "{} Deleted {} ({} node{})",
        "✓".green(),
        args.node_id.bright_white(),
        removed,
        if removed == 1 { "" } else { "s" }
    );
    Ok(())
}

#[derive(Debug, Args)]
pub struct DuplicateArgs {
    /// Page slug or id
    pub page: String,

    /// Node to duplicate
    pub node_id: String,
}

pub fn duplicate(args: DuplicateArgs, project: &mut Project) -> Result<()> {
    let mut session = project.open(&args.page)?;
    let before = store::collect_ids(session.nodes());

    commit(
        &mut session,
        project,
        Mutation::DuplicateNode {
            node_id: args.node_id.clone(),
        },
    )?;

    let copy = store::collect_ids(session.nodes())
        .into_iter()
        .find(|id| !before.contains(id))
        .unwrap_or_default();
    println!(
        "{} Duplicated {} as {}",
        "✓".green(),
        args.node_id.bright_white(),
        copy.bright_white()
    );
    Ok(())
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("destination").required(true).args(["up", "down", "to", "into"])))]
pub struct MoveArgs {
    /// Page slug or id
    pub page: String,

    /// Node to move
    pub node_id: String,

    /// Swap with the previous root node
    #[arg(long)]
    pub up: bool,

    /// Swap with the next root node
    #[arg(long)]
    pub down: bool,

    /// Move to this index in the root sequence
    #[arg(long)]
    pub to: Option<usize>,

    /// Move into this container or grid
    #[arg(long)]
    pub into: Option<String>,

    /// Column slot inside the container
    #[arg(long, requires = "into")]
    pub slot: Option<u32>,

    /// Grid cell as ROW-COL
    #[arg(long, requires = "into", conflicts_with = "slot")]
    pub cell: Option<String>,
}

pub fn move_node(args: MoveArgs, project: &mut Project) -> Result<()> {
    let mut session = project.open(&args.page)?;
    let node_id = args.node_id.clone();

    let mutation = if args.up {
        Mutation::MoveUp { node_id }
    } else if args.down {
        Mutation::MoveDown { node_id }
    } else if let Some(to) = args.to {
        let from = store::root_index(session.nodes(), &node_id)
            .ok_or_else(|| anyhow!("{node_id:?} is not a root-level node"))?;
        Mutation::Reorder { from, to }
    } else if let Some(container_id) = args.into {
        Mutation::MoveIntoSlot {
            node_id,
            container_id,
            slot: slot_from(args.slot, args.cell.as_deref())?,
        }
    } else {
        return Err(anyhow!("Nowhere to move {node_id:?}"));
    };

    let result = commit(&mut session, project, mutation)?;
    if result.changed {
        println!("{} Moved {}", "✓".green(), args.node_id.bright_white());
    } else {
        println!("{} {} is already there", "⚠️".yellow(), args.node_id.bright_white());
    }
    Ok(())
}

#[derive(Debug, Args)]
pub struct ColumnArgs {
    /// Page slug or id
    pub page: String,

    /// Container to change
    pub container_id: String,

    /// Remove a column instead of adding one
    #[arg(long)]
    pub remove: bool,
}

pub fn column(args: ColumnArgs, project: &mut Project) -> Result<()> {
    let mut session = project.open(&args.page)?;
    let container_id = args.container_id.clone();
    let mutation = if args.remove {
        Mutation::RemoveColumn { container_id }
    } else {
        Mutation::AddColumn { container_id }
    };

    commit(&mut session, project, mutation)?;
    let columns = store::find_by_id(session.nodes(), &args.container_id)
        .map(|node| node.columns())
        .unwrap_or_default();
    println!(
        "{} {} now has {} column{}",
        "✓".green(),
        args.container_id.bright_white(),
        columns,
        if columns == 1 { "" } else { "s" }
    );
    Ok(())
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Page slug or id
    pub page: String,

    /// JSON file holding an array of mutations
    pub file: PathBuf,
}

/// Run a batch of mutations; the page is saved only if every one applies
pub fn apply(args: ApplyArgs, project: &mut Project) -> Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Cannot read {}", args.file.display()))?;
    let mutations: Vec<Mutation> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a mutation list", args.file.display()))?;

    let mut session = project.open(&args.page)?;
    let mut changed = 0;
    for (index, mutation) in mutations.into_iter().enumerate() {
        let label = mutation.describe();
        let result = session
            .try_apply(mutation)
            .with_context(|| format!("Mutation #{index} ({label}) failed"))?;
        if result.changed {
            changed += 1;
        }
        println!("  {} {}", "✓".green(), label);
    }

    if changed > 0 {
        project.save(&mut session)?;
    }
    println!(
        "{} Applied {} mutation{} (version {})",
        "✅".green(),
        changed,
        if changed == 1 { "" } else { "s" },
        session.document().version
    );
    Ok(())
}

/// Apply strictly and save when something changed
fn commit(
    session: &mut EditSession,
    project: &mut Project,
    mutation: Mutation,
) -> Result<MutationResult> {
    let result = session.try_apply(mutation)?;
    if result.changed {
        project.save(session)?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use pagecraft_editor::{Document, NodeKind, PageMeta, PageStorage};
    use tempfile::TempDir;

    fn project(dir: &TempDir) -> Project {
        let mut project = Project::new(dir.path().to_path_buf(), Config::default());
        project
            .storage
            .save(&Document::new(PageMeta::new("Home")))
            .unwrap();
        project
    }

    fn add_args(kind: &str) -> AddArgs {
        AddArgs {
            page: "home".into(),
            kind: kind.into(),
            after: None,
            into: None,
            slot: None,
            cell: None,
            at: None,
            content: None,
            props: vec![],
            styles: vec![],
        }
    }

    #[test]
    fn test_add_persists_node() {
        let dir = TempDir::new().unwrap();
        let mut project = project(&dir);

        let mut args = add_args("heading");
        args.content = Some("Welcome".into());
        args.props = vec!["level=1".into()];
        add(args, &mut project).unwrap();

        let page = project.storage.load("home").unwrap();
        assert_eq!(page.nodes.len(), 1);
        assert_eq!(page.nodes[0].kind, NodeKind::Heading);
        assert_eq!(page.nodes[0].content.as_deref(), Some("Welcome"));
        assert_eq!(page.nodes[0].props["level"], 1);
    }

    #[test]
    fn test_add_into_grid_cell() {
        let dir = TempDir::new().unwrap();
        let mut project = project(&dir);
        add(add_args("grid"), &mut project).unwrap();
        let grid_id = project.storage.load("home").unwrap().nodes[0].id.clone();

        let mut args = add_args("text");
        args.into = Some(grid_id);
        args.cell = Some("1-2".into());
        add(args, &mut project).unwrap();

        let page = project.storage.load("home").unwrap();
        assert!(page.nodes[0].grid_data.as_ref().unwrap().contains_key("1-2"));
    }

    #[test]
    fn test_unknown_target_fails_without_saving() {
        let dir = TempDir::new().unwrap();
        let mut project = project(&dir);

        let mut args = add_args("text");
        args.after = Some("ghost".into());
        assert!(add(args, &mut project).is_err());
        assert!(project.storage.load("home").unwrap().nodes.is_empty());
    }

    #[test]
    fn test_apply_batch_is_all_or_nothing() {
        let dir = TempDir::new().unwrap();
        let mut project = project(&dir);
        let batch = dir.path().join("batch.json");
        fs::write(
            &batch,
            r#"[
                { "op": "add_root", "node": { "id": "a", "type": "heading" } },
                { "op": "delete_node", "node_id": "ghost" }
            ]"#,
        )
        .unwrap();

        let args = ApplyArgs {
            page: "home".into(),
            file: batch.clone(),
        };
        assert!(apply(args, &mut project).is_err());
        assert!(project.storage.load("home").unwrap().nodes.is_empty());

        fs::write(
            &batch,
            r#"[
                { "op": "add_root", "node": { "id": "a", "type": "heading" } },
                { "op": "add_root", "node": { "id": "b", "type": "text" } },
                { "op": "reorder", "from": 1, "to": 0 }
            ]"#,
        )
        .unwrap();
        let args = ApplyArgs {
            page: "home".into(),
            file: batch,
        };
        apply(args, &mut project).unwrap();

        let ids: Vec<_> = project
            .storage
            .load("home")
            .unwrap()
            .nodes
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_move_and_duplicate() {
        let dir = TempDir::new().unwrap();
        let mut project = project(&dir);
        add(add_args("heading"), &mut project).unwrap();
        add(add_args("text"), &mut project).unwrap();
        let text_id = project.storage.load("home").unwrap().nodes[1].id.clone();

        let args = MoveArgs {
            page: "home".into(),
            node_id: text_id.clone(),
            up: true,
            down: false,
            to: None,
            into: None,
            slot: None,
            cell: None,
        };
        move_node(args, &mut project).unwrap();
        assert_eq!(project.storage.load("home").unwrap().nodes[0].id, text_id);

        duplicate(
            DuplicateArgs {
                page: "home".into(),
                node_id: text_id.clone(),
            },
            &mut project,
        )
        .unwrap();
        let page = project.storage.load("home").unwrap();
        assert_eq!(page.nodes.len(), 3);
        assert_eq!(page.nodes[1].kind, NodeKind::Text);
        assert_ne!(page.nodes[1].id, text_id);
    }
}
