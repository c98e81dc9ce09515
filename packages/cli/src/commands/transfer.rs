use super::{Project, CLI_SESSION};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_editor::{
    export_document, store, Document, EditSession, PageMeta, PageStorage, StorageError,
};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Page slug or id
    pub page: String,

    /// JSON file holding an array of nodes
    pub file: PathBuf,

    /// Create the page if it does not exist
    #[arg(long)]
    pub create: bool,
}

/// Replace a page's nodes with the contents of a JSON file
pub fn import(args: ImportArgs, project: &mut Project) -> Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Cannot read {}", args.file.display()))?;

    let document = match project.storage.load(&args.page) {
        Ok(document) => document,
        Err(StorageError::NotFound(_)) if args.create => Document::new(PageMeta::new(&args.page)),
        Err(error) => {
            return Err(error).with_context(|| format!("Cannot open page {:?}", args.page))
        }
    };
    let mut session =
        EditSession::with_history_limit(CLI_SESSION, document, project.config.history_limit);

    session
        .import_json(&text)
        .with_context(|| format!("{} was not imported", args.file.display()))?;
    project.save(&mut session)?;

    let count = store::count_nodes(session.nodes());
    println!(
        "{} Imported {} node{} into {}",
        "✓".green(),
        count,
        if count == 1 { "" } else { "s" },
        session.document().meta.slug.bright_white()
    );
    Ok(())
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Page slug or id
    pub page: String,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export the whole page (metadata included), not just the nodes
    #[arg(long)]
    pub document: bool,
}

pub fn export(args: ExportArgs, project: &Project) -> Result<()> {
    let session = project.open(&args.page)?;
    let text = if args.document {
        export_document(session.document())?
    } else {
        session.export_json()?
    };

    match args.output {
        Some(path) => {
            fs::write(&path, text)?;
            println!("{} Exported to {}", "✓".green(), path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}
