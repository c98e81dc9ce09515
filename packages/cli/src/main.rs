mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::*;
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Pagecraft CLI - edit page-builder documents from the terminal
#[derive(Parser, Debug)]
#[command(name = "pagecraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Pagecraft project
    Init(InitArgs),

    /// Create an empty page
    New(NewArgs),

    /// List pages
    List,

    /// Print a page's node tree
    Show(ShowArgs),

    /// Add a node from the palette
    Add(AddArgs),

    /// Delete a node and its subtree
    Delete(DeleteArgs),

    /// Duplicate a node with fresh ids
    Duplicate(DuplicateArgs),

    /// Move a node within the page
    Move(MoveArgs),

    /// Add or remove a container column
    Column(ColumnArgs),

    /// Apply a JSON batch of mutations
    Apply(ApplyArgs),

    /// Replace a page's nodes from a JSON file
    Import(ImportArgs),

    /// Write a page's nodes as JSON
    Export(ExportArgs),

    /// Publish a page
    Publish(PublishArgs),
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let config = Config::load(&cwd)?;
    init_tracing(&config.log_level);
    tracing::debug!(cwd = %cwd.display(), pages = %config.pages_dir, "project loaded");

    let mut project = Project::new(cwd.clone(), config);
    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::New(args) => new_page(args, &mut project),
        Command::List => list(&project),
        Command::Show(args) => show(args, &project),
        Command::Add(args) => add(args, &mut project),
        Command::Delete(args) => delete(args, &mut project),
        Command::Duplicate(args) => duplicate(args, &mut project),
        Command::Move(args) => move_node(args, &mut project),
        Command::Column(args) => column(args, &mut project),
        Command::Apply(args) => apply(args, &mut project),
        Command::Import(args) => import(args, &mut project),
        Command::Export(args) => export(args, &project),
        Command::Publish(args) => publish(args, &mut project),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
