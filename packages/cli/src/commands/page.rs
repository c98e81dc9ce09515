use super::Project;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_editor::{slugify, Document, Node, PageMeta, PageStorage};

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Page title
    pub title: String,

    /// Page slug (derived from the title by default)
    #[arg(short, long)]
    pub slug: Option<String>,

    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Mark as the site's home page
    #[arg(long)]
    pub homepage: bool,

    /// Overwrite a page with the same slug
    #[arg(short, long)]
    pub force: bool,
}

pub fn new_page(args: NewArgs, project: &mut Project) -> Result<()> {
    let mut meta = PageMeta::new(&args.title);
    if let Some(slug) = &args.slug {
        meta.slug = slugify(slug);
    }
    meta.description = args.description;
    meta.is_homepage = args.homepage;

    if project.storage.page_path(&meta.slug).exists() && !args.force {
        return Err(anyhow!(
            "Page {:?} already exists (use --force to overwrite)",
            meta.slug
        ));
    }

    let stored = project.storage.save(&Document::new(meta))?;
    println!(
        "{} Created page {} ({})",
        "✓".green(),
        stored.meta.slug.bright_white(),
        stored.meta.id.as_deref().unwrap_or_default().dimmed()
    );
    Ok(())
}

pub fn list(project: &Project) -> Result<()> {
    let pages = project.storage.list()?;
    if pages.is_empty() {
        println!("{}", "⚠️  No pages found".yellow());
        return Ok(());
    }

    for meta in pages {
        let mut flags = Vec::new();
        if meta.is_homepage {
            flags.push("home".cyan().to_string());
        }
        if meta.published {
            flags.push("published".green().to_string());
        }
        let updated = meta
            .updated_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "  {:<24} {:<32} {} {}",
            meta.slug.bright_white(),
            meta.title,
            updated.dimmed(),
            flags.join(" ")
        );
    }
    Ok(())
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Page slug or id
    pub page: String,

    /// Print the node array as JSON instead of a tree
    #[arg(long)]
    pub json: bool,
}

pub fn show(args: ShowArgs, project: &Project) -> Result<()> {
    let session = project.open(&args.page)?;

    if args.json {
        println!("{}", session.export_json()?);
        return Ok(());
    }

    let meta = &session.document().meta;
    println!("{} {}", meta.title.bold(), format!("/{}", meta.slug).dimmed());
    if session.nodes().is_empty() {
        println!("  {}", "(empty page)".dimmed());
    } else {
        print!("{}", render_tree(session.nodes()));
    }
    Ok(())
}

#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Page slug or id
    pub page: String,
}

pub fn publish(args: PublishArgs, project: &mut Project) -> Result<()> {
    let mut session = project.open(&args.page)?;
    session.publish(&mut project.storage)?;
    println!(
        "{} Published {}",
        "✓".green(),
        session.document().meta.slug.bright_white()
    );
    Ok(())
}

/// Indented outline of the tree, one node per line; grid cells are labelled
pub fn render_tree(nodes: &[Node]) -> String {
    let mut out = String::new();
    render_list(nodes.iter().map(|n| (None, n)).collect(), "", &mut out);
    out
}

fn render_list(items: Vec<(Option<&str>, &Node)>, prefix: &str, out: &mut String) {
    let count = items.len();
    for (i, (cell, node)) in items.into_iter().enumerate() {
        let last = i + 1 == count;
        let branch = if prefix.is_empty() && cell.is_none() {
            ""
        } else if last {
            "└─ "
        } else {
            "├─ "
        };

        out.push_str(prefix);
        out.push_str(branch);
        if let Some(key) = cell {
            out.push_str(&format!("[{key}] "));
        }
        out.push_str(&describe(node));
        out.push('\n');

        let mut nested: Vec<(Option<&str>, &Node)> =
            node.children().iter().map(|child| (None, child)).collect();
        if let Some(cells) = &node.grid_data {
            nested.extend(cells.iter().map(|(key, child)| (Some(key.as_str()), child)));
        }
        if !nested.is_empty() {
            let indent = match branch {
                "" => "  ",
                "└─ " => "   ",
                _ => "│  ",
            };
            render_list(nested, &format!("{prefix}{indent}"), out);
        }
    }
}

fn describe(node: &Node) -> String {
    let mut line = format!("{} {}", node.kind.to_string().cyan(), node.id.dimmed());
    if node.is_container() && node.props.contains_key("columns") {
        line.push_str(&format!(" columns={}", node.columns()));
    }
    if let Some(content) = node.content.as_deref() {
        let text = preview(content, 40);
        if !text.is_empty() {
            line.push_str(&format!(" {:?}", text));
        }
    }
    line
}

/// Text without markup, cut to `max` characters
fn preview(content: &str, max: usize) -> String {
    let mut text = String::new();
    let mut in_tag = false;
    for c in content.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => text.push(c),
            _ => {}
        }
    }
    let text = text.trim();
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}…")
    } else {
        text.to_string()
    }
}
