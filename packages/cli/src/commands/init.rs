use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_editor::{Document, FileStorage, PageMeta, PageStorage};
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Pages directory
    #[arg(short, long, default_value = "pages")]
    pub pages_dir: String,

    /// Undo levels kept per editing session (0 = unlimited)
    #[arg(long, default_value_t = pagecraft_editor::DEFAULT_MAX_LEVELS)]
    pub history_limit: usize,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Pagecraft project...".bright_blue().bold());

    let config = Config {
        pages_dir: args.pages_dir.clone(),
        history_limit: args.history_limit,
        ..Config::default()
    };

    // Create pages directory if it doesn't exist
    let pages_dir = config.pages_dir(cwd);
    if !pages_dir.exists() {
        fs::create_dir_all(&pages_dir)?;
        println!("  {} Created {}/", "✓".green(), args.pages_dir);
    }

    // Seed an empty home page
    let mut storage = FileStorage::new(&pages_dir);
    let mut meta = PageMeta::new("Home");
    meta.is_homepage = true;
    if !storage.page_path(&meta.slug).exists() {
        storage.save(&Document::new(meta))?;
        println!("  {} Created home page", "✓".green());
    }

    // Write config file
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: pagecraft add home heading --content \"Welcome\"");
    println!("  2. Run: pagecraft show home");
    println!("  3. Run: pagecraft publish home");

    Ok(())
}
