pub mod edit;
pub mod init;
pub mod page;
pub mod transfer;

pub use edit::{add, apply, column, delete, duplicate, move_node};
pub use edit::{AddArgs, ApplyArgs, ColumnArgs, DeleteArgs, DuplicateArgs, MoveArgs};
pub use init::{init, InitArgs};
pub use page::{list, new_page, publish, show, NewArgs, PublishArgs, ShowArgs};
pub use transfer::{export, import, ExportArgs, ImportArgs};

use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use pagecraft_editor::{EditSession, FileStorage, GridCell, PageStorage};
use serde_json::Value;
use std::path::PathBuf;

/// Session id used for every CLI edit
const CLI_SESSION: &str = "cli";

/// A project directory: its config plus the page store it points at
pub struct Project {
    pub config: Config,
    pub storage: FileStorage,
}

impl Project {
    pub fn new(root: PathBuf, config: Config) -> Self {
        let storage = FileStorage::new(config.pages_dir(&root));
        Self { config, storage }
    }

    /// Open a page (by slug or id) in a fresh edit session
    pub fn open(&self, page: &str) -> Result<EditSession> {
        let document = self
            .storage
            .load(page)
            .with_context(|| format!("Cannot open page {page:?}"))?;
        Ok(EditSession::with_history_limit(
            CLI_SESSION,
            document,
            self.config.history_limit,
        ))
    }

    pub fn save(&mut self, session: &mut EditSession) -> Result<()> {
        session
            .save(&mut self.storage)
            .with_context(|| format!("Cannot save page {:?}", session.document().meta.slug))
    }
}

/// Parse `key=value`; the value is read as JSON when it parses, else as a string
pub fn parse_assignment(text: &str) -> Result<(String, Value)> {
    let (key, raw) = text
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected KEY=VALUE, got {text:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("Missing key in {text:?}"));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

/// Slot index from either `--slot N` or `--cell ROW-COL`
pub fn slot_from(slot: Option<u32>, cell: Option<&str>) -> Result<Option<u32>> {
    match (slot, cell) {
        (_, Some(cell)) => GridCell::parse_key(cell)
            .map(|cell| Some(cell.to_slot()))
            .ok_or_else(|| anyhow!("Invalid grid cell {cell:?}, expected ROW-COL")),
        (slot, None) => Ok(slot),
    }
}
