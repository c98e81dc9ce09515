//! Error types for the editor

use crate::interchange::ImportError;
use crate::mutations::MutationError;
use crate::storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
