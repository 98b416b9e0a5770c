use crate::store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// A raw record could not be mapped into the canonical schema. Fatal to a sync run.
    #[error("Normalization error at record #{position}: {reason}")]
    Normalization { position: usize, reason: String },

    /// The artifact does not contain exactly one recognizable declaration block.
    #[error("Artifact format error in {}: {reason}", path.display())]
    ArtifactFormat { path: PathBuf, reason: String },

    #[error("Cannot access artifact {}: {source}", path.display())]
    ArtifactIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{op}: product '{id}' not found")]
    NotFound { op: &'static str, id: String },

    #[error("{op}: product '{id}' already exists")]
    Conflict { op: &'static str, id: String },

    /// Rekey inserted the new record but could not delete the old one.
    /// Both identifiers now exist and must be reconciled by hand.
    #[error(
        "rekey: inserted '{new_id}' but failed to delete '{old_id}'; both records now exist and need manual reconciliation: {source}"
    )]
    PartialMigration {
        old_id: String,
        new_id: String,
        #[source]
        source: StoreError,
    },

    #[error("{op}: store error: {source}")]
    Store {
        op: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("{op}: verification failed for '{id}': {reason}")]
    Verification {
        op: &'static str,
        id: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CatalogError {
    /// Wraps a store failure, lifting the kinds the engine gives meaning to.
    pub fn from_store(op: &'static str, id: &str, source: StoreError) -> Self {
        match source {
            StoreError::NotFound(_) => CatalogError::NotFound {
                op,
                id: id.to_string(),
            },
            StoreError::Conflict(_) => CatalogError::Conflict {
                op,
                id: id.to_string(),
            },
            other => CatalogError::Store { op, source: other },
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
