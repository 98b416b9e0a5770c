//! # Command Layer
//!
//! The **core business logic** of the catalog engine. Each command lives in its
//! own submodule and is a plain function over a [`RemoteStore`](crate::store::RemoteStore).
//!
//! ## Role and Responsibilities
//!
//! Commands:
//! - Validate the request against the current store state
//! - Apply it through the store primitives
//! - Verify what the store reports back
//! - Return a structured [`CmdResult`] (records, messages, reports)
//!
//! ## What Commands Do NOT Do
//!
//! - **Terminal I/O**: no stdout/stderr, no colors, no exit codes
//! - **Argument parsing**: that's the CLI layer's job
//! - **Retries**: a failed command is re-run by the operator, not looped here
//!
//! Structured logging through `tracing` is fine: it goes wherever the
//! embedding application routes it.
//!
//! ## Testing Strategy
//!
//! **This is where the lion's share of testing lives.** Tests run against
//! `MemStore`, which can be told to fail individual primitives to exercise
//! partial-failure paths.
//!
//! ## Command Modules
//!
//! - [`sync`]: Full sync, store → canonical records → artifact
//! - [`rename`]: Change a product's name
//! - [`archive`]: Archive / unarchive a product
//! - [`rekey`]: Move a product to a new identifier
//! - [`batch`]: Run an explicit list of maintenance operations
//! - [`list`]: Show canonical records
//! - [`seed`]: Upsert raw records into the store

use crate::artifact::PreparedWrite;
use crate::model::{CanonicalRecord, RawRecord};
use crate::normalize::NormalizeWarning;
use std::path::PathBuf;

pub mod archive;
pub mod batch;
pub mod list;
pub mod rekey;
pub mod rename;
pub mod seed;
pub mod sync;

pub use batch::{BatchSummary, MaintenanceOp, OpOutcome, OpStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// What a sync run did (or, for a dry run, would do) to the artifact.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub path: PathBuf,
    pub records: usize,
    pub changed: bool,
    pub written: bool,
    pub warnings: Vec<NormalizeWarning>,
}

impl SyncReport {
    fn new(prepared: &PreparedWrite, written: bool, warnings: Vec<NormalizeWarning>) -> Self {
        Self {
            path: prepared.path.clone(),
            records: prepared.records,
            changed: prepared.changed,
            written,
            warnings,
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Store rows as they stand after the command mutated them.
    pub affected_records: Vec<RawRecord>,
    pub listed_records: Vec<CanonicalRecord>,
    pub messages: Vec<CmdMessage>,
    pub sync: Option<SyncReport>,
    pub batch: Option<BatchSummary>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_records(mut self, records: Vec<RawRecord>) -> Self {
        self.affected_records = records;
        self
    }

    pub fn with_listed_records(mut self, records: Vec<CanonicalRecord>) -> Self {
        self.listed_records = records;
        self
    }
}
