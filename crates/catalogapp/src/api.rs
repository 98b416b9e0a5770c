//! # API Facade
//!
//! A **thin facade** over the command layer and the single entry point for every
//! catalog operation, whatever UI drives it.
//!
//! The facade:
//! - **Dispatches** to the matching command function
//! - **Supplies ambient inputs** commands take explicitly (artifact target,
//!   category aliases, the current time)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It holds no business logic and performs no terminal I/O.
//!
//! ## Generic Over RemoteStore
//!
//! `CatalogApi<S: RemoteStore>` is generic over the store:
//! - Production: `CatalogApi<Box<dyn RemoteStore>>` built by [`crate::init`]
//! - Testing: `CatalogApi<MemStore>`

use crate::artifact::ArtifactTarget;
use crate::commands::{self, list::ListFilter, MaintenanceOp};
use crate::error::Result;
use crate::model::RawRecord;
use crate::normalize::CategoryAliases;
use crate::store::RemoteStore;
use chrono::Utc;

pub use crate::commands::{CmdMessage, CmdResult, MessageLevel};

pub struct CatalogApi<S: RemoteStore> {
    store: S,
    target: ArtifactTarget,
    aliases: CategoryAliases,
}

impl<S: RemoteStore> CatalogApi<S> {
    pub fn new(store: S, target: ArtifactTarget, aliases: CategoryAliases) -> Self {
        Self {
            store,
            target,
            aliases,
        }
    }

    pub fn sync(&self, dry_run: bool) -> Result<CmdResult> {
        commands::sync::run(&self.store, &self.target, &self.aliases, dry_run)
    }

    pub fn rename(&self, id: &str, name: &str) -> Result<CmdResult> {
        commands::rename::run(&self.store, id, name)
    }

    pub fn archive(&self, id: &str) -> Result<CmdResult> {
        commands::archive::run(&self.store, id, true, Utc::now())
    }

    pub fn unarchive(&self, id: &str) -> Result<CmdResult> {
        commands::archive::run(&self.store, id, false, Utc::now())
    }

    pub fn rekey(&self, from: &str, to: &str) -> Result<CmdResult> {
        commands::rekey::run(&self.store, from, to)
    }

    pub fn run_batch(&self, ops: &[MaintenanceOp]) -> Result<CmdResult> {
        commands::batch::run(&self.store, ops, Utc::now())
    }

    pub fn list(&self, filter: ListFilter) -> Result<CmdResult> {
        commands::list::run(&self.store, &self.aliases, filter)
    }

    pub fn seed(&self, records: &[RawRecord]) -> Result<CmdResult> {
        commands::seed::run(&self.store, records)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn target(&self) -> &ArtifactTarget {
        &self.target
    }
}
