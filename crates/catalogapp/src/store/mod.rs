//! # Storage Layer
//!
//! The authoritative catalog lives in a remote relational store. The engine only
//! ever talks to it through the [`RemoteStore`] trait, which mirrors the five
//! primitives a PostgREST-style table exposes: select, insert, update, delete
//! and upsert, all keyed by the string `id` column.
//!
//! ## Implementations
//!
//! - [`rest::RestStore`]: Production HTTP client for a PostgREST endpoint
//!   (Supabase and friends). Blocking, one request per call, no retries.
//!
//! - [`fs_backend::FileStore`]: A JSON array on disk. Each mutation rewrites the
//!   file through a temp file + rename, so a failed call leaves it untouched.
//!   Useful for local catalogs and for end-to-end tests of the CLI.
//!
//! - [`mem_backend::MemStore`]: In-memory fake for tests, with per-operation
//!   failure injection and a call log.
//!
//! ## Error Contract
//!
//! Backends report failures as [`StoreError`]. Two kinds carry meaning the
//! engine relies on:
//! - `Conflict`: an insert was rejected because the id already exists.
//! - `NotFound`: an update or delete matched no row.
//!
//! Everything else is opaque and surfaced verbatim.

use crate::model::{RawRecord, RecordPatch};
use thiserror::Error;

pub mod fs_backend;
pub mod mem_backend;
pub mod rest;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("duplicate key '{0}'")]
    Conflict(String),

    #[error("no row with id '{0}'")]
    NotFound(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("undecodable response: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised by `MemStore` when a test asks an operation to fail.
    #[error("simulated {0} failure")]
    Injected(&'static str),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Row filter for `select`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    /// Restrict to a single identifier.
    pub id: Option<String>,
    /// Order by `created_at` descending. Rows without a creation time sort last.
    pub newest_first: bool,
}

impl Selector {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn newest_first() -> Self {
        Self {
            id: None,
            newest_first: true,
        }
    }

    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            newest_first: false,
        }
    }
}

/// Abstract interface for the remote product table.
///
/// All calls are blocking request/response. Implementations must not retry:
/// callers decide whether to re-run a whole operation.
pub trait RemoteStore {
    /// Fetch rows matching the selector.
    fn select(&self, selector: &Selector) -> StoreResult<Vec<RawRecord>>;

    /// Insert a new row. Fails with `Conflict` if the id is taken.
    fn insert(&self, record: &RawRecord) -> StoreResult<RawRecord>;

    /// Apply a partial update to one row. Fails with `NotFound` if no row matched.
    fn update(&self, id: &str, patch: &RecordPatch) -> StoreResult<RawRecord>;

    /// Remove one row. Fails with `NotFound` if no row matched.
    fn delete(&self, id: &str) -> StoreResult<()>;

    /// Insert or fully replace the row with the same id.
    fn upsert(&self, record: &RawRecord) -> StoreResult<RawRecord>;

    /// Convenience: fetch a single row by id.
    fn get(&self, id: &str) -> StoreResult<Option<RawRecord>> {
        Ok(self.select(&Selector::by_id(id))?.into_iter().next())
    }
}

impl<T: RemoteStore + ?Sized> RemoteStore for Box<T> {
    fn select(&self, selector: &Selector) -> StoreResult<Vec<RawRecord>> {
        (**self).select(selector)
    }

    fn insert(&self, record: &RawRecord) -> StoreResult<RawRecord> {
        (**self).insert(record)
    }

    fn update(&self, id: &str, patch: &RecordPatch) -> StoreResult<RawRecord> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        (**self).delete(id)
    }

    fn upsert(&self, record: &RawRecord) -> StoreResult<RawRecord> {
        (**self).upsert(record)
    }

    fn get(&self, id: &str) -> StoreResult<Option<RawRecord>> {
        (**self).get(id)
    }
}

/// Applies a selector to an in-process row set. Shared by the local backends.
pub(crate) fn filter_rows(rows: &[RawRecord], selector: &Selector) -> Vec<RawRecord> {
    let mut out: Vec<RawRecord> = rows
        .iter()
        .filter(|r| match &selector.id {
            Some(id) => r.id.as_deref() == Some(id.as_str()),
            None => true,
        })
        .cloned()
        .collect();

    if selector.newest_first {
        // Stable sort keeps insertion order among equal timestamps.
        out.sort_by(|a, b| match (a.created_at, b.created_at) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }
    out
}

pub(crate) fn require_id(record: &RawRecord) -> StoreResult<&str> {
    match record.id.as_deref() {
        Some(id) if !id.trim().is_empty() => Ok(id),
        _ => Err(StoreError::Rejected {
            status: 400,
            body: "record has no id".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(id: &str, secs: Option<i64>) -> RawRecord {
        let mut r = RawRecord::new(id, id);
        r.created_at = secs.map(|s| Utc.timestamp_opt(s, 0).unwrap());
        r
    }

    #[test]
    fn newest_first_orders_by_creation_desc_with_missing_last() {
        let rows = vec![at("a", Some(10)), at("b", None), at("c", Some(30))];
        let ids: Vec<_> = filter_rows(&rows, &Selector::newest_first())
            .into_iter()
            .map(|r| r.id.unwrap())
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn by_id_selects_single_row() {
        let rows = vec![at("a", None), at("b", None)];
        let found = filter_rows(&rows, &Selector::by_id("b"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id_str(), "b");
    }
}
