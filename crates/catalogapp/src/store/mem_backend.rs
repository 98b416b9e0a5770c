use super::{filter_rows, require_id, RemoteStore, Selector, StoreError, StoreResult};
use crate::model::{RawRecord, RecordPatch};
use std::cell::RefCell;
use std::collections::HashSet;

/// Store primitives, used for failure injection and the call log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Select,
    Insert,
    Update,
    Delete,
    Upsert,
}

impl StoreOp {
    fn name(self) -> &'static str {
        match self {
            StoreOp::Select => "select",
            StoreOp::Insert => "insert",
            StoreOp::Update => "update",
            StoreOp::Delete => "delete",
            StoreOp::Upsert => "upsert",
        }
    }
}

/// In-memory stand-in for the remote table.
///
/// Uses `RefCell` for interior mutability since the engine is single-threaded;
/// this lets `RemoteStore` take `&self` like the HTTP client does.
#[derive(Default)]
pub struct MemStore {
    rows: RefCell<Vec<RawRecord>>,
    failing: RefCell<HashSet<StoreOp>>,
    calls: RefCell<Vec<StoreOp>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<RawRecord>) -> Self {
        let store = Self::default();
        *store.rows.borrow_mut() = records;
        store
    }

    /// Make every subsequent call of `op` fail without touching the rows.
    pub fn fail_on(&self, op: StoreOp) {
        self.failing.borrow_mut().insert(op);
    }

    pub fn clear_failures(&self) {
        self.failing.borrow_mut().clear();
    }

    /// Snapshot of the stored rows, in storage order.
    pub fn records(&self) -> Vec<RawRecord> {
        self.rows.borrow().clone()
    }

    /// Every primitive invoked so far, in order.
    pub fn calls(&self) -> Vec<StoreOp> {
        self.calls.borrow().clone()
    }

    fn enter(&self, op: StoreOp) -> StoreResult<()> {
        self.calls.borrow_mut().push(op);
        if self.failing.borrow().contains(&op) {
            return Err(StoreError::Injected(op.name()));
        }
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.rows
            .borrow()
            .iter()
            .position(|r| r.id.as_deref() == Some(id))
    }
}

impl RemoteStore for MemStore {
    fn select(&self, selector: &Selector) -> StoreResult<Vec<RawRecord>> {
        self.enter(StoreOp::Select)?;
        Ok(filter_rows(&self.rows.borrow(), selector))
    }

    fn insert(&self, record: &RawRecord) -> StoreResult<RawRecord> {
        self.enter(StoreOp::Insert)?;
        let id = require_id(record)?;
        if self.position(id).is_some() {
            return Err(StoreError::Conflict(id.to_string()));
        }
        self.rows.borrow_mut().push(record.clone());
        Ok(record.clone())
    }

    fn update(&self, id: &str, patch: &RecordPatch) -> StoreResult<RawRecord> {
        self.enter(StoreOp::Update)?;
        let pos = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let mut rows = self.rows.borrow_mut();
        rows[pos].apply(patch);
        Ok(rows[pos].clone())
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        self.enter(StoreOp::Delete)?;
        let pos = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.rows.borrow_mut().remove(pos);
        Ok(())
    }

    fn upsert(&self, record: &RawRecord) -> StoreResult<RawRecord> {
        self.enter(StoreOp::Upsert)?;
        let id = require_id(record)?;
        match self.position(id) {
            Some(pos) => self.rows.borrow_mut()[pos] = record.clone(),
            None => self.rows.borrow_mut().push(record.clone()),
        }
        Ok(record.clone())
    }
}
