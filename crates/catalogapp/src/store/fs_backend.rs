use super::{filter_rows, require_id, RemoteStore, Selector, StoreError, StoreResult};
use crate::model::{RawRecord, RecordPatch};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Product table kept as a JSON array in a single file.
///
/// Every mutating call is load → modify → atomic save, so a call that fails
/// part way never leaves a half-written file behind.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<Vec<RawRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| StoreError::Decode(e.to_string()))
    }

    fn save(&self, rows: &[RawRecord]) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let content =
            serde_json::to_string_pretty(rows).map_err(|e| StoreError::Decode(e.to_string()))?;

        let tmp_file = dir.join(format!(".products-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content)?;
        if let Err(e) = fs::rename(&tmp_file, &self.path) {
            let _ = fs::remove_file(&tmp_file);
            return Err(e.into());
        }
        Ok(())
    }

    fn position(rows: &[RawRecord], id: &str) -> Option<usize> {
        rows.iter().position(|r| r.id.as_deref() == Some(id))
    }
}

impl RemoteStore for FileStore {
    fn select(&self, selector: &Selector) -> StoreResult<Vec<RawRecord>> {
        let rows = self.load()?;
        Ok(filter_rows(&rows, selector))
    }

    fn insert(&self, record: &RawRecord) -> StoreResult<RawRecord> {
        let id = require_id(record)?;
        let mut rows = self.load()?;
        if Self::position(&rows, id).is_some() {
            return Err(StoreError::Conflict(id.to_string()));
        }
        rows.push(record.clone());
        self.save(&rows)?;
        Ok(record.clone())
    }

    fn update(&self, id: &str, patch: &RecordPatch) -> StoreResult<RawRecord> {
        let mut rows = self.load()?;
        let pos =
            Self::position(&rows, id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        rows[pos].apply(patch);
        let updated = rows[pos].clone();
        self.save(&rows)?;
        Ok(updated)
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        let mut rows = self.load()?;
        let pos =
            Self::position(&rows, id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        rows.remove(pos);
        self.save(&rows)
    }

    fn upsert(&self, record: &RawRecord) -> StoreResult<RawRecord> {
        let id = require_id(record)?;
        let mut rows = self.load()?;
        match Self::position(&rows, id) {
            Some(pos) => rows[pos] = record.clone(),
            None => rows.push(record.clone()),
        }
        self.save(&rows)?;
        Ok(record.clone())
    }
}
