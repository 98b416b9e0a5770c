use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CatalogError, Result};
use crate::model::RawRecord;
use crate::store::RemoteStore;
use std::path::Path;
use tracing::info;

const OP: &str = "seed";

/// Read raw records from a JSON array file.
pub fn load_records(path: &Path) -> Result<Vec<RawRecord>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Upsert raw records into the store.
///
/// Every record must carry an identifier; this is checked for the whole input
/// before the first write so a bad file changes nothing.
pub fn run<S: RemoteStore>(store: &S, records: &[RawRecord]) -> Result<CmdResult> {
    for (position, record) in records.iter().enumerate() {
        if record.id.as_deref().map_or(true, |id| id.trim().is_empty()) {
            return Err(CatalogError::Normalization {
                position,
                reason: "missing identifier".to_string(),
            });
        }
    }

    let mut stored = Vec::with_capacity(records.len());
    for record in records {
        let row = store
            .upsert(record)
            .map_err(|e| CatalogError::from_store(OP, record.id_str(), e))?;
        stored.push(row);
    }

    info!(op = OP, count = stored.len(), "seeded products");
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Seeded {} products",
        stored.len()
    )));
    Ok(result.with_affected_records(stored))
}
