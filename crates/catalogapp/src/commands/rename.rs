use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CatalogError, Result};
use crate::model::RecordPatch;
use crate::store::RemoteStore;
use tracing::info;

const OP: &str = "rename";

/// Set a product's name. Touches no other column.
pub fn run<S: RemoteStore>(store: &S, id: &str, name: &str) -> Result<CmdResult> {
    let updated = store
        .update(id, &RecordPatch::rename(name))
        .map_err(|e| CatalogError::from_store(OP, id, e))?;

    if updated.name_str() != name {
        return Err(CatalogError::Verification {
            op: OP,
            id: id.to_string(),
            reason: format!("store reports name \"{}\"", updated.name_str()),
        });
    }

    info!(op = OP, id, name, "renamed product");
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Product renamed ({}): {}",
        id, name
    )));
    Ok(result.with_affected_records(vec![updated]))
}
