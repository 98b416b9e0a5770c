//! Identifier migration.
//!
//! The store has no "rename primary key" primitive, so a rekey is three calls:
//!
//! 1. read the row at `from` (absent → `NotFound`)
//! 2. insert a copy under `to` (duplicate → `Conflict`, nothing else happens)
//! 3. delete the row at `from`
//!
//! The copy is the store's own row with only `id` swapped, nulls included.
//! Between steps 2 and 3 both ids exist. If step 3 fails the command stops
//! with `PartialMigration` naming both ids; deciding which row is
//! authoritative is left to the operator.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CatalogError, Result};
use crate::model::RawRecord;
use crate::store::RemoteStore;
use tracing::{error, info};

const OP: &str = "rekey";

pub fn run<S: RemoteStore>(store: &S, from: &str, to: &str) -> Result<CmdResult> {
    if from == to {
        return Err(CatalogError::Conflict {
            op: OP,
            id: to.to_string(),
        });
    }

    let original = store
        .get(from)
        .map_err(|e| CatalogError::from_store(OP, from, e))?
        .ok_or_else(|| CatalogError::NotFound {
            op: OP,
            id: from.to_string(),
        })?;

    let copy = original.with_id(to);
    store
        .insert(&copy)
        .map_err(|e| CatalogError::from_store(OP, to, e))?;

    if let Err(source) = store.delete(from) {
        error!(
            op = OP,
            from,
            to,
            %source,
            "inserted new id but failed to delete the old one"
        );
        return Err(CatalogError::PartialMigration {
            old_id: from.to_string(),
            new_id: to.to_string(),
            source,
        });
    }

    let moved = verify(store, from, to, &copy)?;

    info!(op = OP, from, to, "moved product to new id");
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Product rekeyed: {} -> {}",
        from, to
    )));
    Ok(result.with_affected_records(vec![moved]))
}

fn verify<S: RemoteStore>(
    store: &S,
    from: &str,
    to: &str,
    expected: &RawRecord,
) -> Result<RawRecord> {
    let fail = |reason: String| CatalogError::Verification {
        op: OP,
        id: to.to_string(),
        reason,
    };

    let moved = store
        .get(to)
        .map_err(|source| CatalogError::Store { op: OP, source })?
        .ok_or_else(|| fail("new id is missing after migration".to_string()))?;
    if !expected.same_content(&moved) {
        return Err(fail("stored copy differs from the original".to_string()));
    }

    let leftover = store
        .get(from)
        .map_err(|source| CatalogError::Store { op: OP, source })?;
    if leftover.is_some() {
        return Err(fail(format!("old id '{}' still present", from)));
    }

    Ok(moved)
}
