use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CatalogError, Result};
use crate::model::RecordPatch;
use crate::store::RemoteStore;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

fn op_name(archived: bool) -> &'static str {
    if archived {
        "archive"
    } else {
        "unarchive"
    }
}

/// Move a product into (or out of) the archive.
///
/// `archived` and `archived_at` are written in a single update, so the pair
/// cannot diverge: either both change or neither does. A product already in
/// the requested state is left alone, which keeps its original transition time.
pub fn run<S: RemoteStore>(
    store: &S,
    id: &str,
    archived: bool,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let op = op_name(archived);
    let current = store
        .get(id)
        .map_err(|e| CatalogError::from_store(op, id, e))?
        .ok_or_else(|| CatalogError::NotFound {
            op,
            id: id.to_string(),
        })?;

    let mut result = CmdResult::default();

    if current.is_archived() == archived && current.archived_at.is_some() == archived {
        result.add_message(CmdMessage::info(format!(
            "Product already {}d ({}): {}",
            op, id, current.name_str()
        )));
        return Ok(result);
    }
    if current.is_archived() == archived {
        warn!(op, id, "archive flag and timestamp disagree; rewriting both");
    }

    let updated = store
        .update(id, &RecordPatch::archival(archived, now))
        .map_err(|e| CatalogError::from_store(op, id, e))?;

    if updated.archived != Some(archived) || updated.archived_at.is_some() != archived {
        return Err(CatalogError::Verification {
            op,
            id: id.to_string(),
            reason: format!(
                "store reports archived={:?} archived_at={:?}",
                updated.archived, updated.archived_at
            ),
        });
    }

    info!(op, id, "updated archive state");
    result.add_message(CmdMessage::success(format!(
        "Product {}d ({}): {}",
        op, id, updated.name_str()
    )));
    Ok(result.with_affected_records(vec![updated]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawRecord;
    use crate::store::mem_backend::{MemStore, StoreOp};
    use chrono::TimeZone;

    fn t(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()
    }

    fn archived_hat(at: DateTime<Utc>) -> RawRecord {
        RawRecord {
            archived: Some(true),
            archived_at: Some(at),
            ..RawRecord::new("p1", "Hat")
        }
    }

    #[test]
    fn archiving_stamps_transition_time() {
        let store = MemStore::with_records(vec![RawRecord::new("p1", "Hat")]);
        let result = run(&store, "p1", true, t(1)).unwrap();

        assert_eq!(result.affected_records.len(), 1);
        let stored = &store.records()[0];
        assert!(stored.is_archived());
        assert_eq!(stored.archived_at, Some(t(1)));
    }

    #[test]
    fn unarchiving_clears_timestamp() {
        let store = MemStore::with_records(vec![archived_hat(t(1))]);
        run(&store, "p1", false, t(2)).unwrap();

        let stored = &store.records()[0];
        assert!(!stored.is_archived());
        assert_eq!(stored.archived_at, None);
    }

    #[test]
    fn archiving_twice_keeps_first_timestamp() {
        let store = MemStore::with_records(vec![RawRecord::new("p1", "Hat")]);
        run(&store, "p1", true, t(1)).unwrap();
        let second = run(&store, "p1", true, t(9)).unwrap();

        assert!(second.affected_records.is_empty());
        assert_eq!(store.records()[0].archived_at, Some(t(1)));
    }

    #[test]
    fn repairs_archived_flag_without_timestamp() {
        let broken = RawRecord {
            archived: Some(true),
            ..RawRecord::new("p1", "Hat")
        };
        let store = MemStore::with_records(vec![broken]);
        let result = run(&store, "p1", true, t(3)).unwrap();

        assert_eq!(result.affected_records.len(), 1);
        assert_eq!(store.records()[0].archived_at, Some(t(3)));
    }

    #[test]
    fn failed_update_changes_nothing() {
        let store = MemStore::with_records(vec![RawRecord::new("p1", "Hat")]);
        store.fail_on(StoreOp::Update);

        let err = run(&store, "p1", true, t(1)).unwrap_err();
        assert!(matches!(err, CatalogError::Store { op: "archive", .. }));
        let stored = &store.records()[0];
        assert!(!stored.is_archived());
        assert_eq!(stored.archived_at, None);
    }

    #[test]
    fn missing_product_is_not_found() {
        let store = MemStore::new();
        let err = run(&store, "ghost", false, t(1)).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { op: "unarchive", .. }));
        assert_eq!(store.calls(), vec![StoreOp::Select]);
    }

    #[test]
    fn archive_flag_and_timestamp_always_agree() {
        let store = MemStore::with_records(vec![RawRecord::new("p1", "Hat")]);
        for (i, archived) in [true, false, true, true, false, false].into_iter().enumerate() {
            run(&store, "p1", archived, t(i as u32 + 1)).unwrap();
            let stored = &store.records()[0];
            assert_eq!(stored.is_archived(), stored.archived_at.is_some());
        }
    }
}
