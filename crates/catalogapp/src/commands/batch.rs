//! Maintenance batches.
//!
//! A batch is an explicit, operator-written list of operations. Nothing is
//! inferred: every entry names its target ids and values. Entries run in
//! order and independently; one failure is recorded and the next entry still
//! runs. The collected [`BatchSummary`] is the batch's result.
//!
//! Batch files are JSON arrays:
//!
//! ```json
//! [
//!   { "op": "rename", "id": "p1", "name": "Beanie" },
//!   { "op": "archive", "id": "p2" },
//!   { "op": "unarchive", "id": "p3" },
//!   { "op": "rekey", "from": "old-hat", "to": "hat-2024" }
//! ]
//! ```

use crate::commands::{archive, rekey, rename, CmdMessage, CmdResult};
use crate::error::{CatalogError, Result};
use crate::store::RemoteStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum MaintenanceOp {
    Rename { id: String, name: String },
    Archive { id: String },
    Unarchive { id: String },
    Rekey { from: String, to: String },
}

impl MaintenanceOp {
    pub fn name(&self) -> &'static str {
        match self {
            MaintenanceOp::Rename { .. } => "rename",
            MaintenanceOp::Archive { .. } => "archive",
            MaintenanceOp::Unarchive { .. } => "unarchive",
            MaintenanceOp::Rekey { .. } => "rekey",
        }
    }

    /// Run this single operation against the store.
    pub fn apply<S: RemoteStore>(&self, store: &S, now: DateTime<Utc>) -> Result<CmdResult> {
        match self {
            MaintenanceOp::Rename { id, name } => rename::run(store, id, name),
            MaintenanceOp::Archive { id } => archive::run(store, id, true, now),
            MaintenanceOp::Unarchive { id } => archive::run(store, id, false, now),
            MaintenanceOp::Rekey { from, to } => rekey::run(store, from, to),
        }
    }
}

impl fmt::Display for MaintenanceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaintenanceOp::Rename { id, name } => write!(f, "rename {} to \"{}\"", id, name),
            MaintenanceOp::Archive { id } => write!(f, "archive {}", id),
            MaintenanceOp::Unarchive { id } => write!(f, "unarchive {}", id),
            MaintenanceOp::Rekey { from, to } => write!(f, "rekey {} -> {}", from, to),
        }
    }
}

/// Parse a batch file.
pub fn load_ops(path: &Path) -> Result<Vec<MaintenanceOp>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpStatus {
    Applied,
    /// Already in the requested state; nothing was written.
    Skipped,
    Failed,
}

#[derive(Debug)]
pub struct OpOutcome {
    pub op: MaintenanceOp,
    pub status: OpStatus,
    pub messages: Vec<CmdMessage>,
    pub error: Option<CatalogError>,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<OpOutcome>,
}

impl BatchSummary {
    fn count(&self, status: OpStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn applied(&self) -> usize {
        self.count(OpStatus::Applied)
    }

    pub fn skipped(&self) -> usize {
        self.count(OpStatus::Skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(OpStatus::Failed)
    }

    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }
}

pub fn run<S: RemoteStore>(
    store: &S,
    ops: &[MaintenanceOp],
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut summary = BatchSummary::default();

    for op in ops {
        let outcome = match op.apply(store, now) {
            Ok(applied) => {
                let status = if applied.affected_records.is_empty() {
                    OpStatus::Skipped
                } else {
                    OpStatus::Applied
                };
                result.affected_records.extend(applied.affected_records);
                OpOutcome {
                    op: op.clone(),
                    status,
                    messages: applied.messages,
                    error: None,
                }
            }
            Err(err) => {
                warn!(op = op.name(), error = %err, "batch operation failed");
                OpOutcome {
                    op: op.clone(),
                    status: OpStatus::Failed,
                    messages: vec![CmdMessage::error(err.to_string())],
                    error: Some(err),
                }
            }
        };
        summary.outcomes.push(outcome);
    }

    info!(
        total = ops.len(),
        applied = summary.applied(),
        skipped = summary.skipped(),
        failed = summary.failed(),
        "batch finished"
    );

    let line = format!(
        "{} operations: {} applied, {} skipped, {} failed",
        ops.len(),
        summary.applied(),
        summary.skipped(),
        summary.failed()
    );
    result.add_message(if summary.is_clean() {
        CmdMessage::success(line)
    } else {
        CmdMessage::warning(line)
    });
    result.batch = Some(summary);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawRecord;
    use crate::store::mem_backend::{MemStore, StoreOp};
    use tempfile::TempDir;

    fn rename(id: &str, name: &str) -> MaintenanceOp {
        MaintenanceOp::Rename {
            id: id.into(),
            name: name.into(),
        }
    }

    #[test]
    fn parses_operator_batch_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ops.json");
        std::fs::write(
            &path,
            r#"[
                {"op": "rename", "id": "p1", "name": "Beanie"},
                {"op": "archive", "id": "p2"},
                {"op": "unarchive", "id": "p3"},
                {"op": "rekey", "from": "a", "to": "b"}
            ]"#,
        )
        .unwrap();

        let ops = load_ops(&path).unwrap();
        assert_eq!(
            ops,
            vec![
                rename("p1", "Beanie"),
                MaintenanceOp::Archive { id: "p2".into() },
                MaintenanceOp::Unarchive { id: "p3".into() },
                MaintenanceOp::Rekey {
                    from: "a".into(),
                    to: "b".into()
                },
            ]
        );
    }

    #[test]
    fn unknown_operation_is_rejected() {
        let parsed: std::result::Result<Vec<MaintenanceOp>, _> =
            serde_json::from_str(r#"[{"op": "delete", "id": "p1"}]"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn failures_do_not_block_later_operations() {
        let store = MemStore::with_records(vec![
            RawRecord::new("p1", "Hat"),
            RawRecord::new("p2", "Tee"),
        ]);
        let ops = vec![
            rename("ghost", "Nobody"),
            MaintenanceOp::Rekey {
                from: "p1".into(),
                to: "p2".into(),
            },
            MaintenanceOp::Archive { id: "p2".into() },
            rename("p1", "Beanie"),
        ];

        let result = run(&store, &ops, Utc::now()).unwrap();
        let summary = result.batch.unwrap();
        let statuses: Vec<_> = summary.outcomes.iter().map(|o| o.status).collect();
        assert_eq!(
            statuses,
            vec![
                OpStatus::Failed,
                OpStatus::Failed,
                OpStatus::Applied,
                OpStatus::Applied
            ]
        );
        assert!(matches!(
            summary.outcomes[0].error,
            Some(CatalogError::NotFound { .. })
        ));
        assert!(matches!(
            summary.outcomes[1].error,
            Some(CatalogError::Conflict { .. })
        ));
        assert_eq!(summary.failed(), 2);

        let rows = store.records();
        assert_eq!(rows[0].name_str(), "Beanie");
        assert!(rows[1].is_archived());
    }

    #[test]
    fn already_applied_operations_are_skipped() {
        let store = MemStore::with_records(vec![RawRecord::new("p1", "Hat")]);
        let ops = vec![
            MaintenanceOp::Archive { id: "p1".into() },
            MaintenanceOp::Archive { id: "p1".into() },
        ];

        let summary = run(&store, &ops, Utc::now()).unwrap().batch.unwrap();
        assert_eq!(summary.applied(), 1);
        assert_eq!(summary.skipped(), 1);
        assert!(summary.is_clean());
    }

    #[test]
    fn store_outage_is_reported_per_operation() {
        let store = MemStore::with_records(vec![RawRecord::new("p1", "Hat")]);
        store.fail_on(StoreOp::Update);
        let ops = vec![
            rename("p1", "Beanie"),
            MaintenanceOp::Rekey {
                from: "p1".into(),
                to: "p9".into(),
            },
        ];

        let summary = run(&store, &ops, Utc::now()).unwrap().batch.unwrap();
        assert_eq!(summary.outcomes[0].status, OpStatus::Failed);
        assert_eq!(summary.outcomes[1].status, OpStatus::Applied);
        assert_eq!(store.records()[0].id_str(), "p9");
        assert_eq!(store.records()[0].name_str(), "Hat");
    }
}
