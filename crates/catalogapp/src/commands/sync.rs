use crate::artifact::{self, ArtifactTarget};
use crate::commands::{CmdMessage, CmdResult, SyncReport};
use crate::error::{CatalogError, Result};
use crate::normalize::{normalize_all, CategoryAliases};
use crate::store::{RemoteStore, Selector};
use tracing::{debug, info, warn};

const OP: &str = "sync";

/// Full sync: fetch every product newest first, normalize, rewrite the artifact block.
///
/// All-or-nothing: a failed fetch, a row without identifier or a malformed
/// artifact aborts before anything is written. With `dry_run` the new content
/// is computed and compared but never written.
pub fn run<S: RemoteStore>(
    store: &S,
    target: &ArtifactTarget,
    aliases: &CategoryAliases,
    dry_run: bool,
) -> Result<CmdResult> {
    let raws = store
        .select(&Selector::newest_first())
        .map_err(|source| CatalogError::Store { op: OP, source })?;
    debug!(rows = raws.len(), "fetched products");

    let normalized = normalize_all(&raws, aliases)?;
    let prepared = artifact::prepare(target, &normalized.records)?;

    let mut result = CmdResult::default();
    for warning in &normalized.warnings {
        warn!(%warning, "suspicious product data");
        result.add_message(CmdMessage::warning(warning.to_string()));
    }

    let written = !dry_run && prepared.changed;
    if written {
        prepared.commit()?;
    }

    let summary = match (prepared.changed, dry_run) {
        (false, _) => format!(
            "{} is up to date ({} products)",
            prepared.path.display(),
            prepared.records
        ),
        (true, true) => format!(
            "{} would be updated ({} products)",
            prepared.path.display(),
            prepared.records
        ),
        (true, false) => format!(
            "Wrote {} products to {}",
            prepared.records,
            prepared.path.display()
        ),
    };
    info!(
        path = %prepared.path.display(),
        records = prepared.records,
        changed = prepared.changed,
        written,
        "sync finished"
    );
    result.add_message(if written {
        CmdMessage::success(summary)
    } else {
        CmdMessage::info(summary)
    });

    result.sync = Some(SyncReport::new(&prepared, written, normalized.warnings));
    Ok(result.with_listed_records(normalized.records))
}
