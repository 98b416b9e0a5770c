use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CatalogError, Result};
use crate::normalize::{normalize_all, CategoryAliases};
use crate::store::{RemoteStore, Selector};

const OP: &str = "list";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFilter {
    #[default]
    Active,
    Archived,
    All,
}

impl ListFilter {
    fn keeps(self, archived: bool) -> bool {
        match self {
            ListFilter::Active => !archived,
            ListFilter::Archived => archived,
            ListFilter::All => true,
        }
    }
}

/// Canonical records in artifact order, filtered by archive state.
pub fn run<S: RemoteStore>(
    store: &S,
    aliases: &CategoryAliases,
    filter: ListFilter,
) -> Result<CmdResult> {
    let raws = store
        .select(&Selector::newest_first())
        .map_err(|source| CatalogError::Store { op: OP, source })?;
    let normalized = normalize_all(&raws, aliases)?;

    let mut result = CmdResult::default();
    for warning in &normalized.warnings {
        result.add_message(CmdMessage::warning(warning.to_string()));
    }

    let listed: Vec<_> = normalized
        .records
        .into_iter()
        .filter(|r| filter.keeps(r.archived))
        .collect();
    if listed.is_empty() {
        result.add_message(CmdMessage::info("No products found."));
    }
    Ok(result.with_listed_records(listed))
}
