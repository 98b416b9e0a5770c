//! # Canonical Record Normalizer
//!
//! Maps raw store rows into [`CanonicalRecord`]s, keeping the order the store
//! delivered them in.
//!
//! Per record:
//! - `name` and `description` are trimmed.
//! - `category` is trimmed and lower-cased, then looked up in the
//!   [`CategoryAliases`] table (`accessories` → `accessory`).
//! - Null scalar and list columns become their empty value (`""`, `0`, `[]`).
//! - Every other column is passed through as is; absent optional columns stay
//!   explicit `None`s so they serialize as `null`.
//!
//! The only fatal condition is a missing or blank identifier: such a row
//! cannot be written back or referenced, so the whole run stops.
//!
//! Suspicious but recoverable data (an archived row without `archived_at`, a
//! category outside the configured closed set) is reported as
//! [`NormalizeWarning`]s alongside the output.

use crate::config::CategoryConfig;
use crate::error::{CatalogError, Result};
use crate::model::{CanonicalRecord, RawRecord};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Lookup table from lower-cased raw category to canonical tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryAliases {
    aliases: BTreeMap<String, String>,
    known: Option<BTreeSet<String>>,
}

impl Default for CategoryAliases {
    fn default() -> Self {
        let mut aliases = BTreeMap::new();
        aliases.insert("accessories".to_string(), "accessory".to_string());
        Self {
            aliases,
            known: None,
        }
    }
}

impl CategoryAliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &CategoryConfig) -> Self {
        let mut table = match &config.aliases {
            Some(aliases) => Self {
                aliases: BTreeMap::new(),
                known: None,
            }
            .with_aliases(aliases),
            None => Self::default(),
        };
        if let Some(known) = &config.known {
            table = table.with_known(known.iter().map(String::as_str));
        }
        table
    }

    /// Adds (or replaces) a single alias. Keys are matched after trim + lower-case.
    pub fn with_alias(mut self, from: &str, to: &str) -> Self {
        self.aliases.insert(fold(from), to.trim().to_lowercase());
        self
    }

    fn with_aliases(mut self, aliases: &BTreeMap<String, String>) -> Self {
        for (from, to) in aliases {
            self = self.with_alias(from, to);
        }
        self
    }

    /// Restricts canonical tags to a closed set.
    pub fn with_known<'a>(mut self, tags: impl IntoIterator<Item = &'a str>) -> Self {
        self.known = Some(tags.into_iter().map(fold).collect());
        self
    }

    pub fn canonical(&self, raw: &str) -> String {
        let folded = fold(raw);
        self.aliases.get(&folded).cloned().unwrap_or(folded)
    }

    /// True when no closed set is configured or the tag belongs to it.
    pub fn is_known(&self, tag: &str) -> bool {
        self.known.as_ref().map_or(true, |k| k.contains(tag))
    }
}

fn fold(value: &str) -> String {
    value.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeWarning {
    ArchivedWithoutTimestamp { id: String },
    UnknownCategory { id: String, category: String },
}

impl fmt::Display for NormalizeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeWarning::ArchivedWithoutTimestamp { id } => {
                write!(f, "product '{}' is archived but has no archivedAt", id)
            }
            NormalizeWarning::UnknownCategory { id, category } => {
                write!(
                    f,
                    "product '{}' has category '{}' outside the known set",
                    id, category
                )
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct Normalized {
    pub records: Vec<CanonicalRecord>,
    pub warnings: Vec<NormalizeWarning>,
}

/// Normalize one row. `position` is only used for error reporting.
pub fn normalize_record(
    raw: &RawRecord,
    position: usize,
    aliases: &CategoryAliases,
) -> Result<CanonicalRecord> {
    let id = match raw.id.as_deref() {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        Some(_) => {
            return Err(CatalogError::Normalization {
                position,
                reason: "identifier is empty".to_string(),
            })
        }
        None => {
            return Err(CatalogError::Normalization {
                position,
                reason: "identifier is missing".to_string(),
            })
        }
    };

    Ok(CanonicalRecord {
        id,
        name: raw.name_str().trim().to_string(),
        price: raw.price.unwrap_or_default(),
        images: raw.images.clone().unwrap_or_default(),
        description: raw
            .description
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_string(),
        category: aliases.canonical(raw.category.as_deref().unwrap_or_default()),
        is_featured: raw.is_featured.unwrap_or_default(),
        sizes: raw.sizes.clone().unwrap_or_default(),
        size_inventory: raw.size_inventory.clone().unwrap_or_default(),
        nft: raw.nft_metadata.clone(),
        archived: raw.is_archived(),
        archived_at: raw.archived_at,
        released_at: raw.released_at,
        sold_at: raw.sold_at,
    })
}

/// Normalize a full fetch. Stops at the first row without an identifier.
pub fn normalize_all(raws: &[RawRecord], aliases: &CategoryAliases) -> Result<Normalized> {
    let mut out = Normalized::default();

    for (position, raw) in raws.iter().enumerate() {
        let record = normalize_record(raw, position, aliases)?;

        if record.archived && record.archived_at.is_none() {
            out.warnings.push(NormalizeWarning::ArchivedWithoutTimestamp {
                id: record.id.clone(),
            });
        }
        if !aliases.is_known(&record.category) {
            out.warnings.push(NormalizeWarning::UnknownCategory {
                id: record.id.clone(),
                category: record.category.clone(),
            });
        }

        out.records.push(record);
    }

    Ok(out)
}
