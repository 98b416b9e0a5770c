use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A product row as the remote store holds it.
///
/// Nullable columns stay `Option`s here, so a row read from the store can be
/// written back (or copied under a new id) without turning `null` into an
/// empty value. Folding nulls into defaults is the normalizer's job.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub images: Option<Vec<String>>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub is_featured: Option<bool>,
    pub sizes: Option<Vec<String>>,
    pub size_inventory: Option<BTreeMap<String, i64>>,
    pub nft_metadata: Option<serde_json::Value>,
    pub archived: Option<bool>,
    pub archived_at: Option<DateTime<Utc>>,
    pub released_at: Option<DateTime<Utc>>,
    pub sold_at: Option<DateTime<Utc>>,
    /// Left out of writes when unknown so the store can apply its own default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Columns the engine does not model, carried along so a rekeyed copy
    /// loses nothing.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RawRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// The identifier, or "" when the row has none.
    pub fn id_str(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    pub fn name_str(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// A null `archived` column reads as not archived.
    pub fn is_archived(&self) -> bool {
        self.archived.unwrap_or(false)
    }

    /// Same record under another identifier. Every other column is kept verbatim.
    pub fn with_id(&self, id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            ..self.clone()
        }
    }

    /// True when every column the engine models matches `other`.
    ///
    /// Unmodeled columns are left out since the store may maintain them
    /// (`updated_at` triggers and the like). `created_at` only counts when
    /// this record carries one; otherwise the store stamps its own.
    pub fn same_content(&self, other: &RawRecord) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.price == other.price
            && self.images == other.images
            && self.description == other.description
            && self.category == other.category
            && self.is_featured == other.is_featured
            && self.sizes == other.sizes
            && self.size_inventory == other.size_inventory
            && self.nft_metadata == other.nft_metadata
            && self.archived == other.archived
            && self.archived_at == other.archived_at
            && self.released_at == other.released_at
            && self.sold_at == other.sold_at
            && (self.created_at.is_none() || self.created_at == other.created_at)
    }

    pub fn apply(&mut self, patch: &RecordPatch) {
        if let Some(name) = &patch.name {
            self.name = Some(name.clone());
        }
        if let Some(archived) = patch.archived {
            self.archived = Some(archived);
        }
        if let Some(archived_at) = patch.archived_at {
            self.archived_at = archived_at;
        }
    }
}

/// The storefront's view of a product. Field order here is the serialized key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub images: Vec<String>,
    pub description: String,
    pub category: String,
    pub is_featured: bool,
    pub sizes: Vec<String>,
    pub size_inventory: BTreeMap<String, i64>,
    pub nft: Option<serde_json::Value>,
    pub archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub released_at: Option<DateTime<Utc>>,
    pub sold_at: Option<DateTime<Utc>>,
}

/// Partial column update sent with `update`.
///
/// `archived_at` is doubly optional: `None` leaves the column alone,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<Option<DateTime<Utc>>>,
}

impl RecordPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Archive flag and its timestamp always travel together.
    pub fn archival(archived: bool, now: DateTime<Utc>) -> Self {
        Self {
            archived: Some(archived),
            archived_at: Some(archived.then_some(now)),
            ..Default::default()
        }
    }
}
