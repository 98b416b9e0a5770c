use super::{require_id, RemoteStore, Selector, StoreError, StoreResult};
use crate::config::StoreConfig;
use crate::error::{CatalogError, Result};
use crate::model::{RawRecord, RecordPatch};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const RETURN_ROWS: &str = "return=representation";
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=representation";

/// Product table behind a PostgREST endpoint (`{url}/rest/v1/{table}`).
///
/// One HTTP request per primitive. Update and delete ask for the affected rows
/// back so that a filter matching nothing can be reported as `NotFound`.
pub struct RestStore {
    client: Client,
    endpoint: String,
}

impl RestStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let url = config.require_url()?;
        let mut headers = HeaderMap::new();
        if let Some(key) = config.api_key.as_deref() {
            headers.insert("apikey", header_value(key)?);
            headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", key))?);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| CatalogError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint(url, &config.table),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn send(&self, request: RequestBuilder) -> StoreResult<Response> {
        let response = request
            .send()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        debug!(status = %response.status(), url = %response.url(), "store response");
        Ok(response)
    }

    fn rows(&self, response: Response, id: Option<&str>) -> StoreResult<Vec<RawRecord>> {
        let status = response.status();
        if status == StatusCode::CONFLICT {
            return Err(StoreError::Conflict(id.unwrap_or_default().to_string()));
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        decode(response)
    }

    fn single(&self, response: Response, id: &str) -> StoreResult<RawRecord> {
        self.rows(response, Some(id))?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| CatalogError::Config("store.api_key is not a valid header value".to_string()))
}

fn decode<T: DeserializeOwned>(response: Response) -> StoreResult<T> {
    let body = response
        .text()
        .map_err(|e| StoreError::Transport(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
}

fn endpoint(url: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", url.trim_end_matches('/'), table)
}

fn id_filter(id: &str) -> (&'static str, String) {
    ("id", format!("eq.{}", id))
}

/// PostgREST query parameters for a selector.
fn select_query(selector: &Selector) -> Vec<(&'static str, String)> {
    let mut query = vec![("select", "*".to_string())];
    if let Some(id) = &selector.id {
        query.push(id_filter(id));
    }
    if selector.newest_first {
        query.push(("order", "created_at.desc.nullslast".to_string()));
    }
    query
}

impl RemoteStore for RestStore {
    fn select(&self, selector: &Selector) -> StoreResult<Vec<RawRecord>> {
        let request = self.client.get(&self.endpoint).query(&select_query(selector));
        let response = self.send(request)?;
        self.rows(response, selector.id.as_deref())
    }

    fn insert(&self, record: &RawRecord) -> StoreResult<RawRecord> {
        let id = require_id(record)?;
        let request = self
            .client
            .post(&self.endpoint)
            .header("Prefer", RETURN_ROWS)
            .json(record);
        let response = self.send(request)?;
        self.single(response, id)
    }

    fn update(&self, id: &str, patch: &RecordPatch) -> StoreResult<RawRecord> {
        let request = self
            .client
            .patch(&self.endpoint)
            .query(&[id_filter(id)])
            .header("Prefer", RETURN_ROWS)
            .json(patch);
        let response = self.send(request)?;
        self.single(response, id)
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        let request = self
            .client
            .delete(&self.endpoint)
            .query(&[id_filter(id)])
            .header("Prefer", RETURN_ROWS);
        let response = self.send(request)?;
        self.single(response, id).map(|_| ())
    }

    fn upsert(&self, record: &RawRecord) -> StoreResult<RawRecord> {
        let id = require_id(record)?;
        let request = self
            .client
            .post(&self.endpoint)
            .header("Prefer", MERGE_DUPLICATES)
            .json(record);
        let response = self.send(request)?;
        self.single(response, id)
    }
}
