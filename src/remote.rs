//! Remote Record Store
//!
//! Read-only view of the persistent plant store owned by the surrounding
//! application, plus the per-resolver cache of records fetched from it.

use crate::error::CollaboratorError;
use crate::local_index::match_name;
use crate::record::{normalize_name, PlantRecord, RemotePlantRow};
use async_trait::async_trait;
use moka::future::Cache;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// One page of a paged listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        (self.page + 1) * self.page_size < self.total
    }
}

/// Search and paged listing over the persistent store
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Records whose name matches `name`, best first, at most `limit`
    async fn search(&self, name: &str, limit: usize) -> Result<Vec<PlantRecord>, CollaboratorError>;

    /// Zero-based page of all records
    async fn get_all(&self, page: usize, page_size: usize) -> Result<Page<PlantRecord>, CollaboratorError>;
}

#[derive(Debug, Deserialize)]
struct PageBody {
    #[serde(default)]
    items: Vec<RemotePlantRow>,
    #[serde(default)]
    total: usize,
}

/// REST client for the record store
///
///   GET {base}/plants/search?q=<name>&limit=<n>   -> [row, ...]
///   GET {base}/plants?page=<p>&pageSize=<s>       -> { items: [...], total }
pub struct HttpRecordStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecordStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CollaboratorError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bloom_planner/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, CollaboratorError> {
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Status(status.as_u16(), body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CollaboratorError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn search(&self, name: &str, limit: usize) -> Result<Vec<PlantRecord>, CollaboratorError> {
        let url = format!("{}/plants/search", self.base_url);
        let rows: Vec<RemotePlantRow> = self
            .get_json(&url, &[("q", name.to_string()), ("limit", limit.to_string())])
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(RemotePlantRow::into_record)
            .take(limit)
            .collect())
    }

    async fn get_all(&self, page: usize, page_size: usize) -> Result<Page<PlantRecord>, CollaboratorError> {
        let url = format!("{}/plants", self.base_url);
        let body: PageBody = self
            .get_json(&url, &[("page", page.to_string()), ("pageSize", page_size.to_string())])
            .await?;

        Ok(Page {
            items: body.items.into_iter().filter_map(RemotePlantRow::into_record).collect(),
            page,
            page_size,
            total: body.total,
        })
    }
}

#[derive(Debug, Clone)]
struct CachedRecord {
    seq: u64,
    record: PlantRecord,
}

/// Records fetched from the store during this resolver's lifetime
///
/// Keyed by normalized name, last writer wins. Scans run in insertion
/// order so fuzzy tie-breaks stay deterministic.
pub struct RemoteCache {
    entries: Cache<String, CachedRecord>,
    next_seq: AtomicU64,
}

impl RemoteCache {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(max_capacity).build(),
            next_seq: AtomicU64::new(0),
        }
    }

    pub async fn insert(&self, record: PlantRecord) {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let key = record.normalized_name();
        self.entries.insert(key, CachedRecord { seq, record }).await;
    }

    /// Three-step name lookup over cached records
    pub async fn lookup(&self, name: &str, threshold: f64) -> Option<(PlantRecord, Option<String>)> {
        let key = normalize_name(name);
        if key.is_empty() {
            return None;
        }

        if let Some(cached) = self.entries.get(&key).await {
            return Some((cached.record, None));
        }

        let records = self.snapshot();
        match_name(name, &records, threshold).map(|hit| {
            let suggested = hit.suggested_name(name);
            (hit.record.clone(), suggested)
        })
    }

    /// Cached records in insertion order
    pub fn snapshot(&self) -> Vec<PlantRecord> {
        let mut entries: Vec<CachedRecord> = self.entries.iter().map(|(_, v)| v).collect();
        entries.sort_by_key(|e| e.seq);
        entries.into_iter().map(|e| e.record).collect()
    }

    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}
