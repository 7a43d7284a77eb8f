//! Time-boxed memoization of source fetches
//!
//! Mirrors the dashboard's 60-second data cache: repeated renders within the
//! TTL reuse the last successful fetch of a table instead of hitting the
//! backend again. Failed fetches are never cached.

use crate::{model::Row, source::DataSource, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Default time-to-live for cached tables
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CacheEntry {
    rows: Arc<Vec<Row>>,
    fetched_at: Instant,
}

/// Wraps a data source with a per-table TTL cache
#[derive(Debug)]
pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    entries: RwLock<HashMap<(String, String), CacheEntry>>,
}

impl<S: DataSource> CachedSource<S> {
    /// Wrap `inner` with the default 60-second TTL
    pub fn new(inner: S) -> Self {
        Self::with_ttl(inner, DEFAULT_CACHE_TTL)
    }

    /// Wrap `inner` with a custom TTL
    pub fn with_ttl(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The wrapped source
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// The configured TTL
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Drop every cached table
    pub async fn invalidate(&self) {
        self.entries.write().await.clear();
        debug!("Source cache cleared");
    }

    /// Number of tables currently cached (expired entries included)
    pub async fn cached_tables(&self) -> usize {
        self.entries.read().await.len()
    }

    async fn lookup(&self, key: &(String, String)) -> Option<Arc<Vec<Row>>> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.rows.clone())
    }
}

#[async_trait]
impl<S: DataSource> DataSource for CachedSource<S> {
    async fn fetch_rows(&self, source_id: &str, table_name: &str) -> Result<Vec<Row>> {
        let key = (source_id.to_string(), table_name.to_string());

        if let Some(rows) = self.lookup(&key).await {
            debug!("Cache hit for {}/{}", source_id, table_name);
            return Ok(rows.as_ref().clone());
        }

        let rows = self.inner.fetch_rows(source_id, table_name).await?;
        let entry = CacheEntry {
            rows: Arc::new(rows.clone()),
            fetched_at: Instant::now(),
        };
        self.entries.write().await.insert(key, entry);

        Ok(rows)
    }
}
