//! Tabular data sources
//!
//! This module supplies raw rows for the chat history and outreach tables:
//! - `sheets` - Google Sheets values API client
//! - `file` - local JSON exports (one file per table)
//! - `cache` - time-boxed memoization of fetches
//!
//! Sources report failures as `Error::Source`. `load_rows` is the boundary
//! where a failure becomes an empty table, so callers (and the reconciler)
//! only ever see a well-defined row set.

pub mod cache;
pub mod file;
pub mod sheets;

pub use cache::CachedSource;
pub use file::JsonFileSource;
pub use sheets::{extract_sheet_id, SheetsClient};

use crate::{model::Row, Result};
use async_trait::async_trait;
use tracing::{info, warn};

/// A source of loosely-typed rows
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch every row of `table_name` in the source identified by `source_id`
    ///
    /// Rows are returned in table order. Columns are not validated.
    async fn fetch_rows(&self, source_id: &str, table_name: &str) -> Result<Vec<Row>>;
}

#[async_trait]
impl<T: DataSource + ?Sized> DataSource for std::sync::Arc<T> {
    async fn fetch_rows(&self, source_id: &str, table_name: &str) -> Result<Vec<Row>> {
        (**self).fetch_rows(source_id, table_name).await
    }
}

/// Fetch a table, turning any failure into an empty result set
///
/// The failure is logged; it never propagates.
pub async fn load_rows<S: DataSource + ?Sized>(
    source: &S,
    source_id: &str,
    table_name: &str,
) -> Vec<Row> {
    match source.fetch_rows(source_id, table_name).await {
        Ok(rows) => {
            info!("Loaded {} rows from {}", rows.len(), table_name);
            rows
        }
        Err(e) => {
            warn!("Error loading data from {}: {}", table_name, e);
            Vec::new()
        }
    }
}
