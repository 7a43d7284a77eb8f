//! Local JSON exports
//!
//! Each table is a file `<table_name>.json` holding a JSON array of objects.
//! A non-empty source ID selects a sub-directory, so one data directory can
//! hold exports for several spreadsheets.

use crate::{model::Row, source::DataSource, Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Data source backed by JSON files on disk
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    root: PathBuf,
}

impl JsonFileSource {
    /// Create a source rooted at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Path of the file backing a table
    pub fn table_path(&self, source_id: &str, table_name: &str) -> PathBuf {
        let dir = if source_id.is_empty() {
            self.root.clone()
        } else {
            self.root.join(source_id)
        };
        dir.join(format!("{}.json", table_name))
    }
}

#[async_trait]
impl DataSource for JsonFileSource {
    async fn fetch_rows(&self, source_id: &str, table_name: &str) -> Result<Vec<Row>> {
        let path = self.table_path(source_id, table_name);
        debug!("Reading table {} from {}", table_name, path.display());

        let data = tokio::fs::read_to_string(&path).await.map_err(|e| {
            Error::Source(format!("Failed to read {}: {}", path.display(), e))
        })?;

        if data.trim().is_empty() {
            return Ok(Vec::new());
        }

        let value: Value = serde_json::from_str(&data)?;
        let Value::Array(items) = value else {
            return Err(Error::Source(format!(
                "{} does not contain a JSON array",
                path.display()
            )));
        };

        // Non-object entries are skipped
        Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(row) => Some(row),
                _ => None,
            })
            .collect())
    }
}
