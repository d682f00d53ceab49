//! Data Provider Contract
//!
//! The query layer is external. A provider answers a query string with a
//! result of its own shape; `get_nodes` and `resolve` turn that into
//! contact records.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::contact::ContactRecord;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read query result {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No node list at {0}")]
    NodesNotFound(String),

    #[error("Failed to resolve contact: {0}")]
    Resolve(String),
}

/// Executes a query against the external data graph.
pub trait DataProvider {
    type Output;

    fn query(&self, query: &str) -> Result<Self::Output, SourceError>;
}

/// Serves a query result that was exported ahead of time as a JSON document.
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataProvider for JsonFileProvider {
    type Output = Value;

    fn query(&self, query: &str) -> Result<Value, SourceError> {
        tracing::debug!(path = %self.path.display(), query_len = query.len(), "loading query result");

        let content = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let value: Value = serde_json::from_str(&content)?;

        // Graph responses wrap results in `data`; exports may be bare.
        match value {
            Value::Object(mut map) if map.contains_key("data") => {
                Ok(map.remove("data").unwrap_or(Value::Null))
            }
            other => Ok(other),
        }
    }
}

/// `get_nodes` for JSON results: the array at an RFC 6901 pointer.
pub fn nodes_at(mut data: Value, pointer: &str) -> Result<Vec<Value>, SourceError> {
    match data.pointer_mut(pointer).map(Value::take) {
        Some(Value::Array(nodes)) => Ok(nodes),
        _ => Err(SourceError::NodesNotFound(pointer.to_string())),
    }
}

/// `resolve` for JSON nodes using the graph's own field names.
pub fn resolve_json(node: Value) -> Result<ContactRecord, SourceError> {
    serde_json::from_value(node).map_err(|e| SourceError::Resolve(e.to_string()))
}
