//! Few-shot example store.
//!
//! Examples are grouped under a composite key `"{content_format}_{style}"`
//! and loaded once from a JSON object of the form
//! `{"text_professional": ["...", "..."], ...}`. The table is never mutated
//! after construction.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Failure to load the examples file. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ExampleStoreError {
    #[error("failed to read examples file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse examples file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only mapping from composite key to ordered example outputs.
#[derive(Debug, Clone, Default)]
pub struct ExampleTable {
    entries: HashMap<String, Vec<String>>,
}

/// Join a content format and style into the table key.
pub fn composite_key(content_format: &str, style: &str) -> String {
    format!("{content_format}_{style}")
}

impl ExampleTable {
    /// Load the table from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ExampleStoreError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ExampleStoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: HashMap<String, Vec<String>> =
            serde_json::from_str(&content).map_err(|source| ExampleStoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(
            "loaded {} example set(s) from {}",
            entries.len(),
            path.display()
        );
        Ok(Self { entries })
    }

    pub fn from_map(entries: HashMap<String, Vec<String>>) -> Self {
        Self { entries }
    }

    /// Examples for a format/style pair. Empty when the key is absent.
    pub fn lookup(&self, content_format: &str, style: &str) -> &[String] {
        self.entries
            .get(&composite_key(content_format, style))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of example sets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Composite keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl<K, V> FromIterator<(K, V)> for ExampleTable
where
    K: Into<String>,
    V: IntoIterator,
    V::Item: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into_iter().map(Into::into).collect()))
            .collect();
        Self { entries }
    }
}
