//! The closed set of city datasets.
//!
//! Stored as a plain JSON object on disk when overriding the built-in set:
//! ```json
//! {
//!   "chicago": "chicago.csv",
//!   "new york city": "new_york_city.csv"
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{AnalysisError, CatalogError};

/// Maps city keys to dataset files inside a data directory.
#[derive(Debug, Clone)]
pub struct CityCatalog {
    data_dir: PathBuf,
    entries: BTreeMap<String, String>,
    aliases: BTreeMap<String, String>,
}

impl CityCatalog {
    /// Chicago, New York City, and Washington, with `new york` as an alias.
    pub fn bikeshare(data_dir: impl Into<PathBuf>) -> Self {
        let entries = [
            ("chicago", "chicago.csv"),
            ("new york city", "new_york_city.csv"),
            ("washington", "washington.csv"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let aliases = [("new york", "new york city")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Self {
            data_dir: data_dir.into(),
            entries,
            aliases,
        }
    }

    /// Loads city entries from a JSON file at `path`. Keys are normalized to
    /// lower case.
    pub fn load(path: &Path, data_dir: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let raw: BTreeMap<String, String> =
            serde_json::from_str(&content).map_err(|source| CatalogError::Json {
                path: path.display().to_string(),
                source,
            })?;

        Ok(Self {
            data_dir: data_dir.into(),
            entries: raw
                .into_iter()
                .map(|(k, v)| (normalize(&k), v))
                .collect(),
            aliases: BTreeMap::new(),
        })
    }

    /// Returns the canonical key for `city`, following aliases.
    pub fn resolve(&self, city: &str) -> Result<&str, AnalysisError> {
        let key = normalize(city);
        let key = self.aliases.get(&key).cloned().unwrap_or(key);
        self.entries
            .get_key_value(&key)
            .map(|(k, _)| k.as_str())
            .ok_or_else(|| AnalysisError::UnknownCity(city.to_string()))
    }

    /// Full path to the dataset for `city`.
    pub fn path_for(&self, city: &str) -> Result<PathBuf, AnalysisError> {
        let key = self.resolve(city)?;
        Ok(self.data_dir.join(&self.entries[key]))
    }

    /// Iterates over all `(city, file)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

fn normalize(city: &str) -> String {
    city.trim().to_lowercase()
}
