use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::types::ModelInfo;
use crate::constants::DEFAULT_CATALOG;

/// A model the gateway is willing to route to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Upstream model identifier (e.g. "gemini-1.5-flash")
    pub name: String,
    /// Human readable name
    pub display_name: String,
    /// What the model is good at
    pub description: String,
}

impl CatalogEntry {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: description.into(),
        }
    }
}

impl From<&CatalogEntry> for ModelInfo {
    fn from(entry: &CatalogEntry) -> Self {
        ModelInfo {
            name: entry.name.clone(),
            display_name: entry.display_name.clone(),
            description: Some(entry.description.clone()),
        }
    }
}

/// Built-in catalog entries
pub fn default_entries() -> Vec<CatalogEntry> {
    DEFAULT_CATALOG
        .iter()
        .map(|(name, display_name, description)| CatalogEntry::new(*name, *display_name, *description))
        .collect()
}

/// Read-only, insertion-ordered set of supported models.
///
/// Built once at startup and never mutated afterwards, so it can be shared
/// across requests without synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    entries: Vec<CatalogEntry>,
}

impl ModelCatalog {
    /// Build a catalog, rejecting empty lists, blank names and duplicates
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, String> {
        if entries.is_empty() {
            return Err("model catalog must contain at least one model".to_string());
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.name.trim().is_empty() {
                return Err("model catalog contains an entry with an empty name".to_string());
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(format!("model catalog lists '{}' more than once", entry.name));
            }
        }

        Ok(Self { entries })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Identifiers in insertion order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name.clone()).collect()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_model_infos(&self) -> Vec<ModelInfo> {
        self.entries.iter().map(ModelInfo::from).collect()
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self {
            entries: default_entries(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_catalog_order() {
        let catalog = ModelCatalog::default();
        assert_eq!(
            catalog.names(),
            vec![
                "gemini-1.5-flash",
                "gemini-1.5-pro",
                "gemini-2.0-flash-lite",
                "gemini-2.0-flash",
            ]
        );
        assert!(catalog.contains("gemini-2.0-flash"));
        assert!(!catalog.contains("not-a-real-model"));
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        assert!(ModelCatalog::new(vec![]).is_err());

        let dup = vec![
            CatalogEntry::new("a", "A", "first"),
            CatalogEntry::new("a", "A again", "second"),
        ];
        assert!(ModelCatalog::new(dup).is_err());

        let blank = vec![CatalogEntry::new("  ", "Blank", "")];
        assert!(ModelCatalog::new(blank).is_err());
    }

    #[test]
    fn test_model_infos_keep_insertion_order() {
        let catalog = ModelCatalog::new(vec![
            CatalogEntry::new("zeta", "Zeta", "last alphabetically"),
            CatalogEntry::new("alpha", "Alpha", "first alphabetically"),
        ])
        .unwrap();

        let names: Vec<_> = catalog.to_model_infos().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }
}
