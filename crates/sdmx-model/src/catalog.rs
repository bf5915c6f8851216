//! Catalog of data-flows published by a provider.

use std::collections::BTreeMap;

use crate::error::ValidationError;

/// One data-flow (or legacy key family) advertised by a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Identifier as published (case preserved).
    pub id: String,
    /// Display name in the preferred language, if any.
    pub name: Option<String>,
    /// Referenced data structure definition.
    pub structure: Option<String>,
    /// Number of series, when the provider annotates it.
    pub series_count: Option<u64>,
    /// Maintenance agency, when the listing exposes it.
    pub agency: Option<String>,
}

impl CatalogEntry {
    /// Creates an entry with only an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// Table of catalog entries with case-insensitive lookup.
///
/// Entries keep their document order and original spelling; lookups compare
/// upper-cased identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: BTreeMap<String, usize>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry. A later entry with the same identifier replaces the
    /// earlier one in place.
    pub fn insert(&mut self, entry: CatalogEntry) {
        let key = entry.id.to_uppercase();
        match self.index.get(&key) {
            Some(&position) => self.entries[position] = entry,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Looks up an entry, ignoring case.
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.index
            .get(&id.to_uppercase())
            .map(|&position| &self.entries[position])
    }

    /// Returns true if `id` names an entry of this catalog.
    pub fn validate(&self, id: &str) -> bool {
        self.index.contains_key(&id.to_uppercase())
    }

    /// Looks up an entry or fails with the full list of legal identifiers.
    pub fn require(&self, id: &str) -> Result<&CatalogEntry, ValidationError> {
        self.get(id).ok_or_else(|| ValidationError {
            identifier: id.to_string(),
            available: self.identifiers(),
        })
    }

    /// All identifiers in catalog order.
    pub fn identifiers(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.id.clone()).collect()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<CatalogEntry> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for entry in iter {
            catalog.insert(entry);
        }
        catalog
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        ["EXR", "ICP", "BSI"].into_iter().map(CatalogEntry::new).collect()
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = sample();
        assert!(catalog.validate("exr"));
        assert!(catalog.validate("EXR"));
        assert!(!catalog.validate("NOTREAL"));
        assert_eq!(catalog.get("icp").map(|e| e.id.as_str()), Some("ICP"));
    }

    #[test]
    fn test_storage_preserves_case() {
        let catalog: Catalog = [CatalogEntry::new("Mixed_Case")].into_iter().collect();
        assert!(catalog.validate("MIXED_CASE"));
        assert_eq!(catalog.identifiers(), vec!["Mixed_Case"]);
    }

    #[test]
    fn test_require_lists_available_identifiers() {
        let catalog = sample();
        let err = catalog.require("NOTREAL").unwrap_err();
        assert_eq!(err.identifier, "NOTREAL");
        assert_eq!(err.available, vec!["EXR", "ICP", "BSI"]);
    }

    #[test]
    fn test_duplicate_identifier_replaces_entry() {
        let mut catalog = sample();
        catalog.insert(CatalogEntry {
            name: Some("Exchange rates".to_string()),
            ..CatalogEntry::new("exr")
        });
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.get("EXR").and_then(|e| e.name.as_deref()),
            Some("Exchange rates")
        );
    }
}
