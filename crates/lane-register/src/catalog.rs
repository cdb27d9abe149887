//! # Catalog Lookup
//!
//! The external product catalog, as the core sees it: a read-only
//! key-value source keyed by product identifier.
//!
//! ## Lookup Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Catalog Resolution                                │
//! │                                                                         │
//! │  Scanned code "123456789"                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lookup_by_id ──► Some(entry) │ None                                   │
//! │                                                                         │
//! │  Search term "shirt"                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  search_by_name ──► case-insensitive substring match over names,       │
//! │                     results in catalog order, empty vec = no match     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both operations are synchronous and side-effect-free from the
//! controller's point of view. A production deployment implements
//! [`Catalog`] over its product database; [`InMemoryCatalog`] serves
//! tests and the demo shell.

use std::collections::HashMap;

use lane_core::validation::{validate_price_cents, validate_product_id, validate_product_name};
use lane_core::{CatalogEntry, CoreResult};

// =============================================================================
// Catalog Trait
// =============================================================================

/// Read-only product lookup, keyed by product identifier.
pub trait Catalog: Send + Sync {
    /// Looks up a product by its exact identifier.
    fn lookup_by_id(&self, id: &str) -> Option<CatalogEntry>;

    /// Finds products whose name contains the term, case-insensitively.
    ///
    /// Results come back in a stable catalog order; an empty vec means no
    /// match.
    fn search_by_name(&self, term: &str) -> Vec<CatalogEntry>;
}

// =============================================================================
// In-Memory Catalog
// =============================================================================

/// A catalog backed by an insertion-ordered in-memory list.
///
/// ## Usage
/// ```rust
/// use lane_core::CatalogEntry;
/// use lane_register::catalog::{Catalog, InMemoryCatalog};
///
/// let mut catalog = InMemoryCatalog::new();
/// catalog.insert(CatalogEntry::new("123456789", "Coffee Mug", 1299)).unwrap();
///
/// assert!(catalog.lookup_by_id("123456789").is_some());
/// assert_eq!(catalog.search_by_name("mug").len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    /// Entries in insertion order; search results preserve this order.
    entries: Vec<CatalogEntry>,

    /// Index from product id to position in `entries`.
    by_id: HashMap<String, usize>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        InMemoryCatalog::default()
    }

    /// Inserts or replaces an entry.
    ///
    /// Entries are validated on the way in; an invalid entry is rejected
    /// and the catalog is unchanged. Re-inserting an existing id replaces
    /// the stored entry in place, keeping its position.
    pub fn insert(&mut self, entry: CatalogEntry) -> CoreResult<()> {
        validate_product_id(&entry.product_id)?;
        validate_product_name(&entry.name)?;
        validate_price_cents(entry.price_cents)?;

        match self.by_id.get(&entry.product_id) {
            Some(&index) => {
                self.entries[index] = entry;
            }
            None => {
                self.by_id
                    .insert(entry.product_id.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
        Ok(())
    }

    /// Number of entries in the catalog.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Catalog for InMemoryCatalog {
    fn lookup_by_id(&self, id: &str) -> Option<CatalogEntry> {
        self.by_id.get(id).map(|&index| self.entries[index].clone())
    }

    fn search_by_name(&self, term: &str) -> Vec<CatalogEntry> {
        let needle = term.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::new();
        catalog
            .insert(CatalogEntry::new("123456789", "Coffee Mug", 1299))
            .unwrap();
        catalog
            .insert(CatalogEntry::new("987654321", "T-Shirt", 2499))
            .unwrap();
        catalog
            .insert(CatalogEntry::new("456789123", "Notebook", 850))
            .unwrap();
        catalog
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = seeded();

        let entry = catalog.lookup_by_id("987654321").unwrap();
        assert_eq!(entry.name, "T-Shirt");
        assert_eq!(entry.price_cents, 2499);

        assert!(catalog.lookup_by_id("000000000").is_none());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let catalog = seeded();

        assert_eq!(catalog.search_by_name("SHIRT").len(), 1);
        assert_eq!(catalog.search_by_name("note").len(), 1);
        assert_eq!(catalog.search_by_name("zebra").len(), 0);
    }

    #[test]
    fn test_search_preserves_catalog_order() {
        let mut catalog = seeded();
        catalog
            .insert(CatalogEntry::new("111111111", "Dress Shirt", 3999))
            .unwrap();

        let matches = catalog.search_by_name("shirt");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].product_id, "987654321");
        assert_eq!(matches[1].product_id, "111111111");
    }

    #[test]
    fn test_reinsert_replaces_in_place() {
        let mut catalog = seeded();
        catalog
            .insert(CatalogEntry::new("123456789", "Coffee Mug XL", 1599))
            .unwrap();

        assert_eq!(catalog.len(), 3);
        let entry = catalog.lookup_by_id("123456789").unwrap();
        assert_eq!(entry.name, "Coffee Mug XL");
        assert_eq!(entry.price_cents, 1599);
    }

    #[test]
    fn test_invalid_entries_rejected() {
        let mut catalog = InMemoryCatalog::new();

        assert!(catalog.insert(CatalogEntry::new("", "No Id", 100)).is_err());
        assert!(catalog.insert(CatalogEntry::new("ok", "", 100)).is_err());
        assert!(catalog
            .insert(CatalogEntry::new("ok", "Negative", -5))
            .is_err());
        assert!(catalog.is_empty());
    }
}
