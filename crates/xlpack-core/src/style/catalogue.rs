//! Index-addressed, deduplicating catalogue

use std::hash::Hash;

use ahash::AHashMap;

/// An ordered list of style entries referenced by 0-based position.
///
/// Inserting an entry equal to one already present returns the existing index,
/// so cells sharing a format share one catalogue entry. Indices never change
/// once handed out.
#[derive(Debug, Clone)]
pub struct Catalogue<T> {
    /// All entries, in index order
    items: Vec<T>,
    /// Fast lookup for deduplication
    index_map: AHashMap<T, u32>,
}

impl<T: Clone + Eq + Hash> Catalogue<T> {
    /// Create an empty catalogue
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index_map: AHashMap::new(),
        }
    }

    /// Get or create an entry, returning its index
    pub fn insert(&mut self, item: T) -> u32 {
        if let Some(&idx) = self.index_map.get(&item) {
            return idx;
        }
        self.push(item)
    }

    /// Append an entry without deduplication.
    ///
    /// Readers use this so positions match the source document even when it
    /// contains repeated entries.
    pub fn push(&mut self, item: T) -> u32 {
        let idx = self.items.len() as u32;
        self.index_map.entry(item.clone()).or_insert(idx);
        self.items.push(item);
        idx
    }

    /// Get an entry by index
    pub fn get(&self, index: u32) -> Option<&T> {
        self.items.get(index as usize)
    }

    /// Find the index of an entry
    pub fn index_of(&self, item: &T) -> Option<u32> {
        self.index_map.get(item).copied()
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the catalogue is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check if an index is within bounds
    pub fn contains_index(&self, index: u32) -> bool {
        (index as usize) < self.items.len()
    }

    /// All entries in index order
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterate over all entries
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<T: Clone + Eq + Hash> Default for Catalogue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for Catalogue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_deduplicates() {
        let mut cat = Catalogue::new();
        assert_eq!(cat.insert("a"), 0);
        assert_eq!(cat.insert("b"), 1);
        assert_eq!(cat.insert("a"), 0);
        assert_eq!(cat.len(), 2);
    }

    #[test]
    fn test_push_keeps_duplicates() {
        let mut cat = Catalogue::new();
        cat.push("a");
        assert_eq!(cat.push("a"), 1);
        assert_eq!(cat.len(), 2);
        // Lookups resolve to the first occurrence
        assert_eq!(cat.index_of(&"a"), Some(0));
        assert_eq!(cat.insert("a"), 0);
    }

    #[test]
    fn test_bounds() {
        let mut cat = Catalogue::new();
        cat.insert(1u8);
        assert!(cat.contains_index(0));
        assert!(!cat.contains_index(1));
        assert_eq!(cat.get(0), Some(&1));
        assert_eq!(cat.get(5), None);
    }
}
