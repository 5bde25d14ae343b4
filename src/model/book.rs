//! Ordered sheet collection for a whole workbook.

use super::Sheet;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// All sheets of a workbook, keyed by sheet name.
///
/// Iteration order is insertion order, which the loader guarantees equals
/// the sheet declaration order in the source workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Book {
    sheets: IndexMap<String, Sheet>,
}

impl Book {
    /// Create a new empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sheet under its name, preserving insertion order.
    pub fn insert(&mut self, sheet: Sheet) {
        self.sheets.insert(sheet.name.clone(), sheet);
    }

    /// Get a sheet by name.
    pub fn get(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(name)
    }

    /// Check whether a sheet with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    /// Sheet names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    /// Number of sheets.
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the book has no sheets.
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Iterate over (name, sheet) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Sheet)> {
        self.sheets.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl std::ops::Index<&str> for Book {
    type Output = Sheet;

    fn index(&self, name: &str) -> &Sheet {
        self.sheets
            .get(name)
            .unwrap_or_else(|| panic!("no such sheet: {}", name))
    }
}

impl IntoIterator for Book {
    type Item = (String, Sheet);
    type IntoIter = indexmap::map::IntoIter<String, Sheet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sheets.into_iter()
    }
}

impl<'a> IntoIterator for &'a Book {
    type Item = (&'a String, &'a Sheet);
    type IntoIter = indexmap::map::Iter<'a, String, Sheet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sheets.iter()
    }
}

impl FromIterator<Sheet> for Book {
    fn from_iter<I: IntoIterator<Item = Sheet>>(iter: I) -> Self {
        let mut book = Book::new();
        for sheet in iter {
            book.insert(sheet);
        }
        book
    }
}
