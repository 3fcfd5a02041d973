#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Variable catalogue for the territorial dataset.
//!
//! Builds the code → [`VariableEntry`] mapping from the variable metadata
//! file, applies the fixed override table for critical columns the file
//! misses, and answers the label / category / polarity lookups used by
//! every analytical tool. The catalogue is built once at load time and is
//! read-only afterwards.

pub mod builder;
pub mod overrides;
pub mod reader;

use std::collections::BTreeMap;

use seniaura_catalogue_models::{Category, Polarity, VariableEntry};
use thiserror::Error;

/// Errors that can occur while reading variable metadata.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// Reading the metadata file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The metadata file is not valid CSV or lacks the code column.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Read-only catalogue of known indicators, keyed by variable code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalogue {
    entries: BTreeMap<String, VariableEntry>,
}

impl Catalogue {
    /// Creates an empty catalogue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Inserts or replaces an entry.
    pub fn insert(&mut self, entry: VariableEntry) {
        self.entries.insert(entry.code.clone(), entry);
    }

    /// Looks up an entry by code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&VariableEntry> {
        self.entries.get(code)
    }

    /// Returns `true` if the code is catalogued.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    /// Returns the label for a code, falling back to the code itself.
    #[must_use]
    pub fn label_or_code<'a>(&'a self, code: &'a str) -> &'a str {
        self.entries.get(code).map_or(code, |e| e.label.as_str())
    }

    /// Returns the polarity for a code, defaulting to
    /// [`Polarity::HigherIsWorse`] for unknown codes.
    #[must_use]
    pub fn polarity_of(&self, code: &str) -> Polarity {
        self.entries
            .get(code)
            .map_or_else(Polarity::default, |e| e.polarity)
    }

    /// Returns the category for a code, if catalogued.
    #[must_use]
    pub fn category_of(&self, code: &str) -> Option<Category> {
        self.entries.get(code).map(|e| e.category)
    }

    /// Entries of one category, sorted by label.
    #[must_use]
    pub fn by_category(&self, category: Category) -> Vec<&VariableEntry> {
        let mut entries: Vec<&VariableEntry> = self
            .entries
            .values()
            .filter(|e| e.category == category)
            .collect();
        entries.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.code.cmp(&b.code)));
        entries
    }

    /// Entries that may appear in selection lists (every category except
    /// [`Category::Other`]), sorted by label.
    #[must_use]
    pub fn selectable(&self) -> Vec<&VariableEntry> {
        let mut entries: Vec<&VariableEntry> = self
            .entries
            .values()
            .filter(|e| e.category.is_selectable())
            .collect();
        entries.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.code.cmp(&b.code)));
        entries
    }

    /// Code → label lookup.
    #[must_use]
    pub fn labels(&self) -> BTreeMap<&str, &str> {
        self.entries
            .iter()
            .map(|(code, e)| (code.as_str(), e.label.as_str()))
            .collect()
    }

    /// Code → category lookup.
    #[must_use]
    pub fn categories(&self) -> BTreeMap<&str, Category> {
        self.entries
            .iter()
            .map(|(code, e)| (code.as_str(), e.category))
            .collect()
    }

    /// Code → polarity lookup.
    #[must_use]
    pub fn polarities(&self) -> BTreeMap<&str, Polarity> {
        self.entries
            .iter()
            .map(|(code, e)| (code.as_str(), e.polarity))
            .collect()
    }

    /// Iterates over all entries in code order.
    pub fn iter(&self) -> impl Iterator<Item = &VariableEntry> {
        self.entries.values()
    }

    /// Number of catalogued variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is catalogued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
