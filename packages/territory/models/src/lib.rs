#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Territory and boundary types.
//!
//! A [`Territory`] is one intermunicipal grouping (EPCI): its polygon
//! boundary joined to its row of indicator values. The merged set of
//! territories is held in a [`TerritoryTable`], indexed by territory code.
//! Lookups always go through the code, never through row positions.

pub mod config;

use std::collections::{BTreeMap, BTreeSet};

use geo::{Centroid, MultiPolygon};

pub use config::{FieldMapping, SourceConfig, SourcePaths};

/// A boundary polygon read from a geographic layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    /// Normalized territory code.
    pub code: String,
    /// Display name from the layer properties, if any.
    pub name: Option<String>,
    /// Polygon geometry (single polygons are wrapped).
    pub geometry: MultiPolygon<f64>,
}

/// One row of the merged dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Territory {
    /// Canonical territory code (the join key).
    pub code: String,
    /// Human-readable name.
    pub name: Option<String>,
    /// Boundary geometry.
    pub geometry: MultiPolygon<f64>,
    /// Numeric indicator values by variable code. Missing values are
    /// absent from the map.
    pub values: BTreeMap<String, f64>,
    /// Raw text of every non-numeric tabular column (identifiers,
    /// administrative labels...).
    pub attributes: BTreeMap<String, String>,
}

impl Territory {
    /// Returns the value of a variable, or `None` if missing.
    #[must_use]
    pub fn value(&self, variable: &str) -> Option<f64> {
        self.values.get(variable).copied()
    }

    /// Returns the display name, falling back to the code.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.code)
    }

    /// Returns `(lon, lat)` of the geometry's centroid.
    #[must_use]
    pub fn centroid(&self) -> Option<(f64, f64)> {
        self.geometry.centroid().map(|p| (p.x(), p.y()))
    }

    /// Returns the values of all `variables`, or `None` if any is missing.
    #[must_use]
    pub fn complete_values(&self, variables: &[String]) -> Option<Vec<f64>> {
        variables.iter().map(|v| self.value(v)).collect()
    }
}

/// The merged territory × variable matrix.
///
/// Territory codes are unique: when two territories share a code the
/// first one is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerritoryTable {
    territories: Vec<Territory>,
    index: BTreeMap<String, usize>,
    numeric_columns: BTreeSet<String>,
}

impl TerritoryTable {
    /// Builds a table from territories in display order.
    ///
    /// `numeric_columns` lists every variable coerced to a number,
    /// whether or not any territory has a value for it.
    #[must_use]
    pub fn new(territories: Vec<Territory>, numeric_columns: BTreeSet<String>) -> Self {
        let mut kept = Vec::with_capacity(territories.len());
        let mut index = BTreeMap::new();

        for territory in territories {
            if index.contains_key(&territory.code) {
                continue;
            }
            index.insert(territory.code.clone(), kept.len());
            kept.push(territory);
        }

        Self {
            territories: kept,
            index,
            numeric_columns,
        }
    }

    /// Looks up a territory by code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Territory> {
        self.index.get(code).map(|&i| &self.territories[i])
    }

    /// Iterates over territories in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, Territory> {
        self.territories.iter()
    }

    /// Number of territories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.territories.len()
    }

    /// Returns `true` if there are no territories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.territories.is_empty()
    }

    /// Returns `true` if `variable` is a numeric column of the dataset.
    #[must_use]
    pub fn has_column(&self, variable: &str) -> bool {
        self.numeric_columns.contains(variable)
    }

    /// All numeric columns.
    #[must_use]
    pub const fn columns(&self) -> &BTreeSet<String> {
        &self.numeric_columns
    }

    /// Values of one column in display order (`None` = missing).
    #[must_use]
    pub fn column(&self, variable: &str) -> Vec<Option<f64>> {
        self.territories.iter().map(|t| t.value(variable)).collect()
    }

    /// Present values of one column.
    #[must_use]
    pub fn present_values(&self, variable: &str) -> Vec<f64> {
        self.territories
            .iter()
            .filter_map(|t| t.value(variable))
            .collect()
    }

    /// Keeps only the variables that are dataset columns, dropping
    /// duplicates while preserving order.
    #[must_use]
    pub fn valid_variables(&self, variables: &[String]) -> Vec<String> {
        let mut seen = BTreeSet::new();
        variables
            .iter()
            .filter(|v| self.has_column(v))
            .filter(|v| seen.insert(v.as_str()))
            .cloned()
            .collect()
    }

    /// Territories with a value for every variable, paired with those
    /// values in `variables` order.
    #[must_use]
    pub fn complete_rows(&self, variables: &[String]) -> Vec<(&Territory, Vec<f64>)> {
        self.territories
            .iter()
            .filter_map(|t| t.complete_values(variables).map(|values| (t, values)))
            .collect()
    }
}

impl<'a> IntoIterator for &'a TerritoryTable {
    type Item = &'a Territory;
    type IntoIter = std::slice::Iter<'a, Territory>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
