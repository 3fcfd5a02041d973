#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Territorial dataset loading.
//!
//! Reads the EPCI boundary layer (`GeoJSON`), the indicator table (CSV),
//! and the variable metadata (CSV), then left-joins boundaries to
//! indicator rows on the normalized territory code. The result is a
//! [`Dataset`]: an immutable context built once at startup and shared by
//! every analytical tool.

pub mod boundaries;
pub mod code;
pub mod config;
pub mod indicators;
pub mod loader;
pub mod merge;

use std::path::PathBuf;

use seniaura_catalogue::{Catalogue, CatalogueError};
use seniaura_catalogue_models::{Category, VariableEntry};
use seniaura_territory_models::{Boundary, TerritoryTable};
use thiserror::Error;

pub use loader::load;

/// Which input a [`LoadError::MissingSource`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Territory boundary layer.
    Boundaries,
    /// Indicator table.
    Indicators,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Boundaries => write!(f, "boundary layer"),
            Self::Indicators => write!(f, "indicator table"),
        }
    }
}

/// Errors that can occur while loading the dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A required input file does not exist.
    #[error("Required {kind} not found at {}", path.display())]
    MissingSource {
        /// Which input is missing.
        kind: SourceKind,
        /// Where it was expected.
        path: PathBuf,
    },

    /// A required column is absent from an input.
    #[error("Column '{column}' not found in {kind}")]
    MissingColumn {
        /// Column name.
        column: String,
        /// Which input lacks it.
        kind: SourceKind,
    },

    /// Reading a file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The configuration file is invalid.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// The variable metadata could not be read.
    #[error("Catalogue error: {0}")]
    Catalogue(#[from] CatalogueError),

    /// The boundary layer is not a feature collection.
    #[error("Invalid boundary layer: {message}")]
    InvalidBoundaries {
        /// Description of what went wrong.
        message: String,
    },
}

/// The loaded, merged dataset.
///
/// Treated as immutable for the lifetime of the process; share it as
/// `Arc<Dataset>`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Merged territories with geometry and indicator values.
    pub territories: TerritoryTable,
    /// Variable catalogue (metadata, overrides, derived columns).
    pub catalogue: Catalogue,
    /// Coarser boundaries drawn as a visual overlay only.
    pub overlay: Vec<Boundary>,
}

impl Dataset {
    /// Catalogued variables of `category` that are dataset columns,
    /// sorted by label.
    #[must_use]
    pub fn selection_options(&self, category: Category) -> Vec<&VariableEntry> {
        self.catalogue
            .by_category(category)
            .into_iter()
            .filter(|e| self.territories.has_column(&e.code))
            .collect()
    }
}
