#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Analytical tools over the merged territory table.
//!
//! Each public function is one tool: it takes the read-only table (and
//! catalogue where labels or polarities matter), a structured parameter
//! value, and returns a typed result. Nothing here mutates the dataset.

pub mod cluster;
pub mod filter;
pub mod gap;
pub mod kmeans;
pub mod normalize;
pub mod radar;
pub mod rank;
pub mod ranges;
pub mod screening;

use thiserror::Error;

pub use cluster::cluster;
pub use filter::evaluate_filters;
pub use gap::rank_gaps;
pub use radar::radar_profile;
pub use ranges::variable_range;
pub use screening::screen;

/// Validation failures of an analytical request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyticsError {
    /// Fewer valid variables than the tool needs.
    #[error("At least {required} valid variables required, {selected} selected")]
    TooFewVariables {
        /// Minimum number of variables.
        required: usize,
        /// Valid variables selected.
        selected: usize,
    },

    /// Fewer complete territories than the tool needs.
    #[error("At least {required} territories with complete data required, {available} available")]
    InsufficientData {
        /// Minimum number of territories.
        required: usize,
        /// Territories with complete data.
        available: usize,
    },

    /// The cluster count is zero.
    #[error("Invalid cluster count: {k}")]
    InvalidClusterCount {
        /// Requested cluster count.
        k: usize,
    },
}

impl AnalyticsError {
    /// Message shown to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::TooFewVariables { required, .. } => {
                format!("Sélectionnez au moins {required} variables.")
            }
            Self::InsufficientData {
                required,
                available,
            } => format!(
                "Pas assez de données : {available} territoires complets pour {required} requis."
            ),
            Self::InvalidClusterCount { .. } => {
                "Le nombre de clusters doit être au moins 1.".to_string()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::{BTreeMap, BTreeSet};

    use geo::MultiPolygon;
    use seniaura_catalogue::Catalogue;
    use seniaura_catalogue_models::{Category, Polarity, VariableEntry};
    use seniaura_territory_models::{Territory, TerritoryTable};

    /// Builds a table with one territory per row. `None` cells are missing.
    pub fn table(columns: &[&str], rows: &[(&str, &[Option<f64>])]) -> TerritoryTable {
        let territories = rows
            .iter()
            .map(|(code, cells)| Territory {
                code: (*code).to_string(),
                name: Some(format!("T{code}")),
                geometry: MultiPolygon(vec![]),
                values: columns
                    .iter()
                    .zip(cells.iter())
                    .filter_map(|(c, v)| v.map(|v| ((*c).to_string(), v)))
                    .collect::<BTreeMap<_, _>>(),
                attributes: BTreeMap::new(),
            })
            .collect();
        let numeric: BTreeSet<String> = columns.iter().map(ToString::to_string).collect();
        TerritoryTable::new(territories, numeric)
    }

    /// Builds a catalogue with the given polarities.
    pub fn catalogue(entries: &[(&str, Polarity)]) -> Catalogue {
        let mut catalogue = Catalogue::new();
        for (code, polarity) in entries {
            catalogue.insert(VariableEntry {
                code: (*code).to_string(),
                label: format!("Label {code}"),
                category: Category::SocioEconomic,
                polarity: *polarity,
                unit: None,
                description: None,
            });
        }
        catalogue
    }

    pub fn vars(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }
}
