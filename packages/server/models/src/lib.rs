#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the `SeniAURA` server.
//!
//! These types are serialized to JSON for the REST API. Analytical
//! request and result bodies reuse the analytics model types directly;
//! the types here cover the dataset browsing endpoints.

use std::collections::BTreeMap;

use seniaura_catalogue_models::{Category, Polarity};
use serde::{Deserialize, Serialize};

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Always `true` when the server answers.
    pub healthy: bool,
    /// Server version.
    pub version: String,
    /// Number of loaded territories.
    pub territories: usize,
    /// Number of numeric columns.
    pub variables: usize,
}

/// Query parameters for the variables endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariablesQuery {
    /// Restrict to one category. All selectable categories when absent.
    pub category: Option<Category>,
}

/// Code-keyed catalogue lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCatalogueLookups {
    /// Label by variable code.
    pub labels: BTreeMap<String, String>,
    /// Category by variable code.
    pub categories: BTreeMap<String, Category>,
    /// Polarity (`1` / `-1`) by variable code.
    pub polarities: BTreeMap<String, Polarity>,
}

/// A territory in the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTerritorySummary {
    /// Territory code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// `[lon, lat]` of the boundary centroid.
    pub centroid: Option<[f64; 2]>,
}

/// One territory with all its values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTerritoryDetail {
    /// Territory code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// `[lon, lat]` of the boundary centroid.
    pub centroid: Option<[f64; 2]>,
    /// Numeric values by variable code.
    pub values: BTreeMap<String, f64>,
    /// Text attributes by column name.
    pub attributes: BTreeMap<String, String>,
}

/// Error body for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// User-facing message.
    pub error: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variables_query_parses_category() {
        let q: VariablesQuery = serde_json::from_str(r#"{"category":"care_supply"}"#).unwrap();
        assert_eq!(q.category, Some(Category::CareSupply));
        let q: VariablesQuery = serde_json::from_str("{}").unwrap();
        assert!(q.category.is_none());
    }

    #[test]
    fn error_body_shape() {
        let body = serde_json::to_value(ApiError::new("Sélectionnez au moins 2 variables.")).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Sélectionnez au moins 2 variables." }));
    }
}
