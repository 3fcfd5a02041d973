#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Parameter and result types for the analytical tools.
//!
//! Each tool (range filter, diagnostic gap, radar profile, clustering,
//! determinant screening) takes a `...Params` value and returns a typed
//! result. All types serialize as camelCase JSON for the HTTP API.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A territory reference: code plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerritoryRef {
    /// Territory code.
    pub code: String,
    /// Display name (falls back to the code).
    pub name: String,
}

/// A variable reference: code plus catalogue label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableRef {
    /// Variable code.
    pub code: String,
    /// Catalogue label (falls back to the code).
    pub label: String,
}

// ---------------------------------------------------------------------------
// Range filters
// ---------------------------------------------------------------------------

/// An inclusive range filter on one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Variable code.
    pub variable: String,
    /// Lower bound (inclusive).
    pub low: f64,
    /// Upper bound (inclusive).
    pub high: f64,
}

impl FilterSpec {
    /// Creates a filter.
    #[must_use]
    pub fn new(variable: impl Into<String>, low: f64, high: f64) -> Self {
        Self {
            variable: variable.into(),
            low,
            high,
        }
    }
}

/// Why territories failed one variable's filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterExclusion {
    /// Variable code.
    pub variable: String,
    /// Territories with a value outside the range.
    pub out_of_range: usize,
    /// Territories with no value for the variable.
    pub missing: usize,
}

/// Result of evaluating a set of range filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterEvaluation {
    /// Inclusion flag per territory, in table order.
    pub mask: Vec<bool>,
    /// Codes of included territories, in table order.
    pub included: Vec<String>,
    /// Per-variable exclusion counts, sorted by variable code.
    pub exclusions: Vec<FilterExclusion>,
    /// Filter variables that are not dataset columns.
    pub ignored: Vec<String>,
}

impl FilterEvaluation {
    /// Number of included territories.
    #[must_use]
    pub fn included_count(&self) -> usize {
        self.included.len()
    }

    /// Exclusion counts for one variable.
    #[must_use]
    pub fn exclusion(&self, variable: &str) -> Option<&FilterExclusion> {
        self.exclusions.iter().find(|e| e.variable == variable)
    }
}

// ---------------------------------------------------------------------------
// Diagnostic gap
// ---------------------------------------------------------------------------

/// Kind of health outcome measure.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthIndicator {
    /// Incidence.
    #[default]
    Inci,
    /// Mortality.
    Mort,
    /// Prevalence.
    Prev,
}

/// Cardiovascular pathology.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Pathology {
    /// Stroke.
    #[default]
    #[serde(rename = "AVC")]
    #[strum(serialize = "AVC")]
    Avc,
    /// Ischaemic heart disease.
    CardIsch,
    /// Heart failure.
    InsuCard,
    /// All three combined.
    #[serde(rename = "CNR")]
    #[strum(serialize = "CNR")]
    Cnr,
}

/// Health outcome targeted by a gap ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthTarget {
    /// Measure kind.
    pub indicator: HealthIndicator,
    /// Pathology.
    pub pathology: Pathology,
}

impl HealthTarget {
    /// The column name this target reads, e.g. `INCI_AVC`.
    #[must_use]
    pub fn column(&self) -> String {
        format!("{}_{}", self.indicator, self.pathology)
    }
}

/// Parameters for the diagnostic gap ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapParams {
    /// Health outcome.
    pub target: HealthTarget,
    /// Context variable codes.
    pub context: Vec<String>,
    /// Number of territories to return (default 10).
    #[serde(default)]
    pub limit: Option<usize>,
}

/// One ranked territory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapEntry {
    /// Territory code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Outcome value.
    pub outcome: f64,
    /// Percentile rank of the outcome (1.0 = worst).
    pub health_rank: f64,
    /// Mean badness rank of the context variables.
    pub context_rank: f64,
    /// `health_rank - context_rank`.
    pub gap: f64,
}

/// Why a gap ranking produced no entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GapSkipReason {
    /// The outcome column does not exist.
    UnknownTarget,
    /// None of the context variables is a dataset column.
    NoContextVariables,
    /// Fewer than the minimum number of complete territories.
    InsufficientSample,
}

/// Result of the diagnostic gap ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapRanking {
    /// Resolved outcome column.
    pub target: String,
    /// Context variables actually used.
    pub context: Vec<VariableRef>,
    /// Territories with complete data.
    pub sample_size: usize,
    /// Top territories by gap, descending.
    pub entries: Vec<GapEntry>,
    /// Set when the ranking was skipped.
    pub skipped: Option<GapSkipReason>,
}

// ---------------------------------------------------------------------------
// Radar profile
// ---------------------------------------------------------------------------

/// Parameters for a radar profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarParams {
    /// Axis variables.
    pub variables: Vec<String>,
    /// Territories to overlay on the regional profile.
    #[serde(default)]
    pub territories: Vec<String>,
}

/// One radar axis: the regional distribution in min-max space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarAxis {
    /// Variable code.
    pub code: String,
    /// Catalogue label.
    pub label: String,
    /// Regional mean.
    pub mean: f64,
    /// Mean minus one standard deviation, clamped to `[0, 1]`.
    pub lower: f64,
    /// Mean plus one standard deviation, clamped to `[0, 1]`.
    pub upper: f64,
}

/// One territory's normalized values, in axis order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarSeries {
    /// Territory code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Normalized value per axis (`None` = missing).
    pub values: Vec<Option<f64>>,
}

/// Result of a radar profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarProfile {
    /// Axes in request order.
    pub axes: Vec<RadarAxis>,
    /// Requested territories found in the dataset.
    pub series: Vec<RadarSeries>,
    /// Requested codes not found in the dataset.
    pub unknown_territories: Vec<String>,
}

// ---------------------------------------------------------------------------
// Clustering
// ---------------------------------------------------------------------------

/// Parameters for K-Means clustering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterParams {
    /// Variables to cluster on.
    pub variables: Vec<String>,
    /// Number of clusters.
    pub k: usize,
}

/// One territory's cluster label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterAssignment {
    /// Territory code.
    pub code: String,
    /// Cluster label in `[0, k)`.
    pub cluster: usize,
}

/// Summary of one cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterProfile {
    /// Cluster label.
    pub id: usize,
    /// Number of members.
    pub size: usize,
    /// Members sorted by name.
    pub members: Vec<TerritoryRef>,
    /// Mean raw value per variable.
    pub means: Vec<f64>,
    /// Mean value per variable in min-max space over the clustered
    /// territories.
    pub normalized_means: Vec<f64>,
}

/// Result of a clustering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterResult {
    /// Variables used, in column order of the means.
    pub variables: Vec<VariableRef>,
    /// Cluster label per clustered territory, in table order.
    pub assignments: Vec<ClusterAssignment>,
    /// Per-cluster summaries, by label. Empty clusters are omitted.
    pub clusters: Vec<ClusterProfile>,
    /// Territories missing at least one variable.
    pub unclassified: Vec<TerritoryRef>,
    /// Within-cluster sum of squares in standardized space.
    pub inertia: f64,
}

impl ClusterResult {
    /// The label of a territory, or `None` if unclassified.
    #[must_use]
    pub fn label_of(&self, code: &str) -> Option<usize> {
        self.assignments
            .iter()
            .find(|a| a.code == code)
            .map(|a| a.cluster)
    }
}

// ---------------------------------------------------------------------------
// Variable ranges and screening
// ---------------------------------------------------------------------------

/// Observed range of a variable, for range-filter sliders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableRange {
    /// Variable code.
    pub code: String,
    /// Catalogue label.
    pub label: String,
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
    /// 5th percentile.
    pub p05: f64,
    /// 95th percentile.
    pub p95: f64,
    /// Territories with a value.
    pub count: usize,
}

/// Parameters for determinant screening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningParams {
    /// Health outcome columns.
    pub outcomes: Vec<String>,
    /// Candidate determinant columns.
    pub determinants: Vec<String>,
}

/// Simple linear regression of one outcome on one determinant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionStats {
    /// Outcome column.
    pub outcome: String,
    /// Determinant column.
    pub determinant: String,
    /// Slope.
    pub slope: f64,
    /// Intercept.
    pub intercept: f64,
    /// Pearson correlation.
    pub r: f64,
    /// Coefficient of determination.
    pub r_squared: f64,
    /// Two-sided p-value of the slope.
    pub p_value: f64,
    /// Complete observations.
    pub n: usize,
}

/// One entry of a selection list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableOption {
    /// Variable code.
    pub value: String,
    /// Catalogue label.
    pub label: String,
}
