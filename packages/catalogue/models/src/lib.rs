#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Indicator catalogue types.
//!
//! Every numeric indicator in the territorial dataset is described by a
//! [`VariableEntry`]: a human-readable label, a thematic [`Category`], a
//! [`Polarity`] saying whether a higher value is better or worse, and
//! optional unit and description text. These types are shared by the
//! catalogue builder, the dataset merger, and every analytical tool.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Thematic grouping of an indicator.
///
/// [`Category::Other`] covers identifiers, administrative columns, and
/// anything the metadata file does not classify. Those variables are
/// never offered in selection lists.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    /// Incidence, mortality and prevalence of cardiovascular conditions.
    Health,
    /// Population, employment, income, housing and education.
    SocioEconomic,
    /// Accessibility and density of health professionals.
    CareSupply,
    /// Air quality, noise and other environmental exposures.
    Environment,
    /// Identifiers and unclassified columns.
    Other,
}

impl Category {
    /// All categories, in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Health,
            Self::SocioEconomic,
            Self::CareSupply,
            Self::Environment,
            Self::Other,
        ]
    }

    /// Parses the free-text category used in the metadata file.
    ///
    /// Matching is case-insensitive and tolerates the accented French
    /// spellings (`"Santé"`, `"Socioéco"`, `"Offre de soins"`,
    /// `"Environnement"`). Anything unrecognized is [`Category::Other`].
    #[must_use]
    pub fn from_metadata(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        match lowered.as_str() {
            "santé" | "sante" | "health" => Self::Health,
            "socioéco" | "socioeco" | "socio-éco" | "socio-eco" | "socio_economic"
            | "socio-economic" => Self::SocioEconomic,
            "offre de soins" | "care_supply" | "care supply" => Self::CareSupply,
            "environnement" | "environment" => Self::Environment,
            _ => Self::Other,
        }
    }

    /// Returns `true` if the raw metadata category is the explicit
    /// exclusion marker (`"autre"` / `"other"`, any case).
    #[must_use]
    pub fn is_exclusion_marker(raw: &str) -> bool {
        let lowered = raw.trim().to_lowercase();
        lowered == "autre" || lowered == "other"
    }

    /// Whether variables of this category may appear in selection lists.
    #[must_use]
    pub const fn is_selectable(self) -> bool {
        !matches!(self, Self::Other)
    }
}

/// Direction in which an indicator value is "good".
///
/// Serialized as the signed integer used by the metadata file (`1` or
/// `-1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Polarity {
    /// A higher value is better (sense `+1`).
    HigherIsBetter,
    /// A higher value is worse (sense `-1`).
    #[default]
    HigherIsWorse,
}

impl Polarity {
    /// Returns the signed sense value (`1` or `-1`).
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Self::HigherIsBetter => 1,
            Self::HigherIsWorse => -1,
        }
    }

    /// Parses a raw sense cell.
    ///
    /// The value is read as a number and truncated toward zero. Missing,
    /// non-numeric and zero values fall back to
    /// [`Polarity::HigherIsWorse`], which downstream ranking depends on.
    #[must_use]
    pub fn from_sense(raw: Option<&str>) -> Self {
        let Some(value) = raw.map(str::trim).and_then(|s| s.parse::<f64>().ok()) else {
            return Self::default();
        };
        if !value.is_finite() {
            return Self::default();
        }
        let truncated = value.trunc();
        if truncated > 0.0 {
            Self::HigherIsBetter
        } else {
            Self::HigherIsWorse
        }
    }
}

impl From<Polarity> for i8 {
    fn from(value: Polarity) -> Self {
        value.sign()
    }
}

impl TryFrom<i8> for Polarity {
    type Error = InvalidPolarityError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::HigherIsBetter),
            -1 => Ok(Self::HigherIsWorse),
            _ => Err(InvalidPolarityError { value }),
        }
    }
}

/// Error returned when converting an integer other than `1` / `-1` into
/// a [`Polarity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPolarityError {
    /// The rejected value.
    pub value: i8,
}

impl std::fmt::Display for InvalidPolarityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid polarity {}: expected 1 or -1", self.value)
    }
}

impl std::error::Error for InvalidPolarityError {}

/// One catalogued indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableEntry {
    /// Column code in the tabular dataset (e.g. `"INCI_AVC"`).
    pub code: String,
    /// Human-readable label.
    pub label: String,
    /// Thematic category.
    pub category: Category,
    /// Whether higher values are better or worse.
    pub polarity: Polarity,
    /// Unit of measure, when known.
    pub unit: Option<String>,
    /// Long description, when known.
    pub description: Option<String>,
}

/// A raw row of the variable metadata file.
///
/// Header names follow the French dictionary file; English aliases are
/// accepted as well. Every column except the code is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRow {
    /// Variable code.
    #[serde(rename = "Variable", alias = "variable", alias = "Code", alias = "code")]
    pub variable: String,
    /// Free-text category.
    #[serde(
        default,
        rename = "Catégorie",
        alias = "Categorie",
        alias = "Category",
        alias = "category"
    )]
    pub category: Option<String>,
    /// Long description.
    #[serde(default, rename = "Description", alias = "description")]
    pub description: Option<String>,
    /// Short display label.
    #[serde(
        default,
        rename = "Nom_Court",
        alias = "Short_Label",
        alias = "short_label"
    )]
    pub short_label: Option<String>,
    /// Raw sense value (`1`, `-1`, `0`, blank...).
    #[serde(default, rename = "Sens", alias = "Sense", alias = "sense")]
    pub sense: Option<String>,
    /// Unit of measure.
    #[serde(
        default,
        rename = "Unité",
        alias = "Unite",
        alias = "Unit",
        alias = "unit"
    )]
    pub unit: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_french_categories() {
        assert_eq!(Category::from_metadata("Santé"), Category::Health);
        assert_eq!(Category::from_metadata("socioéco"), Category::SocioEconomic);
        assert_eq!(
            Category::from_metadata(" Offre de soins "),
            Category::CareSupply
        );
        assert_eq!(
            Category::from_metadata("ENVIRONNEMENT"),
            Category::Environment
        );
        assert_eq!(Category::from_metadata("Démographie"), Category::Other);
    }

    #[test]
    fn exclusion_marker_is_case_insensitive() {
        assert!(Category::is_exclusion_marker("autre"));
        assert!(Category::is_exclusion_marker("Autre"));
        assert!(Category::is_exclusion_marker(" OTHER "));
        assert!(!Category::is_exclusion_marker("Santé"));
    }

    #[test]
    fn only_other_is_hidden() {
        for category in Category::all() {
            assert_eq!(category.is_selectable(), *category != Category::Other);
        }
    }

    #[test]
    fn category_display_matches_serde() {
        assert_eq!(Category::SocioEconomic.to_string(), "socio_economic");
        assert_eq!(
            "care_supply".parse::<Category>().unwrap(),
            Category::CareSupply
        );
    }

    #[test]
    fn sense_defaults_to_higher_is_worse() {
        assert_eq!(Polarity::from_sense(None), Polarity::HigherIsWorse);
        assert_eq!(Polarity::from_sense(Some("")), Polarity::HigherIsWorse);
        assert_eq!(Polarity::from_sense(Some("abc")), Polarity::HigherIsWorse);
        assert_eq!(Polarity::from_sense(Some("0")), Polarity::HigherIsWorse);
        assert_eq!(Polarity::from_sense(Some("0.4")), Polarity::HigherIsWorse);
        assert_eq!(Polarity::from_sense(Some("NaN")), Polarity::HigherIsWorse);
    }

    #[test]
    fn sense_parses_signed_values() {
        assert_eq!(Polarity::from_sense(Some("1")), Polarity::HigherIsBetter);
        assert_eq!(Polarity::from_sense(Some("1.0")), Polarity::HigherIsBetter);
        assert_eq!(Polarity::from_sense(Some(" -1 ")), Polarity::HigherIsWorse);
    }

    #[test]
    fn polarity_serializes_as_sign() {
        assert_eq!(Polarity::HigherIsBetter.sign(), 1);
        assert_eq!(Polarity::HigherIsWorse.sign(), -1);
        assert!(Polarity::try_from(0).is_err());
        assert_eq!(Polarity::try_from(-1), Ok(Polarity::HigherIsWorse));
    }
}
