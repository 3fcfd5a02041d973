//! Boundary ↔ indicator join.
//!
//! Every boundary survives the join. Indicator rows without a boundary
//! are dropped; boundaries without an indicator row carry no values.

use std::collections::{BTreeMap, BTreeSet};

use seniaura_catalogue::Catalogue;
use seniaura_catalogue::overrides::{GLOBAL_INCIDENCE_CODE, GLOBAL_INCIDENCE_LABEL, apply_overrides};
use seniaura_catalogue_models::{Category, Polarity, VariableEntry};
use seniaura_territory_models::{Boundary, FieldMapping, Territory, TerritoryTable};

use crate::indicators::{IndicatorRow, IndicatorTable};

/// Sub-indicators summed into the global incidence rate.
pub const GLOBAL_INCIDENCE_PARTS: &[&str] = &["INCI_AVC", "INCI_CardIsch", "INCI_InsuCard"];

/// Parses a raw cell as a finite number.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Left-joins `boundaries` to `indicators` on the territory code.
///
/// Applies catalogue overrides for columns present in the table, coerces
/// every catalogued column to a number, and synthesizes the global
/// incidence rate when the table lacks it. The catalogue is updated in
/// place with the override and derived entries.
#[must_use]
pub fn merge(
    boundaries: Vec<Boundary>,
    indicators: &IndicatorTable,
    catalogue: &mut Catalogue,
    fields: &FieldMapping,
) -> TerritoryTable {
    apply_overrides(catalogue, |code| indicators.has_column(code));

    let mut numeric_columns: BTreeSet<String> = indicators
        .headers
        .iter()
        .filter(|h| **h != fields.indicator_code && **h != fields.name)
        .filter(|h| catalogue.contains(h))
        .cloned()
        .collect();

    let derive_incidence = !indicators.has_column(GLOBAL_INCIDENCE_CODE)
        && GLOBAL_INCIDENCE_PARTS
            .iter()
            .any(|part| indicators.has_column(part));

    if derive_incidence {
        numeric_columns.insert(GLOBAL_INCIDENCE_CODE.to_string());
        catalogue.insert(VariableEntry {
            code: GLOBAL_INCIDENCE_CODE.to_string(),
            label: GLOBAL_INCIDENCE_LABEL.to_string(),
            category: Category::Health,
            polarity: Polarity::HigherIsWorse,
            unit: None,
            description: None,
        });
        log::info!("Derived {GLOBAL_INCIDENCE_CODE} from {GLOBAL_INCIDENCE_PARTS:?}");
    }

    let mut by_code: BTreeMap<&str, &IndicatorRow> = BTreeMap::new();
    let mut duplicate_rows = 0_usize;
    for row in &indicators.rows {
        if by_code.contains_key(row.code.as_str()) {
            duplicate_rows += 1;
        } else {
            by_code.insert(row.code.as_str(), row);
        }
    }
    if duplicate_rows > 0 {
        log::warn!("Ignored {duplicate_rows} indicator rows with a duplicate code");
    }

    let mut seen = BTreeSet::new();
    let mut territories = Vec::with_capacity(boundaries.len());
    let mut unmatched = 0_usize;
    let mut duplicate_boundaries = 0_usize;

    for boundary in boundaries {
        if !seen.insert(boundary.code.clone()) {
            duplicate_boundaries += 1;
            continue;
        }

        let row = by_code.get(boundary.code.as_str()).copied();
        if row.is_none() {
            unmatched += 1;
        }

        let (values, attributes) = row.map_or_else(
            || (BTreeMap::new(), BTreeMap::new()),
            |row| split_row(row, &numeric_columns, derive_incidence),
        );

        let name = attributes
            .get(&fields.name)
            .cloned()
            .or(boundary.name);

        territories.push(Territory {
            code: boundary.code,
            name,
            geometry: boundary.geometry,
            values,
            attributes,
        });
    }

    if duplicate_boundaries > 0 {
        log::warn!("Ignored {duplicate_boundaries} boundaries with a duplicate code");
    }
    if unmatched > 0 {
        log::warn!("{unmatched} territories have no indicator row");
    }
    log::info!(
        "Merged {} territories with {} numeric columns",
        territories.len(),
        numeric_columns.len()
    );

    TerritoryTable::new(territories, numeric_columns)
}

fn split_row(
    row: &IndicatorRow,
    numeric_columns: &BTreeSet<String>,
    derive_incidence: bool,
) -> (BTreeMap<String, f64>, BTreeMap<String, String>) {
    let mut values = BTreeMap::new();
    let mut attributes = BTreeMap::new();

    for (column, raw) in &row.cells {
        if numeric_columns.contains(column) {
            if let Some(v) = parse_number(raw) {
                values.insert(column.clone(), v);
            }
        } else {
            attributes.insert(column.clone(), raw.clone());
        }
    }

    if derive_incidence {
        let total: f64 = GLOBAL_INCIDENCE_PARTS
            .iter()
            .filter_map(|part| row.cell(part).and_then(parse_number))
            .sum();
        values.insert(GLOBAL_INCIDENCE_CODE.to_string(), total);
    }

    (values, attributes)
}
