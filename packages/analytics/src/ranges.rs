//! Observed variable ranges for range-filter sliders.

use seniaura_analytics_models::VariableRange;
use seniaura_catalogue::Catalogue;
use seniaura_territory_models::TerritoryTable;

use crate::normalize::{MinMax, percentile};

/// Min, max, and 5th/95th percentiles of a variable.
///
/// Returns `None` if the variable is not a column or has no values.
#[must_use]
pub fn variable_range(
    table: &TerritoryTable,
    catalogue: &Catalogue,
    code: &str,
) -> Option<VariableRange> {
    if !table.has_column(code) {
        return None;
    }
    let values = table.present_values(code);
    let scale = MinMax::fit(&values)?;

    Some(VariableRange {
        code: code.to_string(),
        label: catalogue.label_or_code(code).to_string(),
        min: scale.min,
        max: scale.max,
        p05: percentile(&values, 0.05)?,
        p95: percentile(&values, 0.95)?,
        count: values.len(),
    })
}
