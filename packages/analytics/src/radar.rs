//! Radar profiles: territories against the regional distribution.

use seniaura_analytics_models::{RadarAxis, RadarParams, RadarProfile, RadarSeries};
use seniaura_catalogue::Catalogue;
use seniaura_territory_models::TerritoryTable;

use crate::AnalyticsError;
use crate::normalize::{MinMax, mean, zscore_band};

/// Minimum number of axes for a readable radar.
pub const MIN_RADAR_VARIABLES: usize = 3;

/// Builds a radar profile.
///
/// Each axis is scaled to the regional min-max range. The regional mean
/// and the ±1 standard deviation band are reported per axis, and every
/// requested territory gets its normalized values.
///
/// # Errors
///
/// Returns [`AnalyticsError::TooFewVariables`] if fewer than three
/// requested variables are dataset columns.
pub fn radar_profile(
    table: &TerritoryTable,
    catalogue: &Catalogue,
    params: &RadarParams,
) -> Result<RadarProfile, AnalyticsError> {
    let variables = table.valid_variables(&params.variables);
    if variables.len() < MIN_RADAR_VARIABLES {
        return Err(AnalyticsError::TooFewVariables {
            required: MIN_RADAR_VARIABLES,
            selected: variables.len(),
        });
    }

    let mut axes = Vec::with_capacity(variables.len());
    let mut scales = Vec::with_capacity(variables.len());

    for code in &variables {
        let present = table.present_values(code);
        let scale = MinMax::fit(&present);
        let (lower, upper) = zscore_band(&table.column(code)).unwrap_or_default();

        axes.push(RadarAxis {
            code: code.clone(),
            label: catalogue.label_or_code(code).to_string(),
            mean: scale
                .zip(mean(&present))
                .map_or(0.0, |(s, m)| s.apply(m)),
            lower,
            upper,
        });
        scales.push(scale);
    }

    let mut series = Vec::new();
    let mut unknown_territories = Vec::new();

    for code in &params.territories {
        let Some(territory) = table.get(code) else {
            unknown_territories.push(code.clone());
            continue;
        };
        series.push(RadarSeries {
            code: territory.code.clone(),
            name: territory.display_name().to_string(),
            values: variables
                .iter()
                .zip(&scales)
                .map(|(v, scale)| territory.value(v).zip(*scale).map(|(x, s)| s.apply(x)))
                .collect(),
        });
    }

    if !unknown_territories.is_empty() {
        log::debug!("Radar request for unknown territories: {unknown_territories:?}");
    }

    Ok(RadarProfile {
        axes,
        series,
        unknown_territories,
    })
}
