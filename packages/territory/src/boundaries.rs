//! `GeoJSON` boundary layer parsing.

use geo::MultiPolygon;
use geojson::{Feature, GeoJson};
use seniaura_territory_models::Boundary;

use crate::LoadError;
use crate::code::code_from_json;

/// Parses a `GeoJSON` `FeatureCollection` into boundaries.
///
/// Each feature must carry `code_field` in its properties and a
/// `Polygon` or `MultiPolygon` geometry. Features that do not are
/// skipped with a warning. Codes are normalized.
///
/// # Errors
///
/// Returns [`LoadError::GeoJson`] if the text is not valid `GeoJSON`, or
/// [`LoadError::InvalidBoundaries`] if it is not a feature collection.
pub fn parse_boundaries(
    geojson_str: &str,
    code_field: &str,
    name_field: Option<&str>,
) -> Result<Vec<Boundary>, LoadError> {
    let geojson: GeoJson = geojson_str.parse()?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(LoadError::InvalidBoundaries {
            message: "expected a FeatureCollection".to_string(),
        });
    };

    let total = collection.features.len();
    let mut boundaries = Vec::with_capacity(total);
    let mut skipped = 0_usize;

    for feature in collection.features {
        match boundary_from_feature(feature, code_field, name_field) {
            Some(boundary) => boundaries.push(boundary),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} of {total} boundary features without '{code_field}' or polygon geometry");
    }

    Ok(boundaries)
}

fn boundary_from_feature(
    feature: Feature,
    code_field: &str,
    name_field: Option<&str>,
) -> Option<Boundary> {
    let code = feature.property(code_field).and_then(code_from_json)?;
    let name = name_field
        .and_then(|field| feature.property(field))
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string);

    let geometry = feature.geometry?;
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    let geometry = match geo_geom {
        geo::Geometry::MultiPolygon(mp) => mp,
        geo::Geometry::Polygon(p) => MultiPolygon(vec![p]),
        _ => {
            log::debug!("Boundary {code} has non-polygon geometry");
            return None;
        }
    };

    Some(Boundary {
        code,
        name,
        geometry,
    })
}
